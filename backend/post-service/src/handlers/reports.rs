/// Report handlers - HTTP endpoints for report operations
use crate::error::Result;
use crate::middleware::UserId;
use crate::services::ReportService;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use quill_cache::reports::ReportCache;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateReportRequest {
    /// Post to expose publicly
    pub post: Uuid,
    /// When the exposure ends
    pub expire_time: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateReportRequest {
    pub expire_time: Option<DateTime<Utc>>,
}

/// Create a new report
pub async fn create_report(
    pool: web::Data<PgPool>,
    cache: web::Data<ReportCache>,
    user_id: UserId,
    req: web::Json<CreateReportRequest>,
) -> Result<HttpResponse> {
    let service = ReportService::new((**pool).clone(), cache.get_ref().clone());
    let report = service
        .create_report(user_id.0, req.post, req.expire_time)
        .await?;

    Ok(HttpResponse::Created().json(report))
}

/// List currently-unexpired reports
pub async fn list_reports(
    pool: web::Data<PgPool>,
    cache: web::Data<ReportCache>,
    _user_id: UserId,
) -> Result<HttpResponse> {
    let service = ReportService::new((**pool).clone(), cache.get_ref().clone());
    let reports = service.list_reports().await?;

    Ok(HttpResponse::Ok().json(reports))
}

/// Get a report by ID
pub async fn get_report(
    pool: web::Data<PgPool>,
    cache: web::Data<ReportCache>,
    report_id: web::Path<Uuid>,
    _user_id: UserId,
) -> Result<HttpResponse> {
    let service = ReportService::new((**pool).clone(), cache.get_ref().clone());
    let report = service.get_report(*report_id).await?;

    Ok(HttpResponse::Ok().json(report))
}

/// Partially update a report
pub async fn update_report(
    pool: web::Data<PgPool>,
    cache: web::Data<ReportCache>,
    report_id: web::Path<Uuid>,
    user_id: UserId,
    req: web::Json<UpdateReportRequest>,
) -> Result<HttpResponse> {
    let service = ReportService::new((**pool).clone(), cache.get_ref().clone());
    let report = service
        .update_report(*report_id, user_id.0, req.expire_time)
        .await?;

    Ok(HttpResponse::Ok().json(report))
}

/// Delete a report
pub async fn delete_report(
    pool: web::Data<PgPool>,
    cache: web::Data<ReportCache>,
    report_id: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let service = ReportService::new((**pool).clone(), cache.get_ref().clone());
    service.delete_report(*report_id, user_id.0).await?;

    Ok(HttpResponse::NoContent().finish())
}
