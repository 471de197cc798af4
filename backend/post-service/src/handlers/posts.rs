/// Post handlers - HTTP endpoints for post operations
use crate::error::Result;
use crate::middleware::UserId;
use crate::services::posts::{PostPatch, PostService};
use actix_web::{web, HttpResponse};
use quill_cache::posts::PostCache;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub text: String,
    #[serde(default)]
    pub tags: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub text: Option<String>,
    pub tags: Option<Vec<Uuid>>,
}

/// Create a new post
pub async fn create_post(
    pool: web::Data<PgPool>,
    cache: web::Data<PostCache>,
    user_id: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = PostService::new((**pool).clone(), cache.get_ref().clone());
    let post = service
        .create_post(user_id.0, &req.title, &req.text, &req.tags)
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// List the caller's posts
pub async fn list_posts(
    pool: web::Data<PgPool>,
    cache: web::Data<PostCache>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone(), cache.get_ref().clone());
    let posts = service.list_posts(user_id.0).await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// Get a post by ID
pub async fn get_post(
    pool: web::Data<PgPool>,
    cache: web::Data<PostCache>,
    post_id: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone(), cache.get_ref().clone());
    let post = service.get_post(*post_id, user_id.0).await?;

    Ok(HttpResponse::Ok().json(post))
}

/// Partially update a post
pub async fn update_post(
    pool: web::Data<PgPool>,
    cache: web::Data<PostCache>,
    post_id: web::Path<Uuid>,
    user_id: UserId,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let req = req.into_inner();
    let service = PostService::new((**pool).clone(), cache.get_ref().clone());
    let post = service
        .update_post(
            *post_id,
            user_id.0,
            PostPatch {
                title: req.title,
                text: req.text,
                tags: req.tags,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(post))
}

/// Delete a post
pub async fn delete_post(
    pool: web::Data<PgPool>,
    cache: web::Data<PostCache>,
    post_id: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone(), cache.get_ref().clone());
    service.delete_post(*post_id, user_id.0).await?;

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_length_bound() {
        let req = CreatePostRequest {
            title: "a".repeat(201),
            text: "body".to_string(),
            tags: Vec::new(),
        };
        assert!(req.validate().is_err());

        let req = CreatePostRequest {
            title: "a".repeat(200),
            text: "body".to_string(),
            tags: Vec::new(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_patch_allows_absent_fields() {
        let req = UpdatePostRequest {
            title: None,
            text: None,
            tags: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_patch_validates_present_fields() {
        let req = UpdatePostRequest {
            title: Some(String::new()),
            text: None,
            tags: None,
        };
        assert!(req.validate().is_err());
    }
}
