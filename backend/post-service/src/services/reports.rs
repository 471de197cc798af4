/// Report service - cached resource controller for reports
///
/// A report exposes its post publicly until `expire_time`. Reads are open
/// to any authenticated principal but restricted to unexpired rows;
/// mutations are restricted to the author of the underlying post.
use crate::db::{report_repo, tag_repo};
use crate::error::{AppError, Result};
use crate::models::ReportWithPost;
use crate::services::posts::to_cached_tag;
use chrono::{DateTime, Duration, Utc};
use quill_cache::posts::CachedTag;
use quill_cache::reports::{CachedReport, CachedReportPost, ReportCache};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Minimum lead time between "now" and a report's expiry
const MIN_EXPIRY_LEAD_MINUTES: i64 = 2;

pub struct ReportService {
    pool: PgPool,
    cache: ReportCache,
}

impl ReportService {
    pub fn new(pool: PgPool, cache: ReportCache) -> Self {
        Self { pool, cache }
    }

    /// All currently-unexpired reports, visible to any principal
    pub async fn list_reports(&self) -> Result<Vec<CachedReport>> {
        let rows = report_repo::find_unexpired(&self.pool).await?;

        let mut post_ids: Vec<Uuid> = rows.iter().map(|r| r.post_id).collect();
        post_ids.sort();
        post_ids.dedup();

        let mut tags_by_post: HashMap<Uuid, Vec<CachedTag>> = HashMap::new();
        for row in tag_repo::find_tags_for_posts(&self.pool, &post_ids).await? {
            tags_by_post.entry(row.post_id).or_default().push(CachedTag {
                id: row.id,
                name: row.name,
                description: row.description,
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let tags = tags_by_post.get(&row.post_id).cloned().unwrap_or_default();
                build_snapshot(row, tags)
            })
            .collect())
    }

    /// Get a report by ID, read-through cached
    pub async fn get_report(&self, report_id: Uuid) -> Result<CachedReport> {
        match self.cache.get(report_id).await {
            Ok(Some(snapshot)) => {
                // The expiry filter applies to hits too: a snapshot that
                // expired mid-TTL is treated as absent, exactly like the
                // live query would.
                if snapshot.expire_time <= Utc::now() {
                    return Err(AppError::NotFound("report not found".to_string()));
                }
                return Ok(snapshot);
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(%report_id, "report cache read failed, falling back to store: {}", err);
            }
        }

        let row = report_repo::find_unexpired_by_id(&self.pool, report_id)
            .await?
            .ok_or_else(|| AppError::NotFound("report not found".to_string()))?;

        let tags = tag_repo::find_tags_for_post(&self.pool, row.post_id).await?;
        let snapshot = build_snapshot(row, tags.into_iter().map(to_cached_tag).collect());

        if let Err(err) = self.cache.set(&snapshot).await {
            tracing::debug!(report_id = %snapshot.id, "report cache set failed: {}", err);
        }

        Ok(snapshot)
    }

    /// Create a report exposing one of the caller's own posts
    pub async fn create_report(
        &self,
        principal: Uuid,
        post_id: Uuid,
        expire_time: DateTime<Utc>,
    ) -> Result<CachedReport> {
        let post = crate::db::post_repo::find_post_basic(&self.pool, post_id)
            .await?
            .ok_or_else(|| {
                AppError::Validation("report references an unknown post".to_string())
            })?;

        if post.author_id != principal {
            return Err(AppError::Validation(
                "cannot create a report for another author's post".to_string(),
            ));
        }

        validate_expire_time(expire_time, Utc::now())?;

        let report = report_repo::create_report(&self.pool, post_id, expire_time).await?;
        let tags = tag_repo::find_tags_for_post(&self.pool, post_id).await?;

        Ok(CachedReport {
            id: report.id,
            post: CachedReportPost {
                id: post.id,
                author_id: post.author_id,
                title: post.title,
                text: post.text,
                tags: tags.into_iter().map(to_cached_tag).collect(),
                created_at: post.created_at,
            },
            expire_time: report.expire_time,
        })
    }

    /// Move a report's expiry, owner only
    pub async fn update_report(
        &self,
        report_id: Uuid,
        principal: Uuid,
        expire_time: Option<DateTime<Utc>>,
    ) -> Result<CachedReport> {
        let existing = report_repo::find_unexpired_by_id(&self.pool, report_id)
            .await?
            .ok_or_else(|| AppError::NotFound("report not found".to_string()))?;

        if existing.post_author_id != principal {
            return Err(AppError::Forbidden(
                "only the post author may modify this report".to_string(),
            ));
        }

        // Empty patch: nothing to write, nothing to invalidate
        let Some(expire_time) = expire_time else {
            let tags = tag_repo::find_tags_for_post(&self.pool, existing.post_id).await?;
            return Ok(build_snapshot(
                existing,
                tags.into_iter().map(to_cached_tag).collect(),
            ));
        };

        validate_expire_time(expire_time, Utc::now())?;

        // Invalidate before the store write (same ordering as posts)
        self.cache.invalidate(report_id).await?;

        let updated = report_repo::update_expire_time(&self.pool, report_id, expire_time)
            .await?
            .ok_or_else(|| AppError::NotFound("report not found".to_string()))?;

        let tags = tag_repo::find_tags_for_post(&self.pool, updated.post_id).await?;

        Ok(build_snapshot(
            updated,
            tags.into_iter().map(to_cached_tag).collect(),
        ))
    }

    /// Withdraw a report, owner only
    pub async fn delete_report(&self, report_id: Uuid, principal: Uuid) -> Result<()> {
        let existing = report_repo::find_unexpired_by_id(&self.pool, report_id)
            .await?
            .ok_or_else(|| AppError::NotFound("report not found".to_string()))?;

        if existing.post_author_id != principal {
            return Err(AppError::Forbidden(
                "only the post author may delete this report".to_string(),
            ));
        }

        self.cache.invalidate(report_id).await?;

        let deleted = report_repo::delete_report(&self.pool, report_id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("report not found".to_string()));
        }

        Ok(())
    }
}

/// Reject expiry timestamps closer than the minimum lead time.
///
/// `now + lead` itself passes; anything strictly below it is rejected.
pub(crate) fn validate_expire_time(
    expire_time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<()> {
    if expire_time < now + Duration::minutes(MIN_EXPIRY_LEAD_MINUTES) {
        return Err(AppError::Validation(format!(
            "expire_time must be at least {} minutes in the future",
            MIN_EXPIRY_LEAD_MINUTES
        )));
    }

    Ok(())
}

fn build_snapshot(row: ReportWithPost, tags: Vec<CachedTag>) -> CachedReport {
    CachedReport {
        id: row.id,
        post: CachedReportPost {
            id: row.post_id,
            author_id: row.post_author_id,
            title: row.post_title,
            text: row.post_text,
            tags,
            created_at: row.post_created_at,
        },
        expire_time: row.expire_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expire_time_below_lead_fails() {
        let now = Utc::now();
        let result = validate_expire_time(now + Duration::minutes(2) - Duration::seconds(1), now);
        assert!(result.is_err());
    }

    #[test]
    fn test_expire_time_at_lead_succeeds() {
        let now = Utc::now();
        assert!(validate_expire_time(now + Duration::minutes(2), now).is_ok());
    }

    #[test]
    fn test_expire_time_above_lead_succeeds() {
        let now = Utc::now();
        let result = validate_expire_time(now + Duration::minutes(2) + Duration::seconds(1), now);
        assert!(result.is_ok());
    }

    #[test]
    fn test_expire_time_in_the_past_fails() {
        let now = Utc::now();
        assert!(validate_expire_time(now - Duration::hours(1), now).is_err());
    }

    #[test]
    fn test_rejection_is_a_validation_error() {
        let now = Utc::now();
        match validate_expire_time(now, now) {
            Err(AppError::Validation(_)) => {}
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
