use crate::models::{Report, ReportWithPost};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a report for a post
pub async fn create_report(
    pool: &PgPool,
    post_id: Uuid,
    expire_time: chrono::DateTime<chrono::Utc>,
) -> Result<Report, sqlx::Error> {
    let report = sqlx::query_as::<_, Report>(
        r#"
        INSERT INTO reports (post_id, expire_time)
        VALUES ($1, $2)
        RETURNING id, post_id, expire_time
        "#,
    )
    .bind(post_id)
    .bind(expire_time)
    .fetch_one(pool)
    .await?;

    Ok(report)
}

/// Find a currently-unexpired report joined with its post
///
/// Expired-but-unswept rows are filtered here, so the API never serves a
/// report the sweeper simply has not reached yet.
pub async fn find_unexpired_by_id(
    pool: &PgPool,
    report_id: Uuid,
) -> Result<Option<ReportWithPost>, sqlx::Error> {
    let report = sqlx::query_as::<_, ReportWithPost>(
        r#"
        SELECT rep.id, rep.expire_time,
               p.id AS post_id, p.author_id AS post_author_id,
               p.title AS post_title, p.text AS post_text,
               p.created_at AS post_created_at
        FROM reports rep
        INNER JOIN posts p ON p.id = rep.post_id
        WHERE rep.id = $1 AND rep.expire_time > now()
        "#,
    )
    .bind(report_id)
    .fetch_optional(pool)
    .await?;

    Ok(report)
}

/// All currently-unexpired reports, soonest-expiring last
pub async fn find_unexpired(pool: &PgPool) -> Result<Vec<ReportWithPost>, sqlx::Error> {
    let reports = sqlx::query_as::<_, ReportWithPost>(
        r#"
        SELECT rep.id, rep.expire_time,
               p.id AS post_id, p.author_id AS post_author_id,
               p.title AS post_title, p.text AS post_text,
               p.created_at AS post_created_at
        FROM reports rep
        INNER JOIN posts p ON p.id = rep.post_id
        WHERE rep.expire_time > now()
        ORDER BY rep.expire_time DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(reports)
}

/// Update a report's expiry and return the joined row. None if absent.
pub async fn update_expire_time(
    pool: &PgPool,
    report_id: Uuid,
    expire_time: chrono::DateTime<chrono::Utc>,
) -> Result<Option<ReportWithPost>, sqlx::Error> {
    let report = sqlx::query_as::<_, ReportWithPost>(
        r#"
        WITH updated AS (
            UPDATE reports
            SET expire_time = $2
            WHERE id = $1
            RETURNING id, post_id, expire_time
        )
        SELECT rep.id, rep.expire_time,
               p.id AS post_id, p.author_id AS post_author_id,
               p.title AS post_title, p.text AS post_text,
               p.created_at AS post_created_at
        FROM updated rep
        INNER JOIN posts p ON p.id = rep.post_id
        "#,
    )
    .bind(report_id)
    .bind(expire_time)
    .fetch_optional(pool)
    .await?;

    Ok(report)
}

/// Delete a report. Returns affected rows.
pub async fn delete_report(pool: &PgPool, report_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM reports WHERE id = $1")
        .bind(report_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Purge all reports whose expiry has passed, in one bulk statement.
/// Returns the number of rows deleted. Running this twice in a row with no
/// new expirations deletes nothing on the second pass.
pub async fn delete_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM reports WHERE expire_time < now()")
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
