use crate::models::{PostTag, Tag};
use sqlx::PgPool;
use uuid::Uuid;

/// Fetch tags by id (validating attachment requests)
pub async fn find_tags_by_ids(pool: &PgPool, tag_ids: &[Uuid]) -> Result<Vec<Tag>, sqlx::Error> {
    if tag_ids.is_empty() {
        return Ok(Vec::new());
    }

    let tags = sqlx::query_as::<_, Tag>(
        r#"
        SELECT id, name, description
        FROM tags
        WHERE id = ANY($1)
        "#,
    )
    .bind(tag_ids)
    .fetch_all(pool)
    .await?;

    Ok(tags)
}

/// Tags attached to a single post
pub async fn find_tags_for_post(pool: &PgPool, post_id: Uuid) -> Result<Vec<Tag>, sqlx::Error> {
    let tags = sqlx::query_as::<_, Tag>(
        r#"
        SELECT t.id, t.name, t.description
        FROM tags t
        INNER JOIN post_tags pt ON pt.tag_id = t.id
        WHERE pt.post_id = $1
        ORDER BY t.name ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(tags)
}

/// Tags for a batch of posts, carrying the owning post id for grouping
pub async fn find_tags_for_posts(
    pool: &PgPool,
    post_ids: &[Uuid],
) -> Result<Vec<PostTag>, sqlx::Error> {
    if post_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query_as::<_, PostTag>(
        r#"
        SELECT pt.post_id, t.id, t.name, t.description
        FROM tags t
        INNER JOIN post_tags pt ON pt.tag_id = t.id
        WHERE pt.post_id = ANY($1)
        ORDER BY t.name ASC
        "#,
    )
    .bind(post_ids)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Replace the tag set of a post
pub async fn replace_post_tags(
    pool: &PgPool,
    post_id: Uuid,
    tag_ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

    if !tag_ids.is_empty() {
        sqlx::query(
            r#"
            INSERT INTO post_tags (post_id, tag_id)
            SELECT $1, tag_id FROM UNNEST($2::uuid[]) AS t(tag_id)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(tag_ids)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(())
}
