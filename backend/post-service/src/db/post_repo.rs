use crate::models::{Post, PostWithVisibility};
use sqlx::PgPool;
use uuid::Uuid;

/// Visibility annotation: true iff an unexpired report references the post.
/// Strict comparison: a report expiring exactly "now" no longer counts.
const IS_PUBLIC_EXPR: &str =
    "EXISTS (SELECT 1 FROM reports r WHERE r.post_id = p.id AND r.expire_time > now())";

/// Create a new post and return it annotated
///
/// Visibility is computed uniformly even here: a brand-new post is private
/// because no report can reference it yet, not because of a special case.
pub async fn create_post(
    pool: &PgPool,
    author_id: Uuid,
    title: &str,
    text: &str,
) -> Result<PostWithVisibility, sqlx::Error> {
    let post = sqlx::query_as::<_, PostWithVisibility>(
        r#"
        WITH inserted AS (
            INSERT INTO posts (author_id, title, text)
            VALUES ($1, $2, $3)
            RETURNING id, author_id, title, text, created_at
        )
        SELECT p.id, p.author_id, p.title, p.text, p.created_at,
               EXISTS (SELECT 1 FROM reports r
                       WHERE r.post_id = p.id AND r.expire_time > now()) AS is_public
        FROM inserted p
        "#,
    )
    .bind(author_id)
    .bind(title)
    .bind(text)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Find a post by ID with its visibility annotation
pub async fn find_post_by_id(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Option<PostWithVisibility>, sqlx::Error> {
    let post = sqlx::query_as::<_, PostWithVisibility>(&format!(
        r#"
        SELECT p.id, p.author_id, p.title, p.text, p.created_at,
               {IS_PUBLIC_EXPR} AS is_public
        FROM posts p
        WHERE p.id = $1
        "#,
    ))
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Find a post without annotation (ownership checks, report validation)
pub async fn find_post_basic(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, author_id, title, text, created_at
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// All posts by an author, newest first, visibility annotated
pub async fn find_posts_by_author(
    pool: &PgPool,
    author_id: Uuid,
) -> Result<Vec<PostWithVisibility>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostWithVisibility>(&format!(
        r#"
        SELECT p.id, p.author_id, p.title, p.text, p.created_at,
               {IS_PUBLIC_EXPR} AS is_public
        FROM posts p
        WHERE p.author_id = $1
        ORDER BY p.created_at DESC
        "#,
    ))
    .bind(author_id)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Partially update a post and return it annotated
///
/// Absent fields keep their current value. Returns None when the row does
/// not exist.
pub async fn update_post(
    pool: &PgPool,
    post_id: Uuid,
    title: Option<&str>,
    text: Option<&str>,
) -> Result<Option<PostWithVisibility>, sqlx::Error> {
    let post = sqlx::query_as::<_, PostWithVisibility>(
        r#"
        WITH updated AS (
            UPDATE posts
            SET title = COALESCE($2, title),
                text = COALESCE($3, text)
            WHERE id = $1
            RETURNING id, author_id, title, text, created_at
        )
        SELECT p.id, p.author_id, p.title, p.text, p.created_at,
               EXISTS (SELECT 1 FROM reports r
                       WHERE r.post_id = p.id AND r.expire_time > now()) AS is_public
        FROM updated p
        "#,
    )
    .bind(post_id)
    .bind(title)
    .bind(text)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Delete a post. Report rows cascade. Returns affected rows.
pub async fn delete_post(pool: &PgPool, post_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_expr_is_strict() {
        // The annotation must treat expire_time == now() as expired
        assert!(IS_PUBLIC_EXPR.contains("expire_time > now()"));
        assert!(!IS_PUBLIC_EXPR.contains(">="));
    }
}
