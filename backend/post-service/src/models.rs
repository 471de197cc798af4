/// Data models for the post service
///
/// Row types returned by the repositories. Visibility (`is_public`) is a
/// derived property: it never lives in a column, only in query annotations
/// computed from live report rows.
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A user-authored text post
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A post annotated with its derived visibility flag
///
/// `is_public` is true iff an unexpired report referenced this post at the
/// instant the query ran.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostWithVisibility {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub is_public: bool,
}

/// A tag, many-to-many with posts
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

/// A tag row joined through `post_tags`, carrying the owning post id
#[derive(Debug, Clone, FromRow)]
pub struct PostTag {
    pub post_id: Uuid,
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

/// A time-bounded publication record for a post
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Report {
    pub id: Uuid,
    pub post_id: Uuid,
    pub expire_time: DateTime<Utc>,
}

/// A report joined with the post it exposes
#[derive(Debug, Clone, FromRow)]
pub struct ReportWithPost {
    pub id: Uuid,
    pub expire_time: DateTime<Utc>,
    pub post_id: Uuid,
    pub post_author_id: Uuid,
    pub post_title: String,
    pub post_text: String,
    pub post_created_at: DateTime<Utc>,
}
