/// Post service - cached resource controller for posts
///
/// Reads go through the cache; mutations invalidate the cache entry
/// *before* touching the store. Posts are private to their author: a
/// non-owner read is indistinguishable from absence.
use crate::db::{post_repo, tag_repo};
use crate::error::{AppError, Result};
use crate::models::{PostWithVisibility, Tag};
use quill_cache::posts::{CachedPost, CachedTag, PostCache};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

pub struct PostService {
    pool: PgPool,
    cache: PostCache,
}

/// Partial update payload; absent fields keep their current value
#[derive(Debug, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub text: Option<String>,
    pub tags: Option<Vec<Uuid>>,
}

impl PostService {
    pub fn new(pool: PgPool, cache: PostCache) -> Self {
        Self { pool, cache }
    }

    /// All posts of the caller, newest first, visibility annotated
    pub async fn list_posts(&self, author_id: Uuid) -> Result<Vec<CachedPost>> {
        let posts = post_repo::find_posts_by_author(&self.pool, author_id).await?;

        let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let mut tags_by_post = group_tags(&self.pool, &post_ids).await?;

        Ok(posts
            .into_iter()
            .map(|post| {
                let tags = tags_by_post.remove(&post.id).unwrap_or_default();
                build_snapshot(post, tags)
            })
            .collect())
    }

    /// Get a post by ID, read-through cached
    pub async fn get_post(&self, post_id: Uuid, principal: Uuid) -> Result<CachedPost> {
        match self.cache.get(post_id).await {
            Ok(Some(snapshot)) => {
                // The ownership rule applies to hits too: a cached entry
                // must never widen the caller's visible set.
                if snapshot.author_id != principal {
                    return Err(AppError::NotFound("post not found".to_string()));
                }
                return Ok(snapshot);
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(%post_id, "post cache read failed, falling back to store: {}", err);
            }
        }

        let post = post_repo::find_post_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

        if post.author_id != principal {
            return Err(AppError::NotFound("post not found".to_string()));
        }

        let tags = tag_repo::find_tags_for_post(&self.pool, post_id).await?;
        let snapshot = build_snapshot(post, tags);

        if let Err(err) = self.cache.set(&snapshot).await {
            tracing::debug!(post_id = %snapshot.id, "post cache set failed: {}", err);
        }

        Ok(snapshot)
    }

    /// Create a post for the caller
    pub async fn create_post(
        &self,
        principal: Uuid,
        title: &str,
        text: &str,
        tag_ids: &[Uuid],
    ) -> Result<CachedPost> {
        let mut tags = self.ensure_tags_exist(tag_ids).await?;
        tags.sort_by(|a, b| a.name.cmp(&b.name));

        let post = post_repo::create_post(&self.pool, principal, title, text).await?;

        if !tag_ids.is_empty() {
            tag_repo::replace_post_tags(&self.pool, post.id, tag_ids).await?;
        }

        Ok(build_snapshot(post, tags))
    }

    /// Partially update a post owned by the caller
    pub async fn update_post(
        &self,
        post_id: Uuid,
        principal: Uuid,
        patch: PostPatch,
    ) -> Result<CachedPost> {
        let existing = post_repo::find_post_basic(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

        if existing.author_id != principal {
            return Err(AppError::NotFound("post not found".to_string()));
        }

        if let Some(tag_ids) = patch.tags.as_deref() {
            self.ensure_tags_exist(tag_ids).await?;
        }

        // Invalidate before the store write: a reader racing this update
        // sees a miss and re-fetches, instead of repopulating the cache
        // with the pre-write snapshot after the entry was deleted.
        self.cache.invalidate(post_id).await?;

        let updated = post_repo::update_post(
            &self.pool,
            post_id,
            patch.title.as_deref(),
            patch.text.as_deref(),
        )
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

        if let Some(tag_ids) = patch.tags.as_deref() {
            tag_repo::replace_post_tags(&self.pool, post_id, tag_ids).await?;
        }

        let tags = tag_repo::find_tags_for_post(&self.pool, post_id).await?;

        Ok(build_snapshot(updated, tags))
    }

    /// Delete a post owned by the caller
    pub async fn delete_post(&self, post_id: Uuid, principal: Uuid) -> Result<()> {
        let existing = post_repo::find_post_basic(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

        if existing.author_id != principal {
            return Err(AppError::NotFound("post not found".to_string()));
        }

        // Same ordering as update: invalidate first, then mutate the store
        self.cache.invalidate(post_id).await?;

        let deleted = post_repo::delete_post(&self.pool, post_id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("post not found".to_string()));
        }

        Ok(())
    }

    /// Validate that every requested tag id exists
    async fn ensure_tags_exist(&self, tag_ids: &[Uuid]) -> Result<Vec<Tag>> {
        let mut unique = tag_ids.to_vec();
        unique.sort();
        unique.dedup();

        let tags = tag_repo::find_tags_by_ids(&self.pool, &unique).await?;
        if tags.len() != unique.len() {
            return Err(AppError::Validation(
                "request references an unknown tag".to_string(),
            ));
        }

        Ok(tags)
    }
}

/// Batch-fetch tags for a set of posts and group them by post id
async fn group_tags(pool: &PgPool, post_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Tag>>> {
    let rows = tag_repo::find_tags_for_posts(pool, post_ids).await?;

    let mut grouped: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    for row in rows {
        grouped.entry(row.post_id).or_default().push(Tag {
            id: row.id,
            name: row.name,
            description: row.description,
        });
    }

    Ok(grouped)
}

fn build_snapshot(post: PostWithVisibility, tags: Vec<Tag>) -> CachedPost {
    CachedPost {
        id: post.id,
        author_id: post.author_id,
        title: post.title,
        text: post.text,
        tags: tags.into_iter().map(to_cached_tag).collect(),
        is_public: post.is_public,
        created_at: post.created_at,
    }
}

pub(crate) fn to_cached_tag(tag: Tag) -> CachedTag {
    CachedTag {
        id: tag.id,
        name: tag.name,
        description: tag.description,
    }
}
