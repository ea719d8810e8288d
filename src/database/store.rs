use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{Category, Comment, Post, Tag, User};
use crate::database::models::post::{NewPost, PostChanges};

/// Errors from the storage collaborator
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Relational storage collaborator for the blog.
///
/// Implementations: `PgStore` (sqlx/Postgres) for deployments and
/// `MemoryStore` as the no-database fallback and test double. List results
/// are always ordered by descending id (newest first), and
/// `replace_post_tags` must apply its clear-then-set sequence atomically.
#[async_trait]
pub trait BlogStore: Send + Sync {
    // Posts
    async fn posts_page(&self, offset: i64, limit: i64) -> Result<Vec<Post>, StoreError>;
    async fn count_posts(&self) -> Result<i64, StoreError>;
    async fn post_by_id(&self, id: i64) -> Result<Option<Post>, StoreError>;
    async fn create_post(&self, new: NewPost) -> Result<Post, StoreError>;
    /// Applies `changes` to an existing post; the author is never touched.
    async fn update_post(&self, id: i64, changes: PostChanges) -> Result<Post, StoreError>;
    /// `category_id` of None selects the uncategorized bucket.
    async fn posts_in_category(&self, category_id: Option<i64>) -> Result<Vec<Post>, StoreError>;
    async fn count_uncategorized(&self) -> Result<i64, StoreError>;
    async fn posts_with_tag(&self, tag_id: i64) -> Result<Vec<Post>, StoreError>;
    /// Case-insensitive substring match on title or any tag name,
    /// de-duplicated.
    async fn search_posts(&self, query: &str) -> Result<Vec<Post>, StoreError>;

    // Categories (read-mostly; creation exists for seeding)
    async fn categories(&self) -> Result<Vec<Category>, StoreError>;
    async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>, StoreError>;
    async fn create_category(&self, name: &str, slug: &str) -> Result<Category, StoreError>;

    // Tags
    async fn tag_by_slug(&self, slug: &str) -> Result<Option<Tag>, StoreError>;
    async fn tags_for_post(&self, post_id: i64) -> Result<Vec<Tag>, StoreError>;
    /// Clears every existing tag association on the post, then associates
    /// the named tags, get-or-creating each by exact name. Atomic: a
    /// failure mid-sequence leaves the prior tag set in place.
    async fn replace_post_tags(
        &self,
        post_id: i64,
        names: &[String],
    ) -> Result<Vec<Tag>, StoreError>;

    // Comments
    async fn comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>, StoreError>;
    async fn comment_by_id(&self, id: i64) -> Result<Option<Comment>, StoreError>;
    async fn create_comment(
        &self,
        post_id: i64,
        author_id: i64,
        content: &str,
    ) -> Result<Comment, StoreError>;
    async fn update_comment(&self, id: i64, content: &str) -> Result<Comment, StoreError>;

    // Users (read-mostly; creation exists for seeding)
    async fn user_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;
    async fn create_user(
        &self,
        username: &str,
        is_staff: bool,
        is_superuser: bool,
    ) -> Result<User, StoreError>;

    /// Connectivity probe for the health endpoint
    async fn health(&self) -> Result<(), StoreError>;
}
