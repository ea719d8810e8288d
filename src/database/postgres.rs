//! Postgres implementation of the storage collaborator.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::config;
use crate::database::models::post::{NewPost, PostChanges};
use crate::database::models::{Category, Comment, Post, Tag, User};
use crate::database::store::{BlogStore, StoreError};
use crate::tags::slugify;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Build a pool from DATABASE_URL using the configured limits
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let db_config = &config::config().database;
        let pool = PgPoolOptions::new()
            .max_connections(db_config.max_connections)
            .acquire_timeout(Duration::from_secs(db_config.connection_timeout))
            .connect(database_url)
            .await?;

        info!("Created database pool");
        Ok(Self { pool })
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the idempotent schema (CREATE TABLE IF NOT EXISTS)
    pub async fn migrate(&self) -> Result<(), StoreError> {
        for statement in include_str!("schema.sql").split(';') {
            let statement = statement.trim();
            if statement.is_empty() {
                continue;
            }
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database schema is up to date");
        Ok(())
    }
}

/// Escape LIKE wildcards so user input matches literally
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl BlogStore for PgStore {
    async fn posts_page(&self, offset: i64, limit: i64) -> Result<Vec<Post>, StoreError> {
        let posts = sqlx::query_as::<_, Post>(
            "SELECT * FROM posts ORDER BY id DESC OFFSET $1 LIMIT $2",
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    async fn count_posts(&self) -> Result<i64, StoreError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    async fn post_by_id(&self, id: i64) -> Result<Option<Post>, StoreError> {
        let post = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn create_post(&self, new: NewPost) -> Result<Post, StoreError> {
        let post = sqlx::query_as::<_, Post>(
            "INSERT INTO posts (title, hook_text, content, head_image, file_upload, author_id, category_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(&new.title)
        .bind(&new.hook_text)
        .bind(&new.content)
        .bind(&new.head_image)
        .bind(&new.file_upload)
        .bind(new.author_id)
        .bind(new.category_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(post)
    }

    async fn update_post(&self, id: i64, changes: PostChanges) -> Result<Post, StoreError> {
        // author_id is never part of the SET list
        let post = sqlx::query_as::<_, Post>(
            "UPDATE posts SET title = $2, hook_text = $3, content = $4, head_image = $5, \
             file_upload = $6, category_id = $7 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.hook_text)
        .bind(&changes.content)
        .bind(&changes.head_image)
        .bind(&changes.file_upload)
        .bind(changes.category_id)
        .fetch_optional(&self.pool)
        .await?;

        post.ok_or_else(|| StoreError::NotFound(format!("post {}", id)))
    }

    async fn posts_in_category(&self, category_id: Option<i64>) -> Result<Vec<Post>, StoreError> {
        let posts = match category_id {
            Some(category_id) => {
                sqlx::query_as::<_, Post>(
                    "SELECT * FROM posts WHERE category_id = $1 ORDER BY id DESC",
                )
                .bind(category_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Post>(
                    "SELECT * FROM posts WHERE category_id IS NULL ORDER BY id DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(posts)
    }

    async fn count_uncategorized(&self) -> Result<i64, StoreError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM posts WHERE category_id IS NULL")
                .fetch_one(&self.pool)
                .await?;
        Ok(count.0)
    }

    async fn posts_with_tag(&self, tag_id: i64) -> Result<Vec<Post>, StoreError> {
        let posts = sqlx::query_as::<_, Post>(
            "SELECT p.* FROM posts p \
             JOIN post_tags pt ON pt.post_id = p.id \
             WHERE pt.tag_id = $1 ORDER BY p.id DESC",
        )
        .bind(tag_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    async fn search_posts(&self, query: &str) -> Result<Vec<Post>, StoreError> {
        // DISTINCT keeps a post matching via several tags down to one row
        let posts = sqlx::query_as::<_, Post>(
            "SELECT DISTINCT p.* FROM posts p \
             LEFT JOIN post_tags pt ON pt.post_id = p.id \
             LEFT JOIN tags t ON t.id = pt.tag_id \
             WHERE p.title ILIKE $1 OR t.name ILIKE $1 \
             ORDER BY p.id DESC",
        )
        .bind(like_pattern(query))
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(categories)
    }

    async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>, StoreError> {
        let category =
            sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE slug = $1")
                .bind(slug)
                .fetch_optional(&self.pool)
                .await?;
        Ok(category)
    }

    async fn create_category(&self, name: &str, slug: &str) -> Result<Category, StoreError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, slug) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(slug)
        .fetch_one(&self.pool)
        .await?;
        Ok(category)
    }

    async fn tag_by_slug(&self, slug: &str) -> Result<Option<Tag>, StoreError> {
        let tag = sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tag)
    }

    async fn tags_for_post(&self, post_id: i64) -> Result<Vec<Tag>, StoreError> {
        let tags = sqlx::query_as::<_, Tag>(
            "SELECT t.* FROM tags t \
             JOIN post_tags pt ON pt.tag_id = t.id \
             WHERE pt.post_id = $1 ORDER BY t.id",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tags)
    }

    async fn replace_post_tags(
        &self,
        post_id: i64,
        names: &[String],
    ) -> Result<Vec<Tag>, StoreError> {
        // One transaction: a failure mid-sequence must not leave a partial
        // tag set behind
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        let mut tags = Vec::with_capacity(names.len());
        for name in names {
            let existing = sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE name = $1")
                .bind(name)
                .fetch_optional(&mut *tx)
                .await?;

            let tag = match existing {
                Some(tag) => tag,
                None => {
                    sqlx::query_as::<_, Tag>(
                        "INSERT INTO tags (name, slug) VALUES ($1, $2) RETURNING *",
                    )
                    .bind(name)
                    .bind(slugify(name))
                    .fetch_one(&mut *tx)
                    .await?
                }
            };

            sqlx::query(
                "INSERT INTO post_tags (post_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(post_id)
            .bind(tag.id)
            .execute(&mut *tx)
            .await?;
            tags.push(tag);
        }

        tx.commit().await?;
        Ok(tags)
    }

    async fn comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>, StoreError> {
        let comments = sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE post_id = $1 ORDER BY id",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    async fn comment_by_id(&self, id: i64) -> Result<Option<Comment>, StoreError> {
        let comment = sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(comment)
    }

    async fn create_comment(
        &self,
        post_id: i64,
        author_id: i64,
        content: &str,
    ) -> Result<Comment, StoreError> {
        let comment = sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (content, author_id, post_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(content)
        .bind(author_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(comment)
    }

    async fn update_comment(&self, id: i64, content: &str) -> Result<Comment, StoreError> {
        let comment = sqlx::query_as::<_, Comment>(
            "UPDATE comments SET content = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await?;

        comment.ok_or_else(|| StoreError::NotFound(format!("comment {}", id)))
    }

    async fn user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_user(
        &self,
        username: &str,
        is_staff: bool,
        is_superuser: bool,
    ) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, is_staff, is_superuser) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(username)
        .bind(is_staff)
        .bind(is_superuser)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn health(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }
}
