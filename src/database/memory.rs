//! In-memory store - used as the fallback when no database is configured,
//! and as the storage double in tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::database::models::post::{NewPost, PostChanges};
use crate::database::models::{Category, Comment, Post, Tag, User};
use crate::database::store::{BlogStore, StoreError};
use crate::tags::slugify;

#[derive(Default)]
struct Inner {
    posts: BTreeMap<i64, Post>,
    categories: BTreeMap<i64, Category>,
    tags: BTreeMap<i64, Tag>,
    comments: BTreeMap<i64, Comment>,
    users: BTreeMap<i64, User>,
    /// (post_id, tag_id) associations in insertion order
    post_tags: Vec<(i64, i64)>,
    next_post_id: i64,
    next_category_id: i64,
    next_tag_id: i64,
    next_comment_id: i64,
    next_user_id: i64,
}

impl Inner {
    fn post_matches(&self, post: &Post, needle: &str) -> bool {
        if post.title.to_lowercase().contains(needle) {
            return true;
        }
        self.post_tags
            .iter()
            .filter(|(pid, _)| *pid == post.id)
            .filter_map(|(_, tid)| self.tags.get(tid))
            .any(|tag| tag.name.to_lowercase().contains(needle))
    }
}

/// Keeps everything behind one async RwLock; a single write lock makes the
/// clear-then-set tag replacement atomic. Data is lost on process restart.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlogStore for MemoryStore {
    async fn posts_page(&self, offset: i64, limit: i64) -> Result<Vec<Post>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .posts
            .values()
            .rev()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn count_posts(&self) -> Result<i64, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.posts.len() as i64)
    }

    async fn post_by_id(&self, id: i64) -> Result<Option<Post>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.posts.get(&id).cloned())
    }

    async fn create_post(&self, new: NewPost) -> Result<Post, StoreError> {
        let mut inner = self.inner.write().await;
        inner.next_post_id += 1;
        let post = Post {
            id: inner.next_post_id,
            title: new.title,
            hook_text: new.hook_text,
            content: new.content,
            head_image: new.head_image,
            file_upload: new.file_upload,
            created_at: Utc::now(),
            author_id: new.author_id,
            category_id: new.category_id,
        };
        inner.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update_post(&self, id: i64, changes: PostChanges) -> Result<Post, StoreError> {
        let mut inner = self.inner.write().await;
        let post = inner
            .posts
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("post {}", id)))?;
        post.title = changes.title;
        post.hook_text = changes.hook_text;
        post.content = changes.content;
        post.head_image = changes.head_image;
        post.file_upload = changes.file_upload;
        post.category_id = changes.category_id;
        Ok(post.clone())
    }

    async fn posts_in_category(&self, category_id: Option<i64>) -> Result<Vec<Post>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .posts
            .values()
            .rev()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn count_uncategorized(&self) -> Result<i64, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .posts
            .values()
            .filter(|p| p.category_id.is_none())
            .count() as i64)
    }

    async fn posts_with_tag(&self, tag_id: i64) -> Result<Vec<Post>, StoreError> {
        let inner = self.inner.read().await;
        let mut posts: Vec<Post> = inner
            .post_tags
            .iter()
            .filter(|(_, tid)| *tid == tag_id)
            .filter_map(|(pid, _)| inner.posts.get(pid))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(posts)
    }

    async fn search_posts(&self, query: &str) -> Result<Vec<Post>, StoreError> {
        let needle = query.to_lowercase();
        let inner = self.inner.read().await;
        // Iterating posts (not associations) keeps each match unique even
        // when several tags on the same post contain the needle
        Ok(inner
            .posts
            .values()
            .rev()
            .filter(|p| inner.post_matches(p, &needle))
            .cloned()
            .collect())
    }

    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.categories.values().cloned().collect())
    }

    async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .categories
            .values()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn create_category(&self, name: &str, slug: &str) -> Result<Category, StoreError> {
        let mut inner = self.inner.write().await;
        inner.next_category_id += 1;
        let category = Category {
            id: inner.next_category_id,
            name: name.to_string(),
            slug: slug.to_string(),
        };
        inner.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn tag_by_slug(&self, slug: &str) -> Result<Option<Tag>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.tags.values().find(|t| t.slug == slug).cloned())
    }

    async fn tags_for_post(&self, post_id: i64) -> Result<Vec<Tag>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .post_tags
            .iter()
            .filter(|(pid, _)| *pid == post_id)
            .filter_map(|(_, tid)| inner.tags.get(tid))
            .cloned()
            .collect())
    }

    async fn replace_post_tags(
        &self,
        post_id: i64,
        names: &[String],
    ) -> Result<Vec<Tag>, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.posts.contains_key(&post_id) {
            return Err(StoreError::NotFound(format!("post {}", post_id)));
        }

        // Full replace: prior associations go away before the new set lands
        inner.post_tags.retain(|(pid, _)| *pid != post_id);

        let mut tags = Vec::with_capacity(names.len());
        for name in names {
            let tag = match inner.tags.values().find(|t| &t.name == name).cloned() {
                Some(tag) => tag,
                None => {
                    inner.next_tag_id += 1;
                    let tag = Tag {
                        id: inner.next_tag_id,
                        name: name.clone(),
                        slug: slugify(name),
                    };
                    inner.tags.insert(tag.id, tag.clone());
                    tag
                }
            };
            inner.post_tags.push((post_id, tag.id));
            tags.push(tag);
        }
        Ok(tags)
    }

    async fn comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn comment_by_id(&self, id: i64) -> Result<Option<Comment>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.comments.get(&id).cloned())
    }

    async fn create_comment(
        &self,
        post_id: i64,
        author_id: i64,
        content: &str,
    ) -> Result<Comment, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.posts.contains_key(&post_id) {
            return Err(StoreError::NotFound(format!("post {}", post_id)));
        }
        inner.next_comment_id += 1;
        let comment = Comment {
            id: inner.next_comment_id,
            content: content.to_string(),
            created_at: Utc::now(),
            author_id,
            post_id,
        };
        inner.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update_comment(&self, id: i64, content: &str) -> Result<Comment, StoreError> {
        let mut inner = self.inner.write().await;
        let comment = inner
            .comments
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("comment {}", id)))?;
        comment.content = content.to_string();
        Ok(comment.clone())
    }

    async fn user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn create_user(
        &self,
        username: &str,
        is_staff: bool,
        is_superuser: bool,
    ) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        inner.next_user_id += 1;
        let user = User {
            id: inner.next_user_id,
            username: username.to_string(),
            is_staff,
            is_superuser,
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn health(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
