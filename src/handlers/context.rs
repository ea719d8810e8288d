//! Render contexts. Handlers assemble these; turning them into markup is
//! the job of an external rendering collaborator, so everything here is
//! plain serializable data.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::models::{Category, Comment, Post, Tag};
use crate::database::store::{BlogStore, StoreError};

/// Indicator text surfaced when a listing has nothing to show
pub const EMPTY_MESSAGE: &str = "No posts yet.";

#[derive(Debug, Clone, Serialize)]
pub struct CategoryRef {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagRef {
    pub name: String,
    pub slug: String,
}

/// Sidebar metadata shown on every blog page
#[derive(Debug, Serialize)]
pub struct Sidebar {
    pub categories: Vec<CategoryRef>,
    pub no_category_post_count: i64,
}

/// Pure sidebar computation over the storage handle
pub async fn sidebar(store: &dyn BlogStore) -> Result<(Sidebar, Vec<Category>), StoreError> {
    let categories = store.categories().await?;
    let no_category_post_count = store.count_uncategorized().await?;
    let refs = categories
        .iter()
        .map(|c| CategoryRef {
            name: c.name.clone(),
            slug: c.slug.clone(),
        })
        .collect();
    Ok((
        Sidebar {
            categories: refs,
            no_category_post_count,
        },
        categories,
    ))
}

/// Listing row for a post
#[derive(Debug, Serialize)]
pub struct PostSummary {
    pub id: i64,
    pub title: String,
    pub hook_text: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub tags: Vec<TagRef>,
}

/// Build a listing row. Author names render uppercased, matching the
/// original templates; `categories` is the already-fetched sidebar list.
pub async fn post_summary(
    store: &dyn BlogStore,
    categories: &[Category],
    post: &Post,
) -> Result<PostSummary, StoreError> {
    let author_name = author_name(store, post.author_id).await?;
    let category = post
        .category_id
        .and_then(|id| categories.iter().find(|c| c.id == id))
        .map(|c| c.name.clone());
    let tags = store
        .tags_for_post(post.id)
        .await?
        .iter()
        .map(tag_ref)
        .collect();

    Ok(PostSummary {
        id: post.id,
        title: post.title.clone(),
        hook_text: post.hook_text.clone(),
        author_name,
        created_at: post.created_at,
        url: post.absolute_url(),
        category,
        tags,
    })
}

pub async fn post_summaries(
    store: &dyn BlogStore,
    categories: &[Category],
    posts: &[Post],
) -> Result<Vec<PostSummary>, StoreError> {
    let mut summaries = Vec::with_capacity(posts.len());
    for post in posts {
        summaries.push(post_summary(store, categories, post).await?);
    }
    Ok(summaries)
}

async fn author_name(store: &dyn BlogStore, author_id: i64) -> Result<String, StoreError> {
    Ok(store
        .user_by_id(author_id)
        .await?
        .map(|u| u.username.to_uppercase())
        .unwrap_or_else(|| "UNKNOWN".to_string()))
}

fn tag_ref(tag: &Tag) -> TagRef {
    TagRef {
        name: tag.name.clone(),
        slug: tag.slug.clone(),
    }
}

/// Context for the list page and its filtered variants; the optional
/// fields only appear on the route that sets them.
#[derive(Debug, Serialize)]
pub struct PostListContext {
    pub posts: Vec<PostSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_pages: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<TagRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
    #[serde(flatten)]
    pub sidebar: Sidebar,
}

impl PostListContext {
    pub fn new(posts: Vec<PostSummary>, sidebar: Sidebar) -> Self {
        let empty_message = if posts.is_empty() {
            Some(EMPTY_MESSAGE)
        } else {
            None
        };
        Self {
            posts,
            page: None,
            num_pages: None,
            total: None,
            category: None,
            tag: None,
            search: None,
            search_count: None,
            empty_message,
            sidebar,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentView {
    pub id: i64,
    pub content: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    pub url: String,
}

pub async fn comment_views(
    store: &dyn BlogStore,
    comments: &[Comment],
) -> Result<Vec<CommentView>, StoreError> {
    let mut views = Vec::with_capacity(comments.len());
    for comment in comments {
        views.push(CommentView {
            id: comment.id,
            content: comment.content.clone(),
            author_name: author_name(store, comment.author_id).await?,
            created_at: comment.created_at,
            url: comment.absolute_url(),
        });
    }
    Ok(views)
}

/// Empty comment-submission form descriptor shown on the detail page
#[derive(Debug, Serialize)]
pub struct CommentFormDescriptor {
    pub content: String,
}

impl Default for CommentFormDescriptor {
    fn default() -> Self {
        Self {
            content: String::new(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostDetailContext {
    pub post: PostDetail,
    pub comments: Vec<CommentView>,
    pub comment_form: CommentFormDescriptor,
    #[serde(flatten)]
    pub sidebar: Sidebar,
}

#[derive(Debug, Serialize)]
pub struct PostDetail {
    pub id: i64,
    pub title: String,
    pub hook_text: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_upload: Option<String>,
    pub created_at: DateTime<Utc>,
    pub url: String,
    pub author_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub tags: Vec<TagRef>,
}

pub async fn post_detail(
    store: &dyn BlogStore,
    categories: &[Category],
    post: &Post,
) -> Result<PostDetail, StoreError> {
    let summary = post_summary(store, categories, post).await?;
    Ok(PostDetail {
        id: post.id,
        title: post.title.clone(),
        hook_text: post.hook_text.clone(),
        content: post.content.clone(),
        head_image: post.head_image.clone(),
        file_upload: post.file_upload.clone(),
        created_at: post.created_at,
        url: post.absolute_url(),
        author_name: summary.author_name,
        category: summary.category,
        tags: summary.tags,
    })
}

/// Pre-filled (or empty) post form, for the create and update GET routes
#[derive(Debug, Serialize)]
pub struct PostFormContext {
    pub form: PostFormValues,
    #[serde(flatten)]
    pub sidebar: Sidebar,
}

#[derive(Debug, Default, Serialize)]
pub struct PostFormValues {
    pub title: String,
    pub hook_text: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_upload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    pub tags_str: String,
}

impl PostFormValues {
    /// Pre-fill from an existing post; tags render joined with "; "
    pub fn from_post(post: &Post, tags: &[Tag]) -> Self {
        let tags_str = tags
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        Self {
            title: post.title.clone(),
            hook_text: post.hook_text.clone(),
            content: post.content.clone(),
            head_image: post.head_image.clone(),
            file_upload: post.file_upload.clone(),
            category_id: post.category_id,
            tags_str,
        }
    }
}

/// Pre-filled comment form, for the comment update GET route
#[derive(Debug, Serialize)]
pub struct CommentFormContext {
    pub post_id: i64,
    pub form: CommentFormDescriptor,
}
