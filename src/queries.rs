//! Read-side query composition: pagination, category/tag filtering, and
//! search, built on top of the storage collaborator.

use crate::database::models::{Post, Tag};
use crate::database::store::{BlogStore, StoreError};

/// Fixed page size for the general post listing
pub const PAGE_SIZE: i64 = 5;

/// Sentinel slug routing to the virtual bucket of posts with no category
pub const UNCATEGORIZED_SLUG: &str = "no_category";
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

#[derive(Debug)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub page: i64,
    pub num_pages: i64,
    pub total: i64,
}

/// One page of the newest-first post listing. The requested page number is
/// 1-based and clamps to the valid range, so junk input still renders a
/// page instead of erroring.
pub async fn page_of_posts(
    store: &dyn BlogStore,
    requested: Option<i64>,
) -> Result<PostPage, StoreError> {
    let total = store.count_posts().await?;
    let num_pages = ((total + PAGE_SIZE - 1) / PAGE_SIZE).max(1);
    let page = requested.unwrap_or(1).clamp(1, num_pages);
    let posts = store.posts_page((page - 1) * PAGE_SIZE, PAGE_SIZE).await?;

    Ok(PostPage {
        posts,
        page,
        num_pages,
        total,
    })
}

#[derive(Debug)]
pub struct CategoryListing {
    pub label: String,
    pub posts: Vec<Post>,
}

/// Posts in one category. The `no_category` sentinel selects the
/// uncategorized bucket under a fixed label; any other slug must resolve
/// to a real category.
pub async fn posts_for_category(
    store: &dyn BlogStore,
    slug: &str,
) -> Result<CategoryListing, StoreError> {
    if slug == UNCATEGORIZED_SLUG {
        let posts = store.posts_in_category(None).await?;
        return Ok(CategoryListing {
            label: UNCATEGORIZED_LABEL.to_string(),
            posts,
        });
    }

    let category = store
        .category_by_slug(slug)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("category '{}'", slug)))?;
    let posts = store.posts_in_category(Some(category.id)).await?;
    Ok(CategoryListing {
        label: category.name,
        posts,
    })
}

#[derive(Debug)]
pub struct TagListing {
    pub tag: Tag,
    pub posts: Vec<Post>,
}

pub async fn posts_for_tag(store: &dyn BlogStore, slug: &str) -> Result<TagListing, StoreError> {
    let tag = store
        .tag_by_slug(slug)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("tag '{}'", slug)))?;
    let posts = store.posts_with_tag(tag.id).await?;
    Ok(TagListing { tag, posts })
}

#[derive(Debug)]
pub struct SearchResults {
    pub posts: Vec<Post>,
    pub count: usize,
}

/// Full, unpaginated match set plus its count
pub async fn search(store: &dyn BlogStore, query: &str) -> Result<SearchResults, StoreError> {
    let posts = store.search_posts(query).await?;
    let count = posts.len();
    Ok(SearchResults { posts, count })
}
