use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::handlers::context::{post_summaries, sidebar, PostListContext};
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::queries;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Taken as a raw string so junk values clamp instead of rejecting
    pub page: Option<String>,
}

/// GET /blog/ - paginated post list, newest first
pub async fn post_list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<PostListContext> {
    let store = state.store.as_ref();
    let requested = query.page.as_deref().and_then(|p| p.parse::<i64>().ok());
    let page = queries::page_of_posts(store, requested).await?;
    let (sidebar, categories) = sidebar(store).await?;

    let posts = post_summaries(store, &categories, &page.posts).await?;
    let mut context = PostListContext::new(posts, sidebar);
    context.page = Some(page.page);
    context.num_pages = Some(page.num_pages);
    context.total = Some(page.total);
    Ok(ApiResponse::success(context))
}

/// GET /blog/category/:slug/ - posts in one category; the `no_category`
/// slug selects the uncategorized bucket
pub async fn category_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<PostListContext> {
    let store = state.store.as_ref();
    let listing = queries::posts_for_category(store, &slug).await?;
    let (sidebar, categories) = sidebar(store).await?;

    let posts = post_summaries(store, &categories, &listing.posts).await?;
    let mut context = PostListContext::new(posts, sidebar);
    context.category = Some(listing.label);
    Ok(ApiResponse::success(context))
}

/// GET /blog/tag/:slug/ - posts carrying one tag
pub async fn tag_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<PostListContext> {
    let store = state.store.as_ref();
    let listing = queries::posts_for_tag(store, &slug).await?;
    let (sidebar, categories) = sidebar(store).await?;

    let posts = post_summaries(store, &categories, &listing.posts).await?;
    let mut context = PostListContext::new(posts, sidebar);
    context.tag = Some(crate::handlers::context::TagRef {
        name: listing.tag.name,
        slug: listing.tag.slug,
    });
    Ok(ApiResponse::success(context))
}

/// GET /blog/search/:query/ - unpaginated match set with count
pub async fn search_page(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> ApiResult<PostListContext> {
    let store = state.store.as_ref();
    let results = queries::search(store, &query).await?;
    let (sidebar, categories) = sidebar(store).await?;

    let posts = post_summaries(store, &categories, &results.posts).await?;
    let mut context = PostListContext::new(posts, sidebar);
    context.search = Some(query);
    context.search_count = Some(results.count);
    Ok(ApiResponse::success(context))
}
