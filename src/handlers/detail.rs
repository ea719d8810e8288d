use axum::extract::{Path, State};

use crate::error::ApiError;
use crate::handlers::context::{
    comment_views, post_detail, sidebar, CommentFormDescriptor, PostDetailContext,
};
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::routes::AppState;

/// GET /blog/:id/ - one post with its comments and an empty comment form
pub async fn post_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<PostDetailContext> {
    let store = state.store.as_ref();
    let post = store
        .post_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("post {}", id)))?;

    let (sidebar, categories) = sidebar(store).await?;
    let detail = post_detail(store, &categories, &post).await?;
    let comments = store.comments_for_post(post.id).await?;
    let comments = comment_views(store, &comments).await?;

    Ok(ApiResponse::success(PostDetailContext {
        post: detail,
        comments,
        comment_form: CommentFormDescriptor::default(),
        sidebar,
    }))
}
