use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;

use crate::auth::guard::{can_create_comment, can_update_comment, Gate};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::context::{CommentFormContext, CommentFormDescriptor};
use crate::middleware::response::ApiResponse;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub content: String,
}

/// GET /blog/:id/new_comment/ - comments are write-only; a browser landing
/// here is sent back to the post without creating anything
pub async fn new_comment_redirect(Path(id): Path<i64>) -> Redirect {
    Redirect::to(&format!("/blog/{}/", id))
}

/// POST /blog/:id/new_comment/ - create a comment as the requester, then
/// land on it inside the detail page
pub async fn new_comment(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Path(id): Path<i64>,
    Form(form): Form<CommentForm>,
) -> Result<Response, ApiError> {
    let user = match (can_create_comment(user.as_deref()), user) {
        (Gate::Allowed, Some(Extension(user))) => user,
        _ => return Err(ApiError::forbidden("Login required to comment")),
    };

    let store = state.store.as_ref();
    let post = store
        .post_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("post {}", id)))?;

    let comment = store
        .create_comment(post.id, user.user_id, &form.content)
        .await?;

    tracing::info!("Comment {} created on post {}", comment.id, post.id);
    Ok(Redirect::to(&comment.absolute_url()).into_response())
}

/// GET /blog/update_comment/:id/ - pre-filled comment form; author only
pub async fn update_comment_form(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let store = state.store.as_ref();
    let comment = store
        .comment_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("comment {}", id)))?;

    if can_update_comment(user.as_deref(), &comment) != Gate::Allowed {
        return Err(ApiError::forbidden("Only the author may edit this comment"));
    }

    let context = CommentFormContext {
        post_id: comment.post_id,
        form: CommentFormDescriptor {
            content: comment.content,
        },
    };
    Ok(ApiResponse::success(context).into_response())
}

/// POST /blog/update_comment/:id/ - persist new content; author only
pub async fn update_comment(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Path(id): Path<i64>,
    Form(form): Form<CommentForm>,
) -> Result<Response, ApiError> {
    let store = state.store.as_ref();
    let comment = store
        .comment_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("comment {}", id)))?;

    if can_update_comment(user.as_deref(), &comment) != Gate::Allowed {
        return Err(ApiError::forbidden("Only the author may edit this comment"));
    }

    let updated = store.update_comment(comment.id, &form.content).await?;
    Ok(Redirect::to(&updated.absolute_url()).into_response())
}
