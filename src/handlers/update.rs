use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};

use crate::auth::guard::{can_update_post, Gate};
use crate::auth::AuthUser;
use crate::database::models::post::PostChanges;
use crate::error::ApiError;
use crate::handlers::context::{sidebar, PostFormContext, PostFormValues};
use crate::handlers::create::PostForm;
use crate::middleware::response::ApiResponse;
use crate::routes::AppState;
use crate::tags::parse_tag_names;

/// GET /blog/update_post/:id/ - form pre-filled with the post's current
/// fields; author only
pub async fn update_post_form(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let store = state.store.as_ref();
    let post = store
        .post_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("post {}", id)))?;

    if can_update_post(user.as_deref(), &post) != Gate::Allowed {
        return Err(ApiError::forbidden("Only the author may edit this post"));
    }

    let tags = store.tags_for_post(post.id).await?;
    let (sidebar, _) = sidebar(store).await?;
    let context = PostFormContext {
        form: PostFormValues::from_post(&post, &tags),
        sidebar,
    };
    Ok(ApiResponse::success(context).into_response())
}

/// POST /blog/update_post/:id/ - persist field changes and fully replace
/// the tag set; author only, author field untouched
pub async fn update_post(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Path(id): Path<i64>,
    Form(form): Form<PostForm>,
) -> Result<Response, ApiError> {
    let store = state.store.as_ref();
    let post = store
        .post_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("post {}", id)))?;

    // The gate runs before any write
    if can_update_post(user.as_deref(), &post) != Gate::Allowed {
        return Err(ApiError::forbidden("Only the author may edit this post"));
    }

    let updated = store
        .update_post(
            post.id,
            PostChanges {
                title: form.title,
                hook_text: form.hook_text,
                content: form.content,
                head_image: form.head_image.filter(|v| !v.trim().is_empty()),
                file_upload: form.file_upload.filter(|v| !v.trim().is_empty()),
                category_id: form.category,
            },
        )
        .await?;

    // Clear-then-set: an omitted tag string clears the set
    let names = parse_tag_names(form.tags_str.as_deref().unwrap_or(""));
    store.replace_post_tags(updated.id, &names).await?;

    tracing::info!("Post {} updated", updated.id);
    Ok(Redirect::to(&updated.absolute_url()).into_response())
}
