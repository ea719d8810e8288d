use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;

use crate::auth::guard::{can_create_post, Gate};
use crate::auth::AuthUser;
use crate::database::models::post::NewPost;
use crate::error::ApiError;
use crate::handlers::context::{sidebar, PostFormContext, PostFormValues};
use crate::middleware::response::ApiResponse;
use crate::routes::AppState;
use crate::tags::parse_tag_names;

#[derive(Debug, Deserialize)]
pub struct PostForm {
    pub title: String,
    #[serde(default)]
    pub hook_text: String,
    pub content: String,
    #[serde(default)]
    pub head_image: Option<String>,
    #[serde(default)]
    pub file_upload: Option<String>,
    #[serde(default)]
    pub category: Option<i64>,
    #[serde(default)]
    pub tags_str: Option<String>,
}

/// Empty optional form fields mean "not provided"
fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// GET /blog/create_post/ - empty post form for authorized authors
pub async fn create_post_form(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
) -> Result<Response, ApiError> {
    if let Gate::Redirect(target) = can_create_post(user.as_deref()) {
        return Ok(Redirect::to(&target).into_response());
    }

    let (sidebar, _) = sidebar(state.store.as_ref()).await?;
    let context = PostFormContext {
        form: PostFormValues::default(),
        sidebar,
    };
    Ok(ApiResponse::success(context).into_response())
}

/// POST /blog/create_post/ - persist a post authored by the requester.
/// Unauthorized attempts are redirected to the list, never errored.
pub async fn create_post(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Form(form): Form<PostForm>,
) -> Result<Response, ApiError> {
    let auth = user.map(|Extension(user)| user);
    let user = match (can_create_post(auth.as_ref()), auth) {
        (Gate::Allowed, Some(user)) => user,
        (Gate::Redirect(target), _) => return Ok(Redirect::to(&target).into_response()),
        _ => return Err(ApiError::forbidden("Not allowed to create posts")),
    };

    let store = state.store.as_ref();
    let post = store
        .create_post(NewPost {
            title: form.title,
            hook_text: form.hook_text,
            content: form.content,
            head_image: blank_to_none(form.head_image),
            file_upload: blank_to_none(form.file_upload),
            author_id: user.user_id,
            category_id: form.category,
        })
        .await?;

    if let Some(raw) = form.tags_str.as_deref() {
        store
            .replace_post_tags(post.id, &parse_tag_names(raw))
            .await?;
    }

    tracing::info!("Post {} created by user {}", post.id, user.user_id);
    Ok(Redirect::to(&post.absolute_url()).into_response())
}
