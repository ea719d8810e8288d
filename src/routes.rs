use std::sync::Arc;

use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::database::store::BlogStore;
use crate::handlers;
use crate::middleware::auth_context_middleware;

/// Explicitly-passed dependencies for every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BlogStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        Self { store }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Blog pages
        .merge(blog_routes())
        // Global middleware
        .layer(axum::middleware::from_fn(auth_context_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn blog_routes() -> Router<AppState> {
    use handlers::{comments, create, detail, list, update};

    Router::new()
        // Listings
        .route("/blog/", get(list::post_list))
        .route("/blog/category/:slug/", get(list::category_page))
        .route("/blog/tag/:slug/", get(list::tag_page))
        .route("/blog/search/:query/", get(list::search_page))
        // Single post
        .route("/blog/:id/", get(detail::post_page))
        // Authoring
        .route(
            "/blog/create_post/",
            get(create::create_post_form).post(create::create_post),
        )
        .route(
            "/blog/update_post/:id/",
            get(update::update_post_form).post(update::update_post),
        )
        // Comments: creation is POST-only, a GET redirects to the detail page
        .route(
            "/blog/:id/new_comment/",
            get(comments::new_comment_redirect).post(comments::new_comment),
        )
        .route(
            "/blog/update_comment/:id/",
            get(comments::update_comment_form).post(comments::update_comment),
        )
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Blog API",
            "version": version,
            "description": "Blog backend: posts, categories, tags, comments",
            "endpoints": {
                "list": "/blog/ (public, paginated)",
                "category": "/blog/category/:slug/ (public)",
                "tag": "/blog/tag/:slug/ (public)",
                "search": "/blog/search/:query/ (public, unpaginated)",
                "detail": "/blog/:id/ (public)",
                "create": "/blog/create_post/ (staff or superuser)",
                "update": "/blog/update_post/:id/ (author only)",
                "new_comment": "/blog/:id/new_comment/ (authenticated, POST only)",
                "update_comment": "/blog/update_comment/:id/ (author only)",
            }
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "store unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "store_error": e.to_string()
                }
            })),
        ),
    }
}
