use std::sync::Arc;

use blog_api::database::store::BlogStore;
use blog_api::database::{MemoryStore, PgStore};
use blog_api::routes::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = blog_api::config::config();
    tracing::info!("Starting blog API in {:?} mode", config.environment);

    let store: Arc<dyn BlogStore> = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let store = PgStore::connect(&url).await?;
            store.migrate().await?;
            Arc::new(store)
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using the in-memory store (data is not persisted)");
            Arc::new(MemoryStore::new())
        }
    };

    let app = app(AppState::new(store));

    // Allow tests or deployments to override port via env
    let port = std::env::var("BLOG_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(config.server.port);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Blog API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
