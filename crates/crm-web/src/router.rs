//! Web host using Axum
//!
//! Serves the compiled bundle. Any path that is not a file gets `index.html`
//! so deep links such as `/deals/D-100` boot the app, which then resolves
//! the path itself.

use axum::{response::Redirect, routing::get, Json, Router};
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

/// Where the bundle lives and under which prefix it is mounted
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Trunk output directory containing `index.html`
    pub dist_dir: PathBuf,
    /// Application base prefix (`/crm`), empty for the root
    pub base_prefix: String,
}

impl HostConfig {
    pub fn new(dist_dir: impl Into<PathBuf>, base_prefix: impl Into<String>) -> Self {
        Self {
            dist_dir: dist_dir.into(),
            base_prefix: base_prefix.into(),
        }
    }
}

/// Create the web router
pub fn create_router(config: &HostConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let spa = ServeDir::new(&config.dist_dir)
        .fallback(ServeFile::new(config.dist_dir.join("index.html")));

    let router = Router::new().route("/api/health", get(health_handler));
    let router = if config.base_prefix.is_empty() {
        router.fallback_service(spa)
    } else {
        let prefix = config.base_prefix.clone();
        router
            .nest_service(&config.base_prefix, spa)
            .fallback(move || {
                let prefix = prefix.clone();
                async move { Redirect::temporary(&prefix) }
            })
    };

    router.layer(cors)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
