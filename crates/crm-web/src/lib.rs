//! crm-web - Browser shell for crm-console using Leptos, plus the Axum host
//! that serves the compiled bundle.

#![recursion_limit = "1024"]

pub mod api;
pub mod app;
pub mod browser;
pub mod components;
pub mod context;
#[cfg(feature = "ssr")]
pub mod router;

pub use app::App;
#[cfg(feature = "ssr")]
pub use router::{create_router, HostConfig};

#[cfg(feature = "ssr")]
use std::net::SocketAddr;

/// Run the web host
#[cfg(feature = "ssr")]
pub async fn run(config: HostConfig, port: u16) -> anyhow::Result<()> {
    use anyhow::Context;

    let router = create_router(&config);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(addr = %addr, dist = %config.dist_dir.display(), "Web host listening");
    println!("Web host listening on http://{}{}", addr, config.base_prefix);

    axum::serve(listener, router).await?;

    Ok(())
}
