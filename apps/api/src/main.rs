mod config;
mod contact;
mod dataset;
mod errors;
mod models;
mod page;
mod provider;
mod resume;
mod routes;
mod seed;
mod state;
mod store;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::dataset::resume_dataset;
use crate::page::PageRenderer;
use crate::provider::HttpResumeSource;
use crate::routes::build_router;
use crate::seed::seed;
use crate::state::AppState;
use crate::store::{MemoryResumeStore, PgResumeStore, ResumeStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Folio v{}", env!("CARGO_PKG_VERSION"));

    let store = build_store(&config).await?;

    let fallback = Arc::new(resume_dataset());

    // A failed seed leaves the store empty; the server still starts.
    if let Err(e) = seed(store.as_ref(), &fallback).await {
        error!("Error seeding resume store: {e}");
    }

    let source = HttpResumeSource::new(config.resume_api_url.clone(), config.fetch_policy)
        .context("Failed to build resume HTTP client")?;
    info!("Page data source: {}", source.url());

    let pages = PageRenderer::new().context("Failed to register page template")?;

    let state = AppState {
        store,
        source: Arc::new(source),
        fallback,
        pages: Arc::new(pages),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_store(config: &Config) -> Result<Arc<dyn ResumeStore>> {
    match config.store {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the Postgres store")?;
            let store = PgResumeStore::connect(database_url).await?;
            store.migrate().await?;
            info!("PostgreSQL resume store ready");
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            info!("Using in-memory resume store");
            Ok(Arc::new(MemoryResumeStore::new()))
        }
    }
}
