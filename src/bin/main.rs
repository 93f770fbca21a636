//! AIGuidebook server binary.
//!
//! # Usage
//!
//! ```bash
//! aiguidebook-server --bind 0.0.0.0:3000 --data-dir /var/lib/aiguidebook
//! ```
//!
//! Configuration is also read from `AIGUIDEBOOK_*` environment variables;
//! see `aiguidebook-server --help`.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use aiguidebook::store::DEFAULT_ASSIGNMENTS;
use aiguidebook::{create_router, AppMetrics, AppState, ServerConfig, Store, TokenVerifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServerConfig::parse();

    let store = Store::open(&config.data_dir)
        .with_context(|| format!("failed to open data directory {}", config.data_dir.display()))?;
    store
        .seed_assignments(DEFAULT_ASSIGNMENTS)
        .context("failed to seed assignment catalog")?;

    let metrics = Arc::new(AppMetrics::new().context("failed to register metrics")?);
    let state = AppState::new(
        Arc::new(store),
        TokenVerifier::new(&config.auth_secret),
        metrics,
    );
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!(addr = %config.bind, version = aiguidebook::VERSION, "listening");

    axum::serve(listener, app).await.context("server exited")?;
    Ok(())
}
