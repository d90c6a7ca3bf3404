//! cxr server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `CXR_*`
//! environment overrides, opens the SQLite store, and serves the JSON API
//! over HTTP.

mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use cxr_api::AppState;
use cxr_core::refresh::Refresher;
use cxr_gateway::HttpGateway;
use cxr_store_sqlite::SqliteStore;
use cxr_summary::SvgSummary;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Country currency & exchange API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = ServerConfig::load(&cli.config).with_context(|| {
    format!("failed to load configuration from {}", cli.config.display())
  })?;

  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;
  let gateway =
    HttpGateway::new(cfg.gateway()).context("failed to build HTTP client")?;
  let summary = SvgSummary::new(&cfg.summary_path);

  let refresher = Refresher::new(
    Arc::new(store),
    Arc::new(gateway),
    Arc::new(summary),
    cfg.gdp_multiplier,
  );
  let app = cxr_api::api_router(AppState::new(refresher))
    .layer(TraceLayer::new_for_http());

  let address = cfg.address();
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  tracing::info!("Listening on http://{address}");

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::warn!(error = %e, "failed to listen for ctrl-c");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutting down");
}
