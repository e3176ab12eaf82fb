//! patron-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, optionally seeds it from a JSON file, and serves
//! the customer-record API over HTTP.

mod seed;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use axum::{Router, http::HeaderValue};
use clap::Parser;
use patron_core::CustomerService;
use patron_store_sqlite::SqliteStore;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::{
  cors::{AllowOrigin, Any, CorsLayer},
  trace::TraceLayer,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Customer-record API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

/// Runtime server configuration, deserialised from `config.toml` layered
/// with `PATRON_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host:       String,
  #[serde(default = "default_port")]
  port:       u16,
  #[serde(default = "default_store_path")]
  store_path: PathBuf,
  /// JSON array of customer objects loaded once into an empty store.
  seed_path:  Option<PathBuf>,
  /// Browser origins allowed by CORS.
  #[serde(default = "default_cors_origins")]
  cors_origins: Vec<String>,
}

fn default_host() -> String {
  "127.0.0.1".to_owned()
}

fn default_port() -> u16 {
  8080
}

fn default_store_path() -> PathBuf {
  PathBuf::from("patron.db")
}

fn default_cors_origins() -> Vec<String> {
  vec![
    "http://localhost:3000".to_owned(),
    "http://localhost:3001".to_owned(),
  ]
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

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("PATRON"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open SQLite store.
  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| {
      format!("failed to open store at {:?}", server_cfg.store_path)
    })?;

  // One-time seeding. Failure is logged, never fatal.
  if let Some(path) = &server_cfg.seed_path {
    if let Err(e) = seed::run(&store, path).await {
      tracing::warn!(error = %e, path = %path.display(), "seeding failed");
    }
  }

  let service = Arc::new(CustomerService::new(store.clone(), store));

  let cors = cors_layer(&server_cfg.cors_origins)?;
  let app = Router::new()
    .nest("/api", patron_api::api_router(service))
    .layer(TraceLayer::new_for_http())
    .layer(cors);

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
  let origins: Vec<HeaderValue> = origins
    .iter()
    .map(|o| o.parse().with_context(|| format!("bad CORS origin {o:?}")))
    .collect::<anyhow::Result<_>>()?;
  Ok(
    CorsLayer::new()
      .allow_origin(AllowOrigin::list(origins))
      .allow_methods(Any)
      .allow_headers(Any),
  )
}
