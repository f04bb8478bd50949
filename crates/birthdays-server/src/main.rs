//! Birthday calendar server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), loads the JSON
//! store and serves the HTTP API.
//!
//! ```
//! cargo run -p birthdays-server --bin server -- --store ~/birthdays.json
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use birthdays_server::{ServerConfig, app, open_store};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Birthday calendar server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Override `store_path` from the configuration.
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;
  if let Some(store) = cli.store {
    cfg.store_path = birthdays_server::expand_tilde(&store);
  }

  let store = open_store(&cfg)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;
  tracing::info!(
    path = %cfg.store_path.display(),
    records = store.len().await,
    policy = ?cfg.load_policy,
    "store ready"
  );

  let address = cfg.address();
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app(store)).await.context("server error")?;

  Ok(())
}
