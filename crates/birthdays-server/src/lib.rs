//! Server wiring for the birthday calendar.
//!
//! Layers configuration, opens the JSON store and wraps the API router with
//! request tracing. The binary in `main.rs` is a thin shell over this crate.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use birthdays_api::{ApiState, api_router};
use birthdays_store_json::{JsonFileStore, LoadPolicy};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
///
/// Sources, lowest priority first: built-in defaults, the TOML file, then
/// `BIRTHDAYS_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub host:        String,
  pub port:        u16,
  pub store_path:  PathBuf,
  pub load_policy: LoadPolicy,
}

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_STORE_PATH: &str = "birthdays.json";

impl ServerConfig {
  /// Load configuration from `file` (optional) and the environment.
  pub fn load(file: &Path) -> Result<Self, config::ConfigError> {
    let settings = config::Config::builder()
      .set_default("host", DEFAULT_HOST)?
      .set_default("port", i64::from(DEFAULT_PORT))?
      .set_default("store_path", DEFAULT_STORE_PATH)?
      .set_default("load_policy", "strict")?
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("BIRTHDAYS"))
      .build()?;

    let mut cfg: ServerConfig = settings.try_deserialize()?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Application ──────────────────────────────────────────────────────────────

/// Open the store named by `cfg`.
pub async fn open_store(
  cfg: &ServerConfig,
) -> birthdays_store_json::Result<JsonFileStore> {
  JsonFileStore::open(&cfg.store_path, cfg.load_policy).await
}

/// The API router over `store`, with per-request tracing.
pub fn app(store: JsonFileStore) -> Router {
  api_router(ApiState::new(Arc::new(store))).layer(TraceLayer::new_for_http())
}
