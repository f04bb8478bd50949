//! JSON REST API for the birthday calendar.
//!
//! Exposes an axum [`Router`] backed by any
//! [`birthdays_core::store::BirthdayStore`]. Logging layers, TLS and the
//! listener are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = birthdays_api::api_router(ApiState::new(Arc::new(store)));
//! ```

pub mod birthdays;
pub mod error;

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use birthdays_core::store::BirthdayStore;
use chrono::{Local, NaiveDate};
use serde_json::{Value, json};

pub use error::ApiError;

// ─── State ────────────────────────────────────────────────────────────────────

/// Source of "today" for window queries.
pub type Today = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store: Arc<S>,
  pub today: Today,
}

impl<S> ApiState<S> {
  /// State whose "today" is the local calendar date.
  pub fn new(store: Arc<S>) -> Self {
    Self {
      store,
      today: Arc::new(|| Local::now().date_naive()),
    }
  }

  /// Replace the date source, e.g. to pin "today" in tests.
  pub fn with_today(
    mut self,
    today: impl Fn() -> NaiveDate + Send + Sync + 'static,
  ) -> Self {
    self.today = Arc::new(today);
    self
  }
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      today: Arc::clone(&self.today),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router over `state`.
///
/// The collection routes answer with and without a trailing slash.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: BirthdayStore + 'static,
{
  Router::new()
    .route("/", get(root))
    .route("/birthdays", get(birthdays::list::<S>).post(birthdays::create::<S>))
    .route("/birthdays/", get(birthdays::list::<S>).post(birthdays::create::<S>))
    .route("/birthdays/upcoming", get(birthdays::upcoming::<S>))
    .route("/birthdays/search", get(birthdays::search::<S>))
    .with_state(state)
}

/// `GET /` — liveness.
async fn root() -> Json<Value> {
  Json(json!({ "message": "Birthday Calendar API is running" }))
}

// ─── Integration tests ────────────────────────────────────────────────────────
