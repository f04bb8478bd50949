//! Handlers for `/birthdays` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/birthdays/` | Body: `{"name", "birthday": "YYYY-MM-DD", "message"?}`; returns 200 + record |
//! | `GET`  | `/birthdays/` | Every record, insertion order |
//! | `GET`  | `/birthdays/upcoming` | `?days=1..=365`, default 7 |
//! | `GET`  | `/birthdays/search` | Optional `?day=1..=31`, `month=1..=12`, `year=1900..=2100` |

use axum::{
  Json,
  extract::{
    Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
};
use birthdays_core::{
  BirthdayRecord,
  query::{DateFilter, UpcomingWindow},
  store::BirthdayStore,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /birthdays/` — returns 200 + the stored record.
///
/// Answers `200 OK`, not `201 Created`.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  body: Result<Json<BirthdayRecord>, JsonRejection>,
) -> Result<Json<BirthdayRecord>, ApiError>
where
  S: BirthdayStore,
{
  let Json(record) = body?;
  record.validate()?;

  let stored = state.store.append(record).await.map_err(ApiError::store)?;
  tracing::info!(name = %stored.name, birthday = %stored.birthday, "birthday added");
  Ok(Json(stored))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /birthdays/`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<BirthdayRecord>>, ApiError>
where
  S: BirthdayStore,
{
  let records = state.store.all_records().await.map_err(ApiError::store)?;
  Ok(Json(records))
}

// ─── Upcoming ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpcomingParams {
  /// Look-ahead in days. Defaults to [`UpcomingWindow::DEFAULT_DAYS`].
  pub days: Option<i64>,
}

/// `GET /birthdays/upcoming[?days=N]`
pub async fn upcoming<S>(
  State(state): State<ApiState<S>>,
  params: Result<Query<UpcomingParams>, QueryRejection>,
) -> Result<Json<Vec<BirthdayRecord>>, ApiError>
where
  S: BirthdayStore,
{
  let Query(params) = params?;
  let window = UpcomingWindow::new(params.days.unwrap_or(UpcomingWindow::DEFAULT_DAYS))?;
  let today = (state.today)();

  let records = state
    .store
    .upcoming(today, window)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(records))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  pub day:   Option<i64>,
  pub month: Option<i64>,
  pub year:  Option<i64>,
}

/// `GET /birthdays/search[?day=...][&month=...][&year=...]`
pub async fn search<S>(
  State(state): State<ApiState<S>>,
  params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<BirthdayRecord>>, ApiError>
where
  S: BirthdayStore,
{
  let Query(params) = params?;
  let filter = DateFilter::new(params.day, params.month, params.year)?;

  let records = state.store.search(filter).await.map_err(ApiError::store)?;
  Ok(Json(records))
}
