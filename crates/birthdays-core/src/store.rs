//! The `BirthdayStore` trait.
//!
//! Implemented by storage backends (e.g. `birthdays-store-json`). The HTTP
//! layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  BirthdayRecord,
  query::{self, DateFilter, UpcomingWindow},
};

/// Abstraction over a birthday store backend.
///
/// Records are append-only: there is no update or delete. Reads return a
/// snapshot in insertion order.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait BirthdayStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Validate `record`, append it and persist the full store.
  ///
  /// If persisting fails the record is not retained.
  fn append(
    &self,
    record: BirthdayRecord,
  ) -> impl Future<Output = Result<BirthdayRecord, Self::Error>> + Send + '_;

  /// A snapshot of every record, in insertion order.
  fn all_records(
    &self,
  ) -> impl Future<Output = Result<Vec<BirthdayRecord>, Self::Error>> + Send + '_;

  /// Records whose next anniversary falls within `window` of `today`.
  fn upcoming(
    &self,
    today: NaiveDate,
    window: UpcomingWindow,
  ) -> impl Future<Output = Result<Vec<BirthdayRecord>, Self::Error>> + Send + '_
  {
    async move {
      let records = self.all_records().await?;
      Ok(
        query::upcoming_within(&records, today, window)
          .cloned()
          .collect(),
      )
    }
  }

  /// Records whose birthday matches every component set in `filter`.
  fn search(
    &self,
    filter: DateFilter,
  ) -> impl Future<Output = Result<Vec<BirthdayRecord>, Self::Error>> + Send + '_
  {
    async move {
      let records = self.all_records().await?;
      Ok(query::search_by(&records, filter).cloned().collect())
    }
  }
}
