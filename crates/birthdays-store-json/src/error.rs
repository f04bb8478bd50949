//! Error type for `birthdays-store-json`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid record: {0}")]
  Validation(#[from] birthdays_core::Error),

  #[error("failed to read {path:?}: {source}")]
  Read {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The file exists but is not a JSON array of records.
  #[error("store file {path:?} is corrupt: {source}")]
  Corrupt {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },

  /// A single entry could not be turned into a record.
  #[error("entry {index} in {path:?} is malformed: {reason}")]
  MalformedEntry {
    path:   PathBuf,
    index:  usize,
    reason: String,
  },

  /// Writing the store back to disk failed; the insertion was rolled back.
  #[error("failed to persist {path:?}: {source}")]
  Persistence {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The task writing the store panicked or was shut down.
  #[error("store write task failed: {0}")]
  Task(#[from] tokio::task::JoinError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
