//! Flat-file JSON backend for the birthday store.
//!
//! The whole store is held in memory and rewritten to disk after every
//! insertion via a temporary file and an atomic rename.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{JsonFileStore, LoadPolicy};
