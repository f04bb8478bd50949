//! Core types and trait definitions for the birthday calendar.
//!
//! This crate has no HTTP or filesystem dependencies. The record type, the
//! date-window and search filters, and the [`store::BirthdayStore`] trait all
//! live here; the store and API crates build on top of it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod query;
pub mod record;
pub mod store;

pub use error::{Error, Result};
pub use record::BirthdayRecord;
