//! The birthday record — the only entity the calendar stores.
//!
//! Records carry no identifier. They are created once, never mutated, and
//! addressed only by position or by matching field values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One birthday entry.
///
/// `birthday` is a calendar date with no time or zone component; it
/// serialises as `YYYY-MM-DD`, so an impossible date such as `2023-02-30`
/// fails to deserialise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayRecord {
  pub name:     String,
  pub birthday: NaiveDate,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub message:  Option<String>,
}

impl BirthdayRecord {
  /// Build a validated record.
  pub fn new(
    name: impl Into<String>,
    birthday: NaiveDate,
    message: Option<String>,
  ) -> Result<Self> {
    let record = Self {
      name: name.into(),
      birthday,
      message,
    };
    record.validate()?;
    Ok(record)
  }

  /// Re-check invariants on a record that arrived through deserialisation.
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::EmptyName);
    }
    Ok(())
  }
}
