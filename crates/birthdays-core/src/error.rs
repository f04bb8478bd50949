//! Error types for `birthdays-core`.

use thiserror::Error;

/// A caller-supplied value failed a format or range constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("name must not be empty")]
  EmptyName,

  #[error("{field} must be between {min} and {max}, got {value}")]
  OutOfRange {
    field: &'static str,
    value: i64,
    min:   i64,
    max:   i64,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Check that `value` lies in `min..=max`, naming `field` in the error.
pub(crate) fn check_range(
  field: &'static str,
  value: i64,
  min: i64,
  max: i64,
) -> Result<()> {
  if (min..=max).contains(&value) {
    Ok(())
  } else {
    Err(Error::OutOfRange { field, value, min, max })
  }
}
