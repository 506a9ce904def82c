//! Field-level validation for mutation payloads.
//!
//! Validation is pure — no I/O, no storage knowledge. Each payload type in
//! [`user`](crate::user), [`series`](crate::series) and
//! [`measurement`](crate::measurement) exposes a `validate()` method built on
//! the helpers here. A failure identifies the offending wire-format field
//! name (camelCase, as the client sent it) and a human-readable message.

use thiserror::Error;

/// A single failed constraint on a mutation payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
  /// Wire-format name of the failing field, e.g. `"maxValue"`.
  pub field:   &'static str,
  pub message: &'static str,
}

impl ValidationError {
  pub const fn new(field: &'static str, message: &'static str) -> Self {
    Self { field, message }
  }
}

/// Reject empty strings.
pub fn require_non_empty(
  field: &'static str,
  value: &str,
) -> Result<(), ValidationError> {
  if value.is_empty() {
    return Err(ValidationError::new(field, "must not be empty"));
  }
  Ok(())
}

/// Reject strings shorter than `min` characters.
pub fn require_min_len(
  field: &'static str,
  value: &str,
  min: usize,
  message: &'static str,
) -> Result<(), ValidationError> {
  if value.chars().count() < min {
    return Err(ValidationError::new(field, message));
  }
  Ok(())
}

/// Reject NaN and infinities. JSON cannot encode them, but payloads may be
/// constructed in-process too.
pub fn require_finite(
  field: &'static str,
  value: f64,
) -> Result<(), ValidationError> {
  if !value.is_finite() {
    return Err(ValidationError::new(field, "must be a finite number"));
  }
  Ok(())
}
