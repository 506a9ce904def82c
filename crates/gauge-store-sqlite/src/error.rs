//! Error type for `gauge-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown role: {0:?}")]
  UnknownRole(String),

  /// UNIQUE constraint on `users.username`.
  #[error("username already taken: {0:?}")]
  UsernameTaken(String),

  /// A write referenced a nonexistent user or series.
  #[error("foreign key violation")]
  ForeignKey,

  /// The merged series record would violate `max_value > min_value`.
  #[error("max value must be greater than min value")]
  RangeInvariant,
}

/// Classify a constraint failure from the engine into the matching domain
/// error. Anything unrecognised passes through as a database error.
pub(crate) fn classify(err: tokio_rusqlite::Error, username: Option<&str>) -> Error {
  use rusqlite::ffi;

  if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _)) =
    &err
  {
    match e.extended_code {
      ffi::SQLITE_CONSTRAINT_UNIQUE => {
        return Error::UsernameTaken(username.unwrap_or_default().to_owned());
      }
      ffi::SQLITE_CONSTRAINT_FOREIGNKEY => return Error::ForeignKey,
      ffi::SQLITE_CONSTRAINT_CHECK => return Error::RangeInvariant,
      _ => {}
    }
  }
  Error::Database(err)
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
