//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings in UTC, which sort
//! lexicographically in `ORDER BY`. UUIDs are stored as hyphenated lowercase
//! strings.

use chrono::{DateTime, Utc};
use gauge_core::{
  measurement::Measurement,
  series::Series,
  session::Session,
  user::{Role, User},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Role ─────────────────────────────────────────────────────────────────────

pub fn encode_role(r: Role) -> &'static str {
  match r {
    Role::Admin => "admin",
    Role::Viewer => "viewer",
  }
}

pub fn decode_role(s: &str) -> Result<Role> {
  match s {
    "admin" => Ok(Role::Admin),
    "viewer" => Ok(Role::Viewer),
    other => Err(Error::UnknownRole(other.to_owned())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:  String,
  pub username: String,
  pub password: String,
  pub role:     String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:            decode_uuid(&self.user_id)?,
      username:      self.username,
      password_hash: self.password,
      role:          decode_role(&self.role)?,
    })
  }
}

/// Raw strings read directly from a `series` row.
pub struct RawSeries {
  pub series_id:     String,
  pub name:          String,
  pub min_value:     f64,
  pub max_value:     f64,
  pub color:         String,
  pub icon:          String,
  pub created_by_id: String,
  pub created_at:    String,
}

impl RawSeries {
  pub fn into_series(self) -> Result<Series> {
    Ok(Series {
      id:            decode_uuid(&self.series_id)?,
      name:          self.name,
      min_value:     self.min_value,
      max_value:     self.max_value,
      color:         self.color,
      icon:          self.icon,
      created_by_id: decode_uuid(&self.created_by_id)?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `measurements` row.
pub struct RawMeasurement {
  pub measurement_id: String,
  pub value:          f64,
  pub timestamp:      String,
  pub series_id:      String,
  pub created_by_id:  String,
  pub created_at:     String,
}

impl RawMeasurement {
  pub fn into_measurement(self) -> Result<Measurement> {
    Ok(Measurement {
      id:            decode_uuid(&self.measurement_id)?,
      value:         self.value,
      timestamp:     decode_dt(&self.timestamp)?,
      series_id:     decode_uuid(&self.series_id)?,
      created_by_id: decode_uuid(&self.created_by_id)?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `sessions` row.
pub struct RawSession {
  pub token:      String,
  pub user_id:    String,
  pub expires_at: String,
}

impl RawSession {
  pub fn into_session(self) -> Result<Session> {
    Ok(Session {
      token:      decode_uuid(&self.token)?,
      user_id:    decode_uuid(&self.user_id)?,
      expires_at: decode_dt(&self.expires_at)?,
    })
  }
}
