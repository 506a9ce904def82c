//! The `DashboardStore` and `SessionStore` traits.
//!
//! The traits are implemented by storage backends (e.g.
//! `gauge-store-sqlite`). The HTTP layer depends on these abstractions, not
//! on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  measurement::{Measurement, MeasurementPatch, NewMeasurement},
  series::{NewSeries, Series, SeriesPatch},
  session::Session,
  user::{NewUser, User},
};

// ─── Dashboard store ─────────────────────────────────────────────────────────

/// Abstraction over durable CRUD for users, series and measurements.
///
/// Point lookups return `Ok(None)` for absent rows — absence is a normal
/// outcome, not an error. Referential integrity (cascade deletes, rejected
/// dangling foreign keys) is the backend's responsibility; implementations
/// must not rely on application-level pre-checks, so a concurrent insert
/// against a row being deleted either fails or is itself cascaded.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait DashboardStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn get_user_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Persist a new user with a server-generated id. The role is assigned
  /// unconditionally by the store (currently always admin). Fails if the
  /// username is already taken.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Unconditional overwrite of the stored hash.
  fn update_user_password(
    &self,
    id: Uuid,
    password_hash: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete a user. Cascades to their series, measurements and sessions.
  fn delete_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Series ────────────────────────────────────────────────────────────

  /// All series, most recently created first.
  fn get_all_series(
    &self,
  ) -> impl Future<Output = Result<Vec<Series>, Self::Error>> + Send + '_;

  fn get_series(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Series>, Self::Error>> + Send + '_;

  fn create_series(
    &self,
    input: NewSeries,
    owner_id: Uuid,
  ) -> impl Future<Output = Result<Series, Self::Error>> + Send + '_;

  /// Partial patch — only supplied fields are overwritten. The
  /// `max_value > min_value` invariant is re-checked against the merged
  /// record. Returns `None` if the series does not exist.
  fn update_series(
    &self,
    id: Uuid,
    patch: SeriesPatch,
  ) -> impl Future<Output = Result<Option<Series>, Self::Error>> + Send + '_;

  /// Delete a series and, transitively, every measurement referencing it.
  fn delete_series(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Measurements ──────────────────────────────────────────────────────

  /// All measurements ordered by semantic timestamp, most recent first
  /// (not by creation time).
  fn get_all_measurements(
    &self,
  ) -> impl Future<Output = Result<Vec<Measurement>, Self::Error>> + Send + '_;

  fn get_measurement(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Measurement>, Self::Error>> + Send + '_;

  /// Same ordering as [`get_all_measurements`](Self::get_all_measurements),
  /// filtered to one series.
  fn get_measurements_by_series(
    &self,
    series_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Measurement>, Self::Error>> + Send + '_;

  /// If no timestamp is supplied, the store assigns current server time as
  /// the semantic timestamp (distinct from `created_at`).
  fn create_measurement(
    &self,
    input: NewMeasurement,
    owner_id: Uuid,
  ) -> impl Future<Output = Result<Measurement, Self::Error>> + Send + '_;

  /// Partial patch. Returns `None` if the measurement does not exist.
  fn update_measurement(
    &self,
    id: Uuid,
    patch: MeasurementPatch,
  ) -> impl Future<Output = Result<Option<Measurement>, Self::Error>> + Send + '_;

  fn delete_measurement(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Session store ───────────────────────────────────────────────────────────

/// A durable key-value store of sessions keyed by opaque token.
///
/// Modeled as a separate capability so it can be swapped for any durable
/// backend; `gauge-store-sqlite` implements it alongside [`DashboardStore`]
/// in a dedicated table.
pub trait SessionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Issue and persist a fresh session bound to `user_id`.
  fn create_session(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + '_;

  /// Resolve a token. Expired sessions read as `None`.
  fn get_session(
    &self,
    token: Uuid,
  ) -> impl Future<Output = Result<Option<Session>, Self::Error>> + Send + '_;

  /// Destroy the server-side record. Deleting an absent token is a no-op.
  fn delete_session(
    &self,
    token: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove every expired session; returns the number removed.
  fn purge_expired_sessions(
    &self,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
