//! HTTP API for the Gauge measurement dashboard.
//!
//! Exposes an axum [`Router`] backed by any store implementing
//! [`DashboardStore`] + [`SessionStore`]. Each inbound request is handled
//! independently and concurrently; the only cross-request state is the
//! shared store and the session table it carries.

pub mod auth;
pub mod error;
pub mod measurements;
pub mod series;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post, put},
};
use gauge_core::store::{DashboardStore, SessionStore};
use serde::Deserialize;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` merged with
/// `GAUGE_`-prefixed environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// Set the `Secure` attribute on session cookies. Off by default so local
  /// plain-HTTP development works.
  #[serde(default)]
  pub secure_cookies: bool,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full API router for `state`.
///
/// Read endpoints (`GET /api/series`, `GET /api/measurements`) are open to
/// anonymous viewers; every mutation is admin-gated via the
/// [`AdminUser`](auth::AdminUser) extractor.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: DashboardStore + SessionStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Auth
    .route("/api/auth/register", post(auth::register::<S>))
    .route("/api/auth/login", post(auth::login::<S>))
    .route("/api/auth/logout", post(auth::logout::<S>))
    .route("/api/auth/me", get(auth::me::<S>))
    .route("/api/auth/change-password", post(auth::change_password::<S>))
    // Series
    .route("/api/series", get(series::list::<S>).post(series::create::<S>))
    .route(
      "/api/series/{id}",
      put(series::update::<S>).delete(series::remove::<S>),
    )
    // Measurements
    .route(
      "/api/measurements",
      get(measurements::list::<S>).post(measurements::create::<S>),
    )
    .route(
      "/api/measurements/{id}",
      put(measurements::update::<S>).delete(measurements::remove::<S>),
    )
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
