//! Handlers for `/api/measurements` endpoints.
//!
//! | Method   | Path | Auth | Notes |
//! |----------|------|------|-------|
//! | `GET`    | `/api/measurements` | none | ordered by semantic timestamp |
//! | `POST`   | `/api/measurements` | admin | timestamp defaults to now |
//! | `PUT`    | `/api/measurements/{id}` | admin | value/timestamp patch |
//! | `DELETE` | `/api/measurements/{id}` | admin | |
//!
//! Values are deliberately not checked against the owning series' range;
//! the chart layer owns that concern.

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use gauge_core::{
  measurement::{Measurement, MeasurementPatch, NewMeasurement},
  store::{DashboardStore, SessionStore},
};
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, auth::AdminUser, error::ApiError};

/// `GET /api/measurements` — open to anonymous viewers.
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Measurement>>, ApiError>
where
  S: DashboardStore + SessionStore + Clone + Send + Sync + 'static,
{
  let measurements =
    state.store.get_all_measurements().await.map_err(ApiError::store)?;
  Ok(Json(measurements))
}

/// `POST /api/measurements`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  AdminUser(user): AdminUser,
  body: Result<Json<NewMeasurement>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DashboardStore + SessionStore + Clone + Send + Sync + 'static,
{
  let Json(payload) =
    body.map_err(|_| ApiError::BadRequest("Failed to create measurement"))?;
  payload.validate()?;

  let measurement = state
    .store
    .create_measurement(payload, user.id)
    .await
    .map_err(|e| {
      tracing::warn!(error = %e, "measurement creation failed");
      ApiError::BadRequest("Failed to create measurement")
    })?;

  Ok((StatusCode::CREATED, Json(measurement)))
}

/// `PUT /api/measurements/{id}` — `value` and `timestamp` patch
/// independently.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  AdminUser(_): AdminUser,
  Path(id): Path<String>,
  body: Result<Json<MeasurementPatch>, JsonRejection>,
) -> Result<Json<Measurement>, ApiError>
where
  S: DashboardStore + SessionStore + Clone + Send + Sync + 'static,
{
  let Json(patch) =
    body.map_err(|_| ApiError::BadRequest("Failed to update measurement"))?;
  patch.validate()?;
  // An update with nothing to set is a client error, not a no-op.
  if patch.is_empty() {
    return Err(ApiError::BadRequest("Failed to update measurement"));
  }

  let id = Uuid::parse_str(&id)
    .map_err(|_| ApiError::NotFound("Measurement not found"))?;

  let updated = state
    .store
    .update_measurement(id, patch)
    .await
    .map_err(|e| {
      tracing::warn!(error = %e, "measurement update failed");
      ApiError::BadRequest("Failed to update measurement")
    })?
    .ok_or(ApiError::NotFound("Measurement not found"))?;

  Ok(Json(updated))
}

/// `DELETE /api/measurements/{id}` — deleting an absent id is a no-op
/// success.
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  AdminUser(_): AdminUser,
  Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: DashboardStore + SessionStore + Clone + Send + Sync + 'static,
{
  if let Ok(id) = Uuid::parse_str(&id) {
    state.store.delete_measurement(id).await.map_err(ApiError::store)?;
  }
  Ok(Json(json!({ "message": "Measurement deleted" })))
}
