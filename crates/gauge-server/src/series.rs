//! Handlers for `/api/series` endpoints.
//!
//! | Method   | Path | Auth | Notes |
//! |----------|------|------|-------|
//! | `GET`    | `/api/series` | none | full collection, newest first |
//! | `POST`   | `/api/series` | admin | 201 on success |
//! | `PUT`    | `/api/series/{id}` | admin | partial patch |
//! | `DELETE` | `/api/series/{id}` | admin | cascades to measurements |

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use gauge_core::{
  series::{NewSeries, Series, SeriesPatch},
  store::{DashboardStore, SessionStore},
};
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, auth::AdminUser, error::ApiError};

/// `GET /api/series` — open to anonymous viewers.
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Series>>, ApiError>
where
  S: DashboardStore + SessionStore + Clone + Send + Sync + 'static,
{
  let series =
    state.store.get_all_series().await.map_err(ApiError::store)?;
  Ok(Json(series))
}

/// `POST /api/series`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  AdminUser(user): AdminUser,
  body: Result<Json<NewSeries>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DashboardStore + SessionStore + Clone + Send + Sync + 'static,
{
  let Json(payload) =
    body.map_err(|_| ApiError::BadRequest("Failed to create series"))?;
  payload.validate()?;

  let series = state
    .store
    .create_series(payload, user.id)
    .await
    .map_err(|e| {
      tracing::warn!(error = %e, "series creation failed");
      ApiError::BadRequest("Failed to create series")
    })?;

  Ok((StatusCode::CREATED, Json(series)))
}

/// `PUT /api/series/{id}` — any subset of mutable fields; the merged record
/// is re-validated against `max > min` by the store.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  AdminUser(_): AdminUser,
  Path(id): Path<String>,
  body: Result<Json<SeriesPatch>, JsonRejection>,
) -> Result<Json<Series>, ApiError>
where
  S: DashboardStore + SessionStore + Clone + Send + Sync + 'static,
{
  let Json(patch) =
    body.map_err(|_| ApiError::BadRequest("Failed to update series"))?;
  patch.validate()?;
  // An update with nothing to set is a client error, not a no-op.
  if patch.is_empty() {
    return Err(ApiError::BadRequest("Failed to update series"));
  }

  let id = Uuid::parse_str(&id)
    .map_err(|_| ApiError::NotFound("Series not found"))?;

  let updated = state
    .store
    .update_series(id, patch)
    .await
    .map_err(|e| {
      tracing::warn!(error = %e, "series update failed");
      ApiError::BadRequest("Failed to update series")
    })?
    .ok_or(ApiError::NotFound("Series not found"))?;

  Ok(Json(updated))
}

/// `DELETE /api/series/{id}` — deleting an absent id is a no-op success.
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  AdminUser(_): AdminUser,
  Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: DashboardStore + SessionStore + Clone + Send + Sync + 'static,
{
  if let Ok(id) = Uuid::parse_str(&id) {
    state.store.delete_series(id).await.map_err(ApiError::store)?;
  }
  Ok(Json(json!({ "message": "Series deleted" })))
}
