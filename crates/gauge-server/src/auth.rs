//! Session-cookie authentication: password hashing, the `CurrentUser` /
//! `AdminUser` extractors, and the `/api/auth/*` handlers.
//!
//! The client holds an opaque token in an HTTP-only cookie; the server side
//! of the session lives in the [`SessionStore`] with a fixed 30-day expiry.
//! State machine per client: anonymous → authenticated(user) → anonymous
//! (logout or expiry).

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  Json,
  extract::{FromRequestParts, State, rejection::JsonRejection},
  http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use gauge_core::{
  store::{DashboardStore, SessionStore},
  user::{ChangePasswordPayload, LoginPayload, NewUser, RegisterPayload, Role, User},
};
use rand_core::OsRng;
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "gauge_session";

// ─── Password hashing ────────────────────────────────────────────────────────

/// Hash a password to an argon2 PHC string on the blocking pool.
pub async fn hash_password(password: String) -> Result<String, ApiError> {
  tokio::task::spawn_blocking(move || {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map(|h| h.to_string())
      .map_err(|e| ApiError::Internal(format!("argon2 error: {e}")))
  })
  .await
  .map_err(|e| ApiError::Internal(format!("join error: {e}")))?
}

/// Verify a password against a stored PHC string on the blocking pool.
/// An unparseable stored hash verifies as a mismatch.
pub async fn verify_password(
  password: String,
  phc: String,
) -> Result<bool, ApiError> {
  tokio::task::spawn_blocking(move || {
    let Ok(parsed) = PasswordHash::new(&phc) else {
      return false;
    };
    Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
  })
  .await
  .map_err(|e| ApiError::Internal(format!("join error: {e}")))
}

// ─── Session resolution ──────────────────────────────────────────────────────

fn session_token(parts: &Parts) -> Option<Uuid> {
  let jar = CookieJar::from_headers(&parts.headers);
  jar.get(SESSION_COOKIE).and_then(|c| Uuid::parse_str(c.value()).ok())
}

/// Resolve the request's cookie to a live session. A missing, unparseable,
/// unknown or expired token all read as `None` — the client is anonymous.
async fn live_session<S>(
  state: &AppState<S>,
  parts: &Parts,
) -> Result<Option<gauge_core::session::Session>, ApiError>
where
  S: DashboardStore + SessionStore + Clone + Send + Sync + 'static,
{
  let Some(token) = session_token(parts) else {
    return Ok(None);
  };
  state.store.get_session(token).await.map_err(ApiError::store)
}

/// Extractor gate: any valid session (= `requireAuth`).
///
/// Rejects 401 without a live session and 404 when the session's user row
/// is gone.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
  S: DashboardStore + SessionStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let Some(session) = live_session(state, parts).await? else {
      return Err(ApiError::Unauthorized("Not authenticated"));
    };
    match state
      .store
      .get_user(session.user_id)
      .await
      .map_err(ApiError::store)?
    {
      Some(user) => Ok(Self(user)),
      None => Err(ApiError::NotFound("User not found")),
    }
  }
}

/// Extractor gate: valid session whose user has [`Role::Admin`]
/// (= `requireAdmin`).
///
/// Rejects 401 without a live session — an expired or unknown token returns
/// the client to anonymous — and 403 when the session resolves but its user
/// is missing or not an admin.
pub struct AdminUser(pub User);

impl<S> FromRequestParts<AppState<S>> for AdminUser
where
  S: DashboardStore + SessionStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let Some(session) = live_session(state, parts).await? else {
      return Err(ApiError::Unauthorized("Unauthorized"));
    };
    match state
      .store
      .get_user(session.user_id)
      .await
      .map_err(ApiError::store)?
    {
      Some(user) if user.role == Role::Admin => Ok(Self(user)),
      Some(_) | None => Err(ApiError::Forbidden),
    }
  }
}

// ─── Cookie helpers ──────────────────────────────────────────────────────────

fn session_cookie(token: Uuid, secure: bool) -> Cookie<'static> {
  let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
  cookie.set_http_only(true);
  cookie.set_same_site(SameSite::Lax);
  cookie.set_path("/");
  cookie.set_secure(secure);
  cookie.set_max_age(time::Duration::days(
    gauge_core::session::SESSION_TTL_DAYS,
  ));
  cookie
}

fn removal_cookie() -> Cookie<'static> {
  let mut cookie = Cookie::new(SESSION_COOKIE, "");
  cookie.set_path("/");
  cookie
}

// ─── Handlers ────────────────────────────────────────────────────────────────

/// `POST /api/auth/register` — creates the account but does NOT
/// authenticate the caller.
pub async fn register<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<RegisterPayload>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: DashboardStore + SessionStore + Clone + Send + Sync + 'static,
{
  let Json(payload) =
    body.map_err(|_| ApiError::BadRequest("Registration failed"))?;
  payload.validate()?;

  let password_hash = hash_password(payload.password).await?;
  let user = state
    .store
    .create_user(NewUser { username: payload.username, password_hash })
    .await
    .map_err(|e| {
      tracing::warn!(error = %e, "registration failed");
      ApiError::BadRequest("Registration failed")
    })?;

  Ok(Json(json!({ "id": user.id, "username": user.username })))
}

/// `POST /api/auth/login` — verifies credentials and binds a fresh session.
/// Unknown username and wrong password yield the identical generic 401.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  jar: CookieJar,
  body: Result<Json<LoginPayload>, JsonRejection>,
) -> Result<(CookieJar, Json<User>), ApiError>
where
  S: DashboardStore + SessionStore + Clone + Send + Sync + 'static,
{
  let Json(payload) = body.map_err(|_| ApiError::BadRequest("Login failed"))?;
  payload.validate()?;

  let user = state
    .store
    .get_user_by_username(&payload.username)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::Unauthorized("Invalid credentials"))?;

  if !verify_password(payload.password, user.password_hash.clone()).await? {
    return Err(ApiError::Unauthorized("Invalid credentials"));
  }

  let session =
    state.store.create_session(user.id).await.map_err(ApiError::store)?;

  tracing::info!(user = %user.username, "login");
  let jar = jar.add(session_cookie(session.token, state.config.secure_cookies));
  Ok((jar, Json(user)))
}

/// `POST /api/auth/logout` — destroys the server-side session record and
/// clears the cookie. Succeeds whether or not a session was bound.
pub async fn logout<S>(
  State(state): State<AppState<S>>,
  jar: CookieJar,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError>
where
  S: DashboardStore + SessionStore + Clone + Send + Sync + 'static,
{
  if let Some(token) =
    jar.get(SESSION_COOKIE).and_then(|c| Uuid::parse_str(c.value()).ok())
  {
    state.store.delete_session(token).await.map_err(ApiError::store)?;
  }

  let jar = jar.remove(removal_cookie());
  Ok((jar, Json(json!({ "message": "Logged out successfully" }))))
}

/// `GET /api/auth/me`
pub async fn me<S>(user: CurrentUser) -> Json<User>
where
  S: DashboardStore + SessionStore + Clone + Send + Sync + 'static,
{
  Json(user.0)
}

/// `POST /api/auth/change-password` — admin-gated; re-verifies the current
/// password before accepting the new one.
pub async fn change_password<S>(
  State(state): State<AppState<S>>,
  AdminUser(user): AdminUser,
  body: Result<Json<ChangePasswordPayload>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: DashboardStore + SessionStore + Clone + Send + Sync + 'static,
{
  let Json(payload) =
    body.map_err(|_| ApiError::BadRequest("Password change failed"))?;
  payload.validate()?;

  if !verify_password(payload.current_password, user.password_hash.clone())
    .await?
  {
    return Err(ApiError::Unauthorized("Invalid current password"));
  }

  let new_hash = hash_password(payload.new_password).await?;
  state
    .store
    .update_user_password(user.id, new_hash)
    .await
    .map_err(ApiError::store)?;

  Ok(Json(json!({ "message": "Password updated" })))
}
