//! Users and the payloads that create or mutate them.
//!
//! The password hash never leaves the server: [`User`] skips it during
//! serialization, so no `User`-bearing response can contain it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validate::{
  ValidationError, require_min_len, require_non_empty,
};

/// Authorization role. Currently every registered account is assigned
/// [`Role::Admin`]; `Viewer` exists so the check in the HTTP layer stays
/// exhaustive when a separate viewer registration path is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Admin,
  Viewer,
}

/// A registered account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id:       Uuid,
  pub username: String,
  /// Argon2 PHC string. Never serialized.
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub role:     Role,
}

/// Input to [`DashboardStore::create_user`](crate::store::DashboardStore::create_user).
/// The `password_hash` must already be hashed — the store never sees
/// cleartext.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  pub password_hash: String,
}

// ─── Payloads ────────────────────────────────────────────────────────────────

/// Body of `POST /api/auth/register`.
///
/// Registration only requires the fields to be present and non-empty; the
/// stricter minimum lengths below apply to the login payload only. The two
/// rule sets are deliberately kept separate.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterPayload {
  pub username: String,
  pub password: String,
}

impl RegisterPayload {
  pub fn validate(&self) -> Result<(), ValidationError> {
    require_non_empty("username", &self.username)?;
    require_non_empty("password", &self.password)?;
    Ok(())
  }
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginPayload {
  pub username: String,
  pub password: String,
}

impl LoginPayload {
  pub fn validate(&self) -> Result<(), ValidationError> {
    require_min_len(
      "username",
      &self.username,
      3,
      "must be at least 3 characters",
    )?;
    require_min_len(
      "password",
      &self.password,
      6,
      "must be at least 6 characters",
    )?;
    Ok(())
  }
}

/// Body of `POST /api/auth/change-password`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
  pub current_password: String,
  pub new_password:     String,
}

impl ChangePasswordPayload {
  pub fn validate(&self) -> Result<(), ValidationError> {
    require_non_empty("currentPassword", &self.current_password)?;
    require_min_len(
      "newPassword",
      &self.new_password,
      6,
      "must be at least 6 characters",
    )?;
    Ok(())
  }
}
