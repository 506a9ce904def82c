//! Sessions — server-persisted records binding an opaque client-held token
//! to a user id, with a fixed absolute expiry.
//!
//! A session is not a domain entity: it is never exposed through the API and
//! lives in its own keyspace with its own lifecycle.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Absolute session lifetime. Expiry is fixed at creation, independent of
/// activity.
pub const SESSION_TTL_DAYS: i64 = 30;

#[derive(Debug, Clone)]
pub struct Session {
  /// Opaque token delivered to the client in an HTTP-only cookie.
  pub token:      Uuid,
  pub user_id:    Uuid,
  pub expires_at: DateTime<Utc>,
}

impl Session {
  /// Build a fresh session for `user_id`, expiring [`SESSION_TTL_DAYS`]
  /// from now.
  pub fn issue(user_id: Uuid) -> Self {
    Self {
      token: Uuid::new_v4(),
      user_id,
      expires_at: Utc::now() + Duration::days(SESSION_TTL_DAYS),
    }
  }

  pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
    self.expires_at <= now
  }
}
