//! [`SqliteStore`] — the SQLite implementation of [`DashboardStore`] and
//! [`SessionStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use gauge_core::{
  measurement::{Measurement, MeasurementPatch, NewMeasurement},
  series::{NewSeries, Series, SeriesPatch},
  session::Session,
  store::{DashboardStore, SessionStore},
  user::{NewUser, Role, User},
};

use crate::{
  Error, Result,
  encode::{
    RawMeasurement, RawSeries, RawSession, RawUser, encode_dt, encode_role,
    encode_uuid,
  },
  error::classify,
  schema::SCHEMA,
};

const USER_COLS: &str = "user_id, username, password, role";
const SERIES_COLS: &str =
  "series_id, name, min_value, max_value, color, icon, created_by_id, created_at";
const MEASUREMENT_COLS: &str =
  "measurement_id, value, timestamp, series_id, created_by_id, created_at";

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    user_id:  row.get(0)?,
    username: row.get(1)?,
    password: row.get(2)?,
    role:     row.get(3)?,
  })
}

fn series_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSeries> {
  Ok(RawSeries {
    series_id:     row.get(0)?,
    name:          row.get(1)?,
    min_value:     row.get(2)?,
    max_value:     row.get(3)?,
    color:         row.get(4)?,
    icon:          row.get(5)?,
    created_by_id: row.get(6)?,
    created_at:    row.get(7)?,
  })
}

fn measurement_from_row(
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<RawMeasurement> {
  Ok(RawMeasurement {
    measurement_id: row.get(0)?,
    value:          row.get(1)?,
    timestamp:      row.get(2)?,
    series_id:      row.get(3)?,
    created_by_id:  row.get(4)?,
    created_at:     row.get(5)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Gauge dashboard store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All requests
/// share the connection; safety relies on the engine's constraint
/// enforcement and single-statement atomicity, not application locking.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Rewrite a session's expiry — test hook for exercising the expiry path.
  #[cfg(test)]
  pub(crate) async fn set_session_expiry(
    &self,
    token: Uuid,
    expires_at: chrono::DateTime<Utc>,
  ) -> Result<()> {
    let token_str = encode_uuid(token);
    let at_str = encode_dt(expires_at);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE sessions SET expires_at = ?2 WHERE token = ?1",
          rusqlite::params![token_str, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── DashboardStore impl ─────────────────────────────────────────────────────

impl DashboardStore for SqliteStore {
  type Error = Error;

  // ── Users ───────────────────────────────────────────────────────────────

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLS} FROM users WHERE user_id = ?1"),
              rusqlite::params![id_str],
              user_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
    let name = username.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLS} FROM users WHERE username = ?1"),
              rusqlite::params![name],
              user_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn create_user(&self, input: NewUser) -> Result<User> {
    // Role is assigned here, unconditionally: every registered account is
    // currently an admin. There is no self-registration path for viewers.
    let user = User {
      id:            Uuid::new_v4(),
      username:      input.username,
      password_hash: input.password_hash,
      role:          Role::Admin,
    };

    let id_str    = encode_uuid(user.id);
    let username  = user.username.clone();
    let password  = user.password_hash.clone();
    let role_str  = encode_role(user.role).to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, username, password, role)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, username, password, role_str],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| classify(e, Some(&user.username)))?;

    Ok(user)
  }

  async fn update_user_password(
    &self,
    id: Uuid,
    password_hash: String,
  ) -> Result<()> {
    let id_str = encode_uuid(id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users SET password = ?2 WHERE user_id = ?1",
          rusqlite::params![id_str, password_hash],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_user(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM users WHERE user_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Series ──────────────────────────────────────────────────────────────

  async fn get_all_series(&self) -> Result<Vec<Series>> {
    let raws: Vec<RawSeries> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SERIES_COLS} FROM series ORDER BY created_at DESC"
        ))?;
        let rows = stmt
          .query_map([], series_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSeries::into_series).collect()
  }

  async fn get_series(&self, id: Uuid) -> Result<Option<Series>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawSeries> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {SERIES_COLS} FROM series WHERE series_id = ?1"),
              rusqlite::params![id_str],
              series_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSeries::into_series).transpose()
  }

  async fn create_series(
    &self,
    input: NewSeries,
    owner_id: Uuid,
  ) -> Result<Series> {
    let series = Series {
      id:            Uuid::new_v4(),
      name:          input.name,
      min_value:     input.min_value,
      max_value:     input.max_value,
      color:         input.color,
      icon:          input.icon,
      created_by_id: owner_id,
      created_at:    Utc::now(),
    };

    let id_str    = encode_uuid(series.id);
    let name      = series.name.clone();
    let min_value = series.min_value;
    let max_value = series.max_value;
    let color     = series.color.clone();
    let icon      = series.icon.clone();
    let owner_str = encode_uuid(series.created_by_id);
    let at_str    = encode_dt(series.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO series (
             series_id, name, min_value, max_value, color, icon,
             created_by_id, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str, name, min_value, max_value, color, icon, owner_str, at_str,
          ],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| classify(e, None))?;

    Ok(series)
  }

  async fn update_series(
    &self,
    id: Uuid,
    patch: SeriesPatch,
  ) -> Result<Option<Series>> {
    let id_str = encode_uuid(id);

    // COALESCE merges the patch with the existing row inside the engine;
    // the table CHECK then re-validates max > min on the merged record.
    let raw: Option<RawSeries> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE series SET
             name      = COALESCE(?2, name),
             min_value = COALESCE(?3, min_value),
             max_value = COALESCE(?4, max_value),
             color     = COALESCE(?5, color),
             icon      = COALESCE(?6, icon)
           WHERE series_id = ?1",
          rusqlite::params![
            id_str,
            patch.name,
            patch.min_value,
            patch.max_value,
            patch.color,
            patch.icon,
          ],
        )?;

        if changed == 0 {
          return Ok(None);
        }

        Ok(
          conn
            .query_row(
              &format!("SELECT {SERIES_COLS} FROM series WHERE series_id = ?1"),
              rusqlite::params![id_str],
              series_from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(|e| classify(e, None))?;

    raw.map(RawSeries::into_series).transpose()
  }

  async fn delete_series(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    // Engine cascade removes the series' measurements in the same statement.
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM series WHERE series_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Measurements ────────────────────────────────────────────────────────

  async fn get_all_measurements(&self) -> Result<Vec<Measurement>> {
    let raws: Vec<RawMeasurement> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {MEASUREMENT_COLS} FROM measurements ORDER BY timestamp DESC"
        ))?;
        let rows = stmt
          .query_map([], measurement_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMeasurement::into_measurement).collect()
  }

  async fn get_measurement(&self, id: Uuid) -> Result<Option<Measurement>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawMeasurement> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {MEASUREMENT_COLS} FROM measurements
                 WHERE measurement_id = ?1"
              ),
              rusqlite::params![id_str],
              measurement_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMeasurement::into_measurement).transpose()
  }

  async fn get_measurements_by_series(
    &self,
    series_id: Uuid,
  ) -> Result<Vec<Measurement>> {
    let series_str = encode_uuid(series_id);

    let raws: Vec<RawMeasurement> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {MEASUREMENT_COLS} FROM measurements
           WHERE series_id = ?1 ORDER BY timestamp DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![series_str], measurement_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMeasurement::into_measurement).collect()
  }

  async fn create_measurement(
    &self,
    input: NewMeasurement,
    owner_id: Uuid,
  ) -> Result<Measurement> {
    let now = Utc::now();
    let measurement = Measurement {
      id:            Uuid::new_v4(),
      value:         input.value,
      timestamp:     input.timestamp.unwrap_or(now),
      series_id:     input.series_id,
      created_by_id: owner_id,
      created_at:    now,
    };

    let id_str     = encode_uuid(measurement.id);
    let value      = measurement.value;
    let ts_str     = encode_dt(measurement.timestamp);
    let series_str = encode_uuid(measurement.series_id);
    let owner_str  = encode_uuid(measurement.created_by_id);
    let at_str     = encode_dt(measurement.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO measurements (
             measurement_id, value, timestamp, series_id,
             created_by_id, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, value, ts_str, series_str, owner_str, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| classify(e, None))?;

    Ok(measurement)
  }

  async fn update_measurement(
    &self,
    id: Uuid,
    patch: MeasurementPatch,
  ) -> Result<Option<Measurement>> {
    let id_str = encode_uuid(id);
    let ts_str = patch.timestamp.map(encode_dt);

    let raw: Option<RawMeasurement> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE measurements SET
             value     = COALESCE(?2, value),
             timestamp = COALESCE(?3, timestamp)
           WHERE measurement_id = ?1",
          rusqlite::params![id_str, patch.value, ts_str],
        )?;

        if changed == 0 {
          return Ok(None);
        }

        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {MEASUREMENT_COLS} FROM measurements
                 WHERE measurement_id = ?1"
              ),
              rusqlite::params![id_str],
              measurement_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMeasurement::into_measurement).transpose()
  }

  async fn delete_measurement(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM measurements WHERE measurement_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── SessionStore impl ───────────────────────────────────────────────────────

impl SessionStore for SqliteStore {
  type Error = Error;

  async fn create_session(&self, user_id: Uuid) -> Result<Session> {
    let session = Session::issue(user_id);

    let token_str = encode_uuid(session.token);
    let user_str  = encode_uuid(session.user_id);
    let at_str    = encode_dt(session.expires_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (token, user_id, expires_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![token_str, user_str, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| classify(e, None))?;

    Ok(session)
  }

  async fn get_session(&self, token: Uuid) -> Result<Option<Session>> {
    let token_str = encode_uuid(token);

    let raw: Option<RawSession> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT token, user_id, expires_at FROM sessions WHERE token = ?1",
              rusqlite::params![token_str],
              |row| {
                Ok(RawSession {
                  token:      row.get(0)?,
                  user_id:    row.get(1)?,
                  expires_at: row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    let session = match raw.map(RawSession::into_session).transpose()? {
      Some(s) => s,
      None => return Ok(None),
    };

    // Expired sessions read as absent; the purge task reclaims the rows.
    if session.is_expired(Utc::now()) {
      return Ok(None);
    }

    Ok(Some(session))
  }

  async fn delete_session(&self, token: Uuid) -> Result<()> {
    let token_str = encode_uuid(token);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM sessions WHERE token = ?1",
          rusqlite::params![token_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn purge_expired_sessions(&self) -> Result<usize> {
    let now_str = encode_dt(Utc::now());

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM sessions WHERE expires_at <= ?1",
          rusqlite::params![now_str],
        )?)
      })
      .await?;

    Ok(removed)
  }
}
