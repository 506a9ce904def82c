//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, TimeZone, Utc};
use gauge_core::{
  measurement::{MeasurementPatch, NewMeasurement},
  series::{NewSeries, SeriesPatch},
  store::{DashboardStore, SessionStore},
  user::{NewUser, Role},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.expect("in-memory store")
}

fn new_user(username: &str) -> NewUser {
  NewUser {
    username:      username.into(),
    password_hash: "$argon2id$v=19$m=19456,t=2,p=1$fakesalt$fakehash".into(),
  }
}

fn temp_series() -> NewSeries {
  NewSeries {
    name:      "Temp".into(),
    min_value: 0.0,
    max_value: 100.0,
    color:     "#3b82f6".into(),
    icon:      "Thermometer".into(),
  }
}

fn reading(series_id: Uuid, value: f64) -> NewMeasurement {
  NewMeasurement { value, series_id, timestamp: None }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_user() {
  let s = store().await;

  let user = s.create_user(new_user("alice")).await.unwrap();
  assert_eq!(user.username, "alice");

  let fetched = s.get_user(user.id).await.unwrap().unwrap();
  assert_eq!(fetched.id, user.id);
  assert_eq!(fetched.username, "alice");
  assert_eq!(fetched.password_hash, user.password_hash);
}

#[tokio::test]
async fn every_new_user_is_assigned_admin() {
  let s = store().await;
  let user = s.create_user(new_user("alice")).await.unwrap();
  assert_eq!(user.role, Role::Admin);

  let fetched = s.get_user(user.id).await.unwrap().unwrap();
  assert_eq!(fetched.role, Role::Admin);
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user(Uuid::new_v4()).await.unwrap().is_none());
  assert!(s.get_user_by_username("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn get_user_by_username() {
  let s = store().await;
  let user = s.create_user(new_user("bob")).await.unwrap();

  let fetched = s.get_user_by_username("bob").await.unwrap().unwrap();
  assert_eq!(fetched.id, user.id);
}

#[tokio::test]
async fn duplicate_username_rejected() {
  let s = store().await;
  s.create_user(new_user("alice")).await.unwrap();

  let err = s.create_user(new_user("alice")).await.unwrap_err();
  assert!(matches!(err, crate::Error::UsernameTaken(ref name) if name == "alice"));
}

#[tokio::test]
async fn update_user_password_overwrites_hash() {
  let s = store().await;
  let user = s.create_user(new_user("alice")).await.unwrap();

  s.update_user_password(user.id, "$argon2id$new".into()).await.unwrap();

  let fetched = s.get_user(user.id).await.unwrap().unwrap();
  assert_eq!(fetched.password_hash, "$argon2id$new");
}

// ─── Series ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_series() {
  let s = store().await;
  let owner = s.create_user(new_user("alice")).await.unwrap();

  let series = s.create_series(temp_series(), owner.id).await.unwrap();
  assert_eq!(series.created_by_id, owner.id);

  let fetched = s.get_series(series.id).await.unwrap().unwrap();
  assert_eq!(fetched.id, series.id);
  assert_eq!(fetched.name, "Temp");
  assert_eq!(fetched.max_value, 100.0);
}

#[tokio::test]
async fn create_series_with_unknown_owner_fails() {
  let s = store().await;
  let err = s.create_series(temp_series(), Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, crate::Error::ForeignKey));
}

#[tokio::test]
async fn all_series_ordered_most_recent_first() {
  let s = store().await;
  let owner = s.create_user(new_user("alice")).await.unwrap();

  let first = s.create_series(temp_series(), owner.id).await.unwrap();
  let second = s.create_series(temp_series(), owner.id).await.unwrap();
  let third = s.create_series(temp_series(), owner.id).await.unwrap();

  let all = s.get_all_series().await.unwrap();
  let ids: Vec<_> = all.iter().map(|x| x.id).collect();
  assert_eq!(ids, vec![third.id, second.id, first.id]);

  // Idempotent: a second read without intervening writes is identical.
  let again = s.get_all_series().await.unwrap();
  assert_eq!(again.iter().map(|x| x.id).collect::<Vec<_>>(), ids);
}

#[tokio::test]
async fn update_series_patches_only_supplied_fields() {
  let s = store().await;
  let owner = s.create_user(new_user("alice")).await.unwrap();
  let series = s.create_series(temp_series(), owner.id).await.unwrap();

  let patch = SeriesPatch { name: Some("CO2".into()), ..Default::default() };
  let updated = s.update_series(series.id, patch).await.unwrap().unwrap();

  assert_eq!(updated.name, "CO2");
  assert_eq!(updated.min_value, 0.0);
  assert_eq!(updated.max_value, 100.0);
  assert_eq!(updated.color, "#3b82f6");
  assert_eq!(updated.created_at, series.created_at);
}

#[tokio::test]
async fn update_series_missing_returns_none() {
  let s = store().await;
  let patch = SeriesPatch { name: Some("CO2".into()), ..Default::default() };
  assert!(s.update_series(Uuid::new_v4(), patch).await.unwrap().is_none());
}

#[tokio::test]
async fn update_series_rechecks_range_on_merged_record() {
  let s = store().await;
  let owner = s.create_user(new_user("alice")).await.unwrap();
  let series = s.create_series(temp_series(), owner.id).await.unwrap();

  // Patching max below the untouched min must fail, not persist.
  let patch = SeriesPatch { max_value: Some(-5.0), ..Default::default() };
  let err = s.update_series(series.id, patch).await.unwrap_err();
  assert!(matches!(err, crate::Error::RangeInvariant));

  let unchanged = s.get_series(series.id).await.unwrap().unwrap();
  assert_eq!(unchanged.max_value, 100.0);

  // Raising both bounds together is fine.
  let patch = SeriesPatch {
    min_value: Some(200.0),
    max_value: Some(300.0),
    ..Default::default()
  };
  let updated = s.update_series(series.id, patch).await.unwrap().unwrap();
  assert_eq!(updated.min_value, 200.0);
  assert_eq!(updated.max_value, 300.0);
}

#[tokio::test]
async fn delete_series_cascades_to_measurements() {
  let s = store().await;
  let owner = s.create_user(new_user("alice")).await.unwrap();
  let series = s.create_series(temp_series(), owner.id).await.unwrap();
  let other = s.create_series(temp_series(), owner.id).await.unwrap();

  s.create_measurement(reading(series.id, 1.0), owner.id).await.unwrap();
  s.create_measurement(reading(series.id, 2.0), owner.id).await.unwrap();
  let kept =
    s.create_measurement(reading(other.id, 3.0), owner.id).await.unwrap();

  s.delete_series(series.id).await.unwrap();

  assert!(s.get_series(series.id).await.unwrap().is_none());
  assert!(s.get_measurements_by_series(series.id).await.unwrap().is_empty());

  // Unrelated series and its measurements survive.
  let remaining = s.get_all_measurements().await.unwrap();
  assert_eq!(remaining.len(), 1);
  assert_eq!(remaining[0].id, kept.id);
}

#[tokio::test]
async fn delete_user_cascades_to_series_and_measurements() {
  let s = store().await;
  let owner = s.create_user(new_user("alice")).await.unwrap();
  let series = s.create_series(temp_series(), owner.id).await.unwrap();
  s.create_measurement(reading(series.id, 1.0), owner.id).await.unwrap();

  s.delete_user(owner.id).await.unwrap();

  assert!(s.get_user(owner.id).await.unwrap().is_none());
  assert!(s.get_all_series().await.unwrap().is_empty());
  assert!(s.get_all_measurements().await.unwrap().is_empty());
}

// ─── Measurements ────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_measurement_defaults_timestamp_to_now() {
  let s = store().await;
  let owner = s.create_user(new_user("alice")).await.unwrap();
  let series = s.create_series(temp_series(), owner.id).await.unwrap();

  let before = Utc::now();
  let m = s.create_measurement(reading(series.id, 5.0), owner.id).await.unwrap();
  let after = Utc::now();

  assert_eq!(m.value, 5.0);
  assert!(m.timestamp >= before && m.timestamp <= after);

  let fetched = s.get_measurement(m.id).await.unwrap().unwrap();
  assert_eq!(fetched.value, 5.0);
  assert_eq!(fetched.timestamp, m.timestamp);
}

#[tokio::test]
async fn create_measurement_respects_explicit_timestamp() {
  let s = store().await;
  let owner = s.create_user(new_user("alice")).await.unwrap();
  let series = s.create_series(temp_series(), owner.id).await.unwrap();

  let ts = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
  let m = s
    .create_measurement(
      NewMeasurement { value: 7.5, series_id: series.id, timestamp: Some(ts) },
      owner.id,
    )
    .await
    .unwrap();

  assert_eq!(m.timestamp, ts);
  assert_ne!(m.timestamp, m.created_at);
}

#[tokio::test]
async fn create_measurement_with_unknown_series_fails() {
  let s = store().await;
  let owner = s.create_user(new_user("alice")).await.unwrap();

  let err = s
    .create_measurement(reading(Uuid::new_v4(), 1.0), owner.id)
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::ForeignKey));
}

#[tokio::test]
async fn measurements_ordered_by_semantic_timestamp_desc() {
  let s = store().await;
  let owner = s.create_user(new_user("alice")).await.unwrap();
  let series = s.create_series(temp_series(), owner.id).await.unwrap();

  let t1 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
  let t2 = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
  let t3 = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();

  // Insert out of order; ordering must follow the semantic timestamp,
  // not the creation time.
  let m2 = s
    .create_measurement(
      NewMeasurement { value: 2.0, series_id: series.id, timestamp: Some(t2) },
      owner.id,
    )
    .await
    .unwrap();
  let m3 = s
    .create_measurement(
      NewMeasurement { value: 3.0, series_id: series.id, timestamp: Some(t3) },
      owner.id,
    )
    .await
    .unwrap();
  let m1 = s
    .create_measurement(
      NewMeasurement { value: 1.0, series_id: series.id, timestamp: Some(t1) },
      owner.id,
    )
    .await
    .unwrap();

  let all = s.get_all_measurements().await.unwrap();
  let ids: Vec<_> = all.iter().map(|m| m.id).collect();
  assert_eq!(ids, vec![m3.id, m2.id, m1.id]);

  let filtered = s.get_measurements_by_series(series.id).await.unwrap();
  let ids: Vec<_> = filtered.iter().map(|m| m.id).collect();
  assert_eq!(ids, vec![m3.id, m2.id, m1.id]);
}

#[tokio::test]
async fn measurements_by_series_filters() {
  let s = store().await;
  let owner = s.create_user(new_user("alice")).await.unwrap();
  let a = s.create_series(temp_series(), owner.id).await.unwrap();
  let b = s.create_series(temp_series(), owner.id).await.unwrap();

  s.create_measurement(reading(a.id, 1.0), owner.id).await.unwrap();
  s.create_measurement(reading(b.id, 2.0), owner.id).await.unwrap();

  let only_a = s.get_measurements_by_series(a.id).await.unwrap();
  assert_eq!(only_a.len(), 1);
  assert!(only_a.iter().all(|m| m.series_id == a.id));
}

#[tokio::test]
async fn value_is_not_range_checked_against_series_bounds() {
  let s = store().await;
  let owner = s.create_user(new_user("alice")).await.unwrap();
  let series = s.create_series(temp_series(), owner.id).await.unwrap();

  // [0, 100] series accepts 150 — range enforcement is a presentation
  // concern.
  let m =
    s.create_measurement(reading(series.id, 150.0), owner.id).await.unwrap();
  assert_eq!(m.value, 150.0);
}

#[tokio::test]
async fn update_measurement_value_leaves_timestamp_untouched() {
  let s = store().await;
  let owner = s.create_user(new_user("alice")).await.unwrap();
  let series = s.create_series(temp_series(), owner.id).await.unwrap();

  let ts = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
  let m = s
    .create_measurement(
      NewMeasurement { value: 1.0, series_id: series.id, timestamp: Some(ts) },
      owner.id,
    )
    .await
    .unwrap();

  let patch = MeasurementPatch { value: Some(9.0), ..Default::default() };
  let updated = s.update_measurement(m.id, patch).await.unwrap().unwrap();

  assert_eq!(updated.value, 9.0);
  assert_eq!(updated.timestamp, ts);
  assert_eq!(updated.created_at, m.created_at);
}

#[tokio::test]
async fn update_measurement_timestamp_independently() {
  let s = store().await;
  let owner = s.create_user(new_user("alice")).await.unwrap();
  let series = s.create_series(temp_series(), owner.id).await.unwrap();
  let m = s.create_measurement(reading(series.id, 1.0), owner.id).await.unwrap();

  let ts = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap();
  let patch = MeasurementPatch { timestamp: Some(ts), ..Default::default() };
  let updated = s.update_measurement(m.id, patch).await.unwrap().unwrap();

  assert_eq!(updated.timestamp, ts);
  assert_eq!(updated.value, 1.0);
}

#[tokio::test]
async fn update_measurement_missing_returns_none() {
  let s = store().await;
  let patch = MeasurementPatch { value: Some(1.0), ..Default::default() };
  assert!(
    s.update_measurement(Uuid::new_v4(), patch).await.unwrap().is_none()
  );
}

#[tokio::test]
async fn delete_measurement() {
  let s = store().await;
  let owner = s.create_user(new_user("alice")).await.unwrap();
  let series = s.create_series(temp_series(), owner.id).await.unwrap();
  let m = s.create_measurement(reading(series.id, 1.0), owner.id).await.unwrap();

  s.delete_measurement(m.id).await.unwrap();
  assert!(s.get_measurement(m.id).await.unwrap().is_none());

  // Deleting again is a no-op, not an error.
  s.delete_measurement(m.id).await.unwrap();
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_resolve_session() {
  let s = store().await;
  let user = s.create_user(new_user("alice")).await.unwrap();

  let session = s.create_session(user.id).await.unwrap();
  assert_eq!(session.user_id, user.id);

  let resolved = s.get_session(session.token).await.unwrap().unwrap();
  assert_eq!(resolved.user_id, user.id);
  assert_eq!(resolved.expires_at, session.expires_at);
}

#[tokio::test]
async fn session_for_unknown_user_fails() {
  let s = store().await;
  let err = s.create_session(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, crate::Error::ForeignKey));
}

#[tokio::test]
async fn expired_session_reads_as_none() {
  let s = store().await;
  let user = s.create_user(new_user("alice")).await.unwrap();
  let session = s.create_session(user.id).await.unwrap();

  s.set_session_expiry(session.token, Utc::now() - Duration::seconds(1))
    .await
    .unwrap();

  assert!(s.get_session(session.token).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_session_destroys_record() {
  let s = store().await;
  let user = s.create_user(new_user("alice")).await.unwrap();
  let session = s.create_session(user.id).await.unwrap();

  s.delete_session(session.token).await.unwrap();
  assert!(s.get_session(session.token).await.unwrap().is_none());
}

#[tokio::test]
async fn purge_removes_only_expired_sessions() {
  let s = store().await;
  let user = s.create_user(new_user("alice")).await.unwrap();

  let stale = s.create_session(user.id).await.unwrap();
  let live = s.create_session(user.id).await.unwrap();
  s.set_session_expiry(stale.token, Utc::now() - Duration::days(1))
    .await
    .unwrap();

  let removed = s.purge_expired_sessions().await.unwrap();
  assert_eq!(removed, 1);

  assert!(s.get_session(live.token).await.unwrap().is_some());
}

#[tokio::test]
async fn deleting_user_cascades_sessions() {
  let s = store().await;
  let user = s.create_user(new_user("alice")).await.unwrap();
  let session = s.create_session(user.id).await.unwrap();

  s.delete_user(user.id).await.unwrap();
  assert!(s.get_session(session.token).await.unwrap().is_none());
}
