//! Measurements — timestamped numeric readings belonging to one series.
//!
//! `timestamp` is the semantic measurement time, independently settable and
//! distinct from the server-assigned `created_at`. The value is NOT checked
//! against the owning series' range; that enforcement lives in the
//! presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validate::{ValidationError, require_finite};

/// A stored measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
  pub id:            Uuid,
  pub value:         f64,
  pub timestamp:     DateTime<Utc>,
  pub series_id:     Uuid,
  pub created_by_id: Uuid,
  pub created_at:    DateTime<Utc>,
}

/// Body of `POST /api/measurements`. A missing `timestamp` means "server
/// now", assigned by the store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMeasurement {
  pub value:     f64,
  pub series_id: Uuid,
  pub timestamp: Option<DateTime<Utc>>,
}

impl NewMeasurement {
  pub fn validate(&self) -> Result<(), ValidationError> {
    require_finite("value", self.value)?;
    Ok(())
  }
}

/// Body of `PUT /api/measurements/{id}` — `value` and `timestamp` patch
/// independently.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementPatch {
  pub value:     Option<f64>,
  pub timestamp: Option<DateTime<Utc>>,
}

impl MeasurementPatch {
  pub fn validate(&self) -> Result<(), ValidationError> {
    if let Some(v) = self.value {
      require_finite("value", v)?;
    }
    Ok(())
  }

  pub fn is_empty(&self) -> bool {
    self.value.is_none() && self.timestamp.is_none()
  }
}
