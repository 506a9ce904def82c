//! Series — a named numeric channel with a valid range and display tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validate::{ValidationError, require_finite, require_non_empty};

/// A stored series. `max_value > min_value` holds for every persisted row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
  pub id:            Uuid,
  pub name:          String,
  pub min_value:     f64,
  pub max_value:     f64,
  /// Display token, e.g. `"#3b82f6"`. Opaque to the server.
  pub color:         String,
  /// Display token, e.g. `"Thermometer"`. Opaque to the server.
  pub icon:          String,
  pub created_by_id: Uuid,
  pub created_at:    DateTime<Utc>,
}

/// Body of `POST /api/series`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSeries {
  pub name:      String,
  pub min_value: f64,
  pub max_value: f64,
  pub color:     String,
  pub icon:      String,
}

impl NewSeries {
  pub fn validate(&self) -> Result<(), ValidationError> {
    require_non_empty("name", &self.name)?;
    require_finite("minValue", self.min_value)?;
    require_finite("maxValue", self.max_value)?;
    require_non_empty("color", &self.color)?;
    require_non_empty("icon", &self.icon)?;
    if self.max_value <= self.min_value {
      return Err(ValidationError::new(
        "maxValue",
        "max value must be greater than min value",
      ));
    }
    Ok(())
  }
}

/// Body of `PUT /api/series/{id}` — any subset of mutable fields.
///
/// Per-field constraints are checked here; the `max > min` cross-field
/// invariant is re-checked against the merged record at the storage layer,
/// since either bound may be absent from the patch.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPatch {
  pub name:      Option<String>,
  pub min_value: Option<f64>,
  pub max_value: Option<f64>,
  pub color:     Option<String>,
  pub icon:      Option<String>,
}

impl SeriesPatch {
  pub fn validate(&self) -> Result<(), ValidationError> {
    if let Some(v) = self.min_value {
      require_finite("minValue", v)?;
    }
    if let Some(v) = self.max_value {
      require_finite("maxValue", v)?;
    }
    Ok(())
  }

  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.min_value.is_none()
      && self.max_value.is_none()
      && self.color.is_none()
      && self.icon.is_none()
  }
}
