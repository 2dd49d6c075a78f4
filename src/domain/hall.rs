use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HallType {
    Standard,
    Vip,
    Imax,
    FourDx,
    Premium,
}

/// A screening hall. `cinema_id` is expected to reference a known cinema;
/// an unresolved reference degrades to an "Unknown Cinema" bucket at the
/// consumers, it never errors here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hall {
    pub id: String,
    pub cinema_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub hall_type: HallType,
    pub capacity: u32,
    pub rows: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_system: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    /// Free-form; rendered through a color lookup with a fallback for
    /// unknown values, so no enum here.
    #[serde(default)]
    pub status: String,
    #[serde(with = "super::instant", default = "super::now")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "super::instant", default = "super::now")]
    pub updated_at: DateTime<Utc>,
}

impl Hall {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(crate::CinemaAdminError::validation(
                "name",
                "hall name must not be empty",
            ));
        }
        if self.capacity == 0 {
            return Err(crate::CinemaAdminError::validation(
                "capacity",
                "capacity must be positive",
            ));
        }
        if self.rows == 0 {
            return Err(crate::CinemaAdminError::validation(
                "rows",
                "rows must be positive",
            ));
        }
        Ok(())
    }
}
