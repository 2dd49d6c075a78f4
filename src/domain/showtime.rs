use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stats::occupancy_pct;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShowtimeStatus {
    Scheduled,
    Selling,
    SoldOut,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Showtime {
    pub id: String,
    pub movie_id: String,
    pub cinema_id: String,
    pub hall_id: String,
    #[serde(with = "super::instant")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "super::instant")]
    pub end_time: DateTime<Utc>,
    pub format: String,
    pub language: String,
    #[serde(default)]
    pub subtitles: Vec<String>,
    pub base_price: f64,
    pub available_seats: u32,
    pub total_seats: u32,
    pub status: ShowtimeStatus,
}

impl Showtime {
    pub fn validate(&self) -> Result<()> {
        if self.end_time <= self.start_time {
            return Err(crate::CinemaAdminError::validation(
                "end_time",
                format!(
                    "end time {} is not after start time {}",
                    self.end_time, self.start_time
                ),
            ));
        }
        if self.available_seats > self.total_seats {
            return Err(crate::CinemaAdminError::validation(
                "available_seats",
                format!(
                    "{} available exceeds {} total",
                    self.available_seats, self.total_seats
                ),
            ));
        }
        if self.base_price < 0.0 {
            return Err(crate::CinemaAdminError::validation(
                "base_price",
                "price must not be negative",
            ));
        }
        Ok(())
    }

    /// Fill rate as a percentage; `None` when the hall reports zero seats.
    pub fn occupancy(&self) -> Option<f64> {
        occupancy_pct(self.total_seats, self.available_seats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn showtime(available: u32, total: u32) -> Showtime {
        Showtime {
            id: "st_001".to_string(),
            movie_id: "m_001".to_string(),
            cinema_id: "c_hcm_001".to_string(),
            hall_id: "h_lm81_imax".to_string(),
            start_time: Utc.with_ymd_and_hms(2025, 1, 15, 19, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2025, 1, 15, 21, 43, 0).unwrap(),
            format: "IMAX 3D".to_string(),
            language: "English".to_string(),
            subtitles: vec!["Vietnamese".to_string()],
            base_price: 180_000.0,
            available_seats: available,
            total_seats: total,
            status: ShowtimeStatus::Selling,
        }
    }

    #[test]
    fn oversold_showtime_fails_validation() {
        assert!(showtime(351, 350).validate().is_err());
        assert!(showtime(150, 350).validate().is_ok());
    }

    #[test]
    fn end_must_follow_start() {
        let mut st = showtime(10, 50);
        st.end_time = st.start_time;
        assert!(st.validate().is_err());
    }

    #[test]
    fn sold_out_show_is_fully_occupied() {
        assert_eq!(showtime(0, 50).occupancy(), Some(100.0));
        assert_eq!(showtime(0, 0).occupancy(), None);
    }

    #[test]
    fn status_uses_upstream_spelling() {
        assert_eq!(
            serde_json::to_string(&ShowtimeStatus::SoldOut).unwrap(),
            "\"SOLD_OUT\""
        );
    }
}
