use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::{classify_window, LifecycleStatus, ScheduleStatus};
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailer_url: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_rating: Option<String>,
    pub release_date: NaiveDate,
    /// Free-form lifecycle label from upstream ("Showing", "Upcoming", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Movie {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(crate::CinemaAdminError::validation(
                "title",
                "movie title must not be empty",
            ));
        }
        if self.duration_minutes == 0 {
            return Err(crate::CinemaAdminError::validation(
                "durationMinutes",
                "runtime must be positive minutes",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReleaseStatus {
    Active,
    Upcoming,
    Ended,
}

/// A release window for a movie. An explicit `status` overrides the
/// date-derived lifecycle entirely; see [`MovieRelease::status_at`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRelease {
    pub id: String,
    pub movie_id: String,
    #[serde(with = "super::instant")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "super::instant")]
    pub end_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReleaseStatus>,
    #[serde(default)]
    pub note: String,
}

impl MovieRelease {
    pub fn validate(&self) -> Result<()> {
        if self.start_date > self.end_date {
            return Err(crate::CinemaAdminError::validation(
                "startDate",
                format!(
                    "start date {} is after end date {}",
                    self.start_date, self.end_date
                ),
            ));
        }
        Ok(())
    }

    pub fn schedule_status(&self) -> ScheduleStatus {
        match self.status {
            Some(explicit) => ScheduleStatus::Explicit(explicit.into()),
            None => ScheduleStatus::Derived,
        }
    }

    /// The lifecycle status at `now`. An explicit status wins outright,
    /// even when the dates contradict it; otherwise the window rule
    /// applies (closed interval on both ends).
    pub fn status_at(&self, now: DateTime<Utc>) -> LifecycleStatus {
        match self.schedule_status() {
            ScheduleStatus::Explicit(status) => status,
            ScheduleStatus::Derived => classify_window(self.start_date, self.end_date, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn release(status: Option<ReleaseStatus>) -> MovieRelease {
        MovieRelease {
            id: "r_001".to_string(),
            movie_id: "m_001".to_string(),
            start_date: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap(),
            status,
            note: String::new(),
        }
    }

    #[test]
    fn explicit_status_overrides_contradicting_dates() {
        let release = release(Some(ReleaseStatus::Ended));
        // Well inside the window, yet the override wins.
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(release.status_at(now), LifecycleStatus::Ended);
    }

    #[test]
    fn derived_status_follows_the_window() {
        let release = release(None);
        let before = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();
        let inside = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2025, 2, 2, 0, 0, 0).unwrap();
        assert_eq!(release.status_at(before), LifecycleStatus::Upcoming);
        assert_eq!(release.status_at(inside), LifecycleStatus::Active);
        assert_eq!(release.status_at(after), LifecycleStatus::Ended);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let release = release(None);
        assert_eq!(release.status_at(release.start_date), LifecycleStatus::Active);
        assert_eq!(release.status_at(release.end_date), LifecycleStatus::Active);
    }

    #[test]
    fn inverted_window_fails_validation() {
        let mut release = release(None);
        std::mem::swap(&mut release.start_date, &mut release.end_date);
        assert!(release.validate().is_err());
    }

    #[test]
    fn date_only_strings_deserialize() {
        let json = r#"{
            "id": "r_002",
            "movieId": "m_003",
            "startDate": "2024-03-01",
            "endDate": "2024-04-15",
            "note": "Nationwide premiere"
        }"#;
        let release: MovieRelease = serde_json::from_str(json).unwrap();
        assert_eq!(release.movie_id, "m_003");
        assert!(release.status.is_none());
        assert!(release.validate().is_ok());
    }
}
