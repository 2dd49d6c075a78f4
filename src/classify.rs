//! Lifecycle classification for time-windowed records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::ReleaseStatus;

/// Where a time-bounded record sits in its existence. Display renders the
/// lowercase form the dashboard shows in badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStatus {
    Upcoming,
    Active,
    Ended,
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LifecycleStatus::Upcoming => "upcoming",
            LifecycleStatus::Active => "active",
            LifecycleStatus::Ended => "ended",
        };
        f.write_str(label)
    }
}

impl LifecycleStatus {
    /// Parses the lowercase badge form, for query-string filters.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "upcoming" => Some(Self::Upcoming),
            "active" => Some(Self::Active),
            "ended" => Some(Self::Ended),
            _ => None,
        }
    }
}

impl From<ReleaseStatus> for LifecycleStatus {
    fn from(status: ReleaseStatus) -> Self {
        match status {
            ReleaseStatus::Active => Self::Active,
            ReleaseStatus::Upcoming => Self::Upcoming,
            ReleaseStatus::Ended => Self::Ended,
        }
    }
}

/// How a record's lifecycle status is determined. An explicit status is an
/// override, not a hint: date computation is bypassed entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleStatus {
    Explicit(LifecycleStatus),
    Derived,
}

/// Date-window rule: strictly before the window is upcoming, strictly
/// after is ended, everything else (both bounds included) is active.
pub fn classify_window(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> LifecycleStatus {
    if now < start {
        LifecycleStatus::Upcoming
    } else if now > end {
        LifecycleStatus::Ended
    } else {
        LifecycleStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn window_rule_covers_all_branches() {
        let (start, end) = (ts(10, 0), ts(20, 0));
        assert_eq!(classify_window(start, end, ts(5, 0)), LifecycleStatus::Upcoming);
        assert_eq!(classify_window(start, end, ts(15, 0)), LifecycleStatus::Active);
        assert_eq!(classify_window(start, end, ts(25, 0)), LifecycleStatus::Ended);
    }

    #[test]
    fn bounds_are_part_of_the_window() {
        let (start, end) = (ts(10, 0), ts(20, 0));
        assert_eq!(classify_window(start, end, start), LifecycleStatus::Active);
        assert_eq!(classify_window(start, end, end), LifecycleStatus::Active);
    }

    #[test]
    fn display_is_lowercase_badge_text() {
        assert_eq!(LifecycleStatus::Upcoming.to_string(), "upcoming");
        assert_eq!(LifecycleStatus::parse("ended"), Some(LifecycleStatus::Ended));
        assert_eq!(LifecycleStatus::parse("ENDED"), None);
    }
}
