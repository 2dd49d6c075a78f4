pub mod cinema;
pub mod hall;
pub mod movie;
pub mod reservation;
pub mod review;
pub mod showtime;
pub mod staff;

pub use cinema::*;
pub use hall::*;
pub use movie::*;
pub use reservation::*;
pub use review::*;
pub use showtime::*;
pub use staff::*;

use crate::{CinemaAdminError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Parse a timestamp the way upstream clients send them: RFC 3339 first,
/// then the datetime-local shapes forms produce, then a bare date
/// (midnight UTC), then epoch millis.
pub fn parse_instant(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    if let Ok(millis) = value.parse::<i64>() {
        if let Some(dt) = DateTime::from_timestamp_millis(millis) {
            return Ok(dt);
        }
    }

    Err(CinemaAdminError::InvalidTimestamp(value.to_string()))
}

/// Serde adapter for fields carrying lenient timestamps.
pub mod instant {
    use super::parse_instant;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_instant(&raw).map_err(serde::de::Error::custom)
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }
}

pub(crate) fn now() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_rfc3339_with_offset() {
        let dt = parse_instant("2025-01-15T19:00:00+07:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap());
    }

    #[test]
    fn parses_datetime_local_without_seconds() {
        let dt = parse_instant("2025-01-15T19:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 1, 15, 19, 0, 0).unwrap());
    }

    #[test]
    fn parses_bare_date_as_midnight_utc() {
        let dt = parse_instant("2023-07-12").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2023, 7, 12, 0, 0, 0).unwrap());
    }

    #[test]
    fn parses_epoch_millis() {
        let dt = parse_instant("1700000000000").unwrap();
        assert_eq!(dt.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_instant("next tuesday").is_err());
    }
}
