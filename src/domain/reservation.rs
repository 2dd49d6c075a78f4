use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

/// A ticket reservation as the reporting side sees it: foreign keys plus
/// the denormalized display names the upstream fetch already resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub movie_title: String,
    pub cinema_name: String,
    #[serde(with = "super::instant")]
    pub showtime: DateTime<Utc>,
    pub seats: Vec<String>,
    pub total_amount: f64,
    pub status: ReservationStatus,
    pub payment_status: PaymentStatus,
    #[serde(with = "super::instant", default = "super::now")]
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn validate(&self) -> Result<()> {
        if self.seats.is_empty() {
            return Err(crate::CinemaAdminError::validation(
                "seats",
                "a reservation must hold at least one seat",
            ));
        }
        if self.total_amount < 0.0 {
            return Err(crate::CinemaAdminError::validation(
                "totalAmount",
                "amount must not be negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn reservation(seats: Vec<&str>) -> Reservation {
        Reservation {
            id: "rsv_001".to_string(),
            user_id: "u_001".to_string(),
            user_name: "Nguyễn Văn A".to_string(),
            movie_title: "Oppenheimer".to_string(),
            cinema_name: "CGV Vincom Landmark 81".to_string(),
            showtime: Utc::now(),
            seats: seats.into_iter().map(String::from).collect(),
            total_amount: 360_000.0,
            status: ReservationStatus::Confirmed,
            payment_status: PaymentStatus::Paid,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn seatless_reservation_is_rejected() {
        assert!(reservation(vec![]).validate().is_err());
        assert!(reservation(vec!["G7", "G8"]).validate().is_ok());
    }

    #[test]
    fn payment_status_round_trips() {
        let json = serde_json::to_string(&PaymentStatus::Refunded).unwrap();
        assert_eq!(json, "\"REFUNDED\"");
    }
}
