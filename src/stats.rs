//! Scalar summaries over fetched collections.
//!
//! Zero-denominator cases return `None` ("no data") instead of the NaN
//! the naive division would produce; serialized summaries simply omit the
//! field.

use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

use crate::domain::{Reservation, ReservationStatus, Review};

/// Mean of the values, `None` for an empty slice.
pub fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Rounds to one decimal place for display.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Fill rate as a percentage of seats sold; `None` when there are no
/// seats to sell.
pub fn occupancy_pct(total_seats: u32, available_seats: u32) -> Option<f64> {
    if total_seats == 0 {
        return None;
    }
    let sold = total_seats.saturating_sub(available_seats);
    Some(sold as f64 / total_seats as f64 * 100.0)
}

/// Counts per encountered key (first-appearance order) plus the total.
#[derive(Debug, Clone, Serialize)]
pub struct Tally<K: Eq + Hash> {
    pub total: usize,
    pub counts: Vec<(K, usize)>,
}

impl<K: Eq + Hash + Clone> Tally<K> {
    pub fn count(&self, key: &K) -> usize {
        self.counts
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

pub fn tally_by<T, K, F>(items: &[T], key_of: F) -> Tally<K>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut counts: Vec<(K, usize)> = Vec::new();
    let mut index: HashMap<K, usize> = HashMap::new();
    for item in items {
        let key = key_of(item);
        match index.get(&key) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }
    Tally { total: items.len(), counts }
}

/// The reviews page summary card: total, one-decimal average, positive
/// (4 stars and up) and negative (2 and below) counts.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewStats {
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
    pub positive: usize,
    pub negative: usize,
}

impl ReviewStats {
    pub fn compute(reviews: &[Review]) -> Self {
        let ratings: Vec<f64> = reviews.iter().map(|r| f64::from(r.rating)).collect();
        Self {
            total: reviews.len(),
            average: average(&ratings).map(round1),
            positive: reviews.iter().filter(|r| r.rating >= 4).count(),
            negative: reviews.iter().filter(|r| r.rating <= 2).count(),
        }
    }
}

/// The reservations page summary card.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationStats {
    pub total: usize,
    pub confirmed: usize,
    pub pending: usize,
    pub cancelled: usize,
}

impl ReservationStats {
    pub fn compute(reservations: &[Reservation]) -> Self {
        let tally = tally_by(reservations, |r| r.status);
        Self {
            total: tally.total,
            confirmed: tally.count(&ReservationStatus::Confirmed),
            pending: tally.count(&ReservationStatus::Pending),
            cancelled: tally.count(&ReservationStatus::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PaymentStatus, ReviewStatus};
    use chrono::Utc;

    #[test]
    fn average_of_ratings_rounds_to_one_decimal() {
        assert_eq!(average(&[5.0, 4.0, 3.0]).map(round1), Some(4.0));
        assert_eq!(average(&[5.0, 4.0]).map(round1), Some(4.5));
    }

    #[test]
    fn empty_collection_yields_no_data_not_nan() {
        assert_eq!(average(&[]), None);
        let stats = ReviewStats::compute(&[]);
        assert_eq!(stats.average, None);
        assert_eq!(stats.total, 0);
        // "no data" surfaces as an absent field, never NaN.
        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("average").is_none());
    }

    #[test]
    fn occupancy_guards_zero_seats() {
        assert_eq!(occupancy_pct(50, 0), Some(100.0));
        assert_eq!(occupancy_pct(50, 50), Some(0.0));
        let partial = occupancy_pct(350, 150).unwrap();
        assert!((partial - 200.0 / 350.0 * 100.0).abs() < f64::EPSILON);
        assert_eq!(occupancy_pct(0, 0), None);
    }

    fn review(rating: u8) -> Review {
        Review {
            id: format!("rev_{rating}"),
            movie_id: "m_001".to_string(),
            movie_title: "Dune: Part Two".to_string(),
            user_id: "u_001".to_string(),
            user_name: "reviewer".to_string(),
            rating,
            content: String::new(),
            likes: 0,
            dislikes: 0,
            replies_count: 0,
            verified_watched: false,
            status: ReviewStatus::Active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn review_stats_partition_by_sentiment() {
        let reviews: Vec<Review> = [5, 4, 3, 2, 1].into_iter().map(review).collect();
        let stats = ReviewStats::compute(&reviews);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.average, Some(3.0));
        assert_eq!(stats.positive, 2);
        assert_eq!(stats.negative, 2);
    }

    fn reservation(status: ReservationStatus) -> Reservation {
        Reservation {
            id: "rsv".to_string(),
            user_id: "u".to_string(),
            user_name: "user".to_string(),
            movie_title: "Oppenheimer".to_string(),
            cinema_name: "Lotte Cinema Cầu Giấy".to_string(),
            showtime: Utc::now(),
            seats: vec!["A1".to_string()],
            total_amount: 90_000.0,
            status,
            payment_status: PaymentStatus::Paid,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn reservation_tally_counts_each_status() {
        let reservations = vec![
            reservation(ReservationStatus::Confirmed),
            reservation(ReservationStatus::Confirmed),
            reservation(ReservationStatus::Pending),
            reservation(ReservationStatus::Cancelled),
        ];
        let stats = ReservationStats::compute(&reservations);
        assert_eq!((stats.total, stats.confirmed, stats.pending, stats.cancelled), (4, 2, 1, 1));
    }

    #[test]
    fn tally_preserves_first_appearance_order() {
        let tally = tally_by(&["b", "a", "b", "c"], |s| *s);
        assert_eq!(tally.counts, vec![("b", 2), ("a", 1), ("c", 1)]);
        assert_eq!(tally.count(&"missing"), 0);
    }
}
