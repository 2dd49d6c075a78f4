//! Free-text and categorical narrowing of fetched collections.
//!
//! Matching is Unicode-lowercase substring matching, nothing more: no
//! accent folding, so "ha noi" does not find "Hà Nội" while "hà nội"
//! does. Order of the input is always preserved.

use crate::domain::{Cinema, Hall, Movie, Reservation, Review, Staff};

/// Fields a record exposes to free-text search. A record matches when any
/// field contains the query substring.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for Cinema {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.city]
    }
}

impl Searchable for Hall {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name]
    }
}

impl Searchable for Movie {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.title]
    }
}

impl Searchable for Reservation {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.user_name, &self.movie_title, &self.cinema_name]
    }
}

impl Searchable for Review {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.movie_title, &self.user_name, &self.content]
    }
}

impl Searchable for Staff {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.email, &self.role]
    }
}

/// True when the query is empty or any field contains it,
/// case-insensitively.
pub fn matches_query(fields: &[&str], query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Keeps the records matching `query`, preserving input order.
pub fn search<T: Searchable>(mut items: Vec<T>, query: &str) -> Vec<T> {
    if query.is_empty() {
        return items;
    }
    items.retain(|item| matches_query(&item.search_fields(), query));
    items
}

/// A categorical filter dimension with the "all" sentinel meaning
/// "no filter". Combines with other predicates by AND at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }
}

impl<T> Selection<T> {
    /// Parses a query-string parameter. Absent or "all" selects
    /// everything; otherwise `parse` decides, and an unrecognized value
    /// yields `None` so the caller can reject it.
    pub fn from_param<F>(raw: Option<&str>, parse: F) -> Option<Self>
    where
        F: FnOnce(&str) -> Option<T>,
    {
        match raw {
            None => Some(Selection::All),
            Some("all") => Some(Selection::All),
            Some(other) => parse(other).map(Selection::Only),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CinemaStatus, ReservationStatus};
    use chrono::Utc;
    use std::collections::HashMap;

    fn cinema(id: &str, name: &str, city: &str) -> Cinema {
        Cinema {
            id: id.to_string(),
            name: name.to_string(),
            address: String::new(),
            city: city.to_string(),
            district: None,
            phone: None,
            email: None,
            website: None,
            latitude: None,
            longitude: None,
            description: None,
            amenities: vec![],
            images: vec![],
            rating: None,
            total_reviews: 0,
            operating_hours: HashMap::new(),
            status: CinemaStatus::Active,
            timezone: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample() -> Vec<Cinema> {
        vec![
            cinema("c1", "CGV Vincom Landmark 81", "Hồ Chí Minh City"),
            cinema("c2", "Lotte Cinema Cầu Giấy", "Hà Nội"),
            cinema("c3", "Galaxy Cinema Đà Nẵng", "Đà Nẵng"),
        ]
    }

    #[test]
    fn empty_query_returns_everything_in_order() {
        let result = search(sample(), "");
        let ids: Vec<_> = result.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn matches_any_designated_field() {
        // "lotte" hits the name, "minh" hits the city.
        assert_eq!(search(sample(), "lotte").len(), 1);
        assert_eq!(search(sample(), "minh")[0].id, "c1");
    }

    #[test]
    fn filtering_is_idempotent() {
        let once = search(sample(), "cinema");
        let twice = search(once.clone(), "cinema");
        let ids = |v: &[Cinema]| v.iter().map(|c| c.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn accented_text_lowercases_but_does_not_fold() {
        let hanoi = search(sample(), "hà nội");
        assert_eq!(hanoi.len(), 1);
        assert_eq!(hanoi[0].id, "c2");
        // ASCII spelling finds nothing: no accent folding.
        assert!(search(sample(), "ha noi").is_empty());
    }

    #[test]
    fn selection_sentinel_and_exact_match() {
        let all: Selection<ReservationStatus> =
            Selection::from_param(Some("all"), |_| None).unwrap();
        assert!(all.admits(&ReservationStatus::Pending));

        let only = Selection::Only(ReservationStatus::Confirmed);
        assert!(only.admits(&ReservationStatus::Confirmed));
        assert!(!only.admits(&ReservationStatus::Cancelled));

        let invalid: Option<Selection<ReservationStatus>> =
            Selection::from_param(Some("bogus"), |_| None);
        assert!(invalid.is_none());
    }
}
