//! In-memory catalog store.
//!
//! The authoritative data lives in the upstream system; this store holds
//! the admin service's working copy, replaced record-for-record through
//! CRUD calls. Listings come back in insertion order, which is the order
//! the grouping and filtering engines are specified against.

use dashmap::DashMap;
use serde::Deserialize;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::{
    Cinema, Hall, Movie, MovieRelease, Reservation, Review, Showtime, Staff,
};
use crate::{CinemaAdminError, Result};

#[derive(Debug, Clone)]
struct Stored<T> {
    seq: u64,
    value: T,
}

/// One entity collection: id-keyed rows plus an insertion sequence so
/// `list` is deterministic.
#[derive(Debug)]
pub struct Shelf<T> {
    resource: &'static str,
    rows: DashMap<String, Stored<T>>,
    next_seq: AtomicU64,
}

impl<T: Clone> Shelf<T> {
    fn new(resource: &'static str) -> Self {
        Self {
            resource,
            rows: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    pub fn insert(&self, id: impl Into<String>, value: T) {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        self.rows.insert(id.into(), Stored { seq, value });
    }

    pub fn get(&self, id: &str) -> Result<T> {
        self.rows
            .get(id)
            .map(|row| row.value.clone())
            .ok_or_else(|| CinemaAdminError::not_found(self.resource, id))
    }

    /// Replaces an existing row in place, keeping its position in the
    /// listing order.
    pub fn replace(&self, id: &str, value: T) -> Result<()> {
        let mut row = self
            .rows
            .get_mut(id)
            .ok_or_else(|| CinemaAdminError::not_found(self.resource, id))?;
        row.value = value;
        Ok(())
    }

    pub fn remove(&self, id: &str) -> Result<T> {
        self.rows
            .remove(id)
            .map(|(_, row)| row.value)
            .ok_or_else(|| CinemaAdminError::not_found(self.resource, id))
    }

    pub fn list(&self) -> Vec<T> {
        let mut rows: Vec<(u64, T)> = self
            .rows
            .iter()
            .map(|row| (row.seq, row.value.clone()))
            .collect();
        rows.sort_by_key(|(seq, _)| *seq);
        rows.into_iter().map(|(_, value)| value).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub struct MemoryStore {
    pub cinemas: Shelf<Cinema>,
    pub halls: Shelf<Hall>,
    pub movies: Shelf<Movie>,
    pub releases: Shelf<MovieRelease>,
    pub showtimes: Shelf<Showtime>,
    pub reservations: Shelf<Reservation>,
    pub reviews: Shelf<Review>,
    pub staff: Shelf<Staff>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            cinemas: Shelf::new("cinema"),
            halls: Shelf::new("hall"),
            movies: Shelf::new("movie"),
            releases: Shelf::new("movie-release"),
            showtimes: Shelf::new("showtime"),
            reservations: Shelf::new("reservation"),
            reviews: Shelf::new("review"),
            staff: Shelf::new("staff"),
        }
    }

    /// Loads a seed catalog, validating every record first so a bad seed
    /// file fails loudly instead of planting invalid rows. Returns the
    /// number of records loaded.
    pub fn load_seed(&self, seed: SeedData) -> Result<usize> {
        let mut loaded = 0;

        for cinema in seed.cinemas {
            cinema.validate()?;
            self.cinemas.insert(cinema.id.clone(), cinema);
            loaded += 1;
        }
        for hall in seed.halls {
            hall.validate()?;
            self.halls.insert(hall.id.clone(), hall);
            loaded += 1;
        }
        for movie in seed.movies {
            movie.validate()?;
            self.movies.insert(movie.id.clone(), movie);
            loaded += 1;
        }
        for release in seed.movie_releases {
            release.validate()?;
            self.releases.insert(release.id.clone(), release);
            loaded += 1;
        }
        for showtime in seed.showtimes {
            showtime.validate()?;
            self.showtimes.insert(showtime.id.clone(), showtime);
            loaded += 1;
        }
        for reservation in seed.reservations {
            reservation.validate()?;
            self.reservations.insert(reservation.id.clone(), reservation);
            loaded += 1;
        }
        for review in seed.reviews {
            review.validate()?;
            self.reviews.insert(review.id.clone(), review);
            loaded += 1;
        }
        for member in seed.staff {
            member.validate()?;
            self.staff.insert(member.id.clone(), member);
            loaded += 1;
        }

        Ok(loaded)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Initial catalog, the counterpart of the dashboard's mock data. Every
/// collection is optional.
#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub cinemas: Vec<Cinema>,
    #[serde(default)]
    pub halls: Vec<Hall>,
    #[serde(default)]
    pub movies: Vec<Movie>,
    #[serde(default)]
    pub movie_releases: Vec<MovieRelease>,
    #[serde(default)]
    pub showtimes: Vec<Showtime>,
    #[serde(default)]
    pub reservations: Vec<Reservation>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub staff: Vec<Staff>,
}

pub fn load_seed_file<P: AsRef<Path>>(path: P) -> Result<SeedData> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CinemaStatus;
    use chrono::Utc;
    use std::collections::HashMap;

    fn cinema(id: &str, name: &str) -> Cinema {
        Cinema {
            id: id.to_string(),
            name: name.to_string(),
            address: String::new(),
            city: "Hà Nội".to_string(),
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

    #[test]
    fn list_preserves_insertion_order() {
        let store = MemoryStore::new();
        for id in ["c3", "c1", "c2"] {
            store.cinemas.insert(id, cinema(id, id));
        }
        let ids: Vec<_> = store.cinemas.list().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["c3", "c1", "c2"]);
    }

    #[test]
    fn replace_keeps_listing_position() {
        let store = MemoryStore::new();
        store.cinemas.insert("c1", cinema("c1", "before"));
        store.cinemas.insert("c2", cinema("c2", "second"));
        store.cinemas.replace("c1", cinema("c1", "after")).unwrap();

        let listed = store.cinemas.list();
        assert_eq!(listed[0].name, "after");
        assert_eq!(listed[1].id, "c2");
    }

    #[test]
    fn missing_rows_surface_not_found() {
        let store = MemoryStore::new();
        let err = store.cinemas.get("nope").unwrap_err();
        assert!(matches!(err, CinemaAdminError::NotFound { .. }));
        assert!(store.cinemas.remove("nope").is_err());
    }

    #[test]
    fn seed_with_invalid_record_is_rejected() {
        let store = MemoryStore::new();
        let mut bad = cinema("c1", "ok");
        bad.rating = Some(9.0);
        let seed = SeedData {
            cinemas: vec![bad],
            ..SeedData::default()
        };
        assert!(store.load_seed(seed).is_err());
    }
}
