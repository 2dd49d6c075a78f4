use chrono::{DateTime, NaiveDate, Utc};
use cinema_admin::{
    average, group_by, matches_query, parse_instant, round1, search, Cinema, CinemaAdminError,
    CinemaStatus, Hall, LifecycleStatus, MemoryStore, Metrics, Movie, MovieRelease, Reservation,
    ReservationStats, ReservationStatus, Result, Review, ReviewStats, ReviewStatus, Selection,
    Showtime, ShowtimeStatus, SnapshotCell, Staff, StaffStatus,
};
use prometheus::Counter;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::handlers::{
    CinemaPayload, HallPatch, HallPayload, MoviePayload, ReleasePayload, ShowtimePayload,
    StaffPayload,
};

/// A release annotated with its resolved movie title and the lifecycle
/// status the dashboard shows as a badge.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseView {
    #[serde(flatten)]
    pub release: MovieRelease,
    pub movie_title: String,
    pub display_status: LifecycleStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShowtimeView {
    #[serde(flatten)]
    pub showtime: Showtime,
    pub cinema_name: String,
    pub hall_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupancy: Option<f64>,
}

/// One movie's block on the showtimes page: its sessions for the day plus
/// the per-group rollups.
#[derive(Debug, Clone, Serialize)]
pub struct ShowtimeBlock {
    pub movie_id: String,
    pub movie_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_rating: Option<String>,
    pub session_count: usize,
    pub seats_available: u32,
    pub sessions: Vec<ShowtimeView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HallGroup {
    pub cinema_id: String,
    pub cinema_name: String,
    pub hall_count: usize,
    pub total_capacity: u32,
    pub halls: Vec<Hall>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReservationListing {
    pub stats: ReservationStats,
    pub reservations: Vec<Reservation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewListing {
    pub stats: ReviewStats,
    pub reviews: Vec<Review>,
}

/// The dashboard landing page numbers, rebuilt after every mutation.
#[derive(Debug, Clone, Serialize)]
pub struct OverviewReport {
    pub total_cinemas: usize,
    pub active_cinemas: usize,
    pub total_halls: usize,
    pub total_movies: usize,
    pub showtimes_today: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupancy_rate: Option<f64>,
    pub reservations: ReservationStats,
    pub reviews: ReviewStats,
    pub generated_at: DateTime<Utc>,
}

impl Default for OverviewReport {
    fn default() -> Self {
        Self {
            total_cinemas: 0,
            active_cinemas: 0,
            total_halls: 0,
            total_movies: 0,
            showtimes_today: 0,
            occupancy_rate: None,
            reservations: ReservationStats::compute(&[]),
            reviews: ReviewStats::compute(&[]),
            generated_at: Utc::now(),
        }
    }
}

#[derive(Clone)]
pub struct AdminService {
    store: Arc<MemoryStore>,
    metrics: Metrics,
    overview: Arc<SnapshotCell<OverviewReport>>,
}

impl AdminService {
    pub fn new(store: Arc<MemoryStore>, metrics: Metrics) -> Self {
        let service = Self {
            store,
            metrics,
            overview: Arc::new(SnapshotCell::new(OverviewReport::default())),
        };
        service.refresh_overview();
        service
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn catalog_len(&self) -> usize {
        self.store.cinemas.len()
            + self.store.halls.len()
            + self.store.movies.len()
            + self.store.releases.len()
            + self.store.showtimes.len()
            + self.store.reservations.len()
            + self.store.reviews.len()
            + self.store.staff.len()
    }

    fn next_id(prefix: &str) -> String {
        format!("{}_{}", prefix, Uuid::new_v4())
    }

    fn mutation<T>(&self, counter: &Counter, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => {
                counter.inc();
                self.refresh_overview();
            }
            Err(_) => self.metrics.mutation_failures.inc(),
        }
        result
    }

    // --- Overview ---

    pub fn overview(&self) -> Arc<OverviewReport> {
        self.overview.read()
    }

    /// Recomputes the overview snapshot. Ticketed, so a slower rebuild
    /// started earlier can never clobber a fresher one.
    pub fn refresh_overview(&self) -> bool {
        let ticket = self.overview.begin();
        let report = self.compute_overview(Utc::now());
        self.metrics.update_catalog_size(self.catalog_len());
        self.overview.install(ticket, report)
    }

    fn compute_overview(&self, now: DateTime<Utc>) -> OverviewReport {
        let cinemas = self.store.cinemas.list();
        let today = now.date_naive();
        let todays: Vec<Showtime> = self
            .store
            .showtimes
            .list()
            .into_iter()
            .filter(|st| st.start_time.date_naive() == today)
            .collect();
        let fill_rates: Vec<f64> = todays.iter().filter_map(|st| st.occupancy()).collect();

        OverviewReport {
            total_cinemas: cinemas.len(),
            active_cinemas: cinemas
                .iter()
                .filter(|c| c.status == CinemaStatus::Active)
                .count(),
            total_halls: self.store.halls.len(),
            total_movies: self.store.movies.len(),
            showtimes_today: todays.len(),
            occupancy_rate: average(&fill_rates).map(round1),
            reservations: ReservationStats::compute(&self.store.reservations.list()),
            reviews: ReviewStats::compute(&self.store.reviews.list()),
            generated_at: now,
        }
    }

    // --- Cinemas ---

    pub fn list_cinemas(&self, query: &str, status: Selection<CinemaStatus>) -> Vec<Cinema> {
        search(self.store.cinemas.list(), query)
            .into_iter()
            .filter(|cinema| status.admits(&cinema.status))
            .collect()
    }

    pub fn create_cinema(&self, payload: CinemaPayload) -> Result<Cinema> {
        let cinema = payload.into_cinema(Self::next_id("c"), Utc::now());
        let result = cinema.validate().map(|_| {
            info!("Cinema created: {} ({})", cinema.name, cinema.id);
            self.store.cinemas.insert(cinema.id.clone(), cinema.clone());
            cinema
        });
        self.mutation(&self.metrics.records_created, result)
    }

    pub fn update_cinema(&self, id: &str, payload: CinemaPayload) -> Result<Cinema> {
        let result = (|| {
            let existing = self.store.cinemas.get(id)?;
            let mut cinema = payload.into_cinema(id.to_string(), Utc::now());
            cinema.created_at = existing.created_at;
            cinema.rating = existing.rating;
            cinema.total_reviews = existing.total_reviews;
            cinema.validate()?;
            self.store.cinemas.replace(id, cinema.clone())?;
            info!("Cinema updated: {}", id);
            Ok(cinema)
        })();
        self.mutation(&self.metrics.records_updated, result)
    }

    pub fn delete_cinema(&self, id: &str) -> Result<()> {
        let result = self.store.cinemas.remove(id).map(|cinema| {
            info!("Cinema deleted: {} ({})", cinema.name, id);
        });
        self.mutation(&self.metrics.records_deleted, result)
    }

    // --- Halls ---

    pub fn halls_for_cinema(&self, cinema_id: &str) -> Vec<Hall> {
        self.store
            .halls
            .list()
            .into_iter()
            .filter(|hall| hall.cinema_id == cinema_id)
            .collect()
    }

    /// All halls, narrowed by search text and bucketed under their
    /// cinema. An unresolved cinema reference becomes an
    /// "Unknown Cinema" group rather than an error.
    pub fn halls_grouped(&self, query: &str) -> Vec<HallGroup> {
        let halls = search(self.store.halls.list(), query);
        group_by(halls, |hall| hall.cinema_id.clone())
            .into_entries()
            .into_iter()
            .map(|(cinema_id, halls)| {
                let cinema_name = self
                    .store
                    .cinemas
                    .get(&cinema_id)
                    .map(|c| c.name)
                    .unwrap_or_else(|_| "Unknown Cinema".to_string());
                HallGroup {
                    cinema_name,
                    hall_count: halls.len(),
                    total_capacity: halls.iter().map(|h| h.capacity).sum(),
                    cinema_id,
                    halls,
                }
            })
            .collect()
    }

    pub fn create_hall(&self, payload: HallPayload) -> Result<Hall> {
        let hall = payload.into_hall(Self::next_id("h"), Utc::now());
        let result = hall.validate().map(|_| {
            info!("Hall created: {} in cinema {}", hall.name, hall.cinema_id);
            self.store.halls.insert(hall.id.clone(), hall.clone());
            hall
        });
        self.mutation(&self.metrics.records_created, result)
    }

    pub fn patch_hall(&self, id: &str, patch: HallPatch) -> Result<Hall> {
        let result = (|| {
            let mut hall = self.store.halls.get(id)?;
            patch.apply(&mut hall);
            hall.updated_at = Utc::now();
            hall.validate()?;
            self.store.halls.replace(id, hall.clone())?;
            info!("Hall updated: {}", id);
            Ok(hall)
        })();
        self.mutation(&self.metrics.records_updated, result)
    }

    pub fn delete_hall(&self, id: &str) -> Result<()> {
        let result = self.store.halls.remove(id).map(|hall| {
            info!("Hall deleted: {} ({})", hall.name, id);
        });
        self.mutation(&self.metrics.records_deleted, result)
    }

    // --- Movies ---

    pub fn list_movies(&self, query: &str) -> Vec<Movie> {
        search(self.store.movies.list(), query)
    }

    pub fn create_movie(&self, payload: MoviePayload) -> Result<Movie> {
        let movie = payload.into_movie(Self::next_id("m"));
        let result = movie.validate().map(|_| {
            info!("Movie created: {} ({})", movie.title, movie.id);
            self.store.movies.insert(movie.id.clone(), movie.clone());
            movie
        });
        self.mutation(&self.metrics.records_created, result)
    }

    pub fn update_movie(&self, id: &str, payload: MoviePayload) -> Result<Movie> {
        let result = (|| {
            self.store.movies.get(id)?;
            let movie = payload.into_movie(id.to_string());
            movie.validate()?;
            self.store.movies.replace(id, movie.clone())?;
            info!("Movie updated: {}", id);
            Ok(movie)
        })();
        self.mutation(&self.metrics.records_updated, result)
    }

    pub fn delete_movie(&self, id: &str) -> Result<()> {
        let result = self.store.movies.remove(id).map(|movie| {
            info!("Movie deleted: {} ({})", movie.title, id);
        });
        self.mutation(&self.metrics.records_deleted, result)
    }

    // --- Movie releases ---

    pub fn list_releases(
        &self,
        query: &str,
        status: Selection<LifecycleStatus>,
        now: DateTime<Utc>,
    ) -> Vec<ReleaseView> {
        self.store
            .releases
            .list()
            .into_iter()
            .filter_map(|release| {
                let movie_title = self.store.movies.get(&release.movie_id).map(|m| m.title).ok();
                // Search only sees resolved titles; the fallback label is
                // for display, not matching.
                let matched = match &movie_title {
                    Some(title) => matches_query(&[title.as_str()], query),
                    None => query.is_empty(),
                };
                if !matched {
                    return None;
                }
                let display_status = release.status_at(now);
                if !status.admits(&display_status) {
                    return None;
                }
                Some(ReleaseView {
                    release,
                    movie_title: movie_title
                        .unwrap_or_else(|| "Unknown Movie".to_string()),
                    display_status,
                })
            })
            .collect()
    }

    pub fn create_release(&self, payload: ReleasePayload) -> Result<MovieRelease> {
        let result = (|| {
            self.store.movies.get(&payload.movie_id)?;
            let release = payload.into_release(Self::next_id("r"))?;
            release.validate()?;
            info!(
                "Release created for movie {}: {} -> {}",
                release.movie_id, release.start_date, release.end_date
            );
            self.store.releases.insert(release.id.clone(), release.clone());
            Ok(release)
        })();
        self.mutation(&self.metrics.releases_created, result)
    }

    pub fn update_release(&self, id: &str, payload: ReleasePayload) -> Result<MovieRelease> {
        let result = (|| {
            self.store.releases.get(id)?;
            let release = payload.into_release(id.to_string())?;
            release.validate()?;
            self.store.releases.replace(id, release.clone())?;
            info!("Release updated: {}", id);
            Ok(release)
        })();
        self.mutation(&self.metrics.records_updated, result)
    }

    pub fn delete_release(&self, id: &str) -> Result<()> {
        let result = self.store.releases.remove(id).map(|_| {
            info!("Release deleted: {}", id);
        });
        self.mutation(&self.metrics.records_deleted, result)
    }

    // --- Showtimes ---

    /// The day's showtimes, grouped per movie in first-appearance order,
    /// with seat rollups per block.
    pub fn showtimes_on(&self, date: NaiveDate) -> Vec<ShowtimeBlock> {
        let sessions: Vec<Showtime> = self
            .store
            .showtimes
            .list()
            .into_iter()
            .filter(|st| st.start_time.date_naive() == date)
            .collect();

        group_by(sessions, |st| st.movie_id.clone())
            .into_entries()
            .into_iter()
            .map(|(movie_id, sessions)| {
                let movie = self.store.movies.get(&movie_id).ok();
                let sessions: Vec<ShowtimeView> = sessions
                    .into_iter()
                    .map(|showtime| ShowtimeView {
                        cinema_name: self
                            .store
                            .cinemas
                            .get(&showtime.cinema_id)
                            .map(|c| c.name)
                            .unwrap_or_else(|_| "Unknown Cinema".to_string()),
                        hall_name: self
                            .store
                            .halls
                            .get(&showtime.hall_id)
                            .map(|h| h.name)
                            .unwrap_or_else(|_| "Unknown Hall".to_string()),
                        occupancy: showtime.occupancy().map(round1),
                        showtime,
                    })
                    .collect();

                ShowtimeBlock {
                    movie_title: movie
                        .as_ref()
                        .map(|m| m.title.clone())
                        .unwrap_or_else(|| "Unknown Movie".to_string()),
                    duration_minutes: movie.as_ref().map(|m| m.duration_minutes),
                    age_rating: movie.as_ref().and_then(|m| m.age_rating.clone()),
                    session_count: sessions.len(),
                    seats_available: sessions
                        .iter()
                        .map(|view| view.showtime.available_seats)
                        .sum(),
                    movie_id,
                    sessions,
                }
            })
            .collect()
    }

    pub fn schedule_showtime(&self, payload: ShowtimePayload) -> Result<Showtime> {
        let result = (|| {
            let movie = self.store.movies.get(&payload.movie_id)?;
            self.store.cinemas.get(&payload.cinema_id)?;
            let hall = self.store.halls.get(&payload.hall_id)?;
            if hall.cinema_id != payload.cinema_id {
                return Err(CinemaAdminError::validation(
                    "hall_id",
                    format!("hall {} belongs to another cinema", hall.id),
                ));
            }

            let start_time = parse_instant(&payload.start_time)?;
            // End time defaults to start plus the movie's runtime, the way
            // the scheduling form fills it in.
            let end_time = match &payload.end_time {
                Some(raw) => parse_instant(raw)?,
                None => start_time + chrono::Duration::minutes(i64::from(movie.duration_minutes)),
            };

            let showtime = Showtime {
                id: Self::next_id("st"),
                movie_id: payload.movie_id,
                cinema_id: payload.cinema_id,
                hall_id: payload.hall_id,
                start_time,
                end_time,
                format: payload.format,
                language: payload.language,
                subtitles: payload.subtitles,
                base_price: payload.base_price,
                available_seats: hall.capacity,
                total_seats: hall.capacity,
                status: ShowtimeStatus::Scheduled,
            };
            showtime.validate()?;
            info!(
                "Showtime scheduled: {} in hall {} at {}",
                showtime.id, showtime.hall_id, showtime.start_time
            );
            self.store.showtimes.insert(showtime.id.clone(), showtime.clone());
            Ok(showtime)
        })();
        self.mutation(&self.metrics.showtimes_scheduled, result)
    }

    pub fn delete_showtime(&self, id: &str) -> Result<()> {
        let result = self.store.showtimes.remove(id).map(|_| {
            info!("Showtime deleted: {}", id);
        });
        self.mutation(&self.metrics.records_deleted, result)
    }

    // --- Staff ---

    pub fn list_staff(&self, query: &str, status: Selection<StaffStatus>) -> Vec<Staff> {
        search(self.store.staff.list(), query)
            .into_iter()
            .filter(|member| status.admits(&member.status))
            .collect()
    }

    pub fn create_staff(&self, payload: StaffPayload) -> Result<Staff> {
        let member = payload.into_staff(Self::next_id("s"));
        let result = member.validate().map(|_| {
            info!("Staff created: {} ({})", member.name, member.role);
            self.store.staff.insert(member.id.clone(), member.clone());
            member
        });
        self.mutation(&self.metrics.records_created, result)
    }

    pub fn update_staff(&self, id: &str, payload: StaffPayload) -> Result<Staff> {
        let result = (|| {
            self.store.staff.get(id)?;
            let member = payload.into_staff(id.to_string());
            member.validate()?;
            self.store.staff.replace(id, member.clone())?;
            info!("Staff updated: {}", id);
            Ok(member)
        })();
        self.mutation(&self.metrics.records_updated, result)
    }

    pub fn delete_staff(&self, id: &str) -> Result<()> {
        let result = self.store.staff.remove(id).map(|member| {
            info!("Staff deleted: {} ({})", member.name, id);
        });
        self.mutation(&self.metrics.records_deleted, result)
    }

    // --- Reservations ---

    pub fn list_reservations(
        &self,
        query: &str,
        status: Selection<ReservationStatus>,
    ) -> ReservationListing {
        let reservations: Vec<Reservation> = search(self.store.reservations.list(), query)
            .into_iter()
            .filter(|reservation| status.admits(&reservation.status))
            .collect();
        ReservationListing {
            stats: ReservationStats::compute(&reservations),
            reservations,
        }
    }

    pub fn get_reservation(&self, id: &str) -> Result<Reservation> {
        self.store.reservations.get(id)
    }

    // --- Reviews ---

    pub fn list_reviews(
        &self,
        query: &str,
        rating: Selection<u8>,
        status: Selection<ReviewStatus>,
    ) -> ReviewListing {
        let reviews: Vec<Review> = search(self.store.reviews.list(), query)
            .into_iter()
            .filter(|review| rating.admits(&review.rating) && status.admits(&review.status))
            .collect();
        ReviewListing {
            stats: ReviewStats::compute(&reviews),
            reviews,
        }
    }

    pub fn toggle_review_status(&self, id: &str) -> Result<Review> {
        let result = (|| {
            let mut review = self.store.reviews.get(id)?;
            review.status = review.toggled_status();
            self.store.reviews.replace(id, review.clone())?;
            info!("Review {} now {:?}", id, review.status);
            Ok(review)
        })();
        self.mutation(&self.metrics.reviews_moderated, result)
    }

    pub fn delete_review(&self, id: &str) -> Result<()> {
        let result = self.store.reviews.remove(id).map(|_| {
            info!("Review deleted: {}", id);
        });
        self.mutation(&self.metrics.records_deleted, result)
    }
}
