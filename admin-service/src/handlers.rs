use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, patch, post, put},
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use cinema_admin::{
    parse_instant, Cinema, CinemaAdminError, CinemaStatus, Hall, HallType, LifecycleStatus, Movie,
    MovieRelease, ReleaseStatus, Reservation, ReservationStatus, Result, Review, ReviewStatus,
    Selection, Showtime, Staff, StaffStatus,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::error;

use crate::service::{
    AdminService, HallGroup, OverviewReport, ReleaseView, ReservationListing, ReviewListing,
    ShowtimeBlock,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

fn status_for(err: &CinemaAdminError) -> StatusCode {
    match err {
        CinemaAdminError::NotFound { .. } => StatusCode::NOT_FOUND,
        CinemaAdminError::Validation { .. }
        | CinemaAdminError::InvalidTimestamp(_)
        | CinemaAdminError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond<T: Serialize>(context: &str, result: Result<T>) -> Response {
    match result {
        Ok(data) => Json(ApiResponse::success(data)).into_response(),
        Err(err) => {
            error!("{}: {}", context, err);
            (status_for(&err), Json(ApiResponse::<T>::error(err.to_string()))).into_response()
        }
    }
}

/// Parses a `?status=`-style value against an UPPER_SNAKE serde enum.
fn parse_upper<T: DeserializeOwned>(raw: &str) -> Option<T> {
    serde_json::from_value(serde_json::Value::String(raw.to_uppercase())).ok()
}

fn selection<T, F>(raw: Option<&str>, parse: F) -> Result<Selection<T>>
where
    F: FnOnce(&str) -> Option<T>,
{
    Selection::from_param(raw, parse).ok_or_else(|| {
        CinemaAdminError::InvalidArgument(format!(
            "unrecognized filter value: {}",
            raw.unwrap_or_default()
        ))
    })
}

// --- Request payloads ---

#[derive(Debug, Clone, Deserialize)]
pub struct CinemaPayload {
    pub name: String,
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub operating_hours: HashMap<String, String>,
    pub status: CinemaStatus,
    #[serde(default)]
    pub timezone: String,
}

impl CinemaPayload {
    pub fn into_cinema(self, id: String, now: DateTime<Utc>) -> Cinema {
        Cinema {
            id,
            name: self.name,
            address: self.address,
            city: self.city,
            district: self.district,
            phone: self.phone,
            email: self.email,
            website: self.website,
            latitude: self.latitude,
            longitude: self.longitude,
            description: self.description,
            amenities: self.amenities,
            images: self.images,
            rating: None,
            total_reviews: 0,
            operating_hours: self.operating_hours,
            status: self.status,
            timezone: self.timezone,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HallPayload {
    pub cinema_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub hall_type: HallType,
    pub capacity: u32,
    pub rows: u32,
    #[serde(default)]
    pub screen_type: Option<String>,
    #[serde(default)]
    pub sound_system: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default = "default_hall_status")]
    pub status: String,
}

fn default_hall_status() -> String {
    "Operational".to_string()
}

impl HallPayload {
    pub fn into_hall(self, id: String, now: DateTime<Utc>) -> Hall {
        Hall {
            id,
            cinema_id: self.cinema_id,
            name: self.name,
            hall_type: self.hall_type,
            capacity: self.capacity,
            rows: self.rows,
            screen_type: self.screen_type,
            sound_system: self.sound_system,
            features: self.features,
            status: self.status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial hall update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HallPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub hall_type: Option<HallType>,
    pub capacity: Option<u32>,
    pub rows: Option<u32>,
    pub screen_type: Option<String>,
    pub sound_system: Option<String>,
    pub features: Option<Vec<String>>,
    pub status: Option<String>,
}

impl HallPatch {
    pub fn apply(&self, hall: &mut Hall) {
        if let Some(name) = &self.name {
            hall.name = name.clone();
        }
        if let Some(hall_type) = self.hall_type {
            hall.hall_type = hall_type;
        }
        if let Some(capacity) = self.capacity {
            hall.capacity = capacity;
        }
        if let Some(rows) = self.rows {
            hall.rows = rows;
        }
        if let Some(screen_type) = &self.screen_type {
            hall.screen_type = Some(screen_type.clone());
        }
        if let Some(sound_system) = &self.sound_system {
            hall.sound_system = Some(sound_system.clone());
        }
        if let Some(features) = &self.features {
            hall.features = features.clone();
        }
        if let Some(status) = &self.status {
            hall.status = status.clone();
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePayload {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub trailer_url: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub duration_minutes: u32,
    #[serde(default)]
    pub age_rating: Option<String>,
    pub release_date: NaiveDate,
    #[serde(default)]
    pub status: Option<String>,
}

impl MoviePayload {
    pub fn into_movie(self, id: String) -> Movie {
        Movie {
            id,
            title: self.title,
            description: self.description,
            poster_url: self.poster_url,
            trailer_url: self.trailer_url,
            genres: self.genres,
            duration_minutes: self.duration_minutes,
            age_rating: self.age_rating,
            release_date: self.release_date,
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleasePayload {
    pub movie_id: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub status: Option<ReleaseStatus>,
    #[serde(default)]
    pub note: String,
}

impl ReleasePayload {
    pub fn into_release(self, id: String) -> Result<MovieRelease> {
        Ok(MovieRelease {
            id,
            movie_id: self.movie_id,
            start_date: parse_instant(&self.start_date)?,
            end_date: parse_instant(&self.end_date)?,
            status: self.status,
            note: self.note,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShowtimePayload {
    pub movie_id: String,
    pub cinema_id: String,
    pub hall_id: String,
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub subtitles: Vec<String>,
    pub base_price: f64,
}

fn default_format() -> String {
    "2D".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffPayload {
    pub name: String,
    pub role: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub hired_at: NaiveDate,
    pub status: StaffStatus,
    pub location_id: String,
}

impl StaffPayload {
    pub fn into_staff(self, id: String) -> Staff {
        Staff {
            id,
            name: self.name,
            role: self.role,
            email: self.email,
            phone: self.phone,
            hired_at: self.hired_at,
            status: self.status,
            location_id: self.location_id,
        }
    }
}

// --- Query strings ---

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub q: String,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewsQuery {
    #[serde(default)]
    pub q: String,
    pub rating: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ShowtimesQuery {
    pub date: Option<String>,
}

// --- Handlers ---

async fn list_cinemas(
    State(service): State<AdminService>,
    Query(query): Query<ListQuery>,
) -> Response {
    let result = selection(query.status.as_deref(), parse_upper::<CinemaStatus>)
        .map(|status| service.list_cinemas(&query.q, status));
    respond::<Vec<Cinema>>("Error listing cinemas", result)
}

async fn create_cinema(
    State(service): State<AdminService>,
    Json(payload): Json<CinemaPayload>,
) -> Response {
    respond::<Cinema>("Error creating cinema", service.create_cinema(payload))
}

async fn update_cinema(
    State(service): State<AdminService>,
    Path(id): Path<String>,
    Json(payload): Json<CinemaPayload>,
) -> Response {
    respond::<Cinema>("Error updating cinema", service.update_cinema(&id, payload))
}

async fn delete_cinema(State(service): State<AdminService>, Path(id): Path<String>) -> Response {
    respond::<()>("Error deleting cinema", service.delete_cinema(&id))
}

async fn list_halls(
    State(service): State<AdminService>,
    Query(query): Query<SearchQuery>,
) -> Response {
    respond::<Vec<HallGroup>>("Error listing halls", Ok(service.halls_grouped(&query.q)))
}

async fn halls_for_cinema(
    State(service): State<AdminService>,
    Path(cinema_id): Path<String>,
) -> Response {
    respond::<Vec<Hall>>(
        "Error listing cinema halls",
        Ok(service.halls_for_cinema(&cinema_id)),
    )
}

async fn create_hall(
    State(service): State<AdminService>,
    Json(payload): Json<HallPayload>,
) -> Response {
    respond::<Hall>("Error creating hall", service.create_hall(payload))
}

async fn patch_hall(
    State(service): State<AdminService>,
    Path(id): Path<String>,
    Json(patch): Json<HallPatch>,
) -> Response {
    respond::<Hall>("Error updating hall", service.patch_hall(&id, patch))
}

async fn delete_hall(State(service): State<AdminService>, Path(id): Path<String>) -> Response {
    respond::<()>("Error deleting hall", service.delete_hall(&id))
}

async fn list_movies(
    State(service): State<AdminService>,
    Query(query): Query<SearchQuery>,
) -> Response {
    respond::<Vec<Movie>>("Error listing movies", Ok(service.list_movies(&query.q)))
}

async fn create_movie(
    State(service): State<AdminService>,
    Json(payload): Json<MoviePayload>,
) -> Response {
    respond::<Movie>("Error creating movie", service.create_movie(payload))
}

async fn update_movie(
    State(service): State<AdminService>,
    Path(id): Path<String>,
    Json(payload): Json<MoviePayload>,
) -> Response {
    respond::<Movie>("Error updating movie", service.update_movie(&id, payload))
}

async fn delete_movie(State(service): State<AdminService>, Path(id): Path<String>) -> Response {
    respond::<()>("Error deleting movie", service.delete_movie(&id))
}

async fn list_releases(
    State(service): State<AdminService>,
    Query(query): Query<ListQuery>,
) -> Response {
    let result = selection(query.status.as_deref(), LifecycleStatus::parse)
        .map(|status| service.list_releases(&query.q, status, Utc::now()));
    respond::<Vec<ReleaseView>>("Error listing releases", result)
}

async fn create_release(
    State(service): State<AdminService>,
    Json(payload): Json<ReleasePayload>,
) -> Response {
    respond::<MovieRelease>("Error creating release", service.create_release(payload))
}

async fn update_release(
    State(service): State<AdminService>,
    Path(id): Path<String>,
    Json(payload): Json<ReleasePayload>,
) -> Response {
    respond::<MovieRelease>("Error updating release", service.update_release(&id, payload))
}

async fn delete_release(State(service): State<AdminService>, Path(id): Path<String>) -> Response {
    respond::<()>("Error deleting release", service.delete_release(&id))
}

async fn list_showtimes(
    State(service): State<AdminService>,
    Query(query): Query<ShowtimesQuery>,
) -> Response {
    let result = match &query.date {
        None => Ok(Utc::now().date_naive()),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            CinemaAdminError::InvalidArgument(format!("invalid date: {}", raw))
        }),
    }
    .map(|date| service.showtimes_on(date));
    respond::<Vec<ShowtimeBlock>>("Error listing showtimes", result)
}

async fn create_showtime(
    State(service): State<AdminService>,
    Json(payload): Json<ShowtimePayload>,
) -> Response {
    respond::<Showtime>("Error scheduling showtime", service.schedule_showtime(payload))
}

async fn delete_showtime(State(service): State<AdminService>, Path(id): Path<String>) -> Response {
    respond::<()>("Error deleting showtime", service.delete_showtime(&id))
}

async fn list_staff(
    State(service): State<AdminService>,
    Query(query): Query<ListQuery>,
) -> Response {
    let result = selection(query.status.as_deref(), parse_upper::<StaffStatus>)
        .map(|status| service.list_staff(&query.q, status));
    respond::<Vec<Staff>>("Error listing staff", result)
}

async fn create_staff(
    State(service): State<AdminService>,
    Json(payload): Json<StaffPayload>,
) -> Response {
    respond::<Staff>("Error creating staff", service.create_staff(payload))
}

async fn update_staff(
    State(service): State<AdminService>,
    Path(id): Path<String>,
    Json(payload): Json<StaffPayload>,
) -> Response {
    respond::<Staff>("Error updating staff", service.update_staff(&id, payload))
}

async fn delete_staff(State(service): State<AdminService>, Path(id): Path<String>) -> Response {
    respond::<()>("Error deleting staff", service.delete_staff(&id))
}

async fn list_reservations(
    State(service): State<AdminService>,
    Query(query): Query<ListQuery>,
) -> Response {
    let result = selection(query.status.as_deref(), parse_upper::<ReservationStatus>)
        .map(|status| service.list_reservations(&query.q, status));
    respond::<ReservationListing>("Error listing reservations", result)
}

async fn get_reservation(State(service): State<AdminService>, Path(id): Path<String>) -> Response {
    respond::<Reservation>("Error fetching reservation", service.get_reservation(&id))
}

async fn list_reviews(
    State(service): State<AdminService>,
    Query(query): Query<ReviewsQuery>,
) -> Response {
    let result = selection(query.rating.as_deref(), |raw| raw.parse::<u8>().ok())
        .and_then(|rating| {
            let status = selection(query.status.as_deref(), parse_upper::<ReviewStatus>)?;
            Ok(service.list_reviews(&query.q, rating, status))
        });
    respond::<ReviewListing>("Error listing reviews", result)
}

async fn toggle_review(State(service): State<AdminService>, Path(id): Path<String>) -> Response {
    respond::<Review>("Error toggling review", service.toggle_review_status(&id))
}

async fn delete_review(State(service): State<AdminService>, Path(id): Path<String>) -> Response {
    respond::<()>("Error deleting review", service.delete_review(&id))
}

async fn overview_report(State(service): State<AdminService>) -> Response {
    respond::<OverviewReport>(
        "Error building overview",
        Ok(service.overview().as_ref().clone()),
    )
}

async fn health_check() -> Json<ApiResponse<String>> {
    Json(ApiResponse::success("OK".to_string()))
}

async fn export_metrics(State(service): State<AdminService>) -> Response {
    match service.metrics().export() {
        Ok(body) => body.into_response(),
        Err(err) => {
            error!("Error exporting metrics: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

async fn track_requests(
    State(service): State<AdminService>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let response = next.run(request).await;
    service
        .metrics()
        .record_request(start.elapsed(), response.status().is_success());
    response
}

pub fn router(service: AdminService, permissive_cors: bool) -> Router {
    let mut app = Router::new()
        .route("/cinema", get(list_cinemas).post(create_cinema))
        .route("/cinema/:id", put(update_cinema).delete(delete_cinema))
        .route("/halls", get(list_halls))
        .route("/halls/cinema/:cinema_id", get(halls_for_cinema))
        .route("/halls/hall", post(create_hall))
        .route("/halls/hall/:id", patch(patch_hall).delete(delete_hall))
        .route("/movies", get(list_movies).post(create_movie))
        .route("/movies/:id", put(update_movie).delete(delete_movie))
        .route("/movie-releases", get(list_releases).post(create_release))
        .route(
            "/movie-releases/:id",
            put(update_release).delete(delete_release),
        )
        .route("/showtimes", get(list_showtimes).post(create_showtime))
        .route("/showtimes/:id", delete(delete_showtime))
        .route("/staff", get(list_staff).post(create_staff))
        .route("/staff/:id", put(update_staff).delete(delete_staff))
        .route("/reservations", get(list_reservations))
        .route("/reservations/:id", get(get_reservation))
        .route("/reviews", get(list_reviews))
        .route("/reviews/:id/status", post(toggle_review))
        .route("/reviews/:id", delete(delete_review))
        .route("/reports/overview", get(overview_report))
        .route("/health", get(health_check))
        .route("/metrics", get(export_metrics))
        .layer(middleware::from_fn_with_state(service.clone(), track_requests))
        .layer(TraceLayer::new_for_http());

    if permissive_cors {
        app = app.layer(CorsLayer::permissive());
    }

    app.with_state(service)
}
