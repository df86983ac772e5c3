//! Event endpoints

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::info;

use calgrid_core::layout::range::start_of_day;
use calgrid_core::{Event, EventDraft, EventPatch};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route(
            "/api/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
}

#[derive(Deserialize)]
pub struct RangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Parse a range bound. A bare date covers the whole day: midnight for the
/// start, 23:59:59 for the end.
fn parse_bound(value: &str, is_end: bool) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return if is_end {
            date.and_hms_opt(23, 59, 59)
        } else {
            Some(start_of_day(date))
        };
    }
    value.parse::<NaiveDateTime>().ok()
}

/// GET /api/events?start=YYYY-MM-DD&end=YYYY-MM-DD
async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<Event>>, AppError> {
    let (Some(start), Some(end)) = (query.start.as_deref(), query.end.as_deref()) else {
        return Err(AppError::bad_request("Start and end dates are required"));
    };

    let (Some(start), Some(end)) = (parse_bound(start, false), parse_bound(end, true)) else {
        return Err(AppError::bad_request("Invalid date format"));
    };

    Ok(Json(state.store().list(start, end)?))
}

/// GET /api/events/{id}
async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, AppError> {
    Ok(Json(state.store().get(&id)?))
}

/// POST /api/events
async fn create_event(
    State(state): State<AppState>,
    body: Result<Json<EventDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let Json(draft) = body.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

    let event = state.store().create(draft)?;
    info!(id = %event.id, title = %event.title, "event created");

    Ok((StatusCode::CREATED, Json(event)))
}

/// PUT /api/events/{id}
async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<EventPatch>, JsonRejection>,
) -> Result<Json<Event>, AppError> {
    let Json(patch) = body.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

    let event = state.store().update(&id, patch)?;
    info!(id = %event.id, "event updated");

    Ok(Json(event))
}

/// DELETE /api/events/{id}
async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.store().delete(&id)?;
    info!(id = %id, "event deleted");

    Ok(Json(MessageResponse {
        message: "Event deleted successfully",
    }))
}
