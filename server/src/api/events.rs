//! Event catalog endpoints.
//!
//! - `GET    /api/events/` — list events
//! - `POST   /api/events/` — create an event (admin action)
//! - `GET    /api/events/:id/` — event details
//! - `PATCH  /api/events/:id/` — partial update
//! - `DELETE /api/events/:id/` — remove event and its reservations
//! - `GET    /api/events/:id/occupancy/` — occupancy ratio

use crate::error::ApiError;
use crate::server::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use eventhub_core::types::{Event, EventDraft, EventId, EventPatch};
use serde::Serialize;
use uuid::Uuid;

/// Occupancy response for one event.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyResponse {
    /// Event identifier.
    pub event_id: EventId,
    /// Tickets held by confirmed reservations.
    pub registered_count: u32,
    /// Maximum number of tickets.
    pub capacity: u32,
    /// `registered_count / capacity` in `0.0..=1.0`.
    pub occupancy: f64,
}

/// List all events.
pub async fn list(State(state): State<AppState>) -> Json<Vec<Event>> {
    Json(state.hub.events().await)
}

/// Create a new event.
pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<EventDraft>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let event = state.hub.create_event(draft).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Get event details by id.
pub async fn get_one(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Event>, ApiError> {
    Ok(Json(state.hub.event(EventId::from_uuid(id)).await?))
}

/// Apply a partial update to an event.
pub async fn update(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(patch): Json<EventPatch>,
) -> Result<Json<Event>, ApiError> {
    Ok(Json(state.hub.update_event(EventId::from_uuid(id), patch).await?))
}

/// Remove an event; reservations referencing it go with it.
pub async fn remove(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Event>, ApiError> {
    Ok(Json(state.hub.remove_event(EventId::from_uuid(id)).await?))
}

/// Occupancy ratio for an event. One store read, so the count, capacity
/// and ratio in the response always agree.
pub async fn occupancy(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<OccupancyResponse>, ApiError> {
    let snapshot = state.hub.event_occupancy(EventId::from_uuid(id)).await?;
    Ok(Json(OccupancyResponse {
        event_id: snapshot.event_id,
        registered_count: snapshot.sold_count,
        capacity: snapshot.capacity,
        occupancy: snapshot.ratio,
    }))
}
