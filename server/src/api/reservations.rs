//! Reservation ledger endpoints.
//!
//! - `GET    /api/reservations/` — list (filterable by owner or event)
//! - `POST   /api/reservations/` — reserve tickets
//! - `GET    /api/reservations/:id/` — reservation details
//! - `DELETE /api/reservations/:id/` — cancel (status flip, never a row
//!   delete: the audit history survives)
//! - `POST   /api/reservations/:id/remind/` — record a reminder notification

use crate::error::ApiError;
use crate::server::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use eventhub_core::types::{EventId, Money, Reservation, ReservationId, UserId};
use serde::Deserialize;
use uuid::Uuid;

/// Request body for creating a reservation.
///
/// `totalPrice` and `status` are accepted for compatibility with the
/// original client but ignored: the ledger snapshots the price itself and
/// every new reservation starts confirmed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    /// Owning user id.
    pub user: UserId,
    /// Event id.
    pub event: EventId,
    /// Number of tickets to reserve.
    pub ticket_count: u32,
    /// Ignored; the ledger computes the snapshot.
    #[serde(default)]
    #[allow(dead_code)]
    pub total_price: Option<Money>,
    /// Ignored; new reservations are always confirmed.
    #[serde(default)]
    #[allow(dead_code)]
    pub status: Option<String>,
}

/// Query parameters for listing reservations.
#[derive(Debug, Default, Deserialize)]
pub struct ListReservationsQuery {
    /// Restrict to one owner's confirmed reservations.
    pub user: Option<Uuid>,
    /// Restrict to one event's confirmed reservations.
    pub event: Option<Uuid>,
}

/// List reservations.
///
/// Without parameters returns the full ledger, cancelled rows included.
/// With `?user=` or `?event=` returns the corresponding confirmed-only view.
pub async fn list(
    Query(query): Query<ListReservationsQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Reservation>>, ApiError> {
    if query.user.is_some() && query.event.is_some() {
        return Err(ApiError::validation(
            "filter by either user or event, not both",
        ));
    }
    let reservations = if let Some(user) = query.user {
        state.hub.user_reservations(UserId::from_uuid(user)).await
    } else if let Some(event) = query.event {
        state.hub.event_attendance(EventId::from_uuid(event)).await
    } else {
        state.hub.reservations().await
    };
    Ok(Json(reservations))
}

/// Reserve tickets: the atomic unit of work.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<Reservation>), ApiError> {
    let reservation = state
        .hub
        .reserve(request.user, request.event, request.ticket_count)
        .await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// Get reservation details by id.
pub async fn get_one(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Reservation>, ApiError> {
    Ok(Json(state.hub.reservation(ReservationId::from_uuid(id)).await?))
}

/// Cancel a confirmed reservation. Not idempotent: a second call on the
/// same id fails with `INVALID_STATE`.
pub async fn cancel(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Reservation>, ApiError> {
    Ok(Json(state.hub.cancel(ReservationId::from_uuid(id)).await?))
}

/// Record a reminder notification for a confirmed reservation. Reminders
/// are only ever recorded on explicit request; there is no scheduler.
pub async fn remind(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state.hub.remind(ReservationId::from_uuid(id)).await?;
    Ok(StatusCode::CREATED)
}
