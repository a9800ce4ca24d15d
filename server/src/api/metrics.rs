//! Aggregate metrics endpoint (the admin dashboard figures).
//!
//! - `GET /api/metrics/` — count, revenue and attendee totals over
//!   confirmed reservations.

use crate::server::state::AppState;
use axum::extract::State;
use axum::Json;
use eventhub_core::views::AggregateMetrics;

/// Aggregate metrics over confirmed reservations.
pub async fn aggregate(State(state): State<AppState>) -> Json<AggregateMetrics> {
    Json(state.hub.aggregate_metrics().await)
}
