//! Router configuration for the EventHub server.
//!
//! Builds the complete Axum router. Paths keep the trailing-slash style of
//! the original REST contract.

use super::health::health_check;
use super::state::AppState;
use crate::api::{emails, events, metrics, reservations, users};
use axum::routing::{get, post};
use axum::Router;

/// Build the complete Axum router: health check plus the `/api` surface for
/// events, reservations, users, the notification log and aggregate metrics.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Event catalog
        .route("/events/", get(events::list).post(events::create))
        .route(
            "/events/:id/",
            get(events::get_one)
                .patch(events::update)
                .delete(events::remove),
        )
        .route("/events/:id/occupancy/", get(events::occupancy))
        // Reservation ledger
        .route(
            "/reservations/",
            get(reservations::list).post(reservations::create),
        )
        .route(
            "/reservations/:id/",
            get(reservations::get_one).delete(reservations::cancel),
        )
        .route("/reservations/:id/remind/", post(reservations::remind))
        // User directory
        .route("/users/", get(users::list))
        .route("/users/signup/", post(users::signup))
        .route("/users/login/", post(users::login))
        .route(
            "/users/:id/",
            get(users::get_one).patch(users::update).delete(users::remove),
        )
        // Notification log and aggregate metrics
        .route("/emails/", get(emails::list))
        .route("/metrics/", get(metrics::aggregate));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .with_state(state)
}
