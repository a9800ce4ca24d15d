//! Notification log endpoint (the admin "sent emails" view).
//!
//! - `GET /api/emails/` — logged notifications, newest first, filterable
//!   with `?type=` (confirmation/cancellation/reminder) and `?to=`.

use crate::server::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use eventhub_core::notifications::NotificationFilter;
use eventhub_core::types::{Notification, NotificationCategory};
use serde::Deserialize;

/// Query parameters for listing notifications.
#[derive(Debug, Default, Deserialize)]
pub struct ListEmailsQuery {
    /// Restrict to one category.
    #[serde(rename = "type")]
    pub category: Option<NotificationCategory>,
    /// Restrict to one recipient address.
    pub to: Option<String>,
}

/// List logged notifications, newest first.
///
/// Storage order is insertion order; newest-first is this view's concern.
pub async fn list(
    Query(query): Query<ListEmailsQuery>,
    State(state): State<AppState>,
) -> Json<Vec<Notification>> {
    let filter = NotificationFilter {
        category: query.category,
        recipient: query.to,
    };
    let mut records = state.hub.notifications(&filter).await;
    records.reverse();
    Json(records)
}
