//! Query views: read-only projections derived from ledger and catalog.
//!
//! Every view is recomputed on each call from a consistent snapshot; none of
//! them mutate anything. The dataset is small and mutations are infrequent,
//! so no cache-invalidation machinery is needed.

use crate::catalog::Catalog;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::types::{EventId, Money, Reservation, UserId};
use serde::{Deserialize, Serialize};

/// Aggregate figures over all confirmed reservations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetrics {
    /// Number of confirmed reservations.
    pub reservations: u64,
    /// Sum of snapshotted total prices.
    pub revenue: Money,
    /// Sum of ticket counts.
    pub attendees: u64,
}

/// Confirmed reservations owned by a user, in insertion order.
#[must_use]
pub fn user_reservations(ledger: &Ledger, user_id: UserId) -> Vec<Reservation> {
    ledger
        .list()
        .iter()
        .filter(|reservation| reservation.user_id == user_id && reservation.is_confirmed())
        .cloned()
        .collect()
}

/// Confirmed reservations referencing an event, in insertion order.
#[must_use]
pub fn event_attendance(ledger: &Ledger, event_id: EventId) -> Vec<Reservation> {
    ledger
        .list()
        .iter()
        .filter(|reservation| reservation.event_id == event_id && reservation.is_confirmed())
        .cloned()
        .collect()
}

/// Occupancy snapshot for one event, taken in a single consistent read so
/// the count, capacity and ratio always agree.
#[derive(Clone, Copy, Debug)]
pub struct Occupancy {
    /// Event identifier.
    pub event_id: EventId,
    /// Tickets held by confirmed reservations.
    pub sold_count: u32,
    /// Maximum number of tickets.
    pub capacity: u32,
    /// `sold_count / capacity` in `0.0..=1.0`.
    pub ratio: f64,
}

/// Occupancy snapshot for an event.
///
/// # Errors
///
/// Returns [`crate::Error::NotFound`] for an unknown event.
pub fn event_occupancy(catalog: &Catalog, event_id: EventId) -> Result<Occupancy> {
    let event = catalog.get(event_id)?;
    Ok(Occupancy {
        event_id,
        sold_count: event.sold_count,
        capacity: event.capacity,
        ratio: f64::from(event.sold_count) / f64::from(event.capacity),
    })
}

/// Count, revenue and attendee totals over confirmed reservations.
#[must_use]
pub fn aggregate_metrics(ledger: &Ledger) -> AggregateMetrics {
    ledger
        .list()
        .iter()
        .filter(|reservation| reservation.is_confirmed())
        .fold(AggregateMetrics::default(), |mut metrics, reservation| {
            metrics.reservations += 1;
            metrics.revenue = metrics
                .revenue
                .checked_add(reservation.total_price)
                .unwrap_or(metrics.revenue);
            metrics.attendees += u64::from(reservation.ticket_count);
            metrics
        })
}
