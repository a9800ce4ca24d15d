//! EventHub core: the reservation and capacity ledger.
//!
//! An event-discovery and ticket-reservation platform reduced to its state
//! and invariants, stripped of any presentation layer:
//!
//! - **Event Catalog** ([`catalog`]): event records and their sold-ticket
//!   counts. Only the ledger writes a sold count.
//! - **Reservation Ledger** ([`ledger`]): creates and cancels reservations,
//!   enforces the capacity invariant, updates the catalog and triggers the
//!   notification log. Cancellation is a status flip, never a row delete, so
//!   the audit history survives.
//! - **Notification Log** ([`notifications`]): append-only record of
//!   confirmation/cancellation/reminder messages that would be sent.
//!   Delivery is an external collaborator.
//! - **Query Views** ([`views`]): read-only projections (per-user
//!   reservations, per-event occupancy, aggregate revenue/attendee metrics)
//!   recomputed on demand.
//! - **Store** ([`store`]): the single owner of all of the above, behind one
//!   async mutex, persisting through a pluggable [`persistence::Backend`].
//!
//! # Invariants
//!
//! For every event, `0 ≤ sold_count ≤ capacity`, and `sold_count` equals the
//! sum of `ticket_count` over confirmed reservations referencing it. A
//! reservation's `total_price` is fixed at creation. Every state-changing
//! ledger operation produces exactly one notification record of the matching
//! category, and a failing operation produces no mutation at all.
//!
//! # Example
//!
//! ```
//! use eventhub_core::persistence::MemoryBackend;
//! use eventhub_core::types::UserRole;
//! use eventhub_core::EventHub;
//! use std::sync::Arc;
//!
//! # async fn run() -> eventhub_core::Result<()> {
//! let hub = EventHub::open(Arc::new(MemoryBackend::new())).await?;
//! let events = hub.seed().await?;
//! let ada = hub.signup("ada@example.com", "Ada", UserRole::User).await?;
//!
//! let reservation = hub.reserve(ada.id, events[0].id, 2).await?;
//! assert_eq!(hub.event(events[0].id).await?.sold_count, 2);
//!
//! hub.cancel(reservation.id).await?;
//! assert_eq!(hub.event(events[0].id).await?.sold_count, 0);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod error;
pub mod ledger;
pub mod notifications;
pub mod persistence;
pub mod seed;
pub mod store;
pub mod types;
pub mod views;

pub use error::{Error, Result};
pub use store::EventHub;
