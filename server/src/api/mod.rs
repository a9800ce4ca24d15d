//! HTTP API endpoints.
//!
//! Thin adapters over the [`eventhub_core::EventHub`] store; all validation
//! and bookkeeping lives in the core.

pub mod emails;
pub mod events;
pub mod metrics;
pub mod reservations;
pub mod users;
