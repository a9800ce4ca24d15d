//! EventHub HTTP server.
//!
//! Thin axum surface over [`eventhub_core`]: event catalog CRUD, reservation
//! create/cancel, the user directory, the notification log and aggregate
//! metrics. All business rules live in the core; handlers translate between
//! the wire contract and store calls, and the error bridge maps the domain
//! taxonomy onto status codes (404 not found, 409 capacity/state conflicts,
//! 422 validation, 502 persistence failures).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod server;

pub use config::Config;
pub use server::{build_router, AppState};
