//! Error taxonomy for the EventHub core.
//!
//! Every failure is surfaced to the caller; the core performs no silent
//! recovery and no retries. A [`Error::Transport`] raised during a
//! state-changing operation guarantees the operation left state untouched.

use thiserror::Error;

/// Errors produced by the catalog, ledger, notification log and store.
#[derive(Debug, Error)]
pub enum Error {
    /// A referenced event, reservation or user does not exist.
    #[error("{resource} with id {id} not found")]
    NotFound {
        /// Kind of record that was looked up ("event", "reservation", "user").
        resource: &'static str,
        /// The identifier that failed to resolve.
        id: String,
    },

    /// A reservation request would push an event past its capacity.
    #[error("requested {requested} tickets but only {available} available")]
    CapacityExceeded {
        /// Tickets requested.
        requested: u32,
        /// Tickets still available on the event.
        available: u32,
    },

    /// The operation is illegal for the record's current status, e.g.
    /// cancelling an already-cancelled reservation.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Malformed input: non-positive ticket count, missing required event
    /// fields, duplicate email, capacity below sold count.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The persistence backend failed or timed out. Never retried.
    #[error("persistence backend error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Convenience constructor for [`Error::NotFound`].
    #[must_use]
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Wraps a backend failure as [`Error::Transport`].
    #[must_use]
    pub fn transport(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(source))
    }
}

/// Result alias used throughout the core.
pub type Result<T> = std::result::Result<T, Error>;
