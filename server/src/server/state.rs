//! Application state for the EventHub HTTP server.

use eventhub_core::EventHub;
use std::sync::Arc;

/// Shared state for all HTTP handlers.
///
/// The store is the single serialized writer; handlers are thin adapters
/// over it. Cloned (cheaply via `Arc`) for each request.
#[derive(Clone)]
pub struct AppState {
    /// The owning store: catalog, ledger, notification log, user directory.
    pub hub: Arc<EventHub>,
}

impl AppState {
    /// Create a new application state around a store.
    #[must_use]
    pub fn new(hub: Arc<EventHub>) -> Self {
        Self { hub }
    }
}
