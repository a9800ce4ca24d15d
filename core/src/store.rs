//! The owning store: one explicit object holding catalog, ledger,
//! notification log and user directory.
//!
//! [`EventHub`] is constructed once per process (or per test) from a
//! persistence [`Backend`] and is the single serialized writer: every
//! state-changing operation runs as one critical section under an async
//! mutex, so two concurrent `reserve` calls against the same event cannot
//! both pass the capacity check and commit.
//!
//! Mutations follow a clone, apply, persist, commit sequence: the operation
//! runs against a clone of the state, the affected collections are written
//! through the backend, and only then is the clone installed. A backend
//! failure therefore surfaces as [`Error::Transport`] with observable state
//! exactly as it was before the call — no partial mutation, no stray
//! notification.

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::ledger::Ledger;
use crate::notifications::{NotificationFilter, NotificationLog};
use crate::persistence::{collections, Backend};
use crate::seed;
use crate::types::{
    Event, EventDraft, EventId, EventPatch, Notification, Reservation, ReservationId, User,
    UserId, UserPatch, UserRole,
};
use crate::views::{self, AggregateMetrics, Occupancy};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

#[derive(Clone, Debug, Default)]
struct HubState {
    catalog: Catalog,
    ledger: Ledger,
    log: NotificationLog,
    users: Vec<User>,
}

impl HubState {
    fn collection_json(&self, collection: &str) -> Result<Value> {
        let value = match collection {
            collections::EVENTS => serde_json::to_value(self.catalog.list()),
            collections::RESERVATIONS => serde_json::to_value(self.ledger.list()),
            collections::SENT_EMAILS => serde_json::to_value(self.log.records()),
            collections::USERS => serde_json::to_value(&self.users),
            other => {
                return Err(Error::Validation(format!("unknown collection {other}")));
            }
        };
        value.map_err(Error::transport)
    }
}

/// The EventHub store.
///
/// Owns all mutable state and the persistence backend. Cheap to share via
/// `Arc`; all methods take `&self`.
pub struct EventHub {
    backend: Arc<dyn Backend>,
    state: Mutex<HubState>,
}

impl EventHub {
    /// Opens a store over a backend, reading every collection.
    ///
    /// Collections are written one at a time, so a crash mid-commit can
    /// leave them mutually inconsistent on the medium. The ledger is the
    /// source of truth: sold counts are rebuilt from confirmed reservations
    /// here, so the conservation invariant holds from the first read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] when a collection cannot be read or
    /// holds data that does not deserialize.
    pub async fn open(backend: Arc<dyn Backend>) -> Result<Self> {
        let mut catalog =
            Catalog::from_events(load_collection(&*backend, collections::EVENTS).await?);
        let ledger =
            Ledger::from_reservations(load_collection(&*backend, collections::RESERVATIONS).await?);
        let repaired = catalog.reconcile_sold(&ledger.confirmed_counts());
        if repaired > 0 {
            warn!(
                events = repaired,
                "stored sold counts disagreed with the ledger; rebuilt from confirmed reservations"
            );
        }
        let log =
            NotificationLog::from_records(load_collection(&*backend, collections::SENT_EMAILS).await?);
        let users: Vec<User> = load_collection(&*backend, collections::USERS).await?;
        info!(
            events = catalog.list().len(),
            reservations = ledger.list().len(),
            notifications = log.records().len(),
            users = users.len(),
            "store opened"
        );
        Ok(Self {
            backend,
            state: Mutex::new(HubState {
                catalog,
                ledger,
                log,
                users,
            }),
        })
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// All events in insertion order.
    pub async fn events(&self) -> Vec<Event> {
        self.state.lock().await.catalog.list().to_vec()
    }

    /// One event by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id.
    pub async fn event(&self, event_id: EventId) -> Result<Event> {
        Ok(self.state.lock().await.catalog.get(event_id)?.clone())
    }

    /// Creates an event (administrative action).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a malformed draft and
    /// [`Error::Transport`] when persisting fails.
    pub async fn create_event(&self, draft: EventDraft) -> Result<Event> {
        self.commit(&[collections::EVENTS], |state| state.catalog.create(draft))
            .await
    }

    /// Applies a partial update to an event.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`], [`Error::Validation`] (capacity below
    /// sold count) or [`Error::Transport`].
    pub async fn update_event(&self, event_id: EventId, patch: EventPatch) -> Result<Event> {
        self.commit(&[collections::EVENTS], |state| {
            state.catalog.update(event_id, patch)
        })
        .await
    }

    /// Removes an event and every reservation referencing it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] or [`Error::Transport`].
    pub async fn remove_event(&self, event_id: EventId) -> Result<Event> {
        self.commit(
            &[collections::EVENTS, collections::RESERVATIONS],
            |state| {
                let removed = state.catalog.remove(event_id)?;
                state.ledger.remove_for_event(event_id);
                Ok(removed)
            },
        )
        .await
    }

    /// Seeds the sample catalog into an empty store. Returns the created
    /// events, or an empty list when the catalog already has events.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] when persisting fails.
    pub async fn seed(&self) -> Result<Vec<Event>> {
        self.commit(&[collections::EVENTS], |state| {
            if !state.catalog.is_empty() {
                return Ok(Vec::new());
            }
            seed::sample_events()
                .into_iter()
                .map(|draft| state.catalog.create(draft))
                .collect()
        })
        .await
    }

    // ========================================================================
    // Reservations
    // ========================================================================

    /// All reservations in insertion order, cancelled ones included.
    pub async fn reservations(&self) -> Vec<Reservation> {
        self.state.lock().await.ledger.list().to_vec()
    }

    /// One reservation by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id.
    pub async fn reservation(&self, reservation_id: ReservationId) -> Result<Reservation> {
        Ok(self.state.lock().await.ledger.get(reservation_id)?.clone())
    }

    /// Reserves tickets: the atomic unit of work. See [`Ledger::reserve`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] (unknown user or event),
    /// [`Error::Validation`], [`Error::CapacityExceeded`] or
    /// [`Error::Transport`]; on any of them nothing changed.
    pub async fn reserve(
        &self,
        user_id: UserId,
        event_id: EventId,
        ticket_count: u32,
    ) -> Result<Reservation> {
        self.commit(
            &[
                collections::EVENTS,
                collections::RESERVATIONS,
                collections::SENT_EMAILS,
            ],
            move |state| {
                let user = state
                    .users
                    .iter()
                    .find(|user| user.id == user_id)
                    .cloned()
                    .ok_or_else(|| Error::not_found("user", user_id))?;
                state
                    .ledger
                    .reserve(&mut state.catalog, &mut state.log, &user, event_id, ticket_count)
            },
        )
        .await
    }

    /// Cancels a confirmed reservation. See [`Ledger::cancel`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`], [`Error::InvalidState`] (already
    /// cancelled) or [`Error::Transport`]; on any of them nothing changed.
    pub async fn cancel(&self, reservation_id: ReservationId) -> Result<Reservation> {
        self.commit(
            &[
                collections::EVENTS,
                collections::RESERVATIONS,
                collections::SENT_EMAILS,
            ],
            move |state| {
                let users = state.users.clone();
                state
                    .ledger
                    .cancel(&mut state.catalog, &mut state.log, &users, reservation_id)
            },
        )
        .await
    }

    /// Records a reminder notification for a confirmed reservation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`], [`Error::InvalidState`] or
    /// [`Error::Transport`].
    pub async fn remind(&self, reservation_id: ReservationId) -> Result<()> {
        self.commit(&[collections::SENT_EMAILS], move |state| {
            let users = state.users.clone();
            state
                .ledger
                .remind(&state.catalog, &mut state.log, &users, reservation_id)
        })
        .await
    }

    // ========================================================================
    // Query views
    // ========================================================================

    /// Confirmed reservations owned by a user.
    pub async fn user_reservations(&self, user_id: UserId) -> Vec<Reservation> {
        views::user_reservations(&self.state.lock().await.ledger, user_id)
    }

    /// Confirmed reservations referencing an event.
    pub async fn event_attendance(&self, event_id: EventId) -> Vec<Reservation> {
        views::event_attendance(&self.state.lock().await.ledger, event_id)
    }

    /// Occupancy snapshot for an event, read under one lock so the count,
    /// capacity and ratio always agree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown event.
    pub async fn event_occupancy(&self, event_id: EventId) -> Result<Occupancy> {
        views::event_occupancy(&self.state.lock().await.catalog, event_id)
    }

    /// Aggregate metrics over confirmed reservations.
    pub async fn aggregate_metrics(&self) -> AggregateMetrics {
        views::aggregate_metrics(&self.state.lock().await.ledger)
    }

    /// Notification records matching a filter, in insertion order.
    pub async fn notifications(&self, filter: &NotificationFilter) -> Vec<Notification> {
        self.state
            .lock()
            .await
            .log
            .query(filter)
            .cloned()
            .collect()
    }

    // ========================================================================
    // User directory
    // ========================================================================

    /// All users in signup order.
    pub async fn users(&self) -> Vec<User> {
        self.state.lock().await.users.clone()
    }

    /// One user by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id.
    pub async fn user(&self, user_id: UserId) -> Result<User> {
        self.state
            .lock()
            .await
            .users
            .iter()
            .find(|user| user.id == user_id)
            .cloned()
            .ok_or_else(|| Error::not_found("user", user_id))
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a blank name, a malformed email or
    /// a duplicate email, and [`Error::Transport`] when persisting fails.
    pub async fn signup(&self, email: &str, name: &str, role: UserRole) -> Result<User> {
        let email = normalized_email(email)?;
        let name = name.trim().to_string();
        self.commit(&[collections::USERS], move |state| {
            if name.is_empty() {
                return Err(Error::Validation("name is required".into()));
            }
            if state.users.iter().any(|user| user.email == email) {
                return Err(Error::Validation(format!("email {email} is already registered")));
            }
            let user = User {
                id: UserId::new(),
                email,
                name,
                role,
                created_at: Utc::now(),
            };
            state.users.push(user.clone());
            Ok(user)
        })
        .await
    }

    /// Looks up an account by email. Credential verification is outside the
    /// core; the caller only learns whether the account exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown email.
    pub async fn login(&self, email: &str) -> Result<User> {
        let email = email.trim().to_ascii_lowercase();
        self.state
            .lock()
            .await
            .users
            .iter()
            .find(|user| user.email == email)
            .cloned()
            .ok_or_else(|| Error::not_found("user", email))
    }

    /// Applies a partial update to a user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`], [`Error::Validation`] (malformed or
    /// duplicate email) or [`Error::Transport`].
    pub async fn update_user(&self, user_id: UserId, patch: UserPatch) -> Result<User> {
        let email = patch.email.as_deref().map(normalized_email).transpose()?;
        self.commit(&[collections::USERS], move |state| {
            if let Some(email) = &email {
                if state
                    .users
                    .iter()
                    .any(|user| user.email == *email && user.id != user_id)
                {
                    return Err(Error::Validation(format!("email {email} is already registered")));
                }
            }
            let user = state
                .users
                .iter_mut()
                .find(|user| user.id == user_id)
                .ok_or_else(|| Error::not_found("user", user_id))?;
            if let Some(email) = email {
                user.email = email;
            }
            if let Some(name) = patch.name {
                user.name = name;
            }
            if let Some(role) = patch.role {
                user.role = role;
            }
            Ok(user.clone())
        })
        .await
    }

    /// Removes a user and every reservation they own; confirmed ticket
    /// counts are returned to their events first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] or [`Error::Transport`].
    pub async fn remove_user(&self, user_id: UserId) -> Result<User> {
        self.commit(
            &[
                collections::USERS,
                collections::RESERVATIONS,
                collections::EVENTS,
            ],
            move |state| {
                let position = state
                    .users
                    .iter()
                    .position(|user| user.id == user_id)
                    .ok_or_else(|| Error::not_found("user", user_id))?;
                state.ledger.remove_for_user(&mut state.catalog, user_id);
                Ok(state.users.remove(position))
            },
        )
        .await
    }

    // ========================================================================
    // Critical section
    // ========================================================================

    /// Runs `op` against a clone of the state; on success writes `affected`
    /// collections through the backend and commits the clone. A failure at
    /// any point leaves observable state untouched.
    async fn commit<T, F>(&self, affected: &[&str], op: F) -> Result<T>
    where
        F: FnOnce(&mut HubState) -> Result<T>,
    {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let output = op(&mut next)?;
        for collection in affected {
            let value = next.collection_json(collection)?;
            self.backend
                .save(collection, value)
                .await
                .map_err(Error::transport)?;
        }
        *state = next;
        Ok(output)
    }
}

fn normalized_email(email: &str) -> Result<String> {
    let email = email.trim().to_ascii_lowercase();
    if !email.contains('@') {
        return Err(Error::Validation("email address is malformed".into()));
    }
    Ok(email)
}

async fn load_collection<T>(backend: &dyn Backend, collection: &str) -> Result<Vec<T>>
where
    T: serde::de::DeserializeOwned,
{
    match backend.load(collection).await.map_err(Error::transport)? {
        Some(value) => serde_json::from_value(value).map_err(Error::transport),
        None => Ok(Vec::new()),
    }
}
