//! Event catalog: the collection of [`Event`] records and their sold-ticket
//! counts.
//!
//! The catalog owns event CRUD and the sold-count bookkeeping primitive.
//! `adjust_sold` is crate-private: only the reservation ledger may move a
//! sold count, and it validates capacity before calling.

use crate::error::{Error, Result};
use crate::types::{Event, EventDraft, EventId, EventPatch};
use chrono::Utc;
use std::collections::HashMap;

/// Ordered collection of events. Insertion order is preserved, matching the
/// stored `events` JSON array.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    events: Vec<Event>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Restores a catalog from a previously persisted collection.
    #[must_use]
    pub const fn from_events(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// All events in insertion order.
    #[must_use]
    pub fn list(&self) -> &[Event] {
        &self.events
    }

    /// Whether the catalog holds no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Looks up an event by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id.
    pub fn get(&self, event_id: EventId) -> Result<&Event> {
        self.events
            .iter()
            .find(|event| event.id == event_id)
            .ok_or_else(|| Error::not_found("event", event_id))
    }

    /// Creates a new event from a draft: assigns a fresh id, initializes the
    /// sold count to zero and stamps the creation time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when required text fields are blank or
    /// the capacity is zero.
    pub fn create(&mut self, draft: EventDraft) -> Result<Event> {
        validate_draft(&draft)?;
        let event = Event {
            id: EventId::new(),
            title: draft.title,
            description: draft.description,
            date: draft.date,
            time: draft.time,
            location: draft.location,
            category: draft.category,
            price: draft.price,
            capacity: draft.capacity,
            sold_count: 0,
            image: draft.image,
            organizer: draft.organizer,
            created_at: Utc::now(),
        };
        self.events.push(event.clone());
        Ok(event)
    }

    /// Applies a partial update. The sold count is never touched, and the
    /// capacity may not drop below it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id and [`Error::Validation`]
    /// when the new capacity is zero or below the current sold count.
    pub fn update(&mut self, event_id: EventId, patch: EventPatch) -> Result<Event> {
        let event = self.get_mut(event_id)?;
        if let Some(capacity) = patch.capacity {
            if capacity == 0 {
                return Err(Error::Validation("capacity must be positive".into()));
            }
            if capacity < event.sold_count {
                return Err(Error::Validation(format!(
                    "capacity {capacity} is below the {} tickets already sold",
                    event.sold_count
                )));
            }
            event.capacity = capacity;
        }
        if let Some(title) = patch.title {
            event.title = title;
        }
        if let Some(description) = patch.description {
            event.description = description;
        }
        if let Some(date) = patch.date {
            event.date = date;
        }
        if let Some(time) = patch.time {
            event.time = time;
        }
        if let Some(location) = patch.location {
            event.location = location;
        }
        if let Some(category) = patch.category {
            event.category = category;
        }
        if let Some(price) = patch.price {
            event.price = price;
        }
        if let Some(image) = patch.image {
            event.image = image;
        }
        if let Some(organizer) = patch.organizer {
            event.organizer = organizer;
        }
        Ok(event.clone())
    }

    /// Removes an event and returns it. Cascading removal of reservations
    /// referencing the event is handled by the owning store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id.
    pub fn remove(&mut self, event_id: EventId) -> Result<Event> {
        let position = self
            .events
            .iter()
            .position(|event| event.id == event_id)
            .ok_or_else(|| Error::not_found("event", event_id))?;
        Ok(self.events.remove(position))
    }

    /// Moves the sold count by `delta`, clamped to `0..=capacity`.
    ///
    /// The clamp at zero guards against double-cancellation bugs; the ledger
    /// validates availability before ever calling with a positive delta, so
    /// the upper clamp is unreachable in practice.
    pub(crate) fn adjust_sold(&mut self, event_id: EventId, delta: i64) -> Result<()> {
        let event = self.get_mut(event_id)?;
        let adjusted = i64::from(event.sold_count).saturating_add(delta);
        event.sold_count = u32::try_from(adjusted.clamp(0, i64::from(event.capacity)))
            .unwrap_or(event.capacity);
        Ok(())
    }

    /// Rewrites every sold count from the per-event confirmed ticket sums,
    /// returning how many events were out of line.
    ///
    /// The ledger is the source of truth for sold counts. A crash between
    /// two collection writes can persist a count the ledger does not back;
    /// the store calls this on open to repair such state.
    pub(crate) fn reconcile_sold(&mut self, confirmed: &HashMap<EventId, u32>) -> usize {
        let mut repaired = 0;
        for event in &mut self.events {
            let count = confirmed
                .get(&event.id)
                .copied()
                .unwrap_or(0)
                .min(event.capacity);
            if event.sold_count != count {
                event.sold_count = count;
                repaired += 1;
            }
        }
        repaired
    }

    fn get_mut(&mut self, event_id: EventId) -> Result<&mut Event> {
        self.events
            .iter_mut()
            .find(|event| event.id == event_id)
            .ok_or_else(|| Error::not_found("event", event_id))
    }
}

fn validate_draft(draft: &EventDraft) -> Result<()> {
    for (field, value) in [
        ("title", &draft.title),
        ("location", &draft.location),
        ("category", &draft.category),
        ("organizer", &draft.organizer),
    ] {
        if value.trim().is_empty() {
            return Err(Error::Validation(format!("{field} is required")));
        }
    }
    if draft.capacity == 0 {
        return Err(Error::Validation("capacity must be positive".into()));
    }
    Ok(())
}
