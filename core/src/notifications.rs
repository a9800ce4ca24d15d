//! Notification log: append-only record of messages that would be sent.
//!
//! Delivery (SMTP, provider API) is an external collaborator; this component
//! only composes and stores the records. Storage order is insertion order —
//! presenting newest-first is a view concern.

use crate::types::{
    Money, Notification, NotificationCategory, NotificationId, ReservationId,
};
use chrono::{NaiveDate, Utc};

// ============================================================================
// Log
// ============================================================================

/// Filter for querying the log. `None` fields match everything.
#[derive(Clone, Debug, Default)]
pub struct NotificationFilter {
    /// Match a single category.
    pub category: Option<NotificationCategory>,
    /// Match a single recipient address.
    pub recipient: Option<String>,
}

/// Append-only list of [`Notification`] records.
#[derive(Clone, Debug, Default)]
pub struct NotificationLog {
    records: Vec<Notification>,
}

impl NotificationLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self { records: Vec::new() }
    }

    /// Restores a log from a previously persisted collection.
    #[must_use]
    pub const fn from_records(records: Vec<Notification>) -> Self {
        Self { records }
    }

    /// Appends a record. Records are never mutated or deleted afterwards.
    pub fn append(&mut self, record: Notification) {
        self.records.push(record);
    }

    /// All records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[Notification] {
        &self.records
    }

    /// Records matching the filter, lazily, in insertion order.
    pub fn query<'a>(
        &'a self,
        filter: &'a NotificationFilter,
    ) -> impl Iterator<Item = &'a Notification> {
        self.records.iter().filter(move |record| {
            filter
                .category
                .is_none_or(|category| record.category == category)
                && filter
                    .recipient
                    .as_deref()
                    .is_none_or(|recipient| record.to == recipient)
        })
    }
}

// ============================================================================
// Message composition
// ============================================================================

/// Composes the confirmation message recorded when a reservation is created.
#[must_use]
pub fn confirmation(
    recipient: &str,
    event_title: &str,
    reservation_id: ReservationId,
    total_price: Money,
) -> Notification {
    Notification {
        id: NotificationId::new(),
        to: recipient.to_string(),
        subject: format!("Reservation Confirmed: {event_title}"),
        body: format!(
            "Your reservation has been confirmed!\n\n\
             Event: {event_title}\n\
             Confirmation Number: {reservation_id}\n\
             Total Price: {total_price}\n\n\
             Thank you for booking with EventHub!"
        ),
        category: NotificationCategory::Confirmation,
        timestamp: Utc::now(),
    }
}

/// Composes the cancellation message recorded when a reservation is cancelled.
#[must_use]
pub fn cancellation(recipient: &str, event_title: &str, refund_amount: Money) -> Notification {
    Notification {
        id: NotificationId::new(),
        to: recipient.to_string(),
        subject: format!("Reservation Cancelled: {event_title}"),
        body: format!(
            "Your reservation has been cancelled.\n\n\
             Event: {event_title}\n\
             Refund Amount: {refund_amount}\n\n\
             Your refund will be processed within 5-7 business days."
        ),
        category: NotificationCategory::Cancellation,
        timestamp: Utc::now(),
    }
}

/// Composes a reminder message. Only recorded on explicit request; the core
/// has no scheduler.
#[must_use]
pub fn reminder(recipient: &str, event_title: &str, event_date: NaiveDate) -> Notification {
    Notification {
        id: NotificationId::new(),
        to: recipient.to_string(),
        subject: format!("Reminder: {event_title} on {event_date}"),
        body: format!(
            "This is a reminder about your upcoming event.\n\n\
             Event: {event_title}\n\
             Date: {event_date}\n\n\
             We look forward to seeing you there!"
        ),
        category: NotificationCategory::Reminder,
        timestamp: Utc::now(),
    }
}
