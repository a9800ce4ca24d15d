//! Domain types for the EventHub platform.
//!
//! Value objects and entities shared by the catalog, ledger, notification log
//! and query views. Wire/persistence shapes keep the camelCase field names of
//! the stored JSON collections (`ticketCount`, `totalPrice`, `registeredCount`,
//! `createdAt`), so a data directory written by one process version stays
//! readable by the next.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing `Uuid`.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for an event.
    EventId
);
uuid_id!(
    /// Unique identifier for a reservation.
    ReservationId
);
uuid_id!(
    /// Unique identifier for a user.
    UserId
);
uuid_id!(
    /// Unique identifier for a notification record.
    NotificationId
);

// ============================================================================
// Money Value Object (cents-based to avoid floating point errors)
// ============================================================================

/// Represents money in cents to avoid floating-point arithmetic errors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from cents.
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Creates a `Money` value from whole dollars with overflow checking.
    #[must_use]
    pub const fn checked_from_dollars(dollars: u64) -> Option<Self> {
        match dollars.checked_mul(100) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// Returns the amount in cents.
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Checks if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two money amounts with overflow checking.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// Multiplies the amount by a quantity with overflow checking.
    #[must_use]
    pub const fn checked_mul(self, quantity: u32) -> Option<Self> {
        match self.0.checked_mul(quantity as u64) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }
}

impl fmt::Display for Money {
    /// Formats as `$<dollars>.<cents>`, the shape used in notification bodies.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

// ============================================================================
// Event
// ============================================================================

/// A ticketed occurrence with fixed capacity and unit price.
///
/// `sold_count` is owned by the reservation ledger: no other component writes
/// it, and it always equals the sum of `ticket_count` over confirmed
/// reservations referencing the event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique identifier.
    pub id: EventId,
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Calendar date of the event.
    pub date: NaiveDate,
    /// Start time of day.
    pub time: NaiveTime,
    /// Venue / city.
    pub location: String,
    /// Category label (Conference, Workshop, ...).
    pub category: String,
    /// Unit ticket price.
    pub price: Money,
    /// Maximum number of tickets.
    pub capacity: u32,
    /// Tickets currently held by confirmed reservations.
    #[serde(rename = "registeredCount")]
    pub sold_count: u32,
    /// Image reference (URL or path).
    pub image: String,
    /// Organizer name.
    pub organizer: String,
    /// When the event was created.
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Tickets still available for reservation.
    #[must_use]
    pub const fn available(&self) -> u32 {
        self.capacity.saturating_sub(self.sold_count)
    }
}

/// Input for creating a new event; id, `sold_count` and `created_at` are
/// assigned by the catalog.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Calendar date of the event.
    pub date: NaiveDate,
    /// Start time of day.
    pub time: NaiveTime,
    /// Venue / city.
    pub location: String,
    /// Category label.
    pub category: String,
    /// Unit ticket price.
    pub price: Money,
    /// Maximum number of tickets.
    pub capacity: u32,
    /// Image reference.
    #[serde(default)]
    pub image: String,
    /// Organizer name.
    pub organizer: String,
}

/// Partial update for an event; `None` fields are left unchanged.
///
/// `sold_count` is deliberately absent: only the ledger moves it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New date.
    pub date: Option<NaiveDate>,
    /// New start time.
    pub time: Option<NaiveTime>,
    /// New location.
    pub location: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New unit price (does not affect existing reservations).
    pub price: Option<Money>,
    /// New capacity (must not drop below the current sold count).
    pub capacity: Option<u32>,
    /// New image reference.
    pub image: Option<String>,
    /// New organizer.
    pub organizer: Option<String>,
}

// ============================================================================
// Reservation
// ============================================================================

/// Lifecycle status of a reservation. `Cancelled` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Tickets are held; counted in the event's `sold_count`.
    Confirmed,
    /// Tickets were released back to the event.
    Cancelled,
}

/// A user's claim on a number of tickets for an event.
///
/// Immutable once created except for the `Confirmed` → `Cancelled` transition,
/// which also stamps `cancelled_at`. `total_price` is snapshotted at creation
/// and never recomputed, even if the event price later changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// Unique identifier.
    pub id: ReservationId,
    /// Owning user.
    pub user_id: UserId,
    /// Referenced event.
    pub event_id: EventId,
    /// Number of tickets held (positive).
    pub ticket_count: u32,
    /// Price snapshot: `ticket_count × event price at creation`.
    pub total_price: Money,
    /// Current lifecycle status.
    pub status: ReservationStatus,
    /// When the reservation was created.
    pub created_at: DateTime<Utc>,
    /// When the reservation was cancelled, if it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Reservation {
    /// Whether the reservation currently holds tickets.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.status == ReservationStatus::Confirmed
    }
}

// ============================================================================
// Notification records
// ============================================================================

/// Category of a logged notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    /// Sent when a reservation is created.
    Confirmation,
    /// Sent when a reservation is cancelled.
    Cancellation,
    /// Sent on explicit request ahead of an event.
    Reminder,
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirmation => write!(f, "confirmation"),
            Self::Cancellation => write!(f, "cancellation"),
            Self::Reminder => write!(f, "reminder"),
        }
    }
}

/// A logged description of a message that would be sent.
///
/// Delivery is an external collaborator; the core only records recipient,
/// subject, body and category. Records are append-only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique identifier.
    pub id: NotificationId,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub body: String,
    /// Category of the notification.
    #[serde(rename = "type")]
    pub category: NotificationCategory,
    /// When the record was appended.
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Users
// ============================================================================

/// Role of a registered user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Browsing only.
    Visitor,
    /// Can reserve tickets.
    #[default]
    User,
    /// Can manage events, users and reservations.
    Admin,
}

/// A registered account.
///
/// No credential material is stored; authentication/session security is
/// outside the core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Email address (unique within the directory).
    pub email: String,
    /// Display name.
    pub name: String,
    /// Role.
    pub role: UserRole,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Partial update for a user; `None` fields are left unchanged.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    /// New email address.
    pub email: Option<String>,
    /// New display name.
    pub name: Option<String>,
    /// New role.
    pub role: Option<UserRole>,
}
