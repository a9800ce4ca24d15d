//! Reservation ledger: reservation lifecycle and capacity accounting.
//!
//! The ledger is the only component that moves an event's sold count. Every
//! state-changing operation validates before mutating, and performs all of
//! its mutations (reservation row, catalog sold count, notification record)
//! after the last fallible step, so a failure leaves state untouched.

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::notifications::{self, NotificationLog};
use crate::types::{
    EventId, Reservation, ReservationId, ReservationStatus, User, UserId,
};
use chrono::Utc;
use std::collections::HashMap;
use tracing::info;

/// Ordered collection of reservations. Insertion order is preserved,
/// matching the stored `reservations` JSON array.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    reservations: Vec<Reservation>,
}

impl Ledger {
    /// Creates an empty ledger.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            reservations: Vec::new(),
        }
    }

    /// Restores a ledger from a previously persisted collection.
    #[must_use]
    pub const fn from_reservations(reservations: Vec<Reservation>) -> Self {
        Self { reservations }
    }

    /// All reservations in insertion order.
    #[must_use]
    pub fn list(&self) -> &[Reservation] {
        &self.reservations
    }

    /// Looks up a reservation by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id.
    pub fn get(&self, reservation_id: ReservationId) -> Result<&Reservation> {
        self.reservations
            .iter()
            .find(|reservation| reservation.id == reservation_id)
            .ok_or_else(|| Error::not_found("reservation", reservation_id))
    }

    /// Reserves `ticket_count` tickets on an event for a user.
    ///
    /// On success the reservation is created with status confirmed and a
    /// price snapshot of `ticket_count × unit price`, the event's sold count
    /// grows by `ticket_count`, and one confirmation notification addressed
    /// to the user is appended. On any failure nothing is mutated and no
    /// notification is recorded.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] when `ticket_count` is zero or the price
    ///   snapshot would overflow.
    /// - [`Error::NotFound`] when the event does not exist.
    /// - [`Error::CapacityExceeded`] when fewer than `ticket_count` tickets
    ///   remain available.
    pub fn reserve(
        &mut self,
        catalog: &mut Catalog,
        log: &mut NotificationLog,
        user: &User,
        event_id: EventId,
        ticket_count: u32,
    ) -> Result<Reservation> {
        if ticket_count == 0 {
            return Err(Error::Validation("ticket count must be at least 1".into()));
        }
        let event = catalog.get(event_id)?;
        let available = event.available();
        if ticket_count > available {
            return Err(Error::CapacityExceeded {
                requested: ticket_count,
                available,
            });
        }
        let total_price = event
            .price
            .checked_mul(ticket_count)
            .ok_or_else(|| Error::Validation("total price overflows".into()))?;
        let event_title = event.title.clone();

        // All preconditions hold; from here every step is infallible except
        // the sold-count adjustment, which runs first and can only fail on a
        // missing event (just looked up above).
        catalog.adjust_sold(event_id, i64::from(ticket_count))?;
        let reservation = Reservation {
            id: ReservationId::new(),
            user_id: user.id,
            event_id,
            ticket_count,
            total_price,
            status: ReservationStatus::Confirmed,
            created_at: Utc::now(),
            cancelled_at: None,
        };
        self.reservations.push(reservation.clone());
        log.append(notifications::confirmation(
            &user.email,
            &event_title,
            reservation.id,
            total_price,
        ));
        info!(
            reservation = %reservation.id,
            event = %event_id,
            user = %user.id,
            tickets = ticket_count,
            total = %total_price,
            "reservation confirmed"
        );
        Ok(reservation)
    }

    /// Cancels a confirmed reservation.
    ///
    /// On success the status flips to cancelled (the row is kept for audit),
    /// the event's sold count shrinks by the reservation's ticket count, and
    /// one cancellation notification is appended. Cancellation is not
    /// idempotent: a second call on the same id fails.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] for an unknown reservation, or when the owner
    ///   or event can no longer be resolved.
    /// - [`Error::InvalidState`] when the reservation is already cancelled.
    pub fn cancel(
        &mut self,
        catalog: &mut Catalog,
        log: &mut NotificationLog,
        users: &[User],
        reservation_id: ReservationId,
    ) -> Result<Reservation> {
        let position = self
            .reservations
            .iter()
            .position(|reservation| reservation.id == reservation_id)
            .ok_or_else(|| Error::not_found("reservation", reservation_id))?;
        if self.reservations[position].status == ReservationStatus::Cancelled {
            return Err(Error::InvalidState(format!(
                "reservation {reservation_id} is already cancelled"
            )));
        }
        let (user_id, event_id, ticket_count, refund) = {
            let reservation = &self.reservations[position];
            (
                reservation.user_id,
                reservation.event_id,
                reservation.ticket_count,
                reservation.total_price,
            )
        };
        let recipient = owner_email(users, user_id)?;
        let event_title = catalog.get(event_id)?.title.clone();

        catalog.adjust_sold(event_id, -i64::from(ticket_count))?;
        let reservation = &mut self.reservations[position];
        reservation.status = ReservationStatus::Cancelled;
        reservation.cancelled_at = Some(Utc::now());
        let cancelled = reservation.clone();
        log.append(notifications::cancellation(&recipient, &event_title, refund));
        info!(
            reservation = %reservation_id,
            event = %event_id,
            tickets = ticket_count,
            refund = %refund,
            "reservation cancelled"
        );
        Ok(cancelled)
    }

    /// Records a reminder notification for a confirmed reservation.
    ///
    /// There is no scheduler: reminders are only recorded when explicitly
    /// requested.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] for an unknown reservation, owner or event.
    /// - [`Error::InvalidState`] when the reservation is cancelled.
    pub fn remind(
        &self,
        catalog: &Catalog,
        log: &mut NotificationLog,
        users: &[User],
        reservation_id: ReservationId,
    ) -> Result<()> {
        let reservation = self.get(reservation_id)?;
        if reservation.status == ReservationStatus::Cancelled {
            return Err(Error::InvalidState(format!(
                "reservation {reservation_id} is cancelled"
            )));
        }
        let recipient = owner_email(users, reservation.user_id)?;
        let event = catalog.get(reservation.event_id)?;
        log.append(notifications::reminder(&recipient, &event.title, event.date));
        Ok(())
    }

    /// Sum of confirmed ticket counts per event. The source of truth the
    /// catalog's sold counts are reconciled against on store open.
    pub(crate) fn confirmed_counts(&self) -> HashMap<EventId, u32> {
        let mut counts: HashMap<EventId, u32> = HashMap::new();
        for reservation in &self.reservations {
            if reservation.is_confirmed() {
                let entry = counts.entry(reservation.event_id).or_insert(0);
                *entry = entry.saturating_add(reservation.ticket_count);
            }
        }
        counts
    }

    /// Drops every reservation referencing an event. Used when an event is
    /// removed from the catalog; the rows go with the event.
    pub(crate) fn remove_for_event(&mut self, event_id: EventId) {
        self.reservations
            .retain(|reservation| reservation.event_id != event_id);
    }

    /// Drops every reservation owned by a user, returning confirmed ticket
    /// counts to their events first so the sold-count invariant holds.
    pub(crate) fn remove_for_user(&mut self, catalog: &mut Catalog, user_id: UserId) {
        for reservation in &self.reservations {
            if reservation.user_id == user_id && reservation.is_confirmed() {
                // Event may already be gone; the clamp makes this a no-op then.
                let _ = catalog.adjust_sold(
                    reservation.event_id,
                    -i64::from(reservation.ticket_count),
                );
            }
        }
        self.reservations
            .retain(|reservation| reservation.user_id != user_id);
    }
}

fn owner_email(users: &[User], user_id: UserId) -> Result<String> {
    users
        .iter()
        .find(|user| user.id == user_id)
        .map(|user| user.email.clone())
        .ok_or_else(|| Error::not_found("user", user_id))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::types::{EventDraft, Money, NotificationCategory, UserRole};
    use chrono::{NaiveDate, NaiveTime};

    struct Fixture {
        catalog: Catalog,
        ledger: Ledger,
        log: NotificationLog,
        users: Vec<User>,
        event_id: EventId,
    }

    fn fixture(capacity: u32, price_cents: u64) -> Fixture {
        let mut catalog = Catalog::new();
        let event_id = catalog
            .create(EventDraft {
                title: "Startup Networking Event".into(),
                description: "Connect with fellow entrepreneurs".into(),
                date: NaiveDate::from_ymd_opt(2025, 3, 25).unwrap(),
                time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
                location: "Austin, TX".into(),
                category: "Networking".into(),
                price: Money::from_cents(price_cents),
                capacity,
                image: String::new(),
                organizer: "Startup Hub".into(),
            })
            .unwrap()
            .id;
        let users = vec![User {
            id: UserId::new(),
            email: "ada@example.com".into(),
            name: "Ada".into(),
            role: UserRole::User,
            created_at: Utc::now(),
        }];
        Fixture {
            catalog,
            ledger: Ledger::new(),
            log: NotificationLog::new(),
            users,
            event_id,
        }
    }

    #[test]
    fn reserve_snapshots_price_and_notifies_owner() {
        let mut fx = fixture(10, 7_900);
        let user = fx.users[0].clone();
        let reservation = fx
            .ledger
            .reserve(&mut fx.catalog, &mut fx.log, &user, fx.event_id, 2)
            .unwrap();

        assert_eq!(reservation.ticket_count, 2);
        assert_eq!(reservation.total_price, Money::from_cents(15_800));
        assert_eq!(reservation.status, ReservationStatus::Confirmed);
        assert_eq!(fx.catalog.get(fx.event_id).unwrap().sold_count, 2);

        let records = fx.log.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, NotificationCategory::Confirmation);
        assert_eq!(records[0].to, "ada@example.com");
    }

    #[test]
    fn reserve_rejects_zero_tickets_without_mutation() {
        let mut fx = fixture(10, 7_900);
        let user = fx.users[0].clone();
        let result = fx
            .ledger
            .reserve(&mut fx.catalog, &mut fx.log, &user, fx.event_id, 0);
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(fx.ledger.list().is_empty());
        assert!(fx.log.records().is_empty());
        assert_eq!(fx.catalog.get(fx.event_id).unwrap().sold_count, 0);
    }

    #[test]
    fn reserve_over_capacity_leaves_state_unchanged() {
        let mut fx = fixture(10, 7_900);
        let user = fx.users[0].clone();
        fx.ledger
            .reserve(&mut fx.catalog, &mut fx.log, &user, fx.event_id, 8)
            .unwrap();

        let result = fx
            .ledger
            .reserve(&mut fx.catalog, &mut fx.log, &user, fx.event_id, 3);
        assert!(matches!(
            result,
            Err(Error::CapacityExceeded {
                requested: 3,
                available: 2
            })
        ));
        assert_eq!(fx.catalog.get(fx.event_id).unwrap().sold_count, 8);
        assert_eq!(fx.ledger.list().len(), 1);
        assert_eq!(fx.log.records().len(), 1);

        // Exactly filling the remaining capacity succeeds.
        fx.ledger
            .reserve(&mut fx.catalog, &mut fx.log, &user, fx.event_id, 2)
            .unwrap();
        assert_eq!(fx.catalog.get(fx.event_id).unwrap().sold_count, 10);
    }

    #[test]
    fn price_change_does_not_retroactively_reprice_reservations() {
        let mut fx = fixture(10, 10_000);
        let user = fx.users[0].clone();
        let reservation = fx
            .ledger
            .reserve(&mut fx.catalog, &mut fx.log, &user, fx.event_id, 1)
            .unwrap();

        fx.catalog
            .update(
                fx.event_id,
                crate::types::EventPatch {
                    price: Some(Money::from_cents(25_000)),
                    ..crate::types::EventPatch::default()
                },
            )
            .unwrap();

        assert_eq!(
            fx.ledger.get(reservation.id).unwrap().total_price,
            Money::from_cents(10_000)
        );
    }

    #[test]
    fn cancel_restores_sold_count_and_is_terminal() {
        let mut fx = fixture(10, 7_900);
        let user = fx.users[0].clone();
        fx.ledger
            .reserve(&mut fx.catalog, &mut fx.log, &user, fx.event_id, 8)
            .unwrap();
        let reservation = fx
            .ledger
            .reserve(&mut fx.catalog, &mut fx.log, &user, fx.event_id, 2)
            .unwrap();
        assert_eq!(fx.catalog.get(fx.event_id).unwrap().sold_count, 10);

        let cancelled = fx
            .ledger
            .cancel(&mut fx.catalog, &mut fx.log, &fx.users, reservation.id)
            .unwrap();
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);
        assert!(cancelled.cancelled_at.is_some());
        assert_eq!(fx.catalog.get(fx.event_id).unwrap().sold_count, 8);

        let records = fx.log.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].category, NotificationCategory::Cancellation);

        // Second cancel on the same id fails and produces nothing new.
        let again = fx
            .ledger
            .cancel(&mut fx.catalog, &mut fx.log, &fx.users, reservation.id);
        assert!(matches!(again, Err(Error::InvalidState(_))));
        assert_eq!(fx.catalog.get(fx.event_id).unwrap().sold_count, 8);
        assert_eq!(fx.log.records().len(), 3);
    }

    #[test]
    fn cancel_unknown_reservation_is_not_found() {
        let mut fx = fixture(10, 7_900);
        let result = fx.ledger.cancel(
            &mut fx.catalog,
            &mut fx.log,
            &fx.users,
            ReservationId::new(),
        );
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[test]
    fn remind_records_a_reminder_for_confirmed_reservations_only() {
        let mut fx = fixture(10, 7_900);
        let user = fx.users[0].clone();
        let reservation = fx
            .ledger
            .reserve(&mut fx.catalog, &mut fx.log, &user, fx.event_id, 1)
            .unwrap();

        fx.ledger
            .remind(&fx.catalog, &mut fx.log, &fx.users, reservation.id)
            .unwrap();
        let records = fx.log.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].category, NotificationCategory::Reminder);
        assert!(records[1].subject.contains("2025-03-25"));

        fx.ledger
            .cancel(&mut fx.catalog, &mut fx.log, &fx.users, reservation.id)
            .unwrap();
        let result = fx
            .ledger
            .remind(&fx.catalog, &mut fx.log, &fx.users, reservation.id);
        assert!(matches!(result, Err(Error::InvalidState(_))));
    }
}
