use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::starter::starter_bookings;
use crate::error::LedgerError;
use crate::models::{Booking, BookingId, BookingPatch, ListingId, NewBooking};
use crate::storage::PersistenceMirror;

/// Aggregate figures shown above the bookings list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub total_bookings: usize,
    pub total_nights: u64,
    pub total_amount: u64,
}

/// Receipt for a cancelled booking
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cancellation {
    pub reference: String,
    pub cancelled_at: DateTime<Utc>,
    pub booking: Booking,
}

/// Ordered, in-memory collection of bookings, newest first
///
/// The ledger owns the canonical records. Every successful mutation is
/// mirrored to the configured [`PersistenceMirror`]; a failing mirror never
/// fails the mutation.
pub struct BookingLedger {
    bookings: Vec<Booking>,
    mirror: Option<PersistenceMirror>,
    last_issued_millis: i64,
}

impl BookingLedger {
    /// Empty ledger
    pub fn new(mirror: Option<PersistenceMirror>) -> Self {
        Self {
            bookings: Vec::new(),
            mirror,
            last_issued_millis: 0,
        }
    }

    /// Empty ledger without a durable copy
    pub fn in_memory() -> Self {
        Self::new(None)
    }

    /// Ledger starting from the fixed demo trips, regardless of what the
    /// mirror holds
    pub fn seeded(mirror: Option<PersistenceMirror>) -> Self {
        let mut ledger = Self::new(mirror);
        ledger.bookings = starter_bookings();
        ledger.persist();
        info!("📋 Seeded ledger with {} starter bookings", ledger.len());
        ledger
    }

    /// Ledger read back from the mirror, falling back to the demo trips when
    /// the slot is empty or unreadable
    pub fn restore(mirror: PersistenceMirror) -> Self {
        let saved = match mirror.load() {
            Ok(Some(saved)) if !saved.is_empty() => saved,
            Ok(_) => {
                info!("No saved bookings under '{}'", mirror.key());
                return Self::seeded(Some(mirror));
            }
            Err(err) => {
                warn!("Failed to load saved bookings, using starter data: {}", err);
                return Self::seeded(Some(mirror));
            }
        };

        let found = saved.len();
        let kept = dedupe(saved);
        if kept.is_empty() {
            warn!("None of the {} saved bookings were usable, using starter data", found);
            return Self::seeded(Some(mirror));
        }

        let mut ledger = Self::new(Some(mirror));
        ledger.bookings = kept;
        if ledger.len() < found {
            ledger.persist();
        }
        info!("📂 Restored {} bookings", ledger.len());
        ledger
    }

    /// Store a new booking at the front of the ledger
    pub fn add(&mut self, draft: NewBooking) -> Result<Booking, LedgerError> {
        draft.validate()?;

        let id = match draft.id.clone() {
            Some(id) if self.contains(&id) => return Err(LedgerError::DuplicateId(id)),
            Some(id) => id,
            None => self.next_id(),
        };

        let booking = draft.into_booking(id)?;
        self.ensure_total_fits(None, &booking)?;
        self.bookings.insert(0, booking.clone());
        self.persist();
        debug!("Added booking {} ({})", booking.id, booking.title);
        Ok(booking)
    }

    /// Merge `patch` into the booking with `id`
    ///
    /// The total is recomputed only when dates, rental days or the unit
    /// price changed. On error the ledger is left untouched.
    pub fn update(&mut self, id: &BookingId, patch: &BookingPatch) -> Result<Booking, LedgerError> {
        let index = self
            .position(id)
            .ok_or_else(|| LedgerError::NotFound(id.clone()))?;

        if patch.is_empty() {
            return Ok(self.bookings[index].clone());
        }

        let updated = patch.apply(&self.bookings[index])?;
        self.ensure_total_fits(Some(&self.bookings[index]), &updated)?;
        self.bookings[index] = updated.clone();
        self.persist();
        debug!("Updated booking {}", id);
        Ok(updated)
    }

    /// Delete and return the booking with `id`
    pub fn remove(&mut self, id: &BookingId) -> Result<Booking, LedgerError> {
        let index = self
            .position(id)
            .ok_or_else(|| LedgerError::NotFound(id.clone()))?;
        let removed = self.bookings.remove(index);
        self.persist();
        debug!("Removed booking {}", id);
        Ok(removed)
    }

    /// Delete every booking made against the listing `item_id`
    pub fn remove_for_item(&mut self, item_id: &ListingId) -> usize {
        let before = self.bookings.len();
        self.bookings.retain(|booking| {
            !booking
                .item_id
                .as_ref()
                .is_some_and(|own| own.matches(item_id))
        });
        let removed = before - self.bookings.len();
        if removed > 0 {
            self.persist();
            debug!("Removed {} bookings for listing {}", removed, item_id);
        }
        removed
    }

    /// Cancel the booking with `id` and hand back a receipt
    pub fn cancel(&mut self, id: &BookingId) -> Result<Cancellation, LedgerError> {
        let booking = self.remove(id)?;
        let cancelled_at = Utc::now();
        let reference = cancellation_reference(cancelled_at.timestamp_millis());
        info!("❌ Cancelled booking {} (ref {})", booking.id, reference);
        Ok(Cancellation {
            reference,
            cancelled_at,
            booking,
        })
    }

    /// Drop every booking and the saved copy
    pub fn clear(&mut self) {
        self.bookings.clear();
        if let Some(mirror) = &self.mirror {
            mirror.clear();
        }
        info!("🗑️ Cleared all bookings");
    }

    pub fn find_by_id(&self, id: &BookingId) -> Option<&Booking> {
        self.bookings.iter().find(|booking| booking.id == *id)
    }

    pub fn contains(&self, id: &BookingId) -> bool {
        self.position(id).is_some()
    }

    /// Copy of the current ordered collection
    pub fn snapshot(&self) -> Vec<Booking> {
        self.bookings.clone()
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn iter(&self) -> impl Iterator<Item = &Booking> {
        self.bookings.iter()
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }

    /// Nights across all property bookings; cars do not count
    pub fn total_nights(&self) -> u64 {
        self.bookings.iter().map(Booking::nights).sum()
    }

    /// Sum of every booking total; mutations keep it within `u64`
    pub fn total_amount(&self) -> u64 {
        self.bookings
            .iter()
            .fold(0, |sum, booking| sum.saturating_add(booking.total))
    }

    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary {
            total_bookings: self.len(),
            total_nights: self.total_nights(),
            total_amount: self.total_amount(),
        }
    }

    fn position(&self, id: &BookingId) -> Option<usize> {
        self.bookings.iter().position(|booking| booking.id == *id)
    }

    // Millisecond timestamps, bumped so ids stay strictly increasing
    fn next_id(&mut self) -> BookingId {
        let mut millis = Utc::now()
            .timestamp_millis()
            .max(self.last_issued_millis + 1);
        while self.contains(&BookingId::from_millis(millis)) {
            millis += 1;
        }
        self.last_issued_millis = millis;
        BookingId::from_millis(millis)
    }

    // Rejects a change that would push the ledger-wide amount past `u64`
    fn ensure_total_fits(
        &self,
        replacing: Option<&Booking>,
        incoming: &Booking,
    ) -> Result<(), LedgerError> {
        let base = self.total_amount() - replacing.map_or(0, |booking| booking.total);
        base.checked_add(incoming.total)
            .map(|_| ())
            .ok_or_else(|| LedgerError::validation("total overflows"))
    }

    fn persist(&self) {
        if let Some(mirror) = &self.mirror {
            mirror.save(&self.bookings);
        }
    }
}

impl Default for BookingLedger {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn dedupe(bookings: Vec<Booking>) -> Vec<Booking> {
    let mut seen = HashSet::new();
    let mut amount: u64 = 0;
    bookings
        .into_iter()
        .filter(|booking| {
            if !seen.insert(booking.id.clone()) {
                warn!("Dropping saved booking with duplicate id {}", booking.id);
                return false;
            }
            if let Err(err) = booking.validate() {
                warn!("Dropping invalid saved booking {}: {}", booking.id, err);
                return false;
            }
            match amount.checked_add(booking.total) {
                Some(sum) => amount = sum,
                None => {
                    warn!("Dropping saved booking {}: total overflows", booking.id);
                    return false;
                }
            }
            true
        })
        .collect()
}

fn cancellation_reference(millis: i64) -> String {
    format!("BK{}", 100_000 + millis.rem_euclid(900_000))
}
