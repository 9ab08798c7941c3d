use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::{LedgerError, SourceError};
use crate::ledger::BookingLedger;
use crate::models::{Booking, BookingId, ListingId, NewBooking};
use crate::sources::api::ApiClient;

/// Which side ended up handling a booking call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Backend,
    /// Served from the local ledger; carries the number of records touched
    Local(usize),
}

/// Booking calls against the backend, falling back to the local ledger when
/// the backend fails or does not answer in time
pub struct BookingSync {
    remote: Option<Arc<ApiClient>>,
    timeout: Duration,
}

impl BookingSync {
    pub fn new(remote: Arc<ApiClient>, timeout: Duration) -> Self {
        Self {
            remote: Some(remote),
            timeout,
        }
    }

    /// Every call goes straight to the ledger
    pub fn offline() -> Self {
        Self {
            remote: None,
            timeout: Duration::ZERO,
        }
    }

    pub async fn bookings(&self, ledger: &BookingLedger) -> Vec<Booking> {
        if let Some(remote) = &self.remote {
            if let Some(bookings) = self.attempt("bookings", remote.bookings()).await {
                info!("📋 Loaded {} bookings from the backend", bookings.len());
                return bookings;
            }
        }
        ledger.snapshot()
    }

    /// Create the booking remotely, or store it in `ledger` when that fails
    ///
    /// The draft is validated first so an invalid booking never reaches
    /// either side.
    pub async fn add(
        &self,
        ledger: &mut BookingLedger,
        draft: NewBooking,
    ) -> Result<Booking, LedgerError> {
        draft.validate()?;
        if let Some(remote) = &self.remote {
            let call = remote.create_booking(&draft);
            if let Some(booking) = self.attempt("create booking", call).await {
                return Ok(booking);
            }
        }
        ledger.add(draft)
    }

    pub async fn remove(
        &self,
        ledger: &mut BookingLedger,
        id: &BookingId,
    ) -> Result<Handled, LedgerError> {
        if let Some(remote) = &self.remote {
            if self.attempt("delete booking", remote.delete_booking(id)).await.is_some() {
                return Ok(Handled::Backend);
            }
        }
        ledger.remove(id).map(|_| Handled::Local(1))
    }

    pub async fn remove_for_item(
        &self,
        ledger: &mut BookingLedger,
        item_id: &ListingId,
    ) -> Handled {
        if let Some(remote) = &self.remote {
            let call = remote.delete_bookings_for_item(item_id);
            if self.attempt("delete bookings for item", call).await.is_some() {
                return Handled::Backend;
            }
        }
        Handled::Local(ledger.remove_for_item(item_id))
    }

    async fn attempt<T>(
        &self,
        what: &str,
        call: impl Future<Output = Result<T, SourceError>>,
    ) -> Option<T> {
        let err = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => return Some(value),
            Ok(Err(err)) => err,
            Err(_) => SourceError::Timeout(self.timeout),
        };
        warn!("Backend failed to {}, using local bookings: {}", what, err);
        None
    }
}
