//! Booking ledger for a vacation-rental demo: bookings, the list views built
//! from them, a durable mirror, and listing sources with a local fallback.

pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod sources;
pub mod storage;
pub mod view;

pub use config::AppConfig;
pub use error::{ConfigError, LedgerError, SourceError, StorageError};
pub use ledger::{BookingLedger, Cancellation, LedgerSummary};
pub use models::{Booking, BookingId, BookingKind, BookingPatch, NewBooking};
pub use storage::PersistenceMirror;
pub use view::{BookingPage, SortKey, Tab, ViewQuery};
