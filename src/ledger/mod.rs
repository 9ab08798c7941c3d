pub mod ledger;
pub mod starter;

pub use ledger::{BookingLedger, Cancellation, LedgerSummary};
pub use starter::starter_bookings;
