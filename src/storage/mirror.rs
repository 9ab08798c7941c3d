use std::sync::Arc;

use tracing::{debug, warn};

use super::traits::KeyValueStore;
use crate::error::StorageError;
use crate::models::Booking;

/// Slot holding the serialized booking list
pub const BOOKINGS_KEY: &str = "sunitastays_bookings_v2";

/// One-way copy of the ledger into a durable key-value slot
#[derive(Clone)]
pub struct PersistenceMirror {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl PersistenceMirror {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, BOOKINGS_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Serialize the whole ordered collection into the slot
    pub fn try_save(&self, bookings: &[Booking]) -> Result<(), StorageError> {
        let json = serde_json::to_string(bookings)?;
        self.store.set(&self.key, &json)?;
        debug!("💾 Mirrored {} bookings to '{}'", bookings.len(), self.key);
        Ok(())
    }

    /// Like [`Self::try_save`], but a failed write is only logged
    pub fn save(&self, bookings: &[Booking]) {
        if let Err(err) = self.try_save(bookings) {
            warn!("Failed to save bookings: {}", err);
        }
    }

    /// Read the mirrored collection back, `None` when nothing was saved yet
    pub fn load(&self) -> Result<Option<Vec<Booking>>, StorageError> {
        match self.store.get(&self.key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn clear(&self) {
        if let Err(err) = self.store.remove(&self.key) {
            warn!("Failed to clear saved bookings: {}", err);
        }
    }
}
