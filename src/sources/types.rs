use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::error::StorageError;
use crate::storage::KeyValueStore;

/// Slot holding the bearer token of the signed-in user
pub const TOKEN_KEY: &str = "token";

/// Connection parameters for the booking backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Upper bound for a single request before falling back to local data
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

/// Sign-up / login form
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Credentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: None,
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Result of a successful login
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthSession {
    pub token: String,
    #[serde(default)]
    pub user: Option<serde_json::Value>,
}

impl AuthSession {
    /// Remember the token so later clients send it automatically
    pub fn persist(&self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        store.set(TOKEN_KEY, &self.token)
    }

    /// Log out: forget the stored token
    pub fn forget(store: &dyn KeyValueStore) {
        if let Err(err) = store.remove(TOKEN_KEY) {
            warn!("Failed to remove stored token: {}", err);
        }
    }
}
