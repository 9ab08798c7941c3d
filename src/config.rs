use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::sources::ApiSettings;
use crate::storage::BOOKINGS_KEY;
use crate::view::DEFAULT_PAGE_SIZE;

/// Runtime settings for the demo app
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiSettings,
    /// Skip the backend entirely and serve mock listings
    pub offline: bool,
    /// Directory holding the durable key-value files
    pub data_dir: PathBuf,
    pub storage_key: String,
    /// Read the saved bookings back on start instead of seeding demo trips
    pub restore_from_mirror: bool,
    pub page_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            offline: false,
            data_dir: PathBuf::from("data"),
            storage_key: BOOKINGS_KEY.to_string(),
            restore_from_mirror: false,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    /// Read `path` when it exists, then apply `STAYS_*` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            Some(path) => {
                debug!("No config at {}, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Override fields from variables named like `STAYS_API_URL`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("STAYS_API_URL") {
            self.api.base_url = url;
        }
        if let Some(raw) = lookup("STAYS_API_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) => self.api.timeout = Duration::from_secs(secs),
                Err(_) => warn!("Ignoring STAYS_API_TIMEOUT_SECS={}", raw),
            }
        }
        if let Some(dir) = lookup("STAYS_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup("STAYS_OFFLINE") {
            self.offline = parse_flag(&raw);
        }
        if let Some(raw) = lookup("STAYS_RESTORE") {
            self.restore_from_mirror = parse_flag(&raw);
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
