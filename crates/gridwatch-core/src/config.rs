//! TOML-based alert configuration.
//!
//! Maps each session type to the lead times (minutes before start) at which
//! a notification should fire:
//!
//! ```toml
//! [events]
//! race = [60, 15]
//! qualifying = [30]
//! practice = [10]
//! ```
//!
//! The file is re-read on every scheduler tick, so lead times can change
//! without restarting the bot. A type with no entry is simply not notified.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::event::EventType;

/// Alert configuration.
///
/// A reload replaces the whole mapping; entries are never merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Lead-time lists keyed by [`EventType::config_key`].
    #[serde(default)]
    pub events: HashMap<String, Vec<i64>>,
}

impl AlertConfig {
    /// Load the configuration from a TOML file.
    ///
    /// # Errors
    /// `LoadFailed` when the file cannot be read, `ParseFailed` when it is
    /// not valid TOML of the expected shape.
    pub fn load(path: &Path) -> Result<AlertConfig, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Lead times configured for a session type, in file order.
    ///
    /// `None` means "do not notify for this type". Duplicate values are kept;
    /// the scheduler's dedup record is what prevents double sends.
    pub fn lead_times_for(&self, event_type: EventType) -> Option<&[i64]> {
        self.events
            .get(event_type.config_key())
            .map(|leads| leads.as_slice())
    }
}
