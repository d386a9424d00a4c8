//! # Store Configuration
//!
//! Limits and reservations for entity stores, loaded once at startup from
//! TOML:
//!
//! ```toml
//! initial_capacity = 1024
//! max_entities = 1000000
//! ```
//!
//! Every key is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, StoreError, StoreResult};

/// Configuration shared by a store and every store extracted from it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Rows reserved per column when a store is built.
    pub initial_capacity: usize,
    /// Upper bound on rows per store; `None` means unbounded.
    pub max_entities: Option<usize>,
}

impl StoreConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Parse`] on malformed TOML or unknown keys
    /// - [`ConfigError::CapacityAboveLimit`] if `initial_capacity` exceeds
    ///   `max_entities`
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the settings are consistent with each other.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CapacityAboveLimit`] if `initial_capacity`
    /// exceeds `max_entities`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.max_entities {
            Some(max_entities) if self.initial_capacity > max_entities => {
                Err(ConfigError::CapacityAboveLimit {
                    initial_capacity: self.initial_capacity,
                    max_entities,
                })
            }
            _ => Ok(()),
        }
    }

    /// Rows to reserve up front, never more than a store may hold.
    pub(crate) fn reservation(&self) -> usize {
        self.max_entities
            .map_or(self.initial_capacity, |limit| self.initial_capacity.min(limit))
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// any error of [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks that a store may hold `requested` rows.
    pub(crate) fn check_limit(&self, requested: usize) -> StoreResult<()> {
        match self.max_entities {
            Some(limit) if requested > limit => {
                Err(StoreError::CapacityExceeded { limit, requested })
            }
            _ => Ok(()),
        }
    }
}
