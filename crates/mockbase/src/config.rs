//! Database configuration
//!
//! Settings can be built in code or loaded from a RON document:
//!
//! ```
//! use mockbase::DatabaseConfig;
//!
//! let config =
//!     DatabaseConfig::from_ron("(transaction_success: false, key_seed: Some(7))").unwrap();
//! assert!(!config.transaction_success);
//! assert_eq!(config.key_seed, Some(7));
//! assert_eq!(config.max_key_attempts, 10_000);
//! ```

use mockbase_core::{Error, Result, ShortIdGenerator};
use rand::Rng;
use serde::{Deserialize, Serialize};

const DEFAULT_MAX_KEY_ATTEMPTS: usize = 10_000;

/// Configuration for a [`Database`](crate::Database)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Whether transactions are accepted by the simulated server
    ///
    /// Cursors take this as their initial setting.
    pub transaction_success: bool,
    /// Seed for push-key generation, `None` draws a random seed
    pub key_seed: Option<u64>,
    /// How many candidate keys `push` tries before giving up
    ///
    /// Values below 1 are treated as 1.
    pub max_key_attempts: usize,
}

impl DatabaseConfig {
    /// Parse a configuration from RON
    pub fn from_ron(source: &str) -> Result<Self> {
        ron::from_str(source).map_err(|e| Error::Config(e.to_string()))
    }

    /// Set the push-key seed
    pub fn with_key_seed(mut self, seed: u64) -> Self {
        self.key_seed = Some(seed);
        self
    }

    /// Set the initial transaction outcome
    pub fn with_transaction_success(mut self, success: bool) -> Self {
        self.transaction_success = success;
        self
    }

    /// Set the push-key attempt limit
    pub fn with_max_key_attempts(mut self, attempts: usize) -> Self {
        self.max_key_attempts = attempts;
        self
    }

    pub(crate) fn key_attempts(&self) -> usize {
        self.max_key_attempts.max(1)
    }

    pub(crate) fn key_generator(&self) -> ShortIdGenerator {
        let seed = self.key_seed.unwrap_or_else(|| rand::thread_rng().gen());
        ShortIdGenerator::new(seed)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            transaction_success: true,
            key_seed: None,
            max_key_attempts: DEFAULT_MAX_KEY_ATTEMPTS,
        }
    }
}
