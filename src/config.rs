//! Configuration for seglog
//!
//! Values supplied by the owning segment layer.

use crate::error::{LogError, Result};
use crate::index::ENTRY_WIDTH;

/// Segment storage configuration
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Index Configuration
    // -------------------------------------------------------------------------
    /// Bytes reserved for the index mapping while it is open.
    /// Bounds the segment to `max_index_bytes / 12` entries.
    pub max_index_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_index_bytes: 1024 * 1024, // 1 MB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject values the index cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.max_index_bytes < ENTRY_WIDTH {
            return Err(LogError::Config(format!(
                "max_index_bytes {} cannot hold a single {}-byte entry",
                self.max_index_bytes, ENTRY_WIDTH
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the number of bytes reserved for the index file
    pub fn max_index_bytes(mut self, bytes: u64) -> Self {
        self.config.max_index_bytes = bytes;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
