//! Sharding configuration
//!
//! `ShardConfig` derives serde so callers can embed it in their own
//! configuration files; missing keys fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::shards::ShardError;

/// Default number of targets introduced per build invocation
pub const DEFAULT_MAX_SHARD_SIZE: usize = 1000;

/// Configuration for target sharding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShardConfig {
    /// Maximum length of each shard's positional slice of the input
    ///
    /// Exclusions propagated from later in the input are not counted, so a
    /// finished shard can be longer than this.
    /// Default: 1000
    pub max_shard_size: usize,
}

impl Default for ShardConfig {
    fn default() -> Self {
        Self {
            max_shard_size: DEFAULT_MAX_SHARD_SIZE,
        }
    }
}

impl ShardConfig {
    /// Create a configuration with the given maximum shard size
    pub fn new(max_shard_size: usize) -> Self {
        Self { max_shard_size }
    }

    /// Set maximum shard size
    pub fn with_max_shard_size(mut self, max_shard_size: usize) -> Self {
        self.max_shard_size = max_shard_size;
        self
    }

    /// Check that the configuration can be used for sharding
    pub fn validate(&self) -> Result<(), ShardError> {
        if self.max_shard_size == 0 {
            return Err(ShardError::InvalidShardSize(self.max_shard_size));
        }
        Ok(())
    }
}
