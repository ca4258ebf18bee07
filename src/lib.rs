//! Target sharding for build-tool invocations
//!
//! Splits an ordered list of target patterns into bounded batches so a build
//! tool with a command-line or performance ceiling can be invoked once per
//! batch. Exclusion patterns travel forward into every earlier batch whose
//! includes they could still filter.

pub mod config;
pub mod params;
pub mod shards;
pub mod target;

// Re-export main types at crate root
pub use config::{ShardConfig, DEFAULT_MAX_SHARD_SIZE};
pub use params::{encode_param, join_params, split_parameters};
pub use shards::{plan_shards, shard_targets, Shard, ShardError, ShardPlan};
pub use target::{parse_all, Polarity, TargetExpression};
