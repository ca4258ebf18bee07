//! Target sharding with exclusion propagation
//!
//! Splits an ordered list of target expressions into shards, each of which is
//! passed to one independent build invocation. On a command line an exclusion
//! only filters the includes of the same invocation, so every exclusion found
//! after a shard's slice of the input is appended to that shard.
//!
//! The algorithm:
//! 1. Cut the input into consecutive chunks of `max_shard_size` (last may be shorter).
//! 2. Walk the chunks right to left, accumulating their exclusions.
//! 3. Each chunk holding at least one include becomes a shard: the chunk itself
//!    followed by the exclusions accumulated from all later chunks.
//! 4. Chunks with only exclusions produce no shard, but their exclusions still
//!    reach every earlier shard.
//!
//! `max_shard_size` bounds the number of targets a shard takes from the input,
//! not the shard's final length.

use std::fmt;

use thiserror::Error;
use tracing::{debug, trace};

use crate::config::ShardConfig;
use crate::params::join_params;
use crate::target::TargetExpression;

/// Errors that can occur during sharding
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShardError {
    #[error("max_shard_size must be greater than 0, got {0}")]
    InvalidShardSize(usize),
}

/// One batch of targets for a single build invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shard {
    /// Index of the positional chunk this shard was built from
    chunk_index: usize,

    /// Number of leading targets taken from the chunk itself
    anchor_len: usize,

    /// Chunk targets followed by exclusions from later chunks
    targets: Vec<TargetExpression>,
}

impl Shard {
    /// Index of the anchor chunk within the input
    pub fn chunk_index(&self) -> usize {
        self.chunk_index
    }

    /// All targets, in command-line order
    pub fn targets(&self) -> &[TargetExpression] {
        &self.targets
    }

    /// The contiguous slice of the input this shard was built from
    pub fn anchor(&self) -> &[TargetExpression] {
        &self.targets[..self.anchor_len]
    }

    /// Exclusions appended from later chunks
    pub fn propagated_excludes(&self) -> &[TargetExpression] {
        &self.targets[self.anchor_len..]
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TargetExpression> {
        self.targets.iter()
    }

    /// Serialize every target back to its token
    pub fn to_tokens(&self) -> Vec<String> {
        self.targets.iter().map(TargetExpression::to_token).collect()
    }

    /// Tokens encoded and joined for a command line
    pub fn to_command_line(&self) -> String {
        join_params(self.to_tokens())
    }

    pub fn into_targets(self) -> Vec<TargetExpression> {
        self.targets
    }
}

impl<'a> IntoIterator for &'a Shard {
    type Item = &'a TargetExpression;
    type IntoIter = std::slice::Iter<'a, TargetExpression>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Result of sharding a target list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardPlan {
    /// Chunk length used for the positional partition
    pub max_shard_size: usize,

    /// Number of positional chunks the input was cut into
    pub chunk_count: usize,

    /// Indices of chunks with no include, which produced no shard
    pub dropped_chunks: Vec<usize>,

    /// Retained shards in input order
    pub shards: Vec<Shard>,
}

impl ShardPlan {
    /// Returns the number of shards
    pub fn num_shards(&self) -> usize {
        self.shards.len()
    }

    /// True when there is no include anywhere in the input
    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }

    /// Returns an iterator over the shards
    pub fn iter(&self) -> std::slice::Iter<'_, Shard> {
        self.shards.iter()
    }

    /// Drop the bookkeeping and keep only each shard's targets
    pub fn into_target_lists(self) -> Vec<Vec<TargetExpression>> {
        self.shards.into_iter().map(Shard::into_targets).collect()
    }
}

impl<'a> IntoIterator for &'a ShardPlan {
    type Item = &'a Shard;
    type IntoIter = std::slice::Iter<'a, Shard>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for ShardPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Shard Plan")?;
        writeln!(f, "==========")?;
        writeln!(f)?;

        writeln!(f, "Summary:")?;
        writeln!(f, "  Max shard size: {}", self.max_shard_size)?;
        writeln!(f, "  Chunks:         {}", self.chunk_count)?;
        writeln!(f, "  Shards:         {}", self.shards.len())?;
        if !self.dropped_chunks.is_empty() {
            writeln!(f, "  Dropped:        {:?}", self.dropped_chunks)?;
        }
        writeln!(f)?;

        writeln!(f, "{:<6} {:<8} {:<10} {:<10}", "Chunk", "Anchor", "Excludes", "Total")?;
        writeln!(f, "{:-<40}", "")?;
        for shard in &self.shards {
            writeln!(
                f,
                "{:<6} {:<8} {:<10} {:<10}",
                shard.chunk_index,
                shard.anchor_len,
                shard.propagated_excludes().len(),
                shard.len()
            )?;
        }

        Ok(())
    }
}

/// Shard targets according to `config`
///
/// # Example
///
/// ```
/// use target_shard::{parse_all, plan_shards, ShardConfig};
///
/// let targets = parse_all(["//a", "-//b", "//c", "-//d", "//e", "-//f"]);
/// let plan = plan_shards(&targets, &ShardConfig::new(3)).unwrap();
///
/// assert_eq!(plan.num_shards(), 2);
/// assert_eq!(plan.shards[0].to_tokens(), ["//a", "-//b", "//c", "-//d", "-//f"]);
/// assert_eq!(plan.shards[1].to_tokens(), ["-//d", "//e", "-//f"]);
/// ```
pub fn plan_shards(
    targets: &[TargetExpression],
    config: &ShardConfig,
) -> Result<ShardPlan, ShardError> {
    config.validate()?;
    let max_shard_size = config.max_shard_size;

    let chunks: Vec<&[TargetExpression]> = targets.chunks(max_shard_size).collect();

    // Exclusions of the chunks already visited, in reverse input order
    let mut later_excludes: Vec<&TargetExpression> = Vec::new();
    let mut shards = Vec::with_capacity(chunks.len());
    let mut dropped_chunks = Vec::new();

    for (chunk_index, chunk) in chunks.iter().enumerate().rev() {
        if chunk.iter().any(|t| t.polarity().is_include()) {
            let mut batch = Vec::with_capacity(chunk.len() + later_excludes.len());
            batch.extend_from_slice(chunk);
            batch.extend(later_excludes.iter().rev().map(|t| (*t).clone()));
            shards.push(Shard {
                chunk_index,
                anchor_len: chunk.len(),
                targets: batch,
            });
        } else {
            trace!(chunk_index, excludes = chunk.len(), "dropping chunk without includes");
            dropped_chunks.push(chunk_index);
        }

        later_excludes.extend(chunk.iter().rev().filter(|t| t.is_excluded()));
    }

    shards.reverse();
    dropped_chunks.reverse();

    debug!(
        targets = targets.len(),
        max_shard_size,
        chunks = chunks.len(),
        shards = shards.len(),
        dropped = dropped_chunks.len(),
        "sharded targets"
    );

    Ok(ShardPlan {
        max_shard_size,
        chunk_count: chunks.len(),
        dropped_chunks,
        shards,
    })
}

/// Shard targets into batches of at most `max_shard_size` input targets
///
/// Each returned batch is a chunk of the input followed by every exclusion
/// found later in the input. Fails with [`ShardError::InvalidShardSize`] when
/// `max_shard_size` is 0.
pub fn shard_targets(
    targets: &[TargetExpression],
    max_shard_size: usize,
) -> Result<Vec<Vec<TargetExpression>>, ShardError> {
    plan_shards(targets, &ShardConfig::new(max_shard_size)).map(ShardPlan::into_target_lists)
}
