// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Rank generation with explicit gap sizes.
//!
//! [`RankSequence`] wraps the rank operations with a [`SequenceConfig`]:
//! how far `next` jumps (`step`) and how many `next` calls each appended
//! record consumes (`stride`). A stride of 2 leaves one unused slot after
//! every record, so later inserts land on an integer instead of growing a
//! fraction.
//!
//! The sequence holds no "last rank". Callers pass the current rank in and
//! get the new one back, so the running value is an ordinary variable.
//!
//! # Concurrency
//!
//! Everything here is a pure function. If two writers both read the same
//! last rank and append after it, they produce the same rank. Serializing
//! "read last rank, compute next, persist" per collection is up to the
//! caller, e.g. inside one store transaction.

use std::cmp::Ordering;
use std::iter;
use std::num::NonZeroU32;

use serde::Deserialize;
use serde::Serialize;

use crate::bucket::Bucket;
use crate::error::Result;
use crate::rank::DEFAULT_STEP;
use crate::rank::Rank;

/// Default number of `next` calls per appended record.
pub const DEFAULT_STRIDE: NonZeroU32 = match NonZeroU32::new(2) {
    Some(stride) => stride,
    None => unreachable!(),
};

/// Gap sizes and the bucket new sequences start in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SequenceConfig {
    /// Integer distance added by `next`.
    pub step: NonZeroU32,
    /// `next` calls per appended record.
    pub stride: NonZeroU32,
    /// Bucket for `min` and `middle`.
    pub bucket: Bucket,
}

impl Default for SequenceConfig {
    fn default() -> SequenceConfig {
        return SequenceConfig {
            step: DEFAULT_STEP,
            stride: DEFAULT_STRIDE,
            bucket: Bucket::Zero,
        };
    }
}

/// A configured rank generator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RankSequence {
    config: SequenceConfig,
}

impl RankSequence {
    pub fn new(config: SequenceConfig) -> RankSequence {
        return RankSequence { config };
    }

    pub fn config(&self) -> &SequenceConfig {
        return &self.config;
    }

    /// Smallest rank in the configured bucket.
    pub fn min(&self) -> Rank {
        return Rank::min_in(self.config.bucket);
    }

    /// Middle rank in the configured bucket.
    pub fn middle(&self) -> Rank {
        return Rank::middle_in(self.config.bucket);
    }

    pub fn parse(&self, value: &str) -> Result<Rank> {
        return Rank::parse(value);
    }

    /// One step above `rank`.
    pub fn next(&self, rank: &Rank) -> Rank {
        return rank.next_by(self.config.step);
    }

    /// One step below `rank`, or `None` at the minimum.
    pub fn prev(&self, rank: &Rank) -> Option<Rank> {
        return rank.prev_by(self.config.step);
    }

    /// `stride` steps above `rank`: the rank for the record appended after it.
    pub fn advance(&self, rank: &Rank) -> Rank {
        let mut current = self.next(rank);
        for _ in 1..self.config.stride.get() {
            current = self.next(&current);
        }
        return current;
    }

    pub fn between(&self, low: &Rank, high: &Rank) -> Result<Rank> {
        return low.between(high);
    }

    pub fn compare(&self, a: &Rank, b: &Rank) -> Ordering {
        return a.compare(b);
    }

    /// The rank for a single record appended after `last`, or `middle` when
    /// the collection has no ranks yet.
    pub fn append_after(&self, last: Option<&Rank>) -> Rank {
        return match last {
            Some(rank) => self.next(rank),
            None => self.middle(),
        };
    }

    /// Ranks for records appended after `start`, one stride apart.
    /// The iterator does not yield `start` itself.
    pub fn ranks_after(&self, start: Rank) -> impl Iterator<Item = Rank> + '_ {
        return iter::successors(Some(start), move |rank| Some(self.advance(rank))).skip(1);
    }

    /// `count` ranks for records appended after `last`, or after `min` when
    /// the collection has no ranks yet.
    pub fn sequential(&self, last: Option<&Rank>, count: usize) -> Vec<Rank> {
        let start = match last {
            Some(rank) => rank.clone(),
            None => self.min(),
        };
        return self.ranks_after(start).take(count).collect();
    }
}
