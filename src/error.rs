// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Errors returned by rank parsing and generation.
//!
//! Every error is a local validation failure. Nothing here is retried;
//! running out of digit space is handled by extending precision and never
//! shows up as an error.

use thiserror::Error;

/// Result type alias for rank operations.
pub type Result<T> = std::result::Result<T, RankError>;

/// Why a string failed to parse as a rank.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    #[error("empty input")]
    Empty,

    #[error("missing '|' between bucket and decimal")]
    MissingSeparator,

    #[error("bucket must be one of 0, 1, 2")]
    InvalidBucket,

    #[error("integer part must be exactly 6 digits")]
    IntegerWidth,

    #[error("missing ':' radix point")]
    MissingRadixPoint,

    #[error("invalid digit {0:?}")]
    InvalidDigit(char),

    #[error("fraction ends in '0'")]
    TrailingZero,
}

/// Error type for rank operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RankError {
    /// The input does not match `bucket "|" integer ":" fraction`.
    /// The record holding it needs to be re-ranked.
    #[error("malformed rank {value:?}: {reason}")]
    Malformed {
        value: String,
        reason: MalformedReason,
    },

    /// `between(low, high)` was called with `low >= high`, usually after a
    /// stale read. Re-fetch the neighbours and try again.
    #[error("rank {low} is not strictly below {high}")]
    OrderViolation { low: String, high: String },

    /// Nothing sorts below the absolute minimum of a bucket.
    #[error("no room below {rank}")]
    NoRoomBelow { rank: String },
}

impl RankError {
    pub(crate) fn malformed(value: &str, reason: MalformedReason) -> RankError {
        return RankError::Malformed {
            value: value.to_string(),
            reason,
        };
    }

    /// True for `Malformed`.
    pub fn is_malformed(&self) -> bool {
        return matches!(self, RankError::Malformed { .. });
    }

    /// True for `OrderViolation`.
    pub fn is_order_violation(&self) -> bool {
        return matches!(self, RankError::OrderViolation { .. });
    }
}
