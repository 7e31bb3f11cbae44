// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Rank buckets.
//!
//! The bucket is the single digit before the `|`. Ranks from different
//! buckets still compare as plain strings, but generation happens inside
//! one bucket. A whole collection can be rebalanced by moving it into the
//! next bucket, which cycles `0 -> 1 -> 2 -> 0`.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// One of the three rank buckets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Bucket {
    #[default]
    Zero,
    One,
    Two,
}

/// Error for a bucket index outside `0..=2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("bucket index {0} is not one of 0, 1, 2")]
pub struct InvalidBucket(pub u8);

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Zero, Bucket::One, Bucket::Two];

    /// The bucket index.
    pub fn index(self) -> u8 {
        return match self {
            Bucket::Zero => 0,
            Bucket::One => 1,
            Bucket::Two => 2,
        };
    }

    /// The bucket as it appears in a rank string.
    pub fn as_char(self) -> char {
        return (b'0' + self.index()) as char;
    }

    /// Parse the bucket character of a rank string.
    pub fn from_char(c: char) -> Option<Bucket> {
        return match c {
            '0' => Some(Bucket::Zero),
            '1' => Some(Bucket::One),
            '2' => Some(Bucket::Two),
            _ => None,
        };
    }

    /// The bucket a rebalance moves into.
    pub fn next(self) -> Bucket {
        return match self {
            Bucket::Zero => Bucket::One,
            Bucket::One => Bucket::Two,
            Bucket::Two => Bucket::Zero,
        };
    }
}

impl TryFrom<u8> for Bucket {
    type Error = InvalidBucket;

    fn try_from(index: u8) -> Result<Bucket, InvalidBucket> {
        return match index {
            0 => Ok(Bucket::Zero),
            1 => Ok(Bucket::One),
            2 => Ok(Bucket::Two),
            other => Err(InvalidBucket(other)),
        };
    }
}

impl From<Bucket> for u8 {
    fn from(bucket: Bucket) -> u8 {
        return bucket.index();
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}", self.as_char());
    }
}
