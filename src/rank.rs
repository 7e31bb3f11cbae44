// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Order-rank strings.
//!
//! A rank looks like `0|hzzzzz:i`: a bucket digit, a `|`, then a base-36
//! decimal with a six-digit integer part and an optional fraction. Ranks
//! are compared as plain strings, which for canonical ranks is the same as
//! comparing their values, so callers can sort records by the stored
//! string without parsing it.
//!
//! Ranks are immutable. Moving a record means generating a new rank for it
//! with [`Rank::next`], [`Rank::prev`] or [`Rank::between`].

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::bucket::Bucket;
use crate::digits::Digits;
use crate::digits::MAX_INTEGER;
use crate::error::MalformedReason;
use crate::error::RankError;
use crate::error::Result;

/// Separates the bucket from the decimal.
pub const BUCKET_SEPARATOR: char = '|';

/// Integer distance `next` and `prev` move by default.
pub const DEFAULT_STEP: NonZeroU32 = match NonZeroU32::new(8) {
    Some(step) => step,
    None => unreachable!(),
};

/// `100000`, where sequences start after `min`.
const INITIAL_MIN: u64 = 36u64.pow(5);

/// `y00000`, where sequences walking down from `max` start.
const INITIAL_MAX: u64 = 34 * 36u64.pow(5);

/// An order rank.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rank {
    value: String,
    bucket: Bucket,
    digits: Digits,
}

impl Rank {
    fn from_parts(bucket: Bucket, digits: Digits) -> Rank {
        let mut value = String::with_capacity(9 + digits.fraction_len());
        value.push(bucket.as_char());
        value.push(BUCKET_SEPARATOR);
        digits.write_to(&mut value);
        return Rank { value, bucket, digits };
    }

    /// The rank with the given integer part and no fraction.
    pub(crate) fn from_integer(bucket: Bucket, value: u64) -> Rank {
        return Rank::from_parts(bucket, Digits::from_integer(value.min(MAX_INTEGER)));
    }

    /// `0|000000:`, the smallest rank.
    pub fn min() -> Rank {
        return Rank::min_in(Bucket::Zero);
    }

    /// `0|zzzzzz:`.
    pub fn max() -> Rank {
        return Rank::max_in(Bucket::Zero);
    }

    /// `0|hzzzzz:`, halfway between `min` and `max`.
    pub fn middle() -> Rank {
        return Rank::middle_in(Bucket::Zero);
    }

    pub fn min_in(bucket: Bucket) -> Rank {
        return Rank::from_parts(bucket, Digits::zero());
    }

    pub fn max_in(bucket: Bucket) -> Rank {
        return Rank::from_parts(bucket, Digits::max());
    }

    pub fn middle_in(bucket: Bucket) -> Rank {
        return Rank::from_parts(bucket, Digits::between(&Digits::zero(), &Digits::max()));
    }

    /// `100000:` in `bucket`, where a sequence started from `min` begins.
    pub fn initial(bucket: Bucket) -> Rank {
        return Rank::from_integer(bucket, INITIAL_MIN);
    }

    /// Parse a rank string.
    pub fn parse(value: &str) -> Result<Rank> {
        if value.is_empty() {
            return Err(RankError::malformed(value, MalformedReason::Empty));
        }
        let Some((bucket, decimal)) = value.split_once(BUCKET_SEPARATOR) else {
            return Err(RankError::malformed(value, MalformedReason::MissingSeparator));
        };

        let mut chars = bucket.chars();
        let bucket = match (chars.next(), chars.next()) {
            (Some(c), None) => Bucket::from_char(c),
            _ => None,
        };
        let Some(bucket) = bucket else {
            return Err(RankError::malformed(value, MalformedReason::InvalidBucket));
        };

        let digits = Digits::parse(decimal).map_err(|reason| RankError::malformed(value, reason))?;
        return Ok(Rank {
            value: value.to_string(),
            bucket,
            digits,
        });
    }

    /// The rank string.
    pub fn as_str(&self) -> &str {
        return &self.value;
    }

    pub fn bucket(&self) -> Bucket {
        return self.bucket;
    }

    /// True for the smallest rank of its bucket.
    pub fn is_min(&self) -> bool {
        return self.digits.is_zero();
    }

    /// True for `zzzzzz:` in its bucket.
    pub fn is_max(&self) -> bool {
        return self.digits.is_max();
    }

    /// Number of fraction digits, a measure of how crowded this spot is.
    pub fn precision(&self) -> usize {
        return self.digits.fraction_len();
    }

    /// Lexicographic comparison of the rank strings.
    pub fn compare(&self, other: &Rank) -> Ordering {
        return self.value.as_str().cmp(other.value.as_str());
    }

    /// The next rank using the default step.
    pub fn next(&self) -> Rank {
        return self.next_by(DEFAULT_STEP);
    }

    /// A rank comfortably above this one.
    ///
    /// From `min` this jumps to `initial`. Otherwise the value is rounded up
    /// to an integer and `step` is added. Near the top of the bucket it
    /// falls back to a midpoint, and from `max` itself it keeps extending
    /// precision. It never fails.
    pub fn next_by(&self, step: NonZeroU32) -> Rank {
        if self.is_min() {
            return Rank::initial(self.bucket);
        }

        let candidate = self.digits.ceil() + step.get() as u64;
        if candidate < MAX_INTEGER {
            return Rank::from_parts(self.bucket, Digits::from_integer(candidate));
        }

        let max = Digits::max();
        let digits = if self.digits < max {
            Digits::between(&self.digits, &max)
        } else {
            Digits::above(&self.digits)
        };
        tracing::debug!(rank = %self, "next ran out of integer room, using midpoint");
        return Rank::from_parts(self.bucket, digits);
    }

    /// The previous rank using the default step.
    pub fn prev(&self) -> Option<Rank> {
        return self.prev_by(DEFAULT_STEP);
    }

    /// A rank comfortably below this one, or `None` for the minimum.
    pub fn prev_by(&self, step: NonZeroU32) -> Option<Rank> {
        if self.is_min() {
            return None;
        }
        if self.is_max() {
            return Some(Rank::from_integer(self.bucket, INITIAL_MAX));
        }

        let floor = self.digits.integer();
        let step = step.get() as u64;
        if floor > step {
            return Some(Rank::from_parts(self.bucket, Digits::from_integer(floor - step)));
        }

        tracing::debug!(rank = %self, "prev ran out of integer room, using midpoint");
        let digits = Digits::between(&Digits::zero(), &self.digits);
        return Some(Rank::from_parts(self.bucket, digits));
    }

    /// A rank strictly between `self` and `high`.
    ///
    /// Fails with `OrderViolation` unless `self < high`. When the two are
    /// adjacent at their current precision, the result is one digit longer.
    /// When `high` is in a later bucket, the result stays in `self`'s bucket
    /// just above `self`.
    pub fn between(&self, high: &Rank) -> Result<Rank> {
        if self.compare(high) != Ordering::Less {
            return Err(RankError::OrderViolation {
                low: self.value.clone(),
                high: high.value.clone(),
            });
        }
        if self.bucket != high.bucket {
            tracing::debug!(low = %self, high = %high, "buckets differ, staying in the lower one");
            return Ok(Rank::from_parts(self.bucket, Digits::above(&self.digits)));
        }

        let digits = Digits::between(&self.digits, &high.digits);
        let rank = Rank::from_parts(self.bucket, digits);
        if rank.precision() > self.precision().max(high.precision()) {
            tracing::debug!(low = %self, high = %high, rank = %rank, "extended precision");
        }
        return Ok(rank);
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str(&self.value);
    }
}

impl fmt::Debug for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "Rank({})", self.value);
    }
}

impl PartialEq for Rank {
    fn eq(&self, other: &Rank) -> bool {
        return self.value == other.value;
    }
}

impl Eq for Rank {}

impl Hash for Rank {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Rank) -> Option<Ordering> {
        return Some(self.cmp(other));
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Rank) -> Ordering {
        return self.compare(other);
    }
}

impl AsRef<str> for Rank {
    fn as_ref(&self) -> &str {
        return &self.value;
    }
}

impl FromStr for Rank {
    type Err = RankError;

    fn from_str(value: &str) -> Result<Rank> {
        return Rank::parse(value);
    }
}

impl TryFrom<String> for Rank {
    type Error = RankError;

    fn try_from(value: String) -> Result<Rank> {
        return Rank::parse(&value);
    }
}

impl From<Rank> for String {
    fn from(rank: Rank) -> String {
        return rank.value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(text: &str) -> Rank {
        return Rank::parse(text).unwrap();
    }

    #[test]
    fn named_ranks() {
        assert_eq!(Rank::min().as_str(), "0|000000:");
        assert_eq!(Rank::max().as_str(), "0|zzzzzz:");
        assert_eq!(Rank::middle().as_str(), "0|hzzzzz:");
        assert_eq!(Rank::initial(Bucket::Zero).as_str(), "0|100000:");
        assert_eq!(Rank::initial(Bucket::One).as_str(), "1|100000:");
        assert_eq!(Rank::middle_in(Bucket::Two).as_str(), "2|hzzzzz:");
    }

    #[test]
    fn parse_accepts_canonical_ranks() {
        for text in ["0|000000:", "1|hzzzzz:", "2|100000:i", "0|zzzzzz:zz1"] {
            assert_eq!(r(text).as_str(), text);
        }
    }

    #[test]
    fn parse_reports_reasons() {
        let cases = [
            ("", MalformedReason::Empty),
            ("not-a-valid-rank", MalformedReason::MissingSeparator),
            ("3|100000:", MalformedReason::InvalidBucket),
            ("|100000:", MalformedReason::InvalidBucket),
            ("01|100000:", MalformedReason::InvalidBucket),
            ("0|", MalformedReason::MissingRadixPoint),
            ("0|1000:", MalformedReason::IntegerWidth),
            ("0|100000:10", MalformedReason::TrailingZero),
            ("0|HZZZZZ:", MalformedReason::InvalidDigit('H')),
        ];
        for (text, reason) in cases {
            match Rank::parse(text) {
                Err(RankError::Malformed { value, reason: got }) => {
                    assert_eq!(value, text);
                    assert_eq!(got, reason, "{text}");
                }
                other => panic!("{text}: expected malformed, got {other:?}"),
            }
        }
    }

    #[test]
    fn next_from_min_is_initial() {
        assert_eq!(Rank::min().next().as_str(), "0|100000:");
        assert_eq!(Rank::min().next().next().as_str(), "0|100008:");
    }

    #[test]
    fn next_rounds_fractions_up() {
        assert_eq!(r("0|100000:i").next().as_str(), "0|100009:");
        assert_eq!(Rank::middle().next().as_str(), "0|i00007:");
    }

    #[test]
    fn next_near_max_uses_midpoint() {
        let near = r("0|zzzzzw:");
        let next = near.next();
        assert!(next > near);
        assert!(next < Rank::max());
    }

    #[test]
    fn next_from_max_extends_precision() {
        let mut rank = Rank::max();
        for _ in 0..50 {
            let next = rank.next();
            assert!(next > rank);
            rank = next;
        }
        assert!(rank.as_str().starts_with("0|zzzzzz:"));
    }

    #[test]
    fn prev_mirrors_next() {
        assert_eq!(Rank::min().prev(), None);
        assert_eq!(Rank::max().prev().unwrap().as_str(), "0|y00000:");
        assert_eq!(r("0|100008:").prev().unwrap().as_str(), "0|100000:");
        let low = r("0|000005:");
        let prev = low.prev().unwrap();
        assert!(prev < low);
        assert!(prev > Rank::min());
    }

    #[test]
    fn prev_walks_down_to_min_without_failing() {
        let mut rank = r("0|000001:");
        for _ in 0..50 {
            let prev = rank.prev().unwrap();
            assert!(prev < rank);
            assert!(prev > Rank::min());
            rank = prev;
        }
    }

    #[test]
    fn between_rejects_wrong_order() {
        let a = r("0|100000:");
        let b = r("0|100008:");
        assert!(b.between(&a).unwrap_err().is_order_violation());
        assert!(a.between(&a).unwrap_err().is_order_violation());
    }

    #[test]
    fn between_across_buckets_stays_in_the_lower_one() {
        let a = r("0|zzzzzz:");
        let b = r("1|000000:");
        let c = a.between(&b).unwrap();
        assert!(a < c && c < b);
        assert_eq!(c.bucket(), Bucket::Zero);
        assert_eq!(c.as_str(), "0|zzzzzz:i");

        let c = r("0|100000:").between(&r("2|100008:")).unwrap();
        assert!(c > r("0|100000:") && c.bucket() == Bucket::Zero);
        assert!(r("1|000000:").between(&r("0|zzzzzz:")).unwrap_err().is_order_violation());
    }

    #[test]
    fn between_picks_midpoint() {
        assert_eq!(r("0|100000:").between(&r("0|100008:")).unwrap().as_str(), "0|100004:");
        assert_eq!(r("0|100000:").between(&r("0|100001:")).unwrap().as_str(), "0|100000:i");
    }

    #[test]
    fn next_and_prev_stay_in_their_bucket() {
        assert_eq!(Rank::min_in(Bucket::Two).next(), Rank::initial(Bucket::Two));
        assert_eq!(Rank::max_in(Bucket::One).prev().unwrap().as_str(), "1|y00000:");
    }

    #[test]
    fn serde_uses_plain_strings() {
        let rank = Rank::middle();
        let json = serde_json::to_string(&rank).unwrap();
        assert_eq!(json, "\"0|hzzzzz:\"");
        let back: Rank = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rank);
        assert!(serde_json::from_str::<Rank>("\"bogus\"").is_err());
    }
}
