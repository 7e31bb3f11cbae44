// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Base-36 fixed-point decimals.
//!
//! A decimal is a fixed-width integer part of `INTEGER_WIDTH` digits
//! followed by any number of fraction digits, written as `iiiiii:fff`.
//! Canonical decimals never end in a zero fraction digit, so comparing the
//! digit buffers lexicographically is the same as comparing values, and
//! the same as comparing the formatted strings.

use smallvec::SmallVec;
use smallvec::smallvec;

use crate::error::MalformedReason;

/// Digits are base 36: `0-9a-z`.
pub const RADIX: u8 = 36;

/// Width of the integer part.
pub const INTEGER_WIDTH: usize = 6;

/// Separates the integer part from the fraction.
pub const RADIX_POINT: char = ':';

/// Largest integer part, `zzzzzz`.
pub const MAX_INTEGER: u64 = 36u64.pow(INTEGER_WIDTH as u32) - 1;

/// Half of the radix, the digit appended when a midpoint needs one more place.
const HALF: u8 = RADIX / 2;

type DigitBuf = SmallVec<[u8; 16]>;

/// A canonical base-36 decimal, one digit value (0..36) per slot.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digits(DigitBuf);

/// The character for a digit value.
pub fn digit_char(digit: u8) -> char {
    debug_assert!(digit < RADIX);
    if digit < 10 {
        return (b'0' + digit) as char;
    }
    return (b'a' + digit - 10) as char;
}

/// The digit value of a character, lowercase only.
pub fn char_digit(c: char) -> Option<u8> {
    return match c {
        '0'..='9' => Some(c as u8 - b'0'),
        'a'..='z' => Some(c as u8 - b'a' + 10),
        _ => None,
    };
}

impl Digits {
    /// The decimal with the given integer part and no fraction.
    pub fn from_integer(value: u64) -> Digits {
        debug_assert!(value <= MAX_INTEGER);
        let mut buf: DigitBuf = smallvec![0; INTEGER_WIDTH];
        let mut rest = value;
        for slot in buf.iter_mut().rev() {
            *slot = (rest % RADIX as u64) as u8;
            rest /= RADIX as u64;
        }
        return Digits(buf);
    }

    /// Zero.
    pub fn zero() -> Digits {
        return Digits::from_integer(0);
    }

    /// `zzzzzz`.
    pub fn max() -> Digits {
        return Digits::from_integer(MAX_INTEGER);
    }

    fn normalize(mut buf: DigitBuf) -> Digits {
        while buf.len() > INTEGER_WIDTH && buf.last() == Some(&0) {
            buf.pop();
        }
        return Digits(buf);
    }

    /// Parse `iiiiii:fff` with no trailing zero in the fraction.
    pub fn parse(text: &str) -> Result<Digits, MalformedReason> {
        let Some((integer, fraction)) = text.split_once(RADIX_POINT) else {
            return Err(MalformedReason::MissingRadixPoint);
        };
        if integer.chars().count() != INTEGER_WIDTH {
            return Err(MalformedReason::IntegerWidth);
        }
        if fraction.ends_with('0') {
            return Err(MalformedReason::TrailingZero);
        }

        let mut buf = DigitBuf::with_capacity(INTEGER_WIDTH + fraction.len());
        for c in integer.chars().chain(fraction.chars()) {
            match char_digit(c) {
                Some(d) => buf.push(d),
                None => return Err(MalformedReason::InvalidDigit(c)),
            }
        }
        return Ok(Digits(buf));
    }

    /// Append the canonical text form to `out`.
    pub fn write_to(&self, out: &mut String) {
        for (i, d) in self.0.iter().enumerate() {
            if i == INTEGER_WIDTH {
                out.push(RADIX_POINT);
            }
            out.push(digit_char(*d));
        }
        if self.0.len() == INTEGER_WIDTH {
            out.push(RADIX_POINT);
        }
    }

    /// The integer part as a number.
    pub fn integer(&self) -> u64 {
        return self.0[..INTEGER_WIDTH]
            .iter()
            .fold(0u64, |acc, d| acc * RADIX as u64 + *d as u64);
    }

    /// Number of fraction digits.
    pub fn fraction_len(&self) -> usize {
        return self.0.len() - INTEGER_WIDTH;
    }

    pub fn has_fraction(&self) -> bool {
        return self.fraction_len() > 0;
    }

    pub fn is_zero(&self) -> bool {
        return !self.has_fraction() && self.0.iter().all(|d| *d == 0);
    }

    pub fn is_max(&self) -> bool {
        return !self.has_fraction() && self.0.iter().all(|d| *d == RADIX - 1);
    }

    /// Smallest integer not below this decimal.
    pub fn ceil(&self) -> u64 {
        return self.integer() + self.has_fraction() as u64;
    }

    /// Keep at most `fraction_len` fraction digits, rounding toward zero.
    pub fn truncate(&self, fraction_len: usize) -> Digits {
        let len = (INTEGER_WIDTH + fraction_len).min(self.0.len());
        return Digits::normalize(SmallVec::from_slice(&self.0[..len]));
    }

    fn digit_at(&self, index: usize) -> u8 {
        return self.0.get(index).copied().unwrap_or(0);
    }

    /// Halve a sum whose first slot is the carry above the integer part.
    /// The result always fits the integer width and gains at most one
    /// fraction digit.
    fn halve(sum: &[u8]) -> Digits {
        let mut out = DigitBuf::with_capacity(sum.len() + 1);
        let mut rem = 0u16;
        for d in sum {
            let cur = rem * RADIX as u16 + *d as u16;
            out.push((cur / 2) as u8);
            rem = cur % 2;
        }
        if rem == 1 {
            out.push(HALF);
        }
        debug_assert_eq!(out[0], 0);
        return Digits::normalize(SmallVec::from_slice(&out[1..]));
    }

    /// The exact midpoint of two decimals.
    pub fn midpoint(low: &Digits, high: &Digits) -> Digits {
        let len = low.0.len().max(high.0.len());
        let mut sum: DigitBuf = smallvec![0; len + 1];
        let mut carry = 0u8;
        for i in (0..len).rev() {
            let d = low.digit_at(i) + high.digit_at(i) + carry;
            sum[i + 1] = d % RADIX;
            carry = d / RADIX;
        }
        sum[0] = carry;
        return Digits::halve(&sum);
    }

    /// The exact midpoint between `low` and the bucket ceiling, one past
    /// `zzzzzz`. Used when nothing representable is left above `low` at
    /// its current precision.
    pub fn midpoint_to_ceiling(low: &Digits) -> Digits {
        let mut sum = DigitBuf::with_capacity(low.0.len() + 1);
        sum.push(1);
        sum.extend_from_slice(&low.0);
        return Digits::halve(&sum);
    }

    /// Shortest truncation of `mid` that is still above `low`.
    fn shortest_above(low: &Digits, mid: Digits) -> Digits {
        for k in 0..mid.fraction_len() {
            let candidate = mid.truncate(k);
            if candidate > *low {
                return candidate;
            }
        }
        return mid;
    }

    /// A short decimal strictly between `low` and `high`.
    ///
    /// Requires `low < high`. The exact midpoint is always strictly inside,
    /// so this never runs out of room; it only gets longer.
    pub fn between(low: &Digits, high: &Digits) -> Digits {
        debug_assert!(low < high);
        let mid = Digits::midpoint(low, high);
        return Digits::shortest_above(low, mid);
    }

    /// A short decimal strictly above `low`, below the bucket ceiling.
    pub fn above(low: &Digits) -> Digits {
        let mid = Digits::midpoint_to_ceiling(low);
        return Digits::shortest_above(low, mid);
    }
}
