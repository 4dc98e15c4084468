//! Bucketed lexicographic rank space.
//!
//! A rank is rendered as `<bucket>|<integer>:<fraction>` where the integer
//! part is a fixed-width base-36 number and the fraction is an arbitrarily
//! long base-36 tail. Ranks are canonical (trailing fraction zeros are
//! stripped), which makes plain string comparison agree with numeric order.
//!
//! The space is dense: for any two distinct ranks in the same bucket there is
//! always a third strictly between them, so callers never need to renumber
//! neighbors to make room.

use crate::RankError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

const BASE: u8 = 36;
const INTEGER_WIDTH: usize = 6;
const BUCKET_SEPARATOR: u8 = b'|';
const DECIMAL_SEPARATOR: u8 = b':';

/// Length of `<bucket>|<integer>:`, the part every rank carries.
pub const RANK_HEADER_LEN: usize = INTEGER_WIDTH + 3;

/// One of the three rank buckets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(try_from = "u8", into = "u8")]
pub enum RankBucket {
    #[default]
    Zero,
    One,
    Two,
}

impl RankBucket {
    pub fn as_char(self) -> char {
        match self {
            RankBucket::Zero => '0',
            RankBucket::One => '1',
            RankBucket::Two => '2',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(RankBucket::Zero),
            '1' => Some(RankBucket::One),
            '2' => Some(RankBucket::Two),
            _ => None,
        }
    }

    /// The bucket a full rebalance would migrate into.
    pub fn next(self) -> Self {
        match self {
            RankBucket::Zero => RankBucket::One,
            RankBucket::One => RankBucket::Two,
            RankBucket::Two => RankBucket::Zero,
        }
    }
}

impl fmt::Display for RankBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl From<RankBucket> for u8 {
    fn from(bucket: RankBucket) -> Self {
        match bucket {
            RankBucket::Zero => 0,
            RankBucket::One => 1,
            RankBucket::Two => 2,
        }
    }
}

impl TryFrom<u8> for RankBucket {
    type Error = RankError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RankBucket::Zero),
            1 => Ok(RankBucket::One),
            2 => Ok(RankBucket::Two),
            other => Err(RankError::Malformed {
                value: other.to_string(),
                reason: "bucket must be 0, 1 or 2".to_string(),
            }),
        }
    }
}

/// An opaque, densely ordered sort key.
///
/// Ordering and equality are those of the canonical string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema), schema(value_type = String))]
#[serde(try_from = "String", into = "String")]
pub struct LexoRank {
    value: String,
}

impl LexoRank {
    /// Canonical starting rank, `"0|hzzzzz:"`.
    pub fn middle() -> Self {
        Self::middle_in(RankBucket::Zero)
    }

    /// Lower sentinel of the space, `"0|000000:"`.
    pub fn min() -> Self {
        Self::min_in(RankBucket::Zero)
    }

    /// Upper sentinel of the space, `"0|zzzzzz:"`.
    pub fn max() -> Self {
        Self::max_in(RankBucket::Zero)
    }

    pub fn middle_in(bucket: RankBucket) -> Self {
        let mut digits = vec![BASE - 1; INTEGER_WIDTH];
        digits[0] = BASE / 2 - 1;
        Self::from_digits(bucket, &digits)
    }

    pub fn min_in(bucket: RankBucket) -> Self {
        Self::from_digits(bucket, &[0; INTEGER_WIDTH])
    }

    pub fn max_in(bucket: RankBucket) -> Self {
        Self::from_digits(bucket, &[BASE - 1; INTEGER_WIDTH])
    }

    /// Parse a stored rank, canonicalising its fraction.
    pub fn parse(value: &str) -> Result<Self, RankError> {
        let malformed = |reason: &str| RankError::Malformed {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        if !value.is_ascii() {
            return Err(malformed("rank must be ASCII"));
        }
        let bytes = value.as_bytes();
        if bytes.len() < RANK_HEADER_LEN {
            return Err(malformed("rank is shorter than its fixed header"));
        }

        let bucket = RankBucket::from_char(bytes[0] as char)
            .ok_or_else(|| malformed("bucket must be 0, 1 or 2"))?;
        if bytes[1] != BUCKET_SEPARATOR {
            return Err(malformed("missing bucket separator"));
        }
        if bytes[RANK_HEADER_LEN - 1] != DECIMAL_SEPARATOR {
            return Err(malformed("missing fraction separator"));
        }

        let mut digits = Vec::with_capacity(bytes.len() - 3);
        for &b in bytes[2..RANK_HEADER_LEN - 1]
            .iter()
            .chain(bytes[RANK_HEADER_LEN..].iter())
        {
            digits.push(digit_value(b).ok_or_else(|| malformed("digits must be 0-9 or a-z"))?);
        }

        let (integer, fraction) = digits.split_at(INTEGER_WIDTH);
        if integer.iter().all(|&d| d == BASE - 1) && fraction.iter().any(|&d| d != 0) {
            return Err(malformed("rank lies above the bucket maximum"));
        }

        Ok(Self::from_digits(bucket, &digits))
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn bucket(&self) -> RankBucket {
        // The first byte is validated on construction.
        RankBucket::from_char(self.value.as_bytes()[0] as char).unwrap_or_default()
    }

    /// Length of the encoded rank; grows as ranks are squeezed together.
    pub fn encoded_len(&self) -> usize {
        self.value.len()
    }

    /// A rank strictly between `self` and `other`, in either argument order.
    ///
    /// The shortest fraction that still lies strictly inside the gap is
    /// chosen, so repeated inserts grow keys by at most one digit each.
    pub fn between(&self, other: &LexoRank) -> Result<LexoRank, RankError> {
        if self.bucket() != other.bucket() {
            return Err(RankError::BucketMismatch {
                left: self.value.clone(),
                right: other.value.clone(),
            });
        }

        let (lo, hi) = match self.cmp(other) {
            Ordering::Less => (self, other),
            Ordering::Greater => (other, self),
            Ordering::Equal => {
                return Err(RankError::Identical {
                    value: self.value.clone(),
                })
            }
        };

        let lo_digits = lo.digits();
        let mid = midpoint(&lo_digits, &hi.digits());

        // Truncation never increases the value, so every prefix stays below
        // `hi`; take the first one that clears `lo`.
        for len in INTEGER_WIDTH..=mid.len() {
            let candidate = &mid[..len];
            if compare_digits(candidate, &lo_digits) == Ordering::Greater {
                return Ok(Self::from_digits(self.bucket(), candidate));
            }
        }

        Ok(Self::from_digits(self.bucket(), &mid))
    }

    /// `count` evenly spaced ranks across the whole of `bucket`.
    ///
    /// The result is strictly ascending and never touches the sentinels.
    pub fn spread(bucket: RankBucket, count: usize) -> Vec<LexoRank> {
        if count == 0 {
            return Vec::new();
        }

        let slots = count as u128 + 1;
        let mut width = INTEGER_WIDTH;
        while (BASE as u128).pow(width as u32) < slots {
            width += 1;
        }
        let step = (BASE as u128).pow(width as u32) / slots;

        (1..=count as u128)
            .map(|i| Self::from_digits(bucket, &encode_base36(i * step, width)))
            .collect()
    }

    fn digits(&self) -> Vec<u8> {
        let bytes = self.value.as_bytes();
        bytes[2..RANK_HEADER_LEN - 1]
            .iter()
            .chain(bytes[RANK_HEADER_LEN..].iter())
            .filter_map(|&b| digit_value(b))
            .collect()
    }

    /// Build a canonical rank from integer digits followed by fraction digits.
    fn from_digits(bucket: RankBucket, digits: &[u8]) -> Self {
        let (integer, fraction) = digits.split_at(INTEGER_WIDTH.min(digits.len()));
        let fraction_len = fraction
            .iter()
            .rposition(|&d| d != 0)
            .map(|pos| pos + 1)
            .unwrap_or(0);

        let mut value = String::with_capacity(RANK_HEADER_LEN + fraction_len);
        value.push(bucket.as_char());
        value.push(BUCKET_SEPARATOR as char);
        for &d in integer {
            value.push(digit_char(d));
        }
        for _ in integer.len()..INTEGER_WIDTH {
            value.push('0');
        }
        value.push(DECIMAL_SEPARATOR as char);
        for &d in &fraction[..fraction_len] {
            value.push(digit_char(d));
        }

        Self { value }
    }
}

impl fmt::Display for LexoRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for LexoRank {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LexoRank {
    type Error = RankError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LexoRank> for String {
    fn from(rank: LexoRank) -> Self {
        rank.value
    }
}

impl AsRef<str> for LexoRank {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

fn digit_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'z' => Some(b - b'a' + 10),
        _ => None,
    }
}

fn digit_char(d: u8) -> char {
    if d < 10 {
        (b'0' + d) as char
    } else {
        (b'a' + d - 10) as char
    }
}

/// Compare two digit strings as base-36 fixed-point numbers, padding with zeros.
fn compare_digits(a: &[u8], b: &[u8]) -> Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Exact midpoint `(a + b) / 2`; one extra digit holds an odd remainder.
fn midpoint(a: &[u8], b: &[u8]) -> Vec<u8> {
    let len = a.len().max(b.len());
    let mut sum = vec![0u8; len];
    let mut carry = 0u8;
    for i in (0..len).rev() {
        let total = a.get(i).copied().unwrap_or(0) + b.get(i).copied().unwrap_or(0) + carry;
        sum[i] = total % BASE;
        carry = total / BASE;
    }

    let mut mid = Vec::with_capacity(len + 1);
    let mut remainder = carry;
    for d in sum {
        let current = remainder * BASE + d;
        mid.push(current / 2);
        remainder = current % 2;
    }
    if remainder == 1 {
        mid.push(BASE / 2);
    }
    mid
}

fn encode_base36(mut value: u128, width: usize) -> Vec<u8> {
    let mut digits = vec![0u8; width];
    for slot in digits.iter_mut().rev() {
        *slot = (value % BASE as u128) as u8;
        value /= BASE as u128;
    }
    digits
}
