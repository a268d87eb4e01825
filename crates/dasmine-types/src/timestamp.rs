use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Number of digits in a compact timestamp (`YYYYMMDDHHMMSS`)
pub const COMPACT_LEN: usize = 14;

/// Minimum length of a raw activity-stream timestamp (`YYYY-MM-DDTHH:MM:SS.ffffff`)
pub const RAW_TIMESTAMP_MIN_LEN: usize = 26;

const COMPACT_FORMAT: &str = "%Y%m%d%H%M%S";

/// Fixed character ranges of the date/time parts inside a raw timestamp
const DATE_TIME_PARTS: [(usize, usize, &str); 6] = [
    (0, 4, "year"),
    (5, 7, "month"),
    (8, 10, "day"),
    (11, 13, "hour"),
    (14, 16, "minute"),
    (17, 19, "second"),
];

const MICROS_PART: (usize, usize, &str) = (20, 26, "sub-second fraction");

/// Second-resolution timestamp encoded as 14 zero-padded digits.
///
/// Because every value has the same width, the derived lexicographic
/// ordering is also the chronological ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CompactTimestamp(String);

impl CompactTimestamp {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interpret the digits as a calendar date-time.
    ///
    /// Returns None for digit strings that are not a real date (e.g. month 13);
    /// ordering does not depend on this.
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.0, COMPACT_FORMAT).ok()
    }
}

impl fmt::Display for CompactTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CompactTimestamp {
    type Err = Error;

    /// Parse an already-compacted 14-digit value
    fn from_str(s: &str) -> Result<Self> {
        if s.len() != COMPACT_LEN {
            return Err(Error::CompactLength {
                raw: s.to_string(),
                expected: COMPACT_LEN,
            });
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::TimestampNotNumeric {
                raw: s.to_string(),
                field: "compact timestamp",
            });
        }
        Ok(Self(s.to_string()))
    }
}

/// Sub-second fraction of a raw timestamp, carried verbatim (six digits)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Micros(String);

impl Micros {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Micros {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn slice_digits<'a>(
    raw: &'a str,
    (start, end, field): (usize, usize, &'static str),
) -> Result<&'a str> {
    match raw.get(start..end) {
        Some(part) if part.bytes().all(|b| b.is_ascii_digit()) => Ok(part),
        _ => Err(Error::TimestampNotNumeric {
            raw: raw.to_string(),
            field,
        }),
    }
}

/// Compact a raw activity-stream timestamp such as `2024-01-01T09:00:00.123456Z`.
///
/// The date/time digits are taken from fixed offsets and concatenated, and the
/// six fraction digits at offsets 20..26 are returned alongside. Separators are
/// not checked, so both `T` and space separated forms are accepted.
pub fn compact_timestamp(raw: &str) -> Result<(CompactTimestamp, Micros)> {
    if raw.len() < RAW_TIMESTAMP_MIN_LEN {
        return Err(Error::TimestampTooShort {
            raw: raw.to_string(),
            required: RAW_TIMESTAMP_MIN_LEN,
        });
    }

    let mut compact = String::with_capacity(COMPACT_LEN);
    for part in DATE_TIME_PARTS {
        compact.push_str(slice_digits(raw, part)?);
    }
    let micros = slice_digits(raw, MICROS_PART)?;

    Ok((CompactTimestamp(compact), Micros(micros.to_string())))
}
