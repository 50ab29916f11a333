use std::fmt;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Acquisition date in `YYYY-MM-DD` form, the key the imagery provider and
/// all column suffixes use. Kept as validated text: lexicographic order is
/// chronological order, and no date arithmetic beyond day-window filtering
/// is ever needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AcqDate(String);

impl AcqDate {
    pub fn new(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes.iter().enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
        if !well_formed {
            bail!("invalid acquisition date: {:?} (expected YYYY-MM-DD)", s);
        }
        let date = AcqDate(s);
        let (month, day) = (date.month(), date.day());
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            bail!("invalid acquisition date: {:?} (month or day out of range)", date.0);
        }
        Ok(date)
    }

    #[inline] pub fn as_str(&self) -> &str { &self.0 }

    #[inline] pub fn year(&self) -> i32 { self.0[..4].parse().unwrap_or(0) }
    #[inline] pub fn month(&self) -> u32 { self.0[5..7].parse().unwrap_or(0) }
    #[inline] pub fn day(&self) -> u32 { self.0[8..10].parse().unwrap_or(0) }
}

impl fmt::Display for AcqDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::AcqDate;

    #[test]
    fn parses_fields() {
        let date = AcqDate::new("2021-07-16").unwrap();
        assert_eq!(date.year(), 2021);
        assert_eq!(date.month(), 7);
        assert_eq!(date.day(), 16);
    }

    #[test]
    fn rejects_malformed() {
        assert!(AcqDate::new("2021-7-16").is_err());
        assert!(AcqDate::new("2021/07/16").is_err());
        assert!(AcqDate::new("2021-13-01").is_err());
        assert!(AcqDate::new("2021-00-10").is_err());
    }

    #[test]
    fn lexicographic_is_chronological() {
        let a = AcqDate::new("2021-06-01").unwrap();
        let b = AcqDate::new("2021-10-29").unwrap();
        assert!(a < b);
    }
}
