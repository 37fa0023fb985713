//! Month-granularity date value used for the reporting month, attrition
//! exit months and expense month filters.

use anyhow::{anyhow, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A calendar month (YYYY-MM). Ordering is chronological.
///
/// Parsing is strict: exactly four year digits, a dash and two month
/// digits. Anything else is rejected so malformed months can never reach
/// the aggregation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(anyhow!("Month must be between 1 and 12, got {}", month));
        }
        if !(1900..=2100).contains(&year) {
            return Err(anyhow!("Year must be between 1900 and 2100, got {}", year));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The month a date falls in.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// First day of the month, the reference point for attrition cutoff
    /// comparisons.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    /// Display label like "Mar 2025".
    pub fn label(&self) -> String {
        self.first_day().format("%b %Y").to_string()
    }
}

impl FromStr for YearMonth {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || anyhow!("Invalid month format '{}'. Use YYYY-MM.", s);

        if s.len() != 7 || s.as_bytes()[4] != b'-' {
            return Err(malformed());
        }
        let year: i32 = s[..4].parse().map_err(|_| malformed())?;
        let month: u32 = s[5..].parse().map_err(|_| malformed())?;
        Self::new(year, month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
