//! Validated time windows for the change queries.
//!
//! The database compares row age against a Postgres interval. Free-form
//! strings are rejected at this boundary so a malformed window fails fast
//! with a validation error instead of producing an ambiguous result (or
//! reaching the server at all).

use crate::error::LimsError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

static INTERVAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(\d+)\s*(second|minute|hour|day|week)s?\s*$").unwrap());

/// Unit of a time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
}

impl IntervalUnit {
    fn secs(self) -> u64 {
        match self {
            IntervalUnit::Seconds => 1,
            IntervalUnit::Minutes => 60,
            IntervalUnit::Hours => 3_600,
            IntervalUnit::Days => 86_400,
            IntervalUnit::Weeks => 604_800,
        }
    }

    fn singular(self) -> &'static str {
        match self {
            IntervalUnit::Seconds => "second",
            IntervalUnit::Minutes => "minute",
            IntervalUnit::Hours => "hour",
            IntervalUnit::Days => "day",
            IntervalUnit::Weeks => "week",
        }
    }
}

/// A time window expressible as a database-native interval, e.g. "2 hours".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    count: u64,
    unit: IntervalUnit,
}

impl Interval {
    pub fn new(count: u64, unit: IntervalUnit) -> Self {
        Self { count, unit }
    }

    pub fn seconds(count: u64) -> Self {
        Self::new(count, IntervalUnit::Seconds)
    }

    pub fn minutes(count: u64) -> Self {
        Self::new(count, IntervalUnit::Minutes)
    }

    pub fn hours(count: u64) -> Self {
        Self::new(count, IntervalUnit::Hours)
    }

    pub fn days(count: u64) -> Self {
        Self::new(count, IntervalUnit::Days)
    }

    pub fn weeks(count: u64) -> Self {
        Self::new(count, IntervalUnit::Weeks)
    }

    /// Total length in seconds, for window comparisons.
    pub fn as_secs(&self) -> u64 {
        self.count.saturating_mul(self.unit.secs())
    }

    /// The Postgres-native rendering bound to `$n::text::interval`
    /// parameters, e.g. `"2 hours"`.
    pub fn as_pg(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = self.unit.singular();
        if self.count == 1 {
            write!(f, "1 {unit}")
        } else {
            write!(f, "{} {unit}s", self.count)
        }
    }
}

impl FromStr for Interval {
    type Err = LimsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = INTERVAL_RE
            .captures(s)
            .ok_or_else(|| LimsError::InvalidInterval(s.to_string()))?;
        let count: u64 = caps[1]
            .parse()
            .map_err(|_| LimsError::InvalidInterval(s.to_string()))?;
        let unit = match caps[2].to_ascii_lowercase().as_str() {
            "second" => IntervalUnit::Seconds,
            "minute" => IntervalUnit::Minutes,
            "hour" => IntervalUnit::Hours,
            "day" => IntervalUnit::Days,
            "week" => IntervalUnit::Weeks,
            _ => unreachable!("unit alternation covered by the pattern"),
        };
        Ok(Interval::new(count, unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_count_and_unit() {
        let window: Interval = "2 hours".parse().unwrap();
        assert_eq!(window, Interval::hours(2));

        let window: Interval = "1 hour".parse().unwrap();
        assert_eq!(window, Interval::hours(1));

        let window: Interval = "30 minutes".parse().unwrap();
        assert_eq!(window, Interval::minutes(30));
    }

    #[test]
    fn parsing_is_case_and_whitespace_tolerant() {
        let window: Interval = "  2 Hours ".parse().unwrap();
        assert_eq!(window, Interval::hours(2));

        let window: Interval = "1WEEK".parse().unwrap();
        assert_eq!(window, Interval::weeks(1));
    }

    #[test]
    fn rejects_anything_not_a_postgres_interval() {
        for bad in [
            "",
            "hours",
            "2.5 hours",
            "-2 hours",
            "2 fortnights",
            "2 hours ago",
            "2 hours; drop table project",
        ] {
            assert!(
                matches!(bad.parse::<Interval>(), Err(LimsError::InvalidInterval(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn renders_postgres_form_with_plural() {
        assert_eq!(Interval::hours(2).as_pg(), "2 hours");
        assert_eq!(Interval::hours(1).as_pg(), "1 hour");
        assert_eq!(Interval::seconds(90).as_pg(), "90 seconds");
    }

    #[test]
    fn as_secs_orders_windows() {
        assert!(Interval::hours(1).as_secs() < Interval::hours(2).as_secs());
        assert!(Interval::minutes(90).as_secs() > Interval::hours(1).as_secs());
        assert_eq!(Interval::minutes(60).as_secs(), Interval::hours(1).as_secs());
    }
}
