//! File name patterns.
//!
//! A pattern is a strftime string such as `/var/log/app.%Y%m%d`. The same
//! pattern yields the time-bucketed file name for a given instant and the
//! glob that matches every file the pattern can produce.

use std::fmt::Write;
use std::time::Duration;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::RotateError;

#[allow(clippy::expect_used)]
static SPECIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%[%+A-Za-z]").expect("specifier regex is valid"));

#[allow(clippy::expect_used)]
static WILDCARD_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*+").expect("wildcard regex is valid"));

/// A validated strftime file name pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePattern {
    raw: String,
    glob: String,
}

impl FilePattern {
    /// Parse `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`RotateError::InvalidPattern`] if the pattern is empty or
    /// contains an unknown conversion specifier.
    pub fn new(pattern: impl Into<String>) -> Result<Self, RotateError> {
        let raw = pattern.into();
        if raw.is_empty() || StrftimeItems::new(&raw).any(|item| matches!(item, Item::Error)) {
            return Err(RotateError::InvalidPattern { pattern: raw });
        }
        let glob = to_glob(&raw);
        Ok(Self { raw, glob })
    }

    /// The pattern as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Glob matching every name this pattern produces.
    #[must_use]
    pub fn glob(&self) -> &str {
        &self.glob
    }

    /// Name of the time bucket containing `now`.
    ///
    /// The wall-clock time in `now`'s zone is truncated to a multiple of
    /// `rotation_time` before formatting, so daily buckets start at local
    /// midnight. A zero `rotation_time` formats `now` unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`RotateError::InvalidPattern`] if formatting fails.
    pub fn bucket_name(
        &self,
        now: DateTime<FixedOffset>,
        rotation_time: Duration,
    ) -> Result<String, RotateError> {
        let bucket = truncate(now, rotation_time);
        let mut name = String::with_capacity(self.raw.len() + 8);
        write!(name, "{}", bucket.format(&self.raw)).map_err(|_| RotateError::InvalidPattern {
            pattern: self.raw.clone(),
        })?;
        Ok(name)
    }
}

/// Replace every conversion specifier with `*` and collapse wildcard runs.
#[must_use]
pub fn to_glob(pattern: &str) -> String {
    let replaced = SPECIFIER.replace_all(pattern, "*");
    WILDCARD_RUN.replace_all(&replaced, "*").into_owned()
}

fn truncate(now: DateTime<FixedOffset>, rotation_time: Duration) -> DateTime<FixedOffset> {
    let period = i64::try_from(rotation_time.as_millis()).unwrap_or(i64::MAX);
    if period <= 0 {
        return now;
    }

    let wall = now.naive_local().and_utc().timestamp_millis();
    let floored = wall - wall.rem_euclid(period);
    DateTime::from_timestamp_millis(floored)
        .map(|dt| dt.naive_utc())
        .and_then(|naive: NaiveDateTime| now.offset().from_local_datetime(&naive).single())
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    const DAY: Duration = Duration::from_secs(24 * 3600);
    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn test_glob_conversion() {
        assert_eq!(to_glob("/var/log/app.%Y%m%d"), "/var/log/app.*");
        assert_eq!(to_glob("app.%Y-%m-%d.log"), "app.*-*-*.log");
        assert_eq!(to_glob("app.%Y%%%m"), "app.*");
        assert_eq!(to_glob("plain.log"), "plain.log");
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        assert!(matches!(
            FilePattern::new("app.%"),
            Err(RotateError::InvalidPattern { .. })
        ));
        assert!(FilePattern::new("").is_err());
    }

    #[test]
    fn test_daily_bucket_is_local_midnight() {
        let pattern = FilePattern::new("app.%Y-%m-%d").unwrap();
        let name = pattern
            .bucket_name(at("2024-01-01T23:30:00+08:00"), DAY)
            .unwrap();
        assert_eq!(name, "app.2024-01-01");
    }

    #[test]
    fn test_hourly_bucket_truncates_minutes() {
        let pattern = FilePattern::new("app.%Y%m%d%H%M").unwrap();
        let name = pattern
            .bucket_name(at("2024-03-05T10:47:12-05:00"), HOUR)
            .unwrap();
        assert_eq!(name, "app.202403051000");
    }

    #[test]
    fn test_zero_rotation_time_does_not_truncate() {
        let pattern = FilePattern::new("app.%H%M%S").unwrap();
        let name = pattern
            .bucket_name(at("2024-03-05T10:47:12Z"), Duration::ZERO)
            .unwrap();
        assert_eq!(name, "app.104712");
    }

    #[test]
    fn test_offset_specifier_formats() {
        let pattern = FilePattern::new("app.%Y%m%d%z").unwrap();
        let name = pattern
            .bucket_name(at("2024-03-05T10:47:12+02:00"), DAY)
            .unwrap();
        assert_eq!(name, "app.20240305+0200");
    }
}
