use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::errors::FeatureError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, FeatureError> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(|date| date.and_time(chrono::NaiveTime::MIN))
        .map_err(|_| FeatureError::InvalidDate(value.to_string()))
}

/// Inclusive upper bound on review timestamps.
///
/// A bare calendar date admits every review made on that day, a full
/// timestamp admits reviews up to and including that instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCutoff {
    Day(NaiveDate),
    Instant(NaiveDateTime),
}

impl DateCutoff {
    pub fn includes(&self, timestamp: NaiveDateTime) -> bool {
        match self {
            DateCutoff::Day(day) => timestamp.date() <= *day,
            DateCutoff::Instant(instant) => timestamp <= *instant,
        }
    }
}

impl Default for DateCutoff {
    fn default() -> Self {
        DateCutoff::Day(default_cutoff_day())
    }
}

fn default_cutoff_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 10, 10).unwrap_or_default()
}

impl FromStr for DateCutoff {
    type Err = FeatureError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if let Ok(day) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
            return Ok(DateCutoff::Day(day));
        }
        parse_timestamp(value).map(DateCutoff::Instant)
    }
}

impl fmt::Display for DateCutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateCutoff::Day(day) => write!(f, "{}", day.format(DATE_FORMAT)),
            DateCutoff::Instant(instant) => write!(f, "{}", instant.format("%Y-%m-%dT%H:%M:%S%.f")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(value: &str) -> NaiveDateTime {
        parse_timestamp(value).unwrap()
    }

    #[test]
    fn test_parse_supported_formats() {
        let expected = NaiveDate::from_ymd_opt(2018, 1, 2)
            .unwrap()
            .and_hms_opt(13, 45, 0)
            .unwrap();

        assert_eq!(ts("2018-01-02 13:45:00"), expected);
        assert_eq!(ts("2018-01-02T13:45:00"), expected);
        assert_eq!(ts("2018-01-02T13:45:00.000"), expected);
        assert_eq!(ts("2018-01-02T13:45:00Z"), expected);
        assert_eq!(ts("2018-01-02").date(), expected.date());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            parse_timestamp("yesterday"),
            Err(FeatureError::InvalidDate("yesterday".to_string()))
        );
    }

    #[test]
    fn test_day_cutoff_includes_whole_day() {
        let cutoff: DateCutoff = "2018-10-10".parse().unwrap();

        assert!(cutoff.includes(ts("2018-10-10 23:59:59")));
        assert!(cutoff.includes(ts("2018-01-01")));
        assert!(!cutoff.includes(ts("2018-10-11 00:00:00")));
    }

    #[test]
    fn test_instant_cutoff_is_inclusive() {
        let cutoff: DateCutoff = "2018-10-10 12:00:00".parse().unwrap();

        assert!(cutoff.includes(ts("2018-10-10 12:00:00")));
        assert!(!cutoff.includes(ts("2018-10-10 12:00:01")));
    }

    #[test]
    fn test_default_cutoff() {
        let cutoff = DateCutoff::default();

        assert_eq!(cutoff.to_string(), "2018-10-10");
        assert!(cutoff.includes(parse_timestamp("2018-10-10 23:59:59").unwrap()));
        assert!(!cutoff.includes(parse_timestamp("2018-10-11").unwrap()));
    }
}
