//! model::timespan
//!
//! Elapsed-time measurement and human-readable approximation.
//!
//! # Design
//!
//! A [`TimeSpan`] wraps a parsed UTC timestamp. The elapsed value is sampled
//! against the clock at call time, so repeated calls to [`TimeSpan::elapsed`]
//! can return different values. The readable rendering is memoized on first
//! access: display code asks for it repeatedly while rendering a page, and
//! the approximation should not drift mid-render.
//!
//! Timestamps use the provider's fixed wire pattern `YYYY-MM-DDTHH:MM:SSZ`
//! and are always interpreted as UTC.
//!
//! # Example
//!
//! ```
//! use hubcap::model::TimeSpan;
//!
//! let span = TimeSpan::parse("2020-01-01T00:00:00Z").unwrap();
//! assert!(span.elapsed() > 0);
//! ```

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

/// Wire pattern for provider timestamps.
const TIMESTAMP_PATTERN: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Unit ladder for the readable approximation.
///
/// Each divisor converts from the previous unit, so the ladder reads
/// 60 seconds to a minute, 60 minutes to an hour, 24 hours to a day,
/// 30.5 days to a month, 12 months to a year.
const UNIT_LADDER: [(&str, f64); 6] = [
    ("second", 1.0),
    ("minute", 60.0),
    ("hour", 60.0),
    ("day", 24.0),
    ("month", 30.5),
    ("year", 12.0),
];

/// Errors from timestamp parsing.
#[derive(Debug, Error)]
pub enum TimeParseError {
    /// The input does not match the `YYYY-MM-DDTHH:MM:SSZ` pattern.
    #[error("invalid timestamp '{input}': {source}")]
    InvalidTimestamp {
        /// The rejected input.
        input: String,
        /// Parser diagnostic.
        source: chrono::ParseError,
    },
}

/// Elapsed time since a fixed UTC origin.
///
/// Construction parses the origin eagerly; the elapsed value and its
/// readable form are computed on demand.
#[derive(Debug)]
pub struct TimeSpan {
    /// The parsed origin timestamp.
    origin: DateTime<Utc>,

    /// Memoized readable rendering.
    readable: OnceLock<String>,
}

impl TimeSpan {
    /// Parse a provider timestamp into a span origin.
    ///
    /// # Errors
    ///
    /// Returns [`TimeParseError::InvalidTimestamp`] if the input does not
    /// match `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn parse(timestamp: &str) -> Result<Self, TimeParseError> {
        let naive = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_PATTERN).map_err(|e| {
            TimeParseError::InvalidTimestamp {
                input: timestamp.to_string(),
                source: e,
            }
        })?;

        Ok(Self {
            origin: naive.and_utc(),
            readable: OnceLock::new(),
        })
    }

    /// The origin timestamp.
    pub fn origin(&self) -> DateTime<Utc> {
        self.origin
    }

    /// Whole seconds elapsed between the origin and now.
    ///
    /// The clock is sampled at call time; an origin in the future yields a
    /// negative value.
    pub fn elapsed(&self) -> i64 {
        (Utc::now() - self.origin).num_seconds()
    }

    /// Readable approximation of the elapsed time, e.g. `"3 days"`.
    ///
    /// Computed from [`elapsed`] on first access and memoized; later calls
    /// return the same rendering even as the clock advances.
    ///
    /// [`elapsed`]: TimeSpan::elapsed
    pub fn humanize(&self) -> &str {
        self.readable.get_or_init(|| approximate(self.elapsed()))
    }
}

impl std::fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.humanize())
    }
}

/// Approximate a second count as a single best-fit unit.
///
/// Walks the unit ladder, flooring at each division, and keeps the last
/// unit whose quotient is at least 1. Pluralizes unless the quotient is
/// exactly 1. Non-positive input renders as `"0 seconds"`.
///
/// # Example
///
/// ```
/// use hubcap::model::timespan::approximate;
///
/// assert_eq!(approximate(90), "1 minute");
/// assert_eq!(approximate(59), "59 seconds");
/// ```
pub fn approximate(seconds: i64) -> String {
    if seconds <= 0 {
        return "0 seconds".to_string();
    }

    let mut value = seconds as f64;
    let mut unit = "second";

    for (name, divisor) in UNIT_LADDER {
        let quotient = (value / divisor).floor();
        if quotient < 1.0 {
            break;
        }
        value = quotient;
        unit = name;
    }

    let count = value as i64;
    let plural = if count == 1 { "" } else { "s" };

    format!("{} {}{}", count, unit, plural)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_wire_pattern() {
        let span = TimeSpan::parse("2024-03-01T12:30:45Z").expect("parse");
        assert_eq!(span.origin().to_rfc3339(), "2024-03-01T12:30:45+00:00");
    }

    #[test]
    fn parse_rejects_other_shapes() {
        assert!(TimeSpan::parse("2024-03-01 12:30:45").is_err());
        assert!(TimeSpan::parse("2024-03-01T12:30:45+02:00").is_err());
        assert!(TimeSpan::parse("not a timestamp").is_err());
        assert!(TimeSpan::parse("").is_err());
    }

    #[test]
    fn parse_error_carries_input() {
        let err = TimeSpan::parse("bogus").unwrap_err();
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn elapsed_is_positive_for_past_origin() {
        let span = TimeSpan::parse("2000-01-01T00:00:00Z").expect("parse");
        assert!(span.elapsed() > 0);
    }

    #[test]
    fn elapsed_is_negative_for_future_origin() {
        let span = TimeSpan::parse("2999-01-01T00:00:00Z").expect("parse");
        assert!(span.elapsed() < 0);
    }

    #[test]
    fn approximate_sub_minute_stays_in_seconds() {
        assert_eq!(approximate(59), "59 seconds");
    }

    #[test]
    fn approximate_rounds_down_to_minutes() {
        assert_eq!(approximate(90), "1 minute");
        assert_eq!(approximate(119), "1 minute");
        assert_eq!(approximate(120), "2 minutes");
    }

    #[test]
    fn approximate_singular_has_no_trailing_s() {
        assert_eq!(approximate(1), "1 second");
        assert_eq!(approximate(60), "1 minute");
        assert_eq!(approximate(3600), "1 hour");
        assert_eq!(approximate(86_400), "1 day");
    }

    #[test]
    fn approximate_walks_the_full_ladder() {
        // 61 days: 30.5-day months floor to 2.
        assert_eq!(approximate(61 * 86_400), "2 months");
        // 2 years of 12 months of 30.5 days.
        assert_eq!(approximate(2 * 12 * 305 * 8_640), "2 years");
    }

    #[test]
    fn approximate_zero_and_negative_render_as_zero_seconds() {
        assert_eq!(approximate(0), "0 seconds");
        assert_eq!(approximate(-5), "0 seconds");
    }

    #[test]
    fn humanize_memoizes_first_rendering() {
        let span = TimeSpan::parse("2020-06-15T08:00:00Z").expect("parse");
        let first = span.humanize().to_string();
        assert_eq!(span.humanize(), first);
    }
}
