//! Scene time and time intervals
//!
//! Sensor properties are sampled against a scene clock rather than wall
//! time. [`JulianDate`] is a thin wrapper over seconds so that time values
//! cannot be confused with angles or distances at call sites.

use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;

/// A point on the scene clock, in seconds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct JulianDate(pub f64);

impl JulianDate {
    /// Create a date from seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self(seconds)
    }

    /// Seconds since the scene epoch
    pub fn seconds(self) -> f64 {
        self.0
    }

    /// Seconds elapsed from `earlier` to `self`
    pub fn seconds_since(self, earlier: JulianDate) -> f64 {
        self.0 - earlier.0
    }

    /// Date offset by a number of seconds
    pub fn add_seconds(self, seconds: f64) -> Self {
        Self(self.0 + seconds)
    }
}

impl fmt::Display for JulianDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A span of scene time with configurable endpoint inclusion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeInterval {
    /// Start of the interval
    pub start: JulianDate,
    /// End of the interval
    pub stop: JulianDate,
    /// Whether `start` itself belongs to the interval
    pub start_included: bool,
    /// Whether `stop` itself belongs to the interval
    pub stop_included: bool,
}

impl TimeInterval {
    /// Create a closed interval `[start, stop]`
    pub fn closed(start: JulianDate, stop: JulianDate) -> Self {
        Self {
            start,
            stop,
            start_included: true,
            stop_included: true,
        }
    }

    /// An interval covering all of time
    pub fn infinite() -> Self {
        Self::closed(JulianDate(f64::NEG_INFINITY), JulianDate(f64::INFINITY))
    }

    /// Check whether the interval contains no time at all
    pub fn is_empty(&self) -> bool {
        if self.stop.0 < self.start.0 {
            return true;
        }
        self.stop.0 == self.start.0 && !(self.start_included && self.stop_included)
    }

    /// Check whether a date falls inside the interval
    pub fn contains(&self, time: JulianDate) -> bool {
        if self.is_empty() {
            return false;
        }
        let after_start = if self.start_included {
            time.0 >= self.start.0
        } else {
            time.0 > self.start.0
        };
        let before_stop = if self.stop_included {
            time.0 <= self.stop.0
        } else {
            time.0 < self.stop.0
        };
        after_start && before_stop
    }
}

/// Error produced when parsing an ISO-style `"start/stop"` interval string
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid time interval: {0}")]
pub struct ParseIntervalError(pub String);

impl FromStr for TimeInterval {
    type Err = ParseIntervalError;

    /// Parse `"start/stop"` where both sides are seconds on the scene clock
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, stop) = s
            .split_once('/')
            .ok_or_else(|| ParseIntervalError(s.to_string()))?;
        let start: f64 = start
            .trim()
            .parse()
            .map_err(|_| ParseIntervalError(s.to_string()))?;
        let stop: f64 = stop
            .trim()
            .parse()
            .map_err(|_| ParseIntervalError(s.to_string()))?;
        if stop < start {
            return Err(ParseIntervalError(s.to_string()));
        }
        Ok(Self::closed(JulianDate(start), JulianDate(stop)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_interval_contains_endpoints() {
        let interval = TimeInterval::closed(JulianDate(0.0), JulianDate(10.0));
        assert!(interval.contains(JulianDate(0.0)));
        assert!(interval.contains(JulianDate(10.0)));
        assert!(!interval.contains(JulianDate(10.5)));
    }

    #[test]
    fn test_open_stop_excludes_endpoint() {
        let interval = TimeInterval {
            stop_included: false,
            ..TimeInterval::closed(JulianDate(0.0), JulianDate(10.0))
        };
        assert!(!interval.contains(JulianDate(10.0)));
    }

    #[test]
    fn test_degenerate_interval_is_empty_unless_closed() {
        let point = TimeInterval::closed(JulianDate(5.0), JulianDate(5.0));
        assert!(point.contains(JulianDate(5.0)));

        let half_open = TimeInterval {
            start_included: false,
            ..point
        };
        assert!(half_open.is_empty());
    }

    #[test]
    fn test_parse_interval() {
        let interval: TimeInterval = "10/20.5".parse().unwrap();
        assert_eq!(interval.start, JulianDate(10.0));
        assert_eq!(interval.stop, JulianDate(20.5));
        assert!("20/10".parse::<TimeInterval>().is_err());
        assert!("garbage".parse::<TimeInterval>().is_err());
    }
}
