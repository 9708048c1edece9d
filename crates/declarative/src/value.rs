//! Typed attribute values
//!
//! Raw input is always a string; descriptors turn it into a [`Value`] whose
//! equality follows the attribute kind rather than the spelling.

use chrono::{DateTime, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;

/// Accepted calendar date layouts, tried in order
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// A parsed number
///
/// Integers keep full precision (serial numbers exceed `f64` mantissa range);
/// anything else falls back to a finite float.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i128),
    Float(f64),
}

impl Number {
    /// Parse a number, rejecting NaN and infinities
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if let Ok(int) = trimmed.parse::<i128>() {
            return Some(Self::Int(int));
        }
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Self::Float)
    }

    /// Lossy float view, used to compare mixed representations
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Int(i) => *i as f64,
            Self::Float(f) => *f,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

/// A validated attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Free text, enumerated choices and identities
    Text(String),
    /// Numeric attributes; equal when numerically equal
    Number(Number),
    Bool(bool),
    /// Calendar date; time of day is never kept
    Date(NaiveDate),
}

impl Value {
    /// Text content, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => n.fmt(f),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse a calendar date from any of the accepted layouts
///
/// RFC 3339 timestamps are accepted and truncated to their local date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Parse a boolean, accepting any capitalisation of true/false
pub fn parse_bool(raw: &str) -> Option<bool> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_keeps_large_integers_exact() {
        let serial = Number::parse("1234567890123456789").unwrap();
        assert_eq!(serial.to_string(), "1234567890123456789");
        assert_ne!(serial, Number::parse("1234567890123456788").unwrap());
    }

    #[test]
    fn test_number_equality_is_numeric() {
        assert_eq!(Number::parse("10"), Number::parse("010"));
        assert_eq!(Number::parse("10"), Number::parse("10.0"));
        assert_eq!(Number::parse(" 2.5 "), Number::parse("2.50"));
        assert_ne!(Number::parse("1"), Number::parse("2"));
    }

    #[test]
    fn test_number_rejects_non_numbers() {
        assert!(Number::parse("abc").is_none());
        assert!(Number::parse("").is_none());
        assert!(Number::parse("NaN").is_none());
        assert!(Number::parse("inf").is_none());
        assert!(Number::parse("12abc").is_none());
    }

    #[test]
    fn test_parse_date_layouts() {
        let expected = NaiveDate::from_ymd_opt(2015, 6, 1).unwrap();
        assert_eq!(parse_date("2015-06-01"), Some(expected));
        assert_eq!(parse_date("06/01/2015"), Some(expected));
        assert_eq!(parse_date("2015/06/01"), Some(expected));
        assert_eq!(parse_date("2015-06-01T23:59:59+00:00"), Some(expected));
        assert_eq!(parse_date("2015-13-01"), None);
        assert_eq!(parse_date("soon"), None);
    }

    #[test]
    fn test_date_values_ignore_time_of_day() {
        let morning = Value::Date(parse_date("2015-06-01T08:00:00Z").unwrap());
        let evening = Value::Date(parse_date("2015-06-01T20:00:00Z").unwrap());
        assert_eq!(morning, evening);
        assert_eq!(morning.to_string(), "2015-06-01");
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("True"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("FALSE"), Some(false));
        assert_eq!(parse_bool("yes"), None);
    }

    #[test]
    fn test_value_serializes_as_string() {
        let json = serde_json::to_string(&Value::Number(Number::Int(42))).unwrap();
        assert_eq!(json, "\"42\"");
    }
}
