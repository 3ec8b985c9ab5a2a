// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wake timestamps reported by the account API.
//!
//! The API is not consistent about how it encodes instants, so all of the
//! following are accepted, either as a JSON string or a JSON number:
//!
//! - ISO 8601 with timezone: `"2024-01-15T07:30:00+01:00"`, `"2024-01-15T06:30:00Z"`
//! - ISO 8601 without timezone, read as UTC: `"2024-01-15T06:30:00"`
//! - Unix epoch seconds: `1705300200`
//! - Unix epoch milliseconds: `1705300200000`

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::clock::Timestamp;
use crate::error::ParseError;

/// Name of the wake timestamp field in API responses.
pub const WAKE_TIME_FIELD: &str = "wakeTime";

/// Largest epoch value still read as seconds (year 2286).
const MAX_EPOCH_SECONDS: i64 = 9_999_999_999;

/// The instant of the most recent wake event.
///
/// Ephemeral: one is fetched per read and never stored.
///
/// # Examples
///
/// ```
/// use motiv_bridge::account::WakeTime;
///
/// let a: WakeTime = "2024-01-15T06:30:00Z".parse().unwrap();
/// let b: WakeTime = "1705300200".parse().unwrap();
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WakeTime(Timestamp);

impl WakeTime {
    /// Wraps an existing UTC instant.
    #[must_use]
    pub const fn new(at: Timestamp) -> Self {
        Self(at)
    }

    /// Returns the instant in UTC.
    #[must_use]
    pub const fn as_datetime(&self) -> Timestamp {
        self.0
    }

    /// Extracts the wake time from a JSON response body.
    ///
    /// The field may sit at the top level or inside a `data` envelope.
    ///
    /// # Errors
    ///
    /// - [`ParseError::Json`] if the body is not JSON.
    /// - [`ParseError::MissingField`] if no `wakeTime` field is present.
    /// - [`ParseError::InvalidValue`] if the field cannot be read as an instant.
    pub fn from_response_body(body: &str) -> Result<Self, ParseError> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        let field = value
            .get(WAKE_TIME_FIELD)
            .or_else(|| value.get("data").and_then(|d| d.get(WAKE_TIME_FIELD)))
            .ok_or_else(|| ParseError::MissingField(WAKE_TIME_FIELD.to_string()))?;

        Self::from_json(field)
    }

    /// Reads a wake time from a JSON string or number.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidValue`] for any other JSON type or an
    /// unreadable value.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ParseError> {
        let parsed = match value {
            serde_json::Value::String(s) => s.parse().ok(),
            serde_json::Value::Number(n) => n.as_i64().and_then(Self::from_epoch),
            _ => None,
        };

        parsed.ok_or_else(|| ParseError::InvalidValue {
            field: WAKE_TIME_FIELD.to_string(),
            message: format!("expected ISO 8601 or Unix epoch, got {value}"),
        })
    }

    /// Reads a Unix epoch value, in seconds or milliseconds by magnitude.
    fn from_epoch(timestamp: i64) -> Option<Self> {
        if timestamp < 0 {
            return None;
        }

        let datetime = if timestamp > MAX_EPOCH_SECONDS {
            Utc.timestamp_millis_opt(timestamp).single()?
        } else {
            Utc.timestamp_opt(timestamp, 0).single()?
        };

        Some(Self(datetime))
    }

    fn from_iso_with_tz(s: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }

    fn from_iso_naive(s: &str) -> Option<Self> {
        const FORMATS: [&str; 4] = [
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%d %H:%M:%S%.f",
        ];

        FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|naive| Self(naive.and_utc()))
    }
}

impl FromStr for WakeTime {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if !s.is_empty()
            && s.chars().all(|c| c.is_ascii_digit())
            && let Some(dt) = s.parse().ok().and_then(Self::from_epoch)
        {
            return Ok(dt);
        }

        Self::from_iso_with_tz(s)
            .or_else(|| Self::from_iso_naive(s))
            .ok_or_else(|| ParseError::InvalidValue {
                field: WAKE_TIME_FIELD.to_string(),
                message: format!("expected ISO 8601 or Unix epoch, got {s:?}"),
            })
    }
}

impl From<Timestamp> for WakeTime {
    fn from(at: Timestamp) -> Self {
        Self(at)
    }
}

impl From<WakeTime> for Timestamp {
    fn from(wake: WakeTime) -> Self {
        wake.0
    }
}

impl std::fmt::Display for WakeTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn utc(s: &str) -> Timestamp {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn parse_iso_with_offset_normalises_to_utc() {
        let wake: WakeTime = "2024-01-15T07:30:00+01:00".parse().unwrap();
        assert_eq!(wake.as_datetime(), utc("2024-01-15T06:30:00Z"));
    }

    #[test]
    fn parse_iso_naive_is_utc() {
        let wake: WakeTime = "2024-01-15T06:30:00".parse().unwrap();
        assert_eq!(wake.as_datetime(), utc("2024-01-15T06:30:00Z"));
    }

    #[test]
    fn parse_iso_naive_with_fraction() {
        let wake: WakeTime = "2024-01-15 06:30:00.250".parse().unwrap();
        assert_eq!(wake.as_datetime().nanosecond(), 250_000_000);
    }

    #[test]
    fn parse_epoch_seconds() {
        let wake: WakeTime = "1705300200".parse().unwrap();
        assert_eq!(wake.as_datetime(), utc("2024-01-15T06:30:00Z"));
    }

    #[test]
    fn parse_epoch_milliseconds() {
        let wake: WakeTime = "1705300200500".parse().unwrap();
        assert_eq!(wake.as_datetime().timestamp_millis(), 1_705_300_200_500);
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = "yesterday".parse::<WakeTime>().unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { .. }));
    }

    #[test]
    fn parse_rejects_empty() {
        assert!("".parse::<WakeTime>().is_err());
    }

    #[test]
    fn from_json_number() {
        let wake = WakeTime::from_json(&serde_json::json!(1_705_300_200)).unwrap();
        assert_eq!(wake.as_datetime(), utc("2024-01-15T06:30:00Z"));
    }

    #[test]
    fn from_json_rejects_negative_and_bool() {
        assert!(WakeTime::from_json(&serde_json::json!(-5)).is_err());
        assert!(WakeTime::from_json(&serde_json::json!(true)).is_err());
    }

    #[test]
    fn from_response_body_top_level() {
        let wake =
            WakeTime::from_response_body(r#"{"wakeTime": "2024-01-15T06:30:00Z"}"#).unwrap();
        assert_eq!(wake.as_datetime(), utc("2024-01-15T06:30:00Z"));
    }

    #[test]
    fn from_response_body_in_data_envelope() {
        let wake = WakeTime::from_response_body(r#"{"data": {"wakeTime": 1705300200}}"#).unwrap();
        assert_eq!(wake.as_datetime(), utc("2024-01-15T06:30:00Z"));
    }

    #[test]
    fn from_response_body_missing_field() {
        let err = WakeTime::from_response_body(r#"{"sleep": []}"#).unwrap_err();
        assert!(matches!(err, ParseError::MissingField(f) if f == "wakeTime"));
    }

    #[test]
    fn from_response_body_not_json() {
        let err = WakeTime::from_response_body("<html>").unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn ordering_follows_instants() {
        let earlier: WakeTime = "2024-01-15T06:30:00Z".parse().unwrap();
        let later: WakeTime = "2024-01-15T06:31:00Z".parse().unwrap();
        assert!(earlier < later);
    }
}
