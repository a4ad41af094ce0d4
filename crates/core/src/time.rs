//! Timestamp parsing and rendering.
//!
//! Clients send ISO-8601 strings in several shapes (browser `datetime-local`
//! inputs have no offset, JavaScript `toISOString()` ends in `Z`). Everything
//! is normalised to UTC. Responses always carry an explicit `+00:00` offset.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};

/// Error returned for a timestamp that matches none of the accepted shapes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp: {0:?}")]
pub struct TimestampError(pub String);

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a client-supplied timestamp.
///
/// Accepted, in order:
/// - RFC 3339 with `Z` or a numeric offset (converted to UTC)
/// - a date and time without offset (taken as UTC)
/// - a bare `YYYY-MM-DD` date (midnight UTC)
///
/// # Errors
///
/// Returns [`TimestampError`] if no shape matches.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, TimestampError> {
    let s = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| TimestampError(input.to_owned()))
}

/// Render a timestamp with an explicit UTC offset.
#[must_use]
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Serde adapter rendering `DateTime<Utc>` as RFC 3339 with `+00:00`.
///
/// ```rust
/// # use chrono::{TimeZone, Utc, DateTime};
/// #[derive(serde::Serialize)]
/// struct Row {
///     #[serde(with = "queens_mall_core::time::rfc3339")]
///     at: DateTime<Utc>,
/// }
/// ```
pub mod rfc3339 {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(dt))
    }

    /// # Errors
    ///
    /// Fails when the string is not an accepted timestamp shape.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(D::Error::custom)
    }

    /// Adapter for `Option<DateTime<Utc>>`, rendering `None` as `null`.
    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

        /// # Errors
        ///
        /// Propagates serializer errors.
        pub fn serialize<S: Serializer>(
            dt: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => serializer.serialize_str(&super::super::format_timestamp(dt)),
                None => serializer.serialize_none(),
            }
        }

        /// # Errors
        ///
        /// Fails when a present string is not an accepted timestamp shape.
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .filter(|raw| !raw.trim().is_empty())
                .map(|raw| super::super::parse_timestamp(&raw).map_err(D::Error::custom))
                .transpose()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn test_parse_zulu() {
        let dt = parse_timestamp("2026-06-15T18:30:00Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 6, 15, 18, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_offset_converts_to_utc() {
        let dt = parse_timestamp("2026-06-15T20:30:00+02:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 6, 15, 18, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_is_utc() {
        let expected = Utc.with_ymd_and_hms(2026, 6, 15, 18, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2026-06-15T18:30:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2026-06-15T18:30").unwrap(), expected);
        assert_eq!(parse_timestamp("2026-06-15 18:30:00").unwrap(), expected);
    }

    #[test]
    fn test_parse_bare_date() {
        let dt = parse_timestamp("2026-07-01").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("tomorrow").is_err());
        assert!(parse_timestamp("").is_err());
        assert!(parse_timestamp("2026-13-01").is_err());
    }

    #[test]
    fn test_format_has_explicit_offset() {
        let dt = Utc.with_ymd_and_hms(2026, 6, 15, 18, 30, 0).unwrap();
        assert_eq!(format_timestamp(&dt), "2026-06-15T18:30:00+00:00");
    }

    #[test]
    fn test_serde_option() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Wrapper {
            #[serde(with = "rfc3339::option", default)]
            at: Option<DateTime<Utc>>,
        }

        let json = serde_json::to_string(&Wrapper { at: None }).unwrap();
        assert_eq!(json, r#"{"at":null}"#);

        let parsed: Wrapper = serde_json::from_str(r#"{"at":"2026-06-15T18:30:00Z"}"#).unwrap();
        assert!(parsed.at.is_some());

        let empty: Wrapper = serde_json::from_str(r#"{"at":""}"#).unwrap();
        assert!(empty.at.is_none());

        assert!(serde_json::from_str::<Wrapper>(r#"{"at":"soon"}"#).is_err());
    }
}
