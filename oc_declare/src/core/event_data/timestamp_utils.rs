//! Shared timestamp parsing for the OCEL importers

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// A timestamp string that matched none of the supported formats
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unexpected timestamp format: {0:?}")]
pub struct InvalidTimestamp(pub String);

/// Parse a timestamp string to `DateTime<FixedOffset>`, trying multiple formats.
///
/// Formats are tried in this order:
/// 1. `custom_format` (if provided), first timezone-aware, then naive (as UTC)
/// 2. RFC 3339: `2023-10-06T09:30:21+00:00`
/// 3. ISO 8601 with offset without colon: `2023-10-06T09:30:21+0000`
/// 4. RFC 2822: `Fri, 06 Oct 2023 09:30:21 +0000`
/// 5. Naive forms (as UTC): `2023-10-06 09:30:21.890421`, `2023-10-06T09:30:21.348555`,
///    `2023-10-06T09:30:21` and `2023-10-06 09:30:21 UTC`
/// 6. Browser `Date::toString` output: `Mon Apr 03 2023 12:08:18 GMT+0200 (...)`
///
/// If `verbose` is set, failures are reported through [`tracing::warn!`].
pub fn parse_timestamp(
    time: &str,
    custom_format: Option<&str>,
    verbose: bool,
) -> Result<DateTime<FixedOffset>, InvalidTimestamp> {
    if let Some(date_format) = custom_format {
        if let Ok(dt) = DateTime::parse_from_str(time, date_format) {
            return Ok(dt);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(time, date_format) {
            return Ok(dt.and_utc().into());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(time) {
        return Ok(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(time, "%Y-%m-%dT%H:%M:%S%z") {
        return Ok(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(time) {
        return Ok(dt);
    }

    // Naive timestamps are interpreted as UTC
    for naive_format in ["%F %T%.f", "%FT%T%.f", "%FT%T", "%F %T UTC"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(time, naive_format) {
            return Ok(dt.and_utc().into());
        }
    }

    // Leading weekday is skipped through %Z, trailing "(zone name)" is ignored
    if let Ok((dt, _)) = DateTime::parse_and_remainder(time, "%Z %b %d %Y %T GMT%z") {
        return Ok(dt);
    }

    if verbose {
        tracing::warn!(timestamp = time, "failed to parse timestamp");
    }
    Err(InvalidTimestamp(time.to_string()))
}

/// Serde helper deserializing a timestamp through [`parse_timestamp`]
///
/// Used for the `time` fields of OCEL JSON, which are not always strict RFC 3339 in the wild.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_timestamp(&s, None, false).map_err(serde::de::Error::custom)
}
