//! Parsing of the proxy's `time` field.
//!
//! Accepts the formats nginx and OpenResty can log:
//! - `$time_iso8601` / RFC 3339: `2024-01-01T00:00:00+00:00`
//! - `$time_local`: `01/Jan/2024:00:00:00 +0000`
//! - RFC 2822: `Mon, 01 Jan 2024 00:00:00 +0000`
//! - zone-less ISO 8601, taken as UTC: `2024-01-01 00:00:00`

use chrono::{DateTime, FixedOffset, NaiveDateTime};

const TIME_LOCAL: &str = "%d/%b/%Y:%H:%M:%S %z";
const ZONED: &[&str] = &["%Y-%m-%d %H:%M:%S%.f %z", "%Y-%m-%dT%H:%M:%S%.f%z"];
const NAIVE: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a timestamp, returning whole seconds since the Unix epoch.
///
/// Fractional seconds are discarded (floor).
pub fn parse_epoch_seconds(raw: &str) -> Option<i64> {
    parse(raw.trim()).map(|dt| dt.timestamp())
}

fn parse(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, TIME_LOCAL) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt);
    }
    for format in ZONED {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NAIVE
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc().fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEW_YEAR_2024: i64 = 1_704_067_200;

    #[test]
    fn test_iso8601() {
        assert_eq!(parse_epoch_seconds("2024-01-01T00:00:00Z"), Some(NEW_YEAR_2024));
        assert_eq!(parse_epoch_seconds("2024-01-01T00:00:00+00:00"), Some(NEW_YEAR_2024));
        assert_eq!(parse_epoch_seconds("2024-01-01T01:00:00+01:00"), Some(NEW_YEAR_2024));
    }

    #[test]
    fn test_time_local() {
        assert_eq!(parse_epoch_seconds("01/Jan/2024:00:00:00 +0000"), Some(NEW_YEAR_2024));
        assert_eq!(parse_epoch_seconds("31/Dec/2023:19:00:00 -0500"), Some(NEW_YEAR_2024));
    }

    #[test]
    fn test_rfc2822() {
        assert_eq!(parse_epoch_seconds("Mon, 01 Jan 2024 00:00:00 +0000"), Some(NEW_YEAR_2024));
    }

    #[test]
    fn test_zoneless_is_utc() {
        assert_eq!(parse_epoch_seconds("2024-01-01 00:00:00"), Some(NEW_YEAR_2024));
        assert_eq!(parse_epoch_seconds("2024-01-01T00:00:00"), Some(NEW_YEAR_2024));
    }

    #[test]
    fn test_fraction_is_floored() {
        assert_eq!(parse_epoch_seconds("2024-01-01T00:00:00.999Z"), Some(NEW_YEAR_2024));
    }

    #[test]
    fn test_garbage() {
        assert_eq!(parse_epoch_seconds(""), None);
        assert_eq!(parse_epoch_seconds("yesterday"), None);
        assert_eq!(parse_epoch_seconds("2024-13-01T00:00:00Z"), None);
    }
}
