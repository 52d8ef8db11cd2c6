//! Time bound normalization for `where_time_between`
//!
//! Bounds are accepted in several human formats and rewritten as
//! `YYYY-MM-DDTHH:mm:ss`, the layout the backend expects together with a
//! `time_zone` option.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Output layout of a normalized bound
pub const BOUND_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Time zone applied when the caller does not supply one
pub const DEFAULT_TIME_ZONE: &str = "+08:00";

const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_LAYOUTS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

/// Whether a bound counts as "open" and must be left untouched
pub fn is_empty_bound(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty() || s == "0",
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(items) => items.is_empty(),
        Value::Object(_) => false,
    }
}

/// Normalize one bound.
///
/// Returns `None` when the value cannot be read as a point in time. Empty
/// bounds are returned unchanged. Instants carrying their own offset are
/// shifted to `time_zone` when it is a fixed offset, so the rewritten wall
/// clock still designates the same instant.
pub fn normalize_bound(value: &Value, time_zone: &str) -> Option<Value> {
    if is_empty_bound(value) {
        return Some(value.clone());
    }

    let zone = time_zone.parse::<FixedOffset>().ok();

    let naive = match value {
        Value::Number(n) => {
            let secs = n.as_i64()?;
            let instant = DateTime::from_timestamp(secs, 0)?;
            match zone {
                Some(zone) => instant.with_timezone(&zone).naive_local(),
                None => instant.naive_utc(),
            }
        }
        Value::String(s) => parse_str(s.trim(), zone)?,
        _ => return None,
    };

    Some(Value::String(naive.format(BOUND_FORMAT).to_string()))
}

fn parse_str(raw: &str, zone: Option<FixedOffset>) -> Option<NaiveDateTime> {
    let with_offset = DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .ok();
    if let Some(instant) = with_offset {
        return Some(match zone {
            Some(zone) => instant.with_timezone(&zone).naive_local(),
            None => instant.naive_local(),
        });
    }

    if let Some(parsed) = DATETIME_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
    {
        return Some(parsed);
    }

    DATE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(raw, layout).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_bounds_pass_through() {
        for value in [json!(null), json!(""), json!("0"), json!(0), json!(false)] {
            assert_eq!(normalize_bound(&value, DEFAULT_TIME_ZONE), Some(value.clone()));
        }
    }

    #[test]
    fn test_naive_layouts() {
        for raw in [
            "2024-03-01 08:30:00",
            "2024-03-01T08:30:00",
            "2024/03/01 08:30",
            "2024-03-01T08:30:00.250",
        ] {
            assert_eq!(
                normalize_bound(&json!(raw), DEFAULT_TIME_ZONE),
                Some(json!("2024-03-01T08:30:00")),
                "layout {}",
                raw
            );
        }
    }

    #[test]
    fn test_bare_date_is_midnight() {
        assert_eq!(
            normalize_bound(&json!("2024-03-01"), DEFAULT_TIME_ZONE),
            Some(json!("2024-03-01T00:00:00"))
        );
    }

    #[test]
    fn test_offset_instant_is_shifted_into_zone() {
        assert_eq!(
            normalize_bound(&json!("2024-03-01T00:00:00Z"), "+08:00"),
            Some(json!("2024-03-01T08:00:00"))
        );
    }

    #[test]
    fn test_offset_instant_keeps_wall_clock_for_named_zone() {
        assert_eq!(
            normalize_bound(&json!("2024-03-01T10:00:00+02:00"), "Europe/Paris"),
            Some(json!("2024-03-01T10:00:00"))
        );
    }

    #[test]
    fn test_unix_seconds() {
        assert_eq!(
            normalize_bound(&json!(1_700_000_000), "+00:00"),
            Some(json!("2023-11-14T22:13:20"))
        );
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert_eq!(normalize_bound(&json!("yesterday-ish"), DEFAULT_TIME_ZONE), None);
        assert_eq!(normalize_bound(&json!({ "at": 1 }), DEFAULT_TIME_ZONE), None);
    }
}
