//! Conversions between epoch seconds and ISO-8601 timestamps

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Converts floating-point seconds since the Unix epoch to a `DateTime`
pub(crate) fn from_epoch(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = (((secs - whole) * 1e9).round() as u32).min(999_999_999);
    DateTime::<Utc>::from_timestamp(whole as i64, nanos)
}

/// Converts a `DateTime` to floating-point seconds since the Unix epoch
pub(crate) fn to_epoch(time: &DateTime<Utc>) -> f64 {
    time.timestamp() as f64 + f64::from(time.timestamp_subsec_nanos()) / 1e9
}

/// Renders epoch seconds the way gpsd does, e.g. `2011-03-29T13:51:55.000Z`
pub(crate) fn iso_time(secs: f64) -> Option<String> {
    from_epoch(secs).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Parses an ISO-8601 timestamp; a missing offset is taken as UTC
pub(crate) fn parse_iso_time(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.and_utc())
        })
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_round_trip_keeps_millis() {
        let text = iso_time(1_301_406_715.25).unwrap();
        assert_eq!(text, "2011-03-29T13:51:55.250Z");
        let parsed = parse_iso_time(&text).unwrap();
        assert_eq!(to_epoch(&parsed), 1_301_406_715.25);
    }

    #[test]
    fn offsetless_timestamp_is_utc() {
        let parsed = parse_iso_time("2011-03-29T13:51:55").unwrap();
        assert_eq!(to_epoch(&parsed), 1_301_406_715.0);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_iso_time("yesterday").is_none());
        assert!(iso_time(f64::NAN).is_none());
    }
}
