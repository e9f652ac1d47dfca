use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use mongodb::bson::DateTime as BsonDateTime;

/// Parses a client-supplied meeting date.
///
/// Accepts RFC 3339 (`2026-10-17T14:00:00Z`), a datetime-local value
/// (`2026-10-17T14:00`) read as UTC, or a bare date read as midnight UTC.
pub fn parse_client_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn to_bson(dt: DateTime<Utc>) -> BsonDateTime {
    BsonDateTime::from_millis(dt.timestamp_millis())
}

pub fn to_rfc3339(dt: BsonDateTime) -> String {
    DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis())
        .map(|d| d.to_rfc3339())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_rfc3339_with_offset() {
        let dt = parse_client_date("2026-10-17T14:30:00+02:00").unwrap();
        assert_eq!(dt.hour(), 12);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn parses_datetime_local() {
        let dt = parse_client_date("2026-10-17T09:15").unwrap();
        assert_eq!((dt.day(), dt.hour(), dt.minute()), (17, 9, 15));
    }

    #[test]
    fn bare_date_is_midnight_utc() {
        let dt = parse_client_date("2026-10-17").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2026, 10, 17));
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_client_date("next tuesday").is_none());
        assert!(parse_client_date("").is_none());
        assert!(parse_client_date("2026-13-40").is_none());
    }

    #[test]
    fn bson_round_trip_keeps_millis() {
        let dt = parse_client_date("2026-10-17T14:30:00.250Z").unwrap();
        let bson = to_bson(dt);
        assert_eq!(bson.timestamp_millis(), dt.timestamp_millis());
        assert_eq!(to_rfc3339(bson), "2026-10-17T14:30:00.250+00:00");
    }
}
