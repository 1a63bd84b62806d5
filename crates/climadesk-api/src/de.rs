// Lenient field decoders for backend payloads.
//
// Timestamps arrive either as RFC 3339 or as zone-less local date-times
// (`2025-06-01T10:00:00`, `2025-06-01 10:00:00`). Zone-less values are
// taken as UTC. Identifiers arrive either as strings or as numbers.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

pub(crate) fn opt_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_timestamp(s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognized timestamp {s:?}"))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Int(i64),
    Float(f64),
}

pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<StringOrNumber> = Option::deserialize(deserializer)?;
    Ok(raw.map(|v| match v {
        StringOrNumber::Text(s) => s,
        StringOrNumber::Int(i) => i.to_string(),
        StringOrNumber::Float(f) => f.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn parses_rfc3339_with_offset() {
        let dt = parse_timestamp("2025-06-01T10:00:00+08:00").expect("parsed");
        assert_eq!(dt.hour(), 2);
    }

    #[test]
    fn parses_zone_less_forms_as_utc() {
        let a = parse_timestamp("2025-06-01T10:00:00").expect("T form");
        let b = parse_timestamp("2025-06-01 10:00:00").expect("space form");
        assert_eq!(a, b);
        assert_eq!(a.day(), 1);
        assert_eq!(a.hour(), 10);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
    }
}
