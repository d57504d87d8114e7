// Lenient field access over backend JSON records.
//
// Records come from several generations of the backend, so every reader takes
// a list of candidate keys and treats a value of the wrong shape as absent
// instead of failing the whole record.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::game::Game;
use crate::review::Review;

pub(crate) type Object = Map<String, Value>;

/// Decode a raw game collection, dropping `null` and non-object entries.
pub fn games_from_values(values: Vec<Value>) -> Vec<Game> {
    values.iter().filter_map(Game::from_value).collect()
}

/// Decode a raw review collection, dropping `null` and non-object entries.
pub fn reviews_from_values(values: Vec<Value>) -> Vec<Review> {
    values.iter().filter_map(Review::from_value).collect()
}

/// First non-null value among `keys`.
pub(crate) fn field<'a>(obj: &'a Object, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| !value.is_null())
}

/// First key holding non-blank text. Numbers are accepted and rendered as text.
pub(crate) fn text(obj: &Object, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find_map(value_text)
}

pub(crate) fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse a number or numeric string. Non-finite results count as missing.
pub fn parse_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

pub(crate) fn number(obj: &Object, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find_map(parse_number)
}

pub(crate) fn integer(obj: &Object, keys: &[&str]) -> Option<i32> {
    number(obj, keys)
        .filter(|n| *n >= i32::MIN as f64 && *n <= i32::MAX as f64)
        .map(|n| n.trunc() as i32)
}

pub(crate) fn flag(obj: &Object, keys: &[&str]) -> bool {
    match field(obj, keys) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
        Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "si" | "sí" | "yes"),
        _ => false,
    }
}

pub(crate) fn timestamp(obj: &Object, keys: &[&str]) -> Option<DateTime<Utc>> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find_map(parse_timestamp)
}

/// Accepts RFC 3339 strings, plain `YYYY-MM-DD` dates, epoch milliseconds and
/// Mongo extended JSON (`{"$date": ...}`).
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| Utc.from_utc_datetime(&naive))
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        Value::Object(obj) => obj.get("$date").and_then(parse_timestamp),
        _ => None,
    }
}
