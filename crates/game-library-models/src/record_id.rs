use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Opaque backend identifier, normalized to its string form.
///
/// The backend has used several encodings over time: plain strings, numbers,
/// Mongo extended JSON (`{"$oid": "..."}`) and objects that wrap another
/// identifier under `_id`/`id`. All of them collapse into the same string so
/// lookups work regardless of which encoding a record happens to carry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Create an identifier from text. Blank text is not an identifier.
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Stringify any of the supported identifier encodings.
    ///
    /// Returns `None` for null, booleans, arrays, and objects that carry no
    /// recognizable identifier.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::new(s),
            Value::Number(n) => Self::new(n.to_string()),
            Value::Object(obj) => obj
                .get("$oid")
                .or_else(|| obj.get("_id"))
                .or_else(|| obj.get("id"))
                .and_then(Self::from_value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_string() {
        assert_eq!(RecordId::from_value(&json!("abc123")).unwrap().as_str(), "abc123");
        assert_eq!(RecordId::from_value(&json!("  abc123 ")).unwrap().as_str(), "abc123");
    }

    #[test]
    fn test_numeric_ids() {
        assert_eq!(RecordId::from_value(&json!(42)).unwrap().as_str(), "42");
        assert_eq!(RecordId::from_value(&json!(4.5)).unwrap().as_str(), "4.5");
    }

    #[test]
    fn test_object_wrappers() {
        let oid = json!({ "$oid": "65f0c0ffee" });
        assert_eq!(RecordId::from_value(&oid).unwrap().as_str(), "65f0c0ffee");

        let nested = json!({ "_id": { "$oid": "65f0c0ffee" } });
        assert_eq!(RecordId::from_value(&nested).unwrap().as_str(), "65f0c0ffee");

        let plain = json!({ "id": 7 });
        assert_eq!(RecordId::from_value(&plain).unwrap().as_str(), "7");
    }

    #[test]
    fn test_unusable_values() {
        assert!(RecordId::from_value(&Value::Null).is_none());
        assert!(RecordId::from_value(&json!("")).is_none());
        assert!(RecordId::from_value(&json!(true)).is_none());
        assert!(RecordId::from_value(&json!(["g1"])).is_none());
        assert!(RecordId::from_value(&json!({ "titulo": "no id here" })).is_none());
    }
}
