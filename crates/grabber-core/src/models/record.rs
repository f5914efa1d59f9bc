//! Extraction record produced for one document.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Why a field could not be determined.
///
/// Both reasons mean the same thing to callers: the value is unknown. The
/// distinction is kept for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnknownReason {
    /// Nothing in the text matched the field.
    NotFound,
    /// Two or more distinct values were found.
    Ambiguous,
}

impl fmt::Display for UnknownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnknownReason::NotFound => write!(f, "not found"),
            UnknownReason::Ambiguous => write!(f, "ambiguous"),
        }
    }
}

/// Resolved value of a single field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldValue {
    /// A single normalized value.
    Known(String),
    /// The value could not be determined.
    Unknown(UnknownReason),
}

impl FieldValue {
    pub fn is_known(&self) -> bool {
        matches!(self, FieldValue::Known(_))
    }

    pub fn is_unknown(&self) -> bool {
        !self.is_known()
    }

    /// The normalized value, if known.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Known(value) => Some(value),
            FieldValue::Unknown(_) => None,
        }
    }

    /// Parse a known numeric value (e.g. "1234" or "1234.5").
    pub fn as_decimal(&self) -> Option<Decimal> {
        self.as_str().and_then(|s| Decimal::from_str(s).ok())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Known(value) => write!(f, "{}", value),
            FieldValue::Unknown(_) => write!(f, "unknown"),
        }
    }
}

/// Known values serialize as strings, unknown ones as `null`.
impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FieldValue::Known(value) => serializer.serialize_some(value),
            FieldValue::Unknown(_) => serializer.serialize_none(),
        }
    }
}

/// Field name to resolved value, for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExtractionRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl ExtractionRecord {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.insert(field.into(), value);
    }

    /// Value of a field, or `None` if the profile has no such field.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Known value of a field as a string.
    pub fn value(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_str)
    }

    /// Known numeric value of a field.
    pub fn decimal(&self, field: &str) -> Option<Decimal> {
        self.get(field).and_then(FieldValue::as_decimal)
    }

    /// Iterate fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields with a known value.
    pub fn known_count(&self) -> usize {
        self.fields.values().filter(|v| v.is_known()).count()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serialize_known_and_unknown() {
        let mut record = ExtractionRecord::new();
        record.insert("currency", FieldValue::Known("RUB".to_string()));
        record.insert("cash", FieldValue::Unknown(UnknownReason::Ambiguous));

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"cash":null,"currency":"RUB"}"#);
    }

    #[test]
    fn test_decimal_access() {
        let mut record = ExtractionRecord::new();
        record.insert("sales", FieldValue::Known("12345.6".to_string()));
        record.insert("measure", FieldValue::Known("тыс".to_string()));

        assert_eq!(record.decimal("sales"), Some(Decimal::from_str("12345.6").unwrap()));
        assert_eq!(record.decimal("measure"), None);
        assert_eq!(record.decimal("missing"), None);
        assert_eq!(record.known_count(), 2);
    }

    #[test]
    fn test_unknown_display() {
        assert_eq!(FieldValue::Unknown(UnknownReason::NotFound).to_string(), "unknown");
        assert_eq!(UnknownReason::Ambiguous.to_string(), "ambiguous");
    }
}
