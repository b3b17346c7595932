//! Configuration records and their metadata trees.
//!
//! Metadata is a recursive sum type: every node is either a nested mapping
//! or a scalar leaf. Lists are not part of the model and fail to decode.
//! Scalars keep their JSON type so a record comes back out exactly as it
//! went in; matching works on their text form.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A string-keyed level of a metadata tree.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A named configuration entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigRecord {
    /// Primary key within the store.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Arbitrarily nested metadata.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl ConfigRecord {
    pub fn new(name: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            name: name.into(),
            metadata,
        }
    }
}

/// A node in a metadata tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Object(Metadata),
    Scalar(Scalar),
}

impl MetadataValue {
    pub fn as_object(&self) -> Option<&Metadata> {
        match self {
            MetadataValue::Object(map) => Some(map),
            MetadataValue::Scalar(_) => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            MetadataValue::Scalar(scalar) => Some(scalar),
            MetadataValue::Object(_) => None,
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Scalar(Scalar::String(value.to_string()))
    }
}

impl From<Metadata> for MetadataValue {
    fn from(value: Metadata) -> Self {
        MetadataValue::Object(value)
    }
}

/// A leaf value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Null,
}

impl Scalar {
    /// Compare against a client-supplied value using the leaf's text form.
    pub fn matches_text(&self, expected: &str) -> bool {
        match self {
            Scalar::String(s) => s == expected,
            other => other.to_string() == expected,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::String(s) => f.write_str(s),
            Scalar::Null => f.write_str("null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_nested_record() {
        let record: ConfigRecord = serde_json::from_str(
            r#"{"name":"test", "metadata":{"burger":{"calories": "230"}}}"#,
        )
        .unwrap();

        assert_eq!(record.name, "test");
        let burger = record.metadata["burger"].as_object().unwrap();
        assert_eq!(
            burger["calories"].as_scalar(),
            Some(&Scalar::String("230".into()))
        );
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let record: ConfigRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record, ConfigRecord::default());
        assert_eq!(serde_json::to_string(&record).unwrap(), "{}");

        let named = ConfigRecord::new("only-name", Metadata::new());
        assert_eq!(
            serde_json::to_string(&named).unwrap(),
            r#"{"name":"only-name"}"#
        );
    }

    #[test]
    fn test_scalar_types_survive_round_trip() {
        let input = r#"{"name":"a","metadata":{"enabled":true,"ratio":1.5,"replicas":3,"owner":null,"tier":"gold"}}"#;
        let record: ConfigRecord = serde_json::from_str(input).unwrap();
        let output: serde_json::Value = serde_json::to_value(&record).unwrap();
        let expected: serde_json::Value = serde_json::from_str(input).unwrap();
        assert_eq!(output, expected);
    }

    #[test]
    fn test_lists_are_rejected() {
        let result = serde_json::from_str::<ConfigRecord>(r#"{"name":"a","metadata":{"zones":["a","b"]}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_scalar_text_form() {
        let number: Scalar = serde_json::from_str("1").unwrap();
        assert!(number.matches_text("1"));
        assert!(!number.matches_text("1.0"));

        assert!(Scalar::Bool(false).matches_text("false"));
        assert!(Scalar::Null.matches_text("null"));
        assert!(Scalar::String("500m".into()).matches_text("500m"));
    }
}
