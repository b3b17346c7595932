//! Dotted-path matching against metadata trees.
//!
//! # Matching Rules
//! A query `metadata.<a>...<parent>.<leaf>=<value>` matches a record when,
//! at any depth of its metadata:
//! - a mapping stored under `<parent>` holds a scalar `<leaf>` whose text
//!   equals `<value>`, or
//! - for two-segment queries (`metadata.<leaf>`), a scalar stored directly
//!   under `<leaf>` equals `<value>`.
//!
//! Only the last two segments take part in matching. Intermediate segments
//! of longer paths are validated but not walked.
//!
//! # Design Decisions
//! - Matching is a pure walk that answers yes/no per record, so a record is
//!   reported at most once however many sub-trees match
//! - The walk stops at the first hit

use std::str::FromStr;

use crate::store::error::StoreError;
use crate::store::record::{ConfigRecord, Metadata, MetadataValue};

/// Root segment every search path must start with.
pub const METADATA_ROOT: &str = "metadata";

/// A parsed `path=value` search expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    segments: Vec<String>,
    value: String,
}

impl SearchQuery {
    /// Build a query from a dotted path and the expected value.
    pub fn new(path: &str, value: &str) -> Result<Self, StoreError> {
        if path.is_empty() {
            return Err(StoreError::invalid("search path is empty"));
        }
        if value.is_empty() {
            return Err(StoreError::invalid(format!(
                "search for '{}' is missing a value",
                path
            )));
        }

        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if segments[0] != METADATA_ROOT {
            return Err(StoreError::invalid(format!(
                "search path must start with '{}', got '{}'",
                METADATA_ROOT, segments[0]
            )));
        }
        if segments.len() < 2 {
            return Err(StoreError::invalid("search path needs at least one key after 'metadata'"));
        }
        if segments.iter().any(String::is_empty) {
            return Err(StoreError::invalid(format!(
                "search path '{}' contains an empty segment",
                path
            )));
        }

        Ok(Self {
            segments,
            value: value.to_string(),
        })
    }

    /// Key that must hold the compared scalar.
    pub fn leaf(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// Key of the mapping that must contain the leaf.
    pub fn parent(&self) -> &str {
        &self.segments[self.segments.len() - 2]
    }

    /// True for `metadata.<key>` queries.
    pub fn is_top_level(&self) -> bool {
        self.segments.len() == 2
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn path(&self) -> String {
        self.segments.join(".")
    }
}

impl FromStr for SearchQuery {
    type Err = StoreError;

    /// Parse `metadata.a.b=value`. The value may itself contain `=` or `.`.
    fn from_str(expression: &str) -> Result<Self, Self::Err> {
        let (path, value) = expression.split_once('=').ok_or_else(|| {
            StoreError::invalid(format!("search expression '{}' is missing '='", expression))
        })?;
        Self::new(path, value)
    }
}

/// Stateless walk of a record's metadata for one query.
#[derive(Debug, Clone, Copy)]
pub struct MetadataMatcher<'q> {
    query: &'q SearchQuery,
}

impl<'q> MetadataMatcher<'q> {
    pub fn new(query: &'q SearchQuery) -> Self {
        Self { query }
    }

    /// Returns true if the record's metadata satisfies the query.
    pub fn matches(&self, record: &ConfigRecord) -> bool {
        self.walk(&record.metadata)
    }

    fn walk(&self, level: &Metadata) -> bool {
        level.iter().any(|(key, value)| match value {
            MetadataValue::Object(child) => {
                (key == self.query.parent() && self.leaf_matches(child)) || self.walk(child)
            }
            MetadataValue::Scalar(scalar) => {
                self.query.is_top_level()
                    && key == self.query.leaf()
                    && scalar.matches_text(self.query.value())
            }
        })
    }

    fn leaf_matches(&self, parent: &Metadata) -> bool {
        parent
            .get(self.query.leaf())
            .and_then(MetadataValue::as_scalar)
            .map(|scalar| scalar.matches_text(self.query.value()))
            .unwrap_or(false)
    }
}
