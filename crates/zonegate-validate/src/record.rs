//! Candidate records and validated output.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use zonegate_config::DEFAULT_TTL;
use zonegate_proto::RecordType;

use crate::error::{ErrorKind, Result, ValidationError};

/// Raw field values of a record submitted for validation.
///
/// `priority` and `ttl` arrive as text, exactly as a form or API request
/// supplied them; `None` and a blank string both mean "unset".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordInput<'a> {
    /// Owner name.
    pub name: &'a str,
    /// Type-specific content.
    pub content: &'a str,
    /// Priority, meaningful for MX and SRV only.
    pub priority: Option<&'a str>,
    /// TTL in seconds.
    pub ttl: Option<&'a str>,
    /// TTL substituted when `ttl` is blank.
    pub default_ttl: u32,
}

impl<'a> RecordInput<'a> {
    /// Creates an input with blank priority and TTL.
    pub fn new(name: &'a str, content: &'a str) -> Self {
        Self {
            name,
            content,
            priority: None,
            ttl: None,
            default_ttl: DEFAULT_TTL,
        }
    }

    /// Sets the priority text.
    #[must_use]
    pub fn with_priority(mut self, priority: &'a str) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the TTL text.
    #[must_use]
    pub fn with_ttl(mut self, ttl: &'a str) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Sets the default TTL.
    #[must_use]
    pub fn with_default_ttl(mut self, default_ttl: u32) -> Self {
        self.default_ttl = default_ttl;
        self
    }
}

/// A decomposed content field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Integer field.
    Int(u64),
    /// Text field.
    Text(String),
    /// List field (type bit maps, SVCB parameters, character-strings).
    List(Vec<String>),
}

impl FieldValue {
    /// Returns the integer value, if this is an integer field.
    pub fn as_int(&self) -> Option<u64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text value, if this is a text field.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the list value, if this is a list field.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::List(v) => f.write_str(&v.join(" ")),
        }
    }
}

impl From<u8> for FieldValue {
    fn from(v: u8) -> Self {
        Self::Int(u64::from(v))
    }
}

impl From<u16> for FieldValue {
    fn from(v: u16) -> Self {
        Self::Int(u64::from(v))
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        Self::Int(u64::from(v))
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(v: Vec<String>) -> Self {
        Self::List(v)
    }
}

/// Type-specific decomposed fields, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<&'static str, FieldValue>);

impl Fields {
    /// Creates an empty field map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, builder style.
    #[must_use]
    pub fn with(mut self, name: &'static str, value: impl Into<FieldValue>) -> Self {
        self.0.insert(name, value.into());
        self
    }

    /// Adds a field.
    pub fn insert(&mut self, name: &'static str, value: impl Into<FieldValue>) {
        self.0.insert(name, value.into());
    }

    /// Returns a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }
}

/// A record that passed validation, with normalized values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedRecord {
    /// Record type.
    #[serde(rename = "type")]
    pub rtype: RecordType,
    /// Owner name without the trailing dot.
    pub name: String,
    /// Content exactly as submitted.
    pub content: String,
    /// Effective TTL.
    pub ttl: u32,
    /// Effective priority (0 for types that do not use it).
    pub prio: u16,
    /// Decomposed content fields.
    pub fields: Fields,
}

impl ValidatedRecord {
    /// Returns a decomposed field by name.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Returns an integer field by name.
    pub fn int_field(&self, name: &str) -> Option<u64> {
        self.field(name).and_then(FieldValue::as_int)
    }

    /// Returns a text field by name.
    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(FieldValue::as_text)
    }
}

/// A validation error in report form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedError {
    /// Error classification.
    pub kind: ErrorKind,
    /// Field or token that failed.
    pub field: &'static str,
    /// English message.
    pub message: String,
}

impl From<&ValidationError> for ReportedError {
    fn from(err: &ValidationError) -> Self {
        Self {
            kind: err.kind(),
            field: err.field(),
            message: err.to_string(),
        }
    }
}

/// Serializable outcome of a validation, for callers that surface results
/// as structured data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// True if the record was accepted.
    pub valid: bool,
    /// Normalized record, present only when `valid`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ValidatedRecord>,
    /// Errors, empty only when `valid`.
    pub errors: Vec<ReportedError>,
}

impl From<Result> for ValidationReport {
    fn from(result: Result) -> Self {
        match result {
            Ok(record) => Self {
                valid: true,
                data: Some(record),
                errors: Vec::new(),
            },
            Err(err) => Self {
                valid: false,
                data: None,
                errors: vec![ReportedError::from(&err)],
            },
        }
    }
}
