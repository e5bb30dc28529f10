//! Validation error types.
//!
//! Every rejected record produces exactly one [`ValidationError`]: the first
//! rule the record violated. Errors carry the name of the offending field
//! (usable as a message key by callers that localize) and an English message.

use serde::Serialize;
use thiserror::Error;
use zonegate_proto::RecordType;

use crate::record::ValidatedRecord;

/// Result type for validation operations.
pub type Result<T = ValidatedRecord> = std::result::Result<T, ValidationError>;

/// Broad classification of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Wrong token count or malformed tokenization.
    Structure,
    /// A token fails its character class or format.
    Syntax,
    /// A numeric token is outside its interval or enumerated set.
    Range,
    /// A token's valid values depend on another token.
    Consistency,
    /// The record type identifier does not resolve to a validator.
    UnknownType,
}

/// Record validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Wrong number of tokens, empty content, unbalanced quotes.
    #[error("{message}")]
    Structure {
        /// Field or token that failed.
        field: &'static str,
        /// Description of the error.
        message: String,
    },

    /// Token fails its character class or format.
    #[error("{message}")]
    Syntax {
        /// Field or token that failed.
        field: &'static str,
        /// Description of the error.
        message: String,
    },

    /// Value outside its allowed interval or enumerated set.
    #[error("{message}")]
    Range {
        /// Field or token that failed.
        field: &'static str,
        /// Description of the error.
        message: String,
    },

    /// Value inconsistent with another, already validated, value.
    #[error("{message}")]
    Consistency {
        /// Field or token that failed.
        field: &'static str,
        /// Description of the error.
        message: String,
    },

    /// The identifier is not a DNS record type mnemonic.
    #[error("unknown record type: {mnemonic}")]
    UnknownType {
        /// The identifier as supplied.
        mnemonic: String,
    },

    /// The type is known but cannot be stored as zone content.
    #[error("record type {rtype} is not supported for validation")]
    UnsupportedType {
        /// The resolved record type.
        rtype: RecordType,
    },
}

impl ValidationError {
    /// Creates a new `Structure` error.
    #[inline]
    pub fn structure(field: &'static str, message: impl Into<String>) -> Self {
        Self::Structure {
            field,
            message: message.into(),
        }
    }

    /// Creates a new `Syntax` error.
    #[inline]
    pub fn syntax(field: &'static str, message: impl Into<String>) -> Self {
        Self::Syntax {
            field,
            message: message.into(),
        }
    }

    /// Creates a new `Range` error.
    #[inline]
    pub fn range(field: &'static str, message: impl Into<String>) -> Self {
        Self::Range {
            field,
            message: message.into(),
        }
    }

    /// Creates a new `Consistency` error.
    #[inline]
    pub fn consistency(field: &'static str, message: impl Into<String>) -> Self {
        Self::Consistency {
            field,
            message: message.into(),
        }
    }

    /// Re-targets the error at another field.
    ///
    /// Used when a shared check (hostname syntax) runs on a content token.
    #[must_use]
    pub fn for_field(self, new_field: &'static str) -> Self {
        match self {
            Self::Structure { message, .. } => Self::structure(new_field, message),
            Self::Syntax { message, .. } => Self::syntax(new_field, message),
            Self::Range { message, .. } => Self::range(new_field, message),
            Self::Consistency { message, .. } => Self::consistency(new_field, message),
            other => other,
        }
    }

    /// Returns the error's classification.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Structure { .. } => ErrorKind::Structure,
            Self::Syntax { .. } => ErrorKind::Syntax,
            Self::Range { .. } => ErrorKind::Range,
            Self::Consistency { .. } => ErrorKind::Consistency,
            Self::UnknownType { .. } | Self::UnsupportedType { .. } => ErrorKind::UnknownType,
        }
    }

    /// Returns the name of the field that failed.
    ///
    /// Dispatcher failures report `type`.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Structure { field, .. }
            | Self::Syntax { field, .. }
            | Self::Range { field, .. }
            | Self::Consistency { field, .. } => *field,
            Self::UnknownType { .. } | Self::UnsupportedType { .. } => "type",
        }
    }
}
