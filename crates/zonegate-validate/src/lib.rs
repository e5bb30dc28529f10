//! # Zonegate Record Validation
//!
//! Checks the presentation form of a DNS resource record (owner name,
//! content, TTL and priority) before it is accepted into a zone.
//!
//! Every supported record type is one entry in a table that pairs an owner
//! rule, a priority rule and a content grammar. Validation runs the same
//! pipeline for every type and stops at the first violated rule:
//!
//! 1. owner name
//! 2. content (length bound, then the type grammar)
//! 3. TTL
//! 4. priority
//!
//! ## Example
//!
//! ```rust
//! use zonegate_config::DnsConfig;
//! use zonegate_validate::{for_type, RecordInput, RecordValidator};
//!
//! let config = DnsConfig::default();
//! let validator = for_type("NSEC3", &config).unwrap();
//! let input = RecordInput::new("sub.example.com", "1 0 10 - ABCDEFG A NSEC3")
//!     .with_ttl("")
//!     .with_default_ttl(3600);
//!
//! let record = validator.validate(&input).unwrap();
//! assert_eq!(record.ttl, 3600);
//! assert_eq!(record.int_field("iterations"), Some(10));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod dispatch;
pub mod encoding;
pub mod error;
pub mod grammar;
pub mod hostname;
pub mod priority;
pub mod record;
mod records;
pub mod strings;
pub mod ttl;

pub use dispatch::{for_type, is_supported, supported_types, validate, RecordValidator, Validator};
pub use error::{ErrorKind, Result, ValidationError};
pub use hostname::HostnameValidator;
pub use priority::PriorityRule;
pub use record::{FieldValue, Fields, RecordInput, ReportedError, ValidatedRecord, ValidationReport};
pub use ttl::validate_ttl;
