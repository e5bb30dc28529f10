//! # Zonegate DNS Vocabulary
//!
//! The closed sets of values that record content is checked against: record
//! type mnemonics, DNSSEC algorithm and digest tables, certificate
//! association parameters, and SVCB parameter keys.
//!
//! ## Example
//!
//! ```rust
//! use zonegate_proto::RecordType;
//! use zonegate_proto::dnssec::DigestType;
//!
//! let rtype: RecordType = "dlv".parse().unwrap();
//! assert_eq!(rtype, RecordType::DLV);
//! assert_eq!(DigestType::from_u8(2).map(DigestType::hex_len), Some(64));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cert;
pub mod dnssec;
pub mod rtype;
pub mod svcb;

pub use rtype::{RecordType, UnknownMnemonic, BITMAP_MNEMONICS};
pub use svcb::SvcParamKey;

/// Maximum length of a DNS label (63 bytes per RFC 1035)
pub const MAX_LABEL_LENGTH: usize = 63;

/// Maximum length of a domain name in presentation format, without the
/// trailing dot.
pub const MAX_HOSTNAME_LENGTH: usize = 253;

/// Maximum length of a single character-string (RFC 1035 section 3.3)
pub const MAX_CHARACTER_STRING_LENGTH: usize = 255;
