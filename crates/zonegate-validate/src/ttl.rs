//! TTL parsing with default substitution.

use crate::error::{Result, ValidationError};

/// Returns the effective TTL.
///
/// A blank TTL yields `default_ttl`. Anything else must be plain decimal
/// digits that fit in 32 bits.
pub fn validate_ttl(ttl: Option<&str>, default_ttl: u32) -> Result<u32> {
    let ttl = match ttl.map(str::trim) {
        None | Some("") => return Ok(default_ttl),
        Some(ttl) => ttl,
    };

    if !ttl.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::syntax(
            "ttl",
            "Invalid value for TTL field. It should be a non-negative integer.",
        ));
    }

    ttl.parse::<u32>().map_err(|_| {
        ValidationError::range(
            "ttl",
            format!("Invalid value for TTL field. It must be between 0 and {}.", u32::MAX),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_blank_uses_default() {
        assert_eq!(validate_ttl(None, 3600).unwrap(), 3600);
        assert_eq!(validate_ttl(Some(""), 3600).unwrap(), 3600);
        assert_eq!(validate_ttl(Some("  "), 300).unwrap(), 300);
    }

    #[test]
    fn test_valid_values() {
        assert_eq!(validate_ttl(Some("0"), 3600).unwrap(), 0);
        assert_eq!(validate_ttl(Some("86400"), 3600).unwrap(), 86400);
        assert_eq!(validate_ttl(Some("4294967295"), 3600).unwrap(), u32::MAX);
    }

    #[test]
    fn test_out_of_range() {
        let err = validate_ttl(Some("99999999999"), 3600).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(err.field(), "ttl");
        assert!(validate_ttl(Some("4294967296"), 3600).is_err());
    }

    #[test]
    fn test_non_numeric() {
        for bad in ["-1", "+5", "1.5", "abc", "1h", "0x10"] {
            let err = validate_ttl(Some(bad), 3600).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Syntax, "{bad}");
        }
    }
}
