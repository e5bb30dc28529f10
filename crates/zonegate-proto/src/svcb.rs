//! SVCB/HTTPS service parameter keys (RFC 9460).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Service parameter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SvcParamKey {
    /// Mandatory parameters.
    Mandatory,
    /// Application Layer Protocol Negotiation.
    Alpn,
    /// No default ALPN.
    NoDefaultAlpn,
    /// Port number.
    Port,
    /// IPv4 address hints.
    Ipv4Hint,
    /// Encrypted ClientHello config.
    Ech,
    /// IPv6 address hints.
    Ipv6Hint,
    /// DoH URI template path (RFC 9461).
    Dohpath,
    /// Any other key in `keyNNNNN` form.
    Generic(u16),
}

impl SvcParamKey {
    /// Creates from the numeric key.
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => Self::Mandatory,
            1 => Self::Alpn,
            2 => Self::NoDefaultAlpn,
            3 => Self::Port,
            4 => Self::Ipv4Hint,
            5 => Self::Ech,
            6 => Self::Ipv6Hint,
            7 => Self::Dohpath,
            other => Self::Generic(other),
        }
    }

    /// Parses a presentation-format key name (`alpn`, `key65000`).
    ///
    /// Names are case-sensitive per RFC 9460 section 2.1. The reserved key
    /// 65535 is refused.
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name {
            "mandatory" => Self::Mandatory,
            "alpn" => Self::Alpn,
            "no-default-alpn" => Self::NoDefaultAlpn,
            "port" => Self::Port,
            "ipv4hint" => Self::Ipv4Hint,
            "ech" => Self::Ech,
            "ipv6hint" => Self::Ipv6Hint,
            "dohpath" => Self::Dohpath,
            _ => {
                let digits = name.strip_prefix("key")?;
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                let value = digits.parse::<u16>().ok()?;
                if value == 65535 {
                    return None;
                }
                Self::from_u16(value)
            }
        };
        Some(key)
    }

    /// Returns true if the key is written without a value.
    pub const fn is_flag(self) -> bool {
        matches!(self, Self::NoDefaultAlpn)
    }
}

impl fmt::Display for SvcParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mandatory => f.write_str("mandatory"),
            Self::Alpn => f.write_str("alpn"),
            Self::NoDefaultAlpn => f.write_str("no-default-alpn"),
            Self::Port => f.write_str("port"),
            Self::Ipv4Hint => f.write_str("ipv4hint"),
            Self::Ech => f.write_str("ech"),
            Self::Ipv6Hint => f.write_str("ipv6hint"),
            Self::Dohpath => f.write_str("dohpath"),
            Self::Generic(v) => write!(f, "key{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_keys() {
        assert_eq!(SvcParamKey::from_name("alpn"), Some(SvcParamKey::Alpn));
        assert_eq!(SvcParamKey::from_name("ALPN"), None);
        assert_eq!(SvcParamKey::from_name("key3"), Some(SvcParamKey::Port));
        assert_eq!(
            SvcParamKey::from_name("key65000"),
            Some(SvcParamKey::Generic(65000))
        );
    }

    #[test]
    fn test_reserved_and_malformed_keys() {
        assert_eq!(SvcParamKey::from_name("key65535"), None);
        assert_eq!(SvcParamKey::from_name("key"), None);
        assert_eq!(SvcParamKey::from_name("key-1"), None);
        assert_eq!(SvcParamKey::from_name("frobnicate"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(SvcParamKey::NoDefaultAlpn.to_string(), "no-default-alpn");
        assert_eq!(SvcParamKey::Generic(9).to_string(), "key9");
    }
}
