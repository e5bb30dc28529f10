//! Certificate-association parameter tables (TLSA, SMIMEA, SSHFP, CERT).

use serde::{Deserialize, Serialize};

/// TLSA/SMIMEA certificate usage values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TlsaUsage {
    /// CA constraint.
    CaConstraint = 0,
    /// Service certificate constraint.
    ServiceCertificateConstraint = 1,
    /// Trust anchor assertion.
    TrustAnchorAssertion = 2,
    /// Domain-issued certificate.
    DomainIssuedCertificate = 3,
}

impl TlsaUsage {
    /// Creates from u8 value.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::CaConstraint),
            1 => Some(Self::ServiceCertificateConstraint),
            2 => Some(Self::TrustAnchorAssertion),
            3 => Some(Self::DomainIssuedCertificate),
            _ => None,
        }
    }
}

/// TLSA/SMIMEA selector values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TlsaSelector {
    /// Full certificate.
    FullCertificate = 0,
    /// Subject public key info.
    SubjectPublicKeyInfo = 1,
}

impl TlsaSelector {
    /// Creates from u8 value.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::FullCertificate),
            1 => Some(Self::SubjectPublicKeyInfo),
            _ => None,
        }
    }
}

/// TLSA/SMIMEA matching type values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TlsaMatchingType {
    /// No hash, full content.
    NoHash = 0,
    /// SHA-256 hash.
    Sha256 = 1,
    /// SHA-512 hash.
    Sha512 = 2,
}

impl TlsaMatchingType {
    /// Creates from u8 value.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::NoHash),
            1 => Some(Self::Sha256),
            2 => Some(Self::Sha512),
            _ => None,
        }
    }

    /// Required association data length in hex characters, if fixed.
    pub const fn hex_len(self) -> Option<usize> {
        match self {
            Self::NoHash => None,
            Self::Sha256 => Some(64),
            Self::Sha512 => Some(128),
        }
    }
}

/// SSHFP algorithm values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum SshfpAlgorithm {
    /// RSA.
    Rsa = 1,
    /// DSA.
    Dsa = 2,
    /// ECDSA.
    Ecdsa = 3,
    /// Ed25519.
    Ed25519 = 4,
    /// Ed448.
    Ed448 = 6,
}

impl SshfpAlgorithm {
    /// Creates from u8 value.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Rsa),
            2 => Some(Self::Dsa),
            3 => Some(Self::Ecdsa),
            4 => Some(Self::Ed25519),
            6 => Some(Self::Ed448),
            _ => None,
        }
    }
}

/// SSHFP fingerprint type values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum SshfpFingerprintType {
    /// SHA-1.
    Sha1 = 1,
    /// SHA-256.
    Sha256 = 2,
}

impl SshfpFingerprintType {
    /// Creates from u8 value.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Sha1),
            2 => Some(Self::Sha256),
            _ => None,
        }
    }

    /// Fingerprint length in hex characters.
    pub const fn hex_len(self) -> usize {
        match self {
            Self::Sha1 => 40,
            Self::Sha256 => 64,
        }
    }
}

/// CERT certificate type mnemonics and their codes (RFC 4398 section 2.1).
pub const CERT_TYPES: &[(&str, u16)] = &[
    ("PKIX", 1),
    ("SPKI", 2),
    ("PGP", 3),
    ("IPKIX", 4),
    ("ISPKI", 5),
    ("IPGP", 6),
    ("ACPKIX", 7),
    ("IACPKIX", 8),
    ("URI", 253),
    ("OID", 254),
];

/// Resolves a CERT type mnemonic, ignoring case.
pub fn cert_type_from_mnemonic(s: &str) -> Option<u16> {
    CERT_TYPES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(s))
        .map(|&(_, code)| code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tlsa_tables() {
        assert_eq!(TlsaUsage::from_u8(3), Some(TlsaUsage::DomainIssuedCertificate));
        assert_eq!(TlsaUsage::from_u8(4), None);
        assert_eq!(TlsaSelector::from_u8(2), None);
        assert_eq!(TlsaMatchingType::Sha512.hex_len(), Some(128));
        assert_eq!(TlsaMatchingType::NoHash.hex_len(), None);
    }

    #[test]
    fn test_sshfp_tables() {
        assert_eq!(SshfpAlgorithm::from_u8(5), None);
        assert_eq!(SshfpAlgorithm::from_u8(6), Some(SshfpAlgorithm::Ed448));
        assert_eq!(SshfpFingerprintType::Sha256.hex_len(), 64);
    }

    #[test]
    fn test_cert_type_lookup() {
        assert_eq!(cert_type_from_mnemonic("pgp"), Some(3));
        assert_eq!(cert_type_from_mnemonic("OID"), Some(254));
        assert_eq!(cert_type_from_mnemonic("X509"), None);
    }
}
