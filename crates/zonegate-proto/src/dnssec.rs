//! DNSSEC parameter tables: key algorithms, digest types, NSEC3 and ZONEMD
//! hash algorithms.

use serde::{Deserialize, Serialize};

/// DNSSEC algorithm numbers (RFC 8624).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DnsSecAlgorithm {
    /// RSA/MD5 (deprecated)
    RsaMd5 = 1,
    /// Diffie-Hellman
    Dh = 2,
    /// DSA/SHA1
    Dsa = 3,
    /// RSA/SHA-1
    RsaSha1 = 5,
    /// DSA-NSEC3-SHA1
    DsaNsec3Sha1 = 6,
    /// RSA/SHA-1 NSEC3
    RsaSha1Nsec3Sha1 = 7,
    /// RSA/SHA-256
    RsaSha256 = 8,
    /// RSA/SHA-512
    RsaSha512 = 10,
    /// GOST R 34.10-2001
    EccGost = 12,
    /// ECDSA Curve P-256 with SHA-256
    EcdsaP256Sha256 = 13,
    /// ECDSA Curve P-384 with SHA-384
    EcdsaP384Sha384 = 14,
    /// Ed25519
    Ed25519 = 15,
    /// Ed448
    Ed448 = 16,
}

impl DnsSecAlgorithm {
    /// Algorithm numbers accepted in DS, DLV, DNSKEY and RRSIG content.
    pub const CODES: [u8; 13] = [1, 2, 3, 5, 6, 7, 8, 10, 12, 13, 14, 15, 16];

    /// Creates from u8 value.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::RsaMd5),
            2 => Some(Self::Dh),
            3 => Some(Self::Dsa),
            5 => Some(Self::RsaSha1),
            6 => Some(Self::DsaNsec3Sha1),
            7 => Some(Self::RsaSha1Nsec3Sha1),
            8 => Some(Self::RsaSha256),
            10 => Some(Self::RsaSha512),
            12 => Some(Self::EccGost),
            13 => Some(Self::EcdsaP256Sha256),
            14 => Some(Self::EcdsaP384Sha384),
            15 => Some(Self::Ed25519),
            16 => Some(Self::Ed448),
            _ => None,
        }
    }

    /// Returns the presentation mnemonic (RFC 4034 Appendix A.1).
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::RsaMd5 => "RSAMD5",
            Self::Dh => "DH",
            Self::Dsa => "DSA",
            Self::RsaSha1 => "RSASHA1",
            Self::DsaNsec3Sha1 => "DSA-NSEC3-SHA1",
            Self::RsaSha1Nsec3Sha1 => "RSASHA1-NSEC3-SHA1",
            Self::RsaSha256 => "RSASHA256",
            Self::RsaSha512 => "RSASHA512",
            Self::EccGost => "ECC-GOST",
            Self::EcdsaP256Sha256 => "ECDSAP256SHA256",
            Self::EcdsaP384Sha384 => "ECDSAP384SHA384",
            Self::Ed25519 => "ED25519",
            Self::Ed448 => "ED448",
        }
    }

    /// Returns true if signing with this algorithm is still recommended.
    pub const fn is_recommended(self) -> bool {
        matches!(
            self,
            Self::RsaSha256
                | Self::EcdsaP256Sha256
                | Self::EcdsaP384Sha384
                | Self::Ed25519
                | Self::Ed448
        )
    }
}

/// DS/DLV digest types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DigestType {
    /// SHA-1 (deprecated)
    Sha1 = 1,
    /// SHA-256
    Sha256 = 2,
    /// SHA-384
    Sha384 = 4,
}

impl DigestType {
    /// Creates from u8 value.
    ///
    /// GOST R 34.11-94 (3) is intentionally absent: it is not accepted in
    /// zone content.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Sha1),
            2 => Some(Self::Sha256),
            4 => Some(Self::Sha384),
            _ => None,
        }
    }

    /// Returns the digest length in bytes.
    pub const fn digest_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
        }
    }

    /// Returns the digest length in hex characters.
    #[inline]
    pub const fn hex_len(self) -> usize {
        self.digest_len() * 2
    }

    /// Returns the hash name used in error messages.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sha1 => "SHA-1",
            Self::Sha256 => "SHA-256",
            Self::Sha384 => "SHA-384",
        }
    }
}

/// NSEC3 hash algorithms (RFC 5155).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Nsec3HashAlgorithm {
    /// SHA-1, the only assigned value.
    Sha1 = 1,
}

impl Nsec3HashAlgorithm {
    /// Creates from u8 value.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Sha1),
            _ => None,
        }
    }
}

/// NSEC3 opt-out flag.
pub const NSEC3_FLAG_OPT_OUT: u8 = 0x01;

/// Upper bound on NSEC3 iterations accepted in zone content.
pub const NSEC3_MAX_ITERATIONS: u16 = 2500;

/// DNSKEY flag bits (RFC 4034 section 2.1.1).
pub mod dnskey_flags {
    /// Zone Key flag bit.
    pub const ZONE_KEY: u16 = 0x0100;
    /// Secure Entry Point flag bit.
    pub const SEP: u16 = 0x0001;
    /// Flag values accepted in DNSKEY content: non-zone key, ZSK, KSK.
    pub const ACCEPTED: [u16; 3] = [0, ZONE_KEY, ZONE_KEY | SEP];
}

/// DNSKEY protocol field value (always 3).
pub const DNSKEY_PROTOCOL: u8 = 3;

/// ZONEMD scheme values (RFC 8976).
pub const ZONEMD_SCHEME_SIMPLE: u8 = 1;

/// ZONEMD hash algorithms (RFC 8976).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ZonemdHashAlgorithm {
    /// SHA-384
    Sha384 = 1,
    /// SHA-512
    Sha512 = 2,
}

impl ZonemdHashAlgorithm {
    /// Creates from u8 value.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Sha384),
            2 => Some(Self::Sha512),
            _ => None,
        }
    }

    /// Returns the digest length in hex characters.
    pub const fn hex_len(self) -> usize {
        match self {
            Self::Sha384 => 96,
            Self::Sha512 => 128,
        }
    }
}
