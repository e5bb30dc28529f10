//! DNS record type mnemonics.
//!
//! The closed vocabulary a caller uses to name a record type. Every variant
//! carries its IANA code so that the generic form (`TYPE52`) and the mnemonic
//! (`TLSA`) resolve to the same value.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// DNS record type.
///
/// Covers the data types that can appear in a zone plus the meta and query
/// types, so that a mnemonic such as `AXFR` is recognised (and then refused
/// by the validator table) rather than reported as unknown.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    IntoPrimitive,
    TryFromPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(u16)]
#[allow(clippy::upper_case_acronyms)]
pub enum RecordType {
    // =========================================================================
    // RFC 1035 core set
    // =========================================================================
    /// IPv4 host address
    A = 1,
    /// Delegation to an authoritative name server
    NS = 2,
    /// Mail destination, superseded by MX
    MD = 3,
    /// Mail forwarder, superseded by MX
    MF = 4,
    /// Alias for another name
    CNAME = 5,
    /// Zone apex parameters
    SOA = 6,
    /// Mailbox domain (experimental)
    MB = 7,
    /// Mail group member (experimental)
    MG = 8,
    /// Mail rename (experimental)
    MR = 9,
    /// Opaque null record
    NULL = 10,
    /// Well-known services
    WKS = 11,
    /// Reverse mapping pointer
    PTR = 12,
    /// Host CPU and OS
    HINFO = 13,
    /// Mailbox information
    MINFO = 14,
    /// Mail exchanger
    MX = 15,
    /// Free-form text
    TXT = 16,

    // =========================================================================
    // Later additions
    // =========================================================================
    /// Responsible person (RFC 1183)
    RP = 17,
    /// AFS database (RFC 1183)
    AFSDB = 18,
    /// X.25 PSDN address (RFC 1183)
    X25 = 19,
    /// ISDN address (RFC 1183)
    ISDN = 20,
    /// Route through (RFC 1183)
    RT = 21,
    /// NSAP address (RFC 1706)
    NSAP = 22,
    /// NSAP reverse pointer (RFC 1706)
    #[allow(non_camel_case_types)]
    NSAP_PTR = 23,
    /// Legacy signature (RFC 2535)
    SIG = 24,
    /// Legacy key (RFC 2535, still used by SIG(0) and TKEY)
    KEY = 25,
    /// X.400 mapping (RFC 2163)
    PX = 26,
    /// Geographical position (RFC 1712)
    GPOS = 27,
    /// IPv6 host address (RFC 3596)
    AAAA = 28,
    /// Location (RFC 1876)
    LOC = 29,
    /// Legacy next domain (RFC 2535)
    NXT = 30,
    /// Service locator (RFC 2782)
    SRV = 33,
    /// Naming authority pointer (RFC 3403)
    NAPTR = 35,
    /// Key exchanger (RFC 2230)
    KX = 36,
    /// Certificate (RFC 4398)
    CERT = 37,
    /// Historic IPv6 address (RFC 2874)
    A6 = 38,
    /// Subtree redirection (RFC 6672)
    DNAME = 39,
    /// EDNS(0) pseudo-record (RFC 6891)
    OPT = 41,
    /// Address prefix list (RFC 3123)
    APL = 42,

    // =========================================================================
    // DNSSEC and keying material
    // =========================================================================
    /// Delegation signer (RFC 4034)
    DS = 43,
    /// SSH host key fingerprint (RFC 4255)
    SSHFP = 44,
    /// IPsec keying material (RFC 4025)
    IPSECKEY = 45,
    /// RRset signature (RFC 4034)
    RRSIG = 46,
    /// Authenticated denial (RFC 4034)
    NSEC = 47,
    /// Zone public key (RFC 4034)
    DNSKEY = 48,
    /// DHCP client identity (RFC 4701)
    DHCID = 49,
    /// Hashed authenticated denial (RFC 5155)
    NSEC3 = 50,
    /// NSEC3 chain parameters (RFC 5155)
    NSEC3PARAM = 51,
    /// DANE TLS association (RFC 6698)
    TLSA = 52,
    /// DANE S/MIME association (RFC 8162)
    SMIMEA = 53,
    /// Host identity protocol (RFC 8005)
    HIP = 55,
    /// Child copy of DS (RFC 7344)
    CDS = 59,
    /// Child copy of DNSKEY (RFC 7344)
    CDNSKEY = 60,
    /// OpenPGP transferable key (RFC 7929)
    OPENPGPKEY = 61,
    /// Child-to-parent sync (RFC 7477)
    CSYNC = 62,
    /// Zone message digest (RFC 8976)
    ZONEMD = 63,
    /// General service binding (RFC 9460)
    SVCB = 64,
    /// HTTPS service binding (RFC 9460)
    HTTPS = 65,

    // =========================================================================
    // Miscellaneous data types
    // =========================================================================
    /// Sender policy (RFC 7208, historic as a distinct type)
    SPF = 99,
    /// ILNP node identifier (RFC 6742)
    NID = 104,
    /// ILNP 32-bit locator (RFC 6742)
    L32 = 105,
    /// ILNP 64-bit locator (RFC 6742)
    L64 = 106,
    /// ILNP locator pointer (RFC 6742)
    LP = 107,
    /// 48-bit MAC address (RFC 7043)
    EUI48 = 108,
    /// 64-bit MAC address (RFC 7043)
    EUI64 = 109,

    // =========================================================================
    // Meta and query types
    // =========================================================================
    /// Transaction key (RFC 2930)
    TKEY = 249,
    /// Transaction signature (RFC 8945)
    TSIG = 250,
    /// Incremental transfer (RFC 1995)
    IXFR = 251,
    /// Full transfer (RFC 5936)
    AXFR = 252,
    /// Mailbox-related records (RFC 1035)
    MAILB = 253,
    /// Mail agent records (RFC 1035)
    MAILA = 254,
    /// All records (RFC 1035, RFC 8482)
    ANY = 255,

    // =========================================================================
    // Private-range and late assignments
    // =========================================================================
    /// Uniform resource identifier (RFC 7553)
    URI = 256,
    /// CA authorization (RFC 8659)
    CAA = 257,
    /// DNSSEC trust authority
    TA = 32768,
    /// DNSSEC lookaside validation (RFC 4431)
    DLV = 32769,
}

impl RecordType {
    /// Every known record type, in code order.
    pub const ALL: &'static [RecordType] = &[
        Self::A,
        Self::NS,
        Self::MD,
        Self::MF,
        Self::CNAME,
        Self::SOA,
        Self::MB,
        Self::MG,
        Self::MR,
        Self::NULL,
        Self::WKS,
        Self::PTR,
        Self::HINFO,
        Self::MINFO,
        Self::MX,
        Self::TXT,
        Self::RP,
        Self::AFSDB,
        Self::X25,
        Self::ISDN,
        Self::RT,
        Self::NSAP,
        Self::NSAP_PTR,
        Self::SIG,
        Self::KEY,
        Self::PX,
        Self::GPOS,
        Self::AAAA,
        Self::LOC,
        Self::NXT,
        Self::SRV,
        Self::NAPTR,
        Self::KX,
        Self::CERT,
        Self::A6,
        Self::DNAME,
        Self::OPT,
        Self::APL,
        Self::DS,
        Self::SSHFP,
        Self::IPSECKEY,
        Self::RRSIG,
        Self::NSEC,
        Self::DNSKEY,
        Self::DHCID,
        Self::NSEC3,
        Self::NSEC3PARAM,
        Self::TLSA,
        Self::SMIMEA,
        Self::HIP,
        Self::CDS,
        Self::CDNSKEY,
        Self::OPENPGPKEY,
        Self::CSYNC,
        Self::ZONEMD,
        Self::SVCB,
        Self::HTTPS,
        Self::SPF,
        Self::NID,
        Self::L32,
        Self::L64,
        Self::LP,
        Self::EUI48,
        Self::EUI64,
        Self::TKEY,
        Self::TSIG,
        Self::IXFR,
        Self::AXFR,
        Self::MAILB,
        Self::MAILA,
        Self::ANY,
        Self::URI,
        Self::CAA,
        Self::TA,
        Self::DLV,
    ];

    /// Returns the numeric value of the record type.
    #[inline]
    pub fn to_u16(self) -> u16 {
        self.into()
    }

    /// Creates a record type from its numeric value.
    #[inline]
    pub fn from_u16(value: u16) -> Option<Self> {
        Self::try_from(value).ok()
    }

    /// Looks a record type up by mnemonic, ignoring ASCII case.
    ///
    /// The RFC 3597 generic form `TYPEnnn` is accepted when `nnn` is a
    /// known code.
    pub fn from_mnemonic(s: &str) -> Option<Self> {
        if let Some(found) = Self::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(s))
        {
            return Some(found);
        }

        let digits = s
            .get(..4)
            .filter(|prefix| prefix.eq_ignore_ascii_case("TYPE"))
            .map(|_| &s[4..])?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<u16>().ok().and_then(Self::from_u16)
    }

    /// Returns true for meta and query types, which never live in a zone.
    #[inline]
    pub const fn is_meta(self) -> bool {
        matches!(
            self,
            Self::OPT
                | Self::TKEY
                | Self::TSIG
                | Self::IXFR
                | Self::AXFR
                | Self::MAILB
                | Self::MAILA
                | Self::ANY
        )
    }

    /// Returns the presentation mnemonic.
    pub const fn name(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::NS => "NS",
            Self::MD => "MD",
            Self::MF => "MF",
            Self::CNAME => "CNAME",
            Self::SOA => "SOA",
            Self::MB => "MB",
            Self::MG => "MG",
            Self::MR => "MR",
            Self::NULL => "NULL",
            Self::WKS => "WKS",
            Self::PTR => "PTR",
            Self::HINFO => "HINFO",
            Self::MINFO => "MINFO",
            Self::MX => "MX",
            Self::TXT => "TXT",
            Self::RP => "RP",
            Self::AFSDB => "AFSDB",
            Self::X25 => "X25",
            Self::ISDN => "ISDN",
            Self::RT => "RT",
            Self::NSAP => "NSAP",
            Self::NSAP_PTR => "NSAP-PTR",
            Self::SIG => "SIG",
            Self::KEY => "KEY",
            Self::PX => "PX",
            Self::GPOS => "GPOS",
            Self::AAAA => "AAAA",
            Self::LOC => "LOC",
            Self::NXT => "NXT",
            Self::SRV => "SRV",
            Self::NAPTR => "NAPTR",
            Self::KX => "KX",
            Self::CERT => "CERT",
            Self::A6 => "A6",
            Self::DNAME => "DNAME",
            Self::OPT => "OPT",
            Self::APL => "APL",
            Self::DS => "DS",
            Self::SSHFP => "SSHFP",
            Self::IPSECKEY => "IPSECKEY",
            Self::RRSIG => "RRSIG",
            Self::NSEC => "NSEC",
            Self::DNSKEY => "DNSKEY",
            Self::DHCID => "DHCID",
            Self::NSEC3 => "NSEC3",
            Self::NSEC3PARAM => "NSEC3PARAM",
            Self::TLSA => "TLSA",
            Self::SMIMEA => "SMIMEA",
            Self::HIP => "HIP",
            Self::CDS => "CDS",
            Self::CDNSKEY => "CDNSKEY",
            Self::OPENPGPKEY => "OPENPGPKEY",
            Self::CSYNC => "CSYNC",
            Self::ZONEMD => "ZONEMD",
            Self::SVCB => "SVCB",
            Self::HTTPS => "HTTPS",
            Self::SPF => "SPF",
            Self::NID => "NID",
            Self::L32 => "L32",
            Self::L64 => "L64",
            Self::LP => "LP",
            Self::EUI48 => "EUI48",
            Self::EUI64 => "EUI64",
            Self::TKEY => "TKEY",
            Self::TSIG => "TSIG",
            Self::IXFR => "IXFR",
            Self::AXFR => "AXFR",
            Self::MAILB => "MAILB",
            Self::MAILA => "MAILA",
            Self::ANY => "ANY",
            Self::URI => "URI",
            Self::CAA => "CAA",
            Self::TA => "TA",
            Self::DLV => "DLV",
        }
    }

    /// Returns a short human-readable description.
    pub const fn description(self) -> &'static str {
        match self {
            Self::A => "IPv4 address",
            Self::AAAA => "IPv6 address",
            Self::CNAME => "Canonical name (alias)",
            Self::MX => "Mail exchange",
            Self::NS => "Name server",
            Self::PTR => "Pointer record (reverse DNS)",
            Self::SOA => "Start of authority",
            Self::TXT => "Text record",
            Self::SPF => "Sender policy framework",
            Self::SRV => "Service record",
            Self::NAPTR => "Naming authority pointer",
            Self::URI => "Uniform resource identifier",
            Self::CAA => "Certification Authority Authorization",
            Self::DNSKEY | Self::CDNSKEY => "DNSSEC public key",
            Self::DS | Self::CDS => "Delegation signer",
            Self::DLV => "DNSSEC lookaside validation",
            Self::RRSIG => "DNSSEC signature",
            Self::NSEC => "Next secure record",
            Self::NSEC3 => "Next secure record v3",
            Self::NSEC3PARAM => "NSEC3 parameters",
            Self::ZONEMD => "Zone message digest",
            Self::HTTPS => "HTTPS service binding",
            Self::SVCB => "Service binding",
            Self::TLSA => "TLS certificate association",
            Self::SMIMEA => "S/MIME certificate association",
            Self::SSHFP => "SSH key fingerprint",
            Self::OPENPGPKEY => "OpenPGP public key",
            Self::LOC => "Geographic location",
            Self::APL => "Address prefix list",
            _ => "DNS record",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a mnemonic does not name a known record type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown record type mnemonic: {0}")]
pub struct UnknownMnemonic(pub String);

impl FromStr for RecordType {
    type Err = UnknownMnemonic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_mnemonic(s.trim()).ok_or_else(|| UnknownMnemonic(s.to_string()))
    }
}

/// Mnemonics accepted in NSEC, NSEC3 and CSYNC type bit maps.
///
/// A subset of [`RecordType::ALL`] limited to types that can be present at
/// an owner name in a managed zone.
pub const BITMAP_MNEMONICS: &[&str] = &[
    "A",
    "AAAA",
    "AFSDB",
    "APL",
    "CAA",
    "CDNSKEY",
    "CDS",
    "CERT",
    "CNAME",
    "DHCID",
    "DLV",
    "DNAME",
    "DNSKEY",
    "DS",
    "EUI48",
    "EUI64",
    "HINFO",
    "HTTPS",
    "IPSECKEY",
    "KEY",
    "KX",
    "LOC",
    "MX",
    "NAPTR",
    "NS",
    "NSEC",
    "NSEC3",
    "NSEC3PARAM",
    "OPENPGPKEY",
    "PTR",
    "RRSIG",
    "SOA",
    "SPF",
    "SRV",
    "SSHFP",
    "SVCB",
    "TLSA",
    "TXT",
    "URI",
];

/// Returns true if `mnemonic` (already upper-cased) may appear in a type bit map.
#[inline]
pub fn is_bitmap_mnemonic(mnemonic: &str) -> bool {
    BITMAP_MNEMONICS.contains(&mnemonic)
}
