//! Certificate and key material records: TLSA, SMIMEA, SSHFP, CERT,
//! OPENPGPKEY, DHCID, IPSECKEY.

use std::net::{Ipv4Addr, Ipv6Addr};
use zonegate_proto::cert::{
    cert_type_from_mnemonic, SshfpAlgorithm, SshfpFingerprintType, TlsaMatchingType, TlsaSelector,
    TlsaUsage,
};
use zonegate_proto::dnssec::DnsSecAlgorithm;

use super::Context;
use crate::encoding::{decode_base64, decode_hex, is_hex};
use crate::error::Result;
use crate::record::Fields;

/// Smallest DHCID RDATA: identifier type, digest type, one digest octet.
const DHCID_MIN_LENGTH: usize = 3;

/// TLSA and SMIMEA.
pub(super) fn tlsa(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_at_least(4, "<usage> <selector> <matching-type> <certificate-data>")?;

    let usage: u8 = ctx.number(tokens.get(0), "usage", "certificate usage", 0..=u8::MAX)?;
    if TlsaUsage::from_u8(usage).is_none() {
        return Err(ctx.range("usage", "certificate usage must be between 0 and 3."));
    }
    let selector: u8 = ctx.number(tokens.get(1), "selector", "selector", 0..=u8::MAX)?;
    if TlsaSelector::from_u8(selector).is_none() {
        return Err(ctx.range("selector", "selector must be 0 or 1."));
    }
    let matching: u8 = ctx.number(tokens.get(2), "matching_type", "matching type", 0..=u8::MAX)?;
    let Some(matching_type) = TlsaMatchingType::from_u8(matching) else {
        return Err(ctx.range("matching_type", "matching type must be between 0 and 2."));
    };

    let data = tokens.tail(3).concat();
    if !is_hex(&data) || decode_hex(&data).is_none() {
        return Err(ctx.syntax(
            "certificate_data",
            "certificate data must be an even-length hexadecimal string.",
        ));
    }
    if let Some(expected) = matching_type.hex_len() {
        if data.len() != expected {
            return Err(ctx.consistency(
                "certificate_data",
                &format!(
                    "certificate data for matching type {matching} must be exactly {expected} hexadecimal characters."
                ),
            ));
        }
    }

    Ok(Fields::new()
        .with("usage", usage)
        .with("selector", selector)
        .with("matching_type", matching)
        .with("certificate_data", data.to_ascii_lowercase()))
}

pub(super) fn sshfp(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_at_least(3, "<algorithm> <fingerprint-type> <fingerprint>")?;

    let algorithm: u8 = ctx.number(tokens.get(0), "algorithm", "algorithm", 0..=u8::MAX)?;
    if SshfpAlgorithm::from_u8(algorithm).is_none() {
        return Err(ctx.range(
            "algorithm",
            "algorithm must be 1 (RSA), 2 (DSA), 3 (ECDSA), 4 (Ed25519) or 6 (Ed448).",
        ));
    }
    let fp_type: u8 = ctx.number(tokens.get(1), "fingerprint_type", "fingerprint type", 0..=u8::MAX)?;
    let Some(kind) = SshfpFingerprintType::from_u8(fp_type) else {
        return Err(ctx.range(
            "fingerprint_type",
            "fingerprint type must be 1 (SHA-1) or 2 (SHA-256).",
        ));
    };

    let fingerprint = tokens.tail(2).concat();
    if !is_hex(&fingerprint) {
        return Err(ctx.syntax("fingerprint", "fingerprint must be a hexadecimal string."));
    }
    if fingerprint.len() != kind.hex_len() {
        return Err(ctx.consistency(
            "fingerprint",
            &format!(
                "fingerprint for type {fp_type} must be exactly {} hexadecimal characters.",
                kind.hex_len()
            ),
        ));
    }

    Ok(Fields::new()
        .with("algorithm", algorithm)
        .with("fingerprint_type", fp_type)
        .with("fingerprint", fingerprint.to_ascii_lowercase()))
}

pub(super) fn cert(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_at_least(4, "<type> <key-tag> <algorithm> <certificate>")?;

    let type_token = tokens.get(0);
    let cert_type = match cert_type_from_mnemonic(type_token) {
        Some(code) => code,
        None => ctx.number(type_token, "cert_type", "certificate type", 0..=u16::MAX)?,
    };
    let key_tag: u16 = ctx.number(tokens.get(1), "key_tag", "key tag", 0..=u16::MAX)?;

    let algorithm_token = tokens.get(2);
    let algorithm = match DnsSecAlgorithm::CODES.iter().copied().find(|code| {
        DnsSecAlgorithm::from_u8(*code).is_some_and(|alg| alg.mnemonic().eq_ignore_ascii_case(algorithm_token))
    }) {
        Some(code) => code,
        None => ctx.number(algorithm_token, "algorithm", "algorithm", 0..=u8::MAX)?,
    };

    let certificate = tokens.tail(3);
    if decode_base64(certificate.iter().copied()).is_none() {
        return Err(ctx.syntax("certificate", "certificate must be valid Base64."));
    }

    Ok(Fields::new()
        .with("cert_type", cert_type)
        .with("key_tag", key_tag)
        .with("algorithm", algorithm)
        .with("certificate", certificate.concat()))
}

pub(super) fn openpgpkey(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let (data, _) = base64_data(ctx, content)?;
    Ok(Fields::new().with("data", data))
}

pub(super) fn dhcid(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let (data, len) = base64_data(ctx, content)?;
    if len < DHCID_MIN_LENGTH {
        return Err(ctx.range(
            "data",
            &format!("data must decode to at least {DHCID_MIN_LENGTH} octets."),
        ));
    }
    Ok(Fields::new().with("data", data))
}

fn base64_data(ctx: &Context<'_>, content: &str) -> Result<(String, usize)> {
    let tokens = ctx.tokens(content);
    tokens.expect_at_least(1, "<base64-data>")?;
    let chunks = tokens.tail(0);
    let decoded = decode_base64(chunks.iter().copied())
        .ok_or_else(|| ctx.syntax("data", "data must be valid Base64."))?;
    Ok((chunks.concat(), decoded.len()))
}

pub(super) fn ipseckey(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_at_least(4, "<precedence> <gateway-type> <algorithm> <gateway> [<public-key>]")?;

    let precedence: u8 = ctx.number(tokens.get(0), "precedence", "precedence", 0..=u8::MAX)?;
    let gateway_type: u8 = ctx.number(tokens.get(1), "gateway_type", "gateway type", 0..=3)?;
    let algorithm: u8 = ctx.number(tokens.get(2), "algorithm", "algorithm", 0..=3)?;

    let gateway_token = tokens.get(3);
    let gateway = match gateway_type {
        0 if gateway_token == "." => ".".to_string(),
        0 => return Err(ctx.consistency("gateway", "gateway must be \".\" when gateway type is 0.")),
        1 => gateway_token
            .parse::<Ipv4Addr>()
            .map(|a| a.to_string())
            .map_err(|_| ctx.consistency("gateway", "gateway must be an IPv4 address when gateway type is 1."))?,
        2 => gateway_token
            .parse::<Ipv6Addr>()
            .map(|a| a.to_string())
            .map_err(|_| ctx.consistency("gateway", "gateway must be an IPv6 address when gateway type is 2."))?,
        _ => ctx.hostname(gateway_token, "gateway")?,
    };

    let key = tokens.tail(4);
    let mut fields = Fields::new()
        .with("precedence", precedence)
        .with("gateway_type", gateway_type)
        .with("algorithm", algorithm)
        .with("gateway", gateway);

    match (algorithm, key.is_empty()) {
        (0, true) => {}
        (0, false) => {
            return Err(ctx.consistency("public_key", "public key must be absent when algorithm is 0."));
        }
        (_, true) => {
            return Err(ctx.consistency("public_key", "public key is required when algorithm is not 0."));
        }
        (_, false) => {
            if decode_base64(key.iter().copied()).is_none() {
                return Err(ctx.syntax("public_key", "public key must be valid Base64."));
            }
            fields.insert("public_key", key.concat());
        }
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::super::tests::{content, kind};
    use crate::error::ErrorKind;
    use zonegate_proto::RecordType;

    #[test]
    fn test_tlsa() {
        let sha256 = "a".repeat(64);
        assert!(content(RecordType::TLSA, &format!("3 1 1 {sha256}")).is_ok());
        assert!(content(RecordType::SMIMEA, &format!("3 0 2 {}", "B".repeat(128))).is_ok());
        assert!(content(RecordType::TLSA, "3 0 0 3082 01aa").is_ok());
        assert_eq!(kind(RecordType::TLSA, &format!("4 1 1 {sha256}")), ErrorKind::Range);
        assert_eq!(kind(RecordType::TLSA, &format!("3 2 1 {sha256}")), ErrorKind::Range);
        assert_eq!(kind(RecordType::TLSA, &format!("3 1 3 {sha256}")), ErrorKind::Range);
        assert_eq!(kind(RecordType::TLSA, &format!("3 1 2 {sha256}")), ErrorKind::Consistency);
        assert_eq!(kind(RecordType::TLSA, "3 0 0 abc"), ErrorKind::Syntax);
        assert_eq!(kind(RecordType::TLSA, "3 1 1"), ErrorKind::Structure);
    }

    #[test]
    fn test_sshfp() {
        assert!(content(RecordType::SSHFP, &format!("4 2 {}", "0f".repeat(32))).is_ok());
        assert!(content(RecordType::SSHFP, &format!("1 1 {}", "a".repeat(40))).is_ok());
        assert_eq!(kind(RecordType::SSHFP, &format!("5 1 {}", "a".repeat(40))), ErrorKind::Range);
        assert_eq!(kind(RecordType::SSHFP, &format!("1 3 {}", "a".repeat(40))), ErrorKind::Range);
        assert_eq!(kind(RecordType::SSHFP, &format!("1 2 {}", "a".repeat(40))), ErrorKind::Consistency);
        assert_eq!(kind(RecordType::SSHFP, "1 1 xyz"), ErrorKind::Syntax);
    }

    #[test]
    fn test_cert() {
        let fields = content(RecordType::CERT, "PGP 0 0 AQID").unwrap();
        assert_eq!(fields.get("cert_type").unwrap().as_int(), Some(3));
        let fields = content(RecordType::CERT, "1 12345 RSASHA256 AQID BAUG").unwrap();
        assert_eq!(fields.get("algorithm").unwrap().as_int(), Some(8));
        assert_eq!(kind(RecordType::CERT, "BOGUS 0 0 AQID"), ErrorKind::Syntax);
        assert_eq!(kind(RecordType::CERT, "1 0 0 ***"), ErrorKind::Syntax);
    }

    #[test]
    fn test_base64_blobs() {
        assert!(content(RecordType::OPENPGPKEY, "mQINBF AAAA").is_err());
        assert!(content(RecordType::OPENPGPKEY, "AQIDBA==").is_ok());
        assert!(content(RecordType::DHCID, "AAIBY2/AuCccgoJbsaxcQc9TUapptP69lOjxfNuVAA2kjEA=").is_ok());
        assert_eq!(kind(RecordType::DHCID, "AAE="), ErrorKind::Range);
    }

    #[test]
    fn test_ipseckey() {
        assert!(content(RecordType::IPSECKEY, "10 0 0 .").is_ok());
        assert!(content(RecordType::IPSECKEY, "10 1 2 192.0.2.38 AQID").is_ok());
        assert!(content(RecordType::IPSECKEY, "10 2 2 2001:db8::1 AQID").is_ok());
        assert!(content(RecordType::IPSECKEY, "10 3 2 gw.example.com. AQID").is_ok());
        assert_eq!(kind(RecordType::IPSECKEY, "10 1 2 gw.example.com AQID"), ErrorKind::Consistency);
        assert_eq!(kind(RecordType::IPSECKEY, "10 0 0 192.0.2.38"), ErrorKind::Consistency);
        assert_eq!(kind(RecordType::IPSECKEY, "10 1 2 192.0.2.38"), ErrorKind::Consistency);
        assert_eq!(kind(RecordType::IPSECKEY, "10 4 0 ."), ErrorKind::Range);
    }
}
