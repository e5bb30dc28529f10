//! DNSSEC records: DS, CDS, DLV, DNSKEY, CDNSKEY, KEY, RRSIG, NSEC, NSEC3,
//! NSEC3PARAM, ZONEMD.
//!
//! Only presentation syntax is checked. Nothing here verifies a signature
//! or recomputes a digest.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use zonegate_proto::dnssec::{
    dnskey_flags, DigestType, DnsSecAlgorithm, Nsec3HashAlgorithm, ZonemdHashAlgorithm,
    DNSKEY_PROTOCOL, NSEC3_MAX_ITERATIONS, ZONEMD_SCHEME_SIMPLE,
};
use zonegate_proto::RecordType;

use super::Context;
use crate::encoding::{decode_base64, is_hex};
use crate::error::Result;
use crate::grammar::{type_bitmap, Tokens};
use crate::hostname::HostnameValidator;
use crate::record::Fields;
use crate::strings::is_printable;

static NSEC3_OWNER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9+/=]+$").expect("valid regex"));

/// RFC 2535 flag bits meaning "this KEY record carries no key".
const KEY_NO_KEY: u16 = 0xC000;

/// CDS delete request (RFC 8078 section 4).
const CDS_DELETE: [&str; 4] = ["0", "0", "0", "00"];

/// CDNSKEY delete request (RFC 8078 section 4).
const CDNSKEY_DELETE: [&str; 4] = ["0", "3", "0", "AA=="];

/// DS and DLV.
pub(super) fn ds(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_exactly(4, "<key-tag> <algorithm> <digest-type> <digest>")?;
    single_spaced(ctx, &tokens, content)?;

    let key_tag: u16 = ctx.number(tokens.get(0), "key_tag", "key tag", 1..=u16::MAX)?;
    let algorithm: u8 = ctx.member(tokens.get(1), "algorithm", "algorithm", &DnsSecAlgorithm::CODES)?;
    note_deprecated(ctx, algorithm);
    let digest_type: u8 = ctx.member(tokens.get(2), "digest_type", "digest type", &[1, 2, 4])?;

    let digest = tokens.get(3);
    if !is_hex(digest) {
        return Err(ctx.syntax("digest", "digest must be a hexadecimal string."));
    }

    let Some(kind) = DigestType::from_u8(digest_type) else {
        return Err(ctx.range("digest_type", "digest type must be one of: 1, 2, 4."));
    };
    if digest.len() != kind.hex_len() {
        return Err(ctx.consistency(
            "digest",
            &format!(
                "digest for digest type {digest_type} ({}) must be exactly {} hexadecimal characters.",
                kind.label(),
                kind.hex_len()
            ),
        ));
    }

    Ok(Fields::new()
        .with("key_tag", key_tag)
        .with("algorithm", algorithm)
        .with("digest_type", digest_type)
        .with("digest", digest))
}

/// DS-family content is fields separated by exactly one space, with no
/// leading or trailing whitespace.
fn single_spaced(ctx: &Context<'_>, tokens: &Tokens<'_>, content: &str) -> Result<()> {
    if tokens.tail(0).join(" ") == content {
        Ok(())
    } else {
        Err(ctx.structure(
            "content",
            "record fields must be separated by single spaces, without leading or trailing whitespace.",
        ))
    }
}

fn note_deprecated(ctx: &Context<'_>, algorithm: u8) {
    if let Some(alg) = DnsSecAlgorithm::from_u8(algorithm).filter(|a| !a.is_recommended()) {
        debug!(rtype = %ctx.rtype, algorithm = alg.mnemonic(), "accepting algorithm no longer recommended for signing");
    }
}

pub(super) fn cds(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    if tokens.tail(0) == CDS_DELETE {
        single_spaced(ctx, &tokens, content)?;
        return Ok(delete_request(&CDS_DELETE, ["key_tag", "algorithm", "digest_type"], "digest"));
    }
    ds(ctx, content)
}

pub(super) fn dnskey(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_at_least(4, "<flags> <protocol> <algorithm> <public-key>")?;

    let flags: u16 = ctx.member(tokens.get(0), "flags", "flags", &dnskey_flags::ACCEPTED)?;
    let protocol: u8 = ctx.member(tokens.get(1), "protocol", "protocol", &[DNSKEY_PROTOCOL])?;
    let algorithm: u8 = ctx.member(tokens.get(2), "algorithm", "algorithm", &DnsSecAlgorithm::CODES)?;
    note_deprecated(ctx, algorithm);
    let key = public_key(ctx, &tokens, 3)?;

    Ok(Fields::new()
        .with("flags", flags)
        .with("protocol", protocol)
        .with("algorithm", algorithm)
        .with("public_key", key))
}

pub(super) fn cdnskey(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    if tokens.tail(0) == CDNSKEY_DELETE {
        return Ok(delete_request(&CDNSKEY_DELETE, ["flags", "protocol", "algorithm"], "public_key"));
    }
    dnskey(ctx, content)
}

fn delete_request(tokens: &[&str; 4], numeric: [&'static str; 3], last: &'static str) -> Fields {
    let mut fields = Fields::new();
    for (name, token) in numeric.into_iter().zip(tokens) {
        fields.insert(name, token.parse::<u64>().unwrap_or_default());
    }
    fields.with(last, tokens[3]).with("delete", "true")
}

/// KEY (RFC 2535/3445): any flags, protocol and algorithm octets. The key
/// may be absent when the flags say so.
pub(super) fn key(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_at_least(3, "<flags> <protocol> <algorithm> [<public-key>]")?;

    let flags: u16 = ctx.number(tokens.get(0), "flags", "flags", 0..=u16::MAX)?;
    let protocol: u8 = ctx.number(tokens.get(1), "protocol", "protocol", 0..=u8::MAX)?;
    let algorithm: u8 = ctx.number(tokens.get(2), "algorithm", "algorithm", 0..=u8::MAX)?;

    let mut fields = Fields::new()
        .with("flags", flags)
        .with("protocol", protocol)
        .with("algorithm", algorithm);

    if tokens.len() == 3 {
        if flags & KEY_NO_KEY != KEY_NO_KEY {
            return Err(ctx.consistency(
                "public_key",
                "public key may only be omitted when the no-key flag bits are set.",
            ));
        }
    } else {
        fields.insert("public_key", public_key(ctx, &tokens, 3)?);
    }

    Ok(fields)
}

fn public_key(ctx: &Context<'_>, tokens: &Tokens<'_>, from: usize) -> Result<String> {
    let chunks = tokens.tail(from);
    if decode_base64(chunks.iter().copied()).is_none() {
        return Err(ctx.syntax("public_key", "public key must be valid Base64."));
    }
    Ok(chunks.concat())
}

pub(super) fn rrsig(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_at_least(
        9,
        "<type-covered> <algorithm> <labels> <original-ttl> <expiration> <inception> <key-tag> <signer> <signature>",
    )?;

    let covered_token = tokens.get(0);
    let Some(covered) = RecordType::from_mnemonic(covered_token) else {
        return Err(ctx.syntax(
            "type_covered",
            &format!("type covered '{covered_token}' is not a known record type."),
        ));
    };
    let algorithm: u8 = ctx.member(tokens.get(1), "algorithm", "algorithm", &DnsSecAlgorithm::CODES)?;
    let labels: u8 = ctx.number(tokens.get(2), "labels", "labels", 0..=u8::MAX)?;
    let original_ttl: u32 = ctx.number(tokens.get(3), "original_ttl", "original TTL", 0..=u32::MAX)?;
    let expiration = signature_time(ctx, tokens.get(4), "expiration")?;
    let inception = signature_time(ctx, tokens.get(5), "inception")?;
    if expiration <= inception {
        return Err(ctx.consistency(
            "expiration",
            "signature expiration must be later than its inception.",
        ));
    }
    let key_tag: u16 = ctx.number(tokens.get(6), "key_tag", "key tag", 0..=u16::MAX)?;
    let signer = ctx.hostname_or_root(tokens.get(7), "signer")?;

    let signature = tokens.tail(8);
    if decode_base64(signature.iter().copied()).is_none() {
        return Err(ctx.syntax("signature", "signature must be valid Base64."));
    }

    Ok(Fields::new()
        .with("type_covered", covered.name())
        .with("algorithm", algorithm)
        .with("labels", labels)
        .with("original_ttl", original_ttl)
        .with("expiration", expiration)
        .with("inception", inception)
        .with("key_tag", key_tag)
        .with("signer", signer)
        .with("signature", signature.concat()))
}

/// Parses an RRSIG timestamp: `YYYYMMDDHHmmSS` in UTC, or seconds since
/// the epoch.
fn signature_time(ctx: &Context<'_>, token: &str, field: &'static str) -> Result<u32> {
    if token.len() != 14 {
        return ctx.number(token, field, field, 0..=u32::MAX);
    }
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ctx.syntax(field, &format!("{field} must be YYYYMMDDHHmmSS or a number.")));
    }

    let part = |range: std::ops::Range<usize>| token[range].parse::<u32>().unwrap_or_default();
    let year = i32::try_from(part(0..4)).unwrap_or_default();
    let seconds = NaiveDate::from_ymd_opt(year, part(4..6), part(6..8))
        .and_then(|date| date.and_hms_opt(part(8..10), part(10..12), part(12..14)))
        .map(|time| time.and_utc().timestamp())
        .ok_or_else(|| ctx.syntax(field, &format!("{field} '{token}' is not a valid date and time.")))?;

    u32::try_from(seconds)
        .map_err(|_| ctx.range(field, &format!("{field} '{token}' is outside the 32-bit timestamp range.")))
}

pub(super) fn nsec(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_at_least(1, "<next-domain> [<type>...]")?;

    let next = HostnameValidator::new(&ctx.config.hostname)
        .allow_underscore(true)
        .validate(tokens.get(0), true)
        .map_err(|e| e.for_field("next_domain"))?;
    let types = type_bitmap(ctx.rtype, tokens.tail(1))?;

    Ok(Fields::new().with("next_domain", next).with("types", types))
}

pub(super) fn nsec3(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    if !is_printable(content) {
        return Err(ctx.syntax("content", "record contains invalid characters."));
    }

    let tokens = ctx.tokens(content);
    tokens.expect_at_least(
        5,
        "<hash-algorithm> <flags> <iterations> <salt> <next-hashed-owner> [<type>...]",
    )?;

    let algorithm = hash_algorithm(ctx, tokens.get(0))?;
    let flags: u8 = ctx.member(tokens.get(1), "flags", "flags", &[0, 1])?;
    let iterations = iterations(ctx, tokens.get(2))?;
    let salt = salt(ctx, tokens.get(3))?;

    let next = tokens.get(4);
    if !NSEC3_OWNER.is_match(next) {
        return Err(ctx.syntax(
            "next_hashed_owner",
            "next hashed owner name must be a valid Base32hex encoded value.",
        ));
    }

    let types = type_bitmap(ctx.rtype, tokens.tail(5))?;

    Ok(Fields::new()
        .with("algorithm", algorithm)
        .with("flags", flags)
        .with("iterations", iterations)
        .with("salt", salt)
        .with("next_hashed_owner", next)
        .with("types", types))
}

pub(super) fn nsec3param(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_exactly(4, "<hash-algorithm> <flags> <iterations> <salt>")?;

    let algorithm = hash_algorithm(ctx, tokens.get(0))?;
    let flags: u8 = ctx.member(tokens.get(1), "flags", "flags", &[0])?;
    let iterations = iterations(ctx, tokens.get(2))?;
    let salt = salt(ctx, tokens.get(3))?;

    Ok(Fields::new()
        .with("algorithm", algorithm)
        .with("flags", flags)
        .with("iterations", iterations)
        .with("salt", salt))
}

fn hash_algorithm(ctx: &Context<'_>, token: &str) -> Result<u8> {
    let value: u8 = ctx.number(token, "algorithm", "hash algorithm", 0..=u8::MAX)?;
    match Nsec3HashAlgorithm::from_u8(value) {
        Some(_) => Ok(value),
        None => Err(ctx.range("algorithm", "hash algorithm must be 1 (SHA-1).")),
    }
}

fn iterations(ctx: &Context<'_>, token: &str) -> Result<u16> {
    ctx.number(token, "iterations", "iterations", 0..=NSEC3_MAX_ITERATIONS)
}

fn salt<'a>(ctx: &Context<'_>, token: &'a str) -> Result<&'a str> {
    if token == "-" || is_hex(token) {
        Ok(token)
    } else {
        Err(ctx.syntax("salt", "salt must be - (for empty) or a hexadecimal value."))
    }
}

pub(super) fn zonemd(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_at_least(4, "<serial> <scheme> <hash-algorithm> <digest>")?;

    let serial: u32 = ctx.number(tokens.get(0), "serial", "serial", 0..=u32::MAX)?;
    let scheme: u8 = ctx.member(tokens.get(1), "scheme", "scheme", &[ZONEMD_SCHEME_SIMPLE])?;
    let algorithm: u8 = ctx.member(tokens.get(2), "algorithm", "hash algorithm", &[1, 2])?;

    let digest = tokens.tail(3).concat();
    if !is_hex(&digest) {
        return Err(ctx.syntax("digest", "digest must be a hexadecimal string."));
    }
    let Some(kind) = ZonemdHashAlgorithm::from_u8(algorithm) else {
        return Err(ctx.range("algorithm", "hash algorithm must be one of: 1, 2."));
    };
    if digest.len() != kind.hex_len() {
        return Err(ctx.consistency(
            "digest",
            &format!(
                "digest for hash algorithm {algorithm} must be exactly {} hexadecimal characters.",
                kind.hex_len()
            ),
        ));
    }

    Ok(Fields::new()
        .with("serial", serial)
        .with("scheme", scheme)
        .with("algorithm", algorithm)
        .with("digest", digest))
}

#[cfg(test)]
mod tests {
    use super::super::tests::{content, kind};
    use crate::error::ErrorKind;
    use zonegate_proto::RecordType;

    fn dlv(digest_type: u8, len: usize) -> String {
        format!("12345 8 {digest_type} {}", "a".repeat(len))
    }

    #[test]
    fn test_ds_family_digest_lengths() {
        for rtype in [RecordType::DS, RecordType::DLV, RecordType::CDS] {
            for (dt, len) in [(1, 40), (2, 64), (4, 96)] {
                let fields = content(rtype, &dlv(dt, len)).unwrap();
                assert_eq!(fields.get("digest_type").unwrap().as_int(), Some(u64::from(dt)));
            }
        }
    }

    #[test]
    fn test_dlv_single_violations() {
        let rt = RecordType::DLV;
        assert_eq!(kind(rt, &dlv(1, 39)), ErrorKind::Consistency);
        assert_eq!(kind(rt, &dlv(2, 40)), ErrorKind::Consistency);
        assert_eq!(kind(rt, &dlv(3, 40)), ErrorKind::Range);
        assert_eq!(kind(rt, &format!("0 8 2 {}", "a".repeat(64))), ErrorKind::Range);
        assert_eq!(kind(rt, &format!("65536 8 2 {}", "a".repeat(64))), ErrorKind::Range);
        assert_eq!(kind(rt, &format!("12345 4 2 {}", "a".repeat(64))), ErrorKind::Range);
        assert_eq!(kind(rt, &format!("12345 8 2 {}", "g".repeat(64))), ErrorKind::Syntax);
        assert_eq!(kind(rt, "12345 8 2"), ErrorKind::Structure);
    }

    #[test]
    fn test_ds_family_spacing() {
        let digest = "a".repeat(64);
        for rtype in [RecordType::DS, RecordType::DLV, RecordType::CDS] {
            assert_eq!(kind(rtype, &format!("12345\t8\t2\t{digest}")), ErrorKind::Structure);
            assert_eq!(kind(rtype, &format!("12345  8 2 {digest}")), ErrorKind::Structure);
            assert_eq!(kind(rtype, &format!("12345 8 2 {digest}\n")), ErrorKind::Structure);
            assert_eq!(kind(rtype, &format!(" 12345 8 2 {digest}")), ErrorKind::Structure);
        }
        assert_eq!(kind(RecordType::CDS, "0  0 0 00"), ErrorKind::Structure);
    }

    #[test]
    fn test_dlv_messages() {
        let err = content(RecordType::DLV, &format!("0 8 2 {}", "a".repeat(64))).unwrap_err();
        assert_eq!(err.to_string(), "DLV key tag must be between 1 and 65535.");
        let err = content(RecordType::DLV, &dlv(1, 39)).unwrap_err();
        assert_eq!(err.field(), "digest");
        assert!(err.to_string().contains("40"));
    }

    #[test]
    fn test_delete_forms() {
        assert!(content(RecordType::CDS, "0 0 0 00").is_ok());
        assert_eq!(kind(RecordType::DS, "0 0 0 00"), ErrorKind::Range);
        let fields = content(RecordType::CDNSKEY, "0 3 0 AA==").unwrap();
        assert_eq!(fields.get("protocol").unwrap().as_int(), Some(3));
        assert_eq!(kind(RecordType::DNSKEY, "0 3 0 AA=="), ErrorKind::Range);
    }

    #[test]
    fn test_dnskey() {
        assert!(content(RecordType::DNSKEY, "257 3 13 mdsswUyr3DPW132mOi8V9xESWE8jTo0d xCjjnopKl+GqJxpVXckHAeF+KkxLbxILfDLUT0rAK9iUzy1L53eKGQ==").is_ok());
        assert_eq!(kind(RecordType::DNSKEY, "255 3 13 AQID"), ErrorKind::Range);
        assert_eq!(kind(RecordType::DNSKEY, "256 2 13 AQID"), ErrorKind::Range);
        assert_eq!(kind(RecordType::DNSKEY, "256 3 13 not*base64"), ErrorKind::Syntax);
        assert_eq!(kind(RecordType::DNSKEY, "256 3 13"), ErrorKind::Structure);
    }

    #[test]
    fn test_key() {
        assert!(content(RecordType::KEY, "256 3 5 AQID").is_ok());
        assert!(content(RecordType::KEY, "49152 3 5").is_ok());
        assert_eq!(kind(RecordType::KEY, "256 3 5"), ErrorKind::Consistency);
    }

    #[test]
    fn test_rrsig() {
        let fields = content(
            RecordType::RRSIG,
            "A 13 2 3600 20240201000000 20240101000000 12345 example.com. AQID BAUG",
        )
        .unwrap();
        assert_eq!(fields.get("type_covered").unwrap().to_string(), "A");
        assert_eq!(fields.get("inception").unwrap().as_int(), Some(1_704_067_200));
        assert_eq!(fields.get("signature").unwrap().to_string(), "AQIDBAUG");

        assert!(content(RecordType::RRSIG, "A 13 2 3600 1706745600 1704067200 1 example.com. AQID").is_ok());
    }

    #[test]
    fn test_rrsig_errors() {
        let base = |exp: &str, inc: &str| {
            format!("A 13 2 3600 {exp} {inc} 12345 example.com. AQID")
        };
        assert_eq!(
            kind(RecordType::RRSIG, &base("20240101000000", "20240201000000")),
            ErrorKind::Consistency
        );
        assert_eq!(
            kind(RecordType::RRSIG, &base("20240230000000", "20240101000000")),
            ErrorKind::Syntax
        );
        assert_eq!(
            kind(RecordType::RRSIG, &base("21100101000000", "20240101000000")),
            ErrorKind::Range
        );
        assert_eq!(
            kind(RecordType::RRSIG, "BOGUS 13 2 3600 2 1 12345 example.com. AQID"),
            ErrorKind::Syntax
        );
        assert_eq!(kind(RecordType::RRSIG, "A 13 2 3600 2 1 12345 example.com."), ErrorKind::Structure);
    }

    #[test]
    fn test_nsec() {
        let fields = content(RecordType::NSEC, "host.example.com. A MX RRSIG NSEC").unwrap();
        assert_eq!(fields.get("next_domain").unwrap().to_string(), "host.example.com");
        assert_eq!(kind(RecordType::NSEC, "host.example.com. A BOGUS"), ErrorKind::Range);
    }

    #[test]
    fn test_nsec3() {
        let fields = content(RecordType::NSEC3, "1 0 10 - ABCDEFG A NSEC3").unwrap();
        assert_eq!(fields.get("iterations").unwrap().as_int(), Some(10));
        assert_eq!(fields.get("salt").unwrap().to_string(), "-");
        assert_eq!(fields.get("next_hashed_owner").unwrap().to_string(), "ABCDEFG");
        assert!(content(RecordType::NSEC3, "1 1 12 aabbccdd 2vptu5timamqttgl4luu9kg21e0aor3s").is_ok());
    }

    #[test]
    fn test_nsec3_rules() {
        let rt = RecordType::NSEC3;
        assert_eq!(kind(rt, "2 0 10 - ABCDEFG A NSEC3"), ErrorKind::Range);
        assert_eq!(kind(rt, "0 0 10 - ABCDEFG"), ErrorKind::Range);
        assert_eq!(kind(rt, "1 2 10 - ABCDEFG"), ErrorKind::Range);
        assert!(content(rt, "1 0 0 - ABCDEFG").is_ok());
        assert!(content(rt, "1 0 2500 - ABCDEFG").is_ok());
        assert_eq!(kind(rt, "1 0 2501 - ABCDEFG"), ErrorKind::Range);
        assert_eq!(kind(rt, "1 0 -1 - ABCDEFG"), ErrorKind::Syntax);
        assert_eq!(kind(rt, "1 0 10 xyz ABCDEFG"), ErrorKind::Syntax);
        assert_eq!(kind(rt, "1 0 10 - ABC.DEF"), ErrorKind::Syntax);
        assert_eq!(kind(rt, "1 0 10 -"), ErrorKind::Structure);
    }

    #[test]
    fn test_nsec3_type_bitmap() {
        let rt = RecordType::NSEC3;
        assert!(content(rt, "1 0 10 - ABCDEFG TLSA A NSEC3").is_ok());
        assert!(content(rt, "1 0 10 - ABCDEFG 99").is_ok());
        assert!(content(rt, "1 0 10 - ABCDEFG rrsig(46)").is_ok());
        let err = content(rt, "1 0 10 - ABCDEFG A BOGUS").unwrap_err();
        assert_eq!(err.to_string(), "NSEC3 record contains an invalid record type: BOGUS");
    }

    #[test]
    fn test_nsec3param() {
        assert!(content(RecordType::NSEC3PARAM, "1 0 0 -").is_ok());
        assert!(content(RecordType::NSEC3PARAM, "1 0 10 aabb").is_ok());
        assert_eq!(kind(RecordType::NSEC3PARAM, "1 1 10 aabb"), ErrorKind::Range);
        assert_eq!(kind(RecordType::NSEC3PARAM, "1 0 10"), ErrorKind::Structure);
    }

    #[test]
    fn test_zonemd() {
        assert!(content(RecordType::ZONEMD, &format!("2024010101 1 1 {}", "ab".repeat(48))).is_ok());
        assert!(content(RecordType::ZONEMD, &format!("2024010101 1 2 {} {}", "ab".repeat(32), "cd".repeat(32))).is_ok());
        assert_eq!(
            kind(RecordType::ZONEMD, &format!("2024010101 1 2 {}", "ab".repeat(48))),
            ErrorKind::Consistency
        );
        assert_eq!(
            kind(RecordType::ZONEMD, &format!("2024010101 2 1 {}", "ab".repeat(48))),
            ErrorKind::Range
        );
    }
}
