//! Service location and policy records: SRV, NAPTR, URI, CAA, SVCB, HTTPS.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeSet;
use std::net::{Ipv4Addr, Ipv6Addr};
use zonegate_proto::SvcParamKey;

use super::Context;
use crate::encoding::decode_base64;
use crate::error::Result;
use crate::record::Fields;
use crate::strings::{character_strings, is_printable, CharacterString};

static URI_TARGET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:\S+$").expect("valid regex"));

/// Property tags registered for CAA (RFC 8659, RFC 9495 and the IANA registry).
const CAA_TAGS: [&str; 7] = [
    "issue",
    "issuewild",
    "iodef",
    "contactemail",
    "contactphone",
    "issuemail",
    "issuevmc",
];

const CAA_TAG_MAX_LENGTH: usize = 15;

/// Compiled size cap for NAPTR substitution expressions.
const NAPTR_REGEX_SIZE_LIMIT: usize = 1 << 16;

fn strings(ctx: &Context<'_>, content: &str) -> Result<Vec<CharacterString>> {
    if !is_printable(content) {
        return Err(ctx.syntax("content", "record contains invalid characters."));
    }
    character_strings(ctx.rtype, content)
}

pub(super) fn srv(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_exactly(3, "<weight> <port> <target>")?;

    let weight: u16 = ctx.number(tokens.get(0), "weight", "weight", 0..=u16::MAX)?;
    let port: u16 = ctx.number(tokens.get(1), "port", "port", 0..=u16::MAX)?;
    let target = ctx.hostname_or_root(tokens.get(2), "target")?;

    Ok(Fields::new()
        .with("weight", weight)
        .with("port", port)
        .with("target", target))
}

pub(super) fn naptr(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let items = strings(ctx, content)?;
    if items.len() != 6 {
        return Err(ctx.structure(
            "content",
            "record must be: <order> <preference> \"<flags>\" \"<service>\" \"<regexp>\" <replacement>.",
        ));
    }

    let order: u16 = ctx.number(&items[0].value, "order", "order", 0..=u16::MAX)?;
    let preference: u16 = ctx.number(&items[1].value, "preference", "preference", 0..=u16::MAX)?;

    let flags = &items[2].value;
    if !flags.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(ctx.syntax("flags", "flags may only contain letters and digits."));
    }

    let service = &items[3].value;
    if !service
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b':' | b'.' | b'-' | b'_'))
    {
        return Err(ctx.syntax("service", "service field contains invalid characters."));
    }

    let regexp = &items[4].value;
    if !regexp.is_empty() {
        check_substitution(ctx, regexp)?;
    }

    let replacement = if items[5].value == "." {
        ".".to_string()
    } else {
        ctx.service_name(&items[5].value, "replacement")?
    };

    if !regexp.is_empty() && replacement != "." {
        return Err(ctx.consistency(
            "replacement",
            "regexp and replacement are mutually exclusive. Use \".\" as replacement when a regexp is set.",
        ));
    }

    Ok(Fields::new()
        .with("order", order)
        .with("preference", preference)
        .with("flags", flags.to_ascii_uppercase())
        .with("service", service.as_str())
        .with("regexp", regexp.as_str())
        .with("replacement", replacement))
}

/// Checks a `<delim>ere<delim>repl<delim>[i]` substitution expression.
fn check_substitution(ctx: &Context<'_>, expr: &str) -> Result<()> {
    let invalid = || ctx.syntax("regexp", "regexp must be of the form <delim><ere><delim><replacement><delim>[i].");

    let mut chars = expr.chars();
    let delim = chars.next().ok_or_else(invalid)?;
    if delim.is_ascii_digit() || delim == '\\' || delim == 'i' {
        return Err(invalid());
    }

    let mut parts = Vec::with_capacity(2);
    let mut current = String::new();
    let mut escaped = false;
    for c in chars {
        if escaped {
            current.push(c);
            escaped = false;
        } else if c == '\\' {
            current.push(c);
            escaped = true;
        } else if c == delim {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }

    let trailing_flags_ok = current.is_empty() || current == "i";
    if parts.len() != 2 || parts[0].is_empty() || !trailing_flags_ok {
        return Err(invalid());
    }

    RegexBuilder::new(&parts[0])
        .size_limit(NAPTR_REGEX_SIZE_LIMIT)
        .build()
        .map_err(|_| ctx.syntax("regexp", "regexp does not contain a valid regular expression."))?;

    Ok(())
}

pub(super) fn uri(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let items = strings(ctx, content)?;
    if items.len() != 3 {
        return Err(ctx.structure("content", "record must be: <priority> <weight> \"<target>\"."));
    }

    let priority: u16 = ctx.number(&items[0].value, "priority", "priority", 0..=u16::MAX)?;
    let weight: u16 = ctx.number(&items[1].value, "weight", "weight", 0..=u16::MAX)?;

    let target = &items[2];
    if !target.quoted {
        return Err(ctx.syntax("target", "target must be enclosed in double quotes."));
    }
    if !URI_TARGET.is_match(&target.value) {
        return Err(ctx.syntax("target", "target must be an absolute URI."));
    }

    Ok(Fields::new()
        .with("priority", priority)
        .with("weight", weight)
        .with("target", target.value.as_str()))
}

pub(super) fn caa(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let items = strings(ctx, content)?;
    if items.len() != 3 {
        return Err(ctx.structure("content", "record must be: <flags> <tag> \"<value>\"."));
    }

    let flags: u8 = ctx.number(&items[0].value, "flags", "flags", 0..=u8::MAX)?;

    let tag = &items[1].value;
    if tag.is_empty() || tag.len() > CAA_TAG_MAX_LENGTH || !tag.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(ctx.syntax(
            "tag",
            &format!("tag must be 1 to {CAA_TAG_MAX_LENGTH} letters or digits."),
        ));
    }
    let tag = tag.to_ascii_lowercase();
    if !CAA_TAGS.contains(&tag.as_str()) {
        return Err(ctx.range(
            "tag",
            &format!("tag '{tag}' is not one of: {}.", CAA_TAGS.join(", ")),
        ));
    }

    let value = &items[2].value;
    match tag.as_str() {
        "issue" | "issuewild" | "issuemail" | "issuevmc" => {
            let issuer = value.split(';').next().unwrap_or_default().trim();
            if !issuer.is_empty() {
                ctx.hostname(issuer, "value")?;
            }
        }
        "iodef" => {
            let scheme_ok = ["mailto:", "http:", "https:"].iter().any(|scheme| {
                value.len() > scheme.len()
                    && value
                        .get(..scheme.len())
                        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
            });
            if !scheme_ok {
                return Err(ctx.syntax("value", "iodef value must be a mailto:, http: or https: URL."));
            }
        }
        "contactemail" => {
            if !value.contains('@') {
                return Err(ctx.syntax("value", "contactemail value must be an email address."));
            }
        }
        _ => {}
    }

    Ok(Fields::new()
        .with("flags", flags)
        .with("tag", tag)
        .with("value", value.as_str()))
}

/// SVCB and HTTPS.
pub(super) fn svcb(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    if !is_printable(content) {
        return Err(ctx.syntax("content", "record contains invalid characters."));
    }
    let tokens = ctx.tokens(content);
    tokens.expect_at_least(2, "<priority> <target> [key=value...]")?;

    let priority: u16 = ctx.number(tokens.get(0), "priority", "priority", 0..=u16::MAX)?;
    let target = ctx.hostname_or_root(tokens.get(1), "target")?;
    let params = tokens.tail(2);

    if priority == 0 && !params.is_empty() {
        return Err(ctx.consistency(
            "params",
            "records in alias mode (priority 0) must not have parameters.",
        ));
    }

    let mut seen = BTreeSet::new();
    let mut mandatory = Vec::new();
    let mut normalized = Vec::with_capacity(params.len());

    for param in params {
        let (name, value) = match param.split_once('=') {
            Some((name, value)) => (name, Some(unquote(value))),
            None => (*param, None),
        };

        let key = SvcParamKey::from_name(name)
            .ok_or_else(|| ctx.syntax("params", &format!("parameter key '{name}' is not valid.")))?;
        if !seen.insert(key) {
            return Err(ctx.consistency("params", &format!("parameter '{key}' appears more than once.")));
        }

        match (key.is_flag(), value) {
            (true, Some(_)) => {
                return Err(ctx.syntax("params", &format!("parameter '{key}' does not take a value.")));
            }
            (true, None) => {
                normalized.push(key.to_string());
                continue;
            }
            (false, None) | (false, Some("")) => {
                return Err(ctx.syntax("params", &format!("parameter '{key}' requires a value.")));
            }
            (false, Some(value)) => {
                check_param(ctx, key, value, &mut mandatory)?;
                normalized.push(format!("{key}={value}"));
            }
        }
    }

    if seen.contains(&SvcParamKey::NoDefaultAlpn) && !seen.contains(&SvcParamKey::Alpn) {
        return Err(ctx.consistency("params", "no-default-alpn requires alpn to be present."));
    }
    if let Some(missing) = mandatory.iter().find(|key| !seen.contains(*key)) {
        return Err(ctx.consistency(
            "params",
            &format!("mandatory parameter '{missing}' is not present."),
        ));
    }

    Ok(Fields::new()
        .with("priority", priority)
        .with("target", target)
        .with("params", normalized))
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn check_param(ctx: &Context<'_>, key: SvcParamKey, value: &str, mandatory: &mut Vec<SvcParamKey>) -> Result<()> {
    let invalid = |what: &str| ctx.syntax("params", &format!("parameter '{key}' {what}"));

    match key {
        SvcParamKey::Mandatory => {
            for name in value.split(',') {
                match SvcParamKey::from_name(name) {
                    Some(SvcParamKey::Mandatory) => {
                        return Err(ctx.consistency("params", "mandatory must not list itself."));
                    }
                    Some(listed) if !mandatory.contains(&listed) => mandatory.push(listed),
                    Some(listed) => {
                        return Err(ctx.consistency(
                            "params",
                            &format!("mandatory lists '{listed}' more than once."),
                        ));
                    }
                    None => return Err(invalid(&format!("lists an unknown key '{name}'."))),
                }
            }
        }
        SvcParamKey::Alpn => {
            if value.split(',').any(str::is_empty) {
                return Err(invalid("contains an empty protocol identifier."));
            }
        }
        SvcParamKey::Port => {
            ctx.number::<u16>(value, "params", "port parameter", 0..=u16::MAX)?;
        }
        SvcParamKey::Ipv4Hint => {
            if value.split(',').any(|a| a.parse::<Ipv4Addr>().is_err()) {
                return Err(invalid("must be a comma-separated list of IPv4 addresses."));
            }
        }
        SvcParamKey::Ipv6Hint => {
            if value.split(',').any(|a| a.parse::<Ipv6Addr>().is_err()) {
                return Err(invalid("must be a comma-separated list of IPv6 addresses."));
            }
        }
        SvcParamKey::Ech => {
            if decode_base64([value]).is_none() {
                return Err(invalid("must be Base64."));
            }
        }
        SvcParamKey::Dohpath => {
            if !value.starts_with('/') || !value.contains("{?dns}") {
                return Err(invalid("must be a relative URI template containing {?dns}."));
            }
        }
        SvcParamKey::NoDefaultAlpn | SvcParamKey::Generic(_) => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::tests::{content, kind};
    use crate::error::ErrorKind;
    use zonegate_proto::RecordType;

    #[test]
    fn test_srv() {
        let fields = content(RecordType::SRV, "5 5060 sip.example.com.").unwrap();
        assert_eq!(fields.get("port").unwrap().as_int(), Some(5060));
        assert_eq!(fields.get("target").unwrap().to_string(), "sip.example.com");
        assert!(content(RecordType::SRV, "0 0 .").is_ok());
        assert_eq!(kind(RecordType::SRV, "10 5 5060 sip.example.com"), ErrorKind::Structure);
        assert_eq!(kind(RecordType::SRV, "5 70000 sip.example.com"), ErrorKind::Range);
    }

    #[test]
    fn test_naptr() {
        let fields = content(
            RecordType::NAPTR,
            r#"100 10 "u" "E2U+sip" "!^.*$!sip:info@example.com!" ."#,
        )
        .unwrap();
        assert_eq!(fields.get("flags").unwrap().to_string(), "U");
        assert!(content(RecordType::NAPTR, r#"100 10 "S" "SIP+D2U" "" _sip._udp.example.com."#).is_ok());
    }

    #[test]
    fn test_naptr_errors() {
        assert_eq!(kind(RecordType::NAPTR, r#"100 10 "S" "SIP+D2U" """#), ErrorKind::Structure);
        assert_eq!(
            kind(RecordType::NAPTR, r#"100 10 "S!" "SIP+D2U" "" ."#),
            ErrorKind::Syntax
        );
        assert_eq!(
            kind(RecordType::NAPTR, r#"100 10 "U" "E2U+sip" "!^.*$!sip:x@example.com" ."#),
            ErrorKind::Syntax
        );
        assert_eq!(
            kind(RecordType::NAPTR, r#"100 10 "U" "E2U+sip" "!(!x!" ."#),
            ErrorKind::Syntax
        );
        assert_eq!(
            kind(RecordType::NAPTR, r#"100 10 "U" "E2U+sip" "!^.*$!sip:x@example.com!" sip.example.com"#),
            ErrorKind::Consistency
        );
    }

    #[test]
    fn test_uri() {
        assert!(content(RecordType::URI, r#"10 1 "https://www.example.com/path""#).is_ok());
        assert!(content(RecordType::URI, r#"10 1 "ftp://ftp.example.com/""#).is_ok());
        assert_eq!(kind(RecordType::URI, "10 1 https://www.example.com/"), ErrorKind::Syntax);
        assert_eq!(kind(RecordType::URI, r#"10 1 "not a uri""#), ErrorKind::Syntax);
        assert_eq!(kind(RecordType::URI, r#"10 "https://x.example""#), ErrorKind::Structure);
    }

    #[test]
    fn test_caa() {
        assert!(content(RecordType::CAA, r#"0 issue "letsencrypt.org""#).is_ok());
        assert!(content(RecordType::CAA, r#"0 issuewild ";""#).is_ok());
        assert!(content(RecordType::CAA, r#"128 issue "ca.example.net; account=230123""#).is_ok());
        assert!(content(RecordType::CAA, r#"0 iodef "mailto:security@example.com""#).is_ok());
        let fields = content(RecordType::CAA, r#"0 ISSUE "ca.example.net""#).unwrap();
        assert_eq!(fields.get("tag").unwrap().to_string(), "issue");
    }

    #[test]
    fn test_caa_errors() {
        assert_eq!(kind(RecordType::CAA, r#"256 issue "ca.example.net""#), ErrorKind::Range);
        assert_eq!(kind(RecordType::CAA, r#"0 unknowntag "x""#), ErrorKind::Range);
        assert_eq!(kind(RecordType::CAA, r#"0 is-sue "x""#), ErrorKind::Syntax);
        assert_eq!(kind(RecordType::CAA, r#"0 iodef "ftp://example.com""#), ErrorKind::Syntax);
        assert_eq!(kind(RecordType::CAA, r#"0 issue"#), ErrorKind::Structure);
    }

    #[test]
    fn test_svcb_service_mode() {
        let fields = content(
            RecordType::HTTPS,
            r#"1 . alpn="h2,h3" port=8443 ipv4hint=192.0.2.1,192.0.2.2 ipv6hint=2001:db8::1"#,
        )
        .unwrap();
        assert_eq!(
            fields.get("params").unwrap().as_list().unwrap(),
            ["alpn=h2,h3", "port=8443", "ipv4hint=192.0.2.1,192.0.2.2", "ipv6hint=2001:db8::1"]
        );
        assert!(content(
            RecordType::SVCB,
            "1 svc.example.com. mandatory=alpn alpn=h2 no-default-alpn key65000=x"
        )
        .is_ok());
        assert!(content(RecordType::SVCB, "1 doh.example.com. alpn=h2 dohpath=/dns-query{?dns}").is_ok());
    }

    #[test]
    fn test_svcb_alias_mode() {
        assert!(content(RecordType::SVCB, "0 svc.example.com.").is_ok());
        assert_eq!(kind(RecordType::SVCB, "0 svc.example.com. alpn=h2"), ErrorKind::Consistency);
    }

    #[test]
    fn test_svcb_errors() {
        assert_eq!(kind(RecordType::SVCB, "1 . ALPN=h2"), ErrorKind::Syntax);
        assert_eq!(kind(RecordType::SVCB, "1 . alpn=h2 alpn=h3"), ErrorKind::Consistency);
        assert_eq!(kind(RecordType::SVCB, "1 . port=99999"), ErrorKind::Range);
        assert_eq!(kind(RecordType::SVCB, "1 . ipv4hint=2001:db8::1"), ErrorKind::Syntax);
        assert_eq!(kind(RecordType::SVCB, "1 . no-default-alpn=1"), ErrorKind::Syntax);
        assert_eq!(kind(RecordType::SVCB, "1 . no-default-alpn"), ErrorKind::Consistency);
        assert_eq!(kind(RecordType::SVCB, "1 . mandatory=port alpn=h2"), ErrorKind::Consistency);
        assert_eq!(kind(RecordType::SVCB, "1 . port="), ErrorKind::Syntax);
        assert_eq!(kind(RecordType::SVCB, "1"), ErrorKind::Structure);
    }
}
