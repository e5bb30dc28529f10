//! Per-type content grammars and the type table.
//!
//! Each record type maps to one [`Grammar`]: how its owner name is checked,
//! how its priority is treated, and the function that checks its content.
//! Adding a type means writing that function and adding a table entry.

use std::fmt::Display;
use std::ops::RangeInclusive;
use std::str::FromStr;
use zonegate_config::DnsConfig;
use zonegate_proto::RecordType;

use crate::error::{Result, ValidationError};
use crate::grammar::{self, Tokens};
use crate::hostname::HostnameValidator;
use crate::priority::PriorityRule;
use crate::record::Fields;

mod address;
mod authority;
mod cert;
mod dnssec;
mod location;
mod name;
mod service;
mod text;

/// Content grammar function.
pub(crate) type ContentFn = fn(&Context<'_>, &str) -> Result<Fields>;

/// How a record type validates its owner name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OwnerRule {
    /// Plain hostname, leading wildcard allowed.
    Host,
    /// Plain hostname, no wildcard.
    Exact,
    /// Hostname whose labels may start with `_` (`_dmarc.example.com`).
    Underscore,
    /// `_service._proto.name`.
    Service,
    /// `_port._proto.name`.
    Port,
}

impl OwnerRule {
    pub(crate) fn check(self, rtype: RecordType, config: &DnsConfig, name: &str) -> Result<String> {
        let hosts = HostnameValidator::new(&config.hostname);
        match self {
            Self::Host => hosts.validate(name, true),
            Self::Exact => hosts.validate(name, false),
            Self::Underscore => hosts.allow_underscore(true).validate(name, true),
            Self::Service => {
                let host = hosts.allow_underscore(true).validate(name, false)?;
                let mut labels = host.split('.');
                let service = labels.next().unwrap_or_default();
                let proto = labels.next().unwrap_or_default();
                if service.len() < 2
                    || !service.starts_with('_')
                    || proto.len() < 2
                    || !proto.starts_with('_')
                    || labels.next().is_none()
                {
                    return Err(ValidationError::syntax(
                        "name",
                        format!("{rtype} record name must be in the form _service._protocol.domain."),
                    ));
                }
                Ok(host)
            }
            Self::Port => {
                let host = hosts.allow_underscore(true).validate(name, false)?;
                let mut labels = host.split('.');
                let port = labels.next().and_then(|l| l.strip_prefix('_'));
                let proto = labels.next().and_then(|l| l.strip_prefix('_'));
                let port_ok = port.is_some_and(|p| {
                    !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()) && p.parse::<u16>().is_ok()
                });
                let proto_ok = proto.is_some_and(|p| {
                    ["tcp", "udp", "sctp"].iter().any(|known| p.eq_ignore_ascii_case(known))
                });
                if !port_ok || !proto_ok || labels.next().is_none() {
                    return Err(ValidationError::syntax(
                        "name",
                        format!("{rtype} record name must be in the form _port._protocol.domain."),
                    ));
                }
                Ok(host)
            }
        }
    }
}

/// Owner, priority and content rules for one record type.
#[derive(Clone, Copy)]
pub(crate) struct Grammar {
    pub(crate) owner: OwnerRule,
    pub(crate) priority: PriorityRule,
    pub(crate) content: ContentFn,
}

impl std::fmt::Debug for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grammar")
            .field("owner", &self.owner)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

const fn plain(content: ContentFn) -> Grammar {
    Grammar {
        owner: OwnerRule::Host,
        priority: PriorityRule::Unused,
        content,
    }
}

const fn owned(owner: OwnerRule, content: ContentFn) -> Grammar {
    Grammar {
        owner,
        priority: PriorityRule::Unused,
        content,
    }
}

const fn prioritized(owner: OwnerRule, default: u16, content: ContentFn) -> Grammar {
    Grammar {
        owner,
        priority: PriorityRule::Required { default },
        content,
    }
}

/// Returns the grammar for `rtype`, or `None` for types that cannot be
/// stored as zone content.
pub(crate) fn grammar_for(rtype: RecordType) -> Option<Grammar> {
    use OwnerRule::{Exact, Port, Service, Underscore};
    use RecordType as T;

    let grammar = match rtype {
        T::A => plain(address::a),
        T::AAAA => plain(address::aaaa),
        T::EUI48 => plain(address::eui48),
        T::EUI64 => plain(address::eui64),
        T::L32 => plain(address::l32),
        T::L64 | T::NID => plain(address::locator64),
        T::LP => plain(address::lp),
        T::APL => plain(address::apl),

        T::CNAME => owned(Underscore, name::alias),
        T::DNAME | T::PTR => plain(name::alias),
        T::NS | T::MR => plain(name::target),
        T::MX => prioritized(OwnerRule::Host, 10, name::target),
        T::KX => plain(name::kx),
        T::AFSDB => plain(name::afsdb),
        T::MINFO => plain(name::minfo),
        T::RP => plain(name::rp),

        T::TXT => owned(Underscore, text::txt),
        T::SPF => owned(Underscore, text::spf),
        T::HINFO => plain(text::hinfo),

        T::SOA => owned(Exact, authority::soa),
        T::CSYNC => plain(authority::csync),

        T::SRV => prioritized(Service, 10, service::srv),
        T::NAPTR => plain(service::naptr),
        T::URI => owned(Underscore, service::uri),
        T::CAA => plain(service::caa),
        T::SVCB | T::HTTPS => owned(Underscore, service::svcb),

        T::DS | T::DLV => plain(dnssec::ds),
        T::CDS => plain(dnssec::cds),
        T::DNSKEY => plain(dnssec::dnskey),
        T::CDNSKEY => plain(dnssec::cdnskey),
        T::KEY => plain(dnssec::key),
        T::RRSIG => plain(dnssec::rrsig),
        T::NSEC => plain(dnssec::nsec),
        T::NSEC3 => plain(dnssec::nsec3),
        T::NSEC3PARAM => plain(dnssec::nsec3param),
        T::ZONEMD => plain(dnssec::zonemd),

        T::TLSA => owned(Port, cert::tlsa),
        T::SMIMEA => owned(Underscore, cert::tlsa),
        T::SSHFP => plain(cert::sshfp),
        T::CERT => plain(cert::cert),
        T::OPENPGPKEY => owned(Underscore, cert::openpgpkey),
        T::DHCID => plain(cert::dhcid),
        T::IPSECKEY => plain(cert::ipseckey),

        T::LOC => plain(location::loc),

        T::MD
        | T::MF
        | T::MB
        | T::MG
        | T::NULL
        | T::WKS
        | T::X25
        | T::ISDN
        | T::RT
        | T::NSAP
        | T::NSAP_PTR
        | T::SIG
        | T::PX
        | T::GPOS
        | T::NXT
        | T::A6
        | T::OPT
        | T::HIP
        | T::TKEY
        | T::TSIG
        | T::IXFR
        | T::AXFR
        | T::MAILB
        | T::MAILA
        | T::ANY
        | T::TA => return None,
    };

    Some(grammar)
}

/// What a content grammar sees besides the content itself.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Context<'c> {
    pub(crate) rtype: RecordType,
    pub(crate) config: &'c DnsConfig,
}

impl<'c> Context<'c> {
    pub(crate) fn tokens<'a>(&self, content: &'a str) -> Tokens<'a> {
        Tokens::new(self.rtype, content)
    }

    pub(crate) fn number<T>(&self, token: &str, field: &'static str, what: &str, range: RangeInclusive<T>) -> Result<T>
    where
        T: FromStr + PartialOrd + Display + Copy,
    {
        grammar::number(self.rtype, token, field, what, range)
    }

    pub(crate) fn member<T>(&self, token: &str, field: &'static str, what: &str, allowed: &[T]) -> Result<T>
    where
        T: FromStr + PartialEq + Display + Copy,
    {
        grammar::member(self.rtype, token, field, what, allowed)
    }

    /// Checks a domain name embedded in content.
    pub(crate) fn hostname(&self, token: &str, field: &'static str) -> Result<String> {
        HostnameValidator::new(&self.config.hostname)
            .validate(token, false)
            .map_err(|e| e.for_field(field))
    }

    /// Checks a content name that may carry `_` labels.
    pub(crate) fn service_name(&self, token: &str, field: &'static str) -> Result<String> {
        HostnameValidator::new(&self.config.hostname)
            .allow_underscore(true)
            .validate(token, false)
            .map_err(|e| e.for_field(field))
    }

    /// Like [`Context::hostname`], but the root name `.` is also accepted.
    pub(crate) fn hostname_or_root(&self, token: &str, field: &'static str) -> Result<String> {
        if token == "." {
            Ok(".".to_string())
        } else {
            self.hostname(token, field)
        }
    }

    pub(crate) fn structure(&self, field: &'static str, what: &str) -> ValidationError {
        ValidationError::structure(field, format!("{} {what}", self.rtype))
    }

    pub(crate) fn syntax(&self, field: &'static str, what: &str) -> ValidationError {
        ValidationError::syntax(field, format!("{} {what}", self.rtype))
    }

    pub(crate) fn range(&self, field: &'static str, what: &str) -> ValidationError {
        ValidationError::range(field, format!("{} {what}", self.rtype))
    }

    pub(crate) fn consistency(&self, field: &'static str, what: &str) -> ValidationError {
        ValidationError::consistency(field, format!("{} {what}", self.rtype))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ErrorKind;

    /// Runs the content grammar of `rtype` with the default configuration.
    pub(crate) fn content(rtype: RecordType, content: &str) -> Result<Fields> {
        content_with(rtype, &DnsConfig::default(), content)
    }

    pub(crate) fn content_with(rtype: RecordType, config: &DnsConfig, content: &str) -> Result<Fields> {
        let grammar = grammar_for(rtype).expect("type has a grammar");
        (grammar.content)(&Context { rtype, config }, content)
    }

    pub(crate) fn kind(rtype: RecordType, text: &str) -> ErrorKind {
        content(rtype, text).expect_err("content should be rejected").kind()
    }

    #[test]
    fn test_table_covers_catalogue() {
        let supported: Vec<_> = RecordType::ALL
            .iter()
            .copied()
            .filter(|t| grammar_for(*t).is_some())
            .collect();
        assert_eq!(supported.len(), 49);
        assert!(RecordType::ALL
            .iter()
            .filter(|t| t.is_meta())
            .all(|t| grammar_for(*t).is_none()));
    }

    #[test]
    fn test_priority_rules() {
        let mx = grammar_for(RecordType::MX).unwrap();
        assert_eq!(mx.priority, PriorityRule::Required { default: 10 });
        let dlv = grammar_for(RecordType::DLV).unwrap();
        assert_eq!(dlv.priority, PriorityRule::Unused);
    }

    #[test]
    fn test_service_owner() {
        let config = DnsConfig::default();
        let rule = OwnerRule::Service;
        assert_eq!(
            rule.check(RecordType::SRV, &config, "_sip._tcp.example.com.").unwrap(),
            "_sip._tcp.example.com"
        );
        assert!(rule.check(RecordType::SRV, &config, "sip.tcp.example.com").is_err());
        assert!(rule.check(RecordType::SRV, &config, "_sip._tcp").is_err());
        assert!(rule.check(RecordType::SRV, &config, "*.example.com").is_err());
    }

    #[test]
    fn test_port_owner() {
        let config = DnsConfig::default();
        let rule = OwnerRule::Port;
        assert!(rule.check(RecordType::TLSA, &config, "_443._tcp.example.com").is_ok());
        assert!(rule.check(RecordType::TLSA, &config, "_25._SMTP.example.com").is_err());
        assert!(rule.check(RecordType::TLSA, &config, "_70000._tcp.example.com").is_err());
        assert!(rule.check(RecordType::TLSA, &config, "_https._tcp.example.com").is_err());
    }

    #[test]
    fn test_exact_owner_rejects_wildcard() {
        let config = DnsConfig::default();
        assert!(OwnerRule::Exact.check(RecordType::SOA, &config, "*.example.com").is_err());
        assert!(OwnerRule::Host.check(RecordType::A, &config, "*.example.com").is_ok());
    }
}
