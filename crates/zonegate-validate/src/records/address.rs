//! Address-like records: A, AAAA, EUI48, EUI64, L32, L64, NID, LP, APL.

use ipnet::{Ipv4Net, Ipv6Net};
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::{Ipv4Addr, Ipv6Addr};

use super::Context;
use crate::error::Result;
use crate::record::Fields;

static EUI48: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Fa-f]{2}(-[0-9A-Fa-f]{2}){5}$").expect("valid regex"));

static EUI64: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Fa-f]{2}(-[0-9A-Fa-f]{2}){7}$").expect("valid regex"));

static LOCATOR64: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Fa-f]{1,4}(:[0-9A-Fa-f]{1,4}){3}$").expect("valid regex"));

static APL_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(!?)([0-9]+):([^/]+/[0-9]+)$").expect("valid regex"));

fn ipv4(ctx: &Context<'_>, token: &str, field: &'static str) -> Result<Ipv4Addr> {
    token
        .parse()
        .map_err(|_| ctx.syntax(field, &format!("address '{token}' is not a valid IPv4 address.")))
}

pub(super) fn a(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_exactly(1, "<ipv4-address>")?;
    let addr = ipv4(ctx, tokens.get(0), "address")?;
    Ok(Fields::new().with("address", addr.to_string()))
}

pub(super) fn aaaa(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_exactly(1, "<ipv6-address>")?;
    let token = tokens.get(0);
    let addr: Ipv6Addr = token
        .parse()
        .map_err(|_| ctx.syntax("address", &format!("address '{token}' is not a valid IPv6 address.")))?;
    Ok(Fields::new().with("address", addr.to_string()))
}

pub(super) fn eui48(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    eui(ctx, content, &EUI48, "six")
}

pub(super) fn eui64(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    eui(ctx, content, &EUI64, "eight")
}

fn eui(ctx: &Context<'_>, content: &str, pattern: &Regex, groups: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_exactly(1, "<xx-xx-...>")?;
    let address = tokens.get(0);
    if !pattern.is_match(address) {
        return Err(ctx.syntax(
            "address",
            &format!("address must be {groups} hex pairs separated by hyphens."),
        ));
    }
    Ok(Fields::new().with("address", address.to_ascii_lowercase()))
}

pub(super) fn l32(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_exactly(2, "<preference> <locator32>")?;
    let preference: u16 = ctx.number(tokens.get(0), "preference", "preference", 0..=u16::MAX)?;
    let locator = ipv4(ctx, tokens.get(1), "locator")?;
    Ok(Fields::new()
        .with("preference", preference)
        .with("locator", locator.to_string()))
}

/// L64 and NID share the four-group 64-bit layout.
pub(super) fn locator64(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_exactly(2, "<preference> <xxxx:xxxx:xxxx:xxxx>")?;
    let preference: u16 = ctx.number(tokens.get(0), "preference", "preference", 0..=u16::MAX)?;
    let value = tokens.get(1);
    if !LOCATOR64.is_match(value) {
        return Err(ctx.syntax(
            "locator",
            "value must be four groups of 1-4 hex digits separated by colons.",
        ));
    }
    Ok(Fields::new()
        .with("preference", preference)
        .with("locator", value.to_ascii_lowercase()))
}

pub(super) fn lp(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_exactly(2, "<preference> <fqdn>")?;
    let preference: u16 = ctx.number(tokens.get(0), "preference", "preference", 0..=u16::MAX)?;
    let fqdn = ctx.hostname(tokens.get(1), "fqdn")?;
    Ok(Fields::new().with("preference", preference).with("fqdn", fqdn))
}

pub(super) fn apl(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_at_least(1, "[!]<afi>:<address>/<prefix> ...")?;

    let mut items = Vec::with_capacity(tokens.len());
    for item in tokens.tail(0) {
        let caps = APL_ITEM.captures(item).ok_or_else(|| {
            ctx.syntax("items", &format!("item '{item}' must be [!]afi:address/prefix."))
        })?;
        let negate = &caps[1];
        let prefix = &caps[3];
        let normalized = match &caps[2] {
            "1" => prefix
                .parse::<Ipv4Net>()
                .map(|net| net.to_string())
                .map_err(|_| ctx.range("items", &format!("item '{item}' is not a valid IPv4 prefix.")))?,
            "2" => prefix
                .parse::<Ipv6Net>()
                .map(|net| net.to_string())
                .map_err(|_| ctx.range("items", &format!("item '{item}' is not a valid IPv6 prefix.")))?,
            afi => {
                return Err(ctx.range(
                    "items",
                    &format!("address family {afi} is not supported. Use 1 (IPv4) or 2 (IPv6)."),
                ))
            }
        };
        items.push(format!("{negate}{}:{normalized}", &caps[2]));
    }

    Ok(Fields::new().with("items", items))
}
