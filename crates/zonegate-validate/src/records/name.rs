//! Records whose content is one or two domain names.

use super::Context;
use crate::error::Result;
use crate::record::Fields;

/// NS, MR and MX: a single host name.
pub(super) fn target(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_exactly(1, "<hostname>")?;
    let target = ctx.hostname(tokens.get(0), "target")?;
    Ok(Fields::new().with("target", target))
}

/// CNAME, DNAME and PTR: a single name, which may have `_` labels.
pub(super) fn alias(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_exactly(1, "<name>")?;
    let target = ctx.service_name(tokens.get(0), "target")?;
    Ok(Fields::new().with("target", target))
}

pub(super) fn kx(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_exactly(2, "<preference> <exchanger>")?;
    let preference: u16 = ctx.number(tokens.get(0), "preference", "preference", 0..=u16::MAX)?;
    let exchanger = ctx.hostname(tokens.get(1), "exchanger")?;
    Ok(Fields::new()
        .with("preference", preference)
        .with("exchanger", exchanger))
}

pub(super) fn afsdb(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_exactly(2, "<subtype> <hostname>")?;
    let subtype: u16 = ctx.member(tokens.get(0), "subtype", "subtype", &[1, 2])?;
    let hostname = ctx.hostname(tokens.get(1), "hostname")?;
    Ok(Fields::new().with("subtype", subtype).with("hostname", hostname))
}

pub(super) fn minfo(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_exactly(2, "<rmailbx> <emailbx>")?;
    let rmailbx = ctx.hostname(tokens.get(0), "rmailbx")?;
    let emailbx = ctx.hostname(tokens.get(1), "emailbx")?;
    Ok(Fields::new().with("rmailbx", rmailbx).with("emailbx", emailbx))
}

/// RP: either name may be `.` to mean "none".
pub(super) fn rp(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_exactly(2, "<mbox-dname> <txt-dname>")?;
    let mbox = ctx.hostname_or_root(tokens.get(0), "mbox")?;
    let txt = ctx.hostname_or_root(tokens.get(1), "txt")?;
    Ok(Fields::new().with("mbox", mbox).with("txt", txt))
}
