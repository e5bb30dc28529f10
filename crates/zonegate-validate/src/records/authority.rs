//! Zone authority records: SOA and CSYNC.

use super::Context;
use crate::error::Result;
use crate::grammar::type_bitmap;
use crate::record::Fields;

const SOA_TIMERS: [(&str, &str); 4] = [
    ("refresh", "refresh"),
    ("retry", "retry"),
    ("expire", "expire"),
    ("minimum", "minimum TTL"),
];

pub(super) fn soa(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_exactly(
        7,
        "<primary-ns> <hostmaster> <serial> <refresh> <retry> <expire> <minimum>",
    )?;

    let mname = ctx.hostname(tokens.get(0), "mname")?;
    let rname = ctx.hostname(tokens.get(1), "rname")?;
    let serial: u32 = ctx.number(tokens.get(2), "serial", "serial", 0..=u32::MAX)?;

    let mut fields = Fields::new()
        .with("mname", mname)
        .with("rname", rname)
        .with("serial", serial);

    for (i, (field, what)) in SOA_TIMERS.into_iter().enumerate() {
        let value: u32 = ctx.number(tokens.get(3 + i), field, what, 0..=u32::MAX)?;
        fields.insert(field, value);
    }

    Ok(fields)
}

pub(super) fn csync(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let tokens = ctx.tokens(content);
    tokens.expect_at_least(3, "<soa-serial> <flags> <type> [<type>...]")?;

    let serial: u32 = ctx.number(tokens.get(0), "serial", "SOA serial", 0..=u32::MAX)?;
    let flags: u16 = ctx.number(tokens.get(1), "flags", "flags", 0..=3)?;
    let types = type_bitmap(ctx.rtype, tokens.tail(2))?;

    Ok(Fields::new()
        .with("serial", serial)
        .with("flags", flags)
        .with("types", types))
}
