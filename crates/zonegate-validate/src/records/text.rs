//! Character-string records: TXT, SPF, HINFO.

use super::Context;
use crate::error::Result;
use crate::record::Fields;
use crate::strings::{character_strings, is_printable};

fn printable_strings(ctx: &Context<'_>, content: &str) -> Result<Vec<String>> {
    if !is_printable(content) {
        return Err(ctx.syntax("content", "record contains invalid characters."));
    }
    let strings = character_strings(ctx.rtype, content)?;
    Ok(strings.into_iter().map(|s| s.value).collect())
}

pub(super) fn txt(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let strings = printable_strings(ctx, content)?;
    Ok(Fields::new().with("strings", strings))
}

/// SPF: TXT syntax whose joined text is an SPF version 1 policy.
pub(super) fn spf(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let strings = printable_strings(ctx, content)?;
    let policy = strings.concat();
    let version = policy.split(' ').next().unwrap_or_default();
    if !version.eq_ignore_ascii_case("v=spf1") {
        return Err(ctx.syntax("content", "record must start with v=spf1."));
    }
    Ok(Fields::new().with("policy", policy).with("strings", strings))
}

pub(super) fn hinfo(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let strings = printable_strings(ctx, content)?;
    let [cpu, os] = <[String; 2]>::try_from(strings).map_err(|_| {
        ctx.structure("content", "record must contain exactly two strings: CPU and OS.")
    })?;
    if cpu.is_empty() || os.is_empty() {
        return Err(ctx.syntax("content", "CPU and OS must not be empty."));
    }
    Ok(Fields::new().with("cpu", cpu).with("os", os))
}
