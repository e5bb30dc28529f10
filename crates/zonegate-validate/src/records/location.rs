//! LOC (RFC 1876).

use once_cell::sync::Lazy;
use regex::Regex;

use super::Context;
use crate::error::Result;
use crate::record::Fields;

static LOC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(\d+)(?:\s+(\d+)(?:\s+(\d+(?:\.\d{1,3})?))?)?\s+([NnSs])",
        r"\s+(\d+)(?:\s+(\d+)(?:\s+(\d+(?:\.\d{1,3})?))?)?\s+([EeWw])",
        r"\s+(-?\d+(?:\.\d{1,2})?)m?",
        r"(?:\s+(\d+(?:\.\d{1,2})?)m?(?:\s+(\d+(?:\.\d{1,2})?)m?(?:\s+(\d+(?:\.\d{1,2})?)m?)?)?)?$",
    ))
    .expect("valid regex")
});

const MIN_ALTITUDE: f64 = -100_000.0;
const MAX_ALTITUDE: f64 = 42_849_672.95;
const MAX_PRECISION: f64 = 90_000_000.0;

/// Defaults for omitted size, horizontal and vertical precision, in meters.
const DEFAULT_PRECISIONS: [&str; 3] = ["1", "10000", "10"];
const PRECISION_FIELDS: [(&str, &str); 3] = [
    ("size", "size"),
    ("horizontal_precision", "horizontal precision"),
    ("vertical_precision", "vertical precision"),
];

pub(super) fn loc(ctx: &Context<'_>, content: &str) -> Result<Fields> {
    let caps = LOC.captures(content.trim()).ok_or_else(|| {
        ctx.syntax(
            "content",
            "record must be: d1 [m1 [s1]] N|S d2 [m2 [s2]] E|W alt[m] [siz[m] [hp[m] [vp[m]]]].",
        )
    })?;

    let group = |i: usize| caps.get(i).map(|m| m.as_str());

    let latitude = coordinate(ctx, "latitude", 90, group(1), group(2), group(3))?;
    let longitude = coordinate(ctx, "longitude", 180, group(5), group(6), group(7))?;
    let latitude = if group(4).is_some_and(|h| h.eq_ignore_ascii_case("S")) {
        -latitude
    } else {
        latitude
    };
    let longitude = if group(8).is_some_and(|h| h.eq_ignore_ascii_case("W")) {
        -longitude
    } else {
        longitude
    };

    let altitude_text = group(9).unwrap_or("0");
    let altitude: f64 = altitude_text.parse().unwrap_or(f64::NAN);
    if !(MIN_ALTITUDE..=MAX_ALTITUDE).contains(&altitude) {
        return Err(ctx.range(
            "altitude",
            &format!("altitude must be between {MIN_ALTITUDE} and {MAX_ALTITUDE} meters."),
        ));
    }

    let mut fields = Fields::new()
        .with("latitude", format!("{latitude:.6}"))
        .with("longitude", format!("{longitude:.6}"))
        .with("altitude", altitude_text);

    for (i, ((field, what), default)) in PRECISION_FIELDS.into_iter().zip(DEFAULT_PRECISIONS).enumerate() {
        let text = group(10 + i).unwrap_or(default);
        let value: f64 = text.parse().unwrap_or(f64::NAN);
        if !(0.0..=MAX_PRECISION).contains(&value) {
            return Err(ctx.range(field, &format!("{what} must be between 0 and {MAX_PRECISION} meters.")));
        }
        fields.insert(field, text);
    }

    Ok(fields)
}

/// Converts degrees, minutes and seconds to decimal degrees.
fn coordinate(
    ctx: &Context<'_>,
    field: &'static str,
    max_degrees: u32,
    degrees: Option<&str>,
    minutes: Option<&str>,
    seconds: Option<&str>,
) -> Result<f64> {
    let degrees: u32 = ctx.number(degrees.unwrap_or("0"), field, &format!("{field} degrees"), 0..=max_degrees)?;
    let minutes: u32 = ctx.number(minutes.unwrap_or("0"), field, &format!("{field} minutes"), 0..=59)?;
    let seconds: f64 = seconds.unwrap_or("0").parse().unwrap_or(f64::NAN);
    if !(0.0..60.0).contains(&seconds) {
        return Err(ctx.range(field, &format!("{field} seconds must be between 0 and 59.999.")));
    }

    let value = f64::from(degrees) + f64::from(minutes) / 60.0 + seconds / 3600.0;
    if value > f64::from(max_degrees) {
        return Err(ctx.range(field, &format!("{field} must not exceed {max_degrees} degrees.")));
    }
    Ok(value)
}
