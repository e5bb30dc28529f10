//! Shared token grammar helpers.
//!
//! Content grammars all run the same way: count the tokens, check each token
//! against its class or range, then check tokens against each other. The
//! helpers here give those checks uniform messages.

use smallvec::SmallVec;
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::str::FromStr;
use zonegate_proto::rtype::is_bitmap_mnemonic;
use zonegate_proto::RecordType;

use crate::error::{Result, ValidationError};

/// Whitespace-separated content tokens of one record.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    rtype: RecordType,
    items: SmallVec<[&'a str; 8]>,
}

impl<'a> Tokens<'a> {
    /// Splits `content` on ASCII whitespace.
    pub fn new(rtype: RecordType, content: &'a str) -> Self {
        Self {
            rtype,
            items: content.split_ascii_whitespace().collect(),
        }
    }

    /// Returns the number of tokens.
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    /// Requires exactly `n` tokens.
    pub fn expect_exactly(&self, n: usize, layout: &str) -> Result<()> {
        if self.items.len() == n {
            Ok(())
        } else {
            Err(self.format_error(layout))
        }
    }

    /// Requires at least `n` tokens.
    pub fn expect_at_least(&self, n: usize, layout: &str) -> Result<()> {
        if self.items.len() >= n {
            Ok(())
        } else {
            Err(self.format_error(layout))
        }
    }

    /// Returns token `i`, or an empty string past the end.
    pub fn get(&self, i: usize) -> &'a str {
        self.items.get(i).copied().unwrap_or_default()
    }

    /// Returns the tokens from `i` on.
    pub fn tail(&self, i: usize) -> &[&'a str] {
        self.items.get(i..).unwrap_or_default()
    }

    fn format_error(&self, layout: &str) -> ValidationError {
        ValidationError::structure(
            "content",
            format!("Invalid {} record format. Expected: {layout}.", self.rtype),
        )
    }
}

/// Parses an unsigned decimal token and checks it against `range`.
///
/// Non-digit tokens are syntax errors; overflow and out-of-range values are
/// range errors.
pub fn number<T>(
    rtype: RecordType,
    token: &str,
    field: &'static str,
    what: &str,
    range: RangeInclusive<T>,
) -> Result<T>
where
    T: FromStr + PartialOrd + Display + Copy,
{
    let out_of_range = || {
        ValidationError::range(
            field,
            format!(
                "{rtype} {what} must be between {} and {}.",
                range.start(),
                range.end()
            ),
        )
    };

    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::syntax(
            field,
            format!("{rtype} {what} must be a number."),
        ));
    }

    let value: T = token.parse().map_err(|_| out_of_range())?;
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(out_of_range())
    }
}

/// Parses an unsigned decimal token and checks it against a fixed set.
pub fn member<T>(
    rtype: RecordType,
    token: &str,
    field: &'static str,
    what: &str,
    allowed: &[T],
) -> Result<T>
where
    T: FromStr + PartialEq + Display + Copy,
{
    let not_allowed = || {
        let list: Vec<String> = allowed.iter().map(ToString::to_string).collect();
        ValidationError::range(
            field,
            format!("{rtype} {what} must be one of: {}.", list.join(", ")),
        )
    };

    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::syntax(
            field,
            format!("{rtype} {what} must be a number."),
        ));
    }

    let value: T = token.parse().map_err(|_| not_allowed())?;
    if allowed.contains(&value) {
        Ok(value)
    } else {
        Err(not_allowed())
    }
}

/// Checks a type bit map list and returns it normalized to upper case.
///
/// Numeric tokens pass unchecked. A trailing `(...)` annotation is dropped
/// before the mnemonic lookup.
pub fn type_bitmap(rtype: RecordType, tokens: &[&str]) -> Result<Vec<String>> {
    tokens
        .iter()
        .map(|token| {
            if token.bytes().all(|b| b.is_ascii_digit()) {
                return Ok((*token).to_string());
            }
            let mnemonic = token.split('(').next().unwrap_or_default().trim();
            let upper = mnemonic.to_ascii_uppercase();
            if is_bitmap_mnemonic(&upper) {
                Ok(upper)
            } else {
                Err(ValidationError::range(
                    "types",
                    format!("{rtype} record contains an invalid record type: {token}"),
                ))
            }
        })
        .collect()
}
