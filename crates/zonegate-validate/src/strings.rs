//! Printable checks and character-string tokenizing.
//!
//! Character-strings follow the RFC 1035 master file syntax: either a run of
//! non-blank characters or a double-quoted string, with `\"`, `\\` and
//! `\DDD` escapes in both forms.

use zonegate_proto::{RecordType, MAX_CHARACTER_STRING_LENGTH};

use crate::error::{Result, ValidationError};

/// Returns true if every byte is printable ASCII (space through `~`).
pub fn is_printable(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7e).contains(&b))
}

/// One decoded character-string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterString {
    /// Decoded value with escapes resolved.
    pub value: String,
    /// Whether the string was written in double quotes.
    pub quoted: bool,
}

/// Splits `content` into character-strings.
///
/// Fails on unbalanced quotes, bad escapes, and strings longer than 255
/// octets once decoded.
pub fn character_strings(rtype: RecordType, content: &str) -> Result<Vec<CharacterString>> {
    let bytes = content.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i].is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let quoted = bytes[i] == b'"';
        if quoted {
            i += 1;
        }

        let mut value = Vec::new();
        let mut closed = !quoted;
        while i < bytes.len() {
            let b = bytes[i];
            if quoted && b == b'"' {
                closed = true;
                i += 1;
                break;
            }
            if !quoted && b.is_ascii_whitespace() {
                break;
            }
            if !quoted && b == b'"' {
                return Err(unbalanced(rtype));
            }
            if b == b'\\' {
                let (decoded, used) = unescape(rtype, &bytes[i + 1..])?;
                value.push(decoded);
                i += 1 + used;
                continue;
            }
            value.push(b);
            i += 1;
        }

        if !closed {
            return Err(unbalanced(rtype));
        }
        if quoted && i < bytes.len() && !bytes[i].is_ascii_whitespace() {
            return Err(ValidationError::structure(
                "content",
                format!("{rtype} record strings must be separated by whitespace."),
            ));
        }
        if value.len() > MAX_CHARACTER_STRING_LENGTH {
            return Err(ValidationError::range(
                "content",
                format!(
                    "{rtype} record string exceeds {MAX_CHARACTER_STRING_LENGTH} characters. Split it into multiple quoted strings."
                ),
            ));
        }

        out.push(CharacterString {
            value: String::from_utf8_lossy(&value).into_owned(),
            quoted,
        });
    }

    Ok(out)
}

/// Decodes the escape following a backslash; returns the byte and how many
/// input bytes it consumed.
fn unescape(rtype: RecordType, rest: &[u8]) -> Result<(u8, usize)> {
    let bad = || {
        ValidationError::syntax(
            "content",
            format!("{rtype} record contains an invalid escape sequence."),
        )
    };

    match rest {
        [a, b, c, ..] if a.is_ascii_digit() && b.is_ascii_digit() && c.is_ascii_digit() => {
            let value = u16::from(a - b'0') * 100 + u16::from(b - b'0') * 10 + u16::from(c - b'0');
            u8::try_from(value).map(|v| (v, 3)).map_err(|_| bad())
        }
        [d, ..] if d.is_ascii_digit() => Err(bad()),
        [b, ..] => Ok((*b, 1)),
        [] => Err(bad()),
    }
}

fn unbalanced(rtype: RecordType) -> ValidationError {
    ValidationError::structure(
        "content",
        format!("{rtype} record contains unbalanced quotes."),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn values(content: &str) -> Vec<String> {
        character_strings(RecordType::TXT, content)
            .unwrap()
            .into_iter()
            .map(|s| s.value)
            .collect()
    }

    #[test]
    fn test_printable() {
        assert!(is_printable("v=spf1 -all"));
        assert!(!is_printable("tab\there"));
        assert!(!is_printable("caf\u{e9}"));
    }

    #[test]
    fn test_quoted_and_bare() {
        assert_eq!(values(r#""hello world" bare"#), ["hello world", "bare"]);
        assert_eq!(values(r#""""#), [""]);
        let parsed = character_strings(RecordType::TXT, r#"a "b""#).unwrap();
        assert!(!parsed[0].quoted);
        assert!(parsed[1].quoted);
    }

    #[test]
    fn test_escapes() {
        assert_eq!(values(r#""say \"hi\"""#), [r#"say "hi""#]);
        assert_eq!(values(r#""back\\slash""#), [r"back\slash"]);
        assert_eq!(values(r#""\065BC""#), ["ABC"]);
        assert!(character_strings(RecordType::TXT, r#""\256""#).is_err());
        assert!(character_strings(RecordType::TXT, r#""\12""#).is_err());
    }

    #[test]
    fn test_unbalanced() {
        for bad in [r#""open"#, r#"mid"quote"#, r#""a"b"#] {
            let err = character_strings(RecordType::TXT, bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Structure, "{bad}");
        }
    }

    #[test]
    fn test_string_length() {
        let ok = format!("\"{}\"", "x".repeat(255));
        let long = format!("\"{}\"", "x".repeat(256));
        assert!(character_strings(RecordType::TXT, &ok).is_ok());
        assert_eq!(
            character_strings(RecordType::TXT, &long).unwrap_err().kind(),
            ErrorKind::Range
        );
    }
}
