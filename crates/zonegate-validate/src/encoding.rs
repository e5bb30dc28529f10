//! Hex and Base64 field checks.

use data_encoding::{BASE64, HEXLOWER_PERMISSIVE};

/// Returns true if `s` is non-empty and all hex digits, either case.
pub fn is_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Decodes hex of either case.
pub fn decode_hex(s: &str) -> Option<Vec<u8>> {
    HEXLOWER_PERMISSIVE.decode(s.as_bytes()).ok()
}

/// Decodes padded Base64, ignoring whitespace between chunks.
///
/// Presentation format lets keys and signatures span several tokens.
pub fn decode_base64<'a>(chunks: impl IntoIterator<Item = &'a str>) -> Option<Vec<u8>> {
    let joined: String = chunks
        .into_iter()
        .flat_map(str::split_ascii_whitespace)
        .collect();
    if joined.is_empty() {
        return None;
    }
    BASE64.decode(joined.as_bytes()).ok()
}
