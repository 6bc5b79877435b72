//! Encoding helpers shared by the signing modules.

use base64::Engine;
use std::fmt::Write;

/// Encode bytes as lowercase hexadecimal string.
pub fn hex_encode(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        write!(s, "{:02x}", byte).unwrap();
    }
    s
}

/// Percent-encode a string according to RFC 3986.
///
/// Unreserved characters (A-Z, a-z, 0-9, `-`, `_`, `.`, `~`) are not encoded.
/// All other bytes are encoded as `%XX` where XX is the uppercase hex value.
pub fn percent_encode(s: &str) -> String {
    let mut result = String::with_capacity(s.len() * 3);
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(byte as char);
            }
            _ => {
                write!(result, "%{:02X}", byte).unwrap();
            }
        }
    }
    result
}

/// Percent-encode a URL path, preserving forward slashes.
///
/// Like [`percent_encode`], but keeps `/` characters unencoded to preserve
/// the path hierarchy in object keys.
pub fn percent_encode_path(path: &str) -> String {
    percent_encode(path).replace("%2F", "/")
}

/// Encode bytes with the standard base64 alphabet (with padding).
pub fn base64_standard(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Encode bytes with the URL-safe base64 alphabet (with padding).
///
/// Token-based verifiers use the `-`/`_` alphabet and keep the `=` padding.
pub fn base64_url_safe(bytes: &[u8]) -> String {
    base64::engine::general_purpose::URL_SAFE.encode(bytes)
}
