//! Lowercase hexadecimal rendering for digest output.

const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

/// Appends the lowercase hexadecimal form of `bytes` to `out`.
pub fn encode_hex_into(bytes: &[u8], out: &mut String) {
    out.reserve(bytes.len() * 2);
    for &byte in bytes {
        out.push(char::from(HEX_CHARS[usize::from(byte >> 4)]));
        out.push(char::from(HEX_CHARS[usize::from(byte & 0x0f)]));
    }
}

/// Returns the lowercase hexadecimal form of `bytes`.
#[must_use]
pub fn encode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    encode_hex_into(bytes, &mut out);
    out
}
