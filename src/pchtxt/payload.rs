// Value token decoding: quoted text or hex byte string.

use super::LineError;

/// Decode a patch value token into raw bytes.
///
/// `"..."` tokens are unescaped (`\n`, `\0`) and taken as UTF-8; anything
/// else is a hex byte string with whitespace ignored.
pub fn decode_value(token: &str) -> Result<Vec<u8>, LineError> {
    match quoted_inner(token) {
        Some(text) => Ok(unescape(text)),
        None => decode_hex(token),
    }
}

fn quoted_inner(token: &str) -> Option<&str> {
    if token.len() < 2 {
        return None;
    }
    token.strip_prefix('"')?.strip_suffix('"')
}

/// Expand `\n` and `\0`. Any other backslash is kept as-is.
pub fn unescape(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut buf = [0u8; 4];

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some('n') => {
                    chars.next();
                    out.push(b'\n');
                    continue;
                }
                Some('0') => {
                    chars.next();
                    out.push(0);
                    continue;
                }
                _ => {}
            }
        }
        out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    }
    out
}

/// Hex byte string, case-insensitive, whitespace anywhere.
pub fn decode_hex(token: &str) -> Result<Vec<u8>, LineError> {
    let digits: String = token.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&digits).map_err(|source| LineError::BadHex {
        token: token.to_string(),
        source,
    })
}
