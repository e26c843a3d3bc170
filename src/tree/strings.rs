//! Raw encode/decode of the `CHARSTAR8` string-array payload (spec §4.4):
//! concatenated NUL-terminated UTF-8 strings followed by `0x04` padding to a
//! 4-byte boundary, with at least one `0x04` always present. A legacy
//! v2/v3 encoding (single NUL-terminated string, arbitrary padding) is
//! accepted on read.

use crate::tree::payload::Payload;

const PAD_BYTE: u8 = 0x04;

/// Encodes `strings` into the on-wire string-array form.
pub fn encode(strings: &[String]) -> Vec<u8> {
    let mut buf = Vec::new();
    for s in strings {
        buf.extend_from_slice(s.as_bytes());
        buf.push(0);
    }
    let pad = (4 - (buf.len() % 4)) % 4;
    let pad = if pad == 0 { 4 } else { pad };
    for _ in 0..pad {
        buf.push(PAD_BYTE);
    }
    buf
}

pub fn encoded_len(payload: &Payload) -> usize {
    match payload {
        Payload::CharStar8 { strings, .. } => encode(strings).len(),
        _ => 0,
    }
}

/// Decodes a string-array payload. Accepts both the modern multi-string
/// form and the legacy v2/v3 single-string-then-arbitrary-padding form.
/// Marks `malformed` when a non-printable character (outside tab/newline)
/// appears before the first NUL.
pub fn decode(raw: &[u8]) -> Payload {
    let first_nul = raw.iter().position(|&b| b == 0);
    let malformed = match first_nul {
        Some(idx) => raw[..idx].iter().any(|&b| b != b'\t' && b != b'\n' && (b < 0x20 || b >= 0x7f)),
        None => true,
    };

    let mut strings = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;
    while i < raw.len() {
        if raw[i] == 0 {
            strings.push(String::from_utf8_lossy(&raw[start..i]).into_owned());
            start = i + 1;
            // Trailing padding follows the final NUL either as 0x04 bytes
            // (modern form) or plain zero bytes (legacy single-string form).
            if raw[start..].iter().all(|&b| b == PAD_BYTE || b == 0) {
                break;
            }
        }
        i += 1;
    }
    if strings.is_empty() {
        // Legacy form: no NUL found, or a single trailing string with no
        // terminator — treat the whole thing (trimmed of trailing padding)
        // as one string.
        let trimmed_end = raw.iter().rposition(|&b| b != PAD_BYTE && b != 0).map(|i| i + 1).unwrap_or(0);
        strings.push(String::from_utf8_lossy(&raw[..trimmed_end]).into_owned());
    }

    Payload::CharStar8 { strings, malformed }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let strings = vec!["alpha".to_string(), "beta".to_string()];
        let encoded = encode(&strings);
        assert_eq!(encoded.len() % 4, 0);
        match decode(&encoded) {
            Payload::CharStar8 { strings: decoded, malformed } => {
                assert!(!malformed);
                assert_eq!(decoded, strings);
            }
            _ => panic!("expected CharStar8"),
        }
    }

    #[test]
    fn always_has_trailing_pad_byte() {
        // "abc" -> "abc\0" (4 bytes, already aligned) still gets a full pad word.
        let encoded = encode(&["abc".to_string()]);
        assert_eq!(encoded.len(), 8);
        assert!(encoded.ends_with(&[PAD_BYTE, PAD_BYTE, PAD_BYTE, PAD_BYTE]));
    }

    #[test]
    fn legacy_single_string_decodes() {
        let raw = b"hello\0\0\0".to_vec();
        match decode(&raw) {
            Payload::CharStar8 { strings, .. } => assert_eq!(strings, vec!["hello".to_string()]),
            _ => panic!(),
        }
    }
}
