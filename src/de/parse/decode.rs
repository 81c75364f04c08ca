use std::borrow::Cow;

use percent_encoding::percent_decode;
use tracing::debug;

use crate::error::{DecodePart, Error, Result};

#[inline(always)]
fn is_hex(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

/// Decodes `application/x-www-form-urlencoded` text in a single pass:
/// - Replaces `+` with a space
/// - Decodes `%XX` escapes (the result is not decoded again, so `%2520`
///   yields `%20`)
/// - Converts the result to a UTF-8 string
///
/// When `strict` is false, malformed escapes such as `%ZZ` or a trailing
/// `%4` are kept literally and invalid UTF-8 is replaced with U+FFFD, so
/// decoding never fails. When `strict` is true both are errors.
pub fn decode(input: &str, part: DecodePart, strict: bool) -> Result<Cow<'_, str>> {
    let bytes = input.as_bytes();
    if !bytes.iter().any(|&b| b == b'+' || b == b'%') {
        // nothing to decode
        return Ok(Cow::Borrowed(input));
    }

    if strict {
        if let Some(position) = invalid_escape(bytes) {
            debug!(%part, position, "rejecting malformed percent-escape");
            return Err(Error::Decode { part, position });
        }
    }

    let spaced: Cow<'_, [u8]> = if bytes.contains(&b'+') {
        Cow::Owned(
            bytes
                .iter()
                .map(|&b| if b == b'+' { b' ' } else { b })
                .collect(),
        )
    } else {
        Cow::Borrowed(bytes)
    };
    let decoded: Vec<u8> = percent_decode(&spaced).collect();

    match String::from_utf8(decoded) {
        Ok(s) => Ok(Cow::Owned(s)),
        Err(e) if strict => {
            debug!(%part, "rejecting invalid utf-8");
            Err(Error::Utf8 {
                part,
                source: e.utf8_error(),
            })
        }
        Err(e) => Ok(Cow::Owned(String::from_utf8_lossy(e.as_bytes()).into_owned())),
    }
}

/// Byte offset of the first `%` not followed by two hex digits.
fn invalid_escape(bytes: &[u8]) -> Option<usize> {
    bytes.iter().enumerate().find_map(|(idx, &b)| {
        let valid = match bytes.get(idx + 1..idx + 3) {
            Some(&[h, l]) => is_hex(h) && is_hex(l),
            _ => false,
        };
        (b == b'%' && !valid).then_some(idx)
    })
}
