// ABOUTME: Decodes raw page bytes to UTF-8 before parsing.
// ABOUTME: Order: byte-order mark, then a <meta> charset declaration, then chardetng detection.

use std::borrow::Cow;

use anyhow::anyhow;
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::ExtractError;

/// Only the head of the document is searched for a charset declaration.
const PRESCAN_BYTES: usize = 1024;

static META_CHARSET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s/>;]+)"#).unwrap());

/// The charset label declared in a `<meta>` tag near the top of the page.
///
/// Covers both `<meta charset=...>` and the http-equiv
/// `content="text/html; charset=..."` form.
pub fn declared_charset(bytes: &[u8]) -> Option<String> {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(PRESCAN_BYTES)]);
    META_CHARSET_RE
        .captures(&head)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Pick the encoding for `bytes`. Returns it together with the number of
/// leading BOM bytes to skip and whether the choice was explicit.
fn sniff(bytes: &[u8]) -> (&'static Encoding, usize, bool) {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return (encoding, bom_len, true);
    }

    if let Some(encoding) = declared_charset(bytes)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        // A page can't really be utf-16 if the declaration was readable as ASCII.
        return (encoding.output_encoding(), 0, true);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    (detector.guess(None, true), 0, false)
}

/// Decode page bytes to a string.
///
/// A BOM or a declared charset is trusted strictly: bytes that are malformed
/// in that encoding are a parse error. A guessed encoding decodes lossily.
pub fn decode_html(bytes: &[u8]) -> Result<Cow<'_, str>, ExtractError> {
    let (encoding, bom_len, explicit) = sniff(bytes);
    let body = &bytes[bom_len..];
    debug!(encoding = encoding.name(), explicit, "decoding page");

    if explicit {
        return encoding
            .decode_without_bom_handling_and_without_replacement(body)
            .ok_or_else(|| {
                ExtractError::parse(
                    "decode_html",
                    anyhow!("bytes are not valid {}", encoding.name()),
                )
            });
    }

    let (decoded, _) = encoding.decode_without_bom_handling(body);
    Ok(decoded)
}
