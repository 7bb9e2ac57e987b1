//! Character encoding detection and decoding.
//!
//! Raw page bytes are turned into UTF-8 text by trying, in order: a byte
//! order mark, the encoding declared by the fetch collaborator, a charset
//! declared in the document's own `<meta>` tags, strict UTF-8, and finally
//! windows-1252. Each attempt decodes strictly and must produce text that
//! looks like text; if none does, decoding fails with
//! [`Error::EncodingError`].

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Match `<meta charset="...">` tag
#[allow(clippy::expect_used)]
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>;/]+)"#).expect("valid regex")
});

/// Match `<meta http-equiv="Content-Type" content="...; charset=...">` tag
#[allow(clippy::expect_used)]
static CONTENT_TYPE_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>;]+)"#).expect("valid regex")
});

/// Bytes examined when sniffing a `<meta>` charset.
const SNIFF_LIMIT: usize = 1024;

/// Maximum share of control characters tolerated in decoded text.
const MAX_CONTROL_RATIO: f64 = 0.1;

/// Detect the charset declared inside the document itself.
///
/// Looks at `<meta charset>` first, then at the `http-equiv` form. Only
/// the first 1024 bytes are examined. A document that can be read as ASCII
/// is not UTF-16, so UTF-16 and `replacement` labels resolve to UTF-8.
#[must_use]
pub fn sniff_meta_charset(html: &[u8]) -> Option<&'static Encoding> {
    let head = &html[..html.len().min(SNIFF_LIMIT)];
    let head_str = String::from_utf8_lossy(head);

    [&*CHARSET_META_RE, &*CONTENT_TYPE_CHARSET_RE]
        .into_iter()
        .filter_map(|re| re.captures(&head_str).and_then(|c| c.get(1)))
        .find_map(|m| Encoding::for_label(m.as_str().trim().as_bytes()))
        .map(Encoding::output_encoding)
}

/// Decode page bytes into UTF-8 text.
///
/// `declared` is the label reported out of band (for example an HTTP
/// `Content-Type` charset). Unknown labels are ignored rather than fatal.
///
/// # Examples
///
/// ```
/// use reeeed::encoding::decode;
///
/// let text = decode(b"<p>Caf\xE9</p>", Some("iso-8859-1")).unwrap();
/// assert_eq!(text, "<p>Café</p>");
/// ```
pub fn decode(bytes: &[u8], declared: Option<&str>) -> Result<String> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        if let Some(text) = try_decode(encoding, &bytes[bom_len..]) {
            debug!(encoding = encoding.name(), source = "bom", "decoded document");
            return Ok(text);
        }
    }

    let declared = declared.and_then(|label| Encoding::for_label(label.trim().as_bytes()));
    let attempts = [
        (declared, "declared"),
        (sniff_meta_charset(bytes), "meta"),
        (Some(UTF_8), "utf-8 fallback"),
        (Some(WINDOWS_1252), "windows-1252 fallback"),
    ];

    for (encoding, source) in attempts {
        let Some(encoding) = encoding else { continue };
        match try_decode(encoding, bytes) {
            Some(text) => {
                debug!(encoding = encoding.name(), source, "decoded document");
                return Ok(text);
            }
            None => trace!(encoding = encoding.name(), source, "decoding attempt rejected"),
        }
    }

    Err(Error::EncodingError(format!(
        "no viable decoding for {} bytes of input",
        bytes.len()
    )))
}

/// Strictly decode with one encoding and check the result is text.
fn try_decode(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    let text = encoding.decode_without_bom_handling_and_without_replacement(bytes)?;
    is_viable_text(&text).then(|| Cow::into_owned(text))
}

/// Reject decodings that are plainly binary data.
fn is_viable_text(text: &str) -> bool {
    let mut total = 0usize;
    let mut control = 0usize;
    for c in text.chars() {
        if c == '\0' {
            return false;
        }
        total += 1;
        if c.is_control() && !matches!(c, '\t' | '\n' | '\r' | '\x0c') {
            control += 1;
        }
    }
    total == 0 || (control as f64) / (total as f64) <= MAX_CONTROL_RATIO
}
