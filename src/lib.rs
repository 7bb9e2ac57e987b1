//! # reeeed
//!
//! Reader-mode extraction for web pages.
//!
//! This library finds the article in a web page, strips navigation, ads,
//! scripts and other boilerplate, and renders what is left as a clean,
//! themable HTML page.
//!
//! ## Quick Start
//!
//! ```rust
//! use reeeed::{extract, Theme};
//! use url::Url;
//!
//! let html = r#"<html><head><title>My Article | Example</title></head>
//! <body><nav><a href="/">Home</a></nav><article>
//! <p>The first paragraph of the article has enough words, clauses, and commas to look like prose.</p>
//! <p>The second paragraph continues the story, with more detail, more words, and a closing remark.</p>
//! </article></body></html>"#;
//!
//! let base = Url::parse("https://example.com/posts/1").unwrap();
//! let doc = extract(html, &base)?;
//! assert_eq!(doc.title(), "My Article");
//! assert!(!doc.content_text().contains("Home"));
//!
//! let page = doc.html(&Theme::default(), true);
//! assert!(page.contains("<style>"));
//! # Ok::<(), reeeed::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! 1. **Decode** raw bytes ([`encoding`]) and parse with html5ever recovery ([`dom`]).
//! 2. **Preprocess** ([`html_processing`]): drop scripts, comments, hidden and empty elements.
//! 3. **Metadata** ([`metadata`]): title, byline, date, site name, excerpt, lead image.
//! 4. **Score** ([`scoring`]) paragraph-bearing containers and propagate to ancestors.
//! 5. **Select, merge and clean** the content ([`extractor`]).
//! 6. **Render** with a [`Theme`] ([`render`]), as often as the theme changes.
//!
//! Pages without enough readable content fail with [`Error::NoContent`] so the
//! caller can fall back to showing the original page.

mod error;
mod options;
mod result;

/// DOM helpers over `dom_query`.
pub mod dom;

/// Character encoding detection and strict decoding.
pub mod encoding;

/// Regex vocabularies shared by the pipeline stages.
pub mod patterns;

/// Preprocessing: removal of non-content nodes and wrapper unwrapping.
pub mod html_processing;

/// Link density measurement and testing.
pub mod link_density;

/// Candidate scoring and score propagation.
pub mod scoring;

/// Candidate selection, sibling merging and content cleaning.
pub mod extractor;

/// Metadata extraction (meta tags, JSON-LD, document tree).
pub mod metadata;

/// URL resolution against the document base URL.
pub mod url_utils;

/// Reader themes and their serialized form.
pub mod theme;

/// Themed HTML rendering.
pub mod render;

/// Asynchronous fetch-and-extract with cancellation.
pub mod fetch;

// Public API - re-exports
pub use error::{Error, FetchError, Result};
pub use options::Options;
pub use result::{Metadata, ReadableDoc};
pub use theme::{Color, Theme};
pub use url::Url;

use tracing::debug;

/// Extracts the readable content of an HTML document using default options.
///
/// `base_url` is the page's URL; relative links and images are resolved
/// against it.
pub fn extract(html: &str, base_url: &Url) -> Result<ReadableDoc> {
    extract_with_options(html, base_url, &Options::default())
}

/// Extracts the readable content of an HTML document with custom options.
///
/// # Example
///
/// ```rust
/// use reeeed::{extract_with_options, Error, Options};
/// use url::Url;
///
/// let html = "<html><body><nav><a href='/'>Home</a></nav><footer>(c) 2024</footer></body></html>";
/// let options = Options { min_text_length: 250, ..Options::default() };
/// let result = extract_with_options(html, &Url::parse("https://example.com/").unwrap(), &options);
/// assert!(matches!(result, Err(Error::NoContent)));
/// ```
pub fn extract_with_options(html: &str, base_url: &Url, options: &Options) -> Result<ReadableDoc> {
    let doc = dom::parse(html);

    // JSON-LD lives in scripts, which preprocessing removes
    let json_ld = metadata::collect_json_ld(&doc);

    let stats = html_processing::preprocess(&doc);
    debug!(
        removed = stats.removed,
        emptied = stats.emptied,
        unwrapped = stats.unwrapped,
        "preprocessed document"
    );

    let metadata = metadata::extract_metadata(&doc, &json_ld, base_url, options);
    let content = extractor::extract_content(&doc, base_url, &metadata.title, options)?;

    Ok(ReadableDoc::new(base_url.clone(), metadata, content))
}

/// Extracts the readable content of raw HTML bytes.
///
/// The bytes are decoded first: byte order mark, then `declared_encoding`
/// (typically the transport's charset), then a `<meta charset>`, then UTF-8,
/// then windows-1252. Fails with [`Error::EncodingError`] when none of these
/// gives plausible text.
///
/// # Example
///
/// ```rust
/// use reeeed::{extract_bytes, Error, Options};
/// use url::Url;
///
/// let png = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR\x00\x00\x00\x10";
/// let result = extract_bytes(png, None, &Url::parse("https://example.com/").unwrap(), &Options::default());
/// assert!(matches!(result, Err(Error::EncodingError(_))));
/// ```
pub fn extract_bytes(
    bytes: &[u8],
    declared_encoding: Option<&str>,
    base_url: &Url,
    options: &Options,
) -> Result<ReadableDoc> {
    let html = encoding::decode(bytes, declared_encoding)?;
    extract_with_options(&html, base_url, options)
}
