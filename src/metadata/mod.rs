//! Metadata extraction module.
//!
//! Title, byline, publication date, site name, excerpt, lead image and
//! language, read independently of body extraction. Sources are chained:
//! each step takes the metadata so far and fills what it can.

pub mod dom_extraction;
pub mod json_ld;
pub mod meta_tags;

use dom_query::Document;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::result::Metadata;
use crate::url_utils::create_absolute_url;
use crate::Options;

pub use dom_extraction::{clean_title, truncate_words};
pub use json_ld::collect_json_ld;
pub use meta_tags::{normalize_byline, parse_meta_date, validate_metadata_name};

/// Extract all metadata from a document.
///
/// `json_ld` holds the blocks gathered by [`collect_json_ld`] before
/// preprocessing removed the scripts that carried them.
///
/// Order of sources:
/// 1. HTML meta tags (standard, Open Graph, Twitter, Dublin Core)
/// 2. JSON-LD article objects
/// 3. The document tree (title element, bylines, `time`, images)
#[must_use]
pub fn extract_metadata(doc: &Document, json_ld: &[Value], base_url: &Url, opts: &Options) -> Metadata {
    let mut metadata = Metadata::default();

    metadata = meta_tags::examine_meta(doc, metadata, opts);
    metadata = json_ld::extract_json_ld(json_ld, metadata, opts);

    metadata = dom_extraction::extract_dom_title(doc, metadata, opts);
    metadata = dom_extraction::extract_dom_author(doc, metadata, opts);
    metadata = dom_extraction::extract_dom_date(doc, metadata, opts);
    metadata = dom_extraction::extract_dom_sitename(doc, metadata, opts);
    metadata = dom_extraction::extract_dom_language(doc, metadata, opts);
    metadata = dom_extraction::extract_dom_excerpt(doc, metadata, opts);
    metadata = dom_extraction::extract_dom_image(doc, metadata, opts);

    metadata = post_process_metadata(metadata, base_url, opts);

    debug!(
        title = %metadata.title,
        byline = metadata.byline.is_some(),
        published = metadata.published.is_some(),
        site_name = metadata.site_name.is_some(),
        excerpt = metadata.excerpt.is_some(),
        lead_image = metadata.lead_image.is_some(),
        "extracted metadata"
    );
    metadata
}

/// Final cleanup: blacklist, whitespace, absolute lead image.
fn post_process_metadata(mut metadata: Metadata, base_url: &Url, opts: &Options) -> Metadata {
    if metadata
        .byline
        .as_deref()
        .is_some_and(|author| opts.is_blacklisted_author(author))
    {
        metadata.byline = None;
    }

    metadata.site_name = tidy(metadata.site_name);
    metadata.excerpt = tidy(metadata.excerpt);
    metadata.language = tidy(metadata.language);

    metadata.lead_image = tidy(metadata.lead_image).map(|src| create_absolute_url(&src, base_url));

    metadata
}

fn tidy(value: Option<String>) -> Option<String> {
    value
        .map(|v| crate::dom::normalize_whitespace(&v))
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn base() -> Url {
        Url::parse("https://news.example.com/2024/story").unwrap()
    }

    fn extract(html: &str, opts: &Options) -> Metadata {
        let doc = Document::from(html);
        let blocks = collect_json_ld(&doc);
        extract_metadata(&doc, &blocks, &base(), opts)
    }

    #[test]
    fn test_full_chain() {
        let html = r#"<!DOCTYPE html>
        <html lang="en">
        <head>
            <title>Markets Rally After Long Slump | Example News</title>
            <meta property="og:image" content="/img/lead.jpg">
            <meta name="description" content="  Stocks   rose.  ">
            <script type="application/ld+json">
            {"@type":"NewsArticle","author":{"name":"Jane Doe"},"datePublished":"2024-05-01"}
            </script>
        </head>
        <body><h1>Markets Rally After Long Slump</h1><p>Text.</p></body>
        </html>"#;
        let md = extract(html, &Options::default());
        assert_eq!(md.title, "Markets Rally After Long Slump");
        assert_eq!(md.site_name.as_deref(), Some("Example News"));
        assert_eq!(md.byline.as_deref(), Some("Jane Doe"));
        assert_eq!(md.published.unwrap().month(), 5);
        assert_eq!(md.excerpt.as_deref(), Some("Stocks rose."));
        assert_eq!(md.lead_image.as_deref(), Some("https://news.example.com/img/lead.jpg"));
        assert_eq!(md.language.as_deref(), Some("en"));
    }

    #[test]
    fn test_author_blacklist() {
        let html = r#"<head><meta name="author" content="Staff Reporter"></head><body></body>"#;
        let opts = Options {
            author_blacklist: Some(vec!["staff reporter".to_string()]),
            ..Options::default()
        };
        assert!(extract(html, &opts).byline.is_none());
        assert_eq!(extract(html, &Options::default()).byline.as_deref(), Some("Staff Reporter"));
    }

    #[test]
    fn test_empty_document() {
        let md = extract("", &Options::default());
        assert_eq!(md.title, "");
        assert!(md.byline.is_none());
        assert!(md.lead_image.is_none());
    }
}
