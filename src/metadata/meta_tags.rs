//! HTML Meta Tag Extraction
//!
//! Reads standard `<meta>` names, Open Graph properties, Twitter cards,
//! Dublin Core and schema.org `itemprop` tags from the document head.
//! Also home to the name and date validators shared by the other sources.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use dom_query::Document;

use crate::dom;
use crate::patterns::BYLINE_PREFIX;
use crate::result::Metadata;
use crate::Options;

/// First value seen for each meta key family.
#[derive(Debug, Default)]
struct MetaValues {
    og_title: Option<String>,
    twitter_title: Option<String>,
    author: Option<String>,
    published: Option<DateTime<Utc>>,
    description: Option<String>,
    og_description: Option<String>,
    twitter_description: Option<String>,
    site_name: Option<String>,
    og_image: Option<String>,
    twitter_image: Option<String>,
    locale: Option<String>,
}

/// Examine HTML meta tags for metadata.
///
/// Only fills fields that are still empty. Within the meta tags, a plain
/// `description` beats `og:description`, and `og:image` beats `twitter:image`.
#[must_use]
pub fn examine_meta(doc: &Document, original: Metadata, _opts: &Options) -> Metadata {
    let mut result = original;
    let mut values = MetaValues::default();

    for node in doc.select("meta").nodes() {
        let key = dom::attr(node, "property")
            .or_else(|| dom::attr(node, "name"))
            .or_else(|| dom::attr(node, "itemprop"))
            .or_else(|| dom::attr(node, "http-equiv"))
            .unwrap_or_default()
            .to_ascii_lowercase();
        let Some(content) = dom::attr(node, "content") else {
            continue;
        };

        match key.as_str() {
            "og:title" => keep_first(&mut values.og_title, &content),
            "twitter:title" => keep_first(&mut values.twitter_title, &content),

            "author" | "article:author" | "dc.creator" | "dcterms.creator" | "byl"
            | "parsely-author" | "sailthru.author" | "citation_author" => {
                if values.author.is_none() {
                    values.author = normalize_byline(&content);
                }
            }

            "article:published_time" | "og:article:published_time" | "datepublished"
            | "date" | "dc.date" | "dc.date.issued" | "dcterms.created" | "pubdate"
            | "publish-date" | "parsely-pub-date" | "sailthru.date" | "citation_publication_date" => {
                if values.published.is_none() {
                    values.published = parse_meta_date(&content);
                }
            }

            "description" | "dc.description" => keep_first(&mut values.description, &content),
            "og:description" => keep_first(&mut values.og_description, &content),
            "twitter:description" => keep_first(&mut values.twitter_description, &content),

            "og:site_name" | "application-name" => keep_first(&mut values.site_name, &content),

            "og:image" | "og:image:url" | "og:image:secure_url" => keep_first(&mut values.og_image, &content),
            "twitter:image" | "twitter:image:src" => keep_first(&mut values.twitter_image, &content),

            "og:locale" | "content-language" | "language" | "dc.language" => {
                keep_first(&mut values.locale, &content.replace('_', "-"));
            }

            _ => {}
        }
    }

    if result.title.is_empty() {
        if let Some(title) = values.og_title.or(values.twitter_title) {
            result.title = dom::normalize_whitespace(&title);
        }
    }
    result.byline = result.byline.or(values.author);
    result.published = result.published.or(values.published);
    result.site_name = result.site_name.or(values.site_name);
    result.excerpt = result
        .excerpt
        .or(values.description)
        .or(values.og_description)
        .or(values.twitter_description);
    result.lead_image = result.lead_image.or(values.og_image).or(values.twitter_image);
    result.language = result.language.or(values.locale);

    result
}

fn keep_first(slot: &mut Option<String>, value: &str) {
    if slot.is_none() {
        *slot = Some(value.to_string());
    }
}

/// Check that a string can plausibly be a person's name.
///
/// Rejects URLs, JSON blobs, identifiers with many digits and strings
/// full of punctuation.
#[must_use]
pub fn validate_metadata_name(name: &str) -> bool {
    let name = name.trim();
    let length = name.chars().count();

    if !(2..=120).contains(&length) {
        return false;
    }

    // One long token is a handle or a slug, not a name
    if length > 20 && !name.contains(' ') {
        return false;
    }

    let lower = name.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("www.") {
        return false;
    }
    if [".com", ".org", ".net"].iter().any(|tld| lower.contains(tld)) {
        return false;
    }

    if name.starts_with('{') || name.starts_with('[') {
        return false;
    }

    if name.chars().filter(char::is_ascii_digit).count() > 3 {
        return false;
    }

    let special = name
        .chars()
        .filter(|c| !c.is_alphanumeric() && !c.is_whitespace() && !matches!(c, '-' | '\'' | '.' | ','))
        .count();
    special <= 2
}

/// Normalize a byline: strip a leading "By", collapse whitespace, and
/// drop trailing separators. Returns `None` when what is left is not a name.
#[must_use]
pub fn normalize_byline(raw: &str) -> Option<String> {
    let collapsed = dom::normalize_whitespace(raw);
    let stripped = BYLINE_PREFIX.replace(&collapsed, "");
    let name = stripped
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '|' | '·' | '•' | ':' | '-'))
        .to_string();

    validate_metadata_name(&name).then_some(name)
}

/// Parse a date string from meta tags, JSON-LD or DOM attributes.
///
/// Supports RFC 3339, RFC 2822, naive ISO 8601 timestamps and common
/// date-only formats. Returns `None` for anything else.
#[must_use]
pub fn parse_meta_date(date_str: &str) -> Option<DateTime<Utc>> {
    let date_str = date_str.trim();
    if date_str.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(date_str) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, fmt) {
            return Some(dt.and_utc());
        }
    }

    let formats = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%d/%m/%Y",
        "%B %d, %Y", // January 15, 2024
        "%b %d, %Y", // Jan 15, 2024
        "%d %B %Y",  // 15 January 2024
    ];
    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(date_str, fmt) {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn examine(html: &str) -> Metadata {
        let doc = Document::from(html);
        examine_meta(&doc, Metadata::default(), &Options::default())
    }

    #[test]
    fn test_standard_meta_tags() {
        let md = examine(
            r#"<html><head>
            <meta name="author" content="By  Jane   Doe">
            <meta name="description" content="A test article.">
            <meta name="application-name" content="Example News">
            </head><body></body></html>"#,
        );
        assert_eq!(md.byline.as_deref(), Some("Jane Doe"));
        assert_eq!(md.excerpt.as_deref(), Some("A test article."));
        assert_eq!(md.site_name.as_deref(), Some("Example News"));
    }

    #[test]
    fn test_open_graph_tags() {
        let md = examine(
            r#"<html><head>
            <meta property="og:title" content="OG Headline">
            <meta property="og:description" content="OG summary.">
            <meta property="og:site_name" content="The Site">
            <meta property="og:image" content="/img/lead.jpg">
            <meta property="og:locale" content="en_GB">
            <meta property="article:published_time" content="2024-03-05T10:30:00+01:00">
            </head></html>"#,
        );
        assert_eq!(md.title, "OG Headline");
        assert_eq!(md.excerpt.as_deref(), Some("OG summary."));
        assert_eq!(md.site_name.as_deref(), Some("The Site"));
        assert_eq!(md.lead_image.as_deref(), Some("/img/lead.jpg"));
        assert_eq!(md.language.as_deref(), Some("en-GB"));
        let published = md.published.unwrap();
        assert_eq!((published.year(), published.month(), published.day()), (2024, 3, 5));
        assert_eq!(published.hour(), 9);
    }

    #[test]
    fn test_description_beats_open_graph_and_og_image_beats_twitter() {
        let md = examine(
            r#"<head>
            <meta name="twitter:image" content="https://cdn.example.com/t.jpg">
            <meta property="og:description" content="OG summary.">
            <meta name="description" content="Plain summary.">
            <meta property="og:image" content="https://cdn.example.com/og.jpg">
            </head>"#,
        );
        assert_eq!(md.excerpt.as_deref(), Some("Plain summary."));
        assert_eq!(md.lead_image.as_deref(), Some("https://cdn.example.com/og.jpg"));
    }

    #[test]
    fn test_url_author_is_ignored() {
        let md = examine(
            r#"<head>
            <meta property="article:author" content="https://www.facebook.com/someone">
            <meta name="parsely-author" content="Sam Writer">
            </head>"#,
        );
        assert_eq!(md.byline.as_deref(), Some("Sam Writer"));
    }

    #[test]
    fn test_invalid_dates_are_dropped() {
        let md = examine(
            r#"<head>
            <meta name="date" content="last Tuesday">
            <meta name="pubdate" content="2023-11-02">
            </head>"#,
        );
        assert_eq!(md.published.unwrap().day(), 2);
    }

    #[test]
    fn test_preserves_existing_metadata() {
        let doc = Document::from(r#"<head><meta property="og:title" content="Other"><meta name="author" content="Someone Else"></head>"#);
        let existing = Metadata {
            title: "Kept".to_string(),
            byline: Some("Jane Doe".to_string()),
            ..Metadata::default()
        };
        let md = examine_meta(&doc, existing, &Options::default());
        assert_eq!(md.title, "Kept");
        assert_eq!(md.byline.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_validate_metadata_name() {
        assert!(validate_metadata_name("Jane Doe"));
        assert!(validate_metadata_name("J. R. R. Tolkien"));
        assert!(!validate_metadata_name("J"));
        assert!(!validate_metadata_name("https://example.com/author/jane"));
        assert!(!validate_metadata_name("{\"@type\":\"Person\"}"));
        assert!(!validate_metadata_name("user_12345678"));
        assert!(!validate_metadata_name("averyveryverylongusernamewithoutspaces"));
    }

    #[test]
    fn test_normalize_byline() {
        assert_eq!(normalize_byline("By Jane Doe").as_deref(), Some("Jane Doe"));
        assert_eq!(normalize_byline("  Written by\n Jane   Doe , ").as_deref(), Some("Jane Doe"));
        assert_eq!(normalize_byline("By https://example.com/staff"), None);
    }

    #[test]
    fn test_date_parsing_formats() {
        assert!(parse_meta_date("2024-01-15T10:30:00Z").is_some());
        assert!(parse_meta_date("2024-01-15T10:30:00+0000").is_some());
        assert!(parse_meta_date("2024-01-15T10:30:00.123").is_some());
        assert!(parse_meta_date("Mon, 15 Jan 2024 10:30:00 GMT").is_some());
        assert!(parse_meta_date("2024-01-15").is_some());
        assert!(parse_meta_date("January 15, 2024").is_some());
        assert!(parse_meta_date("15 January 2024").is_some());
        assert!(parse_meta_date("not a date").is_none());
        assert!(parse_meta_date("").is_none());
    }
}
