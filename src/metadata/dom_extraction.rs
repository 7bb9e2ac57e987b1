//! DOM-based Metadata Extraction
//!
//! Title, byline, date, site name, language, excerpt and lead image taken
//! from the document tree itself. Runs after the meta tag and JSON-LD passes;
//! the title element and `html[lang]` override what those passes found,
//! everything else only fills gaps.

use dom_query::{Document, NodeRef};
use tracing::trace;

use crate::dom;
use crate::metadata::meta_tags::{normalize_byline, parse_meta_date};
use crate::patterns::{BYLINE_CLASS, BYLINE_TEXT, TITLE_COLON, TITLE_SEPARATOR};
use crate::result::Metadata;
use crate::Options;

/// Bylines are short; longer text under a byline class is an author bio.
const MAX_BYLINE_LENGTH: usize = 100;

/// Paragraphs shorter than this are not used as an excerpt.
const MIN_EXCERPT_PARAGRAPH: usize = 80;

/// Regions whose paragraphs never make a good excerpt.
const NON_ARTICLE_REGIONS: [&str; 5] = ["nav", "aside", "footer", "header", "form"];

// ============================================================
// TITLE
// ============================================================

/// Clean a raw `<title>` string.
///
/// Splits on `|`, `-` and similar separators and keeps the segment matching
/// a page heading, otherwise the longest one. A colon only splits when the
/// part after it is itself a page heading.
#[must_use]
pub fn clean_title(raw: &str, headings: &[String]) -> String {
    let raw = dom::normalize_whitespace(raw);

    let parts: Vec<&str> = TITLE_SEPARATOR
        .split(&raw)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() > 1 {
        if let Some(part) = parts.iter().find(|p| headings.iter().any(|h| h == *p)) {
            return (*part).to_string();
        }
        let mut longest = parts[0];
        for part in &parts[1..] {
            if part.chars().count() > longest.chars().count() {
                longest = part;
            }
        }
        // Keep the whole title when every segment is too short to stand alone
        if longest.chars().count() >= 10 {
            return longest.to_string();
        }
        return raw;
    }

    if let Some(colon) = TITLE_COLON.find(&raw) {
        let after = raw[colon.end()..].trim();
        if headings.iter().any(|h| h == after) {
            return after.to_string();
        }
    }

    raw
}

/// Normalized text of the page's `h1` and `h2` elements.
fn headings(doc: &Document) -> Vec<String> {
    doc.select("h1, h2")
        .nodes()
        .iter()
        .map(dom::text)
        .filter(|h| !h.is_empty())
        .collect()
}

/// Title from the `<title>` element, else the first `h1`.
///
/// Keeps the existing title (Open Graph or JSON-LD) when neither exists.
#[must_use]
pub fn extract_dom_title(doc: &Document, original: Metadata, _opts: &Options) -> Metadata {
    let mut result = original;
    let headings = headings(doc);

    let from_title = doc
        .select("title")
        .nodes()
        .first()
        .map(|title| clean_title(&title.text(), &headings))
        .filter(|t| !t.is_empty());

    let from_h1 = || {
        doc.select("body h1")
            .nodes()
            .iter()
            .map(dom::text)
            .find(|t| !t.is_empty())
    };

    if let Some(title) = from_title.or_else(from_h1) {
        result.title = title;
    }
    result
}

// ============================================================
// BYLINE
// ============================================================

/// Byline from `rel="author"` / `itemprop="author"` markup, else from a
/// short byline-like text near the top of the page.
#[must_use]
pub fn extract_dom_author(doc: &Document, original: Metadata, opts: &Options) -> Metadata {
    let mut result = original;
    if result.byline.is_some() {
        return result;
    }

    result.byline = structured_author(doc).or_else(|| heuristic_author(doc, opts));
    result
}

fn structured_author(doc: &Document) -> Option<String> {
    for node in doc.select(r#"[rel~="author"], [itemprop~="author"]"#).nodes() {
        if node.has_name("link") || node.has_name("meta") {
            if let Some(name) = dom::attr(node, "content").or_else(|| dom::attr(node, "title")) {
                if let Some(name) = normalize_byline(&name) {
                    return Some(name);
                }
            }
            continue;
        }

        let text = node
            .descendants_it()
            .find(|d| d.is_element() && d.attr("itemprop").is_some_and(|p| p.trim() == "name"))
            .map_or_else(|| dom::text(node), |name| dom::text(&name));
        if let Some(name) = normalize_byline(&text) {
            return Some(name);
        }
    }
    None
}

fn heuristic_author(doc: &Document, opts: &Options) -> Option<String> {
    let body = doc.body()?;
    let text_bearing = dom::element_descendants(&body)
        .into_iter()
        .filter(|node| !dom::direct_text(node).is_empty())
        .take(opts.max_metadata_elements);

    for node in text_bearing {
        // The byline class may sit on a wrapper around the text node
        let labelled = std::iter::once(node)
            .chain(node.ancestors_it(Some(2)))
            .find(|n| n.is_element() && BYLINE_CLASS.is_match(&dom::class_and_id(n)));

        let text = dom::text(&labelled.unwrap_or(node));
        if text.is_empty() || text.chars().count() > MAX_BYLINE_LENGTH {
            continue;
        }

        if let Some(caps) = BYLINE_TEXT.captures(&text) {
            if let Some(name) = normalize_byline(&caps[1]) {
                trace!(%name, "byline from text pattern");
                return Some(name);
            }
        }

        if labelled.is_some() {
            let first_segment = text.split(['|', '·', '•', ',']).next().unwrap_or_default();
            if let Some(name) = normalize_byline(first_segment) {
                trace!(%name, "byline from byline class");
                return Some(name);
            }
        }
    }
    None
}

// ============================================================
// DATE
// ============================================================

/// Publication date from `itemprop="datePublished"` or `time[datetime]`.
#[must_use]
pub fn extract_dom_date(doc: &Document, original: Metadata, _opts: &Options) -> Metadata {
    let mut result = original;
    if result.published.is_some() {
        return result;
    }

    let itemprop = doc.select(r#"[itemprop="datePublished"]"#);
    let times = doc.select("time[datetime]");
    result.published = itemprop
        .nodes()
        .iter()
        .chain(times.nodes())
        .find_map(|node| {
            dom::attr(node, "datetime")
                .or_else(|| dom::attr(node, "content"))
                .or_else(|| Some(dom::text(node)))
                .and_then(|value| parse_meta_date(&value))
        });
    result
}

// ============================================================
// SITE NAME
// ============================================================

/// Site name from the `<title>` segment that is not the article title.
#[must_use]
pub fn extract_dom_sitename(doc: &Document, original: Metadata, _opts: &Options) -> Metadata {
    let mut result = original;
    if result.site_name.is_some() {
        return result;
    }

    let Some(raw) = doc.select("title").nodes().first().map(dom::text) else {
        return result;
    };
    let parts: Vec<&str> = TITLE_SEPARATOR
        .split(&raw)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() < 2 {
        return result;
    }

    result.site_name = parts
        .iter()
        .rev()
        .find(|p| **p != result.title && (3..50).contains(&p.chars().count()))
        .map(|p| (*p).to_string());
    result
}

// ============================================================
// LANGUAGE, EXCERPT, IMAGE
// ============================================================

/// Language from `html[lang]`, which takes precedence over `og:locale`.
#[must_use]
pub fn extract_dom_language(doc: &Document, original: Metadata, _opts: &Options) -> Metadata {
    let mut result = original;
    if let Some(lang) = doc.select("html[lang]").nodes().first().and_then(|html| dom::attr(html, "lang")) {
        result.language = Some(lang);
    }
    result
}

/// Excerpt from the first substantial paragraph, cut on a word boundary.
#[must_use]
pub fn extract_dom_excerpt(doc: &Document, original: Metadata, opts: &Options) -> Metadata {
    let mut result = original;
    if result.excerpt.is_some() {
        return result;
    }

    result.excerpt = doc
        .select("body p")
        .nodes()
        .iter()
        .filter(|p| !in_non_article_region(p))
        .map(dom::text)
        .find(|text| text.chars().count() >= MIN_EXCERPT_PARAGRAPH)
        .map(|text| truncate_words(&text, opts.excerpt_length));
    result
}

fn in_non_article_region(node: &NodeRef) -> bool {
    node.ancestors_it(None)
        .any(|a| NON_ARTICLE_REGIONS.contains(&dom::tag_name(&a).as_str()))
}

/// Truncate to at most `max_chars` characters without splitting a word.
/// Appends an ellipsis when anything was cut.
#[must_use]
pub fn truncate_words(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let mut out = String::new();
    for word in text.split_whitespace() {
        let extra = usize::from(!out.is_empty()) + word.chars().count();
        if out.chars().count() + extra > max_chars {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    if out.is_empty() {
        out = text.chars().take(max_chars).collect();
    }
    let trimmed = out.trim_end_matches(|c: char| c.is_ascii_punctuation()).to_string();
    format!("{trimmed}…")
}

/// Lead image from the largest `img` with explicit `width` and `height`.
#[must_use]
pub fn extract_dom_image(doc: &Document, original: Metadata, _opts: &Options) -> Metadata {
    let mut result = original;
    if result.lead_image.is_some() {
        return result;
    }

    let mut best: Option<(u64, String)> = None;
    for img in doc.select("body img").nodes() {
        let (Some(width), Some(height)) = (dimension(img, "width"), dimension(img, "height")) else {
            continue;
        };
        let Some(src) = dom::attr(img, "src")
            .filter(|s| !s.starts_with("data:"))
            .or_else(|| dom::attr(img, "data-src"))
        else {
            continue;
        };
        let area = width.saturating_mul(height);
        if best.as_ref().is_none_or(|(best_area, _)| area > *best_area) {
            best = Some((area, src));
        }
    }

    result.lead_image = best.map(|(_, src)| src);
    result
}

/// A positive pixel dimension attribute such as `640` or `640px`.
fn dimension(img: &NodeRef, name: &str) -> Option<u64> {
    let value = dom::attr(img, name)?;
    value
        .trim_end_matches("px")
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|v| *v > 0)
}
