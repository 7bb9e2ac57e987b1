//! JSON-LD Metadata Parsing
//!
//! Schema.org blocks live in `<script type="application/ld+json">`, which the
//! preprocessor strips. [`collect_json_ld`] therefore runs on the raw tree
//! first; [`extract_json_ld`] later reads the collected values.

use dom_query::Document;
use serde_json::{Map, Value};
use tracing::trace;

use crate::dom;
use crate::metadata::meta_tags::{normalize_byline, parse_meta_date};
use crate::result::Metadata;
use crate::Options;

/// Collect every JSON-LD block that parses as JSON, in document order.
#[must_use]
pub fn collect_json_ld(doc: &Document) -> Vec<Value> {
    let mut blocks = Vec::new();
    for script in doc.select("script[type]").nodes() {
        let is_json_ld = script
            .attr("type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("application/ld+json"));
        if !is_json_ld {
            continue;
        }
        let text = script.text();
        match serde_json::from_str::<Value>(text.trim()) {
            Ok(value) => blocks.push(value),
            Err(err) => trace!(%err, "skipping malformed JSON-LD block"),
        }
    }
    blocks
}

/// Fill missing metadata fields from article-like JSON-LD objects.
///
/// Reads `headline`, `author`, `datePublished`, `publisher`, `image` and
/// `description` of the first article object that has each of them.
#[must_use]
pub fn extract_json_ld(blocks: &[Value], original: Metadata, _opts: &Options) -> Metadata {
    let mut result = original;

    let mut articles = Vec::new();
    for block in blocks {
        collect_articles(block, &mut articles);
    }

    for article in articles {
        if result.title.is_empty() {
            if let Some(headline) = string_value(article, "headline").or_else(|| string_value(article, "name")) {
                result.title = headline;
            }
        }

        if result.byline.is_none() {
            result.byline = article.get("author").and_then(author_names);
        }

        if result.published.is_none() {
            result.published = string_value(article, "datePublished").and_then(|d| parse_meta_date(&d));
        }

        if result.site_name.is_none() {
            result.site_name = article.get("publisher").and_then(entity_name);
        }

        if result.lead_image.is_none() {
            result.lead_image = article.get("image").and_then(image_url);
        }

        if result.excerpt.is_none() {
            result.excerpt = string_value(article, "description");
        }
    }

    result
}

/// Walk objects, arrays and `@graph` lists for article-typed objects.
fn collect_articles<'a>(value: &'a Value, out: &mut Vec<&'a Map<String, Value>>) {
    match value {
        Value::Object(map) => {
            if schema_types(map).iter().any(|t| is_article_type(t)) {
                out.push(map);
            }
            if let Some(graph) = map.get("@graph") {
                collect_articles(graph, out);
            }
            if let Some(main) = map.get("mainEntity") {
                collect_articles(main, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_articles(item, out);
            }
        }
        _ => {}
    }
}

/// Lowercased `@type` values of an object.
fn schema_types(map: &Map<String, Value>) -> Vec<String> {
    match map.get("@type") {
        Some(Value::String(t)) => vec![t.to_lowercase()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_lowercase)
            .collect(),
        _ => Vec::new(),
    }
}

fn is_article_type(schema_type: &str) -> bool {
    schema_type.ends_with("article")
        || schema_type.ends_with("posting")
        || schema_type == "report"
        || schema_type == "webpage"
}

fn string_value(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .map(dom::normalize_whitespace)
        .filter(|s| !s.is_empty())
}

/// `name` of an entity given as a string or an object.
fn entity_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(dom::normalize_whitespace(s)).filter(|s| !s.is_empty()),
        Value::Object(map) => string_value(map, "name"),
        Value::Array(items) => items.iter().find_map(entity_name),
        _ => None,
    }
}

/// Author names joined with ", ". Invalid names are skipped.
fn author_names(value: &Value) -> Option<String> {
    let candidates: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    let mut names: Vec<String> = Vec::new();
    for candidate in candidates {
        let name = match candidate {
            Value::Object(map) => string_value(map, "name").or_else(|| {
                let given = string_value(map, "givenName").unwrap_or_default();
                let family = string_value(map, "familyName").unwrap_or_default();
                Some(format!("{given} {family}").trim().to_string()).filter(|n| !n.is_empty())
            }),
            other => entity_name(other),
        };
        if let Some(name) = name.as_deref().and_then(normalize_byline) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }

    (!names.is_empty()).then(|| names.join(", "))
}

/// First image URL from a string, an `ImageObject` or a list of either.
fn image_url(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Object(map) => string_value(map, "url").or_else(|| string_value(map, "contentUrl")),
        Value::Array(items) => items.iter().find_map(image_url),
        _ => None,
    }
}
