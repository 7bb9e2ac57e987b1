//! Result types for extraction output.
//!
//! A [`ReadableDoc`] is built once at the end of a successful pipeline run
//! and never changes afterwards. Rendering borrows it, so one extraction can
//! be re-themed any number of times without fetching or parsing again.

use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;

use crate::extractor::CleanedContent;
use crate::render;
use crate::theme::Theme;

/// Metadata extracted from an HTML document.
///
/// Everything except the title is optional; the title is empty when the
/// page offers none.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metadata {
    /// Article title, with any site name suffix removed.
    pub title: String,

    /// Author name(s), normalized.
    pub byline: Option<String>,

    /// Publication date.
    pub published: Option<DateTime<Utc>>,

    /// Name of the publishing site.
    pub site_name: Option<String>,

    /// Short summary of the article.
    pub excerpt: Option<String>,

    /// Absolute URL of the lead image.
    pub lead_image: Option<String>,

    /// Document language, e.g. `en` or `en-US`.
    pub language: Option<String>,
}

/// The readable document produced by a successful extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadableDoc {
    url: Url,
    metadata: Metadata,
    content_html: String,
    content_text: String,
}

impl ReadableDoc {
    pub(crate) fn new(url: Url, metadata: Metadata, content: CleanedContent) -> Self {
        Self {
            url,
            metadata,
            content_html: content.html,
            content_text: content.text,
        }
    }

    /// Resolved source URL; also the base URL of every link in the content.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// All extracted metadata.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Article title; empty when the page has none.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    /// Author name(s).
    #[must_use]
    pub fn byline(&self) -> Option<&str> {
        self.metadata.byline.as_deref()
    }

    /// Publication date.
    #[must_use]
    pub fn published(&self) -> Option<DateTime<Utc>> {
        self.metadata.published
    }

    /// Name of the publishing site.
    #[must_use]
    pub fn site_name(&self) -> Option<&str> {
        self.metadata.site_name.as_deref()
    }

    /// Short summary of the article.
    #[must_use]
    pub fn excerpt(&self) -> Option<&str> {
        self.metadata.excerpt.as_deref()
    }

    /// Absolute URL of the lead image.
    #[must_use]
    pub fn lead_image(&self) -> Option<&str> {
        self.metadata.lead_image.as_deref()
    }

    /// Document language tag.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.metadata.language.as_deref()
    }

    /// Cleaned article content as an HTML fragment.
    #[must_use]
    pub fn content_html(&self) -> &str {
        &self.content_html
    }

    /// Cleaned article content as plain text with paragraph breaks.
    #[must_use]
    pub fn content_text(&self) -> &str {
        &self.content_text
    }

    /// Render the document as a complete themed HTML page.
    ///
    /// Same as [`render::render`]. Never fails.
    #[must_use]
    pub fn html(&self, theme: &Theme, include_exit_reader: bool) -> String {
        render::render(self, theme, include_exit_reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_expose_metadata() {
        let metadata = Metadata {
            title: "Headline".to_string(),
            byline: Some("Jane Doe".to_string()),
            ..Metadata::default()
        };
        let doc = ReadableDoc::new(
            Url::parse("https://example.com/a").unwrap(),
            metadata,
            CleanedContent { html: "<p>Body</p>".to_string(), text: "Body".to_string() },
        );
        assert_eq!(doc.title(), "Headline");
        assert_eq!(doc.byline(), Some("Jane Doe"));
        assert_eq!(doc.site_name(), None);
        assert_eq!(doc.content_html(), "<p>Body</p>");
        assert_eq!(doc.content_text(), "Body");
        assert_eq!(doc.url().as_str(), "https://example.com/a");
    }

    #[test]
    fn test_metadata_serializes_to_json() {
        let metadata = Metadata { title: "T".to_string(), ..Metadata::default() };
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["title"], "T");
        assert!(json["byline"].is_null());
    }
}
