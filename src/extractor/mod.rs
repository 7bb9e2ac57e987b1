//! Main content extraction.
//!
//! Turns a preprocessed document into cleaned article content:
//!
//! - [`scoring`](crate::scoring) ranks candidates,
//! - [`selection`] picks the best one that clears the content floors and
//!   merges its qualifying siblings,
//! - [`pruning`] cleans the merged content.
//!
//! Scoring first runs with boilerplate-named regions excluded. When that
//! pass yields nothing usable, it runs again with only the tag-based
//! exclusions, which recovers pages whose whole layout sits under a
//! wrapper with an unlucky class name.

pub mod pruning;
pub mod selection;

use tracing::debug;
use url::Url;

use crate::dom::Document;
use crate::error::{Error, Result};
use crate::scoring::score_tree;
use crate::Options;

pub use pruning::CleanedContent;

/// Select, merge and clean the article content of a preprocessed document.
///
/// Merged headings repeating `title` are left out. Fails with
/// [`Error::NoContent`] when no candidate clears the floors in either pass,
/// or when cleaning leaves no text behind.
pub fn extract_content(doc: &Document, base_url: &Url, title: &str, options: &Options) -> Result<CleanedContent> {
    let body = doc
        .body()
        .ok_or_else(|| Error::ParseError("document has no body element".to_string()))?;

    for exclude_boilerplate_names in [true, false] {
        let scores = score_tree(&body, exclude_boilerplate_names);
        let Some(top) = selection::select_candidate(&scores, options) else {
            continue;
        };

        let mut members = selection::merge_siblings(&top, &scores, options);
        selection::drop_title_headings(&mut members, title);
        let merged = selection::merged_html(&members);
        let content = pruning::clean(&merged, base_url, options);
        if !content.text.is_empty() {
            return Ok(content);
        }
        debug!(exclude_boilerplate_names, "cleaning left no text");
    }

    Err(Error::NoContent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse;
    use crate::html_processing::preprocess;

    fn base() -> Url {
        Url::parse("https://example.com/a/b").unwrap()
    }

    const PARA: &str = "Paragraph text with real sentences, a few commas, and enough words to count as content for the reader.";

    #[test]
    fn test_extracts_article_paragraphs() {
        let doc = parse(&format!(
            "<body><nav><a href='/'>Home</a></nav><article><p>{PARA}</p><p>{PARA}</p></article></body>"
        ));
        preprocess(&doc);
        let content = extract_content(&doc, &base(), "", &Options::default()).unwrap();
        assert!(content.text.contains("Paragraph text"));
        assert!(!content.text.contains("Home"));
    }

    #[test]
    fn test_second_pass_recovers_unlucky_wrapper() {
        let doc = parse(&format!(
            "<body><div class='has-sidebar'><p>{PARA}</p><p>{PARA}</p></div></body>"
        ));
        preprocess(&doc);
        let content = extract_content(&doc, &base(), "", &Options::default()).unwrap();
        assert!(content.text.contains("Paragraph text"));
    }

    #[test]
    fn test_paragraphs_directly_under_form() {
        let doc = parse(&format!(
            "<body><form id='aspnetForm' action='./story.aspx'><p>{PARA}</p><p>{PARA}</p><p>{PARA}</p><input type='hidden' name='__VIEWSTATE' value='x'></form></body>"
        ));
        preprocess(&doc);
        let content = extract_content(&doc, &base(), "", &Options::default()).unwrap();
        assert!(content.text.contains("Paragraph text"));
        assert!(!content.html.contains("<form"));
    }

    #[test]
    fn test_source_table_is_left_intact() {
        let doc = parse(&format!(
            "<body><table><tr><td>{PARA} {PARA}</td></tr></table></body>"
        ));
        preprocess(&doc);
        let content = extract_content(&doc, &base(), "", &Options::default()).unwrap();
        assert!(content.text.contains("Paragraph text"));
        assert_eq!(doc.select("td").length(), 1);
    }

    #[test]
    fn test_title_heading_is_not_repeated() {
        let doc = parse(&format!(
            "<body><h1>Budget Vote Delayed</h1><article><p>{PARA}</p></article><p>{PARA}</p></body>"
        ));
        preprocess(&doc);
        let content = extract_content(&doc, &base(), "Budget Vote Delayed", &Options::default()).unwrap();
        assert!(!content.text.contains("Budget Vote Delayed"));
    }

    #[test]
    fn test_no_content_for_empty_body() {
        let doc = parse("<html><body></body></html>");
        preprocess(&doc);
        assert!(matches!(
            extract_content(&doc, &base(), "", &Options::default()),
            Err(Error::NoContent)
        ));
    }
}
