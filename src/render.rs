//! Themed HTML rendering of a readable document.
//!
//! Rendering is a pure function of the document, the theme and the exit
//! flag: the same inputs always give byte-identical output, so a theme
//! change only needs a re-render, never a re-fetch.

use crate::result::ReadableDoc;
use crate::theme::Theme;

/// Label of the link back to the original page.
const EXIT_READER_LABEL: &str = "View Original";

/// Render a readable document as a complete HTML page.
///
/// The page holds the theme's style sheet, then the theme's additional CSS
/// verbatim in a second `<style>` element, then the article: title, a
/// metadata line, the lead image when the content does not already show
/// it, and the cleaned content. With `include_exit_reader`, a link back to
/// the source URL closes the article.
#[must_use]
pub fn render(doc: &ReadableDoc, theme: &Theme, include_exit_reader: bool) -> String {
    let mut html = String::with_capacity(doc.content_html().len() + 4096);

    html.push_str("<!DOCTYPE html>\n");
    match doc.language() {
        Some(lang) => html.push_str(&format!("<html lang=\"{}\">\n", escape_html(lang))),
        None => html.push_str("<html>\n"),
    }

    html.push_str("<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let page_title = if doc.title().is_empty() {
        doc.url().as_str()
    } else {
        doc.title()
    };
    html.push_str(&format!("<title>{}</title>\n", escape_html(page_title)));
    html.push_str(&format!("<style>\n{}</style>\n", theme.to_css()));
    if let Some(css) = theme.additional_css.as_deref().filter(|css| !css.trim().is_empty()) {
        html.push_str(&format!("<style>\n{css}\n</style>\n"));
    }
    html.push_str("</head>\n<body>\n<article id=\"__reader_container\">\n");

    if !doc.title().is_empty() {
        html.push_str(&format!("<h1 id=\"__reader_title\">{}</h1>\n", escape_html(doc.title())));
    }

    let meta_line = metadata_line(doc);
    if !meta_line.is_empty() {
        html.push_str(&format!("<p id=\"__reader_meta\">{meta_line}</p>\n"));
    }

    if let Some(image) = doc.lead_image().filter(|src| !content_shows_image(doc, src)) {
        html.push_str(&format!(
            "<figure id=\"__reader_lead_image\"><img src=\"{}\" alt=\"\"></figure>\n",
            escape_html(image)
        ));
    }

    html.push_str("<div id=\"__reader_content\">\n");
    html.push_str(doc.content_html());
    html.push_str("\n</div>\n");

    if include_exit_reader {
        html.push_str(&format!(
            "<p><a id=\"__reader_exit\" href=\"{}\">{EXIT_READER_LABEL}</a></p>\n",
            escape_html(doc.url().as_str())
        ));
    }

    html.push_str("</article>\n</body>\n</html>\n");
    html
}

/// Byline, site name and date joined with a middle dot, escaped.
fn metadata_line(doc: &ReadableDoc) -> String {
    let date = doc.published().map(|d| d.format("%B %-d, %Y").to_string());
    [doc.byline(), doc.site_name(), date.as_deref()]
        .into_iter()
        .flatten()
        .map(escape_html)
        .collect::<Vec<_>>()
        .join(" · ")
}

/// Whether the content already contains an image with this source.
fn content_shows_image(doc: &ReadableDoc, src: &str) -> bool {
    let content = doc.content_html();
    content.contains(src) || content.contains(&src.replace('&', "&amp;"))
}

/// Escape text for use in HTML text and double-quoted attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
