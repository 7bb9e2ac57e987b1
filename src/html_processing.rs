//! Document preprocessing.
//!
//! Mutates the parsed tree in place before metadata extraction and scoring:
//! drops elements that never carry article text, removes whitespace-only
//! leftovers, and collapses single-child wrapper chains so that depth-based
//! score propagation reaches the real container. This pass never fails.

use tracing::debug;

use crate::dom::{self, Document, NodeRef};
use crate::patterns::HIDDEN_STYLE;

/// Elements removed with their whole subtree.
const NON_CONTENT_TAGS: &str = "script, style, noscript, template";

/// Elements that are meaningful even without text.
pub const KEEP_EMPTY_TAGS: [&str; 30] = [
    "html", "head", "body", "title", "meta", "link", "base", "br", "hr", "wbr", "img",
    "picture", "source", "track", "video", "audio", "iframe", "embed", "object", "canvas",
    "svg", "math", "area", "input", "textarea", "select", "td", "th", "col", "colgroup",
];

/// Wrappers that may be replaced by their only child.
const WRAPPER_TAGS: [&str; 4] = ["div", "section", "center", "font"];

/// Block containers a wrapper may be collapsed onto.
const BLOCK_TAGS: [&str; 18] = [
    "div", "section", "article", "main", "p", "table", "ul", "ol", "dl", "blockquote", "pre",
    "figure", "header", "footer", "nav", "aside", "form", "details",
];

/// Counts of what preprocessing changed, for logging and tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PreprocessStats {
    /// Subtrees removed (non-content tags, hidden elements, comments).
    pub removed: usize,
    /// Whitespace-only elements removed.
    pub emptied: usize,
    /// Wrappers collapsed onto their single child.
    pub unwrapped: usize,
}

/// Run every preprocessing step over the document.
pub fn preprocess(doc: &Document) -> PreprocessStats {
    let mut stats = PreprocessStats::default();

    let non_content = doc.select(NON_CONTENT_TAGS);
    stats.removed += non_content.length();
    non_content.remove();

    stats.removed += remove_comments(doc);
    stats.removed += remove_hidden(doc);

    if let Some(body) = doc.body() {
        stats.emptied += remove_empty_elements(&body);
        stats.unwrapped += unwrap_wrappers(&body);
    }

    debug!(
        removed = stats.removed,
        emptied = stats.emptied,
        unwrapped = stats.unwrapped,
        "preprocessed document"
    );
    stats
}

/// Remove every comment node.
fn remove_comments(doc: &Document) -> usize {
    let comments: Vec<NodeRef> = doc
        .root()
        .descendants_it()
        .filter(NodeRef::is_comment)
        .collect();
    for comment in &comments {
        comment.remove_from_parent();
    }
    comments.len()
}

/// Remove elements hidden by the `hidden` attribute or an inline style.
fn remove_hidden(doc: &Document) -> usize {
    let mut removed = 0;
    for node in doc.select("body [hidden], body [style]").nodes() {
        let hidden = node.has_attr("hidden")
            || node
                .attr("style")
                .is_some_and(|style| HIDDEN_STYLE.is_match(&style));
        if hidden && dom::is_attached(node) {
            node.remove_from_parent();
            removed += 1;
        }
    }
    removed
}

/// Remove whitespace-only elements, innermost first.
///
/// Walking in reverse document order visits children before their parents,
/// so a parent emptied by this pass is removed in the same pass.
pub fn remove_empty_elements(root: &NodeRef) -> usize {
    let mut removed = 0;
    for node in dom::element_descendants(root).into_iter().rev() {
        let tag = dom::tag_name(&node);
        if KEEP_EMPTY_TAGS.contains(&tag.as_str()) {
            continue;
        }
        if node.is_empty_element() {
            node.remove_from_parent();
            removed += 1;
        }
    }
    removed
}

/// Collapse wrappers that hold a single block child and no text of their own.
///
/// The child inherits the wrapper's `id` and `class` when it has none, so
/// naming signals survive for the scorer.
fn unwrap_wrappers(body: &NodeRef) -> usize {
    let mut unwrapped = 0;
    for wrapper in dom::element_descendants(body) {
        if !WRAPPER_TAGS.contains(&dom::tag_name(&wrapper).as_str()) || !dom::is_attached(&wrapper) {
            continue;
        }
        let children = wrapper.element_children();
        let [child] = children.as_slice() else {
            continue;
        };
        if !BLOCK_TAGS.contains(&dom::tag_name(child).as_str()) || !dom::direct_text(&wrapper).is_empty() {
            continue;
        }

        for name in ["id", "class"] {
            if let (Some(value), None) = (wrapper.attr(name), child.attr(name)) {
                child.set_attr(name, &value);
            }
        }
        child.unwrap_node();
        unwrapped += 1;
    }
    unwrapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse;

    #[test]
    fn test_removes_non_content_elements() {
        let doc = parse(
            r#"<html><head><style>p{}</style><script>var a;</script></head>
            <body><noscript>enable js</noscript><template><p>t</p></template><p>Text</p></body></html>"#,
        );
        preprocess(&doc);
        assert!(doc.select("script, style, noscript, template").is_empty());
        assert_eq!(doc.select("p").length(), 1);
    }

    #[test]
    fn test_removes_comments() {
        let doc = parse("<body><!-- hidden note --><p>Text</p></body>");
        let stats = preprocess(&doc);
        assert!(stats.removed >= 1);
        assert!(!doc.html().contains("hidden note"));
    }

    #[test]
    fn test_removes_hidden_elements() {
        let doc = parse(
            r#"<body><div hidden>gone</div><p style="display: none">gone too</p><p>kept</p></body>"#,
        );
        preprocess(&doc);
        let text = doc.select("body").text();
        assert!(!text.contains("gone"));
        assert!(text.contains("kept"));
    }

    #[test]
    fn test_removes_whitespace_only_elements_recursively() {
        let doc = parse("<body><div id='outer'><span>  </span><p>\n</p></div><p>Text</p></body>");
        let stats = preprocess(&doc);
        assert!(doc.select("#outer").is_empty());
        assert_eq!(stats.emptied, 3);
        assert!(doc.select("p").exists());
    }

    #[test]
    fn test_keeps_images_and_meta() {
        let doc = parse(
            r#"<html><head><meta name="author" content="A"></head><body><div><img src="a.png"></div><br></body></html>"#,
        );
        preprocess(&doc);
        assert!(doc.select("meta[name=author]").exists());
        assert!(doc.select("img").exists());
    }

    #[test]
    fn test_unwraps_single_child_wrappers() {
        let doc = parse(
            r#"<body><div class="wrap"><div><article><p>One</p><p>Two</p></article></div></div></body>"#,
        );
        let stats = preprocess(&doc);
        assert_eq!(stats.unwrapped, 2);
        assert!(doc.select("div").is_empty());
        // The wrapper's class moved onto the article
        assert!(doc.select("body > article.wrap").exists());
    }

    #[test]
    fn test_does_not_unwrap_wrapper_with_text() {
        let doc = parse("<body><div id='w'>Intro words <p>Para</p></div></body>");
        preprocess(&doc);
        assert!(doc.select("#w > p").exists());
    }

    #[test]
    fn test_does_not_unwrap_inline_child() {
        let doc = parse("<body><div id='w'><span>Inline only</span></div></body>");
        preprocess(&doc);
        assert!(doc.select("#w > span").exists());
    }

    #[test]
    fn test_empty_document_is_fine() {
        let doc = parse("");
        let stats = preprocess(&doc);
        assert_eq!(stats, PreprocessStats::default());
    }
}
