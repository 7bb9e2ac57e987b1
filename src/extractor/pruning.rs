//! Cleaning of the merged article content.
//!
//! Runs on a fresh document holding only the selected node and its merged
//! siblings. Removes what survived scoring but does not belong in a reader
//! view, strips scripting and styling attributes, and rewrites link and
//! image URLs against the base URL.

use tracing::debug;
use url::Url;

use crate::dom::{self, NodeRef};
use crate::html_processing::remove_empty_elements;
use crate::link_density::link_density_test;
use crate::patterns::{is_boilerplate_name, SHARE_LABEL, VIDEO_EMBED};
use crate::url_utils::{create_absolute_url, is_javascript_url, resolve_srcset};
use crate::Options;

/// Elements removed from content with their subtree.
const UNWANTED_TAGS: &str =
    "nav, aside, footer, form, button, input, select, textarea, object, embed, dialog, link, meta";

/// Blocks whose presence makes an unwanted member worth unwrapping.
const TEXT_BLOCK_TAGS: [&str; 3] = ["p", "pre", "blockquote"];

/// Blocks tested for link density.
const LINK_TESTED_TAGS: [&str; 7] = ["p", "ul", "ol", "dl", "div", "section", "table"];

/// Elements that may hold a bare share-button label.
const SHARE_CANDIDATE_TAGS: [&str; 7] = ["a", "button", "span", "li", "div", "p", "ul"];

/// Attributes that carry the real image URL on lazy-loading pages.
const LAZY_SRC_ATTRS: [&str; 3] = ["data-src", "data-lazy-src", "data-original"];

/// Cleaned article content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanedContent {
    /// Serialized content HTML.
    pub html: String,
    /// Plain text with paragraph breaks.
    pub text: String,
}

/// Clean merged content HTML.
#[must_use]
pub fn clean(merged_html: &str, base_url: &Url, options: &Options) -> CleanedContent {
    let doc = dom::parse(merged_html);
    let Some(body) = doc.body() else {
        return CleanedContent::default();
    };

    let mut removed = prune_unwanted(&body);
    removed += prune_iframes(&body);
    removed += prune_boilerplate(&body);
    removed += prune_share_buttons(&body);
    removed += prune_link_dense(&body);

    normalize_attributes(&body, base_url, options);
    let emptied = remove_empty_elements(&body);

    let content = CleanedContent {
        html: body.inner_html().trim().to_string(),
        text: body.formatted_text().trim().to_string(),
    };
    debug!(removed, emptied, text_length = content.text.chars().count(), "cleaned content");
    content
}

/// Nested elements below the merged members, in document order.
///
/// The members themselves (the body's children) were already vetted by
/// selection and are never pruned as a whole.
fn nested_elements<'a>(body: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    dom::element_descendants(body)
        .into_iter()
        .filter(|node| node.parent().is_some_and(|p| p.id != body.id))
        .collect()
}

/// Remove unwanted elements with their subtree.
///
/// A merged member holding text blocks is unwrapped instead, so a page
/// whose article sits directly inside a `<form>` keeps its paragraphs.
fn prune_unwanted(body: &NodeRef) -> usize {
    let mut removed = 0;
    for node in dom::element_descendants(body) {
        if !node.is(UNWANTED_TAGS) || !dom::is_attached(&node) {
            continue;
        }
        let is_member = node.parent().is_some_and(|p| p.id == body.id);
        if is_member && dom::has_descendant_tag(&node, &TEXT_BLOCK_TAGS) {
            unwrap_element(&node);
        } else {
            node.remove_from_parent();
            removed += 1;
        }
    }
    removed
}

/// Remove iframes except embedded video players.
fn prune_iframes(body: &NodeRef) -> usize {
    let mut removed = 0;
    for frame in dom::element_descendants(body) {
        if !frame.has_name("iframe") {
            continue;
        }
        let keep = frame.attr("src").is_some_and(|src| VIDEO_EMBED.is_match(&src));
        if !keep {
            frame.remove_from_parent();
            removed += 1;
        }
    }
    removed
}

/// Remove elements whose class or id names boilerplate.
fn prune_boilerplate(body: &NodeRef) -> usize {
    let mut removed = 0;
    for node in nested_elements(body) {
        if dom::is_attached(&node) && is_boilerplate_name(&dom::class_and_id(&node)) {
            node.remove_from_parent();
            removed += 1;
        }
    }
    removed
}

/// Remove small elements whose whole text is a share-button label.
fn prune_share_buttons(body: &NodeRef) -> usize {
    let mut removed = 0;
    for node in nested_elements(body) {
        if !SHARE_CANDIDATE_TAGS.contains(&dom::tag_name(&node).as_str()) || !dom::is_attached(&node) {
            continue;
        }
        let text = dom::text(&node);
        if !text.is_empty() && text.chars().count() < 40 && SHARE_LABEL.is_match(&text) {
            node.remove_from_parent();
            removed += 1;
        }
    }
    removed
}

/// Remove blocks that are mostly links.
fn prune_link_dense(body: &NodeRef) -> usize {
    let mut removed = 0;
    for node in nested_elements(body) {
        if !LINK_TESTED_TAGS.contains(&dom::tag_name(&node).as_str()) || !dom::is_attached(&node) {
            continue;
        }
        if link_density_test(&node) {
            node.remove_from_parent();
            removed += 1;
        }
    }
    removed
}

/// Per-element attribute pass: event handlers and inline styles go,
/// scripted anchors are unwrapped and every URL is made absolute.
fn normalize_attributes(body: &NodeRef, base_url: &Url, options: &Options) {
    for node in dom::element_descendants(body) {
        let names: Vec<String> = node
            .attrs()
            .iter()
            .map(|a| a.name.local.to_string())
            .collect();
        for name in &names {
            let lower = name.to_ascii_lowercase();
            if lower.starts_with("on") || (lower == "style" && !options.preserve_style) {
                node.remove_attr(name);
            }
        }

        match dom::tag_name(&node).as_str() {
            "a" => {
                if let Some(href) = node.attr("href") {
                    if is_javascript_url(&href) {
                        unwrap_element(&node);
                    } else {
                        node.set_attr("href", &create_absolute_url(&href, base_url));
                    }
                }
            }
            "img" => {
                promote_lazy_source(&node);
                resolve_attr(&node, "src", base_url);
                if let Some(srcset) = node.attr("srcset") {
                    node.set_attr("srcset", &resolve_srcset(&srcset, base_url));
                }
            }
            "source" => {
                resolve_attr(&node, "src", base_url);
                if let Some(srcset) = node.attr("srcset") {
                    node.set_attr("srcset", &resolve_srcset(&srcset, base_url));
                }
            }
            "video" => {
                resolve_attr(&node, "src", base_url);
                resolve_attr(&node, "poster", base_url);
            }
            _ => {}
        }
    }
}

/// Replace an element with its children.
fn unwrap_element(element: &NodeRef) {
    match element.first_child() {
        Some(first) => first.unwrap_node(),
        None => element.remove_from_parent(),
    }
}

fn resolve_attr(node: &NodeRef, name: &str, base_url: &Url) {
    if let Some(value) = node.attr(name) {
        node.set_attr(name, &create_absolute_url(&value, base_url));
    }
}

/// Move `data-src`-style attributes onto `src` when `src` is missing or a placeholder.
fn promote_lazy_source(img: &NodeRef) {
    let placeholder = img
        .attr("src")
        .is_none_or(|src| src.trim().is_empty() || src.trim_start().starts_with("data:"));
    if placeholder {
        if let Some(real) = LAZY_SRC_ATTRS.iter().find_map(|name| dom::attr(img, name)) {
            img.set_attr("src", &real);
        }
    }
    if !img.has_attr("srcset") {
        if let Some(srcset) = dom::attr(img, "data-srcset") {
            img.set_attr("srcset", &srcset);
        }
    }
}
