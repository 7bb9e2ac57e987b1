//! DOM Operations Adapter
//!
//! Thin helpers over `dom_query` used by every pipeline stage. Nodes live in
//! the document's arena; a [`NodeRef`] is a `(NodeId, &Tree)` pair, so
//! walking to a parent never creates a second owner of the node.

// Re-export core types for external use
pub use dom_query::{Document, NodeId, NodeRef, Selection};

// === Parsing ===

/// Parse HTML string into document
///
/// Malformed markup is repaired by html5ever's tree builder: unclosed tags
/// are closed at the nearest valid ancestor and stray end tags are ignored.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

// === Tag/Node Information ===

/// Get tag name (lowercase), empty for non-element nodes
#[must_use]
pub fn tag_name(node: &NodeRef) -> String {
    node.node_name()
        .map(|t| t.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Get a trimmed, non-empty attribute value
#[must_use]
pub fn attr(node: &NodeRef, name: &str) -> Option<String> {
    node.attr(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Class and id joined into one string for vocabulary matching
#[must_use]
pub fn class_and_id(node: &NodeRef) -> String {
    let class = node.class().unwrap_or_default();
    let id = node.id_attr().unwrap_or_default();
    format!("{} {}", &*class, &*id).trim().to_string()
}

/// Number of element ancestors between the node and the document root
#[must_use]
pub fn depth(node: &NodeRef) -> usize {
    node.ancestors_it(None).filter(NodeRef::is_element).count()
}

/// Whether the node is still reachable from the document root.
#[must_use]
pub fn is_attached(node: &NodeRef) -> bool {
    node.ancestors_it(None).any(|a| a.is_document())
}

/// All element descendants in document order.
#[must_use]
pub fn element_descendants<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    node.descendants_it().filter(NodeRef::is_element).collect()
}

/// Whether any descendant has one of the given tag names.
#[must_use]
pub fn has_descendant_tag(node: &NodeRef, tags: &[&str]) -> bool {
    node.descendants_it()
        .any(|d| d.is_element() && tags.contains(&tag_name(&d).as_str()))
}

// === Text Content ===

/// Collapse every whitespace run to a single space and trim.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized text of the node and its descendants.
#[must_use]
pub fn text(node: &NodeRef) -> String {
    normalize_whitespace(&node.text())
}

/// Normalized text held directly by the node (text children only).
#[must_use]
pub fn direct_text(node: &NodeRef) -> String {
    normalize_whitespace(&node.immediate_text())
}

/// Character count of the normalized text of the node and its descendants.
#[must_use]
pub fn text_length(node: &NodeRef) -> usize {
    text(node).chars().count()
}
