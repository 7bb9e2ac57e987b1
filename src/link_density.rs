//! Link Density
//!
//! Link density is the fraction of a node's text that lives inside anchor
//! elements. The scorer uses it as a penalty; the cleaner uses
//! [`link_density_test`] to drop link-rich blocks (menus, tag clouds,
//! "read next" lists) that survived selection.

use crate::dom::{self, NodeRef};

/// Heuristics on the links below one node.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LinkInfo {
    /// Normalized text length of the node.
    pub text_length: usize,
    /// Normalized text length held inside `a` descendants.
    pub link_length: usize,
    /// Links with non-empty text.
    pub non_empty_links: usize,
    /// Non-empty links shorter than 10 characters.
    pub short_links: usize,
}

impl LinkInfo {
    /// Link text as a fraction of all text, in `0.0..=1.0`.
    #[must_use]
    pub fn density(&self) -> f64 {
        if self.text_length == 0 {
            return 0.0;
        }
        (self.link_length as f64 / self.text_length as f64).min(1.0)
    }
}

/// Collect heuristics on link text.
///
/// Nested anchors are counted once, at the outermost `a`.
#[must_use]
pub fn collect_link_info(node: &NodeRef) -> LinkInfo {
    let mut info = LinkInfo {
        text_length: dom::text_length(node),
        ..LinkInfo::default()
    };

    for link in node.descendants_it() {
        if !link.has_name("a") {
            continue;
        }
        let nested = link
            .ancestors_it(None)
            .take_while(|a| a.id != node.id)
            .any(|a| a.has_name("a"));
        if nested {
            continue;
        }
        let length = dom::text_length(&link);
        if length == 0 {
            continue;
        }
        info.link_length += length;
        info.non_empty_links += 1;
        if length < 10 {
            info.short_links += 1;
        }
    }

    info
}

/// Fraction of the node's text inside anchors.
#[must_use]
pub fn link_density(node: &NodeRef) -> f64 {
    collect_link_info(node).density()
}

/// Check whether a block should be removed because it is rich in links.
///
/// Short blocks (under a length limit that depends on the tag and on whether
/// more content follows) are removed when link text dominates or when most
/// links are short menu-style labels. A lone long link that makes up almost
/// all the text is removed at any length.
#[must_use]
pub fn link_density_test(node: &NodeRef) -> bool {
    let info = collect_link_info(node);
    if info.non_empty_links == 0 {
        return false;
    }

    if info.non_empty_links == 1
        && info.link_length > 100
        && (info.link_length as f64) > (info.text_length as f64) * 0.9
    {
        return true;
    }

    let has_next_sibling = node.next_element_sibling().is_some();
    let limit_length: usize = if node.has_name("p") {
        if has_next_sibling { 30 } else { 60 }
    } else if has_next_sibling {
        100
    } else {
        300
    };

    if info.text_length >= limit_length {
        // Long blocks only go when they are almost entirely links
        return info.density() > 0.9 && info.non_empty_links > 3;
    }

    if info.density() > 0.8 {
        return true;
    }

    // More than 80% of links are short (< 10 chars) - typical of nav menus
    info.non_empty_links > 1
        && (info.short_links as f64) / (info.non_empty_links as f64) > 0.8
}
