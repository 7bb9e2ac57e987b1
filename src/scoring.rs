//! Candidate scoring.
//!
//! Every paragraph-bearing element gets a base score from its own text,
//! its tag, its class/id naming, and its link density. A decaying share of
//! each base score is then propagated to the element's ancestors so that a
//! container full of good paragraphs outranks any single paragraph.
//!
//! Scores live in a side table keyed by [`NodeId`]; ancestors are reached
//! through the arena's parent links, never through an owning pointer.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::{debug, trace};

use crate::dom::{self, NodeId, NodeRef};
use crate::link_density::link_density;
use crate::patterns::{is_boilerplate_name, BOILERPLATE_CLASS, CONTENT_CLASS};

/// Tags that may become candidates.
pub const CANDIDATE_TAGS: [&str; 8] = [
    "p", "div", "article", "section", "main", "td", "pre", "blockquote",
];

/// Candidate tags that are scored even with little text of their own.
const PARAGRAPH_TAGS: [&str; 4] = ["p", "pre", "td", "blockquote"];

/// Regions whose descendants are never candidates.
const EXCLUDED_REGION_TAGS: [&str; 3] = ["nav", "aside", "footer"];

/// Inline elements whose text counts as the parent's own text.
const INLINE_TAGS: [&str; 26] = [
    "a", "abbr", "b", "bdi", "bdo", "br", "cite", "code", "data", "del", "dfn", "em", "font",
    "i", "ins", "kbd", "label", "mark", "q", "s", "samp", "small", "span", "strong", "sub",
    "sup",
];

/// Own text a non-paragraph element needs before it is scored directly.
const MIN_DIRECT_TEXT: usize = 25;

const PARAGRAPH_BASE: f64 = 1.0;
const POINTS_PER_100_CHARS: f64 = 1.0;
const MAX_LENGTH_POINTS: f64 = 3.0;
const MAX_COMMA_POINTS: f64 = 3.0;
const CLASS_WEIGHT: f64 = 25.0;
const LINK_DENSITY_PENALTY: f64 = 10.0;

/// Share of a base score handed to the parent, grandparent and great-grandparent.
const PROPAGATION: [f64; 3] = [0.5, 0.25, 0.125];

/// A scored element.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// The element.
    pub node: NodeRef<'a>,
    /// Final score after propagation.
    pub score: f64,
    /// Normalized text length of the element's subtree.
    pub text_length: usize,
    /// Element depth below the document root.
    pub depth: usize,
}

impl Candidate<'_> {
    /// Ranking order: higher score, then longer text, then shallower,
    /// then earlier in the document.
    #[must_use]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.text_length.cmp(&self.text_length))
            .then_with(|| self.depth.cmp(&other.depth))
            .then_with(|| self.node.id.cmp(&other.node.id))
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry<'a> {
    node: NodeRef<'a>,
    own: f64,
    inherited: f64,
}

/// Scores for one pass over a tree, ranked best first.
#[derive(Debug, Default)]
pub struct Scores<'a> {
    ranked: Vec<Candidate<'a>>,
    by_id: HashMap<NodeId, f64>,
}

impl<'a> Scores<'a> {
    /// Candidates, best first.
    #[must_use]
    pub fn ranked(&self) -> &[Candidate<'a>] {
        &self.ranked
    }

    /// Final score of a node, if it was scored.
    #[must_use]
    pub fn score_of(&self, id: NodeId) -> Option<f64> {
        self.by_id.get(&id).copied()
    }

    /// Number of scored nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    /// Whether nothing was scored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// Score every candidate below `body`.
///
/// Only elements with a tag in [`CANDIDATE_TAGS`] are ranked. Propagation
/// skips ancestors with other tags and continues with the next candidate
/// ancestor.
///
/// With `exclude_boilerplate_names`, elements inside a region whose class
/// or id names boilerplate are skipped. Elements inside `nav`, `aside` and
/// `footer` are always skipped.
#[must_use]
pub fn score_tree<'a>(body: &NodeRef<'a>, exclude_boilerplate_names: bool) -> Scores<'a> {
    let mut entries: HashMap<NodeId, Entry<'a>> = HashMap::new();

    for node in dom::element_descendants(body) {
        let tag = dom::tag_name(&node);
        if !CANDIDATE_TAGS.contains(&tag.as_str())
            || in_excluded_region(&node, body, exclude_boilerplate_names)
        {
            continue;
        }

        let own_text = own_text(&node);
        let eligible = if PARAGRAPH_TAGS.contains(&tag.as_str()) {
            !dom::text(&node).is_empty()
        } else {
            own_text.chars().count() >= MIN_DIRECT_TEXT
        };
        if !eligible {
            continue;
        }

        let base = base_score(&node);
        trace!(tag = %tag, base, "scored element");
        entries
            .entry(node.id)
            .and_modify(|e| e.own = base)
            .or_insert(Entry { node, own: base, inherited: 0.0 });

        // Wrappers such as `form`, `ul` or `tbody` are passed over, not scored
        let ancestors = node
            .ancestors_it(None)
            .take_while(|a| a.id != body.id && a.is_element())
            .filter(|a| CANDIDATE_TAGS.contains(&dom::tag_name(a).as_str()))
            .take(PROPAGATION.len());
        for (ancestor, share) in ancestors.zip(PROPAGATION) {
            entries
                .entry(ancestor.id)
                .or_insert_with(|| Entry {
                    node: ancestor,
                    own: tag_weight(&dom::tag_name(&ancestor)) + class_weight(&ancestor),
                    inherited: 0.0,
                })
                .inherited += base * share;
        }
    }

    let mut ranked: Vec<Candidate<'a>> = entries
        .into_values()
        .map(|entry| {
            let inherited = if entry.inherited > 0.0 {
                entry.inherited * (1.0 - link_density(&entry.node))
            } else {
                entry.inherited
            };
            Candidate {
                node: entry.node,
                score: entry.own + inherited,
                text_length: dom::text_length(&entry.node),
                depth: dom::depth(&entry.node),
            }
        })
        .collect();
    ranked.sort_by(Candidate::rank_cmp);

    let by_id = ranked.iter().map(|c| (c.node.id, c.score)).collect();
    debug!(
        candidates = ranked.len(),
        top_score = ranked.first().map(|c| c.score),
        exclude_boilerplate_names,
        "scored tree"
    );
    Scores { ranked, by_id }
}

/// Base score of one element, before propagation.
///
/// Combines text-length points (capped), comma points (capped), tag
/// weight and class/id weight, then applies the link-density penalty.
#[must_use]
pub fn base_score(node: &NodeRef) -> f64 {
    let text = own_text(node);
    let length = text.chars().count();
    let commas = text.chars().filter(|c| matches!(c, ',' | '，' | '、')).count();

    let length_points = ((length / 100) as f64 * POINTS_PER_100_CHARS).min(MAX_LENGTH_POINTS);
    let comma_points = (commas as f64).min(MAX_COMMA_POINTS);

    let score = PARAGRAPH_BASE
        + length_points
        + comma_points
        + tag_weight(&dom::tag_name(node))
        + class_weight(node);

    apply_link_penalty(score, link_density(node))
}

/// Reduce a score by link density.
///
/// Positive scores shrink proportionally and every score loses a further
/// fixed amount per unit of density, so the result is strictly decreasing
/// in `density` for any input score.
#[must_use]
pub fn apply_link_penalty(score: f64, density: f64) -> f64 {
    let density = density.clamp(0.0, 1.0);
    let scaled = if score > 0.0 { score * (1.0 - density) } else { score };
    scaled - density * LINK_DENSITY_PENALTY
}

/// Tag-name weight.
#[must_use]
pub fn tag_weight(tag: &str) -> f64 {
    match tag {
        "article" | "main" => 10.0,
        "section" | "div" => 5.0,
        "p" | "pre" | "td" | "blockquote" => 3.0,
        "ul" | "ol" | "dl" | "dd" | "dt" | "li" | "address" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => -5.0,
        "header" | "form" => -10.0,
        "aside" => -15.0,
        "footer" => -20.0,
        "nav" => -25.0,
        _ => 0.0,
    }
}

/// Class/id weight: negative for the boilerplate vocabulary, positive for
/// the content vocabulary. Both may apply.
#[must_use]
pub fn class_weight(node: &NodeRef) -> f64 {
    let names = dom::class_and_id(node);
    if names.is_empty() {
        return 0.0;
    }
    let mut weight = 0.0;
    if BOILERPLATE_CLASS.is_match(&names) {
        weight -= CLASS_WEIGHT;
    }
    if CONTENT_CLASS.is_match(&names) {
        weight += CLASS_WEIGHT;
    }
    weight
}

/// Normalized text the element holds itself: its text children plus text
/// inside inline descendants, excluding nested blocks.
#[must_use]
pub fn own_text(node: &NodeRef) -> String {
    fn collect(node: &NodeRef, out: &mut String) {
        for child in node.children_it(false) {
            if child.is_text() {
                out.push_str(&child.text());
            } else if child.is_element() && INLINE_TAGS.contains(&dom::tag_name(&child).as_str()) {
                collect(&child, out);
            }
        }
    }
    let mut out = String::new();
    collect(node, &mut out);
    dom::normalize_whitespace(&out)
}

/// Whether the node sits inside a region that never holds article text.
fn in_excluded_region(node: &NodeRef, body: &NodeRef, exclude_boilerplate_names: bool) -> bool {
    if exclude_boilerplate_names && is_boilerplate_name(&dom::class_and_id(node)) {
        return true;
    }
    node.ancestors_it(None)
        .take_while(|a| a.id != body.id && a.is_element())
        .any(|a| {
            EXCLUDED_REGION_TAGS.contains(&dom::tag_name(&a).as_str())
                || (exclude_boilerplate_names && is_boilerplate_name(&dom::class_and_id(&a)))
        })
}
