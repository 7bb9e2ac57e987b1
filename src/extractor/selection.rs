//! Candidate selection and sibling merging.

use tracing::{debug, trace};

use crate::dom::{self, NodeRef};
use crate::link_density::link_density;
use crate::patterns::is_boilerplate_name;
use crate::scoring::{own_text, Candidate, Scores};
use crate::Options;

/// Siblings with these tags are never merged into the article.
const NEVER_MERGED_TAGS: [&str; 6] = ["nav", "aside", "footer", "header", "form", "menu"];

/// Elements that carry content without text.
const MEDIA_TAGS: [&str; 5] = ["img", "picture", "figure", "video", "svg"];

/// Headings compared against the page title.
const HEADING_TAGS: [&str; 3] = ["h1", "h2", "h3"];

/// Table parts and list items that cannot stand outside their parent element.
const CONTEXT_BOUND_TAGS: [&str; 6] = ["td", "th", "tr", "li", "dd", "dt"];

/// Pick the best candidate that clears the content floors.
///
/// Candidates are visited in rank order. A candidate needs text of its own
/// (a container whose text all sits in nested blocks is only a ranking
/// signal) and a score of at least `min_score`. The text-length floor
/// applies to the candidate together with the siblings it would merge.
#[must_use]
pub fn select_candidate<'a>(scores: &Scores<'a>, options: &Options) -> Option<Candidate<'a>> {
    let selected = scores
        .ranked()
        .iter()
        .find(|c| {
            c.score >= options.min_score
                && !own_text(&c.node).is_empty()
                && (c.text_length >= options.min_text_length
                    || merged_text_length(c, scores, options) >= options.min_text_length)
        })
        .copied();

    match &selected {
        Some(c) => debug!(
            tag = %dom::tag_name(&c.node),
            score = c.score,
            text_length = c.text_length,
            "selected candidate"
        ),
        None => debug!(candidates = scores.len(), "no candidate cleared the content floors"),
    }
    selected
}

fn merged_text_length<'a>(top: &Candidate<'a>, scores: &Scores<'a>, options: &Options) -> usize {
    qualifying_siblings(top, scores, options)
        .iter()
        .map(dom::text_length)
        .sum()
}

/// The selected node plus the siblings pulled in with it, in document order.
///
/// A sibling joins when its own score reaches `sibling_score_fraction` of
/// the selected score, or when it is short and has (almost) no links.
/// Siblings sharing the selected node's class get a bonus.
#[must_use]
pub fn merge_siblings<'a>(top: &Candidate<'a>, scores: &Scores<'a>, options: &Options) -> Vec<NodeRef<'a>> {
    let members = qualifying_siblings(top, scores, options);
    debug!(merged = members.len().saturating_sub(1), "merged siblings");
    members
}

fn qualifying_siblings<'a>(top: &Candidate<'a>, scores: &Scores<'a>, options: &Options) -> Vec<NodeRef<'a>> {
    let Some(parent) = top.node.parent().filter(NodeRef::is_element) else {
        return vec![top.node];
    };

    let threshold = top.score * options.sibling_score_fraction;
    let top_class = top.node.class().filter(|c| !c.trim().is_empty());

    let mut members = Vec::new();
    for sibling in parent.element_children() {
        if sibling.id == top.node.id {
            members.push(sibling);
            continue;
        }
        if is_never_merged(&sibling) {
            continue;
        }

        let text_length = dom::text_length(&sibling);
        let has_media = MEDIA_TAGS.contains(&dom::tag_name(&sibling).as_str())
            || dom::has_descendant_tag(&sibling, &MEDIA_TAGS);
        if text_length == 0 && !has_media {
            continue;
        }

        let mut score = scores.score_of(sibling.id).unwrap_or(0.0);
        if top_class.is_some() && sibling.class() == top_class {
            score += top.score * 0.2;
        }

        let merge = score >= threshold
            || (text_length < options.short_sibling_length
                && link_density(&sibling) <= options.short_sibling_max_link_density);
        trace!(tag = %dom::tag_name(&sibling), score, text_length, merge, "sibling");
        if merge {
            members.push(sibling);
        }
    }
    members
}

/// Drop merged headings that repeat the page title, which the renderer
/// already shows above the content.
pub fn drop_title_headings(members: &mut Vec<NodeRef>, title: &str) {
    if title.is_empty() {
        return;
    }
    members.retain(|member| {
        !(HEADING_TAGS.contains(&dom::tag_name(member).as_str()) && dom::text(member) == title)
    });
}

/// Serialize merged nodes into one HTML string.
///
/// Table cells and list items are serialized as `div` so they survive
/// being parsed outside their table or list. The source tree is left as
/// it was.
#[must_use]
pub fn merged_html(members: &[NodeRef]) -> String {
    let mut html = String::new();
    for member in members {
        let tag = dom::tag_name(member);
        if CONTEXT_BOUND_TAGS.contains(&tag.as_str()) {
            member.rename("div");
            html.push_str(&member.html());
            member.rename(&tag);
        } else {
            html.push_str(&member.html());
        }
    }
    html
}

fn is_never_merged(node: &NodeRef) -> bool {
    NEVER_MERGED_TAGS.contains(&dom::tag_name(node).as_str())
        || is_boilerplate_name(&dom::class_and_id(node))
}
