// ABOUTME: Sibling merging: copies the top candidate and related siblings into a detached tree.
// ABOUTME: Related means scored above the threshold, or a paragraph that reads like prose.

use ego_tree::NodeId;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::options::CONTENT_WRAPPER_ID;

use super::scoring::{Candidates, TopCandidate};
use super::text::{inner_text, link_density, text_len};
use super::tree::{ContentTree, Document, Element, Node};

static SENTENCE_END_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.( |$)").unwrap());

/// Minimum sibling score, whatever the winner scored.
const MIN_SIBLING_THRESHOLD: f64 = 10.0;

/// True when a sibling paragraph reads like part of the article body.
fn is_prose_paragraph(doc: &Document, id: NodeId) -> bool {
    let text = inner_text(doc, id, true);
    let length = text_len(&text);
    let density = link_density(doc, id);

    if length > 80 && density < 0.25 {
        return true;
    }
    length < 80 && density == 0.0 && SENTENCE_END_RE.is_match(&text)
}

/// Sibling score threshold for a given winning score.
pub fn sibling_threshold(top_score: f64) -> f64 {
    MIN_SIBLING_THRESHOLD.max(top_score * 0.2)
}

/// Build the content tree from the winner and the siblings judged related.
///
/// Nodes are deep-copied; `doc` is left untouched.
pub fn merge_siblings(doc: &Document, top: TopCandidate, candidates: &Candidates) -> ContentTree {
    let mut content = ContentTree::with_wrapper(CONTENT_WRAPPER_ID);

    let winner = match top {
        TopCandidate::Node { id, .. } => id,
        TopCandidate::Body => {
            wrap_body(doc, &mut content);
            return content;
        }
    };

    let Some(parent) = doc.get(winner).and_then(|n| n.parent()) else {
        content.doc.copy_subtree(doc, winner, content.root);
        return content;
    };

    let threshold = sibling_threshold(top.score());
    debug!(threshold, "merging siblings");

    for sibling in parent.children() {
        let id = sibling.id();
        let include = id == winner
            || candidates.score(id).is_some_and(|score| score >= threshold)
            || (sibling.value().is_tag("p") && is_prose_paragraph(doc, id));

        if include {
            debug!(tag = doc.tag(id).unwrap_or(""), "including sibling");
            content.doc.copy_subtree(doc, id, content.root);
        }
    }

    content
}

/// Fallback: a fresh `<div>` holding copies of everything in the body.
fn wrap_body(doc: &Document, content: &mut ContentTree) {
    let Some(container) = content
        .doc
        .append(content.root, Node::Element(Element::new("div")))
    else {
        return;
    };
    let source = doc.body().unwrap_or_else(|| doc.root_id());
    if let Some(node) = doc.get(source) {
        for child in node.children() {
            content.doc.copy_subtree(doc, child.id(), container);
        }
    }
}
