// ABOUTME: Paragraph-driven candidate scoring and top-candidate selection.
// ABOUTME: Scores live in a per-call side table keyed by NodeId; the tree is never annotated.

use std::collections::HashMap;

use ego_tree::NodeId;
use tracing::debug;

use crate::options::Options;

use super::text::{inner_text, link_density, text_len};
use super::tree::Document;
use super::weight::{class_weight, tag_weight};

/// Score of the whole-body fallback: an initialized `<div>` without class or id.
pub const FALLBACK_SCORE: f64 = 5.0;

/// Nodes scored during one extraction run, with their scores.
#[derive(Debug, Default, Clone)]
pub struct Candidates {
    order: Vec<NodeId>,
    scores: HashMap<NodeId, f64>,
}

impl Candidates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with its initial score. Returns false if it was already a
    /// candidate (its score is left untouched).
    pub fn insert(&mut self, id: NodeId, score: f64) -> bool {
        if self.scores.contains_key(&id) {
            return false;
        }
        self.order.push(id);
        self.scores.insert(id, score);
        true
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.scores.contains_key(&id)
    }

    pub fn score(&self, id: NodeId) -> Option<f64> {
        self.scores.get(&id).copied()
    }

    fn add(&mut self, id: NodeId, amount: f64) {
        if let Some(score) = self.scores.get_mut(&id) {
            *score += amount;
        }
    }

    fn set(&mut self, id: NodeId, score: f64) {
        if let Some(current) = self.scores.get_mut(&id) {
            *current = score;
        }
    }

    /// Candidates in insertion order.
    pub fn ids(&self) -> &[NodeId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// The winner of candidate selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TopCandidate {
    /// A scored node and its link-density adjusted score.
    Node { id: NodeId, score: f64 },
    /// Nothing usable was found; wrap the whole body instead.
    Body,
}

impl TopCandidate {
    pub fn score(&self) -> f64 {
        match self {
            TopCandidate::Node { score, .. } => *score,
            TopCandidate::Body => FALLBACK_SCORE,
        }
    }
}

/// Initial score of a node entering the candidate set.
fn initial_score(doc: &Document, id: NodeId, opts: &Options) -> Option<f64> {
    let el = doc.element(id)?;
    Some(f64::from(tag_weight(el.tag()) + class_weight(el, &opts.patterns)))
}

/// Score of one paragraph: a base point, one per comma-separated piece and
/// one per 100 chars up to 3.
pub fn paragraph_score(text: &str) -> f64 {
    let commas = text.split(',').count();
    let length_bonus = (text_len(text) / 100).min(3);
    (1 + commas + length_bonus) as f64
}

/// Walk every `<p>` and credit its parent (full) and grandparent (half).
pub fn score_paragraphs(doc: &Document, opts: &Options) -> Candidates {
    let mut candidates = Candidates::new();

    for p in doc.elements_by_tag(doc.root_id(), "p") {
        let text = inner_text(doc, p, true);
        if text_len(&text) < opts.min_paragraph_len {
            continue;
        }

        let Some(parent) = doc.parent(p).filter(|&id| doc.element(id).is_some()) else {
            continue;
        };
        let grandparent = doc.parent(parent).filter(|&id| doc.element(id).is_some());

        for id in std::iter::once(parent).chain(grandparent) {
            if !candidates.contains(id) {
                if let Some(score) = initial_score(doc, id, opts) {
                    candidates.insert(id, score);
                }
            }
        }

        let score = paragraph_score(&text);
        candidates.add(parent, score);
        if let Some(grandparent) = grandparent {
            candidates.add(grandparent, score / 2.0);
        }
    }

    debug!(candidates = candidates.len(), "scored paragraphs");
    candidates
}

/// Scale every candidate by `1 - link_density` and pick the strict maximum.
///
/// Scaled scores are written back so sibling merging compares like with like.
pub fn select_top_candidate(doc: &Document, candidates: &mut Candidates) -> TopCandidate {
    let mut top: Option<(NodeId, f64)> = None;

    let order = candidates.order.clone();
    for id in order {
        let Some(score) = candidates.score(id) else {
            continue;
        };
        let adjusted = score * (1.0 - link_density(doc, id));
        candidates.set(id, adjusted);

        debug!(
            tag = doc.tag(id).unwrap_or(""),
            score = adjusted,
            "candidate"
        );

        match top {
            Some((_, best)) if adjusted <= best => {}
            _ => top = Some((id, adjusted)),
        }
    }

    match top {
        Some((id, score)) if !doc.is_tag(id, "body") && !doc.is_tag(id, "html") => {
            debug!(tag = doc.tag(id).unwrap_or(""), score, "top candidate");
            TopCandidate::Node { id, score }
        }
        _ => {
            debug!("no usable candidate, falling back to body");
            TopCandidate::Body
        }
    }
}
