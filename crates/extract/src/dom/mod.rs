// ABOUTME: Document tree and the content-extraction heuristic built on it.
// ABOUTME: Tree model, text helpers, weighting, scoring, sibling merging and cleaning passes.

//! DOM utilities for content extraction.
//!
//! The [`tree`] module owns the document model; the remaining modules
//! implement the scoring heuristic and cleaning passes over it.

pub mod brs;
pub mod cleaners;
pub mod merge;
pub mod scoring;
pub mod text;
pub mod tree;
pub mod weight;
