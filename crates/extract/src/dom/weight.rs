// ABOUTME: Class/id weighting against the positive and negative keyword patterns.
// ABOUTME: Each attribute is checked on its own, so a node can net to zero.

use crate::options::Patterns;

use super::tree::Element;

fn attr_weight(value: &str, patterns: &Patterns) -> i32 {
    if value.is_empty() {
        return 0;
    }
    let mut weight = 0;
    if patterns.negative.is_match(value) {
        weight -= 25;
    }
    if patterns.positive.is_match(value) {
        weight += 25;
    }
    weight
}

/// Weight an element by its class and id strings.
pub fn class_weight(element: &Element, patterns: &Patterns) -> i32 {
    attr_weight(element.class(), patterns) + attr_weight(element.id(), patterns)
}

/// Tag bonus applied when a node first becomes a candidate.
pub fn tag_weight(tag: &str) -> i32 {
    match tag.to_ascii_lowercase().as_str() {
        "div" => 5,
        "pre" | "td" | "blockquote" => 3,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form" => -3,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => -5,
        _ => 0,
    }
}
