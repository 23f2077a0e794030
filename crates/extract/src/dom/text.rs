// ABOUTME: Text helpers used by scoring and cleaning: inner text, comma counts, link density.
// ABOUTME: Also provides the space-delimited word count behind the reading-time estimate.

use ego_tree::NodeId;
use once_cell::sync::Lazy;
use regex::Regex;

use super::tree::{Document, Node};

static NORMALIZE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

/// Concatenated text of every descendant text node, without trimming.
pub fn text_content(doc: &Document, id: NodeId) -> String {
    let Some(node) = doc.get(id) else {
        return String::new();
    };
    node.descendants()
        .filter_map(|n| n.value().as_text())
        .collect()
}

/// Trimmed text of a node; with `normalize_spaces`, whitespace runs collapse
/// to a single space.
pub fn inner_text(doc: &Document, id: NodeId, normalize_spaces: bool) -> String {
    let content = text_content(doc, id);
    let trimmed = content.trim();
    if normalize_spaces {
        NORMALIZE_RE.replace_all(trimmed, " ").into_owned()
    } else {
        trimmed.to_string()
    }
}

/// Length in chars, the unit every threshold is expressed in.
pub fn text_len(text: &str) -> usize {
    text.chars().count()
}

/// Number of pieces the node's text splits into on `separator`
/// (occurrences + 1).
pub fn char_count(doc: &Document, id: NodeId, separator: char) -> usize {
    inner_text(doc, id, true).split(separator).count()
}

/// Share of a node's text that sits inside `<a>` descendants.
///
/// A node without text has density 0.
pub fn link_density(doc: &Document, id: NodeId) -> f64 {
    let text_length = text_len(&inner_text(doc, id, true));
    if text_length == 0 {
        return 0.0;
    }

    let link_length: usize = doc
        .elements_by_tag(id, "a")
        .into_iter()
        .map(|a| text_len(&inner_text(doc, a, true)))
        .sum();

    link_length as f64 / text_length as f64
}

/// Space-delimited token count over all non-blank text nodes.
///
/// Tokens are whatever `split(' ')` yields on the raw node text, so
/// punctuation-glued tokens count once and a leading space adds an empty token.
pub fn word_count(doc: &Document, id: NodeId) -> usize {
    let Some(node) = doc.get(id) else {
        return 0;
    };
    node.descendants()
        .filter_map(|n| match n.value() {
            Node::Text(text) if !text.trim().is_empty() => Some(text.split(' ').count()),
            _ => None,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(doc: &Document) -> NodeId {
        doc.first_element_child(doc.root_id()).unwrap()
    }

    #[test]
    fn test_inner_text_trims_and_normalizes() {
        let doc = Document::parse_fragment("<div>  Hello   <b>big</b>\n\n world  </div>");
        let div = first(&doc);
        assert_eq!(inner_text(&doc, div, true), "Hello big world");
        assert_eq!(inner_text(&doc, div, false), "Hello   big\n\n world");
    }

    #[test]
    fn test_inner_text_ignores_comments() {
        let doc = Document::parse_fragment("<div>a<!-- hidden -->b</div>");
        assert_eq!(inner_text(&doc, first(&doc), true), "ab");
    }

    #[test]
    fn test_char_count_is_occurrences_plus_one() {
        let doc = Document::parse_fragment("<p>one, two, three</p>");
        assert_eq!(char_count(&doc, first(&doc), ','), 3);

        let doc = Document::parse_fragment("<p>no commas</p>");
        assert_eq!(char_count(&doc, first(&doc), ','), 1);
    }

    #[test]
    fn test_link_density_partial() {
        let doc = Document::parse_fragment(r##"<div>abcde <a href="#">fghij</a></div>"##);
        let density = link_density(&doc, first(&doc));
        // "abcde fghij" is 11 chars, 5 of them linked
        assert!((density - 5.0 / 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_link_density_all_links_is_one() {
        let doc = Document::parse_fragment(r##"<ul><li><a href="#">Home</a></li></ul>"##);
        assert_eq!(link_density(&doc, first(&doc)), 1.0);
    }

    #[test]
    fn test_link_density_empty_text_is_zero() {
        let doc = Document::parse_fragment(r##"<div><a href="#"></a><img src="x.png"></div>"##);
        let density = link_density(&doc, first(&doc));
        assert_eq!(density, 0.0);
        assert!(!density.is_nan());
    }

    #[test]
    fn test_word_count_skips_blank_nodes() {
        let doc = Document::parse_fragment("<div><p>one two three</p>\n   <p>four</p></div>");
        assert_eq!(word_count(&doc, first(&doc)), 4);
    }

    #[test]
    fn test_word_count_counts_space_tokens() {
        // Leading and doubled spaces produce empty tokens, as split(' ') does.
        let doc = Document::parse_fragment("<p> a  b</p>");
        assert_eq!(word_count(&doc, first(&doc)), 4);

        let doc = Document::parse_fragment("<p>well-known,glued tokens</p>");
        assert_eq!(word_count(&doc, first(&doc)), 2);
    }
}
