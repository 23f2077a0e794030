// ABOUTME: Extraction entry points: grab the article, retry without suppression, count words.
// ABOUTME: Scores live only for the duration of one grab; the source document is never modified.

use tracing::{debug, info};

use crate::dom::cleaners::{prep_article, strip_unlikely_candidates};
use crate::dom::merge::merge_siblings;
use crate::dom::scoring::{score_paragraphs, select_top_candidate};
use crate::dom::text::{inner_text, word_count};
use crate::dom::tree::{ContentTree, Document};
use crate::encoding::decode_html;
use crate::error::ExtractError;
use crate::options::Options;
use crate::reading_time::ReadingTime;
use crate::result::{Article, Result};

/// Find the main content of `doc` and return it as a cleaned, detached tree.
///
/// With `preserve_unlikely_candidates` false, elements whose class/id look
/// like page chrome are dropped from a working copy before scoring.
pub fn grab_article(doc: &Document, preserve_unlikely_candidates: bool, opts: &Options) -> ContentTree {
    let stripped;
    let source = if preserve_unlikely_candidates {
        doc
    } else {
        stripped = strip_unlikely_candidates(doc, opts);
        &stripped
    };

    let mut candidates = score_paragraphs(source, opts);
    let top = select_top_candidate(source, &mut candidates);
    let mut content = merge_siblings(source, top, &candidates);
    drop(candidates);

    prep_article(&mut content, opts);
    content
}

fn is_empty(content: &ContentTree) -> bool {
    inner_text(&content.doc, content.root, false).is_empty()
}

/// Extract the article from a parsed document.
pub fn extract(doc: &Document, opts: &Options) -> Result<Article> {
    if let Some(limit) = opts.max_nodes {
        let nodes = doc.node_count();
        if nodes > limit {
            return Err(ExtractError::too_large("extract", nodes, limit));
        }
    }

    let mut content = grab_article(doc, !opts.strip_unlikely_candidates, opts);

    // Suppression may have thrown the article away with the chrome.
    if is_empty(&content) && opts.strip_unlikely_candidates {
        debug!("empty extraction, retrying with unlikely candidates preserved");
        content = grab_article(doc, true, opts);
    }

    if is_empty(&content) {
        return Err(ExtractError::no_article("extract"));
    }

    let words = word_count(&content.doc, content.root);
    let reading_time = ReadingTime::from_words(words, opts.words_per_minute);
    info!(words, minutes = reading_time.minutes, "extracted article");

    Ok(Article {
        content,
        word_count: words,
        reading_time,
    })
}

/// Parse `html` and extract the article.
pub fn extract_html(html: &str, opts: &Options) -> Result<Article> {
    extract(&Document::parse(html), opts)
}

/// Decode raw page bytes, then extract.
///
/// Bytes malformed in their BOM-marked or declared charset are a parse error.
pub fn extract_bytes(bytes: &[u8], opts: &Options) -> Result<Article> {
    let html = decode_html(bytes)?;
    extract_html(&html, opts)
}
