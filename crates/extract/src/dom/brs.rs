// ABOUTME: Structural <br> normalization on the content tree.
// ABOUTME: Collapses break runs and drops breaks that directly precede a paragraph.

use ego_tree::NodeId;

use crate::error::CosmeticError;

use super::tree::Document;

fn next_sibling(doc: &Document, id: NodeId) -> Result<Option<NodeId>, CosmeticError> {
    let node = doc.get(id).ok_or(CosmeticError::MissingNode(id))?;
    Ok(node.next_sibling().map(|n| n.id()))
}

fn detach_all(doc: &mut Document, ids: &[NodeId]) -> Result<(), CosmeticError> {
    for &id in ids {
        if !doc.detach(id) {
            return Err(CosmeticError::MissingNode(id));
        }
    }
    Ok(())
}

/// Collapse each run of `<br>` elements (and the whitespace around them) into
/// a single `<br>`. Returns the number of nodes removed.
pub fn kill_breaks(doc: &mut Document, scope: NodeId) -> Result<usize, CosmeticError> {
    let mut removed = 0;

    for br in doc.elements_by_tag(scope, "br") {
        // Swallowed by an earlier run.
        if doc.parent(br).is_none() {
            continue;
        }

        let mut doomed = Vec::new();
        let mut blanks = Vec::new();
        let mut following_text = None;
        let mut cursor = next_sibling(doc, br)?;

        while let Some(id) = cursor {
            let node = doc.get(id).ok_or(CosmeticError::MissingNode(id))?;
            let value = node.value();
            if value.is_blank_text() {
                blanks.push(id);
            } else if value.is_tag("br") {
                doomed.append(&mut blanks);
                doomed.push(id);
            } else {
                if value.as_text().is_some() {
                    following_text = Some(id);
                }
                break;
            }
            cursor = node.next_sibling().map(|n| n.id());
        }
        doomed.append(&mut blanks);

        detach_all(doc, &doomed)?;
        removed += doomed.len();

        if let Some(text_id) = following_text {
            let text = doc
                .get(text_id)
                .and_then(|n| n.value().as_text())
                .ok_or(CosmeticError::NotText(text_id))?;
            let trimmed = text.trim_start();
            if trimmed.len() != text.len() {
                let trimmed = trimmed.to_string();
                doc.set_text(text_id, trimmed);
            }
        }
    }

    Ok(removed)
}

/// Remove every `<br>` whose next non-blank sibling is a `<p>`, together with
/// the whitespace between them. Returns the number of breaks removed.
pub fn collapse_breaks_before_paragraphs(
    doc: &mut Document,
    scope: NodeId,
) -> Result<usize, CosmeticError> {
    let mut removed = 0;

    for br in doc.elements_by_tag(scope, "br") {
        if doc.parent(br).is_none() {
            continue;
        }

        let mut doomed = vec![br];
        let mut cursor = next_sibling(doc, br)?;
        let mut precedes_paragraph = false;

        while let Some(id) = cursor {
            let node = doc.get(id).ok_or(CosmeticError::MissingNode(id))?;
            if node.value().is_blank_text() {
                doomed.push(id);
                cursor = node.next_sibling().map(|n| n.id());
                continue;
            }
            precedes_paragraph = node.value().is_tag("p");
            break;
        }

        if precedes_paragraph {
            detach_all(doc, &doomed)?;
            removed += 1;
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scoped(html: &str) -> (Document, NodeId) {
        let doc = Document::parse_fragment(html);
        let scope = doc.first_element_child(doc.root_id()).unwrap();
        (doc, scope)
    }

    #[test]
    fn test_kill_breaks_collapses_runs() {
        let (mut doc, scope) = scoped("<div>One<br><br>\n <br/>Two</div>");
        let removed = kill_breaks(&mut doc, scope).unwrap();
        assert_eq!(removed, 3);
        assert_eq!(doc.html(), "<div>One<br>Two</div>");
    }

    #[test]
    fn test_kill_breaks_trims_following_text() {
        let (mut doc, scope) = scoped("<div>One<br>\n   Two words</div>");
        kill_breaks(&mut doc, scope).unwrap();
        assert_eq!(doc.html(), "<div>One<br>Two words</div>");
    }

    #[test]
    fn test_kill_breaks_keeps_separate_breaks() {
        let (mut doc, scope) = scoped("<div>A<br>B<br>C</div>");
        assert_eq!(kill_breaks(&mut doc, scope).unwrap(), 0);
        assert_eq!(doc.html(), "<div>A<br>B<br>C</div>");
    }

    #[test]
    fn test_kill_breaks_treats_nbsp_as_space() {
        let (mut doc, scope) = scoped("<div>A<br>&nbsp;<br>B</div>");
        kill_breaks(&mut doc, scope).unwrap();
        assert_eq!(doc.html(), "<div>A<br>B</div>");
    }

    #[test]
    fn test_collapse_break_before_paragraph() {
        let (mut doc, scope) = scoped("<div>Intro<br>\n<p>Body</p><br>tail</div>");
        let removed = collapse_breaks_before_paragraphs(&mut doc, scope).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(doc.html(), "<div>Intro<p>Body</p><br>tail</div>");
    }

    #[test]
    fn test_collapse_ignores_other_blocks() {
        let (mut doc, scope) = scoped("<div><br><pre>code</pre></div>");
        assert_eq!(collapse_breaks_before_paragraphs(&mut doc, scope).unwrap(), 0);
    }
}
