// ABOUTME: Cleaning passes applied to the merged content tree before it is returned.
// ABOUTME: Ports style stripping, tag cleaning, header pruning and conditional cleaning.

use ego_tree::NodeId;
use tracing::{trace, warn};

use crate::options::Options;

use super::brs::{collapse_breaks_before_paragraphs, kill_breaks};
use super::text::{char_count, inner_text, link_density, text_len};
use super::tree::{ContentTree, Document};
use super::weight::class_weight;

const HEADER_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];
const CONDITIONAL_TAGS: &[&str] = &["table", "ul", "div"];

/// Remove inline `style` from `scope` and everything under it, except
/// elements carrying exactly the styled marker class.
pub fn clean_styles(doc: &mut Document, scope: NodeId, marker_class: &str) {
    for id in doc.elements_within(scope) {
        doc.with_element_mut(id, |el| {
            if el.class() != marker_class {
                el.remove_attr("style");
            }
        });
    }
}

/// Remove every descendant `tag`. Objects and embeds whose markup points at a
/// known video host are kept.
pub fn clean(doc: &mut Document, scope: NodeId, tag: &str, opts: &Options) -> usize {
    let is_embed = tag.eq_ignore_ascii_case("object") || tag.eq_ignore_ascii_case("embed");
    let mut removed = 0;

    for id in doc.elements_by_tag(scope, tag).into_iter().rev() {
        if is_embed && opts.patterns.video.is_match(&doc.inner_html(id)) {
            continue;
        }
        if doc.detach(id) {
            removed += 1;
        }
    }

    trace!(tag, removed, "clean");
    removed
}

/// Remove headings that look like boilerplate: negative class weight or more
/// than a third of their text in links.
pub fn clean_headers(doc: &mut Document, scope: NodeId, opts: &Options) {
    for tag in HEADER_TAGS {
        for id in doc.elements_by_tag(scope, tag).into_iter().rev() {
            let weight = doc
                .element(id)
                .map_or(0, |el| class_weight(el, &opts.patterns));
            if weight < 0 || link_density(doc, id) > 0.33 {
                trace!(tag, weight, "removing header");
                doc.detach(id);
            }
        }
    }
}

/// Decide whether an element with few commas looks like boilerplate.
fn is_fishy(doc: &Document, id: NodeId, tag: &str, weight: i32, opts: &Options) -> bool {
    let p = doc.count_tag(id, "p");
    let img = doc.count_tag(id, "img");
    let li = doc.count_tag(id, "li") as i64 - 100;
    let input = doc.count_tag(id, "input");

    let embeds = doc
        .elements_by_tag(id, "embed")
        .into_iter()
        .filter(|&e| {
            let src = doc.element(e).and_then(|el| el.attr("src")).unwrap_or("");
            !opts.patterns.video.is_match(src)
        })
        .count();

    let density = link_density(doc, id);
    let content_length = text_len(&inner_text(doc, id, true));
    let is_list = tag.eq_ignore_ascii_case("ul") || tag.eq_ignore_ascii_case("ol");

    img > p
        || (li > p as i64 && !is_list)
        || input > p / 3
        || (content_length < 25 && (img == 0 || img > 2))
        || (weight < 25 && density > 0.2)
        || (weight >= 25 && density > 0.5)
        || (embeds == 1 && content_length < 75)
        || embeds > 1
}

/// Remove descendant `tag` elements that look fishy, innermost first.
pub fn clean_conditionally(doc: &mut Document, scope: NodeId, tag: &str, opts: &Options) {
    for id in doc.elements_by_tag(scope, tag).into_iter().rev() {
        let weight = doc
            .element(id)
            .map_or(0, |el| class_weight(el, &opts.patterns));

        let remove = if weight < 0 {
            true
        } else if char_count(doc, id, ',') < 10 {
            is_fishy(doc, id, tag, weight, opts)
        } else {
            false
        };

        if remove {
            trace!(tag, weight, "conditionally removing");
            doc.detach(id);
        }
    }
}

/// Remove paragraphs with no text and no image, embed or object.
pub fn remove_empty_paragraphs(doc: &mut Document, scope: NodeId) {
    for id in doc.elements_by_tag(scope, "p").into_iter().rev() {
        let has_media = ["img", "embed", "object"]
            .iter()
            .any(|tag| doc.count_tag(id, tag) > 0);
        if !has_media && inner_text(doc, id, false).is_empty() {
            doc.detach(id);
        }
    }
}

/// Run the full cleaning pipeline over the content tree, in order.
pub fn prep_article(content: &mut ContentTree, opts: &Options) {
    let scope = content.root;
    let doc = &mut content.doc;

    clean_styles(doc, scope, &opts.styled_marker_class);

    if let Err(err) = kill_breaks(doc, scope) {
        warn!(error = %err, "collapsing breaks failed, continuing");
    }

    clean(doc, scope, "form", opts);
    clean(doc, scope, "object", opts);
    clean(doc, scope, "h1", opts);

    // A lone h2 is most likely a duplicate of the page title.
    if doc.count_tag(scope, "h2") == 1 {
        clean(doc, scope, "h2", opts);
    }
    clean(doc, scope, "iframe", opts);

    clean_headers(doc, scope, opts);

    // Last, since earlier passes may have removed junk these look at.
    for tag in CONDITIONAL_TAGS {
        clean_conditionally(doc, scope, tag, opts);
    }

    remove_empty_paragraphs(doc, scope);

    if let Err(err) = collapse_breaks_before_paragraphs(doc, scope) {
        warn!(error = %err, "collapsing breaks before paragraphs failed, continuing");
    }
}

/// Copy of `doc` without elements whose class and id look like page chrome.
///
/// `<body>` is never dropped, and a match on the maybe-candidate pattern
/// rescues a node.
pub fn strip_unlikely_candidates(doc: &Document, opts: &Options) -> Document {
    let mut stripped = doc.clone();

    let unlikely: Vec<NodeId> = doc
        .elements_within(doc.root_id())
        .into_iter()
        .filter(|&id| {
            let Some(el) = doc.element(id) else {
                return false;
            };
            if el.is("body") {
                return false;
            }
            let match_string = format!("{}{}", el.class(), el.id());
            opts.patterns.unlikely_candidates.is_match(&match_string)
                && !opts.patterns.maybe_candidate.is_match(&match_string)
        })
        .collect();

    for id in unlikely {
        trace!(tag = doc.tag(id).unwrap_or(""), "removing unlikely candidate");
        stripped.detach(id);
    }
    stripped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scoped(html: &str) -> (Document, NodeId) {
        let doc = Document::parse_fragment(&format!("<div id=\"scope\">{html}</div>"));
        let scope = doc.first_element_child(doc.root_id()).unwrap();
        (doc, scope)
    }

    fn inner(doc: &Document, scope: NodeId) -> String {
        doc.inner_html(scope)
    }

    #[test]
    fn test_clean_styles_respects_marker() {
        let (mut doc, scope) = scoped(
            r#"<p style="color:red">a</p><span class="readability-styled" style="x">b</span>"#,
        );
        clean_styles(&mut doc, scope, "readability-styled");
        assert_eq!(
            inner(&doc, scope),
            r#"<p>a</p><span class="readability-styled" style="x">b</span>"#
        );
    }

    #[test]
    fn test_clean_keeps_video_objects() {
        let (mut doc, scope) = scoped(
            r#"<object><param name="movie" value="https://www.youtube.com/v/abc"></object><object><param name="movie" value="https://ads.example.com/x.swf"></object>"#,
        );
        let removed = clean(&mut doc, scope, "object", &Options::default());
        assert_eq!(removed, 1);
        assert!(inner(&doc, scope).contains("youtube.com"));
        assert!(!inner(&doc, scope).contains("ads.example.com"));
    }

    #[test]
    fn test_clean_removes_all_forms() {
        let (mut doc, scope) = scoped("<form><input></form><p>keep</p><form></form>");
        assert_eq!(clean(&mut doc, scope, "form", &Options::default()), 2);
        assert_eq!(inner(&doc, scope), "<p>keep</p>");
    }

    #[test]
    fn test_clean_headers() {
        let (mut doc, scope) = scoped(
            r##"<h2 class="comment-title">Comments</h2><h3><a href="#">All links here</a></h3><h3>Real section</h3>"##,
        );
        clean_headers(&mut doc, scope, &Options::default());
        assert_eq!(inner(&doc, scope), "<h3>Real section</h3>");
    }

    #[test]
    fn test_conditional_negative_weight_always_removed() {
        let commas = "a, ".repeat(20);
        let (mut doc, scope) = scoped(&format!(
            r#"<div class="sponsor"><p>{commas}</p><p>{commas}</p></div>"#
        ));
        clean_conditionally(&mut doc, scope, "div", &Options::default());
        assert_eq!(inner(&doc, scope), "");
    }

    #[test]
    fn test_conditional_keeps_comma_rich_content() {
        let text = "word, ".repeat(12);
        let (mut doc, scope) = scoped(&format!("<div><p>{text}</p></div>"));
        clean_conditionally(&mut doc, scope, "div", &Options::default());
        assert_eq!(doc.count_tag(scope, "div"), 1);
    }

    #[test]
    fn test_conditional_removes_image_heavy_block() {
        let (mut doc, scope) = scoped(
            r#"<div><img src="a.png"><img src="b.png"><p>Short caption for the gallery.</p></div>"#,
        );
        clean_conditionally(&mut doc, scope, "div", &Options::default());
        assert_eq!(doc.count_tag(scope, "div"), 0);
    }

    #[test]
    fn test_conditional_removes_link_heavy_list() {
        let (mut doc, scope) = scoped(
            r#"<ul><li><a href="/a">Home page link</a></li><li><a href="/b">About page link</a></li></ul>"#,
        );
        clean_conditionally(&mut doc, scope, "ul", &Options::default());
        assert_eq!(doc.count_tag(scope, "ul"), 0);
    }

    #[test]
    fn test_conditional_keeps_plain_list() {
        let (mut doc, scope) = scoped(
            "<ul><li>First plain list item</li><li>Second plain list item</li></ul>",
        );
        clean_conditionally(&mut doc, scope, "ul", &Options::default());
        assert_eq!(doc.count_tag(scope, "ul"), 1);
    }

    #[test]
    fn test_conditional_embeds() {
        let (mut doc, scope) = scoped(
            r#"<div><p>This advert has a little text, but not much.</p><embed src="http://ads.example.com/a.swf"></div><div><p>Watch this clip from the launch event below.</p><embed src="http://www.youtube.com/v/xyz"></div>"#,
        );
        clean_conditionally(&mut doc, scope, "div", &Options::default());
        let html = inner(&doc, scope);
        assert!(!html.contains("ads.example.com"));
        assert!(html.contains("youtube.com"));
    }

    fn plain(len: usize) -> String {
        "x".repeat(len)
    }

    fn items(n: usize) -> String {
        "<li>item</li>".repeat(n)
    }

    fn kept_divs(html: &str) -> usize {
        let (mut doc, scope) = scoped(html);
        clean_conditionally(&mut doc, scope, "div", &Options::default());
        doc.count_tag(scope, "div")
    }

    #[test]
    fn test_conditional_inputs_against_paragraph_third() {
        let paras = format!("<p>{0}</p><p>{0}</p><p>{0}</p>", plain(40));
        // three paragraphs allow one input
        assert_eq!(kept_divs(&format!("<div>{paras}<input></div>")), 1);
        assert_eq!(kept_divs(&format!("<div>{paras}<input><input></div>")), 0);
    }

    #[test]
    fn test_conditional_short_content_depends_on_images() {
        // no images
        assert_eq!(kept_divs("<div><p>Short.</p><p>Tiny.</p></div>"), 0);
        // one or two images, no more than paragraphs
        assert_eq!(
            kept_divs(r#"<div><p>Short.</p><p>Tiny.</p><img src="a.png"></div>"#),
            1
        );
        assert_eq!(
            kept_divs(r#"<div><p>Short.</p><p>Tiny.</p><img src="a.png"><img src="b.png"></div>"#),
            1
        );
        // more than two images
        assert_eq!(
            kept_divs(
                r#"<div><p>a</p><p>b</p><p>c</p><img src="a.png"><img src="b.png"><img src="c.png"></div>"#
            ),
            0
        );
    }

    #[test]
    fn test_conditional_link_density_by_weight() {
        let mostly_links = format!(r##"<p>{}<a href="#">{}</a></p>"##, plain(20), "y".repeat(40));
        let some_links = format!(r##"<p>{}<a href="#">{}</a></p>"##, plain(70), "y".repeat(30));

        // positive weight tolerates density up to 0.5
        assert_eq!(kept_divs(&format!(r#"<div class="content">{some_links}</div>"#)), 1);
        assert_eq!(kept_divs(&format!(r#"<div class="content">{mostly_links}</div>"#)), 0);

        // neutral weight tolerates density up to 0.2
        assert_eq!(kept_divs(&format!("<div>{some_links}</div>")), 0);
    }

    #[test]
    fn test_conditional_embed_counts() {
        let text = format!("<p>{}</p>", plain(100));
        let ad = r#"<embed src="http://ads.example.com/a.swf">"#;
        let ad2 = r#"<embed src="http://ads.example.com/b.swf">"#;
        let video = r#"<embed src="http://vimeo.com/1">"#;

        // one embed with enough text stays
        assert_eq!(kept_divs(&format!("<div>{text}{ad}</div>")), 1);
        // two embeds always go
        assert_eq!(kept_divs(&format!("<div>{text}{ad}{ad2}</div>")), 0);
        // video embeds are not counted
        assert_eq!(kept_divs(&format!("<div>{text}{video}{video}</div>")), 1);
    }

    #[test]
    fn test_conditional_list_items_are_offset() {
        let text = format!("<p>{}</p>", plain(60));

        // 50 items: 50 - 100 is never more than the paragraph count
        assert_eq!(kept_divs(&format!("<div>{text}<ul>{}</ul></div>", items(50))), 1);
        // 150 items: 50 more than the single paragraph
        assert_eq!(kept_divs(&format!("<div>{text}<ul>{}</ul></div>", items(150))), 0);
    }

    #[test]
    fn test_conditional_lists_are_exempt_from_item_rule() {
        let (mut doc, scope) = scoped(&format!("<ul>{}</ul>", items(150)));
        clean_conditionally(&mut doc, scope, "ul", &Options::default());
        assert_eq!(doc.count_tag(scope, "ul"), 1);
    }

    #[test]
    fn test_remove_empty_paragraphs() {
        let (mut doc, scope) = scoped(r#"<p>  </p><p><img src="x.png"></p><p>text</p>"#);
        remove_empty_paragraphs(&mut doc, scope);
        assert_eq!(inner(&doc, scope), r#"<p><img src="x.png"></p><p>text</p>"#);
    }

    #[test]
    fn test_prep_article_lone_h2_removed() {
        let mut content = ContentTree::with_wrapper("readability-content");
        let src = Document::parse_fragment(
            "<div><h2>Title again</h2><p>Paragraph, with, enough, commas, to, keep, this, block, around, safely, ok.</p></div>",
        );
        let div = src.first_element_child(src.root_id()).unwrap();
        content.doc.copy_subtree(&src, div, content.root);

        prep_article(&mut content, &Options::default());
        let html = content.html();
        assert!(!html.contains("<h2>"));
        assert!(html.contains("Paragraph"));
    }

    #[test]
    fn test_prep_article_keeps_two_h2() {
        let mut content = ContentTree::with_wrapper("readability-content");
        let src = Document::parse_fragment("<h2>One</h2><p>a</p><h2>Two</h2>");
        let children: Vec<NodeId> = src.root().children().map(|c| c.id()).collect();
        for child in children {
            content.doc.copy_subtree(&src, child, content.root);
        }

        prep_article(&mut content, &Options::default());
        assert_eq!(content.doc.count_tag(content.root, "h2"), 2);
    }

    #[test]
    fn test_strip_unlikely_candidates() {
        let doc = Document::parse(
            r#"<html><body><div class="sidebar">Side</div><div class="sidebar-article">Main</div><div id="menu">Menu</div></body></html>"#,
        );
        let stripped = strip_unlikely_candidates(&doc, &Options::default());
        let body = stripped.body().unwrap();
        assert_eq!(
            stripped.inner_html(body),
            r#"<div class="sidebar-article">Main</div>"#
        );
        // the source is untouched
        assert_eq!(doc.count_tag(doc.root_id(), "div"), 3);
    }
}
