// ABOUTME: Arena-backed document tree the extractor scores, copies and prunes.
// ABOUTME: Converts scraper's parsed HTML into owned nodes and serializes them back to markup.

use ego_tree::iter::Edge;
use ego_tree::{NodeId, NodeRef, Tree};
use scraper::Html;

/// Void elements never get a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text children are emitted without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "noscript", "xmp", "iframe"];

/// An element: lowercase tag name plus its attributes in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
}

impl Element {
    /// Create an element with no attributes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attrs: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Case-insensitive tag comparison.
    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The class attribute, or "" when absent.
    pub fn class(&self) -> &str {
        self.attr("class").unwrap_or("")
    }

    /// The id attribute, or "" when absent.
    pub fn id(&self) -> &str {
        self.attr("id").unwrap_or("")
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_ascii_lowercase(), value)),
        }
    }

    /// Remove an attribute. Returns true if it was present.
    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attrs.len();
        self.attrs.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.attrs.len() != before
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.as_str())
    }
}

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Document,
    Element(Element),
    Text(String),
    Comment(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    /// True for an element with the given tag (case-insensitive).
    pub fn is_tag(&self, tag: &str) -> bool {
        self.as_element().is_some_and(|el| el.is(tag))
    }

    /// True for a text node holding nothing but whitespace.
    pub fn is_blank_text(&self) -> bool {
        self.as_text().is_some_and(|t| t.trim().is_empty())
    }
}

/// An owned HTML document. Node identity is the arena `NodeId`.
#[derive(Debug, Clone)]
pub struct Document {
    tree: Tree<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document holding only the root node.
    pub fn new() -> Self {
        Self {
            tree: Tree::new(Node::Document),
        }
    }

    /// Parse a full HTML document.
    pub fn parse(html: &str) -> Self {
        Self::from_html(&Html::parse_document(html))
    }

    /// Parse an HTML fragment. Top-level nodes become children of the root.
    pub fn parse_fragment(html: &str) -> Self {
        let fragment = Html::parse_fragment(html);
        let mut doc = Self::new();
        let root = doc.root_id();
        // The fragment parser wraps everything in a synthetic <html> element.
        doc.copy_from_scraper(*fragment.root_element(), root);
        doc
    }

    /// Convert a document already parsed by scraper.
    pub fn from_html(html: &Html) -> Self {
        let mut doc = Self::new();
        let root = doc.root_id();
        doc.copy_from_scraper(html.tree.root(), root);
        doc
    }

    fn copy_from_scraper(&mut self, src: NodeRef<'_, scraper::Node>, parent: NodeId) {
        let mut stack: Vec<_> = src.children().rev().map(|c| (c, parent)).collect();
        while let Some((node, parent)) = stack.pop() {
            let value = match node.value() {
                scraper::Node::Element(el) => Node::Element(Element {
                    tag: el.name().to_ascii_lowercase(),
                    attrs: el
                        .attrs()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                }),
                scraper::Node::Text(text) => Node::Text((**text).to_string()),
                scraper::Node::Comment(comment) => Node::Comment((**comment).to_string()),
                _ => continue,
            };
            if let Some(id) = self.append(parent, value) {
                stack.extend(node.children().rev().map(|c| (c, id)));
            }
        }
    }

    pub fn root_id(&self) -> NodeId {
        self.tree.root().id()
    }

    pub fn root(&self) -> NodeRef<'_, Node> {
        self.tree.root()
    }

    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_, Node>> {
        self.tree.get(id)
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.tree.get(id).and_then(|n| n.value().as_element())
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::tag)
    }

    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.element(id).is_some_and(|el| el.is(tag))
    }

    /// Parent node id, if the node is attached.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.get(id)?.parent().map(|p| p.id())
    }

    /// Number of nodes reachable from the root.
    pub fn node_count(&self) -> usize {
        self.tree.root().descendants().count()
    }

    /// The `<body>` element, if any.
    pub fn body(&self) -> Option<NodeId> {
        self.tree
            .root()
            .descendants()
            .find(|n| n.value().is_tag("body"))
            .map(|n| n.id())
    }

    /// First element child of a node.
    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.tree
            .get(id)?
            .children()
            .find(|c| c.value().is_element())
            .map(|c| c.id())
    }

    /// Descendant elements (excluding `scope` itself) with the given tag, in
    /// document order.
    pub fn elements_by_tag(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        let Some(node) = self.tree.get(scope) else {
            return Vec::new();
        };
        node.descendants()
            .skip(1)
            .filter(|n| n.value().is_tag(tag))
            .map(|n| n.id())
            .collect()
    }

    /// Count descendants of `scope` with the given tag.
    pub fn count_tag(&self, scope: NodeId, tag: &str) -> usize {
        self.tree.get(scope).map_or(0, |node| {
            node.descendants()
                .skip(1)
                .filter(|n| n.value().is_tag(tag))
                .count()
        })
    }

    /// `scope` and all its element descendants, in document order.
    pub fn elements_within(&self, scope: NodeId) -> Vec<NodeId> {
        let Some(node) = self.tree.get(scope) else {
            return Vec::new();
        };
        node.descendants()
            .filter(|n| n.value().is_element())
            .map(|n| n.id())
            .collect()
    }

    /// Append a new child under `parent`. Returns the new node's id.
    pub fn append(&mut self, parent: NodeId, value: Node) -> Option<NodeId> {
        self.tree.get_mut(parent).map(|mut p| p.append(value).id())
    }

    /// Detach a node (and its subtree) from its parent.
    pub fn detach(&mut self, id: NodeId) -> bool {
        match self.tree.get_mut(id) {
            Some(mut node) => {
                node.detach();
                true
            }
            None => false,
        }
    }

    /// Run `f` against a mutable element. Returns None for non-elements.
    pub fn with_element_mut<R>(&mut self, id: NodeId, f: impl FnOnce(&mut Element) -> R) -> Option<R> {
        let mut node = self.tree.get_mut(id)?;
        match node.value() {
            Node::Element(el) => Some(f(el)),
            _ => None,
        }
    }

    /// Replace the text of a text node.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> bool {
        let Some(mut node) = self.tree.get_mut(id) else {
            return false;
        };
        match node.value() {
            Node::Text(t) => {
                *t = text.into();
                true
            }
            _ => false,
        }
    }

    /// Deep-copy the subtree rooted at `src_id` in `src` under `parent` in
    /// this document. Returns the id of the copied root.
    pub fn copy_subtree(&mut self, src: &Document, src_id: NodeId, parent: NodeId) -> Option<NodeId> {
        let src_root = src.tree.get(src_id)?;
        let new_root = self.append(parent, src_root.value().clone())?;
        let mut stack: Vec<_> = src_root.children().rev().map(|c| (c, new_root)).collect();
        while let Some((node, parent)) = stack.pop() {
            if let Some(id) = self.append(parent, node.value().clone()) {
                stack.extend(node.children().rev().map(|c| (c, id)));
            }
        }
        Some(new_root)
    }

    /// Serialize the whole document.
    pub fn html(&self) -> String {
        self.inner_html(self.root_id())
    }

    /// Serialize a node including its own tag.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(node) = self.tree.get(id) {
            write_html(node, true, &mut out);
        }
        out
    }

    /// Serialize a node's children.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(node) = self.tree.get(id) {
            write_html(node, false, &mut out);
        }
        out
    }
}

fn write_html(node: NodeRef<'_, Node>, include_self: bool, out: &mut String) {
    let scope = node.id();
    for edge in node.traverse() {
        match edge {
            Edge::Open(n) => {
                if !include_self && n.id() == scope {
                    continue;
                }
                match n.value() {
                    Node::Document => {}
                    Node::Element(el) => {
                        out.push('<');
                        out.push_str(&el.tag);
                        for (name, value) in &el.attrs {
                            out.push(' ');
                            out.push_str(name);
                            out.push_str("=\"");
                            out.push_str(&escape_attr(value));
                            out.push('"');
                        }
                        out.push('>');
                    }
                    Node::Text(text) => {
                        let raw = n
                            .parent()
                            .and_then(|p| p.value().as_element())
                            .is_some_and(|el| RAW_TEXT_ELEMENTS.contains(&el.tag()));
                        if raw {
                            out.push_str(text);
                        } else {
                            out.push_str(&escape_text(text));
                        }
                    }
                    Node::Comment(comment) => {
                        out.push_str("<!--");
                        out.push_str(comment);
                        out.push_str("-->");
                    }
                }
            }
            Edge::Close(n) => {
                if !include_self && n.id() == scope {
                    continue;
                }
                if let Node::Element(el) = n.value() {
                    if !el.is_void() {
                        out.push_str("</");
                        out.push_str(&el.tag);
                        out.push('>');
                    }
                }
            }
        }
    }
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// The extraction result: a detached document whose single top-level element
/// is the article wrapper.
#[derive(Debug, Clone)]
pub struct ContentTree {
    pub doc: Document,
    pub root: NodeId,
}

impl ContentTree {
    /// Create an empty content tree with a wrapper `<div id="...">`.
    pub fn with_wrapper(wrapper_id: &str) -> Self {
        let mut doc = Document::new();
        let root_id = doc.root_id();
        let wrapper = Node::Element(Element::new("div").with_attr("id", wrapper_id));
        let root = doc
            .append(root_id, wrapper)
            .unwrap_or(root_id);
        Self { doc, root }
    }

    /// Serialized wrapper, including its own tag.
    pub fn html(&self) -> String {
        self.doc.outer_html(self.root)
    }
}
