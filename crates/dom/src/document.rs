//! Arena-backed document tree.
//!
//! Nodes are never freed; removing a node only detaches it, so `NodeId`s stay
//! valid for the lifetime of the document.

use crate::selector::{AttrTest, Combinator, Complex, Compound, SelectorList};
use autotoc_types::Rect;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum NodeKind {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        style: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Border box in document coordinates.
    pub(crate) layout: Option<Rect>,
}

#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    body: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty `<html><body></body></html>` document.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
        };
        let root = doc.create_element("html");
        let body = doc.create_element("body");
        doc.append_child(root, body);
        doc.root = root;
        doc.body = body;
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub(crate) fn set_body(&mut self, body: NodeId) {
        self.body = body;
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    // --- Creation ---

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            style: Vec::new(),
        })
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
            layout: None,
        });
        id
    }

    // --- Tree mutation ---

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        self.detach(child);
        let index = reference
            .and_then(|r| self.node(parent).children.iter().position(|&c| c == r))
            .unwrap_or(self.node(parent).children.len());
        self.node_mut(parent).children.insert(index, child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Removes `id` from its parent. Returns the former parent.
    pub fn detach(&mut self, id: NodeId) -> Option<NodeId> {
        let parent = self.node_mut(id).parent.take()?;
        self.node_mut(parent).children.retain(|&c| c != id);
        Some(parent)
    }

    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        let old: Vec<NodeId> = std::mem::take(&mut self.node_mut(id).children);
        for child in old {
            self.node_mut(child).parent = None;
        }
        if !text.is_empty() {
            let t = self.create_text(text);
            self.append_child(id, t);
        }
    }

    // --- Tree queries ---

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::Element { .. })
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .filter(|&c| self.is_element(c))
            .collect()
    }

    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.is_element(p))
    }

    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = &self.node(parent).children;
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings[pos + 1..]
            .iter()
            .copied()
            .find(|&c| self.is_element(c))
    }

    /// Whether `ancestor` is `id` itself or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Whether the node is reachable from the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.is_inclusive_ancestor(self.root, id)
    }

    /// Element descendants of `scope` (excluding `scope`) in document order.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(scope).children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if self.is_element(id) {
                out.push(id);
                stack.extend(self.node(id).children.iter().rev().copied());
            }
        }
        out
    }

    pub fn text_content(&self, id: NodeId) -> String {
        match &self.node(id).kind {
            NodeKind::Text(t) => t.clone(),
            NodeKind::Element { .. } => self
                .node(id)
                .children
                .iter()
                .map(|&c| self.text_content(c))
                .collect(),
        }
    }

    // --- Attributes and classes ---

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.node_mut(id).kind {
            match attrs.iter_mut().find(|(k, _)| k == name) {
                Some((_, v)) => *v = value.to_string(),
                None => attrs.push((name.to_ascii_lowercase(), value.to_string())),
            }
        }
    }

    pub fn classes(&self, id: NodeId) -> impl Iterator<Item = &str> {
        self.attribute(id, "class")
            .unwrap_or("")
            .split_whitespace()
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.classes(id).any(|c| c == class)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if self.has_class(id, class) {
            return;
        }
        let mut classes: Vec<String> = self.classes(id).map(str::to_string).collect();
        classes.push(class.to_string());
        self.set_attribute(id, "class", &classes.join(" "));
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if !self.has_class(id, class) {
            return;
        }
        let classes: Vec<String> = self
            .classes(id)
            .filter(|c| *c != class)
            .map(str::to_string)
            .collect();
        self.set_attribute(id, "class", &classes.join(" "));
    }

    // --- Inline style ---

    pub fn set_style_property(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { style, .. } = &mut self.node_mut(id).kind {
            match style.iter_mut().find(|(k, _)| k == name) {
                Some((_, v)) => *v = value.to_string(),
                None => style.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn style_property(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { style, .. } => style
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    /// Looks a custom property up on `id` and then its ancestors.
    pub fn inherited_custom_property(&self, id: NodeId, name: &str) -> Option<String> {
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(v) = self.style_property(node, name) {
                return Some(v.to_string());
            }
            current = self.parent(node);
        }
        None
    }

    // --- Layout ---

    pub fn layout(&self, id: NodeId) -> Option<Rect> {
        self.node(id).layout
    }

    pub fn set_layout(&mut self, id: NodeId, rect: Rect) {
        self.node_mut(id).layout = Some(rect);
    }

    // --- Selector matching ---

    pub fn matches(&self, id: NodeId, selectors: &SelectorList) -> bool {
        selectors
            .selectors()
            .iter()
            .any(|sel| self.matches_complex(id, sel))
    }

    fn matches_complex(&self, id: NodeId, sel: &Complex) -> bool {
        self.matches_compound(id, &sel.subject) && self.matches_ancestors(id, &sel.ancestors)
    }

    fn matches_ancestors(&self, id: NodeId, rest: &[(Combinator, Compound)]) -> bool {
        let Some(((combinator, compound), tail)) = rest.split_first() else {
            return true;
        };
        match combinator {
            Combinator::Child => self
                .parent_element(id)
                .is_some_and(|p| self.matches_compound(p, compound) && self.matches_ancestors(p, tail)),
            Combinator::Descendant => {
                let mut current = self.parent_element(id);
                while let Some(ancestor) = current {
                    if self.matches_compound(ancestor, compound)
                        && self.matches_ancestors(ancestor, tail)
                    {
                        return true;
                    }
                    current = self.parent_element(ancestor);
                }
                false
            }
        }
    }

    fn matches_compound(&self, id: NodeId, compound: &Compound) -> bool {
        let Some(tag) = self.tag(id) else {
            return false;
        };
        if compound.tag.as_deref().is_some_and(|t| t != tag) {
            return false;
        }
        if !compound
            .ids
            .iter()
            .all(|want| self.attribute(id, "id") == Some(want.as_str()))
        {
            return false;
        }
        if !compound.classes.iter().all(|c| self.has_class(id, c)) {
            return false;
        }
        compound.attrs.iter().all(|attr| {
            let actual = self.attribute(id, &attr.name);
            match &attr.test {
                AttrTest::Exists => actual.is_some(),
                AttrTest::Equals(v) => actual == Some(v.as_str()),
            }
        })
    }

    // --- Serialization ---

    /// Serializes `id` as markup. Intended for assertions and debugging.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        match &self.node(id).kind {
            NodeKind::Text(t) => out.push_str(&escape(t, false)),
            NodeKind::Element { tag, attrs, style } => {
                out.push('<');
                out.push_str(tag);
                for (k, v) in attrs {
                    out.push_str(&format!(" {}=\"{}\"", k, escape(v, true)));
                }
                if !style.is_empty() {
                    let css: Vec<String> =
                        style.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
                    out.push_str(&format!(" style=\"{}\"", escape(&css.join("; "), true)));
                }
                out.push('>');
                for &child in &self.node(id).children {
                    self.write_html(child, out);
                }
                out.push_str(&format!("</{}>", tag));
            }
        }
    }
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let block = doc.create_element("div");
        doc.add_class(block, "html-block");
        let h3 = doc.create_element("h3");
        let p = doc.create_element("p");
        doc.append_child(doc.body(), block);
        doc.append_child(block, h3);
        doc.append_child(block, p);
        let t = doc.create_text("Intro");
        doc.append_child(h3, t);
        (doc, block, h3, p)
    }

    #[test]
    fn test_descendant_matching() {
        let (doc, block, h3, p) = sample();
        let sel = SelectorList::parse(".blog-anchor-title, .html-block h3").unwrap();
        assert!(doc.matches(h3, &sel));
        assert!(!doc.matches(p, &sel));
        assert!(!doc.matches(block, &sel));
    }

    #[test]
    fn test_child_combinator() {
        let (doc, _, h3, _) = sample();
        assert!(doc.matches(h3, &SelectorList::parse("div > h3").unwrap()));
        assert!(!doc.matches(h3, &SelectorList::parse("body > h3").unwrap()));
        assert!(doc.matches(h3, &SelectorList::parse("body h3").unwrap()));
    }

    #[test]
    fn test_class_editing() {
        let (mut doc, block, _, _) = sample();
        doc.add_class(block, "is-active");
        doc.add_class(block, "is-active");
        assert_eq!(doc.attribute(block, "class"), Some("html-block is-active"));
        doc.remove_class(block, "html-block");
        assert_eq!(doc.attribute(block, "class"), Some("is-active"));
    }

    #[test]
    fn test_insert_before_and_siblings() {
        let (mut doc, block, h3, p) = sample();
        let nav = doc.create_element("nav");
        doc.insert_before(block, nav, Some(p));
        assert_eq!(doc.element_children(block), vec![h3, nav, p]);
        assert_eq!(doc.next_element_sibling(h3), Some(nav));
        assert_eq!(doc.next_element_sibling(p), None);

        doc.insert_before(block, nav, None);
        assert_eq!(doc.element_children(block), vec![h3, p, nav]);
    }

    #[test]
    fn test_text_content_and_serialization() {
        let (mut doc, _, h3, _) = sample();
        assert_eq!(doc.text_content(h3), "Intro");
        doc.set_text_content(h3, "Details");
        assert_eq!(doc.outer_html(h3), "<h3>Details</h3>");
    }

    #[test]
    fn test_inherited_custom_property() {
        let (mut doc, _, h3, _) = sample();
        let root = doc.root();
        doc.set_style_property(root, "--header-height", "80px");
        assert_eq!(
            doc.inherited_custom_property(h3, "--header-height").as_deref(),
            Some("80px")
        );
        assert_eq!(doc.inherited_custom_property(h3, "--missing"), None);
    }
}
