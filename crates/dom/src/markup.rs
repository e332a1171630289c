//! Builds a `Document` from well-formed XHTML-style markup.

use crate::document::{Document, NodeId};
use crate::error::DomError;

/// Parses `markup` into a document.
///
/// A root `<html>` element maps onto the document root and its `<body>` child
/// becomes the body. Any other root element is placed inside an empty body.
/// Whitespace-only text between elements is dropped.
pub fn parse_document(markup: &str) -> Result<Document, DomError> {
    let xml = roxmltree::Document::parse(markup)?;
    let mut doc = Document::new();
    let xml_root = xml.root_element();

    if xml_root.tag_name().name().eq_ignore_ascii_case("html") {
        let root = doc.root();
        let default_body = doc.body();
        doc.detach(default_body);
        copy_attributes(&mut doc, root, xml_root);
        for child in xml_root.children() {
            if let Some(id) = import(&mut doc, child) {
                doc.append_child(root, id);
                if doc.tag(id) == Some("body") {
                    doc.set_body(id);
                }
            }
        }
        if !doc.is_connected(doc.body()) {
            return Err(DomError::Markup("<html> root without a <body>".into()));
        }
    } else if let Some(id) = import(&mut doc, xml_root) {
        let body = doc.body();
        doc.append_child(body, id);
    }

    Ok(doc)
}

fn copy_attributes(doc: &mut Document, id: NodeId, node: roxmltree::Node) {
    for attr in node.attributes() {
        doc.set_attribute(id, attr.name(), attr.value());
    }
}

fn import(doc: &mut Document, node: roxmltree::Node) -> Option<NodeId> {
    if node.is_text() {
        let text = node.text().unwrap_or("");
        if text.trim().is_empty() {
            return None;
        }
        return Some(doc.create_text(text));
    }
    if !node.is_element() {
        return None;
    }

    let id = doc.create_element(node.tag_name().name());
    copy_attributes(doc, id, node);
    for child in node.children() {
        if let Some(child_id) = import(doc, child) {
            doc.append_child(id, child_id);
        }
    }
    Some(id)
}
