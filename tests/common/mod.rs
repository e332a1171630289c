#![allow(dead_code)]

pub mod fixtures;

use autotoc::{HeadlessPage, NodeId, Page, Rect};
use std::rc::Rc;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Height of each content block laid out by [`stack_blocks`].
pub const BLOCK_HEIGHT: f32 = 400.0;

/// Document y of the first content block.
pub const CONTENT_TOP: f32 = 1000.0;

/// Parses `markup` into a shared page.
pub fn page_from(markup: &str) -> Result<Rc<HeadlessPage>, Box<dyn std::error::Error>> {
    Ok(Rc::new(HeadlessPage::from_markup(markup)?))
}

/// Lays out the children of `.blog-item-content` as a vertical stack of
/// [`BLOCK_HEIGHT`] boxes starting at [`CONTENT_TOP`]. Elements nested in a
/// block share its box.
pub fn stack_blocks(page: &HeadlessPage) -> Result<Vec<NodeId>, Box<dyn std::error::Error>> {
    let content = page
        .query_selector(".blog-item-content")?
        .ok_or("fixture has no content region")?;
    let blocks = page.children(&content);
    for (i, block) in blocks.iter().enumerate() {
        let rect = Rect::new(0.0, CONTENT_TOP + BLOCK_HEIGHT * i as f32, 640.0, BLOCK_HEIGHT);
        page.set_layout(block, rect);
        for nested in page.query_selector_all_within(block, "*")? {
            page.set_layout(&nested, rect);
        }
    }
    Ok(blocks)
}

/// Serializes `element`, re-parses it and lists its elements in document
/// order as `tag.class.class` strings.
pub fn outline(
    page: &HeadlessPage,
    element: &NodeId,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let html = page.outer_html(element);
    let doc = roxmltree::Document::parse(&html)?;
    Ok(doc
        .descendants()
        .filter(|n| n.is_element())
        .map(|n| {
            let mut entry = n.tag_name().name().to_string();
            for class in n.attribute("class").unwrap_or("").split_whitespace() {
                entry.push('.');
                entry.push_str(class);
            }
            entry
        })
        .collect())
}

/// Indexes of the links currently marked active.
pub fn active_links(page: &HeadlessPage, links: &[NodeId]) -> Vec<usize> {
    links
        .iter()
        .enumerate()
        .filter(|(_, l)| page.has_class(l, "is-active"))
        .map(|(i, _)| i)
        .collect()
}
