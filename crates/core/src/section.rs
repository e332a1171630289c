//! Sections: a heading plus the sibling blocks that follow it.

use crate::builder::HeadingEntry;
use autotoc_traits::Page;
use autotoc_types::AnchorId;

#[derive(Debug, Clone, PartialEq)]
pub struct Section<E> {
    pub id: AnchorId,
    pub heading: E,
    /// Siblings after the heading's parent, up to the next heading's parent.
    pub blocks: Vec<E>,
}

impl<E: Clone + PartialEq> Section<E> {
    /// Derives sections from headings in document order.
    ///
    /// Headings are expected to sit one level below the blocks that make up
    /// the article (as in `div.html-block > h3`). Layout can change between
    /// reads, so callers recompute rather than cache.
    pub fn collect<P>(page: &P, headings: &[HeadingEntry<E>]) -> Vec<Section<E>>
    where
        P: Page<Element = E>,
    {
        headings
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let stop = headings
                    .get(i + 1)
                    .and_then(|next| page.parent_element(&next.element));
                let mut blocks = Vec::new();
                let mut node = page
                    .parent_element(&entry.element)
                    .and_then(|parent| page.next_element_sibling(&parent));
                while let Some(block) = node {
                    if stop.as_ref() == Some(&block) {
                        break;
                    }
                    node = page.next_element_sibling(&block);
                    blocks.push(block);
                }
                Section {
                    id: entry.id.clone(),
                    heading: entry.element.clone(),
                    blocks,
                }
            })
            .collect()
    }

    /// The highest top edge among the heading and its blocks, in viewport
    /// coordinates.
    pub fn top<P>(&self, page: &P) -> f32
    where
        P: Page<Element = E>,
    {
        self.blocks
            .iter()
            .map(|b| page.bounding_client_rect(b).top())
            .fold(page.bounding_client_rect(&self.heading).top(), f32::min)
    }
}

/// Index of the last section whose top is above `threshold`.
///
/// Scanning stops at the first top at or below the threshold; tops are taken
/// to increase in document order and are not re-sorted.
pub fn active_section_index<I>(tops: I, threshold: f32) -> Option<usize>
where
    I: IntoIterator<Item = f32>,
{
    let mut active = None;
    for (i, top) in tops.into_iter().enumerate() {
        if top < threshold {
            active = Some(i);
        } else {
            break;
        }
    }
    active
}
