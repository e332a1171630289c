//! Places the built panel in its target container.

use crate::config::InsertPosition;
use crate::defaults;
use autotoc_traits::Page;
use log::debug;

/// Inserts `panel` into `target` at `position` and marks the body.
///
/// `Index(n)` puts the panel before the child currently at `n`; indexes past
/// the end append.
pub fn insert_panel<P: Page>(
    page: &P,
    target: &P::Element,
    panel: &P::Element,
    position: InsertPosition,
) {
    let children = page.children(target);
    let reference = match position {
        InsertPosition::Start => children.first(),
        InsertPosition::End => None,
        InsertPosition::Index(i) => children.get(i.min(children.len())),
    };
    debug!(
        "Inserting panel at {:?} among {} child(ren)",
        position,
        children.len()
    );
    page.insert_before(target, panel, reference);

    if let Some(body) = page.body() {
        page.add_class(&body, defaults::BODY_PRESENCE_CLASS);
    }
}
