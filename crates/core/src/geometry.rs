//! Publishes the panel's height as `--toc-height` on the root element.

use crate::defaults;
use autotoc_style::length::format_px;
use autotoc_traits::{Callback, Page, Subscription};
use log::{debug, trace};
use std::rc::{Rc, Weak};

/// Keeps `--toc-height` current while attached.
///
/// Reacts to the panel resizing, to child-list changes anywhere inside it and
/// to window resizes. Hosts without observer support still get the window
/// resize listener and the publish made at attach time.
#[derive(Debug)]
pub struct GeometryPublisher {
    subscriptions: Vec<Subscription>,
}

impl GeometryPublisher {
    pub fn attach<P: Page + 'static>(page: &Rc<P>, panel: &P::Element) -> Self {
        let weak: Weak<P> = Rc::downgrade(page);
        let target = panel.clone();
        let update: Callback = Rc::new(move || {
            if let Some(page) = weak.upgrade() {
                publish(page.as_ref(), &target);
            }
        });

        let mut subscriptions = Vec::with_capacity(3);
        match page.observe_resize(panel, Rc::clone(&update)) {
            Some(sub) => subscriptions.push(sub),
            None => debug!("Resize observation unavailable, relying on window resize"),
        }
        match page.observe_mutations(panel, Rc::clone(&update)) {
            Some(sub) => subscriptions.push(sub),
            None => debug!("Mutation observation unavailable"),
        }
        subscriptions.push(page.on_window_resize(Rc::clone(&update)));

        update();
        Self { subscriptions }
    }

    pub fn detach(self) {
        for sub in self.subscriptions {
            sub.detach();
        }
    }
}

/// Writes the panel's current height to the root element.
pub fn publish<P: Page>(page: &P, panel: &P::Element) {
    let height = format_px(page.offset_height(panel));
    trace!("{} = {}", defaults::HEIGHT_VARIABLE, height);
    page.set_style_property(&page.document_element(), defaults::HEIGHT_VARIABLE, &height);
}
