//! Highlights the link of the section currently under the active zone.
//!
//! Each evaluation walks the sections in document order, takes the last one
//! whose top edge is above `viewport_height * zone`, clears `is-active` from
//! every link and sets it on the link whose `href` targets that section. The
//! whole transition happens inside one synchronous call, so no observer ever
//! sees a half-updated panel. Scroll events are coalesced to at most one
//! evaluation per animation frame.

use crate::builder::{HeadingEntry, TocLink};
use crate::defaults;
use crate::section::{Section, active_section_index};
use crate::throttle::FrameThrottle;
use autotoc_traits::{Page, Subscription};
use autotoc_types::AnchorId;
use log::{debug, trace};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

struct TrackerState<P: Page> {
    page: Weak<P>,
    headings: Vec<HeadingEntry<P::Element>>,
    links: Vec<P::Element>,
    zone: f64,
    active: RefCell<Option<AnchorId>>,
    throttle: FrameThrottle,
}

impl<P: Page + 'static> TrackerState<P> {
    fn request(self: &Rc<Self>) {
        let Some(page) = self.page.upgrade() else {
            return;
        };
        let state = Rc::clone(self);
        self.throttle.schedule(page.as_ref(), move || state.evaluate());
    }

    fn evaluate(&self) {
        let Some(page) = self.page.upgrade() else {
            return;
        };
        let page = page.as_ref();
        let threshold = (f64::from(page.viewport_height()) * self.zone) as f32;
        let sections = Section::collect(page, &self.headings);
        let index = active_section_index(sections.iter().map(|s| s.top(page)), threshold);

        for link in &self.links {
            page.remove_class(link, defaults::ACTIVE_CLASS);
        }

        let active = index.map(|i| sections[i].id.clone());
        if let Some(id) = &active {
            let selector = format!(".{}[href=\"{}\"]", defaults::ITEM_CLASS, id.fragment());
            match page.query_selector(&selector) {
                Ok(Some(link)) => page.add_class(&link, defaults::ACTIVE_CLASS),
                Ok(None) => trace!("No link targets {}", id),
                Err(e) => debug!("Active link lookup failed: {}", e),
            }
        }
        trace!("Active section at threshold {}: {:?}", threshold, active);
        *self.active.borrow_mut() = active;
    }
}

pub struct ActiveSectionTracker<P: Page> {
    state: Rc<TrackerState<P>>,
    scroll: Subscription,
}

impl<P: Page + 'static> ActiveSectionTracker<P> {
    /// Starts tracking and evaluates once right away.
    ///
    /// `zone` is the active-zone fraction of the viewport height.
    pub fn attach(
        page: &Rc<P>,
        headings: Vec<HeadingEntry<P::Element>>,
        links: &[TocLink<P::Element>],
        zone: f64,
    ) -> Self {
        let state = Rc::new(TrackerState {
            page: Rc::downgrade(page),
            headings,
            links: links.iter().map(|l| l.element.clone()).collect(),
            zone,
            active: RefCell::new(None),
            throttle: FrameThrottle::new(),
        });

        let on_scroll = Rc::clone(&state);
        let scroll = page.on_scroll(Rc::new(move || on_scroll.request()));
        state.evaluate();

        Self { state, scroll }
    }

    /// The section highlighted by the last evaluation.
    pub fn active_id(&self) -> Option<AnchorId> {
        self.state.active.borrow().clone()
    }

    /// Re-evaluates immediately, bypassing the frame throttle.
    pub fn evaluate(&self) {
        self.state.evaluate();
    }

    pub fn detach(self) {
        self.scroll.detach();
        self.state.throttle.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TocBuilder;
    use crate::config::Configuration;
    use crate::insert::insert_panel;
    use autotoc_dom::{HeadlessPage, NodeId};
    use autotoc_traits::ScrollBehavior;
    use autotoc_types::Rect;

    const ARTICLE: &str = r#"<html><body>
        <div class="blog-item-top-wrapper"/>
        <div class="blog-item-content">
            <div class="html-block"><h3>Intro</h3></div>
            <div class="html-block"><p>One</p></div>
            <div class="html-block"><h3>Details</h3></div>
            <div class="html-block"><p>Two</p></div>
            <div class="html-block"><h3>Summary</h3></div>
            <div class="html-block"><p>Three</p></div>
        </div>
    </body></html>"#;

    struct Fixture {
        page: Rc<HeadlessPage>,
        tracker: ActiveSectionTracker<HeadlessPage>,
        links: Vec<NodeId>,
    }

    /// Each block is 400px tall, stacked from y = 1000.
    fn fixture(zone: f64) -> Fixture {
        let _ = env_logger::builder().is_test(true).try_init();
        let page = Rc::new(HeadlessPage::from_markup(ARTICLE).unwrap());
        let content = page.query_selector(".blog-item-content").unwrap().unwrap();
        for (i, block) in page.children(&content).iter().enumerate() {
            let rect = Rect::new(0.0, 1000.0 + 400.0 * i as f32, 600.0, 400.0);
            page.set_layout(block, rect);
            for child in page.children(block) {
                page.set_layout(&child, rect);
            }
        }

        let config = Rc::new(Configuration::default());
        let built = TocBuilder::new(Rc::clone(&page), config).build().unwrap();
        insert_panel(page.as_ref(), &built.target, &built.panel.container, Default::default());
        let tracker = ActiveSectionTracker::attach(&page, built.headings, &built.panel.links, zone);
        let links = built.panel.links.iter().map(|l| l.element).collect();
        Fixture { page, tracker, links }
    }

    fn active_links(f: &Fixture) -> Vec<usize> {
        f.links
            .iter()
            .enumerate()
            .filter(|(_, l)| f.page.has_class(l, defaults::ACTIVE_CLASS))
            .map(|(i, _)| i)
            .collect()
    }

    fn scroll(f: &Fixture, y: f32) {
        f.page.scroll_to(y, ScrollBehavior::Auto);
        f.page.tick();
    }

    #[test]
    fn test_initially_none_active_above_content() {
        let f = fixture(0.3);
        assert_eq!(f.tracker.active_id(), None);
        assert!(active_links(&f).is_empty());
    }

    #[test]
    fn test_activation_follows_scroll() {
        // threshold = 800 * 0.3 = 240
        let f = fixture(0.3);
        scroll(&f, 800.0); // Intro top at 200
        assert_eq!(active_links(&f), vec![0]);
        assert_eq!(f.tracker.active_id().unwrap().as_str(), "Intro_0");

        scroll(&f, 1600.0); // Details top at 200
        assert_eq!(active_links(&f), vec![1]);

        scroll(&f, 5000.0);
        assert_eq!(active_links(&f), vec![2]);

        scroll(&f, 0.0);
        assert!(active_links(&f).is_empty());
        assert_eq!(f.tracker.active_id(), None);
    }

    #[test]
    fn test_threshold_is_strict() {
        let f = fixture(0.3);
        scroll(&f, 760.0); // Intro top exactly at 240
        assert!(active_links(&f).is_empty());
        scroll(&f, 761.0);
        assert_eq!(active_links(&f), vec![0]);
    }

    #[test]
    fn test_zone_scales_threshold() {
        let f = fixture(1.0);
        scroll(&f, 300.0); // Intro top at 700 < 800
        assert_eq!(active_links(&f), vec![0]);
    }

    #[test]
    fn test_scroll_updates_wait_for_frame() {
        let f = fixture(0.3);
        for y in [200.0, 400.0, 600.0, 800.0] {
            f.page.scroll_to(y, ScrollBehavior::Auto);
        }
        assert!(active_links(&f).is_empty());
        assert_eq!(f.page.pending_frames(), 1);
        f.page.tick();
        assert_eq!(active_links(&f), vec![0]);
    }

    #[test]
    fn test_at_most_one_active_link() {
        let f = fixture(0.3);
        for y in (0..40).map(|i| i as f32 * 137.0) {
            scroll(&f, y);
            assert!(active_links(&f).len() <= 1, "scroll {}", y);
        }
    }

    #[test]
    fn test_detach_stops_tracking() {
        let f = fixture(0.3);
        let Fixture { page, tracker, links } = f;
        tracker.detach();
        assert_eq!(page.listener_counts().scroll, 0);
        page.scroll_to(800.0, ScrollBehavior::Auto);
        page.tick();
        assert!(!links.iter().any(|l| page.has_class(l, defaults::ACTIVE_CLASS)));
    }

    #[test]
    fn test_detach_cancels_pending_frame() {
        let Fixture { page, tracker, .. } = fixture(0.3);
        page.scroll_to(800.0, ScrollBehavior::Auto);
        assert_eq!(page.pending_frames(), 1);
        tracker.detach();
        assert_eq!(page.pending_frames(), 0);
    }
}
