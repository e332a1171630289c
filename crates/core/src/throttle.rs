//! Coalesces bursts of requests into one run per animation frame.

use autotoc_traits::{Page, Subscription};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct FrameThrottle {
    pending: Rc<Cell<bool>>,
    frame: RefCell<Option<Subscription>>,
}

impl FrameThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `work` on the next animation frame unless a run is already
    /// scheduled. The pending flag clears before `work` runs, so requests made
    /// while it runs schedule a new frame.
    pub fn schedule<P, F>(&self, page: &P, work: F)
    where
        P: Page,
        F: FnOnce() + 'static,
    {
        if self.pending.replace(true) {
            return;
        }
        let pending = Rc::clone(&self.pending);
        let sub = page.request_animation_frame(Box::new(move || {
            pending.set(false);
            work();
        }));
        *self.frame.borrow_mut() = Some(sub);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Drops a scheduled run, if any.
    pub fn cancel(&self) {
        if let Some(sub) = self.frame.borrow_mut().take() {
            sub.detach();
        }
        self.pending.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autotoc_dom::HeadlessPage;

    #[test]
    fn test_coalesces_within_a_frame() {
        let page = HeadlessPage::new();
        let throttle = FrameThrottle::new();
        let runs = Rc::new(Cell::new(0));
        for _ in 0..10 {
            let r = Rc::clone(&runs);
            throttle.schedule(&page, move || r.set(r.get() + 1));
        }
        assert!(throttle.is_pending());
        assert_eq!(page.pending_frames(), 1);
        page.tick();
        assert_eq!(runs.get(), 1);
        assert!(!throttle.is_pending());

        let r = Rc::clone(&runs);
        throttle.schedule(&page, move || r.set(r.get() + 1));
        page.tick();
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_cancel() {
        let page = HeadlessPage::new();
        let throttle = FrameThrottle::new();
        let runs = Rc::new(Cell::new(0));
        let r = Rc::clone(&runs);
        throttle.schedule(&page, move || r.set(r.get() + 1));
        throttle.cancel();
        assert_eq!(page.pending_frames(), 0);
        page.tick();
        assert_eq!(runs.get(), 0);
        assert!(!throttle.is_pending());
    }
}
