//! Callback types and subscription handles for host events.
//!
//! Everything here is single-threaded: callbacks are reference counted with
//! `Rc` and are only ever invoked from the host's event loop.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// A handler for events that carry no payload (scroll, resize, mutation, ready).
pub type Callback = Rc<dyn Fn()>;

/// A one-shot handler run on the next animation frame.
pub type FrameCallback = Box<dyn FnOnce()>;

/// A handler for clicks on a specific element.
pub type ClickHandler = Rc<dyn Fn(&ClickEvent)>;

/// How a programmatic scroll should be animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Auto,
    Smooth,
}

/// The host-independent view of a click event.
#[derive(Debug, Default)]
pub struct ClickEvent {
    default_prevented: Cell<bool>,
}

impl ClickEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppresses the host's default navigation for this click.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// A registered listener or observer.
///
/// `detach` removes the registration. Dropping a subscription without
/// detaching it leaves the registration in place for the rest of the page's
/// lifetime, which is what a static page wants: hosts keep listener state in
/// their own registries, so the detach action holds only a key into it.
#[must_use = "dropping a Subscription keeps the listener installed; call `detach` to remove it"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(detach: impl FnOnce() + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// A subscription with nothing to undo.
    pub fn noop() -> Self {
        Self { detach: None }
    }

    pub fn detach(mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detach_runs_once() {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let sub = Subscription::new(move || c.set(c.get() + 1));
        sub.detach();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_drop_does_not_detach() {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        drop(Subscription::new(move || c.set(c.get() + 1)));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_click_event_prevent_default() {
        let event = ClickEvent::new();
        assert!(!event.default_prevented());
        event.prevent_default();
        assert!(event.default_prevented());
    }
}
