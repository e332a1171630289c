//! The `Page` trait: the document surface the TOC reads and writes.
//!
//! The TOC never talks to a browser directly. Everything it needs (structural
//! queries, element creation, geometry, scrolling and event registration) goes
//! through this trait, so the same logic runs against the live DOM in wasm and
//! against an in-memory page in tests.
//!
//! # Implementations
//!
//! - `HeadlessPage` (autotoc-dom): in-memory document with explicit layout boxes
//! - `BrowserPage` (autotoc-wasm): `web-sys` bindings to `window.document`

use crate::events::{Callback, ClickHandler, FrameCallback, ScrollBehavior, Subscription};
use autotoc_types::Rect;
use std::fmt::Debug;
use thiserror::Error;

/// Errors a host can report for structural queries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PageError {
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Host operation failed: {0}")]
    Host(String),
}

pub trait Page {
    /// A handle to an element. Cloning a handle never clones the element.
    type Element: Clone + PartialEq + Debug + 'static;

    // --- Lifecycle ---

    /// Whether the document has finished parsing its body.
    fn is_ready(&self) -> bool;

    /// Runs `callback` once the document becomes ready.
    fn on_ready(&self, callback: Callback) -> Subscription;

    // --- Structure ---

    fn body(&self) -> Option<Self::Element>;

    /// The root `<html>` element.
    fn document_element(&self) -> Self::Element;

    /// First element in document order matching `selector`.
    fn query_selector(&self, selector: &str) -> Result<Option<Self::Element>, PageError>;

    /// All descendants of `scope` matching `selector`, in document order.
    fn query_selector_all_within(
        &self,
        scope: &Self::Element,
        selector: &str,
    ) -> Result<Vec<Self::Element>, PageError>;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Creates a detached element.
    fn create_element(&self, tag: &str) -> Self::Element;

    fn append_child(&self, parent: &Self::Element, child: &Self::Element);

    /// Appends a text node to `parent`.
    fn append_text(&self, parent: &Self::Element, text: &str);

    /// Inserts `child` before `reference`, or appends it when `reference` is `None`.
    fn insert_before(
        &self,
        parent: &Self::Element,
        child: &Self::Element,
        reference: Option<&Self::Element>,
    );

    /// Detaches `element` from its parent.
    fn remove(&self, element: &Self::Element);

    /// Element children of `element`, in order.
    fn children(&self, element: &Self::Element) -> Vec<Self::Element>;

    fn parent_element(&self, element: &Self::Element) -> Option<Self::Element>;

    fn next_element_sibling(&self, element: &Self::Element) -> Option<Self::Element>;

    fn text_content(&self, element: &Self::Element) -> String;

    fn set_text_content(&self, element: &Self::Element, text: &str);

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str);

    fn has_class(&self, element: &Self::Element, class: &str) -> bool;

    fn add_class(&self, element: &Self::Element, class: &str);

    fn remove_class(&self, element: &Self::Element, class: &str);

    /// Sets an inline style property. Names starting with `--` declare custom
    /// properties.
    fn set_style_property(&self, element: &Self::Element, name: &str, value: &str);

    // --- Geometry ---

    /// The element's border box relative to the viewport.
    fn bounding_client_rect(&self, element: &Self::Element) -> Rect;

    /// The element's rendered height in whole pixels.
    fn offset_height(&self, element: &Self::Element) -> f32;

    /// The computed value of `property`, forcing a style pass if needed.
    fn computed_style(&self, element: &Self::Element, property: &str) -> Option<String>;

    fn viewport_height(&self) -> f32;

    /// Vertical scroll position of the document.
    fn scroll_y(&self) -> f32;

    fn scroll_to(&self, top: f32, behavior: ScrollBehavior);

    // --- Events ---

    fn on_click(&self, element: &Self::Element, handler: ClickHandler) -> Subscription;

    fn on_scroll(&self, callback: Callback) -> Subscription;

    fn on_window_resize(&self, callback: Callback) -> Subscription;

    /// Observes size changes of `element`. `None` when the host has no resize
    /// observer facility.
    fn observe_resize(&self, element: &Self::Element, callback: Callback) -> Option<Subscription>;

    /// Observes child-list changes in `element`'s subtree. `None` when the host
    /// has no mutation observer facility.
    fn observe_mutations(
        &self,
        element: &Self::Element,
        callback: Callback,
    ) -> Option<Subscription>;

    fn request_animation_frame(&self, callback: FrameCallback) -> Subscription;
}
