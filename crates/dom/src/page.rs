//! `HeadlessPage`: an in-memory `Page`.
//!
//! Layout is explicit: callers assign each element a box in document
//! coordinates with [`HeadlessPage::set_layout`]. Events are dispatched
//! synchronously (scroll, window resize, clicks) or on [`HeadlessPage::tick`]
//! (mutation observers, resize observers, animation frames), which stands in
//! for one turn of a browser's rendering loop.

use crate::document::{Document, NodeId};
use crate::error::DomError;
use crate::markup;
use crate::selector::SelectorList;
use autotoc_style::length::format_px;
use autotoc_style::parsers::parse_length_value;
use autotoc_style::substitute_vars;
use autotoc_traits::{
    Callback, ClickEvent, ClickHandler, FrameCallback, Page, PageError, ScrollBehavior,
    Subscription,
};
use autotoc_types::{Rect, Size};
use log::trace;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Default viewport, roughly a laptop browser window.
pub const DEFAULT_VIEWPORT: Size = Size {
    width: 1280.0,
    height: 800.0,
};

type ListenerId = u64;

struct ResizeObservation {
    id: ListenerId,
    target: NodeId,
    callback: Callback,
    last_size: Option<Size>,
}

struct MutationObservation {
    id: ListenerId,
    target: NodeId,
    callback: Callback,
    pending: bool,
}

#[derive(Default)]
struct Listeners {
    next_id: ListenerId,
    ready: Vec<(ListenerId, Callback)>,
    scroll: Vec<(ListenerId, Callback)>,
    window_resize: Vec<(ListenerId, Callback)>,
    clicks: Vec<(ListenerId, NodeId, ClickHandler)>,
    resize_observers: Vec<ResizeObservation>,
    mutation_observers: Vec<MutationObservation>,
    frames: Vec<(ListenerId, FrameCallback)>,
}

impl Listeners {
    fn next_id(&mut self) -> ListenerId {
        self.next_id += 1;
        self.next_id
    }

    fn remove(&mut self, id: ListenerId) {
        self.ready.retain(|(i, _)| *i != id);
        self.scroll.retain(|(i, _)| *i != id);
        self.window_resize.retain(|(i, _)| *i != id);
        self.clicks.retain(|(i, _, _)| *i != id);
        self.resize_observers.retain(|o| o.id != id);
        self.mutation_observers.retain(|o| o.id != id);
        self.frames.retain(|(i, _)| *i != id);
    }
}

/// Counts of live registrations, for asserting on teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenerCounts {
    pub scroll: usize,
    pub window_resize: usize,
    pub clicks: usize,
    pub resize_observers: usize,
    pub mutation_observers: usize,
    pub frames: usize,
}

pub struct HeadlessPage {
    doc: RefCell<Document>,
    listeners: Rc<RefCell<Listeners>>,
    ready: Cell<bool>,
    scroll_y: Cell<f32>,
    viewport: Cell<Size>,
    last_scroll_behavior: Cell<Option<ScrollBehavior>>,
    observers_supported: bool,
}

impl Default for HeadlessPage {
    fn default() -> Self {
        Self::with_document(Document::new())
    }
}

impl HeadlessPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(doc: Document) -> Self {
        Self {
            doc: RefCell::new(doc),
            listeners: Rc::new(RefCell::new(Listeners::default())),
            ready: Cell::new(true),
            scroll_y: Cell::new(0.0),
            viewport: Cell::new(DEFAULT_VIEWPORT),
            last_scroll_behavior: Cell::new(None),
            observers_supported: true,
        }
    }

    /// Parses XHTML-style markup into a ready page.
    pub fn from_markup(markup: &str) -> Result<Self, DomError> {
        Ok(Self::with_document(markup::parse_document(markup)?))
    }

    /// Emulates a host without `ResizeObserver`/`MutationObserver`.
    pub fn without_observers(mut self) -> Self {
        self.observers_supported = false;
        self
    }

    // --- Test controls ---

    /// Puts the page back into the "still parsing" state.
    pub fn set_loading(&self) {
        self.ready.set(false);
    }

    /// Marks the page ready and runs pending ready callbacks once.
    pub fn finish_loading(&self) {
        self.ready.set(true);
        let callbacks: Vec<Callback> = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.ready.drain(..).map(|(_, cb)| cb).collect()
        };
        for cb in callbacks {
            cb();
        }
    }

    pub fn set_layout(&self, element: &NodeId, rect: Rect) {
        self.doc.borrow_mut().set_layout(*element, rect);
    }

    pub fn layout(&self, element: &NodeId) -> Option<Rect> {
        self.doc.borrow().layout(*element)
    }

    /// Resizes the viewport and fires window resize listeners.
    pub fn resize_viewport(&self, size: Size) {
        self.viewport.set(size);
        let callbacks: Vec<Callback> = self
            .listeners
            .borrow()
            .window_resize
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();
        for cb in callbacks {
            cb();
        }
    }

    /// Dispatches a click on `element`. Returns whether a handler prevented the
    /// default action. Unprevented clicks on `href="#id"` anchors jump to the
    /// target like a browser would.
    pub fn click(&self, element: &NodeId) -> bool {
        let handlers: Vec<ClickHandler> = self
            .listeners
            .borrow()
            .clicks
            .iter()
            .filter(|(_, target, _)| target == element)
            .map(|(_, _, h)| h.clone())
            .collect();

        let event = ClickEvent::new();
        for handler in handlers {
            handler(&event);
        }
        if event.default_prevented() {
            return true;
        }

        let fragment_target = self
            .attribute(element, "href")
            .and_then(|href| href.strip_prefix('#').map(str::to_string))
            .and_then(|id| self.element_by_id(&id));
        if let Some(target) = fragment_target {
            let top = self.layout(&target).unwrap_or_default().top();
            self.scroll_to(top, ScrollBehavior::Auto);
        }
        false
    }

    pub fn last_scroll_behavior(&self) -> Option<ScrollBehavior> {
        self.last_scroll_behavior.get()
    }

    /// Runs one rendering-loop turn: mutation observers, then resize
    /// observers, then the animation frames queued before this call.
    pub fn tick(&self) {
        self.deliver_mutations();
        self.deliver_resizes();
        self.run_frames();
    }

    pub fn pending_frames(&self) -> usize {
        self.listeners.borrow().frames.len()
    }

    pub fn listener_counts(&self) -> ListenerCounts {
        let l = self.listeners.borrow();
        ListenerCounts {
            scroll: l.scroll.len(),
            window_resize: l.window_resize.len(),
            clicks: l.clicks.len(),
            resize_observers: l.resize_observers.len(),
            mutation_observers: l.mutation_observers.len(),
            frames: l.frames.len(),
        }
    }

    pub fn outer_html(&self, element: &NodeId) -> String {
        self.doc.borrow().outer_html(*element)
    }

    pub fn tag(&self, element: &NodeId) -> Option<String> {
        self.doc.borrow().tag(*element).map(str::to_string)
    }

    pub fn style_property(&self, element: &NodeId, name: &str) -> Option<String> {
        self.doc
            .borrow()
            .style_property(*element, name)
            .map(str::to_string)
    }

    /// All elements in the document matching `selector`.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, PageError> {
        let root = self.doc.borrow().root();
        let mut all = self.query_selector_all_within(&root, selector)?;
        let doc = self.doc.borrow();
        if let Ok(list) = SelectorList::parse(selector) {
            if doc.matches(root, &list) {
                all.insert(0, root);
            }
        }
        Ok(all)
    }

    // --- Event plumbing ---

    fn subscription(&self, id: ListenerId) -> Subscription {
        let listeners: Weak<RefCell<Listeners>> = Rc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.borrow_mut().remove(id);
            }
        })
    }

    fn register<F>(&self, add: F) -> Subscription
    where
        F: FnOnce(&mut Listeners, ListenerId),
    {
        let id = {
            let mut listeners = self.listeners.borrow_mut();
            let id = listeners.next_id();
            add(&mut listeners, id);
            id
        };
        self.subscription(id)
    }

    fn note_child_list_change(&self, parent: NodeId) {
        let doc = self.doc.borrow();
        let mut listeners = self.listeners.borrow_mut();
        for obs in listeners.mutation_observers.iter_mut() {
            if doc.is_inclusive_ancestor(obs.target, parent) {
                obs.pending = true;
            }
        }
    }

    fn deliver_mutations(&self) {
        let callbacks: Vec<Callback> = {
            let mut listeners = self.listeners.borrow_mut();
            listeners
                .mutation_observers
                .iter_mut()
                .filter(|o| o.pending)
                .map(|o| {
                    o.pending = false;
                    o.callback.clone()
                })
                .collect()
        };
        for cb in callbacks {
            cb();
        }
    }

    fn deliver_resizes(&self) {
        let callbacks: Vec<Callback> = {
            let doc = self.doc.borrow();
            let mut listeners = self.listeners.borrow_mut();
            listeners
                .resize_observers
                .iter_mut()
                .filter_map(|o| {
                    let size = doc.layout(o.target).unwrap_or_default().size();
                    if o.last_size == Some(size) {
                        return None;
                    }
                    o.last_size = Some(size);
                    Some(o.callback.clone())
                })
                .collect()
        };
        for cb in callbacks {
            cb();
        }
    }

    fn run_frames(&self) {
        let frames = std::mem::take(&mut self.listeners.borrow_mut().frames);
        trace!("Running {} animation frame callback(s)", frames.len());
        for (_, frame) in frames {
            frame();
        }
    }

    fn parse_selector(selector: &str) -> Result<SelectorList, PageError> {
        SelectorList::parse(selector).map_err(|e| PageError::InvalidSelector {
            selector: selector.to_string(),
            message: e.to_string(),
        })
    }
}

/// Value a property falls back to when its declaration is invalid at
/// computed-value time.
fn initial_value(property: &str) -> Option<&'static str> {
    match property {
        "scroll-margin-top" | "margin-top" | "padding-top" | "top" => Some("0px"),
        _ => None,
    }
}

impl Page for HeadlessPage {
    type Element = NodeId;

    fn is_ready(&self) -> bool {
        self.ready.get()
    }

    fn on_ready(&self, callback: Callback) -> Subscription {
        self.register(|l, id| l.ready.push((id, callback)))
    }

    fn body(&self) -> Option<NodeId> {
        let doc = self.doc.borrow();
        let body = doc.body();
        doc.is_connected(body).then_some(body)
    }

    fn document_element(&self) -> NodeId {
        self.doc.borrow().root()
    }

    fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, PageError> {
        let list = Self::parse_selector(selector)?;
        let doc = self.doc.borrow();
        let root = doc.root();
        if doc.matches(root, &list) {
            return Ok(Some(root));
        }
        Ok(doc.descendants(root).into_iter().find(|&id| doc.matches(id, &list)))
    }

    fn query_selector_all_within(
        &self,
        scope: &NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>, PageError> {
        let list = Self::parse_selector(selector)?;
        let doc = self.doc.borrow();
        Ok(doc
            .descendants(*scope)
            .into_iter()
            .filter(|&id| doc.matches(id, &list))
            .collect())
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let doc = self.doc.borrow();
        doc.descendants(doc.root())
            .into_iter()
            .find(|&n| doc.attribute(n, "id") == Some(id))
    }

    fn create_element(&self, tag: &str) -> NodeId {
        self.doc.borrow_mut().create_element(tag)
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) {
        self.insert_before(parent, child, None);
    }

    fn append_text(&self, parent: &NodeId, text: &str) {
        {
            let mut doc = self.doc.borrow_mut();
            let t = doc.create_text(text);
            doc.append_child(*parent, t);
        }
        self.note_child_list_change(*parent);
    }

    fn insert_before(&self, parent: &NodeId, child: &NodeId, reference: Option<&NodeId>) {
        let old_parent = self
            .doc
            .borrow_mut()
            .detach(*child);
        self.doc
            .borrow_mut()
            .insert_before(*parent, *child, reference.copied());
        if let Some(old) = old_parent {
            self.note_child_list_change(old);
        }
        self.note_child_list_change(*parent);
    }

    fn remove(&self, element: &NodeId) {
        let old_parent = self.doc.borrow_mut().detach(*element);
        if let Some(old) = old_parent {
            self.note_child_list_change(old);
        }
    }

    fn children(&self, element: &NodeId) -> Vec<NodeId> {
        self.doc.borrow().element_children(*element)
    }

    fn parent_element(&self, element: &NodeId) -> Option<NodeId> {
        self.doc.borrow().parent_element(*element)
    }

    fn next_element_sibling(&self, element: &NodeId) -> Option<NodeId> {
        self.doc.borrow().next_element_sibling(*element)
    }

    fn text_content(&self, element: &NodeId) -> String {
        self.doc.borrow().text_content(*element)
    }

    fn set_text_content(&self, element: &NodeId, text: &str) {
        self.doc.borrow_mut().set_text_content(*element, text);
        self.note_child_list_change(*element);
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.doc
            .borrow()
            .attribute(*element, name)
            .map(str::to_string)
    }

    fn set_attribute(&self, element: &NodeId, name: &str, value: &str) {
        self.doc.borrow_mut().set_attribute(*element, name, value);
    }

    fn has_class(&self, element: &NodeId, class: &str) -> bool {
        self.doc.borrow().has_class(*element, class)
    }

    fn add_class(&self, element: &NodeId, class: &str) {
        self.doc.borrow_mut().add_class(*element, class);
    }

    fn remove_class(&self, element: &NodeId, class: &str) {
        self.doc.borrow_mut().remove_class(*element, class);
    }

    fn set_style_property(&self, element: &NodeId, name: &str, value: &str) {
        self.doc
            .borrow_mut()
            .set_style_property(*element, name, value);
    }

    fn bounding_client_rect(&self, element: &NodeId) -> Rect {
        self.doc
            .borrow()
            .layout(*element)
            .unwrap_or_default()
            .translate_y(-self.scroll_y.get())
    }

    fn offset_height(&self, element: &NodeId) -> f32 {
        self.doc
            .borrow()
            .layout(*element)
            .map(|r| r.height.round())
            .unwrap_or(0.0)
    }

    fn computed_style(&self, element: &NodeId, property: &str) -> Option<String> {
        let doc = self.doc.borrow();
        if property.starts_with("--") {
            return doc.inherited_custom_property(*element, property);
        }
        let Some(declared) = doc.style_property(*element, property) else {
            return initial_value(property).map(str::to_string);
        };
        let resolved = match substitute_vars(declared, |name| {
            doc.inherited_custom_property(*element, name)
        }) {
            Ok(v) => v,
            Err(e) => {
                trace!("{} on {} is invalid at computed-value time: {}", property, element, e);
                return initial_value(property).map(str::to_string);
            }
        };
        match parse_length_value(&resolved) {
            Ok(length) => Some(format_px(length.to_px())),
            Err(_) => Some(resolved),
        }
    }

    fn viewport_height(&self) -> f32 {
        self.viewport.get().height
    }

    fn scroll_y(&self) -> f32 {
        self.scroll_y.get()
    }

    fn scroll_to(&self, top: f32, behavior: ScrollBehavior) {
        let top = top.max(0.0);
        self.last_scroll_behavior.set(Some(behavior));
        if top == self.scroll_y.get() {
            return;
        }
        self.scroll_y.set(top);
        let callbacks: Vec<Callback> = self
            .listeners
            .borrow()
            .scroll
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();
        for cb in callbacks {
            cb();
        }
    }

    fn on_click(&self, element: &NodeId, handler: ClickHandler) -> Subscription {
        let target = *element;
        self.register(|l, id| l.clicks.push((id, target, handler)))
    }

    fn on_scroll(&self, callback: Callback) -> Subscription {
        self.register(|l, id| l.scroll.push((id, callback)))
    }

    fn on_window_resize(&self, callback: Callback) -> Subscription {
        self.register(|l, id| l.window_resize.push((id, callback)))
    }

    fn observe_resize(&self, element: &NodeId, callback: Callback) -> Option<Subscription> {
        if !self.observers_supported {
            return None;
        }
        let target = *element;
        Some(self.register(|l, id| {
            l.resize_observers.push(ResizeObservation {
                id,
                target,
                callback,
                last_size: None,
            })
        }))
    }

    fn observe_mutations(&self, element: &NodeId, callback: Callback) -> Option<Subscription> {
        if !self.observers_supported {
            return None;
        }
        let target = *element;
        Some(self.register(|l, id| {
            l.mutation_observers.push(MutationObservation {
                id,
                target,
                callback,
                pending: false,
            })
        }))
    }

    fn request_animation_frame(&self, callback: FrameCallback) -> Subscription {
        self.register(|l, id| l.frames.push((id, callback)))
    }
}
