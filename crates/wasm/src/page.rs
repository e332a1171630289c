//! `BrowserPage`: the [`Page`] implementation over `web-sys`.
//!
//! Listener closures live in a registry owned by the page. A
//! [`Subscription`] holds only the registry key; detaching removes the
//! listener from its target (or disconnects the observer, or cancels the
//! frame) and drops the closure.

use autotoc_traits::{
    Callback, ClickEvent, ClickHandler, FrameCallback, Page, PageError, ScrollBehavior,
    Subscription,
};
use autotoc_types::Rect;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement, MutationObserver,
    MutationObserverInit, Node, ResizeObserver, ScrollToOptions, Window,
};

type RegistrationId = u64;

enum Registration {
    Listener {
        target: EventTarget,
        event: &'static str,
        closure: Closure<dyn Fn(Event)>,
    },
    /// A `once` listener whose closure frees itself when it fires.
    OneShot {
        target: EventTarget,
        event: &'static str,
        function: js_sys::Function,
    },
    Resize {
        observer: ResizeObserver,
        _closure: Closure<dyn Fn()>,
    },
    Mutation {
        observer: MutationObserver,
        _closure: Closure<dyn Fn()>,
    },
    Frame {
        handle: i32,
    },
}

impl Registration {
    fn release(self, window: &Window) {
        match self {
            Registration::Listener {
                target,
                event,
                closure,
            } => {
                let _ = target
                    .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            }
            Registration::OneShot {
                target,
                event,
                function,
            } => {
                let _ = target.remove_event_listener_with_callback(event, &function);
            }
            Registration::Resize { observer, .. } => observer.disconnect(),
            Registration::Mutation { observer, .. } => observer.disconnect(),
            Registration::Frame { handle } => {
                let _ = window.cancel_animation_frame(handle);
            }
        }
    }
}

#[derive(Default)]
struct Registry {
    next_id: RegistrationId,
    entries: HashMap<RegistrationId, Registration>,
}

impl Registry {
    fn reserve(&mut self) -> RegistrationId {
        self.next_id += 1;
        self.next_id
    }
}

pub struct BrowserPage {
    window: Window,
    document: Document,
    registry: Rc<RefCell<Registry>>,
}

impl BrowserPage {
    /// `None` outside a window context.
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self {
            window,
            document,
            registry: Rc::new(RefCell::new(Registry::default())),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    fn insert(&self, id: RegistrationId, registration: Registration) -> Subscription {
        self.registry.borrow_mut().entries.insert(id, registration);
        let registry: Weak<RefCell<Registry>> = Rc::downgrade(&self.registry);
        let window = self.window.clone();
        Subscription::new(move || {
            let removed = registry
                .upgrade()
                .and_then(|r| r.borrow_mut().entries.remove(&id));
            if let Some(registration) = removed {
                registration.release(&window);
            }
        })
    }

    fn listen(&self, target: EventTarget, event: &'static str, closure: Closure<dyn Fn(Event)>) -> Subscription {
        if let Err(e) =
            target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            debug!("Failed to add {} listener: {:?}", event, e);
            return Subscription::noop();
        }
        let id = self.registry.borrow_mut().reserve();
        self.insert(
            id,
            Registration::Listener {
                target,
                event,
                closure,
            },
        )
    }

    fn listen_window(&self, event: &'static str, callback: Callback) -> Subscription {
        let closure = Closure::<dyn Fn(Event)>::new(move |_: Event| callback());
        self.listen(self.window.clone().into(), event, closure)
    }

    fn html(element: &Element) -> Option<&HtmlElement> {
        element.dyn_ref::<HtmlElement>()
    }
}

fn invalid_selector(selector: &str, error: JsValue) -> PageError {
    let message = error
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .unwrap_or_else(|| format!("{:?}", error));
    PageError::InvalidSelector {
        selector: selector.to_string(),
        message,
    }
}

fn log_failure(what: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        debug!("{} failed: {:?}", what, e);
    }
}

impl Page for BrowserPage {
    type Element = Element;

    fn is_ready(&self) -> bool {
        self.document.ready_state() != "loading"
    }

    fn on_ready(&self, callback: Callback) -> Subscription {
        let id = self.registry.borrow_mut().reserve();
        let registry: Weak<RefCell<Registry>> = Rc::downgrade(&self.registry);
        let function: js_sys::Function = Closure::once_into_js(move || {
            if let Some(registry) = registry.upgrade() {
                registry.borrow_mut().entries.remove(&id);
            }
            callback();
        })
        .unchecked_into();

        let target: EventTarget = self.document.clone().into();
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        if let Err(e) = target.add_event_listener_with_callback_and_add_event_listener_options(
            "DOMContentLoaded",
            &function,
            &options,
        ) {
            debug!("Failed to add DOMContentLoaded listener: {:?}", e);
            return Subscription::noop();
        }
        self.insert(
            id,
            Registration::OneShot {
                target,
                event: "DOMContentLoaded",
                function,
            },
        )
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Into::into)
    }

    fn document_element(&self) -> Element {
        self.document
            .document_element()
            .expect_throw("document has no root element")
    }

    fn query_selector(&self, selector: &str) -> Result<Option<Element>, PageError> {
        self.document
            .query_selector(selector)
            .map_err(|e| invalid_selector(selector, e))
    }

    fn query_selector_all_within(
        &self,
        scope: &Element,
        selector: &str,
    ) -> Result<Vec<Element>, PageError> {
        let nodes = scope
            .query_selector_all(selector)
            .map_err(|e| invalid_selector(selector, e))?;
        Ok((0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|n| n.dyn_into::<Element>().ok())
            .collect())
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn create_element(&self, tag: &str) -> Element {
        self.document
            .create_element(tag)
            .expect_throw("invalid tag name")
    }

    fn append_child(&self, parent: &Element, child: &Element) {
        log_failure("appendChild", parent.append_child(child).map(drop));
    }

    fn append_text(&self, parent: &Element, text: &str) {
        let node = self.document.create_text_node(text);
        log_failure("appendChild", parent.append_child(&node).map(drop));
    }

    fn insert_before(&self, parent: &Element, child: &Element, reference: Option<&Element>) {
        let reference: Option<&Node> = reference.map(AsRef::as_ref);
        log_failure("insertBefore", parent.insert_before(child, reference).map(drop));
    }

    fn remove(&self, element: &Element) {
        element.remove();
    }

    fn children(&self, element: &Element) -> Vec<Element> {
        let children = element.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .collect()
    }

    fn parent_element(&self, element: &Element) -> Option<Element> {
        element.parent_element()
    }

    fn next_element_sibling(&self, element: &Element) -> Option<Element> {
        element.next_element_sibling()
    }

    fn text_content(&self, element: &Element) -> String {
        element.text_content().unwrap_or_default()
    }

    fn set_text_content(&self, element: &Element, text: &str) {
        element.set_text_content(Some(text));
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn set_attribute(&self, element: &Element, name: &str, value: &str) {
        log_failure("setAttribute", element.set_attribute(name, value));
    }

    fn has_class(&self, element: &Element, class: &str) -> bool {
        element.class_list().contains(class)
    }

    fn add_class(&self, element: &Element, class: &str) {
        log_failure("classList.add", element.class_list().add_1(class));
    }

    fn remove_class(&self, element: &Element, class: &str) {
        log_failure("classList.remove", element.class_list().remove_1(class));
    }

    fn set_style_property(&self, element: &Element, name: &str, value: &str) {
        match Self::html(element) {
            Some(html) => log_failure("style.setProperty", html.style().set_property(name, value)),
            None => debug!("Cannot style non-HTML element <{}>", element.tag_name()),
        }
    }

    fn bounding_client_rect(&self, element: &Element) -> Rect {
        let r = element.get_bounding_client_rect();
        Rect::new(r.x() as f32, r.y() as f32, r.width() as f32, r.height() as f32)
    }

    fn offset_height(&self, element: &Element) -> f32 {
        Self::html(element)
            .map(|html| html.offset_height() as f32)
            .unwrap_or(0.0)
    }

    fn computed_style(&self, element: &Element, property: &str) -> Option<String> {
        let style = self.window.get_computed_style(element).ok().flatten()?;
        style.get_property_value(property).ok()
    }

    fn viewport_height(&self) -> f32 {
        self.window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0) as f32
    }

    fn scroll_y(&self) -> f32 {
        self.window.scroll_y().unwrap_or(0.0) as f32
    }

    fn scroll_to(&self, top: f32, behavior: ScrollBehavior) {
        let options = ScrollToOptions::new();
        options.set_top(f64::from(top));
        options.set_behavior(match behavior {
            ScrollBehavior::Auto => web_sys::ScrollBehavior::Auto,
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn on_click(&self, element: &Element, handler: ClickHandler) -> Subscription {
        let closure = Closure::<dyn Fn(Event)>::new(move |event: Event| {
            let click = ClickEvent::new();
            handler(&click);
            if click.default_prevented() {
                event.prevent_default();
            }
        });
        self.listen(element.clone().into(), "click", closure)
    }

    fn on_scroll(&self, callback: Callback) -> Subscription {
        self.listen_window("scroll", callback)
    }

    fn on_window_resize(&self, callback: Callback) -> Subscription {
        self.listen_window("resize", callback)
    }

    fn observe_resize(&self, element: &Element, callback: Callback) -> Option<Subscription> {
        let closure = Closure::<dyn Fn()>::new(move || callback());
        let observer = ResizeObserver::new(closure.as_ref().unchecked_ref()).ok()?;
        observer.observe(element);
        let id = self.registry.borrow_mut().reserve();
        Some(self.insert(
            id,
            Registration::Resize {
                observer,
                _closure: closure,
            },
        ))
    }

    fn observe_mutations(&self, element: &Element, callback: Callback) -> Option<Subscription> {
        let closure = Closure::<dyn Fn()>::new(move || callback());
        let observer = MutationObserver::new(closure.as_ref().unchecked_ref()).ok()?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer.observe_with_options(element, &init).ok()?;
        let id = self.registry.borrow_mut().reserve();
        Some(self.insert(
            id,
            Registration::Mutation {
                observer,
                _closure: closure,
            },
        ))
    }

    fn request_animation_frame(&self, callback: FrameCallback) -> Subscription {
        let id = self.registry.borrow_mut().reserve();
        let registry: Weak<RefCell<Registry>> = Rc::downgrade(&self.registry);
        // One-shot closures free themselves when called.
        let frame = Closure::once_into_js(move || {
            if let Some(registry) = registry.upgrade() {
                registry.borrow_mut().entries.remove(&id);
            }
            callback();
        });
        match self.window.request_animation_frame(frame.unchecked_ref()) {
            Ok(handle) => self.insert(id, Registration::Frame { handle }),
            Err(e) => {
                debug!("requestAnimationFrame failed: {:?}", e);
                Subscription::noop()
            }
        }
    }
}
