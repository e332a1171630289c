//! Heading discovery, anchor assignment and panel construction.

use crate::config::Configuration;
use crate::defaults;
use crate::error::TocError;
use crate::offset::resolve_scroll_offset;
use autotoc_traits::{ClickEvent, ClickHandler, Page, ScrollBehavior, Subscription};
use autotoc_types::AnchorId;
use log::debug;
use std::rc::{Rc, Weak};

/// Derives the anchor for the heading at `index` from its text.
///
/// Whitespace runs become `_`, anything outside `[A-Za-z0-9_-]` is dropped and
/// the zero-based position is appended, so two headings with the same text
/// still get distinct anchors.
pub fn anchor_id(text: &str, index: usize) -> AnchorId {
    let mut id = String::with_capacity(text.len() + 4);
    let mut in_whitespace = false;
    for c in text.trim().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                id.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            id.push(c);
        }
    }
    id.push('_');
    id.push_str(&index.to_string());
    AnchorId::from(id)
}

/// A heading found in the content region.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingEntry<E> {
    pub element: E,
    pub id: AnchorId,
    pub text: String,
}

/// A panel entry targeting one heading.
#[derive(Debug, Clone, PartialEq)]
pub struct TocLink<E> {
    pub element: E,
    pub id: AnchorId,
}

/// The navigation panel, built detached from the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel<E> {
    pub container: E,
    pub inner: E,
    pub list: E,
    pub back_link: Option<E>,
    pub links: Vec<TocLink<E>>,
}

/// Output of [`TocBuilder::build`]: the panel plus what the later pipeline
/// steps need.
#[derive(Debug)]
pub struct BuiltToc<E> {
    pub panel: Panel<E>,
    pub headings: Vec<HeadingEntry<E>>,
    /// Where the panel goes.
    pub target: E,
    /// One per heading link.
    pub clicks: Vec<Subscription>,
}

pub struct TocBuilder<P: Page> {
    page: Rc<P>,
    config: Rc<Configuration>,
}

impl<P: Page + 'static> TocBuilder<P> {
    pub fn new(page: Rc<P>, config: Rc<Configuration>) -> Self {
        Self { page, config }
    }

    /// Scans the content region and builds the panel.
    ///
    /// Heading elements get their `id` attribute set; nothing else in the
    /// document is touched until the panel is inserted.
    pub fn build(&self) -> Result<BuiltToc<P::Element>, TocError> {
        let content = self.content_container()?;
        let target_selector = self.config.target_selector();
        let target = self
            .page
            .query_selector(target_selector)?
            .ok_or_else(|| TocError::MissingContainer {
                role: "target",
                selector: target_selector.to_string(),
            })?;

        let heading_elements = self
            .page
            .query_selector_all_within(&content, self.config.heading_selector())?;
        let back_link_enabled = self.config.back_link.as_ref().is_some_and(|b| b.enabled);
        if heading_elements.is_empty() && !back_link_enabled {
            return Err(TocError::NothingToShow);
        }
        let back_link = self.config.active_back_link();
        debug!(
            "Building table of contents for {} heading(s)",
            heading_elements.len()
        );

        let page = &self.page;
        let container = page.create_element("nav");
        page.add_class(&container, defaults::PANEL_CLASS);
        page.set_attribute(&container, "aria-label", defaults::PANEL_ARIA_LABEL);
        if self.config.sticky {
            page.add_class(&container, defaults::STICKY_CLASS);
        }
        let inner = page.create_element("div");
        page.add_class(&inner, defaults::INNER_CLASS);
        let list = page.create_element("div");
        page.add_class(&list, defaults::LIST_CLASS);

        let back_link = back_link.map(|back| {
            let anchor = page.create_element("a");
            page.set_attribute(&anchor, "href", back.url.as_deref().unwrap_or_default());
            page.add_class(&anchor, defaults::BACK_LINK_CLASS);
            page.add_class(&anchor, defaults::ITEM_CLASS);

            let icon = page.create_element("span");
            page.add_class(&icon, defaults::BACK_ICON_CLASS);
            page.set_text_content(&icon, back.icon());
            let label = page.create_element("span");
            page.add_class(&label, defaults::BACK_LABEL_CLASS);
            page.set_text_content(&label, back.label());

            page.append_child(&anchor, &icon);
            page.append_text(&anchor, " ");
            page.append_child(&anchor, &label);
            page.append_child(&list, &anchor);
            anchor
        });

        let mut headings = Vec::with_capacity(heading_elements.len());
        let mut links = Vec::with_capacity(heading_elements.len());
        let mut clicks = Vec::with_capacity(heading_elements.len());
        for (i, element) in heading_elements.into_iter().enumerate() {
            let text = page.text_content(&element).trim().to_string();
            let id = anchor_id(&text, i);
            page.set_attribute(&element, "id", id.as_str());

            let link = page.create_element("a");
            page.set_attribute(&link, "href", &id.fragment());
            page.add_class(&link, defaults::ITEM_CLASS);
            page.set_attribute(&link, "role", "link");
            page.set_text_content(&link, &text);
            clicks.push(page.on_click(&link, self.scroll_handler(id.clone())));
            page.append_child(&list, &link);

            links.push(TocLink {
                element: link,
                id: id.clone(),
            });
            headings.push(HeadingEntry { element, id, text });
        }

        page.append_child(&inner, &list);
        page.append_child(&container, &inner);

        Ok(BuiltToc {
            panel: Panel {
                container,
                inner,
                list,
                back_link,
                links,
            },
            headings,
            target,
            clicks,
        })
    }

    /// The configured content region when it exists, the default one otherwise.
    fn content_container(&self) -> Result<P::Element, TocError> {
        if let Some(selector) = self.config.content_selector() {
            if let Some(found) = self.page.query_selector(selector)? {
                return Ok(found);
            }
            debug!("Content selector '{}' matched nothing, trying default", selector);
        }
        self.page
            .query_selector(defaults::CONTENT_SELECTOR)?
            .ok_or_else(|| TocError::MissingContainer {
                role: "content",
                selector: self
                    .config
                    .content_selector()
                    .unwrap_or(defaults::CONTENT_SELECTOR)
                    .to_string(),
            })
    }

    fn scroll_handler(&self, id: AnchorId) -> ClickHandler {
        let page: Weak<P> = Rc::downgrade(&self.page);
        let config = Rc::clone(&self.config);
        Rc::new(move |event: &ClickEvent| {
            event.prevent_default();
            let Some(page) = page.upgrade() else {
                return;
            };
            let offset = resolve_scroll_offset(page.as_ref(), &config.scroll_offset);
            if let Some(target) = page.element_by_id(id.as_str()) {
                let top = page.bounding_client_rect(&target).top() + page.scroll_y() - offset as f32;
                page.scroll_to(top, ScrollBehavior::Smooth);
            }
        })
    }
}
