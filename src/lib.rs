//! Scroll-aware table of contents for long-form article pages.
//!
//! `autotoc` scans an article's content region for headings, builds a
//! navigation panel with one link per heading (plus an optional back-link),
//! inserts it into the page and keeps the link of the section being read
//! highlighted as the reader scrolls.
//!
//! The logic lives in `autotoc-core` and runs against the [`Page`] trait. This
//! crate re-exports it together with [`HeadlessPage`], the in-memory page used
//! for tests and native callers. Browsers use `autotoc-wasm`.
//!
//! # Example
//!
//! ```
//! use autotoc::{HeadlessPage, Page, install_from_value};
//! use serde_json::json;
//! use std::rc::Rc;
//!
//! let page = Rc::new(HeadlessPage::from_markup(r#"<html><body>
//!     <div class="blog-item-top-wrapper"/>
//!     <div class="blog-item-content">
//!         <div class="html-block"><h3>Intro</h3></div>
//!         <div class="html-block"><h3>Details</h3></div>
//!     </div>
//! </body></html>"#).unwrap());
//!
//! let outcome = install_from_value(&page, json!({ "sticky": true })).unwrap();
//! let toc = outcome.into_handle().unwrap();
//! assert_eq!(toc.links().len(), 2);
//! assert!(page.element_by_id("Details_1").is_some());
//! ```

pub use autotoc_core::{
    ActiveSectionTracker, BackLink, BootstrapOutcome, BuiltToc, Configuration, GeometryPublisher,
    HeadingEntry, InsertPosition, Panel, PendingBootstrap, ScrollOffset, Section, SkipReason,
    TocBuilder, TocError, TocHandle, TocLink, TocSettings, anchor_id, bootstrap, defaults, title,
};
pub use autotoc_dom::{HeadlessPage, NodeId};
pub use autotoc_style::{StyleParseError, parse_int_prefix};
pub use autotoc_traits::{ClickEvent, Page, PageError, ScrollBehavior, Subscription};
pub use autotoc_types::{AnchorId, Rect, Size};

use log::debug;
use std::rc::Rc;

/// Deserializes `settings` and bootstraps `page` with them.
///
/// Only malformed settings are an error; every other reason not to install
/// is reported as [`BootstrapOutcome::Skipped`].
pub fn install_from_value<P: Page + 'static>(
    page: &Rc<P>,
    settings: serde_json::Value,
) -> Result<BootstrapOutcome<P>, TocError> {
    let settings = TocSettings::from_value(settings)?;
    debug!("Installing with {} candidate(s)", settings.candidates().len());
    Ok(bootstrap(page, settings))
}

/// Same as [`install_from_value`] for settings given as JSON text.
pub fn install_from_json<P: Page + 'static>(
    page: &Rc<P>,
    json: &str,
) -> Result<BootstrapOutcome<P>, TocError> {
    let settings = TocSettings::from_json(json)?;
    Ok(bootstrap(page, settings))
}
