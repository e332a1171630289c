//! Title-size classes for article titles.
//!
//! Independent of the table of contents: tags `.blog-item-title h1` with one
//! of four classes by the length of its trimmed text, so stylesheets can scale
//! long titles down.

use autotoc_traits::{Page, Subscription};
use log::debug;
use std::rc::{Rc, Weak};

pub const TITLE_SELECTOR: &str = ".blog-item-title h1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleSize {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl TitleSize {
    /// Buckets a length in UTF-16 code units: up to 20, 40, 80, then longer.
    pub fn for_length(length: usize) -> Self {
        match length {
            0..=20 => TitleSize::Small,
            21..=40 => TitleSize::Medium,
            41..=80 => TitleSize::Large,
            _ => TitleSize::ExtraLarge,
        }
    }

    pub fn for_text(text: &str) -> Self {
        Self::for_length(text.trim().encode_utf16().count())
    }

    pub fn class_name(self) -> &'static str {
        match self {
            TitleSize::Small => "small-entry-title",
            TitleSize::Medium => "medium-entry-title",
            TitleSize::Large => "large-entry-title",
            TitleSize::ExtraLarge => "extralarge-entry-title",
        }
    }
}

/// Tags the article title, if the page has one.
pub fn apply_title_size<P: Page>(page: &P) -> Option<TitleSize> {
    let title = page.query_selector(TITLE_SELECTOR).ok().flatten()?;
    let size = TitleSize::for_text(&page.text_content(&title));
    page.add_class(&title, size.class_name());
    debug!("Title classified as {:?}", size);
    Some(size)
}

/// Applies title sizing now, or once the document is ready.
///
/// Returns the ready subscription when the run was deferred.
pub fn install_title_sizer<P: Page + 'static>(page: &Rc<P>) -> Option<Subscription> {
    if page.is_ready() {
        apply_title_size(page.as_ref());
        return None;
    }
    let weak: Weak<P> = Rc::downgrade(page);
    Some(page.on_ready(Rc::new(move || {
        if let Some(page) = weak.upgrade() {
            apply_title_size(page.as_ref());
        }
    })))
}
