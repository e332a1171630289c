//! An in-memory page for running the TOC without a browser.
//!
//! [`HeadlessPage`] implements [`autotoc_traits::Page`] on top of an
//! arena-backed [`Document`]. It has no layout engine: element boxes are
//! assigned explicitly, which keeps geometry-dependent behaviour
//! deterministic in tests.

pub mod document;
pub mod error;
pub mod markup;
pub mod page;
pub mod selector;

pub use document::{Document, NodeId};
pub use error::DomError;
pub use page::{HeadlessPage, ListenerCounts};
pub use selector::SelectorList;
