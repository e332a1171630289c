//! Scroll-aware table of contents for long-form article pages.
//!
//! The pipeline, in the order [`bootstrap::bootstrap`] runs it:
//!
//! 1. [`config`] picks the configuration whose required body classes the page has.
//! 2. [`builder`] scans the content region for headings, assigns anchors and
//!    builds the navigation panel.
//! 3. [`insert`] places the panel in the target container.
//! 4. [`geometry`] keeps `--toc-height` in sync with the panel's height.
//! 5. [`tracker`] highlights the link of the section under the active zone.
//!
//! Everything runs against the [`autotoc_traits::Page`] trait. Failures never
//! escape: a page the TOC cannot enhance is left untouched.

pub mod bootstrap;
pub mod builder;
pub mod config;
pub mod defaults;
pub mod error;
pub mod geometry;
pub mod insert;
pub mod offset;
pub mod section;
pub mod throttle;
pub mod title;
pub mod tracker;

pub use bootstrap::{BootstrapOutcome, PendingBootstrap, SkipReason, TocHandle, bootstrap};
pub use builder::{BuiltToc, HeadingEntry, Panel, TocBuilder, TocLink, anchor_id};
pub use config::{BackLink, Configuration, InsertPosition, ScrollOffset, TocSettings};
pub use error::TocError;
pub use geometry::GeometryPublisher;
pub use section::Section;
pub use tracker::ActiveSectionTracker;
