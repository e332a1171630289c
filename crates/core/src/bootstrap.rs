//! One-shot initialization of the table of contents.

use crate::builder::{HeadingEntry, Panel, TocBuilder, TocLink};
use crate::config::{Configuration, TocSettings};
use crate::defaults;
use crate::error::TocError;
use crate::geometry::GeometryPublisher;
use crate::insert::insert_panel;
use crate::tracker::ActiveSectionTracker;
use autotoc_traits::{Page, Subscription};
use autotoc_types::AnchorId;
use log::debug;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use thiserror::Error;

/// Why a bootstrap left the page untouched. None of these are surfaced to the
/// reader.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error("Document has no body")]
    NoBody,

    #[error("Page is in edit mode")]
    EditMode,

    #[error("A table of contents is already present")]
    AlreadyInstalled,

    #[error("No configuration matches this page")]
    NoMatchingConfig,

    #[error(transparent)]
    Failed(#[from] TocError),
}

pub enum BootstrapOutcome<P: Page> {
    Installed(TocHandle<P>),
    /// The document was still loading; the pipeline runs once it is ready.
    Deferred(PendingBootstrap<P>),
    Skipped(SkipReason),
}

impl<P: Page> BootstrapOutcome<P> {
    pub fn is_installed(&self) -> bool {
        matches!(self, BootstrapOutcome::Installed(_))
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            BootstrapOutcome::Skipped(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn into_handle(self) -> Option<TocHandle<P>> {
        match self {
            BootstrapOutcome::Installed(handle) => Some(handle),
            _ => None,
        }
    }
}

impl<P: Page> std::fmt::Debug for BootstrapOutcome<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BootstrapOutcome::Installed(_) => f.write_str("Installed"),
            BootstrapOutcome::Deferred(_) => f.write_str("Deferred"),
            BootstrapOutcome::Skipped(reason) => f.debug_tuple("Skipped").field(reason).finish(),
        }
    }
}

/// A bootstrap waiting for the document to become ready.
pub struct PendingBootstrap<P: Page> {
    ready: Subscription,
    outcome: Rc<RefCell<Option<BootstrapOutcome<P>>>>,
}

impl<P: Page> PendingBootstrap<P> {
    /// Whether the deferred run has happened.
    pub fn is_settled(&self) -> bool {
        self.outcome.borrow().is_some()
    }

    /// The outcome of the deferred run, once it has happened.
    pub fn take_outcome(&self) -> Option<BootstrapOutcome<P>> {
        self.outcome.borrow_mut().take()
    }

    /// Stops waiting. Has no effect once the run has happened.
    pub fn cancel(self) {
        self.ready.detach();
    }
}

/// Everything an installed table of contents keeps alive.
pub struct TocHandle<P: Page> {
    config: Rc<Configuration>,
    panel: Panel<P::Element>,
    headings: Vec<HeadingEntry<P::Element>>,
    clicks: Vec<Subscription>,
    geometry: GeometryPublisher,
    tracker: ActiveSectionTracker<P>,
}

impl<P: Page + 'static> TocHandle<P> {
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn panel(&self) -> &Panel<P::Element> {
        &self.panel
    }

    pub fn links(&self) -> &[TocLink<P::Element>] {
        &self.panel.links
    }

    pub fn headings(&self) -> &[HeadingEntry<P::Element>] {
        &self.headings
    }

    pub fn active_id(&self) -> Option<AnchorId> {
        self.tracker.active_id()
    }

    pub fn tracker(&self) -> &ActiveSectionTracker<P> {
        &self.tracker
    }

    /// Removes every listener and observer. The panel stays in the document.
    pub fn detach(self) {
        for click in self.clicks {
            click.detach();
        }
        self.geometry.detach();
        self.tracker.detach();
    }
}

/// Installs the table of contents described by `settings`, at most once per
/// page.
///
/// Guards run in order: document not ready (defer), edit mode, existing
/// panel, no matching configuration. Failures inside the pipeline skip
/// without touching the page beyond heading ids.
pub fn bootstrap<P: Page + 'static>(page: &Rc<P>, settings: TocSettings) -> BootstrapOutcome<P> {
    if !page.is_ready() {
        debug!("Document still loading, deferring table of contents");
        return BootstrapOutcome::Deferred(defer(page, settings));
    }
    match run(page, &settings) {
        Ok(handle) => BootstrapOutcome::Installed(handle),
        Err(reason) => {
            debug!("Table of contents skipped: {}", reason);
            BootstrapOutcome::Skipped(reason)
        }
    }
}

fn defer<P: Page + 'static>(page: &Rc<P>, settings: TocSettings) -> PendingBootstrap<P> {
    let outcome = Rc::new(RefCell::new(None));
    let slot = Rc::clone(&outcome);
    let weak: Weak<P> = Rc::downgrade(page);
    let settings = RefCell::new(Some(settings));
    let ready = page.on_ready(Rc::new(move || {
        let (Some(page), Some(settings)) = (weak.upgrade(), settings.borrow_mut().take()) else {
            return;
        };
        *slot.borrow_mut() = Some(bootstrap(&page, settings));
    }));
    PendingBootstrap { ready, outcome }
}

fn run<P: Page + 'static>(page: &Rc<P>, settings: &TocSettings) -> Result<TocHandle<P>, SkipReason> {
    let body = page.body().ok_or(SkipReason::NoBody)?;
    if page.has_class(&body, defaults::EDIT_MODE_CLASS) {
        return Err(SkipReason::EditMode);
    }
    if page
        .query_selector(defaults::PANEL_SELECTOR)
        .map_err(TocError::from)?
        .is_some()
    {
        return Err(SkipReason::AlreadyInstalled);
    }
    let config = settings
        .resolve_for_page(page.as_ref())
        .cloned()
        .map(Rc::new)
        .ok_or(SkipReason::NoMatchingConfig)?;

    let built = TocBuilder::new(Rc::clone(page), Rc::clone(&config)).build()?;
    insert_panel(
        page.as_ref(),
        &built.target,
        &built.panel.container,
        config.insert_position,
    );
    let geometry = GeometryPublisher::attach(page, &built.panel.container);
    let tracker = ActiveSectionTracker::attach(
        page,
        built.headings.clone(),
        &built.panel.links,
        config.active_zone(),
    );
    debug!(
        "Table of contents installed with {} link(s)",
        built.panel.links.len()
    );

    Ok(TocHandle {
        config,
        panel: built.panel,
        headings: built.headings,
        clicks: built.clicks,
        geometry,
        tracker,
    })
}
