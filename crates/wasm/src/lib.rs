//! WebAssembly bindings for the scroll-aware table of contents.
//!
//! On start the module reads `window.tableOfContentSettings` (a single
//! settings object or an array of candidates), installs the table of contents
//! when a candidate matches the page, and tags the article title with its
//! size class. Both wait for `DOMContentLoaded` when the document is still
//! loading.
//!
//! # Example
//!
//! ```javascript
//! window.tableOfContentSettings = [{
//!   requiredBodyClasses: ["view-item"],
//!   insertPosition: "prepend",
//!   sticky: true,
//!   scrollOffset: "var(--header-height)",
//! }];
//!
//! import init from '@autotoc/wasm';
//! await init();
//! ```
//!
//! `install(settings)` runs the same bootstrap explicitly, for pages that
//! provide settings after the module has started.
//!
//! ## Module Structure
//!
//! - [`page`] - `BrowserPage`, the `web-sys` implementation of the page trait
//! - [`error`] - Error types with JavaScript interop

mod error;
mod page;

pub use error::{AutotocError, ErrorCode};
pub use page::BrowserPage;

use autotoc_core::title::install_title_sizer;
use autotoc_core::{BootstrapOutcome, PendingBootstrap, TocHandle, TocSettings, bootstrap};
use autotoc_traits::Subscription;
use log::{debug, warn};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// Global holding the settings for the automatic start.
const SETTINGS_GLOBAL: &str = "tableOfContentSettings";

enum Installed {
    Toc(TocHandle<BrowserPage>),
    Pending(PendingBootstrap<BrowserPage>),
}

#[derive(Default)]
struct Runtime {
    page: Option<Rc<BrowserPage>>,
    toc: Option<Installed>,
    title: Option<Subscription>,
}

thread_local! {
    static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime::default());
}

fn shared_page() -> Result<Rc<BrowserPage>, AutotocError> {
    RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        if let Some(page) = &rt.page {
            return Ok(Rc::clone(page));
        }
        let page = Rc::new(BrowserPage::new().ok_or_else(AutotocError::unavailable)?);
        rt.page = Some(Rc::clone(&page));
        Ok(page)
    })
}

/// Initialize the WASM module and run the automatic start.
///
/// Called automatically when using wasm-pack's generated JavaScript.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    #[cfg(feature = "console-logging")]
    {
        console_log::init_with_level(log::Level::Debug).ok();
    }

    let Ok(page) = shared_page() else {
        debug!("No document, autotoc stays idle");
        return;
    };

    let title = install_title_sizer(&page);
    RUNTIME.with(|rt| rt.borrow_mut().title = title);

    match read_settings(&page) {
        Ok(Some(settings)) => {
            run_bootstrap(&page, settings);
        }
        Ok(None) => debug!("No {} on window", SETTINGS_GLOBAL),
        Err(e) => warn!("Ignoring {}: {}", SETTINGS_GLOBAL, e),
    }
}

fn read_settings(page: &BrowserPage) -> Result<Option<TocSettings>, AutotocError> {
    let raw = js_sys::Reflect::get(page.window(), &JsValue::from_str(SETTINGS_GLOBAL))
        .map_err(|_| AutotocError::settings("settings global is not readable"))?;
    if raw.is_undefined() || raw.is_null() {
        return Ok(None);
    }
    Ok(Some(serde_wasm_bindgen::from_value(raw)?))
}

/// Returns whether a table of contents was installed (or is waiting for the
/// document to finish loading).
fn run_bootstrap(page: &Rc<BrowserPage>, settings: TocSettings) -> bool {
    let installed = match bootstrap(page, settings) {
        BootstrapOutcome::Installed(handle) => Installed::Toc(handle),
        BootstrapOutcome::Deferred(pending) => Installed::Pending(pending),
        BootstrapOutcome::Skipped(reason) => {
            debug!("Table of contents not installed: {}", reason);
            return false;
        }
    };
    RUNTIME.with(|rt| rt.borrow_mut().toc = Some(installed));
    true
}

/// Installs a table of contents from a settings object or array.
///
/// Resolves to `false` when the page is skipped (edit mode, already
/// installed, no matching candidate, missing containers). Throws only for
/// settings that cannot be deserialized.
#[wasm_bindgen]
pub fn install(settings: JsValue) -> Result<bool, JsValue> {
    let settings: TocSettings =
        serde_wasm_bindgen::from_value(settings).map_err(AutotocError::from)?;
    let page = shared_page()?;
    Ok(run_bootstrap(&page, settings))
}

/// Same as [`install`], taking the settings as a JSON string.
#[wasm_bindgen(js_name = installFromJson)]
pub fn install_from_json(json: &str) -> Result<bool, JsValue> {
    let settings = TocSettings::from_json(json).map_err(AutotocError::from)?;
    let page = shared_page()?;
    Ok(run_bootstrap(&page, settings))
}

/// Removes the table of contents' listeners and observers. The panel stays.
#[wasm_bindgen]
pub fn detach() {
    let (toc, title) = RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        (rt.toc.take(), rt.title.take())
    });
    match toc {
        Some(Installed::Toc(handle)) => handle.detach(),
        Some(Installed::Pending(pending)) => match pending.take_outcome() {
            Some(BootstrapOutcome::Installed(handle)) => handle.detach(),
            _ => pending.cancel(),
        },
        None => {}
    }
    if let Some(title) = title {
        title.detach();
    }
}

/// The anchor id of the highlighted section, if any.
#[wasm_bindgen(js_name = activeSection)]
pub fn active_section() -> Option<String> {
    RUNTIME.with(|rt| match &rt.borrow().toc {
        Some(Installed::Toc(handle)) => handle.active_id().map(|id| id.to_string()),
        _ => None,
    })
}

/// Tags the article title with its size class now.
#[wasm_bindgen(js_name = applyTitleSizes)]
pub fn apply_title_sizes() -> Result<Option<String>, JsValue> {
    let page = shared_page()?;
    Ok(autotoc_core::title::apply_title_size(page.as_ref())
        .map(|size| size.class_name().to_string()))
}

/// Get the version of the autotoc-wasm library.
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
