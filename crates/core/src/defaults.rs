//! Selectors, class names and tuning values shared across the pipeline.

/// Content region searched for headings when none is configured.
pub const CONTENT_SELECTOR: &str = ".blog-item-content";

/// Container the panel is inserted into when none is configured.
pub const TARGET_CONTAINER_SELECTOR: &str = ".blog-item-top-wrapper";

/// Headings picked up when no selector is configured.
pub const HEADING_SELECTOR: &str = ".blog-anchor-title, .html-block h3";

/// Fraction of the viewport height, from the top, that activates a section.
pub const ACTIVE_ZONE_TOP: f64 = 0.3;

pub const BACK_LINK_LABEL: &str = "Back";
pub const BACK_LINK_ICON: &str = "←";

// --- Produced DOM surface ---

pub const PANEL_CLASS: &str = "blog-item-table-of-contents";
pub const PANEL_SELECTOR: &str = ".blog-item-table-of-contents";
pub const PANEL_ARIA_LABEL: &str = "Table of contents";
pub const STICKY_CLASS: &str = "is-sticky";
pub const INNER_CLASS: &str = "table-of-contents-inner";
pub const LIST_CLASS: &str = "table-of-contents-list";
pub const ITEM_CLASS: &str = "table-of-contents-item";
pub const BACK_LINK_CLASS: &str = "table-of-contents-back-link";
pub const BACK_ICON_CLASS: &str = "back-icon";
pub const BACK_LABEL_CLASS: &str = "back-label";
pub const ACTIVE_CLASS: &str = "is-active";

/// Added to `<body>` once a panel is in the page.
pub const BODY_PRESENCE_CLASS: &str = "has-table-of-contents";

/// Layout variable carrying the panel height.
pub const HEIGHT_VARIABLE: &str = "--toc-height";

// --- Consumed DOM surface ---

/// Present on `<body>` while the site editor is open.
pub const EDIT_MODE_CLASS: &str = "sqs-edit-mode-active";
