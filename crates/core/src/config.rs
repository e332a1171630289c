//! Table of contents settings and their resolution against a page.
//!
//! Settings come from page authors as a single object or a list of objects:
//!
//! ```json
//! [{
//!   "requiredBodyClasses": ["collection-XXXX", "view-item"],
//!   "selectors": ".blog-anchor-title, .html-block h2",
//!   "targetContainerSelector": ".blog-item-wrapper",
//!   "insertPosition": "prepend",
//!   "sticky": true,
//!   "scrollOffset": "var(--header-height)",
//!   "activeZoneTop": 0.3,
//!   "backLink": { "enabled": true, "url": "/exhibitions", "label": "Exhibitions" }
//! }]
//! ```

use crate::defaults;
use crate::error::TocError;
use autotoc_style::contains_var;
use autotoc_traits::Page;
use log::debug;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;

/// Where the panel goes inside its target container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertPosition {
    /// First child.
    Start,
    /// Last child.
    #[default]
    End,
    /// Before the child currently at this index, clamped to the child count.
    Index(usize),
}

impl Serialize for InsertPosition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            InsertPosition::Start => serializer.serialize_str("prepend"),
            InsertPosition::End => serializer.serialize_str("append"),
            InsertPosition::Index(i) => serializer.serialize_u64(*i as u64),
        }
    }
}

impl<'de> Deserialize<'de> for InsertPosition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PositionVisitor;
        impl<'de> de::Visitor<'de> for PositionVisitor {
            type Value = InsertPosition;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("\"prepend\", \"append\" or a child index")
            }

            fn visit_str<E>(self, value: &str) -> Result<InsertPosition, E>
            where
                E: de::Error,
            {
                Ok(match value {
                    "prepend" => InsertPosition::Start,
                    "append" => InsertPosition::End,
                    other => {
                        debug!("Unknown insertPosition '{}', appending", other);
                        InsertPosition::End
                    }
                })
            }

            fn visit_u64<E>(self, value: u64) -> Result<InsertPosition, E>
            where
                E: de::Error,
            {
                Ok(InsertPosition::Index(
                    usize::try_from(value).unwrap_or(usize::MAX),
                ))
            }

            fn visit_i64<E>(self, value: i64) -> Result<InsertPosition, E>
            where
                E: de::Error,
            {
                Ok(InsertPosition::Index(usize::try_from(value).unwrap_or(0)))
            }

            fn visit_f64<E>(self, value: f64) -> Result<InsertPosition, E>
            where
                E: de::Error,
            {
                if !value.is_finite() {
                    return Ok(InsertPosition::End);
                }
                // Saturating cast: negatives become 0.
                Ok(InsertPosition::Index(value as usize))
            }

            fn visit_unit<E>(self) -> Result<InsertPosition, E>
            where
                E: de::Error,
            {
                Ok(InsertPosition::End)
            }

            fn visit_none<E>(self) -> Result<InsertPosition, E>
            where
                E: de::Error,
            {
                Ok(InsertPosition::End)
            }
        }
        deserializer.deserialize_any(PositionVisitor)
    }
}

/// A configured scroll offset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScrollOffset {
    #[default]
    None,
    /// A length such as `200px`, read with `parseInt` semantics.
    Literal(String),
    /// A value referencing layout variables, e.g. `var(--header-height)`.
    Dynamic(String),
}

impl ScrollOffset {
    pub fn parse(value: &str) -> Self {
        if value.is_empty() {
            ScrollOffset::None
        } else if contains_var(value) {
            ScrollOffset::Dynamic(value.to_string())
        } else {
            ScrollOffset::Literal(value.to_string())
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScrollOffset::None => None,
            ScrollOffset::Literal(v) | ScrollOffset::Dynamic(v) => Some(v),
        }
    }
}

impl Serialize for ScrollOffset {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.as_str() {
            Some(v) => serializer.serialize_str(v),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for ScrollOffset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OffsetDef {
            Str(String),
            Num(f64),
        }

        Ok(match Option::<OffsetDef>::deserialize(deserializer)? {
            None => ScrollOffset::None,
            Some(OffsetDef::Str(s)) => ScrollOffset::parse(&s),
            Some(OffsetDef::Num(n)) => ScrollOffset::Literal(format!("{}px", n)),
        })
    }
}

/// An optional entry linking away from the article, e.g. back to a listing.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BackLink {
    pub enabled: bool,
    pub url: Option<String>,
    pub label: Option<String>,
    pub icon: Option<String>,
}

impl BackLink {
    /// Enabled and pointing somewhere.
    pub fn is_active(&self) -> bool {
        self.enabled && self.url.as_deref().is_some_and(|u| !u.is_empty())
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(defaults::BACK_LINK_LABEL)
    }

    pub fn icon(&self) -> &str {
        self.icon.as_deref().unwrap_or(defaults::BACK_LINK_ICON)
    }
}

/// One table of contents instance. Immutable once resolved.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Configuration {
    /// Body classes the page must all have for this configuration to apply.
    pub required_body_classes: Vec<String>,
    /// Heading selector, evaluated inside the content container.
    pub selectors: Option<String>,
    pub content_selector: Option<String>,
    pub target_container_selector: Option<String>,
    pub insert_position: InsertPosition,
    pub sticky: bool,
    pub scroll_offset: ScrollOffset,
    pub active_zone_top: Option<f64>,
    pub back_link: Option<BackLink>,
}

impl Configuration {
    pub fn heading_selector(&self) -> &str {
        non_empty(&self.selectors).unwrap_or(defaults::HEADING_SELECTOR)
    }

    pub fn content_selector(&self) -> Option<&str> {
        non_empty(&self.content_selector)
    }

    pub fn target_selector(&self) -> &str {
        non_empty(&self.target_container_selector).unwrap_or(defaults::TARGET_CONTAINER_SELECTOR)
    }

    /// The active zone as a fraction of the viewport height.
    ///
    /// Only a missing, zero or NaN value falls back to the default. Values
    /// outside `0..=1` are used as given, so a zone of `1.5` puts the
    /// threshold below the bottom of the viewport.
    pub fn active_zone(&self) -> f64 {
        match self.active_zone_top {
            Some(z) if z != 0.0 && !z.is_nan() => z,
            _ => defaults::ACTIVE_ZONE_TOP,
        }
    }

    /// The back-link, if it is enabled and has a destination.
    pub fn active_back_link(&self) -> Option<&BackLink> {
        self.back_link.as_ref().filter(|b| b.is_active())
    }

    /// Whether the page's markers include every required marker.
    pub fn applies_to<F>(&self, has_marker: F) -> bool
    where
        F: Fn(&str) -> bool,
    {
        self.required_body_classes.iter().all(|c| has_marker(c))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// The process-wide settings value: one configuration or an ordered list of
/// candidates.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum TocSettings {
    Many(Vec<Configuration>),
    One(Box<Configuration>),
}

impl TocSettings {
    pub fn from_json(json: &str) -> Result<Self, TocError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, TocError> {
        Ok(serde_json::from_value(value)?)
    }

    /// The candidates in priority order.
    pub fn candidates(&self) -> &[Configuration] {
        match self {
            TocSettings::Many(list) => list,
            TocSettings::One(config) => std::slice::from_ref(config.as_ref()),
        }
    }

    /// The first candidate whose required markers are all present.
    pub fn resolve<F>(&self, has_marker: F) -> Option<&Configuration>
    where
        F: Fn(&str) -> bool,
    {
        self.candidates().iter().find(|c| c.applies_to(&has_marker))
    }

    /// Resolves against the classes on the page's `<body>`.
    pub fn resolve_for_page<P: Page>(&self, page: &P) -> Option<&Configuration> {
        let body = page.body()?;
        self.resolve(|class| page.has_class(&body, class))
    }
}

impl From<Configuration> for TocSettings {
    fn from(config: Configuration) -> Self {
        TocSettings::One(Box::new(config))
    }
}

impl From<Vec<Configuration>> for TocSettings {
    fn from(list: Vec<Configuration>) -> Self {
        TocSettings::Many(list)
    }
}
