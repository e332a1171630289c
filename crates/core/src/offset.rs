//! Resolves the configured scroll offset to whole pixels.
//!
//! Literal values are read with `parseInt` semantics (`"200px"` is 200,
//! `"12.9rem"` is 12). Values referencing layout variables are resolved by
//! the host's style engine: a hidden probe element carries the value as its
//! `scroll-margin-top`, and the computed result is read back. The probe is
//! created per resolution, so changes to the variables between clicks are
//! picked up.

use crate::config::ScrollOffset;
use autotoc_style::parse_int_prefix;
use autotoc_traits::Page;
use log::{debug, trace};

const PROBE_PROPERTY: &str = "scroll-margin-top";

/// The offset in pixels, `0` when nothing usable is configured.
pub fn resolve_scroll_offset<P: Page>(page: &P, offset: &ScrollOffset) -> i64 {
    match offset {
        ScrollOffset::None => 0,
        ScrollOffset::Literal(value) => parse_literal(value),
        ScrollOffset::Dynamic(value) => resolve_dynamic(page, value),
    }
}

fn parse_literal(value: &str) -> i64 {
    parse_int_prefix(value).unwrap_or_else(|| {
        debug!("Scroll offset '{}' has no leading integer, using 0", value);
        0
    })
}

fn resolve_dynamic<P: Page>(page: &P, value: &str) -> i64 {
    let Some(body) = page.body() else {
        return 0;
    };

    let probe = page.create_element("div");
    page.set_style_property(&probe, "position", "absolute");
    page.set_style_property(&probe, "visibility", "hidden");
    page.set_style_property(&probe, PROBE_PROPERTY, value);
    page.append_child(&body, &probe);

    let computed = page.computed_style(&probe, PROBE_PROPERTY);
    page.remove(&probe);

    trace!("Scroll offset '{}' computed as {:?}", value, computed);
    computed.as_deref().map(parse_literal).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use autotoc_dom::HeadlessPage;

    fn literal(v: &str) -> ScrollOffset {
        ScrollOffset::parse(v)
    }

    #[test]
    fn test_literal_offsets() {
        let page = HeadlessPage::new();
        assert_eq!(resolve_scroll_offset(&page, &literal("200px")), 200);
        assert_eq!(resolve_scroll_offset(&page, &literal(" 42")), 42);
        assert_eq!(resolve_scroll_offset(&page, &literal("12.9rem")), 12);
        assert_eq!(resolve_scroll_offset(&page, &literal("-15px")), -15);
        assert_eq!(resolve_scroll_offset(&page, &literal("abc")), 0);
        assert_eq!(resolve_scroll_offset(&page, &ScrollOffset::None), 0);
    }

    #[test]
    fn test_dynamic_offset_uses_current_variables() {
        let page = HeadlessPage::new();
        let root = page.document_element();
        page.set_style_property(&root, "--header-height", "96px");
        let offset = literal("var(--header-height)");
        assert_eq!(resolve_scroll_offset(&page, &offset), 96);

        page.set_style_property(&root, "--header-height", "4rem");
        assert_eq!(resolve_scroll_offset(&page, &offset), 64);
    }

    #[test]
    fn test_dynamic_offset_unresolved_is_zero() {
        let page = HeadlessPage::new();
        let offset = literal("var(--missing)");
        assert_eq!(resolve_scroll_offset(&page, &offset), 0);
    }

    #[test]
    fn test_probe_is_removed() {
        let page = HeadlessPage::new();
        let body = page.body().unwrap();
        page.set_style_property(&page.document_element(), "--h", "10px");
        resolve_scroll_offset(&page, &literal("var(--h)"));
        assert!(page.children(&body).is_empty());
    }
}
