mod common;

use autotoc::{
    BootstrapOutcome, Page, Rect, ScrollBehavior, SkipReason, defaults, install_from_json,
    install_from_value,
};
use common::fixtures::{article, article_without_headings};
use common::{TestResult, init_logger, outline, page_from, stack_blocks};
use serde_json::json;

#[test]
fn test_three_headings_without_back_link() -> TestResult {
    init_logger();
    let page = page_from(&article("view-item", &["Intro", "Details", "Summary"]))?;
    stack_blocks(&page)?;
    let toc = install_from_value(
        &page,
        json!({ "requiredBodyClasses": ["view-item"], "selectors": ".html-block h3" }),
    )?
    .into_handle()
    .ok_or("expected an installed table of contents")?;

    let ids: Vec<&str> = toc.links().iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids.len(), 3);
    assert!(ids[0].ends_with("_0"));
    assert!(ids[1].ends_with("_1"));
    assert!(ids[2].ends_with("_2"));

    let texts: Vec<String> = toc
        .links()
        .iter()
        .map(|l| page.text_content(&l.element))
        .collect();
    assert_eq!(texts, vec!["Intro", "Details", "Summary"]);

    assert!(toc.panel().back_link.is_none());
    assert!(page.query_selector(".table-of-contents-back-link")?.is_none());

    assert_eq!(
        outline(&page, &toc.panel().container)?,
        vec![
            "nav.blog-item-table-of-contents",
            "div.table-of-contents-inner",
            "div.table-of-contents-list",
            "a.table-of-contents-item",
            "a.table-of-contents-item",
            "a.table-of-contents-item",
        ]
    );
    assert!(page.query_selector(".is-active")?.is_none());
    Ok(())
}

#[test]
fn test_back_link_only_when_no_headings() -> TestResult {
    init_logger();
    let page = page_from(&article_without_headings("view-item"))?;
    let toc = install_from_value(
        &page,
        json!({ "backLink": { "enabled": true, "url": "/exhibitions", "label": "Exhibitions" } }),
    )?
    .into_handle()
    .ok_or("expected an installed table of contents")?;

    assert!(toc.links().is_empty());
    let back = toc.panel().back_link.clone().ok_or("missing back-link")?;
    assert_eq!(page.attribute(&back, "href").as_deref(), Some("/exhibitions"));
    assert_eq!(
        page.query_selector_all(".table-of-contents-back-link")?.len(),
        1
    );
    assert!(page.query_selector_all("a[role=\"link\"]")?.is_empty());

    assert_eq!(
        outline(&page, &toc.panel().container)?,
        vec![
            "nav.blog-item-table-of-contents",
            "div.table-of-contents-inner",
            "div.table-of-contents-list",
            "a.table-of-contents-back-link.table-of-contents-item",
            "span.back-icon",
            "span.back-label",
        ]
    );
    Ok(())
}

#[test]
fn test_enabled_back_link_without_url_inserts_empty_panel() -> TestResult {
    init_logger();
    let page = page_from(&article_without_headings("view-item"))?;
    let toc = install_from_value(&page, json!({ "backLink": { "enabled": true } }))?
        .into_handle()
        .ok_or("expected an installed table of contents")?;

    assert_eq!(page.query_selector_all(defaults::PANEL_SELECTOR)?.len(), 1);
    assert!(toc.links().is_empty());
    assert!(toc.panel().back_link.is_none());
    assert_eq!(
        outline(&page, &toc.panel().container)?,
        vec![
            "nav.blog-item-table-of-contents",
            "div.table-of-contents-inner",
            "div.table-of-contents-list",
        ]
    );
    Ok(())
}

#[test]
fn test_no_headings_and_no_back_link_leaves_page_untouched() -> TestResult {
    let page = page_from(&article_without_headings("view-item"))?;
    let before = page.outer_html(&page.document_element());
    let outcome = install_from_value(&page, json!({ "backLink": { "enabled": false, "url": "/x" } }))?;
    assert!(matches!(outcome, BootstrapOutcome::Skipped(SkipReason::Failed(_))));
    assert_eq!(page.outer_html(&page.document_element()), before);
    Ok(())
}

#[test]
fn test_bootstrap_twice_yields_one_panel() -> TestResult {
    let page = page_from(&article("", &["Intro", "Details"]))?;
    assert!(install_from_json(&page, "{}")?.is_installed());
    let second = install_from_json(&page, "{}")?;
    assert_eq!(second.skip_reason(), Some(&SkipReason::AlreadyInstalled));
    assert_eq!(page.query_selector_all(defaults::PANEL_SELECTOR)?.len(), 1);
    assert_eq!(page.query_selector_all("a.table-of-contents-item")?.len(), 2);
    Ok(())
}

#[test]
fn test_first_matching_candidate_configures_the_panel() -> TestResult {
    let page = page_from(&article("collection-7 view-item", &["Intro"]))?;
    let toc = install_from_value(
        &page,
        json!([
            { "requiredBodyClasses": ["collection-1", "view-item"], "sticky": false },
            { "requiredBodyClasses": ["view-item"], "sticky": true },
            { "sticky": false }
        ]),
    )?
    .into_handle()
    .ok_or("expected an installed table of contents")?;
    assert!(toc.config().sticky);
    assert!(page.has_class(&toc.panel().container, defaults::STICKY_CLASS));
    Ok(())
}

#[test]
fn test_edit_mode_is_permanent_skip() -> TestResult {
    let page = page_from(&article("view-item sqs-edit-mode-active", &["Intro"]))?;
    let outcome = install_from_json(&page, "{}")?;
    assert_eq!(outcome.skip_reason(), Some(&SkipReason::EditMode));
    assert!(page.query_selector(defaults::PANEL_SELECTOR)?.is_none());
    Ok(())
}

#[test]
fn test_waits_for_document_ready() -> TestResult {
    let page = page_from(&article("view-item", &["Intro", "Details"]))?;
    page.set_loading();
    let BootstrapOutcome::Deferred(pending) = install_from_json(&page, "{}")? else {
        return Err("expected a deferred bootstrap".into());
    };
    assert!(page.query_selector(defaults::PANEL_SELECTOR)?.is_none());

    page.finish_loading();
    let outcome = pending.take_outcome().ok_or("deferred bootstrap did not run")?;
    assert!(outcome.is_installed());
    assert!(page.query_selector(defaults::PANEL_SELECTOR)?.is_some());
    Ok(())
}

#[test]
fn test_click_scrolls_to_heading_minus_offset() -> TestResult {
    init_logger();
    let page = page_from(&article("view-item", &["Intro", "Details"]))?;
    let toc = install_from_value(&page, json!({ "scrollOffset": "200px" }))?
        .into_handle()
        .ok_or("expected an installed table of contents")?;

    let details = &toc.headings()[1].element;
    page.set_layout(details, Rect::new(0.0, 3000.0, 640.0, 40.0));
    assert!(page.click(&toc.links()[1].element));
    assert_eq!(page.scroll_y(), 2800.0);
    assert_eq!(page.last_scroll_behavior(), Some(ScrollBehavior::Smooth));
    Ok(())
}

#[test]
fn test_click_reads_offset_variable_at_click_time() -> TestResult {
    let page = page_from(&article("view-item", &["Intro"]))?;
    let toc = install_from_value(&page, json!({ "scrollOffset": "var(--header-height)" }))?
        .into_handle()
        .ok_or("expected an installed table of contents")?;
    let heading = &toc.headings()[0].element;
    page.set_layout(heading, Rect::new(0.0, 2000.0, 640.0, 40.0));
    let root = page.document_element();

    page.set_style_property(&root, "--header-height", "150px");
    page.click(&toc.links()[0].element);
    assert_eq!(page.scroll_y(), 1850.0);

    // Breakpoint change: the header shrinks.
    page.set_style_property(&root, "--header-height", "3rem");
    page.scroll_to(0.0, ScrollBehavior::Auto);
    page.click(&toc.links()[0].element);
    assert_eq!(page.scroll_y(), 1952.0);
    Ok(())
}

#[test]
fn test_unparsable_offset_scrolls_to_heading_top() -> TestResult {
    let page = page_from(&article("view-item", &["Intro"]))?;
    let toc = install_from_value(&page, json!({ "scrollOffset": "header" }))?
        .into_handle()
        .ok_or("expected an installed table of contents")?;
    page.set_layout(&toc.headings()[0].element, Rect::new(0.0, 1200.0, 640.0, 40.0));
    page.click(&toc.links()[0].element);
    assert_eq!(page.scroll_y(), 1200.0);
    Ok(())
}

#[test]
fn test_height_variable_tracks_panel() -> TestResult {
    let page = page_from(&article("view-item", &["Intro", "Details"]))?;
    let toc = install_from_json(&page, "{}")?
        .into_handle()
        .ok_or("expected an installed table of contents")?;
    let root = page.document_element();
    assert_eq!(
        page.style_property(&root, defaults::HEIGHT_VARIABLE).as_deref(),
        Some("0px")
    );

    page.set_layout(&toc.panel().container, Rect::new(0.0, 0.0, 300.0, 96.0));
    page.tick();
    assert_eq!(
        page.style_property(&root, defaults::HEIGHT_VARIABLE).as_deref(),
        Some("96px")
    );
    assert_eq!(
        page.computed_style(&root, defaults::HEIGHT_VARIABLE).as_deref(),
        Some("96px")
    );
    Ok(())
}

#[test]
fn test_detached_handle_stops_reacting() -> TestResult {
    let page = page_from(&article("view-item", &["Intro"]))?;
    let toc = install_from_json(&page, "{}")?
        .into_handle()
        .ok_or("expected an installed table of contents")?;
    let link = toc.links()[0].element;
    toc.detach();

    assert_eq!(page.listener_counts(), Default::default());
    // The panel stays; clicks fall back to plain fragment navigation.
    assert!(page.query_selector(defaults::PANEL_SELECTOR)?.is_some());
    assert!(!page.click(&link));
    Ok(())
}

#[test]
fn test_title_size_is_independent() -> TestResult {
    let page = page_from(&article("sqs-edit-mode-active", &[]))?;
    let size = autotoc::title::apply_title_size(page.as_ref()).ok_or("missing title")?;
    assert_eq!(size.class_name(), "small-entry-title");
    let h1 = page.query_selector(".blog-item-title h1")?.ok_or("missing title")?;
    assert!(page.has_class(&h1, "small-entry-title"));
    Ok(())
}
