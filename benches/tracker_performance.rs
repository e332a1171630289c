//! Active-section tracking micro-benchmarks
//!
//! Measures tracker evaluation and panel construction over articles of
//! increasing length.

use autotoc::{HeadlessPage, Page, Rect, ScrollBehavior, install_from_value};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use serde_json::json;
use std::hint::black_box;
use std::rc::Rc;

const BLOCK_HEIGHT: f32 = 300.0;

/// An article with `headings` sections of one heading block and two
/// paragraph blocks each.
fn article(headings: usize) -> String {
    let mut blocks = String::new();
    for i in 0..headings {
        blocks.push_str(&format!(
            r#"<div class="html-block"><h3>Section {i}</h3></div><div class="html-block"><p>First {i}</p></div><div class="html-block"><p>Second {i}</p></div>"#
        ));
    }
    format!(
        r#"<html><body><div class="blog-item-top-wrapper"/><div class="blog-item-content">{blocks}</div></body></html>"#
    )
}

fn laid_out_page(headings: usize) -> Rc<HeadlessPage> {
    let page = Rc::new(HeadlessPage::from_markup(&article(headings)).expect("Failed to parse article"));
    let content = page
        .query_selector(".blog-item-content")
        .expect("Invalid selector")
        .expect("Missing content region");
    for (i, block) in page.children(&content).iter().enumerate() {
        let rect = Rect::new(0.0, BLOCK_HEIGHT * i as f32, 640.0, BLOCK_HEIGHT);
        page.set_layout(block, rect);
        for child in page.children(block) {
            page.set_layout(&child, rect);
        }
    }
    page
}

fn benchmark_tracker_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("tracker_evaluation");

    for headings in [10, 50, 200] {
        let page = laid_out_page(headings);
        let toc = install_from_value(&page, json!({}))
            .expect("Invalid settings")
            .into_handle()
            .expect("Table of contents not installed");
        let middle = BLOCK_HEIGHT * 3.0 * (headings / 2) as f32;
        page.scroll_to(middle, ScrollBehavior::Auto);
        page.tick();

        group.bench_with_input(BenchmarkId::new("headings", headings), &headings, |b, _| {
            b.iter(|| {
                toc.tracker().evaluate();
                black_box(toc.active_id())
            });
        });
    }

    group.finish();
}

fn benchmark_scroll_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll_frame");

    for headings in [10, 50, 200] {
        let page = laid_out_page(headings);
        let _toc = install_from_value(&page, json!({}))
            .expect("Invalid settings")
            .into_handle()
            .expect("Table of contents not installed");
        let mut y = 0.0;

        group.bench_with_input(BenchmarkId::new("headings", headings), &headings, |b, _| {
            b.iter(|| {
                // A burst of scroll events coalesced into one frame.
                for _ in 0..8 {
                    y = (y + 37.0) % (BLOCK_HEIGHT * 3.0 * headings as f32);
                    page.scroll_to(y, ScrollBehavior::Auto);
                }
                page.tick();
            });
        });
    }

    group.finish();
}

fn benchmark_panel_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("panel_build");

    for headings in [10, 50, 200] {
        let markup = article(headings);
        group.bench_with_input(BenchmarkId::new("headings", headings), &headings, |b, _| {
            b.iter(|| {
                let page = Rc::new(HeadlessPage::from_markup(&markup).expect("Failed to parse article"));
                let outcome = install_from_value(&page, json!({})).expect("Invalid settings");
                black_box(outcome.is_installed())
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_tracker_evaluation,
    benchmark_scroll_frame,
    benchmark_panel_build
);
criterion_main!(benches);
