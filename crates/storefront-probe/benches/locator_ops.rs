//! Locator Operations Benchmarks
//!
//! Benchmarks for token derivation, selector compilation and matching against
//! the in-memory storefront document.
//!
//! Run with: `cargo bench --bench locator_ops`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use storefront_probe::fixtures::products;
use storefront_probe::mock::dom::{select, Node};
use storefront_probe::{
    action_control, hyphenate, item_field, item_row, normalize, CartAction, Selector, TokenScheme,
    INVENTORY_ROW_CLASS,
};

fn bench_token_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("token_derivation");

    for name in products::ALL {
        group.bench_with_input(BenchmarkId::new("normalize", name), &name, |bench, n| {
            bench.iter(|| black_box(normalize(black_box(n))));
        });
        group.bench_with_input(BenchmarkId::new("hyphenate", name), &name, |bench, n| {
            bench.iter(|| black_box(hyphenate(black_box(n))));
        });
    }

    group.finish();
}

fn bench_selector_to_js(c: &mut Criterion) {
    let mut group = c.benchmark_group("selector_to_js");

    let selectors = vec![
        ("test_id", Selector::test_id("shopping-cart-link")),
        ("class_text", Selector::class("title").with_text("Products")),
        (
            "action_control",
            action_control(CartAction::AddToCart, TokenScheme::Hyphenated, products::BACKPACK),
        ),
        (
            "item_field",
            item_field(INVENTORY_ROW_CLASS, products::ONESIE, "inventory_item_price"),
        ),
    ];

    for (name, selector) in selectors {
        group.bench_with_input(BenchmarkId::from_parameter(name), &selector, |bench, sel| {
            bench.iter(|| black_box(sel.to_js()));
        });
    }

    group.finish();
}

fn inventory_document() -> Node {
    Node::new("body").child(Node::new("div").class("inventory_list").children(
        products::ALL.iter().map(|name| {
            Node::new("div")
                .class(INVENTORY_ROW_CLASS)
                .child(Node::new("div").class("inventory_item_name").text(*name))
                .child(Node::new("div").class("inventory_item_price").text("$9.99"))
                .child(
                    Node::new("button")
                        .test_id(format!("add-to-cart-{}", hyphenate(name)))
                        .text("Add to cart"),
                )
        }),
    ))
}

fn bench_mock_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("mock_select");
    let document = inventory_document();

    let selectors = vec![
        ("row", item_row(INVENTORY_ROW_CLASS, products::FLEECE_JACKET)),
        (
            "price",
            item_field(INVENTORY_ROW_CLASS, products::FLEECE_JACKET, "inventory_item_price"),
        ),
        (
            "button",
            action_control(
                CartAction::AddToCart,
                TokenScheme::Hyphenated,
                products::ALL_THE_THINGS_T_SHIRT,
            ),
        ),
    ];

    for (name, selector) in selectors {
        group.bench_with_input(BenchmarkId::from_parameter(name), &selector, |bench, sel| {
            bench.iter(|| black_box(select(&document, sel).len()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_token_derivation,
    bench_selector_to_js,
    bench_mock_select
);
criterion_main!(benches);
