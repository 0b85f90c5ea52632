use criterion::{Criterion, black_box, criterion_group, criterion_main};
use markup::{MarkupConfig, MarkupTree, ModelKind};

const SMALL_ROWS: usize = 64;
const LARGE_ROWS: usize = 20_000;

fn build_table(rows: usize, model: ModelKind) -> MarkupTree {
    let mut tree = MarkupTree::new(MarkupConfig {
        model,
        ..MarkupConfig::default()
    });
    tree.open_element("table", &[("class", Some("grid"))]);
    for row in 0..rows {
        let id = row.to_string();
        tree.open_element("tr", &[("data-row", Some(&id))]);
        tree.open_element("td", &[]);
        tree.write_text("cell <");
        tree.write_text(&id);
        tree.write_text("> & more");
        let _ = tree.close_element();
        tree.open_element("td", &[]);
        tree.open_element("input", &[("type", Some("text")), ("value", Some("\"q\""))]);
        let _ = tree.close_element();
        let _ = tree.close_element();
        let _ = tree.close_element();
    }
    let _ = tree.close_element();
    tree
}

fn bench_build_small(c: &mut Criterion) {
    c.bench_function("bench_build_small", |b| {
        b.iter(|| black_box(build_table(black_box(SMALL_ROWS), ModelKind::Html5)).len());
    });
}

fn bench_serialize_large_html(c: &mut Criterion) {
    let tree = build_table(LARGE_ROWS, ModelKind::Html5);
    c.bench_function("bench_serialize_large_html", |b| {
        b.iter(|| black_box(tree.serialize()).len());
    });
}

fn bench_serialize_large_xml(c: &mut Criterion) {
    let tree = build_table(LARGE_ROWS, ModelKind::Xml);
    c.bench_function("bench_serialize_large_xml", |b| {
        b.iter(|| black_box(tree.serialize()).len());
    });
}

criterion_group!(
    benches,
    bench_build_small,
    bench_serialize_large_html,
    bench_serialize_large_xml
);
criterion_main!(benches);
