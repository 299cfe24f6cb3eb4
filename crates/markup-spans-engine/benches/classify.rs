use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use markup_spans_engine::{classified_spans, serialize};
use markup_spans_syntax::{AcceptedCharacters, BlockKind, SpanKind, SyntaxTreeNode, TreeBuilder};

/// A page of `rows` list items, each with a code block and a tag helper.
fn generate_page(rows: usize) -> SyntaxTreeNode {
    let mut builder = TreeBuilder::with_file_path("Bench.cshtml");
    builder.block(BlockKind::Markup, |b| {
        for row in 0..rows {
            b.span(SpanKind::Markup, "<li>\n");
            b.block(BlockKind::Statement, |b| {
                b.span_with(SpanKind::Transition, "@", AcceptedCharacters::NONE);
                b.span_with(SpanKind::MetaCode, "{", AcceptedCharacters::NONE);
                b.span(SpanKind::Code, &format!(" var row = {row}; "));
                b.span_with(SpanKind::MetaCode, "}", AcceptedCharacters::NONE);
            });
            b.tag_helper("a", |b| {
                b.unclassified("<a href=\"");
                b.attribute("href", |b| {
                    b.span(SpanKind::Markup, "/rows/");
                });
                b.unclassified("\" class=\"");
                b.attribute("class", |b| {
                    b.span(SpanKind::Markup, "row");
                });
                b.unclassified("\">");
                b.span(SpanKind::Markup, "Row");
                b.unclassified("</a>");
            });
            b.span(SpanKind::Markup, "</li>\n");
        }
    });
    builder
        .finish()
        .expect("generated page should be well formed")
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    group.sample_size(20);

    for rows in [10, 100, 1000] {
        let page = generate_page(rows);
        group.bench_with_input(BenchmarkId::new("classified_spans", rows), &page, |b, page| {
            b.iter(|| std::hint::black_box(classified_spans(std::hint::black_box(page))));
        });
        group.bench_with_input(BenchmarkId::new("serialize", rows), &page, |b, page| {
            b.iter(|| std::hint::black_box(serialize(std::hint::black_box(page))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify);
criterion_main!(benches);
