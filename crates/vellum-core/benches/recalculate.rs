//! Recalculation Performance Benchmarks
//!
//! Measures the cost of parsing, reprinting, and running single edits
//! through the full recalculation pipeline on documents of realistic
//! size.
//!
//! Run with: `cargo bench --package vellum-core recalculate`

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use vellum_core::{LexicalEditor, NodeKind, Property, PropertyValue, parse_source};

fn sample_document(fields: usize) -> String {
    let mut out = String::from("// generated ledger\npublic class Ledger extends Base {\n");
    for i in 0..fields {
        out.push_str(&format!("    int field{i} = {i};\n"));
    }
    out.push_str("}\n");
    out
}

/// Benchmark: Parse a document with 200 fields
fn bench_parse(c: &mut Criterion) {
    let source = sample_document(200);

    c.bench_function("parse_200_fields", |b| {
        b.iter(|| parse_source(black_box(&source)).unwrap());
    });
}

/// Benchmark: Reprint a parsed document from its buffers
fn bench_reprint(c: &mut Criterion) {
    let source = sample_document(200);
    let editor = LexicalEditor::parse(&source).unwrap();

    c.bench_function("reprint_200_fields", |b| {
        b.iter(|| black_box(editor.text().unwrap()));
    });
}

/// Benchmark: Rename the class, diffing a 200 field body
fn bench_rename(c: &mut Criterion) {
    let source = sample_document(200);

    c.bench_function("rename_200_fields", |b| {
        b.iter(|| {
            let mut editor = LexicalEditor::parse(black_box(&source)).unwrap();
            let class = editor.tree().children(editor.root(), Property::Types)[0];
            editor
                .set_property(class, Property::Name, PropertyValue::ident("Renamed"))
                .unwrap();
            black_box(editor.text().unwrap())
        });
    });
}

/// Benchmark: Append one field through the full pipeline
fn bench_append_field(c: &mut Criterion) {
    let source = sample_document(200);

    c.bench_function("append_field_200_fields", |b| {
        b.iter(|| {
            let mut editor = LexicalEditor::parse(black_box(&source)).unwrap();
            let class = editor.tree().children(editor.root(), Property::Types)[0];
            let field_type = editor
                .build(NodeKind::TypeRef)
                .property(Property::Name, PropertyValue::ident("int"))
                .finish();
            let field = editor
                .build(NodeKind::FieldDecl)
                .property(Property::FieldType, PropertyValue::Node(field_type))
                .property(Property::Name, PropertyValue::ident("appended"))
                .finish();
            editor.list_push(class, Property::Members, field).unwrap();
            black_box(editor.text().unwrap())
        });
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_reprint,
    bench_rename,
    bench_append_field
);
criterion_main!(benches);
