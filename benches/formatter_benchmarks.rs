#![allow(missing_docs)]
//! Benchmarks for hierarchy formatting and set classification.
//!
//! Records are generated in line format and serialized to MarcXchange once,
//! so only the formatting pipeline is measured.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use marcx_oai::{
    classify, format_batch, format_records, record_to_marcxchange, retype, ChildRef,
    FormatterConfig, HierarchyEntry, Record,
};

fn marcx(lines: &str) -> String {
    let record = Record::from_line_format(lines).expect("valid line format");
    record_to_marcxchange(&retype(record)).expect("serializable record")
}

fn hierarchy(n: u32) -> Vec<HierarchyEntry> {
    let volume = format!(
        "001 00 *a{} *b870970\n\
         004 00 *rn *ab\n\
         008 00 *a2001 *ldan\n\
         014 00 *a23642433\n\
         032 00 *aDBF200338 *xBKM200338\n\
         245 00 *g2.{n} *aIntern sikkerhedsdokumentation\n\
         504 00 *&1 *aNote\n\
         700 00 *aGram *hAnne\n\
         710 00 *aHolstberg Management\n\
         d08 00 *aLokal",
        23_642_468 + n
    );
    vec![
        HierarchyEntry::new(marcx(&volume)),
        HierarchyEntry::new(marcx(
            "001 00 *a23642433 *b870970\n004 00 *rn *as\n014 00 *a23641348\n245 00 *aAfsnit",
        ))
        .with_child(ChildRef::new((23_642_468 + n).to_string(), 870_970)),
        HierarchyEntry::new(marcx(
            "001 00 *a23641348 *b870970\n004 00 *rn *ah\n245 00 *aHovedvaerk",
        ))
        .with_child(ChildRef::new("23642433", 870_970)),
    ]
}

fn benchmark_oai_dc(c: &mut Criterion) {
    let entries = hierarchy(1);
    c.bench_function("format_oai_dc", |b| {
        b.iter(|| format_records(black_box(&entries), "oai_dc", &["NAT"]));
    });
}

fn benchmark_marcx(c: &mut Criterion) {
    let entries = hierarchy(1);
    c.bench_function("format_marcx", |b| {
        b.iter(|| format_records(black_box(&entries), "marcx", &["NAT"]));
    });
}

fn benchmark_batch_1k(c: &mut Criterion) {
    let hierarchies: Vec<_> = (0..1_000).map(hierarchy).collect();
    let config = FormatterConfig::default();
    c.bench_function("format_batch_1k_marcx", |b| {
        b.iter(|| format_batch(black_box(&hierarchies), "marcx", &["BKM"], &config));
    });
}

fn benchmark_classify(c: &mut Criterion) {
    let content = hierarchy(1).swap_remove(0).content;
    c.bench_function("classify_record", |b| {
        b.iter(|| classify(black_box(870_970), black_box(&content)));
    });
}

criterion_group!(
    benches,
    benchmark_oai_dc,
    benchmark_marcx,
    benchmark_batch_1k,
    benchmark_classify
);
criterion_main!(benches);
