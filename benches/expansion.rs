//! Template expansion benchmarks over the shipped dork dictionary.
//!
//! Run with: `cargo bench`

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use krasnyy::dorks::TemplateDictionary;
use krasnyy::export::materialize;
use krasnyy::locale::ResolvedLocale;
use krasnyy::query::{EncodedQuery, build_url};
use std::path::PathBuf;

fn load_dictionary() -> TemplateDictionary {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join("dorks.json");
    let content = std::fs::read_to_string(&path).expect("Failed to read data/dorks.json");
    TemplateDictionary::from_value(serde_json::from_str(&content).expect("Invalid dorks.json"))
}

fn bench_encode(c: &mut Criterion) {
    c.bench_function("encode_query", |b| {
        b.iter(|| EncodedQuery::new(black_box("  john   doe / ünïcödé ")))
    });
}

fn bench_build_url(c: &mut Criterion) {
    let query = EncodedQuery::new("john doe");
    let template = "https://www.google.com/search?q={query_q}+OR+{query_plus}+inurl:{query_nospace}&x={query}";
    c.bench_function("build_url_all_placeholders", |b| {
        b.iter(|| build_url(black_box(template), &query))
    });
}

fn bench_materialize(c: &mut Criterion) {
    let dictionary = load_dictionary();
    let locale = ResolvedLocale::fallback();
    c.bench_function("materialize_shipped_dictionary", |b| {
        b.iter(|| materialize(&dictionary, &locale, black_box("john doe")))
    });
}

criterion_group!(benches, bench_encode, bench_build_url, bench_materialize);
criterion_main!(benches);
