use criterion::{criterion_group, criterion_main, Criterion};
use folio_core::scores::{BODY_WEIGHT, TITLE_WEIGHT};
use folio_core::tokenizer::normalize;
use folio_core::{Encoding, Registry, ScoreMap, SearchIndex};

const TEXT: &str = "The Computer Science course of Tech Scouts is an intensive 3-week summer course. \
    Classes start by introducing fundamental concepts and then nail them down through curated problems: \
    binary search trees, range queries, union finds, tries and suffix trees, SQRT decomposition and \
    persistent data structures. Olimpíada Informàtica de Catalunya, Niño, Café.";

fn corpus(pages: u32) -> (Registry, ScoreMap) {
    let mut reg = Registry::new();
    let mut scores = ScoreMap::new();
    for i in 0..pages {
        let title = format!("Page {i} Tech Scouts");
        let id = reg.register_page(&title, &format!("p/{i}"), i % 50);
        scores.accumulate(id, &title, TITLE_WEIGHT);
        scores.accumulate(id, TEXT, BODY_WEIGHT);
    }
    (reg, scores)
}

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_paragraph", |b| b.iter(|| normalize(TEXT)));
}

fn bench_build(c: &mut Criterion) {
    let (reg, scores) = corpus(200);
    c.bench_function("build_index_200_pages", |b| b.iter(|| SearchIndex::build(&reg, &scores, 20, Encoding::Flat)));
}

criterion_group!(benches, bench_normalize, bench_build);
criterion_main!(benches);
