use criterion::{criterion_group, criterion_main, Criterion};
use hotel_core::{Document, InvertedIndex, ScoringModel, SearchEngine};

const VOCAB: &[&str] = &["pool", "spa", "bar", "gym", "breakfast", "wifi", "parking", "terrace", "sauna", "laundri"];

fn synthetic_corpus(num_docs: usize) -> Vec<Document> {
    (0..num_docs)
        .map(|i| Document {
            name: format!("Hotel {i}"),
            description: (0..40).map(|j| VOCAB[(i * 7 + j * 3) % VOCAB.len()].to_string()).collect(),
            features: (0..6).map(|j| vec![VOCAB[(i + j) % VOCAB.len()].to_string()]).collect(),
            ..Default::default()
        })
        .collect()
}

fn bench_search(c: &mut Criterion) {
    let corpus = synthetic_corpus(2_000);
    let index = InvertedIndex::build(&corpus);
    let engine = SearchEngine::new(corpus, index).expect("valid corpus");
    let query = engine.parse("pool AND spa OR sauna NOT parking");
    let terms = query.terms();

    c.bench_function("boolean_2k_docs", |b| b.iter(|| engine.boolean(&query)));
    c.bench_function("rank_tf_idf_2k_docs", |b| b.iter(|| engine.rank(&terms, ScoringModel::TfIdf)));
    c.bench_function("rank_bm25_2k_docs", |b| b.iter(|| engine.rank(&terms, ScoringModel::Bm25)));
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
