//! Relevance scoring.
//!
//! Both models score one (term, document) pair at a time and a document's score
//! is the sum over all query terms. Every candidate document is visited for
//! every term; the index only supplies document frequencies here.

use crate::{DocId, Document, InvertedIndex};
use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

pub const BM25_K1: f64 = 1.5;
pub const BM25_B: f64 = 0.75;

/// Per-document term counts and lengths, computed once per corpus.
#[derive(Debug, Clone, Default)]
pub struct CorpusStats {
    term_counts: Vec<HashMap<String, u32>>,
    doc_lengths: Vec<usize>,
    avg_doc_length: f64,
}

impl CorpusStats {
    pub fn new(corpus: &[Document]) -> Self {
        let mut term_counts = Vec::with_capacity(corpus.len());
        let mut doc_lengths = Vec::with_capacity(corpus.len());
        for doc in corpus {
            let mut counts: HashMap<String, u32> = HashMap::new();
            for term in doc.terms() {
                *counts.entry(term.to_string()).or_insert(0) += 1;
            }
            term_counts.push(counts);
            doc_lengths.push(doc.len());
        }
        let total: usize = doc_lengths.iter().sum();
        let avg_doc_length = if corpus.is_empty() { 0.0 } else { total as f64 / corpus.len() as f64 };
        Self { term_counts, doc_lengths, avg_doc_length }
    }

    pub fn num_docs(&self) -> usize { self.doc_lengths.len() }

    /// Occurrences of `term` across the description and all features.
    pub fn term_frequency(&self, term: &str, doc_id: DocId) -> u32 {
        self.term_counts
            .get(doc_id as usize)
            .and_then(|counts| counts.get(term))
            .copied()
            .unwrap_or(0)
    }

    pub fn doc_length(&self, doc_id: DocId) -> usize {
        self.doc_lengths.get(doc_id as usize).copied().unwrap_or(0)
    }

    pub fn avg_doc_length(&self) -> f64 { self.avg_doc_length }
}

/// Contribution of a single query term to a single document's score.
pub trait TermScorer {
    fn score_term(&self, term: &str, doc_id: DocId, index: &InvertedIndex, stats: &CorpusStats) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TfIdfScorer;

impl TermScorer for TfIdfScorer {
    fn score_term(&self, term: &str, doc_id: DocId, index: &InvertedIndex, stats: &CorpusStats) -> f64 {
        tf_idf_weight(stats.term_frequency(term, doc_id), index.doc_freq(term), stats.num_docs())
    }
}

/// `(1 + ln tf) * ln(N / (1 + df))`, or exactly 0 when the term is absent.
pub fn tf_idf_weight(term_frequency: u32, doc_freq: usize, total_docs: usize) -> f64 {
    if term_frequency == 0 {
        return 0.0;
    }
    let tf = 1.0 + (term_frequency as f64).ln();
    let idf = (total_docs as f64 / (1.0 + doc_freq as f64)).ln();
    tf * idf
}

#[derive(Debug, Clone, Copy)]
pub struct Bm25Scorer {
    pub k1: f64,
    pub b: f64,
}

impl Default for Bm25Scorer {
    fn default() -> Self { Self { k1: BM25_K1, b: BM25_B } }
}

impl TermScorer for Bm25Scorer {
    fn score_term(&self, term: &str, doc_id: DocId, index: &InvertedIndex, stats: &CorpusStats) -> f64 {
        let tf = stats.term_frequency(term, doc_id);
        let idf = bm25_idf(index.doc_freq(term), stats.num_docs());
        idf * self.tf_norm(tf, stats.doc_length(doc_id), stats.avg_doc_length())
    }
}

impl Bm25Scorer {
    pub fn tf_norm(&self, term_frequency: u32, doc_length: usize, avg_doc_length: f64) -> f64 {
        let tf = term_frequency as f64;
        // an all-empty corpus has no average; every document is "average" then
        let length_ratio = if avg_doc_length > 0.0 { doc_length as f64 / avg_doc_length } else { 1.0 };
        (tf * (self.k1 + 1.0)) / (tf + self.k1 * (1.0 - self.b + self.b * length_ratio))
    }
}

/// Smoothed idf: `ln((N - df + 0.5) / (df + 0.5) + 1)`. Never negative.
pub fn bm25_idf(doc_freq: usize, total_docs: usize) -> f64 {
    let n = total_docs as f64;
    let df = doc_freq as f64;
    ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoringModel {
    #[serde(rename = "tf-idf")]
    TfIdf,
    #[serde(rename = "bm25")]
    Bm25,
}

impl ScoringModel {
    pub const ALL: [ScoringModel; 2] = [ScoringModel::TfIdf, ScoringModel::Bm25];

    pub fn name(&self) -> &'static str {
        match self {
            ScoringModel::TfIdf => "TF-IDF",
            ScoringModel::Bm25 => "BM25",
        }
    }

    pub fn score_term(&self, term: &str, doc_id: DocId, index: &InvertedIndex, stats: &CorpusStats) -> f64 {
        match self {
            ScoringModel::TfIdf => TfIdfScorer.score_term(term, doc_id, index, stats),
            ScoringModel::Bm25 => Bm25Scorer::default().score_term(term, doc_id, index, stats),
        }
    }
}

impl fmt::Display for ScoringModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScoringModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tf-idf" | "tfidf" | "tf_idf" => Ok(ScoringModel::TfIdf),
            "bm25" => Ok(ScoringModel::Bm25),
            other => Err(anyhow!("unsupported scoring model: {other}")),
        }
    }
}

/// Additive score of every document in `doc_ids` over `query_terms`.
///
/// Each candidate gets an entry (possibly 0.0) as soon as there is at least one
/// query term; with no terms the map is empty.
pub fn score<S: AsRef<str>>(
    query_terms: &[S],
    index: &InvertedIndex,
    stats: &CorpusStats,
    doc_ids: impl IntoIterator<Item = DocId>,
    model: ScoringModel,
) -> BTreeMap<DocId, f64> {
    let doc_ids: Vec<DocId> = doc_ids.into_iter().collect();
    let mut scores: BTreeMap<DocId, f64> = BTreeMap::new();
    for term in query_terms {
        let term = term.as_ref();
        for &doc_id in &doc_ids {
            *scores.entry(doc_id).or_insert(0.0) += model.score_term(term, doc_id, index, stats);
        }
    }
    scores
}
