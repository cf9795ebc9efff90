//! Offline ranking evaluation: ground truth from boolean matches, then
//! precision/recall/F1 and average precision of the top-k ranked names.

use crate::scoring::ScoringModel;
use crate::SearchEngine;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEFAULT_K: usize = 10;

pub const DEFAULT_QUERIES: [&str; 4] = [
    "Non-smoking hotel AND Dry cleaning",
    "Air conditioning OR Free breakfast",
    "Taxi service NOT Airport transportation",
    "Rooftop terrace AND Hot tub",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundTruthEntry {
    pub query: String,
    pub relevant_documents: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RetrievalMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryMetrics {
    pub query: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub average_precision: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub k: usize,
    pub model: ScoringModel,
    pub queries: Vec<QueryMetrics>,
    pub mean_precision: f64,
    pub mean_recall: f64,
    pub mean_f1: f64,
    /// Mean of the per-query average precision.
    pub map: f64,
}

/// Boolean-evaluate each query and record the names of the matching documents.
pub fn build_ground_truth<S: AsRef<str>>(engine: &SearchEngine, queries: &[S]) -> Vec<GroundTruthEntry> {
    queries
        .iter()
        .map(|query| {
            let query = query.as_ref();
            let matching = engine.boolean(&engine.parse(query));
            let relevant_documents = matching
                .into_iter()
                .filter_map(|id| engine.document(id))
                .map(|doc| doc.name.clone())
                .collect::<Vec<_>>();
            tracing::info!(query, relevant = relevant_documents.len(), "ground truth entry");
            GroundTruthEntry { query: query.to_string(), relevant_documents }
        })
        .collect()
}

/// Every retrieved slot is a positive prediction labelled by membership in
/// `relevant`. Only retrieved slots carry labels, so there are no false
/// negatives: recall is 1 as soon as one slot is relevant and 0 otherwise.
/// Nothing retrieved scores zero across the board.
pub fn precision_recall_f1<S: AsRef<str>>(retrieved: &[S], relevant: &HashSet<&str>) -> RetrievalMetrics {
    if retrieved.is_empty() {
        return RetrievalMetrics::default();
    }
    let hits = retrieved.iter().filter(|name| relevant.contains(name.as_ref())).count() as f64;
    let precision = hits / retrieved.len() as f64;
    let recall = if hits > 0.0 { 1.0 } else { 0.0 };
    let f1 = if precision + recall > 0.0 { 2.0 * precision * recall / (precision + recall) } else { 0.0 };
    RetrievalMetrics { precision, recall, f1 }
}

/// Average precision over `retrieved[..k]`, normalized by
/// `min(|relevant|, k)`.
pub fn average_precision_at_k<S: AsRef<str>>(relevant: &HashSet<&str>, retrieved: &[S], k: usize) -> f64 {
    let denominator = relevant.len().min(k);
    if denominator == 0 {
        return 0.0;
    }
    let mut hits = 0usize;
    let mut score = 0.0;
    for (i, name) in retrieved.iter().take(k).enumerate() {
        if relevant.contains(name.as_ref()) {
            hits += 1;
            score += hits as f64 / (i + 1) as f64;
        }
    }
    score / denominator as f64
}

pub fn evaluate(ground_truth: &[GroundTruthEntry], engine: &SearchEngine, k: usize) -> EvaluationReport {
    evaluate_with(ground_truth, engine, k, ScoringModel::TfIdf)
}

/// Re-parse each ground-truth query, rank the full corpus with `model` and
/// compare the top-k names against the judgment.
pub fn evaluate_with(
    ground_truth: &[GroundTruthEntry],
    engine: &SearchEngine,
    k: usize,
    model: ScoringModel,
) -> EvaluationReport {
    let mut queries = Vec::with_capacity(ground_truth.len());
    for entry in ground_truth {
        let parsed = engine.parse(&entry.query);
        let retrieved: Vec<&str> = engine
            .rank(&parsed.terms(), model)
            .into_iter()
            .take(k)
            .filter_map(|(id, _)| engine.document(id))
            .map(|doc| doc.name.as_str())
            .collect();
        let relevant: HashSet<&str> = entry.relevant_documents.iter().map(String::as_str).collect();
        let metrics = precision_recall_f1(&retrieved, &relevant);
        let average_precision = average_precision_at_k(&relevant, &retrieved, k);
        tracing::debug!(query = %entry.query, ?metrics, average_precision, "evaluated query");
        queries.push(QueryMetrics {
            query: entry.query.clone(),
            precision: metrics.precision,
            recall: metrics.recall,
            f1: metrics.f1,
            average_precision,
        });
    }
    let mean = |f: fn(&QueryMetrics) -> f64| {
        if queries.is_empty() { 0.0 } else { queries.iter().map(f).sum::<f64>() / queries.len() as f64 }
    };
    EvaluationReport {
        k,
        model,
        mean_precision: mean(|q| q.precision),
        mean_recall: mean(|q| q.recall),
        mean_f1: mean(|q| q.f1),
        map: mean(|q| q.average_precision),
        queries,
    }
}
