use hotel_core::eval::{
    average_precision_at_k, build_ground_truth, evaluate, evaluate_with, precision_recall_f1, GroundTruthEntry,
};
use hotel_core::persist::{load_ground_truth, save_ground_truth};
use hotel_core::tokenizer::{EnglishNormalizer, Normalizer};
use hotel_core::{Document, InvertedIndex, ScoringModel, SearchEngine};
use std::collections::HashSet;
use tempfile::tempdir;

fn relevant<'a>(names: &[&'a str]) -> HashSet<&'a str> {
    names.iter().copied().collect()
}

fn engine() -> SearchEngine {
    let n = EnglishNormalizer::new();
    let corpus: Vec<Document> = [
        ("Harbor Inn", "pool bar", vec!["pool"]),
        ("Summit Lodge", "pool spa", vec!["gym"]),
        ("Garden Hotel", "spa", vec!["bar", "gym"]),
        ("Quiet House", "garden", vec![]),
        ("City Hostel", "bar", vec![]),
    ]
    .into_iter()
    .map(|(name, description, features)| Document {
        name: name.to_string(),
        description: n.normalize(description),
        features: features.iter().map(|f| n.normalize(f)).collect(),
        ..Default::default()
    })
    .collect();
    let index = InvertedIndex::build(&corpus);
    SearchEngine::new(corpus, index).unwrap()
}

#[test]
fn average_precision_concrete_case() {
    let retrieved = ["Hotel X", "Hotel A", "Hotel B", "Hotel Y"];
    let ap = average_precision_at_k(&relevant(&["Hotel A", "Hotel B"]), &retrieved, 10);
    assert!((ap - (1.0 / 2.0 + 2.0 / 3.0) / 2.0).abs() < 1e-12);
    assert!((ap - 0.583_333).abs() < 1e-6);
}

#[test]
fn average_precision_respects_cutoff() {
    let retrieved = ["Hotel X", "Hotel A", "Hotel B"];
    let ap = average_precision_at_k(&relevant(&["Hotel A", "Hotel B", "Hotel C"]), &retrieved, 2);
    assert!((ap - 0.25).abs() < 1e-12);
    assert_eq!(average_precision_at_k(&relevant(&[]), &retrieved, 10), 0.0);
    assert_eq!(average_precision_at_k(&relevant(&["Hotel A"]), &retrieved, 0), 0.0);
}

#[test]
fn precision_recall_f1_of_retrieved_slots() {
    let retrieved = ["Hotel X", "Hotel A", "Hotel B", "Hotel Y"];
    let m = precision_recall_f1(&retrieved, &relevant(&["Hotel A", "Hotel B"]));
    assert!((m.precision - 0.5).abs() < 1e-12);
    assert!((m.recall - 1.0).abs() < 1e-12);
    assert!((m.f1 - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn recall_is_labelled_over_retrieved_slots_only() {
    // two of the four relevant hotels never show up, recall still counts as full
    let retrieved = ["Hotel A", "Hotel X"];
    let m = precision_recall_f1(&retrieved, &relevant(&["Hotel A", "Hotel B", "Hotel C", "Hotel D"]));
    assert!((m.precision - 0.5).abs() < 1e-12);
    assert_eq!(m.recall, 1.0);
    assert!((m.f1 - 2.0 / 3.0).abs() < 1e-12);

    let misses = precision_recall_f1(&["Hotel X", "Hotel Y"], &relevant(&["Hotel A"]));
    assert_eq!((misses.precision, misses.recall, misses.f1), (0.0, 0.0, 0.0));
}

#[test]
fn nothing_retrieved_scores_zero() {
    let retrieved: [&str; 0] = [];
    let m = precision_recall_f1(&retrieved, &relevant(&["Hotel A"]));
    assert_eq!((m.precision, m.recall, m.f1), (0.0, 0.0, 0.0));
}

#[test]
fn ground_truth_comes_from_boolean_matches() {
    let engine = engine();
    let gt = build_ground_truth(&engine, &["pool AND spa", "spa NOT gym", "sauna"]);
    assert_eq!(gt[0].relevant_documents, vec!["Summit Lodge".to_string()]);
    assert!(gt[1].relevant_documents.is_empty());
    assert!(gt[2].relevant_documents.is_empty());
    assert_eq!(gt[2].query, "sauna");
}

#[test]
fn evaluation_scores_top_ranked_names() {
    let engine = engine();
    let gt = build_ground_truth(&engine, &["pool AND spa"]);
    let report = evaluate(&gt, &engine, 1);
    assert_eq!(report.model, ScoringModel::TfIdf);
    let q = &report.queries[0];
    assert_eq!((q.precision, q.recall, q.f1, q.average_precision), (1.0, 1.0, 1.0, 1.0));
    assert_eq!(report.map, 1.0);

    // with k=3 the two partial matches dilute precision but not AP
    let report = evaluate_with(&gt, &engine, 3, ScoringModel::Bm25);
    let q = &report.queries[0];
    assert!((q.precision - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(q.average_precision, 1.0);
}

#[test]
fn empty_ground_truth_gives_empty_report() {
    let report = evaluate(&[], &engine(), 10);
    assert!(report.queries.is_empty());
    assert_eq!(report.map, 0.0);
}

#[test]
fn ground_truth_round_trips_through_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ground_truth.json");
    let entries = vec![GroundTruthEntry {
        query: "pool AND spa".into(),
        relevant_documents: vec!["Summit Lodge".into()],
    }];
    save_ground_truth(&path, &entries).unwrap();
    assert_eq!(load_ground_truth(&path).unwrap(), entries);
}
