use crate::DocId;
use std::cmp::Ordering;

/// Highest score first. The sort is stable, so tied documents keep their input
/// order (ascending doc id when fed from a `BTreeMap`).
pub fn rank(scores: impl IntoIterator<Item = (DocId, f64)>) -> Vec<(DocId, f64)> {
    let mut ranked: Vec<(DocId, f64)> = scores.into_iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked
}
