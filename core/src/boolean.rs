use crate::query::{Clause, Operator};
use crate::{DocId, InvertedIndex};
use std::collections::BTreeSet;

/// Left-to-right fold of `clauses` over the index, starting from every
/// document in `[0, total_docs)`. Clause order is significant.
pub fn evaluate(clauses: &[Clause], index: &InvertedIndex, total_docs: usize) -> BTreeSet<DocId> {
    let mut result: BTreeSet<DocId> = (0..total_docs as DocId).collect();
    for clause in clauses {
        let term_docs = clause_docs(clause, index);
        match clause.operator {
            Operator::And => result.retain(|id| term_docs.contains(id)),
            Operator::Or => result.extend(term_docs),
            Operator::Not => result.retain(|id| !term_docs.contains(id)),
        }
    }
    result
}

/// Union of the postings of every term in the clause; an empty term group
/// matches nothing.
fn clause_docs(clause: &Clause, index: &InvertedIndex) -> BTreeSet<DocId> {
    clause
        .terms
        .iter()
        .flat_map(|term| index.postings(term).iter().copied())
        .collect()
}
