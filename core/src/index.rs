use crate::{DocId, Document};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Term to posting list mapping. Posting lists are sorted by doc id and hold
/// each id at most once, however the index was constructed or deserialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, Vec<DocId>>", into = "HashMap<String, Vec<DocId>>")]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<DocId>>,
}

impl From<HashMap<String, Vec<DocId>>> for InvertedIndex {
    fn from(postings: HashMap<String, Vec<DocId>>) -> Self { Self::from_postings(postings) }
}

impl From<InvertedIndex> for HashMap<String, Vec<DocId>> {
    fn from(index: InvertedIndex) -> Self { index.postings }
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Group-by over the corpus: a document lands under every term that occurs
    /// in its description or any of its features.
    pub fn build(corpus: &[Document]) -> Self {
        let mut postings: HashMap<String, Vec<DocId>> = HashMap::new();
        for (doc_id, doc) in corpus.iter().enumerate() {
            let mut seen_in_doc: HashSet<&str> = HashSet::new();
            for term in doc.terms() {
                if seen_in_doc.insert(term) {
                    postings.entry(term.to_string()).or_default().push(doc_id as DocId);
                }
            }
        }
        Self { postings }
    }

    pub fn from_postings(mut postings: HashMap<String, Vec<DocId>>) -> Self {
        for plist in postings.values_mut() {
            plist.sort_unstable();
            plist.dedup();
        }
        Self { postings }
    }

    /// Posting list for `term`; empty when the term is not indexed.
    pub fn postings(&self, term: &str) -> &[DocId] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn doc_freq(&self, term: &str) -> usize { self.postings(term).len() }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    pub fn terms(&self) -> impl Iterator<Item = &str> { self.postings.keys().map(String::as_str) }

    /// Ids are positions in the corpus, so every posting must point inside it.
    pub fn validate(&self, num_docs: usize) -> Result<()> {
        for (term, plist) in &self.postings {
            if let Some(&doc_id) = plist.iter().find(|&&id| id as usize >= num_docs) {
                bail!("term {term:?} references document {doc_id} but the corpus holds {num_docs} documents");
            }
        }
        Ok(())
    }
}
