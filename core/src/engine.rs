use crate::persist::{load_corpus, load_index, load_meta, DataPaths};
use crate::query::{self, ParsedQuery};
use crate::rank::rank;
use crate::scoring::{self, CorpusStats, ScoringModel};
use crate::tokenizer::{EnglishNormalizer, Normalizer};
use crate::{boolean, DocId, Document, InvertedIndex};
use anyhow::{bail, Result};
use std::collections::{BTreeMap, BTreeSet};

/// Everything a query needs, loaded once and only read afterwards. Safe to
/// share between concurrent requests behind an `Arc`.
pub struct SearchEngine {
    corpus: Vec<Document>,
    index: InvertedIndex,
    stats: CorpusStats,
    normalizer: Box<dyn Normalizer>,
}

/// The three answers to a query-time request.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub query: ParsedQuery,
    pub matching: BTreeSet<DocId>,
    pub tf_idf: Vec<(DocId, f64)>,
    pub bm25: Vec<(DocId, f64)>,
}

impl SearchEngine {
    pub fn new(corpus: Vec<Document>, index: InvertedIndex) -> Result<Self> {
        Self::with_normalizer(corpus, index, EnglishNormalizer::new())
    }

    pub fn with_normalizer(
        corpus: Vec<Document>,
        index: InvertedIndex,
        normalizer: impl Normalizer + 'static,
    ) -> Result<Self> {
        index.validate(corpus.len())?;
        let stats = CorpusStats::new(&corpus);
        tracing::info!(
            num_docs = corpus.len(),
            num_terms = index.num_terms(),
            avg_doc_length = stats.avg_doc_length(),
            "search engine ready"
        );
        Ok(Self { corpus, index, stats, normalizer: Box::new(normalizer) })
    }

    /// Load corpus and index from a data directory. Any missing or inconsistent
    /// file is fatal.
    pub fn open(paths: &DataPaths) -> Result<Self> {
        let corpus = load_corpus(paths)?;
        let index = load_index(paths)?;
        if let Some(meta) = load_meta(paths)? {
            if meta.num_docs as usize != corpus.len() {
                bail!(
                    "{} records {} documents but the corpus holds {}",
                    paths.meta().display(),
                    meta.num_docs,
                    corpus.len()
                );
            }
        }
        Self::new(corpus, index)
    }

    pub fn corpus(&self) -> &[Document] { &self.corpus }

    pub fn index(&self) -> &InvertedIndex { &self.index }

    pub fn stats(&self) -> &CorpusStats { &self.stats }

    pub fn num_docs(&self) -> usize { self.corpus.len() }

    pub fn document(&self, doc_id: DocId) -> Option<&Document> { self.corpus.get(doc_id as usize) }

    pub fn normalizer(&self) -> &dyn Normalizer { self.normalizer.as_ref() }

    pub fn parse(&self, raw: &str) -> ParsedQuery {
        query::parse(raw, self.normalizer.as_ref())
    }

    /// An empty query keeps every document.
    pub fn boolean(&self, query: &ParsedQuery) -> BTreeSet<DocId> {
        boolean::evaluate(query.clauses(), &self.index, self.corpus.len())
    }

    pub fn score<S: AsRef<str>>(
        &self,
        terms: &[S],
        model: ScoringModel,
        doc_ids: impl IntoIterator<Item = DocId>,
    ) -> BTreeMap<DocId, f64> {
        scoring::score(terms, &self.index, &self.stats, doc_ids, model)
    }

    /// Ranks the whole corpus, not just boolean matches.
    pub fn rank<S: AsRef<str>>(&self, terms: &[S], model: ScoringModel) -> Vec<(DocId, f64)> {
        rank(self.score(terms, model, 0..self.corpus.len() as DocId))
    }

    pub fn search(&self, raw: &str) -> SearchOutcome {
        let query = self.parse(raw);
        let terms = query.terms();
        let matching = self.boolean(&query);
        let tf_idf = self.rank(&terms, ScoringModel::TfIdf);
        let bm25 = self.rank(&terms, ScoringModel::Bm25);
        tracing::debug!(raw, matching = matching.len(), terms = terms.len(), "search");
        SearchOutcome { query, matching, tf_idf, bm25 }
    }
}
