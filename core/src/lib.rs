pub mod boolean;
pub mod engine;
pub mod eval;
pub mod index;
pub mod persist;
pub mod query;
pub mod rank;
pub mod scoring;
pub mod tokenizer;

use serde::{Deserialize, Deserializer, Serialize};

pub use engine::{SearchEngine, SearchOutcome};
pub use index::InvertedIndex;
pub use query::{Clause, Operator, ParsedQuery};
pub use scoring::ScoringModel;
pub use tokenizer::{EnglishNormalizer, Normalizer};

/// Position of a document in the corpus sequence.
pub type DocId = u32;

/// A normalized hotel record.
///
/// `description` and `features` hold normalized terms; the remaining fields are
/// display attributes carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub rating: Option<serde_json::Value>,
    pub review_count: Option<serde_json::Value>,
    pub address: Option<String>,
    pub country: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: Vec<String>,
    /// One term group per feature phrase.
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<Vec<String>>,
    pub image: Option<String>,
    /// Raw description text, kept for display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl Document {
    /// Description terms followed by every feature's terms, in order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.description
            .iter()
            .chain(self.features.iter().flatten())
            .map(String::as_str)
    }

    /// Token count of the description plus the length of every feature phrase.
    pub fn len(&self) -> usize {
        self.description.len() + self.features.iter().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn term_frequency(&self, term: &str) -> u32 {
        self.terms().filter(|t| *t == term).count() as u32
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_terms_across_description_and_features() {
        let doc = Document {
            name: "Harbor Inn".into(),
            description: vec!["pool".into(), "view".into(), "pool".into()],
            features: vec![vec!["pool".into()], vec!["free".into(), "wifi".into()]],
            ..Default::default()
        };
        assert_eq!(doc.len(), 6);
        assert_eq!(doc.term_frequency("pool"), 3);
        assert_eq!(doc.term_frequency("spa"), 0);
    }

    #[test]
    fn null_fields_deserialize_as_empty() {
        let json = r#"{"name": null, "description": null, "features": [["bar"]], "rating": "4.5"}"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.name, "");
        assert!(doc.description.is_empty());
        assert_eq!(doc.terms().collect::<Vec<_>>(), vec!["bar"]);
        assert_eq!(doc.rating, Some(serde_json::json!("4.5")));
    }
}
