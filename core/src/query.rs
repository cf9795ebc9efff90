//! Query parsing: raw text into an ordered list of `(operator, terms)` clauses.
//!
//! Operators are the exact tokens `AND`, `OR` and `NOT`. An operator only sets
//! the operator applied to the following terms; it never produces a clause of
//! its own. There is no precedence and no grouping.

use crate::tokenizer::Normalizer;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    #[default]
    And,
    Or,
    Not,
}

impl Operator {
    /// Case-sensitive: `and` is an ordinary (stop)word, not an operator.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "AND" => Some(Operator::And),
            "OR" => Some(Operator::Or),
            "NOT" => Some(Operator::Not),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Not => "NOT",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One whitespace-delimited input token after normalization, with the
/// operator that was current when it was read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    pub operator: Operator,
    pub terms: Vec<String>,
}

impl Clause {
    pub fn new<S: Into<String>>(operator: Operator, terms: impl IntoIterator<Item = S>) -> Self {
        Self { operator, terms: terms.into_iter().map(Into::into).collect() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParsedQuery {
    clauses: Vec<Clause>,
}

impl ParsedQuery {
    pub fn from_clauses(clauses: Vec<Clause>) -> Self { Self { clauses } }

    pub fn clauses(&self) -> &[Clause] { &self.clauses }

    pub fn is_empty(&self) -> bool { self.clauses.is_empty() }

    pub fn len(&self) -> usize { self.clauses.len() }

    /// Every clause's terms flattened in query order, operators ignored. This is
    /// what the scoring models see.
    pub fn terms(&self) -> Vec<&str> {
        self.clauses
            .iter()
            .flat_map(|c| c.terms.iter().map(String::as_str))
            .collect()
    }
}

/// Never fails: tokens that normalize to nothing are dropped and operator-only
/// input yields an empty query.
pub fn parse(raw: &str, normalizer: &dyn Normalizer) -> ParsedQuery {
    let mut clauses = Vec::new();
    let mut current = Operator::default();
    for token in raw.split_whitespace() {
        if let Some(op) = Operator::from_token(token) {
            current = op;
            continue;
        }
        let terms = normalizer.normalize(token);
        if !terms.is_empty() {
            clauses.push(Clause { operator: current, terms });
        }
    }
    tracing::debug!(raw, clauses = clauses.len(), "parsed query");
    ParsedQuery { clauses }
}
