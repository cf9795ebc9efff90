use hotel_core::query::{parse, Clause, Operator};
use hotel_core::tokenizer::EnglishNormalizer;

#[test]
fn default_operator_is_and() {
    let q = parse("pool spa", &EnglishNormalizer::new());
    assert_eq!(
        q.clauses(),
        &[Clause::new(Operator::And, ["pool"]), Clause::new(Operator::And, ["spa"])]
    );
}

#[test]
fn operators_apply_to_following_tokens() {
    let q = parse("pool OR spa bar NOT gym", &EnglishNormalizer::new());
    let ops: Vec<Operator> = q.clauses().iter().map(|c| c.operator).collect();
    assert_eq!(ops, vec![Operator::And, Operator::Or, Operator::Or, Operator::Not]);
    assert_eq!(q.terms(), vec!["pool", "spa", "bar", "gym"]);
}

#[test]
fn repeated_operators_only_update_state() {
    let n = EnglishNormalizer::new();
    assert_eq!(parse("AND AND pool", &n), parse("AND pool", &n));
    assert_eq!(parse("OR NOT pool", &n), parse("NOT pool", &n));
}

#[test]
fn operators_are_case_sensitive() {
    // lowercase "or" is a stopword, so it vanishes instead of switching operator
    let q = parse("pool or spa", &EnglishNormalizer::new());
    assert!(q.clauses().iter().all(|c| c.operator == Operator::And));
    assert_eq!(q.len(), 2);
}

#[test]
fn tokens_without_terms_are_dropped() {
    let n = EnglishNormalizer::new();
    assert!(parse("the AND of", &n).is_empty());
    assert!(parse("AND OR NOT", &n).is_empty());
    assert!(parse("   ", &n).is_empty());
    assert_eq!(parse("pool 42 the", &n).len(), 1);
}
