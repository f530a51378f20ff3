//! Error kinds of the engine.
//!
//! Almost every failure here is an input-validation failure: a malformed
//! formula, a predicate the universe does not know, or a universe too large to
//! enumerate. Evaluation itself is total once its inputs are well-formed.

use std::time::Duration;

use num_bigint::BigUint;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Arity mismatch, unbound variable, or conflicting declarations.
    #[error("malformed formula: {0}")]
    MalformedFormula(String),

    /// A predicate with no extension in the universe being evaluated.
    #[error("undeclared predicate `{0}`")]
    UndeclaredPredicate(String),

    /// Enumerating the universe would exceed the configured threshold.
    #[error("universe too large: {atoms} atomic propositions ({worlds} worlds), limit is {limit}")]
    DomainTooLarge {
        atoms: usize,
        worlds: BigUint,
        limit: usize,
    },

    /// A manually supplied alternative does not fit the prejacent.
    #[error("inconsistent alternative set: {0}")]
    InconsistentAlternativeSet(String),

    /// The cooperative deadline from `Options::timeout` elapsed.
    #[error("evaluation timed out after {0:?}")]
    Timeout(Duration),
}

pub type Result<T> = std::result::Result<T, Error>;
