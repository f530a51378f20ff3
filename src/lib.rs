//! # exh-rs: exhaustification over finite-domain logical forms
//!
//! **`exh-rs`** computes the strengthened meanings that alternative-based
//! theories of scalar implicature assign to sentences. You build a logical
//! form (predicates, connectives, quantifiers over small finite domains),
//! wrap it in an exhaustification operator, and ask what it means: which
//! worlds it holds in, what it entails, and which alternatives it negates.
//!
//! ## How it works
//!
//! - **Alternatives** are generated structurally: scale-mates replace
//!   lexical items (`∃`/`∀`, `∨`/`∧`), existentials may range over sub-domains,
//!   and connectives may be replaced by their parts. See [`alternatives`].
//! - **Exhaustification** negates the innocently excludable alternatives and,
//!   optionally, asserts the innocently includable ones. See [`exh`].
//! - **Evaluation** is exhaustive: a [`Universe`][crate::universe::Universe]
//!   enumerates every assignment of truth values to the atomic propositions
//!   and computes truth tables as bit sets over those worlds.
//!
//! ## Basic Usage
//!
//! ```rust
//! use exh_rs::options::Options;
//! use exh_rs::pred::Pred;
//! use exh_rs::universe::Universe;
//!
//! let a = Pred::prop("a").atom();
//! let b = Pred::prop("b").atom();
//!
//! // "a or b", exhaustified with the default scales: not both.
//! let options = Options::default();
//! let e = (a.clone() | &b).exh(&options).unwrap();
//!
//! let u = Universe::from_formula(&e, &options).unwrap();
//! assert!(u.equivalent(&e, &((a.clone() | &b) & !(a & b))).unwrap());
//! ```
//!
//! ## Core Components
//!
//! - **[`formula`]**: Logical forms and quantifiers.
//! - **[`exh`]**: The exhaustification operator and its kernels.
//! - **[`universe`]**: Worlds, truth tables and entailment.
//! - **[`diagnose`]**: What an exhaustification excludes and includes, and why.

pub mod alternatives;
pub mod bitset;
mod cache;
pub mod diagnose;
pub mod error;
mod eval;
pub mod exh;
pub mod formula;
pub mod options;
pub mod pred;
pub mod render;
pub mod sat;
pub mod scale;
pub mod types;
pub mod universe;
