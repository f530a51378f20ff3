//! Predicate declarations and their arguments.

use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::formula::{Formula, Node};
use crate::types::{Domain, Individual};

/// A named relation over one or more domains.
///
/// `depends` names the variables the predicate is applied to by default
/// (see [`Pred::atom`]); `domains` gives the domain of each argument position.
/// The extension of a predicate in a model is a subset of the product of its
/// domains, so a predicate contributes `∏ |domain|` atomic propositions to a
/// universe.
///
/// Predicates are identified by name: two declarations with the same name must
/// agree on their domains.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pred {
    name: Rc<str>,
    depends: Rc<[Rc<str>]>,
    domains: Rc<[Domain]>,
}

impl Pred {
    /// Declares a predicate.
    ///
    /// Fails with [`Error::MalformedFormula`] if `depends` and `domains` have
    /// different lengths, or if a variable is listed twice.
    pub fn new<S: AsRef<str>>(
        name: &str,
        depends: impl IntoIterator<Item = S>,
        domains: impl IntoIterator<Item = Domain>,
    ) -> Result<Self> {
        let depends: Vec<Rc<str>> = depends.into_iter().map(|s| Rc::from(s.as_ref())).collect();
        let domains: Vec<Domain> = domains.into_iter().collect();
        if depends.len() != domains.len() {
            return Err(Error::MalformedFormula(format!(
                "predicate `{}` depends on {} variables but declares {} domains",
                name,
                depends.len(),
                domains.len()
            )));
        }
        for (i, v) in depends.iter().enumerate() {
            if depends[..i].contains(v) {
                return Err(Error::MalformedFormula(format!(
                    "predicate `{}` depends twice on `{}`",
                    name, v
                )));
            }
        }
        Ok(Pred {
            name: Rc::from(name),
            depends: depends.into(),
            domains: domains.into(),
        })
    }

    /// A zero-ary predicate, i.e. a propositional atom.
    pub fn prop(name: &str) -> Self {
        Pred {
            name: Rc::from(name),
            depends: Rc::from([]),
            domains: Rc::from([]),
        }
    }

    /// A one-place predicate applied to `var` ranging over `domain`.
    pub fn unary(name: &str, var: &str, domain: Domain) -> Self {
        Pred {
            name: Rc::from(name),
            depends: Rc::from([Rc::from(var)]),
            domains: Rc::from([domain]),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn depends(&self) -> &[Rc<str>] {
        &self.depends
    }

    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn arity(&self) -> usize {
        self.domains.len()
    }

    /// Number of atomic propositions this predicate contributes to a universe.
    pub fn num_atoms(&self) -> usize {
        self.domains.iter().map(|d| d.size()).product()
    }

    /// Checks that `other` declares the same relation (same name and domains).
    pub fn same_signature(&self, other: &Pred) -> bool {
        self.name == other.name && self.domains == other.domains
    }

    /// The predicate applied to its `depends` variables.
    pub fn atom(&self) -> Formula {
        let args = self.depends.iter().map(|v| Term::Var(v.clone())).collect();
        Formula::new(Node::Atom {
            pred: self.clone(),
            args,
        })
    }

    /// The predicate applied to explicit arguments.
    ///
    /// Fails with [`Error::MalformedFormula`] on arity mismatch or if a
    /// constant lies outside of the domain of its position.
    pub fn apply(&self, args: impl IntoIterator<Item = Term>) -> Result<Formula> {
        let args: Vec<Term> = args.into_iter().collect();
        if args.len() != self.arity() {
            return Err(Error::MalformedFormula(format!(
                "predicate `{}` has arity {} but was applied to {} arguments",
                self.name,
                self.arity(),
                args.len()
            )));
        }
        for (arg, domain) in args.iter().zip(self.domains.iter()) {
            if let Term::Const(ind) = arg {
                if ind.index() >= domain.size() {
                    return Err(Error::MalformedFormula(format!(
                        "{} is not in {} (argument of `{}`)",
                        ind, domain, self.name
                    )));
                }
            }
        }
        Ok(Formula::new(Node::Atom {
            pred: self.clone(),
            args,
        }))
    }
}

impl From<&Pred> for Formula {
    fn from(pred: &Pred) -> Self {
        pred.atom()
    }
}

impl From<Pred> for Formula {
    fn from(pred: Pred) -> Self {
        pred.atom()
    }
}

/// An argument of a predicate: a variable bound by some quantifier, or a
/// constant individual.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Var(Rc<str>),
    Const(Individual),
}

impl Term {
    pub fn var(name: &str) -> Self {
        Term::Var(Rc::from(name))
    }

    pub fn individual(index: usize) -> Self {
        Term::Const(Individual::new(index))
    }
}

impl From<Individual> for Term {
    fn from(ind: Individual) -> Self {
        Term::Const(ind)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(v) => write!(f, "{}", v),
            Term::Const(i) => write!(f, "{}", i),
        }
    }
}
