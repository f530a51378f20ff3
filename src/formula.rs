//! Logical forms.
//!
//! A [`Formula`] is an immutable tree of [`Node`]s: predicate atoms, Boolean
//! connectives, generalized quantifiers binding a named variable over a
//! [`Range`], and exhaustification nodes carrying their alternative set.
//!
//! Formulas are cheap to clone (a reference-counted pointer) and carry a
//! structural hash and their free variables, both computed once at
//! construction. Structural equality is what alternative sets deduplicate on.
//!
//! ```
//! use exh_rs::formula::{Formula, Quantifier};
//! use exh_rs::pred::Pred;
//! use exh_rs::types::Domain;
//!
//! let d = Domain::new(3);
//! let smiled = Pred::unary("smiled", "dancer", d);
//! let f = Quantifier::existential_sub("dancer", d).scope(&smiled);
//! assert!(f.is_closed());
//! assert_eq!(f.to_string(), "∃dancer, smiled(dancer)");
//! ```

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{BitAnd, BitOr, Not};
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::options::{DisplayMode, Inclusion};
use crate::pred::{Pred, Term};
use crate::render::render;
use crate::types::{Domain, Range};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum QuantifierKind {
    Universal,
    Existential,
    /// True iff strictly more than half of the range satisfies the body.
    Most,
}

/// A generalized quantifier binding `var` over `range`.
///
/// `sub_domain` marks an existential that has sub-domain alternatives: its
/// alternatives range over every non-empty subset of its domain. Such an
/// existential takes no part in scalar substitution.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Quantifier {
    kind: QuantifierKind,
    var: Rc<str>,
    range: Range,
    sub_domain: bool,
}

impl Quantifier {
    fn new(kind: QuantifierKind, var: &str, domain: Domain, sub_domain: bool) -> Self {
        Quantifier {
            kind,
            var: Rc::from(var),
            range: domain.full_range(),
            sub_domain,
        }
    }

    pub fn universal(var: &str, domain: Domain) -> Self {
        Self::new(QuantifierKind::Universal, var, domain, false)
    }

    pub fn existential(var: &str, domain: Domain) -> Self {
        Self::new(QuantifierKind::Existential, var, domain, false)
    }

    pub fn most(var: &str, domain: Domain) -> Self {
        Self::new(QuantifierKind::Most, var, domain, false)
    }

    /// An existential with sub-domain alternatives.
    pub fn existential_sub(var: &str, domain: Domain) -> Self {
        Self::new(QuantifierKind::Existential, var, domain, true)
    }

    pub fn kind(&self) -> QuantifierKind {
        self.kind
    }

    pub fn var(&self) -> &str {
        &self.var
    }

    pub(crate) fn var_name(&self) -> &Rc<str> {
        &self.var
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn domain(&self) -> Domain {
        self.range.domain()
    }

    pub fn has_sub_domain_alternatives(&self) -> bool {
        self.sub_domain
    }

    /// The same quantifier with another quantificational force.
    pub fn with_kind(&self, kind: QuantifierKind) -> Self {
        Quantifier {
            kind,
            ..self.clone()
        }
    }

    /// The same quantifier restricted to `range`.
    ///
    /// # Panics
    ///
    /// Panics if `range` is not a range of this quantifier's domain.
    pub fn with_range(&self, range: Range) -> Self {
        assert_eq!(range.domain(), self.domain(), "Range of a different domain");
        Quantifier {
            range,
            ..self.clone()
        }
    }

    /// Applies the quantifier to a body.
    pub fn scope(&self, body: impl Into<Formula>) -> Formula {
        Formula::new(Node::Quant {
            quantifier: self.clone(),
            body: body.into(),
        })
    }
}

/// Payload of an exhaustification node.
///
/// The alternative set is fixed when the node is built (see
/// [`exhaustify`][crate::exh::exhaustify]) and shared between the node and
/// every alternative derived from it.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ExhNode {
    pub prejacent: Formula,
    pub alternatives: Rc<[Formula]>,
    /// Innocent inclusion on top of innocent exclusion.
    pub ii: bool,
    pub inclusion: Inclusion,
}

#[derive(Debug, Eq, PartialEq, Hash)]
pub enum Node {
    Const(bool),
    Atom { pred: Pred, args: Vec<Term> },
    Not(Formula),
    And(Formula, Formula),
    Or(Formula, Formula),
    Quant { quantifier: Quantifier, body: Formula },
    Exh(ExhNode),
}

#[derive(Clone)]
pub struct Formula {
    node: Rc<Node>,
    hash: u64,
    free: Rc<[Rc<str>]>,
}

impl Formula {
    pub(crate) fn new(node: Node) -> Self {
        let mut hasher = DefaultHasher::new();
        node.hash(&mut hasher);
        let hash = hasher.finish();
        let free = free_variables(&node);
        Formula {
            node: Rc::new(node),
            hash,
            free,
        }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn top() -> Self {
        Formula::new(Node::Const(true))
    }

    pub fn bottom() -> Self {
        Formula::new(Node::Const(false))
    }

    pub fn not(f: impl Into<Formula>) -> Self {
        Formula::new(Node::Not(f.into()))
    }

    pub fn and(lhs: impl Into<Formula>, rhs: impl Into<Formula>) -> Self {
        Formula::new(Node::And(lhs.into(), rhs.into()))
    }

    pub fn or(lhs: impl Into<Formula>, rhs: impl Into<Formula>) -> Self {
        Formula::new(Node::Or(lhs.into(), rhs.into()))
    }

    pub fn implies(lhs: impl Into<Formula>, rhs: impl Into<Formula>) -> Self {
        Formula::or(Formula::not(lhs), rhs)
    }

    /// Left-nested conjunction; `⊤` when empty.
    pub fn and_many(fs: impl IntoIterator<Item = Formula>) -> Self {
        fs.into_iter().reduce(Formula::and).unwrap_or_else(Formula::top)
    }

    /// Left-nested disjunction; `⊥` when empty.
    pub fn or_many(fs: impl IntoIterator<Item = Formula>) -> Self {
        fs.into_iter().reduce(Formula::or).unwrap_or_else(Formula::bottom)
    }

    pub(crate) fn exh_node(prejacent: Formula, alternatives: Rc<[Formula]>, ii: bool, inclusion: Inclusion) -> Self {
        Formula::new(Node::Exh(ExhNode {
            prejacent,
            alternatives,
            ii,
            inclusion,
        }))
    }

    pub fn as_exh(&self) -> Option<&ExhNode> {
        match self.node() {
            Node::Exh(e) => Some(e),
            _ => None,
        }
    }

    /// Free variables, sorted by name.
    pub fn free_variables(&self) -> &[Rc<str>] {
        &self.free
    }

    pub fn is_closed(&self) -> bool {
        self.free.is_empty()
    }

    /// Renders the formula in the given mode.
    pub fn render(&self, mode: DisplayMode) -> String {
        render(self, mode)
    }

    /// Distinct predicates occurring in the formula, including inside
    /// alternative sets, in order of first occurrence.
    pub fn predicates(&self) -> Vec<Pred> {
        let mut seen = HashSet::new();
        let mut preds: Vec<Pred> = Vec::new();
        collect_predicates(self, &mut seen, &mut preds);
        preds
    }

    /// Checks well-formedness.
    ///
    /// Every predicate name must be declared consistently, every variable
    /// argument must range over the domain its predicate expects at that
    /// position, and a free variable must be used with a single domain.
    pub fn check(&self) -> Result<()> {
        let mut checker = Checker::default();
        checker.check(self, &mut Vec::new())
    }
}

fn free_variables(node: &Node) -> Rc<[Rc<str>]> {
    let mut vars: Vec<Rc<str>> = match node {
        Node::Const(_) => Vec::new(),
        Node::Atom { args, .. } => args
            .iter()
            .filter_map(|t| match t {
                Term::Var(v) => Some(v.clone()),
                Term::Const(_) => None,
            })
            .collect(),
        Node::Not(f) => f.free.to_vec(),
        Node::And(a, b) | Node::Or(a, b) => a.free.iter().chain(b.free.iter()).cloned().collect(),
        Node::Quant { quantifier, body } => body
            .free
            .iter()
            .filter(|v| **v != quantifier.var)
            .cloned()
            .collect(),
        Node::Exh(e) => e
            .prejacent
            .free
            .iter()
            .chain(e.alternatives.iter().flat_map(|a| a.free.iter()))
            .cloned()
            .collect(),
    };
    vars.sort();
    vars.dedup();
    vars.into()
}

fn collect_predicates(f: &Formula, seen: &mut HashSet<Formula>, preds: &mut Vec<Pred>) {
    if !seen.insert(f.clone()) {
        return;
    }
    match f.node() {
        Node::Const(_) => {}
        Node::Atom { pred, .. } => {
            if !preds.iter().any(|p| p.name() == pred.name()) {
                preds.push(pred.clone());
            }
        }
        Node::Not(a) => collect_predicates(a, seen, preds),
        Node::And(a, b) | Node::Or(a, b) => {
            collect_predicates(a, seen, preds);
            collect_predicates(b, seen, preds);
        }
        Node::Quant { body, .. } => collect_predicates(body, seen, preds),
        Node::Exh(e) => {
            collect_predicates(&e.prejacent, seen, preds);
            for alt in e.alternatives.iter() {
                collect_predicates(alt, seen, preds);
            }
        }
    }
}

#[derive(Default)]
struct Checker {
    preds: HashMap<Rc<str>, Pred>,
    free: HashMap<Rc<str>, Domain>,
    visited: HashSet<(Formula, Vec<(Rc<str>, Domain)>)>,
}

impl Checker {
    fn check(&mut self, f: &Formula, bound: &mut Vec<(Rc<str>, Domain)>) -> Result<()> {
        if !self.visited.insert((f.clone(), bound.clone())) {
            return Ok(());
        }
        match f.node() {
            Node::Const(_) => Ok(()),
            Node::Atom { pred, args } => {
                self.declare(pred)?;
                for (arg, &expected) in args.iter().zip(pred.domains()) {
                    let Term::Var(v) = arg else { continue };
                    let domain = match bound.iter().rev().find(|(name, _)| name == v) {
                        Some(&(_, d)) => d,
                        None => *self.free.entry(v.clone()).or_insert(expected),
                    };
                    if domain != expected {
                        return Err(Error::MalformedFormula(format!(
                            "`{}` ranges over {} but `{}` expects {}",
                            v,
                            domain,
                            pred.name(),
                            expected
                        )));
                    }
                }
                Ok(())
            }
            Node::Not(a) => self.check(a, bound),
            Node::And(a, b) | Node::Or(a, b) => {
                self.check(a, bound)?;
                self.check(b, bound)
            }
            Node::Quant { quantifier, body } => {
                bound.push((Rc::from(quantifier.var()), quantifier.domain()));
                let res = self.check(body, bound);
                bound.pop();
                res
            }
            Node::Exh(e) => {
                self.check(&e.prejacent, bound)?;
                for alt in e.alternatives.iter() {
                    self.check(alt, bound)?;
                }
                Ok(())
            }
        }
    }

    fn declare(&mut self, pred: &Pred) -> Result<()> {
        match self.preds.get(pred.name()) {
            Some(known) if !known.same_signature(pred) => Err(Error::MalformedFormula(format!(
                "predicate `{}` declared over {:?} and over {:?}",
                pred.name(),
                known.domains(),
                pred.domains()
            ))),
            Some(_) => Ok(()),
            None => {
                self.preds.insert(Rc::from(pred.name()), pred.clone());
                Ok(())
            }
        }
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node) || (self.hash == other.hash && self.node == other.node)
    }
}

impl Eq for Formula {}

impl Hash for Formula {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl fmt::Debug for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Formula({})", self)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self, DisplayMode::Plain))
    }
}

impl From<&Formula> for Formula {
    fn from(f: &Formula) -> Self {
        f.clone()
    }
}

impl Not for Formula {
    type Output = Formula;

    fn not(self) -> Formula {
        Formula::not(self)
    }
}

impl Not for &Formula {
    type Output = Formula;

    fn not(self) -> Formula {
        Formula::not(self)
    }
}

impl<R: Into<Formula>> BitAnd<R> for Formula {
    type Output = Formula;

    fn bitand(self, rhs: R) -> Formula {
        Formula::and(self, rhs)
    }
}

impl<R: Into<Formula>> BitAnd<R> for &Formula {
    type Output = Formula;

    fn bitand(self, rhs: R) -> Formula {
        Formula::and(self, rhs)
    }
}

impl<R: Into<Formula>> BitOr<R> for Formula {
    type Output = Formula;

    fn bitor(self, rhs: R) -> Formula {
        Formula::or(self, rhs)
    }
}

impl<R: Into<Formula>> BitOr<R> for &Formula {
    type Output = Formula;

    fn bitor(self, rhs: R) -> Formula {
        Formula::or(self, rhs)
    }
}
