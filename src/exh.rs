//! Exhaustification.
//!
//! [`exhaustify`] builds an `Exh` node: it fixes the alternative set of a
//! prejacent (generated, or supplied by the caller) and stores it in the node.
//! The meaning of the node is computed later, world by world, by a
//! [`Universe`][crate::universe::Universe] using the kernels below.
//!
//! Both kernels work on truth tables. Innocent exclusion looks at the worlds
//! where the prejacent holds, collects for each of them the set of
//! alternatives that are false there, and keeps the alternatives that belong
//! to every maximal such set. Innocent inclusion does the same for the
//! alternatives that can be consistently asserted true, once the excludable
//! ones are negated.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use log::debug;

use crate::alternatives::{alt, Substitution};
use crate::bitset::BitSet;
use crate::error::{Error, Result};
use crate::formula::{Formula, Node};
use crate::options::{Inclusion, Options};
use crate::scale::Scales;
use crate::types::Domain;

/// Per-call overrides for [`exhaustify`].
///
/// Unset fields fall back to the [`Options`] of the call.
#[derive(Debug, Clone, Default)]
pub struct ExhParams {
    pub scales: Option<Scales>,
    pub ii: Option<bool>,
    pub inclusion: Option<Inclusion>,
    pub sub: Option<bool>,
    /// Explicit alternative set, replacing generation. The prejacent is
    /// always an alternative of itself and is added in front if missing.
    pub alts: Option<Vec<Formula>>,
    /// Appended to the (generated or explicit) alternative set.
    pub extra_alts: Vec<Formula>,
}

impl ExhParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scales(mut self, scales: Scales) -> Self {
        self.scales = Some(scales);
        self
    }

    pub fn with_ii(mut self, ii: bool) -> Self {
        self.ii = Some(ii);
        self
    }

    pub fn with_inclusion(mut self, inclusion: Inclusion) -> Self {
        self.inclusion = Some(inclusion);
        self
    }

    pub fn with_sub(mut self, sub: bool) -> Self {
        self.sub = Some(sub);
        self
    }

    pub fn with_alts(mut self, alts: impl IntoIterator<Item = Formula>) -> Self {
        self.alts = Some(alts.into_iter().collect());
        self
    }

    pub fn with_extra_alts(mut self, alts: impl IntoIterator<Item = Formula>) -> Self {
        self.extra_alts.extend(alts);
        self
    }
}

/// Wraps `prejacent` in an exhaustification operator.
///
/// Without explicit alternatives, the alternative set is generated by
/// [`alt`] from the scales and `sub` policy in effect. Explicit and extra
/// alternatives must fit the prejacent: same predicate signatures, a variable
/// name bound over a single domain, and no free variable the prejacent does
/// not have. Otherwise this fails with [`Error::InconsistentAlternativeSet`].
///
/// ```
/// use exh_rs::exh::{exhaustify, ExhParams};
/// use exh_rs::options::Options;
/// use exh_rs::pred::Pred;
/// use exh_rs::scale::Scales;
///
/// let a = Pred::prop("a").atom();
/// let b = Pred::prop("b").atom();
/// let options = Options::default().with_scales(Scales::none());
/// let e = exhaustify(&(a | b), &ExhParams::new(), &options).unwrap();
/// assert_eq!(e.as_exh().unwrap().alternatives.len(), 3);
/// ```
pub fn exhaustify(prejacent: &Formula, params: &ExhParams, options: &Options) -> Result<Formula> {
    prejacent.check()?;

    let subst = Substitution {
        scales: params.scales.clone().unwrap_or_else(|| options.scales.clone()),
        sub: params.sub.unwrap_or(options.sub),
        prejacent_alternative_to_exh: options.prejacent_alternative_to_exh,
    };
    let ii = params.ii.unwrap_or(options.ii);
    let inclusion = params.inclusion.unwrap_or(options.inclusion);

    let mut alternatives = match &params.alts {
        Some(alts) => {
            check_alternatives(prejacent, alts)?;
            let mut out = Vec::with_capacity(alts.len() + 1);
            out.push(prejacent.clone());
            for a in alts {
                if !out.contains(a) {
                    out.push(a.clone());
                }
            }
            out
        }
        None => alt(prejacent, &subst),
    };

    check_alternatives(prejacent, &params.extra_alts)?;
    for extra in &params.extra_alts {
        if !alternatives.contains(extra) {
            alternatives.push(extra.clone());
        }
    }

    debug!(
        "exhaustify({}): {} alternatives, ii={}",
        prejacent,
        alternatives.len(),
        ii
    );
    Ok(Formula::exh_node(prejacent.clone(), Rc::from(alternatives), ii, inclusion))
}

impl Formula {
    /// Exhaustifies with the defaults of `options`.
    pub fn exh(&self, options: &Options) -> Result<Formula> {
        exhaustify(self, &ExhParams::default(), options)
    }
}

fn check_alternatives(prejacent: &Formula, alts: &[Formula]) -> Result<()> {
    let mut bound = HashMap::new();
    collect_bindings(prejacent, &mut bound, &mut HashSet::new());

    for a in alts {
        Formula::and(prejacent, a)
            .check()
            .map_err(|e| Error::InconsistentAlternativeSet(format!("{}: {}", a, e)))?;

        if let Some(v) = a
            .free_variables()
            .iter()
            .find(|v| !prejacent.free_variables().contains(*v))
        {
            return Err(Error::InconsistentAlternativeSet(format!(
                "`{}` is free in {} but not in the prejacent",
                v, a
            )));
        }

        let mut theirs = HashMap::new();
        collect_bindings(a, &mut theirs, &mut HashSet::new());
        for (v, domain) in &theirs {
            if let Some(ours) = bound.get(v) {
                if ours != domain {
                    return Err(Error::InconsistentAlternativeSet(format!(
                        "`{}` ranges over {} in the prejacent but over {} in {}",
                        v, ours, domain, a
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Domain of every bound variable, first binding wins.
fn collect_bindings(f: &Formula, out: &mut HashMap<Rc<str>, Domain>, seen: &mut HashSet<Formula>) {
    if !seen.insert(f.clone()) {
        return;
    }
    match f.node() {
        Node::Const(_) | Node::Atom { .. } => {}
        Node::Not(a) => collect_bindings(a, out, seen),
        Node::And(a, b) | Node::Or(a, b) => {
            collect_bindings(a, out, seen);
            collect_bindings(b, out, seen);
        }
        Node::Quant { quantifier, body } => {
            out.entry(quantifier.var_name().clone()).or_insert(quantifier.domain());
            collect_bindings(body, out, seen);
        }
        Node::Exh(e) => {
            collect_bindings(&e.prejacent, out, seen);
            for a in e.alternatives.iter() {
                collect_bindings(a, out, seen);
            }
        }
    }
}

/// Outcome of exhaustifying a prejacent against its alternatives.
///
/// `excluded` and `included` are sets of alternative indices; `meaning` is a
/// set of worlds.
#[derive(Debug, Clone)]
pub struct Strengthening {
    pub excluded: BitSet,
    pub included: BitSet,
    /// The included alternatives that strengthen the meaning, combined
    /// according to `inclusion`.
    pub asserted: BitSet,
    pub inclusion: Inclusion,
    pub maximal_excludable: Vec<BitSet>,
    pub maximal_includable: Vec<BitSet>,
    pub meaning: BitSet,
}

/// Computes innocent exclusion and, given an inclusion policy, innocent
/// inclusion.
///
/// The meaning is the prejacent minus every excluded alternative. Under
/// [`Inclusion::Conjunctive`] it is then intersected with every included
/// alternative. Under [`Inclusion::Disjunctive`] it is intersected with the
/// union of the included alternatives it does not already entail, if any.
pub fn strengthen<A: AsRef<BitSet>>(
    prejacent: &BitSet,
    alternatives: &[A],
    inclusion: Option<Inclusion>,
) -> Strengthening {
    let n = alternatives.len();

    let (maximal_excludable, excluded) = innocently_excludable(prejacent, alternatives);
    let mut meaning = prejacent.clone();
    for i in excluded.iter() {
        meaning.difference_with(alternatives[i].as_ref());
    }

    let (maximal_includable, included, asserted) = match inclusion {
        Some(policy) => {
            let mut candidates = BitSet::full(n);
            candidates.difference_with(&excluded);
            let maxs = maximal_sets(compatible_sets(&meaning, alternatives, &candidates, true));
            let included = intersect_all(&maxs, n);
            let asserted = match policy {
                Inclusion::Conjunctive => {
                    for i in included.iter() {
                        meaning &= alternatives[i].as_ref();
                    }
                    included.clone()
                }
                Inclusion::Disjunctive => {
                    let informative = BitSet::from_indices(
                        n,
                        included.iter().filter(|&i| !meaning.is_subset(alternatives[i].as_ref())),
                    );
                    if !informative.is_empty() {
                        let mut union = BitSet::new(meaning.size());
                        for i in informative.iter() {
                            union |= alternatives[i].as_ref();
                        }
                        meaning &= &union;
                    }
                    informative
                }
            };
            (maxs, included, asserted)
        }
        None => (Vec::new(), BitSet::new(n), BitSet::new(n)),
    };

    Strengthening {
        excluded,
        included,
        asserted,
        inclusion: inclusion.unwrap_or_default(),
        maximal_excludable,
        maximal_includable,
        meaning,
    }
}

/// Maximal sets of alternatives that can be negated together with the
/// prejacent, and their intersection.
///
/// If the prejacent holds nowhere there are no such sets, and nothing is
/// excluded.
pub fn innocently_excludable<A: AsRef<BitSet>>(prejacent: &BitSet, alternatives: &[A]) -> (Vec<BitSet>, BitSet) {
    let n = alternatives.len();
    let maxs = maximal_sets(compatible_sets(prejacent, alternatives, &BitSet::full(n), false));
    let excluded = intersect_all(&maxs, n);
    (maxs, excluded)
}

/// For every world in `worlds`, the candidates whose truth value there is
/// `polarity`.
fn compatible_sets<A: AsRef<BitSet>>(
    worlds: &BitSet,
    alternatives: &[A],
    candidates: &BitSet,
    polarity: bool,
) -> HashSet<BitSet> {
    let n = alternatives.len();
    worlds
        .iter()
        .map(|w| {
            BitSet::from_indices(
                n,
                candidates
                    .iter()
                    .filter(|&i| alternatives[i].as_ref().contains(w) == polarity),
            )
        })
        .collect()
}

/// Keeps the sets not strictly contained in another, largest first.
fn maximal_sets(candidates: HashSet<BitSet>) -> Vec<BitSet> {
    let mut candidates: Vec<BitSet> = candidates.into_iter().collect();
    candidates.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.iter().cmp(b.iter())));

    let mut maximal: Vec<BitSet> = Vec::new();
    for c in candidates {
        if !maximal.iter().any(|m| c.is_subset(m)) {
            maximal.push(c);
        }
    }
    maximal
}

fn intersect_all(sets: &[BitSet], n: usize) -> BitSet {
    let mut iter = sets.iter();
    match iter.next() {
        None => BitSet::new(n),
        Some(first) => iter.fold(first.clone(), |acc, s| &acc & s),
    }
}
