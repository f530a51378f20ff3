//! Structural alternatives.
//!
//! The alternatives of a formula are computed bottom-up: every node offers a
//! list of replacements for itself (its scale-mates, its sub-domain variants,
//! its sub-constituents), and alternatives of a compound node combine the
//! alternatives of its children position by position. The formula itself is
//! always the first alternative.
//!
//! An exhaustification node `Exh_C(φ)` has the alternatives `Exh_C(ψ)` for
//! every `ψ` in `C`: the alternative set of an embedded `Exh` is fixed when the
//! node is built and is not recomputed. When
//! [`Substitution::prejacent_alternative_to_exh`] is set, the bare members of
//! `C` are alternatives too.

use std::collections::HashSet;

use log::debug;

use crate::formula::{Formula, Node, Quantifier};
use crate::options::Options;
use crate::scale::{Lexical, Scales};
use crate::types::Range;

/// What alternative generation substitutes.
#[derive(Debug, Clone)]
pub struct Substitution {
    pub scales: Scales,
    /// Sub-constituents of a connective are alternatives to it.
    pub sub: bool,
    pub prejacent_alternative_to_exh: bool,
}

impl Substitution {
    pub fn new(scales: Scales) -> Self {
        Substitution {
            scales,
            sub: true,
            prejacent_alternative_to_exh: false,
        }
    }

    pub fn with_sub(mut self, sub: bool) -> Self {
        self.sub = sub;
        self
    }

    pub fn with_prejacent_alternative_to_exh(mut self, value: bool) -> Self {
        self.prejacent_alternative_to_exh = value;
        self
    }
}

impl From<&Options> for Substitution {
    fn from(options: &Options) -> Self {
        Substitution {
            scales: options.scales.clone(),
            sub: options.sub,
            prejacent_alternative_to_exh: options.prejacent_alternative_to_exh,
        }
    }
}

/// Order-preserving set of formulas.
#[derive(Default)]
struct AltSet {
    seen: HashSet<Formula>,
    items: Vec<Formula>,
}

impl AltSet {
    fn push(&mut self, f: Formula) {
        if self.seen.insert(f.clone()) {
            self.items.push(f);
        }
    }

    fn extend(&mut self, fs: impl IntoIterator<Item = Formula>) {
        for f in fs {
            self.push(f);
        }
    }
}

/// Computes the alternatives of `f`, `f` first, without duplicates.
pub fn alt(f: &Formula, subst: &Substitution) -> Vec<Formula> {
    let alts = alt_aux(f, subst);
    debug!("alt({}) -> {} alternatives", f, alts.len());
    alts
}

fn alt_aux(f: &Formula, subst: &Substitution) -> Vec<Formula> {
    let mut out = AltSet::default();
    out.push(f.clone());

    match f.node() {
        Node::Const(_) | Node::Atom { .. } => {}
        Node::Not(a) => {
            out.extend(alt_aux(a, subst).into_iter().map(Formula::not));
        }
        Node::And(a, b) | Node::Or(a, b) => {
            let item = match f.node() {
                Node::And(..) => Lexical::And,
                _ => Lexical::Or,
            };
            let xs = alt_aux(a, subst);
            let ys = alt_aux(b, subst);
            for mate in subst.scales.mates(item) {
                for x in &xs {
                    for y in &ys {
                        out.push(match mate {
                            Lexical::And => Formula::and(x, y),
                            _ => Formula::or(x, y),
                        });
                    }
                }
            }
            if subst.sub {
                out.extend(xs);
                out.extend(ys);
            }
        }
        Node::Quant { quantifier, body } => {
            let qs = quantifier_alternatives(quantifier, &subst.scales);
            let bodies = alt_aux(body, subst);
            for q in &qs {
                for b in &bodies {
                    out.push(q.scope(b));
                }
            }
        }
        Node::Exh(e) => {
            for psi in e.alternatives.iter() {
                out.push(Formula::exh_node(psi.clone(), e.alternatives.clone(), e.ii, e.inclusion));
            }
            if subst.prejacent_alternative_to_exh {
                out.extend(e.alternatives.iter().cloned());
            }
        }
    }

    out.items
}

/// Replacements for a quantifier: scale-mates (same range) and, for an
/// existential with sub-domain alternatives, every non-empty sub-domain
/// (same force). The quantifier itself comes first.
pub fn quantifier_alternatives(q: &Quantifier, scales: &Scales) -> Vec<Quantifier> {
    let mut out = vec![q.clone()];

    if q.has_sub_domain_alternatives() {
        if scales.has_sub_domain() {
            for range in Range::subranges(q.domain()) {
                let alt = q.with_range(range);
                if !out.contains(&alt) {
                    out.push(alt);
                }
            }
        }
    } else {
        for mate in scales.mates(q.kind().into()) {
            if let Some(kind) = mate.as_quantifier() {
                let alt = q.with_kind(kind);
                if !out.contains(&alt) {
                    out.push(alt);
                }
            }
        }
    }

    out
}
