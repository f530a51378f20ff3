//! Truth-table evaluation.
//!
//! A formula is evaluated to the set of worlds of a [`Universe`] where it
//! holds, under an assignment of individuals to its free variables. Results
//! are memoized in the universe, keyed by the formula and the values of its
//! free variables only, so a subformula not mentioning a bound variable is
//! computed once per quantifier rather than once per individual.

use std::rc::Rc;
use std::time::Instant;

use log::debug;

use crate::bitset::BitSet;
use crate::error::{Error, Result};
use crate::exh::{strengthen, Strengthening};
use crate::formula::{ExhNode, Formula, Node, QuantifierKind};
use crate::pred::Term;
use crate::types::Individual;
use crate::universe::Universe;

/// Values of the variables in scope, innermost binding last.
pub(crate) type Env = Vec<(Rc<str>, Individual)>;

pub(crate) type MemoKey = (Formula, Vec<Individual>);

pub(crate) struct Evaluator<'u> {
    universe: &'u Universe,
    started: Instant,
}

fn lookup(env: &Env, var: &str) -> Result<Individual> {
    env.iter()
        .rev()
        .find(|(name, _)| &**name == var)
        .map(|&(_, ind)| ind)
        .ok_or_else(|| Error::MalformedFormula(format!("unbound variable `{}`", var)))
}

impl<'u> Evaluator<'u> {
    pub(crate) fn new(universe: &'u Universe) -> Self {
        Self {
            universe,
            started: Instant::now(),
        }
    }

    fn check_deadline(&self) -> Result<()> {
        match self.universe.options().timeout {
            Some(timeout) if self.started.elapsed() > timeout => Err(Error::Timeout(timeout)),
            _ => Ok(()),
        }
    }

    /// The set of worlds where `f` holds under `env`.
    pub(crate) fn table(&self, f: &Formula, env: &mut Env) -> Result<Rc<BitSet>> {
        let assignment = f
            .free_variables()
            .iter()
            .map(|v| lookup(env, v))
            .collect::<Result<Vec<_>>>()?;
        let key = (f.clone(), assignment);

        if let Some(table) = self.universe.memo().get(&key) {
            return Ok(table);
        }

        self.check_deadline()?;
        let table = Rc::new(self.compute(f, env)?);
        self.universe.memo_mut().insert(key, table.clone());
        Ok(table)
    }

    fn compute(&self, f: &Formula, env: &mut Env) -> Result<BitSet> {
        let worlds = self.universe.num_worlds();

        match f.node() {
            Node::Const(true) => Ok(BitSet::full(worlds)),
            Node::Const(false) => Ok(BitSet::new(worlds)),
            Node::Atom { pred, args } => {
                let args = args
                    .iter()
                    .map(|t| match t {
                        Term::Var(v) => lookup(env, v),
                        Term::Const(ind) => Ok(*ind),
                    })
                    .collect::<Result<Vec<_>>>()?;
                let index = self.universe.atom_index(pred, &args)?;
                Ok((*self.universe.atom_table(index)).clone())
            }
            Node::Not(a) => Ok(!&*self.table(a, env)?),
            Node::And(a, b) => {
                let lhs = self.table(a, env)?;
                if lhs.is_empty() {
                    return Ok(BitSet::new(worlds));
                }
                Ok(&*lhs & &*self.table(b, env)?)
            }
            Node::Or(a, b) => {
                let lhs = self.table(a, env)?;
                if lhs.is_full() {
                    return Ok(BitSet::full(worlds));
                }
                Ok(&*lhs | &*self.table(b, env)?)
            }
            Node::Quant { quantifier, body } => {
                let var = quantifier.var_name();
                let scoped = |ind: Individual, env: &mut Env| -> Result<Rc<BitSet>> {
                    env.push((var.clone(), ind));
                    let res = self.table(body, env);
                    env.pop();
                    res
                };

                match quantifier.kind() {
                    QuantifierKind::Universal => {
                        let mut acc = BitSet::full(worlds);
                        for ind in quantifier.range().members() {
                            acc &= &*scoped(ind, env)?;
                            if acc.is_empty() {
                                break;
                            }
                        }
                        Ok(acc)
                    }
                    QuantifierKind::Existential => {
                        let mut acc = BitSet::new(worlds);
                        for ind in quantifier.range().members() {
                            acc |= &*scoped(ind, env)?;
                            if acc.is_full() {
                                break;
                            }
                        }
                        Ok(acc)
                    }
                    QuantifierKind::Most => {
                        // at_least[j]: worlds where at least j individuals seen so far satisfy the body.
                        let need = quantifier.range().len() / 2 + 1;
                        let mut at_least = vec![BitSet::full(worlds)];
                        at_least.extend((0..need).map(|_| BitSet::new(worlds)));
                        for ind in quantifier.range().members() {
                            let t = scoped(ind, env)?;
                            for j in (1..=need).rev() {
                                let step = &at_least[j - 1] & &*t;
                                at_least[j] |= &step;
                            }
                        }
                        Ok(at_least.swap_remove(need))
                    }
                }
            }
            Node::Exh(e) => Ok(self.strengthening(e, env)?.meaning),
        }
    }

    /// Innocent exclusion and inclusion for an `Exh` node under `env`.
    pub(crate) fn strengthening(&self, e: &ExhNode, env: &mut Env) -> Result<Strengthening> {
        let prejacent = self.table(&e.prejacent, env)?;
        let alternatives = e
            .alternatives
            .iter()
            .map(|a| self.table(a, env))
            .collect::<Result<Vec<_>>>()?;

        let s = strengthen(&prejacent, &alternatives, e.ii.then_some(e.inclusion));
        debug!(
            "exh({}): {} alternatives, {} maximal excludable sets, excluded {:?}, included {:?}",
            e.prejacent,
            alternatives.len(),
            s.maximal_excludable.len(),
            s.excluded,
            s.included
        );
        Ok(s)
    }
}
