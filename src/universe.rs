//! The space of worlds formulas are evaluated against.
//!
//! A [`Universe`] is built from a set of predicates. Each predicate contributes
//! one atomic proposition per tuple of its domains, and a world is an
//! assignment of truth values to all atomic propositions: with `n` atoms there
//! are `2^n` worlds, numbered so that atom `i` is true in world `w` iff bit `i`
//! of `w` is set.
//!
//! Truth tables are [`BitSet`]s over worlds. They are memoized per formula and
//! per assignment of its free variables, and the memo lives as long as the
//! universe (see [`Universe::clear_cache`]).
//!
//! ```
//! use exh_rs::formula::Quantifier;
//! use exh_rs::options::Options;
//! use exh_rs::pred::Pred;
//! use exh_rs::types::Domain;
//! use exh_rs::universe::Universe;
//!
//! let d = Domain::new(3);
//! let p = Pred::unary("p", "x", d);
//! let some = Quantifier::existential("x", d).scope(&p);
//! let all = Quantifier::universal("x", d).scope(&p);
//!
//! let u = Universe::new(&[&some, &all], &Options::default()).unwrap();
//! assert_eq!(u.num_worlds(), 8);
//! assert!(u.entails(&all, &some).unwrap());
//! assert!(!u.entails(&some, &all).unwrap());
//! ```

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::{debug, info, warn};
use num_bigint::BigUint;

use crate::bitset::BitSet;
use crate::cache::Cache;
use crate::error::{Error, Result};
use crate::eval::{Evaluator, MemoKey};
use crate::exh::Strengthening;
use crate::formula::Formula;
use crate::options::Options;
use crate::pred::Pred;
use crate::types::Individual;

/// Hard cap on the number of atoms, whatever `Options::max_atoms` says.
const MAX_ATOMS: usize = 32;

pub struct Universe {
    options: Options,
    /// Declared predicates, in order of first occurrence.
    preds: Vec<Pred>,
    /// Index of the first atom of each predicate.
    offsets: Vec<usize>,
    num_atoms: usize,
    num_worlds: usize,
    atom_tables: RefCell<HashMap<usize, Rc<BitSet>>>,
    memo: RefCell<Cache<MemoKey, Rc<BitSet>>>,
}

impl Universe {
    /// Builds the universe of every predicate occurring in `formulas`.
    ///
    /// Fails with [`Error::MalformedFormula`] if a predicate name is declared
    /// over different domains, and with [`Error::DomainTooLarge`] if the
    /// number of atoms exceeds `options.max_atoms`.
    pub fn new(formulas: &[&Formula], options: &Options) -> Result<Self> {
        let mut preds: Vec<Pred> = Vec::new();
        for f in formulas {
            for p in f.predicates() {
                match preds.iter().find(|q| q.name() == p.name()) {
                    Some(q) if !q.same_signature(&p) => {
                        return Err(Error::MalformedFormula(format!(
                            "predicate `{}` declared over {:?} and over {:?}",
                            p.name(),
                            q.domains(),
                            p.domains()
                        )));
                    }
                    Some(_) => {}
                    None => preds.push(p),
                }
            }
        }

        let mut offsets = Vec::with_capacity(preds.len());
        let mut num_atoms = 0;
        for p in &preds {
            offsets.push(num_atoms);
            num_atoms += p.num_atoms();
        }

        let limit = options.max_atoms.min(MAX_ATOMS);
        if num_atoms > limit {
            return Err(Error::DomainTooLarge {
                atoms: num_atoms,
                worlds: BigUint::from(1u32) << num_atoms,
                limit,
            });
        }
        if num_atoms + 2 >= limit {
            warn!(
                "universe of {} atoms is close to the limit of {}: truth tables hold {} worlds",
                num_atoms,
                limit,
                1usize << num_atoms
            );
        }
        info!(
            "universe: {} predicates, {} atoms, {} worlds",
            preds.len(),
            num_atoms,
            1usize << num_atoms
        );

        Ok(Self {
            options: options.clone(),
            preds,
            offsets,
            num_atoms,
            num_worlds: 1 << num_atoms,
            atom_tables: RefCell::new(HashMap::new()),
            memo: RefCell::new(Cache::new()),
        })
    }

    /// Builds the universe of the predicates occurring in `f`.
    pub fn from_formula(f: &Formula, options: &Options) -> Result<Self> {
        Self::new(&[f], options)
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn predicates(&self) -> &[Pred] {
        &self.preds
    }

    pub fn num_atoms(&self) -> usize {
        self.num_atoms
    }

    pub fn num_worlds(&self) -> usize {
        self.num_worlds
    }

    pub(crate) fn memo(&self) -> Ref<'_, Cache<MemoKey, Rc<BitSet>>> {
        self.memo.borrow()
    }

    pub(crate) fn memo_mut(&self) -> RefMut<'_, Cache<MemoKey, Rc<BitSet>>> {
        self.memo.borrow_mut()
    }

    /// Number of memoized truth tables reused.
    pub fn cache_hits(&self) -> usize {
        self.memo.borrow().hits()
    }

    pub fn cache_misses(&self) -> usize {
        self.memo.borrow().misses()
    }

    /// Drops every memoized truth table.
    pub fn clear_cache(&self) {
        self.memo.borrow_mut().clear();
        self.atom_tables.borrow_mut().clear();
    }

    fn lookup(&self, name: &str) -> Option<(&Pred, usize)> {
        self.preds
            .iter()
            .position(|p| p.name() == name)
            .map(|i| (&self.preds[i], self.offsets[i]))
    }

    /// Index of the atom `pred(args)`.
    pub(crate) fn atom_index(&self, pred: &Pred, args: &[Individual]) -> Result<usize> {
        let (known, offset) = self
            .lookup(pred.name())
            .ok_or_else(|| Error::UndeclaredPredicate(pred.name().to_string()))?;
        if !known.same_signature(pred) {
            return Err(Error::MalformedFormula(format!(
                "predicate `{}` declared over {:?} but used over {:?}",
                pred.name(),
                known.domains(),
                pred.domains()
            )));
        }
        if args.len() != known.arity() {
            return Err(Error::MalformedFormula(format!(
                "predicate `{}` has arity {} but was applied to {} arguments",
                pred.name(),
                known.arity(),
                args.len()
            )));
        }

        let mut index = 0;
        for (&ind, domain) in args.iter().zip(known.domains()) {
            if ind.index() >= domain.size() {
                return Err(Error::MalformedFormula(format!(
                    "{} is not in {} (argument of `{}`)",
                    ind,
                    domain,
                    pred.name()
                )));
            }
            index = index * domain.size() + ind.index();
        }
        Ok(offset + index)
    }

    /// Worlds where the atom with the given index is true.
    pub(crate) fn atom_table(&self, index: usize) -> Rc<BitSet> {
        if let Some(table) = self.atom_tables.borrow().get(&index) {
            return table.clone();
        }
        debug!("atom_table({})", index);
        let table = Rc::new(BitSet::from_indices(
            self.num_worlds,
            (0..self.num_worlds).filter(|w| (w >> index) & 1 == 1),
        ));
        self.atom_tables.borrow_mut().insert(index, table.clone());
        table
    }

    /// The predicate and arguments of the atom with the given index.
    fn decode_atom(&self, index: usize) -> Option<(&Pred, Vec<Individual>)> {
        let i = self.offsets.iter().rposition(|&o| o <= index)?;
        let pred = &self.preds[i];
        let mut rest = index - self.offsets[i];
        let mut args = vec![Individual::new(0); pred.arity()];
        for (slot, domain) in args.iter_mut().zip(pred.domains()).rev() {
            *slot = Individual::new(rest % domain.size());
            rest /= domain.size();
        }
        Some((pred, args))
    }

    fn closed(&self, f: &Formula) -> Result<()> {
        f.check()?;
        if !f.is_closed() {
            let names: Vec<&str> = f.free_variables().iter().map(|v| &**v).collect();
            return Err(Error::MalformedFormula(format!(
                "{} has free variables {:?}",
                f, names
            )));
        }
        Ok(())
    }

    /// The set of worlds where the closed formula `f` holds.
    pub fn truth_table(&self, f: &Formula) -> Result<BitSet> {
        self.closed(f)?;
        let table = Evaluator::new(self).table(f, &mut Vec::new())?;
        Ok((*table).clone())
    }

    /// Innocent exclusion and inclusion for a closed `Exh` formula.
    pub(crate) fn strengthening(&self, f: &Formula) -> Result<Strengthening> {
        self.closed(f)?;
        let e = f
            .as_exh()
            .ok_or_else(|| Error::MalformedFormula(format!("{} is not exhaustified", f)))?;
        Evaluator::new(self).strengthening(e, &mut Vec::new())
    }

    /// Truth value of `f` in the given world.
    ///
    /// # Panics
    ///
    /// Panics if `world >= num_worlds()`.
    pub fn evaluate(&self, f: &Formula, world: usize) -> Result<bool> {
        assert!(world < self.num_worlds, "World {} out of range 0..{}", world, self.num_worlds);
        Ok(self.truth_table(f)?.contains(world))
    }

    /// Whether `f` and `g` hold in exactly the same worlds.
    pub fn equivalent(&self, f: &Formula, g: &Formula) -> Result<bool> {
        Ok(self.truth_table(f)? == self.truth_table(g)?)
    }

    /// Whether every world satisfying `f` satisfies `g`.
    pub fn entails(&self, f: &Formula, g: &Formula) -> Result<bool> {
        Ok(self.truth_table(f)?.is_subset(&self.truth_table(g)?))
    }

    pub fn is_valid(&self, f: &Formula) -> Result<bool> {
        Ok(self.truth_table(f)?.is_full())
    }

    pub fn is_satisfiable(&self, f: &Formula) -> Result<bool> {
        Ok(!self.truth_table(f)?.is_empty())
    }

    /// A view of one world.
    ///
    /// # Panics
    ///
    /// Panics if `world >= num_worlds()`.
    pub fn model(&self, world: usize) -> Model<'_> {
        assert!(world < self.num_worlds, "World {} out of range 0..{}", world, self.num_worlds);
        Model { universe: self, world }
    }
}

impl fmt::Debug for Universe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let memo = self.memo.borrow();
        f.debug_struct("Universe")
            .field("predicates", &self.preds.iter().map(Pred::name).collect::<Vec<_>>())
            .field("atoms", &self.num_atoms)
            .field("worlds", &self.num_worlds)
            .field("memo", &memo.len())
            .field("hits", &memo.hits())
            .field("misses", &memo.misses())
            .finish()
    }
}

/// One world of a universe.
#[derive(Clone, Copy)]
pub struct Model<'u> {
    universe: &'u Universe,
    world: usize,
}

impl Model<'_> {
    pub fn world(&self) -> usize {
        self.world
    }

    /// Whether `pred(args)` is true in this world.
    pub fn holds(&self, pred: &Pred, args: &[Individual]) -> Result<bool> {
        let index = self.universe.atom_index(pred, args)?;
        Ok((self.world >> index) & 1 == 1)
    }

    /// The true atoms, rendered as `pred(a1, a2)`, in atom order.
    pub fn true_atoms(&self) -> Vec<String> {
        (0..self.universe.num_atoms)
            .filter(|&i| (self.world >> i) & 1 == 1)
            .filter_map(|i| self.universe.decode_atom(i))
            .map(|(pred, args)| {
                if args.is_empty() {
                    pred.name().to_string()
                } else {
                    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                    format!("{}({})", pred.name(), args.join(", "))
                }
            })
            .collect()
    }
}

impl fmt::Display for Model<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.true_atoms().join(", "))
    }
}

impl fmt::Debug for Model<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Model({}: {})", self.world, self)
    }
}
