//! Inspecting what an exhaustification does.
//!
//! [`Universe::diagnose`] reports, for a closed `Exh` formula, its alternatives,
//! the maximal sets of jointly excludable (and, with inclusion, includable)
//! alternatives, and the alternatives that end up negated or asserted. The
//! strengthened meaning can be rebuilt as an ordinary formula with
//! [`Diagnosis::reconstruct`].

use std::fmt;
use std::fmt::Write;

use log::info;

use crate::bitset::BitSet;
use crate::error::{Error, Result};
use crate::formula::Formula;
use crate::options::{DisplayMode, Inclusion};
use crate::universe::Universe;

/// What an `Exh` node excludes and includes.
#[derive(Debug, Clone)]
pub struct Diagnosis {
    pub prejacent: Formula,
    pub alternatives: Vec<Formula>,
    pub ii: bool,
    /// Indices into `alternatives`.
    pub excluded: Vec<usize>,
    pub included: Vec<usize>,
    /// The included alternatives the meaning depends on.
    pub asserted: Vec<usize>,
    pub inclusion: Inclusion,
    pub maximal_excludable: Vec<Vec<usize>>,
    pub maximal_includable: Vec<Vec<usize>>,
}

fn indices(set: &BitSet) -> Vec<usize> {
    set.iter().collect()
}

impl Diagnosis {
    pub fn excluded_alternatives(&self) -> impl Iterator<Item = &Formula> + '_ {
        self.excluded.iter().map(|&i| &self.alternatives[i])
    }

    pub fn included_alternatives(&self) -> impl Iterator<Item = &Formula> + '_ {
        self.included.iter().map(|&i| &self.alternatives[i])
    }

    /// The strengthened meaning as a plain formula: the prejacent, the
    /// negation of every excluded alternative, and the asserted alternatives
    /// (each of them, or at least one, depending on the inclusion policy).
    pub fn reconstruct(&self) -> Formula {
        let negated = self.excluded_alternatives().map(Formula::not);
        let asserted = self.asserted.iter().map(|&i| self.alternatives[i].clone());
        let asserted: Vec<Formula> = match self.inclusion {
            Inclusion::Conjunctive => asserted.collect(),
            Inclusion::Disjunctive if self.asserted.is_empty() => Vec::new(),
            Inclusion::Disjunctive => vec![Formula::or_many(asserted)],
        };
        Formula::and_many(std::iter::once(self.prejacent.clone()).chain(negated).chain(asserted))
    }

    pub fn render(&self, mode: DisplayMode) -> String {
        let mut out = String::new();
        let _ = self.write(&mut out, mode);
        out
    }

    fn write(&self, out: &mut String, mode: DisplayMode) -> fmt::Result {
        let show = |f: &Formula| f.render(mode);
        let show_set = |set: &[usize]| {
            let items: Vec<String> = set.iter().map(|i| i.to_string()).collect();
            format!("{{{}}}", items.join(", "))
        };

        writeln!(out, "Prejacent: {}", show(&self.prejacent))?;
        writeln!(out, "Alternatives ({}):", self.alternatives.len())?;
        for (i, alt) in self.alternatives.iter().enumerate() {
            writeln!(out, "  [{}] {}", i, show(alt))?;
        }

        writeln!(out, "Maximal sets of excludable alternatives ({}):", self.maximal_excludable.len())?;
        for set in &self.maximal_excludable {
            writeln!(out, "  {}", show_set(set.as_slice()))?;
        }
        writeln!(out, "Innocently excludable:")?;
        for &i in &self.excluded {
            writeln!(out, "  [{}] {}", i, show(&self.alternatives[i]))?;
        }

        if self.ii {
            writeln!(out, "Maximal sets of includable alternatives ({}):", self.maximal_includable.len())?;
            for set in &self.maximal_includable {
                writeln!(out, "  {}", show_set(set.as_slice()))?;
            }
            writeln!(out, "Innocently includable:")?;
            for &i in &self.included {
                writeln!(out, "  [{}] {}", i, show(&self.alternatives[i]))?;
            }
            if self.inclusion == Inclusion::Disjunctive {
                writeln!(out, "At least one of: {}", show_set(self.asserted.as_slice()))?;
            }
        }

        writeln!(out, "Strengthened meaning: {}", show(&self.reconstruct()))
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DisplayMode::Plain))
    }
}

impl Universe {
    /// Diagnoses the closed `Exh` formula `f`.
    ///
    /// The rendered diagnosis (in the universe's display mode) is passed to
    /// `sink` line by line. Fails with [`Error::MalformedFormula`] if `f` is
    /// not an `Exh` node or is not closed.
    pub fn diagnose(&self, f: &Formula, mut sink: impl FnMut(&str)) -> Result<Diagnosis> {
        let e = f
            .as_exh()
            .ok_or_else(|| Error::MalformedFormula(format!("{} is not exhaustified", f)))?;
        let s = self.strengthening(f)?;

        let diagnosis = Diagnosis {
            prejacent: e.prejacent.clone(),
            alternatives: e.alternatives.to_vec(),
            ii: e.ii,
            excluded: indices(&s.excluded),
            included: indices(&s.included),
            asserted: indices(&s.asserted),
            inclusion: s.inclusion,
            maximal_excludable: s.maximal_excludable.iter().map(indices).collect(),
            maximal_includable: s.maximal_includable.iter().map(indices).collect(),
        };
        info!(
            "diagnose({}): {} excluded, {} included",
            f,
            diagnosis.excluded.len(),
            diagnosis.included.len()
        );

        for line in diagnosis.render(self.options().display).lines() {
            sink(line);
        }
        Ok(diagnosis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::exh::{exhaustify, ExhParams};
    use crate::options::Options;
    use crate::pred::Pred;
    use crate::scale::{Lexical, Scales};

    #[test]
    fn test_diagnose_disjunction() {
        let a = Pred::prop("a").atom();
        let b = Pred::prop("b").atom();
        let options = Options::default().with_scales(Scales::simple([[Lexical::Or, Lexical::And]]));
        let e = exhaustify(&(a.clone() | &b), &ExhParams::new(), &options).unwrap();
        let u = Universe::from_formula(&e, &options).unwrap();

        let mut lines = Vec::new();
        let d = u.diagnose(&e, |line| lines.push(line.to_string())).unwrap();
        for line in &lines {
            println!("{}", line);
        }

        assert_eq!(d.excluded_alternatives().cloned().collect::<Vec<_>>(), vec![a.clone() & &b]);
        assert!(d.included.is_empty());
        assert_eq!(lines[0], "Prejacent: a ∨ b");
        assert!(u.equivalent(&d.reconstruct(), &e).unwrap());
    }

    #[test]
    fn test_diagnose_with_inclusion() {
        let a = Pred::prop("a").atom();
        let b = Pred::prop("b").atom();
        let options = Options::default().with_scales(Scales::none()).with_ii(true);
        let e = exhaustify(&(a.clone() | &b), &ExhParams::new(), &options).unwrap();
        let u = Universe::from_formula(&e, &options).unwrap();

        let d = u.diagnose(&e, |_| {}).unwrap();
        println!("{}", d);
        assert!(d.excluded.is_empty());
        assert_eq!(d.included, vec![0, 1, 2]);
        assert!(u.equivalent(&d.reconstruct(), &(a & b)).unwrap());
        assert!(d.to_string().contains("Innocently includable:"));
    }

    #[test]
    fn test_diagnose_disjunctive_inclusion() {
        let a = Pred::prop("a").atom();
        let b = Pred::prop("b").atom();
        let options = Options::default()
            .with_scales(Scales::none())
            .with_ii(true)
            .with_inclusion(Inclusion::Disjunctive);
        let e = exhaustify(&(a.clone() | &b), &ExhParams::new(), &options).unwrap();
        let u = Universe::from_formula(&e, &options).unwrap();

        let d = u.diagnose(&e, |_| {}).unwrap();
        println!("{}", d);
        assert_eq!(d.included, vec![0, 1, 2]);
        assert_eq!(d.asserted, vec![1, 2]);
        assert!(u.equivalent(&e, &(a | b)).unwrap());
        assert!(u.equivalent(&d.reconstruct(), &e).unwrap());
        assert!(d.to_string().contains("At least one of: {1, 2}"));
    }

    #[test]
    fn test_diagnose_requires_exh() {
        let a = Pred::prop("a").atom();
        let u = Universe::from_formula(&a, &Options::default()).unwrap();
        assert!(matches!(u.diagnose(&a, |_| {}), Err(Error::MalformedFormula(_))));
    }
}
