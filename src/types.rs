//! Type-safe wrappers for domains of quantification.
//!
//! A [`Domain`] is a finite, ordered set of [`Individual`]s; a [`Range`] is
//! the subset of a domain a quantifier actually ranges over. Sub-domain
//! alternatives are quantifiers whose range is a proper subset of their domain.
use std::fmt;

/// Largest supported domain; ranges are stored as a `u64` membership mask.
pub const MAX_DOMAIN_SIZE: usize = 64;

/// A finite domain of quantification.
///
/// Domains are identified by size only: two domains of the same size are
/// interchangeable, and individuals are numbered `0..size`.
///
/// # Invariants
///
/// - `1 <= size <= 64`
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Domain(usize);

impl Domain {
    /// Creates a domain with `size` individuals.
    ///
    /// # Panics
    ///
    /// Panics if `size == 0` or `size > 64`.
    pub fn new(size: usize) -> Self {
        assert!(
            (1..=MAX_DOMAIN_SIZE).contains(&size),
            "Domain size should be in the range 1..=64"
        );
        Domain(size)
    }

    /// Returns the number of individuals.
    pub fn size(self) -> usize {
        self.0
    }

    /// Iterates over the individuals of the domain, in order.
    pub fn individuals(self) -> impl Iterator<Item = Individual> {
        (0..self.0).map(Individual)
    }

    /// The range covering the whole domain.
    pub fn full_range(self) -> Range {
        Range::full(self)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.0)
    }
}

/// An element of a domain (0-indexed).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Individual(usize);

impl Individual {
    pub fn new(index: usize) -> Self {
        Individual(index)
    }

    /// Returns the raw index as a `usize`.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0 + 1)
    }
}

impl From<Individual> for usize {
    fn from(ind: Individual) -> Self {
        ind.0
    }
}

/// A subset of a domain: the individuals a quantifier ranges over.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Range {
    domain: Domain,
    members: u64,
}

impl Range {
    fn mask(domain: Domain) -> u64 {
        if domain.size() == 64 {
            u64::MAX
        } else {
            (1u64 << domain.size()) - 1
        }
    }

    /// The range covering all of `domain`.
    pub fn full(domain: Domain) -> Self {
        Range {
            domain,
            members: Self::mask(domain),
        }
    }

    /// A range given by a membership mask (bit `i` set iff individual `i` is in range).
    ///
    /// # Panics
    ///
    /// Panics if the mask mentions individuals outside of `domain`.
    pub fn from_mask(domain: Domain, members: u64) -> Self {
        assert_eq!(
            members & !Self::mask(domain),
            0,
            "Range mentions individuals outside of {}",
            domain
        );
        Range { domain, members }
    }

    /// A range containing the given individuals.
    pub fn from_individuals(domain: Domain, individuals: impl IntoIterator<Item = Individual>) -> Self {
        let members = individuals.into_iter().fold(0u64, |acc, i| {
            assert!(i.index() < domain.size(), "{} is not in {}", i, domain);
            acc | (1 << i.index())
        });
        Range { domain, members }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn mask_bits(&self) -> u64 {
        self.members
    }

    /// Number of individuals in range.
    pub fn len(&self) -> usize {
        self.members.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.members == 0
    }

    /// Checks whether the range covers the whole domain.
    pub fn is_full(&self) -> bool {
        self.members == Self::mask(self.domain)
    }

    pub fn contains(&self, individual: Individual) -> bool {
        individual.index() < self.domain.size() && (self.members >> individual.index()) & 1 == 1
    }

    /// Iterates over the individuals in range, in order.
    pub fn members(&self) -> impl Iterator<Item = Individual> + '_ {
        self.domain.individuals().filter(|&i| self.contains(i))
    }

    /// Every non-empty subset of the domain, as ranges.
    ///
    /// There are `2^size - 1` of them; the full range comes last.
    pub fn subranges(domain: Domain) -> impl Iterator<Item = Range> {
        let full = Self::mask(domain);
        (1..=full).map(move |members| Range { domain, members })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_creation() {
        let d = Domain::new(3);
        assert_eq!(d.size(), 3);
        let inds: Vec<_> = d.individuals().map(Individual::index).collect();
        assert_eq!(inds, vec![0, 1, 2]);
    }

    #[test]
    #[should_panic(expected = "Domain size should be in the range 1..=64")]
    fn test_empty_domain_panics() {
        Domain::new(0);
    }

    #[test]
    fn test_full_range() {
        let r = Domain::new(4).full_range();
        assert!(r.is_full());
        assert_eq!(r.len(), 4);
        assert!(r.contains(Individual::new(3)));
        assert!(!r.contains(Individual::new(4)));
    }

    #[test]
    fn test_subranges() {
        let d = Domain::new(3);
        let subs: Vec<_> = Range::subranges(d).collect();
        assert_eq!(subs.len(), 7);
        assert!(subs.iter().all(|r| !r.is_empty()));
        assert!(subs.last().unwrap().is_full());
        assert_eq!(subs.iter().filter(|r| r.is_full()).count(), 1);
    }

    #[test]
    fn test_range_members() {
        let d = Domain::new(5);
        let r = Range::from_individuals(d, [Individual::new(1), Individual::new(3)]);
        let members: Vec<_> = r.members().map(|i| i.to_string()).collect();
        assert_eq!(members, vec!["a2", "a4"]);
        assert_eq!(r, Range::from_mask(d, 0b01010));
    }

    #[test]
    fn test_max_domain() {
        let d = Domain::new(64);
        assert!(d.full_range().is_full());
        assert_eq!(d.full_range().len(), 64);
    }
}
