//! Fixed-size bit sets.
//!
//! Two things in this crate are sets of small integers: the truth table of a
//! formula (the set of worlds of a [`Universe`][crate::universe::Universe]
//! where it holds) and a selection of alternatives (the ones an exhaustification
//! kernel excludes or includes). Both use [`BitSet`].
//!
//! Unlike a growable set, a [`BitSet`] has a fixed `size`: complement is taken
//! relative to `0..size`, and bits beyond `size` are always clear.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

/// A set of indices in `0..size`, backed by a vector of u64 words.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitSet {
    /// Storage: each u64 holds 64 bits.
    words: Vec<u64>,
    /// Number of addressable bits.
    size: usize,
}

impl BitSet {
    /// Number of bits per word.
    const BITS_PER_WORD: usize = 64;

    fn num_words(size: usize) -> usize {
        size.div_ceil(Self::BITS_PER_WORD)
    }

    /// Creates an empty set over `0..size`.
    pub fn new(size: usize) -> Self {
        Self {
            words: vec![0; Self::num_words(size)],
            size,
        }
    }

    /// Creates the full set `0..size`.
    pub fn full(size: usize) -> Self {
        let mut bs = Self {
            words: vec![u64::MAX; Self::num_words(size)],
            size,
        };
        bs.trim();
        bs
    }

    /// Creates a set over `0..size` containing the given indices.
    pub fn from_indices(size: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut bs = Self::new(size);
        bs.extend(indices);
        bs
    }

    /// Clears the bits past `size` in the last word.
    fn trim(&mut self) {
        let tail = self.size % Self::BITS_PER_WORD;
        if tail != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << tail) - 1;
            }
        }
    }

    /// Gets the word index and bit position for a given bit index.
    #[inline]
    fn word_and_bit(index: usize) -> (usize, usize) {
        (index / Self::BITS_PER_WORD, index % Self::BITS_PER_WORD)
    }

    /// Returns the number of addressable bits.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the number of set bits.
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns true if no bits are set.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Returns true if every bit in `0..size` is set.
    pub fn is_full(&self) -> bool {
        self.len() == self.size
    }

    /// Returns true if the bit at the given index is set.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        if index >= self.size {
            return false;
        }
        let (word_idx, bit_idx) = Self::word_and_bit(index);
        (self.words[word_idx] >> bit_idx) & 1 == 1
    }

    /// Sets the bit at the given index. Returns true if the bit was not previously set.
    ///
    /// # Panics
    ///
    /// Panics if `index >= size`.
    #[inline]
    pub fn insert(&mut self, index: usize) -> bool {
        assert!(index < self.size, "Index {} out of range 0..{}", index, self.size);
        let (word_idx, bit_idx) = Self::word_and_bit(index);
        let mask = 1u64 << bit_idx;
        let was_clear = self.words[word_idx] & mask == 0;
        self.words[word_idx] |= mask;
        was_clear
    }

    /// Clears the bit at the given index. Returns true if the bit was previously set.
    #[inline]
    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.size {
            return false;
        }
        let (word_idx, bit_idx) = Self::word_and_bit(index);
        let mask = 1u64 << bit_idx;
        let was_set = self.words[word_idx] & mask != 0;
        self.words[word_idx] &= !mask;
        was_set
    }

    /// Extends the bit set by setting all bits from an iterator.
    pub fn extend(&mut self, iter: impl IntoIterator<Item = usize>) {
        for index in iter {
            self.insert(index);
        }
    }

    /// Returns true if every element of `self` is in `other`.
    pub fn is_subset(&self, other: &BitSet) -> bool {
        assert_eq!(self.size, other.size, "Bit sets of different sizes");
        self.words.iter().zip(&other.words).all(|(a, b)| a & !b == 0)
    }

    /// Returns true if the sets share an element.
    pub fn intersects(&self, other: &BitSet) -> bool {
        assert_eq!(self.size, other.size, "Bit sets of different sizes");
        self.words.iter().zip(&other.words).any(|(a, b)| a & b != 0)
    }

    /// Removes every element of `other` from `self`.
    pub fn difference_with(&mut self, other: &BitSet) {
        assert_eq!(self.size, other.size, "Bit sets of different sizes");
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a &= !b;
        }
    }

    /// Returns the smallest set index, if any.
    pub fn first(&self) -> Option<usize> {
        self.iter().next()
    }

    /// Returns an iterator over all set bit indices, in increasing order.
    pub fn iter(&self) -> BitSetIter<'_> {
        BitSetIter {
            bitset: self,
            word_idx: 0,
            current_word: self.words.first().copied().unwrap_or(0),
        }
    }
}

impl AsRef<BitSet> for BitSet {
    fn as_ref(&self) -> &BitSet {
        self
    }
}

impl BitAndAssign<&BitSet> for BitSet {
    fn bitand_assign(&mut self, rhs: &BitSet) {
        assert_eq!(self.size, rhs.size, "Bit sets of different sizes");
        for (a, b) in self.words.iter_mut().zip(&rhs.words) {
            *a &= b;
        }
    }
}

impl BitOrAssign<&BitSet> for BitSet {
    fn bitor_assign(&mut self, rhs: &BitSet) {
        assert_eq!(self.size, rhs.size, "Bit sets of different sizes");
        for (a, b) in self.words.iter_mut().zip(&rhs.words) {
            *a |= b;
        }
    }
}

impl BitAnd for &BitSet {
    type Output = BitSet;

    fn bitand(self, rhs: Self) -> BitSet {
        let mut res = self.clone();
        res &= rhs;
        res
    }
}

impl BitOr for &BitSet {
    type Output = BitSet;

    fn bitor(self, rhs: Self) -> BitSet {
        let mut res = self.clone();
        res |= rhs;
        res
    }
}

impl Not for &BitSet {
    type Output = BitSet;

    fn not(self) -> BitSet {
        let mut res = BitSet {
            words: self.words.iter().map(|w| !w).collect(),
            size: self.size,
        };
        res.trim();
        res
    }
}

impl Not for BitSet {
    type Output = BitSet;

    fn not(self) -> BitSet {
        !&self
    }
}

impl fmt::Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitSet({}/{})", self.len(), self.size)?;
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Iterator over set bits in a BitSet.
pub struct BitSetIter<'a> {
    bitset: &'a BitSet,
    word_idx: usize,
    current_word: u64,
}

impl Iterator for BitSetIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let bit_idx = self.current_word.trailing_zeros() as usize;
                self.current_word &= self.current_word - 1; // Clear lowest set bit
                return Some(self.word_idx * BitSet::BITS_PER_WORD + bit_idx);
            }

            self.word_idx += 1;
            if self.word_idx >= self.bitset.words.len() {
                return None;
            }
            self.current_word = self.bitset.words[self.word_idx];
        }
    }
}
