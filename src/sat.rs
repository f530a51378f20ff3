use num_bigint::BigUint;

use crate::error::Result;
use crate::formula::Formula;
use crate::universe::{Model, Universe};

impl Universe {
    /// Returns one world where `f` holds, if any exists.
    ///
    /// The smallest such world is returned, i.e. the one with the fewest
    /// low-numbered atoms set.
    pub fn witness(&self, f: &Formula) -> Result<Option<Model<'_>>> {
        Ok(self.truth_table(f)?.first().map(|w| self.model(w)))
    }

    /// Returns one world where `f` and `g` differ, if any exists.
    pub fn counterexample(&self, f: &Formula, g: &Formula) -> Result<Option<Model<'_>>> {
        let lhs = self.truth_table(f)?;
        let rhs = self.truth_table(g)?;
        let mut diff = &lhs | &rhs;
        diff.difference_with(&(&lhs & &rhs));
        Ok(diff.first().map(|w| self.model(w)))
    }

    /// Number of worlds where `f` holds.
    pub fn count_models(&self, f: &Formula) -> Result<BigUint> {
        Ok(BigUint::from(self.truth_table(f)?.len()))
    }
}
