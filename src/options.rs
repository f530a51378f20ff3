//! Engine configuration.
//!
//! [`Options`] is an ordinary value: it is passed to every top-level call
//! ([`exhaustify`][crate::exh::exhaustify], [`Universe::new`][crate::universe::Universe::new])
//! and read once at the start of that call.
//!
//! ```
//! use exh_rs::options::{DisplayMode, Options};
//! use exh_rs::scale::Scales;
//!
//! let options = Options::default()
//!     .with_dom_quant(3)
//!     .with_scales(Scales::none())
//!     .with_display(DisplayMode::Formatted);
//! assert_eq!(options.default_domain().size(), 3);
//! ```

use std::time::Duration;

use crate::scale::Scales;
use crate::types::Domain;

/// How formulas and diagnoses are rendered.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum DisplayMode {
    /// Unicode text.
    #[default]
    Plain,
    /// LaTeX.
    Formatted,
}

/// How innocently includable alternatives strengthen the meaning.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Inclusion {
    /// Every includable alternative is asserted.
    #[default]
    Conjunctive,
    /// At least one includable alternative not already entailed is asserted.
    Disjunctive,
}

#[derive(Debug, Clone)]
pub struct Options {
    /// Size of the default domain of quantification.
    pub dom_quant: usize,
    /// Scale families used to generate alternatives.
    pub scales: Scales,
    /// Sub-constituents of a connective are alternatives to it.
    pub sub: bool,
    /// Innocent inclusion, unless a call says otherwise.
    pub ii: bool,
    pub inclusion: Inclusion,
    /// The un-exhaustified alternatives of `Exh(φ)` join its exhaustified ones.
    pub prejacent_alternative_to_exh: bool,
    pub display: DisplayMode,
    /// Largest number of atomic propositions a universe may enumerate.
    pub max_atoms: usize,
    /// Cooperative deadline for a single evaluation.
    pub timeout: Option<Duration>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            dom_quant: 4,
            scales: Scales::standard(),
            sub: true,
            ii: false,
            inclusion: Inclusion::Conjunctive,
            prejacent_alternative_to_exh: false,
            display: DisplayMode::Plain,
            max_atoms: 20,
            timeout: None,
        }
    }
}

impl Options {
    pub fn with_dom_quant(mut self, size: usize) -> Self {
        self.dom_quant = size;
        self
    }

    pub fn with_scales(mut self, scales: Scales) -> Self {
        self.scales = scales;
        self
    }

    pub fn with_sub(mut self, sub: bool) -> Self {
        self.sub = sub;
        self
    }

    pub fn with_ii(mut self, ii: bool) -> Self {
        self.ii = ii;
        self
    }

    pub fn with_inclusion(mut self, inclusion: Inclusion) -> Self {
        self.inclusion = inclusion;
        self
    }

    pub fn with_prejacent_alternative_to_exh(mut self, value: bool) -> Self {
        self.prejacent_alternative_to_exh = value;
        self
    }

    pub fn with_display(mut self, display: DisplayMode) -> Self {
        self.display = display;
        self
    }

    pub fn with_max_atoms(mut self, max_atoms: usize) -> Self {
        self.max_atoms = max_atoms;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The domain of size `dom_quant`.
    ///
    /// # Panics
    ///
    /// Panics if `dom_quant` is not in `1..=64`.
    pub fn default_domain(&self) -> Domain {
        Domain::new(self.dom_quant)
    }
}
