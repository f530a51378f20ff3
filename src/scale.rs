//! Scales: sets of mutually substitutable lexical items.
//!
//! Scalar alternatives are obtained by replacing a lexical item (a quantifier
//! or a connective) with one of its scale-mates. Scales are grouped in
//! families ([`Scales`]): a family of simple scales, the sub-domain family
//! (which lets existentials marked with sub-domain alternatives range over
//! every non-empty subset of their domain), or a list of families. At a single
//! node the families contribute independently: the node's replacements are
//! the union of what each family offers.

use crate::formula::QuantifierKind;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Lexical {
    Existential,
    Universal,
    Most,
    Or,
    And,
}

impl Lexical {
    pub fn as_quantifier(self) -> Option<QuantifierKind> {
        match self {
            Lexical::Existential => Some(QuantifierKind::Existential),
            Lexical::Universal => Some(QuantifierKind::Universal),
            Lexical::Most => Some(QuantifierKind::Most),
            Lexical::Or | Lexical::And => None,
        }
    }

    pub fn is_connective(self) -> bool {
        matches!(self, Lexical::Or | Lexical::And)
    }
}

impl From<QuantifierKind> for Lexical {
    fn from(kind: QuantifierKind) -> Self {
        match kind {
            QuantifierKind::Existential => Lexical::Existential,
            QuantifierKind::Universal => Lexical::Universal,
            QuantifierKind::Most => Lexical::Most,
        }
    }
}

/// A single scale, e.g. `{Existential, Universal}`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Scale(Vec<Lexical>);

impl Scale {
    pub fn new(items: impl IntoIterator<Item = Lexical>) -> Self {
        let mut items: Vec<Lexical> = items.into_iter().collect();
        items.sort();
        items.dedup();
        Scale(items)
    }

    pub fn items(&self) -> &[Lexical] {
        &self.0
    }

    pub fn contains(&self, item: Lexical) -> bool {
        self.0.contains(&item)
    }
}

impl<const N: usize> From<[Lexical; N]> for Scale {
    fn from(items: [Lexical; N]) -> Self {
        Scale::new(items)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Scales {
    /// A family of simple scales.
    Simple(Vec<Scale>),
    /// Sub-domain alternatives for existentials that carry them.
    SubDomain,
    /// Several families, composed by union.
    List(Vec<Scales>),
}

impl Scales {
    /// No scalar and no sub-domain alternatives.
    pub fn none() -> Self {
        Scales::Simple(Vec::new())
    }

    pub fn simple<S: Into<Scale>>(scales: impl IntoIterator<Item = S>) -> Self {
        Scales::Simple(scales.into_iter().map(Into::into).collect())
    }

    pub fn list(families: impl IntoIterator<Item = Scales>) -> Self {
        Scales::List(families.into_iter().collect())
    }

    /// `{Or, And}`, `{Existential, Universal}` and sub-domain alternatives.
    pub fn standard() -> Self {
        Scales::list([
            Scales::simple([
                [Lexical::Or, Lexical::And],
                [Lexical::Existential, Lexical::Universal],
            ]),
            Scales::SubDomain,
        ])
    }

    /// Scale-mates of `item` across all families, `item` itself first.
    ///
    /// Mates of a different category (a connective on a scale with a
    /// quantifier) are skipped.
    pub fn mates(&self, item: Lexical) -> Vec<Lexical> {
        let mut out = vec![item];
        self.collect_mates(item, &mut out);
        out
    }

    fn collect_mates(&self, item: Lexical, out: &mut Vec<Lexical>) {
        match self {
            Scales::Simple(scales) => {
                for scale in scales.iter().filter(|s| s.contains(item)) {
                    for &mate in scale.items() {
                        if mate.is_connective() == item.is_connective() && !out.contains(&mate) {
                            out.push(mate);
                        }
                    }
                }
            }
            Scales::SubDomain => {}
            Scales::List(families) => {
                for family in families {
                    family.collect_mates(item, out);
                }
            }
        }
    }

    /// Whether the sub-domain family is active.
    pub fn has_sub_domain(&self) -> bool {
        match self {
            Scales::Simple(_) => false,
            Scales::SubDomain => true,
            Scales::List(families) => families.iter().any(Scales::has_sub_domain),
        }
    }
}

impl Default for Scales {
    fn default() -> Self {
        Scales::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mates_union_across_scales() {
        let scales = Scales::simple([
            [Lexical::Existential, Lexical::Universal],
            [Lexical::Existential, Lexical::Most],
        ]);
        assert_eq!(
            scales.mates(Lexical::Existential),
            vec![Lexical::Existential, Lexical::Universal, Lexical::Most]
        );
        assert_eq!(scales.mates(Lexical::Universal), vec![Lexical::Universal, Lexical::Existential]);
        assert_eq!(scales.mates(Lexical::Or), vec![Lexical::Or]);
    }

    #[test]
    fn test_mates_skip_other_category() {
        let scales = Scales::simple([[Lexical::Or, Lexical::Existential]]);
        assert_eq!(scales.mates(Lexical::Or), vec![Lexical::Or]);
    }

    #[test]
    fn test_sub_domain_family() {
        assert!(Scales::standard().has_sub_domain());
        assert!(!Scales::none().has_sub_domain());
        let nested = Scales::list([Scales::none(), Scales::list([Scales::SubDomain])]);
        assert!(nested.has_sub_domain());
        assert_eq!(nested.mates(Lexical::And), vec![Lexical::And]);
    }

    #[test]
    fn test_scale_dedup() {
        let s = Scale::new([Lexical::Universal, Lexical::Existential, Lexical::Universal]);
        assert_eq!(s.items(), &[Lexical::Existential, Lexical::Universal]);
    }
}
