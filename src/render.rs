//! Formula rendering.
//!
//! Two notations are supported, selected by [`DisplayMode`]:
//!
//! - **Plain**: Unicode text, e.g. `∀nut, ∃squirrel, cracked(squirrel, nut)`.
//! - **Formatted**: LaTeX, e.g. `\forall nut,\ \exists squirrel,\ \text{cracked}(squirrel, nut)`.
//!
//! Parentheses are inserted only where precedence requires them. Quantifiers
//! bind weakest and extend as far right as possible; then come disjunction,
//! conjunction and negation. A quantifier restricted to part of its domain
//! shows its range, e.g. `∃x∈{a1, a3}, p(x)`.
//!
//! ```
//! use exh_rs::options::DisplayMode;
//! use exh_rs::pred::Pred;
//!
//! let a = Pred::prop("a").atom();
//! let b = Pred::prop("b").atom();
//! let c = Pred::prop("c").atom();
//! let f = (a | b) & !c;
//! assert_eq!(f.render(DisplayMode::Plain), "(a ∨ b) ∧ ¬c");
//! assert_eq!(f.render(DisplayMode::Formatted), r"(a \lor b) \land \neg c");
//! ```

use std::fmt::Write;

use crate::formula::{Formula, Node, Quantifier, QuantifierKind};
use crate::options::{DisplayMode, Inclusion};
use crate::pred::Term;
use crate::types::Individual;

/// Symbols of one notation.
struct Symbols {
    top: &'static str,
    bottom: &'static str,
    not: &'static str,
    and: &'static str,
    or: &'static str,
    forall: &'static str,
    exists: &'static str,
    most: &'static str,
    /// Between a quantifier prefix and its body.
    dot: &'static str,
    member_of: &'static str,
    set_open: &'static str,
    set_close: &'static str,
    exh: &'static str,
    exh_ii: &'static str,
    exh_ii_disjunctive: &'static str,
}

const PLAIN: Symbols = Symbols {
    top: "⊤",
    bottom: "⊥",
    not: "¬",
    and: " ∧ ",
    or: " ∨ ",
    forall: "∀",
    exists: "∃",
    most: "Most ",
    dot: ", ",
    member_of: "∈",
    set_open: "{",
    set_close: "}",
    exh: "Exh",
    exh_ii: "Exh[ii]",
    exh_ii_disjunctive: "Exh[ii∨]",
};

const LATEX: Symbols = Symbols {
    top: r"\top",
    bottom: r"\bot",
    not: r"\neg ",
    and: r" \land ",
    or: r" \lor ",
    forall: r"\forall ",
    exists: r"\exists ",
    most: r"\text{Most}\ ",
    dot: r",\ ",
    member_of: r" \in ",
    set_open: r"\{",
    set_close: r"\}",
    exh: r"\text{Exh}",
    exh_ii: r"\text{Exh}^{\text{ii}}",
    exh_ii_disjunctive: r"\text{Exh}^{\text{ii},\lor}",
};

fn symbols(mode: DisplayMode) -> &'static Symbols {
    match mode {
        DisplayMode::Plain => &PLAIN,
        DisplayMode::Formatted => &LATEX,
    }
}

/// Binding strength: a child binding weaker than its context gets parentheses.
fn precedence(node: &Node) -> u8 {
    match node {
        Node::Quant { .. } => 0,
        Node::Or(..) => 1,
        Node::And(..) => 2,
        Node::Not(_) => 3,
        Node::Const(_) | Node::Atom { .. } | Node::Exh(_) => 4,
    }
}

/// Renders `f` in the given notation.
pub fn render(f: &Formula, mode: DisplayMode) -> String {
    let mut out = String::new();
    write_formula(&mut out, f, symbols(mode), mode, 0);
    out
}

fn write_formula(out: &mut String, f: &Formula, sym: &Symbols, mode: DisplayMode, min: u8) {
    let prec = precedence(f.node());
    let paren = prec < min;
    if paren {
        out.push('(');
    }

    match f.node() {
        Node::Const(true) => out.push_str(sym.top),
        Node::Const(false) => out.push_str(sym.bottom),
        Node::Atom { pred, args } => {
            match mode {
                DisplayMode::Plain => out.push_str(pred.name()),
                DisplayMode::Formatted if args.is_empty() => out.push_str(pred.name()),
                DisplayMode::Formatted => {
                    let _ = write!(out, r"\text{{{}}}", pred.name());
                }
            }
            if !args.is_empty() {
                out.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    match arg {
                        Term::Var(v) => out.push_str(v),
                        Term::Const(ind) => write_individual(out, *ind, mode),
                    }
                }
                out.push(')');
            }
        }
        Node::Not(a) => {
            out.push_str(sym.not);
            write_formula(out, a, sym, mode, prec);
        }
        // Same-operator chains associate to the left without parentheses.
        Node::And(a, b) | Node::Or(a, b) => {
            let op = if matches!(f.node(), Node::And(..)) { sym.and } else { sym.or };
            write_formula(out, a, sym, mode, prec);
            out.push_str(op);
            write_formula(out, b, sym, mode, prec + 1);
        }
        Node::Quant { quantifier, body } => {
            write_quantifier(out, quantifier, sym, mode);
            out.push_str(sym.dot);
            write_formula(out, body, sym, mode, prec);
        }
        Node::Exh(e) => {
            out.push_str(match (e.ii, e.inclusion) {
                (false, _) => sym.exh,
                (true, Inclusion::Conjunctive) => sym.exh_ii,
                (true, Inclusion::Disjunctive) => sym.exh_ii_disjunctive,
            });
            out.push('(');
            write_formula(out, &e.prejacent, sym, mode, 0);
            out.push(')');
        }
    }

    if paren {
        out.push(')');
    }
}

fn write_quantifier(out: &mut String, q: &Quantifier, sym: &Symbols, mode: DisplayMode) {
    out.push_str(match q.kind() {
        QuantifierKind::Universal => sym.forall,
        QuantifierKind::Existential => sym.exists,
        QuantifierKind::Most => sym.most,
    });
    out.push_str(q.var());
    if !q.range().is_full() {
        out.push_str(sym.member_of);
        out.push_str(sym.set_open);
        for (i, ind) in q.range().members().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            write_individual(out, ind, mode);
        }
        out.push_str(sym.set_close);
    }
}

fn write_individual(out: &mut String, ind: Individual, mode: DisplayMode) {
    let _ = match mode {
        DisplayMode::Plain => write!(out, "{}", ind),
        DisplayMode::Formatted => write!(out, "a_{{{}}}", ind.index() + 1),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::exh::{exhaustify, ExhParams};
    use crate::options::Options;
    use crate::pred::Pred;
    use crate::scale::Scales;
    use crate::types::{Domain, Range};

    fn atoms() -> (Formula, Formula, Formula) {
        (Pred::prop("a").atom(), Pred::prop("b").atom(), Pred::prop("c").atom())
    }

    #[test]
    fn test_precedence() {
        let (a, b, c) = atoms();
        assert_eq!((a.clone() | &b | &c).to_string(), "a ∨ b ∨ c");
        assert_eq!((a.clone() | (b.clone() | &c)).to_string(), "a ∨ (b ∨ c)");
        assert_eq!((a.clone() & &b | &c).to_string(), "a ∧ b ∨ c");
        assert_eq!((a.clone() & (b.clone() | &c)).to_string(), "a ∧ (b ∨ c)");
        assert_eq!((!(a.clone() & &b)).to_string(), "¬(a ∧ b)");
        assert_eq!((!!a).to_string(), "¬¬a");
        assert_eq!(Formula::top().to_string(), "⊤");
    }

    #[test]
    fn test_quantifiers() {
        let d = Domain::new(3);
        let cracked = Pred::new("cracked", ["squirrel", "nut"], [d, d]).unwrap();
        let f = Quantifier::universal("nut", d).scope(Quantifier::existential("squirrel", d).scope(&cracked));
        assert_eq!(f.to_string(), "∀nut, ∃squirrel, cracked(squirrel, nut)");
        assert_eq!(
            f.render(DisplayMode::Formatted),
            r"\forall nut,\ \exists squirrel,\ \text{cracked}(squirrel, nut)"
        );

        let p = Pred::unary("p", "x", d);
        let q = Quantifier::existential("x", d).scope(&p) & Pred::prop("a").atom();
        assert_eq!(q.to_string(), "(∃x, p(x)) ∧ a");
        let most = Quantifier::most("x", d).scope(&p);
        assert_eq!(most.to_string(), "Most x, p(x)");
    }

    #[test]
    fn test_restricted_range() {
        let d = Domain::new(3);
        let p = Pred::unary("p", "x", d);
        let f = Quantifier::existential_sub("x", d).with_range(Range::from_mask(d, 0b101)).scope(&p);
        assert_eq!(f.to_string(), "∃x∈{a1, a3}, p(x)");
        assert_eq!(f.render(DisplayMode::Formatted), r"\exists x \in \{a_{1}, a_{3}\},\ \text{p}(x)");
    }

    #[test]
    fn test_exh() {
        let (a, b, _) = atoms();
        let options = Options::default().with_scales(Scales::none());
        let e = exhaustify(&(a.clone() | &b), &ExhParams::new(), &options).unwrap();
        assert_eq!(e.to_string(), "Exh(a ∨ b)");
        let e = exhaustify(&(a.clone() | &b), &ExhParams::new().with_ii(true), &options).unwrap();
        assert_eq!(e.to_string(), "Exh[ii](a ∨ b)");
        assert_eq!(e.render(DisplayMode::Formatted), r"\text{Exh}^{\text{ii}}(a \lor b)");
        assert_eq!((!e).to_string(), "¬Exh[ii](a ∨ b)");

        let params = ExhParams::new().with_ii(true).with_inclusion(Inclusion::Disjunctive);
        let e = exhaustify(&(a | b), &params, &options).unwrap();
        assert_eq!(e.to_string(), "Exh[ii∨](a ∨ b)");
        assert_eq!(e.render(DisplayMode::Formatted), r"\text{Exh}^{\text{ii},\lor}(a \lor b)");
    }
}
