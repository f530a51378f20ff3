use std::time::Duration;

use test_log::test;

use exh_rs::alternatives::{alt, Substitution};
use exh_rs::error::Error;
use exh_rs::exh::{exhaustify, ExhParams};
use exh_rs::formula::{Formula, Quantifier};
use exh_rs::options::Options;
use exh_rs::pred::{Pred, Term};
use exh_rs::scale::{Lexical, Scales};
use exh_rs::types::Domain;
use exh_rs::universe::Universe;

fn props<const N: usize>(names: [&str; N]) -> [Formula; N] {
    names.map(|n| Pred::prop(n).atom())
}

fn chapter_scales() -> Scales {
    Scales::list([
        Scales::simple([
            [Lexical::Existential, Lexical::Universal],
            [Lexical::Existential, Lexical::Most],
        ]),
        Scales::SubDomain,
    ])
}

fn assert_equivalent(u: &Universe, f: &Formula, g: &Formula) {
    println!("{}\n  vs {}", f, g);
    if let Some(m) = u.counterexample(f, g).unwrap() {
        panic!("not equivalent, they differ in {}", m);
    }
}

#[test]
fn test_dancers_recursive_exh() {
    let options = Options::default();
    let d = Domain::new(5);
    let smiled = Pred::unary("smiled", "dancer", d);
    let some = Quantifier::existential_sub("dancer", d).scope(&smiled);
    let all = Quantifier::universal("dancer", d).scope(&smiled);

    let once = some.exh(&options).unwrap();
    let twice = once.exh(&options).unwrap();
    let u = Universe::new(&[&twice, &all], &options).unwrap();

    assert_equivalent(&u, &once, &some);
    assert_equivalent(&u, &twice, &all);
}

#[test]
fn test_dancers_innocent_inclusion() {
    let options = Options::default().with_ii(true);
    let d = Domain::new(5);
    let smiled = Pred::unary("smiled", "dancer", d);
    let some = Quantifier::existential_sub("dancer", d).scope(&smiled);
    let all = Quantifier::universal("dancer", d).scope(&smiled);

    let e = some.exh(&options).unwrap();
    let u = Universe::from_formula(&e, &options).unwrap();
    assert_equivalent(&u, &e, &all);
}

#[test]
fn test_sub_domain_existential_is_disjunction() {
    let d = Domain::new(2);
    let p = Pred::unary("p", "x", d);
    let f = Quantifier::existential_sub("x", d).scope(&p);
    let g = p.apply([Term::individual(0)]).unwrap() | p.apply([Term::individual(1)]).unwrap();
    let u = Universe::new(&[&f, &g], &Options::default()).unwrap();
    assert_equivalent(&u, &f, &g);
}

#[test]
fn test_free_choice_collapse() {
    let [a, b] = props(["a", "b"]);
    let or = a.clone() | &b;

    let options = Options::default().with_scales(Scales::none());
    let twice = or.exh(&options).unwrap().exh(&options).unwrap();
    let u = Universe::from_formula(&twice, &options).unwrap();
    assert_equivalent(&u, &twice, &(a.clone() & &b));

    let options = options.with_prejacent_alternative_to_exh(true);
    let twice = or.exh(&options).unwrap().exh(&options).unwrap();
    assert_eq!(twice.as_exh().unwrap().alternatives.len(), 6);
    assert_equivalent(&u, &twice, &or);
}

#[test]
fn test_exclusive_disjunction() {
    let [a, b, c] = props(["a", "b", "c"]);
    let options = Options::default().with_scales(Scales::simple([[Lexical::Or, Lexical::And]]));

    let xor = (a.clone() | &b) & !(a.clone() & &b);
    let ie = (a.clone() | &b).exh(&options).unwrap();
    let ii = exhaustify(&(a.clone() | &b), &ExhParams::new().with_ii(true), &options).unwrap();

    let exactly_one = (a.clone() & !b.clone() & !c.clone())
        | (!a.clone() & &b & !c.clone())
        | (!a.clone() & !b.clone() & &c);
    let three = Formula::or_many([a, b, c]).exh(&options).unwrap();

    let u = Universe::new(&[&ie, &three], &options).unwrap();
    assert_equivalent(&u, &ie, &xor);
    assert_equivalent(&u, &ii, &xor);
    assert_equivalent(&u, &three, &exactly_one);
}

#[test]
fn test_sub_constituents_without_scales() {
    let [a, b, c] = props(["a", "b", "c"]);
    let options = Options::default().with_scales(Scales::none());
    let or = Formula::or_many([a.clone(), b.clone(), c.clone()]);

    let once = or.exh(&options).unwrap();
    let twice = once.exh(&options).unwrap();
    let u = Universe::from_formula(&twice, &options).unwrap();

    assert_equivalent(&u, &once, &or);
    assert_equivalent(&u, &twice, &Formula::and_many([a, b, c]));
    assert!(!u.equivalent(&once, &twice).unwrap());
}

struct Ambassadors {
    prejacent: Formula,
    arabic: Pred,
    english: Pred,
    mandarin: Pred,
    d: Domain,
}

fn ambassadors() -> Ambassadors {
    let d = Domain::new(3);
    let [arabic, english, mandarin] = ["arabic", "english", "mandarin"].map(|n| Pred::unary(n, "amb", d));
    let prejacent =
        Quantifier::universal("amb", d).scope(Formula::or_many([arabic.atom(), english.atom(), mandarin.atom()]));
    Ambassadors {
        prejacent,
        arabic,
        english,
        mandarin,
        d,
    }
}

#[test]
fn test_ambassadors_sub_constituents() {
    let amb = ambassadors();
    let options = Options::default().with_scales(Scales::none());
    let e = amb.prejacent.exh(&options).unwrap();
    let u = Universe::from_formula(&e, &options).unwrap();

    let only_english = Quantifier::existential("amb", amb.d)
        .scope(amb.english.atom() & !amb.arabic.atom() & !amb.mandarin.atom());
    assert!(u.entails(&e, &only_english).unwrap());
    assert!(!u.entails(&amb.prejacent, &only_english).unwrap());
}

#[test]
fn test_ambassadors_scalar() {
    let amb = ambassadors();
    let options = Options::default().with_scales(Scales::simple([[Lexical::Existential, Lexical::Universal]]));

    let ie = amb.prejacent.exh(&options).unwrap();
    let ii = exhaustify(&amb.prejacent, &ExhParams::new().with_ii(true), &options).unwrap();
    let u = Universe::new(&[&ie, &ii], &options).unwrap();

    assert_equivalent(&u, &ie, &amb.prejacent);
    let all_three = Quantifier::universal("amb", amb.d)
        .scope(amb.arabic.atom() & amb.english.atom() & amb.mandarin.atom());
    assert_equivalent(&u, &ii, &all_three);
}

#[test]
fn test_ambassadors_distributive_implicature() {
    let amb = ambassadors();
    let options = Options::default().with_scales(chapter_scales());
    let twice = amb.prejacent.exh(&options).unwrap().exh(&options).unwrap();
    let u = Universe::from_formula(&twice, &options).unwrap();

    let some = |p: &Pred| Quantifier::existential("amb", amb.d).scope(p);
    let target = amb.prejacent.clone() & some(&amb.arabic) & some(&amb.english) & some(&amb.mandarin);
    assert_equivalent(&u, &twice, &target);
}

fn cracked(squirrels: Domain, nuts: Domain) -> Pred {
    Pred::new("cracked", ["squirrel", "nut"], [squirrels, nuts]).unwrap()
}

#[test]
fn test_cumulative_every() {
    let options = Options::default().with_scales(chapter_scales());
    let sq = Domain::new(3);

    for nuts in [3, 4] {
        let nut = Domain::new(nuts);
        let cracked = cracked(sq, nut);
        let prejacent =
            Quantifier::universal("nut", nut).scope(Quantifier::existential_sub("squirrel", sq).scope(&cracked));
        let converse =
            Quantifier::universal("squirrel", sq).scope(Quantifier::existential("nut", nut).scope(&cracked));

        let twice = prejacent.exh(&options).unwrap().exh(&options).unwrap();
        let u = Universe::from_formula(&twice, &options).unwrap();
        assert_equivalent(&u, &twice, &(prejacent.clone() & converse));
    }
}

#[test]
fn test_cumulative_every_innocent_inclusion() {
    let options = Options::default().with_scales(chapter_scales()).with_ii(true);
    let sq = Domain::new(3);
    let nut = Domain::new(3);
    let cracked = cracked(sq, nut);
    let prejacent =
        Quantifier::universal("nut", nut).scope(Quantifier::existential_sub("squirrel", sq).scope(&cracked));
    let distributive =
        Quantifier::universal("squirrel", sq).scope(Quantifier::universal("nut", nut).scope(&cracked));

    let e = prejacent.exh(&options).unwrap();
    let u = Universe::from_formula(&e, &options).unwrap();
    assert_equivalent(&u, &e, &distributive);
}

#[test]
fn test_cumulative_most() {
    let options = Options::default().with_scales(chapter_scales());
    let sq = Domain::new(3);
    let nut = Domain::new(3);
    let cracked = cracked(sq, nut);
    let prejacent = Quantifier::most("nut", nut).scope(Quantifier::existential_sub("squirrel", sq).scope(&cracked));
    let converse = Quantifier::universal("squirrel", sq).scope(Quantifier::existential("nut", nut).scope(&cracked));

    let twice = prejacent.exh(&options).unwrap().exh(&options).unwrap();
    let u = Universe::from_formula(&twice, &options).unwrap();
    assert_equivalent(&u, &twice, &(prejacent.clone() & converse));
}

#[test]
fn test_cumulative_most_with_universal_alternative() {
    let scales = Scales::list([
        Scales::simple([[Lexical::Existential, Lexical::Most, Lexical::Universal]]),
        Scales::SubDomain,
    ]);
    let options = Options::default();
    let sq = Domain::new(3);
    let nut = Domain::new(3);
    let cracked = cracked(sq, nut);
    let some_squirrel = Quantifier::existential_sub("squirrel", sq).scope(&cracked);
    let prejacent = Quantifier::most("nut", nut).scope(&some_squirrel);
    let converse = Quantifier::universal("squirrel", sq).scope(Quantifier::existential("nut", nut).scope(&cracked));
    let every_nut = Quantifier::universal("nut", nut).scope(&some_squirrel);

    let params = ExhParams::new().with_scales(scales);
    let once = exhaustify(&prejacent, &params, &options).unwrap();
    let twice = exhaustify(&once, &params, &options).unwrap();
    let u = Universe::from_formula(&twice, &options).unwrap();
    assert_equivalent(&u, &twice, &(prejacent.clone() & converse & !every_nut));
}

#[test]
fn test_schein_video_games() {
    let options = Options::default().with_scales(chapter_scales());
    let d2 = Domain::new(2);
    let d3 = Domain::new(3);
    let taught = Pred::new("taught", ["vg", "qb", "play"], [d2, d2, d3]).unwrap();

    // Most of three plays is two of them.
    let prejacent = Quantifier::universal("qb", d2)
        .scope(Quantifier::most("play", d3).scope(Quantifier::existential_sub("vg", d2).scope(&taught)));
    let converse = Quantifier::universal("vg", d2).scope(
        Quantifier::existential("qb", d2).scope(Quantifier::existential("play", d3).scope(&taught)),
    );

    let twice = prejacent.exh(&options).unwrap().exh(&options).unwrap();
    let u = Universe::from_formula(&twice, &options).unwrap();
    assert_eq!(u.num_atoms(), 12);
    assert_equivalent(&u, &twice, &(prejacent.clone() & converse));
}

#[test]
fn test_embedded_exh_under_universal() {
    let options = Options::default().with_scales(chapter_scales());
    let sq = Domain::new(3);
    let nut = Domain::new(3);
    let cracked = cracked(sq, nut);

    let inner = Quantifier::existential_sub("squirrel", sq)
        .scope(&cracked)
        .exh(&options)
        .unwrap()
        .exh(&options)
        .unwrap();
    assert_eq!(inner.free_variables().len(), 1);
    let lf = Quantifier::universal("nut", nut)
        .scope(&inner)
        .exh(&options)
        .unwrap()
        .exh(&options)
        .unwrap();
    let u = Universe::from_formula(&lf, &options).unwrap();

    let cumulative = Quantifier::universal("nut", nut).scope(Quantifier::existential("squirrel", sq).scope(&cracked))
        & Quantifier::universal("squirrel", sq).scope(Quantifier::existential("nut", nut).scope(&cracked));
    let distributive =
        Quantifier::universal("squirrel", sq).scope(Quantifier::universal("nut", nut).scope(&cracked));
    assert!(!u.equivalent(&lf, &cumulative).unwrap());
    assert_equivalent(&u, &lf, &distributive);
}

#[test]
fn test_ordinary_cumulative_with_explicit_alternatives() {
    let options = Options::default().with_scales(chapter_scales());
    let sq = Domain::new(3);
    let nut = Domain::new(3);
    let cracked = cracked(sq, nut);
    let sub_domains = Substitution::new(Scales::SubDomain).with_sub(options.sub);

    // Alternatives on the nuts only, with the squirrels' domain fixed.
    let to_nut = alt(
        &Quantifier::existential("squirrel", sq).scope(Quantifier::existential_sub("nut", nut).scope(&cracked)),
        &sub_domains,
    );
    assert_eq!(to_nut.len(), 7);
    let prejacent =
        Quantifier::existential_sub("squirrel", sq).scope(Quantifier::existential_sub("nut", nut).scope(&cracked));
    let first = exhaustify(&prejacent, &ExhParams::new().with_alts(to_nut), &options)
        .unwrap()
        .exh(&options)
        .unwrap();

    let every_nut = Quantifier::universal("nut", nut).scope(Quantifier::existential_sub("squirrel", sq).scope(&cracked));
    let u = Universe::from_formula(&first, &options).unwrap();
    assert_equivalent(&u, &first, &every_nut);

    // Then alternatives on the squirrels, added to those of the first step.
    let to_squirrel = alt(
        &Quantifier::existential("nut", nut).scope(Quantifier::existential_sub("squirrel", sq).scope(&cracked)),
        &sub_domains,
    );
    let second = exhaustify(&first, &ExhParams::new().with_extra_alts(to_squirrel), &options)
        .unwrap()
        .exh(&options)
        .unwrap();

    let every_squirrel =
        Quantifier::universal("squirrel", sq).scope(Quantifier::existential_sub("nut", nut).scope(&cracked));
    assert_equivalent(&u, &second, &(every_nut & every_squirrel));
}

#[test]
fn test_empty_alternatives_are_vacuous() {
    let [a, b] = props(["a", "b"]);
    let f = a | b;
    let e = exhaustify(&f, &ExhParams::new().with_alts([]), &Options::default()).unwrap();
    assert_eq!(e.as_exh().unwrap().alternatives.len(), 1);
    let u = Universe::from_formula(&e, &Options::default()).unwrap();
    assert_equivalent(&u, &e, &f);
}

#[test]
fn test_diagnosis_reconstructs_meaning() {
    let amb = ambassadors();
    let options = Options::default().with_scales(Scales::none());
    let e = amb.prejacent.exh(&options).unwrap();
    let u = Universe::from_formula(&e, &options).unwrap();

    let mut lines = Vec::new();
    let d = u.diagnose(&e, |line| lines.push(line.to_string())).unwrap();
    assert!(!lines.is_empty());
    // Every proper sub-disjunction is excluded.
    assert_eq!(d.excluded.len(), 6);
    assert_equivalent(&u, &d.reconstruct(), &e);
}

#[test]
fn test_undeclared_predicate() {
    let [a, b] = props(["a", "b"]);
    let u = Universe::from_formula(&a, &Options::default()).unwrap();
    assert_eq!(u.equivalent(&a, &b), Err(Error::UndeclaredPredicate("b".to_string())));
}

#[test]
fn test_domain_too_large() {
    let d = Domain::new(6);
    let f = Quantifier::universal("squirrel", d).scope(Quantifier::existential("nut", d).scope(&cracked(d, d)));
    let res = Universe::from_formula(&f, &Options::default());
    assert!(matches!(res, Err(Error::DomainTooLarge { atoms: 36, .. })));

    let options = Options::default().with_max_atoms(40);
    assert!(matches!(
        Universe::from_formula(&f, &options),
        Err(Error::DomainTooLarge { atoms: 36, .. })
    ));
}

#[test]
fn test_inconsistent_extra_alternative() {
    let p3 = Pred::unary("p", "x", Domain::new(3));
    let q4 = Pred::unary("q", "x", Domain::new(4));
    let f = Quantifier::existential("x", Domain::new(3)).scope(&p3);
    let g = Quantifier::universal("x", Domain::new(4)).scope(&q4);
    let res = exhaustify(&f, &ExhParams::new().with_extra_alts([g]), &Options::default());
    assert!(matches!(res, Err(Error::InconsistentAlternativeSet(_))));
}

#[test]
fn test_malformed_application() {
    let smiled = Pred::unary("smiled", "dancer", Domain::new(3));
    let res = smiled.apply([Term::individual(0), Term::individual(1)]);
    assert!(matches!(res, Err(Error::MalformedFormula(_))));

    let bad = Quantifier::existential("dancer", Domain::new(4)).scope(&smiled);
    assert!(matches!(bad.exh(&Options::default()), Err(Error::MalformedFormula(_))));
}

#[test]
fn test_timeout() {
    let options = Options::default()
        .with_scales(chapter_scales())
        .with_timeout(Duration::from_nanos(1));
    let sq = Domain::new(3);
    let nut = Domain::new(3);
    let cracked = cracked(sq, nut);
    let prejacent =
        Quantifier::universal("nut", nut).scope(Quantifier::existential_sub("squirrel", sq).scope(&cracked));
    let twice = prejacent.exh(&options).unwrap().exh(&options).unwrap();
    let u = Universe::from_formula(&twice, &options).unwrap();
    assert!(matches!(u.truth_table(&twice), Err(Error::Timeout(_))));
}
