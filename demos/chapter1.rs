use clap::Parser;

use exh_rs::alternatives::{alt, Substitution};
use exh_rs::error::Result;
use exh_rs::exh::{exhaustify, ExhParams};
use exh_rs::formula::{Formula, Quantifier};
use exh_rs::options::{DisplayMode, Options};
use exh_rs::pred::Pred;
use exh_rs::scale::{Lexical, Scales};
use exh_rs::types::Domain;
use exh_rs::universe::Universe;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Size of the domains of quantification.
    #[clap(
        long,
        value_name = "INT",
        default_value = "3",
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..=64)
    )]
    dom_quant: usize,

    /// Render formulas in LaTeX.
    #[clap(long)]
    latex: bool,

    /// Replay only this cell.
    #[clap(long, value_name = "NAME")]
    cell: Option<String>,
}

type Cell = fn(&Options) -> Result<()>;

const CELLS: &[(&str, Cell)] = &[
    ("dancers", dancers),
    ("free-choice", free_choice),
    ("disjunction", disjunction),
    ("ambassadors", ambassadors),
    ("cumulative", cumulative),
    ("most", most),
    ("most-impl", most_impl),
    ("schein", schein),
    ("asymmetry", asymmetry),
    ("ordinary", ordinary),
];

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let args = Cli::parse();
    println!("args = {:?}", args);

    let display = if args.latex {
        DisplayMode::Formatted
    } else {
        DisplayMode::Plain
    };
    let options = Options::default().with_dom_quant(args.dom_quant).with_display(display);

    for (name, cell) in CELLS {
        if args.cell.as_deref().is_some_and(|c| c != *name) {
            continue;
        }
        println!("==================== {} ====================", name);
        let time = std::time::Instant::now();
        cell(&options)?;
        println!("{} done in {:.3}s", name, time.elapsed().as_secs_f64());
    }

    println!("\nAll done in {:.3}s", time_total.elapsed().as_secs_f64());
    Ok(())
}

/// `{∃, ∀}` and `{∃, Most}` plus sub-domain alternatives.
fn chapter_scales() -> Scales {
    Scales::list([
        Scales::simple([
            [Lexical::Existential, Lexical::Universal],
            [Lexical::Existential, Lexical::Most],
        ]),
        Scales::SubDomain,
    ])
}

fn show(u: &Universe, f: &Formula) -> String {
    f.render(u.options().display)
}

fn judge(u: &Universe, label: &str, f: &Formula, g: &Formula) -> Result<()> {
    let ok = u.equivalent(f, g)?;
    println!("{} {}", if ok { "[ok]" } else { "[!!]" }, label);
    println!("    {}", show(u, f));
    println!("    ≡ {}", show(u, g));
    if let Some(m) = u.counterexample(f, g)? {
        println!("    differ in {}", m);
    }
    Ok(())
}

fn diagnose(u: &Universe, f: &Formula) -> Result<()> {
    u.diagnose(f, |line| println!("  | {}", line))?;
    Ok(())
}

/// Recursive exhaustification of a sub-domain existential yields the universal.
fn dancers(options: &Options) -> Result<()> {
    let d = options.default_domain();
    let smiled = Pred::unary("smiled", "dancer", d);
    let some = Quantifier::existential_sub("dancer", d).scope(&smiled);
    let all = Quantifier::universal("dancer", d).scope(&smiled);

    let once = some.exh(options)?;
    let twice = once.exh(options)?;
    let included = exhaustify(&some, &ExhParams::new().with_ii(true), options)?;

    let u = Universe::new(&[&twice, &included, &all], options)?;
    println!("LF: {}", show(&u, &twice));
    diagnose(&u, &twice)?;
    judge(&u, "single Exh is vacuous", &once, &some)?;
    judge(&u, "Exh(Exh(some dancer smiled))", &twice, &all)?;
    judge(&u, "Exh[ii](some dancer smiled)", &included, &all)?;
    Ok(())
}

/// `Exh(Exh(a ∨ b))` with and without the bare alternatives of the inner Exh.
fn free_choice(options: &Options) -> Result<()> {
    let a = Pred::prop("a").atom();
    let b = Pred::prop("b").atom();
    let or = a.clone() | &b;

    for flag in [false, true] {
        let options = options
            .clone()
            .with_scales(Scales::none())
            .with_prejacent_alternative_to_exh(flag);
        let twice = or.exh(&options)?.exh(&options)?;
        let u = Universe::from_formula(&twice, &options)?;
        println!("prejacent_alternative_to_exh = {}", flag);
        diagnose(&u, &twice)?;
        let target = if flag { or.clone() } else { a.clone() & &b };
        judge(&u, "Exh(Exh(a or b))", &twice, &target)?;
    }
    Ok(())
}

/// Exclusive readings of disjunction.
fn disjunction(options: &Options) -> Result<()> {
    let [a, b, c] = ["a", "b", "c"].map(|n| Pred::prop(n).atom());
    let exactly_one = (a.clone() & !b.clone() & !c.clone())
        | (!a.clone() & &b & !c.clone())
        | (!a.clone() & !b.clone() & &c);

    let options = options.clone().with_scales(Scales::simple([[Lexical::Or, Lexical::And]]));
    let three = Formula::or_many([a.clone(), b.clone(), c.clone()]);
    let e = three.exh(&options)?;
    let included = exhaustify(&(a.clone() | &b), &ExhParams::new().with_ii(true), &options)?;

    let u = Universe::new(&[&e, &included], &options)?;
    diagnose(&u, &e)?;
    judge(&u, "Exh(a or b or c)", &e, &exactly_one)?;
    judge(&u, "Exh[ii](a or b)", &included, &((a.clone() | &b) & !(a & b)))?;
    Ok(())
}

/// Distributive implicatures of a universal over a disjunction.
fn ambassadors(options: &Options) -> Result<()> {
    let d = options.default_domain();
    let [arabic, english, mandarin] = ["arabic", "english", "mandarin"].map(|n| Pred::unary(n, "amb", d));
    let every = |body: Formula| Quantifier::universal("amb", d).scope(body);
    let some = |body: Formula| Quantifier::existential("amb", d).scope(body);
    let prejacent = every(Formula::or_many([arabic.atom(), english.atom(), mandarin.atom()]));

    let scales = Scales::simple([[Lexical::Existential, Lexical::Universal]]);
    let ie = exhaustify(&prejacent, &ExhParams::new().with_scales(scales.clone()), options)?;
    let ii = exhaustify(&prejacent, &ExhParams::new().with_scales(scales).with_ii(true), options)?;

    let chapter = options.clone().with_scales(chapter_scales());
    let twice = prejacent.exh(&chapter)?.exh(&chapter)?;

    let u = Universe::new(&[&ie, &ii, &twice], options)?;
    judge(&u, "Exh(every ambassador: A or E or M)", &ie, &prejacent)?;
    judge(
        &u,
        "Exh[ii](every ambassador: A or E or M)",
        &ii,
        &every(arabic.atom() & english.atom() & mandarin.atom()),
    )?;
    let distributive = prejacent.clone() & some(arabic.atom()) & some(english.atom()) & some(mandarin.atom());
    judge(&u, "Exh(Exh(every ambassador: A or E or M))", &twice, &distributive)?;
    Ok(())
}

/// Cumulative reading of "every nut was cracked by some squirrel".
fn cumulative(options: &Options) -> Result<()> {
    let d = options.default_domain();
    let cracked = Pred::new("cracked", ["squirrel", "nut"], [d, d])?;
    let prejacent = Quantifier::universal("nut", d).scope(Quantifier::existential_sub("squirrel", d).scope(&cracked));
    let converse =
        Quantifier::universal("squirrel", d).scope(Quantifier::existential("nut", d).scope(&cracked));
    let distributive =
        Quantifier::universal("squirrel", d).scope(Quantifier::universal("nut", d).scope(&cracked));

    let options = options.clone().with_scales(chapter_scales());
    let twice = prejacent.exh(&options)?.exh(&options)?;
    let included = exhaustify(&prejacent, &ExhParams::new().with_ii(true), &options)?;

    let u = Universe::new(&[&twice, &included], &options)?;
    println!("LF: {}", show(&u, &twice));
    judge(&u, "Exh(Exh(every nut, some squirrel))", &twice, &(prejacent.clone() & &converse))?;
    judge(&u, "Exh[ii](every nut, some squirrel)", &included, &distributive)?;
    Ok(())
}

/// Cumulative reading of "most nuts were cracked by some squirrel".
fn most(options: &Options) -> Result<()> {
    let d = options.default_domain();
    let cracked = Pred::new("cracked", ["squirrel", "nut"], [d, d])?;
    let prejacent = Quantifier::most("nut", d).scope(Quantifier::existential_sub("squirrel", d).scope(&cracked));
    let converse =
        Quantifier::universal("squirrel", d).scope(Quantifier::existential("nut", d).scope(&cracked));

    let options = options.clone().with_scales(chapter_scales());
    let twice = prejacent.exh(&options)?.exh(&options)?;

    let u = Universe::from_formula(&twice, &options)?;
    println!("LF: {}", show(&u, &twice));
    judge(&u, "Exh(Exh(most nuts, some squirrel))", &twice, &(prejacent.clone() & &converse))?;
    Ok(())
}

/// Same, with `∀` on the scale of most: "not every nut" is derived too.
fn most_impl(options: &Options) -> Result<()> {
    let d = options.default_domain();
    let cracked = Pred::new("cracked", ["squirrel", "nut"], [d, d])?;
    let some_squirrel = Quantifier::existential_sub("squirrel", d).scope(&cracked);
    let prejacent = Quantifier::most("nut", d).scope(&some_squirrel);
    let converse =
        Quantifier::universal("squirrel", d).scope(Quantifier::existential("nut", d).scope(&cracked));
    let every_nut = Quantifier::universal("nut", d).scope(&some_squirrel);

    let scales = Scales::list([
        Scales::simple([[Lexical::Existential, Lexical::Most, Lexical::Universal]]),
        Scales::SubDomain,
    ]);
    let params = ExhParams::new().with_scales(scales);
    let twice = exhaustify(&exhaustify(&prejacent, &params, options)?, &params, options)?;

    let u = Universe::from_formula(&twice, options)?;
    println!("LF: {}", show(&u, &twice));
    diagnose(&u, &twice)?;
    let target = prejacent.clone() & &converse & !every_nut;
    judge(&u, "Exh(Exh(most nuts, some squirrel))", &twice, &target)?;
    Ok(())
}

/// "The video games taught every quarterback two new plays."
fn schein(options: &Options) -> Result<()> {
    let d2 = Domain::new(2);
    let d3 = Domain::new(3);
    let taught = Pred::new("taught", ["vg", "qb", "play"], [d2, d2, d3])?;

    // Most of three plays is two of them.
    let prejacent = Quantifier::universal("qb", d2)
        .scope(Quantifier::most("play", d3).scope(Quantifier::existential_sub("vg", d2).scope(&taught)));
    let converse = Quantifier::universal("vg", d2).scope(
        Quantifier::existential("qb", d2).scope(Quantifier::existential("play", d3).scope(&taught)),
    );

    let options = options.clone().with_scales(chapter_scales());
    let twice = prejacent.exh(&options)?.exh(&options)?;

    let u = Universe::from_formula(&twice, &options)?;
    println!("LF: {}", show(&u, &twice));
    diagnose(&u, &twice)?;
    judge(&u, "cumulative reading", &twice, &(prejacent.clone() & &converse))?;
    Ok(())
}

/// "Every nut appealed to the squirrels": recursive Exh below the universal.
fn asymmetry(options: &Options) -> Result<()> {
    let d = options.default_domain();
    let cracked = Pred::new("cracked", ["squirrel", "nut"], [d, d])?;
    let options = options.clone().with_scales(chapter_scales());

    let inner = Quantifier::existential_sub("squirrel", d).scope(&cracked).exh(&options)?.exh(&options)?;
    let lf = Quantifier::universal("nut", d).scope(&inner).exh(&options)?.exh(&options)?;

    let cumulative = Quantifier::universal("nut", d).scope(Quantifier::existential("squirrel", d).scope(&cracked))
        & Quantifier::universal("squirrel", d).scope(Quantifier::existential("nut", d).scope(&cracked));
    let distributive =
        Quantifier::universal("squirrel", d).scope(Quantifier::universal("nut", d).scope(&cracked));

    let u = Universe::from_formula(&lf, &options)?;
    println!("LF: {}", show(&u, &lf));
    diagnose(&u, &lf)?;
    println!("cumulative reading: {}", u.equivalent(&lf, &cumulative)?);
    judge(&u, "doubly distributive reading", &lf, &distributive)?;
    Ok(())
}

/// "The squirrels cracked the nuts", in two steps with hand-built alternatives.
fn ordinary(options: &Options) -> Result<()> {
    let d = options.default_domain();
    let cracked = Pred::new("cracked", ["squirrel", "nut"], [d, d])?;
    let options = options.clone().with_scales(chapter_scales());
    let sub_domains = Substitution::new(Scales::SubDomain).with_sub(options.sub);

    // The squirrels' domain stays fixed while the nuts vary.
    let to_nut = alt(
        &Quantifier::existential("squirrel", d).scope(Quantifier::existential_sub("nut", d).scope(&cracked)),
        &sub_domains,
    );
    let prejacent =
        Quantifier::existential_sub("squirrel", d).scope(Quantifier::existential_sub("nut", d).scope(&cracked));
    let first = exhaustify(&prejacent, &ExhParams::new().with_alts(to_nut), &options)?.exh(&options)?;

    let u = Universe::from_formula(&first, &options)?;
    let every_nut = Quantifier::universal("nut", d).scope(Quantifier::existential_sub("squirrel", d).scope(&cracked));
    println!("first strengthening: {}", show(&u, &first));
    diagnose(&u, &first)?;
    judge(&u, "first strengthening", &first, &every_nut)?;

    let to_squirrel = alt(
        &Quantifier::existential("nut", d).scope(Quantifier::existential_sub("squirrel", d).scope(&cracked)),
        &sub_domains,
    );
    let second = exhaustify(&first, &ExhParams::new().with_extra_alts(to_squirrel), &options)?.exh(&options)?;
    let every_squirrel =
        Quantifier::universal("squirrel", d).scope(Quantifier::existential_sub("nut", d).scope(&cracked));
    diagnose(&u, &second)?;
    judge(&u, "second strengthening", &second, &(every_nut & every_squirrel))?;
    Ok(())
}
