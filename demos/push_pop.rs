use clap::Parser;
use log::info;

use boolean_lp::formula::Formula;
use boolean_lp::solver::{Solver, SolverConfig};
use boolean_lp::term::Term;
use boolean_lp::types::Sort;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Upper bound on `x + y` in the base scope.
    #[arg(value_name = "INT", default_value = "20")]
    total: i64,

    /// Pivot limit per Simplex run.
    #[clap(long, value_name = "INT")]
    pivot_limit: Option<usize>,

    /// Show solver internals.
    #[clap(long)]
    debug: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.debug {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();
    println!("args = {:?}", args);

    let mut solver = Solver::with_config(SolverConfig {
        pivot_limit: args.pivot_limit,
    });
    let x = solver.new_variable("x", Sort::Int);
    let y = solver.new_variable("y", Sort::Int);

    solver.add_assertion(Term::var(x).plus(y).le(args.total)?)?;
    let (result, model) = solver.check(&[x, y])?;
    info!("base: {} {:?}", result, model);

    solver.push();
    solver.add_assertion(Formula::and(
        Formula::lit(Term::var(x).le(5)?),
        Formula::lit(Term::var(y).le(5)?),
    ))?;
    let (result, model) = solver.check(&[x, y])?;
    info!("depth {}: {} {:?}", solver.depth(), result, model);

    solver.push();
    solver.add_assertion(Term::var(x).ge(7)?)?;
    let (result, model) = solver.check(&[x, y])?;
    info!("depth {}: {} {:?}", solver.depth(), result, model);

    solver.pop()?;
    let (result, model) = solver.check(&[x, y])?;
    info!("depth {}: {} {:?}", solver.depth(), result, model);

    solver.pop()?;
    let (result, model) = solver.check(&[x, y])?;
    info!("depth {}: {} {:?}", solver.depth(), result, model);

    println!("stats = {:?}", solver.stats());
    println!("Total time: {:?}", time_total.elapsed());

    Ok(())
}
