// Command handler for: doom

use std::path::{Path, PathBuf};

use mindoo_asp::solver::AspSolver;
use mindoo_engine::pipeline::{run_doom_search, BadSource, DoomOptions};
use mindoo_engine::report::{found_line, DoomReport};
use miette::IntoDiagnostic;

use crate::cli::ToolArgs;
use crate::commands::helpers::{
    bad_source, doom_options, parse_backend, parse_pop_order, with_solver,
};

fn run_with<S: AspSolver>(
    solver: &mut S,
    net: &Path,
    bad: &BadSource,
    options: &DoomOptions,
    json: bool,
) -> miette::Result<DoomReport> {
    let report = run_doom_search(net, bad, options, solver, |index, found| {
        if !json {
            println!("{}", found_line(index, found));
            eprintln!("   doom checks: {}", found.queries);
        }
    })?;
    Ok(report)
}

pub(crate) fn run_doom_command(
    net: PathBuf,
    bad: String,
    bad_file: bool,
    out: PathBuf,
    pop_order: String,
    json: bool,
    tools: ToolArgs,
) -> miette::Result<()> {
    let pop_order = parse_pop_order(&pop_order)?;
    let backend = parse_backend(&tools.backend)?;
    let options = doom_options(out, &tools, pop_order);
    let bad = bad_source(bad, bad_file);

    let report = with_solver!(backend, tools, |solver| {
        run_with(&mut solver, &net, &bad, &options, json)?
    });

    if json {
        println!("{}", report.to_json().into_diagnostic()?);
        return Ok(());
    }
    if report.is_empty() {
        println!("EMPTY MINDOO");
    }
    eprintln!("Total doom checks: {}", report.doom_checks);
    eprintln!("Results written to {}", report.output_dir);
    Ok(())
}
