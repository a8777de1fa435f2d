// Command handlers for: markings, reach, dot

use std::path::PathBuf;

use miette::IntoDiagnostic;

use mindoo_engine::dot::prefix_dot;
use mindoo_engine::pipeline::{load_net, MainPrefix};
use mindoo_engine::reach::{prefix_has_marking, reachable_markings};
use mindoo_engine::rules::RuleFile;
use mindoo_engine::search::PopOrder;

use crate::cli::ToolArgs;
use crate::commands::helpers::{bad_source, doom_options, parse_backend, with_solver};

const CONFIGURATION_RULES: [RuleFile; 3] = [
    RuleFile::Configuration,
    RuleFile::AnyConfiguration,
    RuleFile::Cut,
];

pub(crate) fn run_markings_command(
    net: PathBuf,
    out: PathBuf,
    tools: ToolArgs,
) -> miette::Result<()> {
    let backend = parse_backend(&tools.backend)?;
    let options = doom_options(out, &tools, PopOrder::Fifo);
    let (net_path, net) = load_net(&net)?;
    let rules = options.rules();
    rules.require(&CONFIGURATION_RULES)?;

    let prefix = MainPrefix::build(&net_path, &net, &options)?;
    let markings = with_solver!(backend, tools, |solver| {
        reachable_markings(&mut solver, &rules, &prefix.facts)?
    });
    for marking in &markings {
        println!("{marking}");
    }
    eprintln!("{} reachable markings", markings.len());
    Ok(())
}

pub(crate) fn run_reach_command(
    net: PathBuf,
    bad: String,
    bad_file: bool,
    out: PathBuf,
    tools: ToolArgs,
) -> miette::Result<()> {
    let backend = parse_backend(&tools.backend)?;
    let options = doom_options(out, &tools, PopOrder::Fifo);
    let (net_path, net) = load_net(&net)?;
    let bad = bad_source(bad, bad_file).load()?;
    bad.validate(&net)?;
    let rules = options.rules();
    rules.require(&CONFIGURATION_RULES)?;

    let prefix = MainPrefix::build(&net_path, &net, &options)?;
    let reached = with_solver!(backend, tools, |solver| {
        prefix_has_marking(&mut solver, &rules, &prefix.facts, &bad)?
    });
    if reached {
        println!("reachable");
    } else {
        println!("unreachable");
    }
    Ok(())
}

pub(crate) fn run_dot_command(
    net: PathBuf,
    work: PathBuf,
    out: Option<PathBuf>,
    tools: ToolArgs,
) -> miette::Result<()> {
    let backend = parse_backend(&tools.backend)?;
    let options = doom_options(work, &tools, PopOrder::Fifo);
    let (net_path, net) = load_net(&net)?;
    let rules = options.rules();
    rules.require(&[RuleFile::Draw])?;

    let prefix = MainPrefix::build(&net_path, &net, &options)?;
    let dot = with_solver!(backend, tools, |solver| {
        prefix_dot(&mut solver, &rules, &prefix.facts)?
    });
    match out {
        Some(path) => {
            std::fs::write(&path, dot).into_diagnostic()?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{dot}"),
    }
    Ok(())
}
