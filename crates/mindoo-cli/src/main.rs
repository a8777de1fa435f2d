#![doc = include_str!("../README.md")]

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Doom {
            net,
            bad,
            bad_file,
            out,
            pop_order,
            json,
            tools,
        } => {
            commands::doom::run_doom_command(net, bad, bad_file, out, pop_order, json, tools)?;
        }
        Commands::Markings { net, out, tools } => {
            commands::explore::run_markings_command(net, out, tools)?;
        }
        Commands::Reach {
            net,
            bad,
            bad_file,
            out,
            tools,
        } => {
            commands::explore::run_reach_command(net, bad, bad_file, out, tools)?;
        }
        Commands::Dot {
            net,
            work,
            out,
            tools,
        } => {
            commands::explore::run_dot_command(net, work, out, tools)?;
        }
    }

    Ok(())
}
