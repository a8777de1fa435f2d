//! CLI argument definitions: top-level `Cli` struct and `Commands` enum.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub(crate) const CLI_LONG_ABOUT: &str =
    "Minimal doomed configurations of Petri nets, computed over unfolding prefixes.\n\n\
    Typical session:\n  \
    1. mindoo markings net.ll\n  \
    2. mindoo reach net.ll p3,p4\n  \
    3. mindoo doom net.ll p3,p4\n\n\
    The unfolder, the fact translator and clingo are external programs; the\n\
    rule files are read from --rules.";

#[derive(Parser)]
#[command(name = "mindoo")]
#[command(about = "Minimal doomed configurations of Petri nets")]
#[command(long_about = CLI_LONG_ABOUT)]
#[command(version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,
}

/// External programs and rule files shared by every subcommand.
#[derive(Args, Clone, Debug)]
pub(crate) struct ToolArgs {
    /// Directory holding the rule files
    #[arg(long, default_value = "rules")]
    pub(crate) rules: PathBuf,

    /// Unfolder command
    #[arg(long, default_value = "ecofolder")]
    pub(crate) unfolder: String,

    /// Fact translator command
    #[arg(long, default_value = "mci2asp")]
    pub(crate) translator: String,

    /// clingo executable (process backend)
    #[arg(long, default_value = "clingo")]
    pub(crate) clingo: String,

    /// Solver backend: process | native
    #[arg(long, default_value = "process")]
    pub(crate) backend: String,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Enumerate the minimal doomed configurations
    Doom {
        /// Net file (.ll_net or .ll; the extension may be omitted)
        net: PathBuf,

        /// Bad marking as comma-separated places, or a file with --bad-file
        bad: String,

        /// Read the bad marking from the BAD file (exactly one non-empty line)
        #[arg(long)]
        bad_file: bool,

        /// Root of the output directory
        #[arg(long, default_value = "gen")]
        out: PathBuf,

        /// Worklist pop order: fifo | lifo
        #[arg(long, default_value = "fifo")]
        pop_order: String,

        /// Print the JSON report instead of one line per result
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        tools: ToolArgs,
    },

    /// List the markings reached by configurations of the prefix
    Markings {
        net: PathBuf,

        #[arg(long, default_value = "gen")]
        out: PathBuf,

        #[command(flatten)]
        tools: ToolArgs,
    },

    /// Check whether a bad marking is reachable
    Reach {
        net: PathBuf,

        bad: String,

        #[arg(long)]
        bad_file: bool,

        #[arg(long, default_value = "gen")]
        out: PathBuf,

        #[command(flatten)]
        tools: ToolArgs,
    },

    /// Draw the prefix as Graphviz DOT (needs draw.asp)
    Dot {
        net: PathBuf,

        /// Root of the working directory
        #[arg(long, default_value = "gen")]
        work: PathBuf,

        /// Write the drawing here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        #[command(flatten)]
        tools: ToolArgs,
    },
}
