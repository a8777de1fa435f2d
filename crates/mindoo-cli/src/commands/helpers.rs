// Shared helpers for the CLI command handlers: string arguments to typed
// options, and the solver backend switch.

use std::path::PathBuf;

use mindoo_engine::pipeline::{BadSource, DoomOptions};
use mindoo_engine::search::PopOrder;
use mindoo_engine::workspace::Toolchain;

use crate::cli::ToolArgs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Backend {
    Process,
    #[cfg(feature = "native")]
    Native,
}

pub(crate) fn parse_backend(raw: &str) -> miette::Result<Backend> {
    match raw {
        "process" => Ok(Backend::Process),
        #[cfg(feature = "native")]
        "native" => Ok(Backend::Native),
        #[cfg(not(feature = "native"))]
        "native" => miette::bail!("this build has no native solver; rebuild with --features native"),
        other => miette::bail!("Unknown backend: {other}. Use 'process' or 'native'."),
    }
}

pub(crate) fn parse_pop_order(raw: &str) -> miette::Result<PopOrder> {
    match raw {
        "fifo" => Ok(PopOrder::Fifo),
        "lifo" => Ok(PopOrder::Lifo),
        other => miette::bail!("Unknown pop order: {other}. Use 'fifo' or 'lifo'."),
    }
}

pub(crate) fn bad_source(bad: String, bad_file: bool) -> BadSource {
    if bad_file {
        BadSource::File(PathBuf::from(bad))
    } else {
        BadSource::Spec(bad)
    }
}

pub(crate) fn doom_options(out: PathBuf, tools: &ToolArgs, pop_order: PopOrder) -> DoomOptions {
    DoomOptions {
        out_root: out,
        rules_dir: tools.rules.clone(),
        toolchain: Toolchain {
            unfolder: tools.unfolder.clone(),
            translator: tools.translator.clone(),
        },
        pop_order,
    }
}

/// Run `$body` with `$solver` bound to an instance of `$backend`.
macro_rules! with_solver {
    ($backend:expr, $tools:expr, |$solver:ident| $body:expr) => {{
        match $backend {
            $crate::commands::helpers::Backend::Process => {
                let mut $solver =
                    mindoo_asp::backends::clingo_process::ClingoProcess::with_command(&$tools.clingo);
                $body
            }
            #[cfg(feature = "native")]
            $crate::commands::helpers::Backend::Native => {
                let mut $solver = mindoo_asp::backends::native::NativeClingo::new();
                $body
            }
        }
    }};
}

pub(crate) use with_solver;
