#![allow(unused_assignments)]

use std::fmt::Display;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use mindoo_asp::decode::DecodeError;
use mindoo_net::errors::{MarkingError, MciError, NetError};

/// Failure of an external tool (unfolder or translator).
#[derive(Debug, Error, Diagnostic)]
pub enum ToolError {
    #[error("Cannot run {tool}: {source}")]
    #[diagnostic(
        code(mindoo::tool::spawn),
        help("check that `{tool}` is installed and on PATH, or pass its location explicitly")
    )]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} failed with status {status}")]
    #[diagnostic(code(mindoo::tool::failed), help("{stderr}"))]
    Failed {
        tool: String,
        status: String,
        stderr: String,
    },
}

#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Net(#[from] NetError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Marking(#[from] MarkingError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Mci(#[from] MciError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Tool(#[from] ToolError),

    #[error("Solver error: {0}")]
    #[diagnostic(code(mindoo::solver))]
    Solver(String),

    #[error("Solver contract violation: {0}")]
    #[diagnostic(
        code(mindoo::contract),
        help("the rule files and the fact translator must agree on the predicate contract")
    )]
    Contract(String),

    #[error("Missing rule file {}", .0.display())]
    #[diagnostic(code(mindoo::rules::missing), help("pass the rules directory with --rules"))]
    MissingRules(PathBuf),

    #[error("Cannot access {path}: {source}")]
    #[diagnostic(code(mindoo::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl EngineError {
    pub fn solver(err: impl Display) -> Self {
        EngineError::Solver(err.to_string())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::Io {
            path: path.into().display().to_string(),
            source,
        }
    }
}

impl From<DecodeError> for EngineError {
    fn from(err: DecodeError) -> Self {
        EngineError::Contract(err.to_string())
    }
}
