use std::io::Write;
use std::process::{Command, Stdio};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::facts::render_facts;
use crate::solver::{AspSolver, GroundedSession, Model, Program, SolveRequest};
use crate::symbol::{Symbol, SymbolError};

#[derive(Debug, Error)]
pub enum ClingoError {
    #[error("clingo I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("clingo not found: {0}")]
    NotFound(String),
    #[error("clingo exited with status {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("Failed to parse clingo output: {0}")]
    Parse(String),
    #[error("clingo printed an unreadable atom: {0}")]
    Symbol(#[from] SymbolError),
}

/// Exit codes clingo uses to report a finished search.
const NORMAL_EXIT_CODES: [i32; 4] = [0, 10, 20, 30];

/// The `clingo` executable, one process per solve call.
#[derive(Debug, Clone)]
pub struct ClingoProcess {
    command: String,
    base_args: Vec<String>,
}

impl Default for ClingoProcess {
    fn default() -> Self {
        Self::with_command("clingo")
    }
}

impl ClingoProcess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_command(cmd: &str) -> Self {
        Self {
            command: cmd.to_string(),
            base_args: vec!["-W".to_string(), "none".to_string()],
        }
    }

    /// Replace the arguments passed to every call (warning flags by default).
    pub fn with_base_args(mut self, args: Vec<String>) -> Self {
        self.base_args = args;
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn arguments(&self, request: &SolveRequest) -> Vec<String> {
        let mut args = self.base_args.clone();
        args.extend(request.options.iter().cloned());
        args.push("--outf=2".to_string());
        args.push(request.models.to_string());
        args.extend(
            request
                .program
                .files()
                .map(|path| path.display().to_string()),
        );
        args.push("-".to_string());
        args
    }

    fn run(&self, request: &SolveRequest) -> Result<String, ClingoError> {
        let args = self.arguments(request);
        debug!(command = %self.command, ?args, "running clingo");

        let mut child = Command::new(&self.command)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ClingoError::NotFound(format!("{}: {e}", self.command)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ClingoError::Parse("failed to capture clingo stdin".into()))?;
        let input = request.program.inline_text();
        let writer = std::thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output()?;
        let written = writer
            .join()
            .map_err(|_| ClingoError::Parse("stdin writer panicked".into()))?;

        // A failed run usually breaks the pipe too; report the exit status first.
        let code = output.status.code();
        if !code.is_some_and(|c| NORMAL_EXIT_CODES.contains(&c)) {
            return Err(ClingoError::Failed {
                status: code.map_or_else(|| "signal".to_string(), |c| c.to_string()),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written?;
        String::from_utf8(output.stdout).map_err(|e| ClingoError::Parse(e.to_string()))
    }
}

impl AspSolver for ClingoProcess {
    type Error = ClingoError;
    type Session = ClingoReplaySession;

    fn solve(&mut self, request: &SolveRequest) -> Result<Vec<Model>, ClingoError> {
        let stdout = self.run(request)?;
        parse_report(&stdout)
    }

    fn ground(&mut self, program: &Program) -> Result<ClingoReplaySession, ClingoError> {
        Ok(ClingoReplaySession {
            solver: self.clone(),
            program: program.clone(),
        })
    }
}

/// Session over the executable: every query re-runs the program with the
/// assumptions added as facts, so nothing survives between queries.
#[derive(Debug, Clone)]
pub struct ClingoReplaySession {
    solver: ClingoProcess,
    program: Program,
}

impl GroundedSession for ClingoReplaySession {
    type Error = ClingoError;

    fn assume(&mut self, atoms: &[Symbol]) -> Result<bool, ClingoError> {
        let program = self.program.clone().text(render_facts(atoms)).hide_all();
        let models = self.solver.solve(&SolveRequest::new(program).models(1))?;
        Ok(!models.is_empty())
    }

    fn is_incremental(&self) -> bool {
        false
    }
}

#[derive(Debug, Deserialize)]
struct Report {
    #[serde(rename = "Result")]
    result: String,
    #[serde(rename = "Call", default)]
    calls: Vec<Call>,
}

#[derive(Debug, Deserialize)]
struct Call {
    #[serde(rename = "Witnesses", default)]
    witnesses: Vec<Witness>,
}

#[derive(Debug, Deserialize)]
struct Witness {
    #[serde(rename = "Value", default)]
    value: Vec<String>,
}

/// Models of a clingo `--outf=2` report, in output order.
pub fn parse_report(json: &str) -> Result<Vec<Model>, ClingoError> {
    let report: Report =
        serde_json::from_str(json).map_err(|e| ClingoError::Parse(e.to_string()))?;
    if report.result == "UNKNOWN" {
        return Err(ClingoError::Parse(
            "clingo stopped before deciding satisfiability".into(),
        ));
    }
    let mut models = Vec::new();
    for call in report.calls {
        for witness in call.witnesses {
            let atoms = witness
                .value
                .iter()
                .map(|atom| Symbol::parse(atom))
                .collect::<Result<Vec<_>, _>>()?;
            models.push(Model::new(atoms));
        }
    }
    Ok(models)
}
