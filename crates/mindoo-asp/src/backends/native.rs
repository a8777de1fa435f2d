//! In-process clingo: one grounding per session, queries as solve-call
//! assumptions.

use std::collections::HashMap;

use clingo::{control, Control, Part, ShowType, SolveMode, SolveResult, SolverLiteral};
use thiserror::Error;
use tracing::debug;

use crate::solver::{AspSolver, GroundedSession, Model, Program, ProgramPart, SolveRequest};
use crate::symbol::{Symbol, SymbolError};

#[derive(Debug, Error)]
pub enum NativeError {
    #[error("clingo: {0}")]
    Clingo(#[from] clingo::ClingoError),
    #[error("clingo printed an unreadable atom: {0}")]
    Symbol(#[from] SymbolError),
    #[error("assumption {0} does not occur in the grounded program")]
    UnknownAssumption(String),
    #[error("solver session was lost after a failed query")]
    SessionLost,
}

/// Predicate whose ground atoms may be assumed in a session.
const ASSUMABLE: &str = "member";

#[derive(Debug, Clone)]
pub struct NativeClingo {
    base_args: Vec<String>,
}

impl Default for NativeClingo {
    fn default() -> Self {
        Self {
            base_args: vec!["-W".to_string(), "none".to_string()],
        }
    }
}

impl NativeClingo {
    pub fn new() -> Self {
        Self::default()
    }

    fn grounded(&self, program: &Program, extra: &[String]) -> Result<Control, NativeError> {
        let mut args = self.base_args.clone();
        args.extend(extra.iter().cloned());
        let mut ctl = control(args)?;
        for part in program.parts() {
            match part {
                ProgramPart::File(path) => ctl.load(&path.display().to_string())?,
                ProgramPart::Text(text) => ctl.add("base", &[], text)?,
            }
        }
        let shows = program.show_directives();
        if !shows.is_empty() {
            ctl.add("base", &[], &shows)?;
        }
        let base = Part::new("base", vec![])?;
        ctl.ground(&[base])?;
        Ok(ctl)
    }
}

fn convert(symbol: &clingo::Symbol) -> Result<Symbol, NativeError> {
    Ok(Symbol::parse(&symbol.to_string())?)
}

impl AspSolver for NativeClingo {
    type Error = NativeError;
    type Session = NativeSession;

    fn solve(&mut self, request: &SolveRequest) -> Result<Vec<Model>, NativeError> {
        let mut extra = vec![request.models.to_string()];
        extra.extend(request.options.iter().cloned());
        let ctl = self.grounded(&request.program, &extra)?;

        let mut handle = ctl.solve(SolveMode::YIELD, &[])?;
        let mut models = Vec::new();
        loop {
            handle.resume()?;
            let Some(model) = handle.model()? else { break };
            let atoms = model
                .symbols(ShowType::SHOWN)?
                .iter()
                .map(convert)
                .collect::<Result<Vec<_>, _>>()?;
            models.push(Model::new(atoms));
        }
        handle.close()?;
        Ok(models)
    }

    fn ground(&mut self, program: &Program) -> Result<NativeSession, NativeError> {
        let ctl = self.grounded(program, &[])?;
        let mut literals = HashMap::new();
        for atom in ctl.symbolic_atoms()?.iter()? {
            let symbol = atom.symbol()?;
            if symbol.name()? == ASSUMABLE {
                literals.insert(convert(&symbol)?, atom.literal()?);
            }
        }
        debug!(assumable = literals.len(), "grounded doom session");
        Ok(NativeSession {
            control: Some(ctl),
            literals,
        })
    }
}

/// One grounding; assumptions are passed to each solve call and vanish
/// with it.
pub struct NativeSession {
    control: Option<Control>,
    literals: HashMap<Symbol, SolverLiteral>,
}

impl GroundedSession for NativeSession {
    type Error = NativeError;

    fn assume(&mut self, atoms: &[Symbol]) -> Result<bool, NativeError> {
        let assumptions = atoms
            .iter()
            .map(|atom| {
                self.literals
                    .get(atom)
                    .copied()
                    .ok_or_else(|| NativeError::UnknownAssumption(atom.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let ctl = self.control.take().ok_or(NativeError::SessionLost)?;
        let mut handle = ctl.solve(SolveMode::empty(), &assumptions)?;
        let result = handle.get()?;
        self.control = Some(handle.close()?);
        Ok(result.contains(SolveResult::SATISFIABLE))
    }
}
