use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use mindoo_asp::solver::{AspSolver, GroundedSession, Program};
use mindoo_asp::symbol::Symbol;

use crate::errors::EngineError;
use crate::event::Configuration;
use crate::rules::{RuleFile, RuleSet};

/// Doom check over one grounding of the viability rules.
///
/// A configuration is doomed when no viable continuation exists with all
/// of its events forced into the run.
pub struct DoomOracle<G> {
    session: G,
    queries: usize,
}

impl<G: GroundedSession> DoomOracle<G> {
    pub fn new(session: G) -> Self {
        Self {
            session,
            queries: 0,
        }
    }

    /// Ground `viable` rules with the bad facts and Pi_1.
    pub fn ground<S>(solver: &mut S, rules: &RuleSet, bad: &Path, pi1: &Path) -> Result<Self, EngineError>
    where
        S: AspSolver<Session = G>,
    {
        let started = Instant::now();
        let program = Program::new()
            .file(rules.path(RuleFile::Viable))
            .file(bad)
            .file(pi1);
        let session = solver.ground(&program).map_err(EngineError::solver)?;
        info!("grounded doom check in {:.1}s", started.elapsed().as_secs_f64());
        if !session.is_incremental() {
            warn!(
                "this solver backend regrounds Pi_1 on every doom check; \
                 build with `--features native` and pass `--backend native` for one grounding"
            );
        }
        Ok(Self::new(session))
    }

    pub fn is_doomed(&mut self, config: &Configuration) -> Result<bool, EngineError> {
        let atoms: Vec<Symbol> = config.iter().map(|e| e.member_atom()).collect();
        let viable = self.session.assume(&atoms).map_err(EngineError::solver)?;
        self.queries += 1;
        debug!(size = config.len(), doomed = !viable, query = self.queries, "doom check");
        Ok(!viable)
    }

    /// Doom checks answered so far.
    pub fn queries(&self) -> usize {
        self.queries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventId;
    use std::collections::HashSet;
    use std::io;

    /// Satisfiable unless the forbidden event is assumed.
    struct Forbid {
        event: Symbol,
        seen: Vec<usize>,
    }

    impl GroundedSession for Forbid {
        type Error = io::Error;

        fn assume(&mut self, atoms: &[Symbol]) -> Result<bool, io::Error> {
            self.seen.push(atoms.len());
            let unique: HashSet<_> = atoms.iter().collect();
            assert_eq!(unique.len(), atoms.len());
            Ok(!atoms.contains(&self.event))
        }
    }

    fn config(events: &[&str]) -> Configuration {
        events.iter().map(|e| EventId::parse(e).unwrap()).collect()
    }

    #[test]
    fn doomed_iff_assumptions_are_unsatisfiable() {
        let mut oracle = DoomOracle::new(Forbid {
            event: EventId::parse("e1").unwrap().member_atom(),
            seen: Vec::new(),
        });
        assert!(oracle.is_doomed(&config(&["e1", "e2"])).unwrap());
        assert!(!oracle.is_doomed(&config(&["e2"])).unwrap());
        assert!(!oracle.is_doomed(&config(&[])).unwrap());
        assert_eq!(oracle.queries(), 3);
        assert_eq!(oracle.session.seen, vec![2, 1, 0]);
    }

    #[test]
    fn repeated_queries_agree() {
        let mut oracle = DoomOracle::new(Forbid {
            event: EventId::parse("e1").unwrap().member_atom(),
            seen: Vec::new(),
        });
        let c = config(&["e1"]);
        let first = oracle.is_doomed(&c).unwrap();
        assert!(!oracle.is_doomed(&config(&["e3"])).unwrap());
        assert_eq!(oracle.is_doomed(&c).unwrap(), first);
    }
}
