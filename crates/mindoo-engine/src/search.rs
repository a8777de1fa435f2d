//! Worklist fixpoint enumerating minimal doomed configurations.

use std::collections::{HashSet, VecDeque};
use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use mindoo_asp::decode::Atom;
use mindoo_asp::solver::{AspSolver, GroundedSession, Program, SolveRequest};

use crate::errors::EngineError;
use crate::event::{Configuration, EventId};
use crate::oracle::DoomOracle;
use crate::poset::EventPoset;
use crate::rules::{RuleFile, RuleSet};
use crate::shave::{reduce, Shaved};

/// Which end of the worklist is popped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopOrder {
    #[default]
    Fifo,
    Lifo,
}

/// One minimal doomed configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinimalDoomed {
    pub events: Vec<EventId>,
    /// Transitions exercised by the events, sorted and deduplicated.
    pub transitions: Vec<String>,
    /// Time since the search started; the clock starts before the oracle
    /// is grounded.
    pub elapsed: Duration,
    /// Doom checks answered when it was found.
    pub queries: usize,
}

/// Pending shaved configurations and the configurations already examined.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    worklist: VecDeque<Shaved>,
    known: HashSet<Configuration>,
    order: PopOrder,
}

impl SearchState {
    pub fn new(order: PopOrder) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    pub fn push(&mut self, item: Shaved) {
        self.worklist.push_back(item);
    }

    pub fn pop(&mut self) -> Option<Shaved> {
        match self.order {
            PopOrder::Fifo => self.worklist.pop_front(),
            PopOrder::Lifo => self.worklist.pop_back(),
        }
    }

    /// Record `config` as examined; false when it already was.
    pub fn mark_known(&mut self, config: &Configuration) -> bool {
        self.known.insert(config.clone())
    }

    pub fn pending(&self) -> usize {
        self.worklist.len()
    }

    pub fn known(&self) -> usize {
        self.known.len()
    }
}

/// Minimal configurations reaching a bad marking (the search seeds).
pub fn minimal_bad_configurations<S: AspSolver>(
    solver: &mut S,
    rules: &RuleSet,
    prefix: &str,
    bad: &Path,
) -> Result<Vec<Configuration>, EngineError> {
    let program = Program::new()
        .text(prefix)
        .file(bad)
        .file(rules.path(RuleFile::MinimalBad))
        .show("e", 1);
    let models = solver
        .solve(&SolveRequest::new(program).minimal_enumeration())
        .map_err(EngineError::solver)?;

    models
        .iter()
        .map(|model| {
            model
                .decode()?
                .into_iter()
                .map(|atom| match atom {
                    Atom::Event(e) => Ok(EventId::new(e)),
                    other => Err(EngineError::Contract(format!(
                        "unexpected atom in minimal bad configuration: {other:?}"
                    ))),
                })
                .collect()
        })
        .collect()
}

/// Shave each seed and queue it.
pub fn seed(state: &mut SearchState, poset: &EventPoset, seeds: &[Configuration]) {
    for config in seeds {
        let shaved = reduce(poset, config);
        debug!(seed = config.len(), kept = shaved.keep.len(), "seed shaved");
        state.push(shaved);
    }
}

/// Drain `state`, calling `on_found` as each minimal doomed configuration
/// is found. The returned list is sorted by events.
pub fn run<G, F>(
    poset: &EventPoset,
    oracle: &mut DoomOracle<G>,
    state: &mut SearchState,
    started: Instant,
    mut on_found: F,
) -> Result<Vec<MinimalDoomed>, EngineError>
where
    G: GroundedSession,
    F: FnMut(&MinimalDoomed),
{
    let mut found = Vec::new();

    while let Some(Shaved { keep, crest }) = state.pop() {
        if !state.mark_known(&keep) {
            continue;
        }

        // A doomed smaller form is queued and disqualifies `keep`.
        let mut handle = |candidate: &Configuration| -> Result<bool, EngineError> {
            if oracle.is_doomed(candidate)? {
                state.push(reduce(poset, candidate));
                return Ok(false);
            }
            Ok(true)
        };

        let core: Configuration = keep.difference(&crest).cloned().collect();
        let mut minimal = handle(&core)?;
        if minimal {
            for e in &crest {
                let mut smaller = keep.clone();
                smaller.remove(e);
                minimal &= handle(&smaller)?;
            }
        }
        if !minimal {
            continue;
        }

        let result = describe(poset, keep, started.elapsed(), oracle.queries())?;
        info!(
            index = found.len() + 1,
            events = result.events.len(),
            "minimal doomed configuration"
        );
        on_found(&result);
        found.push(result);
    }

    found.sort_by(|a, b| a.events.cmp(&b.events));
    Ok(found)
}

fn describe(
    poset: &EventPoset,
    keep: Configuration,
    elapsed: Duration,
    queries: usize,
) -> Result<MinimalDoomed, EngineError> {
    let mut transitions = keep
        .iter()
        .map(|e| {
            poset
                .transition(e)
                .map(str::to_string)
                .ok_or_else(|| EngineError::Contract(format!("event {e} has no e2tr label")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    transitions.sort();
    transitions.dedup();
    Ok(MinimalDoomed {
        events: keep.into_iter().collect(),
        transitions,
        elapsed,
        queries,
    })
}
