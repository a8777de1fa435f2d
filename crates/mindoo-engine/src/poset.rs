//! Causal order over the events of one prefix.

use std::collections::{BTreeSet, HashMap};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use tracing::info;

use mindoo_asp::decode::Atom;
use mindoo_asp::solver::{AspSolver, Program, SolveRequest};

use crate::errors::EngineError;
use crate::event::{Configuration, EventId};
use crate::rules::{RuleFile, RuleSet};

/// Event poset of a prefix.
///
/// An edge `u -> v` means `u` causally precedes `v`; sinks of a
/// configuration's induced subgraph are its causally maximal events.
#[derive(Debug, Clone, Default)]
pub struct EventPoset {
    graph: DiGraph<EventId, ()>,
    nodes: HashMap<EventId, NodeIndex>,
    unchallenged: BTreeSet<EventId>,
    transitions: HashMap<EventId, String>,
}

impl EventPoset {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, event: &EventId) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(event) {
            return idx;
        }
        let idx = self.graph.add_node(event.clone());
        self.nodes.insert(event.clone(), idx);
        idx
    }

    pub fn add_event(&mut self, event: EventId, transition: impl Into<String>) {
        self.node(&event);
        self.transitions.insert(event, transition.into());
    }

    pub fn add_order(&mut self, before: &EventId, after: &EventId) {
        let u = self.node(before);
        let v = self.node(after);
        self.graph.update_edge(u, v, ());
    }

    pub fn mark_unchallenged(&mut self, event: EventId) {
        self.node(&event);
        self.unchallenged.insert(event);
    }

    /// Build from a decoded `get_event_poset` answer.
    pub fn from_atoms(atoms: &[Atom]) -> Result<Self, EngineError> {
        let mut poset = Self::new();
        for atom in atoms {
            match atom {
                Atom::Greater { before, after } => {
                    poset.add_order(&EventId::new(before.clone()), &EventId::new(after.clone()))
                }
                Atom::Unchallenged(event) => poset.mark_unchallenged(EventId::new(event.clone())),
                Atom::EventTransition { event, transition } => {
                    poset.add_event(EventId::new(event.clone()), transition.clone())
                }
                other => {
                    return Err(EngineError::Contract(format!(
                        "unexpected atom in event poset answer: {other:?}"
                    )))
                }
            }
        }
        Ok(poset)
    }

    /// Run the poset query over `prefix` facts.
    pub fn extract<S: AspSolver>(
        solver: &mut S,
        rules: &RuleSet,
        prefix: &str,
    ) -> Result<Self, EngineError> {
        let program = Program::new()
            .text(prefix)
            .file(rules.path(RuleFile::EventPoset))
            .show("greater", 2)
            .show("unchallenged", 1)
            .show("e2tr", 2);
        let models = solver
            .solve(&SolveRequest::new(program))
            .map_err(EngineError::solver)?;
        let Some(model) = models.first() else {
            return Err(EngineError::Contract(
                "event poset query has no answer".to_string(),
            ));
        };
        let poset = Self::from_atoms(&model.decode()?)?;
        info!(
            events = poset.len(),
            unchallenged = poset.unchallenged.len(),
            "event poset built"
        );
        Ok(poset)
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn events(&self) -> impl Iterator<Item = &EventId> {
        self.graph.node_weights()
    }

    pub fn unchallenged(&self) -> &BTreeSet<EventId> {
        &self.unchallenged
    }

    pub fn is_unchallenged(&self, event: &EventId) -> bool {
        self.unchallenged.contains(event)
    }

    pub fn transition(&self, event: &EventId) -> Option<&str> {
        self.transitions.get(event).map(String::as_str)
    }

    fn neighbors_within<'a>(
        &'a self,
        event: &EventId,
        set: &'a Configuration,
        dir: Direction,
    ) -> impl Iterator<Item = &'a EventId> + 'a {
        self.nodes
            .get(event)
            .into_iter()
            .flat_map(move |&idx| self.graph.neighbors_directed(idx, dir))
            .map(move |n| &self.graph[n])
            .filter(move |e| set.contains(*e))
    }

    /// Direct successors of `event` that belong to `set`.
    pub fn successors_within<'a>(
        &'a self,
        event: &EventId,
        set: &'a Configuration,
    ) -> impl Iterator<Item = &'a EventId> + 'a {
        self.neighbors_within(event, set, Direction::Outgoing)
    }

    /// Direct predecessors of `event` that belong to `set`.
    pub fn predecessors_within<'a>(
        &'a self,
        event: &EventId,
        set: &'a Configuration,
    ) -> impl Iterator<Item = &'a EventId> + 'a {
        self.neighbors_within(event, set, Direction::Incoming)
    }

    /// Causally maximal events of `set`.
    pub fn crest(&self, set: &Configuration) -> Configuration {
        set.iter()
            .filter(|e| self.successors_within(e, set).next().is_none())
            .cloned()
            .collect()
    }
}
