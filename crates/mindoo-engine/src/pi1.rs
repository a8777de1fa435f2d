//! Extended prefix Pi_1.
//!
//! Every maximal cut-off-free configuration of the prefix is unfolded
//! again from the marking it reaches; the continuation is glued onto the
//! original prefix wherever its cut-off history matches.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use mindoo_asp::decode::Atom;
use mindoo_asp::facts::{render_facts, rewrite_facts};
use mindoo_asp::solver::{AspSolver, Program, SolveRequest};
use mindoo_asp::symbol::Symbol;
use mindoo_net::marking::Marking;
use mindoo_net::net::Net;

use crate::errors::EngineError;
use crate::event::{Configuration, EventId};
use crate::rules::{RuleFile, RuleSet};
use crate::workspace::PrefixTools;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaximalConfiguration {
    /// Marking reached by the configuration.
    pub marking: Marking,
    pub events: Configuration,
    /// `(condition, place)` pairs of the history cut.
    pub history_cut: Vec<(Symbol, Symbol)>,
}

/// Pairs `(original, matched)`: identifier `matched` of a continuation
/// stands for `original` in the base prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlueBinding {
    pub pairs: Vec<(Symbol, Symbol)>,
}

impl GlueBinding {
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Rewrite `continuation` so matched identifiers become the originals.
    pub fn apply(&self, continuation: &str) -> Result<String, EngineError> {
        let substitution: HashMap<Symbol, Symbol> = self
            .pairs
            .iter()
            .map(|(original, matched)| (matched.clone(), original.clone()))
            .collect();
        rewrite_facts(continuation, &substitution)
            .map_err(|e| EngineError::Contract(format!("unreadable continuation fact: {e}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pi1 {
    /// Base prefix facts followed by every glued continuation.
    pub facts: String,
    pub configurations: usize,
    pub continuations: usize,
}

/// Enumerate the maximal configurations without cut-offs.
pub fn maximal_configurations<S: AspSolver>(
    solver: &mut S,
    rules: &RuleSet,
    prefix: &str,
) -> Result<Vec<MaximalConfiguration>, EngineError> {
    let program = Program::new()
        .text(prefix)
        .file(rules.path(RuleFile::Configuration))
        .file(rules.path(RuleFile::AnyConfiguration))
        .file(rules.path(RuleFile::Cut))
        .show("e", 1)
        .show("ncut", 1)
        .show("hcut", 2);
    let models = solver
        .solve(&SolveRequest::new(program).minimal_enumeration())
        .map_err(EngineError::solver)?;

    let mut configs = Vec::with_capacity(models.len());
    for model in models {
        let mut config = MaximalConfiguration::default();
        for atom in model.decode()? {
            match atom {
                Atom::Event(e) => {
                    config.events.insert(EventId::new(e));
                }
                Atom::NextCut(place) => {
                    config.marking.insert(place);
                }
                Atom::HistoryCut { condition, place } => config.history_cut.push((condition, place)),
                other => {
                    return Err(EngineError::Contract(format!(
                        "unexpected atom in maximal configuration: {other:?}"
                    )))
                }
            }
        }
        config.history_cut.sort();
        config.history_cut.dedup();
        configs.push(config);
    }
    Ok(configs)
}

/// Enumerate every binding of `continuation` onto the history cut.
pub fn find_glue<S: AspSolver>(
    solver: &mut S,
    rules: &RuleSet,
    history_cut: &[(Symbol, Symbol)],
    continuation: &str,
) -> Result<Vec<GlueBinding>, EngineError> {
    let hcut: Vec<Symbol> = history_cut
        .iter()
        .map(|(c, p)| Symbol::function("hcut", vec![c.clone(), p.clone()]))
        .collect();
    let program = Program::new()
        .text(continuation)
        .text(render_facts(&hcut))
        .file(rules.path(RuleFile::FindGlue))
        .show("bind", 2);
    let models = solver
        .solve(&SolveRequest::new(program).models(0))
        .map_err(EngineError::solver)?;

    models
        .iter()
        .map(|model| {
            let mut binding = GlueBinding::default();
            for atom in model.decode()? {
                match atom {
                    Atom::Bind { original, matched } => binding.pairs.push((original, matched)),
                    other => {
                        return Err(EngineError::Contract(format!(
                            "unexpected atom in glue binding: {other:?}"
                        )))
                    }
                }
            }
            Ok(binding)
        })
        .collect()
}

/// Build Pi_1 over `prefix`. The initial marking of `net` is restored
/// before returning, also on error.
pub fn extend<S, T>(
    solver: &mut S,
    tools: &mut T,
    rules: &RuleSet,
    net: &mut Net,
    prefix: &str,
) -> Result<Pi1, EngineError>
where
    S: AspSolver,
    T: PrefixTools,
{
    let initial = net.initial_marking();
    let result = extend_from(solver, tools, rules, net, prefix);
    net.set_marking(initial.iter());
    result
}

fn extend_from<S: AspSolver, T: PrefixTools>(
    solver: &mut S,
    tools: &mut T,
    rules: &RuleSet,
    net: &mut Net,
    prefix: &str,
) -> Result<Pi1, EngineError> {
    let configs = maximal_configurations(solver, rules, prefix)?;
    info!(count = configs.len(), "maximal configurations without cut-offs");

    let mut facts = prefix.to_string();
    if !facts.is_empty() && !facts.ends_with('\n') {
        facts.push('\n');
    }
    let mut continuations = 0;

    for (i, config) in configs.iter().enumerate() {
        net.set_marking(config.marking.iter());
        let namespace = format!("w{i}");
        let continuation = tools.continuation(net, &namespace)?;
        debug!(%namespace, marking = %config.marking, "continuation prefix built");

        // One namespace carries one glued copy: a second binding would
        // share the unmatched events of the first.
        let bindings = find_glue(solver, rules, &config.history_cut, &continuation)?;
        let found = bindings.len();
        let Some(binding) = bindings.into_iter().find(|b| !b.is_empty()) else {
            warn!(%namespace, bindings = found, "no non-empty glue binding, continuation dropped");
            continue;
        };
        if found > 1 {
            debug!(%namespace, bindings = found, "gluing the first non-empty binding");
        }
        facts.push_str(&binding.apply(&continuation)?);
        continuations += 1;
    }

    info!(continuations, "Pi_1 extended");
    Ok(Pi1 {
        facts,
        configurations: configs.len(),
        continuations,
    })
}
