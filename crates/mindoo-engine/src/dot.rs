use std::fmt::Write as _;

use mindoo_asp::decode::Atom;
use mindoo_asp::solver::{AspSolver, Program, SolveRequest};
use mindoo_asp::symbol::Symbol;

use crate::errors::EngineError;
use crate::rules::{RuleFile, RuleSet};

fn node_id(symbol: &Symbol) -> String {
    symbol
        .as_name()
        .unwrap_or_else(|| symbol.to_string())
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
}

/// Graphviz text for `draw/2` edges and `label/2` nodes. Event nodes
/// (ids starting with `e`) are boxes.
pub fn render_dot(atoms: &[Atom]) -> Result<String, EngineError> {
    let mut dot = String::from("digraph G {\n");
    for atom in atoms {
        match atom {
            Atom::Draw { from, to } => {
                let _ = writeln!(dot, "  \"{}\" -> \"{}\";", node_id(from), node_id(to));
            }
            Atom::Label { node, text } => {
                let id = node_id(node);
                let shape = if id.starts_with('e') { "box" } else { "none" };
                let _ = writeln!(
                    dot,
                    "  \"{id}\" [label=\"{}\" shape={shape}];",
                    text.replace('"', "\\\"")
                );
            }
            other => {
                return Err(EngineError::Contract(format!(
                    "unexpected atom in drawing: {other:?}"
                )))
            }
        }
    }
    dot.push_str("}\n");
    Ok(dot)
}

/// Draw the prefix with the `draw` rules.
pub fn prefix_dot<S: AspSolver>(
    solver: &mut S,
    rules: &RuleSet,
    prefix: &str,
) -> Result<String, EngineError> {
    rules.require(&[RuleFile::Draw])?;
    let program = Program::new()
        .text(prefix)
        .file(rules.path(RuleFile::Draw))
        .show("draw", 2)
        .show("label", 2);
    let models = solver
        .solve(&SolveRequest::new(program))
        .map_err(EngineError::solver)?;
    let Some(model) = models.first() else {
        return Err(EngineError::Contract("drawing query has no answer".to_string()));
    };
    render_dot(&model.decode()?)
}
