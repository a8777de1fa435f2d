//! Marking queries over the configurations of a prefix.

use std::fmt::Write as _;

use mindoo_asp::decode::Atom;
use mindoo_asp::solver::{AspSolver, Program, SolveRequest};
use mindoo_asp::symbol::Symbol;
use mindoo_net::marking::{BadMarkings, Marking};

use crate::errors::EngineError;
use crate::rules::{RuleFile, RuleSet};

const MARKING_MATCH: &str = "\
bad(I) :- q(I,_), ncut(P), not q(I,P).
bad(I) :- not ncut(P), q(I,P).
ok :- q(I,_), not bad(I).
:- not ok.
";

fn configurations(rules: &RuleSet, prefix: &str) -> Program {
    Program::new()
        .text(prefix)
        .file(rules.path(RuleFile::Configuration))
        .file(rules.path(RuleFile::AnyConfiguration))
        .file(rules.path(RuleFile::Cut))
}

/// Every marking reached by some configuration of the prefix.
pub fn reachable_markings<S: AspSolver>(
    solver: &mut S,
    rules: &RuleSet,
    prefix: &str,
) -> Result<Vec<Marking>, EngineError> {
    let program = configurations(rules, prefix).show("ncut", 1);
    let models = solver
        .solve(&SolveRequest::new(program).projected())
        .map_err(EngineError::solver)?;

    let mut markings = models
        .iter()
        .map(|model| {
            model
                .decode()?
                .into_iter()
                .map(|atom| match atom {
                    Atom::NextCut(place) => Ok(place),
                    other => Err(EngineError::Contract(format!(
                        "unexpected atom in marking answer: {other:?}"
                    ))),
                })
                .collect::<Result<Marking, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    markings.sort();
    markings.dedup();
    Ok(markings)
}

/// Whether some configuration reaches exactly one of `bad`.
pub fn prefix_has_marking<S: AspSolver>(
    solver: &mut S,
    rules: &RuleSet,
    prefix: &str,
    bad: &BadMarkings,
) -> Result<bool, EngineError> {
    let mut queries = String::new();
    for (i, marking) in bad.markings().enumerate() {
        for place in marking.iter() {
            let fact = Symbol::function(
                "q",
                vec![Symbol::number(i as i64), Symbol::string(place)],
            );
            let _ = writeln!(queries, "{fact}.");
        }
    }
    let program = configurations(rules, prefix)
        .text(queries)
        .text(MARKING_MATCH)
        .hide_all();
    let models = solver
        .solve(&SolveRequest::new(program))
        .map_err(EngineError::solver)?;
    Ok(!models.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindoo_asp::solver::{GroundedSession, Model};
    use std::io;

    struct Canned {
        models: Vec<Model>,
        last_input: String,
    }

    struct NoSession;

    impl GroundedSession for NoSession {
        type Error = io::Error;

        fn assume(&mut self, _atoms: &[Symbol]) -> Result<bool, io::Error> {
            Ok(true)
        }
    }

    impl AspSolver for Canned {
        type Error = io::Error;
        type Session = NoSession;

        fn solve(&mut self, request: &SolveRequest) -> Result<Vec<Model>, io::Error> {
            self.last_input = request.program.inline_text();
            Ok(self.models.clone())
        }

        fn ground(&mut self, _program: &Program) -> Result<NoSession, io::Error> {
            Ok(NoSession)
        }
    }

    fn model(atoms: &[&str]) -> Model {
        Model::new(atoms.iter().map(|a| Symbol::parse(a).unwrap()).collect())
    }

    #[test]
    fn markings_are_sorted_and_deduplicated() {
        let mut solver = Canned {
            models: vec![
                model(&["ncut(\"p1\")"]),
                model(&["ncut(\"p0\")"]),
                model(&["ncut(p1)"]),
            ],
            last_input: String::new(),
        };
        let markings = reachable_markings(&mut solver, &RuleSet::new("r"), "e(e1).").unwrap();
        let shown: Vec<String> = markings.iter().map(|m| m.to_string()).collect();
        assert_eq!(shown, vec!["p0", "p1"]);
        assert!(solver.last_input.contains("#show ncut/1."));
    }

    #[test]
    fn marking_query_encodes_each_bad_marking() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, "p1\np0,p2\n").unwrap();
        let bad = BadMarkings::from_file(&path).unwrap();
        let mut solver = Canned {
            models: Vec::new(),
            last_input: String::new(),
        };
        let reached = prefix_has_marking(&mut solver, &RuleSet::new("r"), "", &bad).unwrap();
        assert!(!reached);
        assert!(solver.last_input.contains("q(0,\"p1\").\nq(1,\"p0\").\nq(1,\"p2\").\n"));
        assert!(solver.last_input.contains(":- not ok."));

        solver.models = vec![Model::default()];
        assert!(prefix_has_marking(&mut solver, &RuleSet::new("r"), "", &bad).unwrap());
    }

    #[test]
    fn foreign_atoms_in_marking_answer_are_rejected() {
        let mut solver = Canned {
            models: vec![model(&["e(e1)"])],
            last_input: String::new(),
        };
        assert!(matches!(
            reachable_markings(&mut solver, &RuleSet::new("r"), ""),
            Err(EngineError::Contract(_))
        ));
    }
}
