use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::decode::{decode_model, Atom, DecodeError};
use crate::symbol::Symbol;

/// One input of a logic program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramPart {
    /// Rule file loaded by path.
    File(PathBuf),
    /// Inline program text (facts or rules).
    Text(String),
}

/// An ordered logic program plus the signatures to show.
///
/// When at least one signature is listed, every other atom is hidden, so
/// answers only ever carry atoms the caller can decode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    parts: Vec<ProgramPart>,
    shows: Vec<(String, usize)>,
    hide_all: bool,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.parts.push(ProgramPart::File(path.as_ref().to_path_buf()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(ProgramPart::Text(text.into()));
        self
    }

    pub fn show(mut self, name: &str, arity: usize) -> Self {
        self.shows.push((name.to_string(), arity));
        self
    }

    /// Hide every atom; useful for pure satisfiability queries.
    pub fn hide_all(mut self) -> Self {
        self.hide_all = true;
        self
    }

    pub fn parts(&self) -> &[ProgramPart] {
        &self.parts
    }

    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.parts.iter().filter_map(|part| match part {
            ProgramPart::File(path) => Some(path.as_path()),
            ProgramPart::Text(_) => None,
        })
    }

    /// Inline text parts in order, followed by the show directives.
    pub fn inline_text(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            if let ProgramPart::Text(text) = part {
                out.push_str(text);
                if !text.ends_with('\n') {
                    out.push('\n');
                }
            }
        }
        out.push_str(&self.show_directives());
        out
    }

    pub fn show_directives(&self) -> String {
        let mut out = String::new();
        if self.hide_all || !self.shows.is_empty() {
            out.push_str("#show.\n");
        }
        for (name, arity) in &self.shows {
            let _ = writeln!(out, "#show {name}/{arity}.");
        }
        out
    }
}

/// A solve call: program, model limit and solver options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveRequest {
    pub program: Program,
    /// Number of models to compute; `0` enumerates all of them.
    pub models: usize,
    /// Extra options in clingo command-line syntax.
    pub options: Vec<String>,
}

impl SolveRequest {
    pub fn new(program: Program) -> Self {
        Self {
            program,
            models: 1,
            options: Vec::new(),
        }
    }

    pub fn models(mut self, models: usize) -> Self {
        self.models = models;
        self
    }

    pub fn option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }

    /// Enumerate all subset-minimal models of the domain heuristic.
    pub fn minimal_enumeration(self) -> Self {
        self.models(0)
            .option("--heuristic=Domain")
            .option("--enum-mode=domRec")
            .option("--dom-mod=3,16")
    }

    /// Enumerate all models projected onto the shown atoms.
    pub fn projected(self) -> Self {
        self.models(0).option("--project")
    }
}

/// One answer set, restricted to shown atoms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    pub atoms: Vec<Symbol>,
}

impl Model {
    pub fn new(atoms: Vec<Symbol>) -> Self {
        Self { atoms }
    }

    pub fn decode(&self) -> Result<Vec<Atom>, DecodeError> {
        decode_model(&self.atoms)
    }
}

/// Answer-set solver interface.
pub trait AspSolver {
    type Error: std::error::Error;
    type Session: GroundedSession<Error = Self::Error>;

    /// Ground and solve `request`, returning its models in solver order.
    /// An empty vector means unsatisfiable.
    fn solve(&mut self, request: &SolveRequest) -> Result<Vec<Model>, Self::Error>;

    /// Ground `program` once for repeated assumption queries.
    fn ground(&mut self, program: &Program) -> Result<Self::Session, Self::Error>;
}

/// A grounded program answering satisfiability under temporary assumptions.
pub trait GroundedSession {
    type Error: std::error::Error;

    /// Is the program satisfiable with every atom of `atoms` forced true?
    ///
    /// Assumptions hold for this call only; the session is unchanged when
    /// it returns, whatever the outcome.
    fn assume(&mut self, atoms: &[Symbol]) -> Result<bool, Self::Error>;

    /// Whether queries reuse one grounding. Sessions that reground the
    /// program on every `assume` return false.
    fn is_incremental(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::io;

    struct MockSolver {
        models: Vec<Model>,
        solve_calls: usize,
    }

    struct MockSession {
        forbidden: Symbol,
        calls: usize,
    }

    impl GroundedSession for MockSession {
        type Error = io::Error;

        fn assume(&mut self, atoms: &[Symbol]) -> Result<bool, Self::Error> {
            self.calls += 1;
            Ok(!atoms.contains(&self.forbidden))
        }
    }

    impl AspSolver for MockSolver {
        type Error = io::Error;
        type Session = MockSession;

        fn solve(&mut self, request: &SolveRequest) -> Result<Vec<Model>, Self::Error> {
            self.solve_calls += 1;
            let limit = if request.models == 0 {
                self.models.len()
            } else {
                request.models
            };
            Ok(self.models.iter().take(limit).cloned().collect())
        }

        fn ground(&mut self, _program: &Program) -> Result<Self::Session, Self::Error> {
            Ok(MockSession {
                forbidden: Symbol::function("member", vec![Symbol::constant("x")]),
                calls: 0,
            })
        }
    }

    #[test]
    fn show_directives_hide_everything_else() {
        let program = Program::new().text("a. b.").show("e", 1).show("hcut", 2);
        assert_eq!(program.inline_text(), "a. b.\n#show.\n#show e/1.\n#show hcut/2.\n");
        assert_eq!(Program::new().show_directives(), "");
        assert_eq!(Program::new().hide_all().show_directives(), "#show.\n");
    }

    #[test]
    fn files_keep_program_order() {
        let program = Program::new()
            .file("rules/a.asp")
            .text("x.")
            .file("rules/b.asp");
        let files: Vec<_> = program.files().collect();
        assert_eq!(files, vec![Path::new("rules/a.asp"), Path::new("rules/b.asp")]);
        assert_eq!(program.parts().len(), 3);
    }

    #[test]
    fn request_builders_set_enumeration_options() {
        let request = SolveRequest::new(Program::new()).minimal_enumeration();
        assert_eq!(request.models, 0);
        assert_eq!(
            request.options,
            vec!["--heuristic=Domain", "--enum-mode=domRec", "--dom-mod=3,16"]
        );
        let projected = SolveRequest::new(Program::new()).projected();
        assert_eq!(projected.options, vec!["--project"]);
        assert_eq!(SolveRequest::new(Program::new()).models, 1);
    }

    #[test]
    fn mock_solver_honours_model_limit() {
        let mut solver = MockSolver {
            models: vec![Model::default(), Model::default(), Model::default()],
            solve_calls: 0,
        };
        let one = solver.solve(&SolveRequest::new(Program::new())).unwrap();
        let all = solver
            .solve(&SolveRequest::new(Program::new()).models(0))
            .unwrap();
        assert_eq!((one.len(), all.len()), (1, 3));
        assert_eq!(solver.solve_calls, 2);
    }

    #[test]
    fn session_queries_are_independent() {
        let mut solver = MockSolver {
            models: Vec::new(),
            solve_calls: 0,
        };
        let mut session = solver.ground(&Program::new()).unwrap();
        let x = Symbol::function("member", vec![Symbol::constant("x")]);
        let y = Symbol::function("member", vec![Symbol::constant("y")]);
        assert!(!session.assume(&[x.clone(), y.clone()]).unwrap());
        assert!(session.assume(&[y.clone()]).unwrap());
        assert!(!session.assume(&[x]).unwrap());
        assert_eq!(session.calls, 3);
        assert!(session.is_incremental());
    }

    #[test]
    fn model_decode_uses_closed_vocabulary() {
        let model = Model::new(vec![
            Symbol::parse("e(a)").unwrap(),
            Symbol::parse("ncut(\"p\")").unwrap(),
        ]);
        let kinds: BTreeSet<_> = model
            .decode()
            .unwrap()
            .into_iter()
            .map(|atom| matches!(atom, Atom::Event(_)))
            .collect();
        assert_eq!(kinds.len(), 2);
        assert!(Model::new(vec![Symbol::constant("other")]).decode().is_err());
    }
}
