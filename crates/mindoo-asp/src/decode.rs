//! Closed decoder for the atoms the rule files may show.

use thiserror::Error;

use crate::symbol::Symbol;

/// One shown atom, by predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    /// `bad("p")`
    Bad(String),
    /// `e(E)`: event in the configuration.
    Event(Symbol),
    /// `ncut(P)`: place marked after the configuration.
    NextCut(String),
    /// `cut(P)`
    Cut(String),
    /// `hcut(C,P)`: condition of a cut-off's history cut.
    HistoryCut { condition: Symbol, place: Symbol },
    /// `greater(E1,E2)`: `E1` causally precedes `E2`.
    Greater { before: Symbol, after: Symbol },
    /// `unchallenged(E)`
    Unchallenged(Symbol),
    /// `e2tr(E,T)`
    EventTransition { event: Symbol, transition: String },
    /// `resolved(N)`
    Resolved(String),
    /// `bind(Original,Match)`
    Bind { original: Symbol, matched: Symbol },
    /// `mcfg(cfg_i,E)`
    ConfigEvent { config: Symbol, event: Symbol },
    /// `sig_mcfg(cfg_i,S)`
    ConfigSignature { config: Symbol, signature: Symbol },
    /// `draw(A,B)`
    Draw { from: Symbol, to: Symbol },
    /// `label(A,B)`
    Label { node: Symbol, text: String },
    /// `member(E)`
    Member(Symbol),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unexpected predicate {name}/{arity} in solver output")]
    UnknownPredicate { name: String, arity: usize },
    #[error("argument {index} of {predicate} is not a name: {found}")]
    Argument {
        predicate: &'static str,
        index: usize,
        found: String,
    },
    #[error("solver output '{0}' is not an atom")]
    NotAnAtom(String),
}

fn name_arg(predicate: &'static str, args: &[Symbol], index: usize) -> Result<String, DecodeError> {
    args[index].as_name().ok_or_else(|| DecodeError::Argument {
        predicate,
        index,
        found: args[index].to_string(),
    })
}

impl Atom {
    pub fn decode(symbol: &Symbol) -> Result<Atom, DecodeError> {
        let Some((name, arity)) = symbol.signature() else {
            return Err(DecodeError::NotAnAtom(symbol.to_string()));
        };
        let args = symbol.arguments();
        let atom = match (name, arity) {
            ("bad", 1) => Atom::Bad(name_arg("bad", args, 0)?),
            ("e", 1) => Atom::Event(args[0].clone()),
            ("ncut", 1) => Atom::NextCut(name_arg("ncut", args, 0)?),
            ("cut", 1) => Atom::Cut(name_arg("cut", args, 0)?),
            ("hcut", 2) => Atom::HistoryCut {
                condition: args[0].clone(),
                place: args[1].clone(),
            },
            ("greater", 2) => Atom::Greater {
                before: args[0].clone(),
                after: args[1].clone(),
            },
            ("unchallenged", 1) => Atom::Unchallenged(args[0].clone()),
            ("e2tr", 2) => Atom::EventTransition {
                event: args[0].clone(),
                transition: name_arg("e2tr", args, 1)?,
            },
            ("resolved", 1) => Atom::Resolved(name_arg("resolved", args, 0)?),
            ("bind", 2) => Atom::Bind {
                original: args[0].clone(),
                matched: args[1].clone(),
            },
            ("mcfg", 2) => Atom::ConfigEvent {
                config: args[0].clone(),
                event: args[1].clone(),
            },
            ("sig_mcfg", 2) => Atom::ConfigSignature {
                config: args[0].clone(),
                signature: args[1].clone(),
            },
            ("draw", 2) => Atom::Draw {
                from: args[0].clone(),
                to: args[1].clone(),
            },
            ("label", 2) => Atom::Label {
                node: args[0].clone(),
                text: name_arg("label", args, 1)?,
            },
            ("member", 1) => Atom::Member(args[0].clone()),
            _ => {
                return Err(DecodeError::UnknownPredicate {
                    name: name.to_string(),
                    arity,
                })
            }
        };
        Ok(atom)
    }
}

/// Decode every atom of one model, failing on the first unknown one.
pub fn decode_model<'a, I>(symbols: I) -> Result<Vec<Atom>, DecodeError>
where
    I: IntoIterator<Item = &'a Symbol>,
{
    symbols.into_iter().map(Atom::decode).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(text: &str) -> Result<Atom, DecodeError> {
        Atom::decode(&Symbol::parse(text).unwrap())
    }

    #[test]
    fn decodes_poset_vocabulary() {
        assert_eq!(
            atom("greater((h1,t0),(h2,t1))").unwrap(),
            Atom::Greater {
                before: Symbol::parse("(h1,t0)").unwrap(),
                after: Symbol::parse("(h2,t1)").unwrap(),
            }
        );
        assert_eq!(
            atom("e2tr((h1,t0),\"t0\")").unwrap(),
            Atom::EventTransition {
                event: Symbol::parse("(h1,t0)").unwrap(),
                transition: "t0".into(),
            }
        );
        assert_eq!(
            atom("unchallenged(e3)").unwrap(),
            Atom::Unchallenged(Symbol::constant("e3"))
        );
    }

    #[test]
    fn place_arguments_accept_strings_and_constants() {
        assert_eq!(atom("ncut(\"p1\")").unwrap(), Atom::NextCut("p1".into()));
        assert_eq!(atom("bad(p2)").unwrap(), Atom::Bad("p2".into()));
    }

    #[test]
    fn unknown_predicate_is_an_error() {
        assert_eq!(
            atom("edge(a,b)"),
            Err(DecodeError::UnknownPredicate {
                name: "edge".into(),
                arity: 2
            })
        );
        assert!(matches!(
            atom("e(a,b)"),
            Err(DecodeError::UnknownPredicate { arity: 2, .. })
        ));
    }

    #[test]
    fn shape_mismatch_and_non_atoms_are_errors() {
        assert!(matches!(
            atom("ncut(f(x))"),
            Err(DecodeError::Argument { predicate: "ncut", index: 0, .. })
        ));
        assert!(matches!(atom("42"), Err(DecodeError::NotAnAtom(_))));
        assert!(matches!(atom("-e(a)"), Err(DecodeError::NotAnAtom(_))));
    }

    #[test]
    fn decode_model_stops_at_first_error() {
        let symbols = vec![
            Symbol::parse("e(a)").unwrap(),
            Symbol::parse("junk").unwrap(),
        ];
        assert!(decode_model(&symbols).is_err());
        assert_eq!(decode_model(&symbols[..1]).unwrap().len(), 1);
    }
}
