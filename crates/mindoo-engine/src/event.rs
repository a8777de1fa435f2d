use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use mindoo_asp::symbol::{Symbol, SymbolError};

/// Identifier of one unfolding event, as the translator names it.
///
/// Equality, ordering and hashing go through the rendered term text, so
/// ids compare the same way they print.
#[derive(Debug, Clone)]
pub struct EventId {
    text: String,
    symbol: Symbol,
}

/// A configuration: a sorted set of events.
pub type Configuration = BTreeSet<EventId>;

impl EventId {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            text: symbol.to_string(),
            symbol,
        }
    }

    pub fn parse(text: &str) -> Result<Self, SymbolError> {
        Symbol::parse(text).map(Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// The oracle's assumption atom `member(E)`.
    pub fn member_atom(&self) -> Symbol {
        Symbol::function("member", vec![self.symbol.clone()])
    }
}

impl PartialEq for EventId {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for EventId {}

impl PartialOrd for EventId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.text.cmp(&other.text)
    }
}

impl Hash for EventId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl Borrow<str> for EventId {
    fn borrow(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_compare_by_rendered_text() {
        let a = EventId::parse("( h1 , t0 )").unwrap();
        let b = EventId::new(Symbol::tuple(vec![
            Symbol::constant("h1"),
            Symbol::constant("t0"),
        ]));
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "(h1,t0)");
    }

    #[test]
    fn configurations_lookup_by_text() {
        let config: Configuration = ["e2", "e1"]
            .iter()
            .map(|t| EventId::parse(t).unwrap())
            .collect();
        assert!(config.contains("e1"));
        let order: Vec<_> = config.iter().map(EventId::as_str).collect();
        assert_eq!(order, vec!["e1", "e2"]);
    }

    #[test]
    fn member_atom_wraps_the_identifier() {
        let e = EventId::parse("(h3,t1)").unwrap();
        assert_eq!(e.member_atom().to_string(), "member((h3,t1))");
    }
}
