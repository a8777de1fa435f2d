//! Ground terms in clingo syntax.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// A ground term as printed by clingo.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// `#inf`
    Infimum,
    Number(i64),
    String(String),
    /// Constant or compound term; `negated` is classical negation (`-f(x)`).
    Function {
        name: String,
        args: Vec<Symbol>,
        negated: bool,
    },
    Tuple(Vec<Symbol>),
    /// `#sup`
    Supremum,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid term '{text}' at byte {pos}: {message}")]
pub struct SymbolError {
    pub text: String,
    pub pos: usize,
    pub message: String,
}

impl Symbol {
    pub fn number(n: i64) -> Self {
        Symbol::Number(n)
    }

    pub fn string(s: impl Into<String>) -> Self {
        Symbol::String(s.into())
    }

    pub fn constant(name: impl Into<String>) -> Self {
        Self::function(name, Vec::new())
    }

    pub fn function(name: impl Into<String>, args: Vec<Symbol>) -> Self {
        Symbol::Function {
            name: name.into(),
            args,
            negated: false,
        }
    }

    pub fn tuple(items: Vec<Symbol>) -> Self {
        Symbol::Tuple(items)
    }

    /// Parse one term in clingo's output syntax.
    pub fn parse(text: &str) -> Result<Symbol, SymbolError> {
        let mut parser = Parser { text, pos: 0 };
        let term = parser.term()?;
        parser.skip_ws();
        if parser.pos != text.len() {
            return Err(parser.error("trailing input"));
        }
        Ok(term)
    }

    /// Function name, for constants and compound terms.
    pub fn name(&self) -> Option<&str> {
        match self {
            Symbol::Function { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Function arguments or tuple elements; empty for everything else.
    pub fn arguments(&self) -> &[Symbol] {
        match self {
            Symbol::Function { args, .. } => args,
            Symbol::Tuple(items) => items,
            _ => &[],
        }
    }

    /// `(name, arity)` of a non-negated function term.
    pub fn signature(&self) -> Option<(&str, usize)> {
        match self {
            Symbol::Function {
                name,
                args,
                negated: false,
            } => Some((name, args.len())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Symbol::String(s) => Some(s),
            _ => None,
        }
    }

    /// A name-like reading of the term: string contents, constant name, or
    /// number digits. Place and transition names come in all three forms
    /// depending on the translator.
    pub fn as_name(&self) -> Option<String> {
        match self {
            Symbol::String(s) => Some(s.clone()),
            Symbol::Number(n) => Some(n.to_string()),
            Symbol::Function {
                name,
                args,
                negated: false,
            } if args.is_empty() => Some(name.clone()),
            _ => None,
        }
    }

    /// Replace every subterm found in `map`, outermost match first.
    pub fn substitute(&self, map: &HashMap<Symbol, Symbol>) -> Symbol {
        if let Some(replacement) = map.get(self) {
            return replacement.clone();
        }
        match self {
            Symbol::Function {
                name,
                args,
                negated,
            } => Symbol::Function {
                name: name.clone(),
                args: args.iter().map(|a| a.substitute(map)).collect(),
                negated: *negated,
            },
            Symbol::Tuple(items) => Symbol::Tuple(items.iter().map(|a| a.substitute(map)).collect()),
            other => other.clone(),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Infimum => write!(f, "#inf"),
            Symbol::Supremum => write!(f, "#sup"),
            Symbol::Number(n) => write!(f, "{n}"),
            Symbol::String(s) => {
                f.write_str("\"")?;
                for ch in s.chars() {
                    match ch {
                        '\\' => f.write_str("\\\\")?,
                        '"' => f.write_str("\\\"")?,
                        '\n' => f.write_str("\\n")?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("\"")
            }
            Symbol::Function {
                name,
                args,
                negated,
            } => {
                if *negated {
                    f.write_str("-")?;
                }
                f.write_str(name)?;
                if !args.is_empty() {
                    write_list(f, args)?;
                }
                Ok(())
            }
            Symbol::Tuple(items) => {
                if items.len() == 1 {
                    write!(f, "({},)", items[0])
                } else {
                    write_list(f, items)
                }
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Symbol]) -> fmt::Result {
    f.write_str("(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(")")
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, message: &str) -> SymbolError {
        SymbolError {
            text: self.text.to_string(),
            pos: self.pos,
            message: message.to_string(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, want: char) -> Result<(), SymbolError> {
        self.skip_ws();
        match self.bump() {
            Some(ch) if ch == want => Ok(()),
            _ => Err(self.error(&format!("expected '{want}'"))),
        }
    }

    fn term(&mut self) -> Result<Symbol, SymbolError> {
        self.skip_ws();
        match self.peek() {
            Some('"') => self.string(),
            Some('(') => self.tuple(),
            Some('#') => self.special(),
            Some('-') => {
                self.bump();
                match self.peek() {
                    Some(c) if c.is_ascii_digit() => Ok(Symbol::Number(-self.digits()?)),
                    _ => match self.function()? {
                        Symbol::Function { name, args, .. } => Ok(Symbol::Function {
                            name,
                            args,
                            negated: true,
                        }),
                        _ => Err(self.error("expected function after '-'")),
                    },
                }
            }
            Some(c) if c.is_ascii_digit() => Ok(Symbol::Number(self.digits()?)),
            Some(c) if c.is_ascii_lowercase() || c == '_' => self.function(),
            _ => Err(self.error("expected a term")),
        }
    }

    fn digits(&mut self) -> Result<i64, SymbolError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        self.text[start..self.pos]
            .parse()
            .map_err(|_| self.error("number out of range"))
    }

    fn identifier(&mut self) -> Result<String, SymbolError> {
        self.skip_ws();
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '\'')
        {
            self.bump();
        }
        if start == self.pos {
            return Err(self.error("expected an identifier"));
        }
        Ok(self.text[start..self.pos].to_string())
    }

    fn function(&mut self) -> Result<Symbol, SymbolError> {
        let name = self.identifier()?;
        let args = if self.peek() == Some('(') {
            self.bump();
            self.list(')')?.0
        } else {
            Vec::new()
        };
        Ok(Symbol::Function {
            name,
            args,
            negated: false,
        })
    }

    /// Comma-separated terms up to `close`. The flag reports a trailing
    /// comma, which marks a one-element tuple.
    fn list(&mut self, close: char) -> Result<(Vec<Symbol>, bool), SymbolError> {
        let mut items = Vec::new();
        self.skip_ws();
        if self.peek() == Some(close) {
            self.bump();
            return Ok((items, false));
        }
        loop {
            items.push(self.term()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => {
                    self.skip_ws();
                    if self.peek() == Some(close) {
                        self.bump();
                        return Ok((items, true));
                    }
                }
                Some(c) if c == close => return Ok((items, false)),
                _ => return Err(self.error(&format!("expected ',' or '{close}'"))),
            }
        }
    }

    fn tuple(&mut self) -> Result<Symbol, SymbolError> {
        self.expect('(')?;
        let (mut items, trailing_comma) = self.list(')')?;
        if items.len() == 1 && !trailing_comma {
            return Ok(items.remove(0));
        }
        Ok(Symbol::Tuple(items))
    }

    fn string(&mut self) -> Result<Symbol, SymbolError> {
        self.expect('"')?;
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(Symbol::String(out)),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('\\') => out.push('\\'),
                    Some('"') => out.push('"'),
                    _ => return Err(self.error("invalid escape")),
                },
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn special(&mut self) -> Result<Symbol, SymbolError> {
        self.expect('#')?;
        match self.identifier()?.as_str() {
            "inf" => Ok(Symbol::Infimum),
            "sup" => Ok(Symbol::Supremum),
            _ => Err(self.error("expected #inf or #sup")),
        }
    }
}
