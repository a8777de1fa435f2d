//! Fact text as produced by the translator and consumed by the solver.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::symbol::{Symbol, SymbolError};

/// One piece of program text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunk<'a> {
    /// A statement including its terminating dot, whitespace-trimmed.
    Statement(&'a str),
    /// A `%` line comment or `%* ... *%` block comment.
    Comment(&'a str),
}

/// Split program text into statements and comments.
///
/// A dot ends a statement only outside strings and brackets, and only when
/// it is not part of a `..` interval. Trailing text without a dot is
/// returned as a final statement.
pub fn split_statements(text: &str) -> Vec<Chunk<'_>> {
    let bytes = text.as_bytes();
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                i += 1;
                while i < bytes.len() && bytes[i] != b'"' {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            b'%' if depth == 0 => {
                push_statement(&mut chunks, &text[start..i]);
                let end = if bytes.get(i + 1) == Some(&b'*') {
                    text[i + 2..].find("*%").map_or(bytes.len(), |p| i + 2 + p + 2)
                } else {
                    text[i..].find('\n').map_or(bytes.len(), |p| i + p)
                };
                chunks.push(Chunk::Comment(text[i..end].trim_end()));
                start = end;
                i = end;
                continue;
            }
            b'(' | b'{' | b'[' => depth += 1,
            b')' | b'}' | b']' => depth = depth.saturating_sub(1),
            b'.' if depth == 0 => {
                if bytes.get(i + 1) == Some(&b'.') {
                    i += 2;
                    continue;
                }
                push_statement(&mut chunks, &text[start..=i]);
                start = i + 1;
            }
            b'.' if bytes.get(i + 1) == Some(&b'.') => {
                i += 2;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    push_statement(&mut chunks, &text[start.min(text.len())..]);
    chunks
}

fn push_statement<'a>(chunks: &mut Vec<Chunk<'a>>, raw: &'a str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        chunks.push(Chunk::Statement(trimmed));
    }
}

/// A statement is a plain fact when it is neither a rule, a constraint nor
/// a directive.
fn is_fact(statement: &str) -> bool {
    !statement.starts_with('#') && !statement.contains(":-")
}

/// Rewrite every fact of `text` by structural substitution.
///
/// Rules, directives and comments are copied through unchanged; each
/// output chunk is on its own line.
pub fn rewrite_facts(text: &str, substitution: &HashMap<Symbol, Symbol>) -> Result<String, SymbolError> {
    let mut out = String::with_capacity(text.len());
    for chunk in split_statements(text) {
        match chunk {
            Chunk::Comment(comment) => out.push_str(comment),
            Chunk::Statement(stmt) if is_fact(stmt) => {
                let body = stmt.strip_suffix('.').unwrap_or(stmt);
                let fact = Symbol::parse(body)?;
                let _ = write!(out, "{}.", fact.substitute(substitution));
            }
            Chunk::Statement(stmt) => out.push_str(stmt),
        }
        out.push('\n');
    }
    Ok(out)
}

/// Parse every fact of `text` into a symbol, skipping rules and comments.
pub fn parse_facts(text: &str) -> Result<Vec<Symbol>, SymbolError> {
    split_statements(text)
        .into_iter()
        .filter_map(|chunk| match chunk {
            Chunk::Statement(stmt) if is_fact(stmt) => Some(stmt),
            _ => None,
        })
        .map(|stmt| Symbol::parse(stmt.strip_suffix('.').unwrap_or(stmt)))
        .collect()
}

/// One `fact.` per line.
pub fn render_facts<'a, I>(facts: I) -> String
where
    I: IntoIterator<Item = &'a Symbol>,
{
    let mut out = String::new();
    for fact in facts {
        let _ = writeln!(out, "{fact}.");
    }
    out
}
