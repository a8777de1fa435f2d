#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while reading or validating a low-level net.
#[derive(Debug, Error, Diagnostic)]
pub enum NetError {
    #[error("Malformed {section} record in {file} at line {line}: {message}")]
    #[diagnostic(code(mindoo::net::malformed_record))]
    MalformedRecord {
        section: String,
        file: String,
        line: usize,
        message: String,
        #[label("here")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("Missing required section {section} in {file}")]
    #[diagnostic(
        code(mindoo::net::missing_section),
        help("a low-level net needs at least the PL and TR sections")
    )]
    MissingSection { section: String, file: String },

    #[error("Duplicate place '{name}' in {file} at line {line}")]
    #[diagnostic(code(mindoo::net::duplicate_place))]
    DuplicatePlace {
        name: String,
        file: String,
        line: usize,
        #[label("duplicate")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("Net file not found: {path} (also tried .ll_net and .ll)")]
    #[diagnostic(code(mindoo::net::not_found))]
    NotFound { path: String },

    #[error("Cannot access {path}: {source}")]
    #[diagnostic(code(mindoo::net::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl NetError {
    /// Build a [`NetError::MalformedRecord`] pointing at one line of `source`.
    pub fn malformed(
        section: &str,
        message: impl Into<String>,
        line: usize,
        line_start: usize,
        line_len: usize,
        source: &str,
        filename: &str,
    ) -> Self {
        NetError::MalformedRecord {
            section: section.to_string(),
            file: filename.to_string(),
            line,
            message: message.into(),
            span: (line_start, line_len).into(),
            src: miette::NamedSource::new(filename, source.to_owned()),
        }
    }
}

/// Errors raised while loading bad markings.
#[derive(Debug, Error, Diagnostic)]
pub enum MarkingError {
    #[error("No bad marking given in {origin}")]
    #[diagnostic(code(mindoo::marking::empty))]
    Empty { origin: String },

    #[error("Empty place name in bad marking at {origin}")]
    #[diagnostic(code(mindoo::marking::empty_place))]
    EmptyPlace { origin: String },

    #[error("Expected a single bad marking, found {count}; the second is at {origin}")]
    #[diagnostic(
        code(mindoo::marking::several),
        help("the doom search takes one bad marking; run it once per marking")
    )]
    Several { count: usize, origin: String },

    #[error("Unknown place '{place}' in bad marking at {origin}")]
    #[diagnostic(
        code(mindoo::marking::unknown_place),
        help("bad markings may only name places declared in the PL section of the net")
    )]
    UnknownPlace { place: String, origin: String },

    #[error("Cannot read bad marking file {path}: {source}")]
    #[diagnostic(code(mindoo::marking::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while reading a prefix file header.
#[derive(Debug, Error, Diagnostic)]
pub enum MciError {
    #[error("Prefix file {path} is truncated: {len} bytes, header needs 8")]
    #[diagnostic(code(mindoo::mci::truncated))]
    Truncated { path: String, len: usize },

    #[error("Cannot read prefix file {path}: {source}")]
    #[diagnostic(code(mindoo::mci::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
