//! Typed error taxonomy for the FHiCL pipeline.
//!
//! Every fallible stage (preprocessor, order guard, grammar, tree builder,
//! resolver, driver) returns `Result<T, FhiclError>`. Kept as a hand-rolled
//! enum with a manual `Display` impl, in the style of this crate's
//! structural ancestor's `ParseError`, rather than pulling in a
//! macro-derived error crate.

use std::fmt;

/// A 1-based line/column position in the original (post-include) source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone)]
pub enum FhiclError {
    /// Malformed unquoted identifier, leading-digit name, or a numeric
    /// token that doesn't match any recognised form.
    InvalidToken { message: String, pos: Option<Position> },
    /// Malformed `#include` syntax, an unreadable file, or an include
    /// cycle.
    InvalidInclude { message: String },
    /// `key :` followed by no value.
    InvalidAssociation { message: String, pos: Option<Position> },
    /// Non-comment content before `BEGIN_PROLOG`.
    IllegalStatement { line: usize, text: String },
    /// `@local::`/`@db::` target not found in D or P.
    UnknownReference { target: String },
    /// Grammar-level unrecoverable mismatch after a commit point.
    ParseFailure { message: String, pos: Option<Position> },
    /// File-loader failure surfaced by include expansion.
    IoError { message: String },
}

impl FhiclError {
    pub fn invalid_token(message: impl Into<String>, pos: Option<Position>) -> Self {
        Self::InvalidToken { message: message.into(), pos }
    }

    pub fn invalid_include(message: impl Into<String>) -> Self {
        Self::InvalidInclude { message: message.into() }
    }

    pub fn invalid_association(message: impl Into<String>, pos: Option<Position>) -> Self {
        Self::InvalidAssociation { message: message.into(), pos }
    }

    pub fn illegal_statement(line: usize, text: impl Into<String>) -> Self {
        Self::IllegalStatement { line, text: text.into() }
    }

    pub fn unknown_reference(target: impl Into<String>) -> Self {
        Self::UnknownReference { target: target.into() }
    }

    pub fn parse_failure(message: impl Into<String>, pos: Option<Position>) -> Self {
        Self::ParseFailure { message: message.into(), pos }
    }

    pub fn io_error(message: impl Into<String>) -> Self {
        Self::IoError { message: message.into() }
    }
}

impl fmt::Display for FhiclError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken { message, pos } => {
                write!(f, "InvalidToken: {message}")?;
                if let Some(p) = pos {
                    write!(f, " (at {p})")?;
                }
                Ok(())
            }
            Self::InvalidInclude { message } => write!(f, "InvalidInclude: {message}"),
            Self::InvalidAssociation { message, pos } => {
                write!(f, "InvalidAssociation: {message}")?;
                if let Some(p) = pos {
                    write!(f, " (at {p})")?;
                }
                Ok(())
            }
            Self::IllegalStatement { line, text } => {
                write!(f, "IllegalStatement: line {line} precedes BEGIN_PROLOG: {text:?}")
            }
            Self::UnknownReference { target } => {
                write!(f, "UnknownReference: {target}")
            }
            Self::ParseFailure { message, pos } => {
                write!(f, "ParseFailure: {message}")?;
                if let Some(p) = pos {
                    write!(f, " (at {p})")?;
                }
                Ok(())
            }
            Self::IoError { message } => write!(f, "IoError: {message}"),
        }
    }
}

impl std::error::Error for FhiclError {}

pub type FhiclResult<T> = Result<T, FhiclError>;
