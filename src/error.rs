//! Error types for configuration, input parsing and file handling

use crate::{ClauseIdx, Variable};
use std::{io, path::PathBuf};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value was rejected before any search started
    #[error("invalid value `{value}` for `{flag}`: {reason}")]
    Config {
        flag: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("malformed input: {0}")]
    InputFormat(#[from] FormatError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn config(flag: &'static str, value: impl ToString, reason: &'static str) -> Self {
        Error::Config {
            flag,
            value: value.to_string(),
            reason,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Reasons a CNF formula (or its DIMACS text) is rejected
#[derive(Debug, Error, PartialEq)]
pub enum FormatError {
    #[error("formula must declare at least one variable")]
    NoVariables,

    #[error("{num_variables} variables exceed the limit of {max}")]
    TooManyVariables { num_variables: Variable, max: Variable },

    #[error("literal 0 does not name a variable")]
    ZeroLiteral,

    #[error("literal {literal} is outside the declared variables 1..={num_variables}")]
    LiteralOutOfRange {
        literal: isize,
        num_variables: Variable,
    },

    #[error("clause {clause} is empty")]
    EmptyClause { clause: ClauseIdx },

    #[error("line {line}: clause found before the `p` problem line")]
    MissingHeader { line: usize },

    #[error("no `p` problem line")]
    NoHeader,

    #[error("line {line}: malformed problem line `{content}`")]
    InvalidHeader { line: usize, content: String },

    #[error("line {line}: second problem line")]
    DuplicateHeader { line: usize },

    #[error("line {line}: `{token}` is not an integer")]
    InvalidToken { line: usize, token: String },

    #[error("line {line}: clause is not terminated by 0")]
    MissingTerminator { line: usize },

    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<FormatError>,
    },
}

impl FormatError {
    pub(crate) fn at(self, line: usize) -> Self {
        FormatError::Line {
            line,
            source: Box::new(self),
        }
    }
}
