//! Error taxonomy for the compilation pipeline (parse → NFA → DFA → persistence).

use thiserror::Error;

/// Errors raised while turning a `/body/flags` pattern into a [`crate::regex::RegexTree`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("offset {offset}: pattern must start and end with '/'")]
    NoBegin { offset: usize },
    #[error("offset {offset}: pattern must start and end with '/'")]
    NoEnd { offset: usize },
    #[error("offset {offset}: unclosed group")]
    NoClosedBracket { offset: usize },
    #[error("offset {offset}: unmatched closing ')'")]
    NoOpenBracket { offset: usize },
    #[error("offset {offset}: nesting exceeds the maximum depth of {max}")]
    TooDeep { offset: usize, max: u32 },
    #[error("offset {offset}: malformed syntax")]
    WrongSyntax { offset: usize },
    #[error("pattern is too short to contain a body")]
    TooShort,
    #[error("offset {offset}: anchor cannot appear here")]
    NotImplemented { offset: usize },
}

impl ParseError {
    pub fn offset(&self) -> Option<usize> {
        match *self {
            ParseError::NoBegin { offset }
            | ParseError::NoEnd { offset }
            | ParseError::NoClosedBracket { offset }
            | ParseError::NoOpenBracket { offset }
            | ParseError::TooDeep { offset, .. }
            | ParseError::WrongSyntax { offset }
            | ParseError::NotImplemented { offset } => Some(offset),
            ParseError::TooShort => None,
        }
    }
}

/// Errors raised while compiling/transforming automata.
#[derive(Debug, Error)]
pub enum Error {
    #[error("parse error: {0}")]
    ParseSyntax(#[from] ParseError),
    #[error("allocation failed while building the automaton")]
    Alloc,
    #[error("subset construction exceeded the configured state limit of {limit}")]
    StateLimit { limit: usize },
    #[error("minimization exceeded the configured partition-class limit of {limit}")]
    ClassLimit { limit: usize },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("format mismatch: {0}")]
    FormatMismatch(String),
    #[error("operation not applicable: {0}")]
    NotApplicable(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
