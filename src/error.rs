//! Error types raised while reading ADIF logs.
//!
//! [`ParseError`] names what went wrong. [`LogError`] wraps it with an
//! ordered list of context frames (outermost first) describing where in
//! the log it happened, so the top level can print one readable message.

use std::fmt;

use thiserror::Error;

/// Fatal format errors in an ADIF stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Invalid data length in tag <{0}>")]
    InvalidLength(String),

    #[error("Malformed LICW annotation, expected SPC:NUMBER[:EXTRAS] but found {0:?}")]
    MalformedAnnotation(Vec<String>),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// A [`ParseError`] together with the context it was raised in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogError {
    frames: Vec<String>,
    source: ParseError,
}

impl LogError {
    /// Wrap a parse error with no context yet.
    pub fn new(source: ParseError) -> Self {
        Self {
            frames: Vec::new(),
            source,
        }
    }

    /// Push a context frame that encloses all frames added so far.
    pub fn context(mut self, frame: impl Into<String>) -> Self {
        self.frames.insert(0, frame.into());
        self
    }

    /// Context frames, outermost first.
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    /// The underlying parse error.
    pub fn kind(&self) -> &ParseError {
        &self.source
    }
}

impl From<ParseError> for LogError {
    fn from(source: ParseError) -> Self {
        Self::new(source)
    }
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in &self.frames {
            write!(f, "{}: ", frame)?;
        }
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for LogError {}
