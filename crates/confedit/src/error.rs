//! Error types for parsing and editing.
//!
//! Statement-level syntax failures are recoverable: the parser records a
//! [`ParseError`], resumes after the offending line, and hands back every
//! diagnostic at once as [`ParseErrors`]. I/O failures short-circuit and are
//! never aggregated.

use core::fmt;

use thiserror::Error;

/// A single diagnostic produced while parsing, positioned at the byte where
/// the problem starts.
///
/// Renders as `file:line:col: message` (or `line:col: message` when no file
/// name was supplied). Line and column are 1-based; columns count tabs as
/// jumps to the next multiple of 8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// File name used for rendering only; may be empty.
    pub file: String,
    /// 1-based line number.
    pub line: usize,
    /// 1-based, tab-aware column number.
    pub column: usize,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.file.is_empty() {
            write!(f, "{}:{}: {}", self.line, self.column, self.message)
        } else {
            write!(
                f,
                "{}:{}:{}: {}",
                self.file, self.line, self.column, self.message
            )
        }
    }
}

impl core::error::Error for ParseError {}

/// Every diagnostic recovered from one parse, in file order.
///
/// Displays as one line per error, newline-joined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseErrors(Vec<ParseError>);

impl ParseErrors {
    pub(crate) fn push(&mut self, err: ParseError) {
        self.0.push(err);
    }

    pub(crate) fn into_result(self) -> Result<(), ParseErrors> {
        if self.0.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl core::ops::Deref for ParseErrors {
    type Target = [ParseError];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for ParseErrors {
    type Item = ParseError;
    type IntoIter = std::vec::IntoIter<ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParseErrors {
    type Item = &'a ParseError;
    type IntoIter = core::slice::Iter<'a, ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i != 0 {
                writeln!(f)?;
            }
            err.fmt(f)?;
        }
        Ok(())
    }
}

impl core::error::Error for ParseErrors {}

/// Statement-level syntax failures raised by the grammar.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub(crate) enum SyntaxError {
    #[error("expected section or key")]
    ExpectedSectionOrKey,
    #[error("expected section name after '['")]
    ExpectedSectionName,
    #[error("expected ']' or space followed by quoted subsection")]
    ExpectedSubsection,
    #[error("expected quoted subsection after space")]
    BadSubsection,
    #[error("expected ']'")]
    ExpectedCloseBracket,
    #[error("expected '=' after {0}")]
    ExpectedAssignment(String),
    #[error("missing close quotes")]
    MissingCloseQuote,
    #[error("invalid escape sequence \\{0}")]
    InvalidEscape(char),
    #[error("incomplete escape sequence at end of input")]
    IncompleteEscape,
}

/// Failure signalled by a [`Sink`](crate::Sink) callback.
///
/// `BadKey` points the resulting diagnostic at the key's start position;
/// every other failure is reported at the value's start.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// The key itself is the problem.
    #[error("{0}")]
    BadKey(String),
    /// The value is the problem (or the problem is unspecific).
    #[error("{0}")]
    BadValue(String),
}

/// An edit-script operation rejected before anything was queued.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EditError {
    /// The variable-length argument list had an unsupported length.
    #[error("invalid number of arguments")]
    InvalidArgCount,
    /// The section or subsection fails its character-set check.
    #[error("syntactically invalid section")]
    InvalidSection,
}

/// Top-level failure of a file parse: either the file could not be read, or
/// the contents produced diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    /// File-open or read failure; aborts parsing immediately.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Aggregated syntax and consumer diagnostics.
    #[error("{0}")]
    Parse(#[from] ParseErrors),
}
