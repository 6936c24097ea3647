//! Statement-level recursive-descent parser for the git-config dialect.
//!
//! The top-level loop consumes one statement per iteration: a section
//! header, a key/value assignment, or a comment/blank run. Parsed events are
//! delivered inline to a [`Sink`]. A malformed statement produces one
//! [`ParseError`] and aborts only that line; the cursor resumes at the next
//! newline and the unconsumed bytes land in the following statement's gap,
//! so a structure-preserving consumer still reproduces the file byte for
//! byte.
//!
//! # Examples
//!
//! ```
//! use confedit::{Item, Sink, SinkError, parse_bytes};
//!
//! #[derive(Default)]
//! struct Keys(Vec<String>);
//!
//! impl Sink for Keys {
//!     fn item(&mut self, item: Item<'_>) -> Result<(), SinkError> {
//!         self.0.push(item.qualified_key().to_string());
//!         Ok(())
//!     }
//! }
//!
//! let mut keys = Keys::default();
//! parse_bytes(&mut keys, "config", b"[core]\n\tbare = false\n").unwrap();
//! assert_eq!(keys.0, ["core.bare"]);
//! ```

use std::path::Path;

use bstr::{BStr, BString};

use crate::{
    error::{Error, ParseError, ParseErrors, SinkError, SyntaxError},
    scanner::{Position, Scanner},
    section::{self, Section},
};

/// Byte range of one statement within the original input.
///
/// The statement's own text is `[start, end)`; the bytes between `prev_end`
/// and `start` are the comment/blank-line run separating it from the
/// previous statement.
#[derive(Debug, Clone, Copy)]
pub struct Span<'a> {
    /// Start offset of the statement.
    pub start: usize,
    /// End offset (exclusive) of the statement.
    pub end: usize,
    /// End offset of the previous statement.
    pub prev_end: usize,
    /// The entire input buffer.
    pub input: &'a [u8],
}

impl<'a> Span<'a> {
    /// The statement's own text.
    #[must_use]
    pub fn text(&self) -> &'a [u8] {
        &self.input[self.start..self.end]
    }

    /// The comment/whitespace gap preceding the statement.
    #[must_use]
    pub fn gap(&self) -> &'a [u8] {
        &self.input[self.prev_end..self.start]
    }
}

/// A parsed key/value assignment.
///
/// `value` is `None` for a bare key with no `=`. The value, when present, is
/// fully unescaped and unquoted.
#[derive(Debug, Clone)]
pub struct Item<'a> {
    /// Section the key belongs to; `None` in the section-free preamble.
    pub section: Option<&'a Section>,
    /// The key, as written.
    pub key: &'a str,
    /// The unescaped value, or `None` for a bare key.
    pub value: Option<BString>,
    /// Where the assignment sits in the input.
    pub span: Span<'a>,
}

impl Item<'_> {
    /// The value, or an empty string for a bare key.
    #[must_use]
    pub fn value_or_default(&self) -> &BStr {
        self.value
            .as_ref()
            .map_or_else(|| BStr::new(""), |v| v.as_ref())
    }

    /// The key qualified by its section (see [`qualified_key`]).
    ///
    /// [`qualified_key`]: crate::qualified_key
    #[must_use]
    pub fn qualified_key(&self) -> BString {
        section::qualified_key(self.section, self.key)
    }
}

/// A parsed section header.
#[derive(Debug, Clone)]
pub struct SectionStart<'a> {
    /// The section identity the header introduces.
    pub section: Section,
    /// Where the header sits in the input.
    pub span: Span<'a>,
}

/// Consumer of parse events.
///
/// Only [`item`](Sink::item) is mandatory. Callbacks run inline during the
/// scan, in file order. Returning an error from `item` or `section` records
/// a diagnostic positioned per [`SinkError`] and skips the rest of that
/// statement; parsing then continues.
pub trait Sink {
    /// Called once before parsing starts.
    fn init(&mut self) {}

    /// Called for each section header.
    fn section(&mut self, _section: SectionStart<'_>) -> Result<(), SinkError> {
        Ok(())
    }

    /// Called for each key/value assignment.
    ///
    /// # Errors
    ///
    /// Implementations reject an item by returning a [`SinkError`]; the
    /// parser converts it into a positioned diagnostic.
    fn item(&mut self, item: Item<'_>) -> Result<(), SinkError>;

    /// Called once after the last statement with the trailing
    /// comment/whitespace range.
    fn done(&mut self, _trailing: Span<'_>) {}
}

struct Parser<'a, S: ?Sized> {
    scanner: Scanner<'a>,
    file: &'a str,
    section: Option<Section>,
    prev_end: usize,
    sink: &'a mut S,
}

impl<'a, S: Sink + ?Sized> Parser<'a, S> {
    fn error_at(&self, pos: Position, message: impl ToString) -> ParseError {
        ParseError {
            file: self.file.to_string(),
            line: pos.line + 1,
            column: pos.column + 1,
            message: message.to_string(),
        }
    }

    fn error_here(&self, err: SyntaxError) -> ParseError {
        self.error_at(self.scanner.position(), err)
    }

    /// Close the current statement's range and roll `prev_end` forward.
    fn span_from(&mut self, start: usize) -> Span<'a> {
        let end = self.scanner.offset();
        let span = Span {
            start,
            end,
            prev_end: self.prev_end,
            input: self.scanner.input(),
        };
        self.prev_end = end;
        span
    }

    fn run(&mut self) -> Result<(), ParseErrors> {
        self.sink.init();
        let mut errors = ParseErrors::default();
        while self.scanner.remaining() > 0 {
            if let Err(err) = self.statement() {
                errors.push(err);
                self.scanner.skip_to(b'\n');
            }
        }
        let trailing = self.span_from(self.scanner.offset());
        self.sink.done(trailing);
        errors.into_result()
    }

    fn statement(&mut self) -> Result<(), ParseError> {
        let start = self.scanner.offset();
        self.scanner.skip_ws();
        let keypos = self.scanner.position();
        match self.scanner.peek() {
            Some(b'[') => self.section_statement(start, keypos),
            Some(b) if section::is_key_start(b) => self.item_statement(start, keypos),
            Some(b'#' | b';' | b'\n') => {
                // Comment or blank line: consumed as part of the gap before
                // the next statement.
                self.scanner.skip_to(b'\n');
                self.scanner.skip(1);
                Ok(())
            }
            Some(_) => Err(self.error_here(SyntaxError::ExpectedSectionOrKey)),
            None => Ok(()),
        }
    }

    fn section_statement(&mut self, start: usize, keypos: Position) -> Result<(), ParseError> {
        let sec = self.parse_section_header()?;
        self.scanner.skip_ws();
        self.scanner.match_byte(b'\n');
        self.section = Some(sec.clone());
        let span = self.span_from(start);
        if let Err(err) = self.sink.section(SectionStart { section: sec, span }) {
            return Err(self.error_at(keypos, err));
        }
        Ok(())
    }

    fn parse_section_header(&mut self) -> Result<Section, ParseError> {
        self.scanner.skip(1); // opening '['
        let name = self.scanner.take_while(section::is_key_char);
        if name.is_empty() {
            return Err(self.error_here(SyntaxError::ExpectedSectionName));
        }
        let name = section::key_str(name).to_string();
        if self.scanner.match_byte(b']') {
            return Ok(Section::new(name));
        }
        if !self.scanner.skip_ws() {
            return Err(self.error_here(SyntaxError::ExpectedSubsection));
        }
        let Some(sub) = self.parse_subsection() else {
            return Err(self.error_here(SyntaxError::BadSubsection));
        };
        if !self.scanner.match_byte(b']') {
            return Err(self.error_here(SyntaxError::ExpectedCloseBracket));
        }
        Ok(Section {
            name,
            subsection: Some(sub),
        })
    }

    /// Scan a double-quoted subsection. `None` means the text at the cursor
    /// is not a well-formed quoted string (unterminated, or containing a
    /// literal newline or NUL); the cursor is only advanced on success.
    fn parse_subsection(&mut self) -> Option<BString> {
        let rest = self.scanner.rest();
        if rest.len() < 2 || rest[0] != b'"' {
            return None;
        }
        let mut out = Vec::new();
        let mut i = 1;
        while i + 1 < rest.len() {
            match rest[i] {
                b'"' => break,
                0 | b'\n' => return None,
                b'\\' => {
                    let next = rest[i + 1];
                    if next == b'\\' || next == b'"' {
                        out.push(next);
                    }
                    i += 1;
                }
                b => out.push(b),
            }
            i += 1;
        }
        if rest.get(i) != Some(&b'"') {
            return None;
        }
        self.scanner.skip(i + 1);
        Some(BString::from(out))
    }

    fn item_statement(&mut self, start: usize, keypos: Position) -> Result<(), ParseError> {
        let key = section::key_str(self.scanner.take_while(section::is_key_char));
        self.scanner.skip_ws();
        let mut value = None;
        let valpos;
        if self.scanner.match_byte(b'=') {
            self.scanner.skip_ws();
            valpos = self.scanner.position();
            value = Some(self.parse_value()?);
        } else {
            // A bare key: the rest of the line must be empty or a comment.
            match self.scanner.peek() {
                Some(b'\n' | b'#' | b';') | None => {}
                Some(_) => {
                    return Err(
                        self.error_here(SyntaxError::ExpectedAssignment(key.to_string()))
                    );
                }
            }
            valpos = self.scanner.position();
            if self.scanner.skip_to(b'\n') {
                self.scanner.skip(1);
            }
        }
        let span = self.span_from(start);
        let item = Item {
            section: self.section.as_ref(),
            key,
            value,
            span,
        };
        if let Err(err) = self.sink.item(item) {
            return Err(match err {
                SinkError::BadKey(msg) => self.error_at(keypos, msg),
                other => self.error_at(valpos, other),
            });
        }
        Ok(())
    }

    /// Scan a value up to the terminating newline or end of input. Quotes
    /// toggle in-quote mode and are stripped; backslash escapes are decoded;
    /// outside quotes a `#` or `;` starts a comment that runs to end of
    /// line (the newline still terminates the value).
    fn parse_value(&mut self) -> Result<BString, ParseError> {
        let mut out = Vec::new();
        let mut in_quote = false;
        let mut escape = false;
        loop {
            let c = self.scanner.peek();
            if escape {
                escape = false;
                match c {
                    Some(b @ (b'"' | b'\\')) => out.push(b),
                    Some(b'n') => out.push(b'\n'),
                    Some(b't') => out.push(b'\t'),
                    Some(b'b') => out.push(0x08),
                    // Escaped newline (optionally \r\n): line continuation,
                    // dropped from the value.
                    Some(b'\n') => {}
                    Some(b'\r') if self.scanner.at(1) == Some(b'\n') => self.scanner.skip(1),
                    Some(b) => return Err(self.error_here(SyntaxError::InvalidEscape(b as char))),
                    None => return Err(self.error_here(SyntaxError::IncompleteEscape)),
                }
                self.scanner.skip(1);
                continue;
            }
            match c {
                Some(b'\\') => {
                    escape = true;
                    self.scanner.skip(1);
                }
                Some(b'"') => {
                    in_quote = !in_quote;
                    self.scanner.skip(1);
                }
                Some(b'#' | b';') if !in_quote => {
                    self.scanner.skip_to(b'\n');
                }
                Some(b'\r') if self.scanner.at(1) == Some(b'\n') => {
                    self.scanner.skip(1);
                    if in_quote {
                        return Err(self.error_here(SyntaxError::MissingCloseQuote));
                    }
                    self.scanner.skip(1);
                    return Ok(BString::from(out));
                }
                Some(b'\n') | None => {
                    if in_quote {
                        return Err(self.error_here(SyntaxError::MissingCloseQuote));
                    }
                    self.scanner.skip(1);
                    return Ok(BString::from(out));
                }
                Some(b) => {
                    out.push(b);
                    self.scanner.skip(1);
                }
            }
        }
    }
}

/// Parse `contents`, delivering events to `sink`. The `filename` is used
/// only in error messages.
///
/// # Errors
///
/// Returns every recoverable diagnostic, in file order; parsing always runs
/// to the end of the buffer.
pub fn parse_bytes<S: Sink + ?Sized>(
    sink: &mut S,
    filename: &str,
    contents: &[u8],
) -> Result<(), ParseErrors> {
    Parser {
        scanner: Scanner::new(contents),
        file: filename,
        section: None,
        prev_end: 0,
        sink,
    }
    .run()
}

/// Open, read, and parse an INI file.
///
/// # Errors
///
/// I/O failures abort immediately as [`Error::Io`]; diagnostics from a
/// readable file come back together as [`Error::Parse`].
pub fn parse_file<S: Sink + ?Sized>(sink: &mut S, path: impl AsRef<Path>) -> Result<(), Error> {
    let path = path.as_ref();
    let contents = std::fs::read(path)?;
    let filename = path.display().to_string();
    parse_bytes(sink, &filename, &contents).map_err(Error::from)
}
