//! Structure-preserving parser and editor for git-config style INI files.
//!
//! The parser is a hand-written recursive-descent lexer over raw bytes with
//! per-statement error recovery: sections (optionally with quoted
//! subsections), multi-valued keys, shell-style comments, and the
//! git-config quoting/escaping rules. Parsed events are delivered to a
//! [`Sink`]; the bundled [`Editor`] sink builds an ordered sequence of byte
//! fragments so that single keys or whole sections can be replaced, deleted,
//! or appended without re-serializing anything else. Comments, blank lines,
//! indentation, and key order all survive the round trip untouched.
//!
//! # Examples
//!
//! ```
//! use confedit::{Editor, Section};
//!
//! let input = "# repo config\n[core]\n\tbare = false\n";
//! let (mut editor, errors) = Editor::parse("config", input);
//! assert!(errors.is_empty());
//!
//! let core = Section::new("core");
//! editor.set(Some(&core), "bare", "true");
//! editor.add(Some(&core), "hooks-path", ".hooks");
//! assert_eq!(
//!     editor.to_bytes(),
//!     "# repo config\n[core]\n\tbare = true\n\thooks-path = .hooks\n"
//! );
//! ```

mod bind;
mod edit_script;
mod editor;
mod error;
mod escape;
mod parser;
mod scanner;
mod section;

#[cfg(test)]
mod tests;

pub use bind::{BindValue, FieldSink};
pub use edit_script::EditScript;
pub use editor::Editor;
pub use error::{EditError, Error, ParseError, ParseErrors, SinkError};
pub use escape::escape_value;
pub use parser::{Item, SectionStart, Sink, Span, parse_bytes, parse_file};
pub use section::{Section, qualified_key, valid_key, valid_section, valid_subsection};
