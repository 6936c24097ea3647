//! Deferred, validated batches of edit operations.
//!
//! An [`EditScript`] queues named `delete`/`set`/`add` operations (for
//! example, accumulated from command-line flags) and later applies them to
//! an [`Editor`] in order. Validity (argument count, section and subsection
//! character sets) is checked when an operation is appended, before anything
//! is queued, so a bad operation never half-applies a batch.
//!
//! Each operation takes a section name plus a variable-length argument list
//! disambiguated by length: `[key]` or `[subsection, key]` for `delete`, and
//! `[key, value]` or `[subsection, key, value]` for `set` and `add`.
//!
//! # Examples
//!
//! ```
//! use confedit::{EditScript, Editor};
//!
//! let mut script = EditScript::new();
//! script.set("core", &["bare", "true"]).unwrap();
//! script.delete("remote", &["origin", "mirror"]).unwrap();
//!
//! let (mut editor, _) = Editor::parse("config", "[core]\n\tbare = false\n");
//! script.apply(&mut editor);
//! assert!(script.is_empty());
//! assert_eq!(editor.to_bytes(), "[core]\n\tbare = true\n");
//! ```

use bstr::BString;

use crate::{editor::Editor, error::EditError, section::Section};

#[derive(Debug, Clone)]
enum Op {
    Delete {
        section: Section,
        key: String,
    },
    Set {
        section: Section,
        key: String,
        value: BString,
    },
    Add {
        section: Section,
        key: String,
        value: BString,
    },
}

/// A batch of edits to be applied to an INI document.
#[derive(Debug, Clone, Default)]
pub struct EditScript {
    ops: Vec<Op>,
}

/// Split a length-disambiguated argument list into (section, key) plus the
/// value when `with_value` is set, validating the section identity.
fn split_args(
    section: &str,
    args: &[&str],
    with_value: bool,
) -> Result<(Section, String, Option<BString>), EditError> {
    let base = usize::from(with_value);
    let (section, key, value) = match args.len() {
        n if n == base + 1 => (
            Section::new(section),
            args[0],
            with_value.then(|| BString::from(args[1])),
        ),
        n if n == base + 2 => (
            Section::with_subsection(section, args[0]),
            args[1],
            with_value.then(|| BString::from(args[2])),
        ),
        _ => return Err(EditError::InvalidArgCount),
    };
    if !section.is_valid() {
        return Err(EditError::InvalidSection);
    }
    Ok((section, key.to_string(), value))
}

impl EditScript {
    /// An empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Queue a key deletion. Invoke as `delete(sec, &[key])` or
    /// `delete(sec, &[subsection, key])`.
    ///
    /// # Errors
    ///
    /// Rejects a malformed argument list or invalid section without queuing.
    pub fn delete(&mut self, section: &str, args: &[&str]) -> Result<(), EditError> {
        let (section, key, _) = split_args(section, args, false)?;
        self.ops.push(Op::Delete { section, key });
        Ok(())
    }

    /// Queue a key replacement. Invoke as `set(sec, &[key, value])` or
    /// `set(sec, &[subsection, key, value])`.
    ///
    /// # Errors
    ///
    /// Rejects a malformed argument list or invalid section without queuing.
    pub fn set(&mut self, section: &str, args: &[&str]) -> Result<(), EditError> {
        let (section, key, value) = split_args(section, args, true)?;
        self.ops.push(Op::Set {
            section,
            key,
            value: value.unwrap_or_default(),
        });
        Ok(())
    }

    /// Queue a key addition. Invoke as `add(sec, &[key, value])` or
    /// `add(sec, &[subsection, key, value])`.
    ///
    /// # Errors
    ///
    /// Rejects a malformed argument list or invalid section without queuing.
    pub fn add(&mut self, section: &str, args: &[&str]) -> Result<(), EditError> {
        let (section, key, value) = split_args(section, args, true)?;
        self.ops.push(Op::Add {
            section,
            key,
            value: value.unwrap_or_default(),
        });
        Ok(())
    }

    /// Run every queued operation against `target` in order, then clear the
    /// batch.
    ///
    /// # Panics
    ///
    /// Panics if a queued key is not a syntactically valid key name; key
    /// legality is not part of the eager argument checks.
    pub fn apply(&mut self, target: &mut Editor) {
        for op in self.ops.drain(..) {
            match op {
                Op::Delete { section, key } => target.delete(Some(&section), &key),
                Op::Set {
                    section,
                    key,
                    value,
                } => target.set(Some(&section), &key, &value),
                Op::Add {
                    section,
                    key,
                    value,
                } => target.add(Some(&section), &key, &value),
            }
        }
    }
}
