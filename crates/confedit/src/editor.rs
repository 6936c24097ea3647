//! The fragment document model: parse a file once, edit it in place, and
//! serialize without touching any byte that was not explicitly changed.
//!
//! The document is an ordered sequence of immutable byte fragments (one per
//! comment/blank-line run, one per section header, one per key line) held
//! in an arena and doubly linked by stable [`FragId`] handles, so the
//! auxiliary indices survive unrelated insertions and removals. Removal
//! unlinks and tombstones a node; the arena never shifts.
//!
//! Two indices are derived during parsing and maintained by every edit:
//! qualified key → the fragments currently realizing that key, and section
//! signature → the fragment before which a fresh key line is inserted (the
//! section's end marker). Comments are associated with the *following*
//! section, as git-config does, so a section's end marker is the gap before
//! the next header.
//!
//! # Examples
//!
//! ```
//! use confedit::{Editor, Section};
//!
//! let input = "# tracked repos\n[remote \"origin\"]\n\turl = old\n";
//! let (mut editor, errors) = Editor::parse("config", input);
//! assert!(errors.is_empty());
//!
//! let origin = Section::with_subsection("remote", "origin");
//! editor.set(Some(&origin), "url", "https://example.com/repo.git");
//! assert_eq!(
//!     editor.to_bytes(),
//!     "# tracked repos\n[remote \"origin\"]\n\turl = https://example.com/repo.git\n"
//! );
//! ```

use std::{collections::HashMap, fmt, io, path::Path};

use bstr::{BStr, BString, ByteSlice};

use crate::{
    error::{ParseErrors, SinkError},
    escape::escape_value,
    parser::{Item, SectionStart, Sink, Span, parse_bytes},
    section::{Section, qualified_key, signature},
};

/// Stable handle to a fragment in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FragId(usize);

#[derive(Debug)]
struct Node {
    text: BString,
    prev: Option<FragId>,
    next: Option<FragId>,
    live: bool,
}

/// Arena-backed doubly-linked fragment sequence. Handles stay valid across
/// unrelated insertions and removals; removed nodes are tombstoned, never
/// reused.
#[derive(Debug, Default)]
struct FragList {
    nodes: Vec<Node>,
    head: Option<FragId>,
    tail: Option<FragId>,
}

impl FragList {
    fn alloc(&mut self, text: BString) -> FragId {
        let id = FragId(self.nodes.len());
        self.nodes.push(Node {
            text,
            prev: None,
            next: None,
            live: true,
        });
        id
    }

    fn push_back(&mut self, text: impl Into<BString>) -> FragId {
        let id = self.alloc(text.into());
        match self.tail {
            Some(tail) => {
                self.nodes[tail.0].next = Some(id);
                self.nodes[id.0].prev = Some(tail);
            }
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        id
    }

    fn insert_after(&mut self, at: FragId, text: impl Into<BString>) -> FragId {
        debug_assert!(self.nodes[at.0].live);
        let id = self.alloc(text.into());
        let next = self.nodes[at.0].next;
        self.nodes[id.0].prev = Some(at);
        self.nodes[id.0].next = next;
        self.nodes[at.0].next = Some(id);
        match next {
            Some(next) => self.nodes[next.0].prev = Some(id),
            None => self.tail = Some(id),
        }
        id
    }

    fn insert_before(&mut self, at: FragId, text: impl Into<BString>) -> FragId {
        debug_assert!(self.nodes[at.0].live);
        let id = self.alloc(text.into());
        let prev = self.nodes[at.0].prev;
        self.nodes[id.0].next = Some(at);
        self.nodes[id.0].prev = prev;
        self.nodes[at.0].prev = Some(id);
        match prev {
            Some(prev) => self.nodes[prev.0].next = Some(id),
            None => self.head = Some(id),
        }
        id
    }

    /// Unlink and tombstone. The handle must not be used again.
    fn remove(&mut self, id: FragId) {
        debug_assert!(self.nodes[id.0].live);
        let (prev, next) = (self.nodes[id.0].prev, self.nodes[id.0].next);
        match prev {
            Some(prev) => self.nodes[prev.0].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.nodes[next.0].prev = prev,
            None => self.tail = prev,
        }
        let node = &mut self.nodes[id.0];
        node.prev = None;
        node.next = None;
        node.live = false;
    }

    fn back(&self) -> Option<FragId> {
        self.tail
    }

    fn text(&self, id: FragId) -> &BStr {
        self.nodes[id.0].text.as_bstr()
    }

    fn set_text(&mut self, id: FragId, text: impl Into<BString>) {
        debug_assert!(self.nodes[id.0].live);
        self.nodes[id.0].text = text.into();
    }

    fn iter(&self) -> impl Iterator<Item = &BStr> {
        let mut next = self.head;
        core::iter::from_fn(move || {
            let id = next?;
            next = self.nodes[id.0].next;
            Some(self.text(id))
        })
    }
}

fn key_value_line(key: &str, value: &[u8]) -> BString {
    let mut line = Vec::with_capacity(key.len() + value.len() + 5);
    line.push(b'\t');
    line.extend_from_slice(key.as_bytes());
    line.extend_from_slice(b" = ");
    line.extend_from_slice(&escape_value(value));
    line.push(b'\n');
    BString::from(line)
}

/// A structure-preserving INI document.
///
/// Built once from raw bytes via [`Editor::parse`], then mutated in place
/// with [`delete`](Editor::delete), [`set`](Editor::set), and
/// [`add`](Editor::add). Serializing an unedited document reproduces the
/// input byte for byte; edits only touch the fragments realizing the edited
/// key.
#[derive(Debug, Default)]
pub struct Editor {
    fragments: FragList,
    /// Section signature → the fragment before which a fresh key line for
    /// that section is inserted.
    sec_end: HashMap<BString, FragId>,
    /// Qualified key → fragments currently assigning that key, in file
    /// order. Never holds an empty list.
    values: HashMap<BString, Vec<FragId>>,
    /// Section being filled while parsing; `None` outside a parse.
    current: Option<Section>,
}

impl Editor {
    /// Parse `contents` into an editor. The `filename` is used only in
    /// diagnostics.
    ///
    /// Diagnostics do not invalidate the editor: statements that failed to
    /// parse are preserved as raw comment/gap bytes, so serialization still
    /// reproduces the input.
    pub fn parse(filename: &str, contents: impl AsRef<[u8]>) -> (Editor, ParseErrors) {
        let mut editor = Editor::default();
        let errors = match parse_bytes(&mut editor, filename, contents.as_ref()) {
            Ok(()) => ParseErrors::default(),
            Err(errors) => errors,
        };
        (editor, errors)
    }

    /// Read and parse a file.
    ///
    /// # Errors
    ///
    /// Only I/O failures error out; parse diagnostics come back alongside
    /// the (still usable) editor.
    pub fn parse_file(path: impl AsRef<Path>) -> io::Result<(Editor, ParseErrors)> {
        let path = path.as_ref();
        let contents = std::fs::read(path)?;
        Ok(Self::parse(&path.display().to_string(), contents))
    }

    /// Remove every realization of the key. No-op if the key is absent.
    ///
    /// # Panics
    ///
    /// Panics if the section identity or key is syntactically invalid.
    pub fn delete(&mut self, section: Option<&Section>, key: &str) {
        let qkey = qualified_key(section, key);
        if let Some(ids) = self.values.remove(&qkey) {
            for id in ids {
                self.fragments.remove(id);
            }
        }
    }

    /// Replace every realization of the key with a single `key = value`
    /// line at the position of the last previous occurrence, or create the
    /// key (and its section, if needed) when it has none.
    ///
    /// # Panics
    ///
    /// Panics if the section identity or key is syntactically invalid.
    pub fn set(&mut self, section: Option<&Section>, key: &str, value: impl AsRef<[u8]>) {
        let qkey = qualified_key(section, key);
        let value = value.as_ref();
        if let Some(ids) = self.values.remove(&qkey) {
            if let Some(&last) = ids.last() {
                let id = self.fragments.insert_after(last, key_value_line(key, value));
                for old in ids {
                    self.fragments.remove(old);
                }
                self.values.insert(qkey, vec![id]);
                return;
            }
        }
        self.insert_fresh(section, qkey, key, value);
    }

    /// Append a new `key = value` line after the key's last occurrence
    /// without removing any previous one, or create the key (and its
    /// section, if needed) when it has none.
    ///
    /// # Panics
    ///
    /// Panics if the section identity or key is syntactically invalid.
    pub fn add(&mut self, section: Option<&Section>, key: &str, value: impl AsRef<[u8]>) {
        let qkey = qualified_key(section, key);
        let value = value.as_ref();
        if let Some(ids) = self.values.get_mut(&qkey) {
            if let Some(&last) = ids.last() {
                let id = self.fragments.insert_after(last, key_value_line(key, value));
                ids.push(id);
                return;
            }
        }
        self.insert_fresh(section, qkey, key, value);
    }

    /// How many lines currently assign the key.
    ///
    /// # Panics
    ///
    /// Panics if the section identity or key is syntactically invalid.
    #[must_use]
    pub fn occurrences(&self, section: Option<&Section>, key: &str) -> usize {
        self.values
            .get(&qualified_key(section, key))
            .map_or(0, Vec::len)
    }

    /// Create a fresh key line at the section's insertion point,
    /// synthesizing the section header and end marker if the section has
    /// never been seen.
    fn insert_fresh(&mut self, section: Option<&Section>, qkey: BString, key: &str, value: &[u8]) {
        let sig = signature(section);
        let marker = match self.sec_end.get(&sig) {
            Some(&id) => id,
            None => {
                let mut header = sig.clone();
                header.push(b'\n');
                // Reuse a trailing empty marker in place so the synthesized
                // header does not introduce a spurious blank line.
                let header_id = match self.fragments.back() {
                    Some(id) if self.fragments.text(id).is_empty() => {
                        self.fragments.set_text(id, header);
                        id
                    }
                    _ => self.fragments.push_back(header),
                };
                let marker = self.fragments.insert_after(header_id, BString::default());
                self.sec_end.insert(sig, marker);
                marker
            }
        };
        let id = self.fragments.insert_before(marker, key_value_line(key, value));
        self.values.entry(qkey).or_default().push(id);
    }

    fn append_span(&mut self, span: &Span<'_>) -> (Option<FragId>, Option<FragId>) {
        let gap = if span.start > span.prev_end {
            Some(self.fragments.push_back(span.gap()))
        } else {
            None
        };
        let stmt = if span.end > span.start {
            Some(self.fragments.push_back(span.text()))
        } else {
            None
        };
        (gap.or(stmt), stmt)
    }

    /// Serialize the document's current state.
    #[must_use]
    pub fn to_bytes(&self) -> BString {
        let mut out = Vec::new();
        for frag in self.fragments.iter() {
            out.extend_from_slice(frag);
        }
        BString::from(out)
    }

    /// Write the document's current state, returning the byte count.
    ///
    /// # Errors
    ///
    /// Propagates the first write failure.
    pub fn write_to<W: io::Write>(&self, w: &mut W) -> io::Result<u64> {
        let mut written = 0u64;
        for frag in self.fragments.iter() {
            w.write_all(frag)?;
            written += frag.len() as u64;
        }
        Ok(written)
    }
}

impl fmt::Display for Editor {
    /// Lossy rendering for human output; use [`Editor::to_bytes`] or
    /// [`Editor::write_to`] for exact bytes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frag in self.fragments.iter() {
            frag.fmt(f)?;
        }
        Ok(())
    }
}

impl Sink for Editor {
    fn section(&mut self, sec: SectionStart<'_>) -> Result<(), SinkError> {
        // The gap before a header belongs to the new section, so it is the
        // previous section's end marker.
        let (first, _) = self.append_span(&sec.span);
        if let Some(id) = first {
            self.sec_end.insert(signature(self.current.as_ref()), id);
        }
        self.current = Some(sec.section);
        Ok(())
    }

    fn item(&mut self, item: Item<'_>) -> Result<(), SinkError> {
        let qkey = item.qualified_key();
        let (_, stmt) = self.append_span(&item.span);
        if let Some(id) = stmt {
            self.values.entry(qkey).or_default().push(id);
        }
        Ok(())
    }

    fn done(&mut self, trailing: Span<'_>) {
        let (first, _) = self.append_span(&trailing);
        let id = first.unwrap_or_else(|| self.fragments.push_back(BString::default()));
        self.sec_end.insert(signature(self.current.as_ref()), id);
        self.current = None;
    }
}
