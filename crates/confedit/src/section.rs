//! Section identities and qualified keys.
//!
//! A git-config file groups keys under `[name]` or `[name "subsection"]`
//! headers. `Option<Section>` is the identity type throughout the crate: the
//! `None` case is the "section-free" preamble before the first header, which
//! the git-config man page rejects but the git-config tool halfway supports.
//!
//! The preamble is indexed under the empty signature. That only works
//! because real section names can never be empty: [`valid_section`] rejects
//! `""`, and `section_empty_is_invalid` below pins the invariant.

use core::fmt;

use bstr::{BString, ByteSlice};

fn is_alpha(b: u8) -> bool {
    b.is_ascii_alphabetic()
}

/// True for the bytes allowed in section names and keys: ASCII letters,
/// digits, and `-`.
pub(crate) fn is_key_char(b: u8) -> bool {
    is_alpha(b) || b.is_ascii_digit() || b == b'-'
}

pub(crate) fn is_key_start(b: u8) -> bool {
    is_alpha(b)
}

/// Whether `name` is a legal section name: non-empty, ASCII letters, digits,
/// and `-` only.
#[must_use]
pub fn valid_section(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(is_key_char)
}

/// Whether `sub` is a legal subsection: any bytes except newline and NUL.
#[must_use]
pub fn valid_subsection(sub: &[u8]) -> bool {
    !sub.iter().any(|&b| b == b'\n' || b == 0)
}

/// Whether `key` is a legal key: a letter followed by letters, digits,
/// and `-`.
#[must_use]
pub fn valid_key(key: &str) -> bool {
    let mut bytes = key.bytes();
    match bytes.next() {
        Some(b) if is_key_start(b) => bytes.all(is_key_char),
        _ => false,
    }
}

/// A section identity: a name plus an optional subsection.
///
/// Two identities are equal iff both components compare equal; an absent
/// subsection is distinct from any present one.
///
/// # Examples
///
/// ```
/// use confedit::Section;
///
/// let plain = Section::new("remote");
/// let sub = Section::with_subsection("remote", "origin");
/// assert_ne!(plain, sub);
/// assert_eq!(sub.to_string(), "[remote \"origin\"]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Section {
    /// Section name; must satisfy [`valid_section`] to be usable in edits.
    pub name: String,
    /// Optional subsection; arbitrary bytes except newline and NUL.
    pub subsection: Option<BString>,
}

impl Section {
    /// A section without a subsection.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subsection: None,
        }
    }

    /// A section with a subsection.
    pub fn with_subsection(name: impl Into<String>, subsection: impl Into<BString>) -> Self {
        Self {
            name: name.into(),
            subsection: Some(subsection.into()),
        }
    }

    /// Whether both components pass their character-set checks.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        valid_section(&self.name)
            && self
                .subsection
                .as_ref()
                .is_none_or(|s| valid_subsection(s))
    }

    /// Append the header rendering, `[name]` or `[name "subsection"]`, with
    /// `\` and `"` backslash-escaped inside the quotes.
    pub(crate) fn append_signature(&self, out: &mut Vec<u8>) {
        out.push(b'[');
        out.extend_from_slice(self.name.as_bytes());
        if let Some(sub) = &self.subsection {
            out.extend_from_slice(b" \"");
            for &b in sub.iter() {
                if b == b'\\' || b == b'"' {
                    out.push(b'\\');
                }
                out.push(b);
            }
            out.push(b'"');
        }
        out.push(b']');
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        self.append_signature(&mut buf);
        write!(f, "{}", buf.as_bstr())
    }
}

/// Header signature used as the section index key; the preamble renders as
/// the empty string.
pub(crate) fn signature(section: Option<&Section>) -> BString {
    let mut out = Vec::new();
    if let Some(sec) = section {
        sec.append_signature(&mut out);
    }
    BString::from(out)
}

/// The dot-joined `section[.subsection].key` lookup key, as understood by
/// the git-config command. `None` (the preamble) qualifies to the bare key.
///
/// # Panics
///
/// Panics if the section identity or the key fails its validity check; this
/// is the single gate that keeps malformed identities out of the editor's
/// indices.
#[must_use]
pub fn qualified_key(section: Option<&Section>, key: &str) -> BString {
    assert!(
        section.is_none_or(Section::is_valid),
        "invalid INI section {section:?}"
    );
    assert!(valid_key(key), "invalid INI key {key:?}");
    let mut out = Vec::new();
    if let Some(sec) = section {
        out.extend_from_slice(sec.name.as_bytes());
        out.push(b'.');
        if let Some(sub) = &sec.subsection {
            out.extend_from_slice(sub);
            out.push(b'.');
        }
    }
    out.extend_from_slice(key.as_bytes());
    BString::from(out)
}

/// Borrow-friendly rendering of a parsed key slice.
pub(crate) fn key_str(bytes: &[u8]) -> &str {
    // Key bytes pass is_key_char, so the slice is ASCII and valid UTF-8.
    core::str::from_utf8(bytes).unwrap_or_default()
}
