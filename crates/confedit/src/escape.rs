//! Value escaping: the inverse of the value grammar.
//!
//! [`escape_value`] and the parser's value scanning are exact inverses for
//! every byte string, except that a value of leading whitespace only is
//! ambiguous on the wire; escaping resolves the ambiguity by quoting.

use bstr::BString;

/// Whether serializing `val` verbatim would not survive a round trip: it
/// starts with whitespace, or contains a control byte, DEL, a non-ASCII
/// byte, or one of `"`, `#`, `;`, `\`.
pub(crate) fn needs_quotes(val: &[u8]) -> bool {
    match val.first() {
        None => false,
        Some(b' ' | b'\t') => true,
        Some(_) => val
            .iter()
            .any(|&b| b < b' ' || b >= 0x7f || matches!(b, b'"' | b'#' | b';' | b'\\')),
    }
}

/// Render `val` so the value grammar parses it back exactly.
///
/// Values that round-trip verbatim are returned untouched; anything else is
/// double-quoted, with `"` and `\` backslash-escaped and backspace, newline,
/// and tab rendered as `\b`, `\n`, `\t`.
///
/// # Examples
///
/// ```
/// use confedit::escape_value;
///
/// assert_eq!(escape_value(b"plain"), "plain");
/// assert_eq!(escape_value(b"a # b"), "\"a # b\"");
/// assert_eq!(escape_value(b"tab\there"), "\"tab\\there\"");
/// ```
#[must_use]
pub fn escape_value(val: &[u8]) -> BString {
    if !needs_quotes(val) {
        return BString::from(val);
    }
    let mut out = Vec::with_capacity(val.len() + 2);
    out.push(b'"');
    for &b in val {
        match b {
            b'"' | b'\\' => {
                out.push(b'\\');
                out.push(b);
            }
            0x08 => out.extend_from_slice(b"\\b"),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\t' => out.extend_from_slice(b"\\t"),
            _ => out.push(b),
        }
    }
    out.push(b'"');
    BString::from(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_values_pass_through() {
        assert!(!needs_quotes(b""));
        assert!(!needs_quotes(b"plain value"));
        assert_eq!(escape_value(b"url = ok"), "url = ok");
    }

    #[test]
    fn leading_whitespace_forces_quotes() {
        assert!(needs_quotes(b" x"));
        assert!(needs_quotes(b"\tx"));
        assert_eq!(escape_value(b" x"), "\" x\"");
    }

    #[test]
    fn special_bytes_force_quotes() {
        assert!(needs_quotes(b"a#b"));
        assert!(needs_quotes(b"a;b"));
        assert!(needs_quotes(b"a\"b"));
        assert!(needs_quotes(b"a\\b"));
        assert!(needs_quotes(b"a\x7fb"));
        assert!(needs_quotes(b"caf\xc3\xa9"));
    }

    #[test]
    fn named_escapes() {
        assert_eq!(escape_value(b"a\nb\tc\x08d"), "\"a\\nb\\tc\\bd\"");
        assert_eq!(escape_value(b"q\"w\\e"), "\"q\\\"w\\\\e\"");
    }
}
