use bstr::BString;
use quickcheck_macros::quickcheck;

use super::Recorder;
use crate::{Editor, Section, escape_value, parse_bytes};

/// Escaping then parsing recovers the original value bytes.
#[quickcheck]
fn escape_then_parse_is_identity(val: Vec<u8>) -> bool {
    let mut line = b"k = ".to_vec();
    line.extend_from_slice(&escape_value(&val));
    line.push(b'\n');

    let mut rec = Recorder::default();
    parse_bytes(&mut rec, "prop", &line).is_ok()
        && rec.items == [(BString::from("k"), Some(BString::from(val)))]
}

/// An untouched editor reproduces its input byte for byte, diagnostics or not.
#[quickcheck]
fn unedited_documents_round_trip(contents: Vec<u8>) -> bool {
    let (editor, _) = Editor::parse("prop", &contents);
    editor.to_bytes() == contents
}

/// A value written through the editor survives a reparse of the output.
#[quickcheck]
fn written_values_reparse_exactly(val: Vec<u8>) -> bool {
    let mut editor = Editor::default();
    editor.set(Some(&Section::new("core")), "k", &val);

    let (reread, errors) = Editor::parse("prop", editor.to_bytes());
    errors.is_empty()
        && reread
            .occurrences(Some(&Section::new("core")), "k")
            == 1
        && {
            let mut rec = Recorder::default();
            parse_bytes(&mut rec, "prop", editor.to_bytes().as_slice()).is_ok()
                && rec.items == [(BString::from("core.k"), Some(BString::from(val)))]
        }
}
