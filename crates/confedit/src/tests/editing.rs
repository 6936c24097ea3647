use crate::{Editor, Section};

fn editor(input: &str) -> Editor {
    let (editor, errors) = Editor::parse("test.ini", input);
    assert!(errors.is_empty(), "unexpected diagnostics: {errors}");
    editor
}

#[test]
fn untouched_document_round_trips() {
    let input = "# top comment\n\n[core]\n\tbare = false\n  loose = 1\n\n\
                 [remote \"origin\"]\n\turl = ssh://host/repo ; inline note\n\tbare\n\
                 \n; trailing\n";
    assert_eq!(editor(input).to_bytes(), input);
}

#[test]
fn round_trip_without_trailing_newline() {
    let input = "[core]\n\tbare = false";
    assert_eq!(editor(input).to_bytes(), input);
}

#[test]
fn set_replaces_in_place() {
    let mut ed = editor("[core]\n\tfoo = 1\n");
    ed.set(Some(&Section::new("core")), "foo", "2");
    assert_eq!(ed.to_bytes(), "[core]\n\tfoo = 2\n");
}

#[test]
fn delete_removes_every_occurrence() {
    let mut ed = editor("[core]\n\tfoo = 1\n\tfoo = 2\n");
    let core = Section::new("core");
    ed.delete(Some(&core), "foo");
    assert_eq!(ed.to_bytes(), "[core]\n");
    assert_eq!(ed.occurrences(Some(&core), "foo"), 0);
}

#[test]
fn delete_missing_key_is_noop() {
    let mut ed = editor("[core]\n\tfoo = 1\n");
    ed.delete(Some(&Section::new("core")), "absent");
    ed.delete(None, "foo");
    assert_eq!(ed.to_bytes(), "[core]\n\tfoo = 1\n");
}

#[test]
fn set_collapses_occurrences_to_the_last_position() {
    let mut ed = editor("[s]\nk = 1\nother = 9\nk = 2\n");
    ed.set(Some(&Section::new("s")), "k", "3");
    assert_eq!(ed.to_bytes(), "[s]\nother = 9\n\tk = 3\n");
}

#[test]
fn set_twice_with_same_value_is_stable() {
    let mut ed = editor("[s]\nk = 1\nk = 2\n");
    let s = Section::new("s");
    ed.set(Some(&s), "k", "9");
    let once = ed.to_bytes();
    ed.set(Some(&s), "k", "9");
    assert_eq!(ed.to_bytes(), once);
    assert_eq!(ed.occurrences(Some(&s), "k"), 1);
}

#[test]
fn add_appends_after_the_last_occurrence() {
    let mut ed = editor("[s]\nk = 1\n# note\nz = 9\n");
    ed.add(Some(&Section::new("s")), "k", "2");
    assert_eq!(ed.to_bytes(), "[s]\nk = 1\n\tk = 2\n# note\nz = 9\n");
    assert_eq!(ed.occurrences(Some(&Section::new("s")), "k"), 2);
}

#[test]
fn new_key_lands_at_section_end_before_following_comment() {
    // Comments bind to the following section, so a new key for [one] goes
    // before the comment block that precedes [two].
    let mut ed = editor("[one]\na = 1\n# about two\n[two]\nb = 2\n");
    ed.set(Some(&Section::new("one")), "c", "x");
    assert_eq!(
        ed.to_bytes(),
        "[one]\na = 1\n\tc = x\n# about two\n[two]\nb = 2\n"
    );
}

#[test]
fn new_key_in_last_section_precedes_trailing_comment() {
    let mut ed = editor("[a]\nx = 1\n# trailing\n");
    ed.set(Some(&Section::new("a")), "y", "2");
    assert_eq!(ed.to_bytes(), "[a]\nx = 1\n\ty = 2\n# trailing\n");
}

#[test]
fn fresh_section_synthesized_on_empty_document() {
    let mut ed = editor("");
    ed.set(Some(&Section::new("core")), "foo", "bar");
    assert_eq!(ed.to_bytes(), "[core]\n\tfoo = bar\n");
}

#[test]
fn fresh_section_appends_without_blank_line() {
    let mut ed = editor("[a]\nx = 1\n");
    ed.set(Some(&Section::new("b")), "k", "v");
    assert_eq!(ed.to_bytes(), "[a]\nx = 1\n[b]\n\tk = v\n");
}

#[test]
fn fresh_subsectioned_header_is_escaped() {
    let mut ed = editor("");
    let sec = Section::with_subsection("remote", "a\"b");
    ed.set(Some(&sec), "url", "u");
    assert_eq!(ed.to_bytes(), "[remote \"a\\\"b\"]\n\turl = u\n");
}

#[test]
fn consecutive_fresh_sections_each_get_headers() {
    let mut ed = editor("");
    ed.set(Some(&Section::new("a")), "x", "1");
    ed.set(Some(&Section::new("b")), "y", "2");
    ed.add(Some(&Section::new("a")), "x", "3");
    assert_eq!(ed.to_bytes(), "[a]\n\tx = 1\n\tx = 3\n[b]\n\ty = 2\n");
}

#[test]
fn preamble_keys_edit_under_the_empty_signature() {
    let mut ed = editor("a = 1\n[s]\nb = 2\n");
    ed.set(None, "a", "3");
    assert_eq!(ed.to_bytes(), "\ta = 3\n[s]\nb = 2\n");
}

#[test]
fn fresh_preamble_key_goes_before_the_first_header() {
    let mut ed = editor("# intro\n[s]\nb = 2\n");
    ed.set(None, "top", "1");
    assert_eq!(ed.to_bytes(), "\ttop = 1\n# intro\n[s]\nb = 2\n");
}

#[test]
fn values_are_escaped_when_rendered() {
    let mut ed = editor("");
    ed.set(Some(&Section::new("s")), "k", "a # b");
    assert_eq!(ed.to_bytes(), "[s]\n\tk = \"a # b\"\n");
}

#[test]
fn subsection_values_keep_identities_distinct() {
    let mut ed = editor("[r \"one\"]\nu = 1\n[r \"two\"]\nu = 2\n");
    ed.set(Some(&Section::with_subsection("r", "one")), "u", "9");
    assert_eq!(ed.to_bytes(), "[r \"one\"]\n\tu = 9\n[r \"two\"]\nu = 2\n");
}

#[test]
fn malformed_lines_still_round_trip() {
    let input = "[a]\n!!! not a statement\nx = 1\n";
    let (ed, errors) = Editor::parse("test.ini", input);
    assert_eq!(errors.len(), 1);
    assert_eq!(ed.to_bytes(), input);
}

#[test]
fn edits_apply_around_malformed_lines() {
    let input = "[a]\n!!! not a statement\nx = 1\n";
    let (mut ed, _) = Editor::parse("test.ini", input);
    ed.set(Some(&Section::new("a")), "x", "2");
    assert_eq!(ed.to_bytes(), "[a]\n!!! not a statement\n\tx = 2\n");
}

#[test]
fn write_to_matches_to_bytes() {
    let ed = editor("[core]\n\tfoo = 1\n");
    let mut out = Vec::new();
    let n = ed.write_to(&mut out).expect("vec write");
    assert_eq!(out, ed.to_bytes());
    assert_eq!(n, out.len() as u64);
}

#[test]
fn display_renders_the_document() {
    let ed = editor("[core]\n\tfoo = 1\n");
    assert_eq!(ed.to_string(), "[core]\n\tfoo = 1\n");
}
