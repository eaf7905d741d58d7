#![allow(non_snake_case)]

use super::*;

#[test]
fn SourceFile___from_text___splits_lines_and_keeps_trailing_newline() {
    let file = SourceFile::from_text("a.h", "one\ntwo\n");

    assert_eq!(file.lines(), &["one".to_string(), "two".to_string()]);
    assert_eq!(file.render(), "one\ntwo\n");
}

#[test]
fn SourceFile___from_text___without_trailing_newline___renders_identically() {
    let file = SourceFile::from_text("a.h", "one\ntwo");

    assert_eq!(file.len(), 2);
    assert_eq!(file.render(), "one\ntwo");
}

#[test]
fn SourceFile___from_text___crlf___preserves_line_endings() {
    let file = SourceFile::from_text("a.h", "one\r\ntwo\r\n");

    assert_eq!(file.line(0), Some("one"));
    assert_eq!(file.render(), "one\r\ntwo\r\n");
}

#[test]
fn SourceFile___from_text___empty___has_no_lines() {
    let file = SourceFile::from_text("a.h", "");

    assert!(file.is_empty());
    assert_eq!(file.render(), "");
}

#[test]
fn SourceFile___insert_lines___splices_before_index() {
    let mut file = SourceFile::from_text("a.h", "a\nc\n");

    file.insert_lines(1, vec!["b".to_string()]);

    assert_eq!(file.render(), "a\nb\nc\n");
}

#[test]
fn SourceFile___insert_lines___past_end___appends() {
    let mut file = SourceFile::from_text("a.h", "a\n");

    file.insert_lines(10, vec!["z".to_string()]);

    assert_eq!(file.render(), "a\nz\n");
}

#[test]
fn SourceFile___replace_line___out_of_range___returns_false() {
    let mut file = SourceFile::from_text("a.h", "a\n");

    assert!(file.replace_line(0, "b"));
    assert!(!file.replace_line(5, "c"));
    assert_eq!(file.render(), "b\n");
}

#[test]
fn SourceFile___persist___writes_rendered_content() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("Point.h");
    std::fs::write(&path, "old\n").unwrap();

    let mut file = SourceFile::read(&path).unwrap();
    file.replace_line(0, "new");
    file.persist().unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "new\n");
}

#[test]
fn SourceFile___read___missing_file___returns_io_error() {
    let result = SourceFile::read("/definitely/not/here.h");

    assert!(matches!(result, Err(GenError::Io { .. })));
}

#[cfg(unix)]
#[test]
fn SourceFile___persist___keeps_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("a.h");
    std::fs::write(&path, "old\n").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

    let mut file = SourceFile::read(&path).unwrap();
    file.replace_line(0, "new");
    file.persist().unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "new\n");
}
