#![allow(non_snake_case)]

use super::*;

fn depths(src: &str) -> Vec<(usize, usize)> {
    let lines: Vec<&str> = src.lines().collect();
    scan_lines(&lines)
        .into_iter()
        .map(|info| (info.depth_start, info.depth_end))
        .collect()
}

#[test]
fn scan_lines___simple_class___tracks_depth() {
    let result = depths("class A {\n  int x;\n};");

    assert_eq!(result, vec![(0, 1), (1, 1), (1, 0)]);
}

#[test]
fn scan_lines___brace_in_string___is_ignored() {
    let result = depths("class A {\n  const char* s = \"{{\";\n};");

    assert_eq!(result, vec![(0, 1), (1, 1), (1, 0)]);
}

#[test]
fn scan_lines___escaped_quote_in_string___stays_in_literal() {
    let result = depths("x = \"a\\\"{\";\n{");

    assert_eq!(result, vec![(0, 0), (0, 1)]);
}

#[test]
fn scan_lines___brace_in_char_literal___is_ignored() {
    let result = depths("char c = '{';\nchar d = '\\'';");

    assert_eq!(result, vec![(0, 0), (0, 0)]);
}

#[test]
fn scan_lines___digit_separator___is_not_a_char_literal() {
    let result = depths("int n = 1'000; {");

    assert_eq!(result, vec![(0, 1)]);
}

#[test]
fn scan_lines___brace_in_line_comment___is_ignored() {
    let result = depths("int x; // {\n{");

    assert_eq!(result, vec![(0, 0), (0, 1)]);
}

#[test]
fn scan_lines___block_comment_across_lines___is_ignored() {
    let lines = ["/* start {", "still { comment", "end */ {"];

    let infos = scan_lines(&lines);

    assert_eq!(infos[0].depth_end, 0);
    assert!(infos[1].starts_in_comment);
    assert_eq!(infos[1].depth_end, 0);
    assert_eq!(infos[2].depth_end, 1);
}

#[test]
fn scan_lines___one_line_class___records_peak() {
    let infos = scan_lines(&["class A { int x; };"]);

    assert_eq!(infos[0].depth_start, 0);
    assert_eq!(infos[0].peak, 1);
    assert_eq!(infos[0].depth_end, 0);
}

#[test]
fn scan_lines___unbalanced_close___saturates_at_zero() {
    let result = depths("}}\n{");

    assert_eq!(result, vec![(0, 0), (0, 1)]);
}

#[test]
fn is_comment_line___recognizes_comment_shapes() {
    assert!(is_comment_line("// note"));
    assert!(is_comment_line("/*@Serializable*/"));
    assert!(is_comment_line("* continued"));
    assert!(!is_comment_line("int x;"));
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn scan_lines___any_input___one_info_per_line(lines in proptest::collection::vec(".*", 0..20)) {
            let infos = scan_lines(&lines);
            prop_assert_eq!(infos.len(), lines.len());
        }

        #[test]
        fn scan_lines___any_input___depth_chains_between_lines(lines in proptest::collection::vec("[{}/*\"' a]*", 1..20)) {
            let infos = scan_lines(&lines);
            for pair in infos.windows(2) {
                prop_assert_eq!(pair[0].depth_end, pair[1].depth_start);
            }
            for info in &infos {
                prop_assert!(info.peak >= info.depth_start);
                prop_assert!(info.peak >= info.depth_end);
            }
        }
    }
}
