//! Brace-depth lexer for C++ source lines.
//!
//! This is not a tokenizer for the whole language. It tracks just enough lexical
//! state (string and character literals, line and block comments) to count
//! structural braces correctly, which is what class span detection and
//! member-level filtering need.

/// Lexical facts about one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineInfo {
    /// Brace depth before the first character of the line.
    pub depth_start: usize,
    /// Brace depth after the last character of the line.
    pub depth_end: usize,
    /// Highest depth reached anywhere on the line.
    pub peak: usize,
    /// The line begins inside a `/* ... */` comment.
    pub starts_in_comment: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    BlockComment,
}

/// Compute [`LineInfo`] for every line.
///
/// Braces inside literals and comments are ignored. Closing braces never take
/// the depth below zero.
pub fn scan_lines<S: AsRef<str>>(lines: &[S]) -> Vec<LineInfo> {
    let mut infos = Vec::with_capacity(lines.len());
    let mut depth = 0usize;
    let mut state = State::Code;

    for line in lines {
        let mut info = LineInfo {
            depth_start: depth,
            depth_end: depth,
            peak: depth,
            starts_in_comment: state == State::BlockComment,
        };

        let chars: Vec<char> = line.as_ref().chars().collect();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            let next = chars.get(i + 1).copied();

            if state == State::BlockComment {
                if c == '*' && next == Some('/') {
                    state = State::Code;
                    i += 2;
                } else {
                    i += 1;
                }
                continue;
            }

            match c {
                '/' if next == Some('/') => break,
                '/' if next == Some('*') => {
                    state = State::BlockComment;
                    i += 2;
                    continue;
                }
                '"' => {
                    i = skip_quoted(&chars, i, '"');
                    continue;
                }
                // A quote right after an alphanumeric is a digit separator (1'000).
                '\'' if i == 0 || !chars[i - 1].is_ascii_alphanumeric() => {
                    i = skip_quoted(&chars, i, '\'');
                    continue;
                }
                '{' => {
                    depth += 1;
                    info.peak = info.peak.max(depth);
                }
                '}' => depth = depth.saturating_sub(1),
                _ => {}
            }
            i += 1;
        }

        info.depth_end = depth;
        infos.push(info);
    }

    infos
}

/// Returns the index just past the closing quote (or the end of the line).
fn skip_quoted(chars: &[char], open: usize, quote: char) -> usize {
    let mut i = open + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}

/// Whether a trimmed line is a whole-line comment.
pub fn is_comment_line(trimmed: &str) -> bool {
    trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*')
}

#[cfg(test)]
#[path = "lexer/lexer_tests.rs"]
mod lexer_tests;
