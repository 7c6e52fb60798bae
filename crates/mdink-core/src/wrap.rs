//! Width-aware text reflow.
//!
//! Runs before any coloring: input is plain text possibly carrying inline
//! marker bytes, which count as width 1. Code passes through untouched, as
//! does text that already fits and the opaque stash placeholders.

use unicode_width::UnicodeWidthChar;

use crate::markers::{self, STASH_END, STASH_START};

/// Narrower than this is not worth wrapping to.
pub const MIN_COLUMNS: usize = 5;

/// Reflow `text` to the width left over after `indent` and `prefix`.
///
/// `is_code` short-circuits: code is never rewrapped. Long words are kept
/// whole and may overflow the line.
pub fn reflow(text: &str, is_code: bool, columns: usize, indent: &str, prefix: &str) -> String {
    let budget = display_width(indent) + display_width(prefix);
    let cols = columns.saturating_sub(budget).max(MIN_COLUMNS);
    if is_code || display_width(text) <= cols {
        return text.to_string();
    }
    // An embedded raw-block reference is opaque: never split it.
    if text.starts_with(STASH_START) && text.ends_with(STASH_END) {
        return text.to_string();
    }
    let dedented = textwrap::dedent(text);
    wrap_words(dedented.trim(), cols)
}

/// Display width with marker bytes counting as one column.
pub fn display_width(text: &str) -> usize {
    text.chars()
        .map(|ch| {
            if markers::is_marker(ch) {
                1
            } else {
                ch.width().unwrap_or(0)
            }
        })
        .sum()
}

fn wrap_words(text: &str, cols: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    let mut line_w = 0usize;
    for word in text.split_whitespace() {
        let w = display_width(word);
        if line.is_empty() {
            line.push_str(word);
            line_w = w;
        } else if line_w + 1 + w > cols {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
            line_w = w;
        } else {
            line.push(' ');
            line.push_str(word);
            line_w += 1 + w;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::{EMPH_END, EMPH_START};

    #[test]
    fn fitting_text_passes_through() {
        assert_eq!(reflow("short", false, 80, "", ""), "short");
    }

    #[test]
    fn code_is_never_rewrapped() {
        let code = "let x = some_very_long_function_name(argument_one, argument_two);";
        assert_eq!(reflow(code, true, 20, "", ""), code);
    }

    #[test]
    fn wraps_at_the_available_width() {
        let out = reflow("alpha beta gamma delta", false, 13, "  ", "");
        assert_eq!(out, "alpha beta\ngamma delta");
        for line in out.lines() {
            assert!(display_width(line) <= 11);
        }
    }

    #[test]
    fn width_floor_is_five() {
        let out = reflow("one two three", false, 10, "        ", "");
        for line in out.lines() {
            assert!(display_width(line) <= MIN_COLUMNS);
        }
    }

    #[test]
    fn long_words_are_not_broken() {
        let out = reflow("a reallyquitelongunbreakableword b", false, 10, "", "");
        assert!(out.lines().any(|l| l == "reallyquitelongunbreakableword"));
    }

    #[test]
    fn placeholders_are_opaque() {
        let stashed = format!("{STASH_START}0{STASH_END}");
        assert_eq!(reflow(&stashed, false, 3, "", ""), stashed);
    }

    #[test]
    fn never_gains_printable_characters_and_never_splits_words() {
        let text = format!("start {EMPH_START}marked span{EMPH_END} and more trailing words");
        let out = reflow(&text, false, 14, "", "");
        let printable = |s: &str| s.chars().filter(|c| !c.is_whitespace()).count();
        assert!(printable(&out) <= printable(&text));
        // every source word survives intact on some line
        for word in text.split_whitespace() {
            assert!(out.lines().any(|l| l.split_whitespace().any(|w| w == word)));
        }
    }

    #[test]
    fn marker_bytes_count_one_column() {
        let marked = format!("{EMPH_START}abc{EMPH_END}");
        assert_eq!(display_width(&marked), 5);
        assert_eq!(display_width("漢字"), 4);
    }

    #[test]
    fn dedents_common_indent_before_wrapping() {
        let text = "    indented words that will not fit on one line at all";
        let out = reflow(text, false, 20, "", "");
        assert!(out.lines().next().unwrap().starts_with("indented"));
    }
}
