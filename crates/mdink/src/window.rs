//! Display window: show the rendered text from a substring onward,
//! capped to a number of lines (`substring[:max_lines]`).

/// Cut the final text down to a window around `from`. When the substring
/// is absent the window starts at the top. `rows` is the terminal height;
/// the default line budget leaves a little room under it.
pub fn display_from(text: &str, from: &str, rows: usize) -> String {
    let default_lines = rows.saturating_sub(6);
    let (needle, max_lines) = match from.split_once(':') {
        Some((n, m)) => (n, m.parse().unwrap_or(default_lines)),
        None => (from, default_lines),
    };

    let Some(pos) = text.find(needle) else {
        return text
            .lines()
            .take(max_lines)
            .collect::<Vec<_>>()
            .join("\n");
    };

    let pre = &text[..pos];
    let post = &text[pos + needle.len()..];

    // keep the last two lines before the match for context
    let mut tail: Vec<&str> = pre.rsplitn(3, '\n').take(2).collect();
    tail.reverse();
    let tail = tail.join("\n");

    let head: Vec<&str> = post.split('\n').take(max_lines).collect();
    format!("\n(...){tail}{needle}{}", head.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "one\ntwo\nthree\nfour\nfive\nsix\nseven";

    #[test]
    fn windows_from_the_substring() {
        let out = display_from(TEXT, "four", 100);
        assert!(out.starts_with("\n(...)"));
        assert!(out.contains("three\nfour"));
        assert!(out.contains("seven"));
        assert!(!out.contains("two"));
    }

    #[test]
    fn line_budget_caps_the_tail() {
        let out = display_from(TEXT, "two:2", 100);
        assert!(out.contains("two\nthree"));
        assert!(!out.contains("four"));
    }

    #[test]
    fn absent_substring_windows_from_the_top() {
        let out = display_from(TEXT, "nowhere", 8);
        assert_eq!(out, "one\ntwo");
    }
}
