//! Inverse highlighting for source files: the file is mostly code and the
//! markdown lives in docstrings opened with `"""_`, `'''_` or `/*_`. The
//! file is re-assembled into markdown with the code fenced.

/// What to keep when preprocessing a source file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HiliteMode {
    /// Docstrings and code.
    #[default]
    All,
    /// Code only.
    Code,
    /// Docstrings only.
    Doc,
    /// Only the first (module-level) docstring.
    Mod,
    /// No preprocessing.
    Off,
}

impl HiliteMode {
    /// Unknown mode strings fall back to [`HiliteMode::All`].
    pub fn from_arg(arg: &str) -> Self {
        match arg {
            "code" => HiliteMode::Code,
            "doc" => HiliteMode::Doc,
            "mod" => HiliteMode::Mod,
            "off" => HiliteMode::Off,
            _ => HiliteMode::All,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Code,
    Markdown,
}

fn docstring_closer(line: &str) -> Option<&'static str> {
    match line {
        "\"\"\"_" => Some("\"\"\""),
        "'''_" => Some("'''"),
        "/*_" => Some("*/"),
        _ => None,
    }
}

/// Re-assemble a source file into markdown according to `mode`.
pub fn code_hilite(source: &str, mode: HiliteMode) -> String {
    if mode == HiliteMode::Off {
        return source.to_string();
    }

    let mut blocks: Vec<(BlockKind, Vec<&str>)> = vec![(BlockKind::Code, Vec::new())];
    let mut closer: Option<&str> = None;
    for line in source.lines() {
        let trimmed = line.trim_end();
        match closer {
            None => {
                if let Some(close) = docstring_closer(trimmed) {
                    closer = Some(close);
                    blocks.push((BlockKind::Markdown, Vec::new()));
                    continue;
                }
            }
            Some(close) if trimmed == close => {
                closer = None;
                blocks.push((BlockKind::Code, Vec::new()));
                continue;
            }
            Some(_) => {}
        }
        if let Some((_, block)) = blocks.last_mut() {
            block.push(line);
        }
    }

    let mut out: Vec<String> = Vec::new();
    let mut docstrings_taken = 0usize;
    for (kind, lines) in blocks {
        let body = lines.join("\n");
        if body.is_empty() {
            continue;
        }
        match kind {
            BlockKind::Code => {
                if matches!(mode, HiliteMode::All | HiliteMode::Code) {
                    out.push(format!("```\n{body}\n```"));
                }
            }
            BlockKind::Markdown => {
                if mode == HiliteMode::Code {
                    continue;
                }
                if mode == HiliteMode::Mod && docstrings_taken > 0 {
                    continue;
                }
                docstrings_taken += 1;
                out.push(body);
            }
        }
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: &str = "\
import os
\"\"\"_
# First doc
\"\"\"
x = 1
\"\"\"_
second doc
\"\"\"
y = 2";

    #[test]
    fn all_keeps_code_fenced_and_docs_inline() {
        let out = code_hilite(SRC, HiliteMode::All);
        assert!(out.contains("```\nimport os\n```"));
        assert!(out.contains("# First doc"));
        assert!(out.contains("second doc"));
        assert!(out.contains("```\ny = 2\n```"));
    }

    #[test]
    fn code_drops_docstrings() {
        let out = code_hilite(SRC, HiliteMode::Code);
        assert!(!out.contains("First doc"));
        assert!(out.contains("x = 1"));
    }

    #[test]
    fn doc_keeps_only_docstrings() {
        let out = code_hilite(SRC, HiliteMode::Doc);
        assert!(out.contains("# First doc"));
        assert!(out.contains("second doc"));
        assert!(!out.contains("import os"));
    }

    #[test]
    fn mod_keeps_only_the_first_docstring() {
        let out = code_hilite(SRC, HiliteMode::Mod);
        assert!(out.contains("# First doc"));
        assert!(!out.contains("second doc"));
        assert!(!out.contains("x = 1"));
    }

    #[test]
    fn c_style_openers_close_with_star_slash() {
        let src = "/*_\ndoc\n*/\ncode();";
        let out = code_hilite(src, HiliteMode::All);
        assert!(out.contains("doc"));
        assert!(out.contains("```\ncode();\n```"));
    }

    #[test]
    fn off_passes_through_and_unknown_means_all() {
        assert_eq!(code_hilite(SRC, HiliteMode::Off), SRC);
        assert_eq!(HiliteMode::from_arg("bogus"), HiliteMode::All);
        assert_eq!(HiliteMode::from_arg("mod"), HiliteMode::Mod);
    }
}
