//! Code block decoration: tokenize, color by category, shift to the
//! margin, gutter every line.

use mdink_core::ansi;
use mdink_core::markers::TOKENIZER_GUARD;
use mdink_core::theme::Palette;
use mdink_core::token::CodeTokenizer;

use crate::config::RenderConfig;
use crate::render::CODE_PREFIX;

/// Format one code block. `hierarchy` drives the indent; the language
/// hint, when present, goes to the tokenizer as-is.
pub(crate) fn format_block(
    raw: &str,
    lang: Option<&str>,
    hierarchy: usize,
    config: &RenderConfig,
) -> String {
    let palette = &config.palette;
    // ":-" confuses the tokenizer; guard it and put it back afterwards
    let guard = format!("{TOKENIZER_GUARD}--");
    let guarded = raw.replace(":-", &guard);
    let highlighted = match config.tokenizer.as_deref() {
        Some(tokenizer) => color_tokens(tokenizer, lang, &guarded, palette),
        None => guarded,
    };

    // shift to the far left no matter the source indent; screen space
    // matters more than author indentation
    let dedented = shift_to_margin(&highlighted);

    let indent = " ".repeat(hierarchy);
    let gutter = ansi::low(CODE_PREFIX, palette);
    let mut out = String::new();
    for line in dedented.split('\n') {
        out.push('\n');
        out.push_str(&indent);
        out.push_str(&gutter);
        out.push(' ');
        out.push_str(&ansi::fg(palette.code_fallback));
        out.push_str(line);
    }
    let out = out.replace(&guard, ":-");
    format!("{out}\n{}", ansi::RESET)
}

fn color_tokens(
    tokenizer: &dyn CodeTokenizer,
    lang: Option<&str>,
    code: &str,
    palette: &Palette,
) -> String {
    let mut out = String::new();
    for token in tokenizer.tokenize(lang, code) {
        if token.literal.is_empty() {
            continue;
        }
        match palette.token_color(token.kind) {
            Some(color) => out.push_str(&ansi::colorize(&token.literal, color, palette)),
            None => out.push_str(&token.literal),
        }
    }
    out
}

/// Remove the first line's leading spaces from every line that carries
/// them.
fn shift_to_margin(s: &str) -> String {
    let first = s.split('\n').next().unwrap_or("");
    let margin = first.len() - first.trim_start_matches(' ').len();
    if margin == 0 {
        return s.to_string();
    }
    let prefix = " ".repeat(margin);
    s.split('\n')
        .map(|line| line.strip_prefix(prefix.as_str()).unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdink_core::token::{Token, TokenKind};

    struct OneKeyword;
    impl CodeTokenizer for OneKeyword {
        fn tokenize(&self, _language: Option<&str>, code: &str) -> Vec<Token> {
            vec![Token::new(TokenKind::Keyword, code)]
        }
    }

    #[test]
    fn every_line_gets_the_gutter() {
        let config = RenderConfig::default();
        let out = format_block("a\nb", None, 2, &config);
        let plain = ansi::strip(&out);
        assert_eq!(plain, "\n  |  a\n  |  b\n");
    }

    #[test]
    fn guard_sequence_round_trips() {
        let config = RenderConfig::default();
        let out = format_block("x :- y", None, 2, &config);
        assert!(ansi::strip(&out).contains(":-"));
        assert!(!out.contains(TOKENIZER_GUARD));
    }

    #[test]
    fn tokens_are_colored_by_category() {
        let config = RenderConfig {
            tokenizer: Some(std::sync::Arc::new(OneKeyword)),
            ..RenderConfig::default()
        };
        let keyword_color = config.palette.code[2];
        let out = format_block("while", None, 2, &config);
        assert!(out.contains(&ansi::fg(keyword_color)));
    }

    #[test]
    fn source_indent_is_shifted_to_the_margin() {
        let config = RenderConfig::default();
        let out = format_block("    a\n    b\n      c", None, 2, &config);
        let plain = ansi::strip(&out);
        assert_eq!(plain, "\n  |  a\n  |  b\n  |    c\n");
    }
}
