use mdink_core::token::{CodeTokenizer, Token, TokenKind};
use syntect::parsing::{ParseState, Scope, ScopeStack, SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Tokenizer over syntect's parsing layer.
///
/// Resolution order for a language hint: extension, then name/token; an
/// unresolvable hint warns and, when guessing is enabled, falls back to
/// first-line detection, then to the configured default lexer, then to
/// plain text. Tokens are classified into the coarse [`TokenKind`]
/// categories by scope prefix.
pub struct SyntectTokenizer {
    syntax_set: SyntaxSet,
    classifiers: Vec<(Scope, TokenKind)>,
    guess: bool,
    default_lexer: String,
}

/// Scope prefix → category. Order matters: `keyword.operator` must win
/// over `keyword`.
const SCOPE_CATEGORIES: [(&str, TokenKind); 11] = [
    ("comment", TokenKind::Comment),
    ("string", TokenKind::Str),
    ("constant.numeric", TokenKind::Number),
    ("invalid", TokenKind::Error),
    ("keyword.operator", TokenKind::Operator),
    ("keyword", TokenKind::Keyword),
    ("storage", TokenKind::Keyword),
    ("entity.name", TokenKind::Name),
    ("support", TokenKind::Name),
    ("variable", TokenKind::Name),
    ("markup", TokenKind::Generic),
];

impl SyntectTokenizer {
    pub fn new() -> Self {
        Self::with_options(true, "python")
    }

    pub fn with_options(guess: bool, default_lexer: &str) -> Self {
        let classifiers = SCOPE_CATEGORIES
            .iter()
            .filter_map(|(prefix, kind)| Scope::new(prefix).ok().map(|s| (s, *kind)))
            .collect();
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            classifiers,
            guess,
            default_lexer: default_lexer.to_string(),
        }
    }

    fn syntax_for(&self, language: Option<&str>, code: &str) -> &SyntaxReference {
        if let Some(lang) = language.filter(|l| !l.is_empty()) {
            if let Some(syntax) = self.syntax_set.find_syntax_by_extension(lang) {
                return syntax;
            }
            if let Some(syntax) = self.syntax_set.find_syntax_by_token(lang) {
                return syntax;
            }
            log::warn!("no lexer for {lang:?}, falling back");
        }
        if self.guess {
            if let Some(syntax) = code
                .lines()
                .next()
                .and_then(|first| self.syntax_set.find_syntax_by_first_line(first))
            {
                return syntax;
            }
        }
        self.syntax_set
            .find_syntax_by_token(&self.default_lexer)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    fn classify(&self, stack: &ScopeStack) -> TokenKind {
        for scope in stack.scopes.iter().rev() {
            for (prefix, kind) in &self.classifiers {
                if prefix.is_prefix_of(*scope) {
                    return *kind;
                }
            }
        }
        TokenKind::Text
    }
}

impl Default for SyntectTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeTokenizer for SyntectTokenizer {
    fn tokenize(&self, language: Option<&str>, code: &str) -> Vec<Token> {
        let syntax = self.syntax_for(language, code);
        let mut state = ParseState::new(syntax);
        let mut stack = ScopeStack::new();
        let mut tokens: Vec<Token> = Vec::new();

        let mut push = |kind: TokenKind, literal: &str| {
            if literal.is_empty() {
                return;
            }
            // coalesce runs of the same category to keep escape churn down
            if let Some(last) = tokens.last_mut() {
                if last.kind == kind {
                    last.literal.push_str(literal);
                    return;
                }
            }
            tokens.push(Token::new(kind, literal));
        };

        for line in LinesWithEndings::from(code) {
            let ops = match state.parse_line(line, &self.syntax_set) {
                Ok(ops) => ops,
                Err(err) => {
                    log::debug!("parse error, emitting line unclassified: {err}");
                    push(TokenKind::Text, line);
                    continue;
                }
            };
            let mut last = 0usize;
            for (offset, op) in ops {
                if offset > last {
                    push(self.classify(&stack), &line[last..offset]);
                    last = offset;
                }
                if let Err(err) = stack.apply(&op) {
                    log::debug!("scope stack error: {err}");
                }
            }
            push(self.classify(&stack), &line[last..]);
        }
        tokens
    }
}
