//! Token stream model for code highlighting.
//!
//! Tokenizing is an external concern: backends implement [`CodeTokenizer`]
//! and live in their own crate. The renderer only maps token categories to
//! palette colors.

/// Coarse token categories the palette knows how to color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Name,
    Comment,
    Str,
    Error,
    Number,
    Operator,
    Generic,
    /// Anything the backend could not classify; rendered uncolored.
    Text,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>) -> Self {
        Self {
            kind,
            literal: literal.into(),
        }
    }
}

/// A code tokenizer: raw code plus an optional language hint in,
/// `(category, literal)` pairs out. Implementations must cover the whole
/// input (concatenated literals reproduce the code) and never fail; a
/// backend that cannot resolve a language falls back to something.
pub trait CodeTokenizer {
    fn tokenize(&self, language: Option<&str>, code: &str) -> Vec<Token>;
}

/// Fallback tokenizer: one unclassified token for the whole input.
pub struct PlainTokenizer;

impl CodeTokenizer for PlainTokenizer {
    fn tokenize(&self, _language: Option<&str>, code: &str) -> Vec<Token> {
        vec![Token::new(TokenKind::Text, code)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_tokenizer_is_lossless() {
        let tokens = PlainTokenizer.tokenize(Some("rust"), "fn main() {}");
        let joined: String = tokens.iter().map(|t| t.literal.as_str()).collect();
        assert_eq!(joined, "fn main() {}");
    }
}
