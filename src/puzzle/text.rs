//! Text normalization and tokenization
//!
//! Splits raw French text into an ordered sequence of word and separator
//! tokens. Word tokens keep their exact surface form (case and accents are
//! needed for reveals) plus an accent-free lowercase key used for matching.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// A word run: a Unicode word character followed by word characters,
/// apostrophes or hyphens. Keeps hyphenated compounds ("chemin-de-fer")
/// and elided forms ("l'industrie") as single tokens.
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w[\w'-]*").expect("valid word pattern"));

/// Token kind: a maskable word or verbatim inter-word text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Separator,
}

/// A single token of the source text.
///
/// Concatenating `text` of all tokens in order reconstructs the input
/// exactly. `normalized` is set for word tokens only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub normalized: Option<String>,
}

impl Token {
    fn word(text: &str) -> Self {
        Token {
            kind: TokenKind::Word,
            text: text.to_string(),
            normalized: Some(normalize(text)),
        }
    }

    fn separator(text: &str) -> Self {
        Token {
            kind: TokenKind::Separator,
            text: text.to_string(),
            normalized: None,
        }
    }

    /// True for word tokens.
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    /// Character count of the surface form (what a masked view exposes).
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Lowercase and strip accents for matching.
///
/// Lowercases, decomposes (NFKD), then drops every combining mark, so
/// `"LIBERTÉ"` and `"liberté"` both become `"liberte"`. Idempotent.
pub fn normalize(word: &str) -> String {
    word.to_lowercase()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Split text into word and separator tokens.
///
/// Every byte of the input lands in exactly one token, in order; leading
/// and trailing non-word text becomes separator tokens too.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    for m in WORD_RE.find_iter(text) {
        if m.start() > pos {
            tokens.push(Token::separator(&text[pos..m.start()]));
        }
        tokens.push(Token::word(m.as_str()));
        pos = m.end();
    }
    if pos < text.len() {
        tokens.push(Token::separator(&text[pos..]));
    }
    tokens
}
