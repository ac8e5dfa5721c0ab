//! Position indices over a token sequence
//!
//! Both indices map a normalized key to the ascending list of word-token
//! positions it occurs at. The exact index keys on the normalized surface
//! form; the lemma index keys on the normalized lemma, which groups every
//! morphological variant of a word under one entry.

use std::collections::HashMap;

use super::lemma::LemmaResolver;
use super::text::{normalize, Token};

/// Normalized key -> ascending word-token positions.
pub type PositionIndex = HashMap<String, Vec<usize>>;

/// Exact-match index: `normalize(surface)` -> positions.
pub fn build_word_index(tokens: &[Token]) -> PositionIndex {
    let mut index = PositionIndex::new();
    for (pos, token) in tokens.iter().enumerate() {
        if let Some(key) = &token.normalized {
            index.entry(key.clone()).or_default().push(pos);
        }
    }
    index
}

/// Lemma index: `normalize(lemmatize(lowercase(surface)))` -> positions.
///
/// The surface form is lemmatized with its accents intact and the lemma is
/// normalized afterwards, so both sides of a lookup compare accent-free.
pub fn build_lemma_index(tokens: &[Token], lemmas: &LemmaResolver) -> PositionIndex {
    let mut index = PositionIndex::new();
    for (pos, token) in tokens.iter().enumerate() {
        if !token.is_word() {
            continue;
        }
        let lemma = lemmas.lemmatize(&token.text.to_lowercase());
        index.entry(normalize(&lemma)).or_default().push(pos);
    }
    index
}
