//! Puzzle session: the immutable per-puzzle snapshot
//!
//! Built once from a source document (tokenize both sequences, build the
//! indices, precompute vocabulary embeddings), then shared read-only by
//! every guess evaluation. Replacing a puzzle means building a whole new
//! session and swapping it in; a session is never mutated.

pub mod index;
pub mod lemma;
pub mod text;

use std::collections::HashMap;

use log::info;

use crate::similarity::SimilarityModel;
use crate::source::SourceDocument;
use self::index::{build_lemma_index, build_word_index, PositionIndex};
use self::lemma::LemmaResolver;
use self::text::{normalize, tokenize, Token};

/// Everything guess resolution reads, frozen at build time.
pub struct PuzzleSession {
    /// Stable identifier derived from the normalized title.
    pub id: String,
    /// Canonical title, revealed only on a solved title guess.
    pub title: String,
    /// Normalized title for the exact title-guess comparison.
    pub title_normalized: String,
    /// Body token sequence; positions index into this.
    pub tokens: Vec<Token>,
    /// Title token sequence, independent of the body.
    pub title_tokens: Vec<Token>,
    /// Body exact index: normalized surface -> positions.
    pub word_index: PositionIndex,
    /// Body lemma index: normalized lemma -> positions.
    pub lemma_index: PositionIndex,
    /// Title lemma index (title reveal is lemma-only).
    pub title_lemma_index: PositionIndex,
    /// Unit-norm embedding per distinct normalized body word.
    pub vocab_embeddings: HashMap<String, Vec<f32>>,
}

impl PuzzleSession {
    /// Build a complete session from a source document. The returned value
    /// is fully initialized, embeddings included, before anyone sees it.
    pub fn build(
        doc: &SourceDocument,
        lemmas: &LemmaResolver,
        model: &SimilarityModel,
    ) -> PuzzleSession {
        let tokens = tokenize(&doc.intro_text);
        let word_index = build_word_index(&tokens);
        let lemma_index = build_lemma_index(&tokens, lemmas);

        let title_tokens = tokenize(&doc.title);
        let title_lemma_index = build_lemma_index(&title_tokens, lemmas);
        let title_normalized = normalize(&doc.title);

        let vocab_embeddings = model.precompute(word_index.keys());

        let id = format!("fr-{}", title_normalized);
        info!(
            "[puzzle] Built session {} ({} body tokens, {} distinct words).",
            id,
            tokens.len(),
            word_index.len()
        );

        PuzzleSession {
            id,
            title: doc.title.clone(),
            title_normalized,
            tokens,
            title_tokens,
            word_index,
            lemma_index,
            title_lemma_index,
            vocab_embeddings,
        }
    }

    /// Number of word tokens in the body.
    pub fn word_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.is_word()).count()
    }
}
