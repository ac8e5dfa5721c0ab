//! French dictionary validation
//!
//! Uses the vocabulary of the loaded vector backend (the same vocabulary
//! that similarity scoring runs over) so "unknown word" and "no score"
//! always agree. Permits every word when no backend is loaded.

use crate::similarity::SimilarityModel;

/// Return true if `word` is a known French word. Case-insensitive.
pub fn is_known(model: &SimilarityModel, word: &str) -> bool {
    model.is_in_vocab(word)
}
