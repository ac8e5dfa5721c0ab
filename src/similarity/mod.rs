#![allow(dead_code)]
//! Semantic similarity scoring over precomputed word embeddings
//!
//! Wraps whichever vector backend is configured (or none) and never lets a
//! missing backend surface as an error: scores degrade to empty results and
//! the vocabulary check degrades to permissive.

pub mod backend;

use std::collections::HashMap;

use log::info;
use serde::Serialize;

use crate::puzzle::index::PositionIndex;
use self::backend::VectorBackend;

/// Similarity score attached to one body word position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionScore {
    pub pos: usize,
    pub score: f32,
}

/// The similarity capability handed to the session builder and the resolver.
pub struct SimilarityModel {
    backend: Option<Box<dyn VectorBackend>>,
}

impl SimilarityModel {
    pub fn new(backend: Box<dyn VectorBackend>) -> Self {
        SimilarityModel {
            backend: Some(backend),
        }
    }

    /// No backend: empty scores, permissive vocabulary.
    pub fn disabled() -> Self {
        SimilarityModel { backend: None }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// Dictionary check, case-insensitive. Permissive when no backend is
    /// loaded: restricting the vocabulary is opt-in, never a silent default.
    pub fn is_in_vocab(&self, word: &str) -> bool {
        match &self.backend {
            Some(backend) => backend.contains(&word.to_lowercase()),
            None => true,
        }
    }

    /// Unit-norm vector for a word; `None` when out of vocabulary, when no
    /// backend is loaded, or when the raw vector has zero norm.
    fn unit_vector(&self, word: &str) -> Option<Vec<f32>> {
        let mut vector = self.backend.as_ref()?.vector(word)?;
        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm == 0.0 {
            return None;
        }
        for x in &mut vector {
            *x /= norm;
        }
        Some(vector)
    }

    /// Embed every distinct body word once. Words without a vector are
    /// skipped; an unavailable backend yields an empty map, never an error.
    pub fn precompute<'a, I>(&self, vocab: I) -> HashMap<String, Vec<f32>>
    where
        I: IntoIterator<Item = &'a String>,
    {
        if self.backend.is_none() {
            return HashMap::new();
        }
        let mut embeddings = HashMap::new();
        for word in vocab {
            if let Some(vector) = self.unit_vector(word) {
                embeddings.insert(word.clone(), vector);
            }
        }
        if !embeddings.is_empty() {
            info!(
                "[similarity] Precomputed embeddings for {} vocab words.",
                embeddings.len()
            );
        }
        embeddings
    }

    /// Score a normalized guess against the precomputed body vocabulary.
    ///
    /// Returns one `{pos, score}` entry per occurrence of each vocabulary
    /// word (scores rounded to 3 decimals; occurrences of the same word share
    /// one score) and the best raw score across the vocabulary. Any
    /// unavailability (no backend, empty vocabulary, guess without a vector,
    /// dimensionality drift) yields `([], None)`.
    pub fn score_positions(
        &self,
        guess_norm: &str,
        vocab_embeddings: &HashMap<String, Vec<f32>>,
        word_index: &PositionIndex,
    ) -> (Vec<PositionScore>, Option<f32>) {
        if self.backend.is_none() || vocab_embeddings.is_empty() {
            return (Vec::new(), None);
        }
        let guess_vector = match self.unit_vector(guess_norm) {
            Some(v) => v,
            None => return (Vec::new(), None),
        };

        let mut scores = Vec::new();
        let mut best = -1.0f32;
        for (word, embedding) in vocab_embeddings {
            if embedding.len() != guess_vector.len() {
                return (Vec::new(), None);
            }
            let raw: f32 = embedding.iter().zip(&guess_vector).map(|(a, b)| a * b).sum();
            if raw > best {
                best = raw;
            }
            let rounded = (raw * 1000.0).round() / 1000.0;
            if let Some(positions) = word_index.get(word) {
                for &pos in positions {
                    scores.push(PositionScore {
                        pos,
                        score: rounded,
                    });
                }
            }
        }
        (scores, (best >= 0.0).then_some(best))
    }
}

#[cfg(test)]
mod tests {
    use super::backend::Word2VecBackend;
    use super::*;
    use crate::puzzle::index::build_word_index;
    use crate::puzzle::text::tokenize;

    const TABLE: &str = "eau 1.0 0.0\nvapeur 0.8 0.6\nsec -1.0 0.0\n";

    fn model() -> SimilarityModel {
        SimilarityModel::new(Box::new(
            Word2VecBackend::from_reader(TABLE.as_bytes()).unwrap(),
        ))
    }

    fn fixtures() -> (HashMap<String, Vec<f32>>, PositionIndex) {
        let model = model();
        let tokens = tokenize("eau et vapeur d'eau");
        let index = build_word_index(&tokens);
        let embeddings = model.precompute(index.keys());
        (embeddings, index)
    }

    #[test]
    fn test_precompute_skips_missing_words() {
        let (embeddings, _) = fixtures();
        // "eau" and "vapeur" have vectors; "et" and "d'eau" do not
        assert_eq!(embeddings.len(), 2);
        assert!(embeddings.contains_key("eau"));
        assert!(embeddings.contains_key("vapeur"));
    }

    #[test]
    fn test_precompute_vectors_are_unit_norm() {
        let (embeddings, _) = fixtures();
        for vector in embeddings.values() {
            let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_self_similarity_is_one() {
        let (embeddings, index) = fixtures();
        let (scores, best) = model().score_positions("eau", &embeddings, &index);
        let eau_pos = index["eau"][0];
        let self_score = scores.iter().find(|s| s.pos == eau_pos).unwrap().score;
        assert_eq!(self_score, 1.0);
        assert!((best.unwrap() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_occurrences_share_one_score() {
        let model = model();
        let tokens = tokenize("vapeur puis vapeur");
        let index = build_word_index(&tokens);
        let embeddings = model.precompute(index.keys());
        let (scores, _) = model.score_positions("eau", &embeddings, &index);
        let vapeur_scores: Vec<f32> = scores
            .iter()
            .filter(|s| index["vapeur"].contains(&s.pos))
            .map(|s| s.score)
            .collect();
        assert_eq!(vapeur_scores.len(), 2);
        assert_eq!(vapeur_scores[0], vapeur_scores[1]);
    }

    #[test]
    fn test_scores_are_rounded_to_three_decimals() {
        let (embeddings, index) = fixtures();
        let (scores, _) = model().score_positions("eau", &embeddings, &index);
        for entry in scores {
            let scaled = entry.score * 1000.0;
            assert!((scaled - scaled.round()).abs() < 1e-3);
        }
    }

    #[test]
    fn test_all_negative_best_is_none() {
        let model = model();
        let tokens = tokenize("sec");
        let index = build_word_index(&tokens);
        let embeddings = model.precompute(index.keys());
        // "eau" vs "sec" is -1.0: positions still scored, best reported as None
        let (scores, best) = model.score_positions("eau", &embeddings, &index);
        assert_eq!(scores.len(), 1);
        assert_eq!(best, None);
    }

    #[test]
    fn test_disabled_model_degrades() {
        let model = SimilarityModel::disabled();
        let (embeddings, index) = fixtures();
        let (scores, best) = model.score_positions("eau", &embeddings, &index);
        assert!(scores.is_empty());
        assert_eq!(best, None);
        assert!(model.precompute(index.keys()).is_empty());
    }

    #[test]
    fn test_out_of_vocab_guess_degrades() {
        let (embeddings, index) = fixtures();
        let (scores, best) = model().score_positions("xyzzy", &embeddings, &index);
        assert!(scores.is_empty());
        assert_eq!(best, None);
    }

    #[test]
    fn test_permissive_vocab_without_backend() {
        let model = SimilarityModel::disabled();
        assert!(model.is_in_vocab("nimportequoi"));
    }

    #[test]
    fn test_restrictive_vocab_with_backend() {
        let model = model();
        assert!(model.is_in_vocab("eau"));
        assert!(model.is_in_vocab("EAU"));
        assert!(!model.is_in_vocab("locomotive"));
    }
}
