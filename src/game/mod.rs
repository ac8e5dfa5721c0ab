//! Guess resolution: the decision algorithm behind every submitted word
//!
//! A guess resolves to one of four statuses (invalid, unknown, hit, miss)
//! as a pure function of the session snapshot and the input. The resolver
//! holds no state; concurrent evaluations share nothing but the snapshot.

pub mod dictionary;

use std::collections::{BTreeMap, HashSet};

use crate::api::{GuessResponse, GuessStatus, TitleGuessResponse};
use crate::puzzle::lemma::LemmaResolver;
use crate::puzzle::text::normalize;
use crate::puzzle::PuzzleSession;
use crate::similarity::{PositionScore, SimilarityModel};

/// Tunable guess-resolution thresholds.
#[derive(Debug, Clone, Copy)]
pub struct GameRules {
    /// Guesses shorter than this (in characters, after trimming) are invalid.
    pub min_guess_length: usize,
    /// Similarity labels below this score are dropped from responses.
    pub min_label_score: f32,
}

impl Default for GameRules {
    fn default() -> Self {
        GameRules {
            min_guess_length: 1,
            min_label_score: 0.40,
        }
    }
}

/// Resolve one word guess against a session snapshot.
///
/// Order matters: length check, dictionary check, then one lemma lookup
/// shared by title and body. The title lookup and the similarity scores are
/// computed regardless of the body outcome: a guess can reveal title words
/// on a body miss, and hit responses label still-hidden lookalikes.
pub fn resolve_guess(
    session: &PuzzleSession,
    lemmas: &LemmaResolver,
    model: &SimilarityModel,
    rules: &GameRules,
    raw_guess: &str,
) -> GuessResponse {
    let guess = raw_guess.trim();
    if guess.chars().count() < rules.min_guess_length {
        return GuessResponse::status_only(GuessStatus::Invalid);
    }

    if !dictionary::is_known(model, guess) {
        return GuessResponse::status_only(GuessStatus::Unknown);
    }

    // One lemma key covers the exact form and every morphological variant
    let lemma_key = normalize(&lemmas.lemmatize(&guess.to_lowercase()));

    let title_revealed_texts = session.title_lemma_index.get(&lemma_key).map(|positions| {
        positions
            .iter()
            .map(|&pos| (pos, session.title_tokens[pos].text.clone()))
            .collect::<BTreeMap<usize, String>>()
    });

    // Scores feed miss hints and, on hits, labels for the other positions
    let guess_norm = normalize(guess);
    let (pos_scores, best_score) =
        model.score_positions(&guess_norm, &session.vocab_embeddings, &session.word_index);

    if let Some(positions) = session.lemma_index.get(&lemma_key) {
        let revealed_now: HashSet<usize> = positions.iter().copied().collect();
        let revealed_texts: BTreeMap<usize, String> = positions
            .iter()
            .map(|&pos| (pos, session.tokens[pos].text.clone()))
            .collect();
        let hit_scores: Vec<PositionScore> = pos_scores
            .into_iter()
            .filter(|s| s.score >= rules.min_label_score && !revealed_now.contains(&s.pos))
            .collect();
        return GuessResponse {
            status: GuessStatus::Hit,
            positions: positions.clone(),
            revealed_texts: Some(revealed_texts),
            title_revealed_texts,
            similarity: None,
            word_scores: (!hit_scores.is_empty()).then_some(hit_scores),
        };
    }

    let word_scores: Vec<PositionScore> = pos_scores
        .into_iter()
        .filter(|s| s.score >= rules.min_label_score)
        .collect();
    GuessResponse {
        status: GuessStatus::Miss,
        positions: Vec::new(),
        revealed_texts: None,
        title_revealed_texts,
        similarity: best_score,
        word_scores: Some(word_scores),
    }
}

/// Resolve a title guess: exact normalized comparison, no lemma leniency.
/// The canonical title is returned only when solved.
pub fn resolve_title_guess(session: &PuzzleSession, raw_guess: &str) -> TitleGuessResponse {
    let solved = normalize(raw_guess.trim()) == session.title_normalized;
    TitleGuessResponse {
        solved,
        title: solved.then(|| session.title.clone()),
    }
}
