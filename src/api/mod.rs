#![allow(dead_code)]
//! Query surface: request/response shapes and the service facade
//!
//! Transport-agnostic request/response contracts (what an HTTP layer would
//! serialize verbatim) plus `GameService`, which owns the published session
//! snapshot and hands every call a consistent view of it.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::game::{self, GameRules};
use crate::puzzle::lemma::LemmaResolver;
use crate::puzzle::text::Token;
use crate::puzzle::PuzzleSession;
use crate::similarity::{PositionScore, SimilarityModel};

/// One element of a masked token stream. Word tokens expose only their
/// character count; separators pass through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "t", rename_all = "lowercase")]
pub enum TokenView {
    Word { len: usize },
    Sep { v: String },
}

impl TokenView {
    fn of(token: &Token) -> TokenView {
        if token.is_word() {
            TokenView::Word {
                len: token.char_len(),
            }
        } else {
            TokenView::Sep {
                v: token.text.clone(),
            }
        }
    }
}

/// The masked puzzle, as served to a fresh client.
#[derive(Debug, Clone, Serialize)]
pub struct PuzzleView {
    pub puzzle_id: String,
    pub language: String,
    pub title_tokens: Vec<TokenView>,
    pub tokens: Vec<TokenView>,
    pub total_words: usize,
}

/// A word-guess request, as a transport layer would deserialize it.
#[derive(Debug, Clone, Deserialize)]
pub struct GuessRequest {
    pub guess: String,
}

/// A title-guess request.
#[derive(Debug, Clone, Deserialize)]
pub struct TitleGuessRequest {
    pub title_guess: String,
}

/// Outcome classification of one guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GuessStatus {
    Invalid,
    Unknown,
    Hit,
    Miss,
}

/// Full response to one word guess.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuessResponse {
    pub status: GuessStatus,
    pub positions: Vec<usize>,
    /// Body position -> original surface form, for positions revealed now.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revealed_texts: Option<BTreeMap<usize, String>>,
    /// Title position -> original surface form, whenever the title matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_revealed_texts: Option<BTreeMap<usize, String>>,
    /// Best similarity across the vocabulary (miss only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f32>,
    /// Similarity labels for still-hidden positions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_scores: Option<Vec<PositionScore>>,
}

impl GuessResponse {
    /// Response carrying only a status (invalid / unknown short-circuits).
    pub fn status_only(status: GuessStatus) -> GuessResponse {
        GuessResponse {
            status,
            positions: Vec::new(),
            revealed_texts: None,
            title_revealed_texts: None,
            similarity: None,
            word_scores: None,
        }
    }
}

/// Response to a title guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleGuessResponse {
    pub solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Owns the published session and the capabilities guess resolution needs.
///
/// The session sits behind `RwLock<Arc<..>>`: readers clone the `Arc` and
/// work on that snapshot, `replace` swaps in a fully built new session.
/// No reader ever observes a partially built or mixed session.
pub struct GameService {
    session: RwLock<Arc<PuzzleSession>>,
    lemmas: LemmaResolver,
    model: SimilarityModel,
    rules: GameRules,
}

impl GameService {
    pub fn new(
        session: PuzzleSession,
        lemmas: LemmaResolver,
        model: SimilarityModel,
        rules: GameRules,
    ) -> GameService {
        GameService {
            session: RwLock::new(Arc::new(session)),
            lemmas,
            model,
            rules,
        }
    }

    /// The current session snapshot. Later replacements do not affect it.
    pub fn snapshot(&self) -> Arc<PuzzleSession> {
        Arc::clone(&self.session.read().expect("session lock poisoned"))
    }

    /// Atomically publish a new session. Callers holding the old snapshot
    /// keep a valid view until they drop it.
    pub fn replace(&self, session: PuzzleSession) {
        *self.session.write().expect("session lock poisoned") = Arc::new(session);
    }

    /// Masked token streams for both title and body.
    pub fn puzzle(&self) -> PuzzleView {
        let session = self.snapshot();
        PuzzleView {
            puzzle_id: session.id.clone(),
            language: "fr".to_string(),
            title_tokens: session.title_tokens.iter().map(TokenView::of).collect(),
            tokens: session.tokens.iter().map(TokenView::of).collect(),
            total_words: session.word_count(),
        }
    }

    /// Resolve one word guess against the current snapshot.
    pub fn guess(&self, text: &str) -> GuessResponse {
        let session = self.snapshot();
        game::resolve_guess(&session, &self.lemmas, &self.model, &self.rules, text)
    }

    /// Resolve one title guess against the current snapshot.
    pub fn guess_title(&self, text: &str) -> TitleGuessResponse {
        let session = self.snapshot();
        game::resolve_title_guess(&session, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceDocument;

    fn service_for(title: &str, body: &str) -> GameService {
        let lemmas = LemmaResolver::without_lexicon();
        let model = SimilarityModel::disabled();
        let doc = SourceDocument {
            title: title.to_string(),
            intro_text: body.to_string(),
        };
        let session = PuzzleSession::build(&doc, &lemmas, &model);
        GameService::new(session, lemmas, model, GameRules::default())
    }

    #[test]
    fn test_masked_word_exposes_only_length() {
        let view = service_for("Paris", "Été chaud.").puzzle();
        assert_eq!(view.tokens[0], TokenView::Word { len: 3 });
        let json = serde_json::to_string(&view.tokens[0]).unwrap();
        assert_eq!(json, r#"{"t":"word","len":3}"#);
        assert!(!json.contains("Été"));
    }

    #[test]
    fn test_separators_pass_through_verbatim() {
        let view = service_for("Paris", "a, b").puzzle();
        assert_eq!(
            view.tokens[1],
            TokenView::Sep {
                v: ", ".to_string()
            }
        );
    }

    #[test]
    fn test_puzzle_view_counts_words() {
        let view = service_for("Paris", "Paris est la capitale.").puzzle();
        assert_eq!(view.total_words, 4);
        assert_eq!(view.language, "fr");
        assert_eq!(view.puzzle_id, "fr-paris");
    }

    #[test]
    fn test_guess_response_serialization_skips_empty_fields() {
        let response = GuessResponse::status_only(GuessStatus::Invalid);
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"status":"invalid","positions":[]}"#);
    }

    #[test]
    fn test_revealed_map_uses_position_keys() {
        let service = service_for("Paris", "Une locomotive à vapeur.");
        let response = service.guess("locomotive");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""revealed_texts":{"2":"locomotive"}"#));
    }

    #[test]
    fn test_replace_swaps_snapshot_atomically() {
        let service = service_for("Paris", "Paris est grand.");
        assert_eq!(service.guess("paris").status, GuessStatus::Hit);

        let lemmas = LemmaResolver::without_lexicon();
        let model = SimilarityModel::disabled();
        let doc = SourceDocument {
            title: "Lyon".to_string(),
            intro_text: "Lyon est une ville.".to_string(),
        };
        service.replace(PuzzleSession::build(&doc, &lemmas, &model));

        assert_eq!(service.guess("paris").status, GuessStatus::Miss);
        assert_eq!(service.guess("lyon").status, GuessStatus::Hit);
        assert_eq!(service.puzzle().puzzle_id, "fr-lyon");
    }

    #[test]
    fn test_old_snapshot_stays_valid_after_replace() {
        let service = service_for("Paris", "Paris est grand.");
        let old = service.snapshot();

        let lemmas = LemmaResolver::without_lexicon();
        let model = SimilarityModel::disabled();
        let doc = SourceDocument {
            title: "Lyon".to_string(),
            intro_text: "Lyon est une ville.".to_string(),
        };
        service.replace(PuzzleSession::build(&doc, &lemmas, &model));

        assert_eq!(old.id, "fr-paris");
        assert!(old.word_index.contains_key("paris"));
    }
}
