//! Centralised runtime configuration loaded from environment variables

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Article loaded when neither the environment nor the CLI picks one.
pub const DEFAULT_ARTICLE: &str = "Locomotive à vapeur";

/// Default minimum guess length, in characters.
pub const DEFAULT_MIN_GUESS_LENGTH: usize = 1;

/// Default similarity threshold below which hint labels are dropped.
pub const DEFAULT_MIN_LABEL_SCORE: f32 = 0.40;

/// Runtime configuration. Environment variables are the base layer; CLI
/// flags override individual fields afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// `MOTCACHE_ARTICLE`: article title to load
    pub article_title: String,
    /// `MOTCACHE_ARTICLES_FILE`: pick a random title from this file instead
    pub articles_file: Option<PathBuf>,
    /// `MOTCACHE_CORPUS_DIR`: local corpus directory of `<slug>.json` files
    pub corpus_dir: Option<PathBuf>,
    /// `MOTCACHE_VECTORS`: word2vec-format vector table
    pub vectors_path: Option<PathBuf>,
    /// `MOTCACHE_LEXICON`: form<TAB>lemma lexicon file
    pub lexicon_path: Option<PathBuf>,
    /// `MOTCACHE_MIN_GUESS_LENGTH`: guesses shorter than this are invalid
    pub min_guess_length: usize,
    /// `MOTCACHE_MIN_LABEL_SCORE`: similarity threshold for hint labels
    pub min_label_score: f32,
    /// `MOTCACHE_LEXICAL_VECTORS`: use the built-in lexical vectors when no
    /// vector table is configured (default true)
    pub lexical_vectors: bool,
    /// `MOTCACHE_CACHE`: persist fetched puzzles to the on-disk cache
    pub use_cache: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            article_title: env_var("MOTCACHE_ARTICLE")
                .unwrap_or_else(|| DEFAULT_ARTICLE.to_string()),
            articles_file: env_var("MOTCACHE_ARTICLES_FILE").map(PathBuf::from),
            corpus_dir: env_var("MOTCACHE_CORPUS_DIR").map(PathBuf::from),
            vectors_path: env_var("MOTCACHE_VECTORS").map(PathBuf::from),
            lexicon_path: env_var("MOTCACHE_LEXICON").map(PathBuf::from),
            min_guess_length: env_parse("MOTCACHE_MIN_GUESS_LENGTH", DEFAULT_MIN_GUESS_LENGTH),
            min_label_score: env_parse("MOTCACHE_MIN_LABEL_SCORE", DEFAULT_MIN_LABEL_SCORE),
            lexical_vectors: env_flag("MOTCACHE_LEXICAL_VECTORS", true),
            use_cache: env_flag("MOTCACHE_CACHE", true),
        }
    }
}

fn env_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env_var(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str, default: bool) -> bool {
    match env_var(key) {
        Some(v) => matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"),
        None => default,
    }
}
