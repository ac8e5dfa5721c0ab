#![allow(dead_code)]
//! French lemmatization
//!
//! Maps an inflected surface form to its lemma so that a guess of an
//! infinitive reveals every conjugated occurrence and vice versa. A
//! morphological lexicon (loaded from disk) does the heavy lifting when
//! configured; a built-in rule table is the always-available fallback, so
//! lemmatization never fails.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// French elision prefixes: l'industrie -> industrie, d'eau -> eau, qu'il -> il.
static ELISION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)(?:l|d|j|m|t|s|n|c|qu)'(.+)$").expect("valid elision pattern"));

/// Contracted articles that general-purpose lexicons map to wrong lemmas
/// (partitive "des" comes back as "un"). Checked before the lexicon.
const CONTRACTIONS: [(&str, &str); 4] = [("des", "de"), ("du", "de"), ("au", "a"), ("aux", "a")];

/// Placeholder lemma some lexicon dumps use for pronouns; never a usable result.
const PRONOUN_PLACEHOLDER: &str = "-PRON-";

/// Built-in fallback lemma pairs, embedded at build time.
static FALLBACK_DATA: &str = include_str!("../../data/lemmes_fr.tsv");

static FALLBACK_LEMMAS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    FALLBACK_DATA
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('\t'))
        .collect()
});

/// Plural suffix rewrites, tried longest-first before the generic -s strip.
const SUFFIX_RULES: [(&str, &str); 3] = [("eaux", "eau"), ("aux", "al"), ("oux", "ou")];

/// A morphological lemma source. `None` means the word is unknown to the
/// backend; the caller falls through to the rule-based lemmatizer.
pub trait Lexicon: Send + Sync {
    fn lemma(&self, word: &str) -> Option<String>;
}

/// Errors loading a lexicon file.
#[derive(Debug)]
pub enum LexiconError {
    /// Could not read the file
    Io(std::io::Error),
    /// A line had no tab-separated form/lemma pair
    MalformedLine { line: usize },
}

impl std::fmt::Display for LexiconError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexiconError::Io(e) => write!(f, "failed to read lexicon: {}", e),
            LexiconError::MalformedLine { line } => {
                write!(f, "lexicon line {} is not a form<TAB>lemma pair", line)
            }
        }
    }
}

impl std::error::Error for LexiconError {}

impl From<std::io::Error> for LexiconError {
    fn from(e: std::io::Error) -> Self {
        LexiconError::Io(e)
    }
}

/// Lexicon backed by a form<TAB>lemma file (Lefff-style extract).
/// Blank lines and `#` comments are ignored.
pub struct FileLexicon {
    entries: HashMap<String, String>,
}

impl FileLexicon {
    pub fn from_path(path: &Path) -> Result<Self, LexiconError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, LexiconError> {
        let mut entries = HashMap::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (form, lemma) = line
                .split_once('\t')
                .ok_or(LexiconError::MalformedLine { line: idx + 1 })?;
            entries.insert(form.to_string(), lemma.to_string());
        }
        Ok(FileLexicon { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Lexicon for FileLexicon {
    fn lemma(&self, word: &str) -> Option<String> {
        self.entries.get(word).cloned()
    }
}

/// Rule-based fallback: embedded exception table, then plural suffix
/// rewrites, then a generic plural -s strip. Always returns something.
fn rule_lemma(word: &str) -> String {
    if let Some(lemma) = FALLBACK_LEMMAS.get(word) {
        return (*lemma).to_string();
    }
    for (suffix, replacement) in SUFFIX_RULES {
        if word.len() > suffix.len() + 1 && word.ends_with(suffix) {
            return format!("{}{}", &word[..word.len() - suffix.len()], replacement);
        }
    }
    if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

/// The lemmatizer adapter: elision stripping and contraction overrides in
/// front of an optional lexicon, with the rule fallback behind it.
pub struct LemmaResolver {
    lexicon: Option<Box<dyn Lexicon>>,
}

impl LemmaResolver {
    pub fn new(lexicon: Box<dyn Lexicon>) -> Self {
        LemmaResolver {
            lexicon: Some(lexicon),
        }
    }

    /// Rule fallback only; used when no lexicon file is configured.
    pub fn without_lexicon() -> Self {
        LemmaResolver { lexicon: None }
    }

    /// Lemmatize a lowercased (possibly accented) word.
    ///
    /// Pipeline: strip elision prefix, apply contraction overrides, ask the
    /// lexicon, fall back to the rules. A missing or unhelpful lexicon never
    /// surfaces as an error.
    pub fn lemmatize(&self, word_lower: &str) -> String {
        let word = match ELISION_RE.captures(word_lower) {
            Some(caps) => caps.get(1).map_or(word_lower, |m| m.as_str()),
            None => word_lower,
        };

        for (form, lemma) in CONTRACTIONS {
            if word == form {
                return lemma.to_string();
            }
        }

        if let Some(lexicon) = &self.lexicon {
            if let Some(lemma) = lexicon.lemma(word) {
                if !lemma.is_empty() && lemma != PRONOUN_PLACEHOLDER {
                    return lemma;
                }
            }
        }

        rule_lemma(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback() -> LemmaResolver {
        LemmaResolver::without_lexicon()
    }

    // === elision ===

    #[test]
    fn test_elision_l_stripped() {
        // "l'industrie" must lemmatize the noun, never the article
        let result = fallback().lemmatize("l'industrie");
        assert_ne!(result, "le");
        assert!(result.contains("industri"));
    }

    #[test]
    fn test_elision_d_stripped() {
        let result = fallback().lemmatize("d'eau");
        assert_ne!(result, "de");
        assert_eq!(result, "eau");
    }

    #[test]
    fn test_elision_qu_stripped() {
        assert_eq!(fallback().lemmatize("qu'une"), "une");
    }

    #[test]
    fn test_elision_case_insensitive() {
        assert_eq!(fallback().lemmatize("L'eau".to_lowercase().as_str()), "eau");
    }

    // === contraction overrides ===

    #[test]
    fn test_contraction_des() {
        // "des" must NOT come back as "un"
        assert_eq!(fallback().lemmatize("des"), "de");
    }

    #[test]
    fn test_contraction_du() {
        assert_eq!(fallback().lemmatize("du"), "de");
    }

    #[test]
    fn test_contraction_au() {
        assert_eq!(fallback().lemmatize("au"), "a");
    }

    #[test]
    fn test_contraction_aux() {
        assert_eq!(fallback().lemmatize("aux"), "a");
    }

    #[test]
    fn test_contraction_wins_over_lexicon() {
        struct BadLexicon;
        impl Lexicon for BadLexicon {
            fn lemma(&self, _word: &str) -> Option<String> {
                Some("un".to_string())
            }
        }
        let resolver = LemmaResolver::new(Box::new(BadLexicon));
        assert_eq!(resolver.lemmatize("des"), "de");
    }

    // === rule fallback ===

    #[test]
    fn test_plural_to_singular() {
        assert_eq!(fallback().lemmatize("locomotives"), "locomotive");
        assert_eq!(fallback().lemmatize("machines"), "machine");
    }

    #[test]
    fn test_infinitive_unchanged() {
        assert_eq!(fallback().lemmatize("construire"), "construire");
    }

    #[test]
    fn test_conjugated_to_infinitive() {
        assert_eq!(fallback().lemmatize("construite"), "construire");
        assert_eq!(fallback().lemmatize("construites"), "construire");
        assert_eq!(fallback().lemmatize("était"), "être");
    }

    #[test]
    fn test_plural_suffix_rewrites() {
        assert_eq!(fallback().lemmatize("chevaux"), "cheval");
        assert_eq!(fallback().lemmatize("châteaux"), "château");
        assert_eq!(fallback().lemmatize("bijoux"), "bijou");
    }

    #[test]
    fn test_invariant_words_kept() {
        // words that end in -s but are their own lemma
        for word in ["pays", "temps", "fois", "toujours"] {
            assert_eq!(fallback().lemmatize(word), word);
        }
    }

    #[test]
    fn test_short_words_not_stripped() {
        assert_eq!(fallback().lemmatize("les"), "le");
        // "bus" is too short for the generic -s strip
        assert_eq!(fallback().lemmatize("bus"), "bus");
    }

    // === lexicon integration ===

    #[test]
    fn test_lexicon_preferred_over_rules() {
        let lexicon =
            FileLexicon::from_reader("chantée\tchanter\nchantées\tchanter\n".as_bytes()).unwrap();
        let resolver = LemmaResolver::new(Box::new(lexicon));
        assert_eq!(resolver.lemmatize("chantée"), "chanter");
    }

    #[test]
    fn test_lexicon_miss_falls_back_to_rules() {
        let lexicon = FileLexicon::from_reader("chantée\tchanter\n".as_bytes()).unwrap();
        let resolver = LemmaResolver::new(Box::new(lexicon));
        assert_eq!(resolver.lemmatize("locomotives"), "locomotive");
    }

    #[test]
    fn test_pronoun_placeholder_rejected() {
        let lexicon = FileLexicon::from_reader("locomotives\t-PRON-\n".as_bytes()).unwrap();
        let resolver = LemmaResolver::new(Box::new(lexicon));
        assert_eq!(resolver.lemmatize("locomotives"), "locomotive");
    }

    #[test]
    fn test_lexicon_file_parsing() {
        let lexicon = FileLexicon::from_reader(
            "# comment\n\nchantée\tchanter\nchevaux\tcheval\n".as_bytes(),
        )
        .unwrap();
        assert_eq!(lexicon.len(), 2);
        assert_eq!(lexicon.lemma("chevaux"), Some("cheval".to_string()));
        assert_eq!(lexicon.lemma("absent"), None);
    }

    #[test]
    fn test_lexicon_malformed_line() {
        let result = FileLexicon::from_reader("no-tab-here\n".as_bytes());
        assert!(matches!(
            result,
            Err(LexiconError::MalformedLine { line: 1 })
        ));
    }
}
