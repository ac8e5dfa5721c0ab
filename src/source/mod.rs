//! Puzzle source input: documents, fetchers, and the fallback chain
//!
//! The engine only ever consumes a plain `{title, intro_text}` pair and is
//! agnostic to where it came from. Loading tries, in order: the configured
//! fetcher, the last good cached document, and finally a document bundled
//! into the binary, so startup always produces a playable puzzle.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::storage::PuzzleStore;

/// Bundled last-resort document, embedded at build time.
static FALLBACK_JSON: &str = include_str!("../../data/puzzle_fallback.json");

/// A puzzle source: an article title and its introduction text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub title: String,
    pub intro_text: String,
}

/// Errors from fetchers and the article picker.
#[derive(Debug)]
pub enum FetchError {
    /// Could not read from the underlying source
    Io(std::io::Error),
    /// The document did not parse as `{title, intro_text}` JSON
    Malformed(serde_json::Error),
    /// The source has no document for this title
    NotFound { title: String },
    /// The articles file has no usable titles
    NoArticles { path: PathBuf },
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Io(e) => write!(f, "source read failed: {}", e),
            FetchError::Malformed(e) => write!(f, "source document is not valid JSON: {}", e),
            FetchError::NotFound { title } => write!(f, "no document for article '{}'", title),
            FetchError::NoArticles { path } => {
                write!(f, "articles file has no valid titles: {}", path.display())
            }
        }
    }
}

impl std::error::Error for FetchError {}

impl From<std::io::Error> for FetchError {
    fn from(e: std::io::Error) -> Self {
        FetchError::Io(e)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Malformed(e)
    }
}

/// Something that can produce the document for an article title. The
/// remote-encyclopedia client lives behind this seam; the engine never
/// talks to a network itself.
pub trait DocumentFetcher {
    fn fetch(&self, title: &str) -> Result<SourceDocument, FetchError>;
}

/// Fetcher over a local corpus: a directory of `<slug>.json` documents,
/// one per article, keyed by the slugified title.
pub struct DirectoryFetcher {
    dir: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(dir: PathBuf) -> Self {
        DirectoryFetcher { dir }
    }
}

impl DocumentFetcher for DirectoryFetcher {
    fn fetch(&self, title: &str) -> Result<SourceDocument, FetchError> {
        let path = self.dir.join(format!("{}.json", slugify(title)));
        if !path.exists() {
            return Err(FetchError::NotFound {
                title: title.to_string(),
            });
        }
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Slug for corpus file names: normalized title with every non-alphanumeric
/// run collapsed to a single dash.
pub fn slugify(title: &str) -> String {
    let normalized = crate::puzzle::text::normalize(title);
    let mut slug = String::with_capacity(normalized.len());
    let mut pending_dash = false;
    for c in normalized.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Pick a random article title from a local text file (one title per line).
///
/// Lines starting with `#` and blank lines are ignored. Errors when the
/// file has no valid entries.
pub fn pick_article_title(path: &Path) -> Result<String, FetchError> {
    let text = fs::read_to_string(path)?;
    let titles: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();
    titles
        .choose(&mut rand::rng())
        .map(|t| t.to_string())
        .ok_or_else(|| FetchError::NoArticles {
            path: path.to_path_buf(),
        })
}

/// The bundled last-resort document.
pub fn bundled_document() -> SourceDocument {
    serde_json::from_str(FALLBACK_JSON).expect("bundled puzzle document is valid JSON")
}

/// Load the puzzle document: fetcher, then cache, then bundled fallback.
///
/// A successful fetch is persisted to the store as the new last-good
/// document. Every downgrade logs a warning; the function itself never
/// fails.
pub fn load_document(
    title: &str,
    fetcher: Option<&dyn DocumentFetcher>,
    store: Option<&PuzzleStore>,
) -> SourceDocument {
    if let Some(fetcher) = fetcher {
        match fetcher.fetch(title) {
            Ok(doc) => {
                if let Some(store) = store {
                    if let Err(e) = store.save_document(&doc) {
                        warn!("[source] Failed to cache fetched document: {}", e);
                    }
                }
                info!("[source] Fetched document: {}", doc.title);
                return doc;
            }
            Err(e) => warn!("[source] Fetch failed ({}). Trying cache.", e),
        }
    }

    if let Some(store) = store {
        match store.last_document() {
            Ok(Some(doc)) => {
                info!("[source] Loaded document from cache: {}", doc.title);
                return doc;
            }
            Ok(None) => {}
            Err(e) => warn!("[source] Cache read failed ({}). Using fallback.", e),
        }
    }

    let doc = bundled_document();
    info!("[source] Loaded bundled fallback document: {}", doc.title);
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    struct FailingFetcher;
    impl DocumentFetcher for FailingFetcher {
        fn fetch(&self, title: &str) -> Result<SourceDocument, FetchError> {
            Err(FetchError::NotFound {
                title: title.to_string(),
            })
        }
    }

    struct FixedFetcher(SourceDocument);
    impl DocumentFetcher for FixedFetcher {
        fn fetch(&self, _title: &str) -> Result<SourceDocument, FetchError> {
            Ok(self.0.clone())
        }
    }

    fn doc(title: &str) -> SourceDocument {
        SourceDocument {
            title: title.to_string(),
            intro_text: format!("Texte de {}.", title),
        }
    }

    // === slugify ===

    #[test]
    fn test_slugify_accents_and_spaces() {
        assert_eq!(slugify("Locomotive à vapeur"), "locomotive-a-vapeur");
        assert_eq!(slugify("Révolution française"), "revolution-francaise");
    }

    #[test]
    fn test_slugify_collapses_punctuation_runs() {
        assert_eq!(slugify("  Paris -- (ville)  "), "paris-ville");
    }

    // === bundled document ===

    #[test]
    fn test_bundled_document_parses() {
        let doc = bundled_document();
        assert_eq!(doc.title, "Locomotive à vapeur");
        assert!(doc.intro_text.contains("locomotive"));
    }

    // === fallback chain ===

    #[test]
    fn test_fetch_success_is_cached() {
        let store = PuzzleStore::open_in_memory().unwrap();
        let fetcher = FixedFetcher(doc("Paris"));
        let loaded = load_document("Paris", Some(&fetcher), Some(&store));
        assert_eq!(loaded.title, "Paris");
        assert_eq!(store.last_document().unwrap().unwrap().title, "Paris");
    }

    #[test]
    fn test_failed_fetch_falls_back_to_cache() {
        let store = PuzzleStore::open_in_memory().unwrap();
        store.save_document(&doc("Lyon")).unwrap();
        let loaded = load_document("Paris", Some(&FailingFetcher), Some(&store));
        assert_eq!(loaded.title, "Lyon");
    }

    #[test]
    fn test_empty_cache_falls_back_to_bundled() {
        let store = PuzzleStore::open_in_memory().unwrap();
        let loaded = load_document("Paris", Some(&FailingFetcher), Some(&store));
        assert_eq!(loaded.title, "Locomotive à vapeur");
    }

    #[test]
    fn test_no_fetcher_no_store_uses_bundled() {
        let loaded = load_document("Paris", None, None);
        assert_eq!(loaded, bundled_document());
    }

    // === directory fetcher ===

    #[test]
    fn test_directory_fetcher_loads_by_slug() {
        let dir = std::env::temp_dir().join("motcache-test-corpus");
        std::fs::create_dir_all(&dir).unwrap();
        let document = doc("Tour Eiffel");
        let mut file = std::fs::File::create(dir.join("tour-eiffel.json")).unwrap();
        file.write_all(serde_json::to_string(&document).unwrap().as_bytes())
            .unwrap();

        let fetcher = DirectoryFetcher::new(dir.clone());
        assert_eq!(fetcher.fetch("Tour Eiffel").unwrap(), document);
        assert!(matches!(
            fetcher.fetch("Inconnu"),
            Err(FetchError::NotFound { .. })
        ));

        std::fs::remove_dir_all(dir).ok();
    }

    // === article picker ===

    #[test]
    fn test_pick_article_skips_comments_and_blanks() {
        let dir = std::env::temp_dir();
        let path = dir.join("motcache-test-articles.txt");
        std::fs::write(&path, "# comment\n\nParis\n").unwrap();
        assert_eq!(pick_article_title(&path).unwrap(), "Paris");
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_pick_article_errors_on_empty_file() {
        let dir = std::env::temp_dir();
        let path = dir.join("motcache-test-empty-articles.txt");
        std::fs::write(&path, "# only a comment\n\n").unwrap();
        assert!(matches!(
            pick_article_title(&path),
            Err(FetchError::NoArticles { .. })
        ));
        std::fs::remove_file(&path).ok();
    }
}
