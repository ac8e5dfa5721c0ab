#![allow(dead_code)]
//! Word-vector backends
//!
//! Two interchangeable sources of word vectors sit behind [`VectorBackend`]:
//! a curated word2vec-format table loaded from disk, and a deterministic
//! character-n-gram embedding that needs no data file. Callers never know
//! which one is active.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A source of word vectors and vocabulary membership.
///
/// `vector` returns raw (not necessarily unit-norm) components; the
/// similarity engine normalizes. `contains` backs the dictionary check:
/// a closed-vocabulary backend makes "unknown word" meaningful, an open
/// one accepts everything.
pub trait VectorBackend: Send + Sync {
    fn vector(&self, word: &str) -> Option<Vec<f32>>;
    fn contains(&self, word: &str) -> bool;
}

/// Errors loading a vector table from disk.
#[derive(Debug)]
pub enum BackendError {
    /// Could not read the file
    Io(std::io::Error),
    /// A line did not parse as `word v1 .. vn`
    MalformedLine { line: usize, reason: String },
    /// A vector had a different dimensionality than the first one
    DimensionMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::Io(e) => write!(f, "failed to read vector table: {}", e),
            BackendError::MalformedLine { line, reason } => {
                write!(f, "vector table line {}: {}", line, reason)
            }
            BackendError::DimensionMismatch {
                line,
                expected,
                found,
            } => write!(
                f,
                "vector table line {}: expected {} components, found {}",
                line, expected, found
            ),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<std::io::Error> for BackendError {
    fn from(e: std::io::Error) -> Self {
        BackendError::Io(e)
    }
}

/// Curated word-vector table in the text word2vec format: an optional
/// `count dim` header line, then one `word v1 .. vn` line per word.
/// Closed vocabulary.
pub struct Word2VecBackend {
    vectors: HashMap<String, Vec<f32>>,
    dim: usize,
}

impl Word2VecBackend {
    pub fn from_path(path: &Path) -> Result<Self, BackendError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, BackendError> {
        let mut vectors = HashMap::new();
        let mut dim = 0usize;
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split_whitespace();
            let word = match parts.next() {
                Some(w) => w,
                None => continue,
            };
            let components: Result<Vec<f32>, _> = parts.map(str::parse::<f32>).collect();
            let components = match components {
                Ok(c) => c,
                Err(e) => {
                    // the word2vec header line is "count dim" and parses fine;
                    // anything else that fails to parse is a real error
                    return Err(BackendError::MalformedLine {
                        line: idx + 1,
                        reason: e.to_string(),
                    });
                }
            };
            // header line: two integers, first token is the word count
            if idx == 0 && components.len() == 1 && word.parse::<usize>().is_ok() {
                continue;
            }
            if components.is_empty() {
                return Err(BackendError::MalformedLine {
                    line: idx + 1,
                    reason: "no vector components".to_string(),
                });
            }
            if dim == 0 {
                dim = components.len();
            } else if components.len() != dim {
                return Err(BackendError::DimensionMismatch {
                    line: idx + 1,
                    expected: dim,
                    found: components.len(),
                });
            }
            vectors.insert(word.to_string(), components);
        }
        Ok(Word2VecBackend { vectors, dim })
    }

    /// Number of words in the table.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Vector dimensionality (0 for an empty table).
    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl VectorBackend for Word2VecBackend {
    fn vector(&self, word: &str) -> Option<Vec<f32>> {
        self.vectors.get(word).cloned()
    }

    fn contains(&self, word: &str) -> bool {
        self.vectors.contains_key(word)
    }
}

/// Dimensionality of the lexical embedding.
pub const LEXICAL_DIM: usize = 64;

/// Deterministic character-n-gram embedding: each trigram of the word
/// (with boundary markers) is hashed into a signed bucket. Words sharing
/// a stem share most trigrams and score close, which is what the hint
/// labels need. Open vocabulary: every word has a vector.
pub struct LexicalBackend {
    dim: usize,
}

impl LexicalBackend {
    pub fn new() -> Self {
        LexicalBackend { dim: LEXICAL_DIM }
    }
}

impl Default for LexicalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl VectorBackend for LexicalBackend {
    fn vector(&self, word: &str) -> Option<Vec<f32>> {
        if word.is_empty() {
            return None;
        }
        let padded = format!("<{}>", word);
        let chars: Vec<char> = padded.chars().collect();
        let mut vec = vec![0.0f32; self.dim];
        for ngram in chars.windows(3) {
            let ngram: String = ngram.iter().collect();
            let hash = blake3::hash(ngram.as_bytes());
            let bytes = hash.as_bytes();
            let bucket = u64::from_le_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            ]);
            let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };
            vec[(bucket as usize) % self.dim] += sign;
        }
        Some(vec)
    }

    fn contains(&self, _word: &str) -> bool {
        true
    }
}
