#![allow(dead_code)]
//! Persistent puzzle cache using SQLite (rusqlite)
//!
//! This module provides:
//! - OS-standard data directory location (via `directories` crate)
//! - SQLite database with schema versioning
//! - The "last good puzzle" cache consulted when the source fetch fails
//!
//! The cache keeps a short history of fetched documents; the loader only
//! ever reads the most recent one.

use directories::ProjectDirs;
use rusqlite::{params, Connection};
use std::path::PathBuf;

use crate::source::SourceDocument;

/// Current schema version. Bump this when making schema changes.
/// Version history:
/// - v1: Initial schema with meta and puzzles tables
const SCHEMA_VERSION: u32 = 1;

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// Database error from SQLite
    Database(rusqlite::Error),
    /// Could not determine data directory
    NoDataDirectory,
    /// Schema version mismatch (future version)
    FutureSchemaVersion { found: u32, supported: u32 },
    /// Failed to create data directory
    CreateDirFailed(std::io::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Database(e) => write!(f, "database error: {}", e),
            StorageError::NoDataDirectory => write!(f, "could not determine data directory"),
            StorageError::FutureSchemaVersion { found, supported } => {
                write!(
                    f,
                    "database schema version {} is newer than supported version {}",
                    found, supported
                )
            }
            StorageError::CreateDirFailed(e) => write!(f, "failed to create data directory: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Database(e)
    }
}

/// Handle to the on-disk puzzle cache.
pub struct PuzzleStore {
    conn: Connection,
}

impl PuzzleStore {
    /// Open or create the cache database.
    ///
    /// Uses OS-standard directories:
    /// - Linux: `$XDG_DATA_HOME/motcache/` or `~/.local/share/motcache/`
    /// - macOS: `~/Library/Application Support/motcache/`
    pub fn open() -> Result<Self, StorageError> {
        let data_dir = Self::data_dir()?;
        std::fs::create_dir_all(&data_dir).map_err(StorageError::CreateDirFailed)?;

        let db_path = data_dir.join("motcache.db");
        let conn = Connection::open(db_path)?;

        let store = PuzzleStore { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let store = PuzzleStore { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Get the OS-standard data directory for the cache.
    pub fn data_dir() -> Result<PathBuf, StorageError> {
        ProjectDirs::from("", "", "motcache")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDirectory)
    }

    /// Persist a freshly fetched document as the newest cache entry.
    pub fn save_document(&self, doc: &SourceDocument) -> Result<(), StorageError> {
        let fetched_at = now_millis();
        self.conn.execute(
            "INSERT INTO puzzles (title, intro_text, fetched_at) VALUES (?1, ?2, ?3)",
            params![doc.title, doc.intro_text, fetched_at],
        )?;
        Ok(())
    }

    /// The most recently cached document, if any.
    pub fn last_document(&self) -> Result<Option<SourceDocument>, StorageError> {
        let result = self.conn.query_row(
            "SELECT title, intro_text FROM puzzles ORDER BY fetched_at DESC, id DESC LIMIT 1",
            [],
            |row| {
                Ok(SourceDocument {
                    title: row.get(0)?,
                    intro_text: row.get(1)?,
                })
            },
        );
        match result {
            Ok(doc) => Ok(Some(doc)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::Database(e)),
        }
    }

    /// Number of cached documents.
    pub fn document_count(&self) -> Result<i64, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM puzzles", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete all but the `keep` newest cache entries.
    pub fn prune(&self, keep: usize) -> Result<usize, StorageError> {
        let removed = self.conn.execute(
            "DELETE FROM puzzles WHERE id NOT IN (
                SELECT id FROM puzzles ORDER BY fetched_at DESC, id DESC LIMIT ?1
            )",
            params![keep as i64],
        )?;
        Ok(removed)
    }

    // Private helper methods

    fn initialize_schema(&self) -> Result<(), StorageError> {
        let current_version = self.get_schema_version()?;

        if current_version == 0 {
            self.create_schema_v1()?;
        } else if current_version > SCHEMA_VERSION {
            // Database is from a newer version of the app
            return Err(StorageError::FutureSchemaVersion {
                found: current_version,
                supported: SCHEMA_VERSION,
            });
        }

        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StorageError> {
        let table_exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='meta'",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version: u32 = self
            .conn
            .query_row("SELECT schema_version FROM meta LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        Ok(version)
    }

    fn create_schema_v1(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            -- Meta table: stores the schema version
            CREATE TABLE meta (
                schema_version INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            );

            -- Cached source documents, newest last
            CREATE TABLE puzzles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                intro_text TEXT NOT NULL,
                fetched_at INTEGER NOT NULL
            );

            -- Index for "most recent document" lookups
            CREATE INDEX idx_puzzles_fetched ON puzzles (fetched_at);
            "#,
        )?;

        self.conn.execute(
            "INSERT INTO meta (schema_version, created_at) VALUES (?1, ?2)",
            params![SCHEMA_VERSION, now_millis()],
        )?;

        Ok(())
    }
}

fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
