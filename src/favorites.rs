//! Favorites store
//!
//! An insertion-ordered set of movies keyed by id, persisted under a single key
//! of a key-value [`Storage`]. Each mutation serializes the whole new set and
//! writes it before the in-memory copy changes, so memory and disk never
//! disagree about a completed mutation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::models::MovieSummary;

/// Storage key holding the serialized favorites
pub const FAVORITES_KEY: &str = "favorites";

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable string key-value storage
pub trait Storage: fmt::Debug + Send {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a sibling temp file, then rename over the target
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-memory storage; clones share the same map
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    map: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with `value` under `key`
    pub fn with_value(key: &str, value: impl Into<String>) -> Self {
        let storage = Self::default();
        if let Ok(mut map) = storage.map.lock() {
            map.insert(key.to_string(), value.into());
        }
        storage
    }

    /// Storage whose writes always fail
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.map.lock().ok().and_then(|m| m.get(key).cloned())
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self
            .map
            .lock()
            .map_err(|_| StorageError::Unavailable("poisoned lock".into()))?;
        Ok(map.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Unavailable("writes disabled".into()));
        }
        let mut map = self
            .map
            .lock()
            .map_err(|_| StorageError::Unavailable("poisoned lock".into()))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// On-disk shape of the favorites set
#[derive(Debug, Serialize, Deserialize)]
#[serde(transparent)]
struct FavoritesFile {
    movies: Vec<MovieSummary>,
}

/// Persisted favorites set
#[derive(Debug)]
pub struct FavoritesStore {
    movies: Vec<MovieSummary>,
    storage: Box<dyn Storage>,
}

impl FavoritesStore {
    /// Load favorites from storage; missing or unreadable data yields an empty set
    pub fn load(storage: Box<dyn Storage>) -> Self {
        let movies = match storage.read(FAVORITES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<FavoritesFile>(&raw) {
                Ok(file) => dedup_by_id(file.movies),
                Err(e) => {
                    tracing::warn!(error = %e, "favorites unparsable, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "favorites unreadable, starting empty");
                Vec::new()
            }
        };
        tracing::debug!(count = movies.len(), "favorites loaded");
        Self { movies, storage }
    }

    /// Empty store backed by in-memory storage
    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryStorage::new()))
    }

    /// Favorites in insertion order
    pub fn movies(&self) -> &[MovieSummary] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.movies.iter().any(|m| m.id == id)
    }

    /// Add `movie`; returns false (and writes nothing) if its id is already present
    pub fn add(&mut self, movie: MovieSummary) -> Result<bool, StorageError> {
        if self.contains(movie.id) {
            return Ok(false);
        }
        let mut next = self.movies.clone();
        next.push(movie);
        self.replace(next)?;
        Ok(true)
    }

    /// Remove by id; returns false (and writes nothing) if absent
    pub fn remove(&mut self, id: u64) -> Result<bool, StorageError> {
        if !self.contains(id) {
            return Ok(false);
        }
        let next = self.movies.iter().filter(|m| m.id != id).cloned().collect();
        self.replace(next)?;
        Ok(true)
    }

    /// Add if absent, remove if present; returns whether it is now a favorite
    pub fn toggle(&mut self, movie: &MovieSummary) -> Result<bool, StorageError> {
        if self.contains(movie.id) {
            self.remove(movie.id)?;
            Ok(false)
        } else {
            self.add(movie.clone())?;
            Ok(true)
        }
    }

    fn replace(&mut self, next: Vec<MovieSummary>) -> Result<(), StorageError> {
        let file = FavoritesFile { movies: next };
        let raw = serde_json::to_string(&file)?;
        self.storage.write(FAVORITES_KEY, &raw)?;
        self.movies = file.movies;
        tracing::debug!(count = self.movies.len(), "favorites saved");
        Ok(())
    }
}

fn dedup_by_id(movies: Vec<MovieSummary>) -> Vec<MovieSummary> {
    let mut out: Vec<MovieSummary> = Vec::with_capacity(movies.len());
    for movie in movies {
        if !out.iter().any(|m| m.id == movie.id) {
            out.push(movie);
        }
    }
    out
}
