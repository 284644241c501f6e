//! High-score storage backends
//!
//! The on-disk / in-browser format is a plain JSON array of entries.

use crate::error::StorageError;
use crate::highscores::HighScoreEntry;

/// LocalStorage key, also used as the default file stem
pub const STORAGE_KEY: &str = "catch-snowflake-highscores";

/// Somewhere to keep the leaderboard between sessions
pub trait ScoreStore {
    fn load(&self) -> Result<Vec<HighScoreEntry>, StorageError>;
    fn save(&mut self, entries: &[HighScoreEntry]) -> Result<(), StorageError>;
}

/// Parse a stored list. Anything that is not an array reads as empty.
pub fn parse_entries(json: &str) -> Result<Vec<HighScoreEntry>, StorageError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_array() {
        log::warn!("Stored high scores are not a list, ignoring");
        return Ok(Vec::new());
    }
    Ok(serde_json::from_value(value)?)
}

/// Volatile store (tests, or when nothing else is available)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Vec<HighScoreEntry>,
}

impl MemoryStore {
    pub fn with_entries(entries: Vec<HighScoreEntry>) -> Self {
        Self { entries }
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<Vec<HighScoreEntry>, StorageError> {
        Ok(self.entries.clone())
    }

    fn save(&mut self, entries: &[HighScoreEntry]) -> Result<(), StorageError> {
        self.entries = entries.to_vec();
        Ok(())
    }
}

/// JSON file on the local file system. A missing file reads as an empty list;
/// writes go to a temporary file first and are renamed into place.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for FileStore {
    fn load(&self) -> Result<Vec<HighScoreEntry>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => parse_entries(&json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, entries: &[HighScoreEntry]) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStore;

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StorageError::Unavailable("localStorage".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStore {
    fn load(&self) -> Result<Vec<HighScoreEntry>, StorageError> {
        let storage = Self::storage()?;
        match storage.get_item(STORAGE_KEY) {
            Ok(Some(json)) => parse_entries(&json),
            Ok(None) => Ok(Vec::new()),
            Err(_) => Err(StorageError::Unavailable("localStorage read".into())),
        }
    }

    fn save(&mut self, entries: &[HighScoreEntry]) -> Result<(), StorageError> {
        let storage = Self::storage()?;
        let json = serde_json::to_string(entries)?;
        storage
            .set_item(STORAGE_KEY, &json)
            .map_err(|_| StorageError::Unavailable("localStorage write".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entries() {
        let entries =
            parse_entries(r#"[{"name":"Ada","score":12,"timestamp":1700000000000.0}]"#).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Ada");

        assert!(parse_entries(r#"{"name":"x"}"#).unwrap().is_empty());
        assert!(matches!(parse_entries("nope"), Err(StorageError::Json(_))));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("catch-snowflake-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut store = FileStore::new(dir.join("scores.json"));

        assert!(store.load().unwrap().is_empty());

        let entries = vec![HighScoreEntry {
            name: "Ada".into(),
            score: 3,
            timestamp: 1.0,
        }];
        store.save(&entries).unwrap();
        assert_eq!(store.load().unwrap(), entries);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
