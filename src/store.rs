//! Persistence for the player name and high score.
//!
//! Two string keys survive across sessions. Persistence is best-effort:
//! a store that cannot be read acts empty, a failed write is logged and
//! ignored, and gameplay never blocks on either.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key under which the last-used player name is stored.
pub const NAME_KEY: &str = "trivia_username";

/// Key under which the best completed-session score is stored,
/// as decimal text.
pub const HIGH_SCORE_KEY: &str = "trivia_high_score";

/// Default store file, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = "trivia_store.json";

/// String-keyed persistence consumed by the session core.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Read the persisted high score, treating anything absent or
/// unparseable as zero.
pub fn high_score(store: &dyn KeyValueStore) -> usize {
    store
        .get(HIGH_SCORE_KEY)
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(0)
}

/// Store backed by a small JSON file of string pairs.
pub struct FileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStore {
    /// Open a store at `path`. A missing or unreadable file starts empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();

        Self { path, entries }
    }

    fn persist(&self) {
        let json = match serde_json::to_string_pretty(&self.entries) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("failed to serialize store: {}", e);
                return;
            }
        };

        if let Err(e) = fs::write(&self.path, json) {
            log::warn!("failed to write {}: {}", self.path.display(), e);
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist();
    }
}

/// In-memory store for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("trivia_store_test_{}_{}.json", tag, std::process::id()))
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get(NAME_KEY), None);

        store.set(NAME_KEY, "Ada");
        store.set(HIGH_SCORE_KEY, "7");
        assert_eq!(store.get(NAME_KEY).as_deref(), Some("Ada"));
        assert_eq!(high_score(&store), 7);
    }

    #[test]
    fn test_high_score_defaults_to_zero() {
        let store = MemoryStore::new();
        assert_eq!(high_score(&store), 0);

        let mut store = MemoryStore::new();
        store.set(HIGH_SCORE_KEY, "not a number");
        assert_eq!(high_score(&store), 0);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let path = temp_store_path("reopen");
        let _ = fs::remove_file(&path);

        {
            let mut store = FileStore::open(&path);
            assert_eq!(store.get(NAME_KEY), None);
            store.set(NAME_KEY, "Grace");
            store.set(HIGH_SCORE_KEY, "9");
        }

        let store = FileStore::open(&path);
        assert_eq!(store.get(NAME_KEY).as_deref(), Some("Grace"));
        assert_eq!(high_score(&store), 9);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_missing_file_reads_empty() {
        let path = temp_store_path("missing");
        let _ = fs::remove_file(&path);

        let store = FileStore::open(&path);
        assert_eq!(store.get(NAME_KEY), None);
        assert_eq!(high_score(&store), 0);
    }
}
