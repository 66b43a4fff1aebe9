//! Key-value storage behind the game's persistence.
//!
//! The game reads and writes a handful of string keys and never
//! assumes transactional behavior across them. Stores are deliberately
//! forgiving: reads of missing or unreadable data come back as absent,
//! and writes are best-effort, so a broken disk degrades the game to
//! session-only progress instead of crashing it.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::warn;

/// File name of the on-disk store inside the data directory.
pub const STORE_FILE: &str = "store.json";

/// Synchronous string key-value storage.
pub trait KeyValueStore: fmt::Debug {
    /// Read the value for a key, if present.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value for a key, best-effort.
    fn set(&mut self, key: &str, value: &str);

    /// Remove a key, best-effort. Removing a missing key is a no-op.
    fn remove(&mut self, key: &str);
}

/// Volatile in-memory store for tests and ephemeral runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Durable store kept as one JSON object file.
///
/// The whole map is rewritten after every mutation. Load is lenient: a
/// missing file yields an empty store, an unreadable or corrupt file
/// yields an empty store with a diagnostic warning.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store backed by a JSON file, loading existing entries.
    #[must_use]
    pub fn open(path: PathBuf) -> Self {
        let entries = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(path = %path.display(), %err, "store file corrupt, starting empty");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                warn!(path = %path.display(), %err, "store file unreadable, starting empty");
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) {
        if let Some(parent) = self.path.parent()
            && let Err(err) = fs::create_dir_all(parent)
        {
            warn!(path = %self.path.display(), %err, "cannot create store directory");
            return;
        }
        match serde_json::to_string_pretty(&self.entries) {
            Ok(json) => {
                if let Err(err) = fs::write(&self.path, json) {
                    warn!(path = %self.path.display(), %err, "store write failed");
                }
            }
            Err(err) => warn!(%err, "store serialization failed"),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
        self.flush();
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.flush();
        }
    }
}

/// Shared handle to one store.
///
/// The hub shell and the game controller persist through the same
/// backing store, like browser pages sharing one local storage. Clones
/// are cheap and all observe the same entries. Single-threaded by
/// construction.
#[derive(Debug, Clone)]
pub struct SharedStore {
    inner: Rc<RefCell<Box<dyn KeyValueStore>>>,
}

impl SharedStore {
    /// Wrap a store in a shared handle.
    pub fn new<S: KeyValueStore + 'static>(store: S) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Box::new(store))),
        }
    }
}

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        self.inner.borrow_mut().set(key, value);
    }

    fn remove(&mut self, key: &str) {
        self.inner.borrow_mut().remove(key);
    }
}

/// Get the gatewalk data directory (~/.gatewalk).
///
/// Creates the directory if it doesn't exist.
///
/// # Errors
///
/// Returns an error if no home directory can be determined or the
/// directory cannot be created.
pub fn gatewalk_data_dir() -> io::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| io::Error::new(io::ErrorKind::NotFound, "cannot determine home directory"))?;

    let data_dir = Path::new(&home).join(".gatewalk");
    fs::create_dir_all(&data_dir)?;
    Ok(data_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("maze.level"), None);
        store.set("maze.level", "2");
        assert_eq!(store.get("maze.level"), Some("2".to_owned()));
        store.remove("maze.level");
        assert_eq!(store.get("maze.level"), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);

        let mut store = FileStore::open(path.clone());
        store.set("maze.score", "130");
        store.set("hub.dark_mode", "true");
        drop(store);

        let store = FileStore::open(path);
        assert_eq!(store.get("maze.score"), Some("130".to_owned()));
        assert_eq!(store.get("hub.dark_mode"), Some("true".to_owned()));
    }

    #[test]
    fn test_file_store_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);

        let mut store = FileStore::open(path.clone());
        store.set("maze.lives", "1");
        store.remove("maze.lives");
        drop(store);

        let store = FileStore::open(path);
        assert_eq!(store.get("maze.lives"), None);
    }

    #[test]
    fn test_file_store_tolerates_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);
        fs::write(&path, "not json {{{").unwrap();

        let mut store = FileStore::open(path.clone());
        assert_eq!(store.get("maze.level"), None);

        // The next write replaces the corrupt file with valid JSON.
        store.set("maze.level", "1");
        let store = FileStore::open(path);
        assert_eq!(store.get("maze.level"), Some("1".to_owned()));
    }

    #[test]
    fn test_file_store_creates_missing_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join(STORE_FILE);

        let mut store = FileStore::open(path.clone());
        store.set("maze.level", "3");
        let store = FileStore::open(path);
        assert_eq!(store.get("maze.level"), Some("3".to_owned()));
    }

    #[test]
    fn test_shared_store_clones_observe_writes() {
        let mut a = SharedStore::new(MemoryStore::new());
        let b = a.clone();
        a.set("hub.sound", "false");
        assert_eq!(b.get("hub.sound"), Some("false".to_owned()));
    }
}
