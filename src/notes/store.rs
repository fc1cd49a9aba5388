//! String key-value storage shared by the notes writer and reader.
//!
//! The notes live under a single key as a JSON array of strings. A missing
//! key or a value that is not such an array reads as an empty list. A store
//! that cannot be read at all is an error, never an empty list.

use crate::core::constants::{LOCAL_STORAGE_FILE, NOTES_KEY};
use crate::utils::persistence::{load_json_at, save_json_at, save_path};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// A flat string-to-string store, in the spirit of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn set(&self, key: &str, value: String) -> io::Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) -> io::Result<()> {
        (**self).set(key, value)
    }
}

/// In-process store. Share one between a writer and a reader with `Rc`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> io::Result<()> {
        self.entries.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by one JSON object file.
///
/// Every `get` re-reads the file, so a reader in another process sees a
/// writer's flushes. A missing file is an empty store. A file that cannot be
/// read or parsed fails both `get` and `set`, so a write never replaces keys
/// it could not see.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// `~/.recall/local_storage.json`.
    pub fn open_default() -> io::Result<Self> {
        Ok(Self::at(save_path(LOCAL_STORAGE_FILE)?))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> io::Result<BTreeMap<String, String>> {
        Ok(load_json_at(&self.path)?.unwrap_or_default())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: String) -> io::Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value);
        save_json_at(&self.path, &entries)
    }
}

/// Read the notes list.
pub fn load_notes<S: KeyValueStore + ?Sized>(store: &S) -> io::Result<Vec<String>> {
    Ok(store
        .get(NOTES_KEY)?
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default())
}

/// Replace the notes list.
pub fn save_notes<S: KeyValueStore + ?Sized>(store: &S, notes: &[String]) -> io::Result<()> {
    let raw = serde_json::to_string(notes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    store.set(NOTES_KEY, raw)
}
