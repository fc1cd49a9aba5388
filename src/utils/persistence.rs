//! JSON persistence helpers for files under ~/.recall/.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Get the ~/.recall/ directory path, creating it if needed.
pub fn recall_dir() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    let dir = home_dir.join(".recall");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the full path for a file in ~/.recall/.
pub fn save_path(filename: &str) -> io::Result<PathBuf> {
    Ok(recall_dir()?.join(filename))
}

/// Load a JSON file from ~/.recall/, returning `T::default()` if missing or invalid.
pub fn load_json_or_default<T: Default + serde::de::DeserializeOwned>(filename: &str) -> T {
    match save_path(filename) {
        Ok(path) => load_json_at_or_default(&path),
        Err(_) => T::default(),
    }
}

/// Load a JSON file at an explicit path, returning `T::default()` if missing or invalid.
pub fn load_json_at_or_default<T: Default + serde::de::DeserializeOwned>(path: &Path) -> T {
    load_json_at(path).ok().flatten().unwrap_or_default()
}

/// Load a JSON file at an explicit path.
///
/// A missing file is `Ok(None)`. Any other read failure is returned as is and
/// a document that does not parse is an `InvalidData` error.
pub fn load_json_at<T: serde::de::DeserializeOwned>(path: &Path) -> io::Result<Option<T>> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    serde_json::from_str(&json)
        .map(Some)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Save a value as pretty-printed JSON to ~/.recall/.
pub fn save_json<T: serde::Serialize>(filename: &str, data: &T) -> io::Result<()> {
    save_json_at(&save_path(filename)?, data)
}

/// Save a value as pretty-printed JSON at an explicit path.
///
/// Writes to a sibling temp file first so a concurrent reader never sees a
/// half-written document.
pub fn save_json_at<T: serde::Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
