use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage slot names
pub mod keys {
    /// The 24-seat collection
    pub const SEATS: &str = "seat-market-v6";
    pub const PIN: &str = "seat-market-pin";
    pub const LOCKED: &str = "seat-market-locked";
    pub const BOARD_TOP: &str = "seat-market-board-top";
    pub const DENSITY: &str = "seat-market-density";
    pub const WRAP: &str = "seat-market-wrap";

    pub const ALL: [&str; 6] = [SEATS, PIN, LOCKED, BOARD_TOP, DENSITY, WRAP];
}

/// Storage backend error
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// String-keyed slots holding string values
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Volatile store, used by tests and as a fallback backend
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a single JSON object file, rewritten on every `set`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    slots: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the file at `path`.
    ///
    /// A missing file starts an empty store. An unreadable or corrupt file
    /// is logged and also starts empty; it is overwritten on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let slots = match Self::read_slots(&path) {
            Ok(slots) => slots,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Ignoring unreadable store file");
                BTreeMap::new()
            }
        };
        Self { path, slots }
    }

    fn read_slots(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write every slot to a sibling temp file, then rename it over the
    /// original so a crash never leaves a half-written store behind
    fn flush(&self) -> Result<(), StorageError> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;

        let contents = serde_json::to_string_pretty(&self.slots)?;
        let tmp = parent.join(format!(
            ".{}.tmp.{}",
            self.path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("seat-market"),
            std::process::id()
        ));
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(contents.as_bytes())?;
            file.sync_all()?;
        }
        if let Err(err) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value.to_string());
        self.flush()
    }
}
