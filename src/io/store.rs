use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;
use tempfile::NamedTempFile;

/// Error type for persistent store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("store file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not encode value: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: u64, quota: u64 },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable key-value storage
pub trait Store {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// All keys live in a single JSON object file, rewritten atomically on
/// every `set`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    /// 0 = unlimited
    quota_bytes: u64,
}

impl FileStore {
    pub const FILE_NAME: &'static str = "store.json";

    /// Store at `<data_dir>/store.json`. The directory is created on first write.
    pub fn open(data_dir: &Path, quota_bytes: u64) -> Self {
        FileStore {
            path: data_dir.join(Self::FILE_NAME),
            quota_bytes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, Value>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Rename the unreadable file to `store.json.corrupt-<timestamp>` so a
    /// fresh write never destroys it.
    fn backup_corrupt(&self) -> Result<PathBuf, StoreError> {
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".corrupt-{}", stamp));
        let backup = PathBuf::from(name);
        fs::rename(&self.path, &backup).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(backup)
    }

    fn write_all(&self, entries: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        let content = serde_json::to_vec_pretty(entries)?;
        let needed = content.len() as u64;
        if self.quota_bytes > 0 && needed > self.quota_bytes {
            return Err(StoreError::QuotaExceeded {
                needed,
                quota: self.quota_bytes,
            });
        }
        let io_err = |e: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source: e,
        };
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        atomic_write(&self.path, &content).map_err(io_err)
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        // A corrupt file is moved aside rather than blocking every future write
        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(StoreError::Corrupt { path, source }) => {
                let backup = self.backup_corrupt()?;
                tracing::warn!(
                    path = %path.display(),
                    backup = %backup.display(),
                    error = %source,
                    "moved corrupt store aside"
                );
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_string(), value);
        self.write_all(&entries)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Non-durable store for tests. Writes can be made to fail on demand.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Value>,
    /// Number of successful `set` calls
    pub writes: usize,
    /// When true, `set` fails with `QuotaExceeded` and `clear` with `Unavailable`
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::QuotaExceeded { needed: 1, quota: 0 });
        }
        self.entries.insert(key.to_string(), value);
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable("clear refused".into()));
        }
        self.entries.clear();
        Ok(())
    }
}
