//! Key-value backends a [`ProjectStore`](crate::ProjectStore) writes through

use crate::error::BackendError;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Byte-oriented key-value storage with an optional hard capacity
pub trait KvBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BackendError>;

    /// Fails with [`BackendError::QuotaExceeded`] when the value does not fit
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), BackendError>;

    /// Returns whether the key existed
    fn remove(&mut self, key: &str) -> Result<bool, BackendError>;

    fn keys(&self) -> Result<Vec<String>, BackendError>;

    /// Bytes currently held across all values
    fn usage(&self) -> Result<u64, BackendError>;
}

fn check_quota(
    quota: Option<u64>,
    key: &str,
    usage_without_key: u64,
    needed: u64,
) -> Result<(), BackendError> {
    match quota {
        Some(quota) if usage_without_key + needed > quota => Err(BackendError::QuotaExceeded {
            key: key.to_string(),
            needed,
            available: quota.saturating_sub(usage_without_key),
        }),
        _ => Ok(()),
    }
}

/// In-process backend, mostly for tests and previews
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    entries: BTreeMap<String, Vec<u8>>,
    quota: Option<u64>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: u64) -> Self {
        Self {
            entries: BTreeMap::new(),
            quota: Some(quota),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BackendError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), BackendError> {
        let existing = self.entries.get(key).map_or(0, |v| v.len() as u64);
        let usage = self.usage()? - existing;
        check_quota(self.quota, key, usage, value.len() as u64)?;
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, BackendError> {
        Ok(self.entries.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn usage(&self) -> Result<u64, BackendError> {
        Ok(self.entries.values().map(|v| v.len() as u64).sum())
    }
}

const FILE_EXTENSION: &str = "bin";

/// One file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
    quota: Option<u64>,
}

impl FileBackend {
    /// Open (creating if needed) a store directory
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, BackendError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "Opened file backend");
        Ok(Self { dir, quota: None })
    }

    pub fn with_quota(mut self, quota: u64) -> Self {
        self.quota = Some(quota);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, BackendError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(BackendError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.{}", key, FILE_EXTENSION)))
    }

    fn entries(&self) -> Result<Vec<(String, u64)>, BackendError> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                entries.push((stem.to_string(), fs::metadata(&path)?.len()));
            }
        }
        entries.sort();
        Ok(entries)
    }
}

impl KvBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BackendError> {
        match fs::read(self.path_for(key)?) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), BackendError> {
        let path = self.path_for(key)?;
        if self.quota.is_some() {
            let existing = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            let usage = self.usage()?.saturating_sub(existing);
            check_quota(self.quota, key, usage, value.len() as u64)?;
        }

        // Readers only ever see a complete value
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, BackendError> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        Ok(self.entries()?.into_iter().map(|(key, _)| key).collect())
    }

    fn usage(&self) -> Result<u64, BackendError> {
        Ok(self.entries()?.into_iter().map(|(_, len)| len).sum())
    }
}
