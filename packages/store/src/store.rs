use crate::backend::KvBackend;
use crate::codec;
use crate::error::{BackendError, StoreError, StoreResult};
use crate::record::{new_project_id, ProjectRecord};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Capacity limits and encoding settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    /// Soft limit on stored bytes, enforced by eviction before each write
    pub byte_budget: u64,
    /// Most records kept at once
    pub max_records: usize,
    pub compression_level: i32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            byte_budget: 5 * 1024 * 1024,
            max_records: 50,
            compression_level: 3,
        }
    }
}

/// Source of "now" for timestamps and eviction order
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub count: usize,
    /// Records updated in the last seven days
    pub recent: usize,
    pub total_bytes: u64,
    pub byte_budget: u64,
}

/// One stored entry as seen by eviction
struct Entry {
    key: String,
    bytes: u64,
    /// `None` for entries that no longer decode
    updated_at: Option<DateTime<Utc>>,
}

/// Capacity-bounded project storage over a [`KvBackend`]
pub struct ProjectStore<B: KvBackend, C: Clock = SystemClock> {
    backend: B,
    config: StoreConfig,
    clock: C,
}

impl<B: KvBackend> ProjectStore<B> {
    pub fn new(backend: B, config: StoreConfig) -> Self {
        Self::with_clock(backend, config, SystemClock)
    }
}

impl<B: KvBackend, C: Clock> ProjectStore<B, C> {
    pub fn with_clock(backend: B, config: StoreConfig, clock: C) -> Self {
        Self {
            backend,
            config,
            clock,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Persist a record, making room if needed.
    ///
    /// Returns the record as stored: transient fields dropped, timestamps
    /// stamped and `version` bumped.
    pub fn save(&mut self, record: &ProjectRecord) -> StoreResult<ProjectRecord> {
        let now = self.clock.now();
        let mut stored = record.stripped();
        if stored.id.is_empty() {
            stored.id = new_project_id(&stored.name, now);
        }

        let previous = match self.backend.get(&stored.id)? {
            Some(bytes) => codec::decode(&bytes)
                .map_err(|e| warn!(id = %stored.id, error = %e, "Overwriting unreadable project"))
                .ok(),
            None => None,
        };
        stored.created_at = previous.as_ref().map_or(now, |p| p.created_at);
        stored.version = previous.as_ref().map_or(stored.version, |p| p.version.max(stored.version)) + 1;
        stored.updated_at = now;

        let bytes = codec::encode(&stored, self.config.compression_level)?;
        let size = bytes.len() as u64;
        debug!(id = %stored.id, bytes = size, version = stored.version, "Saving project");

        self.make_room(&stored.id, size)?;

        match self.backend.set(&stored.id, &bytes) {
            Ok(()) => {}
            Err(BackendError::QuotaExceeded { .. }) => {
                warn!(id = %stored.id, bytes = size, "Backend quota exceeded, clearing other projects");
                self.clear_except(&stored.id)?;
                match self.backend.set(&stored.id, &bytes) {
                    Ok(()) => {}
                    Err(BackendError::QuotaExceeded { .. }) => {
                        return Err(StoreError::CapacityExhausted {
                            id: stored.id,
                            bytes: size,
                        })
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Err(e) => return Err(e.into()),
        }

        info!(id = %stored.id, name = %stored.name, bytes = size, "Project saved");
        Ok(stored)
    }

    pub fn load(&self, id: &str) -> StoreResult<Option<ProjectRecord>> {
        match self.backend.get(id)? {
            Some(bytes) => Ok(Some(codec::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Every readable record, most recently updated first
    pub fn list(&self) -> StoreResult<Vec<ProjectRecord>> {
        let mut records = Vec::new();
        for key in self.backend.keys()? {
            let Some(bytes) = self.backend.get(&key)? else {
                continue;
            };
            match codec::decode(&bytes) {
                Ok(record) => records.push(record),
                Err(e) => warn!(key = %key, error = %e, "Skipping unreadable project"),
            }
        }
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        Ok(records)
    }

    pub fn delete(&mut self, id: &str) -> StoreResult<bool> {
        let removed = self.backend.remove(id)?;
        if removed {
            info!(id = %id, "Project deleted");
        }
        Ok(removed)
    }

    /// Case-insensitive match on name, description and tags
    pub fn search(&self, query: &str) -> StoreResult<Vec<ProjectRecord>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|record| record.matches(query))
            .collect())
    }

    pub fn stats(&self) -> StoreResult<StoreStats> {
        let records = self.list()?;
        let cutoff = self.clock.now() - Duration::days(7);
        Ok(StoreStats {
            count: records.len(),
            recent: records.iter().filter(|r| r.updated_at >= cutoff).count(),
            total_bytes: self.backend.usage()?,
            byte_budget: self.config.byte_budget,
        })
    }

    fn entries_except(&self, keep: &str) -> StoreResult<Vec<Entry>> {
        let mut entries = Vec::new();
        for key in self.backend.keys()? {
            if key == keep {
                continue;
            }
            let Some(bytes) = self.backend.get(&key)? else {
                continue;
            };
            entries.push(Entry {
                updated_at: codec::decode(&bytes).ok().map(|r| r.updated_at),
                bytes: bytes.len() as u64,
                key,
            });
        }
        Ok(entries)
    }

    /// Evict least-recently-updated records until `size` more bytes fit the
    /// budget and the record count stays under the cap
    fn make_room(&mut self, id: &str, size: u64) -> StoreResult<()> {
        let mut others = self.entries_except(id)?;
        // unreadable entries go first, then oldest
        others.sort_by(|a, b| a.updated_at.cmp(&b.updated_at).then_with(|| a.key.cmp(&b.key)));
        let mut usage: u64 = others.iter().map(|e| e.bytes).sum();

        let mut evicted = 0;
        for entry in &others {
            let over_budget = usage + size > self.config.byte_budget;
            let over_count = others.len() - evicted >= self.config.max_records;
            if !over_budget && !over_count {
                break;
            }
            self.backend.remove(&entry.key)?;
            usage -= entry.bytes;
            evicted += 1;
            info!(key = %entry.key, bytes = entry.bytes, over_budget, over_count, "Evicted project");
        }
        Ok(())
    }

    fn clear_except(&mut self, keep: &str) -> StoreResult<()> {
        for key in self.backend.keys()? {
            if key != keep {
                self.backend.remove(&key)?;
            }
        }
        Ok(())
    }
}
