use super::metrics::FilterOptions;
use super::ticket::Ticket;
use crate::analysis::sla::SlaPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// Normalized table plus load statistics
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub path: PathBuf,
    pub tickets: Vec<Ticket>,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub path: String,
    pub rows_read: usize,
    pub ticket_count: usize,
    pub rows_dropped: usize,
    pub filter_options: FilterOptions,
}

/// Anything that changes here forces a reload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheKey {
    pub modified: Option<SystemTime>,
    pub len: u64,
    pub sla: SlaPolicy,
}

#[derive(Debug)]
struct CacheEntry {
    key: CacheKey,
    dataset: Arc<LoadedDataset>,
}

/// In-memory cache of normalized datasets, keyed by canonical path
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl DatasetCache {
    /// Returns the cached dataset only if it was loaded under the same key
    pub fn get(&self, path: &Path, key: &CacheKey) -> Option<Arc<LoadedDataset>> {
        self.entries
            .get(path)
            .filter(|entry| entry.key == *key)
            .map(|entry| Arc::clone(&entry.dataset))
    }

    pub fn insert(&mut self, path: PathBuf, key: CacheKey, dataset: Arc<LoadedDataset>) {
        self.entries.insert(path, CacheEntry { key, dataset });
    }

    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
