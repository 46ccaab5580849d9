//! Result Cache
//!
//! Content-addressed cache of processed classification results so identical
//! input is not analysed twice. Bounded, with insertion-order eviction and lazy
//! TTL expiry:
//!
//! - A hit promotes the entry to newest (approximate LRU); its TTL is not reset.
//! - Expired entries are only discovered on `get`; there is no background sweep.
//! - On key collision the most recent `set` wins.
//!
//! This is a performance cache, not a store: the content hash is a simple
//! 32-bit rolling hash and collisions are tolerated.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::CacheConfig;
use crate::constants::cache::{DEFAULT_CAPACITY, DEFAULT_TTL_SECS};
use crate::types::{AnalysisInput, CacheKey, ClassificationResult};

/// Cached result entry
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub result: ClassificationResult,
    pub inserted_at: Instant,
    pub ttl: Duration,
    /// Position in insertion order; larger is newer
    seq: u64,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.inserted_at.elapsed() >= self.ttl
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
}

impl CacheStats {
    /// Cache hit rate (0.0 - 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<CacheKey, CacheEntry>,
    /// Insertion order: sequence number -> key
    order: BTreeMap<u64, CacheKey>,
    next_seq: u64,
    stats: CacheStats,
}

impl CacheState {
    fn remove(&mut self, key: &CacheKey) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.order.remove(&entry.seq);
        Some(entry)
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

/// Bounded, time-expiring cache of classification results
pub struct ResultCache {
    state: Mutex<CacheState>,
    capacity: usize,
    ttl: Duration,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, Duration::from_secs(DEFAULT_TTL_SECS))
    }
}

impl ResultCache {
    /// Create a new cache with the given capacity and per-entry TTL
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            capacity,
            ttl,
        }
    }

    pub fn with_config(config: &CacheConfig) -> Self {
        Self::new(config.capacity, Duration::from_secs(config.ttl_secs))
    }

    /// Derive the cache key for an input.
    ///
    /// Composite of the trimmed description, the sorted file names and a
    /// rolling hash over the concatenated file contents.
    pub fn key_for(input: &AnalysisInput) -> CacheKey {
        let mut names: Vec<&str> = input.file_names.iter().map(String::as_str).collect();
        names.sort_unstable();

        let hash = rolling_hash(input.file_contents.iter().map(String::as_str));

        CacheKey::new(format!(
            "{}|{}|{:08x}",
            input.description.trim(),
            names.join(","),
            hash
        ))
    }

    /// Get the cached result for an input, if present and not expired
    pub fn get(&self, input: &AnalysisInput) -> Option<ClassificationResult> {
        self.lookup(&Self::key_for(input))
    }

    /// Cache a result for an input
    pub fn set(&self, input: &AnalysisInput, result: ClassificationResult) {
        self.store(Self::key_for(input), result);
    }

    /// Get by precomputed key; a hit promotes the entry to newest
    pub fn lookup(&self, key: &CacheKey) -> Option<ClassificationResult> {
        let mut state = self.state.lock().ok()?;

        match state.entries.get(key).map(CacheEntry::is_expired) {
            None => {
                state.stats.misses += 1;
                return None;
            }
            Some(true) => {
                state.remove(key);
                state.stats.expirations += 1;
                state.stats.misses += 1;
                debug!("Cache entry expired: {}", key);
                return None;
            }
            Some(false) => {}
        }

        // Re-insert at the newest position
        let mut entry = state.remove(key)?;
        entry.seq = state.next_seq();
        state.order.insert(entry.seq, key.clone());
        let result = entry.result.clone();
        state.entries.insert(key.clone(), entry);
        state.stats.hits += 1;

        Some(result)
    }

    /// Store by precomputed key, evicting the oldest entry on overflow
    pub fn store(&self, key: CacheKey, result: ClassificationResult) {
        if self.capacity == 0 {
            return;
        }

        let Ok(mut state) = self.state.lock() else {
            warn!("Result cache lock poisoned; skipping store");
            return;
        };

        // Replacing an existing key never evicts another entry
        if state.remove(&key).is_none() && state.entries.len() >= self.capacity {
            if let Some((_, oldest)) = state.order.pop_first() {
                state.entries.remove(&oldest);
                state.stats.evictions += 1;
                debug!("Evicted oldest cache entry: {}", oldest);
            }
        }

        let seq = state.next_seq();
        state.order.insert(seq, key.clone());
        state.entries.insert(
            key.clone(),
            CacheEntry {
                key,
                result,
                inserted_at: Instant::now(),
                ttl: self.ttl,
                seq,
            },
        );
    }

    /// Clear all cached entries
    pub fn clear(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.entries.clear();
            state.order.clear();
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.state
            .lock()
            .map(|s| s.stats)
            .unwrap_or_default()
    }

    /// Current number of cached entries (expired ones included until read)
    pub fn len(&self) -> usize {
        self.state.lock().map(|s| s.entries.len()).unwrap_or(0)
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// 32-bit rolling hash (`h = h * 31 + c`) over a sequence of strings
fn rolling_hash<'a>(parts: impl Iterator<Item = &'a str>) -> u32 {
    parts
        .flat_map(str::chars)
        .fold(0u32, |h, c| h.wrapping_mul(31).wrapping_add(c as u32))
}
