/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! Response cache keyed by request URL.
//!
//! Entries expire after the configured time to live and the total payload size
//! is kept within a byte budget by evicting the oldest fetched entries first.
//! When a location is configured each entry is also written to disk and the
//! cache is reloaded from there on construction. File writes and removals are
//! queued, in order, to a background writer thread, so callers never wait on
//! disk. Disk problems are logged and otherwise ignored; the cache is never a
//! reason for a request to fail.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const CACHE_FILE_EXTENSION: &str = "cache";
const DISK_WRITER_THREAD: &str = "flickr-cache-disk";

/// Cache configuration
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub enabled: bool,

    pub max_size_bytes: u64,

    pub time_to_live: Duration,

    /// Directory used to persist entries. In memory only when `None`.
    #[serde(default)]
    pub location: Option<PathBuf>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_size_bytes: 50 * 1024 * 1024,
            time_to_live: Duration::from_secs(60),
            location: None,
        }
    }
}

/// Source of the current time for expiry checks
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A cached response body. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub key: String,
    pub payload: Bytes,
    pub fetched_at: DateTime<Utc>,
    pub size_bytes: u64,
}

impl CacheEntry {
    fn new(key: String, payload: Bytes, fetched_at: DateTime<Utc>) -> Self {
        let size_bytes = payload.len() as u64;
        Self {
            key,
            payload,
            fetched_at,
            size_bytes,
        }
    }

    fn is_expired(&self, now: DateTime<Utc>, time_to_live: Duration) -> bool {
        // A clock that went backwards gives a negative age, counted as fresh
        let age = (now - self.fetched_at).to_std().unwrap_or_default();
        age >= time_to_live
    }
}

// Settings, map and byte count only ever change together under the one lock
#[derive(Debug)]
struct CacheState {
    settings: CacheSettings,
    entries: HashMap<String, Arc<CacheEntry>>,
    size_bytes: u64,
}

impl CacheState {
    fn new(settings: CacheSettings) -> Self {
        Self {
            settings,
            entries: HashMap::new(),
            size_bytes: 0,
        }
    }

    fn remove(&mut self, key: &str) -> Option<Arc<CacheEntry>> {
        let entry = self.entries.remove(key)?;
        self.size_bytes -= entry.size_bytes;
        Some(entry)
    }

    fn insert(&mut self, entry: Arc<CacheEntry>) {
        self.remove(&entry.key);
        self.size_bytes += entry.size_bytes;
        self.entries.insert(entry.key.clone(), entry);
    }

    // Oldest fetched first until the resident size fits in `limit`
    fn evict_to(&mut self, limit: u64) -> Vec<Arc<CacheEntry>> {
        if self.size_bytes <= limit {
            return Vec::new();
        }
        let mut by_age: Vec<(DateTime<Utc>, String)> = self
            .entries
            .values()
            .map(|e| (e.fetched_at, e.key.clone()))
            .collect();
        by_age.sort();

        let mut evicted = Vec::new();
        for (_, key) in by_age {
            if self.size_bytes <= limit {
                break;
            }
            if let Some(entry) = self.remove(&key) {
                evicted.push(entry);
            }
        }
        evicted
    }
}

/// Size and time bounded store of raw response bodies.
///
/// Clients share [`ResponseCache::shared`] unless they are given their own
/// instance or have caching turned off.
#[derive(Debug)]
pub struct ResponseCache {
    state: Mutex<CacheState>,
    clock: Arc<dyn Clock>,
    disk: Option<DiskStore>,
}

static SHARED_CACHE: OnceCell<Arc<ResponseCache>> = OnceCell::new();

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(CacheSettings::default())
    }
}

impl ResponseCache {
    pub fn new(settings: CacheSettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    pub fn with_clock(settings: CacheSettings, clock: Arc<dyn Clock>) -> Self {
        let disk = settings.location.as_deref().and_then(DiskStore::open);

        let mut state = CacheState::new(settings);
        if let Some(disk) = &disk {
            for entry in disk.load_all() {
                state.insert(Arc::new(entry));
            }
            let max_size = state.settings.max_size_bytes;
            for entry in state.evict_to(max_size) {
                disk.remove(&entry.key);
            }
        }

        Self {
            state: Mutex::new(state),
            clock,
            disk,
        }
    }

    /// Process wide cache, created with default settings on first use
    pub fn shared() -> Arc<ResponseCache> {
        SHARED_CACHE
            .get_or_init(|| Arc::new(ResponseCache::default()))
            .clone()
    }

    pub fn settings(&self) -> CacheSettings {
        self.state.lock().settings.clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.state.lock().settings.enabled
    }

    /// Turns the cache on or off. While off, `get` always misses, `put`
    /// stores nothing and nothing is evicted. Turning it back on brings the
    /// resident entries within the budget.
    pub fn set_enabled(&self, enabled: bool) {
        let mut state = self.state.lock();
        state.settings.enabled = enabled;
        if enabled {
            let max_size = state.settings.max_size_bytes;
            let evicted = state.evict_to(max_size);
            self.forget_on_disk(&evicted);
        }
    }

    pub fn set_time_to_live(&self, time_to_live: Duration) {
        self.state.lock().settings.time_to_live = time_to_live;
    }

    /// Changes the byte budget, evicting right away if an enabled cache is
    /// over it
    pub fn set_max_size(&self, max_size_bytes: u64) {
        let mut state = self.state.lock();
        state.settings.max_size_bytes = max_size_bytes;
        if state.settings.enabled {
            let evicted = state.evict_to(max_size_bytes);
            self.forget_on_disk(&evicted);
        }
    }

    /// Returns the cached body for `key` if it has not expired.
    /// Expired entries are dropped on the way.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        // The clock is only ever read outside the lock
        let now = self.clock.now();
        let mut state = self.state.lock();
        if !state.settings.enabled {
            return None;
        }

        let entry = state.entries.get(key)?.clone();
        if entry.is_expired(now, state.settings.time_to_live) {
            debug!("Cache expired: {}", key);
            state.remove(key);
            if let Some(disk) = &self.disk {
                disk.remove(key);
            }
            return None;
        }
        debug!("Cache hit: {}", key);
        Some(entry.payload.clone())
    }

    /// Stores `payload` under `key`, replacing any existing entry.
    ///
    /// Room is made first so the budget holds once the entry is in. A payload
    /// larger than the whole budget is not stored.
    pub fn put(&self, key: &str, payload: Bytes) {
        let entry = CacheEntry::new(key.to_string(), payload, self.clock.now());
        let mut state = self.state.lock();
        if !state.settings.enabled {
            return;
        }

        let max_size = state.settings.max_size_bytes;
        if let Some(old) = state.remove(key) {
            debug!("Cache replacing: {} ({} bytes)", old.key, old.size_bytes);
        }
        if entry.size_bytes > max_size {
            debug!(
                "Cache skipping {}: {} bytes exceeds budget of {}",
                key, entry.size_bytes, max_size
            );
            if let Some(disk) = &self.disk {
                disk.remove(key);
            }
            return;
        }

        let evicted = state.evict_to(max_size - entry.size_bytes);
        self.forget_on_disk(&evicted);
        let entry = Arc::new(entry);
        if let Some(disk) = &self.disk {
            disk.write(entry.clone());
        }
        state.insert(entry);
    }

    /// Evicts entries until at least `target_free_bytes` of the budget is
    /// unused. Does nothing while the cache is disabled.
    pub fn shrink(&self, target_free_bytes: u64) {
        let mut state = self.state.lock();
        if !state.settings.enabled {
            return;
        }
        let limit = state
            .settings
            .max_size_bytes
            .saturating_sub(target_free_bytes);
        let evicted = state.evict_to(limit);
        self.forget_on_disk(&evicted);
    }

    /// Removes every entry
    pub fn flush(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.size_bytes = 0;
        if let Some(disk) = &self.disk {
            disk.clear();
        }
    }

    /// Removes the entry for `key`
    pub fn flush_key(&self, key: &str) {
        let mut state = self.state.lock();
        state.remove(key);
        if let Some(disk) = &self.disk {
            disk.remove(key);
        }
    }

    /// Blocks until every queued disk write and removal has been applied.
    /// Returns at once for an in-memory cache.
    pub fn wait_for_disk(&self) {
        if let Some(disk) = &self.disk {
            disk.wait();
        }
    }

    /// Number of resident entries, expired ones included until they are read
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of the payload sizes of all resident entries
    pub fn size_bytes(&self) -> u64 {
        self.state.lock().size_bytes
    }

    fn forget_on_disk(&self, evicted: &[Arc<CacheEntry>]) {
        for entry in evicted {
            debug!("Cache evicted: {}", entry.key);
            if let Some(disk) = &self.disk {
                disk.remove(&entry.key);
            }
        }
    }
}

// What gets written for each entry
#[derive(Serialize, Deserialize)]
struct StoredEntry {
    key: String,
    fetched_at: DateTime<Utc>,
    payload: String,
}

#[derive(Debug)]
enum DiskOp {
    Write(Arc<CacheEntry>),
    Remove(String),
    Clear,
    Barrier(Sender<()>),
}

/// One file per entry, named after the MD5 of its key.
///
/// Loading happens on the constructing thread. Everything after that is
/// queued and applied in order by a dedicated writer thread.
#[derive(Debug)]
struct DiskStore {
    dir: PathBuf,
    queue: Option<Sender<DiskOp>>,
    writer: Option<JoinHandle<()>>,
}

impl DiskStore {
    fn open(dir: &Path) -> Option<Self> {
        if let Err(err) = fs::create_dir_all(dir) {
            warn!("Cache directory {:?} unusable, keeping cache in memory: {}", dir, err);
            return None;
        }

        let (queue, ops) = mpsc::channel();
        let writer_dir = dir.to_path_buf();
        let spawned = thread::Builder::new()
            .name(DISK_WRITER_THREAD.to_string())
            .spawn(move || DiskWriter { dir: writer_dir }.run(ops));
        match spawned {
            Ok(writer) => Some(Self {
                dir: dir.to_path_buf(),
                queue: Some(queue),
                writer: Some(writer),
            }),
            Err(err) => {
                warn!("Cache disk writer not started, keeping cache in memory: {}", err);
                None
            }
        }
    }

    fn load_all(&self) -> Vec<CacheEntry> {
        let dir = match fs::read_dir(&self.dir) {
            Ok(dir) => dir,
            Err(err) => {
                warn!("Failed reading cache directory {:?}: {}", self.dir, err);
                return Vec::new();
            }
        };
        dir.filter_map(|item| item.ok().map(|i| i.path()))
            .filter(|path| is_cache_file(path))
            .filter_map(|path| match Self::read_entry(&path) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!("Ignoring unreadable cache file {:?}: {}", path, err);
                    None
                }
            })
            .collect()
    }

    fn read_entry(path: &Path) -> Result<CacheEntry, Box<dyn std::error::Error>> {
        let stored: StoredEntry = serde_json::from_slice(&fs::read(path)?)?;
        let payload = STANDARD.decode(stored.payload)?;
        Ok(CacheEntry::new(
            stored.key,
            Bytes::from(payload),
            stored.fetched_at,
        ))
    }

    fn send(&self, op: DiskOp) -> bool {
        let sent = self.queue.as_ref().is_some_and(|q| q.send(op).is_ok());
        if !sent {
            warn!("Cache disk writer has stopped, change not persisted");
        }
        sent
    }

    fn write(&self, entry: Arc<CacheEntry>) {
        self.send(DiskOp::Write(entry));
    }

    fn remove(&self, key: &str) {
        self.send(DiskOp::Remove(key.to_string()));
    }

    fn clear(&self) {
        self.send(DiskOp::Clear);
    }

    fn wait(&self) {
        let (done, applied) = mpsc::channel();
        if self.send(DiskOp::Barrier(done)) {
            let _ = applied.recv();
        }
    }
}

impl Drop for DiskStore {
    fn drop(&mut self) {
        // Closing the queue lets the writer drain what is left and exit
        self.queue.take();
        if let Some(writer) = self.writer.take() {
            if writer.join().is_err() {
                warn!("Cache disk writer panicked");
            }
        }
    }
}

struct DiskWriter {
    dir: PathBuf,
}

impl DiskWriter {
    fn run(self, ops: Receiver<DiskOp>) {
        for op in ops {
            match op {
                DiskOp::Write(entry) => self.write(&entry),
                DiskOp::Remove(key) => self.remove(&key),
                DiskOp::Clear => self.clear(),
                DiskOp::Barrier(done) => {
                    let _ = done.send(());
                }
            }
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!(
            "{:x}.{}",
            md5::compute(key.as_bytes()),
            CACHE_FILE_EXTENSION
        ))
    }

    fn write(&self, entry: &CacheEntry) {
        let stored = StoredEntry {
            key: entry.key.clone(),
            fetched_at: entry.fetched_at,
            payload: STANDARD.encode(&entry.payload),
        };
        let result = serde_json::to_vec(&stored)
            .map_err(std::io::Error::other)
            .and_then(|data| fs::write(self.path_for(&entry.key), data));
        if let Err(err) = result {
            warn!("Failed writing cache entry {}: {}", entry.key, err);
        }
    }

    fn remove(&self, key: &str) {
        let path = self.path_for(key);
        if let Err(err) = fs::remove_file(&path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed removing cache file {:?}: {}", path, err);
            }
        }
    }

    fn clear(&self) {
        let Ok(dir) = fs::read_dir(&self.dir) else {
            return;
        };
        for path in dir.filter_map(|item| item.ok().map(|i| i.path())) {
            if is_cache_file(&path) {
                if let Err(err) = fs::remove_file(&path) {
                    warn!("Failed removing cache file {:?}: {}", path, err);
                }
            }
        }
    }
}

fn is_cache_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == CACHE_FILE_EXTENSION)
}
