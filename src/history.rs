//! Windowed append logs for duplicate tracking.
//!
//! Two layers share one eviction implementation:
//! - [`History`]: the ordered entry log for a single key (one author,
//!   or the global URL bucket).
//! - [`KeyedHistory`]: a concurrent map of `History` values, one per
//!   key, with per-key exclusive access and a sweep that drops keys
//!   whose log has gone empty or fully stale.
//!
//! Entries are appended newest-last; all queries are linear over the
//! currently retained entries, which the window bounds.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::hash::Hash;

use crate::window;

/// One timestamped content record retained for duplicate comparison.
///
/// `origin` is an opaque caller-supplied handle to the source message,
/// used only to request deletion of that message later. It confers no
/// ownership of anything.
#[derive(Debug, Clone)]
pub struct Entry<O> {
    /// Compared content: the full message text, or one extracted URL.
    pub content: String,
    /// Arrival time of the originating message.
    pub timestamp: DateTime<Utc>,
    /// Handle to the originating message.
    pub origin: O,
}

/// Insertion-ordered log of live entries for one key.
#[derive(Debug)]
pub struct History<O> {
    entries: Vec<Entry<O>>,
}

impl<O> Default for History<O> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<O> History<O> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry at the end. No dedup happens here; counting
    /// duplicates is the detector's job.
    pub fn append(&mut self, entry: Entry<O>) {
        self.entries.push(entry);
    }

    /// Count retained entries satisfying `pred`.
    pub fn count_matching(&self, pred: impl Fn(&Entry<O>) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(e)).count()
    }

    /// Remove and return all entries satisfying `pred`, preserving
    /// insertion order in both the removed set and the survivors.
    pub fn remove_matching(&mut self, pred: impl Fn(&Entry<O>) -> bool) -> Vec<Entry<O>> {
        let (removed, kept) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| pred(e));
        self.entries = kept;
        removed
    }

    /// Drop every entry the window policy reports as expired.
    /// Returns the number of entries removed.
    pub fn evict_expired(&mut self, now: DateTime<Utc>, window_minutes: u32) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|e| !window::is_expired(e.timestamp, now, window_minutes));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Timestamp of the most recent entry, if any.
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.entries.last().map(|e| e.timestamp)
    }
}

/// Concurrent map of per-key histories.
///
/// Each key's log is mutated only under that key's map guard, which is
/// the exclusive-access scope the detector and the sweep both use. Logs
/// for different keys can be touched in parallel with no coordination.
#[derive(Debug)]
pub struct KeyedHistory<K: Eq + Hash, O> {
    map: DashMap<K, History<O>>,
}

impl<K: Eq + Hash, O> Default for KeyedHistory<K, O> {
    fn default() -> Self {
        Self { map: DashMap::new() }
    }
}

impl<K: Eq + Hash, O> KeyedHistory<K, O> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with exclusive access to `key`'s history, creating an
    /// empty one if the key is new. The guard is held for the duration
    /// of the closure and nothing else; callers must not perform
    /// blocking work inside it.
    pub fn with<R>(&self, key: K, f: impl FnOnce(&mut History<O>) -> R) -> R {
        let mut log = self.map.entry(key).or_default();
        f(&mut log)
    }

    /// Evict expired entries under every key and drop keys whose log is
    /// empty or whose newest surviving entry is itself already outside
    /// the window (a key silent for longer than the window goes away
    /// even if no message arrived to trigger lazy eviction).
    ///
    /// Returns `(entries_evicted, keys_dropped)`.
    pub fn sweep(&self, now: DateTime<Utc>, window_minutes: u32) -> (usize, usize) {
        let mut evicted = 0;
        let mut dropped = 0;
        self.map.retain(|_, log| {
            evicted += log.evict_expired(now, window_minutes);
            let stale = log
                .last_timestamp()
                .is_none_or(|ts| window::is_expired(ts, now, window_minutes));
            if stale {
                dropped += 1;
            }
            !stale
        });
        (evicted, dropped)
    }

    /// Number of keys currently tracked.
    pub fn key_count(&self) -> usize {
        self.map.len()
    }

    /// Total retained entries across all keys.
    pub fn entry_count(&self) -> usize {
        self.map.iter().map(|log| log.len()).sum()
    }

    /// Whether `key` currently has a history.
    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }
}
