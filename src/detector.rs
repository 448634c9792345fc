//! Duplicate detection core.
//!
//! Classifies one inbound message at a time against two windowed
//! stores: the sending author's recent messages (exact-content
//! repetition) and a global URL log shared across all authors
//! (link-raid detection, deliberately not keyed by author). The URL
//! rule is checked first and short-circuits the content rule.
//!
//! The detector only mutates its own in-memory state and reports what
//! should happen; actually deleting messages or timing out authors is
//! the dispatcher's job (see [`crate::dispatch`]), performed after all
//! history locks are released.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::debug;

use crate::config::{DetectionConfig, ValidationError};
use crate::history::{Entry, History, KeyedHistory};

/// Platform-level author identity.
pub type AuthorId = u64;

/// Classification of one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpamVerdict {
    /// Message is fine; it was recorded for future comparisons.
    Clean,
    /// A URL in the message has been posted too often across all
    /// authors within the window.
    RepeatedUrl,
    /// The author repeated this exact message too often within the
    /// window.
    RepeatedContent,
}

/// Result of scanning one message: the verdict plus the moderation
/// work it implies.
///
/// `deletions` holds the origin handles of every message that should
/// be deleted, already removed from history where applicable. They are
/// captured here precisely so the caller can dispatch them without any
/// history lock held.
#[derive(Debug)]
pub struct ScanOutcome<O> {
    pub verdict: SpamVerdict,
    /// Origins of messages to delete (the incoming one included).
    pub deletions: Vec<O>,
    /// Whether the author should be warned and timed out.
    pub timeout_author: bool,
}

impl<O> ScanOutcome<O> {
    fn clean() -> Self {
        Self {
            verdict: SpamVerdict::Clean,
            deletions: Vec::new(),
            timeout_author: false,
        }
    }

    pub fn is_spam(&self) -> bool {
        self.verdict != SpamVerdict::Clean
    }
}

/// Point-in-time size snapshot of the detector's stores.
#[derive(Debug, Clone, Copy)]
pub struct DetectorStats {
    /// Authors with at least one retained entry (plus any not yet swept).
    pub tracked_authors: usize,
    /// Retained message entries across all authors.
    pub author_entries: usize,
    /// Retained entries in the global URL log.
    pub url_entries: usize,
}

/// Counts from one eviction sweep.
#[derive(Debug, Clone, Copy)]
pub struct SweepStats {
    /// Expired entries removed from the global URL log.
    pub url_entries_evicted: usize,
    /// Expired entries removed from author histories.
    pub author_entries_evicted: usize,
    /// Authors dropped because their history went empty or stale.
    pub authors_dropped: usize,
}

impl SweepStats {
    pub fn removed_anything(&self) -> bool {
        self.url_entries_evicted > 0 || self.author_entries_evicted > 0 || self.authors_dropped > 0
    }
}

/// Windowed duplicate/spam detector.
///
/// `O` is the caller's opaque handle to a source message (for example a
/// platform message id); it is stored alongside each history entry and
/// handed back in [`ScanOutcome::deletions`] when that message should
/// be deleted.
#[derive(Debug)]
pub struct DuplicateDetector<O> {
    config: DetectionConfig,
    /// Per-author message histories.
    authors: KeyedHistory<AuthorId, O>,
    /// One URL log across all authors: a link raid from many accounts
    /// looks identical to one account reposting.
    urls: Mutex<History<O>>,
}

impl<O: Clone> DuplicateDetector<O> {
    /// Build a detector, rejecting a non-positive threshold or window.
    pub fn new(config: DetectionConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self {
            config,
            authors: KeyedHistory::new(),
            urls: Mutex::new(History::new()),
        })
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Classify one inbound message and update history accordingly.
    ///
    /// `now` is the message's arrival instant, supplied by the caller
    /// so that processing stays deterministic and testable. Messages
    /// must be fed in arrival order per author; duplicate counts are
    /// order-sensitive.
    pub fn scan(
        &self,
        author: AuthorId,
        content: &str,
        now: DateTime<Utc>,
        origin: O,
    ) -> ScanOutcome<O> {
        if self.config.exempt_authors.contains(&author) {
            return ScanOutcome::clean();
        }

        let threshold = self.config.duplication_threshold as usize;
        let window = self.config.window_minutes;
        let urls = extract_urls(content);

        {
            let mut url_log = self.urls.lock();
            url_log.evict_expired(now, window);
            for url in &urls {
                let live = url_log.count_matching(|e| e.content == *url);
                // The incoming post counts toward the threshold.
                if live + 1 >= threshold {
                    debug!(author, url = %url, occurrences = live + 1, "repeated link past threshold");
                    // Single-message punitive action: the prior posts of
                    // this URL stay in the log untouched, and nothing
                    // from this message is recorded.
                    return ScanOutcome {
                        verdict: SpamVerdict::RepeatedUrl,
                        deletions: vec![origin],
                        timeout_author: false,
                    };
                }
            }
            for url in &urls {
                url_log.append(Entry {
                    content: (*url).to_string(),
                    timestamp: now,
                    origin: origin.clone(),
                });
            }
        }

        self.authors.with(author, |log| {
            log.evict_expired(now, window);
            // Appended before the threshold is acted on, so the new
            // entry is part of the purge when it trips.
            log.append(Entry {
                content: content.to_string(),
                timestamp: now,
                origin,
            });
            let occurrences = log.count_matching(|e| e.content == content);
            if occurrences >= threshold {
                debug!(author, occurrences, "repeated message past threshold");
                let removed = log.remove_matching(|e| e.content == content);
                ScanOutcome {
                    verdict: SpamVerdict::RepeatedContent,
                    deletions: removed.into_iter().map(|e| e.origin).collect(),
                    timeout_author: true,
                }
            } else {
                ScanOutcome::clean()
            }
        })
    }

    /// Evict expired entries from both stores and drop authors whose
    /// history went empty or stale. Run periodically so that authors
    /// who stopped posting do not occupy memory between messages.
    pub fn sweep(&self, now: DateTime<Utc>) -> SweepStats {
        let window = self.config.window_minutes;
        let url_entries_evicted = self.urls.lock().evict_expired(now, window);
        let (author_entries_evicted, authors_dropped) = self.authors.sweep(now, window);
        SweepStats {
            url_entries_evicted,
            author_entries_evicted,
            authors_dropped,
        }
    }

    /// Current store sizes.
    pub fn stats(&self) -> DetectorStats {
        DetectorStats {
            tracked_authors: self.authors.key_count(),
            author_entries: self.authors.entry_count(),
            url_entries: self.urls.lock().len(),
        }
    }
}

/// Extract `http(s)://` URLs from message text: whitespace-delimited
/// tokens beginning with the scheme, no further validation. A token
/// that merely fails this test is not an error, it is just not a URL.
fn extract_urls(content: &str) -> Vec<&str> {
    content
        .split_whitespace()
        .filter(|token| token.starts_with("http://") || token.starts_with("https://"))
        .collect()
}
