//! echoguard - windowed duplicate and link-spam detection for chat
//! moderation.
//!
//! Watches a stream of chat messages and flags the ones repeated at
//! least a configured number of times inside a sliding time window.
//! Two rules run per message, URL first:
//!
//! 1. **Link raids**: every `http(s)://` URL is tracked in one log
//!    shared across all authors, so the same link posted from many
//!    accounts is caught exactly like one account reposting it.
//! 2. **Message repetition**: each author's recent messages are
//!    tracked per author and compared by exact content.
//!
//! # Architecture
//!
//! ```text
//! inbound message
//!       |
//!       v
//! DuplicateDetector ---- KeyedHistory<AuthorId>   (per-author logs)
//!       |           \--- Mutex<History>           (global URL log)
//!       v
//! ScanOutcome { verdict, deletions, timeout? }
//!       |
//!       v
//! Enforcer --> ModerationDispatcher (chat platform, external)
//! ```
//!
//! A background sweep ([`sweeper::spawn_sweep_task`]) evicts expired
//! entries and drops authors who went silent, bounding memory by the
//! window length rather than all-time volume. Everything is in-memory;
//! nothing survives a restart.
//!
//! The detector is transport-agnostic: callers feed it
//! `(author, content, timestamp, origin)` tuples and wire a
//! [`dispatch::ModerationDispatcher`] to their platform connection for
//! the delete/timeout side effects.

pub mod config;
pub mod detector;
pub mod dispatch;
pub mod error;
pub mod history;
pub mod sweeper;
pub mod window;

// Re-export the primary types for convenience.
pub use config::{Config, ConfigError, DetectionConfig, ValidationError};
pub use detector::{
    AuthorId, DetectorStats, DuplicateDetector, ScanOutcome, SpamVerdict, SweepStats,
};
pub use dispatch::{Enforcer, ModerationDispatcher, NoopDispatcher};
pub use error::DeliveryError;
pub use history::{Entry, History, KeyedHistory};
pub use sweeper::{SWEEP_INTERVAL, spawn_sweep_task};
