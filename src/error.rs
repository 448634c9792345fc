//! Error types for the moderation boundary.
//!
//! Configuration errors live next to the config types in
//! [`crate::config`]; this module covers failures reported by the
//! external moderation backend.

use thiserror::Error;

/// A moderation action (message deletion or timeout) failed to reach
/// the chat backend.
///
/// Detection state is always updated before any action is attempted,
/// so a delivery failure never leaves duplicate counters inconsistent.
/// The caller logs these and moves on; the core never retries.
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    /// The backend could not be reached at all.
    #[error("moderation backend unreachable: {0}")]
    Transport(String),

    /// The backend answered but refused the action (missing permission,
    /// message already gone, etc.).
    #[error("moderation backend rejected the action: {0}")]
    Rejected(String),

    /// The backend did not answer in time.
    #[error("timed out waiting for moderation backend")]
    Timeout,
}

impl DeliveryError {
    /// Stable code string for log field labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Rejected(_) => "rejected",
            Self::Timeout => "timeout",
        }
    }
}
