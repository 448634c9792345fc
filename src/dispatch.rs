//! Moderation boundary.
//!
//! The detector decides; something else acts. [`ModerationDispatcher`]
//! is the contract for the acting side (the chat platform connection),
//! and [`Enforcer`] is the glue that feeds scan outcomes through it.
//! Dispatch always happens after the detector has released every
//! history lock, using origins already captured in the outcome, so a
//! slow or failing backend can never hold up or corrupt detection
//! state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::detector::{AuthorId, DuplicateDetector, SpamVerdict};
use crate::error::DeliveryError;

/// Contract for executing moderation actions against the chat backend.
///
/// Implementations talk to the platform (delete a message, time a user
/// out). Failures are reported, never retried by the core.
#[async_trait]
pub trait ModerationDispatcher: Send + Sync {
    /// Opaque handle to a source message, as stored in history entries.
    type Origin: Send;

    /// Delete the message identified by `origin`.
    async fn delete_message(&self, origin: Self::Origin) -> Result<(), DeliveryError>;

    /// Warn `author` and time them out for `duration`.
    async fn warn_and_timeout(
        &self,
        author: AuthorId,
        duration: Duration,
    ) -> Result<(), DeliveryError>;
}

/// Dispatcher that does nothing. Useful for observe-only deployments
/// and for exercising the detection path without a chat connection.
#[derive(Debug)]
pub struct NoopDispatcher<O> {
    _origin: PhantomData<O>,
}

impl<O> NoopDispatcher<O> {
    pub fn new() -> Self {
        Self { _origin: PhantomData }
    }
}

impl<O> Default for NoopDispatcher<O> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<O: Send + Sync> ModerationDispatcher for NoopDispatcher<O> {
    type Origin = O;

    async fn delete_message(&self, _origin: O) -> Result<(), DeliveryError> {
        Ok(())
    }

    async fn warn_and_timeout(
        &self,
        _author: AuthorId,
        _duration: Duration,
    ) -> Result<(), DeliveryError> {
        Ok(())
    }
}

/// Pairs a detector with a dispatcher and applies scan outcomes.
///
/// Delivery failures are logged and swallowed: by the time an action is
/// attempted the detector's state is already updated, so the worst case
/// is a spam message left visible, not a wrong duplicate count.
pub struct Enforcer<D: ModerationDispatcher> {
    detector: Arc<DuplicateDetector<D::Origin>>,
    dispatcher: D,
    timeout: Duration,
}

impl<D: ModerationDispatcher> Enforcer<D>
where
    D::Origin: Clone,
{
    /// The timeout handed to the backend comes from the detector's
    /// configuration (`detection.timeout_secs`).
    pub fn new(detector: Arc<DuplicateDetector<D::Origin>>, dispatcher: D) -> Self {
        let timeout = Duration::from_secs(detector.config().timeout_secs);
        Self {
            detector,
            dispatcher,
            timeout,
        }
    }

    pub fn detector(&self) -> &Arc<DuplicateDetector<D::Origin>> {
        &self.detector
    }

    /// Scan one inbound message and execute whatever the outcome asks
    /// for: one deletion per flagged origin, plus at most one
    /// warn-and-timeout for the author.
    pub async fn on_message(
        &self,
        author: AuthorId,
        content: &str,
        now: DateTime<Utc>,
        origin: D::Origin,
    ) -> SpamVerdict {
        let outcome = self.detector.scan(author, content, now, origin);

        for origin in outcome.deletions {
            if let Err(e) = self.dispatcher.delete_message(origin).await {
                warn!(author, code = e.error_code(), error = %e, "failed to delete flagged message");
            }
        }
        if outcome.timeout_author {
            if let Err(e) = self.dispatcher.warn_and_timeout(author, self.timeout).await {
                warn!(author, code = e.error_code(), error = %e, "failed to warn/timeout author");
            }
        }

        outcome.verdict
    }
}
