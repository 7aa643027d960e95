//! Chat collaborator boundary.
//!
//! The engine never renders markup itself. When a forced failure cancels a
//! save it hands an opaque [`FailureNotice`] to a [`ChatSink`]; rendering
//! and delivery are the host adapter's problem. The abort decision has
//! already been returned synchronously by then, so delivery is
//! fire-and-forget: a failed post is logged, never retried, and never
//! un-cancels the roll.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Errors from the chat collaborator.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Failed to render chat card: {0}")]
    Render(String),
    #[error("Failed to post chat message: {0}")]
    Post(String),
}

/// Table roll-mode visibility for a chat card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RollMode {
    #[default]
    Public,
    Private,
    Blind,
    SelfOnly,
}

/// Payload for the forced-failure chat card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureNotice {
    /// Speaker of the card: the failing actor.
    pub speaker: String,
    /// Label of the effect that forced the failure.
    pub effect_label: String,
    /// Human-readable description of the roll that was cancelled.
    pub roll_label: String,
    /// Visibility, taken from the table's current roll-mode setting.
    pub roll_mode: RollMode,
}

/// Destination for chat cards.
///
/// Implementations own scheduling: `post_failure` must not block the roll
/// handler that calls it.
pub trait ChatSink: Send + Sync {
    fn post_failure(&self, notice: FailureNotice);
}

/// Async render-and-post half of the chat boundary.
///
/// The returned markup/delivery future is opaque to the engine.
pub trait FailureDelivery: Send + Sync + 'static {
    fn deliver(&self, notice: FailureNotice) -> BoxFuture<'static, Result<(), ChatError>>;
}

/// [`ChatSink`] that spawns each delivery onto a tokio runtime and forgets
/// it, logging delivery failures.
pub struct SpawningChat<D: FailureDelivery> {
    delivery: Arc<D>,
    handle: tokio::runtime::Handle,
}

impl<D: FailureDelivery> SpawningChat<D> {
    /// Wrap a delivery using the current runtime.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime; use [`Self::with_handle`]
    /// from synchronous host glue.
    pub fn new(delivery: D) -> Self {
        Self::with_handle(delivery, tokio::runtime::Handle::current())
    }

    pub fn with_handle(delivery: D, handle: tokio::runtime::Handle) -> Self {
        Self {
            delivery: Arc::new(delivery),
            handle,
        }
    }
}

impl<D: FailureDelivery> ChatSink for SpawningChat<D> {
    fn post_failure(&self, notice: FailureNotice) {
        let delivery = Arc::clone(&self.delivery);
        self.handle.spawn(async move {
            let speaker = notice.speaker.clone();
            if let Err(err) = delivery.deliver(notice).await {
                tracing::warn!(%speaker, error = %err, "failed to post forced-failure chat card");
            }
        });
    }
}
