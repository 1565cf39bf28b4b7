//! Typed event bus for notifying the rendering layer.
//!
//! Uses tokio broadcast channels so the core never needs to know who is
//! listening. The shell subscribes to redraw, show confirmation notices,
//! or surface a retry affordance.

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

/// Application-level events emitted by the friends core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A new invite was recorded in the ledger (show a confirmation notice).
    InviteRecorded {
        record_id: String,
    },
    /// The invite ledger was cleared on teardown.
    InvitesCleared {
        count: usize,
    },
    /// A discovery page was applied to the feed.
    FeedUpdated {
        generation: u64,
        appended: usize,
        total: usize,
        has_more: bool,
    },
    /// The discovery source reported that no more data exists.
    FeedExhausted {
        generation: u64,
    },
    /// A discovery fetch failed; accumulated records were kept.
    FeedFailed {
        generation: u64,
        error: String,
    },
}

/// Application-wide event bus backed by a tokio broadcast channel.
///
/// Every subscriber gets every event. Slow subscribers that fall behind
/// receive a `Lagged` error and may miss events, which is acceptable for
/// redraw-driven consumers.
#[derive(Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<AppEvent>>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Subscribe to receive application events.
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Emit an event to all subscribers.
    pub fn emit(&self, event: AppEvent) {
        let label = event_label(&event);
        match self.sender.send(event) {
            Ok(count) => {
                debug!("event_bus: emitted {label} to {count} subscriber(s)");
            }
            Err(_) => {
                debug!("event_bus: no subscribers for {label}");
            }
        }
    }

    /// Get the current number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Human-readable label for an event (for logging).
fn event_label(event: &AppEvent) -> &'static str {
    match event {
        AppEvent::InviteRecorded { .. } => "InviteRecorded",
        AppEvent::InvitesCleared { .. } => "InvitesCleared",
        AppEvent::FeedUpdated { .. } => "FeedUpdated",
        AppEvent::FeedExhausted { .. } => "FeedExhausted",
        AppEvent::FeedFailed { .. } => "FeedFailed",
    }
}
