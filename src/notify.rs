//! Change notifications published after successful mutations.
//!
//! Core operations receive a `&dyn Notifier` and call [`Notifier::publish`] once their
//! database writes are committed. Publishing never blocks and never fails the caller:
//! with no subscriber attached the event is simply dropped.

use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Default capacity of the broadcast channel. Slow subscribers lag past this.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Events emitted by the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Event {
    /// A process was created
    #[serde(rename = "process:created")]
    ProcessCreated,
    /// A process was edited
    #[serde(rename = "process:edited")]
    ProcessEdited,
    /// A process was deleted
    #[serde(rename = "processDeleted")]
    ProcessDeleted,
    /// A client was created
    #[serde(rename = "client:created")]
    ClientCreated,
    /// A client was edited
    #[serde(rename = "client:edited")]
    ClientEdited,
    /// A client (and its processes) was deleted
    #[serde(rename = "client:deleted")]
    ClientDeleted,
    /// A currency was added
    #[serde(rename = "Currency:Added")]
    CurrencyAdded,
    /// A currency was updated
    #[serde(rename = "currency:updated")]
    CurrencyUpdated,
}

impl Event {
    /// Wire name of the event as seen by subscribers.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ProcessCreated => "process:created",
            Self::ProcessEdited => "process:edited",
            Self::ProcessDeleted => "processDeleted",
            Self::ClientCreated => "client:created",
            Self::ClientEdited => "client:edited",
            Self::ClientDeleted => "client:deleted",
            Self::CurrencyAdded => "Currency:Added",
            Self::CurrencyUpdated => "currency:updated",
        }
    }
}

/// One published event and its JSON payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    /// What happened
    pub event: Event,
    /// Event-specific data
    pub payload: Value,
}

/// Outbound side of the notification channel.
pub trait Notifier: Send + Sync {
    /// Publishes `event`. Must not block and must not fail.
    fn publish(&self, event: Event, payload: Value);
}

/// Helper that serializes `payload` before publishing.
///
/// A payload that fails to serialize is logged and dropped.
pub fn publish_serialized<T: Serialize>(notifier: &dyn Notifier, event: Event, payload: &T) {
    match serde_json::to_value(payload) {
        Ok(value) => notifier.publish(event, value),
        Err(e) => warn!("Dropping {} notification: {}", event.name(), e),
    }
}

/// [`Notifier`] backed by a `tokio` broadcast channel.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<Notification>,
}

impl BroadcastNotifier {
    /// Creates a notifier whose channel holds up to `capacity` undelivered events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Attaches a new subscriber. It only sees events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl Notifier for BroadcastNotifier {
    fn publish(&self, event: Event, payload: Value) {
        // Err only means nobody is listening right now.
        if self
            .sender
            .send(Notification { event, payload })
            .is_err()
        {
            debug!("No subscribers for {}", event.name());
        }
    }
}

/// Drains `receiver` and logs every notification until the channel closes.
pub async fn log_notifications(mut receiver: broadcast::Receiver<Notification>) {
    loop {
        match receiver.recv().await {
            Ok(notification) => {
                info!(
                    event = notification.event.name(),
                    payload = %notification.payload,
                    "notification"
                );
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Notification logger lagged, skipped {} events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
