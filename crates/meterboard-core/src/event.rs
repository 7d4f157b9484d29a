//! Event bus for meterboard using tokio::broadcast
//!
//! Frontends subscribe to chart lifecycle events for redraw triggers,
//! loading overlays, and toast notifications.

use crate::period::Period;
use tokio::sync::broadcast;

/// Events emitted by the chart layer
#[derive(Debug, Clone)]
pub enum ChartEvent {
    /// A period change started loading data
    LoadingStarted { chart_id: String, period: Period },
    /// A chart's descriptor was replaced
    ChartUpdated { chart_id: String, period: Period },
    /// A completed request was superseded by a newer one and discarded
    StaleResultDiscarded { chart_id: String, period: Period },
    /// Loading or applying data failed
    LoadFailed { chart_id: String, message: String },
    /// Chart setup from bindings completed
    SetupCompleted { initialized: usize, failed: usize },
}

/// Event bus for broadcasting chart events
///
/// Uses tokio::broadcast for multi-consumer support.
pub struct EventBus {
    sender: broadcast::Sender<ChartEvent>,
}

impl EventBus {
    /// Create a new event bus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create with default capacity (256 events)
    pub fn default_capacity() -> Self {
        Self::new(256)
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: ChartEvent) {
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(event);
    }

    /// Subscribe to receive events
    pub fn subscribe(&self) -> broadcast::Receiver<ChartEvent> {
        self.sender.subscribe()
    }

    /// Get current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::default_capacity()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}
