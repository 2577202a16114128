//! Event bus for crm-console using tokio::broadcast
//!
//! The fetch layer raises events here instead of calling the recovery flow
//! or the UI directly.

use tokio::sync::broadcast;

/// Severity of a toast-style notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Non-blocking notice for the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Events emitted by the core
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// The interceptor classified an authentication failure (once per suppression window)
    AuthenticationFailed { message: Option<String> },
    /// Something the user should see without blocking them
    Notice(Notice),
}

/// Event bus for broadcasting console events
///
/// The Recovery Coordinator subscribes for auth failures, the UI for notices.
pub struct EventBus {
    sender: broadcast::Sender<ConsoleEvent>,
}

impl EventBus {
    /// Create a new event bus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Create with default capacity (64 events)
    pub fn default_capacity() -> Self {
        Self::new(64)
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: ConsoleEvent) {
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(event);
    }

    pub fn notice(&self, notice: Notice) {
        self.publish(ConsoleEvent::Notice(notice));
    }

    /// Subscribe to receive events
    pub fn subscribe(&self) -> broadcast::Receiver<ConsoleEvent> {
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

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus_publish_subscribe() {
        let bus = EventBus::default_capacity();
        let mut rx = bus.subscribe();

        bus.publish(ConsoleEvent::AuthenticationFailed { message: None });
        bus.notice(Notice::warning("Cannot open invoice"));

        let event1 = rx.recv().await.unwrap();
        assert!(matches!(event1, ConsoleEvent::AuthenticationFailed { message: None }));

        let event2 = rx.recv().await.unwrap();
        assert!(matches!(
            event2,
            ConsoleEvent::Notice(Notice { level: NoticeLevel::Warning, ref message }) if message == "Cannot open invoice"
        ));
    }

    #[tokio::test]
    async fn test_event_bus_multiple_subscribers() {
        let bus = EventBus::default_capacity();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        assert_eq!(bus.subscriber_count(), 2);

        bus.notice(Notice::info("Saved"));

        assert!(matches!(rx1.recv().await.unwrap(), ConsoleEvent::Notice(_)));
        assert!(matches!(rx2.recv().await.unwrap(), ConsoleEvent::Notice(_)));
    }

    #[test]
    fn test_event_bus_no_subscribers_ok() {
        let bus = EventBus::default_capacity();
        // Should not panic even with no subscribers
        bus.publish(ConsoleEvent::AuthenticationFailed { message: None });
    }
}
