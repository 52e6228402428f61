use async_trait::async_trait;
use executors::orchestrator::{NotificationSink, Severity, WindowControl};
use serde::Serialize;
use tokio::sync::broadcast;

/// Events pushed to connected UI clients over SSE.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LauncherEvent {
    Notification {
        title: String,
        message: String,
        severity: Severity,
    },
    MinimizeWindow,
}

/// Broadcast fan-out for launcher events. Slow subscribers drop events
/// rather than slowing execution down.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<LauncherEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LauncherEvent> {
        self.tx.subscribe()
    }

    /// Send errors mean no subscriber is connected, which is fine.
    pub fn publish(&self, event: LauncherEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl NotificationSink for EventBus {
    async fn notify(&self, title: &str, message: &str, severity: Severity) {
        self.publish(LauncherEvent::Notification {
            title: title.to_string(),
            message: message.to_string(),
            severity,
        });
    }
}

#[async_trait]
impl WindowControl for EventBus {
    async fn minimize_window(&self) {
        self.publish(LauncherEvent::MinimizeWindow);
    }
}
