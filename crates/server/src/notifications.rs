use std::sync::Arc;

use async_trait::async_trait;
use executors::orchestrator::{NotificationSink, Severity};

/// Native OS notification toasts. Best effort; a failed toast never fails
/// the run that triggered it.
pub struct DesktopNotifier;

#[async_trait]
impl NotificationSink for DesktopNotifier {
    async fn notify(&self, title: &str, message: &str, _severity: Severity) {
        let summary = title.to_string();
        let body = message.to_string();
        let shown = tokio::task::spawn_blocking(move || {
            notify_rust::Notification::new()
                .summary(&summary)
                .body(&body)
                .show()
        })
        .await;

        match shown {
            Ok(Err(err)) => tracing::warn!(%err, "failed to show desktop notification"),
            Err(err) => tracing::warn!(%err, "notification task panicked"),
            Ok(Ok(_)) => {}
        }
    }
}

/// Fans one notification out to several sinks in order.
pub struct CompositeSink {
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl CompositeSink {
    pub fn new(sinks: Vec<Arc<dyn NotificationSink>>) -> Self {
        Self { sinks }
    }
}

#[async_trait]
impl NotificationSink for CompositeSink {
    async fn notify(&self, title: &str, message: &str, severity: Severity) {
        for sink in &self.sinks {
            sink.notify(title, message, severity).await;
        }
    }
}
