//! Best-effort notification about generated scripts
//!
//! Nothing is actually mailed: [`ConsoleNotifier`] renders the message an e-mail would carry
//! and writes it to the log.

use crate::generator::GeneratorResult;
use crate::logging::NOTIFY_TARGET;
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::info;

/// What a notification is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub request: String,
    pub script: String,
    pub explanation: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> GeneratorResult<()>;
}

/// Simulated e-mail written through `tracing`
pub struct ConsoleNotifier {
    recipient: String,
}

impl ConsoleNotifier {
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
        }
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn render(&self, notification: &Notification, date: NaiveDate) -> String {
        format!(
            "To: {}\nSubject: New SQL Request - {}\nBody:\n\
             Request: {}\nScript: {}\nExplanation: {}",
            self.recipient,
            date.format("%Y-%m-%d"),
            notification.request,
            notification.script,
            notification.explanation
        )
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, notification: &Notification) -> GeneratorResult<()> {
        let message = self.render(notification, chrono::Local::now().date_naive());
        info!(target: NOTIFY_TARGET, "Simulated email:\n{}", message);
        Ok(())
    }
}
