//! Webhook notification sink.
//!
//! Every event is posted as `{"event": ..., "data": {...}}` on its own task.
//! Failures are logged here and never reach the caller.

use crate::domain::{NotificationEvent, Notifier};

#[derive(Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, event: NotificationEvent) {
        let client = self.client.clone();
        let url = self.url.clone();

        tokio::spawn(async move {
            let result = client
                .post(&url)
                .json(&event)
                .send()
                .await
                .and_then(|response| response.error_for_status());

            match result {
                Ok(_) => tracing::info!(?event, "webhook sent"),
                Err(err) => tracing::error!(?event, "webhook error: {}", err),
            }
        });
    }
}

/// Used when no webhook is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, event: NotificationEvent) {
        tracing::debug!(?event, "notification skipped, no sink configured");
    }
}
