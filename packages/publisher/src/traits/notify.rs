//! Progress-notification channel.

use async_trait::async_trait;
use tracing::info;

/// Fire-and-forget textual progress updates.
///
/// Not required for correctness: implementations swallow their own
/// delivery failures (logging them) instead of propagating.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one progress message.
    async fn notify(&self, text: &str);
}

#[async_trait]
impl Notifier for Box<dyn Notifier> {
    async fn notify(&self, text: &str) {
        (**self).notify(text).await;
    }
}

/// Notifier that drops every message.
#[derive(Debug, Default)]
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn notify(&self, _text: &str) {}
}

/// Notifier that writes progress to the tracing log.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, text: &str) {
        info!("{text}");
    }
}
