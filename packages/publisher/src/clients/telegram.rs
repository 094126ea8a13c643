//! Telegram implementation of the progress-notification channel.

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::security::SecretString;
use crate::traits::notify::Notifier;

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Sends progress messages to one Telegram conversation.
///
/// Fire and forget: delivery problems are logged and swallowed, never
/// propagated into the pipeline.
pub struct TelegramNotifier {
    client: reqwest::Client,
    token: SecretString,
    chat_id: String,
}

impl TelegramNotifier {
    /// Create a notifier for a bot token and chat id.
    pub fn new(token: impl Into<SecretString>, chat_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            chat_id: chat_id.into(),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) {
        let url = format!(
            "https://api.telegram.org/bot{}/sendMessage",
            self.token.expose()
        );
        let body = SendMessage {
            chat_id: &self.chat_id,
            text,
        };

        match self.client.post(&url).json(&body).send().await {
            Ok(response) if !response.status().is_success() => {
                warn!(status = %response.status(), "telegram notification rejected");
            }
            Ok(_) => {}
            Err(e) => warn!("telegram notification failed: {e}"),
        }
    }
}
