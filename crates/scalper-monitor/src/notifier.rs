//! Alert delivery.

use async_trait::async_trait;
use reqwest::Client;
use scalper_core::error::NotifyError;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

/// Default chat API endpoint.
pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Sends alert text to a human.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

/// Telegram bot notifier (`POST {api}/bot{token}/sendMessage`).
pub struct TelegramNotifier {
    client: Client,
    api_url: String,
    bot_token: String,
    chat_id: String,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

impl TelegramNotifier {
    pub fn new(
        api_url: impl Into<String>,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.bot_token);
        let resp = self
            .client
            .post(&url)
            .form(&SendMessage {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(NotifyError::Status { status, body });
        }
        Ok(())
    }
}

/// Writes alerts to the log only; used when no chat credentials are set.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        info!(alert = text, "Alert");
        Ok(())
    }
}

/// Send `text`, logging instead of returning any delivery failure.
pub async fn notify(notifier: &dyn Notifier, text: &str) {
    match notifier.send(text).await {
        Ok(()) => info!(text, "Alert sent"),
        Err(e) => warn!(error = %e, text, "Alert delivery failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_telegram_send() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("POST", "/botTOKEN/sendMessage")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("chat_id".into(), "-100".into()),
                Matcher::UrlEncoded("text".into(), "hello".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"ok": true}"#)
            .expect(1)
            .create_async()
            .await;

        let notifier = TelegramNotifier::new(server.url(), "TOKEN", "-100").unwrap();
        notifier.send("hello").await.unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_telegram_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/botTOKEN/sendMessage")
            .with_status(401)
            .with_body("Unauthorized")
            .create_async()
            .await;

        let notifier = TelegramNotifier::new(server.url(), "TOKEN", "-100").unwrap();
        let err = notifier.send("hello").await.unwrap_err();
        assert!(matches!(err, NotifyError::Status { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_notify_swallows_failure() {
        let notifier = TelegramNotifier::new("http://127.0.0.1:9", "T", "C").unwrap();
        // Must return normally even though delivery fails.
        notify(&notifier, "hello").await;
    }
}
