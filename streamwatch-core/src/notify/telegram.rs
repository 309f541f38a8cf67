// ========================================================
// File: streamwatch-core/src/notify/telegram.rs
// ========================================================
use std::sync::Arc;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use streamwatch_common::traits::Notifier;

use crate::http::HttpClient;
use crate::Error;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

#[derive(Clone)]
pub struct TelegramSettings {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base: String,
}

impl TelegramSettings {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base.trim_end_matches('/'), self.bot_token)
    }
}

// The token is part of every request URL; keep it out of Debug output.
impl std::fmt::Debug for TelegramSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramSettings")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Bot API reply envelope; we only care whether it was accepted.
#[derive(Debug, Deserialize)]
struct ApiReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends alerts to one chat through the Bot API `sendMessage` method.
pub struct TelegramNotifier {
    http: Arc<dyn HttpClient>,
    settings: TelegramSettings,
}

impl TelegramNotifier {
    pub fn new(http: Arc<dyn HttpClient>, settings: TelegramSettings) -> Self {
        Self { http, settings }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), Error> {
        let body = json!({
            "chat_id": self.settings.chat_id,
            "text": text,
            "parse_mode": "HTML",
        });

        let response = self.http
            .post_json(&self.settings.send_message_url(), body)
            .await
            .map_err(|e| Error::Notification(format!("sendMessage transport error: {}", e)))?;

        match serde_json::from_str::<ApiReply>(&response.body) {
            Ok(reply) if reply.ok => {
                info!("--> Sent: {}", text);
                Ok(())
            }
            Ok(reply) => Err(Error::Notification(format!(
                "sendMessage rejected (HTTP {}): {}",
                response.status,
                reply.description.unwrap_or_else(|| "no description".into())
            ))),
            Err(e) if response.is_success() => {
                // 2xx with an unexpected body still counts as delivered.
                debug!("sendMessage reply not understood ({}), assuming delivered", e);
                Ok(())
            }
            Err(_) => Err(Error::Notification(format!(
                "sendMessage failed: HTTP {}",
                response.status
            ))),
        }
    }
}
