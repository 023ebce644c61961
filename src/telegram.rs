use log::{debug, error};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

/// Bot API reply envelope - only the fields the delivery check needs.
#[derive(Debug, Deserialize)]
struct TgResponse {
    ok: bool,
    description: Option<String>,
}

/// Thin sendMessage client for the Telegram Bot API.
pub struct BotClient {
    http: Client,
    url: String,
    chat_id: String,
}

impl BotClient {
    pub fn new(token: &str, chat_id: String) -> BotClient {
        BotClient {
            http: Client::new(),
            url: format!("https://api.telegram.org/bot{token}/sendMessage"),
            chat_id,
        }
    }

    /// Delivers `text` to the configured chat.
    ///
    /// Best-effort by contract: every failure path logs and returns, so a
    /// dead bot can never stall or crash the poll loop.
    pub async fn send(&self, text: &str) {
        debug!("Bot - sending: {text}");

        let sent = self
            .http
            .post(&self.url)
            .json(&json!({"chat_id": self.chat_id, "text": text}))
            .send()
            .await;

        match sent {
            Ok(response) => match response.json::<TgResponse>().await {
                Ok(body) if body.ok => debug!("Bot - delivered: {text}"),
                Ok(body) => error!(
                    "Bot - API rejected message: {}",
                    body.description.unwrap_or_else(|| "no description".to_string())
                ),
                Err(e) => error!("Bot - unreadable sendMessage reply: {e}"),
            },
            Err(e) => error!("Bot - delivery failed: {e}"),
        }
    }
}
