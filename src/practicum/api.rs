use std::time::Duration;

use log::debug;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::config::Config;
use crate::error::WatchError;
use crate::practicum::ENDPOINT;

/// HTTP interface to the homework-review API. One client, reused read-only
/// across the whole loop lifetime; each request is a single bounded GET.
pub struct PracticumInterface {
    pub(crate) http: Client,
    pub(crate) endpoint: String,
    token: String,
}

impl PracticumInterface {
    pub fn new(config: &Config) -> PracticumInterface {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap();

        PracticumInterface {
            http,
            endpoint: ENDPOINT.to_string(),
            token: config.practicum_token.clone(),
        }
    }

    /// Fetches homework statuses changed since `from_date`.
    ///
    /// # Behavior
    /// - Sends one GET with the OAuth header and the cursor as a query
    ///   parameter.
    /// - Transport failures and undecodable bodies surface as
    ///   `WatchError::Transport`; anything other than 200 surfaces as
    ///   `WatchError::Endpoint` carrying the URL and status code.
    /// - The decoded body is returned untrusted; shape checking is the
    ///   validator's job, not the fetcher's.
    pub async fn request(&self, from_date: i64) -> Result<Value, WatchError> {
        debug!("Practicum - GET {} from_date={from_date}", self.endpoint);

        let response = self
            .http
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(WatchError::Endpoint {
                url: self.endpoint.clone(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}
