use std::future::Future;
use std::time::Duration;

use crate::config::Config;
use crate::models::{StatusEnvelope, StatusQueryResult};

#[derive(Debug)]
pub enum StatusError {
    Transport(reqwest::Error),
    BadStatus(u16),
    Decode(String),
}

impl std::fmt::Display for StatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            StatusError::Transport(e) => write!(f, "Status request failed: {}", e),
            StatusError::BadStatus(code) => write!(f, "Status endpoint returned HTTP {}", code),
            StatusError::Decode(msg) => write!(f, "Failed to decode status response: {}", msg),
        }
    }
}

impl std::error::Error for StatusError {}

impl From<reqwest::Error> for StatusError {
    fn from(e: reqwest::Error) -> Self {
        StatusError::Transport(e)
    }
}

/// One request/response operation: given an order id, report whether the
/// payment succeeded. The poller only ever drives this through the trait.
pub trait StatusQuery: Send + Sync + 'static {
    fn check_status(
        &self,
        order_id: &str,
    ) -> impl Future<Output = Result<StatusQueryResult, StatusError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpStatusClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStatusClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StatusError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, StatusError> {
        Self::new(&config.api_base_url, config.request_timeout)
    }
}

impl StatusQuery for HttpStatusClient {
    async fn check_status(&self, order_id: &str) -> Result<StatusQueryResult, StatusError> {
        let url = format!("{}/api/user/topup/status", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("order_id", order_id)])
            .send()
            .await?;

        let code = response.status().as_u16();
        if !(200..300).contains(&code) {
            return Err(StatusError::BadStatus(code));
        }

        let raw: serde_json::Value = response.json().await?;
        let envelope: StatusEnvelope = serde_json::from_value(raw.clone())
            .map_err(|e| StatusError::Decode(e.to_string()))?;

        Ok(StatusQueryResult {
            outcome: envelope.outcome(),
            detail: raw,
        })
    }
}
