use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Config;

#[derive(Debug)]
pub enum OptionsError {
    Transport(reqwest::Error),
    BadStatus(u16),
    Rejected(String),
}

impl std::fmt::Display for OptionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            OptionsError::Transport(e) => write!(f, "Option request failed: {}", e),
            OptionsError::BadStatus(code) => write!(f, "Option endpoint returned HTTP {}", code),
            OptionsError::Rejected(msg) => write!(f, "Option update rejected: {}", msg),
        }
    }
}

impl std::error::Error for OptionsError {}

impl From<reqwest::Error> for OptionsError {
    fn from(e: reqwest::Error) -> Self {
        OptionsError::Transport(e)
    }
}

/// Upsert contract of the generic key/value options store the gateway
/// panels write through.
pub trait OptionsStore: Send + Sync {
    fn upsert(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), OptionsError>> + Send;
}

#[derive(Debug, Serialize)]
struct OptionUpsert<'a> {
    key: &'a str,
    value: &'a str,
}

#[derive(Debug, Deserialize)]
struct OptionResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Clone)]
pub struct HttpOptionsStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOptionsStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, OptionsError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, OptionsError> {
        Self::new(&config.api_base_url, config.request_timeout)
    }
}

impl OptionsStore for HttpOptionsStore {
    async fn upsert(&self, key: &str, value: &str) -> Result<(), OptionsError> {
        let url = format!("{}/api/option/", self.base_url);

        let response = self
            .client
            .put(&url)
            .json(&OptionUpsert { key, value })
            .send()
            .await?;

        let code = response.status().as_u16();
        if !(200..300).contains(&code) {
            return Err(OptionsError::BadStatus(code));
        }

        let body: OptionResponse = response.json().await?;
        if !body.success {
            return Err(OptionsError::Rejected(body.message));
        }

        Ok(())
    }
}

/// WeChat Pay gateway credentials as entered in the settings panel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WechatGatewaySettings {
    pub app_id: String,
    pub mch_id: String,
    pub api_v2_key: String,
    pub min_topup: i64,
}

impl WechatGatewaySettings {
    /// One (key, value) pair per non-empty field. Empty credentials are
    /// skipped rather than erasing stored values; the minimum top-up is
    /// always sent.
    pub fn to_options(&self) -> Vec<(String, String)> {
        let mut options = Vec::new();
        if !self.app_id.is_empty() {
            options.push(("WechatAppId".to_string(), self.app_id.clone()));
        }
        if !self.mch_id.is_empty() {
            options.push(("WechatMchId".to_string(), self.mch_id.clone()));
        }
        if !self.api_v2_key.is_empty() {
            options.push(("WechatApiV2Key".to_string(), self.api_v2_key.clone()));
        }
        options.push(("WechatMinTopUp".to_string(), self.min_topup.to_string()));
        options
    }
}

/// Alipay gateway credentials as entered in the settings panel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlipayGatewaySettings {
    pub app_id: String,
    pub private_key: String,
    pub public_key: String,
    pub min_topup: i64,
}

impl AlipayGatewaySettings {
    pub fn to_options(&self) -> Vec<(String, String)> {
        let mut options = Vec::new();
        if !self.app_id.is_empty() {
            options.push(("AlipayAppId".to_string(), self.app_id.clone()));
        }
        if !self.private_key.is_empty() {
            options.push(("AlipayPrivateKey".to_string(), self.private_key.clone()));
        }
        if !self.public_key.is_empty() {
            options.push(("AlipayPublicKey".to_string(), self.public_key.clone()));
        }
        options.push(("AlipayMinTopUp".to_string(), self.min_topup.to_string()));
        options
    }
}

#[derive(Debug, Clone)]
pub struct FieldFailure {
    pub key: String,
    pub reason: String,
}

/// Outcome of one settings batch. The batch counts as a success only when
/// every upsert went through; fields that did succeed stay saved either way.
#[derive(Debug, Clone, Default)]
pub struct SaveReport {
    pub saved: Vec<String>,
    pub failures: Vec<FieldFailure>,
}

impl SaveReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Push one upsert per field and collect per-field failures. Nothing is
/// rolled back on a partial failure; the caller retries the whole
/// submission.
pub async fn save_options<S: OptionsStore>(store: &S, options: &[(String, String)]) -> SaveReport {
    let mut report = SaveReport::default();

    for (key, value) in options {
        match store.upsert(key, value).await {
            Ok(()) => {
                tracing::debug!("Option {} updated", key);
                report.saved.push(key.clone());
            }
            Err(e) => {
                tracing::warn!("Option {} update failed: {}", key, e);
                report.failures.push(FieldFailure {
                    key: key.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeStore {
        rejected_keys: Vec<String>,
        saved: Mutex<HashMap<String, String>>,
    }

    impl FakeStore {
        fn new(rejected_keys: &[&str]) -> Self {
            Self {
                rejected_keys: rejected_keys.iter().map(|k| k.to_string()).collect(),
                saved: Mutex::new(HashMap::new()),
            }
        }
    }

    impl OptionsStore for FakeStore {
        async fn upsert(&self, key: &str, value: &str) -> Result<(), OptionsError> {
            if self.rejected_keys.iter().any(|k| k == key) {
                return Err(OptionsError::Rejected("no permission".to_string()));
            }
            self.saved
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_wechat_to_options_skips_empty_fields() {
        let settings = WechatGatewaySettings {
            app_id: String::new(),
            mch_id: "1230000109".to_string(),
            api_v2_key: "k".repeat(32),
            min_topup: 1,
        };

        let options = settings.to_options();
        let keys: Vec<&str> = options.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["WechatMchId", "WechatApiV2Key", "WechatMinTopUp"]);
        assert_eq!(options.last().unwrap().1, "1");
    }

    #[test]
    fn test_alipay_to_options_always_sends_min_topup() {
        let settings = AlipayGatewaySettings {
            min_topup: 5,
            ..Default::default()
        };

        let options = settings.to_options();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0], ("AlipayMinTopUp".to_string(), "5".to_string()));
    }

    #[tokio::test]
    async fn test_save_options_all_succeed() {
        let store = FakeStore::new(&[]);
        let settings = WechatGatewaySettings {
            app_id: "wx1234".to_string(),
            mch_id: "1230000109".to_string(),
            api_v2_key: "k".repeat(32),
            min_topup: 1,
        };

        let report = save_options(&store, &settings.to_options()).await;
        assert!(report.is_success());
        assert_eq!(report.saved.len(), 4);
        assert_eq!(
            store.saved.lock().unwrap().get("WechatAppId"),
            Some(&"wx1234".to_string())
        );
    }

    #[tokio::test]
    async fn test_save_options_reports_partial_failure() {
        let store = FakeStore::new(&["AlipayPrivateKey"]);
        let settings = AlipayGatewaySettings {
            app_id: "2021000000000000".to_string(),
            private_key: "PRIVATE".to_string(),
            public_key: "PUBLIC".to_string(),
            min_topup: 1,
        };

        let report = save_options(&store, &settings.to_options()).await;
        assert!(!report.is_success());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].key, "AlipayPrivateKey");

        // The fields around the failure still landed.
        let saved = store.saved.lock().unwrap();
        assert!(saved.contains_key("AlipayAppId"));
        assert!(saved.contains_key("AlipayPublicKey"));
        assert!(saved.contains_key("AlipayMinTopUp"));
    }
}
