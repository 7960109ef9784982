use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

pub const STATUS_SUCCESS: &str = "success";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayWay {
    Wechat,
    Alipay,
    Other,
}

impl PayWay {
    /// Lenient tag parsing: the wechat gateway reports either "wechat" or
    /// the legacy "wxpay" alias.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "wechat" | "wxpay" => PayWay::Wechat,
            "alipay" => PayWay::Alipay,
            _ => PayWay::Other,
        }
    }
}

/// The unit the poller operates on. `order_id` and `visible` together gate
/// whether polling runs; the rest is display-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSession {
    pub order_id: Option<String>,
    pub visible: bool,
    pub pay_way: PayWay,
    pub pay_url: Option<String>,
    pub amount: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl PaymentSession {
    pub fn new(pay_way: PayWay) -> Self {
        Self {
            order_id: None,
            visible: false,
            pay_way,
            pay_url: None,
            amount: None,
            created_at: Utc::now(),
        }
    }

    pub fn wants_polling(&self) -> bool {
        self.visible && self.order_id.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusOutcome {
    Pending,
    Success,
}

/// Result of one status check: a coarse outcome plus the opaque response
/// payload for callers that want the details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusQueryResult {
    pub outcome: StatusOutcome,
    pub detail: serde_json::Value,
}

impl StatusQueryResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, StatusOutcome::Success)
    }
}

/// Wire shape of the status endpoint. Both the envelope discriminator and
/// the nested order status must carry the success sentinel; a response
/// missing either field counts as still pending.
#[derive(Debug, Deserialize)]
pub struct StatusEnvelope {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl StatusEnvelope {
    pub fn outcome(&self) -> StatusOutcome {
        let order_status = self.data["status"].as_str();
        if self.message == STATUS_SUCCESS && order_status == Some(STATUS_SUCCESS) {
            StatusOutcome::Success
        } else {
            StatusOutcome::Pending
        }
    }
}
