//! Client-side plumbing for a QR-code top-up flow: an order-status poller
//! that watches a pending top-up order until the backend reports success,
//! plus the payment-gateway settings panels' save logic.

pub mod config;
pub mod display;
pub mod models;
pub mod poller;
pub mod settings;
pub mod status;

pub use config::{Config, ConfigError};
pub use display::{style_for, success_notice, DisplayStyle};
pub use models::{PayWay, PaymentSession, StatusOutcome, StatusQueryResult};
pub use poller::{OrderStatusPoller, PollerHooks};
pub use settings::{
    save_options, AlipayGatewaySettings, FieldFailure, HttpOptionsStore, OptionsError,
    OptionsStore, SaveReport, WechatGatewaySettings,
};
pub use status::{HttpStatusClient, StatusError, StatusQuery};
