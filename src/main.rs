use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use topup_client::config::Config;
use topup_client::models::PayWay;
use topup_client::poller::{OrderStatusPoller, PollerHooks};
use topup_client::status::HttpStatusClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "topup_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let order_id = match std::env::var("TOPUP_ORDER_ID") {
        Ok(order_id) => order_id,
        Err(_) => {
            tracing::error!("TOPUP_ORDER_ID is required");
            std::process::exit(1);
        }
    };

    let pay_way = PayWay::from_tag(
        &std::env::var("TOPUP_PAY_WAY").unwrap_or_else(|_| "wechat".to_string()),
    );

    tracing::info!(
        "Watching order {} against {} every {:?}",
        order_id,
        config.api_base_url,
        config.poll_interval
    );

    let client = HttpStatusClient::from_config(&config)?;

    let (done_tx, done_rx) = tokio::sync::oneshot::channel::<()>();
    let done_tx = std::sync::Mutex::new(Some(done_tx));

    let hooks = PollerHooks {
        on_notify: Box::new(|msg| {
            tracing::info!("{}", msg);
        }),
        on_complete: None,
        on_close: Box::new(move || {
            if let Some(tx) = done_tx.lock().unwrap().take() {
                let _ = tx.send(());
            }
        }),
    };

    let mut poller = OrderStatusPoller::new(client, hooks, config.poll_interval, pay_way);
    poller.set_order_id(Some(order_id));
    poller.set_visible(true);

    tokio::select! {
        _ = done_rx => {
            tracing::info!("Order reached success, exiting");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, cancelling watch");
            poller.cancel();
        }
    }

    Ok(())
}
