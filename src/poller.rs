use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::Instrument;
use uuid::Uuid;

use crate::display;
use crate::models::{PayWay, PaymentSession};
use crate::status::StatusQuery;

/// Caller-supplied callbacks. `on_complete` fires at most once, only on the
/// success transition; `on_close` fires on success (after `on_complete`) and
/// on cancellation.
pub struct PollerHooks {
    pub on_notify: Box<dyn Fn(String) + Send + Sync>,
    pub on_complete: Option<Box<dyn Fn() + Send + Sync>>,
    pub on_close: Box<dyn Fn() + Send + Sync>,
}

struct PollRun {
    live: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

/// Order-status poller: a cancellable repeating task that checks the order
/// status at a fixed interval while the session is visible and has an order
/// id, and drives the success/cancel lifecycle.
///
/// At most one run is active at a time. The shared `live` flag is the
/// single-fire gate: the success path flips it before any callback runs, so
/// a later tick, a repeated success response, or a response that lands after
/// `stop` can never act.
pub struct OrderStatusPoller<S: StatusQuery> {
    query: Arc<S>,
    hooks: Arc<PollerHooks>,
    interval: Duration,
    session: Arc<Mutex<PaymentSession>>,
    run: Option<PollRun>,
}

impl<S: StatusQuery> OrderStatusPoller<S> {
    pub fn new(query: S, hooks: PollerHooks, interval: Duration, pay_way: PayWay) -> Self {
        Self {
            query: Arc::new(query),
            hooks: Arc::new(hooks),
            interval,
            session: Arc::new(Mutex::new(PaymentSession::new(pay_way))),
            run: None,
        }
    }

    pub fn session(&self) -> PaymentSession {
        self.session.lock().unwrap().clone()
    }

    pub fn is_polling(&self) -> bool {
        self.run
            .as_ref()
            .map(|run| run.live.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.session.lock().unwrap().visible = visible;
        self.reconcile();
    }

    pub fn set_order_id(&mut self, order_id: Option<String>) {
        self.session.lock().unwrap().order_id = order_id;
        self.reconcile();
    }

    /// Display-only fields; changing them never touches the timer.
    pub fn set_pay_url(&mut self, pay_url: Option<String>) {
        self.session.lock().unwrap().pay_url = pay_url;
    }

    pub fn set_amount(&mut self, amount: Option<f64>) {
        self.session.lock().unwrap().amount = amount;
    }

    /// Converge the timer onto the session state: both `visible` and
    /// `order_id` present means a freshly (re)started run, anything else
    /// means no run. Restarting on every change keeps a single timer and
    /// never leaves a stale schedule behind.
    fn reconcile(&mut self) {
        let wants_polling = self.session.lock().unwrap().wants_polling();

        if wants_polling {
            self.start();
        } else {
            self.stop();
        }
    }

    /// Start a polling run, cancelling any existing one first.
    pub fn start(&mut self) {
        self.stop();

        let live = Arc::new(AtomicBool::new(true));
        let span = tracing::info_span!("poll", run_id = %Uuid::new_v4());

        let task = tokio::spawn(
            run_ticks(
                self.query.clone(),
                self.hooks.clone(),
                self.session.clone(),
                self.interval,
                live.clone(),
            )
            .instrument(span),
        );

        self.run = Some(PollRun { live, task });
    }

    /// Cancel the active run, if any. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(run) = self.run.take() {
            run.live.store(false, Ordering::SeqCst);
            run.task.abort();
        }
    }

    /// User-initiated close: stop the timer and request closure without a
    /// success notification or completion callback.
    pub fn cancel(&mut self) {
        self.stop();
        (self.hooks.on_close)();
    }
}

impl<S: StatusQuery> Drop for OrderStatusPoller<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_ticks<S: StatusQuery>(
    query: Arc<S>,
    hooks: Arc<PollerHooks>,
    session: Arc<Mutex<PaymentSession>>,
    every: Duration,
    live: Arc<AtomicBool>,
) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The zeroth tick resolves immediately; consume it so the first status
    // check lands one full interval after start.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        if !live.load(Ordering::SeqCst) {
            return;
        }

        // Re-read on every tick; the order id could go away without a
        // visibility change.
        let (order_id, pay_way) = {
            let session = session.lock().unwrap();
            match &session.order_id {
                Some(order_id) => (order_id.clone(), session.pay_way),
                None => continue,
            }
        };

        match query.check_status(&order_id).await {
            Ok(result) if result.is_success() => {
                // Kill the timer before any callback runs, and only act if
                // nothing else (stop, teardown, an earlier success) got
                // there first.
                if live
                    .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
                    .is_ok()
                {
                    tracing::info!("Payment confirmed for order {}", order_id);
                    (hooks.on_notify)(display::success_notice(pay_way).to_string());
                    if let Some(on_complete) = &hooks.on_complete {
                        on_complete();
                    }
                    (hooks.on_close)();
                }
                return;
            }
            Ok(_) => {
                tracing::debug!("Order {} still pending", order_id);
            }
            Err(e) => {
                // Transient by definition; the next tick retries.
                tracing::warn!("Status check for order {} failed: {}", order_id, e);
            }
        }
    }
}
