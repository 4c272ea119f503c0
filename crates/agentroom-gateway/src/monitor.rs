//! Periodic chatroom monitoring.
//!
//! Each monitored target owns one tokio task that polls get-info and
//! list-data on a fixed period and hands the combined snapshot to a
//! callback. Ticks run one after another inside that task; a tick that
//! outlives the period causes the missed ticks to be skipped, not queued.
//!
//! `stop` guarantees that no callback invocation starts after it returns,
//! including when a tick was already in flight.

use std::cell::Cell;
use std::collections::HashMap;
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use agentroom_protocol::{ChatroomInfo, DataEntry, RemoteTarget};

use crate::api::ChatroomApi;
use crate::error::{GatewayError, Result};

/// Combined result of one monitor tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorSnapshot {
    pub target: RemoteTarget,
    pub info: Option<ChatroomInfo>,
    pub messages: Vec<DataEntry>,
    pub timestamp: DateTime<Utc>,
}

pub type SnapshotCallback = Arc<dyn Fn(MonitorSnapshot) + Send + Sync>;

thread_local! {
    /// Delivery whose callback is running on this thread, if any.
    static DELIVERING: Cell<*const Delivery> = const { Cell::new(ptr::null()) };
}

/// Restores the previous delivering marker even if the callback panics.
struct DeliveringGuard {
    previous: *const Delivery,
}

impl DeliveringGuard {
    fn enter(delivery: &Delivery) -> Self {
        let previous = DELIVERING.with(|d| d.replace(delivery));
        Self { previous }
    }
}

impl Drop for DeliveringGuard {
    fn drop(&mut self) {
        DELIVERING.with(|d| d.set(self.previous));
    }
}

/// Callback plus the gate that serializes delivery against cancellation.
struct Delivery {
    callback: SnapshotCallback,
    cancelled: AtomicBool,
    gate: Mutex<()>,
}

impl Delivery {
    fn deliver(&self, snapshot: MonitorSnapshot) {
        let _gate = self.gate.lock().unwrap_or_else(|e| e.into_inner());
        if self.cancelled.load(Ordering::Acquire) {
            return;
        }
        let _delivering = DeliveringGuard::enter(self);
        (self.callback)(snapshot);
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        // Called from inside this delivery's own callback: the gate is held by us.
        if !ptr::eq(DELIVERING.with(Cell::get), self) {
            drop(self.gate.lock().unwrap_or_else(|e| e.into_inner()));
        }
    }
}

struct Subscription {
    task: JoinHandle<()>,
    delivery: Arc<Delivery>,
}

impl Subscription {
    fn cancel(self) {
        self.delivery.cancel();
        self.task.abort();
    }
}

/// Per-target polling monitor.
pub struct Monitor {
    api: Arc<dyn ChatroomApi>,
    interval: Duration,
    subscriptions: Mutex<HashMap<RemoteTarget, Subscription>>,
}

impl Monitor {
    /// Fails when `interval` is zero.
    pub fn new(api: Arc<dyn ChatroomApi>, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(GatewayError::Config("monitor interval must be positive".into()));
        }
        Ok(Self {
            api,
            interval,
            subscriptions: Mutex::new(HashMap::new()),
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start monitoring `target`, replacing any existing subscription for it.
    ///
    /// The first tick runs immediately. Must be called from within a tokio
    /// runtime.
    pub fn start<F>(&self, target: RemoteTarget, callback: F)
    where
        F: Fn(MonitorSnapshot) + Send + Sync + 'static,
    {
        let previous = self.subscriptions().remove(&target);
        if let Some(previous) = previous {
            tracing::debug!(process = %target, "Replacing existing monitor");
            previous.cancel();
        }

        let delivery = Arc::new(Delivery {
            callback: Arc::new(callback),
            cancelled: AtomicBool::new(false),
            gate: Mutex::new(()),
        });
        let task = tokio::spawn(run_subscription(
            Arc::clone(&self.api),
            target.clone(),
            self.interval,
            Arc::clone(&delivery),
        ));

        tracing::info!(process = %target, interval_secs = self.interval.as_secs(), "Monitoring started");
        let displaced = self
            .subscriptions()
            .insert(target, Subscription { task, delivery });
        if let Some(displaced) = displaced {
            displaced.cancel();
        }
    }

    /// Stop monitoring `target`. Returns whether a subscription existed.
    pub fn stop(&self, target: &RemoteTarget) -> bool {
        let removed = self.subscriptions().remove(target);
        match removed {
            Some(subscription) => {
                subscription.cancel();
                tracing::info!(process = %target, "Monitoring stopped");
                true
            }
            None => false,
        }
    }

    pub fn stop_all(&self) {
        let drained: Vec<_> = self.subscriptions().drain().collect();
        for (target, subscription) in drained {
            subscription.cancel();
            tracing::info!(process = %target, "Monitoring stopped");
        }
    }

    pub fn is_monitoring(&self, target: &RemoteTarget) -> bool {
        self.subscriptions().contains_key(target)
    }

    pub fn active_targets(&self) -> Vec<RemoteTarget> {
        self.subscriptions().keys().cloned().collect()
    }

    fn subscriptions(&self) -> MutexGuard<'_, HashMap<RemoteTarget, Subscription>> {
        self.subscriptions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.stop_all();
    }
}

/// Fetch info and entries for `target` concurrently.
pub async fn poll_once(api: &dyn ChatroomApi, target: &RemoteTarget) -> MonitorSnapshot {
    let (info, messages) = tokio::join!(api.get_chatroom_info(target), api.get_chatroom_data(target));
    MonitorSnapshot {
        target: target.clone(),
        info,
        messages,
        timestamp: Utc::now(),
    }
}

async fn run_subscription(
    api: Arc<dyn ChatroomApi>,
    target: RemoteTarget,
    period: Duration,
    delivery: Arc<Delivery>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        let snapshot = poll_once(api.as_ref(), &target).await;
        tracing::trace!(
            process = %target,
            has_info = snapshot.info.is_some(),
            messages = snapshot.messages.len(),
            "Monitor tick"
        );
        delivery.deliver(snapshot);
    }
}
