//! Refresh triggers decide *when* the worker re-pulls a snapshot and
//! re-scores. The engine itself never schedules anything.

use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};

pub trait RefreshTrigger {
    /// Wait for the next refresh. Resolves to `false` once no more will come.
    fn next_refresh(&mut self) -> impl Future<Output = bool> + Send;
}

/// Fires on a fixed period, starting immediately
pub struct IntervalTrigger {
    interval: Interval,
}

impl IntervalTrigger {
    /// Must be called from within a tokio runtime
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        // A slow refresh pushes the schedule back instead of bursting
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

impl RefreshTrigger for IntervalTrigger {
    async fn next_refresh(&mut self) -> bool {
        self.interval.tick().await;
        true
    }
}

/// Fires whenever a [`RefreshHandle`] asks for it
///
/// Requests made while one is already pending are coalesced. The trigger
/// ends once every handle is dropped and pending requests are drained.
pub struct ManualTrigger {
    rx: mpsc::Receiver<()>,
}

/// Requests refreshes from a [`ManualTrigger`], e.g. from a change-event callback
#[derive(Debug, Clone)]
pub struct RefreshHandle {
    tx: mpsc::Sender<()>,
}

impl ManualTrigger {
    pub fn channel() -> (Self, RefreshHandle) {
        let (tx, rx) = mpsc::channel(1);
        (Self { rx }, RefreshHandle { tx })
    }

    /// A trigger that fires exactly once
    pub fn once() -> Self {
        let (trigger, handle) = Self::channel();
        handle.request();
        trigger
    }
}

impl RefreshHandle {
    /// Ask for a refresh; returns `false` if the trigger is gone
    pub fn request(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) | Err(mpsc::error::TrySendError::Full(())) => true,
            Err(mpsc::error::TrySendError::Closed(())) => false,
        }
    }
}

impl RefreshTrigger for ManualTrigger {
    async fn next_refresh(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }
}
