//! Refresh scheduling.
//!
//! The scheduler lives on the UI thread and is either idle or refreshing.
//! Refreshes run as tasks on the tokio runtime and report back over an
//! [`mpsc`] channel that the main loop drains every tick, together with the
//! ticks of the interval timer.
//!
//! At most one refresh is ever in flight.  That is guaranteed by checking the
//! phase before spawning, which is enough because only the UI thread calls
//! [`Scheduler::trigger`].  A trigger that arrives mid-refresh is dropped, not
//! queued.
//!
//! ## For contributors
//!
//! Anything that should cause a refresh goes through [`Scheduler::trigger`]
//! with a new [`Trigger`] variant so it shows up in the logs.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::aggregator::{Aggregator, RefreshResult};

/// Why a refresh was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Initial,
    Interval,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Refreshing,
}

/// Messages sent from background tasks to the UI thread.
enum PollMsg {
    /// The interval elapsed.
    Tick,
    /// The in-flight refresh settled.
    Done(RefreshResult),
}

/// Periodic tick source.  Dropping it stops the ticks.
struct IntervalTimer {
    task: JoinHandle<()>,
}

impl IntervalTimer {
    fn start(runtime: &Handle, period: Duration, tx: mpsc::UnboundedSender<PollMsg>) -> Self {
        let task = runtime.spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                // Receiver gone means the scheduler was dropped.
                if tx.send(PollMsg::Tick).is_err() {
                    return;
                }
            }
        });
        Self { task }
    }
}

impl Drop for IntervalTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub struct Scheduler {
    aggregator: Arc<Aggregator>,
    runtime: Handle,
    period: Duration,
    phase: Phase,
    timer: Option<IntervalTimer>,
    tx: mpsc::UnboundedSender<PollMsg>,
    rx: mpsc::UnboundedReceiver<PollMsg>,
}

impl Scheduler {
    pub fn new(aggregator: Aggregator, runtime: Handle, period: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            aggregator: Arc::new(aggregator),
            runtime,
            period,
            phase: Phase::Idle,
            timer: None,
            tx,
            rx,
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.phase == Phase::Refreshing
    }

    /// Start the interval timer and kick off the first refresh.
    pub fn activate(&mut self) {
        if self.timer.is_none() {
            self.timer = Some(IntervalTimer::start(
                &self.runtime,
                self.period,
                self.tx.clone(),
            ));
        }
        self.trigger(Trigger::Initial);
    }

    /// Stop the interval timer.  An in-flight refresh still completes.
    pub fn deactivate(&mut self) {
        self.timer = None;
    }

    /// Start a refresh unless one is already running.
    ///
    /// Returns `true` if a refresh was started.
    pub fn trigger(&mut self, trigger: Trigger) -> bool {
        if self.phase == Phase::Refreshing {
            debug!(?trigger, "refresh already in progress, skipping");
            return false;
        }
        info!(?trigger, "refresh started");
        self.phase = Phase::Refreshing;

        let aggregator = Arc::clone(&self.aggregator);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = aggregator.refresh().await;
            let _ = tx.send(PollMsg::Done(result));
        });
        true
    }

    /// Drain pending messages without blocking.
    ///
    /// Timer ticks are turned into refreshes here.  Returns the result of a
    /// refresh that has just completed, if any.
    pub fn try_next(&mut self) -> Option<RefreshResult> {
        while let Ok(msg) = self.rx.try_recv() {
            if let Some(result) = self.handle(msg) {
                return Some(result);
            }
        }
        None
    }

    /// Wait for the next completed refresh.
    #[cfg(test)]
    async fn next(&mut self) -> Option<RefreshResult> {
        while let Some(msg) = self.rx.recv().await {
            if let Some(result) = self.handle(msg) {
                return Some(result);
            }
        }
        None
    }

    fn handle(&mut self, msg: PollMsg) -> Option<RefreshResult> {
        match msg {
            PollMsg::Tick => {
                self.trigger(Trigger::Interval);
                None
            }
            PollMsg::Done(result) => {
                self.phase = Phase::Idle;
                Some(result)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
