//! Tick sources: the only thing that moves a countdown forward.
//!
//! A [`TickSource`] is started and stopped by the engine. While running it
//! emits one [`Tick`] per interval. Each `start` opens a new registration
//! (generation); ticks from an older registration that are still queued
//! when the source is restarted or stopped are rejected by
//! [`TickSource::is_current`].
//!
//! Precision is bounded by the host timer. After a stall (suspended laptop,
//! blocked runtime) missed ticks are delivered as a burst, so countdown
//! seconds are delayed but never dropped.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Default tick period for wall-clock sessions.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// One elapsed interval, tagged with the registration that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

pub trait TickSource {
    /// Begin emitting ticks. Stops any previous registration first.
    fn start(&mut self, interval: Duration);

    /// Stop emitting ticks. No-op when not running.
    fn stop(&mut self);

    fn is_running(&self) -> bool;

    /// Whether `tick` belongs to the registration that is running now.
    fn is_current(&self, tick: Tick) -> bool;
}

/// Tick source for hosts that drive the engine by hand (tests, simulations,
/// external event loops). It only records registrations; the host calls
/// [`PomodoroEngine::tick`](super::PomodoroEngine::tick) itself.
#[derive(Debug, Default, Clone)]
pub struct ManualTicks {
    running: bool,
    generation: u64,
    starts: usize,
    stops: usize,
}

impl ManualTicks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `start` calls so far.
    pub fn starts(&self) -> usize {
        self.starts
    }

    /// Number of `stop` calls that actually stopped a running source.
    pub fn stops(&self) -> usize {
        self.stops
    }

    /// A tick stamped with the current registration, if running.
    pub fn pulse(&self) -> Option<Tick> {
        self.running.then_some(Tick {
            generation: self.generation,
        })
    }
}

impl TickSource for ManualTicks {
    fn start(&mut self, _interval: Duration) {
        self.stop();
        self.generation += 1;
        self.running = true;
        self.starts += 1;
    }

    fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.stops += 1;
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn is_current(&self, tick: Tick) -> bool {
        self.running && tick.generation == self.generation
    }
}

/// Wall-clock tick source backed by a tokio interval.
///
/// Each registration is a spawned task that sends ticks into an unbounded
/// channel; the receiving side is whoever owns the engine. The task never
/// touches engine state, so the engine stays single-owner.
#[derive(Debug)]
pub struct IntervalTicker {
    sender: mpsc::UnboundedSender<Tick>,
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl IntervalTicker {
    /// Create a stopped ticker and the receiver its ticks arrive on.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let ticker = Self {
            sender,
            generation: 0,
            task: None,
        };
        (ticker, receiver)
    }
}

impl TickSource for IntervalTicker {
    /// # Panics
    ///
    /// Panics if `period` is zero, or if called outside a tokio runtime.
    fn start(&mut self, period: Duration) {
        // interval_at would panic inside the task, where nobody sees it.
        assert!(!period.is_zero(), "tick period must be non-zero");
        self.stop();
        self.generation += 1;
        let generation = self.generation;
        let sender = self.sender.clone();
        self.task = Some(tokio::spawn(async move {
            // First tick one full period from now, not immediately.
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                interval.tick().await;
                if sender.send(Tick { generation }).is_err() {
                    break;
                }
            }
        }));
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_running(&self) -> bool {
        self.task.is_some()
    }

    fn is_current(&self, tick: Tick) -> bool {
        self.task.is_some() && tick.generation == self.generation
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
