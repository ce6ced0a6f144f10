//! Wall-clock session driver.
//!
//! One `select!` loop owns the engine and feeds it ticks and user controls
//! strictly one at a time. The ticker task only produces ticks, so nothing
//! else ever touches engine state and no locking is needed.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::info;

use crate::alert::AlertSink;
use crate::events::Event;
use crate::timer::{
    EngineSnapshot, IntervalTicker, PomodoroConfig, PomodoroEngine, RestKind, Tick, TickSource,
    TICK_INTERVAL,
};

/// The user-facing controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    StartWork,
    /// Manual rest is always a short rest.
    StartRest,
    TogglePause,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown control '{0}' (expected work, rest, pause or quit)")]
pub struct UnknownControl(pub String);

impl FromStr for Control {
    type Err = UnknownControl;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "w" | "work" => Ok(Control::StartWork),
            "r" | "rest" => Ok(Control::StartRest),
            "p" | "pause" | "resume" => Ok(Control::TogglePause),
            "q" | "quit" | "exit" => Ok(Control::Quit),
            other => Err(UnknownControl(other.to_string())),
        }
    }
}

pub struct Session<A> {
    engine: PomodoroEngine<IntervalTicker, A>,
    ticks: mpsc::UnboundedReceiver<Tick>,
}

impl<A: AlertSink> Session<A> {
    pub fn new(config: PomodoroConfig, alerts: A) -> Self {
        Self::with_interval(config, alerts, TICK_INTERVAL)
    }

    /// Session whose clock ticks every `interval` instead of every second.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero.
    pub fn with_interval(config: PomodoroConfig, alerts: A, interval: Duration) -> Self {
        let (ticker, ticks) = IntervalTicker::channel();
        let engine = PomodoroEngine::new(config, ticker, alerts).with_interval(interval);
        Self { engine, ticks }
    }

    pub fn engine(&self) -> &PomodoroEngine<IntervalTicker, A> {
        &self.engine
    }

    /// Apply one control. `Quit` does nothing here; `run` handles it.
    pub fn apply(&mut self, control: Control) -> Option<Event> {
        apply_control(&mut self.engine, control)
    }

    /// Drive the session until `Quit` arrives or the control channel closes.
    ///
    /// `observer` is called after every tick and every control, with the
    /// event it produced (if any) and the fresh snapshot. Returns the final
    /// snapshot.
    pub async fn run<F>(
        mut self,
        mut controls: mpsc::Receiver<Control>,
        mut observer: F,
    ) -> EngineSnapshot
    where
        F: FnMut(Option<&Event>, &EngineSnapshot),
    {
        info!("session started");
        loop {
            tokio::select! {
                Some(tick) = self.ticks.recv() => {
                    let event = self.engine.deliver(tick);
                    observer(event.as_ref(), &self.engine.snapshot());
                }
                control = controls.recv() => {
                    let control = match control {
                        None | Some(Control::Quit) => break,
                        Some(control) => control,
                    };
                    let event = apply_control(&mut self.engine, control);
                    observer(event.as_ref(), &self.engine.snapshot());
                }
            }
        }
        self.engine.shutdown();
        let snapshot = self.engine.snapshot();
        info!(
            completed_work_intervals = snapshot.completed_work_intervals,
            total_worked_secs = snapshot.total_worked_secs,
            "session ended"
        );
        snapshot
    }
}

fn apply_control<T: TickSource, A: AlertSink>(
    engine: &mut PomodoroEngine<T, A>,
    control: Control,
) -> Option<Event> {
    match control {
        Control::StartWork => Some(engine.start_work()),
        Control::StartRest => Some(engine.start_rest(RestKind::Short)),
        Control::TogglePause => engine.toggle_pause(),
        Control::Quit => None,
    }
}
