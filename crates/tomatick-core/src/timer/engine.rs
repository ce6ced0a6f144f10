//! Pomodoro cycle engine.
//!
//! The engine owns the countdown and the cycle bookkeeping. Time only moves
//! when a tick is delivered: either by hand through [`PomodoroEngine::tick`]
//! or from the engine's [`TickSource`] through [`PomodoroEngine::deliver`].
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start_work--> Working
//! Working --0, rests_until_long > 0--> ShortResting
//! Working --0, rests_until_long == 0--> LongResting
//! ShortResting | LongResting --0--> Working
//! (any) --start_rest--> ShortResting | LongResting
//! (any) --start_work--> Working
//! ```
//!
//! ## Usage
//!
//! ```
//! use tomatick_core::alert::Silent;
//! use tomatick_core::timer::{ManualTicks, Phase, PomodoroConfig, PomodoroEngine};
//!
//! let config = PomodoroConfig::new(3, 1, 2, 2).unwrap();
//! let mut engine = PomodoroEngine::new(config, ManualTicks::new(), Silent);
//! engine.start_work();
//! for _ in 0..3 {
//!     engine.tick();
//! }
//! assert_eq!(engine.snapshot().phase, Phase::ShortResting);
//! ```

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::clock::format_clock;
use super::cycle::{Phase, PomodoroConfig, RestKind};
use super::tick::{Tick, TickSource, TICK_INTERVAL};
use crate::alert::{AlertSink, Cue};
use crate::events::{Event, Trigger};

/// Read-only copy of everything the engine tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub phase: Phase,
    pub remaining_secs: u64,
    /// Whether the tick source is running. Independent of `phase`.
    pub counting: bool,
    /// Short rests left before the next long rest is due.
    pub rests_until_long: u32,
    pub completed_long_cycles: u64,
    pub total_worked_secs: u64,
    pub completed_work_intervals: u64,
}

impl EngineSnapshot {
    /// Remaining time as `MM:SS`.
    pub fn clock(&self) -> String {
        format_clock(self.remaining_secs)
    }
}

/// Core cycle engine.
///
/// Single owner, no interior mutability: every change goes through an
/// action method or a tick, and callers only ever see [`EngineSnapshot`]
/// copies.
#[derive(Debug)]
pub struct PomodoroEngine<T, A> {
    config: PomodoroConfig,
    state: EngineSnapshot,
    ticks: T,
    alerts: A,
    interval: Duration,
}

impl<T: TickSource, A: AlertSink> PomodoroEngine<T, A> {
    /// Create an engine in `Idle` with nothing counted yet.
    pub fn new(config: PomodoroConfig, ticks: T, alerts: A) -> Self {
        Self {
            state: EngineSnapshot {
                phase: Phase::Idle,
                remaining_secs: 0,
                counting: false,
                rests_until_long: config.short_rests_per_cycle(),
                completed_long_cycles: 0,
                total_worked_secs: 0,
                completed_work_intervals: 0,
            },
            config,
            ticks,
            alerts,
            interval: TICK_INTERVAL,
        }
    }

    /// Use a tick period other than one second. Each tick still counts
    /// as one second of countdown.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        assert!(!interval.is_zero(), "tick interval must be non-zero");
        self.interval = interval;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &PomodoroConfig {
        &self.config
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_counting(&self) -> bool {
        self.state.counting
    }

    pub fn ticks(&self) -> &T {
        &self.ticks
    }

    pub fn alerts(&self) -> &A {
        &self.alerts
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Reset into a fresh work interval, whatever the current phase.
    pub fn start_work(&mut self) -> Event {
        self.enter(Phase::Working, Trigger::Manual)
    }

    /// Begin a rest immediately, whatever the current phase.
    ///
    /// Leaving `Working` this way counts as a completed work interval.
    pub fn start_rest(&mut self, kind: RestKind) -> Event {
        if self.state.phase == Phase::Working {
            self.state.completed_work_intervals += 1;
        }
        self.enter_rest(kind, Trigger::Manual)
    }

    /// Pause or resume the countdown. The remaining time is untouched.
    ///
    /// Returns `None` in `Idle`, where there is no countdown to pause.
    pub fn toggle_pause(&mut self) -> Option<Event> {
        if self.state.phase == Phase::Idle {
            return None;
        }
        self.state.counting = !self.state.counting;
        let remaining_secs = self.state.remaining_secs;
        let at = Utc::now();
        if self.state.counting {
            self.ticks.start(self.interval);
            debug!(remaining_secs, "resumed");
            Some(Event::Resumed { remaining_secs, at })
        } else {
            self.ticks.stop();
            debug!(remaining_secs, "paused");
            Some(Event::Paused { remaining_secs, at })
        }
    }

    /// Route a tick from the tick source. Ticks left over from a replaced
    /// or stopped registration are dropped.
    pub fn deliver(&mut self, tick: Tick) -> Option<Event> {
        if !self.ticks.is_current(tick) {
            trace!(generation = tick.generation, "dropping stale tick");
            return None;
        }
        self.tick()
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `Some(Event::PhaseEntered)` when the countdown ran out and the
    /// next phase has been entered; the zero is never observable. Ticks
    /// while paused or idle are ignored.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.state.counting {
            return None;
        }
        match self.state.phase {
            Phase::Idle => {
                warn!("tick while idle and counting; ignoring");
                None
            }
            phase => {
                self.state.remaining_secs = self.state.remaining_secs.saturating_sub(1);
                if phase == Phase::Working {
                    self.state.total_worked_secs += 1;
                }
                trace!(?phase, remaining_secs = self.state.remaining_secs, "tick");
                if self.state.remaining_secs > 0 {
                    return None;
                }
                Some(self.complete_phase())
            }
        }
    }

    /// Stop the tick source for good. Used when the session ends.
    pub fn shutdown(&mut self) {
        self.ticks.stop();
        self.state.counting = false;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_phase(&mut self) -> Event {
        if self.state.phase != Phase::Working {
            return self.enter(Phase::Working, Trigger::Countdown);
        }
        self.state.completed_work_intervals += 1;
        let kind = if self.state.rests_until_long > 0 {
            self.state.rests_until_long -= 1;
            RestKind::Short
        } else {
            RestKind::Long
        };
        self.enter_rest(kind, Trigger::Countdown)
    }

    fn enter_rest(&mut self, kind: RestKind, trigger: Trigger) -> Event {
        if kind == RestKind::Long {
            self.state.rests_until_long = self.config.short_rests_per_cycle();
            self.state.completed_long_cycles += 1;
        }
        self.enter(kind.phase(), trigger)
    }

    /// Commit the new phase, restart the clock, then cue.
    fn enter(&mut self, phase: Phase, trigger: Trigger) -> Event {
        let remaining_secs = match phase {
            Phase::Working => self.config.work_secs(),
            Phase::ShortResting => self.config.rest_secs(RestKind::Short),
            Phase::LongResting => self.config.rest_secs(RestKind::Long),
            Phase::Idle => 0,
        };
        let from = self.state.phase;
        self.state.phase = phase;
        self.state.remaining_secs = remaining_secs;
        self.state.counting = true;
        self.ticks.start(self.interval);
        debug!(?from, to = ?phase, ?trigger, remaining_secs, "entered phase");

        let cue = if phase == Phase::Working {
            Cue::Work
        } else {
            Cue::Rest
        };
        self.alerts.on_phase_enter(cue);

        Event::PhaseEntered {
            phase,
            remaining_secs,
            trigger,
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::CueLog;
    use crate::timer::ManualTicks;

    fn engine(work: u64, short: u64, long: u64, cycles: u32) -> PomodoroEngine<ManualTicks, CueLog> {
        let config = PomodoroConfig::new(work, short, long, cycles).unwrap();
        PomodoroEngine::new(config, ManualTicks::new(), CueLog::default())
    }

    fn classic() -> PomodoroEngine<ManualTicks, CueLog> {
        engine(1500, 300, 900, 4)
    }

    #[test]
    #[should_panic(expected = "tick interval must be non-zero")]
    fn zero_interval_is_rejected_up_front() {
        let _ = classic().with_interval(Duration::ZERO);
    }

    fn run(engine: &mut PomodoroEngine<ManualTicks, CueLog>, ticks: u64) -> Vec<Event> {
        (0..ticks).filter_map(|_| engine.tick()).collect()
    }

    #[test]
    fn starts_idle() {
        let engine = classic();
        let snap = engine.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.remaining_secs, 0);
        assert!(!snap.counting);
        assert_eq!(snap.rests_until_long, 3);
        assert_eq!(snap.completed_long_cycles, 0);
        assert_eq!(snap.total_worked_secs, 0);
        assert_eq!(snap.completed_work_intervals, 0);
        assert!(!engine.ticks().is_running());
    }

    #[test]
    fn ticks_are_ignored_while_idle() {
        let mut engine = classic();
        assert!(engine.tick().is_none());
        assert_eq!(engine.snapshot().remaining_secs, 0);
        assert_eq!(engine.snapshot().phase, Phase::Idle);
    }

    #[test]
    fn start_work_counts_down_and_cues() {
        let mut engine = classic();
        let event = engine.start_work();
        assert!(matches!(
            event,
            Event::PhaseEntered {
                phase: Phase::Working,
                remaining_secs: 1500,
                trigger: Trigger::Manual,
                ..
            }
        ));
        let snap = engine.snapshot();
        assert_eq!(snap.phase, Phase::Working);
        assert_eq!(snap.remaining_secs, 1500);
        assert!(snap.counting);
        assert!(engine.ticks().is_running());
        assert_eq!(engine.alerts().cues(), &[Cue::Work]);
    }

    #[test]
    fn classic_cycle_reaches_long_rest_on_fourth_completion() {
        let mut engine = classic();
        engine.start_work();

        let events = run(&mut engine, 1500);
        assert_eq!(events.len(), 1);
        let snap = engine.snapshot();
        assert_eq!(snap.phase, Phase::ShortResting);
        assert_eq!(snap.remaining_secs, 300);
        assert_eq!(snap.completed_work_intervals, 1);
        assert_eq!(snap.rests_until_long, 2);

        run(&mut engine, 300);
        let snap = engine.snapshot();
        assert_eq!(snap.phase, Phase::Working);
        assert_eq!(snap.remaining_secs, 1500);

        for _ in 0..2 {
            run(&mut engine, 1500 + 300);
        }
        run(&mut engine, 1500);

        let snap = engine.snapshot();
        assert_eq!(snap.phase, Phase::LongResting);
        assert_eq!(snap.remaining_secs, 900);
        assert_eq!(snap.completed_work_intervals, 4);
        assert_eq!(snap.rests_until_long, 3);
        assert_eq!(snap.completed_long_cycles, 1);
        assert_eq!(snap.total_worked_secs, 4 * 1500);

        run(&mut engine, 900);
        assert_eq!(engine.snapshot().phase, Phase::Working);
    }

    #[test]
    fn transition_has_no_zero_frame() {
        let mut engine = engine(2, 1, 1, 2);
        engine.start_work();
        assert!(engine.tick().is_none());
        assert_eq!(engine.snapshot().remaining_secs, 1);

        let event = engine.tick().unwrap();
        assert_eq!(event.entered_phase(), Some(Phase::ShortResting));
        let snap = engine.snapshot();
        assert_eq!(snap.phase, Phase::ShortResting);
        assert_eq!(snap.remaining_secs, 1);
    }

    #[test]
    fn manual_rest_from_work_counts_interval() {
        let mut engine = classic();
        engine.start_work();
        run(&mut engine, 700);
        assert_eq!(engine.snapshot().remaining_secs, 800);

        let event = engine.start_rest(RestKind::Short);
        assert!(matches!(
            event,
            Event::PhaseEntered {
                phase: Phase::ShortResting,
                remaining_secs: 300,
                trigger: Trigger::Manual,
                ..
            }
        ));
        let snap = engine.snapshot();
        assert_eq!(snap.phase, Phase::ShortResting);
        assert_eq!(snap.remaining_secs, 300);
        assert_eq!(snap.completed_work_intervals, 1);
        assert_eq!(snap.total_worked_secs, 700);
        assert_eq!(snap.rests_until_long, 3);
    }

    #[test]
    fn manual_rest_while_resting_does_not_count() {
        let mut engine = classic();
        engine.start_work();
        engine.start_rest(RestKind::Short);
        engine.start_rest(RestKind::Short);
        assert_eq!(engine.snapshot().completed_work_intervals, 1);

        let mut idle = classic();
        idle.start_rest(RestKind::Short);
        assert_eq!(idle.snapshot().completed_work_intervals, 0);
    }

    #[test]
    fn manual_long_rest_resets_cadence() {
        let mut engine = classic();
        engine.start_work();
        run(&mut engine, 1500);
        assert_eq!(engine.snapshot().rests_until_long, 2);

        engine.start_rest(RestKind::Long);
        let snap = engine.snapshot();
        assert_eq!(snap.phase, Phase::LongResting);
        assert_eq!(snap.remaining_secs, 900);
        assert_eq!(snap.rests_until_long, 3);
        assert_eq!(snap.completed_long_cycles, 1);
    }

    #[test]
    fn start_work_discards_rest_in_progress() {
        let mut engine = classic();
        engine.start_work();
        engine.start_rest(RestKind::Short);
        run(&mut engine, 100);
        engine.start_work();
        let snap = engine.snapshot();
        assert_eq!(snap.phase, Phase::Working);
        assert_eq!(snap.remaining_secs, 1500);
        assert_eq!(snap.completed_work_intervals, 1);
    }

    #[test]
    fn pause_preserves_remaining_and_stops_clock() {
        let mut engine = classic();
        engine.start_work();
        run(&mut engine, 10);

        let paused = engine.toggle_pause().unwrap();
        assert!(matches!(paused, Event::Paused { remaining_secs: 1490, .. }));
        assert!(!engine.ticks().is_running());
        run(&mut engine, 50);
        assert_eq!(engine.snapshot().remaining_secs, 1490);
        assert_eq!(engine.snapshot().total_worked_secs, 10);

        let resumed = engine.toggle_pause().unwrap();
        assert!(matches!(resumed, Event::Resumed { remaining_secs: 1490, .. }));
        assert!(engine.ticks().is_running());
        run(&mut engine, 5);
        assert_eq!(engine.snapshot().remaining_secs, 1485);
    }

    #[test]
    fn toggle_pause_twice_is_identity() {
        let mut engine = classic();
        engine.start_work();
        run(&mut engine, 42);
        let before = engine.snapshot();
        engine.toggle_pause();
        engine.toggle_pause();
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn toggle_pause_in_idle_is_noop() {
        let mut engine = classic();
        assert!(engine.toggle_pause().is_none());
        assert!(!engine.snapshot().counting);
        assert_eq!(engine.ticks().starts(), 0);
    }

    #[test]
    fn start_action_while_paused_resumes_counting() {
        let mut engine = classic();
        engine.start_work();
        engine.toggle_pause();
        engine.start_rest(RestKind::Short);
        assert!(engine.snapshot().counting);
        assert!(engine.ticks().is_running());
    }

    #[test]
    fn rests_cue_rest_and_work_cues_work() {
        let mut engine = engine(1, 1, 1, 2);
        engine.start_work();
        run(&mut engine, 4);
        assert_eq!(
            engine.alerts().cues(),
            &[Cue::Work, Cue::Rest, Cue::Work, Cue::Rest, Cue::Work]
        );
    }

    #[test]
    fn single_cycle_config_always_long_rests() {
        let mut engine = engine(2, 1, 3, 1);
        engine.start_work();
        run(&mut engine, 2);
        assert_eq!(engine.snapshot().phase, Phase::LongResting);
        run(&mut engine, 3 + 2);
        let snap = engine.snapshot();
        assert_eq!(snap.phase, Phase::LongResting);
        assert_eq!(snap.completed_long_cycles, 2);
        assert_eq!(snap.rests_until_long, 0);
    }

    #[test]
    fn deliver_drops_stale_ticks() {
        let mut engine = classic();
        engine.start_work();
        let stale = engine.ticks().pulse().unwrap();
        engine.start_work();
        assert!(engine.deliver(stale).is_none());
        assert_eq!(engine.snapshot().remaining_secs, 1500);

        let fresh = engine.ticks().pulse().unwrap();
        engine.deliver(fresh);
        assert_eq!(engine.snapshot().remaining_secs, 1499);
    }

    #[test]
    fn every_transition_restarts_the_clock() {
        let mut engine = engine(1, 1, 1, 2);
        engine.start_work();
        run(&mut engine, 2);
        assert_eq!(engine.ticks().starts(), 3);
        assert!(engine.ticks().is_running());
    }

    #[test]
    fn shutdown_stops_clock() {
        let mut engine = classic();
        engine.start_work();
        engine.shutdown();
        assert!(!engine.ticks().is_running());
        assert!(engine.tick().is_none());
        assert_eq!(engine.snapshot().remaining_secs, 1500);
    }

    #[test]
    fn snapshot_serializes_for_display() {
        let mut engine = classic();
        engine.start_work();
        let json = serde_json::to_value(engine.snapshot()).unwrap();
        assert_eq!(json["phase"], "working");
        assert_eq!(json["remaining_secs"], 1500);
        assert_eq!(engine.snapshot().clock(), "25:00");
    }
}
