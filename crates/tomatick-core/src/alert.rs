//! Cues played when a phase begins.
//!
//! The engine calls the sink after the new phase is fully committed, so a
//! slow or misbehaving sink can delay but never corrupt a transition.

use std::io::Write;

use serde::{Deserialize, Serialize};

/// What kind of phase was just entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    Work,
    Rest,
}

pub trait AlertSink {
    /// Runs inline with tick processing; must return promptly.
    fn on_phase_enter(&mut self, cue: Cue);
}

/// Plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl AlertSink for Silent {
    fn on_phase_enter(&mut self, _cue: Cue) {}
}

/// Rings the terminal bell on stderr: once for work, twice for rest.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl AlertSink for TerminalBell {
    fn on_phase_enter(&mut self, cue: Cue) {
        let bells = match cue {
            Cue::Work => "\x07",
            Cue::Rest => "\x07\x07",
        };
        let mut stderr = std::io::stderr();
        // A closed stderr is not worth interrupting the session over.
        if let Err(e) = stderr.write_all(bells.as_bytes()).and_then(|_| stderr.flush()) {
            tracing::warn!("failed to ring bell: {e}");
        }
    }
}

/// Keeps every cue in order. Handy for hosts that poll instead of play.
#[derive(Debug, Default, Clone)]
pub struct CueLog {
    cues: Vec<Cue>,
}

impl CueLog {
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }
}

impl AlertSink for CueLog {
    fn on_phase_enter(&mut self, cue: Cue) {
        self.cues.push(cue);
    }
}
