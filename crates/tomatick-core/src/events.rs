use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// What caused a phase change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// A user control (start work, rest).
    Manual,
    /// The countdown of the previous phase ran out.
    Countdown,
}

/// Every state change in the engine produces an Event.
/// Displays render them; the CLI prints them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    PhaseEntered {
        phase: Phase,
        remaining_secs: u64,
        trigger: Trigger,
        at: DateTime<Utc>,
    },
    Paused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Resumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The phase entered, for `PhaseEntered` events.
    pub fn entered_phase(&self) -> Option<Phase> {
        match self {
            Event::PhaseEntered { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_entered_is_tagged() {
        let event = Event::PhaseEntered {
            phase: Phase::ShortResting,
            remaining_secs: 300,
            trigger: Trigger::Countdown,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "phase_entered");
        assert_eq!(json["phase"], "short_resting");
        assert_eq!(json["trigger"], "countdown");
        assert_eq!(json["remaining_secs"], 300);
        assert_eq!(event.entered_phase(), Some(Phase::ShortResting));
    }

    #[test]
    fn pause_event_has_no_phase() {
        let event = Event::Paused {
            remaining_secs: 12,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "paused");
        assert!(event.entered_phase().is_none());
    }
}
