use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The activity the timer is currently counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Before the first start action. No countdown runs here.
    Idle,
    Working,
    ShortResting,
    LongResting,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Working => "work",
            Phase::ShortResting => "short rest",
            Phase::LongResting => "long rest",
        }
    }
}

/// Which rest a manual or automatic transition enters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestKind {
    Short,
    Long,
}

impl RestKind {
    pub fn phase(self) -> Phase {
        match self {
            RestKind::Short => Phase::ShortResting,
            RestKind::Long => Phase::LongResting,
        }
    }
}

/// Interval lengths and the long-rest cadence.
///
/// Immutable once built. Every field is validated to be positive by
/// [`PomodoroConfig::new`]; there is no way to obtain an instance holding
/// a zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PomodoroConfig {
    work_secs: u64,
    short_rest_secs: u64,
    long_rest_secs: u64,
    cycles_per_long_rest: u32,
}

impl PomodoroConfig {
    /// Validate and build a config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first field that
    /// is zero. Values are never clamped.
    pub fn new(
        work_secs: u64,
        short_rest_secs: u64,
        long_rest_secs: u64,
        cycles_per_long_rest: u32,
    ) -> Result<Self, ConfigError> {
        let checks = [
            ("work_secs", work_secs),
            ("short_rest_secs", short_rest_secs),
            ("long_rest_secs", long_rest_secs),
            ("cycles_per_long_rest", u64::from(cycles_per_long_rest)),
        ];
        for (key, value) in checks {
            if value == 0 {
                return Err(ConfigError::invalid(key, "must be greater than zero"));
            }
        }
        Ok(Self {
            work_secs,
            short_rest_secs,
            long_rest_secs,
            cycles_per_long_rest,
        })
    }

    pub fn work_secs(&self) -> u64 {
        self.work_secs
    }

    pub fn short_rest_secs(&self) -> u64 {
        self.short_rest_secs
    }

    pub fn long_rest_secs(&self) -> u64 {
        self.long_rest_secs
    }

    pub fn cycles_per_long_rest(&self) -> u32 {
        self.cycles_per_long_rest
    }

    pub fn rest_secs(&self, kind: RestKind) -> u64 {
        match kind {
            RestKind::Short => self.short_rest_secs,
            RestKind::Long => self.long_rest_secs,
        }
    }

    /// Short rests taken before a long rest becomes due.
    pub fn short_rests_per_cycle(&self) -> u32 {
        self.cycles_per_long_rest - 1
    }
}

impl Default for PomodoroConfig {
    /// 25 minutes of work, 5 minute short rests, 15 minute long rest every 4th.
    fn default() -> Self {
        Self {
            work_secs: 25 * 60,
            short_rest_secs: 5 * 60,
            long_rest_secs: 15 * 60,
            cycles_per_long_rest: 4,
        }
    }
}
