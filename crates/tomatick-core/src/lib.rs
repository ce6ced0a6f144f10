//! # Tomatick Core Library
//!
//! This library provides the core logic for the Tomatick work/rest cycle
//! timer. The CLI binary is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Cycle Engine**: A tick-driven state machine alternating work with
//!   short and long rests and counting completed intervals
//! - **Tick Sources**: The only source of forward time. A tokio interval for
//!   real sessions, a manual source for hosts that tick by hand
//! - **Alerts**: Cues played on entering work or rest
//! - **Session**: A single-owner event loop joining ticks and user controls
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`PomodoroEngine`]: Core cycle state machine
//! - [`EngineSnapshot`]: Read-only view for displays
//! - [`Session`]: Wall-clock driver
//! - [`Config`]: Application configuration management

pub mod alert;
pub mod error;
pub mod events;
pub mod session;
pub mod storage;
pub mod timer;

pub use alert::{AlertSink, Cue, CueLog, Silent, TerminalBell};
pub use error::{ConfigError, CoreError};
pub use events::{Event, Trigger};
pub use session::{Control, Session};
pub use storage::Config;
pub use timer::{
    format_clock, EngineSnapshot, ManualTicks, Phase, PomodoroConfig, PomodoroEngine, RestKind,
    TickSource,
};
