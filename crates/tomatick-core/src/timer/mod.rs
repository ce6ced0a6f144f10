mod clock;
mod cycle;
mod engine;
pub mod tick;

pub use clock::{format_clock, format_duration};
pub use cycle::{Phase, PomodoroConfig, RestKind};
pub use engine::{EngineSnapshot, PomodoroEngine};
pub use tick::{IntervalTicker, ManualTicks, Tick, TickSource, TICK_INTERVAL};
