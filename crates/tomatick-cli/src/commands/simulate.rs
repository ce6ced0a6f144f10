use std::str::FromStr;

use clap::Args;
use tomatick_core::{
    Config, ConfigError, CoreError, Event, ManualTicks, PomodoroConfig, PomodoroEngine, RestKind,
    Silent,
};

#[derive(Args)]
pub struct SimulateArgs {
    /// Steps to replay in order: work, rest, long-rest, pause, tick[=N]
    steps: Vec<Step>,
    /// Print every event as a JSON line before the final state
    #[arg(long)]
    events: bool,
    /// Override timer.work_secs
    #[arg(long)]
    work_secs: Option<u64>,
    /// Override timer.short_rest_secs
    #[arg(long)]
    short_rest_secs: Option<u64>,
    /// Override timer.long_rest_secs
    #[arg(long)]
    long_rest_secs: Option<u64>,
    /// Override timer.cycles_per_long_rest
    #[arg(long)]
    cycles: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Work,
    Rest(RestKind),
    Pause,
    Tick(u64),
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(Step::Work),
            "rest" => Ok(Step::Rest(RestKind::Short)),
            "long-rest" => Ok(Step::Rest(RestKind::Long)),
            "pause" => Ok(Step::Pause),
            "tick" => Ok(Step::Tick(1)),
            other => match other.strip_prefix("tick=") {
                Some(n) => n
                    .parse()
                    .map(Step::Tick)
                    .map_err(|_| format!("invalid tick count '{n}'")),
                None => Err(format!(
                    "unknown step '{other}' (expected work, rest, long-rest, pause, tick[=N])"
                )),
            },
        }
    }
}

impl SimulateArgs {
    fn pomodoro(&self) -> Result<PomodoroConfig, ConfigError> {
        let mut timer = Config::load()?.timer;
        if let Some(secs) = self.work_secs {
            timer.work_secs = secs;
        }
        if let Some(secs) = self.short_rest_secs {
            timer.short_rest_secs = secs;
        }
        if let Some(secs) = self.long_rest_secs {
            timer.long_rest_secs = secs;
        }
        if let Some(cycles) = self.cycles {
            timer.cycles_per_long_rest = cycles;
        }
        timer.pomodoro()
    }
}

pub fn run(args: SimulateArgs) -> Result<(), CoreError> {
    let mut engine = PomodoroEngine::new(args.pomodoro()?, ManualTicks::new(), Silent);

    for step in &args.steps {
        match *step {
            Step::Work => emit(&args, Some(engine.start_work()))?,
            Step::Rest(kind) => emit(&args, Some(engine.start_rest(kind)))?,
            Step::Pause => emit(&args, engine.toggle_pause())?,
            Step::Tick(n) => {
                for _ in 0..n {
                    emit(&args, engine.tick())?;
                }
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
    Ok(())
}

/// Print `event` as a JSON line when `--events` was given.
fn emit(args: &SimulateArgs, event: Option<Event>) -> Result<(), CoreError> {
    if let (true, Some(event)) = (args.events, event) {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_steps() {
        assert_eq!("work".parse::<Step>(), Ok(Step::Work));
        assert_eq!("rest".parse::<Step>(), Ok(Step::Rest(RestKind::Short)));
        assert_eq!("long-rest".parse::<Step>(), Ok(Step::Rest(RestKind::Long)));
        assert_eq!("pause".parse::<Step>(), Ok(Step::Pause));
        assert_eq!("tick".parse::<Step>(), Ok(Step::Tick(1)));
        assert_eq!("tick=1500".parse::<Step>(), Ok(Step::Tick(1500)));
    }

    #[test]
    fn rejects_bad_steps() {
        assert!("tick=-1".parse::<Step>().is_err());
        assert!("tick=".parse::<Step>().is_err());
        assert!("nap".parse::<Step>().is_err());
    }
}
