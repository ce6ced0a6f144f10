use std::io::{BufRead, Write};

use clap::Args;
use tokio::sync::mpsc;
use tomatick_core::timer::format_duration;
use tomatick_core::{
    AlertSink, Config, Control, CoreError, EngineSnapshot, Event, Phase, Session, Silent,
    TerminalBell,
};

#[derive(Args)]
pub struct RunArgs {
    /// Don't ring the terminal bell on phase changes
    #[arg(long)]
    no_bell: bool,
    /// Start the first work interval right away
    #[arg(long)]
    autostart: bool,
}

const HELP: &str = "controls: w = work, r = rest, p = pause/resume, q = quit";

pub fn run(args: RunArgs) -> Result<(), CoreError> {
    let config = Config::load()?;
    let pomodoro = config.pomodoro()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let summary = if config.alerts.bell && !args.no_bell {
        runtime.block_on(drive(Session::new(pomodoro, TerminalBell), args.autostart))
    } else {
        runtime.block_on(drive(Session::new(pomodoro, Silent), args.autostart))
    };

    println!();
    println!(
        "{} work intervals, {} long cycles, {} worked",
        summary.completed_work_intervals,
        summary.completed_long_cycles,
        format_duration(summary.total_worked_secs)
    );
    Ok(())
}

async fn drive<A: AlertSink>(session: Session<A>, autostart: bool) -> EngineSnapshot {
    let (tx, rx) = mpsc::channel(16);
    if autostart {
        // Fresh channel with spare capacity; cannot fail.
        let _ = tx.try_send(Control::StartWork);
    }
    spawn_stdin_reader(tx);
    println!("{HELP}");
    session.run(rx, render).await
}

/// Stdin is read on a plain thread; EOF closes the channel and ends the
/// session.
fn spawn_stdin_reader(tx: mpsc::Sender<Control>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Control>() {
                Ok(control) => {
                    if tx.blocking_send(control).is_err() {
                        break;
                    }
                }
                Err(e) => eprintln!("{e}"),
            }
        }
    });
}

fn render(event: Option<&Event>, snapshot: &EngineSnapshot) {
    let mut stdout = std::io::stdout().lock();
    if let Some(event) = event {
        let _ = writeln!(stdout);
        let _ = writeln!(stdout, "{}", describe(event));
    }
    let paused = if !snapshot.counting && snapshot.phase != Phase::Idle {
        " (paused)"
    } else {
        ""
    };
    let _ = write!(
        stdout,
        "\r{:<10} {}{}  intervals {}  long cycles {}  worked {}   ",
        snapshot.phase.label(),
        snapshot.clock(),
        paused,
        snapshot.completed_work_intervals,
        snapshot.completed_long_cycles,
        format_duration(snapshot.total_worked_secs)
    );
    let _ = stdout.flush();
}

fn describe(event: &Event) -> String {
    match event {
        Event::PhaseEntered { phase, .. } => format!("-> {}", phase.label()),
        Event::Paused { .. } => "-- paused".to_string(),
        Event::Resumed { .. } => "-- resumed".to_string(),
    }
}
