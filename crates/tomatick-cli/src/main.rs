use clap::{Parser, Subcommand};
use tomatick_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "tomatick-cli", version, about = "Tomatick work/rest cycle timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive session on the wall clock
    Run(commands::run::RunArgs),
    /// Replay controls and ticks instantly and print the resulting state
    Simulate(commands::simulate::SimulateArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// `TOMATICK_LOG` wins, then `logging.filter` from the config file.
/// Only reads the file; commands decide whether to create it.
fn init_logging() {
    let filter = EnvFilter::try_from_env("TOMATICK_LOG").unwrap_or_else(|_| {
        let configured = match Config::peek() {
            Ok(Some(cfg)) => cfg.logging.filter,
            _ => "warn".to_string(),
        };
        EnvFilter::try_new(configured).unwrap_or_else(|_| EnvFilter::new("warn"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
