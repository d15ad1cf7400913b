use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use pomotimer_core::storage::LogConfig;
use pomotimer_core::Config;
use tracing::warn;

mod commands;
mod logging;
mod render;

#[derive(Parser)]
#[command(name = "pomotimer", version, about = "Pomodoro work/break timer")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    // Only the interactive timer reads config.toml up front; the config
    // subcommands load it themselves.
    let loaded = match &cli.command {
        Commands::Timer {
            action: commands::timer::TimerAction::Run,
        } => Some(Config::load()),
        _ => None,
    };
    let level = match &loaded {
        Some(Ok(config)) => config.log.level.clone(),
        _ => LogConfig::default().level,
    };
    logging::init(cli.verbose, &level);

    let config = match loaded {
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            warn!("{e}; using default configuration");
            Config::default()
        }
        None => Config::default(),
    };

    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action, &config),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "pomotimer", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
