use std::io::Write;

use clap::Subcommand;
use pomotimer_core::{Config, Script, TimerController, TimerEngine, TokioScheduler};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::render::{render_line, usage, Intent};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the interactive timer in this terminal
    Run,
    /// Replay a script of toggle/reset/tick steps and print the result
    Simulate {
        /// Steps, e.g. "toggle tick*90 pause"
        script: String,
        /// Print only the final MM:SS clock
        #[arg(long, conflicts_with = "events")]
        clock: bool,
        /// Print every event instead of the final snapshot
        #[arg(long)]
        events: bool,
    },
}

pub fn run(action: TimerAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let result = runtime.block_on(run_widget(config));
            // A pending stdin read cannot be cancelled; do not wait for it.
            runtime.shutdown_background();
            result
        }
        TimerAction::Simulate {
            script,
            clock,
            events,
        } => {
            let script: Script = script.parse()?;
            let result = script.run();
            if result.dropped_ticks > 0 {
                info!(dropped = result.dropped_ticks, "ticks arrived while stopped");
            }
            if clock {
                println!("{}", result.final_state.display());
            } else if events {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                let snapshot = TimerEngine::with_state(result.final_state).snapshot();
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            }
            Ok(())
        }
    }
}

/// The terminal widget: one consumer loop over ticks, typed commands and Ctrl-C.
async fn run_widget(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let (scheduler, mut ticks) = TokioScheduler::new()?;
    let mut timer = TimerController::new(scheduler);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    writeln!(stdout, "{}", usage(&config.keys))?;
    draw(&mut stdout, timer.engine(), config)?;

    loop {
        tokio::select! {
            Some(handle) = ticks.recv() => {
                if timer.on_tick(handle).is_some() {
                    draw(&mut stdout, timer.engine(), config)?;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match Intent::parse(&line, &config.keys) {
                    Some(Intent::Toggle) => {
                        timer.toggle();
                        draw(&mut stdout, timer.engine(), config)?;
                    }
                    Some(Intent::Reset) => {
                        timer.reset();
                        draw(&mut stdout, timer.engine(), config)?;
                    }
                    Some(Intent::Quit) => break,
                    None => warn!(input = %line.trim(), "unrecognised command"),
                }
            }
            _ = &mut ctrl_c => {
                info!("interrupted");
                break;
            }
        }
    }

    Ok(())
}

fn draw(out: &mut impl Write, engine: &TimerEngine, config: &Config) -> std::io::Result<()> {
    writeln!(out, "{}", render_line(engine, &config.ui))?;
    out.flush()
}
