//! claude-pet: desktop companion that mirrors Claude Code activity.
//!
//! ## Subcommands
//!
//! - `run`: Watch the event file and drive the pet until Ctrl-C
//! - `hook`: Publish a Claude Code hook event (reads JSON from stdin)
//! - `stats`: Print today's usage statistics as JSON
//! - `assign` / `unassign` / `mapping`: Manage per-state animation bindings

mod commands;
mod hook;
mod logging;
mod run;

use clap::{Parser, Subcommand};
use logging::LogOutput;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "claude-pet")]
#[command(about = "Desktop pet that reacts to Claude Code")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pet until interrupted
    Run {
        /// Play this animation instead of the idle binding at startup
        #[arg(long, value_name = "PATH")]
        gif: Option<PathBuf>,

        /// Watch this event file instead of ~/.claude-pet/current-event.json
        #[arg(long, value_name = "PATH")]
        event_file: Option<PathBuf>,
    },

    /// Publish a hook event (reads JSON from stdin)
    Hook,

    /// Print today's statistics from the event log
    Stats,

    /// Bind an animation file to a state
    Assign {
        /// idle, thinking, working, happy, celebrating or sleeping
        #[arg(value_name = "STATE")]
        state: String,

        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Remove a state's binding
    Unassign {
        #[arg(value_name = "STATE")]
        state: String,
    },

    /// Show every state's binding
    Mapping,
}

fn main() {
    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Hook => LogOutput::FileOnly,
        _ => LogOutput::Console,
    };
    let _logging_guard = logging::init(output);

    let result = match cli.command {
        Commands::Run { gif, event_file } => run::run(gif, event_file),
        Commands::Hook => {
            // A failing hook must never disrupt Claude Code: log and exit 0
            if let Err(e) = hook::run() {
                tracing::warn!(error = %e, "claude-pet hook failed");
            }
            Ok(())
        }
        Commands::Stats => commands::stats(),
        Commands::Assign { state, path } => commands::assign(&state, &path),
        Commands::Unassign { state } => commands::unassign(&state),
        Commands::Mapping => commands::mapping(),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "claude-pet failed");
        std::process::exit(1);
    }
}
