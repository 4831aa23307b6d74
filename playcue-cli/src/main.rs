//! playcue - playback-automation rule tool
//!
//! Validates, compiles, and simulates rule files against a track
//! duration, using the playcue-core engine end to end.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod sim;

/// Command-line arguments for playcue
#[derive(Parser, Debug)]
#[command(name = "playcue")]
#[command(about = "Playback-automation rule tool")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the cleaned rule text (only lines that parse)
    Validate {
        /// Rule file, one rule per line
        file: PathBuf,

        /// Track duration (time token like 3:20, or plain seconds)
        #[arg(short, long, env = "PLAYCUE_DURATION")]
        duration: String,
    },

    /// Print the compiled rule table as JSON
    Compile {
        /// Rule file, one rule per line
        file: PathBuf,

        /// Track duration (time token like 3:20, or plain seconds)
        #[arg(short, long, env = "PLAYCUE_DURATION")]
        duration: String,
    },

    /// Run the rules against a simulated playback session
    Simulate {
        /// Rule file, one rule per line
        file: PathBuf,

        /// Track duration (time token like 3:20, or plain seconds)
        #[arg(short, long, env = "PLAYCUE_DURATION")]
        duration: String,

        /// Starting position in seconds
        #[arg(long, default_value = "0")]
        from: u32,

        /// Initial volume (0-100)
        #[arg(long, default_value = "50")]
        volume: u8,

        /// Tick once per wall-clock second instead of running flat out
        #[arg(long)]
        realtime: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playcue=info,playcue_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    match args.command {
        Command::Validate { file, duration } => {
            let duration = commands::parse_duration(&duration)?;
            commands::run_validate(&file, duration)
                .with_context(|| format!("Failed to validate {}", file.display()))?;
        }
        Command::Compile { file, duration } => {
            let duration = commands::parse_duration(&duration)?;
            commands::run_compile(&file, duration)
                .with_context(|| format!("Failed to compile {}", file.display()))?;
        }
        Command::Simulate {
            file,
            duration,
            from,
            volume,
            realtime,
        } => {
            let duration = commands::parse_duration(&duration)?;
            commands::run_simulate(&file, duration, from, volume, realtime)
                .await
                .with_context(|| format!("Failed to simulate {}", file.display()))?;
        }
    }

    Ok(())
}
