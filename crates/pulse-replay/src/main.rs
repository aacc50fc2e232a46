//! pulse-replay - replay recorded input traces through the friction controller
//!
//! Feeds a JSON-lines trace of scroll, wheel, touch and dwell events through a
//! live friction session on a simulated clock, then reports what the
//! controller did: damped scrolls, cozy mode requests and the final kinetic
//! state.

#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod error;
mod output;
mod replay;
mod settings;
mod trace;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::ReplayError;
use crate::settings::ReplaySettings;

#[derive(Parser, Debug)]
#[command(name = "pulse-replay")]
#[command(about = "Replay a recorded input trace through the Pulse friction controller")]
#[command(version)]
struct Cli {
    /// JSON-lines trace file
    trace: PathBuf,

    /// Settings file (friction config, fatigue policy, initial mode)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Start the replay in cozy mode
    #[arg(long)]
    cozy: bool,

    /// Do not switch to cozy mode when the controller requests it
    #[arg(long)]
    ignore_requests: bool,

    /// Output in JSON format for machine parsing
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("pulse_replay={log_level},pulse_friction={log_level},pulse_kinetics={log_level}")
                    .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(&cli) {
        if cli.json {
            output::print_error_json(&e);
        } else {
            output::print_error_human(&e);
        }

        let exit_code = e
            .downcast_ref::<ReplayError>()
            .map_or(1, ReplayError::exit_code);
        std::process::exit(exit_code);
    }
}

fn execute(cli: &Cli) -> Result<()> {
    let mut settings = match &cli.settings {
        Some(path) => ReplaySettings::load(path)?,
        None => ReplaySettings::default(),
    };
    if cli.cozy {
        settings.initial_mode = pulse_friction::Mode::Cozy;
    }
    if cli.ignore_requests {
        settings.follow_requests = false;
    }

    let records = trace::read_trace_file(&cli.trace)?;
    let summary = replay::run(&records, &settings)
        .with_context(|| format!("replaying {}", cli.trace.display()))?;

    output::print_summary(&summary, cli.json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn parse_defaults() -> TestResult {
        let cli = Cli::try_parse_from(["pulse-replay", "trace.jsonl"])?;
        assert_eq!(cli.trace, PathBuf::from("trace.jsonl"));
        assert!(cli.settings.is_none());
        assert!(!cli.json);
        assert!(!cli.cozy);
        assert!(!cli.ignore_requests);
        assert_eq!(cli.verbose, 0);
        Ok(())
    }

    #[test]
    fn parse_flags() -> TestResult {
        let cli = Cli::try_parse_from([
            "pulse-replay",
            "-vv",
            "--json",
            "--cozy",
            "--settings",
            "replay.json",
            "trace.jsonl",
        ])?;
        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
        assert!(cli.cozy);
        assert_eq!(cli.settings, Some(PathBuf::from("replay.json")));
        Ok(())
    }

    #[test]
    fn parse_requires_trace() {
        assert!(Cli::try_parse_from(["pulse-replay"]).is_err());
    }
}
