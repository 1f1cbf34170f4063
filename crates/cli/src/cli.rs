//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::Direction;
use std::path::PathBuf;

/// Tilt Coach - real-time left/right movement feedback from an accelerometer
#[derive(Parser, Debug)]
#[command(
    name = "tilt-coach",
    author,
    version,
    about = "Accelerometer movement feedback for guided recordings",
    long_about = "Classifies lateral phone movement as left, right or stationary.\n\n\
                  Calibrates a per-session baseline, smooths the relative tilt and \n\
                  reports whether the user moves toward the session's target direction."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "TILT_COACH_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "TILT_COACH_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a live recording session
    Run(RunArgs),

    /// Classify a recorded sample file
    Replay(ReplayArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display the effective configuration
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON); defaults apply when omitted
    #[arg(short, long, env = "TILT_COACH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Mock motion profile: "still", "sweep" or e.g. "still:20,left:15,right:15"
    #[arg(long, default_value = "sweep", env = "TILT_COACH_PROFILE")]
    pub profile: String,

    /// Replay this recording instead of the mock sensor
    #[arg(long, env = "TILT_COACH_REPLAY")]
    pub replay: Option<PathBuf>,

    /// Override the session target direction
    #[arg(long)]
    pub target: Option<Direction>,

    /// Seed for target selection and mock noise
    #[arg(long, env = "TILT_COACH_SEED")]
    pub seed: Option<u64>,

    /// Stop after this many seconds (0 = run until max duration or Ctrl+C)
    #[arg(long, default_value = "0", env = "TILT_COACH_DURATION")]
    pub duration: u64,

    /// Feedback poll interval in milliseconds
    #[arg(long, default_value = "100")]
    pub poll_ms: u64,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "TILT_COACH_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `replay` command
#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// JSONL recording of samples
    pub input: PathBuf,

    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, env = "TILT_COACH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit one JSON object per classified sample
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "tilt-coach.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file; defaults are shown when omitted
    #[arg(short, long, env = "TILT_COACH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_target() {
        let cli = Cli::parse_from(["tilt-coach", "run", "--target", "left", "--duration", "5"]);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.target, Some(Direction::Left));
                assert_eq!(args.duration, 5);
                assert_eq!(args.profile, "sweep");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_replay() {
        let cli = Cli::parse_from(["tilt-coach", "-v", "replay", "take.jsonl", "--json"]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Replay(args) => {
                assert_eq!(args.input, PathBuf::from("take.jsonl"));
                assert!(args.json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
