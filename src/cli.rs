use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "buildvision")]
#[command(about = "Build progress monitor", long_about = None)]
pub struct Cli {
    /// Also write logs to a daily rolling file in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay a recorded build event script against a solution
    Replay {
        /// Event script, one JSON event per line
        #[arg(long)]
        script: PathBuf,
        /// Solution manifest (TOML)
        #[arg(long)]
        solution: PathBuf,
        /// Settings file; defaults to the platform config dir
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Interval of the build progress ticker
        #[arg(long, default_value_t = 250)]
        tick_ms: u64,
        /// Delay between scripted events
        #[arg(long)]
        pace_ms: Option<u64>,
    },
    /// Print the effective settings
    Settings {
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Write the defaults when the file does not exist yet
        #[arg(long)]
        init: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_defaults_tick_interval() {
        let cli = Cli::try_parse_from([
            "buildvision",
            "replay",
            "--script",
            "events.jsonl",
            "--solution",
            "app.toml",
        ])
        .unwrap();

        match cli.command {
            Commands::Replay {
                tick_ms,
                settings,
                pace_ms,
                ..
            } => {
                assert_eq!(tick_ms, 250);
                assert!(settings.is_none());
                assert!(pace_ms.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn log_dir_is_accepted_after_the_subcommand() {
        let cli = Cli::try_parse_from(["buildvision", "settings", "--log-dir", "/tmp/logs"]).unwrap();
        assert_eq!(cli.log_dir, Some(PathBuf::from("/tmp/logs")));
    }

    #[test]
    fn replay_requires_a_script() {
        assert!(Cli::try_parse_from(["buildvision", "replay", "--solution", "app.toml"]).is_err());
    }
}
