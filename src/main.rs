use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use buildvision::adapters::{render_summary, SharedOutput};
use buildvision::bootstrap::{
    init_settings, init_tracing_subscriber, load_settings, resolve_settings_path, run_replay,
    ReplayOptions,
};
use buildvision::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing_subscriber(cli.log_dir.as_deref())?;

    let result = run(cli.command).await;
    if let Err(err) = &result {
        error!(error = format!("{err:#}"), "buildvision failed");
    }
    result
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Replay {
            script,
            solution,
            settings,
            tick_ms,
            pace_ms,
        } => {
            let settings = load_settings(settings.as_deref()).await?;
            let output = SharedOutput::stdout();
            let report = run_replay(
                ReplayOptions {
                    script,
                    solution,
                    tick: Duration::from_millis(tick_ms.max(1)),
                    pace: pace_ms.map(Duration::from_millis),
                },
                settings,
                output.clone(),
            )
            .await?;
            output.write_line(&render_summary(&report.view))?;
        }
        Commands::Settings { settings, init } => {
            if init {
                let (path, written) = init_settings(settings.as_deref()).await?;
                if written {
                    println!("# written to {}", path.display());
                }
            }
            let path = resolve_settings_path(settings.as_deref())?;
            let effective = load_settings(Some(&path)).await?;
            println!("# {}", path.display());
            print!("{}", effective.to_toml_string()?);
        }
    }
    Ok(())
}
