//! powerstrip-agent entry point: CLI dispatch on a single-threaded runtime.

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use powerstrip_agent::app::cli::{Args, Commands};
use powerstrip_agent::app::commands;
use powerstrip_agent::app::logging::{init_tracing, select_filter};
use powerstrip_agent::config::persistence::load_settings;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            if err.kind() == clap::error::ErrorKind::DisplayVersion {
                println!("\x1b[32mpowerstrip-agent {} ({})\x1b[0m", env!("CARGO_PKG_VERSION"), std::env::consts::ARCH);
                std::process::exit(0);
            }
            err.exit();
        }
    };

    // Settings come first so their log level can apply; their own load messages are not shown.
    let settings = load_settings(args.settings.as_deref()).await?;

    // Priority: 1. --log-level flag, 2. LOG_LEVEL env, 3. settings file
    let env_level = std::env::var("LOG_LEVEL").ok();
    let filter = select_filter(
        args.log_level.as_deref(),
        env_level.as_deref(),
        &settings.logging.log_level,
    );
    init_tracing(filter);
    debug!("Effective settings: {:?}", settings);

    match args.selected_command() {
        Commands::Monitor => commands::run_monitor(&settings, args.json).await,
        Commands::Resolve => commands::run_resolve(&settings, args.json).await,
        Commands::On { outlet } => commands::run_outlet(&settings, outlet, true).await,
        Commands::Off { outlet } => commands::run_outlet(&settings, outlet, false).await,
        Commands::Sensor => commands::run_sensor(&settings, args.json).await,
        Commands::Forget => commands::run_forget(&settings),
        Commands::Settings => commands::show_settings(&settings),
    }
}
