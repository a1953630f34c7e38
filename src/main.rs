//! termsite CLI entry point

mod commands;

use std::fs::File;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use termsite::cli::{Cli, Commands, ConfigCommands};

/// Environment variable overriding the log filter.
const LOG_ENV: &str = "TERMSITE_LOG";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    match cli.command {
        Commands::Play(args) => commands::play::handle(&args).await,
        Commands::Render(args) => commands::render::handle(&args).await,
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(),
            ConfigCommands::Edit => commands::config::handle_edit(),
            ConfigCommands::Migrate { yes } => commands::config::handle_migrate(yes),
        },
        Commands::Completions { shell } => commands::completions::handle(shell),
    }
}

/// Install the log subscriber.
///
/// `play` owns the terminal, so it only logs when `--log-file` is given.
/// Everything else logs to stderr.
fn init_logging(cli: &Cli) -> Result<()> {
    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(format!("termsite={}", level)));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match (&cli.log_file, &cli.command) {
        (Some(path), _) => {
            let file = File::create(path).with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        (None, Commands::Play(_)) => {}
        (None, _) => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}
