//! Subcommand handlers.

pub mod completions;
pub mod config;
pub mod play;
pub mod render;

use std::time::Duration;

use anyhow::{Context, Result};

use termsite::cli::SiteArgs;
use termsite::content::reference;
use termsite::session::{NavigationOutcome, TerminalSession};
use termsite::{Config, SessionOptions};

/// Load the config file, with `play`/`render` flags applied on top.
pub fn site_config(args: &SiteArgs) -> Result<Config> {
    let mut config = Config::load().context("Failed to load config")?;
    if let Some(speed) = args.speed {
        config.playback.print_speed_ms = speed;
    }
    if let Some(seed) = args.seed {
        config.playback.seed = Some(seed);
    }
    if let Some(theme) = &args.theme {
        config.display.theme = theme.clone();
    }
    Ok(config)
}

/// Session options for a run. `--speed 0` also makes images instant.
pub fn session_options(config: &Config, args: &SiteArgs) -> SessionOptions {
    let mut options = config.session_options();
    if args.speed == Some(0) {
        options.reveal.band_delay = Duration::ZERO;
        options.reveal.stall_probability = 0.0;
    }
    options
}

/// Load content and open the requested start page.
///
/// Returns None when content failed to load; the session shows the error.
pub async fn open_site(session: &mut TerminalSession, args: &SiteArgs) -> Option<NavigationOutcome> {
    if !session.load_content(&args.content).await {
        return None;
    }
    Some(match &args.page {
        Some(page) => session.navigate(Some(&reference::internal(page))),
        None => session.open_home(),
    })
}
