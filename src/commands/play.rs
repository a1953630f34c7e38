//! Interactive playback of a content file

use anyhow::{anyhow, Result};
use tracing::info;

use termsite::cli::SiteArgs;
use termsite::tui::theme::THEME_NAMES;
use termsite::tui::{SiteApp, Theme};
use termsite::TerminalSession;

use super::{open_site, session_options, site_config};

/// Browse the site until the user quits.
#[cfg(not(tarpaulin_include))]
pub async fn handle(args: &SiteArgs) -> Result<()> {
    let config = site_config(args)?;
    config.validate()?;
    let theme = Theme::by_name(&config.display.theme).ok_or_else(|| {
        anyhow!(
            "Unknown theme '{}'. Available: {}",
            config.display.theme,
            THEME_NAMES.join(", ")
        )
    })?;

    let mut session = TerminalSession::new(session_options(&config, args));
    let outcome = open_site(&mut session, args).await;
    info!(content = %args.content.display(), ?outcome, "site opened");

    SiteApp::new(session, theme, config.display.crt_effect).run().await
}
