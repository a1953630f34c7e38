//! Headless rendering of a page

use std::sync::Arc;

use anyhow::{bail, Result};

use termsite::cli::SiteArgs;
use termsite::session::NavigationOutcome;
use termsite::{RecordingOpener, TerminalSession};

use super::{open_site, session_options, site_config};

/// Render the start page, wait for it to finish printing and write its text
/// to stdout. Fails when content cannot be loaded or the page is unknown,
/// after printing the inline error.
pub async fn handle(args: &SiteArgs) -> Result<()> {
    let config = site_config(args)?;
    config.validate()?;

    let mut session =
        TerminalSession::new(session_options(&config, args)).with_opener(Arc::new(RecordingOpener::new()));
    let outcome = open_site(&mut session, args).await;
    session.wait_idle().await;

    for line in session.surface().text_lines() {
        println!("{}", line);
    }

    match outcome {
        None => bail!("Failed to load content from {}", args.content.display()),
        Some(NavigationOutcome::NotFound(page)) => bail!("Page '{}' not found", page),
        Some(_) => Ok(()),
    }
}
