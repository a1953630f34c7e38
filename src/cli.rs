//! Command line interface definitions.
//!
//! Lives in the library so the man page generator can reach it.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Version string with git hash (dev builds) or without (release builds).
#[cfg(not(feature = "release"))]
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    ", built ",
    env!("TERMSITE_BUILD_DATE"),
    ")"
);

#[cfg(feature = "release")]
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("TERMSITE_BUILD_DATE"),
    ")"
);

#[derive(Debug, Parser)]
#[command(name = "termsite")]
#[command(version = VERSION)]
#[command(about = "Play JSON-described terminal websites with a typewriter effect")]
#[command(long_about = "Play JSON-described terminal websites with a typewriter effect.

A content file maps page ids to pages. Each page has a title and a list of
items: text, images, links, selections, inputs and buttons. Pages are
revealed character by character; links marked with '#' lead to other pages.

EXAMPLES:
    termsite play site.json             Browse the site interactively
    termsite play site.json --page about
    termsite render site.json --speed 0 Print the fully rendered home page
    termsite config show                Show current settings")]
pub struct Cli {
    /// Write logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Browse a content file in the terminal
    #[command(long_about = "Browse a content file in the terminal.

Tab/Shift-Tab (or the arrow keys) move between links, options, inputs and
buttons. Enter follows a link or presses a button. Esc quits.")]
    Play(SiteArgs),

    /// Render a page without a terminal UI and print its text
    #[command(long_about = "Render a page without a terminal UI and print its text.

Waits until every item has been revealed, then prints one line per block.
External links are not opened.")]
    Render(SiteArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Arguments shared by `play` and `render`.
#[derive(Debug, Clone, Args)]
pub struct SiteArgs {
    /// Content file (JSON)
    pub content: PathBuf,

    /// Page to start on instead of the home page
    #[arg(long, value_name = "ID")]
    pub page: Option<String>,

    /// Milliseconds between typed characters (0 prints instantly)
    #[arg(long, value_name = "MS")]
    pub speed: Option<u64>,

    /// Seed for image reveal stalls
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Color theme (green, amber, ocean)
    #[arg(long)]
    pub theme: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Open configuration file in $EDITOR
    Edit,
    /// Add missing fields to the config file
    Migrate {
        /// Apply without asking
        #[arg(short, long)]
        yes: bool,
    },
}
