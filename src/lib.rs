//! termsite - terminal websites with a typewriter effect
//!
//! Pages described in JSON are printed into an in-memory document through a
//! serial print queue: text is typed character by character, images are
//! revealed band by band, and navigation discards whatever is still queued.

pub mod actions;
pub mod cli;
pub mod config;
pub mod content;
pub mod document;
pub mod opener;
pub mod print;
pub mod render;
pub mod session;
pub mod tui;

pub use actions::{ActionContext, ActionError, ActionRegistry};
pub use config::{Config, ConfigError};
pub use content::{ContentError, ContentItem, ContentSet, ItemKind, Page};
pub use opener::{LinkOpener, OpenError, RecordingOpener, SystemOpener};
pub use print::{PrintTask, Sequencer, Typewriter};
pub use render::ContentRenderer;
pub use session::{Activation, NavState, NavigationOutcome, SessionOptions, TerminalSession};
