//! The print pipeline.
//!
//! Output is produced by *print tasks*: asynchronous reveals (typewriter text,
//! progressive images) bound to elements that already exist in the document.
//! The [`Sequencer`] runs them strictly one after another.
//!
//! # Module Structure
//!
//! - [`typewriter`] - character-by-character text reveal
//! - [`image`] - image loading and band-by-band painting
//! - [`sequencer`] - the serial task queue
//!
//! # Cancellation
//!
//! Every reveal takes a [`CancellationToken`] and checks it, together with
//! the attachment of its target element, before each step. A navigation
//! cancels the token of the previous render and detaches its elements, so a
//! reveal that is still running stops at its next step.

pub mod image;
pub mod sequencer;
pub mod typewriter;

pub use image::{decode_image, FsImageLoader, ImageError, ImageLoader, ImageRevealer, RevealTiming};
pub use sequencer::{PrintTask, Sequencer};
pub use tokio_util::sync::CancellationToken;
pub use typewriter::Typewriter;

/// How a reveal ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    /// Everything was revealed
    Complete,
    /// Target was already gone when the reveal started; nothing was written
    Skipped,
    /// Target went away part-way through
    Interrupted,
    /// The resource could not be loaded; an inline error was shown instead
    Failed,
}

/// Errors surfaced by print tasks to the sequencer.
#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    #[error("print task failed: {0}")]
    Failed(String),

    #[error("print task panicked: {0}")]
    Panicked(String),
}

/// Destination of a typewriter reveal.
pub trait TextSink: Send {
    /// Whether the sink is still part of the visible output.
    fn is_attached(&self) -> bool;

    /// Replace the sink's content.
    fn set_text(&mut self, text: &str);

    /// Append one character.
    fn push_char(&mut self, ch: char);
}
