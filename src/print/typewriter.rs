//! Typewriter animation.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::trace;

use super::{Reveal, TextSink};

/// Reveals text one character at a time on a fixed cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Typewriter {
    interval: Duration,
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

impl Typewriter {
    /// Delay between two characters.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(5);

    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Type `text` into `sink`.
    ///
    /// The sink is cleared first and then receives exactly one `push_char`
    /// per character. The reveal stops as soon as the sink is detached or
    /// `cancel` fires; if that is already the case at the start, the sink is
    /// not touched at all.
    pub async fn type_text<S: TextSink>(
        &self,
        sink: &mut S,
        text: &str,
        cancel: &CancellationToken,
    ) -> Reveal {
        if cancel.is_cancelled() || !sink.is_attached() {
            return Reveal::Skipped;
        }

        sink.set_text("");
        for (typed, ch) in text.chars().enumerate() {
            if cancel.is_cancelled() || !sink.is_attached() {
                trace!(typed, "typewriter target went away");
                return Reveal::Interrupted;
            }
            sink.push_char(ch);
            self.pause().await;
        }
        Reveal::Complete
    }

    async fn pause(&self) {
        if self.interval.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.interval).await;
        }
    }
}
