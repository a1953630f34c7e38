//! CRT flicker.
//!
//! Every roll interval the screen has a small chance to dim for a short,
//! random time.

use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const ROLL_INTERVAL: Duration = Duration::from_secs(2);
pub const FLICKER_PROBABILITY: f64 = 0.1;
pub const FLICKER_MILLIS: RangeInclusive<u64> = 100..=300;

/// Flicker state machine, advanced by [`CrtEffect::tick`].
#[derive(Debug)]
pub struct CrtEffect {
    enabled: bool,
    rng: StdRng,
    next_roll: Instant,
    dim_until: Option<Instant>,
}

impl CrtEffect {
    pub fn new(enabled: bool, seed: Option<u64>, now: Instant) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            enabled,
            rng,
            next_roll: now + ROLL_INTERVAL,
            dim_until: None,
        }
    }

    /// Advance to `now`. Returns true when the dim state changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.enabled {
            return false;
        }
        let was_dim = self.is_dim(now);
        while now >= self.next_roll {
            if self.rng.random_bool(FLICKER_PROBABILITY) {
                let millis = self.rng.random_range(FLICKER_MILLIS);
                self.dim_until = Some(self.next_roll + Duration::from_millis(millis));
            }
            self.next_roll += ROLL_INTERVAL;
        }
        was_dim != self.is_dim(now)
    }

    pub fn is_dim(&self, now: Instant) -> bool {
        self.dim_until.is_some_and(|until| now < until)
    }
}
