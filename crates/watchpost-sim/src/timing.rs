//! Fixed timestep accumulator.
//!
//! Frames arrive with uneven deltas; guards tick at a fixed rate.

/// Maximum fixed updates per frame before the backlog is dropped.
const MAX_UPDATES: u32 = 10;

/// Converts frame deltas into a count of fixed ticks.
#[derive(Debug, Clone)]
pub struct FixedStep {
    /// Leftover time not yet consumed by a tick
    accumulator: f32,
    /// Fixed tick length
    fixed_dt: f32,
    /// Largest frame delta accepted
    max_dt: f32,
}

impl FixedStep {
    /// Creates an accumulator ticking every `fixed_dt` seconds.
    #[must_use]
    pub fn new(fixed_dt: f32) -> Self {
        Self {
            accumulator: 0.0,
            fixed_dt: fixed_dt.max(0.001),
            max_dt: 0.25,
        }
    }

    /// Fixed tick length.
    #[must_use]
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Accumulate a frame delta.
    /// Returns the number of fixed updates that should be performed.
    pub fn accumulate(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, self.max_dt);
        let mut count = 0;

        while self.accumulator >= self.fixed_dt && count < MAX_UPDATES {
            self.accumulator -= self.fixed_dt;
            count += 1;
        }

        // Still behind: drop the backlog
        if self.accumulator > self.fixed_dt * 2.0 {
            self.accumulator = 0.0;
        }

        count
    }
}
