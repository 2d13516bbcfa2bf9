//! Fixed-rate tick scheduling on top of variable frame times.

use std::time::Duration;

use battle_city_core::{TickInput, TICKS_PER_SECOND};
use battle_city_rendering::FrameInput;

/// Upper bound on ticks simulated for a single rendered frame.
pub(crate) const MAX_CATCH_UP_TICKS: u32 = 5;

/// Accumulates frame time and releases whole simulation ticks.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FixedStep {
    step: Duration,
    accumulated: Duration,
    max_ticks: u32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(TICKS_PER_SECOND, MAX_CATCH_UP_TICKS)
    }
}

impl FixedStep {
    pub(crate) fn new(ticks_per_second: u32, max_ticks: u32) -> Self {
        Self {
            step: Duration::from_secs(1) / ticks_per_second.max(1),
            accumulated: Duration::ZERO,
            max_ticks,
        }
    }

    /// Adds `dt` and returns how many ticks are due.
    ///
    /// Backlog beyond `max_ticks` is discarded so a stalled window does not
    /// replay seconds of gameplay at once.
    pub(crate) fn advance(&mut self, dt: Duration) -> u32 {
        self.accumulated += dt;
        let mut ticks = 0;
        while self.accumulated >= self.step && ticks < self.max_ticks {
            self.accumulated -= self.step;
            ticks += 1;
        }
        if ticks == self.max_ticks && self.accumulated >= self.step {
            self.accumulated = Duration::ZERO;
        }
        ticks
    }
}

/// Holds frame input until the next tick consumes it.
///
/// Movement is a level and always reflects the latest frame. Fire and restart
/// are edges; they survive frames that release no tick and are consumed by
/// the first tick that runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct InputLatch {
    pending: FrameInput,
}

impl InputLatch {
    pub(crate) fn record(&mut self, input: FrameInput) {
        self.pending = FrameInput {
            movement: input.movement,
            fire: self.pending.fire || input.fire,
            restart: self.pending.restart || input.restart,
        };
    }

    pub(crate) fn take(&mut self) -> TickInput {
        let input = self.pending.tick_input();
        self.pending.fire = false;
        self.pending.restart = false;
        input
    }
}
