//! Deadline-based periodic ticks.
//!
//! Every periodic effect in the simulation (hunger decay, starvation,
//! regeneration, detection checks, pickup scans) owns one of these. Because
//! the cadence lives inside the component or resource that uses it, dropping
//! the owner cancels the ticks with it.

use std::time::Duration;

use bevy::prelude::*;

/// Upper bound on ticks reported by one call after a long stall.
const MAX_CATCH_UP: u32 = 10;

/// A fixed-period tick source driven by the caller's clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cadence {
    period: Duration,
    next_due: Option<Duration>,
}

impl Cadence {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    pub fn from_secs(secs: f32) -> Self {
        Self::new(Duration::from_secs_f32(secs.max(0.001)))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Count the ticks due at `now`. The first call arms the cadence one
    /// period out and reports nothing.
    pub fn ticks(&mut self, now: Duration) -> u32 {
        let Some(mut due) = self.next_due else {
            self.next_due = Some(now + self.period);
            return 0;
        };

        let mut count = 0;
        while now >= due {
            count += 1;
            due += self.period;
            if count >= MAX_CATCH_UP {
                due = now + self.period;
                break;
            }
        }
        self.next_due = Some(due);
        count
    }

    /// Start counting a fresh period from `now`.
    pub fn restart(&mut self, now: Duration) {
        self.next_due = Some(now + self.period);
    }

    /// Forget the schedule; the next `ticks` call re-arms it.
    pub fn disarm(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }
}

/// Elapsed game time as seen from an exclusive context such as a bus
/// handler. Zero when the world has no clock.
pub fn elapsed(world: &World) -> Duration {
    world
        .get_resource::<Time>()
        .map(|time| time.elapsed())
        .unwrap_or_default()
}
