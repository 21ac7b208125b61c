//! Clock abstraction

use std::time::Instant;

/// Monotonic seconds since some fixed origin
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall clock measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    time: f64,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self { time: start }
    }

    pub fn advance(&mut self, dt: f64) {
        self.time += dt;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.time
    }
}
