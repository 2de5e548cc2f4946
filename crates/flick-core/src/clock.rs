//! Fixed-step accumulator turning wall-clock deltas into simulation steps.

/// Accumulates elapsed time and releases it in whole fixed steps.
#[derive(Debug, Clone)]
pub struct FixedClock {
    step: f32,
    max_substeps: u32,
    accumulator: f32,
    running: bool,
}

impl FixedClock {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            step,
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stops the clock and drops any partial step.
    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Adds `elapsed` seconds and returns how many fixed steps are due.
    ///
    /// At most `max_substeps` are released per call; the backlog beyond that is
    /// discarded so a long stall does not trigger a burst of catch-up steps.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        if !self.running || !elapsed.is_finite() || elapsed <= 0.0 {
            return 0;
        }

        self.accumulator += elapsed;
        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_substeps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_substeps && self.accumulator >= self.step {
            self.accumulator %= self.step;
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopped_clock_releases_nothing() {
        let mut clock = FixedClock::new(0.25, 8);
        assert_eq!(clock.advance(1.0), 0);
        clock.start();
        assert_eq!(clock.advance(1.0), 4);
    }

    #[test]
    fn test_partial_steps_accumulate() {
        let mut clock = FixedClock::new(0.25, 8);
        clock.start();
        assert_eq!(clock.advance(0.125), 0);
        assert_eq!(clock.advance(0.125), 1);
        assert_eq!(clock.advance(0.375), 1);
        assert_eq!(clock.advance(0.125), 1);
    }

    #[test]
    fn test_substeps_are_capped() {
        let mut clock = FixedClock::new(0.25, 2);
        clock.start();
        assert_eq!(clock.advance(10.0), 2);
        assert_eq!(clock.advance(0.0), 0);
        assert_eq!(clock.advance(0.25), 1);
    }

    #[test]
    fn test_stop_drops_backlog() {
        let mut clock = FixedClock::new(0.25, 8);
        clock.start();
        clock.advance(0.2);
        clock.stop();
        clock.start();
        assert_eq!(clock.advance(0.125), 0);
    }
}
