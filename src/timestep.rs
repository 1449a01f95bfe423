//! Fixed-timestep accumulator decoupling physics from the display rate.

/// Converts variable frame times into a whole number of fixed steps.
///
/// Leftover time is carried to the next frame. When a frame is so long that more
/// than `max_steps` would be due, the excess is dropped so a stalled tab does not
/// trigger a burst of catch-up steps.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedTimestep {
    step: f32,
    max_steps: u32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(step: f32, max_steps: u32) -> Self {
        FixedTimestep { step, max_steps: max_steps.max(1), accumulator: 0.0 }
    }

    /// Add `elapsed` seconds and return how many fixed steps are due.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        if elapsed.is_finite() && elapsed > 0.0 {
            self.accumulator += elapsed;
        }
        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_steps && self.accumulator >= self.step {
            tracing::debug!(dropped = self.accumulator, "frame time exceeded step budget");
            self.accumulator = 0.0;
        }
        steps
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Time carried over to the next frame.
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_steps_with_carry() {
        let mut ts = FixedTimestep::new(0.25, 8);
        assert_eq!(ts.advance(0.625), 2);
        assert_eq!(ts.pending(), 0.125);
        assert_eq!(ts.advance(0.125), 1);
    }

    #[test]
    fn long_frames_are_capped() {
        let mut ts = FixedTimestep::new(0.01, 4);
        assert_eq!(ts.advance(1.0), 4);
        assert_eq!(ts.pending(), 0.0);
    }

    #[test]
    fn negative_and_nan_frames_are_ignored() {
        let mut ts = FixedTimestep::new(0.01, 4);
        assert_eq!(ts.advance(-1.0), 0);
        assert_eq!(ts.advance(f32::NAN), 0);
        assert_eq!(ts.pending(), 0.0);
    }
}
