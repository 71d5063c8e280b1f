//! Deterministic, time-scripted button source for tests and demos.
//!
//! A script is a list of `(offset, level)` steps: from `offset` after the
//! source was started, the line reads `level` until the next step takes
//! over. Before the first step the line reads `Released`.

use crate::source::types::{Level, SignalSource, SourceError};
use std::time::{Duration, Instant};

/// A button source replaying a fixed level schedule against the real clock.
pub struct ScriptedSource {
    steps: Vec<(Duration, Level)>,
    started: Instant,
}

impl ScriptedSource {
    /// Create a source from `(offset, level)` steps.
    ///
    /// Steps must be in ascending offset order; the schedule starts when
    /// the source is constructed.
    pub fn new(steps: Vec<(Duration, Level)>) -> Self {
        Self {
            steps,
            started: Instant::now(),
        }
    }

    /// A script that presses the button over each `[start, end)` span.
    pub fn with_presses(presses: &[(Duration, Duration)]) -> Self {
        let mut steps = Vec::with_capacity(presses.len() * 2);
        for &(start, end) in presses {
            steps.push((start, Level::Asserted));
            steps.push((end, Level::Released));
        }
        Self::new(steps)
    }

    /// The level the script prescribes at `elapsed` past the start.
    pub fn level_at(&self, elapsed: Duration) -> Level {
        let mut level = Level::Released;
        for &(offset, step_level) in &self.steps {
            if offset <= elapsed {
                level = step_level;
            } else {
                break;
            }
        }
        level
    }
}

impl SignalSource for ScriptedSource {
    fn read_level(&mut self) -> Result<Level, SourceError> {
        Ok(self.level_at(self.started.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_released_before_first_step() {
        let source = ScriptedSource::new(vec![(ms(50), Level::Asserted)]);
        assert_eq!(source.level_at(ms(0)), Level::Released);
        assert_eq!(source.level_at(ms(49)), Level::Released);
    }

    #[test]
    fn test_steps_take_over_at_offset() {
        let source = ScriptedSource::new(vec![
            (ms(10), Level::Asserted),
            (ms(30), Level::Released),
            (ms(60), Level::Asserted),
        ]);
        assert_eq!(source.level_at(ms(10)), Level::Asserted);
        assert_eq!(source.level_at(ms(29)), Level::Asserted);
        assert_eq!(source.level_at(ms(30)), Level::Released);
        assert_eq!(source.level_at(ms(100)), Level::Asserted);
    }

    #[test]
    fn test_with_presses_builds_edge_pairs() {
        let source = ScriptedSource::with_presses(&[(ms(10), ms(20)), (ms(40), ms(55))]);
        assert_eq!(source.level_at(ms(5)), Level::Released);
        assert_eq!(source.level_at(ms(15)), Level::Asserted);
        assert_eq!(source.level_at(ms(25)), Level::Released);
        assert_eq!(source.level_at(ms(50)), Level::Asserted);
        assert_eq!(source.level_at(ms(60)), Level::Released);
    }
}
