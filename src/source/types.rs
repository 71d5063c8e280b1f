//! Signal source types for the presswatch agent.
//!
//! A source exposes nothing but "read the current line level"; edge
//! detection and timing live entirely in the classifier.

use std::time::Instant;

/// The two-valued state of the input line.
///
/// `Asserted` means the button is pressed, regardless of the electrical
/// polarity of the wiring (active-low lines are normalized by the source).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Button pressed
    Asserted,
    /// Button not pressed
    Released,
}

impl Level {
    /// Whether the line reads as pressed.
    pub fn is_asserted(self) -> bool {
        matches!(self, Level::Asserted)
    }
}

/// A single timestamped level observation produced by the sampler.
#[derive(Debug, Clone, Copy)]
pub struct LevelSample {
    /// Observed level
    pub level: Level,
    /// Monotonic instant the level was read
    pub at: Instant,
}

impl LevelSample {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            at: Instant::now(),
        }
    }
}

/// A readable button signal source.
///
/// Implementations own whatever handle backs the line (a GPIO pin, a
/// scripted schedule) and release it on drop, so the line is freed on
/// every exit path of the sampler.
pub trait SignalSource {
    /// Read the current level of the line.
    fn read_level(&mut self) -> Result<Level, SourceError>;
}

/// Errors that can occur while acquiring or reading a signal source.
#[derive(Debug, Clone)]
pub enum SourceError {
    /// The line could not be acquired (missing device, permissions, busy pin)
    Acquire(String),
    /// A read on an acquired line failed
    Read(String),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Acquire(e) => write!(f, "could not acquire signal line: {e}"),
            SourceError::Read(e) => write!(f, "could not read signal line: {e}"),
        }
    }
}

impl std::error::Error for SourceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_is_asserted() {
        assert!(Level::Asserted.is_asserted());
        assert!(!Level::Released.is_asserted());
    }

    #[test]
    fn test_sample_carries_level() {
        let sample = LevelSample::new(Level::Asserted);
        assert_eq!(sample.level, Level::Asserted);
    }
}
