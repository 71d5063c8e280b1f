//! Non-Linux (noop) implementation of the button signal source.
//!
//! This exists so the crate (and binary) can compile on targets without
//! GPIO access. The line always reads `Released`.

use crate::source::types::{Level, SignalSource, SourceError};

/// Settings for the line backing the button.
///
/// On non-Linux targets this is accepted but no hardware is touched.
#[derive(Debug, Clone)]
pub struct LineConfig {
    /// BCM pin number
    pub pin: u8,
    /// Whether the line reads low when the button is pressed
    pub active_low: bool,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            pin: 16,
            active_low: true,
        }
    }
}

/// A button source that never asserts.
pub struct NoopSource {
    _config: LineConfig,
}

impl NoopSource {
    pub fn new(config: &LineConfig) -> Result<Self, SourceError> {
        Ok(Self {
            _config: config.clone(),
        })
    }
}

impl SignalSource for NoopSource {
    fn read_level(&mut self) -> Result<Level, SourceError> {
        Ok(Level::Released)
    }
}

/// On non-Linux targets there is no GPIO device to gate on.
pub fn check_line_access() -> bool {
    false
}
