//! Button signal sources for the presswatch agent.
//!
//! This module provides the platform-specific line reader plus a
//! deterministic scripted source used by tests and demos.

pub mod scripted;
pub mod types;

#[cfg(target_os = "linux")]
pub mod gpio;

#[cfg(not(target_os = "linux"))]
pub mod noop;

// Re-export commonly used types
pub use scripted::ScriptedSource;
pub use types::{Level, LevelSample, SignalSource, SourceError};

#[cfg(target_os = "linux")]
pub use gpio::{check_line_access, GpioSource, LineConfig};

/// Platform-agnostic source type alias
#[cfg(target_os = "linux")]
pub type ButtonSource = GpioSource;

#[cfg(not(target_os = "linux"))]
pub use noop::{check_line_access, LineConfig, NoopSource};

/// Platform-agnostic source type alias
#[cfg(not(target_os = "linux"))]
pub type ButtonSource = NoopSource;
