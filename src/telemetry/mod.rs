//! Telemetry module for the presswatch agent.
//!
//! This module provides the structured trace sink the classify loop
//! reports into: per-session counters with optional persistence.

pub mod log;

// Re-export commonly used types
pub use log::{
    create_shared_log, create_shared_log_with_persistence, SessionLog, SessionStats,
    SharedSessionLog,
};
