//! Core classification for the presswatch agent.
//!
//! This module contains:
//! - The classified event kinds and the count-to-kind mapping
//! - The press-pattern state machine

pub mod classifier;
pub mod pattern;

// Re-export commonly used types
pub use classifier::Classifier;
pub use pattern::PressPattern;
