//! Presswatch - press-pattern classification for a single physical button.
//!
//! This library turns a noisy, polled boolean input (a push button on a
//! GPIO line) into discrete interaction events - short-press counts
//! (1, 2, 3, more-than-3) and a long hold - and dispatches each classified
//! event to exactly one configured action, exactly once.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Presswatch                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐    ┌────────────┐    ┌────────────┐          │
//! │  │   Source   │───▶│  Sampler   │───▶│ Classifier │          │
//! │  │   (GPIO)   │    │ (10ms poll)│    │ (patterns) │          │
//! │  └────────────┘    └────────────┘    └────────────┘          │
//! │                                             │                │
//! │         ┌────────────┐               ┌────────────┐          │
//! │         │ Telemetry  │◀──────────────│ Dispatcher │          │
//! │         │    Log     │               │ (actions)  │          │
//! │         └────────────┘               └────────────┘          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The sampler polls the line at a fixed cadence on a background thread
//! and pushes timestamped samples over a bounded channel; a single
//! consumer feeds the classifier, so classification state is mutated from
//! one place only. The classifier is edge-triggered plus timeout-driven
//! and performs no I/O of its own, which keeps the state machine fully
//! testable with fabricated instants. `Hold` is a typed terminal event:
//! the caller decides whether to exit, log, or continue.
//!
//! # Example
//!
//! ```no_run
//! use presswatch::{Classifier, Dispatcher, PressPattern, Sampler};
//! use presswatch::source::{ButtonSource, LineConfig};
//! use std::time::Duration;
//!
//! let source = ButtonSource::new(&LineConfig::default()).expect("line");
//! let mut sampler = Sampler::new(Duration::from_millis(10));
//! sampler.start(source).expect("already running");
//!
//! let mut classifier =
//!     Classifier::new(Duration::from_millis(400), Duration::from_secs(10));
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.register(PressPattern::OneShort, Box::new(|| Ok(())));
//!
//! // Samples arrive on sampler.receiver(); feed them to
//! // classifier.observe() and dispatch whatever classifies.
//! ```

pub mod config;
pub mod core;
pub mod dispatch;
pub mod sampler;
pub mod source;
pub mod telemetry;

// Re-export key types at crate root for convenience
pub use config::{ActionsConfig, Config, LineSettings};
pub use core::{Classifier, PressPattern};
pub use dispatch::{command_action, Action, ActionError, DispatchError, Dispatcher};
pub use sampler::{Sampler, SamplerError};
pub use source::{Level, LevelSample, SignalSource, SourceError};
pub use telemetry::{SessionLog, SessionStats, SharedSessionLog};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
