//! The press-pattern state machine.
//!
//! The classifier consumes timestamped level observations and turns them
//! into classified events. It is edge-triggered plus timeout-driven: a
//! multi-press window finalizes when `multi_press_interval` elapses after
//! the last release, whether or not another edge arrives, and a hold
//! escalates as soon as a sample at or past `hold_threshold` is observed
//! while the line is still asserted.
//!
//! State transitions are pure with respect to I/O: `observe` and `poll`
//! return the classified event (if any) and never dispatch, log, or sleep,
//! so the machine can be driven with fabricated instants in tests.

use crate::core::pattern::PressPattern;
use crate::source::Level;
use std::time::{Duration, Instant};

/// Live accumulation state while counting short presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PressWindow {
    /// Short presses counted so far, always >= 1
    count: u32,
    /// Instant of the most recent release
    last_release: Instant,
}

impl PressWindow {
    fn open(now: Instant) -> Self {
        Self {
            count: 1,
            last_release: now,
        }
    }

    fn expired(&self, now: Instant, interval: Duration) -> bool {
        now.duration_since(self.last_release) > interval
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    /// Line released, no window open
    Idle,
    /// Line asserted; `window` carries an open series across presses
    PressActive {
        since: Instant,
        window: Option<PressWindow>,
    },
    /// Line released with an open window awaiting more presses or expiry
    Accumulating { window: PressWindow },
}

/// The press-pattern classifier.
///
/// Owns all classification state; callers feed it `(level, instant)`
/// observations from a single consumer. After a `Hold` is emitted the
/// classifier halts and ignores further input until [`reset`].
///
/// [`reset`]: Classifier::reset
pub struct Classifier {
    multi_press_interval: Duration,
    hold_threshold: Duration,
    state: State,
    halted: bool,
}

impl Classifier {
    pub fn new(multi_press_interval: Duration, hold_threshold: Duration) -> Self {
        Self {
            multi_press_interval,
            hold_threshold,
            state: State::Idle,
            halted: false,
        }
    }

    /// Feed one level observation taken at `now`.
    ///
    /// Returns at most one classified event. `now` values must be
    /// non-decreasing across calls (monotonic clock).
    pub fn observe(&mut self, level: Level, now: Instant) -> Option<PressPattern> {
        if self.halted {
            return None;
        }

        match self.state {
            State::Idle => {
                if level.is_asserted() {
                    self.state = State::PressActive { since: now, window: None };
                }
                None
            }

            State::PressActive { since, window } => {
                if level.is_asserted() {
                    if now.duration_since(since) >= self.hold_threshold {
                        // Hold escalates immediately, without waiting for
                        // release; any carried window is discarded.
                        self.halt()
                    } else {
                        None
                    }
                } else {
                    // Released before the hold threshold: one short press.
                    self.count_release(window, now)
                }
            }

            State::Accumulating { window } => {
                if window.expired(now, self.multi_press_interval) {
                    // Time-driven finalization; an asserted edge in the
                    // same observation starts a fresh press afterwards.
                    let finalized = PressPattern::from_press_count(window.count);
                    self.state = if level.is_asserted() {
                        State::PressActive { since: now, window: None }
                    } else {
                        State::Idle
                    };
                    Some(finalized)
                } else if level.is_asserted() {
                    // Next press in the same series; the window rides along.
                    self.state = State::PressActive {
                        since: now,
                        window: Some(window),
                    };
                    None
                } else {
                    None
                }
            }
        }
    }

    /// Check for timeout-driven classification with no new observation.
    ///
    /// Finalizes an expired window, or escalates a hold whose threshold
    /// has passed. Intended for callers that learn about the passage of
    /// time without a fresh sample.
    pub fn poll(&mut self, now: Instant) -> Option<PressPattern> {
        if self.halted {
            return None;
        }

        match self.state {
            State::Accumulating { window } if window.expired(now, self.multi_press_interval) => {
                self.state = State::Idle;
                Some(PressPattern::from_press_count(window.count))
            }
            State::PressActive { since, .. }
                if now.duration_since(since) >= self.hold_threshold =>
            {
                self.halt()
            }
            _ => None,
        }
    }

    /// Whether a `Hold` has been emitted and the classifier stopped.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Discard all state and resume from `Idle`.
    pub fn reset(&mut self) {
        self.state = State::Idle;
        self.halted = false;
    }

    fn halt(&mut self) -> Option<PressPattern> {
        self.halted = true;
        self.state = State::Idle;
        Some(PressPattern::Hold)
    }

    fn count_release(&mut self, window: Option<PressWindow>, now: Instant) -> Option<PressPattern> {
        match window {
            // Stale series: close it out before counting the new press.
            Some(w) if w.expired(now, self.multi_press_interval) => {
                let finalized = PressPattern::from_press_count(w.count);
                self.state = State::Accumulating {
                    window: PressWindow::open(now),
                };
                Some(finalized)
            }
            Some(mut w) => {
                w.count += 1;
                w.last_release = now;
                self.state = State::Accumulating { window: w };
                None
            }
            None => {
                self.state = State::Accumulating {
                    window: PressWindow::open(now),
                };
                None
            }
        }
    }
}
