//! Classified interaction event kinds.

use serde::{Deserialize, Serialize};

/// The interaction event a closed press window (or a hold) classifies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PressPattern {
    /// A single short press
    OneShort,
    /// Two short presses in quick succession
    TwoShort,
    /// Three short presses in quick succession
    ThreeShort,
    /// Four or more short presses in quick succession
    ManyShort,
    /// The line held asserted past the hold threshold
    Hold,
}

impl PressPattern {
    /// Map a finalized window's press count to its event kind.
    ///
    /// Total over positive counts; everything past three collapses to
    /// `ManyShort`.
    pub fn from_press_count(count: u32) -> Self {
        match count {
            0 | 1 => PressPattern::OneShort,
            2 => PressPattern::TwoShort,
            3 => PressPattern::ThreeShort,
            _ => PressPattern::ManyShort,
        }
    }

    /// Whether this event ends the run (Hold is the one terminal outcome).
    pub fn is_terminal(self) -> bool {
        matches!(self, PressPattern::Hold)
    }

    /// Stable lowercase name, used for config keys and log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            PressPattern::OneShort => "one_short",
            PressPattern::TwoShort => "two_short",
            PressPattern::ThreeShort => "three_short",
            PressPattern::ManyShort => "many_short",
            PressPattern::Hold => "hold",
        }
    }

    /// All classifiable kinds, in escalation order.
    pub fn all() -> [PressPattern; 5] {
        [
            PressPattern::OneShort,
            PressPattern::TwoShort,
            PressPattern::ThreeShort,
            PressPattern::ManyShort,
            PressPattern::Hold,
        ]
    }
}

impl std::fmt::Display for PressPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
