//! Flag register and halt status

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Comparison flags written by `CMP`.
///
/// Exactly one flag is set after any comparison; all three are clear before
/// the first one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flags {
    pub equal: bool,
    pub less: bool,
    pub greater: bool,
}

impl Flags {
    /// Flags for `a.cmp(&b)`
    pub fn from_ordering(ordering: Ordering) -> Self {
        Flags {
            equal: ordering == Ordering::Equal,
            less: ordering == Ordering::Less,
            greater: ordering == Ordering::Greater,
        }
    }

    /// Packed `0b00000LGE` form
    pub fn bits(&self) -> u8 {
        ((self.less as u8) << 2) | ((self.greater as u8) << 1) | self.equal as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HaltReason {
    /// HLT instruction
    Halted,
    /// Configured cycle limit reached
    CycleLimit,
}

/// Result of a single fetch-decode-dispatch cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Machine is still running
    Continue,
    /// Machine stopped; see the halt reason
    Halted(HaltReason),
}
