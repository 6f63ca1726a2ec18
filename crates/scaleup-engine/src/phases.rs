//! The per-quarter phase machine.
//!
//! Phases advance in a fixed order with two branch points: the planning
//! style chosen at setup (batch planning vs immediate-resolution action
//! draft) and the mini-game detour after reveal. The engine is the only
//! writer of the phase field; commands request transitions through it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Setup,
    LeaderDraft,
    FundingSelection,
    EngineerDraft,
    /// Batch planning: everyone assigns, then locks.
    Planning,
    /// Immediate-resolution draft: picks resolve as they land.
    ActionDraft,
    Reveal,
    Sprint,
    Puzzle,
    Resolution,
    Event,
    RoundEnd,
    GameEnd,
}

impl Phase {
    /// Phases during which engineers may be assigned to actions.
    pub fn allows_assignment(self) -> bool {
        matches!(self, Phase::Planning | Phase::ActionDraft)
    }

    /// Phases during which grid moves (commit, swap, publish) are open.
    pub fn allows_grid_actions(self) -> bool {
        matches!(self, Phase::Planning | Phase::ActionDraft | Phase::RoundEnd)
    }

    pub fn is_terminal(self) -> bool {
        self == Phase::GameEnd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_windows() {
        assert!(Phase::Planning.allows_assignment());
        assert!(Phase::ActionDraft.allows_assignment());
        assert!(!Phase::Reveal.allows_assignment());
        assert!(!Phase::Resolution.allows_assignment());
    }

    #[test]
    fn terminal_phase() {
        assert!(Phase::GameEnd.is_terminal());
        assert!(!Phase::RoundEnd.is_terminal());
    }
}
