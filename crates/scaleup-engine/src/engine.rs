//! The state-owning game service.
//!
//! `GameEngine` wraps the serializable state plus the seeded RNG. All
//! mutation flows through the command methods in [`crate::commands`];
//! all reads through [`crate::queries`]. Hosts keep exactly one engine
//! per game and treat every command as one serialized transaction.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::phases::Phase;
use crate::state::{DraftMode, GameOptions, GameState, PlanningMode, RoundState};
use scaleup_logic::player::Player;
use scaleup_logic::PlayerId;

/// Outcome of a command.
///
/// `Rejected` is the expected, frequent, silent no-op for moves the game
/// rules deny — wrong turn, full slot, unaffordable cost. `Invalid`
/// marks a malformed call (nonexistent player or engineer id): also a
/// no-op, but logged, because it indicates a caller bug rather than a
/// rule denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    Applied,
    Rejected(&'static str),
    Invalid(&'static str),
}

impl CommandResult {
    pub fn is_applied(self) -> bool {
        self == CommandResult::Applied
    }
}

/// Reject silently: game-rule denial, never logged.
pub(crate) fn reject(reason: &'static str) -> CommandResult {
    CommandResult::Rejected(reason)
}

/// Invalid call: caller bug, logged once at warn level.
pub(crate) fn invalid(reason: &'static str) -> CommandResult {
    log::warn!("invalid command: {}", reason);
    CommandResult::Invalid(reason)
}

pub struct GameEngine {
    pub state: GameState,
    pub(crate) rng: StdRng,
}

impl GameEngine {
    /// Create an engine with an empty pre-init state. `init_game` builds
    /// the real game.
    pub fn new(seed: u64) -> Self {
        GameEngine {
            state: GameState {
                planning_mode: PlanningMode::Planning,
                draft_mode: DraftMode::SealedBids,
                seed,
                phase: Phase::Setup,
                quarter: 1,
                players: Vec::new(),
                milestones: Vec::new(),
                event_order: Vec::new(),
                events_drawn: 0,
                themes: Vec::new(),
                round: RoundState::default(),
                next_engineer_id: 1,
                winner: None,
                final_scores: Vec::new(),
            },
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Convenience: new engine plus `init_game` in one step.
    pub fn start(options: GameOptions) -> Self {
        let mut engine = GameEngine::new(options.seed);
        engine.init_game(options);
        engine
    }

    /// Restore an engine from a saved state. The RNG restarts from the
    /// recorded seed; determinism across a save/load boundary holds for
    /// the command history, not for interleaved draws.
    pub fn from_state(state: GameState) -> Self {
        let rng = StdRng::seed_from_u64(state.seed);
        GameEngine { state, rng }
    }

    pub(crate) fn player(&self, id: PlayerId) -> Option<&Player> {
        self.state.player(id)
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.state.player_mut(id)
    }

    /// Leader card for a player, if they drafted one.
    pub(crate) fn leader_of(&self, id: PlayerId) -> Option<scaleup_logic::leaders::Leader> {
        self.player(id)
            .and_then(|p| p.leader)
            .and_then(scaleup_logic::tables::leader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_engine_starts_in_setup() {
        let engine = GameEngine::new(7);
        assert_eq!(engine.state.phase, Phase::Setup);
        assert!(engine.state.players.is_empty());
    }

    #[test]
    fn result_kinds_are_distinguishable() {
        assert!(CommandResult::Applied.is_applied());
        assert!(!CommandResult::Rejected("x").is_applied());
        assert_ne!(CommandResult::Rejected("x"), CommandResult::Invalid("x"));
    }
}
