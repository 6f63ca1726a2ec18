//! The serializable game state.
//!
//! `GameState` is plain data — no cyclic references, no live handles —
//! so it round-trips through serde for save/load and undo. `RoundState`
//! is per-quarter scratch, rebuilt wholesale at every round boundary;
//! only the app market and code pool carry across (refilled).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use scaleup_logic::actions::ActionType;
use scaleup_logic::draft::{AscendingAuction, SealedBid};
use scaleup_logic::engineers::PoolEngineer;
use scaleup_logic::events::EventId;
use scaleup_logic::grid::AppCardId;
use scaleup_logic::player::Player;
use scaleup_logic::puzzle::{PuzzleBoard, PuzzleOutcome};
use scaleup_logic::scoring::{Milestone, ScoreBreakdown};
use scaleup_logic::slots::SlotRegistry;
use scaleup_logic::sprint::{SprintRun, SprintToken};
use scaleup_logic::tables::QuarterTheme;
use scaleup_logic::{EngineerId, PlayerId};

use crate::phases::Phase;

/// How the placement phase runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanningMode {
    /// Assign freely, lock, reveal, resolve as a batch.
    Planning,
    /// Snake-order draft; each placement resolves immediately.
    ActionDraft,
}

/// How the engineer pool is distributed each round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftMode {
    /// Simultaneous sealed bids, resolved as one batch.
    SealedBids,
    /// Free sequential picks in trailing-MAU snake order.
    SnakePick,
}

/// Host-supplied setup options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameOptions {
    pub player_names: Vec<String>,
    pub planning_mode: PlanningMode,
    pub draft_mode: DraftMode,
    pub seed: u64,
}

impl GameOptions {
    pub fn new(player_names: Vec<String>, planning_mode: PlanningMode, seed: u64) -> Self {
        GameOptions {
            player_names,
            planning_mode,
            draft_mode: DraftMode::SealedBids,
            seed,
        }
    }

    pub fn with_draft_mode(mut self, draft_mode: DraftMode) -> Self {
        self.draft_mode = draft_mode;
        self
    }
}

/// Sub-state of the engineer draft within a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftStage {
    SealedBids,
    SnakePick,
    PersonaAuction,
    Finished,
}

/// Sprint mini-game state: a shuffled bag and one run per player,
/// resolved in table order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SprintState {
    /// Drawn from the back, shuffled at creation.
    pub bag: Vec<SprintToken>,
    /// One run per player, acted on strictly in table order: the first
    /// unfinished run is the active one.
    pub runs: Vec<SprintRun>,
}

impl SprintState {
    pub fn active_run(&self) -> Option<&SprintRun> {
        self.runs.iter().find(|r| !r.is_done())
    }

    pub fn all_done(&self) -> bool {
        self.runs.iter().all(|r| r.is_done())
    }
}

/// Transient per-quarter scratch, rebuilt at the start of every round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub pool: Vec<PoolEngineer>,
    pub persona_pool: Vec<PoolEngineer>,
    pub draft_stage: DraftStage,
    pub sealed_bids: Vec<SealedBid>,
    pub bid_sequence: u32,
    pub bids_locked: BTreeSet<PlayerId>,
    /// Snake order for the sequential pick draft, one entry per pick.
    pub pick_order: Vec<PlayerId>,
    pub pick_index: usize,
    pub auction: Option<AscendingAuction>,
    pub slots: SlotRegistry,
    /// Snake order for the action draft, recomputed every round.
    pub draft_order: Vec<PlayerId>,
    pub picker: usize,
    /// Set while an interactive action-draft placement awaits completion.
    pub awaiting_interactive: Option<PlayerId>,
    pub plans_locked: BTreeSet<PlayerId>,
    pub current_event: Option<EventId>,
    pub theme: QuarterTheme,
    pub sprint: Option<SprintState>,
    pub puzzle_boards: BTreeMap<PlayerId, PuzzleBoard>,
    pub puzzle_results: BTreeMap<PlayerId, PuzzleOutcome>,
    /// Players who planned develop-features and still owe a program.
    pub puzzle_pending: BTreeSet<PlayerId>,
    /// Once-per-pass cost charges, keyed by action type.
    pub costs_paid: BTreeMap<PlayerId, BTreeSet<ActionType>>,
    /// Once-per-pass production track advances, keyed by action type.
    pub tracks_advanced: BTreeMap<PlayerId, BTreeSet<ActionType>>,
    /// Players whose marketing resolved this pass (rival-watch trigger).
    pub marketing_resolved: Vec<PlayerId>,
    /// Per-round one-shots.
    pub code_committed: BTreeSet<PlayerId>,
    pub cards_claimed: BTreeSet<PlayerId>,
    /// Shared code token pool, refilled each round.
    pub code_pool: Vec<scaleup_logic::debt::TokenColor>,
    /// Face-up app cards, refilled each round.
    pub app_market: Vec<AppCardId>,
    pub resolved: bool,
}

impl Default for RoundState {
    fn default() -> Self {
        RoundState {
            pool: Vec::new(),
            persona_pool: Vec::new(),
            draft_stage: DraftStage::SealedBids,
            sealed_bids: Vec::new(),
            bid_sequence: 0,
            bids_locked: BTreeSet::new(),
            pick_order: Vec::new(),
            pick_index: 0,
            auction: None,
            slots: SlotRegistry::default(),
            draft_order: Vec::new(),
            picker: 0,
            awaiting_interactive: None,
            plans_locked: BTreeSet::new(),
            current_event: None,
            theme: QuarterTheme::HypeCycle,
            sprint: None,
            puzzle_boards: BTreeMap::new(),
            puzzle_results: BTreeMap::new(),
            puzzle_pending: BTreeSet::new(),
            costs_paid: BTreeMap::new(),
            tracks_advanced: BTreeMap::new(),
            marketing_resolved: Vec::new(),
            code_committed: BTreeSet::new(),
            cards_claimed: BTreeSet::new(),
            code_pool: Vec::new(),
            app_market: Vec::new(),
            resolved: false,
        }
    }
}

/// The full game state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub planning_mode: PlanningMode,
    pub draft_mode: DraftMode,
    pub seed: u64,
    pub phase: Phase,
    /// 1-based quarter counter; exceeding the total ends the game.
    pub quarter: u8,
    pub players: Vec<Player>,
    pub milestones: Vec<Milestone>,
    /// Event ids in shuffled draw order, fixed at setup.
    pub event_order: Vec<EventId>,
    pub events_drawn: usize,
    /// Theme cards dealt at setup, one per quarter.
    pub themes: Vec<QuarterTheme>,
    pub round: RoundState,
    pub next_engineer_id: EngineerId,
    pub winner: Option<PlayerId>,
    pub final_scores: Vec<(PlayerId, ScoreBreakdown)>,
}

impl GameState {
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Fresh engineer id.
    pub fn mint_engineer_id(&mut self) -> EngineerId {
        let id = self.next_engineer_id;
        self.next_engineer_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_state_default_is_empty() {
        let r = RoundState::default();
        assert!(r.pool.is_empty());
        assert!(r.sealed_bids.is_empty());
        assert_eq!(r.draft_stage, DraftStage::SealedBids);
        assert!(!r.resolved);
    }
}
