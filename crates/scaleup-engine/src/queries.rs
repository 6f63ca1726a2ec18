//! Read-only views over the engine for hosts and bots.
//!
//! Nothing here touches the RNG or mutates state, so callers may poll
//! freely between commands.

use scaleup_logic::actions::ActionType;
use scaleup_logic::scoring::{score_player, Milestone, ScoreBreakdown};
use scaleup_logic::tables;
use scaleup_logic::PlayerId;

use crate::engine::GameEngine;
use crate::phases::Phase;
use crate::state::DraftStage;

impl GameEngine {
    /// The player the engine is waiting on, when the phase has a single
    /// active seat. Simultaneous phases (planning, bidding) return `None`.
    pub fn current_player(&self) -> Option<PlayerId> {
        match self.state.phase {
            Phase::EngineerDraft if self.state.round.draft_stage == DraftStage::SnakePick => self
                .state
                .round
                .pick_order
                .get(self.state.round.pick_index)
                .copied(),
            Phase::EngineerDraft if self.state.round.draft_stage == DraftStage::PersonaAuction => {
                self.state
                    .round
                    .auction
                    .as_ref()
                    .and_then(|a| a.current_bidder())
            }
            Phase::ActionDraft => self
                .state
                .round
                .awaiting_interactive
                .or_else(|| self.current_picker()),
            Phase::Sprint => self
                .state
                .round
                .sprint
                .as_ref()
                .and_then(|s| s.active_run())
                .map(|r| r.player),
            _ => None,
        }
    }

    /// Players currently seated on an action this round.
    pub fn occupancy(&self, action: ActionType) -> Vec<PlayerId> {
        self.state.round.slots.occupants(action)
    }

    /// Whether the player can pay the action's themed cost right now.
    pub fn can_afford(&self, player: PlayerId, action: ActionType) -> bool {
        let Some(p) = self.player(player) else {
            return false;
        };
        let marketing_boost = matches!(
            self.leader_of(player).map(|l| l.passive),
            Some(scaleup_logic::leaders::LeaderPassive::MarketingBoost)
        );
        let cost = tables::action_cost(action, self.state.round.theme, marketing_boost);
        p.resources.can_afford(cost)
    }

    /// Round-gated, seat-available, affordable: everything short of
    /// having an unassigned engineer.
    pub fn is_action_available(&self, player: PlayerId, action: ActionType) -> bool {
        if self.state.quarter < action.min_round() {
            return false;
        }
        if !self.can_afford(player, action) {
            return false;
        }
        let dual_focus = matches!(
            self.leader_of(player).map(|l| l.passive),
            Some(scaleup_logic::leaders::LeaderPassive::DualFocus(a)) if a == action
        );
        let cap = scaleup_logic::slots::effective_capacity(
            action.declared_capacity(),
            self.state.player_count(),
            dual_focus,
        );
        self.state.round.slots.is_available(player, action, cap)
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.state.milestones
    }

    pub fn draft_order(&self) -> &[PlayerId] {
        &self.state.round.draft_order
    }

    /// Action types on the board at a given round.
    pub fn available_actions(round: u8) -> Vec<ActionType> {
        ActionType::ALL
            .into_iter()
            .filter(|a| a.min_round() <= round)
            .collect()
    }

    /// The event that will fire this round, face-up all round.
    pub fn upcoming_event(&self) -> Option<scaleup_logic::events::GameEvent> {
        self.state
            .round
            .current_event
            .and_then(|id| tables::event_deck().into_iter().find(|e| e.id == id))
    }

    /// Live score breakdowns, usable mid-game for standings displays.
    pub fn scores(&self) -> Vec<(PlayerId, ScoreBreakdown)> {
        self.state
            .players
            .iter()
            .map(|p| (p.id, score_player(p, &self.state.milestones)))
            .collect()
    }
}
