//! The resolution pipeline.
//!
//! In planning mode every planned assignment resolves here as one batch
//! pass, players in snake order, each player's plans in insertion order.
//! In the action draft each placement already resolved on the spot, so
//! only the post-pass adjustments run. Either way the post-pass happens
//! exactly once per round, after every assignment has resolved.

use scaleup_logic::actions::{apply_effect, EffectCtx};
use scaleup_logic::company::CorporationStyle;
use scaleup_logic::constants::UNDERDOG_STIPEND;
use scaleup_logic::debt::DebtTier;
use scaleup_logic::leaders::LeaderPassive;
use scaleup_logic::power::{ai_debt_tokens, compute_power, PowerContext};
use scaleup_logic::resources::{below_median_mau, income_for};
use scaleup_logic::tables;
use scaleup_logic::PlayerId;

use crate::engine::GameEngine;
use crate::state::PlanningMode;

impl GameEngine {
    /// Resolve the round. Planning mode runs the full batch pass first;
    /// the action draft skips straight to the post-pass.
    pub(crate) fn run_resolution_pass(&mut self) {
        if self.state.planning_mode == PlanningMode::Planning {
            let order = self.state.round.draft_order.clone();
            for player in order {
                let count = self
                    .player(player)
                    .map(|p| p.planned_actions.len())
                    .unwrap_or(0);
                for index in 0..count {
                    self.resolve_assignment(player, index);
                }
            }
        }
        self.post_pass_adjustments();
        self.claim_milestones();
    }

    /// Resolve one engineer-to-action assignment: power pipeline, effect
    /// handler, AI debt cascade.
    pub(crate) fn resolve_assignment(&mut self, player: PlayerId, index: usize) {
        let Some(p) = self.player(player) else {
            return;
        };
        let Some(plan) = p.planned_actions.get(index).cloned() else {
            return;
        };
        let Some(engineer) = p.engineer(plan.engineer_id).cloned() else {
            return;
        };
        let action = plan.action;

        // In the action draft an assignment resolves the moment it lands,
        // so "last planned" means no engineer is left to place.
        let is_last_planned = match self.state.planning_mode {
            PlanningMode::Planning => p.is_last_planned(index),
            PlanningMode::ActionDraft => {
                p.engineers.iter().all(|e| e.assigned_action.is_some())
            }
        };
        let is_sole_on_action = p.planned_on(action) == 1;
        let tech_strategy = p.strategy.map(|s| s.tech);
        let tech_debt = p.resources.tech_debt;

        let leader = self.leader_of(player);
        let double_optimize_rating =
            leader.as_ref().map(|l| l.passive) == Some(LeaderPassive::DoubleOptimizeRating);
        let marketing_boost =
            leader.as_ref().map(|l| l.passive) == Some(LeaderPassive::MarketingBoost);
        let leader_halves_ai_debt =
            leader.as_ref().map(|l| l.passive) == Some(LeaderPassive::HalveAiDebt);

        let power_ctx = PowerContext {
            action,
            use_ai: plan.use_ai_augmentation,
            is_last_planned,
            is_sole_on_action,
            tech_debt,
            tech_strategy,
            leader: leader.as_ref(),
        };
        let power = compute_power(&engineer, &power_ctx);

        let cost = tables::action_cost(action, self.state.round.theme, marketing_boost);
        let charge_due = !self
            .state
            .round
            .costs_paid
            .get(&player)
            .map_or(false, |paid| paid.contains(&action));
        let track_due = !self
            .state
            .round
            .tracks_advanced
            .get(&player)
            .map_or(false, |t| t.contains(&action));

        let effect_ctx = EffectCtx {
            round: self.state.quarter,
            cost,
            charge_due,
            track_due,
            double_optimize_rating,
            marketing_boost,
            debt_payer: engineer.trait_ == Some(scaleup_logic::engineers::EngineerTrait::DebtPayer),
        };

        let color = self.random_token_color();
        let Some(p) = self.player_mut(player) else {
            return;
        };
        let outcome = apply_effect(p, action, power, &effect_ctx);
        if !outcome.applied {
            return;
        }

        if outcome.paid > 0 {
            self.state
                .round
                .costs_paid
                .entry(player)
                .or_default()
                .insert(action);
        }
        self.state
            .round
            .tracks_advanced
            .entry(player)
            .or_default()
            .insert(action);
        if outcome.marketing_used {
            self.state.round.marketing_resolved.push(player);
        }

        // AI side effect: buffer tokens now, overflow cascades into hard
        // debt immediately.
        let tokens = ai_debt_tokens(
            &engineer,
            plan.use_ai_augmentation,
            tech_strategy,
            leader_halves_ai_debt,
        );
        if tokens > 0 {
            if let Some(p) = self.player_mut(player) {
                let flushed = p.debt_buffer.push_many(color, tokens);
                p.resources.tech_debt += flushed;
            }
        }
    }

    /// Whole-player adjustments after every assignment has resolved.
    fn post_pass_adjustments(&mut self) {
        let ids: Vec<PlayerId> = self.state.players.iter().map(|p| p.id).collect();
        let marketing_resolved = self.state.round.marketing_resolved.clone();

        for &id in &ids {
            let passive = self.leader_of(id).map(|l| l.passive);
            let puzzle = self.state.round.puzzle_results.get(&id).copied();
            let Some(p) = self.player_mut(id) else {
                continue;
            };

            if let Some(outcome) = puzzle {
                p.resources.money += outcome.coins;
                if outcome.solved {
                    p.metrics.adjust_rating(1);
                }
            }

            if p.strategy.map(|s| s.tech)
                == Some(scaleup_logic::company::TechStrategy::QualityFocused)
            {
                p.metrics.adjust_rating(1);
            }

            let tier = DebtTier::from_debt(p.resources.tech_debt);
            p.metrics.adjust_rating(tier.rating_penalty());

            // Production tracks pay out every round.
            p.metrics.adjust_mau((p.production.mau_production * 10) as i32);
            p.metrics.revenue += p.production.revenue_production as u32;

            match passive {
                Some(LeaderPassive::FlatIncome(n)) => p.resources.money += n,
                Some(LeaderPassive::RivalMarketingWatch) => {
                    let rivals = marketing_resolved.iter().filter(|m| **m != id).count();
                    p.metrics.adjust_mau((rivals as u32 * 5) as i32);
                }
                _ => {}
            }
            if let Some(LeaderPassive::RatingFloor(floor)) = passive {
                if p.metrics.rating < floor {
                    p.metrics.rating = floor;
                }
            }

            if p.corporation_style == Some(CorporationStyle::Product) {
                p.resources.money += p.recurring_revenue;
            }
        }

        // Income against the post-pass median, stipend for the trailing half.
        let maus: Vec<u32> = self.state.players.iter().map(|p| p.metrics.mau).collect();
        let quarter = self.state.quarter;
        for p in self.state.players.iter_mut() {
            let mut income = income_for(p.metrics.mau, quarter);
            if below_median_mau(p.metrics.mau, &maus) {
                income += UNDERDOG_STIPEND;
            }
            p.resources.money += income;
        }
    }

    /// First-claim-wins milestone checks, in the round's draft order so
    /// trailing players get the tie.
    fn claim_milestones(&mut self) {
        let order = if self.state.round.draft_order.is_empty() {
            self.state.players.iter().map(|p| p.id).collect()
        } else {
            self.state.round.draft_order.clone()
        };
        let quarter = self.state.quarter;
        for milestone in self.state.milestones.iter_mut() {
            if milestone.claimed_by.is_some() {
                continue;
            }
            for &id in &order {
                let Some(p) = self.state.players.iter().find(|p| p.id == id) else {
                    continue;
                };
                if milestone.goal.reached(p) {
                    milestone.claimed_by = Some(id);
                    milestone.claimed_round = Some(quarter);
                    break;
                }
            }
        }
    }
}
