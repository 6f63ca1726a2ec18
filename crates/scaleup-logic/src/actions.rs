//! Action catalog and per-action economic effects.
//!
//! Every action type has exactly one effect handler, applied once per
//! engineer assignment in planned order. Per-pass once-only concerns
//! (costs, production-track advances) are flagged by the caller through
//! [`EffectCtx`]; the handler itself stays a pure function of the player
//! and the context.

use serde::{Deserialize, Serialize};

use crate::company::{CorporationStyle, ProductStrategy};
use crate::constants::{MAX_AI_RESEARCH_LEVEL, MAX_SERVER_GRID_LEVEL};
use crate::debt;
use crate::player::Player;

/// Everything an engineer can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionType {
    DevelopFeatures,
    OptimizeCode,
    PayDownDebt,
    UpgradeServers,
    ResearchAi,
    Marketing,
    Monetization,
    HireRecruiter,
    GoViral,
    IpoPrep,
    AcquisitionTarget,
}

impl ActionType {
    pub const ALL: [ActionType; 11] = [
        ActionType::DevelopFeatures,
        ActionType::OptimizeCode,
        ActionType::PayDownDebt,
        ActionType::UpgradeServers,
        ActionType::ResearchAi,
        ActionType::Marketing,
        ActionType::Monetization,
        ActionType::HireRecruiter,
        ActionType::GoViral,
        ActionType::IpoPrep,
        ActionType::AcquisitionTarget,
    ];

    /// First round the action is on the board.
    pub fn min_round(self) -> u8 {
        match self {
            ActionType::HireRecruiter | ActionType::GoViral => 2,
            ActionType::IpoPrep | ActionType::AcquisitionTarget => 3,
            _ => 1,
        }
    }

    /// Declared seat capacity in distinct players; `None` is unlimited.
    pub fn declared_capacity(self) -> Option<u8> {
        match self {
            ActionType::DevelopFeatures
            | ActionType::OptimizeCode
            | ActionType::PayDownDebt => None,
            ActionType::UpgradeServers
            | ActionType::ResearchAi
            | ActionType::Marketing
            | ActionType::Monetization => Some(2),
            ActionType::HireRecruiter
            | ActionType::GoViral
            | ActionType::IpoPrep
            | ActionType::AcquisitionTarget => Some(1),
        }
    }

    /// Interactive actions open a completion sub-phase in the
    /// immediate-resolution action draft.
    pub fn is_interactive(self) -> bool {
        matches!(self, ActionType::DevelopFeatures | ActionType::OptimizeCode)
    }
}

/// Per-assignment context assembled by the resolver.
#[derive(Debug, Clone, Copy)]
pub struct EffectCtx {
    pub round: u8,
    /// Effective money cost for this action (theme and leader adjusted);
    /// zero for uncosted actions.
    pub cost: u32,
    /// True when this player has not yet paid this action's cost this pass.
    pub charge_due: bool,
    /// True when this player has not yet advanced this action's
    /// production track this pass.
    pub track_due: bool,
    /// Leader passive: optimize-code rating gain doubled.
    pub double_optimize_rating: bool,
    /// Leader passive: marketing MAU gain doubled.
    pub marketing_boost: bool,
    /// This engineer carries the debt-payer trait.
    pub debt_payer: bool,
}

/// What the handler did, reported back to the resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct EffectOutcome {
    /// False when the effect was skipped (unaffordable, below min round).
    pub applied: bool,
    /// Money actually charged (0 when the cost was already paid).
    pub paid: u32,
    /// Marketing resolved — rival-watch leaders react to this.
    pub marketing_used: bool,
}

impl EffectOutcome {
    fn skipped() -> Self {
        EffectOutcome::default()
    }

    fn applied() -> Self {
        EffectOutcome {
            applied: true,
            ..EffectOutcome::default()
        }
    }
}

/// Apply one action's effect to `player` at the given resolved power.
/// Insufficient funds (and any other soft denial) skips silently with
/// `applied == false` and no partial charge.
pub fn apply_effect(
    player: &mut Player,
    action: ActionType,
    power: u32,
    ctx: &EffectCtx,
) -> EffectOutcome {
    if ctx.round < action.min_round() {
        return EffectOutcome::skipped();
    }

    // Charge first, once per player per pass, never partially.
    let mut paid = 0;
    if ctx.cost > 0 && ctx.charge_due {
        if !player.resources.spend(ctx.cost) {
            return EffectOutcome::skipped();
        }
        paid = ctx.cost;
    }

    let mut out = EffectOutcome::applied();
    out.paid = paid;

    match action {
        ActionType::DevelopFeatures => {
            let flat = match player.strategy.map(|s| s.product) {
                Some(ProductStrategy::B2c) => 10,
                _ => 0,
            };
            player.metrics.adjust_mau((power * 20 + flat) as i32);
            if ctx.track_due {
                player.production.advance_mau();
            }
        }
        ActionType::OptimizeCode => {
            debt::pay_down(
                &mut player.debt_buffer,
                &mut player.resources.tech_debt,
                1,
            );
            let gain = if ctx.double_optimize_rating { 2 } else { 1 };
            player.metrics.adjust_rating(gain);
        }
        ActionType::PayDownDebt => {
            let amount = if ctx.debt_payer { 3 } else { 2 };
            debt::pay_down(
                &mut player.debt_buffer,
                &mut player.resources.tech_debt,
                amount,
            );
        }
        ActionType::UpgradeServers => {
            let extra = match player.strategy.map(|s| s.product) {
                Some(ProductStrategy::Platform) => 2,
                _ => 0,
            };
            player.resources.server_capacity += 5 + extra;
            if player.server_grid_level < MAX_SERVER_GRID_LEVEL {
                player.server_grid_level += 1;
                player.code_grid.expand();
            }
        }
        ActionType::ResearchAi => {
            player.resources.ai_capacity += 2;
            if player.ai_research_level < MAX_AI_RESEARCH_LEVEL {
                player.ai_research_level += 1;
            }
        }
        ActionType::Marketing => {
            let mut gain = power * player.metrics.rating as u32;
            if ctx.marketing_boost {
                gain *= 2;
            }
            player.metrics.adjust_mau(gain as i32);
            match player.corporation_style {
                Some(CorporationStyle::Agency) => {
                    // One-shot star bonus, consumed by the next publish.
                    player.marketing_star_bonus = true;
                }
                _ => {
                    if ctx.track_due {
                        player.production.advance_mau();
                    }
                }
            }
            out.marketing_used = true;
        }
        ActionType::Monetization => {
            let per_power = (player.metrics.mau / 100).max(1);
            let mut gain = power * per_power;
            if player.strategy.map(|s| s.product) == Some(ProductStrategy::B2b) {
                gain += power;
            }
            player.metrics.revenue += gain;
            match player.corporation_style {
                Some(CorporationStyle::Agency) => {
                    let stars: u32 = player.published_apps.iter().map(|a| a.stars as u32).sum();
                    player.resources.money += 2 * stars;
                }
                _ => {
                    player.recurring_revenue += power;
                    if ctx.track_due {
                        player.production.advance_revenue();
                    }
                }
            }
        }
        ActionType::HireRecruiter => {
            player.recruiter_pending = true;
        }
        ActionType::GoViral => {
            player.metrics.adjust_mau((150 + 25 * power) as i32);
        }
        ActionType::IpoPrep => {
            player.bonus_score += 5;
        }
        ActionType::AcquisitionTarget => {
            player.bonus_score += player.metrics.rating as u32;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Player;

    fn ctx() -> EffectCtx {
        EffectCtx {
            round: 4,
            cost: 0,
            charge_due: false,
            track_due: true,
            double_optimize_rating: false,
            marketing_boost: false,
            debt_payer: false,
        }
    }

    fn player() -> Player {
        Player::new(0, "Acme".into(), "red".into())
    }

    #[test]
    fn develop_features_scales_with_power() {
        let mut p = player();
        let before = p.metrics.mau;
        let out = apply_effect(&mut p, ActionType::DevelopFeatures, 3, &ctx());
        assert!(out.applied);
        assert_eq!(p.metrics.mau, before + 60);
        assert_eq!(p.production.mau_production, 1);
    }

    #[test]
    fn track_advances_once_per_pass() {
        let mut p = player();
        apply_effect(&mut p, ActionType::DevelopFeatures, 1, &ctx());
        let mut second = ctx();
        second.track_due = false;
        apply_effect(&mut p, ActionType::DevelopFeatures, 1, &second);
        assert_eq!(p.production.mau_production, 1);
    }

    #[test]
    fn unaffordable_cost_skips_without_partial_charge() {
        let mut p = player();
        p.resources.money = 3;
        let mut c = ctx();
        c.cost = 10;
        c.charge_due = true;
        let out = apply_effect(&mut p, ActionType::UpgradeServers, 2, &c);
        assert!(!out.applied);
        assert_eq!(p.resources.money, 3);
        assert_eq!(p.resources.server_capacity, 10);
    }

    #[test]
    fn cost_charged_once_then_effect_still_applies() {
        let mut p = player();
        let mut c = ctx();
        c.cost = 10;
        c.charge_due = true;
        let first = apply_effect(&mut p, ActionType::UpgradeServers, 2, &c);
        assert_eq!(first.paid, 10);
        c.charge_due = false;
        let second = apply_effect(&mut p, ActionType::UpgradeServers, 2, &c);
        assert!(second.applied);
        assert_eq!(second.paid, 0);
        assert_eq!(p.resources.server_capacity, 20);
    }

    #[test]
    fn upgrade_servers_caps_grid_level() {
        let mut p = player();
        for _ in 0..5 {
            apply_effect(&mut p, ActionType::UpgradeServers, 1, &ctx());
        }
        assert_eq!(p.server_grid_level, MAX_SERVER_GRID_LEVEL);
    }

    #[test]
    fn pay_down_debt_prefers_buffer_and_honors_trait() {
        let mut p = player();
        p.resources.tech_debt = 4;
        p.debt_buffer.push(crate::debt::TokenColor::Red);
        let mut c = ctx();
        c.debt_payer = true;
        apply_effect(&mut p, ActionType::PayDownDebt, 1, &c);
        assert!(p.debt_buffer.is_empty());
        assert_eq!(p.resources.tech_debt, 2);
    }

    #[test]
    fn round_gating_skips_late_actions() {
        let mut p = player();
        let mut c = ctx();
        c.round = 1;
        let out = apply_effect(&mut p, ActionType::IpoPrep, 1, &c);
        assert!(!out.applied);
        assert_eq!(p.bonus_score, 0);
    }

    #[test]
    fn marketing_reports_usage_and_branches_by_style() {
        let mut agency = player();
        agency.corporation_style = Some(CorporationStyle::Agency);
        let out = apply_effect(&mut agency, ActionType::Marketing, 2, &ctx());
        assert!(out.marketing_used);
        assert!(agency.marketing_star_bonus);
        assert_eq!(agency.production.mau_production, 0);

        let mut product = player();
        product.corporation_style = Some(CorporationStyle::Product);
        apply_effect(&mut product, ActionType::Marketing, 2, &ctx());
        assert!(!product.marketing_star_bonus);
        assert_eq!(product.production.mau_production, 1);
    }

    #[test]
    fn monetization_agency_earns_from_stars() {
        let mut p = player();
        p.corporation_style = Some(CorporationStyle::Agency);
        p.published_apps.push(crate::player::PublishedApp {
            card_id: 0,
            name: "App".into(),
            stars: 4,
            vp_earned: 4,
        });
        let money = p.resources.money;
        apply_effect(&mut p, ActionType::Monetization, 2, &ctx());
        assert_eq!(p.resources.money, money + 8);
    }
}
