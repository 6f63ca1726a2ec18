//! The power-modifier pipeline.
//!
//! Converts one engineer-to-action assignment into an effective integer
//! power. The order is fixed: base, AI, specialty, traits, leader and
//! persona bonuses, then the tech-debt penalty, clamped at zero. All
//! arithmetic is integer.

use crate::actions::ActionType;
use crate::company::TechStrategy;
use crate::debt::DebtTier;
use crate::engineers::{EngineerTrait, HiredEngineer};
use crate::leaders::Leader;
use crate::tables;

/// Everything outside the engineer that bends its power.
#[derive(Debug, Clone, Copy)]
pub struct PowerContext<'a> {
    pub action: ActionType,
    /// AI augmentation requested for this assignment.
    pub use_ai: bool,
    /// This is the owner's last planned action of the pass.
    pub is_last_planned: bool,
    /// This engineer is the only one its owner placed on the action.
    pub is_sole_on_action: bool,
    pub tech_debt: u32,
    pub tech_strategy: Option<TechStrategy>,
    pub leader: Option<&'a Leader>,
}

/// True when the engineer will actually work AI-augmented: requested and
/// not an AI skeptic (the skeptic trait overrides the request outright).
pub fn ai_applies(engineer: &HiredEngineer, requested: bool) -> bool {
    requested && engineer.trait_ != Some(EngineerTrait::AiSkeptic)
}

/// Effective power for one assignment.
pub fn compute_power(engineer: &HiredEngineer, ctx: &PowerContext) -> u32 {
    let mut power = engineer.level.base_power();

    // 2. AI augmentation.
    if ai_applies(engineer, ctx.use_ai) {
        power += 2;
    }

    // 3. Specialty bonus table.
    power += tables::specialty_bonus(engineer.specialty, ctx.action);

    // 4. Flat trait bonuses, order-insensitive.
    match engineer.trait_ {
        Some(EngineerTrait::EquityHungry) if engineer.rounds_retained >= 2 => power += 1,
        Some(EngineerTrait::NightOwl) if ctx.is_last_planned => power += 1,
        _ => {}
    }

    // 5. Leader and persona abilities.
    if let Some(leader) = ctx.leader {
        power += leader.power_bonus(ctx.action);
    }
    if let Some(persona) = engineer.persona_trait {
        power += persona.power_bonus(ctx.action, ctx.is_sole_on_action);
    }
    if ctx.tech_strategy == Some(TechStrategy::MoveFast)
        && ctx.action == ActionType::DevelopFeatures
    {
        power += 1;
    }

    // 6. Tech-debt penalty — every action except pay-down, clamped at 0.
    if ctx.action != ActionType::PayDownDebt {
        power = power.saturating_sub(DebtTier::from_debt(ctx.tech_debt).power_penalty());
    }

    power
}

/// Debt tokens generated by an AI-augmented assignment. Halved (rounded
/// up) under the ai-first strategy or a debt-halving leader; zeroed when
/// AI does not actually apply.
pub fn ai_debt_tokens(
    engineer: &HiredEngineer,
    requested: bool,
    tech_strategy: Option<TechStrategy>,
    leader_halves: bool,
) -> u32 {
    if !ai_applies(engineer, requested) {
        return 0;
    }
    let base = engineer.level.ai_debt_tokens();
    if tech_strategy == Some(TechStrategy::AiFirst) || leader_halves {
        base.div_ceil(2)
    } else {
        base
    }
}
