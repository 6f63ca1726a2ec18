//! Engineer model — levels, specialties, traits, and weighted pool rolls.
//!
//! The draft pool generator itself lives in the engine (it owns the RNG);
//! this module supplies the pure weighted-pick math so identical rolls
//! always produce identical engineers.

use serde::{Deserialize, Serialize};

use crate::actions::ActionType;
use crate::EngineerId;

/// Seniority level; the numeric value is the engineer's base power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineerLevel {
    Intern,
    Junior,
    Senior,
}

impl EngineerLevel {
    pub fn base_power(self) -> u32 {
        match self {
            EngineerLevel::Intern => 1,
            EngineerLevel::Junior => 2,
            EngineerLevel::Senior => 4,
        }
    }

    /// Debt tokens generated when this engineer works AI-augmented.
    /// Juniors lean hardest on the assistant.
    pub fn ai_debt_tokens(self) -> u32 {
        match self {
            EngineerLevel::Intern => 1,
            EngineerLevel::Junior => 3,
            EngineerLevel::Senior => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Specialty {
    Frontend,
    Backend,
    Infra,
    DataScience,
    Design,
}

/// Rare flat-modifier traits carried by some pool engineers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineerTrait {
    /// Refuses AI augmentation outright, regardless of the request.
    AiSkeptic,
    /// +1 power once retained for 2+ rounds.
    EquityHungry,
    /// +1 power on the player's last planned action of the pass.
    NightOwl,
    /// Removes one extra unit on the debt pay-down action.
    DebtPayer,
}

/// Premium persona abilities attached to auctioned leader-tier engineers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonaTrait {
    /// +2 on develop-features when the sole engineer assigned there.
    SoloVisionary,
    /// +2 on optimize-code when the sole engineer assigned there.
    CalmUnderFire,
    /// +1 on research-ai and monetization, unconditionally.
    DataOracle,
}

impl PersonaTrait {
    /// Bonus for an assignment; `solo` is true when this engineer is the
    /// only one its owner placed on the action this pass.
    pub fn power_bonus(self, action: ActionType, solo: bool) -> u32 {
        match self {
            PersonaTrait::SoloVisionary if action == ActionType::DevelopFeatures && solo => 2,
            PersonaTrait::CalmUnderFire if action == ActionType::OptimizeCode && solo => 2,
            PersonaTrait::DataOracle
                if matches!(action, ActionType::ResearchAi | ActionType::Monetization) =>
            {
                1
            }
            _ => 0,
        }
    }
}

/// An engineer still sitting in the round's draft pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolEngineer {
    pub name: String,
    pub level: EngineerLevel,
    pub specialty: Specialty,
    pub trait_: Option<EngineerTrait>,
    pub persona_trait: Option<PersonaTrait>,
}

/// An engineer owned by a player. Template fields are immutable after
/// hire; the per-round fields reset or advance at round boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HiredEngineer {
    pub id: EngineerId,
    pub name: String,
    pub level: EngineerLevel,
    pub specialty: Specialty,
    pub trait_: Option<EngineerTrait>,
    pub persona_trait: Option<PersonaTrait>,
    pub assigned_action: Option<ActionType>,
    pub has_ai_augmentation: bool,
    /// Incremented once per round regardless of assignment.
    pub rounds_retained: u8,
}

impl HiredEngineer {
    pub fn from_pool(id: EngineerId, pool: PoolEngineer) -> Self {
        HiredEngineer {
            id,
            name: pool.name,
            level: pool.level,
            specialty: pool.specialty,
            trait_: pool.trait_,
            persona_trait: pool.persona_trait,
            assigned_action: None,
            has_ai_augmentation: false,
            rounds_retained: 0,
        }
    }

    /// The safety-net intern every engineer-less player receives.
    pub fn safety_intern(id: EngineerId) -> Self {
        HiredEngineer {
            id,
            name: "Intern".to_string(),
            level: EngineerLevel::Intern,
            specialty: Specialty::Frontend,
            trait_: None,
            persona_trait: None,
            assigned_action: None,
            has_ai_augmentation: false,
            rounds_retained: 0,
        }
    }
}

/// Level distribution weights for a round, in hundredths.
/// Early rounds are intern/junior heavy; later rounds skew senior.
#[derive(Debug, Clone, Copy)]
pub struct PoolWeights {
    pub intern: u32,
    pub junior: u32,
    pub senior: u32,
}

/// Pick a level from a roll in `0..total_weight`. The roll walks the
/// weights in intern/junior/senior order, so a fixed roll is a fixed pick.
pub fn level_for_roll(weights: PoolWeights, roll: u32) -> EngineerLevel {
    if roll < weights.intern {
        EngineerLevel::Intern
    } else if roll < weights.intern + weights.junior {
        EngineerLevel::Junior
    } else {
        EngineerLevel::Senior
    }
}
