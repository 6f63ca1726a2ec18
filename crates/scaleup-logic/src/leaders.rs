//! Leader catalog — named personas with a passive ability and a one-time
//! power. Each player may select at most one leader, during the leader
//! draft at game start.

use serde::{Deserialize, Serialize};

use crate::actions::ActionType;

pub type LeaderId = u8;

/// Always-on leader ability, checked wherever the rule it bends applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaderPassive {
    /// Flat money at every round end.
    FlatIncome(u32),
    /// Optimize-code rating gain is doubled.
    DoubleOptimizeRating,
    /// Marketing costs 20 instead of 10 but its MAU gain is doubled.
    MarketingBoost,
    /// +1 seat on one exclusive action for this player only.
    DualFocus(ActionType),
    /// AI debt tokens halved, rounded up.
    HalveAiDebt,
    /// Rating never ends a pass below the floor.
    RatingFloor(u8),
    /// +5 MAU whenever another player resolves marketing this pass.
    RivalMarketingWatch,
}

/// One-shot ability spent at most once per game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaderPower {
    ClearDebtBuffer,
    FlashCampaign(u32),
    FreeServerUpgrade,
    BoostAiCapacity(u32),
    CashInjection(u32),
}

/// Lives in the fixed catalog; players reference leaders by id.
#[derive(Debug, Clone)]
pub struct Leader {
    pub id: LeaderId,
    pub name: &'static str,
    pub passive: LeaderPassive,
    pub power: LeaderPower,
    /// Extra power granted on one action, applied in the modifier pipeline.
    pub favored_action: Option<(ActionType, u32)>,
}

impl Leader {
    pub fn power_bonus(&self, action: ActionType) -> u32 {
        match self.favored_action {
            Some((favored, bonus)) if favored == action => bonus,
            _ => 0,
        }
    }
}
