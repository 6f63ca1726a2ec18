//! Company identity — strategy triple, corporation style, one-time powers.
//!
//! The strategy triple and corporation style are chosen once during
//! funding selection and are immutable afterwards (pivot being the single
//! sanctioned exception).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Funding choice — shapes the starting position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FundingStrategy {
    /// Lean start, steady hand: +20 money.
    Bootstrapped,
    /// Big war chest: +40 money.
    VcBacked,
    /// Community launch: +10 money, +50 MAU.
    Crowdfunded,
}

impl FundingStrategy {
    pub fn starting_money_bonus(self) -> u32 {
        match self {
            FundingStrategy::Bootstrapped => 20,
            FundingStrategy::VcBacked => 40,
            FundingStrategy::Crowdfunded => 10,
        }
    }

    pub fn starting_mau_bonus(self) -> u32 {
        match self {
            FundingStrategy::Crowdfunded => 50,
            _ => 0,
        }
    }
}

/// Technical posture — modifies AI debt and passive rating growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TechStrategy {
    /// AI debt tokens halved, rounded up.
    AiFirst,
    /// +1 rating at every resolution pass.
    QualityFocused,
    /// +1 power on develop-features.
    MoveFast,
}

/// Product posture — small flat modifiers to the matching actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductStrategy {
    /// +1 revenue per power point on monetization.
    B2b,
    /// +10 flat MAU on develop-features.
    B2c,
    /// +2 extra server capacity on upgrades.
    Platform,
}

/// Immutable-after-selection funding/tech/product triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyChoice {
    pub funding: FundingStrategy,
    pub tech: TechStrategy,
    pub product: ProductStrategy,
}

impl Default for StrategyChoice {
    fn default() -> Self {
        StrategyChoice {
            funding: FundingStrategy::Bootstrapped,
            tech: TechStrategy::QualityFocused,
            product: ProductStrategy::B2c,
        }
    }
}

/// Permanent scoring mode, chosen once per game. Branches several action
/// effects and the final scoring formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorporationStyle {
    Agency,
    Product,
}

/// One-time abilities a player may spend during the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PowerId {
    /// Corporation pivot — switch corporation style once.
    Pivot,
    /// The leader card's one-time power.
    LeaderPower,
    /// Backend specialty's single sprint bug-ignore.
    SprintBugIgnore,
}

/// Tracks which one-time powers have been spent, replacing scattered
/// per-power booleans.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerUseTracker {
    used: BTreeSet<PowerId>,
}

impl PowerUseTracker {
    pub fn is_used(&self, power: PowerId) -> bool {
        self.used.contains(&power)
    }

    /// Mark a power spent. Returns false if it was already spent.
    pub fn spend(&mut self, power: PowerId) -> bool {
        self.used.insert(power)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_spends_exactly_once() {
        let mut t = PowerUseTracker::default();
        assert!(!t.is_used(PowerId::Pivot));
        assert!(t.spend(PowerId::Pivot));
        assert!(t.is_used(PowerId::Pivot));
        assert!(!t.spend(PowerId::Pivot));
    }

    #[test]
    fn funding_bonuses() {
        assert_eq!(FundingStrategy::VcBacked.starting_money_bonus(), 40);
        assert_eq!(FundingStrategy::Crowdfunded.starting_mau_bonus(), 50);
        assert_eq!(FundingStrategy::Bootstrapped.starting_mau_bonus(), 0);
    }
}
