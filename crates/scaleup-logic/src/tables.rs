//! Fixed rule data — the tables the core reads as configuration.
//!
//! Everything here is deterministic given its inputs. The engine shuffles
//! decks and rolls pools; this module only says what exists.

use crate::actions::ActionType;
use crate::debt::TokenColor;
use crate::engineers::{EngineerTrait, PersonaTrait, PoolEngineer, PoolWeights, Specialty};
use crate::engineers::EngineerLevel;
use crate::events::{Condition, ConditionKind, EventEffect, GameEvent, StatField};
use crate::grid::AppCard;
use crate::leaders::{Leader, LeaderPassive, LeaderPower};
use crate::scoring::{Milestone, MilestoneGoal};
use crate::sprint;

// ============================================================================
// ENGINEER POOL
// ============================================================================

/// Level weights by round, in hundredths. Early rounds skew junior;
/// the last rounds skew senior.
pub fn pool_weights(round: u8) -> PoolWeights {
    match round {
        1 => PoolWeights { intern: 40, junior: 45, senior: 15 },
        2 => PoolWeights { intern: 25, junior: 50, senior: 25 },
        3 => PoolWeights { intern: 15, junior: 45, senior: 40 },
        _ => PoolWeights { intern: 10, junior: 35, senior: 55 },
    }
}

pub const POOL_SPECIALTIES: [Specialty; 5] = [
    Specialty::Frontend,
    Specialty::Backend,
    Specialty::Infra,
    Specialty::DataScience,
    Specialty::Design,
];

pub const POOL_TRAITS: [EngineerTrait; 4] = [
    EngineerTrait::AiSkeptic,
    EngineerTrait::EquityHungry,
    EngineerTrait::NightOwl,
    EngineerTrait::DebtPayer,
];

/// Engineers dealt into the pool: player count + 2.
pub fn pool_size(player_count: usize) -> usize {
    player_count + 2
}

pub const ENGINEER_NAMES: [&str; 16] = [
    "Ada", "Grace", "Linus", "Dennis", "Barbara", "Ken", "Margaret", "Donald",
    "Radia", "Bjarne", "Frances", "Guido", "Katherine", "Anders", "Hedy", "Yukihiro",
];

// ============================================================================
// SPECIALTY BONUS TABLE
// ============================================================================

/// +1 when the specialty matches the action, 0 otherwise.
pub fn specialty_bonus(specialty: Specialty, action: ActionType) -> u32 {
    let matches = match specialty {
        Specialty::Frontend => {
            matches!(action, ActionType::DevelopFeatures | ActionType::Marketing)
        }
        Specialty::Backend => {
            matches!(action, ActionType::OptimizeCode | ActionType::PayDownDebt)
        }
        Specialty::Infra => {
            matches!(action, ActionType::UpgradeServers | ActionType::IpoPrep)
        }
        Specialty::DataScience => {
            matches!(action, ActionType::ResearchAi | ActionType::Monetization)
        }
        Specialty::Design => {
            matches!(action, ActionType::DevelopFeatures | ActionType::Marketing)
        }
    };
    if matches {
        1
    } else {
        0
    }
}

// ============================================================================
// QUARTERLY THEMES
// ============================================================================

/// Theme card dealt per quarter, bending a cost or allowance that round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum QuarterTheme {
    /// Marketing costs half.
    HypeCycle,
    /// Server upgrades cost 5.
    CheapCompute,
    /// Recruiters cost 10 more.
    TalentWar,
    /// Sprint draw allowances +1.
    Crunch,
    /// AI research costs 10.
    AiSummer,
    /// Every costed action costs 5 more.
    DownRound,
}

pub const THEME_DECK: [QuarterTheme; 6] = [
    QuarterTheme::HypeCycle,
    QuarterTheme::CheapCompute,
    QuarterTheme::TalentWar,
    QuarterTheme::Crunch,
    QuarterTheme::AiSummer,
    QuarterTheme::DownRound,
];

/// Effective money cost of an action under the active theme.
/// `marketing_boost` is the leader passive that upgrades marketing to the
/// 20-cost doubled-gain campaign.
pub fn action_cost(action: ActionType, theme: QuarterTheme, marketing_boost: bool) -> u32 {
    let base = match action {
        ActionType::UpgradeServers => {
            if theme == QuarterTheme::CheapCompute {
                5
            } else {
                10
            }
        }
        ActionType::ResearchAi => {
            if theme == QuarterTheme::AiSummer {
                10
            } else {
                15
            }
        }
        ActionType::Marketing => {
            let cost = if marketing_boost { 20 } else { 10 };
            if theme == QuarterTheme::HypeCycle {
                cost / 2
            } else {
                cost
            }
        }
        ActionType::HireRecruiter => {
            if theme == QuarterTheme::TalentWar {
                30
            } else {
                20
            }
        }
        ActionType::GoViral => 25,
        ActionType::IpoPrep | ActionType::AcquisitionTarget => 30,
        _ => 0,
    };
    if base > 0 && theme == QuarterTheme::DownRound {
        base + 5
    } else {
        base
    }
}

/// Sprint draw allowance adjustment from the theme.
pub fn sprint_draw_bonus(theme: QuarterTheme) -> u8 {
    if theme == QuarterTheme::Crunch {
        1
    } else {
        0
    }
}

// ============================================================================
// LEADERS
// ============================================================================

pub fn leader_catalog() -> Vec<Leader> {
    vec![
        Leader {
            id: 0,
            name: "The Visionary",
            passive: LeaderPassive::FlatIncome(5),
            power: LeaderPower::FlashCampaign(100),
            favored_action: Some((ActionType::DevelopFeatures, 1)),
        },
        Leader {
            id: 1,
            name: "The Craftsman",
            passive: LeaderPassive::DoubleOptimizeRating,
            power: LeaderPower::ClearDebtBuffer,
            favored_action: Some((ActionType::OptimizeCode, 1)),
        },
        Leader {
            id: 2,
            name: "The Growth Hacker",
            passive: LeaderPassive::MarketingBoost,
            power: LeaderPower::FlashCampaign(150),
            favored_action: Some((ActionType::Marketing, 1)),
        },
        Leader {
            id: 3,
            name: "The Ops Guru",
            passive: LeaderPassive::DualFocus(ActionType::UpgradeServers),
            power: LeaderPower::FreeServerUpgrade,
            favored_action: Some((ActionType::UpgradeServers, 1)),
        },
        Leader {
            id: 4,
            name: "The AI Evangelist",
            passive: LeaderPassive::HalveAiDebt,
            power: LeaderPower::BoostAiCapacity(2),
            favored_action: Some((ActionType::ResearchAi, 1)),
        },
        Leader {
            id: 5,
            name: "The Frugal Founder",
            passive: LeaderPassive::RatingFloor(4),
            power: LeaderPower::CashInjection(20),
            favored_action: None,
        },
        Leader {
            id: 6,
            name: "The Street Fighter",
            passive: LeaderPassive::RivalMarketingWatch,
            power: LeaderPower::CashInjection(15),
            favored_action: Some((ActionType::Monetization, 1)),
        },
    ]
}

pub fn leader(id: u8) -> Option<Leader> {
    leader_catalog().into_iter().find(|l| l.id == id)
}

// ============================================================================
// PERSONA CARDS
// ============================================================================

/// Premium engineers sold at ascending auction from quarter 2 onward.
pub fn persona_catalog() -> Vec<PoolEngineer> {
    vec![
        PoolEngineer {
            name: "The 10x Architect".to_string(),
            level: EngineerLevel::Senior,
            specialty: Specialty::Frontend,
            trait_: None,
            persona_trait: Some(PersonaTrait::SoloVisionary),
        },
        PoolEngineer {
            name: "The Firefighter".to_string(),
            level: EngineerLevel::Senior,
            specialty: Specialty::Backend,
            trait_: None,
            persona_trait: Some(PersonaTrait::CalmUnderFire),
        },
        PoolEngineer {
            name: "The Data Oracle".to_string(),
            level: EngineerLevel::Senior,
            specialty: Specialty::DataScience,
            trait_: None,
            persona_trait: Some(PersonaTrait::DataOracle),
        },
    ]
}

// ============================================================================
// EVENTS
// ============================================================================

pub fn event_deck() -> Vec<GameEvent> {
    vec![
        GameEvent {
            id: 0,
            name: "Server Outage",
            effects: vec![EventEffect::MauDelta(-100)],
            mitigation: Some(Condition {
                field: StatField::ServerCapacity,
                kind: ConditionKind::GreaterThan,
                threshold: 20,
            }),
        },
        GameEvent {
            id: 1,
            name: "Data Breach",
            effects: vec![EventEffect::RatingDelta(-2), EventEffect::MoneyDelta(-10)],
            mitigation: Some(Condition {
                field: StatField::Rating,
                kind: ConditionKind::AtLeast,
                threshold: 7,
            }),
        },
        GameEvent {
            id: 2,
            name: "Viral Tweet",
            effects: vec![EventEffect::MauDelta(100)],
            mitigation: None,
        },
        GameEvent {
            id: 3,
            name: "Talent Poaching",
            effects: vec![EventEffect::MoneyDelta(-15)],
            mitigation: Some(Condition {
                field: StatField::Money,
                kind: ConditionKind::AtLeast,
                threshold: 60,
            }),
        },
        GameEvent {
            id: 4,
            name: "AI Winter",
            effects: vec![EventEffect::AiCapacityDelta(-1)],
            mitigation: None,
        },
        GameEvent {
            id: 5,
            name: "Regulatory Audit",
            effects: vec![EventEffect::MoneyDelta(-15)],
            mitigation: Some(Condition {
                field: StatField::TechDebt,
                kind: ConditionKind::LessThan,
                threshold: 4,
            }),
        },
        GameEvent {
            id: 6,
            name: "Funding Boom",
            effects: vec![EventEffect::MoneyDelta(15)],
            mitigation: None,
        },
        GameEvent {
            id: 7,
            name: "Legacy Integration",
            effects: vec![EventEffect::DebtTokens(2, TokenColor::Red)],
            mitigation: Some(Condition {
                field: StatField::Rating,
                kind: ConditionKind::AtLeast,
                threshold: 8,
            }),
        },
    ]
}

// ============================================================================
// APP CARDS
// ============================================================================

pub fn app_catalog() -> Vec<AppCard> {
    use TokenColor::*;
    vec![
        AppCard { id: 0, name: "Todo Tracker", pattern: vec![Red, Green], max_vp: 3 },
        AppCard { id: 1, name: "Photo Feed", pattern: vec![Blue, Blue, Yellow], max_vp: 4 },
        AppCard { id: 2, name: "Chat Widget", pattern: vec![Green, Green, Red], max_vp: 4 },
        AppCard { id: 3, name: "Fit Coach", pattern: vec![Red, Blue, Yellow, Green], max_vp: 6 },
        AppCard { id: 4, name: "Budget Buddy", pattern: vec![Yellow, Yellow, Blue], max_vp: 5 },
        AppCard { id: 5, name: "Maps Overlay", pattern: vec![Blue, Green, Green, Blue], max_vp: 6 },
        AppCard { id: 6, name: "Game Portal", pattern: vec![Red, Red, Yellow, Blue, Green], max_vp: 8 },
        AppCard { id: 7, name: "News Digest", pattern: vec![Green, Yellow], max_vp: 3 },
    ]
}

/// Code token colors cycled into the shared pool.
pub const CODE_POOL_COLORS: [TokenColor; 4] = [
    TokenColor::Red,
    TokenColor::Green,
    TokenColor::Blue,
    TokenColor::Yellow,
];

// ============================================================================
// MILESTONES & SCORING
// ============================================================================

pub fn milestone_catalog() -> Vec<Milestone> {
    vec![
        Milestone {
            id: 0,
            name: "Product Hunt Launch".to_string(),
            bonus: 2,
            goal: MilestoneGoal::MauAtLeast(500),
            claimed_by: None,
            claimed_round: None,
        },
        Milestone {
            id: 1,
            name: "First Thousand Users".to_string(),
            bonus: 3,
            goal: MilestoneGoal::MauAtLeast(1000),
            claimed_by: None,
            claimed_round: None,
        },
        Milestone {
            id: 2,
            name: "Revenue Positive".to_string(),
            bonus: 2,
            goal: MilestoneGoal::RevenueAtLeast(50),
            claimed_by: None,
            claimed_round: None,
        },
        Milestone {
            id: 3,
            name: "Editor's Choice".to_string(),
            bonus: 3,
            goal: MilestoneGoal::FiveStarApp,
            claimed_by: None,
            claimed_round: None,
        },
        Milestone {
            id: 4,
            name: "Shipping Machine".to_string(),
            bonus: 2,
            goal: MilestoneGoal::CommittedCodeAtLeast(8),
            claimed_by: None,
            claimed_round: None,
        },
    ]
}

/// Product-style MAU threshold VP at game end.
pub const MAU_VP_THRESHOLDS: [(u32, u32); 4] = [(500, 2), (1000, 3), (2500, 4), (5000, 5)];

// ============================================================================
// SPRINT
// ============================================================================

pub fn sprint_bag() -> Vec<sprint::SprintToken> {
    sprint::bag_composition()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_weights_sum_to_hundred() {
        for round in 1..=4 {
            let w = pool_weights(round);
            assert_eq!(w.intern + w.junior + w.senior, 100);
        }
    }

    #[test]
    fn specialty_bonus_is_zero_or_one() {
        for specialty in POOL_SPECIALTIES {
            for action in ActionType::ALL {
                assert!(specialty_bonus(specialty, action) <= 1);
            }
        }
    }

    #[test]
    fn theme_bends_costs() {
        assert_eq!(action_cost(ActionType::UpgradeServers, QuarterTheme::Crunch, false), 10);
        assert_eq!(action_cost(ActionType::UpgradeServers, QuarterTheme::CheapCompute, false), 5);
        assert_eq!(action_cost(ActionType::Marketing, QuarterTheme::Crunch, false), 10);
        assert_eq!(action_cost(ActionType::Marketing, QuarterTheme::Crunch, true), 20);
        assert_eq!(action_cost(ActionType::Marketing, QuarterTheme::HypeCycle, false), 5);
        assert_eq!(action_cost(ActionType::GoViral, QuarterTheme::DownRound, false), 30);
        assert_eq!(action_cost(ActionType::DevelopFeatures, QuarterTheme::DownRound, false), 0);
    }

    #[test]
    fn catalogs_have_unique_ids() {
        let leaders = leader_catalog();
        let mut ids: Vec<_> = leaders.iter().map(|l| l.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), leaders.len());

        let apps = app_catalog();
        let mut app_ids: Vec<_> = apps.iter().map(|a| a.id).collect();
        app_ids.dedup();
        assert_eq!(app_ids.len(), apps.len());

        let events = event_deck();
        let mut event_ids: Vec<_> = events.iter().map(|e| e.id).collect();
        event_ids.dedup();
        assert_eq!(event_ids.len(), events.len());
    }

    #[test]
    fn lookup_leader_by_id() {
        assert!(leader(0).is_some());
        assert!(leader(200).is_none());
    }
}
