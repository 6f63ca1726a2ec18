//! The full per-player record and its invariant helpers.

use serde::{Deserialize, Serialize};

use crate::actions::ActionType;
use crate::company::{CorporationStyle, PowerUseTracker, StrategyChoice};
use crate::debt::TechDebtBuffer;
use crate::engineers::HiredEngineer;
use crate::grid::{AppCardId, CodeGrid};
use crate::leaders::LeaderId;
use crate::resources::{Metrics, ProductionTracks, Resources};
use crate::{EngineerId, PlayerId};

/// One engineer-to-action assignment, cleared at each resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedAction {
    pub engineer_id: EngineerId,
    pub action: ActionType,
    pub use_ai_augmentation: bool,
}

/// A published app, scored at game end for agency corporations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedApp {
    pub card_id: AppCardId,
    pub name: String,
    pub stars: u8,
    pub vp_earned: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: String,
    pub resources: Resources,
    pub metrics: Metrics,
    pub production: ProductionTracks,
    pub engineers: Vec<HiredEngineer>,
    pub planned_actions: Vec<PlannedAction>,
    pub debt_buffer: TechDebtBuffer,
    pub code_grid: CodeGrid,
    pub held_app_cards: Vec<AppCardId>,
    pub published_apps: Vec<PublishedApp>,
    pub leader: Option<LeaderId>,
    pub strategy: Option<StrategyChoice>,
    pub corporation_style: Option<CorporationStyle>,
    pub powers: PowerUseTracker,
    /// One-shot star bonus from agency marketing, consumed on next publish.
    pub marketing_star_bonus: bool,
    /// Product-style recurring revenue, paid as money at round end.
    pub recurring_revenue: u32,
    /// Extra engineer owed at next draft from hire-recruiter.
    pub recruiter_pending: bool,
    /// Accumulated IPO / acquisition score bonus.
    pub bonus_score: u32,
    /// Code tokens committed over the whole game (product scoring).
    pub committed_code: u32,
    pub server_grid_level: u8,
    pub ai_research_level: u8,
}

impl Player {
    pub fn new(id: PlayerId, name: String, color: String) -> Self {
        Player {
            id,
            name,
            color,
            resources: Resources::default(),
            metrics: Metrics::default(),
            production: ProductionTracks::default(),
            engineers: Vec::new(),
            planned_actions: Vec::new(),
            debt_buffer: TechDebtBuffer::default(),
            code_grid: CodeGrid::default(),
            held_app_cards: Vec::new(),
            published_apps: Vec::new(),
            leader: None,
            strategy: None,
            corporation_style: None,
            powers: PowerUseTracker::default(),
            marketing_star_bonus: false,
            recurring_revenue: 0,
            recruiter_pending: false,
            bonus_score: 0,
            committed_code: 0,
            server_grid_level: 0,
            ai_research_level: 0,
        }
    }

    pub fn engineer(&self, id: EngineerId) -> Option<&HiredEngineer> {
        self.engineers.iter().find(|e| e.id == id)
    }

    pub fn engineer_mut(&mut self, id: EngineerId) -> Option<&mut HiredEngineer> {
        self.engineers.iter_mut().find(|e| e.id == id)
    }

    /// Engineers this player planned onto a given action.
    pub fn planned_on(&self, action: ActionType) -> usize {
        self.planned_actions
            .iter()
            .filter(|p| p.action == action)
            .count()
    }

    /// True when the plan at `index` is the player's last of the pass
    /// (insertion order — the night-owl bonus condition).
    pub fn is_last_planned(&self, index: usize) -> bool {
        index + 1 == self.planned_actions.len()
    }

    /// Trailing victory points: published-app VP plus production tracks.
    pub fn trailing_vp(&self) -> u32 {
        let app_vp: u32 = self.published_apps.iter().map(|a| a.vp_earned).sum();
        app_vp + self.production.vp_value()
    }

    /// Sum of stars across published apps.
    pub fn total_stars(&self) -> u32 {
        self.published_apps.iter().map(|a| a.stars as u32).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engineers::{EngineerLevel, Specialty};

    fn eng(id: u32) -> HiredEngineer {
        HiredEngineer {
            id,
            name: "E".into(),
            level: EngineerLevel::Junior,
            specialty: Specialty::Backend,
            trait_: None,
            persona_trait: None,
            assigned_action: None,
            has_ai_augmentation: false,
            rounds_retained: 0,
        }
    }

    #[test]
    fn lookup_by_id() {
        let mut p = Player::new(0, "A".into(), "red".into());
        p.engineers.push(eng(7));
        assert!(p.engineer(7).is_some());
        assert!(p.engineer(8).is_none());
    }

    #[test]
    fn last_planned_is_insertion_order() {
        let mut p = Player::new(0, "A".into(), "red".into());
        p.planned_actions.push(PlannedAction {
            engineer_id: 1,
            action: ActionType::DevelopFeatures,
            use_ai_augmentation: false,
        });
        p.planned_actions.push(PlannedAction {
            engineer_id: 2,
            action: ActionType::Marketing,
            use_ai_augmentation: false,
        });
        assert!(!p.is_last_planned(0));
        assert!(p.is_last_planned(1));
    }

    #[test]
    fn trailing_vp_sums_apps_and_tracks() {
        let mut p = Player::new(0, "A".into(), "red".into());
        p.published_apps.push(PublishedApp {
            card_id: 0,
            name: "App".into(),
            stars: 3,
            vp_earned: 4,
        });
        p.production.advance_mau();
        p.production.advance_revenue();
        assert_eq!(p.trailing_vp(), 6);
    }
}
