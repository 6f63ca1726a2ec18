//! Scoring — milestones and the end-of-game aggregation.
//!
//! Simple arithmetic, but it must be exactly reproducible: every source
//! is integer and the breakdown is returned alongside the total so hosts
//! can display (or re-verify) the math.

use serde::{Deserialize, Serialize};

use crate::company::CorporationStyle;
use crate::player::Player;
use crate::tables;
use crate::PlayerId;

pub type MilestoneId = u8;

/// What a milestone checks, evaluated after every resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MilestoneGoal {
    MauAtLeast(u32),
    RevenueAtLeast(u32),
    RatingAtLeast(u8),
    FiveStarApp,
    CommittedCodeAtLeast(u32),
}

impl MilestoneGoal {
    pub fn reached(&self, player: &Player) -> bool {
        match *self {
            MilestoneGoal::MauAtLeast(n) => player.metrics.mau >= n,
            MilestoneGoal::RevenueAtLeast(n) => player.metrics.revenue >= n,
            MilestoneGoal::RatingAtLeast(n) => player.metrics.rating >= n,
            MilestoneGoal::FiveStarApp => player.published_apps.iter().any(|a| a.stars == 5),
            MilestoneGoal::CommittedCodeAtLeast(n) => player.committed_code >= n,
        }
    }
}

/// A milestone definition plus its claim state. First claim wins and is
/// immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub id: MilestoneId,
    pub name: String,
    pub bonus: u32,
    pub goal: MilestoneGoal,
    pub claimed_by: Option<PlayerId>,
    pub claimed_round: Option<u8>,
}

/// Per-player final score with every source itemized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub app_vp: u32,
    pub mau_threshold_vp: u32,
    pub code_vp: u32,
    pub money_vp: u32,
    pub milestone_vp: u32,
    pub bonus_vp: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.app_vp
            + self.mau_threshold_vp
            + self.code_vp
            + self.money_vp
            + self.milestone_vp
            + self.bonus_vp
    }
}

/// Score one player at game end.
///
/// Agency corporations score their published apps; product corporations
/// score MAU thresholds plus committed code. Both add money conversion,
/// claimed milestones, and accumulated IPO/acquisition bonuses.
pub fn score_player(player: &Player, milestones: &[Milestone]) -> ScoreBreakdown {
    let mut score = ScoreBreakdown {
        money_vp: player.resources.money / 10,
        milestone_vp: milestones
            .iter()
            .filter(|m| m.claimed_by == Some(player.id))
            .map(|m| m.bonus)
            .sum(),
        bonus_vp: player.bonus_score,
        ..ScoreBreakdown::default()
    };
    match player.corporation_style {
        Some(CorporationStyle::Agency) => {
            score.app_vp = player.published_apps.iter().map(|a| a.vp_earned).sum();
        }
        _ => {
            score.mau_threshold_vp = tables::MAU_VP_THRESHOLDS
                .iter()
                .filter(|(threshold, _)| player.metrics.mau >= *threshold)
                .map(|(_, vp)| *vp)
                .sum();
            score.code_vp = player.committed_code / 2;
        }
    }
    score
}

/// Winner: maximum total, ties resolved to the earliest player in the
/// given order (players are passed in id order, so lowest id wins ties).
pub fn winner(scores: &[(PlayerId, ScoreBreakdown)]) -> Option<PlayerId> {
    let mut best: Option<(PlayerId, u32)> = None;
    for (id, breakdown) in scores {
        let total = breakdown.total();
        match best {
            Some((_, top)) if total <= top => {}
            _ => best = Some((*id, total)),
        }
    }
    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PublishedApp;

    fn player(style: CorporationStyle) -> Player {
        let mut p = Player::new(0, "A".into(), "red".into());
        p.corporation_style = Some(style);
        p
    }

    #[test]
    fn agency_scores_published_apps() {
        let mut p = player(CorporationStyle::Agency);
        p.resources.money = 25;
        p.published_apps.push(PublishedApp {
            card_id: 0,
            name: "App".into(),
            stars: 5,
            vp_earned: 6,
        });
        let s = score_player(&p, &[]);
        assert_eq!(s.app_vp, 6);
        assert_eq!(s.money_vp, 2);
        assert_eq!(s.total(), 8);
    }

    #[test]
    fn product_scores_thresholds_and_code() {
        let mut p = player(CorporationStyle::Product);
        p.resources.money = 0;
        p.metrics.mau = 1200;
        p.committed_code = 7;
        let s = score_player(&p, &[]);
        // Thresholds 500 and 1000 reached.
        assert_eq!(s.mau_threshold_vp, 5);
        assert_eq!(s.code_vp, 3);
    }

    #[test]
    fn milestones_count_only_for_claimant() {
        let mut p = player(CorporationStyle::Product);
        p.resources.money = 0;
        p.metrics.mau = 0;
        let milestones = vec![
            Milestone {
                id: 0,
                name: "First".into(),
                bonus: 3,
                goal: MilestoneGoal::MauAtLeast(1),
                claimed_by: Some(0),
                claimed_round: Some(1),
            },
            Milestone {
                id: 1,
                name: "Other".into(),
                bonus: 5,
                goal: MilestoneGoal::MauAtLeast(1),
                claimed_by: Some(1),
                claimed_round: Some(1),
            },
        ];
        let s = score_player(&p, &milestones);
        assert_eq!(s.milestone_vp, 3);
    }

    #[test]
    fn equal_states_score_equal() {
        let a = player(CorporationStyle::Product);
        let b = {
            let mut p = Player::new(1, "B".into(), "blue".into());
            p.corporation_style = Some(CorporationStyle::Product);
            p
        };
        assert_eq!(score_player(&a, &[]).total(), score_player(&b, &[]).total());
    }

    #[test]
    fn ties_go_to_earliest_player() {
        let s = ScoreBreakdown {
            money_vp: 4,
            ..ScoreBreakdown::default()
        };
        assert_eq!(winner(&[(0, s.clone()), (1, s)]), Some(0));
    }
}
