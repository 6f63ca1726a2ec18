//! Sprint mini-game — push-your-luck bag draws.
//!
//! A shared token bag is drawn without replacement. A run ends when the
//! player stops, crashes (3+ accumulated bug weight, critical bugs count
//! double), or exhausts their draw allowance. Crashing zeroes the clean
//! total for scoring but keeps the bug bookkeeping.

use serde::{Deserialize, Serialize};

use crate::constants::{SPRINT_CRASH_WEIGHT, SPRINT_WINNER_RATING_BONUS};
use crate::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SprintToken {
    /// Clean code worth 1 or 2.
    Clean(u8),
    Bug,
    CriticalBug,
}

impl SprintToken {
    pub fn bug_weight(self) -> u8 {
        match self {
            SprintToken::Clean(_) => 0,
            SprintToken::Bug => 1,
            SprintToken::CriticalBug => 2,
        }
    }
}

/// Draw allowance by engineers assigned to optimize-code.
/// Non-participants get exactly one free draw.
pub fn max_draws(optimize_engineers: usize) -> u8 {
    match optimize_engineers {
        0 => 1,
        1 => 5,
        2 => 7,
        _ => 9,
    }
}

/// One player's run through the bag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SprintRun {
    pub player: PlayerId,
    pub max_draws: u8,
    pub draws_taken: u8,
    pub clean_total: u32,
    pub bug_weight: u8,
    pub crashed: bool,
    pub stopped: bool,
    /// Backend specialty's single per-game bug-ignore, if unspent.
    pub bug_ignore_available: bool,
    pub bug_ignore_spent: bool,
}

impl SprintRun {
    pub fn new(player: PlayerId, max_draws: u8, bug_ignore_available: bool) -> Self {
        SprintRun {
            player,
            max_draws,
            draws_taken: 0,
            clean_total: 0,
            bug_weight: 0,
            crashed: false,
            stopped: false,
            bug_ignore_available,
            bug_ignore_spent: false,
        }
    }

    pub fn is_done(&self) -> bool {
        self.crashed || self.stopped || self.draws_taken >= self.max_draws
    }

    /// Apply one drawn token. The bug-ignore, when available, absorbs the
    /// first bug-weight-bearing token entirely.
    pub fn apply_draw(&mut self, token: SprintToken) {
        if self.is_done() {
            return;
        }
        self.draws_taken += 1;
        match token {
            SprintToken::Clean(value) => self.clean_total += value as u32,
            bug => {
                if self.bug_ignore_available && !self.bug_ignore_spent {
                    self.bug_ignore_spent = true;
                } else {
                    self.bug_weight += bug.bug_weight();
                    if self.bug_weight >= SPRINT_CRASH_WEIGHT {
                        self.crashed = true;
                    }
                }
            }
        }
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Clean total counted at settlement — zero after a crash.
    pub fn scored_total(&self) -> u32 {
        if self.crashed {
            0
        } else {
            self.clean_total
        }
    }
}

/// Settlement of a completed sprint.
#[derive(Debug, Clone, Default)]
pub struct SprintSettlement {
    /// Winner of the flat rating bonus, if any run scored above zero.
    pub rating_winner: Option<PlayerId>,
    pub rating_bonus: u8,
    /// Per-player debt reduction: 1:1 with non-crashed clean totals.
    pub debt_reduction: Vec<(PlayerId, u32)>,
}

/// Settle all runs: single highest non-crashed total takes the rating
/// bonus (ties go to the earlier run in table order); every non-crashed
/// total converts 1:1 into debt reduction.
pub fn settle(runs: &[SprintRun]) -> SprintSettlement {
    let mut settlement = SprintSettlement::default();
    let mut best: Option<(PlayerId, u32)> = None;
    for run in runs {
        let total = run.scored_total();
        if total > 0 {
            settlement.debt_reduction.push((run.player, total));
            if best.map_or(true, |(_, b)| total > b) {
                best = Some((run.player, total));
            }
        }
    }
    if let Some((player, _)) = best {
        settlement.rating_winner = Some(player);
        settlement.rating_bonus = SPRINT_WINNER_RATING_BONUS;
    }
    settlement
}

/// Fixed bag composition: majority clean tokens of two values, a minority
/// of bugs, and a single critical bug.
pub fn bag_composition() -> Vec<SprintToken> {
    let mut bag = vec![SprintToken::Clean(1); 5];
    bag.extend(vec![SprintToken::Clean(2); 3]);
    bag.extend(vec![SprintToken::Bug; 3]);
    bag.push(SprintToken::CriticalBug);
    bag
}
