//! Per-round action-slot occupancy.
//!
//! Capacity counts distinct players, not engineers: a player occupies one
//! seat no matter how many of their engineers share the action. Claims
//! that cannot succeed are silent no-ops — callers pre-check availability
//! and a failed claim must never mutate.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::actions::ActionType;
use crate::PlayerId;

/// Effective seat cap: the declared max clamped by the player count,
/// widened by one for a dual-focus leader. `None` stays unlimited.
pub fn effective_capacity(
    declared: Option<u8>,
    player_count: usize,
    dual_focus: bool,
) -> Option<usize> {
    declared.map(|max| {
        let base = (max as usize).min(player_count);
        if dual_focus {
            base + 1
        } else {
            base
        }
    })
}

/// Tracks which players occupy which action this round.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotRegistry {
    occupancy: BTreeMap<ActionType, BTreeSet<PlayerId>>,
}

impl SlotRegistry {
    /// True when the player could claim a seat (or already holds one).
    pub fn is_available(&self, player: PlayerId, action: ActionType, cap: Option<usize>) -> bool {
        let seats = self.occupancy.get(&action);
        if seats.is_some_and(|s| s.contains(&player)) {
            return true;
        }
        match cap {
            None => true,
            Some(max) => seats.map_or(0, |s| s.len()) < max,
        }
    }

    /// Claim a seat. Returns false — with no mutation — when full.
    pub fn claim(&mut self, player: PlayerId, action: ActionType, cap: Option<usize>) -> bool {
        if !self.is_available(player, action, cap) {
            return false;
        }
        self.occupancy.entry(action).or_default().insert(player);
        true
    }

    /// Release the player's seat. Call only when their last engineer
    /// leaves the action.
    pub fn release(&mut self, player: PlayerId, action: ActionType) {
        if let Some(seats) = self.occupancy.get_mut(&action) {
            seats.remove(&player);
            if seats.is_empty() {
                self.occupancy.remove(&action);
            }
        }
    }

    pub fn occupants(&self, action: ActionType) -> Vec<PlayerId> {
        self.occupancy
            .get(&action)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.occupancy.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_clamps_to_player_count() {
        assert_eq!(effective_capacity(Some(4), 2, false), Some(2));
        assert_eq!(effective_capacity(Some(1), 2, true), Some(2));
        assert_eq!(effective_capacity(None, 2, false), None);
    }

    #[test]
    fn claim_blocks_when_full_without_mutation() {
        let mut reg = SlotRegistry::default();
        assert!(reg.claim(0, ActionType::GoViral, Some(1)));
        assert!(!reg.claim(1, ActionType::GoViral, Some(1)));
        assert_eq!(reg.occupants(ActionType::GoViral), vec![0]);
    }

    #[test]
    fn existing_occupant_always_passes() {
        let mut reg = SlotRegistry::default();
        assert!(reg.claim(0, ActionType::Marketing, Some(1)));
        // Same player, second engineer — no new seat needed.
        assert!(reg.claim(0, ActionType::Marketing, Some(1)));
        assert_eq!(reg.occupants(ActionType::Marketing).len(), 1);
    }

    #[test]
    fn dual_focus_widens_one_player_only() {
        let mut reg = SlotRegistry::default();
        assert!(reg.claim(0, ActionType::IpoPrep, Some(1)));
        // Normal player blocked, dual-focus player seated.
        assert!(!reg.claim(1, ActionType::IpoPrep, effective_capacity(Some(1), 3, false)));
        assert!(reg.claim(2, ActionType::IpoPrep, effective_capacity(Some(1), 3, true)));
    }

    #[test]
    fn release_frees_seat() {
        let mut reg = SlotRegistry::default();
        reg.claim(0, ActionType::GoViral, Some(1));
        reg.release(0, ActionType::GoViral);
        assert!(reg.claim(1, ActionType::GoViral, Some(1)));
    }

    #[test]
    fn unlimited_actions_never_block() {
        let mut reg = SlotRegistry::default();
        for p in 0..8 {
            assert!(reg.claim(p, ActionType::DevelopFeatures, None));
        }
    }
}
