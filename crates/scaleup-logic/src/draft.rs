//! Draft algorithms — sealed-bid resolution, the ascending persona
//! auction, and snake pick ordering.
//!
//! The lowest-ranked player always acts first: both orderings here are
//! keyed on a trailing metric recomputed fresh at the start of every
//! draft. That is the game's comeback mechanic, so nothing in this module
//! may cache a stale ranking.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::PlayerId;

// ============================================================================
// SEALED-BID SIMULTANEOUS AUCTION
// ============================================================================

/// One sealed bid on a pool engineer. `sequence` is the submission order,
/// used as the tie-break.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealedBid {
    pub player: PlayerId,
    pub engineer_index: usize,
    pub amount: u32,
    pub sequence: u32,
}

/// An awarded engineer from sealed-bid resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftAward {
    pub player: PlayerId,
    pub engineer_index: usize,
    pub price: u32,
}

/// Resolve all sealed bids at once.
///
/// Engineers are processed in descending order of their highest received
/// bid. Each goes to the highest bidder who has not already won this
/// round and can still afford the bid (earlier awards reduce available
/// funds); ties break by earliest submission.
pub fn resolve_sealed_bids(
    pool_len: usize,
    bids: &[SealedBid],
    funds: &BTreeMap<PlayerId, u32>,
) -> Vec<DraftAward> {
    // Group bids per engineer, best-first.
    let mut per_engineer: Vec<Vec<&SealedBid>> = vec![Vec::new(); pool_len];
    for bid in bids {
        if bid.engineer_index < pool_len {
            per_engineer[bid.engineer_index].push(bid);
        }
    }
    for group in per_engineer.iter_mut() {
        group.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.sequence.cmp(&b.sequence)));
    }

    // Engineer processing order: descending top bid, tie by earliest
    // submission of that top bid for determinism.
    let mut order: Vec<usize> = (0..pool_len)
        .filter(|&i| !per_engineer[i].is_empty())
        .collect();
    order.sort_by(|&a, &b| {
        let (ba, bb) = (per_engineer[a][0], per_engineer[b][0]);
        bb.amount.cmp(&ba.amount).then(ba.sequence.cmp(&bb.sequence))
    });

    let mut remaining: BTreeMap<PlayerId, u32> = funds.clone();
    let mut winners: BTreeSet<PlayerId> = BTreeSet::new();
    let mut awards = Vec::new();

    for engineer_index in order {
        for bid in &per_engineer[engineer_index] {
            if winners.contains(&bid.player) {
                continue;
            }
            let money = remaining.get(&bid.player).copied().unwrap_or(0);
            if money < bid.amount {
                continue;
            }
            remaining.insert(bid.player, money - bid.amount);
            winners.insert(bid.player);
            awards.push(DraftAward {
                player: bid.player,
                engineer_index,
                price: bid.amount,
            });
            break;
        }
    }

    awards
}

// ============================================================================
// SNAKE PICK ORDER
// ============================================================================

/// Build a snake pick order over `picks` total picks.
///
/// Players are sorted ascending by their trailing metric (ties by id),
/// then the forward lap and the reversed lap alternate until the pick
/// count is covered.
pub fn build_snake_order(ranked: &[(PlayerId, u64)], picks: usize) -> Vec<PlayerId> {
    if ranked.is_empty() || picks == 0 {
        return Vec::new();
    }
    let mut sorted: Vec<(PlayerId, u64)> = ranked.to_vec();
    sorted.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
    let forward: Vec<PlayerId> = sorted.iter().map(|(id, _)| *id).collect();
    let backward: Vec<PlayerId> = forward.iter().rev().copied().collect();

    let mut order = Vec::with_capacity(picks);
    let mut lap = 0;
    while order.len() < picks {
        let source = if lap % 2 == 0 { &forward } else { &backward };
        for id in source {
            if order.len() == picks {
                break;
            }
            order.push(*id);
        }
        lap += 1;
    }
    order
}

// ============================================================================
// ASCENDING SINGLE-LOT AUCTION
// ============================================================================

use crate::constants::{MIN_PERSONA_BID, PERSONA_BID_STEP};

/// Result of one auction move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuctionStep {
    Continue,
    Won { player: PlayerId, price: u32 },
    Unclaimed,
}

/// Ascending single-lot auction over one persona card.
///
/// Bid order is ascending trailing MAU (supplied by the caller as
/// `order`). A player passes or raises; the auction completes when at
/// most one active bidder remains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AscendingAuction {
    pub order: Vec<PlayerId>,
    turn: usize,
    pub current_bid: Option<(PlayerId, u32)>,
    passed: BTreeSet<PlayerId>,
}

impl AscendingAuction {
    pub fn new(order: Vec<PlayerId>) -> Self {
        AscendingAuction {
            order,
            turn: 0,
            current_bid: None,
            passed: BTreeSet::new(),
        }
    }

    /// The player whose turn it is, skipping passed players.
    pub fn current_bidder(&self) -> Option<PlayerId> {
        if self.active_count() == 0 {
            return None;
        }
        let n = self.order.len();
        (0..n)
            .map(|i| self.order[(self.turn + i) % n])
            .find(|p| !self.passed.contains(p))
    }

    /// Minimum legal raise: `max(15, current + 5)`.
    pub fn min_bid(&self) -> u32 {
        match self.current_bid {
            Some((_, amount)) => MIN_PERSONA_BID.max(amount + PERSONA_BID_STEP),
            None => MIN_PERSONA_BID,
        }
    }

    fn active_count(&self) -> usize {
        self.order
            .iter()
            .filter(|p| !self.passed.contains(p))
            .count()
    }

    fn advance_turn(&mut self) {
        let n = self.order.len();
        for i in 1..=n {
            let idx = (self.turn + i) % n;
            if !self.passed.contains(&self.order[idx]) {
                self.turn = idx;
                return;
            }
        }
    }

    fn completion(&self) -> Option<AuctionStep> {
        if self.active_count() > 1 {
            return None;
        }
        match self.current_bid {
            Some((player, price)) if !self.passed.contains(&player) => {
                Some(AuctionStep::Won { player, price })
            }
            _ => Some(AuctionStep::Unclaimed),
        }
    }

    /// Place a raise. `None` means the move was rejected (wrong turn or
    /// below the minimum) and nothing changed.
    pub fn bid(&mut self, player: PlayerId, amount: u32) -> Option<AuctionStep> {
        if self.current_bidder() != Some(player) || amount < self.min_bid() {
            return None;
        }
        self.current_bid = Some((player, amount));
        self.advance_turn();
        Some(self.completion().unwrap_or(AuctionStep::Continue))
    }

    /// Pass. `None` means it was not this player's turn.
    pub fn pass(&mut self, player: PlayerId) -> Option<AuctionStep> {
        if self.current_bidder() != Some(player) {
            return None;
        }
        self.passed.insert(player);
        self.advance_turn();
        Some(self.completion().unwrap_or(AuctionStep::Continue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn funds(pairs: &[(PlayerId, u32)]) -> BTreeMap<PlayerId, u32> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn sealed_bids_award_highest_affordable() {
        let bids = vec![
            SealedBid { player: 0, engineer_index: 0, amount: 10, sequence: 0 },
            SealedBid { player: 1, engineer_index: 0, amount: 12, sequence: 1 },
        ];
        let awards = resolve_sealed_bids(1, &bids, &funds(&[(0, 50), (1, 50)]));
        assert_eq!(awards.len(), 1);
        assert_eq!(awards[0].player, 1);
        assert_eq!(awards[0].price, 12);
    }

    #[test]
    fn sealed_bids_one_win_per_player() {
        let bids = vec![
            SealedBid { player: 0, engineer_index: 0, amount: 20, sequence: 0 },
            SealedBid { player: 0, engineer_index: 1, amount: 18, sequence: 1 },
            SealedBid { player: 1, engineer_index: 1, amount: 5, sequence: 2 },
        ];
        let awards = resolve_sealed_bids(2, &bids, &funds(&[(0, 100), (1, 100)]));
        assert_eq!(awards.len(), 2);
        // Player 0 wins engineer 0 (their top), player 1 inherits engineer 1.
        assert!(awards.contains(&DraftAward { player: 0, engineer_index: 0, price: 20 }));
        assert!(awards.contains(&DraftAward { player: 1, engineer_index: 1, price: 5 }));
    }

    #[test]
    fn sealed_bids_tie_breaks_by_sequence() {
        let bids = vec![
            SealedBid { player: 1, engineer_index: 0, amount: 10, sequence: 5 },
            SealedBid { player: 0, engineer_index: 0, amount: 10, sequence: 2 },
        ];
        let awards = resolve_sealed_bids(1, &bids, &funds(&[(0, 50), (1, 50)]));
        assert_eq!(awards[0].player, 0);
    }

    #[test]
    fn sealed_bids_skip_unaffordable() {
        let bids = vec![
            SealedBid { player: 0, engineer_index: 0, amount: 30, sequence: 0 },
            SealedBid { player: 1, engineer_index: 0, amount: 8, sequence: 1 },
        ];
        let awards = resolve_sealed_bids(1, &bids, &funds(&[(0, 10), (1, 10)]));
        assert_eq!(awards[0].player, 1);
    }

    #[test]
    fn sealed_bids_funds_deplete_across_awards() {
        let bids = vec![
            SealedBid { player: 0, engineer_index: 0, amount: 8, sequence: 0 },
            SealedBid { player: 0, engineer_index: 1, amount: 8, sequence: 1 },
        ];
        // Only 10 money: wins the first, cannot take the second (and is
        // excluded anyway by the one-win rule).
        let awards = resolve_sealed_bids(2, &bids, &funds(&[(0, 10)]));
        assert_eq!(awards.len(), 1);
    }

    #[test]
    fn snake_order_alternates_laps() {
        let order = build_snake_order(&[(0, 300), (1, 100), (2, 200)], 6);
        assert_eq!(order, vec![1, 2, 0, 0, 2, 1]);
    }

    #[test]
    fn snake_order_ties_break_by_id() {
        let order = build_snake_order(&[(2, 100), (1, 100)], 4);
        assert_eq!(order, vec![1, 2, 2, 1]);
    }

    #[test]
    fn snake_order_truncates_partial_lap() {
        let order = build_snake_order(&[(0, 10), (1, 20)], 3);
        assert_eq!(order, vec![0, 1, 1]);
    }

    #[test]
    fn snake_order_is_deterministic() {
        let ranked = [(3, 50), (1, 50), (2, 10)];
        assert_eq!(
            build_snake_order(&ranked, 9),
            build_snake_order(&ranked, 9)
        );
    }

    #[test]
    fn auction_min_bid_escalates() {
        let mut auction = AscendingAuction::new(vec![0, 1]);
        assert_eq!(auction.min_bid(), 15);
        auction.bid(0, 15);
        assert_eq!(auction.min_bid(), 20);
    }

    #[test]
    fn auction_rejects_wrong_turn_and_low_bids() {
        let mut auction = AscendingAuction::new(vec![0, 1]);
        assert!(auction.bid(1, 15).is_none());
        assert!(auction.bid(0, 14).is_none());
        assert_eq!(auction.current_bidder(), Some(0));
    }

    #[test]
    fn auction_completes_when_one_active_remains() {
        let mut auction = AscendingAuction::new(vec![0, 1, 2]);
        assert_eq!(auction.bid(0, 15), Some(AuctionStep::Continue));
        assert_eq!(auction.pass(1), Some(AuctionStep::Continue));
        assert_eq!(auction.pass(2), Some(AuctionStep::Won { player: 0, price: 15 }));
    }

    #[test]
    fn auction_early_pass_can_discard_lot() {
        // Two players: the opening pass leaves one active bidder with no
        // bid on the table, which completes the lot unclaimed.
        let mut auction = AscendingAuction::new(vec![0, 1]);
        assert_eq!(auction.pass(0), Some(AuctionStep::Unclaimed));
    }

    #[test]
    fn auction_all_pass_discards_lot() {
        let mut auction = AscendingAuction::new(vec![0, 1, 2]);
        assert_eq!(auction.pass(0), Some(AuctionStep::Continue));
        assert_eq!(auction.pass(1), Some(AuctionStep::Unclaimed));
    }
}
