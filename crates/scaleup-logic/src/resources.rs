//! Resource and metric model — money, capacities, MAU, revenue, rating.
//!
//! All quantities are non-negative integers; rating is clamped to 1..=10.
//! Mutations saturate instead of underflowing so a rules bug can never
//! drive a counter negative.

use serde::{Deserialize, Serialize};

use crate::constants::{
    BASE_INCOME_CAP, INCOME_CAP_PER_ROUND, MAX_PRODUCTION_TRACK, MAX_RATING, MIN_RATING,
    STARTING_MAU, STARTING_MONEY, STARTING_RATING, STARTING_SERVER_CAPACITY,
};

/// Primitive economic state of a player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resources {
    pub money: u32,
    pub server_capacity: u32,
    pub ai_capacity: u32,
    pub tech_debt: u32,
}

impl Default for Resources {
    fn default() -> Self {
        Resources {
            money: STARTING_MONEY,
            server_capacity: STARTING_SERVER_CAPACITY,
            ai_capacity: 0,
            tech_debt: 0,
        }
    }
}

impl Resources {
    /// Spend money if affordable. Returns false (and leaves the state
    /// untouched) when the player cannot pay — a soft condition, never an
    /// error.
    pub fn spend(&mut self, amount: u32) -> bool {
        if self.money < amount {
            return false;
        }
        self.money -= amount;
        true
    }

    pub fn can_afford(&self, amount: u32) -> bool {
        self.money >= amount
    }

    /// Remove up to `amount` integer tech debt, returning what was removed.
    pub fn reduce_debt(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.tech_debt);
        self.tech_debt -= removed;
        removed
    }
}

/// Growth metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metrics {
    pub mau: u32,
    pub revenue: u32,
    /// Always within 1..=10.
    pub rating: u8,
}

impl Default for Metrics {
    fn default() -> Self {
        Metrics {
            mau: STARTING_MAU,
            revenue: 0,
            rating: STARTING_RATING,
        }
    }
}

impl Metrics {
    /// Apply a signed rating change, clamping to 1..=10.
    pub fn adjust_rating(&mut self, delta: i32) {
        let next = self.rating as i32 + delta;
        self.rating = next.clamp(MIN_RATING as i32, MAX_RATING as i32) as u8;
    }

    /// Apply a signed MAU change, saturating at zero.
    pub fn adjust_mau(&mut self, delta: i32) {
        if delta >= 0 {
            self.mau = self.mau.saturating_add(delta as u32);
        } else {
            self.mau = self.mau.saturating_sub(delta.unsigned_abs());
        }
    }
}

/// Derived production track counters, bounded to 0..=MAX_PRODUCTION_TRACK.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductionTracks {
    pub mau_production: u8,
    pub revenue_production: u8,
}

impl ProductionTracks {
    pub fn advance_mau(&mut self) {
        self.mau_production = (self.mau_production + 1).min(MAX_PRODUCTION_TRACK);
    }

    pub fn advance_revenue(&mut self) {
        self.revenue_production = (self.revenue_production + 1).min(MAX_PRODUCTION_TRACK);
    }

    /// Track value counted toward trailing-VP draft ordering.
    pub fn vp_value(&self) -> u32 {
        self.mau_production as u32 + self.revenue_production as u32
    }
}

/// Round-end income: `min(round(mau / 100), 30 + 10 * round)`.
/// Rounding is half-up on the hundreds.
pub fn income_for(mau: u32, round: u8) -> u32 {
    let earned = (mau + 50) / 100;
    let cap = BASE_INCOME_CAP + INCOME_CAP_PER_ROUND * round as u32;
    earned.min(cap)
}

/// Whether `mau` sits strictly below the cross-player median. Even
/// player counts use the mid-pair median; both sides of the comparison
/// are doubled so the check stays in integers.
pub fn below_median_mau(mau: u32, maus: &[u32]) -> bool {
    if maus.is_empty() {
        return false;
    }
    let mut sorted = maus.to_vec();
    sorted.sort_unstable();
    let lo = sorted[(sorted.len() - 1) / 2] as u64;
    let hi = sorted[sorted.len() / 2] as u64;
    2 * (mau as u64) < lo + hi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spend_rejects_unaffordable() {
        let mut r = Resources {
            money: 5,
            ..Resources::default()
        };
        assert!(!r.spend(10));
        assert_eq!(r.money, 5);
        assert!(r.spend(5));
        assert_eq!(r.money, 0);
    }

    #[test]
    fn rating_clamps_both_ends() {
        let mut m = Metrics::default();
        m.adjust_rating(100);
        assert_eq!(m.rating, 10);
        m.adjust_rating(-100);
        assert_eq!(m.rating, 1);
    }

    #[test]
    fn mau_saturates_at_zero() {
        let mut m = Metrics::default();
        m.adjust_mau(-(m.mau as i32) - 500);
        assert_eq!(m.mau, 0);
    }

    #[test]
    fn reduce_debt_never_underflows() {
        let mut r = Resources {
            tech_debt: 3,
            ..Resources::default()
        };
        assert_eq!(r.reduce_debt(10), 3);
        assert_eq!(r.tech_debt, 0);
    }

    #[test]
    fn tracks_cap() {
        let mut t = ProductionTracks::default();
        for _ in 0..50 {
            t.advance_mau();
        }
        assert_eq!(t.mau_production, MAX_PRODUCTION_TRACK);
    }

    #[test]
    fn income_rounds_half_up_and_caps() {
        assert_eq!(income_for(149, 1), 1);
        assert_eq!(income_for(150, 1), 2);
        // round 1 cap is 40
        assert_eq!(income_for(100_000, 1), 40);
        assert_eq!(income_for(100_000, 4), 70);
    }

    #[test]
    fn median_check_splits_two_players() {
        // The trailing player of two is below the mid-pair median.
        assert!(below_median_mau(100, &[100, 400]));
        assert!(!below_median_mau(400, &[100, 400]));
        // Exactly on the median earns nothing.
        assert!(!below_median_mau(250, &[100, 400]));
    }

    #[test]
    fn median_check_odd_and_four_player_counts() {
        assert!(below_median_mau(100, &[100, 200, 400]));
        assert!(!below_median_mau(200, &[100, 200, 400]));
        // Lower-middle of four is below the mid-pair median too.
        assert!(below_median_mau(200, &[100, 200, 300, 400]));
        assert!(!below_median_mau(300, &[100, 200, 300, 400]));
        assert!(!below_median_mau(0, &[]));
    }
}
