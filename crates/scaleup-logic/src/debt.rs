//! Tech-debt token buffer and debt tiers.
//!
//! Small debt sources (AI usage, events) append colored tokens to a
//! fixed-capacity FIFO. When the buffer fills it flushes: the tokens are
//! cleared and the integer `tech_debt` counter grows by the buffer size.
//! The flush happens synchronously inside the same mutation, possibly
//! several times when many tokens arrive in one resolution pass, so the
//! quantization effect is exact.

use serde::{Deserialize, Serialize};

use crate::constants::DEBT_BUFFER_SIZE;

/// Token colors, shared between the debt buffer and the code grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenColor {
    Red,
    Green,
    Blue,
    Yellow,
}

/// FIFO of colored debt tokens with flush-on-full cascade.
///
/// Invariant: `tokens.len() < max_size` holds after every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechDebtBuffer {
    pub tokens: Vec<TokenColor>,
    pub max_size: usize,
}

impl Default for TechDebtBuffer {
    fn default() -> Self {
        TechDebtBuffer {
            tokens: Vec::new(),
            max_size: DEBT_BUFFER_SIZE,
        }
    }
}

impl TechDebtBuffer {
    /// Append one token. Returns the integer debt produced by a flush
    /// (`max_size` on the filling insertion, 0 otherwise).
    pub fn push(&mut self, color: TokenColor) -> u32 {
        self.tokens.push(color);
        if self.tokens.len() >= self.max_size {
            self.tokens.clear();
            self.max_size as u32
        } else {
            0
        }
    }

    /// Append several tokens, cascading after each insertion. Returns the
    /// total integer debt produced by every flush that fired.
    pub fn push_many(&mut self, color: TokenColor, count: u32) -> u32 {
        let mut flushed = 0;
        for _ in 0..count {
            flushed += self.push(color);
        }
        flushed
    }

    /// Remove up to `count` tokens from the front (oldest first), for
    /// debt pay-down. Returns how many came out.
    pub fn drain_front(&mut self, count: u32) -> u32 {
        let take = (count as usize).min(self.tokens.len());
        self.tokens.drain(..take);
        take as u32
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Tech-debt severity tier derived from the integer counter.
/// 0 = healthy, escalating penalties above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebtTier {
    Healthy,
    Creaking,
    Strained,
    Crippled,
}

impl DebtTier {
    pub fn from_debt(tech_debt: u32) -> Self {
        match tech_debt {
            0..=3 => DebtTier::Healthy,
            4..=6 => DebtTier::Creaking,
            7..=9 => DebtTier::Strained,
            _ => DebtTier::Crippled,
        }
    }

    /// Power subtracted from every action except debt pay-down.
    pub fn power_penalty(self) -> u32 {
        match self {
            DebtTier::Healthy => 0,
            DebtTier::Creaking => 1,
            DebtTier::Strained => 2,
            DebtTier::Crippled => 3,
        }
    }

    /// Rating lost once per player per resolution pass.
    pub fn rating_penalty(self) -> i32 {
        match self {
            DebtTier::Healthy => 0,
            DebtTier::Creaking => 0,
            DebtTier::Strained => -1,
            DebtTier::Crippled => -2,
        }
    }
}

/// Remove `amount` units of debt from a player, preferring buffer tokens
/// before the integer counter. Returns units actually removed.
pub fn pay_down(buffer: &mut TechDebtBuffer, tech_debt: &mut u32, amount: u32) -> u32 {
    let from_buffer = buffer.drain_front(amount);
    let remaining = amount - from_buffer;
    let from_counter = remaining.min(*tech_debt);
    *tech_debt -= from_counter;
    from_buffer + from_counter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_flushes_on_fill() {
        let mut b = TechDebtBuffer::default();
        assert_eq!(b.push(TokenColor::Red), 0);
        assert_eq!(b.push(TokenColor::Red), 0);
        assert_eq!(b.push(TokenColor::Red), 0);
        assert_eq!(b.push(TokenColor::Red), 4);
        assert!(b.is_empty());
    }

    #[test]
    fn buffer_invariant_after_every_push() {
        let mut b = TechDebtBuffer::default();
        for _ in 0..17 {
            b.push(TokenColor::Blue);
            assert!(b.len() < b.max_size);
        }
    }

    #[test]
    fn nine_tokens_flush_twice() {
        // Three AI-augmented juniors generating 3 tokens each: flushes at
        // tokens 4 and 8, leaves 1 in the buffer, +8 integer debt.
        let mut b = TechDebtBuffer::default();
        let mut debt = 0u32;
        for _ in 0..3 {
            debt += b.push_many(TokenColor::Yellow, 3);
        }
        assert_eq!(debt, 8);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn pay_down_prefers_buffer() {
        let mut b = TechDebtBuffer::default();
        b.push(TokenColor::Red);
        let mut debt = 5;
        assert_eq!(pay_down(&mut b, &mut debt, 2), 2);
        assert!(b.is_empty());
        assert_eq!(debt, 4);
    }

    #[test]
    fn pay_down_stops_at_zero() {
        let mut b = TechDebtBuffer::default();
        let mut debt = 1;
        assert_eq!(pay_down(&mut b, &mut debt, 3), 1);
        assert_eq!(debt, 0);
    }

    #[test]
    fn tiers_and_penalties() {
        assert_eq!(DebtTier::from_debt(0), DebtTier::Healthy);
        assert_eq!(DebtTier::from_debt(3), DebtTier::Healthy);
        assert_eq!(DebtTier::from_debt(4), DebtTier::Creaking);
        assert_eq!(DebtTier::from_debt(7), DebtTier::Strained);
        assert_eq!(DebtTier::from_debt(10), DebtTier::Crippled);
        assert_eq!(DebtTier::Healthy.power_penalty(), 0);
        assert_eq!(DebtTier::Crippled.power_penalty(), 3);
        assert_eq!(DebtTier::Strained.rating_penalty(), -1);
    }
}
