//! Code grid and app-card pattern matching.
//!
//! A satellite subsystem of resolution: players commit colored code
//! tokens into a per-player grid, and publishing an app scores the grid
//! against the card's color pattern. Only the contracts that feed core
//! resolution (stars, VP, token consumption) are modeled here.

use serde::{Deserialize, Serialize};

use crate::constants::{GRID_HEIGHT, GRID_WIDTH};
use crate::debt::TokenColor;

/// A player's code grid. Server upgrades add one column per level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeGrid {
    pub cells: Vec<Option<TokenColor>>,
    pub width: usize,
    pub height: usize,
}

impl Default for CodeGrid {
    fn default() -> Self {
        CodeGrid {
            cells: vec![None; GRID_WIDTH * GRID_HEIGHT],
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
        }
    }
}

impl CodeGrid {
    /// Add one column, preserving existing cell contents row by row.
    pub fn expand(&mut self) {
        let mut next = vec![None; (self.width + 1) * self.height];
        for row in 0..self.height {
            for col in 0..self.width {
                next[row * (self.width + 1) + col] = self.cells[row * self.width + col];
            }
        }
        self.width += 1;
        self.cells = next;
    }

    /// Place a token in the first empty cell. False when the grid is full.
    pub fn place(&mut self, color: TokenColor) -> bool {
        if let Some(slot) = self.cells.iter_mut().find(|c| c.is_none()) {
            *slot = Some(color);
            true
        } else {
            false
        }
    }

    /// Swap two cells by index. False (no mutation) on out-of-range.
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        if a >= self.cells.len() || b >= self.cells.len() {
            return false;
        }
        self.cells.swap(a, b);
        true
    }

    pub fn token_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Count how many of the pattern's tokens the grid can cover
    /// (multiset intersection by color).
    pub fn match_pattern(&self, pattern: &[TokenColor]) -> usize {
        let mut available = [0usize; 4];
        for cell in self.cells.iter().flatten() {
            available[color_index(*cell)] += 1;
        }
        let mut matched = 0;
        for color in pattern {
            let idx = color_index(*color);
            if available[idx] > 0 {
                available[idx] -= 1;
                matched += 1;
            }
        }
        matched
    }

    /// Remove tokens covering the pattern (used on publish). Removes at
    /// most one grid token per matched pattern token.
    pub fn consume_pattern(&mut self, pattern: &[TokenColor]) {
        let mut wanted = [0usize; 4];
        for color in pattern {
            wanted[color_index(*color)] += 1;
        }
        for cell in self.cells.iter_mut() {
            if let Some(color) = cell {
                let idx = color_index(*color);
                if wanted[idx] > 0 {
                    wanted[idx] -= 1;
                    *cell = None;
                }
            }
        }
    }
}

fn color_index(color: TokenColor) -> usize {
    match color {
        TokenColor::Red => 0,
        TokenColor::Green => 1,
        TokenColor::Blue => 2,
        TokenColor::Yellow => 3,
    }
}

pub type AppCardId = u8;

/// An app card from the market: a color pattern and a VP ceiling.
/// Lives in the fixed catalog; game state references cards by id.
#[derive(Debug, Clone)]
pub struct AppCard {
    pub id: AppCardId,
    pub name: &'static str,
    pub pattern: Vec<TokenColor>,
    pub max_vp: u32,
}

/// Stars for a publish: `round(5 * matched / pattern_len)`, at least 1.
/// A full match is always 5 stars.
pub fn stars_for_match(matched: usize, pattern_len: usize) -> u8 {
    if pattern_len == 0 {
        return 1;
    }
    let stars = (5 * matched + pattern_len / 2) / pattern_len;
    (stars.clamp(1, 5)) as u8
}

/// VP earned at a star level: `floor(max_vp * stars / 5)`, at least 1.
pub fn vp_for_stars(max_vp: u32, stars: u8) -> u32 {
    (max_vp * stars as u32 / 5).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(colors: &[TokenColor]) -> CodeGrid {
        let mut g = CodeGrid::default();
        for c in colors {
            g.place(*c);
        }
        g
    }

    #[test]
    fn full_match_is_five_stars_max_vp() {
        let g = grid_with(&[TokenColor::Red, TokenColor::Red, TokenColor::Blue]);
        let pattern = vec![TokenColor::Red, TokenColor::Red, TokenColor::Blue];
        let matched = g.match_pattern(&pattern);
        assert_eq!(matched, 3);
        assert_eq!(stars_for_match(matched, pattern.len()), 5);
        assert_eq!(vp_for_stars(6, 5), 6);
    }

    #[test]
    fn partial_match_scales_down() {
        let g = grid_with(&[TokenColor::Red]);
        let pattern = vec![TokenColor::Red, TokenColor::Blue, TokenColor::Green];
        assert_eq!(g.match_pattern(&pattern), 1);
        assert_eq!(stars_for_match(1, 3), 2); // round(5/3)
        assert_eq!(vp_for_stars(6, 2), 2);
    }

    #[test]
    fn zero_match_still_scores_one_star_one_vp() {
        assert_eq!(stars_for_match(0, 4), 1);
        assert_eq!(vp_for_stars(3, 1), 1);
    }

    #[test]
    fn expand_preserves_cells() {
        let mut g = grid_with(&[TokenColor::Green, TokenColor::Blue]);
        let before = g.token_count();
        g.expand();
        assert_eq!(g.width, GRID_WIDTH + 1);
        assert_eq!(g.token_count(), before);
    }

    #[test]
    fn swap_rejects_out_of_range() {
        let mut g = CodeGrid::default();
        assert!(!g.swap(0, 999));
        assert!(g.swap(0, 1));
    }

    #[test]
    fn consume_removes_only_matched_colors() {
        let mut g = grid_with(&[TokenColor::Red, TokenColor::Blue, TokenColor::Blue]);
        g.consume_pattern(&[TokenColor::Blue]);
        assert_eq!(g.token_count(), 2);
        assert_eq!(g.match_pattern(&[TokenColor::Blue]), 1);
    }
}
