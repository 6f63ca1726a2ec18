//! Per-quarter round rebuild — pools, decks, orderings.
//!
//! Everything transient is rebuilt here at the start of each quarter.
//! All randomness flows through the engine's single seeded RNG so a
//! fixed seed and command history replays identically.

use rand::seq::SliceRandom;
use rand::Rng;

use scaleup_logic::constants::TOKENS_PER_PLAYER;
use scaleup_logic::debt::TokenColor;
use scaleup_logic::draft::build_snake_order;
use scaleup_logic::engineers::{level_for_roll, PoolEngineer};
use scaleup_logic::puzzle::PuzzleBoard;
use scaleup_logic::tables;
use scaleup_logic::PlayerId;

use crate::engine::GameEngine;
use crate::state::{DraftMode, DraftStage, RoundState};

impl GameEngine {
    /// Build the round state for the current quarter. Carries the app
    /// market and code pool forward by refilling them; everything else
    /// starts fresh.
    pub(crate) fn rebuild_round(&mut self) {
        let quarter = self.state.quarter;
        let player_count = self.state.player_count();

        let mut round = RoundState {
            theme: self
                .state
                .themes
                .get(quarter as usize - 1)
                .copied()
                .unwrap_or(tables::QuarterTheme::HypeCycle),
            current_event: self
                .state
                .event_order
                .get(self.state.events_drawn)
                .copied(),
            ..RoundState::default()
        };
        if round.current_event.is_some() {
            self.state.events_drawn += 1;
        }

        round.pool = self.generate_pool(quarter, player_count);
        // Persona cards hit the block from quarter 2, one per round.
        if quarter >= 2 {
            let index = (quarter - 2) as usize;
            if let Some(card) = tables::persona_catalog().get(index) {
                round.persona_pool.push(card.clone());
            }
        }
        round.draft_stage = match self.state.draft_mode {
            DraftMode::SealedBids => DraftStage::SealedBids,
            DraftMode::SnakePick => DraftStage::SnakePick,
        };
        if round.draft_stage == DraftStage::SnakePick {
            round.pick_order = self.pick_snake_order(round.pool.len());
        }

        // Shared code pool: player count x tokens per player, cycling
        // the color wheel, shuffled.
        let total = player_count * TOKENS_PER_PLAYER;
        round.code_pool = (0..total)
            .map(|i| tables::CODE_POOL_COLORS[i % tables::CODE_POOL_COLORS.len()])
            .collect();
        round.code_pool.shuffle(&mut self.rng);

        round.app_market = self.deal_app_market();

        // Engineer-draft ordering is ascending trailing MAU. The action
        // draft recomputes its own order (on VP) after hiring.
        round.draft_order = self.mau_order();

        self.state.round = round;
    }

    /// Weighted engineer pool for the round.
    fn generate_pool(&mut self, quarter: u8, player_count: usize) -> Vec<PoolEngineer> {
        let weights = tables::pool_weights(quarter);
        let size = tables::pool_size(player_count);
        let mut pool = Vec::with_capacity(size);
        for _ in 0..size {
            let roll = self.rng.gen_range(0..100);
            let level = level_for_roll(weights, roll);
            let specialty =
                tables::POOL_SPECIALTIES[self.rng.gen_range(0..tables::POOL_SPECIALTIES.len())];
            // Roughly a third of the pool carries a trait.
            let trait_ = if self.rng.gen_range(0..3) == 0 {
                Some(tables::POOL_TRAITS[self.rng.gen_range(0..tables::POOL_TRAITS.len())])
            } else {
                None
            };
            let name =
                tables::ENGINEER_NAMES[self.rng.gen_range(0..tables::ENGINEER_NAMES.len())];
            pool.push(PoolEngineer {
                name: name.to_string(),
                level,
                specialty,
                trait_,
                persona_trait: None,
            });
        }
        pool
    }

    /// Refill the face-up app market from the catalog, excluding cards
    /// already held or published by anyone.
    pub(crate) fn deal_app_market(&mut self) -> Vec<scaleup_logic::grid::AppCardId> {
        let taken: Vec<_> = self
            .state
            .players
            .iter()
            .flat_map(|p| {
                p.held_app_cards
                    .iter()
                    .copied()
                    .chain(p.published_apps.iter().map(|a| a.card_id))
            })
            .collect();
        let mut available: Vec<_> = tables::app_catalog()
            .iter()
            .map(|c| c.id)
            .filter(|id| !taken.contains(id))
            .collect();
        available.shuffle(&mut self.rng);
        available.truncate(scaleup_logic::constants::APP_MARKET_SIZE);
        available
    }

    /// Player ids ascending by trailing MAU (comeback ordering).
    pub(crate) fn mau_order(&self) -> Vec<PlayerId> {
        let ranked: Vec<(PlayerId, u64)> = self
            .state
            .players
            .iter()
            .map(|p| (p.id, p.metrics.mau as u64))
            .collect();
        build_snake_order(&ranked, ranked.len())
    }

    /// Snake order covering every pool engineer, ranked ascending by
    /// trailing MAU — used by the sequential pick draft, so the trailing
    /// player both picks first and gets any extra lap.
    pub(crate) fn pick_snake_order(&self, picks: usize) -> Vec<PlayerId> {
        let ranked: Vec<(PlayerId, u64)> = self
            .state
            .players
            .iter()
            .map(|p| (p.id, p.metrics.mau as u64))
            .collect();
        build_snake_order(&ranked, picks)
    }

    /// Snake order over total unplaced engineers, ranked ascending by
    /// trailing VP — used by the immediate-resolution action draft.
    pub(crate) fn vp_snake_order(&self) -> Vec<PlayerId> {
        let ranked: Vec<(PlayerId, u64)> = self
            .state
            .players
            .iter()
            .map(|p| (p.id, p.trailing_vp() as u64))
            .collect();
        let picks: usize = self.state.players.iter().map(|p| p.engineers.len()).sum();
        build_snake_order(&ranked, picks)
    }

    /// Deal the puzzle board for one player: a 3x3 coin grid.
    pub(crate) fn deal_puzzle_board(&mut self) -> PuzzleBoard {
        let coins = (0..9).map(|_| self.rng.gen_range(0..=3)).collect();
        PuzzleBoard {
            width: 3,
            height: 3,
            coins,
        }
    }

    /// Shuffled sprint bag for this round.
    pub(crate) fn shuffled_sprint_bag(&mut self) -> Vec<scaleup_logic::sprint::SprintToken> {
        let mut bag = tables::sprint_bag();
        bag.shuffle(&mut self.rng);
        bag
    }

    /// Cycle colors when handing a replacement token back to the pool.
    pub(crate) fn random_token_color(&mut self) -> TokenColor {
        tables::CODE_POOL_COLORS[self.rng.gen_range(0..tables::CODE_POOL_COLORS.len())]
    }
}
