//! Fixed tuning constants for the Scaleup rules.
//!
//! These are plain numbers with no state attached. Both the turn engine
//! and the headless simtest read them; changing one here changes the game
//! everywhere.

/// Quarters per game. The quarter counter exceeding this ends the game.
pub const TOTAL_QUARTERS: u8 = 4;

/// Tech-debt buffer capacity. Reaching it flushes the buffer into the
/// integer debt counter.
pub const DEBT_BUFFER_SIZE: usize = 4;

/// Code tokens dealt into the shared pool per player per round.
pub const TOKENS_PER_PLAYER: usize = 6;

/// App cards face-up in the market at any time.
pub const APP_MARKET_SIZE: usize = 3;

/// Upper bound on both production tracks.
pub const MAX_PRODUCTION_TRACK: u8 = 10;

/// Rating bounds.
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;

/// Cost cap for the safety-net intern handed to engineer-less players.
pub const INTERN_COST_CAP: u32 = 5;

/// Income cap: `BASE_INCOME_CAP + INCOME_CAP_PER_ROUND * round`.
pub const BASE_INCOME_CAP: u32 = 30;
pub const INCOME_CAP_PER_ROUND: u32 = 10;

/// Flat stipend for players below the post-pass median MAU.
pub const UNDERDOG_STIPEND: u32 = 10;

/// Ascending persona auction: opening minimum and raise step.
pub const MIN_PERSONA_BID: u32 = 15;
pub const PERSONA_BID_STEP: u32 = 5;

/// Accumulated bug weight at which a sprint run crashes.
pub const SPRINT_CRASH_WEIGHT: u8 = 3;

/// Rating awarded to the single best non-crashed sprint total.
pub const SPRINT_WINNER_RATING_BONUS: u8 = 1;

/// Base code grid dimensions; server upgrades add columns.
pub const GRID_WIDTH: usize = 3;
pub const GRID_HEIGHT: usize = 4;

/// Server upgrades expand the grid up to this level.
pub const MAX_SERVER_GRID_LEVEL: u8 = 3;

/// Research-ai advances a capped research level 0 -> 1 -> 2.
pub const MAX_AI_RESEARCH_LEVEL: u8 = 2;

/// Interpreter step cap for the puzzle oracle.
pub const PUZZLE_STEP_CAP: u32 = 64;

/// Starting player state.
pub const STARTING_MONEY: u32 = 50;
pub const STARTING_SERVER_CAPACITY: u32 = 10;
pub const STARTING_MAU: u32 = 100;
pub const STARTING_RATING: u8 = 5;
