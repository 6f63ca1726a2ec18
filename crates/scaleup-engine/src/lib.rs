//! The Scaleup turn engine.
//!
//! Owns the full serializable [`state::GameState`] and exposes atomic
//! command entrypoints plus pure queries on [`engine::GameEngine`].
//! Every command is a single indivisible transition: it either applies
//! fully or leaves the state untouched. Illegal moves (wrong turn, full
//! slot, unaffordable cost) are expected conditions and reject silently;
//! malformed calls (unknown ids) are reported as a distinct kind and
//! logged, since they indicate a caller bug.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`commands`] | Mutation entrypoints, one per exposed player move |
//! | [`engine`] | The state-owning service and the command result kinds |
//! | [`phases`] | The per-quarter phase machine and its transitions |
//! | [`queries`] | Read-only projections for hosts and UIs |
//! | [`resolve`] | The resolution pass and post-pass adjustments |
//! | [`round`] | Per-quarter round state rebuild (pools, decks, order) |
//! | [`state`] | The serializable game state and round scratch state |

pub mod commands;
pub mod engine;
pub mod phases;
pub mod queries;
pub mod resolve;
pub mod round;
pub mod state;

pub use engine::{CommandResult, GameEngine};
pub use phases::Phase;
pub use state::{DraftMode, GameOptions, GameState, PlanningMode};
