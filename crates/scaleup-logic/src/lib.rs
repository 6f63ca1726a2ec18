//! Pure game rules for Scaleup.
//!
//! This crate contains every rule of the startup-tycoon board game that is
//! independent of any engine, RNG, or I/O. Functions take plain data and
//! return results, making them unit-testable and portable between the
//! turn engine, headless harnesses, and any future host.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`actions`] | Action catalog and per-action economic effect handlers |
//! | [`company`] | Strategy triples, corporation styles, one-time power tracking |
//! | [`constants`] | Fixed tuning numbers (quarters, buffer sizes, caps) |
//! | [`debt`] | Tech-debt token buffer with flush-on-full cascade, debt tiers |
//! | [`draft`] | Sealed-bid resolution, ascending persona auction, snake order |
//! | [`engineers`] | Engineer levels, specialties, traits, weighted pool rolls |
//! | [`events`] | Event deck types and structured mitigation conditions |
//! | [`grid`] | Code grid, app-card pattern matching, star/VP formulas |
//! | [`leaders`] | Leader catalog — passives and one-time powers |
//! | [`player`] | The full per-player record and its invariant helpers |
//! | [`power`] | The ordered power-modifier pipeline and AI debt output |
//! | [`puzzle`] | Block-program puzzle oracle (opaque scoring collaborator) |
//! | [`resources`] | Money/capacity/metric model, income and median formulas |
//! | [`scoring`] | End-of-game score aggregation per corporation style |
//! | [`slots`] | Per-round action-slot occupancy with silent-fail claims |
//! | [`sprint`] | Push-your-luck sprint bag math and crash rules |
//! | [`tables`] | Fixed rule data: pools, costs, leaders, events, cards |

pub mod actions;
pub mod company;
pub mod constants;
pub mod debt;
pub mod draft;
pub mod engineers;
pub mod events;
pub mod grid;
pub mod leaders;
pub mod player;
pub mod power;
pub mod puzzle;
pub mod resources;
pub mod scoring;
pub mod slots;
pub mod sprint;
pub mod tables;

/// Player identifier — stable for the whole game, assigned at setup.
pub type PlayerId = u8;

/// Engineer identifier — unique across the whole game.
pub type EngineerId = u32;
