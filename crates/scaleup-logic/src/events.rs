//! Event deck types and structured mitigation conditions.
//!
//! Mitigation is a structured condition evaluated directly against a
//! player's state — a tagged variant, not parsed rule text — so the
//! vocabulary of mitigations lives in one place.

use serde::{Deserialize, Serialize};

use crate::debt::TokenColor;
use crate::player::Player;

pub type EventId = u8;

/// A player field a mitigation condition can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatField {
    Money,
    ServerCapacity,
    AiCapacity,
    TechDebt,
    Mau,
    Rating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionKind {
    GreaterThan,
    AtLeast,
    LessThan,
}

/// `field <kind> threshold`, e.g. "server capacity > 20".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub field: StatField,
    pub kind: ConditionKind,
    pub threshold: u32,
}

impl Condition {
    pub fn eval(&self, player: &Player) -> bool {
        let value = match self.field {
            StatField::Money => player.resources.money,
            StatField::ServerCapacity => player.resources.server_capacity,
            StatField::AiCapacity => player.resources.ai_capacity,
            StatField::TechDebt => player.resources.tech_debt,
            StatField::Mau => player.metrics.mau,
            StatField::Rating => player.metrics.rating as u32,
        };
        match self.kind {
            ConditionKind::GreaterThan => value > self.threshold,
            ConditionKind::AtLeast => value >= self.threshold,
            ConditionKind::LessThan => value < self.threshold,
        }
    }
}

/// One integer perturbation of player state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventEffect {
    MoneyDelta(i32),
    MauDelta(i32),
    RatingDelta(i32),
    AiCapacityDelta(i32),
    /// Appends debt tokens through the buffer (cascade applies).
    DebtTokens(u32, TokenColor),
}

/// A drawn game event. Players satisfying the mitigation skip the
/// effects entirely; beneficial events usually carry no mitigation.
/// Lives in the fixed deck table; game state references events by id.
#[derive(Debug, Clone)]
pub struct GameEvent {
    pub id: EventId,
    pub name: &'static str,
    pub effects: Vec<EventEffect>,
    pub mitigation: Option<Condition>,
}

/// Apply an event to one player, honoring mitigation. Returns true when
/// the effects landed.
pub fn apply_to_player(event: &GameEvent, player: &mut Player) -> bool {
    if let Some(condition) = &event.mitigation {
        if condition.eval(player) {
            return false;
        }
    }
    for effect in &event.effects {
        match *effect {
            EventEffect::MoneyDelta(delta) => {
                if delta >= 0 {
                    player.resources.money += delta as u32;
                } else {
                    player.resources.money =
                        player.resources.money.saturating_sub(delta.unsigned_abs());
                }
            }
            EventEffect::MauDelta(delta) => player.metrics.adjust_mau(delta),
            EventEffect::RatingDelta(delta) => player.metrics.adjust_rating(delta),
            EventEffect::AiCapacityDelta(delta) => {
                if delta >= 0 {
                    player.resources.ai_capacity += delta as u32;
                } else {
                    player.resources.ai_capacity = player
                        .resources
                        .ai_capacity
                        .saturating_sub(delta.unsigned_abs());
                }
            }
            EventEffect::DebtTokens(count, color) => {
                let flushed = player.debt_buffer.push_many(color, count);
                player.resources.tech_debt += flushed;
            }
        }
    }
    true
}
