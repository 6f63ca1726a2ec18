//! Puzzle mini-game oracle.
//!
//! Executes a player-authored block program against a small coin grid and
//! reports success plus coins collected. Resolution treats the outcome as
//! opaque; the interpreter is deliberately tiny and step-capped so a
//! malformed program can never hang the engine.

use serde::{Deserialize, Serialize};

use crate::constants::PUZZLE_STEP_CAP;

/// One block of a player program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Block {
    MoveRight,
    MoveDown,
    Collect,
    /// Repeat the body a fixed number of times.
    Repeat(u8, Vec<Block>),
}

/// The puzzle board: a coin layout over a small grid. The cursor starts
/// at the top-left; reaching the bottom-right cell solves the puzzle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleBoard {
    pub width: usize,
    pub height: usize,
    /// Row-major coin values; 0 is an empty cell.
    pub coins: Vec<u8>,
}

/// What the oracle reports back to resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleOutcome {
    pub solved: bool,
    pub coins: u32,
}

/// Run a block program. The step cap bounds total block executions,
/// counting expanded repeat bodies.
pub fn run_program(board: &PuzzleBoard, program: &[Block]) -> PuzzleOutcome {
    let mut state = RunState {
        x: 0,
        y: 0,
        coins: 0,
        steps: 0,
        collected: vec![false; board.coins.len()],
    };
    exec(board, program, &mut state);
    PuzzleOutcome {
        solved: state.x == board.width.saturating_sub(1)
            && state.y == board.height.saturating_sub(1),
        coins: state.coins,
    }
}

struct RunState {
    x: usize,
    y: usize,
    coins: u32,
    steps: u32,
    collected: Vec<bool>,
}

fn exec(board: &PuzzleBoard, blocks: &[Block], state: &mut RunState) {
    for block in blocks {
        if state.steps >= PUZZLE_STEP_CAP {
            return;
        }
        state.steps += 1;
        match block {
            Block::MoveRight => {
                if state.x + 1 < board.width {
                    state.x += 1;
                }
            }
            Block::MoveDown => {
                if state.y + 1 < board.height {
                    state.y += 1;
                }
            }
            Block::Collect => {
                let idx = state.y * board.width + state.x;
                if idx < board.coins.len() && !state.collected[idx] {
                    state.coins += board.coins[idx] as u32;
                    state.collected[idx] = true;
                }
            }
            Block::Repeat(times, body) => {
                for _ in 0..*times {
                    if state.steps >= PUZZLE_STEP_CAP {
                        return;
                    }
                    exec(board, body, state);
                }
            }
        }
    }
}
