//! Game state and core simulation types
//!
//! Everything the engine owns for one play session lives here, along with
//! the read-only snapshot projection handed to renderers.

use serde::{Deserialize, Serialize};

use super::food::Food;
use super::grid::{Cell, Direction, GridSize};
use super::obstacles::ObstacleSet;
use super::progress::Progress;

/// Current phase of a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Menu / level select; no simulation running
    Idle,
    /// Active gameplay
    Running,
    /// Collision with lives remaining; waiting for a retry
    LifeLost,
    /// Level requirement met; waiting for an advance. On the final level this
    /// is the victory condition.
    LevelComplete,
    /// Out of lives
    GameOver,
}

/// The snake: body cells, head first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snake {
    /// Body segments with the head at index 0
    pub body: Vec<Cell>,
    /// Direction committed at the last tick
    pub direction: Direction,
}

impl Snake {
    /// Spawn with `length` cells trailing behind `head`, against `direction`
    pub fn spawn(head: Cell, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length as i32)
            .map(|i| head.offset(-dx * i, -dy * i))
            .collect();
        Self { body, direction }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Prepend the new head, dropping the tail unless growing
    pub fn advance(&mut self, new_head: Cell, grow: bool) {
        self.body.insert(0, new_head);
        if !grow {
            self.body.pop();
        }
    }

    /// Would the candidate head land on the body? On a non-growing tick the
    /// tail cell is about to be vacated, so it does not count; on a growing
    /// tick the whole body is checked.
    pub fn hits_body(&self, candidate: Cell, growing: bool) -> bool {
        let checked = if growing {
            &self.body[..]
        } else {
            &self.body[..self.body.len() - 1]
        };
        checked.contains(&candidate)
    }
}

/// Session rules, selected once when the engine is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPolicy {
    /// Lives granted at the start of every level
    pub lives_per_level: u8,
    /// Revert the cumulative score to the level baseline on life loss (and on
    /// the final game over)
    pub score_revert_on_life_loss: bool,
    /// Collisions reset the attempt without consuming a life; the run is not
    /// eligible for the high-score table
    pub practice_mode: bool,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            lives_per_level: crate::consts::LIVES_PER_LEVEL,
            score_revert_on_life_loss: true,
            practice_mode: false,
        }
    }
}

/// Complete per-session simulation state, exclusively owned by the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub snake: Snake,
    pub food: Food,
    pub obstacles: ObstacleSet,
    pub progress: Progress,
    /// Cadence of the active level, for the external driver
    pub tick_interval_ms: u32,
}

/// Read-only projection of the current state for rendering and HUDs.
/// Emitted after every tick and every state transition.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub grid: GridSize,
    /// Active level id, absent in the menu
    pub level: Option<u32>,
    /// Snake body cells, head first
    pub snake: Vec<Cell>,
    pub food: Option<Food>,
    pub obstacles: Vec<Cell>,
    pub score: u32,
    pub remaining_food: u32,
    pub lives: u8,
    pub tick_interval_ms: u32,
    pub practice: bool,
}
