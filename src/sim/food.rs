//! Food placement
//!
//! Every spawn enumerates the grid, filters out occupied cells, and picks
//! uniformly among what is left, so a spawned food item is never inside the
//! obstacle set or the snake body.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, GridSize};
use super::obstacles::ObstacleSet;

/// Cosmetic color tag; carries no gameplay effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoodColor {
    Red,
    Gold,
    Green,
    Violet,
}

impl FoodColor {
    pub const ALL: [FoodColor; 4] = [
        FoodColor::Red,
        FoodColor::Gold,
        FoodColor::Green,
        FoodColor::Violet,
    ];

    fn random(rng: &mut Pcg32) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// A food item on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub cell: Cell,
    pub color: FoodColor,
}

/// Pick a free cell uniformly at random.
///
/// If the grid has no free cell at all, the grid-center cell is returned as
/// a fixed fallback instead of an error; the caller should read that as "the
/// level is effectively unplayable".
pub fn place(grid: GridSize, obstacles: &ObstacleSet, snake: &[Cell], rng: &mut Pcg32) -> Cell {
    let free: Vec<Cell> = grid
        .cells()
        .filter(|cell| !obstacles.contains(cell) && !snake.contains(cell))
        .collect();
    if free.is_empty() {
        log::warn!(
            "no free cell for food on {}x{} grid, falling back to center",
            grid.width,
            grid.height
        );
        return grid.center();
    }
    free[rng.random_range(0..free.len())]
}

/// Place a food item on a free cell with a random color
pub fn spawn(grid: GridSize, obstacles: &ObstacleSet, snake: &[Cell], rng: &mut Pcg32) -> Food {
    Food {
        cell: place(grid, obstacles, snake, rng),
        color: FoodColor::random(rng),
    }
}
