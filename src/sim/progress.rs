//! Score and level progression bookkeeping
//!
//! The cumulative score is always `baseline + food_eaten`, where the
//! baseline is the score locked in by fully completed levels. Food eaten in
//! an attempt that ends in a collision is discarded back to the baseline.

use serde::{Deserialize, Serialize};

/// Per-session progression state: level index, per-level food counters,
/// cumulative score, and remaining lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub current_level: u32,
    /// Food eaten in the current attempt
    pub food_eaten: u32,
    /// Food still required to clear the level
    pub remaining_food: u32,
    /// Cumulative score (one point per food item)
    pub score: u32,
    /// Lives left on the current level
    pub lives: u8,
    baseline: u32,
}

impl Progress {
    /// Begin a session at `level_id`. The score starts at `baseline`, the
    /// sum of requirements of the levels before it. That is zero for level
    /// 1, so a full restart and a level-select entry share this constructor.
    pub fn start(level_id: u32, required_food: u32, baseline: u32, lives: u8) -> Self {
        Self {
            current_level: level_id,
            food_eaten: 0,
            remaining_food: required_food,
            score: baseline,
            lives,
            baseline,
        }
    }

    /// Consume one food item: one point scored, one less required.
    /// Returns true when the level's requirement is met.
    pub fn consume_food(&mut self) -> bool {
        self.food_eaten += 1;
        self.score += 1;
        self.remaining_food = self.remaining_food.saturating_sub(1);
        self.remaining_food == 0
    }

    /// Move on to the next level: the score earned so far becomes the new
    /// baseline, the per-level counters reset, and lives refill.
    pub fn advance_to(&mut self, level_id: u32, required_food: u32, lives: u8) {
        self.current_level = level_id;
        self.baseline = self.score;
        self.food_eaten = 0;
        self.remaining_food = required_food;
        self.lives = lives;
    }

    /// Record a collision. The attempt's food is discarded and the level
    /// requirement resets; when `revert_score` the cumulative score falls
    /// back to the baseline. `consume_life` is false in practice mode.
    pub fn lose_life(&mut self, required_food: u32, revert_score: bool, consume_life: bool) {
        if consume_life {
            self.lives = self.lives.saturating_sub(1);
        }
        self.food_eaten = 0;
        self.remaining_food = required_food;
        if revert_score {
            self.score = self.baseline;
        }
    }

    /// The requirement of the current level
    pub fn required_food(&self) -> u32 {
        self.remaining_food + self.food_eaten
    }

    pub fn baseline(&self) -> u32 {
        self.baseline
    }
}
