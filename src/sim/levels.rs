//! Level catalog: the ordered, 1-indexed list of authored levels
//!
//! Static configuration data, not a wire format. Each level pairs a food
//! requirement and tick interval with one authored obstacle pattern; the
//! requirement and speed ramp with the level index.

use thiserror::Error;

use super::grid::GridSize;
use super::obstacles::{self, ObstacleSet, Pattern};

/// Tick interval of level 1 in milliseconds
const BASE_TICK_MS: u32 = 280;
/// Interval reduction per level
const TICK_RAMP_MS: u32 = 15;
/// Fastest allowed tick interval
const MIN_TICK_MS: u32 = 120;

/// Authored pattern order; index 0 is level 1
const PATTERNS: [Pattern; 15] = [
    Pattern::Open,
    Pattern::CornerPosts,
    Pattern::Quincunx,
    Pattern::CenterCross,
    Pattern::LaneBars,
    Pattern::Spiral,
    Pattern::NestedBoxes,
    Pattern::Chambers,
    Pattern::CrossPosts,
    Pattern::Warren,
    Pattern::TripleBars,
    Pattern::SpiralPosts,
    Pattern::ChamberPosts,
    Pattern::BoxedCross,
    Pattern::SixChambers,
];

/// A level the catalog does not have. Lookup misses are fatal to the
/// requesting operation; the engine never substitutes a default level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level {id} not found (catalog has levels 1..={count})")]
    NotFound { id: u32, count: u32 },
}

/// One level definition
#[derive(Debug, Clone)]
pub struct LevelDef {
    pub id: u32,
    /// Food items required to clear the level
    pub required_food: u32,
    /// Cadence the external driver should invoke `tick` at
    pub tick_interval_ms: u32,
    pub pattern: Pattern,
}

impl LevelDef {
    /// Regenerate this level's obstacle set. Deterministic for a given level
    /// and grid, so activation regenerates instead of caching.
    pub fn obstacles(&self, grid: GridSize) -> ObstacleSet {
        obstacles::generate(self.pattern, grid)
    }
}

/// Ordered, contiguous, 1-indexed level list
#[derive(Debug, Clone)]
pub struct LevelCatalog {
    levels: Vec<LevelDef>,
}

impl LevelCatalog {
    /// The standard 10-level run
    pub fn standard() -> Self {
        Self::with_levels(10)
    }

    /// The extended 15-level run
    pub fn extended() -> Self {
        Self::with_levels(PATTERNS.len())
    }

    fn with_levels(count: usize) -> Self {
        let levels = PATTERNS
            .iter()
            .take(count)
            .enumerate()
            .map(|(i, &pattern)| {
                let id = i as u32 + 1;
                LevelDef {
                    id,
                    required_food: 3 + (id - 1) * 2,
                    tick_interval_ms: BASE_TICK_MS
                        .saturating_sub((id - 1) * TICK_RAMP_MS)
                        .max(MIN_TICK_MS),
                    pattern,
                }
            })
            .collect();
        Self { levels }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Look up a level by its 1-based id
    pub fn get(&self, id: u32) -> Result<&LevelDef, LevelError> {
        id.checked_sub(1)
            .and_then(|i| self.levels.get(i as usize))
            .ok_or(LevelError::NotFound {
                id,
                count: self.levels.len() as u32,
            })
    }

    /// Whether `id` is the final catalog level
    pub fn is_last(&self, id: u32) -> bool {
        id as usize == self.levels.len()
    }

    /// Score guaranteed by completing every level before `id`: the sum of
    /// their food requirements. Zero for level 1.
    pub fn baseline_for(&self, id: u32) -> u32 {
        self.levels
            .iter()
            .filter(|level| level.id < id)
            .map(|level| level.required_food)
            .sum()
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
