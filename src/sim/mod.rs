//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Discrete grid ticks only, driven by the embedder
//! - Seeded RNG only
//! - Stable iteration order (obstacle cells in a `BTreeSet`, body head-first)
//! - No rendering or platform dependencies

pub mod engine;
pub mod food;
pub mod grid;
pub mod levels;
pub mod obstacles;
pub mod progress;
pub mod state;

pub use engine::{Engine, TickEvent};
pub use food::{Food, FoodColor};
pub use grid::{Cell, Direction, GridSize};
pub use levels::{LevelCatalog, LevelDef, LevelError};
pub use obstacles::{ObstacleSet, Pattern};
pub use progress::Progress;
pub use state::{GamePhase, GameState, SessionPolicy, Snake, Snapshot};
