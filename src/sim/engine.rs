//! The tick-driven simulation engine
//!
//! One engine instance owns one play session; all mutation goes through its
//! methods. The engine only simulates: scheduling lives in the external
//! driver, which buffers direction changes between ticks and invokes `tick`
//! at the active level's interval, serially. Ticks are never reentrant and
//! there are no recoverable errors inside the simulation; collisions are
//! ordinary game events.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::{SPAWN_HEAD, SPAWN_LENGTH};

use super::food;
use super::grid::{Direction, GridSize};
use super::levels::{LevelCatalog, LevelError};
use super::progress::Progress;
use super::state::{GamePhase, GameState, SessionPolicy, Snake, Snapshot};

/// Outcome of one tick, for the driver's lifecycle handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// Tick arrived outside the `Running` phase; nothing happened
    Ignored,
    /// Plain move
    Moved,
    /// Food consumed; `remaining` items still required for the level
    Ate { remaining: u32 },
    /// Level requirement met; `victory` when it was the final level
    LevelCleared { victory: bool },
    /// Collision with lives remaining
    LifeLost { lives_left: u8 },
    /// Collision with no lives remaining
    GameOver { final_score: u32 },
}

/// The simulation engine
pub struct Engine {
    catalog: LevelCatalog,
    grid: GridSize,
    policy: SessionPolicy,
    rng: Pcg32,
    session: Option<GameState>,
    /// Direction buffered between ticks, committed at the next tick start
    pending_direction: Option<Direction>,
}

impl Engine {
    pub fn new(catalog: LevelCatalog, grid: GridSize, policy: SessionPolicy, seed: u64) -> Self {
        Self {
            catalog,
            grid,
            policy,
            rng: Pcg32::seed_from_u64(seed),
            session: None,
            pending_direction: None,
        }
    }

    /// Standard catalog on the default grid with default rules
    pub fn standard(seed: u64) -> Self {
        Self::new(
            LevelCatalog::standard(),
            GridSize::default(),
            SessionPolicy::default(),
            seed,
        )
    }

    /// Start (or restart) a session at `level_id` with full reset semantics:
    /// per-level counters cleared and the score set to the baseline earned by
    /// the levels before it (zero exactly when entering at level 1).
    pub fn start(&mut self, level_id: u32) -> Result<(), LevelError> {
        let level = self.catalog.get(level_id)?;
        let obstacles = level.obstacles(self.grid);
        let snake = Snake::spawn(SPAWN_HEAD, Direction::Right, SPAWN_LENGTH);
        let food = food::spawn(self.grid, &obstacles, &snake.body, &mut self.rng);
        let progress = Progress::start(
            level.id,
            level.required_food,
            self.catalog.baseline_for(level.id),
            self.policy.lives_per_level,
        );
        log::info!(
            "level {} loaded: {} obstacle cells, {} food required, {} ms/tick",
            level.id,
            obstacles.len(),
            level.required_food,
            level.tick_interval_ms
        );
        self.session = Some(GameState {
            phase: GamePhase::Running,
            snake,
            food,
            obstacles,
            progress,
            tick_interval_ms: level.tick_interval_ms,
        });
        self.pending_direction = None;
        Ok(())
    }

    /// Buffer a direction change for the next tick. Rejected (returning
    /// false) when it reverses the committed direction or no game is running.
    pub fn submit_direction(&mut self, direction: Direction) -> bool {
        let Some(session) = &self.session else {
            return false;
        };
        if session.phase != GamePhase::Running
            || direction.is_opposite(session.snake.direction)
        {
            return false;
        }
        self.pending_direction = Some(direction);
        true
    }

    /// Advance the simulation by one step: commit the buffered direction,
    /// move the head with toroidal wrapping, resolve collisions and food.
    pub fn tick(&mut self) -> TickEvent {
        let Some(session) = self.session.as_mut() else {
            return TickEvent::Ignored;
        };
        if session.phase != GamePhase::Running {
            return TickEvent::Ignored;
        }

        if let Some(direction) = self.pending_direction.take() {
            if !direction.is_opposite(session.snake.direction) {
                session.snake.direction = direction;
            }
        }

        let candidate = self.grid.step(session.snake.head(), session.snake.direction);
        let growing = candidate == session.food.cell;

        if session.snake.hits_body(candidate, growing) || session.obstacles.contains(&candidate) {
            // A collision is a state transition, not an error
            session.progress.lose_life(
                session.progress.required_food(),
                self.policy.score_revert_on_life_loss,
                !self.policy.practice_mode,
            );
            if session.progress.lives == 0 {
                session.phase = GamePhase::GameOver;
                log::info!(
                    "game over on level {} with score {}",
                    session.progress.current_level,
                    session.progress.score
                );
                return TickEvent::GameOver {
                    final_score: session.progress.score,
                };
            }
            session.phase = GamePhase::LifeLost;
            return TickEvent::LifeLost {
                lives_left: session.progress.lives,
            };
        }

        session.snake.advance(candidate, growing);

        if growing {
            if session.progress.consume_food() {
                session.phase = GamePhase::LevelComplete;
                let victory = self.catalog.is_last(session.progress.current_level);
                log::info!(
                    "level {} cleared with score {}",
                    session.progress.current_level,
                    session.progress.score
                );
                return TickEvent::LevelCleared { victory };
            }
            session.food =
                food::spawn(self.grid, &session.obstacles, &session.snake.body, &mut self.rng);
            return TickEvent::Ate {
                remaining: session.progress.remaining_food,
            };
        }

        TickEvent::Moved
    }

    /// Resume after a life loss: the snake and food respawn, obstacles and
    /// the score baseline stay as they were.
    pub fn retry_level(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.phase != GamePhase::LifeLost {
            return;
        }
        session.snake = Snake::spawn(SPAWN_HEAD, Direction::Right, SPAWN_LENGTH);
        session.food = food::spawn(self.grid, &session.obstacles, &session.snake.body, &mut self.rng);
        self.pending_direction = None;
        session.phase = GamePhase::Running;
    }

    /// Load the next level after a `LevelComplete`. Lives return to full.
    /// Errs when the cleared level was the final one.
    pub fn advance_level(&mut self) -> Result<(), LevelError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        if session.phase != GamePhase::LevelComplete {
            return Ok(());
        }
        let next = self.catalog.get(session.progress.current_level + 1)?;
        session
            .progress
            .advance_to(next.id, next.required_food, self.policy.lives_per_level);
        session.obstacles = next.obstacles(self.grid);
        session.tick_interval_ms = next.tick_interval_ms;
        session.snake = Snake::spawn(SPAWN_HEAD, Direction::Right, SPAWN_LENGTH);
        session.food = food::spawn(self.grid, &session.obstacles, &session.snake.body, &mut self.rng);
        self.pending_direction = None;
        session.phase = GamePhase::Running;
        log::info!(
            "advanced to level {} ({} obstacle cells)",
            next.id,
            session.obstacles.len()
        );
        Ok(())
    }

    pub fn phase(&self) -> GamePhase {
        self.session
            .as_ref()
            .map(|s| s.phase)
            .unwrap_or(GamePhase::Idle)
    }

    /// Cumulative score, for the high-score boundary
    pub fn score(&self) -> u32 {
        self.session.as_ref().map(|s| s.progress.score).unwrap_or(0)
    }

    /// Cadence the driver should tick at, once a session is active
    pub fn tick_interval_ms(&self) -> Option<u32> {
        self.session.as_ref().map(|s| s.tick_interval_ms)
    }

    /// Read-only render projection of the current state
    pub fn snapshot(&self) -> Snapshot {
        match &self.session {
            Some(session) => Snapshot {
                phase: session.phase,
                grid: self.grid,
                level: Some(session.progress.current_level),
                snake: session.snake.body.clone(),
                food: Some(session.food),
                obstacles: session.obstacles.iter().copied().collect(),
                score: session.progress.score,
                remaining_food: session.progress.remaining_food,
                lives: session.progress.lives,
                tick_interval_ms: session.tick_interval_ms,
                practice: self.policy.practice_mode,
            },
            None => Snapshot {
                phase: GamePhase::Idle,
                grid: self.grid,
                level: None,
                snake: Vec::new(),
                food: None,
                obstacles: Vec::new(),
                score: 0,
                remaining_food: 0,
                lives: 0,
                tick_interval_ms: 0,
                practice: self.policy.practice_mode,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Cell;

    fn engine() -> Engine {
        let mut engine = Engine::standard(7);
        engine.start(1).unwrap();
        engine
    }

    fn place_food(engine: &mut Engine, cell: Cell) {
        engine.session.as_mut().unwrap().food.cell = cell;
    }

    fn add_obstacle(engine: &mut Engine, cell: Cell) {
        engine.session.as_mut().unwrap().obstacles.insert(cell);
    }

    #[test]
    fn test_start_spawns_fixed_snake() {
        let engine = engine();
        let snap = engine.snapshot();
        assert_eq!(snap.phase, GamePhase::Running);
        assert_eq!(snap.level, Some(1));
        assert_eq!(
            snap.snake,
            vec![Cell::new(2, 1), Cell::new(1, 1), Cell::new(0, 1)]
        );
        assert_eq!(snap.lives, 3);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.remaining_food, 3);
    }

    #[test]
    fn test_unknown_level_is_an_error() {
        let mut engine = Engine::standard(7);
        assert!(engine.start(99).is_err());
        assert_eq!(engine.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_plain_move_keeps_length() {
        let mut engine = engine();
        place_food(&mut engine, Cell::new(15, 15));
        assert_eq!(engine.tick(), TickEvent::Moved);
        let snap = engine.snapshot();
        assert_eq!(snap.snake.len(), 3);
        assert_eq!(snap.snake[0], Cell::new(3, 1));
    }

    #[test]
    fn test_eating_grows_by_one_and_respawns_food_free() {
        let mut engine = engine();
        place_food(&mut engine, Cell::new(3, 1));
        assert_eq!(engine.tick(), TickEvent::Ate { remaining: 2 });
        let snap = engine.snapshot();
        assert_eq!(snap.snake.len(), 4);
        assert_eq!(snap.score, 1);
        let food = snap.food.unwrap();
        assert!(!snap.snake.contains(&food.cell));
        assert!(!snap.obstacles.contains(&food.cell));
    }

    #[test]
    fn test_reversal_is_rejected() {
        let mut engine = engine();
        place_food(&mut engine, Cell::new(15, 15));
        assert!(!engine.submit_direction(Direction::Left));
        engine.tick();
        // still moving in +x
        assert_eq!(engine.snapshot().snake[0], Cell::new(3, 1));
    }

    #[test]
    fn test_direction_applies_on_the_next_tick_only() {
        let mut engine = engine();
        place_food(&mut engine, Cell::new(15, 15));
        assert!(engine.submit_direction(Direction::Down));
        // nothing moves until the driver ticks
        assert_eq!(engine.snapshot().snake[0], Cell::new(2, 1));
        engine.tick();
        assert_eq!(engine.snapshot().snake[0], Cell::new(2, 2));
    }

    #[test]
    fn test_later_submission_wins_within_one_interval() {
        let mut engine = engine();
        place_food(&mut engine, Cell::new(15, 15));
        assert!(engine.submit_direction(Direction::Up));
        assert!(engine.submit_direction(Direction::Down));
        engine.tick();
        assert_eq!(engine.snapshot().snake[0], Cell::new(2, 2));
    }

    #[test]
    fn test_movement_wraps_both_axes() {
        let mut engine = engine();
        place_food(&mut engine, Cell::new(15, 15));
        engine.submit_direction(Direction::Up);
        engine.tick(); // (2, 0)
        engine.tick(); // wraps to (2, 15)
        assert_eq!(engine.snapshot().snake[0], Cell::new(2, 15));
    }

    #[test]
    fn test_level_one_three_food_scenario() {
        let mut engine = engine();
        place_food(&mut engine, Cell::new(3, 1));
        assert_eq!(engine.tick(), TickEvent::Ate { remaining: 2 });
        place_food(&mut engine, Cell::new(4, 1));
        assert_eq!(engine.tick(), TickEvent::Ate { remaining: 1 });
        place_food(&mut engine, Cell::new(5, 1));
        assert_eq!(engine.tick(), TickEvent::LevelCleared { victory: false });
        let snap = engine.snapshot();
        assert_eq!(snap.phase, GamePhase::LevelComplete);
        assert_eq!(snap.score, 3);
        assert_eq!(snap.lives, 3);
        assert_eq!(snap.snake.len(), 6);
    }

    #[test]
    fn test_clean_run_scores_sum_of_requirements() {
        let mut engine = engine();
        for x in 3..=5 {
            place_food(&mut engine, Cell::new(x, 1));
            engine.tick();
        }
        assert_eq!(engine.phase(), GamePhase::LevelComplete);
        engine.advance_level().unwrap();
        let snap = engine.snapshot();
        assert_eq!(snap.level, Some(2));
        assert_eq!(snap.score, 3);
        assert_eq!(snap.lives, 3);
        assert_eq!(snap.snake.len(), 3);
        // level 2 requires 5; feed along the clear top row
        for x in 3..=7 {
            place_food(&mut engine, Cell::new(x, 1));
            engine.tick();
        }
        assert_eq!(engine.phase(), GamePhase::LevelComplete);
        assert_eq!(engine.score(), 3 + 5);
    }

    #[test]
    fn test_obstacle_collision_loses_a_life_and_resets() {
        let mut engine = engine();
        place_food(&mut engine, Cell::new(15, 15));
        add_obstacle(&mut engine, Cell::new(3, 1));
        assert_eq!(engine.tick(), TickEvent::LifeLost { lives_left: 2 });
        assert_eq!(engine.phase(), GamePhase::LifeLost);
        engine.retry_level();
        let snap = engine.snapshot();
        assert_eq!(snap.phase, GamePhase::Running);
        assert_eq!(
            snap.snake,
            vec![Cell::new(2, 1), Cell::new(1, 1), Cell::new(0, 1)]
        );
        assert_eq!(snap.lives, 2);
        // obstacles unchanged by the retry
        assert!(snap.obstacles.contains(&Cell::new(3, 1)));
    }

    #[test]
    fn test_self_collision_hits_non_tail_body() {
        let mut engine = engine();
        place_food(&mut engine, Cell::new(15, 15));
        let session = engine.session.as_mut().unwrap();
        session.snake = Snake {
            body: vec![
                Cell::new(5, 5),
                Cell::new(4, 5),
                Cell::new(4, 4),
                Cell::new(5, 4),
                Cell::new(6, 4),
            ],
            direction: Direction::Up,
        };
        assert_eq!(engine.tick(), TickEvent::LifeLost { lives_left: 2 });
    }

    #[test]
    fn test_chasing_the_vacated_tail_is_safe() {
        let mut engine = engine();
        place_food(&mut engine, Cell::new(15, 15));
        let session = engine.session.as_mut().unwrap();
        session.snake = Snake {
            body: vec![
                Cell::new(1, 1),
                Cell::new(2, 1),
                Cell::new(2, 2),
                Cell::new(1, 2),
            ],
            direction: Direction::Down,
        };
        assert_eq!(engine.tick(), TickEvent::Moved);
        assert_eq!(engine.snapshot().snake[0], Cell::new(1, 2));
    }

    #[test]
    fn test_growing_into_the_tail_collides() {
        let mut engine = engine();
        let session = engine.session.as_mut().unwrap();
        session.snake = Snake {
            body: vec![
                Cell::new(1, 1),
                Cell::new(2, 1),
                Cell::new(2, 2),
                Cell::new(1, 2),
            ],
            direction: Direction::Down,
        };
        session.food.cell = Cell::new(1, 2);
        assert_eq!(engine.tick(), TickEvent::LifeLost { lives_left: 2 });
    }

    #[test]
    fn test_life_loss_reverts_score_to_baseline() {
        let mut engine = Engine::standard(7);
        engine.start(2).unwrap();
        // level select at level 2 preserves the level-1 baseline
        assert_eq!(engine.score(), 3);
        place_food(&mut engine, Cell::new(3, 1));
        engine.tick();
        assert_eq!(engine.score(), 4);
        add_obstacle(&mut engine, Cell::new(5, 1));
        place_food(&mut engine, Cell::new(15, 15));
        engine.tick();
        assert_eq!(engine.tick(), TickEvent::LifeLost { lives_left: 2 });
        assert_eq!(engine.score(), 3);
        assert_eq!(engine.snapshot().remaining_food, 5);
    }

    #[test]
    fn test_restarting_at_level_one_zeroes_the_score() {
        let mut engine = Engine::standard(7);
        engine.start(2).unwrap();
        assert_eq!(engine.score(), 3);
        engine.start(1).unwrap();
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn test_three_collisions_end_the_game() {
        let mut engine = engine();
        place_food(&mut engine, Cell::new(15, 15));
        add_obstacle(&mut engine, Cell::new(3, 1));
        assert_eq!(engine.tick(), TickEvent::LifeLost { lives_left: 2 });
        engine.retry_level();
        assert_eq!(engine.tick(), TickEvent::LifeLost { lives_left: 1 });
        engine.retry_level();
        assert_eq!(engine.tick(), TickEvent::GameOver { final_score: 0 });
        assert_eq!(engine.phase(), GamePhase::GameOver);
        // further ticks are no-ops
        assert_eq!(engine.tick(), TickEvent::Ignored);
    }

    #[test]
    fn test_game_over_can_keep_the_attempt_score() {
        let policy = SessionPolicy {
            score_revert_on_life_loss: false,
            ..SessionPolicy::default()
        };
        let mut engine = Engine::new(
            LevelCatalog::standard(),
            GridSize::default(),
            policy,
            7,
        );
        engine.start(1).unwrap();
        place_food(&mut engine, Cell::new(3, 1));
        engine.tick();
        add_obstacle(&mut engine, Cell::new(4, 1));
        place_food(&mut engine, Cell::new(15, 15));
        for _ in 0..2 {
            engine.tick();
            engine.retry_level();
            add_obstacle(&mut engine, Cell::new(3, 1));
        }
        assert_eq!(engine.tick(), TickEvent::GameOver { final_score: 1 });
    }

    #[test]
    fn test_practice_mode_never_consumes_lives() {
        let policy = SessionPolicy {
            practice_mode: true,
            ..SessionPolicy::default()
        };
        let mut engine = Engine::new(
            LevelCatalog::standard(),
            GridSize::default(),
            policy,
            7,
        );
        engine.start(1).unwrap();
        place_food(&mut engine, Cell::new(15, 15));
        add_obstacle(&mut engine, Cell::new(3, 1));
        assert_eq!(engine.tick(), TickEvent::LifeLost { lives_left: 3 });
        engine.retry_level();
        assert_eq!(engine.snapshot().lives, 3);
        assert!(engine.snapshot().practice);
    }

    #[test]
    fn test_clearing_the_final_level_is_victory() {
        let mut engine = Engine::standard(7);
        engine.start(10).unwrap();
        {
            let session = engine.session.as_mut().unwrap();
            session.progress.remaining_food = 1;
            session.food.cell = Cell::new(3, 1);
        }
        assert_eq!(engine.tick(), TickEvent::LevelCleared { victory: true });
        // there is no level 11 to advance into
        assert!(engine.advance_level().is_err());
    }

    #[test]
    fn test_idle_engine_ignores_input_and_ticks() {
        let mut engine = Engine::standard(7);
        assert!(!engine.submit_direction(Direction::Down));
        assert_eq!(engine.tick(), TickEvent::Ignored);
        assert_eq!(engine.snapshot().phase, GamePhase::Idle);
    }

    #[test]
    fn test_same_seed_same_run() {
        let script = [
            Direction::Down,
            Direction::Right,
            Direction::Up,
            Direction::Right,
            Direction::Down,
        ];
        let mut a = Engine::standard(123);
        let mut b = Engine::standard(123);
        a.start(1).unwrap();
        b.start(1).unwrap();
        for dir in script {
            a.submit_direction(dir);
            b.submit_direction(dir);
            assert_eq!(a.tick(), b.tick());
            let (sa, sb) = (a.snapshot(), b.snapshot());
            assert_eq!(sa.snake, sb.snake);
            assert_eq!(sa.food, sb.food);
            assert_eq!(sa.score, sb.score);
        }
    }
}
