//! Maze Snake entry point
//!
//! Headless demo driver. The engine deliberately owns no scheduling or input
//! capture, so this binary plays both collaborator roles: it ticks the engine
//! at the active level's interval and steers with a small greedy autopilot,
//! printing the board between ticks.

use std::collections::BTreeSet;
use std::thread;
use std::time::Duration;

use maze_snake::sim::{Cell, Direction, Engine, GamePhase, GridSize, Snapshot, TickEvent};

/// Hard cap on demo length, in ticks
const MAX_TICKS: u32 = 600;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xC0FFEE);
    let mut engine = Engine::standard(seed);
    if let Err(err) = engine.start(1) {
        eprintln!("failed to start: {err}");
        return;
    }
    log::info!("demo run with seed {seed}");

    for _ in 0..MAX_TICKS {
        let snapshot = engine.snapshot();
        print_board(&snapshot);
        match snapshot.phase {
            GamePhase::Running => {}
            GamePhase::LifeLost => {
                engine.retry_level();
                continue;
            }
            GamePhase::LevelComplete => {
                if engine.advance_level().is_err() {
                    println!("cleared the final level with {} points", snapshot.score);
                    return;
                }
                continue;
            }
            GamePhase::GameOver => {
                println!("game over, final score {}", snapshot.score);
                return;
            }
            GamePhase::Idle => return,
        }
        if let Some(direction) = steer(&snapshot) {
            engine.submit_direction(direction);
        }
        match engine.tick() {
            TickEvent::Ate { remaining } => log::info!("ate, {remaining} to go"),
            TickEvent::LifeLost { lives_left } => log::info!("crashed, {lives_left} lives left"),
            _ => {}
        }
        thread::sleep(Duration::from_millis(u64::from(snapshot.tick_interval_ms)));
    }
    println!("demo tick limit reached");
}

/// One-step greedy steering: prefer the move that closes the wrapped
/// distance to the food, never stepping into a lethal cell when a safe
/// alternative exists.
fn steer(snapshot: &Snapshot) -> Option<Direction> {
    let head = *snapshot.snake.first()?;
    let food = snapshot.food?;
    let grid = snapshot.grid;

    let mut blocked: BTreeSet<Cell> = snapshot.obstacles.iter().copied().collect();
    // the tail vacates on a non-eating move, so it does not block
    for cell in &snapshot.snake[..snapshot.snake.len() - 1] {
        blocked.insert(*cell);
    }

    let mut options = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
    options.sort_by_key(|&dir| wrapped_distance(grid, grid.step(head, dir), food.cell));
    options
        .into_iter()
        .find(|&dir| !blocked.contains(&grid.step(head, dir)))
}

/// Manhattan distance on the torus
fn wrapped_distance(grid: GridSize, a: Cell, b: Cell) -> i32 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    dx.min(grid.width - dx) + dy.min(grid.height - dy)
}

fn print_board(snapshot: &Snapshot) {
    let grid = snapshot.grid;
    let mut rows = vec![vec!['.'; grid.width as usize]; grid.height as usize];
    for cell in &snapshot.obstacles {
        rows[cell.y as usize][cell.x as usize] = '#';
    }
    if let Some(food) = snapshot.food {
        rows[food.cell.y as usize][food.cell.x as usize] = '*';
    }
    for (i, cell) in snapshot.snake.iter().enumerate() {
        rows[cell.y as usize][cell.x as usize] = if i == 0 { 'O' } else { 'o' };
    }
    println!(
        "level {}  score {}  lives {}  food left {}",
        snapshot.level.unwrap_or(0),
        snapshot.score,
        snapshot.lives,
        snapshot.remaining_food
    );
    for row in rows {
        println!("{}", row.into_iter().collect::<String>());
    }
    println!();
}
