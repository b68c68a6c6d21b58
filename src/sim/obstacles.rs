//! Obstacle pattern generator
//!
//! Each level carries a hand-authored pattern, regenerated deterministically
//! from its pattern tag whenever the level is activated. Patterns are built
//! from two primitives:
//! - a 2x2 block placed at an anchor cell (posts, crosses, bars, spirals)
//! - cell-by-cell wall runs with door gaps (boxes and chambers)
//!
//! Anchors are derived from grid fractions so the layouts scale with the
//! grid. A 2x2 anchor outside `[0, w-1) x [0, h-1)` is silently dropped and
//! wall cells are clipped to the grid, so small grids degrade to sparse or
//! empty sets rather than erroring. Nothing here guarantees the remaining
//! free cells stay connected; the authored catalog is pinned by a
//! connectivity regression test instead.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::grid::{Cell, GridSize};

/// Blocked cells for one level, fixed for the level's duration
pub type ObstacleSet = BTreeSet<Cell>;

/// Authored pattern families, one per catalog level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pattern {
    /// Empty board
    Open,
    /// 2x2 posts at the four quarter-fraction corners
    CornerPosts,
    /// Corner posts plus a center post
    Quincunx,
    /// Solid plus shape of blocks through the board center
    CenterCross,
    /// Two horizontal block bars with center gaps
    LaneBars,
    /// Rectangular spiral wall with a single entrance
    Spiral,
    /// Two concentric box outlines with door gaps
    NestedBoxes,
    /// Full-span center walls cutting the board into four rooms
    Chambers,
    /// Center cross combined with corner posts
    CrossPosts,
    /// Nested boxes with posts crowding the ring corridor
    Warren,
    /// Three staggered block bars
    TripleBars,
    /// Spiral with posts guarding the open flank
    SpiralPosts,
    /// Four rooms, each with a post in its middle
    ChamberPosts,
    /// Box outline with a free-standing cross inside
    BoxedCross,
    /// Two vertical walls plus a horizontal wall: six rooms
    SixChambers,
}

/// Generate the obstacle set for `pattern` on `grid`.
///
/// Pure and deterministic: the same pattern and grid always produce the same
/// set, so level activation can regenerate instead of caching.
pub fn generate(pattern: Pattern, grid: GridSize) -> ObstacleSet {
    let mut set = ObstacleSet::new();
    match pattern {
        Pattern::Open => {}
        Pattern::CornerPosts => corner_posts(&mut set, grid),
        Pattern::Quincunx => {
            corner_posts(&mut set, grid);
            center_post(&mut set, grid);
        }
        Pattern::CenterCross => center_cross(&mut set, grid),
        Pattern::LaneBars => lane_bars(&mut set, grid),
        Pattern::Spiral => spiral(&mut set, grid),
        Pattern::NestedBoxes => nested_boxes(&mut set, grid),
        Pattern::Chambers => chambers(&mut set, grid),
        Pattern::CrossPosts => {
            center_cross(&mut set, grid);
            corner_posts(&mut set, grid);
        }
        Pattern::Warren => {
            nested_boxes(&mut set, grid);
            corner_posts(&mut set, grid);
        }
        Pattern::TripleBars => triple_bars(&mut set, grid),
        Pattern::SpiralPosts => {
            spiral(&mut set, grid);
            flank_posts(&mut set, grid);
        }
        Pattern::ChamberPosts => {
            chambers(&mut set, grid);
            corner_posts(&mut set, grid);
        }
        Pattern::BoxedCross => boxed_cross(&mut set, grid),
        Pattern::SixChambers => six_chambers(&mut set, grid),
    }
    set
}

/// Place a 2x2 block at anchor `(x, y)`.
///
/// Anchors outside `[0, w-1) x [0, h-1)` are dropped without error so
/// fraction-derived layouts survive very small grids.
fn block2(set: &mut ObstacleSet, grid: GridSize, x: i32, y: i32) {
    if x < 0 || y < 0 || x >= grid.width - 1 || y >= grid.height - 1 {
        return;
    }
    for dy in 0..2 {
        for dx in 0..2 {
            set.insert(Cell::new(x + dx, y + dy));
        }
    }
}

/// Insert a single wall cell, clipped to the grid
fn put(set: &mut ObstacleSet, grid: GridSize, x: i32, y: i32) {
    let cell = Cell::new(x, y);
    if grid.contains(cell) {
        set.insert(cell);
    }
}

/// Horizontal wall run along `y`, skipping `doors`
fn wall_h(set: &mut ObstacleSet, grid: GridSize, y: i32, x0: i32, x1: i32, doors: &[i32]) {
    for x in x0..=x1 {
        if !doors.contains(&x) {
            put(set, grid, x, y);
        }
    }
}

/// Vertical wall run along `x`, skipping `doors`
fn wall_v(set: &mut ObstacleSet, grid: GridSize, x: i32, y0: i32, y1: i32, doors: &[i32]) {
    for y in y0..=y1 {
        if !doors.contains(&y) {
            put(set, grid, x, y);
        }
    }
}

fn corner_posts(set: &mut ObstacleSet, grid: GridSize) {
    let (qx, tx) = (grid.width / 4, grid.width * 3 / 4);
    let (qy, ty) = (grid.height / 4, grid.height * 3 / 4);
    block2(set, grid, qx, qy);
    block2(set, grid, tx, qy);
    block2(set, grid, qx, ty);
    block2(set, grid, tx, ty);
}

fn center_post(set: &mut ObstacleSet, grid: GridSize) {
    block2(set, grid, grid.width / 2 - 1, grid.height / 2 - 1);
}

fn center_cross(set: &mut ObstacleSet, grid: GridSize) {
    let (qx, tx) = (grid.width / 4, grid.width * 3 / 4);
    let (qy, ty) = (grid.height / 4, grid.height * 3 / 4);
    let cx = grid.width / 2 - 1;
    let cy = grid.height / 2 - 1;
    // vertical arm
    for y in (qy - 1..=ty - 1).step_by(2) {
        block2(set, grid, cx, y);
    }
    // horizontal arm
    for x in (qx..tx).step_by(2) {
        block2(set, grid, x, cy);
    }
}

fn lane_bars(set: &mut ObstacleSet, grid: GridSize) {
    let (qx, tx) = (grid.width / 4, grid.width * 3 / 4);
    let gap = grid.width / 2 - 1;
    for &y in &[grid.height / 4, grid.height * 5 / 8] {
        for x in (qx..tx).step_by(2) {
            if x != gap {
                block2(set, grid, x, y);
            }
        }
    }
}

fn triple_bars(set: &mut ObstacleSet, grid: GridSize) {
    let (qx, tx) = (grid.width / 4, grid.width * 3 / 4);
    let mid = grid.width / 2 - 1;
    let rows = [grid.height / 8, grid.height / 2 - 1, grid.height * 3 / 4];
    for (i, &y) in rows.iter().enumerate() {
        for x in (qx..tx).step_by(2) {
            // middle bar keeps its ends open, outer bars open in the middle
            let skip = if i == 1 { x == qx || x + 2 >= tx } else { x == mid };
            if !skip {
                block2(set, grid, x, y);
            }
        }
    }
}

fn spiral(set: &mut ObstacleSet, grid: GridSize) {
    let (w, h) = (grid.width, grid.height);
    let (left, right) = (w / 5, w * 3 / 4);
    let (top, bottom) = (h / 8, h * 5 / 8);
    let mid = h * 3 / 8;
    // outer wall, open on the left flank between `top` and `mid`
    for x in (left..right).step_by(2) {
        block2(set, grid, x, top);
    }
    for y in (top + 2..=bottom).step_by(2) {
        block2(set, grid, right - 1, y);
    }
    for x in (left..right - 1).step_by(2) {
        block2(set, grid, x, bottom);
    }
    for y in (mid..bottom).step_by(2) {
        block2(set, grid, left, y);
    }
    // inner arm curling toward the pocket
    for x in (left + 4..right - 1).step_by(2) {
        block2(set, grid, x, mid);
    }
}

fn flank_posts(set: &mut ObstacleSet, grid: GridSize) {
    // posts east of the spiral body
    let x = grid.width * 7 / 8;
    block2(set, grid, x, grid.height / 4);
    block2(set, grid, x, grid.height * 3 / 4);
}

/// Rectangular outline with door cells removed
fn box_outline(
    set: &mut ObstacleSet,
    grid: GridSize,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    doors: &[Cell],
) {
    for x in x0..=x1 {
        for y in [y0, y1] {
            if !doors.contains(&Cell::new(x, y)) {
                put(set, grid, x, y);
            }
        }
    }
    for y in y0 + 1..y1 {
        for x in [x0, x1] {
            if !doors.contains(&Cell::new(x, y)) {
                put(set, grid, x, y);
            }
        }
    }
}

fn nested_boxes(set: &mut ObstacleSet, grid: GridSize) {
    let (w, h) = (grid.width, grid.height);
    let (ox0, ox1) = (w / 5, w * 3 / 4);
    let (oy0, oy1) = (h / 5, h * 3 / 4);
    let (cx0, cx1) = (w / 2 - 1, w / 2);
    // outer box: doors in the middle of the top and bottom walls
    let outer_doors = [
        Cell::new(cx0, oy0),
        Cell::new(cx1, oy0),
        Cell::new(cx0, oy1),
        Cell::new(cx1, oy1),
    ];
    box_outline(set, grid, ox0, oy0, ox1, oy1, &outer_doors);
    // inner box: door on the left wall
    let (ix0, ix1) = (w * 7 / 20, w * 3 / 5);
    let (iy0, iy1) = (h * 3 / 8, h * 9 / 16);
    let inner_doors = [Cell::new(ix0, (iy0 + iy1) / 2), Cell::new(ix0, (iy0 + iy1) / 2 + 1)];
    box_outline(set, grid, ix0, iy0, ix1, iy1, &inner_doors);
}

fn chambers(set: &mut ObstacleSet, grid: GridSize) {
    let (w, h) = (grid.width, grid.height);
    let (cx, cy) = (w / 2, h / 2);
    wall_h(set, grid, cy, 0, w - 1, &[w / 4, w * 3 / 4]);
    wall_v(set, grid, cx, 0, h - 1, &[h / 4, h * 3 / 4]);
}

fn boxed_cross(set: &mut ObstacleSet, grid: GridSize) {
    let (w, h) = (grid.width, grid.height);
    let (x0, x1) = (w / 5, w * 3 / 4);
    let (y0, y1) = (h / 5, h * 3 / 4);
    let (cx0, cx1) = (w / 2 - 1, w / 2);
    let (cy0, cy1) = (h / 2 - 1, h / 2);
    // doors in the middle of all four walls
    let doors = [
        Cell::new(cx0, y0),
        Cell::new(cx1, y0),
        Cell::new(cx0, y1),
        Cell::new(cx1, y1),
        Cell::new(x0, cy0),
        Cell::new(x0, cy1),
        Cell::new(x1, cy0),
        Cell::new(x1, cy1),
    ];
    box_outline(set, grid, x0, y0, x1, y1, &doors);
    // compact plus in the middle, clear of the walls
    let cx = w / 2 - 1;
    let cy = h / 2 - 1;
    for y in (h * 5 / 16..=cy + 2).step_by(2) {
        block2(set, grid, cx, y);
    }
    block2(set, grid, cx - 2, cy);
    block2(set, grid, cx + 2, cy);
}

fn six_chambers(set: &mut ObstacleSet, grid: GridSize) {
    let (w, h) = (grid.width, grid.height);
    let cy = h / 2;
    wall_h(set, grid, cy, 0, w - 1, &[w / 6, w / 2, w * 5 / 6]);
    wall_v(set, grid, w * 3 / 10, 0, h - 1, &[h / 8, h * 3 / 4]);
    wall_v(set, grid, w * 13 / 20, 0, h - 1, &[h / 4, h * 7 / 8]);
}
