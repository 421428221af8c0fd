//! Brick mosaic laid over the hero image: 40 bricks on a 12x10 stud grid,
//! assembled bottom-up, left to right.

use serde::Serialize;

pub const GRID_COLS: u8 = 12;
pub const GRID_ROWS: u8 = 10;
/// Seconds between consecutive grid cells in the build animation.
pub const BUILD_STEP_SECS: f64 = 0.06;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brick {
    pub x: u8,
    pub y: u8,
    pub w: u8,
}

const fn brick(x: u8, y: u8, w: u8) -> Brick {
    Brick { x, y, w }
}

#[rustfmt::skip]
pub const BRICKS: [Brick; 40] = [
    brick(0, 0, 3), brick(3, 0, 2), brick(5, 0, 4), brick(9, 0, 3),
    brick(0, 1, 2), brick(2, 1, 4), brick(6, 1, 3), brick(9, 1, 3),
    brick(0, 2, 4), brick(4, 2, 2), brick(6, 2, 4), brick(10, 2, 2),
    brick(0, 3, 3), brick(3, 3, 3), brick(6, 3, 2), brick(8, 3, 4),
    brick(0, 4, 2), brick(2, 4, 4), brick(6, 4, 3), brick(9, 4, 3),
    brick(0, 5, 4), brick(4, 5, 3), brick(7, 5, 2), brick(9, 5, 3),
    brick(0, 6, 3), brick(3, 6, 2), brick(5, 6, 4), brick(9, 6, 3),
    brick(0, 7, 2), brick(2, 7, 3), brick(5, 7, 3), brick(8, 7, 4),
    brick(0, 8, 4), brick(4, 8, 2), brick(6, 8, 3), brick(9, 8, 3),
    brick(0, 9, 3), brick(3, 9, 4), brick(7, 9, 2), brick(9, 9, 3),
];

/// Placement of one brick tile, in percent of the mosaic box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TileStyle {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub stud_count: u8,
    pub animation_delay_secs: f64,
}

impl TileStyle {
    /// Inline CSS declarations for the tile element.
    pub fn to_css(&self) -> String {
        format!(
            "left: {}%; top: {}%; width: {}%; height: {}%; --stud-count: {}; animation-delay: {}s;",
            self.left,
            self.top,
            self.width,
            self.height,
            self.stud_count,
            self.animation_delay_secs
        )
    }
}

pub fn brick_count() -> usize {
    BRICKS.len()
}

/// Build position of a brick: bottom row first, left to right.
pub fn build_order(brick: Brick) -> u32 {
    u32::from(GRID_ROWS - 1 - brick.y) * u32::from(GRID_COLS) + u32::from(brick.x)
}

/// Style for the 1-based tile `index`; `None` hides the tile.
pub fn tile_style(index: usize) -> Option<TileStyle> {
    let brick = *BRICKS.get(index.checked_sub(1)?)?;
    let cols = f64::from(GRID_COLS);
    let rows = f64::from(GRID_ROWS);
    Some(TileStyle {
        left: f64::from(brick.x) / cols * 100.0,
        top: f64::from(brick.y) / rows * 100.0,
        width: f64::from(brick.w) / cols * 100.0,
        height: 100.0 / rows,
        stud_count: brick.w,
        animation_delay_secs: f64::from(build_order(brick)) * BUILD_STEP_SECS,
    })
}
