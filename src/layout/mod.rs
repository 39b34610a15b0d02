//! Layout Engine
//! Deterministic 2-D placement of graph nodes in a normalized 0-100 space

use serde::{Deserialize, Serialize};


/// A position in the normalized coordinate space (percent of container).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Largest node count laid out on the ellipse; bigger graphs fall back to a grid.
pub const CIRCLE_MAX: usize = 8;

const CENTER_X: f32 = 50.0;
const CENTER_Y: f32 = 50.0;
const RADIUS_X: f32 = 34.0;
const RADIUS_Y: f32 = 32.0;

const GRID_PAD: f32 = 14.0;
const GRID_SPAN: f32 = 72.0;

/// Compute positions for `count` nodes, in input order.
///
/// Up to [`CIRCLE_MAX`] nodes sit on an ellipse (index 0 at the top,
/// proceeding clockwise); larger graphs use a near-square grid. The result
/// depends only on `count`, so the same ordered input always lays out
/// identically. Positions are recomputed from scratch on every snapshot.
pub fn layout_positions(count: usize) -> Vec<Position> {
    if count == 0 {
        return Vec::new();
    }
    if count <= CIRCLE_MAX {
        circular_positions(count)
    } else {
        grid_positions(count)
    }
}

fn circular_positions(count: usize) -> Vec<Position> {
    (0..count)
        .map(|i| {
            let angle = (i as f32 / count as f32) * std::f32::consts::TAU
                - std::f32::consts::FRAC_PI_2;
            Position::new(
                CENTER_X + RADIUS_X * angle.cos(),
                CENTER_Y + RADIUS_Y * angle.sin(),
            )
        })
        .collect()
}

fn grid_positions(count: usize) -> Vec<Position> {
    let cols = (count as f32).sqrt().ceil() as usize;
    let rows = count.div_ceil(cols);

    (0..count)
        .map(|i| {
            let col = i % cols;
            let row = i / cols;
            Position::new(grid_axis(col, cols), grid_axis(row, rows))
        })
        .collect()
}

/// Spread `cells` slots across the padded span; a single slot is centered.
fn grid_axis(index: usize, cells: usize) -> f32 {
    if cells <= 1 {
        50.0
    } else {
        GRID_PAD + (index as f32 / (cells - 1) as f32) * GRID_SPAN
    }
}
