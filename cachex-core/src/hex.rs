//! Hex geometry for the rhombus board
//!
//! Cells are addressed by `(row, col)`. The board is an axial layout: the
//! column is the cube `x` axis and the row the cube `z` axis, so the six
//! neighbour deltas below are exactly the unit cube steps.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Neighbour deltas `(d_row, d_col)`
pub const DIRECTIONS: [(i32, i32); 6] = [
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
];

/// The same deltas in clockwise order, starting from the lower-left neighbour
pub const HEX_STEPS: [(i32, i32); 6] = [
    (1, -1),
    (1, 0),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (0, -1),
];

/// Board coordinate
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Check if this cell is on a board of the given size
    pub fn is_valid(&self, size: usize) -> bool {
        self.row < size && self.col < size
    }

    /// Cell displaced by `(d_row, d_col)`, if it stays on the board
    pub fn offset(&self, delta: (i32, i32), size: usize) -> Option<Coord> {
        let row = self.row as i64 + delta.0 as i64;
        let col = self.col as i64 + delta.1 as i64;
        if row < 0 || col < 0 || row >= size as i64 || col >= size as i64 {
            return None;
        }
        Some(Coord::new(row as usize, col as usize))
    }

    /// Mirror image across the main diagonal, used by the steal rule
    pub fn reflected(&self) -> Coord {
        Coord::new(self.col, self.row)
    }

    /// Distance between two cells
    pub fn distance_to(&self, other: Coord) -> u32 {
        hex_distance(*self, other)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Convert a board coordinate to cube coordinates `(x, y, z)`
pub fn offset_to_cube(coord: Coord) -> (i32, i32, i32) {
    let x = coord.col as i32;
    let z = coord.row as i32;
    (x, -x - z, z)
}

/// Convert cube coordinates back to a board coordinate
pub fn cube_to_offset(cube: (i32, i32, i32), size: usize) -> Result<Coord> {
    let (x, _, z) = cube;
    let out_of_bounds = EngineError::OutOfBounds { row: z, col: x, size };
    if x < 0 || z < 0 {
        return Err(out_of_bounds);
    }
    let coord = Coord::new(z as usize, x as usize);
    if !coord.is_valid(size) {
        return Err(out_of_bounds);
    }
    Ok(coord)
}

/// Minimum number of steps between two cells
pub fn hex_distance(a: Coord, b: Coord) -> u32 {
    let (ax, ay, az) = offset_to_cube(a);
    let (bx, by, bz) = offset_to_cube(b);
    ((ax - bx).unsigned_abs() + (ay - by).unsigned_abs() + (az - bz).unsigned_abs()) / 2
}

/// On-board neighbours of a cell
pub fn neighbours(coord: Coord, size: usize) -> Result<Vec<Coord>> {
    check_bounds(coord, size)?;
    Ok(adjacent(coord, size).collect())
}

pub(crate) fn adjacent(coord: Coord, size: usize) -> impl Iterator<Item = Coord> {
    DIRECTIONS
        .iter()
        .filter_map(move |&delta| coord.offset(delta, size))
}

pub(crate) fn check_bounds(coord: Coord, size: usize) -> Result<()> {
    if coord.is_valid(size) {
        Ok(())
    } else {
        Err(EngineError::OutOfBounds {
            row: coord.row as i32,
            col: coord.col as i32,
            size,
        })
    }
}
