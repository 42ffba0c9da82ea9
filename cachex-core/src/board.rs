//! Board state, colours, and the undo log used for simulated placements

use crate::error::{EngineError, Result};
use crate::hex::{check_bounds, Coord};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

// ============================================================================
// COLOURS AND CELLS
// ============================================================================

/// Player colour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colour {
    Red,
    Blue,
}

impl Colour {
    pub fn opponent(self) -> Self {
        match self {
            Colour::Red => Colour::Blue,
            Colour::Blue => Colour::Red,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Colour::Red => "red",
            Colour::Blue => "blue",
        }
    }
}

impl std::fmt::Display for Colour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Colour {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "r" | "red" => Ok(Colour::Red),
            "b" | "blue" => Ok(Colour::Blue),
            other => Err(format!("unknown colour: {}", other)),
        }
    }
}

/// Contents of a single cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    #[default]
    Empty,
    Red,
    Blue,
}

impl Cell {
    pub fn colour(self) -> Option<Colour> {
        match self {
            Cell::Empty => None,
            Cell::Red => Some(Colour::Red),
            Cell::Blue => Some(Colour::Blue),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Red => 'R',
            Cell::Blue => 'B',
        }
    }
}

impl From<Colour> for Cell {
    fn from(colour: Colour) -> Self {
        match colour {
            Colour::Red => Cell::Red,
            Colour::Blue => Cell::Blue,
        }
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Largest accepted side length; keeps `size * size + 1` within `u32`
pub const MAX_BOARD_SIZE: usize = 255;

/// Square board of `size * size` cells, stored row-major
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 || size > MAX_BOARD_SIZE {
            return Err(EngineError::InvalidSize(size));
        }
        Ok(Self {
            size,
            cells: vec![Cell::Empty; size * size],
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, coord: Coord) -> Result<Cell> {
        check_bounds(coord, self.size)?;
        Ok(self.cell(coord))
    }

    pub fn set(&mut self, coord: Coord, cell: Cell) -> Result<()> {
        check_bounds(coord, self.size)?;
        self.put(coord, cell);
        Ok(())
    }

    /// Unchecked read for coordinates already known to be on the board
    pub(crate) fn cell(&self, coord: Coord) -> Cell {
        self.cells[coord.row * self.size + coord.col]
    }

    pub(crate) fn put(&mut self, coord: Coord, cell: Cell) {
        self.cells[coord.row * self.size + coord.col] = cell;
    }

    /// Every coordinate in row-major order
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| Coord::new(row, col)))
    }

    /// Coordinates of every token of one colour
    pub fn tokens(&self, colour: Colour) -> Vec<Coord> {
        let cell = Cell::from(colour);
        self.coords().filter(|&c| self.cell(c) == cell).collect()
    }

    pub fn count(&self, colour: Colour) -> usize {
        let cell = Cell::from(colour);
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    pub fn empty_cells(&self) -> Vec<Coord> {
        self.coords().filter(|&c| self.cell(c).is_empty()).collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    // ========================================================================
    // JSON
    // ========================================================================

    /// Parse the `{"n": 5, "board": [["b", 1, 2], ...]}` document format
    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let doc: BoardDocument = serde_json::from_str(content)?;
        let mut board = Board::new(doc.n)?;
        for (colour, row, col) in doc.board {
            let colour = Colour::from_str(&colour).map_err(|e| anyhow::anyhow!(e))?;
            board.set(Coord::new(row, col), colour.into())?;
        }
        Ok(board)
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serialize in the same document format `from_json` reads
    pub fn to_json(&self) -> anyhow::Result<String> {
        let board = self
            .coords()
            .filter_map(|c| {
                self.cell(c)
                    .colour()
                    .map(|colour| (colour.name()[..1].to_string(), c.row, c.col))
            })
            .collect();
        let doc = BoardDocument { n: self.size, board };
        Ok(serde_json::to_string_pretty(&doc)?)
    }
}

#[derive(Serialize, Deserialize)]
struct BoardDocument {
    n: usize,
    board: Vec<(String, usize, usize)>,
}

/// Rows are drawn top to bottom and shifted right so the rhombus reads naturally
impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in (0..self.size).rev() {
            write!(f, "{:width$}", "", width = row)?;
            for col in 0..self.size {
                write!(f, "{} ", self.cell(Coord::new(row, col)).symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ============================================================================
// UNDO LOG
// ============================================================================

/// Record of cell changes, replayed in reverse to restore a board exactly
#[derive(Clone, Debug, Default)]
pub struct UndoLog {
    changes: Vec<(Coord, Cell)>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a cell, remembering what was there
    pub fn set(&mut self, board: &mut Board, coord: Coord, cell: Cell) -> Result<()> {
        let prior = board.get(coord)?;
        self.changes.push((coord, prior));
        board.put(coord, cell);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Undo every recorded change, most recent first
    pub fn revert(self, board: &mut Board) {
        for (coord, prior) in self.changes.into_iter().rev() {
            board.put(coord, prior);
        }
    }
}
