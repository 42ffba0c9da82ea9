//! Diamond captures
//!
//! A diamond is four cells: the token just placed, a far cell of the same
//! colour, and two near cells between them held by the other colour. When
//! a placement completes a diamond, both near tokens are removed.
//!
//! "Longways" diamonds have adjacent near cells and a far cell two steps
//! away; "sideways" diamonds have near cells two directions apart and a far
//! cell that is itself a neighbour. Every cell belongs to 6 + 6 diamonds.

use crate::board::{Board, Cell, Colour, UndoLog};
use crate::error::{EngineError, Result};
use crate::hex::{Coord, HEX_STEPS};

/// Offsets `[far, near, near]` relative to the placed token
pub type CapturePattern = [(i32, i32); 3];

/// All twelve diamonds around a cell: six longways, then six sideways
pub const CAPTURE_PATTERNS: [CapturePattern; 12] = build_patterns();

const fn build_patterns() -> [CapturePattern; 12] {
    let mut patterns = [[(0, 0); 3]; 12];
    let mut i = 0;
    while i < 6 {
        let near = HEX_STEPS[i];
        let adjacent = HEX_STEPS[(i + 5) % 6];
        let spaced = HEX_STEPS[(i + 4) % 6];
        patterns[i] = [(near.0 + adjacent.0, near.1 + adjacent.1), near, adjacent];
        patterns[i + 6] = [(near.0 + spaced.0, near.1 + spaced.1), near, spaced];
        i += 1;
    }
    patterns
}

/// Tokens that the token at `coord` captures, without touching the board
///
/// Overlapping diamonds may share a near cell; each captured cell appears
/// once, and the result is sorted.
pub fn find_captures(board: &Board, coord: Coord) -> Result<Vec<Coord>> {
    let capturer = board
        .get(coord)?
        .colour()
        .ok_or(EngineError::EmptyCell { row: coord.row, col: coord.col })?;
    let far_cell = Cell::from(capturer);
    let near_cell = Cell::from(capturer.opponent());
    let size = board.size();

    let mut captured = Vec::new();
    for pattern in CAPTURE_PATTERNS {
        let [far, a, b] = pattern.map(|delta| coord.offset(delta, size));
        let (Some(far), Some(a), Some(b)) = (far, a, b) else {
            continue;
        };
        if board.cell(far) == far_cell && board.cell(a) == near_cell && board.cell(b) == near_cell {
            captured.push(a);
            captured.push(b);
        }
    }

    captured.sort();
    captured.dedup();
    Ok(captured)
}

/// Remove everything the token at `coord` captures
///
/// All diamonds are checked before any token is removed.
pub fn apply_captures(board: &mut Board, coord: Coord) -> Result<Vec<Coord>> {
    let captured = find_captures(board, coord)?;
    for &c in &captured {
        board.put(c, Cell::Empty);
    }
    Ok(captured)
}

/// Place a token and resolve its captures
pub fn place(board: &mut Board, colour: Colour, coord: Coord) -> Result<Vec<Coord>> {
    board.set(coord, colour.into())?;
    apply_captures(board, coord)
}

/// As [`place`], also returning a log that undoes the placement and captures
pub fn place_recorded(
    board: &mut Board,
    colour: Colour,
    coord: Coord,
) -> Result<(Vec<Coord>, UndoLog)> {
    let mut log = UndoLog::new();
    log.set(board, coord, colour.into())?;

    let captured = match find_captures(board, coord) {
        Ok(captured) => captured,
        Err(e) => {
            log.revert(board);
            return Err(e);
        }
    };
    for &c in &captured {
        log.set(board, c, Cell::Empty)?;
    }
    Ok((captured, log))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::{hex_distance, DIRECTIONS};

    fn board_with(size: usize, cells: &[(usize, usize, Cell)]) -> Board {
        let mut board = Board::new(size).unwrap();
        for &(row, col, cell) in cells {
            board.set(Coord::new(row, col), cell).unwrap();
        }
        board
    }

    #[test]
    fn test_pattern_geometry() {
        let centre = Coord::new(5, 5);
        for (i, [far, a, b]) in CAPTURE_PATTERNS.iter().enumerate() {
            assert!(DIRECTIONS.contains(a) && DIRECTIONS.contains(b));
            assert_eq!(*far, (a.0 + b.0, a.1 + b.1));

            let far = centre.offset(*far, 11).unwrap();
            let expected = if i < 6 { 2 } else { 1 };
            assert_eq!(hex_distance(centre, far), expected);
        }

        let mut unique = CAPTURE_PATTERNS.to_vec();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 12);
    }

    #[test]
    fn test_longways_capture() {
        let mut board = board_with(
            5,
            &[(2, 2, Cell::Blue), (2, 1, Cell::Blue), (3, 1, Cell::Red), (0, 0, Cell::Blue)],
        );
        let captured = place(&mut board, Colour::Red, Coord::new(1, 2)).unwrap();
        assert_eq!(captured, vec![Coord::new(2, 1), Coord::new(2, 2)]);
        assert_eq!(board.get(Coord::new(2, 1)).unwrap(), Cell::Empty);
        assert_eq!(board.get(Coord::new(2, 2)).unwrap(), Cell::Empty);
        assert_eq!(board.get(Coord::new(3, 1)).unwrap(), Cell::Red);
        assert_eq!(board.get(Coord::new(1, 2)).unwrap(), Cell::Red);
        // Unrelated token survives
        assert_eq!(board.get(Coord::new(0, 0)).unwrap(), Cell::Blue);
        assert_eq!(board.count(Colour::Blue), 1);
    }

    #[test]
    fn test_sideways_capture() {
        let mut board = board_with(
            5,
            &[(2, 3, Cell::Red), (3, 1, Cell::Red), (3, 2, Cell::Blue)],
        );
        let captured = place(&mut board, Colour::Blue, Coord::new(2, 2)).unwrap();
        assert_eq!(captured, vec![Coord::new(2, 3), Coord::new(3, 1)]);
        assert_eq!(board.count(Colour::Red), 0);
    }

    #[test]
    fn test_no_capture_without_far_token() {
        let mut board = board_with(5, &[(2, 2, Cell::Blue), (2, 1, Cell::Blue)]);
        assert!(place(&mut board, Colour::Red, Coord::new(1, 2)).unwrap().is_empty());

        // Far cell held by the wrong colour
        let mut board = board_with(
            5,
            &[(2, 2, Cell::Blue), (2, 1, Cell::Blue), (3, 1, Cell::Blue)],
        );
        assert!(place(&mut board, Colour::Red, Coord::new(1, 2)).unwrap().is_empty());
        assert_eq!(board.count(Colour::Blue), 3);
    }

    #[test]
    fn test_own_tokens_never_captured() {
        let mut board = board_with(
            5,
            &[(2, 2, Cell::Red), (2, 1, Cell::Red), (3, 1, Cell::Red)],
        );
        assert!(place(&mut board, Colour::Red, Coord::new(1, 2)).unwrap().is_empty());
    }

    #[test]
    fn test_overlapping_diamonds_share_a_cell() {
        // Two longways diamonds through (3, 2); removing it early would
        // hide the second one
        let mut board = board_with(
            5,
            &[
                (3, 1, Cell::Blue),
                (3, 2, Cell::Blue),
                (2, 3, Cell::Blue),
                (4, 1, Cell::Red),
                (3, 3, Cell::Red),
            ],
        );
        let captured = place(&mut board, Colour::Red, Coord::new(2, 2)).unwrap();
        assert_eq!(
            captured,
            vec![Coord::new(2, 3), Coord::new(3, 1), Coord::new(3, 2)]
        );
        assert_eq!(board.count(Colour::Blue), 0);
    }

    #[test]
    fn test_capture_at_corner() {
        let mut board = board_with(
            3,
            &[(0, 1, Cell::Blue), (1, 0, Cell::Blue), (1, 1, Cell::Red)],
        );
        let captured = place(&mut board, Colour::Red, Coord::new(0, 0)).unwrap();
        assert_eq!(captured, vec![Coord::new(0, 1), Coord::new(1, 0)]);
    }

    #[test]
    fn test_apply_captures_idempotent() {
        let mut board = board_with(
            5,
            &[(2, 2, Cell::Blue), (2, 1, Cell::Blue), (3, 1, Cell::Red), (1, 2, Cell::Red)],
        );
        let first = apply_captures(&mut board, Coord::new(1, 2)).unwrap();
        assert_eq!(first.len(), 2);
        let second = apply_captures(&mut board, Coord::new(1, 2)).unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn test_apply_captures_on_empty_cell() {
        let mut board = Board::new(3).unwrap();
        assert_eq!(
            apply_captures(&mut board, Coord::new(1, 1)),
            Err(EngineError::EmptyCell { row: 1, col: 1 })
        );
        assert!(matches!(
            apply_captures(&mut board, Coord::new(3, 1)),
            Err(EngineError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_place_out_of_bounds() {
        let mut board = Board::new(3).unwrap();
        assert!(place(&mut board, Colour::Red, Coord::new(0, 3)).is_err());
        assert_eq!(board, Board::new(3).unwrap());
    }

    #[test]
    fn test_place_recorded_reverts_exactly() {
        let mut board = board_with(
            5,
            &[
                (3, 1, Cell::Blue),
                (3, 2, Cell::Blue),
                (2, 3, Cell::Blue),
                (4, 1, Cell::Red),
                (3, 3, Cell::Red),
            ],
        );
        let original = board.clone();

        let (captured, log) = place_recorded(&mut board, Colour::Red, Coord::new(2, 2)).unwrap();
        assert_eq!(captured.len(), 3);
        assert_eq!(log.len(), 4);
        assert_eq!(board.count(Colour::Blue), 0);

        log.revert(&mut board);
        assert_eq!(board, original);
    }
}
