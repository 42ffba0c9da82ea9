//! One-ply blocking move evaluation
//!
//! Candidates are the cells on the mover's own best connections. Each is
//! scored by how much placing there (captures included) raises the
//! opponent's best connection cost.

use crate::board::{Board, Colour};
use crate::capture::place_recorded;
use crate::error::Result;
use crate::hex::Coord;
use crate::path::{best_connection, path_aggregator};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Effect of one candidate placement on the opponent
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveScore {
    pub coord: Coord,
    /// Opponent cost after the placement minus cost before it
    pub score: i64,
}

/// Score every candidate placement for `colour`
///
/// The board is mutated while each candidate is simulated and restored
/// before the next one; on return it is exactly as it was passed in.
pub fn score_blocking_moves(board: &mut Board, colour: Colour) -> Result<Vec<MoveScore>> {
    let own = best_connection(board, colour);
    let candidates = path_aggregator(&own.paths);
    let opponent = colour.opponent();
    let before = best_connection(board, opponent).cost as i64;

    let mut scores = Vec::with_capacity(candidates.len());
    for coord in candidates {
        let (captured, log) = place_recorded(board, colour, coord)?;
        let after = best_connection(board, opponent).cost as i64;
        log.revert(board);

        debug!(%colour, %coord, before, after, captures = captured.len(), "candidate scored");
        scores.push(MoveScore { coord, score: after - before });
    }

    Ok(scores)
}

/// Candidates that raise the opponent's cost the most; ties are all kept
pub fn best_blocking_moves(board: &mut Board, colour: Colour) -> Result<Vec<Coord>> {
    let scores = score_blocking_moves(board, colour)?;
    Ok(top_scoring(&scores))
}

/// Coordinates of every score equal to the maximum
pub fn top_scoring(scores: &[MoveScore]) -> Vec<Coord> {
    let Some(max) = scores.iter().map(|s| s.score).max() else {
        return Vec::new();
    };
    scores
        .iter()
        .filter(|s| s.score == max)
        .map(|s| s.coord)
        .collect()
}
