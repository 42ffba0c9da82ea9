//! Connection cost search
//!
//! Red links row 0 to row n-1, Blue links column 0 to column n-1. The cost
//! of a route is the number of cells on it the colour does not yet own,
//! i.e. how many placements it still needs.

use crate::board::{Board, Cell, Colour};
use crate::error::Result;
use crate::hex::{adjacent, check_bounds, hex_distance, Coord};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::trace;

/// Empty cells a colour still needs along one route, start edge first
pub type ConnectionPath = Vec<Coord>;

/// Cost reported when no route exists; larger than any real cost
pub fn no_connection_cost(size: usize) -> u32 {
    let side = u32::try_from(size).unwrap_or(u32::MAX);
    side.saturating_mul(side).saturating_add(1)
}

/// All minimum-cost routes for a colour
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestConnection {
    pub paths: Vec<ConnectionPath>,
    pub cost: u32,
}

impl BestConnection {
    pub fn is_connected(&self) -> bool {
        !self.paths.is_empty()
    }
}

/// Cost and predecessor maps left behind by one search
#[derive(Clone, Debug)]
pub struct Search {
    pub start: Coord,
    pub goal: Coord,
    pub costs: FxHashMap<Coord, u32>,
    pub previous: FxHashMap<Coord, Option<Coord>>,
}

impl Search {
    /// Final cost at the goal, or `None` when it was never reached
    pub fn goal_cost(&self) -> Option<u32> {
        self.costs.get(&self.goal).copied()
    }
}

// ============================================================================
// SINGLE PAIR SEARCH
// ============================================================================

/// Best-first search from `start` to `goal` for `colour`
pub fn search_one(board: &Board, start: Coord, goal: Coord, colour: Colour) -> Result<Search> {
    check_bounds(start, board.size())?;
    check_bounds(goal, board.size())?;
    Ok(run_search(board, start, goal, colour))
}

fn run_search(board: &Board, start: Coord, goal: Coord, colour: Colour) -> Search {
    let size = board.size();
    let own = Cell::from(colour);
    let blocked = Cell::from(colour.opponent());

    // Hop distance overcounts once own tokens can be crossed for free, so
    // discount by how many exist to keep the estimate a lower bound.
    let free_cells = board.count(colour) as u32;
    let estimate = |c: Coord| hex_distance(c, goal).saturating_sub(free_cells);

    let mut costs: FxHashMap<Coord, u32> = FxHashMap::default();
    let mut previous: FxHashMap<Coord, Option<Coord>> = FxHashMap::default();

    if board.cell(start) == blocked {
        return Search { start, goal, costs, previous };
    }

    // The goal's own placement is charged up front; every other cell is
    // charged when the route leaves it.
    let initial = if board.cell(goal) == own { 0 } else { 1 };
    costs.insert(start, initial);
    previous.insert(start, None);

    // (priority, insertion order, cost at push, cell): equal priorities pop FIFO
    let mut queue: BinaryHeap<Reverse<(u32, u64, u32, Coord)>> = BinaryHeap::new();
    let mut sequence: u64 = 0;
    queue.push(Reverse((initial + estimate(start), sequence, initial, start)));

    while let Some(Reverse((_, _, pushed_cost, current))) = queue.pop() {
        let cost = costs[&current];
        if pushed_cost > cost {
            continue;
        }
        if current == goal {
            break;
        }

        let step = if board.cell(current) == own { 0 } else { 1 };
        let next_cost = cost + step;

        for next in adjacent(current, size) {
            if board.cell(next) == blocked {
                continue;
            }
            if costs.get(&next).map_or(true, |&known| next_cost < known) {
                costs.insert(next, next_cost);
                previous.insert(next, Some(current));
                sequence += 1;
                queue.push(Reverse((next_cost + estimate(next), sequence, next_cost, next)));
            }
        }
    }

    Search { start, goal, costs, previous }
}

/// Walk predecessors back from the goal, keeping only cells still empty
pub fn build_path(search: &Search, board: &Board) -> Option<ConnectionPath> {
    if !search.previous.contains_key(&search.goal) {
        return None;
    }

    let mut path = Vec::new();
    let mut current = Some(search.goal);
    while let Some(node) = current {
        if board.cell(node).is_empty() {
            path.push(node);
        }
        current = search.previous.get(&node).copied().flatten();
    }
    path.reverse();
    Some(path)
}

// ============================================================================
// EDGE TO EDGE SWEEP
// ============================================================================

/// Start and goal anchors for every pairing of the colour's two edges
fn edge_pairs(size: usize, colour: Colour) -> impl Iterator<Item = (Coord, Coord)> {
    (0..size).flat_map(move |x| {
        (0..size).map(move |y| match colour {
            Colour::Red => (Coord::new(0, x), Coord::new(size - 1, y)),
            Colour::Blue => (Coord::new(x, 0), Coord::new(y, size - 1)),
        })
    })
}

/// Cheapest edge-to-edge connections for a colour
///
/// Every distinct route at the minimum cost is kept. With no route at all
/// the path list is empty and the cost is [`no_connection_cost`].
pub fn best_connection(board: &Board, colour: Colour) -> BestConnection {
    let blocked = Cell::from(colour.opponent());
    let mut best = BestConnection {
        paths: Vec::new(),
        cost: no_connection_cost(board.size()),
    };

    for (start, goal) in edge_pairs(board.size(), colour) {
        if board.cell(start) == blocked || board.cell(goal) == blocked {
            continue;
        }

        let search = run_search(board, start, goal, colour);
        let Some(cost) = search.goal_cost() else {
            continue;
        };
        trace!(%colour, %start, %goal, cost, "pair searched");

        if cost > best.cost {
            continue;
        }
        let Some(path) = build_path(&search, board) else {
            continue;
        };
        if cost < best.cost {
            best.cost = cost;
            best.paths.clear();
        }
        if !best.paths.contains(&path) {
            best.paths.push(path);
        }
    }

    best
}

/// Union of every cell on any of the given paths, sorted
pub fn path_aggregator(paths: &[ConnectionPath]) -> Vec<Coord> {
    let mut cells: Vec<Coord> = paths.iter().flatten().copied().collect();
    cells.sort();
    cells.dedup();
    cells
}

/// Colour that already owns a complete edge-to-edge chain
pub fn winner(board: &Board) -> Option<Colour> {
    [Colour::Red, Colour::Blue].into_iter().find(|&colour| {
        let best = best_connection(board, colour);
        best.is_connected() && best.cost == 0
    })
}
