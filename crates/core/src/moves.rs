//! Move analysis - is there any swap that would produce a match?
//!
//! A move is an exchange of two orthogonally adjacent, non-empty cells that leaves at
//! least one match on the grid. Every unordered pair is tried once (each cell against its
//! right and lower neighbor) on a private scratch copy, so the caller's grid is never
//! touched. A grid without any move is deadlocked and needs a shuffle.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::detect::has_match;
use crate::grid::Grid;
use crate::types::Position;

/// An exchange of two adjacent cells, stored with `a < b` in row-major order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Swap {
    pub a: Position,
    pub b: Position,
}

impl Swap {
    /// Build a swap between two positions; `None` unless they are orthogonal neighbors.
    pub fn new(a: Position, b: Position) -> Option<Self> {
        if !a.is_adjacent(b) {
            return None;
        }
        Some(if a < b { Self { a, b } } else { Self { a: b, b: a } })
    }

    /// The grid that results from performing this swap
    ///
    /// # Panics
    ///
    /// Panics if either position is outside the grid.
    pub fn apply(&self, grid: &Grid) -> Grid {
        grid.swapped(self.a, self.b)
    }
}

/// Right and lower neighbors that exist on the grid
fn forward_neighbors(grid: &Grid, pos: Position) -> ArrayVec<Position, 2> {
    let mut out = ArrayVec::new();
    if pos.col + 1 < grid.cols() {
        out.push(Position::new(pos.row, pos.col + 1));
    }
    if pos.row + 1 < grid.rows() {
        out.push(Position::new(pos.row + 1, pos.col));
    }
    out
}

/// Every adjacent pair of non-empty cells, each unordered pair once, row-major
fn candidate_swaps(grid: &Grid) -> impl Iterator<Item = Swap> + '_ {
    grid.positions()
        .filter(move |&p| grid.cell(p).is_some())
        .flat_map(move |p| {
            forward_neighbors(grid, p)
                .into_iter()
                .filter(move |&q| grid.cell(q).is_some())
                .map(move |q| Swap { a: p, b: q })
        })
}

/// True if performing `swap` on `grid` leaves at least one match
pub fn is_productive(grid: &Grid, swap: Swap) -> bool {
    has_match(&swap.apply(grid))
}

/// First productive swap in row-major order, if any (a "hint")
pub fn find_move(grid: &Grid) -> Option<Swap> {
    let mut scratch = grid.clone();
    candidate_swaps(grid).find(|swap| {
        scratch.swap_cells(swap.a, swap.b);
        let found = has_match(&scratch);
        scratch.swap_cells(swap.a, swap.b);
        found
    })
}

/// Every productive swap, in row-major order
pub fn possible_moves(grid: &Grid) -> Vec<Swap> {
    let mut scratch = grid.clone();
    candidate_swaps(grid)
        .filter(|swap| {
            scratch.swap_cells(swap.a, swap.b);
            let found = has_match(&scratch);
            scratch.swap_cells(swap.a, swap.b);
            found
        })
        .collect()
}

/// True unless the grid is deadlocked
pub fn has_possible_move(grid: &Grid) -> bool {
    find_move(grid).is_some()
}
