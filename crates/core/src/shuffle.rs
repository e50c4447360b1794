//! Deadlock breaking - shuffle the existing tokens, then resolve
//!
//! A shuffle round permutes the tokens already on the grid across the positions that
//! currently hold tokens (empty cells stay where they are), so the count of every kind is
//! unchanged until the follow-up cascade clears whatever matches the permutation created.
//!
//! [`shuffle_and_resolve`] performs exactly one round. [`settle`] is the caller-side loop
//! that repeats rounds until the grid has a move.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, instrument, warn};

use crate::error::EngineError;
use crate::grid::Grid;
use crate::moves::has_possible_move;
use crate::resolve::{resolve_with_limit, Resolution};
use crate::types::{Cell, Position};

/// Randomly redistribute the tokens over the positions that hold tokens.
pub fn shuffle_tokens<R>(grid: &Grid, rng: &mut R) -> Grid
where
    R: Rng + ?Sized,
{
    let occupied: Vec<Position> = grid
        .positions()
        .filter(|&p| grid.cell(p).is_some())
        .collect();
    let mut tokens: Vec<Cell> = occupied.iter().map(|&p| grid.cell(p)).collect();
    tokens.shuffle(rng);

    let mut next = grid.clone();
    for (pos, cell) in occupied.into_iter().zip(tokens) {
        next.set(pos, cell);
    }
    next
}

/// One shuffle round: permute, then run the cascade on the result.
pub fn shuffle_and_resolve<R>(grid: &Grid, palette_size: u8, rng: &mut R) -> Resolution
where
    R: Rng + ?Sized,
{
    let shuffled = shuffle_tokens(grid, rng);
    crate::resolve::resolve(&shuffled, palette_size, rng)
}

/// Totals from a run of shuffle rounds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled {
    /// Grid with at least one move available
    pub grid: Grid,
    /// Tiles cleared by the cascades of every round
    pub cleared: usize,
    /// Number of shuffle rounds performed (0 if the grid already had a move)
    pub rounds: u32,
}

/// Shuffle until the grid has a move.
///
/// `max_rounds` caps the number of shuffle rounds and `max_cascades` caps each round's
/// cascade; `None` means unbounded. A grid that can never have a move (for example one
/// with fewer than three tokens) only terminates under a round cap.
#[instrument(level = "debug", skip_all, fields(rows = grid.rows(), cols = grid.cols()))]
pub fn settle<R>(
    grid: &Grid,
    palette_size: u8,
    max_rounds: Option<u32>,
    max_cascades: Option<u32>,
    rng: &mut R,
) -> Result<Settled, EngineError>
where
    R: Rng + ?Sized,
{
    let mut current = grid.clone();
    let mut cleared = 0;
    let mut rounds = 0u32;

    while !has_possible_move(&current) {
        if let Some(limit) = max_rounds {
            if rounds >= limit {
                warn!(limit, "shuffle budget exhausted");
                return Err(EngineError::ShuffleLimit { limit });
            }
        }

        let shuffled = shuffle_tokens(&current, rng);
        let res = resolve_with_limit(&shuffled, palette_size, max_cascades, rng)?;
        rounds += 1;
        cleared += res.cleared;
        debug!(round = rounds, cleared = res.cleared, "shuffle round");
        current = res.grid;
    }

    Ok(Settled {
        grid: current,
        cleared,
        rounds,
    })
}
