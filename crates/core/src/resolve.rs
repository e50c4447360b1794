//! Cascade resolution - clear, gravity, refill, repeat until stable
//!
//! Each iteration of the cascade:
//! 1. finds every matched cell ([`find_matches`]),
//! 2. empties them ([`clear`]),
//! 3. compacts every column downward ([`apply_gravity`]),
//! 4. refills the vacated top cells with uniform draws from the palette ([`refill`]).
//!
//! Refills are not checked for matches; anything they create is caught by the next
//! iteration. The loop ends on the first grid with no matches, so a resolved grid is
//! always a fixed point of the detector.

use rand::Rng;
use tracing::{debug, instrument, warn};

use crate::detect::{find_matches, has_match, MatchSet};
use crate::error::EngineError;
use crate::grid::Grid;
use crate::types::TokenKind;

/// Outcome of a cascade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Stable grid with no matches left
    pub grid: Grid,
    /// Tiles cleared across every iteration
    pub cleared: usize,
    /// Number of clear/gravity/refill iterations performed
    pub cascades: u32,
}

/// A copy of `grid` with every matched position emptied
pub fn clear(grid: &Grid, matches: &MatchSet) -> Grid {
    let mut next = grid.clone();
    for &pos in matches {
        next.set(pos, None);
    }
    next
}

/// Compact every column downward, keeping the top-to-bottom order of its tokens.
/// Empty cells end up at the top of their column.
pub fn apply_gravity(grid: &Grid) -> Grid {
    let mut next = grid.clone();
    let (rows, cols) = (grid.rows(), grid.cols());
    let cells = next.cells_mut();

    for col in 0..cols {
        // Two-pointer pass from the bottom: `write` is the lowest row not yet filled
        let mut write = rows;
        for read in (0..rows).rev() {
            let src = read * cols + col;
            if cells[src].is_some() {
                write -= 1;
                let dst = write * cols + col;
                if dst != src {
                    cells[dst] = cells[src].take();
                }
            }
        }
        for row in 0..write {
            cells[row * cols + col] = None;
        }
    }

    next
}

/// Fill every empty cell with an independent uniform draw from `0..palette_size`.
///
/// # Panics
///
/// Panics if `palette_size` is zero and the grid has an empty cell.
pub fn refill<R>(grid: &Grid, palette_size: u8, rng: &mut R) -> Grid
where
    R: Rng + ?Sized,
{
    let mut next = grid.clone();
    for cell in next.cells_mut().iter_mut().filter(|c| c.is_none()) {
        *cell = Some(TokenKind::new(rng.gen_range(0..palette_size)));
    }
    next
}

/// One clear/gravity/refill iteration, or `None` if the grid is already stable
fn cascade_step<R>(grid: &Grid, palette_size: u8, rng: &mut R) -> Option<(Grid, usize)>
where
    R: Rng + ?Sized,
{
    let matches = find_matches(grid);
    if matches.is_empty() {
        return None;
    }

    let cleared = matches.len();
    let next = refill(&apply_gravity(&clear(grid, &matches)), palette_size, rng);
    Some((next, cleared))
}

/// Step the cascade until the grid is stable or `budget` iterations have run.
/// The returned grid still has matches only when the budget stopped it.
fn run_cascade<R>(grid: &Grid, palette_size: u8, budget: Option<u32>, rng: &mut R) -> Resolution
where
    R: Rng + ?Sized,
{
    let mut current = grid.clone();
    let mut cleared = 0;
    let mut cascades = 0u32;

    while budget != Some(cascades) {
        let Some((next, step_cleared)) = cascade_step(&current, palette_size, rng) else {
            break;
        };
        cascades += 1;
        cleared += step_cleared;
        debug!(cascade = cascades, cleared = step_cleared, "cascade step");
        current = next;
    }

    Resolution {
        grid: current,
        cleared,
        cascades,
    }
}

/// Run the cascade until no matches remain.
///
/// Termination is statistical: with a tiny palette on a degenerate grid the refills could
/// keep producing matches. Use [`resolve_bounded`] to cap the number of iterations.
#[instrument(level = "debug", skip_all, fields(rows = grid.rows(), cols = grid.cols()))]
pub fn resolve<R>(grid: &Grid, palette_size: u8, rng: &mut R) -> Resolution
where
    R: Rng + ?Sized,
{
    run_cascade(grid, palette_size, None, rng)
}

/// Like [`resolve`], but gives up with [`EngineError::CascadeLimit`] when the grid still
/// has matches after `max_cascades` iterations.
pub fn resolve_bounded<R>(
    grid: &Grid,
    palette_size: u8,
    max_cascades: u32,
    rng: &mut R,
) -> Result<Resolution, EngineError>
where
    R: Rng + ?Sized,
{
    resolve_with_limit(grid, palette_size, Some(max_cascades), rng)
}

/// Resolve with an optional budget; `None` means unbounded.
#[instrument(level = "debug", skip_all, fields(max_cascades = ?max_cascades))]
pub fn resolve_with_limit<R>(
    grid: &Grid,
    palette_size: u8,
    max_cascades: Option<u32>,
    rng: &mut R,
) -> Result<Resolution, EngineError>
where
    R: Rng + ?Sized,
{
    let res = run_cascade(grid, palette_size, max_cascades, rng);
    match max_cascades {
        Some(limit) if res.cascades == limit && has_match(&res.grid) => {
            warn!(limit, "cascade budget exhausted");
            Err(EngineError::CascadeLimit { limit })
        }
        _ => Ok(res),
    }
}
