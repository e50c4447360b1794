//! Session module - the turn loop around the resolution core
//!
//! A session owns the current grid, the entropy source, and the running count of
//! collected tiles. A turn is:
//! 1. validate the requested swap (bounds, adjacency),
//! 2. reject it unchanged if the swapped grid has no match,
//! 3. otherwise resolve the cascade,
//! 4. shuffle until the grid has a move again,
//! 5. credit every cleared tile (cascade and shuffle rounds) to `collected`.
//!
//! The session's grid is always full, stable and playable. It is only replaced once a
//! turn has fully succeeded, so an error in the middle of a turn (a budget running out)
//! leaves the previous grid in place.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::EngineConfig;
use crate::detect::has_match;
use crate::error::{SessionError, SwapError};
use crate::grid::Grid;
use crate::moves::{find_move, Swap};
use crate::resolve::{apply_gravity, refill, resolve_with_limit};
use crate::rng::SimpleRng;
use crate::shuffle::settle;
use crate::snapshot::GridSnapshot;
use crate::types::Position;

/// What a completed turn did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnReport {
    pub swap: Swap,
    /// Tiles cleared by the cascade the swap triggered
    pub cleared: usize,
    pub cascades: u32,
    /// Shuffle rounds needed afterwards to break a deadlock
    pub shuffle_rounds: u32,
    /// Tiles cleared by the cascades of those shuffle rounds
    pub shuffle_cleared: usize,
}

impl TurnReport {
    /// Every tile this turn credited to the session
    pub fn total_cleared(&self) -> usize {
        self.cleared + self.shuffle_cleared
    }
}

/// Result of a valid swap request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SwapOutcome {
    /// The swap made no match and was undone; the grid is unchanged
    Rejected { swap: Swap },
    /// The swap matched; the grid was resolved and is playable again
    Resolved(TurnReport),
}

#[derive(Debug, Clone)]
pub struct Session<R = SimpleRng> {
    config: EngineConfig,
    grid: Grid,
    rng: R,
    collected: usize,
    turns: u32,
}

impl<R: Rng> Session<R> {
    /// Start a session on a freshly generated grid.
    ///
    /// The random fill is resolved and then shuffled until a move exists; tiles cleared
    /// while preparing the board are not credited.
    #[instrument(level = "debug", skip(rng))]
    pub fn new(config: EngineConfig, mut rng: R) -> Result<Self, SessionError> {
        config.validate()?;
        let grid = Grid::random(config.rows, config.cols, config.palette_size, &mut rng)?;
        Self::prepare(config, grid, rng)
    }

    /// Start a session on a caller-supplied grid.
    ///
    /// The grid must match the configured dimensions and palette. Empty cells are dropped
    /// to the top of their column and refilled, then the grid is resolved and settled like
    /// a generated grid before the first turn.
    #[instrument(level = "debug", skip(grid, rng))]
    pub fn with_grid(config: EngineConfig, grid: Grid, rng: R) -> Result<Self, SessionError> {
        config.validate()?;
        config.check_grid(&grid)?;
        Self::prepare(config, grid, rng)
    }

    fn prepare(config: EngineConfig, grid: Grid, mut rng: R) -> Result<Self, SessionError> {
        let grid = if grid.empty_count() > 0 {
            refill(&apply_gravity(&grid), config.palette_size, &mut rng)
        } else {
            grid
        };
        let resolved =
            resolve_with_limit(&grid, config.palette_size, config.max_cascades, &mut rng)?;
        let settled = settle(
            &resolved.grid,
            config.palette_size,
            config.max_shuffles,
            config.max_cascades,
            &mut rng,
        )?;
        info!(
            rows = config.rows,
            cols = config.cols,
            palette = config.palette_size,
            prep_cascades = resolved.cascades,
            prep_shuffles = settled.rounds,
            "session ready"
        );

        Ok(Self {
            config,
            grid: settled.grid,
            rng,
            collected: 0,
            turns: 0,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The current (stable, playable) grid
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Tiles cleared since the session started
    pub fn collected(&self) -> usize {
        self.collected
    }

    /// Number of accepted (matching) swaps
    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// A productive swap on the current grid, if one exists
    pub fn hint(&self) -> Option<Swap> {
        find_move(&self.grid)
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot::from(&self.grid)
    }

    fn check_swap(&self, a: Position, b: Position) -> Result<Swap, SwapError> {
        if let Some(pos) = [a, b].into_iter().find(|&p| !self.grid.contains(p)) {
            return Err(SwapError::OutOfBounds(pos));
        }
        Swap::new(a, b).ok_or(SwapError::NotAdjacent(a, b))
    }

    /// Attempt to swap the tokens at `a` and `b` and play out the consequences.
    #[instrument(level = "debug", skip(self))]
    pub fn try_swap(&mut self, a: Position, b: Position) -> Result<SwapOutcome, SwapError> {
        let swap = self.check_swap(a, b)?;

        let swapped = swap.apply(&self.grid);
        if !has_match(&swapped) {
            debug!("swap rejected, no match");
            return Ok(SwapOutcome::Rejected { swap });
        }

        let palette = self.config.palette_size;
        let resolved =
            resolve_with_limit(&swapped, palette, self.config.max_cascades, &mut self.rng)?;
        let settled = settle(
            &resolved.grid,
            palette,
            self.config.max_shuffles,
            self.config.max_cascades,
            &mut self.rng,
        )?;

        let report = TurnReport {
            swap,
            cleared: resolved.cleared,
            cascades: resolved.cascades,
            shuffle_rounds: settled.rounds,
            shuffle_cleared: settled.cleared,
        };

        self.grid = settled.grid;
        self.collected += report.total_cleared();
        self.turns += 1;
        debug!(
            cleared = report.cleared,
            cascades = report.cascades,
            shuffles = report.shuffle_rounds,
            collected = self.collected,
            "turn resolved"
        );

        Ok(SwapOutcome::Resolved(report))
    }
}
