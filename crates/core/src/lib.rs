//! Core engine module - pure, deterministic, and testable
//!
//! This crate contains the grid-resolution rules of a match-3 puzzle: match detection,
//! cascades (clear, gravity, refill), deadlock detection, and shuffling.
//! It has **zero dependencies** on rendering, input, audio, or persistence, making it:
//!
//! - **Deterministic**: every random draw comes from an injected `rand::Rng`; the same seed
//!   replays the same refills and shuffles
//! - **Value-oriented**: every transformation takes `&Grid` and returns a new `Grid`
//! - **Portable**: runs anywhere a caller can hand it a grid
//!
//! # Module Structure
//!
//! - [`grid`]: rectangular grid of cells with bounds-checked access
//! - [`detect`]: row/column run scanning and the deduplicated match set
//! - [`resolve`]: clear, gravity, refill, and the cascade loop
//! - [`moves`]: adjacent-swap analysis and hints
//! - [`shuffle`]: deadlock-breaking shuffle rounds
//! - [`session`]: optional turn loop tying the pieces together
//! - [`config`]: dimensions, palette, and iteration budgets
//! - [`rng`]: portable seeded LCG implementing `rand::RngCore`
//! - [`snapshot`]: serializable grid copy for external renderers
//!
//! # Example
//!
//! ```
//! use match3_core::{find_matches, has_possible_move, resolve, Grid, SimpleRng};
//!
//! let grid = Grid::parse(
//!     "ABCA
//!      ABDB
//!      ACBC",
//! )
//! .unwrap();
//! assert_eq!(find_matches(&grid).len(), 3);
//!
//! let mut rng = SimpleRng::new(12345);
//! let resolution = resolve(&grid, 4, &mut rng);
//! assert!(resolution.cleared >= 3);
//! assert!(find_matches(&resolution.grid).is_empty());
//!
//! // The caller decides whether a shuffle is needed
//! let _deadlocked = !has_possible_move(&resolution.grid);
//! ```

pub mod config;
pub mod detect;
pub mod error;
pub mod grid;
pub mod moves;
pub mod resolve;
pub mod rng;
pub mod session;
pub mod shuffle;
pub mod snapshot;

pub use match3_types as types;

// Re-export commonly used types for convenience
pub use config::EngineConfig;
pub use detect::{find_matches, has_match, MatchSet};
pub use error::{ConfigError, EngineError, GridError, SessionError, SwapError};
pub use grid::Grid;
pub use moves::{find_move, has_possible_move, is_productive, possible_moves, Swap};
pub use resolve::{
    apply_gravity, clear, refill, resolve, resolve_bounded, resolve_with_limit, Resolution,
};
pub use rng::SimpleRng;
pub use session::{Session, SwapOutcome, TurnReport};
pub use shuffle::{settle, shuffle_and_resolve, shuffle_tokens, Settled};
pub use snapshot::GridSnapshot;
