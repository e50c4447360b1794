//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data with no behavior beyond parsing and formatting, making them
//! usable in any context (resolution logic, snapshots, the headless simulator).
//!
//! # Grid Coordinates
//!
//! - **Rows**: indexed `0..rows`, top to bottom
//! - **Columns**: indexed `0..cols`, left to right
//!
//! # Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_ROWS` | 8 | Grid height for a new session |
//! | `DEFAULT_COLS` | 8 | Grid width for a new session |
//! | `DEFAULT_PALETTE_SIZE` | 5 | Number of distinct token kinds |
//! | `MIN_RUN` | 3 | Shortest run that counts as a match |
//!
//! # Examples
//!
//! ```
//! use match3_types::{Position, TokenKind};
//!
//! let kind = TokenKind::from_char('c').unwrap();
//! assert_eq!(kind, TokenKind::new(2));
//! assert_eq!(kind.as_char(), 'C');
//!
//! let pos = Position::new(1, 2);
//! assert!(pos.is_adjacent(Position::new(1, 3)));
//! assert!(!pos.is_adjacent(Position::new(2, 3)));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default grid height in rows
pub const DEFAULT_ROWS: usize = 8;

/// Default grid width in columns
pub const DEFAULT_COLS: usize = 8;

/// Default number of token kinds
pub const DEFAULT_PALETTE_SIZE: u8 = 5;

/// Smallest palette that can produce a match at all
pub const MIN_PALETTE_SIZE: u8 = 3;

/// Largest palette; kinds are rendered as the letters `A..=Z`
pub const MAX_PALETTE_SIZE: u8 = 26;

/// Shortest run of identical tokens that counts as a match
pub const MIN_RUN: usize = 3;

/// Identity of a token ("candy color").
///
/// Kinds are small indices into the session palette: a palette of size N holds the
/// kinds `0..N`. Display and parsing use the letters `A`, `B`, `C`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenKind(u8);

impl TokenKind {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Palette index of this kind
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Parse a kind from its letter (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use match3_types::TokenKind;
    ///
    /// assert_eq!(TokenKind::from_char('A'), Some(TokenKind::new(0)));
    /// assert_eq!(TokenKind::from_char('d'), Some(TokenKind::new(3)));
    /// assert_eq!(TokenKind::from_char('.'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        let upper = c.to_ascii_uppercase();
        if upper.is_ascii_uppercase() {
            Some(Self(upper as u8 - b'A'))
        } else {
            None
        }
    }

    /// Letter used when printing grids
    pub fn as_char(self) -> char {
        (b'A' + self.0 % MAX_PALETTE_SIZE) as char
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A cell on the grid
///
/// - `None`: Empty cell (cleared and not yet refilled)
/// - `Some(TokenKind)`: Cell holding a token of the given kind
pub type Cell = Option<TokenKind>;

/// Character used for an empty cell when printing or parsing grids
pub const EMPTY_CHAR: char = '.';

/// Format a cell as a single character
pub fn cell_char(cell: Cell) -> char {
    cell.map(TokenKind::as_char).unwrap_or(EMPTY_CHAR)
}

/// Grid coordinate
///
/// Ordering is row-major (row first, then column), which keeps match sets and hint
/// scans in reading order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// True if `other` shares an edge with `self`
    pub fn is_adjacent(self, other: Position) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
