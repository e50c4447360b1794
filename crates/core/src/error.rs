use match3_types::{Position, TokenKind};

/// Errors raised while building a grid from caller-supplied data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("grid has no rows")]
    NoRows,

    #[error("grid has no columns")]
    NoColumns,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unrecognized cell character {ch:?} at {pos}")]
    BadCell { ch: char, pos: Position },

    #[error("cannot draw tokens from an empty palette")]
    EmptyPalette,
}

/// Errors raised while validating a session configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config validation error: {0}")]
    Validation(String),

    #[error("grid is {found_rows}x{found_cols}, config expects {rows}x{cols}")]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        found_rows: usize,
        found_cols: usize,
    },

    #[error("token {kind} at {pos} is outside a palette of {palette_size}")]
    KindOutsidePalette {
        kind: TokenKind,
        pos: Position,
        palette_size: u8,
    },

    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A resolution loop ran past its configured budget.
///
/// This is the "unresolvable configuration" signal: the grid could not be brought to a
/// stable (or playable) state within the allowed number of iterations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("cascade did not settle within {limit} iterations")]
    CascadeLimit { limit: u32 },

    #[error("no playable grid after {limit} shuffle rounds")]
    ShuffleLimit { limit: u32 },
}

/// Errors raised while opening a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Why a caller-requested swap was refused before touching the grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwapError {
    #[error("position {0} is outside the grid")]
    OutOfBounds(Position),

    #[error("positions {0} and {1} are not adjacent")]
    NotAdjacent(Position, Position),

    #[error(transparent)]
    Engine(#[from] EngineError),
}
