//! Session configuration
//!
//! Dimensions and palette are fixed for the lifetime of a session. The optional budgets
//! bound the two loops that can in theory run forever: the cascade inside a resolve and
//! the shuffle rounds that break a deadlock. Both default to unbounded.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grid::Grid;
use crate::types::{
    DEFAULT_COLS, DEFAULT_PALETTE_SIZE, DEFAULT_ROWS, MAX_PALETTE_SIZE, MIN_PALETTE_SIZE,
    MIN_RUN,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub rows: usize,
    pub cols: usize,
    pub palette_size: u8,
    /// Maximum cascade iterations per resolve (`None` = unbounded)
    pub max_cascades: Option<u32>,
    /// Maximum shuffle rounds when breaking a deadlock (`None` = unbounded)
    pub max_shuffles: Option<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            palette_size: DEFAULT_PALETTE_SIZE,
            max_cascades: None,
            max_shuffles: None,
        }
    }
}

impl EngineConfig {
    /// Create from environment variables, falling back to defaults for anything unset
    /// or unparsable
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let rows = env::var("MATCH3_ROWS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.rows);
        let cols = env::var("MATCH3_COLS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.cols);
        let palette_size = env::var("MATCH3_PALETTE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.palette_size);
        let max_cascades = env::var("MATCH3_MAX_CASCADES")
            .ok()
            .and_then(|s| s.parse().ok());
        let max_shuffles = env::var("MATCH3_MAX_SHUFFLES")
            .ok()
            .and_then(|s| s.parse().ok());

        Self {
            rows,
            cols,
            palette_size,
            max_cascades,
            max_shuffles,
        }
    }

    /// Parse and validate a JSON document; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::Validation(
                "rows and cols must be > 0".into(),
            ));
        }
        // A line one cell wide needs a spare cell beside a run for a swap to complete it
        let (short, long) = (self.rows.min(self.cols), self.rows.max(self.cols));
        if long < MIN_RUN || (short == 1 && long <= MIN_RUN) {
            return Err(ConfigError::Validation(format!(
                "a {}x{} grid can never offer a move",
                self.rows, self.cols
            )));
        }
        if self.palette_size < MIN_PALETTE_SIZE {
            return Err(ConfigError::Validation(format!(
                "palette_size must be >= {MIN_PALETTE_SIZE}"
            )));
        }
        if self.palette_size > MAX_PALETTE_SIZE {
            return Err(ConfigError::Validation(format!(
                "palette_size must be <= {MAX_PALETTE_SIZE}"
            )));
        }
        Ok(())
    }

    /// Check that a caller-supplied grid fits this configuration.
    pub fn check_grid(&self, grid: &Grid) -> Result<(), ConfigError> {
        if grid.rows() != self.rows || grid.cols() != self.cols {
            return Err(ConfigError::DimensionMismatch {
                rows: self.rows,
                cols: self.cols,
                found_rows: grid.rows(),
                found_cols: grid.cols(),
            });
        }
        for pos in grid.positions() {
            if let Some(kind) = grid.cell(pos) {
                if kind.index() >= self.palette_size {
                    return Err(ConfigError::KindOutsidePalette {
                        kind,
                        pos,
                        palette_size: self.palette_size,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_tiny_palette() {
        let config = EngineConfig {
            palette_size: 2,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn rejects_grid_too_small_for_a_run() {
        let config = EngineConfig {
            rows: 2,
            cols: 2,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_single_line_of_three() {
        // Three cells only match if they already hold one kind, so no swap ever helps
        for (rows, cols) in [(1, 3), (3, 1)] {
            let config = EngineConfig {
                rows,
                cols,
                ..EngineConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::Validation(_))),
                "{rows}x{cols} accepted"
            );
        }
    }

    #[test]
    fn accepts_smallest_playable_shapes() {
        for (rows, cols) in [(1, 4), (4, 1), (2, 3), (3, 2)] {
            let config = EngineConfig {
                rows,
                cols,
                ..EngineConfig::default()
            };
            assert!(config.validate().is_ok(), "{rows}x{cols} rejected");
        }
    }

    #[test]
    fn from_json_fills_defaults() {
        let config = EngineConfig::from_json(r#"{ "rows": 6, "max_shuffles": 10 }"#).unwrap();
        assert_eq!(config.rows, 6);
        assert_eq!(config.cols, DEFAULT_COLS);
        assert_eq!(config.palette_size, DEFAULT_PALETTE_SIZE);
        assert_eq!(config.max_shuffles, Some(10));
        assert_eq!(config.max_cascades, None);
    }

    #[test]
    fn from_json_validates() {
        let err = EngineConfig::from_json(r#"{ "palette_size": 1 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = EngineConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn check_grid_rejects_foreign_kinds_and_sizes() {
        let config = EngineConfig {
            rows: 2,
            cols: 3,
            palette_size: 4,
            ..EngineConfig::default()
        };
        assert!(config.check_grid(&Grid::parse("ABC\nD.A").unwrap()).is_ok());
        assert!(matches!(
            config.check_grid(&Grid::parse("ABE\nDCA").unwrap()),
            Err(ConfigError::KindOutsidePalette { .. })
        ));
        assert!(matches!(
            config.check_grid(&Grid::parse("AB\nDC").unwrap()),
            Err(ConfigError::DimensionMismatch { .. })
        ));
    }
}
