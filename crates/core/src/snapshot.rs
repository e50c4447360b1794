use serde::Serialize;

use crate::grid::Grid;

/// Serializable, renderer-friendly copy of a grid.
///
/// Cells are encoded as `0` for empty and `kind + 1` for tokens. `board_hash` is FNV-1a
/// over the encoded cells in row-major order, so two snapshots compare cheaply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GridSnapshot {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<Vec<u8>>,
    pub board_hash: u64,
}

struct Fnv1a64 {
    state: u64,
}

impl Fnv1a64 {
    const OFFSET: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x00000100000001B3;

    fn new() -> Self {
        Self {
            state: Self::OFFSET,
        }
    }

    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

impl From<&Grid> for GridSnapshot {
    fn from(grid: &Grid) -> Self {
        let cells: Vec<Vec<u8>> = (0..grid.rows())
            .map(|row| {
                grid.row(row)
                    .iter()
                    .map(|c| c.map(|k| k.index() + 1).unwrap_or(0))
                    .collect()
            })
            .collect();

        let mut hasher = Fnv1a64::new();
        for row in &cells {
            hasher.write(row);
        }

        Self {
            rows: grid.rows(),
            cols: grid.cols(),
            cells,
            board_hash: hasher.finish(),
        }
    }
}
