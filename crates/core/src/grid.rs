//! Grid module - the rectangular field of tokens
//!
//! The grid is `rows x cols` cells, each either empty or holding a token kind.
//! Uses a flat row-major vector for cache locality: `row * cols + col`.
//! Coordinates: rows run top (0) to bottom (rows-1), columns left (0) to right (cols-1).
//!
//! A `Grid` is a value. Public operations never mutate a grid another component can see;
//! transformations (`swapped`, `with_cell`, and everything in [`crate::resolve`] and
//! [`crate::shuffle`]) return a new grid and leave the input untouched.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::error::GridError;
use crate::types::{cell_char, Cell, Position, TokenKind, EMPTY_CHAR};

/// A fixed-size grid of cells
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: usize,
    cols: usize,
    /// Flat array of cells, row-major order (row * cols + col)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an all-empty grid
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        if rows == 0 {
            return Err(GridError::NoRows);
        }
        if cols == 0 {
            return Err(GridError::NoColumns);
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        })
    }

    /// Create a grid with every cell drawn uniformly from a palette of `palette_size` kinds.
    ///
    /// The result may contain matches; run it through [`crate::resolve::resolve`] to get a
    /// stable starting grid. A `palette_size` of zero is rejected with
    /// [`GridError::EmptyPalette`].
    pub fn random<R>(
        rows: usize,
        cols: usize,
        palette_size: u8,
        rng: &mut R,
    ) -> Result<Self, GridError>
    where
        R: Rng + ?Sized,
    {
        let mut grid = Self::new(rows, cols)?;
        if palette_size == 0 {
            return Err(GridError::EmptyPalette);
        }
        for cell in &mut grid.cells {
            *cell = Some(TokenKind::new(rng.gen_range(0..palette_size)));
        }
        Ok(grid)
    }

    /// Build a grid from nested rows; every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        let height = rows.len();
        if height == 0 {
            return Err(GridError::NoRows);
        }
        let width = rows[0].len();
        if width == 0 {
            return Err(GridError::NoColumns);
        }

        let mut cells = Vec::with_capacity(height * width);
        for (row, cells_in_row) in rows.into_iter().enumerate() {
            if cells_in_row.len() != width {
                return Err(GridError::RaggedRows {
                    row,
                    expected: width,
                    found: cells_in_row.len(),
                });
            }
            cells.extend(cells_in_row);
        }

        Ok(Self {
            rows: height,
            cols: width,
            cells,
        })
    }

    /// Parse a grid from text: one line per row, a letter per token, `.` for empty.
    /// Blank lines and surrounding whitespace are ignored.
    ///
    /// ```
    /// use match3_core::Grid;
    ///
    /// let grid = Grid::parse("AB.\nCAB").unwrap();
    /// assert_eq!((grid.rows(), grid.cols()), (2, 3));
    /// ```
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let mut rows = Vec::new();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let row_index = rows.len();
            let mut row = Vec::with_capacity(line.len());
            for (col, ch) in line.chars().filter(|c| !c.is_whitespace()).enumerate() {
                if ch == EMPTY_CHAR {
                    row.push(None);
                    continue;
                }
                let kind = TokenKind::from_char(ch).ok_or(GridError::BadCell {
                    ch,
                    pos: Position::new(row_index, col),
                })?;
                row.push(Some(kind));
            }
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if pos.row >= self.rows || pos.col >= self.cols {
            return None;
        }
        Some(pos.row * self.cols + pos.col)
    }

    /// Flat index for a position the caller guarantees is in bounds
    #[inline(always)]
    fn index_of(&self, pos: Position) -> usize {
        assert!(
            self.contains(pos),
            "position {pos} outside {}x{} grid",
            self.rows,
            self.cols
        );
        pos.row * self.cols + pos.col
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Check if a position lies within the grid
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Get cell at a position
    /// Returns None if out of bounds
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Get cell at a position that must be in bounds
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the grid.
    pub fn cell(&self, pos: Position) -> Cell {
        self.cells[self.index_of(pos)]
    }

    /// Set a cell in place. Crate-internal: transformations work on their own copy.
    pub(crate) fn set(&mut self, pos: Position, cell: Cell) {
        let idx = self.index_of(pos);
        self.cells[idx] = cell;
    }

    /// Swap two cells in place. Crate-internal scratch operation.
    pub(crate) fn swap_cells(&mut self, a: Position, b: Position) {
        let ia = self.index_of(a);
        let ib = self.index_of(b);
        self.cells.swap(ia, ib);
    }

    /// Mutable access to the flat cell array, for transformations inside the crate
    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// A copy of this grid with one cell replaced
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the grid.
    pub fn with_cell(&self, pos: Position, cell: Cell) -> Grid {
        let mut next = self.clone();
        next.set(pos, cell);
        next
    }

    /// A copy of this grid with the contents of `a` and `b` exchanged
    ///
    /// # Panics
    ///
    /// Panics if either position is outside the grid.
    pub fn swapped(&self, a: Position, b: Position) -> Grid {
        let mut next = self.clone();
        next.swap_cells(a, b);
        next
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cells of one row, left to right
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Cells of one column, top to bottom
    pub fn column(&self, col: usize) -> impl Iterator<Item = Cell> + '_ {
        assert!(col < self.cols, "column {col} outside grid");
        self.cells.iter().skip(col).step_by(self.cols).copied()
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let cols = self.cols;
        (0..self.rows * cols).map(move |i| Position::new(i / cols, i % cols))
    }

    /// Number of cells holding a token
    pub fn token_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Number of empty cells
    pub fn empty_count(&self) -> usize {
        self.cells.len() - self.token_count()
    }

    /// Multiset of token kinds present on the grid
    pub fn kind_counts(&self) -> BTreeMap<TokenKind, usize> {
        let mut counts = BTreeMap::new();
        for kind in self.cells.iter().flatten() {
            *counts.entry(*kind).or_insert(0) += 1;
        }
        counts
    }

    /// True when no column has an empty cell strictly below a token
    pub fn is_compacted(&self) -> bool {
        (0..self.cols).all(|col| {
            let mut seen_token = false;
            for cell in self.column(col) {
                match cell {
                    Some(_) => seen_token = true,
                    None if seen_token => return false,
                    None => {}
                }
            }
            true
        })
    }

    /// Convert to nested rows, top to bottom
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.cells.chunks(self.cols).map(<[Cell]>::to_vec).collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.chunks(self.cols).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell_char(*cell))?;
            }
        }
        Ok(())
    }
}

impl FromStr for Grid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimpleRng;

    fn k(c: char) -> Cell {
        TokenKind::from_char(c)
    }

    #[test]
    fn test_grid_index_calculation() {
        let grid = Grid::new(3, 4).unwrap();
        assert_eq!(grid.index(Position::new(0, 0)), Some(0));
        assert_eq!(grid.index(Position::new(0, 3)), Some(3));
        assert_eq!(grid.index(Position::new(1, 0)), Some(4));
        assert_eq!(grid.index(Position::new(2, 3)), Some(11));
        assert_eq!(grid.index(Position::new(3, 0)), None);
        assert_eq!(grid.index(Position::new(0, 4)), None);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert_eq!(Grid::new(0, 3), Err(GridError::NoRows));
        assert_eq!(Grid::new(3, 0), Err(GridError::NoColumns));
        assert_eq!(Grid::from_rows(vec![]), Err(GridError::NoRows));
        assert_eq!(Grid::from_rows(vec![vec![]]), Err(GridError::NoColumns));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Grid::from_rows(vec![vec![k('A'), k('B')], vec![k('A')]]).unwrap_err();
        assert_eq!(
            err,
            GridError::RaggedRows {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_parse_and_display_roundtrip() {
        let text = "AB.\n.CA\nDDA";
        let grid = Grid::parse(text).unwrap();
        assert_eq!(grid.to_string(), text);
        assert_eq!(grid.cell(Position::new(0, 2)), None);
        assert_eq!(grid.cell(Position::new(2, 0)), k('D'));
    }

    #[test]
    fn test_parse_rejects_unknown_characters() {
        let err = Grid::parse("AB\nA?").unwrap_err();
        assert_eq!(
            err,
            GridError::BadCell {
                ch: '?',
                pos: Position::new(1, 1)
            }
        );
    }

    #[test]
    fn test_swapped_leaves_original_untouched() {
        let grid = Grid::parse("AB\nCD").unwrap();
        let next = grid.swapped(Position::new(0, 0), Position::new(0, 1));
        assert_eq!(next.to_string(), "BA\nCD");
        assert_eq!(grid.to_string(), "AB\nCD");
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_swapped_out_of_bounds_panics() {
        let grid = Grid::parse("AB\nCD").unwrap();
        let _ = grid.swapped(Position::new(0, 1), Position::new(0, 2));
    }

    #[test]
    fn test_column_and_row_views() {
        let grid = Grid::parse("ABC\nDEF").unwrap();
        assert_eq!(grid.row(1), &[k('D'), k('E'), k('F')]);
        assert_eq!(grid.column(2).collect::<Vec<_>>(), vec![k('C'), k('F')]);
    }

    #[test]
    fn test_is_compacted() {
        assert!(Grid::parse("..\nA.\nAB").unwrap().is_compacted());
        assert!(!Grid::parse("A.\n.B\nAB").unwrap().is_compacted());
    }

    #[test]
    fn test_random_uses_only_palette_kinds() {
        let mut rng = SimpleRng::new(5);
        let grid = Grid::random(6, 7, 4, &mut rng).unwrap();
        assert_eq!(grid.empty_count(), 0);
        assert!(grid.cells().iter().flatten().all(|k| k.index() < 4));
    }

    #[test]
    fn test_random_with_empty_palette_is_an_error() {
        let mut rng = SimpleRng::new(5);
        assert_eq!(Grid::random(3, 3, 0, &mut rng), Err(GridError::EmptyPalette));
        assert_eq!(Grid::random(0, 3, 0, &mut rng), Err(GridError::NoRows));
    }

    #[test]
    fn test_kind_counts() {
        let grid = Grid::parse("AAB\n.BA").unwrap();
        let counts = grid.kind_counts();
        assert_eq!(counts.get(&TokenKind::new(0)), Some(&3));
        assert_eq!(counts.get(&TokenKind::new(1)), Some(&2));
        assert_eq!(grid.token_count(), 5);
        assert_eq!(grid.empty_count(), 1);
    }
}
