//! Match detection - finds every cell that belongs to a run of 3+ identical tokens
//!
//! Rows are scanned left to right and columns top to bottom. An empty cell or a change of
//! kind ends the current run; runs of at least [`MIN_RUN`] contribute every member.
//! Horizontal and vertical results are merged into a [`MatchSet`], so a cell sitting on
//! both a row run and a column run is reported once.

use std::collections::BTreeSet;

use crate::grid::Grid;
use crate::types::{Cell, Position, MIN_RUN};

/// Positions taking part in at least one run, in row-major order
pub type MatchSet = BTreeSet<Position>;

/// Iterator over the qualifying runs of a single line, as `(start, len)` pairs
struct Runs<'a> {
    line: &'a [Cell],
    next: usize,
}

impl<'a> Runs<'a> {
    fn new(line: &'a [Cell]) -> Self {
        Self { line, next: 0 }
    }
}

impl Iterator for Runs<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.line.len() {
            let start = self.next;
            let Some(kind) = self.line[start] else {
                self.next += 1;
                continue;
            };

            let mut end = start + 1;
            while end < self.line.len() && self.line[end] == Some(kind) {
                end += 1;
            }
            self.next = end;

            if end - start >= MIN_RUN {
                return Some((start, end - start));
            }
        }
        None
    }
}

/// Find all matched positions on the grid.
///
/// Returns an empty set when no run of [`MIN_RUN`] or more exists anywhere.
pub fn find_matches(grid: &Grid) -> MatchSet {
    let mut matches = MatchSet::new();

    for row in 0..grid.rows() {
        for (start, len) in Runs::new(grid.row(row)) {
            matches.extend((start..start + len).map(|col| Position::new(row, col)));
        }
    }

    let mut column = Vec::with_capacity(grid.rows());
    for col in 0..grid.cols() {
        column.clear();
        column.extend(grid.column(col));
        for (start, len) in Runs::new(&column) {
            matches.extend((start..start + len).map(|row| Position::new(row, col)));
        }
    }

    matches
}

/// True if the grid holds at least one match.
///
/// Equivalent to `!find_matches(grid).is_empty()` but stops at the first run.
pub fn has_match(grid: &Grid) -> bool {
    if (0..grid.rows()).any(|row| Runs::new(grid.row(row)).next().is_some()) {
        return true;
    }

    let mut column = Vec::with_capacity(grid.rows());
    (0..grid.cols()).any(|col| {
        column.clear();
        column.extend(grid.column(col));
        Runs::new(&column).next().is_some()
    })
}
