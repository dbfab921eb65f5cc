// Copyright 2026 the Overpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compressed grid of cell coverage flags.

use alloc::vec::Vec;
use core::ops::Range;

use crate::error::RegionError;

bitflags::bitflags! {
    /// Coverage of one grid cell.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub(crate) struct CellFlags: u8 {
        /// Covered by a removed rectangle.
        const REMOVE = 0b01;
        /// Covered by an added rectangle.
        const ADD    = 0b10;
    }
}

/// Row-major grid of [`CellFlags`].
#[derive(Clone, Debug, Default)]
pub(crate) struct Grid {
    cols: usize,
    rows: usize,
    cells: Vec<CellFlags>,
}

impl Grid {
    /// Resizes to `cols × rows` cleared cells.
    ///
    /// Fails without touching the existing allocation's contents if the cell
    /// count exceeds `max_cells` or cannot be allocated.
    pub(crate) fn reset(
        &mut self,
        cols: usize,
        rows: usize,
        max_cells: Option<usize>,
    ) -> Result<(), RegionError> {
        let cells = cols.checked_mul(rows).ok_or(RegionError::GridTooLarge {
            cells: usize::MAX,
            limit: max_cells,
        })?;
        if let Some(limit) = max_cells
            && cells > limit
        {
            return Err(RegionError::GridTooLarge {
                cells,
                limit: Some(limit),
            });
        }
        self.cells.clear();
        self.cells.try_reserve(cells)?;
        self.cells.resize(cells, CellFlags::empty());
        self.cols = cols;
        self.rows = rows;
        Ok(())
    }

    pub(crate) fn rows(&self) -> usize {
        self.rows
    }

    /// Sets `flag` on every cell in the given column and row ranges.
    pub(crate) fn mark(&mut self, cols: Range<usize>, rows: Range<usize>, flag: CellFlags) {
        for row in rows {
            let start = row * self.cols;
            for cell in &mut self.cells[start + cols.start..start + cols.end] {
                *cell |= flag;
            }
        }
    }

    /// The cells of one row, left to right.
    pub(crate) fn row(&self, row: usize) -> &[CellFlags] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_accumulates_flags() {
        let mut grid = Grid::default();
        grid.reset(3, 2, None).unwrap();
        grid.mark(0..2, 0..2, CellFlags::ADD);
        grid.mark(1..3, 1..2, CellFlags::REMOVE);

        assert_eq!(grid.rows(), 2);
        assert_eq!(
            grid.row(0),
            &[CellFlags::ADD, CellFlags::ADD, CellFlags::empty()]
        );
        assert_eq!(
            grid.row(1),
            &[CellFlags::ADD, CellFlags::all(), CellFlags::REMOVE]
        );
    }

    #[test]
    fn reset_clears_previous_marks() {
        let mut grid = Grid::default();
        grid.reset(2, 2, None).unwrap();
        grid.mark(0..2, 0..2, CellFlags::ADD);
        grid.reset(2, 1, None).unwrap();
        assert_eq!(grid.row(0), &[CellFlags::empty(); 2]);
    }

    #[test]
    fn reset_respects_limit() {
        let mut grid = Grid::default();
        let err = grid.reset(10, 10, Some(99)).unwrap_err();
        assert_eq!(
            err,
            RegionError::GridTooLarge {
                cells: 100,
                limit: Some(99)
            }
        );
        assert!(grid.reset(10, 10, Some(100)).is_ok());
    }
}
