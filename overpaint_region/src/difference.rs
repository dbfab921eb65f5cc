// Copyright 2026 the Overpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Disjoint difference of two rectangle lists.

use alloc::vec::Vec;

use crate::edges::EdgeSet;
use crate::error::RegionError;
use crate::grid::{CellFlags, Grid};
use crate::rect::IRect;

/// Optional ceiling on the scratch grid built by a set operation.
///
/// The grid has one cell per pair of consecutive distinct x and y edges, so
/// its size grows quadratically with the number of input rectangles. By
/// default there is no ceiling; hosts that accept untrusted or pathological
/// input can cap it and handle [`RegionError::GridTooLarge`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionLimits {
    /// Maximum number of grid cells, or `None` for no ceiling.
    pub max_cells: Option<usize>,
}

impl RegionLimits {
    /// No ceiling.
    pub const UNBOUNDED: Self = Self { max_cells: None };

    /// A ceiling of `max_cells` grid cells.
    pub const fn with_max_cells(max_cells: usize) -> Self {
        Self {
            max_cells: Some(max_cells),
        }
    }
}

/// Reusable scratch storage for set operations.
///
/// This is useful when many set operations run per frame: the edge and grid
/// buffers retain their capacity across calls. Reuse a single scratch instance
/// per thread / frame pass.
///
/// A scratch holds no results; it may be dropped or reused at any time.
#[derive(Clone, Debug, Default)]
pub struct RegionScratch {
    xs: EdgeSet,
    ys: EdgeSet,
    grid: Grid,
}

impl RegionScratch {
    /// Creates an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scratch buffer with room for `rects` input rectangles.
    ///
    /// `rects` is a best-effort hint for the edge buffers; the grid grows on
    /// demand.
    #[must_use]
    pub fn with_capacity(rects: usize) -> Self {
        Self {
            xs: EdgeSet::with_capacity(rects * 2),
            ys: EdgeSet::with_capacity(rects * 2),
            grid: Grid::default(),
        }
    }
}

/// Region covered by `added` and not by `removed`, as disjoint rectangles.
///
/// Every rectangle in the result is non-empty, no two share any area, and
/// together they cover exactly the requested region. Empty input rectangles
/// are ignored.
///
/// Results are produced one grid row at a time, top to bottom, and within a
/// row left to right. Horizontally adjacent cells merge; rows never merge.
///
/// ```rust
/// use overpaint_region::{IRect, disjoint_difference};
///
/// let added = [IRect::new(0, 0, 10, 10), IRect::new(20, 0, 10, 10)];
/// assert_eq!(disjoint_difference(&added, &[]), added);
/// assert!(disjoint_difference(&added, &added).is_empty());
/// ```
///
/// # Panics
///
/// Panics if the scratch grid cannot be allocated, like any `Vec` growth.
/// Use [`try_disjoint_difference_with`] to handle that case.
#[must_use]
pub fn disjoint_difference(added: &[IRect], removed: &[IRect]) -> Vec<IRect> {
    let mut out = Vec::new();
    disjoint_difference_with(&mut RegionScratch::new(), added, removed, &mut out);
    out
}

/// Disjoint union of `rects`; shorthand for `disjoint_difference(rects, &[])`.
#[must_use]
pub fn disjoint_union(rects: &[IRect]) -> Vec<IRect> {
    disjoint_difference(rects, &[])
}

/// Total area covered by `rects`, counting overlaps once.
pub fn covered_area(rects: &[IRect]) -> u64 {
    disjoint_union(rects).iter().map(|r| r.area()).sum()
}

/// Like [`disjoint_difference`], reusing `scratch` and appending to `out`.
///
/// # Panics
///
/// Panics if the scratch grid cannot be allocated.
pub fn disjoint_difference_with(
    scratch: &mut RegionScratch,
    added: &[IRect],
    removed: &[IRect],
    out: &mut Vec<IRect>,
) {
    if let Err(err) =
        try_disjoint_difference_with(scratch, &RegionLimits::UNBOUNDED, added, removed, out)
    {
        panic!("disjoint_difference: {err}");
    }
}

/// Fallible form of [`disjoint_difference_with`].
///
/// Results are appended to `out`. On error nothing is appended.
///
/// # Errors
///
/// - [`RegionError::GridTooLarge`] if the grid would exceed `limits`.
/// - [`RegionError::OutOfMemory`] if the grid cannot be allocated.
pub fn try_disjoint_difference_with(
    scratch: &mut RegionScratch,
    limits: &RegionLimits,
    added: &[IRect],
    removed: &[IRect],
    out: &mut Vec<IRect>,
) -> Result<(), RegionError> {
    if added.iter().all(|r| r.is_empty()) {
        return Ok(());
    }

    let RegionScratch { xs, ys, grid } = scratch;
    xs.clear();
    ys.clear();
    for r in added.iter().chain(removed).filter(|r| !r.is_empty()) {
        xs.push_span(r.left(), r.right());
        ys.push_span(r.top(), r.bottom());
    }
    xs.finish();
    ys.finish();

    grid.reset(xs.cells(), ys.cells(), limits.max_cells)?;
    mark(grid, xs, ys, added, CellFlags::ADD);
    mark(grid, xs, ys, removed, CellFlags::REMOVE);

    for row in 0..grid.rows() {
        let top = ys.coord(row);
        let bottom = ys.coord(row + 1);
        let mut run_start = None;
        for (col, &cell) in grid.row(row).iter().enumerate() {
            if cell == CellFlags::ADD {
                run_start.get_or_insert(col);
            } else if let Some(start) = run_start.take() {
                push_run(out, xs.coord(start), xs.coord(col), top, bottom);
            }
        }
        if let Some(start) = run_start {
            push_run(out, xs.coord(start), xs.coord(xs.cells()), top, bottom);
        }
    }
    Ok(())
}

/// Pushes the run `left..right` of one grid row.
///
/// Runs wider than `i32::MAX` are split into pieces that fit an `IRect`.
fn push_run(out: &mut Vec<IRect>, mut left: i32, right: i32, top: i32, bottom: i32) {
    while i64::from(right) - i64::from(left) > i64::from(i32::MAX) {
        // `left` is negative here, so the step cannot overflow.
        let split = left + i32::MAX;
        out.push(IRect::from_edges(left, top, split, bottom));
        left = split;
    }
    out.push(IRect::from_edges(left, top, right, bottom));
}

fn mark(grid: &mut Grid, xs: &EdgeSet, ys: &EdgeSet, rects: &[IRect], flag: CellFlags) {
    // Every edge of a non-empty input rect was recorded, so lookups succeed.
    for r in rects.iter().filter(|r| !r.is_empty()) {
        let cols = xs.index_of(r.left()).zip(xs.index_of(r.right()));
        let rows = ys.index_of(r.top()).zip(ys.index_of(r.bottom()));
        if let (Some((col0, col1)), Some((row0, row1))) = (cols, rows) {
            grid.mark(col0..col1, row0..row1, flag);
        }
    }
}
