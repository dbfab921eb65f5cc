// Copyright 2026 the Overpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overpaint Region: integer rectangles and disjoint rectangle-set algebra.
//!
//! This crate is the leaf of a dirty-rectangle renderer. It provides:
//!
//! - [`IRect`]: a small, copyable integer rectangle (`x`, `y`, `w`, `h`).
//!   Rectangles with a non-positive width or height are *empty* and are
//!   ignored by every set operation.
//! - [`disjoint_difference`]: the region covered by one rectangle list minus
//!   the region covered by another, returned as a list of pairwise disjoint,
//!   non-empty rectangles.
//! - [`RegionScratch`]: reusable edge and grid buffers for tight loops (many
//!   set operations per frame) to avoid repeated allocations.
//! - [`RegionLimits`] and [`RegionError`]: an optional ceiling on scratch
//!   grid size, and the errors raised when it is exceeded or allocation fails.
//!
//! ## Quick Start
//!
//! ```rust
//! use overpaint_region::{IRect, disjoint_difference};
//!
//! let added = [IRect::new(0, 0, 10, 10)];
//! let removed = [IRect::new(0, 0, 5, 10)];
//!
//! assert_eq!(disjoint_difference(&added, &removed), [IRect::new(5, 0, 5, 10)]);
//! ```
//!
//! ## Algorithm
//!
//! [`disjoint_difference`] is a coordinate-compression sweep:
//!
//! 1. The distinct left/right edges and top/bottom edges of every non-empty
//!    input rectangle are collected and sorted. Together they partition the
//!    plane into a grid of cells.
//! 2. Each cell covered by an "added" rectangle is flagged `ADD`; each cell
//!    covered by a "removed" rectangle is flagged `REMOVE`.
//! 3. Rows are scanned top to bottom and each maximal horizontal run of cells
//!    flagged `ADD` only becomes one output rectangle one grid row tall.
//!
//! Runs are never merged vertically, even when adjacent rows have identical
//! column ranges. The output is therefore correct and cheap to compute, but is
//! not a minimal decomposition: callers relying on result shape (for example,
//! tests comparing exact lists) can depend on this row-wise policy.
//!
//! Cost is `O(R log R)` to sort edges plus `O(cells)` to mark and scan, where
//! the cell count is `O(R²)` in the worst case. This is intended for the dozens
//! of rectangles a frame typically produces, not for millions.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. The `std` feature (default)
//! forwards to Kurbo; enable `libm` instead for `no_std` float support in the
//! Kurbo conversions.

#![no_std]

extern crate alloc;

mod difference;
mod edges;
mod error;
mod grid;
mod rect;

pub use difference::{
    RegionLimits, RegionScratch, covered_area, disjoint_difference, disjoint_difference_with,
    disjoint_union, try_disjoint_difference_with,
};
pub use error::RegionError;
pub use rect::IRect;
