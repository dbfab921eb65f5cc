// Copyright 2026 the Overpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sorted, deduplicated edge coordinates along one axis.

use alloc::vec::Vec;

/// Distinct edge coordinates along one axis.
///
/// Fill with [`push_span`](Self::push_span), then call [`finish`](Self::finish)
/// once before querying. Consecutive coordinates bound one column (or row) of
/// the compressed grid.
#[derive(Clone, Debug, Default)]
pub(crate) struct EdgeSet {
    coords: Vec<i32>,
}

impl EdgeSet {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            coords: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.coords.clear();
    }

    /// Records both ends of a span.
    pub(crate) fn push_span(&mut self, start: i32, end: i32) {
        self.coords.push(start);
        self.coords.push(end);
    }

    /// Sorts and deduplicates the recorded coordinates.
    pub(crate) fn finish(&mut self) {
        self.coords.sort_unstable();
        self.coords.dedup();
    }

    /// Number of grid cells along this axis.
    pub(crate) fn cells(&self) -> usize {
        self.coords.len().saturating_sub(1)
    }

    /// Coordinate of the `i`th edge.
    pub(crate) fn coord(&self, i: usize) -> i32 {
        self.coords[i]
    }

    /// Index of `coord` among the edges, if present.
    pub(crate) fn index_of(&self, coord: i32) -> Option<usize> {
        self.coords.binary_search(&coord).ok()
    }
}
