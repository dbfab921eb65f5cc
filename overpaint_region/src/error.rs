// Copyright 2026 the Overpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised by fallible region operations.

use alloc::collections::TryReserveError;

/// Failure to allocate the scratch grid for a set operation.
///
/// Both variants are fatal for the operation that raised them: no partial
/// output is produced.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegionError {
    /// The compressed grid would exceed the configured cell ceiling.
    #[error("region grid of {cells} cells exceeds the limit of {limit:?}")]
    GridTooLarge {
        /// Number of cells the operation needed (`usize::MAX` on overflow).
        cells: usize,
        /// The configured ceiling, if any.
        limit: Option<usize>,
    },
    /// The grid allocation failed.
    #[error("region grid allocation failed")]
    OutOfMemory(#[from] TryReserveError),
}
