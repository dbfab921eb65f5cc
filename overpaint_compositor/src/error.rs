// Copyright 2026 the Overpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors that abort a frame.

use overpaint_region::RegionError;

/// Why a frame was abandoned.
///
/// `E` is the drawable's [`Drawable::Error`](crate::Drawable::Error). Every
/// variant is fatal for the frame that raised it: no partial dirty list is
/// returned, drawables that were not yet drawn keep their local dirty
/// regions, and visibility caches are restored for the next attempt.
/// Retrying is up to the host.
#[derive(Debug, thiserror::Error)]
pub enum CompositeError<E> {
    /// A drawable's [`pre_draw`](crate::Drawable::pre_draw) hook failed.
    #[error("pre-draw hook failed for drawable {index} in layer {layer}")]
    PreDraw {
        /// Layer index.
        layer: usize,
        /// Position of the drawable within its layer.
        index: usize,
        /// The drawable's error.
        #[source]
        source: E,
    },
    /// A drawable's [`draw`](crate::Drawable::draw) call failed.
    #[error("draw failed for drawable {index} in layer {layer}")]
    Draw {
        /// Layer index.
        layer: usize,
        /// Position of the drawable within its layer.
        index: usize,
        /// The drawable's error.
        #[source]
        source: E,
    },
    /// Scratch memory for a region operation could not be provided.
    #[error(transparent)]
    Region(#[from] RegionError),
}

impl<E> CompositeError<E> {
    /// Returns `true` if a drawable callback raised the error.
    pub fn is_callback(&self) -> bool {
        matches!(self, Self::PreDraw { .. } | Self::Draw { .. })
    }

    /// Layer index of the failing drawable, for callback errors.
    pub fn layer(&self) -> Option<usize> {
        match self {
            Self::PreDraw { layer, .. } | Self::Draw { layer, .. } => Some(*layer),
            Self::Region(_) => None,
        }
    }

    /// The drawable's own error, for callback errors.
    pub fn into_source(self) -> Option<E> {
        match self {
            Self::PreDraw { source, .. } | Self::Draw { source, .. } => Some(source),
            Self::Region(_) => None,
        }
    }
}
