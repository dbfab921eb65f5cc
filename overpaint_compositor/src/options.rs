// Copyright 2026 the Overpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compositor configuration.

use overpaint_region::RegionLimits;

/// Settings for a [`Compositor`](crate::Compositor).
///
/// The defaults cull behind opaque content and place no ceiling on scratch
/// grid size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CompositorOptions {
    /// Skip redrawing regions hidden behind opaque drawables in front.
    ///
    /// Disabling this redraws every dirty region in every layer, which is
    /// useful when drawables cannot answer
    /// [`is_opaque_over`](crate::Drawable::is_opaque_over) reliably.
    pub cull_opaque: bool,
    /// Ceiling on the scratch grid of each region operation.
    pub limits: RegionLimits,
}

impl CompositorOptions {
    /// The default options.
    pub const fn new() -> Self {
        Self {
            cull_opaque: true,
            limits: RegionLimits::UNBOUNDED,
        }
    }

    /// Enables or disables opaque culling.
    #[must_use]
    pub const fn with_cull_opaque(mut self, cull_opaque: bool) -> Self {
        self.cull_opaque = cull_opaque;
        self
    }

    /// Sets the region operation limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: RegionLimits) -> Self {
        self.limits = limits;
        self
    }
}

impl Default for CompositorOptions {
    fn default() -> Self {
        Self::new()
    }
}
