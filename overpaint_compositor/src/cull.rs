// Copyright 2026 the Overpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Opaque culling: shrinking each layer's dirty region by what lies in front.

use alloc::vec::Vec;

use overpaint_region::{
    IRect, RegionError, RegionLimits, RegionScratch, try_disjoint_difference_with,
};

use crate::Drawable;

/// Output of [`cull_opaque`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Culled {
    /// For each layer, the disjoint part of the frame's dirty region that is
    /// not hidden behind opaque content in a layer processed before it.
    pub dirty_by_layer: Vec<Vec<IRect>>,
    /// Every opaque region found, across all layers, in discovery order.
    ///
    /// Rectangles may overlap.
    pub opaque: Vec<IRect>,
}

/// Splits `dirty` into per-layer redraw regions, skipping occluded parts.
///
/// Layers are processed in ascending index order, so index 0 is treated as
/// front-most. For layer `i`:
///
/// 1. Its redraw region is `dirty` minus the opaque region accumulated from
///    layers `0..i`, made disjoint.
/// 2. Each dirty rectangle is clipped successively by the bounds of every
///    drawable in the layer. The clip survives only if it stays non-empty and
///    every drawable in turn is visible and reports
///    [`is_opaque_over`](Drawable::is_opaque_over) it. Survivors are this
///    layer's opaque region.
/// 3. That region is appended to the accumulated opaque region.
///
/// A layer with no drawables contributes nothing. Because a surviving clip
/// must pass every drawable of the layer, a layer is only ever opaque where
/// all its drawables overlap.
///
/// ```rust
/// use overpaint_compositor::{DrawState, Drawable, cull_opaque};
/// use overpaint_region::IRect;
///
/// struct Tile(DrawState);
///
/// impl Drawable for Tile {
///     type Surface = ();
///     type Error = ();
///     fn visible(&self) -> bool { self.0.visible() }
///     fn was_visible(&self) -> bool { self.0.was_visible() }
///     fn set_was_visible(&mut self, v: bool) { self.0.set_was_visible(v) }
///     fn bounds(&self) -> IRect { self.0.bounds() }
///     fn previous_bounds(&self) -> IRect { self.0.drawn_bounds() }
///     fn local_dirty(&self) -> &[IRect] { self.0.local_dirty() }
///     fn clear_local_dirty(&mut self) { self.0.clear_local_dirty() }
///     fn is_opaque_over(&self, rect: IRect) -> bool { self.0.is_opaque_over(rect) }
///     fn draw(&mut self, _: &mut (), _: &[IRect]) -> Result<(), ()> { Ok(()) }
/// }
///
/// let front = [Tile(DrawState::new(IRect::new(0, 0, 5, 10)).with_opaque(true))];
/// let back = [Tile(DrawState::new(IRect::new(0, 0, 10, 10)))];
/// let culled = cull_opaque(&[IRect::new(0, 0, 10, 10)], &[&front[..], &back[..]]);
///
/// assert_eq!(culled.dirty_by_layer[0], [IRect::new(0, 0, 10, 10)]);
/// assert_eq!(culled.dirty_by_layer[1], [IRect::new(5, 0, 5, 10)]);
/// ```
///
/// # Panics
///
/// Panics if scratch memory cannot be allocated. Use [`cull_opaque_with`] to
/// handle that case.
#[must_use]
pub fn cull_opaque<D, L>(dirty: &[IRect], layers: &[L]) -> Culled
where
    D: Drawable,
    L: AsRef<[D]>,
{
    match cull_opaque_with(
        &mut RegionScratch::new(),
        &RegionLimits::UNBOUNDED,
        dirty,
        layers,
    ) {
        Ok(culled) => culled,
        Err(err) => panic!("cull_opaque: {err}"),
    }
}

/// Like [`cull_opaque`], reusing `scratch` and honoring `limits`.
///
/// # Errors
///
/// Returns a [`RegionError`] if a region operation exceeds `limits` or cannot
/// allocate.
pub fn cull_opaque_with<D, L>(
    scratch: &mut RegionScratch,
    limits: &RegionLimits,
    dirty: &[IRect],
    layers: &[L],
) -> Result<Culled, RegionError>
where
    D: Drawable,
    L: AsRef<[D]>,
{
    cull_layers(scratch, limits, dirty, layers.iter().map(AsRef::as_ref))
}

/// Shared culling pass over any sequence of layer slices.
pub(crate) fn cull_layers<'a, D, I>(
    scratch: &mut RegionScratch,
    limits: &RegionLimits,
    dirty: &[IRect],
    layers: I,
) -> Result<Culled, RegionError>
where
    D: Drawable + 'a,
    I: ExactSizeIterator<Item = &'a [D]>,
{
    let mut culled = Culled {
        dirty_by_layer: Vec::with_capacity(layers.len()),
        opaque: Vec::new(),
    };
    for drawables in layers {
        let mut redraw = Vec::new();
        try_disjoint_difference_with(scratch, limits, dirty, &culled.opaque, &mut redraw)?;
        culled.dirty_by_layer.push(redraw);

        if drawables.is_empty() {
            continue;
        }
        culled
            .opaque
            .extend(dirty.iter().filter_map(|&rect| opaque_cover(rect, drawables)));
    }
    Ok(culled)
}

/// Per-layer redraw regions with culling disabled: every layer gets the whole
/// dirty region.
pub(crate) fn uncull_layers(
    scratch: &mut RegionScratch,
    limits: &RegionLimits,
    dirty: &[IRect],
    layer_count: usize,
) -> Result<Culled, RegionError> {
    let mut region = Vec::new();
    try_disjoint_difference_with(scratch, limits, dirty, &[], &mut region)?;
    let mut dirty_by_layer = Vec::with_capacity(layer_count);
    dirty_by_layer.resize(layer_count, region);
    Ok(Culled {
        dirty_by_layer,
        opaque: Vec::new(),
    })
}

fn opaque_cover<D: Drawable>(rect: IRect, drawables: &[D]) -> Option<IRect> {
    let mut covered = rect;
    for drawable in drawables {
        covered = covered.clip(drawable.bounds());
        if covered.is_empty() || !drawable.visible() || !drawable.is_opaque_over(covered) {
            return None;
        }
    }
    Some(covered)
}
