// Copyright 2026 the Overpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame driver.

use alloc::vec::Vec;

use overpaint_region::{IRect, RegionError, RegionScratch, try_disjoint_difference_with};
use smallvec::SmallVec;

use crate::collect::collect_dirty;
use crate::cull::{Culled, cull_layers, uncull_layers};
use crate::{CompositeError, CompositorOptions, Drawable};

/// Clip lists handed to a single `draw` call are usually short.
type DrawRects = SmallVec<[IRect; 8]>;

/// Renders frames of layered drawables, redrawing only what changed.
///
/// A `Compositor` holds its [`CompositorOptions`] and scratch memory for the
/// region operations. Keep one alive across frames to reuse that memory.
/// Between calls it holds no rectangles or results.
#[derive(Debug, Default)]
pub struct Compositor {
    options: CompositorOptions,
    scratch: RegionScratch,
    /// Every drawable's visibility cache as of the start of the frame.
    visibility: Vec<bool>,
}

impl Compositor {
    /// Creates a compositor with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a compositor with the given options.
    #[must_use]
    pub fn with_options(options: CompositorOptions) -> Self {
        Self {
            options,
            scratch: RegionScratch::new(),
            visibility: Vec::new(),
        }
    }

    /// Current options.
    pub fn options(&self) -> &CompositorOptions {
        &self.options
    }

    /// Replaces the options. They apply from the next frame.
    pub fn set_options(&mut self, options: CompositorOptions) {
        self.options = options;
    }

    /// Renders one frame.
    ///
    /// `layers[0]` is the front-most layer. `initial_dirty` holds regions the
    /// host wants redrawn regardless of drawable state (empty rectangles are
    /// ignored).
    ///
    /// The frame runs in four steps:
    ///
    /// 1. Dirty regions are gathered from every drawable with
    ///    [`collect_dirty`], seeded with `initial_dirty`. If nothing is dirty
    ///    the frame ends here with `Ok(None)`, and no drawable is drawn.
    /// 2. The dirty region is split per layer, culling parts hidden behind
    ///    opaque content in front (see [`cull_opaque`](crate::cull_opaque)),
    ///    unless [`CompositorOptions::cull_opaque`] is off.
    /// 3. Layers are drawn back to front (highest index first). Within a
    ///    layer, each visible drawable whose bounds meet the layer's region
    ///    is drawn once with the non-empty clips of that region to its bounds.
    ///    Every drawable's local dirty list is then cleared, drawn or not.
    /// 4. The union of all per-layer regions is returned as pairwise disjoint
    ///    rectangles, ready for a display update.
    ///
    /// # Errors
    ///
    /// The frame is abandoned on the first failure, and no dirty list is
    /// returned. Every drawable's visibility cache is put back to its value
    /// before the frame, so a retry sees the same visibility changes:
    ///
    /// - [`CompositeError::PreDraw`] or [`CompositeError::Draw`] if a
    ///   drawable callback fails. The failing drawable and those after it in
    ///   the draw order keep their local dirty lists.
    /// - [`CompositeError::Region`] if a region operation exceeds the
    ///   configured limits or cannot allocate.
    pub fn composite<D, L>(
        &mut self,
        surface: &mut D::Surface,
        layers: &mut [L],
        initial_dirty: &[IRect],
    ) -> Result<Option<Vec<IRect>>, CompositeError<D::Error>>
    where
        D: Drawable,
        L: AsMut<[D]>,
    {
        remember_visibility(layers, &mut self.visibility)?;
        let result = self.render_frame(surface, layers, initial_dirty);
        if let Err(err) = &result {
            restore_visibility(layers, &self.visibility);
            log::debug!("frame aborted: {err}");
        }
        result
    }

    fn render_frame<D, L>(
        &mut self,
        surface: &mut D::Surface,
        layers: &mut [L],
        initial_dirty: &[IRect],
    ) -> Result<Option<Vec<IRect>>, CompositeError<D::Error>>
    where
        D: Drawable,
        L: AsMut<[D]>,
    {
        let mut dirty: Vec<IRect> = initial_dirty
            .iter()
            .copied()
            .filter(|r| !r.is_empty())
            .collect();
        collect_dirty(layers, &mut dirty)?;
        if dirty.is_empty() {
            log::debug!("frame skipped: nothing dirty in {} layers", layers.len());
            return Ok(None);
        }

        let limits = self.options.limits;
        let Culled { dirty_by_layer, .. } = if self.options.cull_opaque {
            cull_layers(
                &mut self.scratch,
                &limits,
                &dirty,
                layers.iter_mut().map(|l| &*l.as_mut()),
            )?
        } else {
            uncull_layers(&mut self.scratch, &limits, &dirty, layers.len())?
        };

        draw_layers(surface, layers, &dirty_by_layer)?;

        let concat = dirty_by_layer.concat();
        let mut out = Vec::new();
        try_disjoint_difference_with(&mut self.scratch, &limits, &concat, &[], &mut out)?;
        log::trace!(
            "frame: {} dirty rects over {} layers, {} to present",
            dirty.len(),
            layers.len(),
            out.len()
        );
        Ok(Some(out))
    }
}

fn remember_visibility<D, L>(
    layers: &mut [L],
    cache: &mut Vec<bool>,
) -> Result<(), RegionError>
where
    D: Drawable,
    L: AsMut<[D]>,
{
    cache.clear();
    let count: usize = layers.iter_mut().map(|l| l.as_mut().len()).sum();
    cache.try_reserve(count)?;
    for drawables in layers.iter_mut() {
        cache.extend(drawables.as_mut().iter().map(D::was_visible));
    }
    Ok(())
}

fn restore_visibility<D, L>(layers: &mut [L], cache: &[bool])
where
    D: Drawable,
    L: AsMut<[D]>,
{
    let mut cached = cache.iter().copied();
    for drawables in layers.iter_mut() {
        for (drawable, was_visible) in drawables.as_mut().iter_mut().zip(&mut cached) {
            drawable.set_was_visible(was_visible);
        }
    }
}

/// Draw pass: layers from the highest index down to 0.
fn draw_layers<D, L>(
    surface: &mut D::Surface,
    layers: &mut [L],
    dirty_by_layer: &[Vec<IRect>],
) -> Result<(), CompositeError<D::Error>>
where
    D: Drawable,
    L: AsMut<[D]>,
{
    let mut rects = DrawRects::new();
    for (layer, (drawables, region)) in layers.iter_mut().zip(dirty_by_layer).enumerate().rev() {
        for (index, drawable) in drawables.as_mut().iter_mut().enumerate() {
            if drawable.visible() {
                let bounds = drawable.bounds();
                rects.clear();
                rects.extend(
                    region
                        .iter()
                        .map(|r| bounds.clip(*r))
                        .filter(|r| !r.is_empty()),
                );
                if !rects.is_empty() {
                    drawable
                        .draw(surface, &rects)
                        .map_err(|source| CompositeError::Draw {
                            layer,
                            index,
                            source,
                        })?;
                }
            }
            drawable.clear_local_dirty();
        }
    }
    Ok(())
}

/// Renders one frame with a default [`Compositor`].
///
/// See [`Compositor::composite`] for the frame steps and errors.
///
/// ```rust
/// use overpaint_compositor::{DrawState, Drawable, composite};
/// use overpaint_region::IRect;
///
/// struct Tile(DrawState);
///
/// impl Drawable for Tile {
///     type Surface = Vec<IRect>;
///     type Error = ();
///     fn visible(&self) -> bool { self.0.visible() }
///     fn was_visible(&self) -> bool { self.0.was_visible() }
///     fn set_was_visible(&mut self, v: bool) { self.0.set_was_visible(v) }
///     fn bounds(&self) -> IRect { self.0.bounds() }
///     fn previous_bounds(&self) -> IRect { self.0.drawn_bounds() }
///     fn local_dirty(&self) -> &[IRect] { self.0.local_dirty() }
///     fn clear_local_dirty(&mut self) { self.0.clear_local_dirty() }
///     fn pre_draw(&mut self) -> Result<(), ()> { self.0.prepare(); Ok(()) }
///     fn is_opaque_over(&self, rect: IRect) -> bool { self.0.is_opaque_over(rect) }
///     fn draw(&mut self, painted: &mut Vec<IRect>, rects: &[IRect]) -> Result<(), ()> {
///         painted.extend_from_slice(rects);
///         self.0.mark_drawn();
///         Ok(())
///     }
/// }
///
/// let mut layers = vec![vec![Tile(DrawState::new(IRect::new(0, 0, 8, 8)))]];
/// let mut painted = Vec::new();
///
/// // The first frame shows the tile.
/// let shown = composite(&mut painted, &mut layers, &[]).unwrap();
/// assert_eq!(shown, Some(vec![IRect::new(0, 0, 8, 8)]));
///
/// // Nothing changed since.
/// assert_eq!(composite(&mut painted, &mut layers, &[]).unwrap(), None);
/// ```
///
/// # Errors
///
/// See [`Compositor::composite`].
pub fn composite<D, L>(
    surface: &mut D::Surface,
    layers: &mut [L],
    initial_dirty: &[IRect],
) -> Result<Option<Vec<IRect>>, CompositeError<D::Error>>
where
    D: Drawable,
    L: AsMut<[D]>,
{
    Compositor::new().composite(surface, layers, initial_dirty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Canvas, Sprite};
    use alloc::vec;
    use overpaint_region::{RegionLimits, covered_area};

    #[test]
    fn nothing_dirty_is_none() {
        let mut layers = vec![vec![Sprite::shown(IRect::new(0, 0, 4, 4))]];
        let mut canvas = Canvas::default();
        let out = composite(&mut canvas, &mut layers, &[IRect::new(9, 9, 0, 3)]).unwrap();
        assert_eq!(out, None);
        assert!(canvas.draws.is_empty());
    }

    #[test]
    fn no_layers_with_forced_dirt_draws_nothing() {
        let mut layers: Vec<Vec<Sprite>> = Vec::new();
        let mut canvas = Canvas::default();
        let out = composite(&mut canvas, &mut layers, &[IRect::new(0, 0, 2, 2)]).unwrap();
        assert_eq!(out, Some(vec![]));
        assert!(canvas.draws.is_empty());
    }

    #[test]
    fn draws_back_to_front_with_clipped_rects() {
        let mut layers = vec![
            vec![Sprite::shown(IRect::new(0, 0, 4, 4)).with_id(0)],
            vec![Sprite::shown(IRect::new(2, 0, 4, 4)).with_id(1)],
        ];
        let mut canvas = Canvas::default();
        let out = composite(&mut canvas, &mut layers, &[IRect::new(0, 0, 10, 2)]).unwrap();
        assert_eq!(out, Some(vec![IRect::new(0, 0, 10, 2)]));
        assert_eq!(
            canvas.draws,
            [
                (1, vec![IRect::new(2, 0, 4, 2)]),
                (0, vec![IRect::new(0, 0, 4, 2)]),
            ]
        );
    }

    #[test]
    fn occluded_drawables_are_not_drawn() {
        let mut front = Sprite::shown(IRect::new(0, 0, 10, 10)).with_id(0);
        front.state.set_opaque(true);
        let mut layers = vec![
            vec![front],
            vec![Sprite::shown(IRect::new(2, 2, 4, 4)).with_id(1)],
        ];
        let mut canvas = Canvas::default();
        let out = composite(&mut canvas, &mut layers, &[]).unwrap();
        assert_eq!(out, Some(vec![IRect::new(0, 0, 10, 10)]));
        assert_eq!(canvas.ids(), [0]);
    }

    #[test]
    fn disabling_culling_draws_everything() {
        let mut front = Sprite::shown(IRect::new(0, 0, 10, 10)).with_id(0);
        front.state.set_opaque(true);
        let mut layers = vec![
            vec![front],
            vec![Sprite::shown(IRect::new(2, 2, 4, 4)).with_id(1)],
        ];
        let mut canvas = Canvas::default();
        let mut compositor =
            Compositor::with_options(CompositorOptions::new().with_cull_opaque(false));
        compositor.composite(&mut canvas, &mut layers, &[]).unwrap();
        assert_eq!(canvas.ids(), [1, 0]);
    }

    #[test]
    fn hidden_drawables_are_skipped_but_cleared() {
        let mut hidden = Sprite::new(IRect::new(0, 0, 4, 4)).with_id(1);
        hidden.state.set_visible(false);
        hidden.state.invalidate_all();
        let mut layers = vec![vec![Sprite::shown(IRect::new(0, 0, 4, 4)).with_id(0), hidden]];
        let mut canvas = Canvas::default();
        composite(&mut canvas, &mut layers, &[IRect::new(0, 0, 4, 4)]).unwrap();
        assert_eq!(canvas.ids(), [0]);
        assert!(layers[0][1].state.local_dirty().is_empty());
    }

    #[test]
    fn draw_failure_aborts_and_keeps_local_dirt() {
        let mut broken = Sprite::shown(IRect::new(0, 0, 4, 4)).with_id(0);
        broken.fail_draw = true;
        broken.state.invalidate_all();
        let mut back = Sprite::shown(IRect::new(0, 0, 4, 4)).with_id(1);
        back.state.invalidate_all();
        let mut layers = vec![vec![broken], vec![back]];
        let mut canvas = Canvas::default();
        let err = composite(&mut canvas, &mut layers, &[]).unwrap_err();
        assert!(err.is_callback());
        assert_eq!(err.layer(), Some(0));
        // The back layer drew and was cleared; the failing one was not.
        assert_eq!(canvas.ids(), [1]);
        assert!(layers[1][0].state.local_dirty().is_empty());
        assert!(!layers[0][0].state.local_dirty().is_empty());
    }

    #[test]
    fn failed_first_frame_is_drawn_on_retry() {
        let mut broken = Sprite::new(IRect::new(2, 2, 3, 3)).with_id(0);
        broken.fail_draw = true;
        let back = Sprite::new(IRect::new(0, 0, 8, 8)).with_id(1);
        let mut layers = vec![vec![broken], vec![back]];
        let mut canvas = Canvas::default();
        let mut compositor = Compositor::new();
        assert!(compositor.composite(&mut canvas, &mut layers, &[]).is_err());
        assert!(!layers[0][0].state.was_visible());
        assert!(!layers[1][0].state.was_visible());

        layers[0][0].fail_draw = false;
        let out = compositor.composite(&mut canvas, &mut layers, &[]).unwrap();
        assert_eq!(out.as_deref().map(covered_area), Some(64));
        assert_eq!(canvas.ids(), [1, 1, 0]);
        assert!(layers[0][0].state.was_visible());
    }

    #[test]
    fn failed_hook_keeps_hidden_drawables_dirty() {
        let mut layers = vec![
            vec![Sprite::shown(IRect::new(0, 0, 4, 4)).with_id(0)],
            vec![Sprite::shown(IRect::new(0, 0, 8, 8)).with_id(1)],
        ];
        layers[0][0].state.set_visible(false);
        layers[1][0].fail_pre_draw = true;
        let mut canvas = Canvas::default();
        let mut compositor = Compositor::new();
        let err = compositor.composite(&mut canvas, &mut layers, &[]).unwrap_err();
        assert!(matches!(err, CompositeError::PreDraw { layer: 1, .. }));
        assert!(layers[0][0].state.was_visible());

        layers[1][0].fail_pre_draw = false;
        let out = compositor.composite(&mut canvas, &mut layers, &[]).unwrap();
        assert_eq!(out, Some(vec![IRect::new(0, 0, 4, 4)]));
        assert_eq!(canvas.draws, [(1, vec![IRect::new(0, 0, 4, 4)])]);
    }

    #[test]
    fn region_limits_abort_the_frame() {
        let mut layers = vec![vec![Sprite::shown(IRect::new(0, 0, 64, 64))]];
        let forced: Vec<IRect> = (0..8).map(|i| IRect::new(i * 5, i * 5, 3, 3)).collect();
        let mut canvas = Canvas::default();
        let mut compositor = Compositor::with_options(
            CompositorOptions::new().with_limits(RegionLimits::with_max_cells(4)),
        );
        let err = compositor.composite(&mut canvas, &mut layers, &forced).unwrap_err();
        assert!(!err.is_callback());
        assert!(matches!(err, CompositeError::Region(_)));
        assert!(canvas.draws.is_empty());
    }

    #[test]
    fn scratch_is_reused_across_frames() {
        let mut layers = vec![vec![Sprite::shown(IRect::new(0, 0, 8, 8))]];
        let mut canvas = Canvas::default();
        let mut compositor = Compositor::new();
        for i in 0..4 {
            let forced = [IRect::new(i, i, 2, 2)];
            let out = compositor.composite(&mut canvas, &mut layers, &forced).unwrap();
            assert_eq!(out, Some(vec![IRect::new(i, i, 2, 2)]));
        }
        assert_eq!(canvas.draws.len(), 4);
    }
}
