// Copyright 2026 the Overpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawable capability consumed by the compositor, and a reusable state block.

use alloc::boxed::Box;
use alloc::vec::Vec;

use overpaint_region::IRect;

/// Something the compositor can invalidate, cull against, and draw.
///
/// The compositor is generic over this capability only; hosts implement it for
/// whatever scene objects they have (sprites, text runs, nested managers).
/// [`DrawState`] implements the bookkeeping half of this trait for the common
/// case and can be embedded in a host type.
///
/// All rectangles are in surface (world) space.
///
/// ## Frame protocol
///
/// During one [`Compositor::composite`](crate::Compositor::composite) call the
/// compositor calls, per drawable:
///
/// 1. [`pre_draw`](Self::pre_draw), then reads [`visible`](Self::visible),
///    [`was_visible`](Self::was_visible), [`bounds`](Self::bounds),
///    [`previous_bounds`](Self::previous_bounds) and
///    [`local_dirty`](Self::local_dirty), then calls
///    [`set_was_visible`](Self::set_was_visible) with the current visibility.
/// 2. [`is_opaque_over`](Self::is_opaque_over) while culling.
/// 3. [`draw`](Self::draw) if visible and anything in its bounds is dirty, then
///    [`clear_local_dirty`](Self::clear_local_dirty).
///
/// If any callback fails the frame is abandoned and later steps are skipped,
/// so the local dirty list survives for the next frame. The compositor then
/// calls [`set_was_visible`](Self::set_was_visible) again with the value it
/// read at the start of the frame.
pub trait Drawable {
    /// Draw target passed through to [`draw`](Self::draw).
    type Surface: ?Sized;
    /// Error raised by [`pre_draw`](Self::pre_draw) and [`draw`](Self::draw).
    type Error;

    /// Whether the drawable is shown this frame.
    fn visible(&self) -> bool;

    /// Visibility as of the previous frame.
    ///
    /// This cache is maintained by the compositor through
    /// [`set_was_visible`](Self::set_was_visible).
    fn was_visible(&self) -> bool;

    /// Stores the visibility cache for the next frame.
    fn set_was_visible(&mut self, was_visible: bool);

    /// Current bounding rectangle.
    fn bounds(&self) -> IRect;

    /// Bounding rectangle as of the previous frame.
    fn previous_bounds(&self) -> IRect;

    /// Regions of the drawable that changed since the last frame.
    fn local_dirty(&self) -> &[IRect];

    /// Forgets all local dirty regions.
    fn clear_local_dirty(&mut self);

    /// Hook run before dirty regions are collected.
    ///
    /// Use it to bring [`local_dirty`](Self::local_dirty) and the bounds up to
    /// date. The default does nothing.
    fn pre_draw(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Whether the drawable paints fully opaque pixels over all of `rect`.
    ///
    /// Returning `true` lets the compositor skip redrawing layers behind this
    /// drawable in `rect`. Returning `false` is always safe.
    fn is_opaque_over(&self, rect: IRect) -> bool;

    /// Draws the parts of the drawable inside `rects`.
    ///
    /// `rects` is non-empty, and every rectangle is non-empty and lies within
    /// [`bounds`](Self::bounds).
    fn draw(&mut self, surface: &mut Self::Surface, rects: &[IRect]) -> Result<(), Self::Error>;
}

macro_rules! forward_drawable {
    ($($ptr:ty),*) => {$(
        impl<D: Drawable + ?Sized> Drawable for $ptr {
            type Surface = D::Surface;
            type Error = D::Error;

            #[inline]
            fn visible(&self) -> bool {
                (**self).visible()
            }
            #[inline]
            fn was_visible(&self) -> bool {
                (**self).was_visible()
            }
            #[inline]
            fn set_was_visible(&mut self, was_visible: bool) {
                (**self).set_was_visible(was_visible);
            }
            #[inline]
            fn bounds(&self) -> IRect {
                (**self).bounds()
            }
            #[inline]
            fn previous_bounds(&self) -> IRect {
                (**self).previous_bounds()
            }
            #[inline]
            fn local_dirty(&self) -> &[IRect] {
                (**self).local_dirty()
            }
            #[inline]
            fn clear_local_dirty(&mut self) {
                (**self).clear_local_dirty();
            }
            #[inline]
            fn pre_draw(&mut self) -> Result<(), Self::Error> {
                (**self).pre_draw()
            }
            #[inline]
            fn is_opaque_over(&self, rect: IRect) -> bool {
                (**self).is_opaque_over(rect)
            }
            #[inline]
            fn draw(
                &mut self,
                surface: &mut Self::Surface,
                rects: &[IRect],
            ) -> Result<(), Self::Error> {
                (**self).draw(surface, rects)
            }
        }
    )*};
}

forward_drawable!(&mut D, Box<D>);

/// Per-drawable bookkeeping for hosts implementing [`Drawable`].
///
/// `DrawState` tracks where a drawable is, where it was last drawn, whether it
/// is visible and opaque, and which of its parts changed. Embed it in a host
/// type and forward the bookkeeping methods of [`Drawable`] to it:
///
/// | [`Drawable`] method | `DrawState` method |
/// |---|---|
/// | `visible` / `was_visible` / `set_was_visible` | [`visible`](Self::visible) / [`was_visible`](Self::was_visible) / [`set_was_visible`](Self::set_was_visible) |
/// | `bounds` / `previous_bounds` | [`bounds`](Self::bounds) / [`drawn_bounds`](Self::drawn_bounds) |
/// | `local_dirty` / `clear_local_dirty` | [`local_dirty`](Self::local_dirty) / [`clear_local_dirty`](Self::clear_local_dirty) |
/// | `pre_draw` | [`prepare`](Self::prepare) |
/// | `is_opaque_over` | [`is_opaque_over`](Self::is_opaque_over) |
/// | `draw` | host blit, then [`mark_drawn`](Self::mark_drawn) |
///
/// Invalidations are recorded relative to the drawable's origin and only
/// become world-space dirty regions in [`prepare`](Self::prepare). Moving the
/// drawable (or invalidating all of it) dirties both where it was last drawn
/// and where it is now.
#[derive(Clone, Debug)]
pub struct DrawState {
    bounds: IRect,
    drawn_bounds: IRect,
    visible: bool,
    was_visible: bool,
    opaque: bool,
    pending: Vec<IRect>,
    pending_all: bool,
    dirty: Vec<IRect>,
}

impl DrawState {
    /// Creates visible, non-opaque state at `bounds`.
    ///
    /// The drawable counts as not having been visible before, so its first
    /// frame invalidates all of `bounds`.
    pub fn new(bounds: IRect) -> Self {
        Self {
            bounds,
            drawn_bounds: bounds,
            visible: true,
            was_visible: false,
            opaque: false,
            pending: Vec::new(),
            pending_all: false,
            dirty: Vec::new(),
        }
    }

    /// Sets whether the drawable covers its bounds with opaque pixels.
    #[must_use]
    pub fn with_opaque(mut self, opaque: bool) -> Self {
        self.opaque = opaque;
        self
    }

    /// Current bounds.
    pub fn bounds(&self) -> IRect {
        self.bounds
    }

    /// Bounds at the time of the last [`mark_drawn`](Self::mark_drawn).
    pub fn drawn_bounds(&self) -> IRect {
        self.drawn_bounds
    }

    /// Whether the drawable is shown.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Cached previous-frame visibility.
    pub fn was_visible(&self) -> bool {
        self.was_visible
    }

    /// Stores the previous-frame visibility cache.
    pub fn set_was_visible(&mut self, was_visible: bool) {
        self.was_visible = was_visible;
    }

    /// Whether the drawable paints only opaque pixels.
    pub fn is_opaque(&self) -> bool {
        self.opaque
    }

    /// Shows or hides the drawable.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Marks the drawable as opaque or translucent.
    ///
    /// This changes the pixels that end up on screen, so the whole drawable
    /// is invalidated when the flag changes.
    pub fn set_opaque(&mut self, opaque: bool) {
        if self.opaque != opaque {
            self.opaque = opaque;
            self.pending_all = true;
        }
    }

    /// Replaces the bounds.
    pub fn set_bounds(&mut self, bounds: IRect) {
        self.bounds = bounds;
    }

    /// Moves the origin to `(x, y)`, keeping the size.
    pub fn move_to(&mut self, x: i32, y: i32) {
        self.bounds = self.bounds.with_origin(x, y);
    }

    /// Moves by `(dx, dy)`.
    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.bounds = self.bounds.translate(dx, dy);
    }

    /// Marks part of the drawable as changed.
    ///
    /// `rect` is relative to the drawable's origin. Empty rectangles are
    /// ignored.
    pub fn invalidate(&mut self, rect: IRect) {
        if !rect.is_empty() {
            self.pending.push(rect);
        }
    }

    /// Marks the whole drawable as changed.
    pub fn invalidate_all(&mut self) {
        self.pending_all = true;
    }

    /// Turns pending invalidations into world-space dirty regions.
    ///
    /// If the drawable moved since it was last drawn, or was invalidated as a
    /// whole, both the last drawn bounds and the current bounds become dirty.
    /// Otherwise each pending local rectangle is translated to the current
    /// origin.
    pub fn prepare(&mut self) {
        if self.pending_all || self.bounds != self.drawn_bounds {
            self.dirty.push(self.drawn_bounds);
            self.dirty.push(self.bounds);
        } else {
            let (x, y) = (self.bounds.x, self.bounds.y);
            self.dirty.extend(self.pending.iter().map(|r| r.translate(x, y)));
        }
        self.pending.clear();
        self.pending_all = false;
    }

    /// World-space dirty regions produced by [`prepare`](Self::prepare).
    pub fn local_dirty(&self) -> &[IRect] {
        &self.dirty
    }

    /// Forgets all world-space dirty regions.
    pub fn clear_local_dirty(&mut self) {
        self.dirty.clear();
    }

    /// Whether the drawable is visible, opaque, and covers all of `rect`.
    pub fn is_opaque_over(&self, rect: IRect) -> bool {
        self.visible && self.opaque && self.bounds.contains(rect)
    }

    /// Records the current bounds as the last drawn position.
    ///
    /// Call this from [`Drawable::draw`] once the drawable has been painted.
    pub fn mark_drawn(&mut self) {
        self.drawn_bounds = self.bounds;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_invalidation_is_translated() {
        let mut state = DrawState::new(IRect::new(100, 50, 20, 20));
        state.invalidate(IRect::new(2, 3, 4, 5));
        state.invalidate(IRect::new(0, 0, 0, 5));
        state.prepare();
        assert_eq!(state.local_dirty(), &[IRect::new(102, 53, 4, 5)]);
    }

    #[test]
    fn moving_dirties_old_and_new_bounds() {
        let mut state = DrawState::new(IRect::new(0, 0, 10, 10));
        state.invalidate(IRect::new(1, 1, 1, 1));
        state.move_by(30, 0);
        state.prepare();
        assert_eq!(
            state.local_dirty(),
            &[IRect::new(0, 0, 10, 10), IRect::new(30, 0, 10, 10)]
        );

        state.mark_drawn();
        state.clear_local_dirty();
        state.prepare();
        assert!(state.local_dirty().is_empty());
        assert_eq!(state.drawn_bounds(), IRect::new(30, 0, 10, 10));
    }

    #[test]
    fn invalidate_all_covers_bounds() {
        let mut state = DrawState::new(IRect::new(5, 5, 10, 10));
        state.invalidate_all();
        state.prepare();
        assert_eq!(
            state.local_dirty(),
            &[IRect::new(5, 5, 10, 10), IRect::new(5, 5, 10, 10)]
        );
    }

    #[test]
    fn opacity_requires_visibility_and_cover() {
        let mut state = DrawState::new(IRect::new(0, 0, 10, 10)).with_opaque(true);
        assert!(state.is_opaque_over(IRect::new(2, 2, 5, 5)));
        assert!(!state.is_opaque_over(IRect::new(8, 8, 5, 5)));
        state.set_visible(false);
        assert!(!state.is_opaque_over(IRect::new(2, 2, 5, 5)));
    }

    #[test]
    fn toggling_opacity_invalidates_everything() {
        let mut state = DrawState::new(IRect::new(0, 0, 4, 4));
        state.set_opaque(true);
        state.prepare();
        assert_eq!(state.local_dirty().len(), 2);
        state.clear_local_dirty();
        state.set_opaque(true);
        state.prepare();
        assert!(state.local_dirty().is_empty());
    }
}
