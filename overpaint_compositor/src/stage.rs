// Copyright 2026 the Overpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A layered container of drawables that renders through a [`Compositor`].

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::mem;

use overpaint_region::IRect;

use crate::{CompositeError, Compositor, CompositorOptions, Drawable};

/// Handle to a drawable owned by a [`Stage`].
///
/// A slot index plus a generation counter. Removing a drawable frees its slot
/// and bumps the generation, so a stale `DrawableId` never refers to a
/// drawable inserted later into the same slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct DrawableId(u32, u32);

impl DrawableId {
    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    /// Layer holding the drawable, `None` while the slot is free.
    layer: Option<i32>,
}

#[derive(Debug)]
struct Entry<D> {
    id: DrawableId,
    drawable: D,
}

/// Drawables grouped into layers, plus the invalidations the host forced.
///
/// Layers are identified by an `i32` and kept sorted ascending; lower ids are
/// in front. Within a layer, drawables keep their insertion order. Layers
/// exist only while they hold drawables.
///
/// `Stage` takes care of the bookkeeping around membership changes:
///
/// - A newly inserted drawable starts with its visibility cache cleared, so
///   its first frame dirties only where it is now.
/// - Removing (or moving to another layer) a drawable that was on screen last
///   frame queues its previous bounds for redraw.
///
/// ```rust
/// use overpaint_compositor::{DrawState, Drawable, Stage};
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
///     fn pre_draw(&mut self) -> Result<(), ()> { self.0.prepare(); Ok(()) }
///     fn is_opaque_over(&self, rect: IRect) -> bool { self.0.is_opaque_over(rect) }
///     fn draw(&mut self, _: &mut (), _: &[IRect]) -> Result<(), ()> {
///         self.0.mark_drawn();
///         Ok(())
///     }
/// }
///
/// let mut stage = Stage::new(IRect::new(0, 0, 640, 480));
/// let id = stage.insert(0, Tile(DrawState::new(IRect::new(10, 10, 32, 32))));
/// assert_eq!(stage.render(&mut ()).unwrap(), Some(vec![IRect::new(10, 10, 32, 32)]));
///
/// stage.remove(id);
/// assert_eq!(stage.render(&mut ()).unwrap(), None);
/// // Nothing left to draw on, but the hole is still owed.
/// stage.insert(1, Tile(DrawState::new(IRect::new(0, 0, 640, 480))));
/// let out = stage.render(&mut ()).unwrap().unwrap();
/// assert_eq!(overpaint_region::covered_area(&out), 640 * 480);
/// ```
#[derive(Debug)]
pub struct Stage<D> {
    bounds: IRect,
    layers: BTreeMap<i32, Vec<Entry<D>>>,
    slots: Vec<Slot>,
    free: Vec<u32>,
    pending: Vec<IRect>,
    compositor: Compositor,
}

impl<D: Drawable> Stage<D> {
    /// Creates an empty stage over a surface with the given bounds.
    #[must_use]
    pub fn new(bounds: IRect) -> Self {
        Self::with_options(bounds, CompositorOptions::default())
    }

    /// Creates an empty stage that renders with `options`.
    #[must_use]
    pub fn with_options(bounds: IRect, options: CompositorOptions) -> Self {
        Self {
            bounds,
            layers: BTreeMap::new(),
            slots: Vec::new(),
            free: Vec::new(),
            pending: Vec::new(),
            compositor: Compositor::with_options(options),
        }
    }

    /// Surface bounds.
    pub fn bounds(&self) -> IRect {
        self.bounds
    }

    /// Changes the surface bounds and invalidates all of them.
    pub fn set_bounds(&mut self, bounds: IRect) {
        self.bounds = bounds;
        self.invalidate(bounds);
    }

    /// Compositor options used by [`render`](Self::render).
    pub fn options(&self) -> &CompositorOptions {
        self.compositor.options()
    }

    /// Replaces the compositor options.
    pub fn set_options(&mut self, options: CompositorOptions) {
        self.compositor.set_options(options);
    }

    /// Adds `drawable` to `layer` and returns its handle.
    ///
    /// The drawable's visibility cache is reset to `false`.
    pub fn insert(&mut self, layer: i32, mut drawable: D) -> DrawableId {
        drawable.set_was_visible(false);
        let id = if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.layer = Some(layer);
            DrawableId(idx, slot.generation)
        } else {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "slot count is bounded by u32 handles"
            )]
            let idx = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 1,
                layer: Some(layer),
            });
            DrawableId(idx, 1)
        };
        self.layers
            .entry(layer)
            .or_default()
            .push(Entry { id, drawable });
        id
    }

    /// Removes a drawable and returns it, or `None` if `id` is stale.
    ///
    /// If the drawable was visible last frame, the area it last occupied is
    /// queued for redraw.
    pub fn remove(&mut self, id: DrawableId) -> Option<D> {
        let drawable = self.detach(id)?;
        let slot = &mut self.slots[id.idx()];
        slot.layer = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.0);
        Some(drawable)
    }

    /// Moves a drawable to another layer, at the end of that layer's order.
    ///
    /// This behaves like a removal followed by an insertion, except that the
    /// handle stays valid. Returns `false` if `id` is stale.
    pub fn set_layer(&mut self, id: DrawableId, layer: i32) -> bool {
        let Some(mut drawable) = self.detach(id) else {
            return false;
        };
        drawable.set_was_visible(false);
        self.slots[id.idx()].layer = Some(layer);
        self.layers
            .entry(layer)
            .or_default()
            .push(Entry { id, drawable });
        true
    }

    /// Takes a drawable out of its layer, queueing its last on-screen area.
    fn detach(&mut self, id: DrawableId) -> Option<D> {
        let layer = self.layer_of(id)?;
        let entries = self.layers.get_mut(&layer)?;
        let pos = entries.iter().position(|e| e.id == id)?;
        let Entry { drawable, .. } = entries.remove(pos);
        if entries.is_empty() {
            self.layers.remove(&layer);
        }
        if drawable.was_visible() {
            self.invalidate(drawable.previous_bounds());
        }
        Some(drawable)
    }

    /// Returns `true` if `id` refers to a drawable on this stage.
    pub fn contains(&self, id: DrawableId) -> bool {
        self.layer_of(id).is_some()
    }

    /// Layer holding the drawable, or `None` if `id` is stale.
    pub fn layer_of(&self, id: DrawableId) -> Option<i32> {
        self.slots
            .get(id.idx())
            .filter(|slot| slot.generation == id.1)
            .and_then(|slot| slot.layer)
    }

    /// Shared access to a drawable.
    pub fn get(&self, id: DrawableId) -> Option<&D> {
        let layer = self.layer_of(id)?;
        self.layers
            .get(&layer)?
            .iter()
            .find(|e| e.id == id)
            .map(|e| &e.drawable)
    }

    /// Mutable access to a drawable.
    pub fn get_mut(&mut self, id: DrawableId) -> Option<&mut D> {
        let layer = self.layer_of(id)?;
        self.layers
            .get_mut(&layer)?
            .iter_mut()
            .find(|e| e.id == id)
            .map(|e| &mut e.drawable)
    }

    /// Number of drawables.
    pub fn len(&self) -> usize {
        self.layers.values().map(Vec::len).sum()
    }

    /// Returns `true` if the stage holds no drawables.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Ids of non-empty layers, front to back.
    pub fn layers(&self) -> impl Iterator<Item = i32> {
        self.layers.keys().copied()
    }

    /// All drawables, front layer first, in insertion order within a layer.
    pub fn iter(&self) -> impl Iterator<Item = (DrawableId, &D)> {
        self.layers
            .values()
            .flatten()
            .map(|e| (e.id, &e.drawable))
    }

    /// Forces `rect` to be redrawn next frame. Empty rectangles are ignored.
    pub fn invalidate(&mut self, rect: IRect) {
        if !rect.is_empty() {
            self.pending.push(rect);
        }
    }

    /// Forces the whole surface to be redrawn next frame.
    pub fn invalidate_all(&mut self) {
        self.invalidate(self.bounds);
    }

    /// Invalidations queued for the next frame.
    pub fn pending(&self) -> &[IRect] {
        &self.pending
    }

    /// Renders a frame of every layer onto `surface`.
    ///
    /// Returns `Ok(None)` without touching any drawable when the stage is
    /// empty; queued invalidations then wait for the next frame that has
    /// something to draw. Otherwise this is
    /// [`Compositor::composite`] seeded with the queued invalidations, which
    /// are consumed on success.
    ///
    /// # Errors
    ///
    /// See [`Compositor::composite`]. The queued invalidations are kept for
    /// the next attempt.
    pub fn render(
        &mut self,
        surface: &mut D::Surface,
    ) -> Result<Option<Vec<IRect>>, CompositeError<D::Error>> {
        if self.layers.is_empty() {
            return Ok(None);
        }
        let mut layers: Vec<Vec<&mut D>> = self
            .layers
            .values_mut()
            .map(|entries| entries.iter_mut().map(|e| &mut e.drawable).collect())
            .collect();
        let pending = mem::take(&mut self.pending);
        let result = self.compositor.composite(surface, &mut layers, &pending);
        if result.is_err() {
            self.pending = pending;
        }
        result
    }
}
