// Copyright 2026 the Overpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overpaint Compositor: dirty-rectangle rendering of layered drawables.
//!
//! Each frame, only the parts of the surface that changed are redrawn, and
//! parts hidden behind opaque content in front are skipped. The crate is
//! generic over a single capability, [`Drawable`], which hosts implement for
//! their scene objects.
//!
//! - [`collect_dirty`]: gathers each drawable's dirty rectangles, accounting
//!   for movement and visibility changes since the last frame.
//! - [`cull_opaque`]: splits the frame's dirty region per layer, removing
//!   what opaque layers in front already cover.
//! - [`Compositor`] and [`composite`]: run a whole frame and return the
//!   disjoint list of rectangles to present.
//! - [`Stage`]: an optional layered container that tracks insertions,
//!   removals and forced invalidations for the host.
//! - [`DrawState`]: reusable per-drawable bookkeeping for implementing
//!   [`Drawable`].
//!
//! Rectangles are [`IRect`]s from [`overpaint_region`], re-exported here.
//!
//! ## Layer order
//!
//! Layers are passed as a slice of drawable lists. Index 0 is the front-most
//! layer: it is examined first when culling and drawn last.
//!
//! ## Frames
//!
//! ```rust
//! use overpaint_compositor::{Compositor, DrawState, Drawable, IRect};
//!
//! #[derive(Debug)]
//! struct Sprite {
//!     state: DrawState,
//!     color: u32,
//! }
//!
//! struct Framebuffer {
//!     width: i32,
//!     pixels: Vec<u32>,
//! }
//!
//! impl Drawable for Sprite {
//!     type Surface = Framebuffer;
//!     type Error = core::convert::Infallible;
//!
//!     fn visible(&self) -> bool { self.state.visible() }
//!     fn was_visible(&self) -> bool { self.state.was_visible() }
//!     fn set_was_visible(&mut self, v: bool) { self.state.set_was_visible(v) }
//!     fn bounds(&self) -> IRect { self.state.bounds() }
//!     fn previous_bounds(&self) -> IRect { self.state.drawn_bounds() }
//!     fn local_dirty(&self) -> &[IRect] { self.state.local_dirty() }
//!     fn clear_local_dirty(&mut self) { self.state.clear_local_dirty() }
//!     fn is_opaque_over(&self, rect: IRect) -> bool { self.state.is_opaque_over(rect) }
//!
//!     fn pre_draw(&mut self) -> Result<(), Self::Error> {
//!         self.state.prepare();
//!         Ok(())
//!     }
//!
//!     fn draw(&mut self, fb: &mut Framebuffer, rects: &[IRect]) -> Result<(), Self::Error> {
//!         for r in rects {
//!             for y in r.top()..r.bottom() {
//!                 for x in r.left()..r.right() {
//!                     fb.pixels[(y * fb.width + x) as usize] = self.color;
//!                 }
//!             }
//!         }
//!         self.state.mark_drawn();
//!         Ok(())
//!     }
//! }
//!
//! let mut fb = Framebuffer { width: 16, pixels: vec![0; 16 * 16] };
//! let background = Sprite {
//!     state: DrawState::new(IRect::new(0, 0, 16, 16)).with_opaque(true),
//!     color: 1,
//! };
//! let player = Sprite {
//!     state: DrawState::new(IRect::new(2, 2, 4, 4)).with_opaque(true),
//!     color: 2,
//! };
//! let mut layers = vec![vec![player], vec![background]];
//! let mut compositor = Compositor::new();
//!
//! // The first frame paints everything.
//! let first = compositor.composite(&mut fb, &mut layers, &[]).unwrap().unwrap();
//! assert_eq!(overpaint_region::covered_area(&first), 16 * 16);
//!
//! // Move the player: only its old and new positions are redrawn.
//! layers[0][0].state.move_by(1, 0);
//! let second = compositor.composite(&mut fb, &mut layers, &[]).unwrap().unwrap();
//! assert_eq!(overpaint_region::covered_area(&second), 4 * 5);
//! assert_eq!(fb.pixels[2 * 16 + 2], 1);
//! assert_eq!(fb.pixels[2 * 16 + 3], 2);
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. Logging goes through the `log`
//! facade: a `debug` record when a frame is skipped or aborted, and a `trace`
//! record per rendered frame.

#![no_std]

extern crate alloc;

mod collect;
mod compositor;
mod cull;
mod drawable;
mod error;
mod options;
mod stage;

#[cfg(test)]
mod test_support;

pub use collect::collect_dirty;
pub use compositor::{Compositor, composite};
pub use cull::{Culled, cull_opaque, cull_opaque_with};
pub use drawable::{DrawState, Drawable};
pub use error::CompositeError;
pub use options::CompositorOptions;
pub use stage::{DrawableId, Stage};

pub use overpaint_region::{self, IRect};
