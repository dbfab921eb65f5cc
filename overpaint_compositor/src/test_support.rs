// Copyright 2026 the Overpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A recording drawable shared by the unit tests.

use alloc::vec::Vec;

use overpaint_region::IRect;

use crate::{DrawState, Drawable};

#[derive(Debug, Default)]
pub(crate) struct Canvas {
    pub(crate) draws: Vec<(usize, Vec<IRect>)>,
}

impl Canvas {
    pub(crate) fn ids(&self) -> Vec<usize> {
        self.draws.iter().map(|(id, _)| *id).collect()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Broken;

#[derive(Debug)]
pub(crate) struct Sprite {
    pub(crate) id: usize,
    pub(crate) state: DrawState,
    pub(crate) fail_pre_draw: bool,
    pub(crate) fail_draw: bool,
}

impl Sprite {
    /// Visible, never drawn.
    pub(crate) fn new(bounds: IRect) -> Self {
        Self {
            id: 0,
            state: DrawState::new(bounds),
            fail_pre_draw: false,
            fail_draw: false,
        }
    }

    /// Visible and already on screen at `bounds`.
    pub(crate) fn shown(bounds: IRect) -> Self {
        let mut sprite = Self::new(bounds);
        sprite.state.set_was_visible(true);
        sprite
    }

    pub(crate) fn with_id(mut self, id: usize) -> Self {
        self.id = id;
        self
    }
}

impl Drawable for Sprite {
    type Surface = Canvas;
    type Error = Broken;

    fn visible(&self) -> bool {
        self.state.visible()
    }
    fn was_visible(&self) -> bool {
        self.state.was_visible()
    }
    fn set_was_visible(&mut self, was_visible: bool) {
        self.state.set_was_visible(was_visible);
    }
    fn bounds(&self) -> IRect {
        self.state.bounds()
    }
    fn previous_bounds(&self) -> IRect {
        self.state.drawn_bounds()
    }
    fn local_dirty(&self) -> &[IRect] {
        self.state.local_dirty()
    }
    fn clear_local_dirty(&mut self) {
        self.state.clear_local_dirty();
    }
    fn pre_draw(&mut self) -> Result<(), Broken> {
        if self.fail_pre_draw {
            return Err(Broken);
        }
        self.state.prepare();
        Ok(())
    }
    fn is_opaque_over(&self, rect: IRect) -> bool {
        self.state.is_opaque_over(rect)
    }
    fn draw(&mut self, canvas: &mut Canvas, rects: &[IRect]) -> Result<(), Broken> {
        if self.fail_draw {
            return Err(Broken);
        }
        canvas.draws.push((self.id, rects.to_vec()));
        self.state.mark_drawn();
        Ok(())
    }
}
