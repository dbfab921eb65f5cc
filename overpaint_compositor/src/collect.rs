// Copyright 2026 the Overpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gathering the frame's dirty rectangles from drawables.

use alloc::vec::Vec;

use overpaint_region::IRect;

use crate::{CompositeError, Drawable};

/// Appends every drawable's dirty rectangles for this frame to `dirty`.
///
/// Drawables are visited layer by layer, in slice order. For each one:
///
/// 1. [`pre_draw`](Drawable::pre_draw) runs. A failure aborts immediately with
///    [`CompositeError::PreDraw`]; drawables already visited keep their
///    updated visibility cache.
/// 2. If visibility changed since the last frame, the local dirty list is
///    replaced (for this collection only) by the previous bounds when the
///    drawable was hidden, or by the current bounds when it was shown.
/// 3. The list is clipped to the previous bounds if the drawable was visible,
///    and to the current bounds if it is visible now. Non-empty clips are
///    appended.
/// 4. The visibility cache is updated.
///
/// `dirty` may already hold forced invalidations. The appended rectangles are
/// non-empty but may overlap each other and those already present.
///
/// # Errors
///
/// Returns [`CompositeError::PreDraw`] if a hook fails.
pub fn collect_dirty<D, L>(
    layers: &mut [L],
    dirty: &mut Vec<IRect>,
) -> Result<(), CompositeError<D::Error>>
where
    D: Drawable,
    L: AsMut<[D]>,
{
    for (layer, drawables) in layers.iter_mut().enumerate() {
        for (index, drawable) in drawables.as_mut().iter_mut().enumerate() {
            drawable
                .pre_draw()
                .map_err(|source| CompositeError::PreDraw {
                    layer,
                    index,
                    source,
                })?;
            collect_one(drawable, dirty);
        }
    }
    Ok(())
}

fn collect_one<D: Drawable>(drawable: &mut D, dirty: &mut Vec<IRect>) {
    let was_visible = drawable.was_visible();
    let visible = drawable.visible();

    let toggled;
    let rects = if was_visible == visible {
        drawable.local_dirty()
    } else if visible {
        toggled = [drawable.bounds()];
        &toggled[..]
    } else {
        toggled = [drawable.previous_bounds()];
        &toggled[..]
    };

    if was_visible {
        push_clipped(dirty, rects, drawable.previous_bounds());
    }
    if visible {
        push_clipped(dirty, rects, drawable.bounds());
    }
    drawable.set_was_visible(visible);
}

fn push_clipped(dirty: &mut Vec<IRect>, rects: &[IRect], bounds: IRect) {
    dirty.extend(
        rects
            .iter()
            .map(|r| r.clip(bounds))
            .filter(|r| !r.is_empty()),
    );
}
