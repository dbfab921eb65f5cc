// Copyright 2026 the Overpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer axis-aligned rectangles.

/// An integer, axis-aligned rectangle.
///
/// The rectangle covers the half-open ranges `x..x + w` and `y..y + h`.
///
/// ## Empty rectangles
///
/// A rectangle whose width or height is zero or negative is *empty*. Empty
/// rectangles cover no area, contribute no edges to set operations, and are
/// silently dropped from every output list. Negative sizes are never
/// normalized; they are treated exactly like zero.
///
/// Coordinate arithmetic saturates at the `i32` range.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
}

impl IRect {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Creates a rectangle from its origin and size.
    #[inline]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Creates a rectangle from its left, top, right and bottom edges.
    ///
    /// If `right < left` or `bottom < top` the result is empty. Spans wider
    /// than `i32::MAX` saturate.
    #[inline]
    pub const fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(
            left,
            top,
            right.saturating_sub(left),
            bottom.saturating_sub(top),
        )
    }

    /// Left edge (same as `x`).
    #[inline]
    pub const fn left(self) -> i32 {
        self.x
    }

    /// Top edge (same as `y`).
    #[inline]
    pub const fn top(self) -> i32 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(self) -> i32 {
        self.x.saturating_add(self.w)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(self) -> i32 {
        self.y.saturating_add(self.h)
    }

    /// Returns `true` if the rectangle covers no area.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Covered area; zero for empty rectangles.
    #[inline]
    pub fn area(self) -> u64 {
        if self.is_empty() {
            0
        } else {
            u64::from(self.w.unsigned_abs()) * u64::from(self.h.unsigned_abs())
        }
    }

    /// Intersection of `self` and `other`.
    ///
    /// When the rectangles do not overlap (or either is empty) the result is an
    /// empty rectangle positioned at `self`'s origin.
    #[must_use]
    pub fn clip(self, other: Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return self.with_size(0, 0);
        }
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right > left && bottom > top {
            Self::from_edges(left, top, right, bottom)
        } else {
            self.with_size(0, 0)
        }
    }

    /// Returns `true` if the two rectangles share a non-zero area.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        !self.clip(other).is_empty()
    }

    /// Returns `true` if `other` lies entirely within `self`.
    ///
    /// An empty `self` contains nothing.
    pub fn contains(self, other: Self) -> bool {
        !self.is_empty()
            && other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Smallest rectangle containing both `self` and `other`.
    ///
    /// Empty operands are ignored; the union of two empty rectangles is `self`.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        match (self.is_empty(), other.is_empty()) {
            (_, true) => self,
            (true, false) => other,
            (false, false) => Self::from_edges(
                self.x.min(other.x),
                self.y.min(other.y),
                self.right().max(other.right()),
                self.bottom().max(other.bottom()),
            ),
        }
    }

    /// Returns the rectangle moved by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.w,
            self.h,
        )
    }

    /// Returns the rectangle moved so that its origin is `(x, y)`.
    #[inline]
    #[must_use]
    pub const fn with_origin(self, x: i32, y: i32) -> Self {
        Self::new(x, y, self.w, self.h)
    }

    /// Returns the rectangle resized to `(w, h)`, keeping its origin.
    #[inline]
    #[must_use]
    pub const fn with_size(self, w: i32, h: i32) -> Self {
        Self::new(self.x, self.y, w, h)
    }

    /// Converts to a Kurbo rectangle.
    #[inline]
    pub fn to_kurbo(self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.right()),
            f64::from(self.bottom()),
        )
    }

    /// Smallest integer rectangle containing a Kurbo rectangle.
    ///
    /// Edges are rounded outward, so the result always covers `rect`.
    /// Inputs are assumed to be finite; values beyond the `i32` range clamp.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "edges are already integral after `expand` and float-to-int casts saturate"
    )]
    pub fn from_kurbo_expand(rect: kurbo::Rect) -> Self {
        let r = rect.abs().expand();
        Self::from_edges(r.x0 as i32, r.y0 as i32, r.x1 as i32, r.y1 as i32)
    }
}

impl From<IRect> for kurbo::Rect {
    #[inline]
    fn from(rect: IRect) -> Self {
        rect.to_kurbo()
    }
}
