// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::ops::Add;

use kurbo::{Point, Vec2};

/// A rectangle given by its center, size, clockwise rotation in degrees and
/// corner radius.
///
/// A corner radius in `(0, 0.5]` is relative to `min(width, height)`; a radius
/// of at least `1` is in pixels. Radii in between are invalid.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    /// Horizontal center.
    pub cx: f64,
    /// Vertical center.
    pub cy: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// Clockwise rotation in degrees.
    pub rotation: f64,
    /// Corner radius.
    pub radius: f64,
}

impl Rect {
    /// An axis-aligned rectangle with sharp corners.
    pub const fn new(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self {
            cx,
            cy,
            width,
            height,
            rotation: 0.0,
            radius: 0.0,
        }
    }

    /// Axis-aligned rectangle from its top-left corner and size.
    pub fn from_ltwh(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self::new(left + width / 2.0, top + height / 2.0, width, height)
    }

    /// Axis-aligned rectangle from its edges.
    pub fn from_lrtb(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self::from_ltwh(left, top, right - left, bottom - top)
    }

    /// Axis-aligned rectangle from its center and size.
    pub fn from_cwh(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self::new(cx, cy, width, height)
    }

    /// Returns this rectangle rotated by `degrees` about its center.
    #[must_use]
    pub fn with_rotation(self, degrees: f64) -> Self {
        Self {
            rotation: degrees,
            ..self
        }
    }

    /// Returns this rectangle with a different corner radius.
    #[must_use]
    pub fn with_radius(self, radius: f64) -> Self {
        Self { radius, ..self }
    }

    /// Center point.
    pub fn center(&self) -> Point {
        Point::new(self.cx, self.cy)
    }

    /// Size as a vector.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Half the width.
    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    /// Half the height.
    pub fn half_height(&self) -> f64 {
        self.height / 2.0
    }

    /// Left edge, ignoring rotation.
    pub fn left(&self) -> f64 {
        self.cx - self.half_width()
    }

    /// Right edge, ignoring rotation.
    pub fn right(&self) -> f64 {
        self.cx + self.half_width()
    }

    /// Top edge, ignoring rotation.
    pub fn top(&self) -> f64 {
        self.cy - self.half_height()
    }

    /// Bottom edge, ignoring rotation.
    pub fn bottom(&self) -> f64 {
        self.cy + self.half_height()
    }

    /// Top-left corner, ignoring rotation.
    pub fn top_left(&self) -> Point {
        Point::new(self.left(), self.top())
    }

    /// Bottom-right corner, ignoring rotation.
    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    /// Returns `true` if the corners are rounded.
    pub fn is_rounded(&self) -> bool {
        self.radius > 0.0
    }

    /// Corner radius in pixels.
    pub fn absolute_radius(&self) -> f64 {
        if self.radius <= 0.5 {
            self.radius * self.width.min(self.height)
        } else {
            self.radius
        }
    }

    /// Positive size, a radius up to half the shorter side and no radius
    /// within `(0.5, 1)`.
    pub fn is_valid(&self) -> bool {
        if !(self.width > 0.0 && self.height > 0.0) {
            return false;
        }
        if self.radius < 0.0 || self.radius > self.width.min(self.height) / 2.0 {
            return false;
        }
        !(self.radius > 0.5 && self.radius < 1.0)
    }

    /// Axis-aligned [`kurbo::Rect`] with the same extent, ignoring rotation
    /// and corner radius.
    pub fn to_kurbo(&self) -> kurbo::Rect {
        kurbo::Rect::new(self.left(), self.top(), self.right(), self.bottom())
    }
}

impl Add<Vec2> for Rect {
    type Output = Self;

    fn add(self, offset: Vec2) -> Self {
        Self {
            cx: self.cx + offset.x,
            cy: self.cy + offset.y,
            ..self
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect(cx={:.1}, cy={:.1}, w={:.1}, h={:.1}, rot={:.1}, radius={:.1})",
            self.cx, self.cy, self.width, self.height, self.rotation, self.radius
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_agree() {
        let a = Rect::from_ltwh(10.0, 20.0, 30.0, 40.0);
        let b = Rect::from_lrtb(10.0, 40.0, 20.0, 60.0);
        let c = Rect::from_cwh(25.0, 40.0, 30.0, 40.0);
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.top_left(), Point::new(10.0, 20.0));
        assert_eq!(a.bottom_right(), Point::new(40.0, 60.0));
        assert_eq!(a + Vec2::new(1.0, -1.0), Rect::from_ltwh(11.0, 19.0, 30.0, 40.0));
    }

    #[test]
    fn validity() {
        let r = Rect::from_cwh(0.0, 0.0, 20.0, 10.0);
        assert!(r.is_valid());
        assert!(r.with_radius(0.5).is_valid());
        assert!(!r.with_radius(0.7).is_valid());
        assert!(r.with_radius(1.0).is_valid());
        assert!(r.with_radius(5.0).is_valid());
        assert!(!r.with_radius(5.5).is_valid());
        assert!(!r.with_radius(-0.1).is_valid());
        assert!(!Rect::from_cwh(0.0, 0.0, 0.0, 10.0).is_valid());
    }

    #[test]
    fn relative_radius() {
        let r = Rect::from_cwh(0.0, 0.0, 20.0, 10.0).with_radius(0.2);
        assert!((r.absolute_radius() - 2.0).abs() < 1e-12);
        assert!((r.with_radius(4.0).absolute_radius() - 4.0).abs() < 1e-12);
    }
}
