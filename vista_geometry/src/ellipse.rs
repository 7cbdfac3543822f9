// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::ops::Add;

use kurbo::{Point, Vec2};

const ANGLE_EPSILON: f64 = 1e-9;

/// An ellipse, or an elliptic arc if the drawn angles don't cover a full turn.
///
/// Angles are in degrees, measured clockwise from the major axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ellipse {
    /// Horizontal center.
    pub cx: f64,
    /// Vertical center.
    pub cy: f64,
    /// Length of the major axis.
    pub major_axis: f64,
    /// Length of the minor axis.
    pub minor_axis: f64,
    /// Clockwise rotation of the major axis in degrees.
    pub rotation: f64,
    /// Start angle of the drawn arc.
    pub angle_from: f64,
    /// End angle of the drawn arc.
    pub angle_to: f64,
    /// Whether a partial ellipse is closed through its center (a pie slice)
    /// or left as an open arc.
    pub include_center: bool,
}

impl Ellipse {
    /// A full, axis-aligned ellipse.
    pub const fn new(cx: f64, cy: f64, major_axis: f64, minor_axis: f64) -> Self {
        Self {
            cx,
            cy,
            major_axis,
            minor_axis,
            rotation: 0.0,
            angle_from: 0.0,
            angle_to: 360.0,
            include_center: true,
        }
    }

    /// Returns this ellipse rotated by `degrees`.
    #[must_use]
    pub fn with_rotation(self, degrees: f64) -> Self {
        Self {
            rotation: degrees,
            ..self
        }
    }

    /// Returns the arc of this ellipse between the two angles.
    #[must_use]
    pub fn with_angles(self, angle_from: f64, angle_to: f64, include_center: bool) -> Self {
        Self {
            angle_from,
            angle_to,
            include_center,
            ..self
        }
    }

    /// The ellipse whose major axis runs from `pt1` to `pt2`, with the
    /// given minor axis length `width`.
    pub fn from_endpoints(
        pt1: Point,
        pt2: Point,
        width: f64,
        angle_from: f64,
        angle_to: f64,
        include_center: bool,
    ) -> Self {
        let dir = pt2 - pt1;
        let major = dir.hypot();
        let center = pt1 + dir * 0.5;
        Self {
            cx: center.x,
            cy: center.y,
            major_axis: major,
            minor_axis: width,
            rotation: dir.y.atan2(dir.x).to_degrees(),
            angle_from,
            angle_to,
            include_center,
        }
    }

    /// Center point.
    pub fn center(&self) -> Point {
        Point::new(self.cx, self.cy)
    }

    /// Major and minor axis as a vector.
    pub fn axes(&self) -> Vec2 {
        Vec2::new(self.major_axis, self.minor_axis)
    }

    /// Returns `true` unless the drawn angles cover exactly `[0, 360]`.
    pub fn is_partial(&self) -> bool {
        self.angle_from.abs() > ANGLE_EPSILON || (self.angle_to - 360.0).abs() > ANGLE_EPSILON
    }

    /// Positive axes with `major_axis >= minor_axis` and distinct angles.
    pub fn is_valid(&self) -> bool {
        self.major_axis > 0.0
            && self.minor_axis > 0.0
            && self.major_axis >= self.minor_axis
            && (self.angle_from - self.angle_to).abs() > ANGLE_EPSILON
    }
}

impl Add<Vec2> for Ellipse {
    type Output = Self;

    fn add(self, offset: Vec2) -> Self {
        Self {
            cx: self.cx + offset.x,
            cy: self.cy + offset.y,
            ..self
        }
    }
}

impl fmt::Display for Ellipse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ellipse(cx={:.1}, cy={:.1}, mj={:.1}, mn={:.1}; rot={:.1}, a1={:.1}°, a2={:.1}°",
            self.cx,
            self.cy,
            self.major_axis,
            self.minor_axis,
            self.rotation,
            self.angle_from,
            self.angle_to
        )?;
        if self.is_partial() {
            let center = if self.include_center { "w/" } else { "w/o" };
            write!(f, ", {center} center")?;
        }
        if !self.is_valid() {
            f.write_str(", invalid")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity() {
        assert!(Ellipse::new(0.0, 0.0, 10.0, 5.0).is_valid());
        assert!(Ellipse::new(0.0, 0.0, 5.0, 5.0).is_valid());
        assert!(!Ellipse::new(0.0, 0.0, 5.0, 10.0).is_valid());
        assert!(!Ellipse::new(0.0, 0.0, 10.0, 0.0).is_valid());
        let e = Ellipse::new(0.0, 0.0, 10.0, 5.0).with_angles(30.0, 30.0, true);
        assert!(!e.is_valid());
    }

    #[test]
    fn partial_arcs() {
        let full = Ellipse::new(0.0, 0.0, 10.0, 5.0);
        assert!(!full.is_partial());
        assert!(full.with_angles(0.0, 90.0, false).is_partial());
        assert!(full.to_string().ends_with("a2=360.0°)"));
        assert!(full.with_angles(0.0, 90.0, false).to_string().contains("w/o center"));
    }

    #[test]
    fn endpoints_define_major_axis() {
        let e = Ellipse::from_endpoints(
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
            4.0,
            0.0,
            360.0,
            true,
        );
        assert_eq!(e.center(), Point::new(0.0, 5.0));
        assert!((e.major_axis - 10.0).abs() < 1e-12);
        assert!((e.rotation - 90.0).abs() < 1e-12);
        assert!(e.is_valid());
    }
}
