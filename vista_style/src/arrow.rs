// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use kurbo::Point;

use crate::{LineCap, LineJoin, LineStyle, StrokeGeometry, eps_eq};

/// How to draw an arrow: a shaft line plus the tip parameters.
#[derive(Clone, Debug)]
pub struct ArrowStyle {
    /// Style of the shaft and the tip lines.
    pub line: LineStyle,
    /// Tip length. Values up to `1` are relative to the shaft length, larger
    /// values are in pixels.
    pub tip_length: f64,
    /// Angle between the shaft and each tip line in degrees.
    pub tip_angle: f64,
    /// Draw the tip as a filled triangle instead of two lines.
    pub tip_closed: bool,
    /// Draw a tip at both ends.
    pub double_headed: bool,
}

impl ArrowStyle {
    /// An arrow with the given shaft style and tip parameters.
    pub fn new(line: LineStyle, tip_length: f64, tip_angle: f64) -> Self {
        Self {
            line,
            tip_length,
            tip_angle,
            tip_closed: false,
            double_headed: false,
        }
    }

    /// Returns this style with a filled (or open) tip.
    #[must_use]
    pub fn with_closed_tip(mut self, closed: bool) -> Self {
        self.tip_closed = closed;
        self
    }

    /// Returns this style with tips at both ends (or only at the target).
    #[must_use]
    pub fn with_double_head(mut self, double_headed: bool) -> Self {
        self.double_headed = double_headed;
        self
    }

    /// Valid shaft, positive tip length and a tip angle within `(0, 180)`.
    pub fn is_valid(&self) -> bool {
        self.line.is_valid()
            && self.tip_length > 0.0
            && self.tip_angle > 0.0
            && self.tip_angle < 180.0
    }

    /// Tip length in pixels for a shaft of the given length.
    pub fn tip_length_for_shaft(&self, shaft_length: f64) -> f64 {
        if self.tip_length > 1.0 {
            self.tip_length
        } else {
            self.tip_length * shaft_length
        }
    }

    /// Tip length in pixels for the shaft between the two points.
    pub fn tip_length_for_points(&self, from: Point, to: Point) -> f64 {
        self.tip_length_for_shaft(from.distance(to))
    }

    /// How far the stroked tip extends past the apex.
    ///
    /// The two tip lines meet at twice the tip angle.
    pub fn tip_offset(&self, miter_limit: f64) -> f64 {
        self.join_offset(2.0 * self.tip_angle, miter_limit)
    }
}

impl Default for ArrowStyle {
    fn default() -> Self {
        Self::new(LineStyle::default().with_cap(LineCap::Round), 0.1, 20.0)
    }
}

impl StrokeGeometry for ArrowStyle {
    fn stroke_width(&self) -> f64 {
        self.line.width
    }

    fn line_cap(&self) -> LineCap {
        self.line.cap
    }

    fn line_join(&self) -> LineJoin {
        self.line.join
    }
}

impl PartialEq for ArrowStyle {
    fn eq(&self, other: &Self) -> bool {
        self.line == other.line
            && eps_eq(self.tip_length, other.tip_length)
            && eps_eq(self.tip_angle, other.tip_angle)
            && self.tip_closed == other.tip_closed
            && self.double_headed == other.double_headed
    }
}

impl fmt::Display for ArrowStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ArrowStyle(lw={:.1}, tl={:.1}, ta={:.1}°, {}, ",
            self.line.width,
            self.tip_length,
            self.tip_angle,
            if self.tip_closed { "filled" } else { "open" }
        )?;
        if self.double_headed {
            f.write_str("double-headed, ")?;
        }
        write!(
            f,
            "{}, {}",
            self.line.color.to_hex(),
            if self.line.is_dashed() {
                "dashed"
            } else {
                "solid"
            }
        )?;
        if !self.is_valid() {
            f.write_str(", invalid")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_MITER_LIMIT;

    #[test]
    fn relative_and_absolute_tip_length() {
        let mut style = ArrowStyle::default();
        assert!((style.tip_length_for_shaft(200.0) - 20.0).abs() < 1e-9);
        let len = style.tip_length_for_points(Point::new(0.0, 0.0), Point::new(30.0, 40.0));
        assert!((len - 5.0).abs() < 1e-9);
        style.tip_length = 12.0;
        assert_eq!(style.tip_length_for_shaft(200.0), 12.0);
    }

    #[test]
    fn validity() {
        let style = ArrowStyle::default();
        assert!(style.is_valid());
        let mut bad = style.clone();
        bad.tip_angle = 180.0;
        assert!(!bad.is_valid());
        bad.tip_angle = 0.0;
        assert!(!bad.is_valid());
        let mut bad = style.clone();
        bad.tip_length = 0.0;
        assert!(!bad.is_valid());
        let mut bad = style;
        bad.line.width = 0.0;
        assert!(!bad.is_valid());
    }

    #[test]
    fn tip_offset_uses_double_tip_angle() {
        let mut style = ArrowStyle::default();
        style.line.join = LineJoin::Miter;
        style.tip_angle = 30.0;
        // Interior angle 60°: miter length is twice the width.
        assert!((style.tip_offset(DEFAULT_MITER_LIMIT) - style.line.width).abs() < 1e-9);
        style.line.join = LineJoin::Round;
        assert!((style.tip_offset(DEFAULT_MITER_LIMIT) - style.line.width / 2.0).abs() < 1e-9);
    }

    #[test]
    fn display_mentions_tip() {
        let s = ArrowStyle::default().with_closed_tip(true).to_string();
        assert!(s.starts_with("ArrowStyle(lw=2.0, tl=0.1, ta=20.0°, filled"));
    }
}
