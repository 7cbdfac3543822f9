// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::str::FromStr;

use vista_color::{Color, ColorChoice};
use vista_geometry::ParseEnumError;

use crate::{LineCap, LineJoin, StrokeGeometry, eps_eq};

/// Marker shapes, each with a single character code.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Marker {
    /// A filled circle, `'.'`.
    Point,
    /// A circle, `'o'`.
    #[default]
    Circle,
    /// Plus sign, `'+'`.
    Plus,
    /// Diagonal cross, `'x'`.
    Cross,
    /// Square, `'s'`.
    Square,
    /// Square rotated by 45°, `'r'`.
    RotatedSquare,
    /// Diamond, narrower than a rotated square, `'d'`.
    Diamond,
    /// Upward-pointing triangle, `'^'`.
    TriangleUp,
    /// Downward-pointing triangle, `'v'`.
    TriangleDown,
    /// Left-pointing triangle, `'<'`.
    TriangleLeft,
    /// Right-pointing triangle, `'>'`.
    TriangleRight,
    /// Five-pointed asterisk, `'*'`.
    Star,
    /// Five-pointed star, `'5'`.
    Pentagram,
    /// Regular pentagon, `'p'`.
    Pentagon,
    /// Six-pointed star, `'6'`.
    Hexagram,
    /// Regular hexagon, `'h'`.
    Hexagon,
    /// Seven-pointed star, `'7'`.
    Heptagram,
    /// Regular heptagon, `'H'`.
    Heptagon,
    /// Eight-pointed star, `'8'`.
    Octagram,
    /// Regular octagon, `'0'` (zero).
    Octagon,
    /// Nine-pointed star, `'9'`.
    Enneagram,
    /// Regular enneagon, `'n'`.
    Enneagon,
}

impl Marker {
    /// Every marker shape, in the order of their codes.
    pub const ALL: [Self; 22] = [
        Self::Point,
        Self::Circle,
        Self::Plus,
        Self::Cross,
        Self::Square,
        Self::RotatedSquare,
        Self::Diamond,
        Self::TriangleUp,
        Self::TriangleDown,
        Self::TriangleLeft,
        Self::TriangleRight,
        Self::Star,
        Self::Pentagram,
        Self::Pentagon,
        Self::Hexagram,
        Self::Hexagon,
        Self::Heptagram,
        Self::Heptagon,
        Self::Octagram,
        Self::Octagon,
        Self::Enneagram,
        Self::Enneagon,
    ];

    /// The character code of this shape.
    pub const fn to_char(self) -> char {
        match self {
            Self::Point => '.',
            Self::Circle => 'o',
            Self::Plus => '+',
            Self::Cross => 'x',
            Self::Square => 's',
            Self::RotatedSquare => 'r',
            Self::Diamond => 'd',
            Self::TriangleUp => '^',
            Self::TriangleDown => 'v',
            Self::TriangleLeft => '<',
            Self::TriangleRight => '>',
            Self::Star => '*',
            Self::Pentagram => '5',
            Self::Pentagon => 'p',
            Self::Hexagram => '6',
            Self::Hexagon => 'h',
            Self::Heptagram => '7',
            Self::Heptagon => 'H',
            Self::Octagram => '8',
            Self::Octagon => '0',
            Self::Enneagram => '9',
            Self::Enneagon => 'n',
        }
    }

    /// The shape with the given character code.
    pub fn from_char(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.to_char() == code)
    }

    /// Whether the shape encloses an area, i.e. it can be filled.
    pub const fn is_fillable(self) -> bool {
        !matches!(self, Self::Plus | Self::Cross | Self::Star)
    }

    /// Codes of all shapes.
    pub fn list() -> String {
        Self::ALL.iter().map(|m| m.to_char()).collect()
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.to_char())
    }
}

impl FromStr for Marker {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(code), None) => {
                Self::from_char(code).ok_or_else(|| ParseEnumError::new("Marker", s))
            }
            _ => Err(ParseEnumError::new("Marker", s)),
        }
    }
}

/// How to draw a marker (keypoint).
#[derive(Clone, Debug)]
pub struct MarkerStyle {
    /// Shape.
    pub marker: Marker,
    /// Height of the marker in pixels.
    pub size: f64,
    /// Contour width in pixels, ignored for filled markers.
    pub thickness: f64,
    /// Contour or fill color.
    pub color: Color,
    /// Fill the shape. Ignored for shapes that cannot be filled; points are
    /// always filled.
    pub filled: bool,
    /// Extra size of the background around the marker on each side.
    pub background_border: f64,
    /// Color of a circle (or square, for square markers) drawn behind the
    /// marker to improve contrast. `Same` refers to `color`.
    pub background_color: ColorChoice,
    /// Cap style of the contour.
    pub cap: LineCap,
    /// Join style of the contour.
    pub join: LineJoin,
}

impl MarkerStyle {
    /// An unfilled marker without background.
    pub fn new(marker: Marker, size: f64, thickness: f64, color: impl Into<Color>) -> Self {
        Self {
            marker,
            size,
            thickness,
            color: color.into(),
            filled: false,
            background_border: 3.0,
            background_color: ColorChoice::None,
            cap: LineCap::Round,
            join: LineJoin::Miter,
        }
    }

    /// Returns this style with the fill flag set.
    #[must_use]
    pub fn with_fill(mut self, filled: bool) -> Self {
        self.filled = filled;
        self
    }

    /// Returns `true` if the shape should be filled instead of stroked.
    pub fn is_filled(&self) -> bool {
        match self.marker {
            Marker::Point => true,
            m => self.filled && m.is_fillable(),
        }
    }

    /// Positive size, and either filled or a positive contour width.
    pub fn is_valid(&self) -> bool {
        self.size > 0.0 && (self.is_filled() || self.thickness > 0.0)
    }

    /// Resolved background color, if any.
    pub fn background(&self) -> Option<Color> {
        self.background_color.resolve(self.color)
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self::new(Marker::Circle, 10.0, 3.0, Color::BLACK)
    }
}

impl StrokeGeometry for MarkerStyle {
    fn stroke_width(&self) -> f64 {
        self.thickness
    }

    fn line_cap(&self) -> LineCap {
        self.cap
    }

    fn line_join(&self) -> LineJoin {
        self.join
    }
}

impl PartialEq for MarkerStyle {
    fn eq(&self, other: &Self) -> bool {
        self.marker == other.marker
            && eps_eq(self.size, other.size)
            && eps_eq(self.thickness, other.thickness)
            && self.color == other.color
            && self.is_filled() == other.is_filled()
            && eps_eq(self.background_border, other.background_border)
            && self.background_color == other.background_color
            && self.cap == other.cap
            && self.join == other.join
    }
}

impl fmt::Display for MarkerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MarkerStyle({}, sz={:.1}, {}",
            self.marker,
            self.size,
            if self.is_filled() { "filled" } else { "outline" }
        )?;
        if !self.is_filled() {
            write!(f, ", t={:.1}", self.thickness)?;
        }
        write!(f, ", {}", self.color.to_hex())?;
        if !self.is_valid() {
            f.write_str(", invalid")?;
        }
        f.write_str(")")
    }
}
