// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::str::FromStr;

use smallvec::SmallVec;
use vista_color::{Color, NamedColor};
use vista_geometry::{ParseEnumError, canonical_name};

use crate::eps_eq;

/// Miter limit used by all drawing helpers.
///
/// A miter join longer than `DEFAULT_MITER_LIMIT * width` is drawn as a bevel.
pub const DEFAULT_MITER_LIMIT: f64 = 10.0;

/// How the endpoints of a line are rendered.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineCap {
    /// Ends exactly at the endpoint.
    #[default]
    Butt,
    /// Semicircle centered on the endpoint.
    Round,
    /// Square centered on the endpoint.
    Square,
}

/// How the junction of two segments is rendered.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineJoin {
    /// Sharp corner, subject to the miter limit.
    #[default]
    Miter,
    /// Rounded corner.
    Round,
    /// Cut-off corner.
    Bevel,
}

impl LineCap {
    /// The equivalent `kurbo` cap.
    pub fn to_kurbo(self) -> kurbo::Cap {
        match self {
            Self::Butt => kurbo::Cap::Butt,
            Self::Round => kurbo::Cap::Round,
            Self::Square => kurbo::Cap::Square,
        }
    }
}

impl LineJoin {
    /// The equivalent `kurbo` join.
    pub fn to_kurbo(self) -> kurbo::Join {
        match self {
            Self::Miter => kurbo::Join::Miter,
            Self::Round => kurbo::Join::Round,
            Self::Bevel => kurbo::Join::Bevel,
        }
    }
}

impl FromStr for LineCap {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonical_name(s).as_str() {
            "butt" => Ok(Self::Butt),
            "round" => Ok(Self::Round),
            "square" => Ok(Self::Square),
            _ => Err(ParseEnumError::new("LineCap", s)),
        }
    }
}

impl FromStr for LineJoin {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonical_name(s).as_str() {
            "miter" => Ok(Self::Miter),
            "round" => Ok(Self::Round),
            "bevel" => Ok(Self::Bevel),
            _ => Err(ParseEnumError::new("LineJoin", s)),
        }
    }
}

impl fmt::Display for LineCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        })
    }
}

impl fmt::Display for LineJoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Miter => "miter",
            Self::Round => "round",
            Self::Bevel => "bevel",
        })
    }
}

/// How far a cap extends a line of the given width past its endpoint.
pub fn cap_offset(cap: LineCap, width: f64) -> f64 {
    match cap {
        LineCap::Butt => 0.0,
        LineCap::Round | LineCap::Square => width / 2.0,
    }
}

/// How far a join extends past the corner point.
///
/// `interior_angle` is the angle between the two segments in degrees. If the
/// miter would exceed `miter_limit` times the width, the renderer switches to
/// a bevel, so the offset is the same as for round and bevel joins.
pub fn join_offset(join: LineJoin, width: f64, interior_angle: f64, miter_limit: f64) -> f64 {
    let miter_length = width / (interior_angle.to_radians() / 2.0).sin().max(1e-6);
    if miter_length / width > miter_limit || matches!(join, LineJoin::Round | LineJoin::Bevel) {
        width / 2.0
    } else {
        miter_length / 2.0
    }
}

/// Shared stroke geometry of everything drawn with a contour line.
pub trait StrokeGeometry {
    /// Contour width in pixels.
    fn stroke_width(&self) -> f64;

    /// Cap style of the contour.
    fn line_cap(&self) -> LineCap;

    /// Join style of the contour.
    fn line_join(&self) -> LineJoin;

    /// How far the cap extends the start and end of the contour.
    fn cap_offset(&self) -> f64 {
        cap_offset(self.line_cap(), self.stroke_width())
    }

    /// How far a join with the given interior angle (degrees) extends past the
    /// corner point.
    fn join_offset(&self, interior_angle: f64, miter_limit: f64) -> f64 {
        join_offset(
            self.line_join(),
            self.stroke_width(),
            interior_angle,
            miter_limit,
        )
    }
}

/// How to draw a line.
///
/// Functions that accept an optional contour take `Option<LineStyle>`; `None`
/// skips the contour.
#[derive(Clone, Debug)]
pub struct LineStyle {
    /// Width in pixels.
    pub width: f64,
    /// Line color.
    pub color: Color,
    /// Alternating dash and gap lengths in pixels. Empty for a solid line.
    pub dash_pattern: SmallVec<[f64; 4]>,
    /// Offset into the dash pattern.
    pub dash_offset: f64,
    /// Cap style.
    pub cap: LineCap,
    /// Join style.
    pub join: LineJoin,
}

impl LineStyle {
    /// A solid line with butt caps and miter joins.
    pub fn new(width: f64, color: impl Into<Color>) -> Self {
        Self {
            width,
            color: color.into(),
            dash_pattern: SmallVec::new(),
            dash_offset: 0.0,
            cap: LineCap::Butt,
            join: LineJoin::Miter,
        }
    }

    /// Returns this style with a dash pattern.
    #[must_use]
    pub fn with_dashes(mut self, offset: f64, pattern: impl IntoIterator<Item = f64>) -> Self {
        self.dash_offset = offset;
        self.dash_pattern = pattern.into_iter().collect();
        self
    }

    /// Returns this style with a different cap.
    #[must_use]
    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    /// Returns this style with a different join.
    #[must_use]
    pub fn with_join(mut self, join: LineJoin) -> Self {
        self.join = join;
        self
    }

    /// Returns this style with a different color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    /// Returns this style with a different width.
    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Returns `true` if the line has a positive width.
    pub fn is_valid(&self) -> bool {
        self.width > 0.0
    }

    /// Returns `true` if a dash pattern is set.
    pub fn is_dashed(&self) -> bool {
        !self.dash_pattern.is_empty()
    }

    /// The stroke parameters for the imaging backend.
    pub fn to_stroke(&self) -> kurbo::Stroke {
        let mut stroke = kurbo::Stroke::new(self.width)
            .with_caps(self.cap.to_kurbo())
            .with_join(self.join.to_kurbo())
            .with_miter_limit(DEFAULT_MITER_LIMIT);
        if self.is_dashed() {
            stroke = stroke.with_dashes(self.dash_offset, self.dash_pattern.iter().copied());
        }
        stroke
    }

    /// The same stroke without the dash pattern.
    pub fn to_solid_stroke(&self) -> kurbo::Stroke {
        kurbo::Stroke::new(self.width)
            .with_caps(self.cap.to_kurbo())
            .with_join(self.join.to_kurbo())
            .with_miter_limit(DEFAULT_MITER_LIMIT)
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::new(2.0, Color::from(NamedColor::NavyBlue).with_alpha(0.8))
    }
}

impl StrokeGeometry for LineStyle {
    fn stroke_width(&self) -> f64 {
        self.width
    }

    fn line_cap(&self) -> LineCap {
        self.cap
    }

    fn line_join(&self) -> LineJoin {
        self.join
    }
}

impl PartialEq for LineStyle {
    fn eq(&self, other: &Self) -> bool {
        eps_eq(self.width, other.width)
            && self.color == other.color
            && self.dash_pattern.len() == other.dash_pattern.len()
            && self
                .dash_pattern
                .iter()
                .zip(&other.dash_pattern)
                .all(|(a, b)| eps_eq(*a, *b))
            && eps_eq(self.dash_offset, other.dash_offset)
            && self.cap == other.cap
            && self.join == other.join
    }
}

impl fmt::Display for LineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LineStyle(lw={:.1}, {}, {}",
            self.width,
            self.color,
            if self.is_dashed() { "dashed" } else { "solid" }
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

    #[test]
    fn cap_offsets() {
        let style = LineStyle::default().with_width(6.0);
        assert_eq!(style.cap_offset(), 0.0);
        assert_eq!(style.clone().with_cap(LineCap::Round).cap_offset(), 3.0);
        assert_eq!(style.with_cap(LineCap::Square).cap_offset(), 3.0);
    }

    #[test]
    fn miter_offset_grows_as_the_angle_narrows() {
        let style = LineStyle::default().with_width(4.0);
        let wide = style.join_offset(120.0, DEFAULT_MITER_LIMIT);
        let medium = style.join_offset(60.0, DEFAULT_MITER_LIMIT);
        let narrow = style.join_offset(20.0, DEFAULT_MITER_LIMIT);
        assert!(wide < medium);
        assert!(medium < narrow);
        // At 60 degrees, the miter is exactly twice the width.
        assert!((medium - 4.0).abs() < 1e-9);
    }

    #[test]
    fn miter_limit_switches_to_bevel() {
        let style = LineStyle::default().with_width(4.0);
        // sin(5°) ≈ 0.087, so the miter is about 11.5 times the width.
        assert_eq!(style.join_offset(10.0, DEFAULT_MITER_LIMIT), 2.0);
        // At 60 degrees the miter/width ratio is 2.
        assert!((style.join_offset(60.0, 2.01) - 4.0).abs() < 1e-9);
        assert_eq!(style.join_offset(60.0, 1.99), 2.0);
        // Round and bevel joins never extend past half the width.
        let round = style.clone().with_join(LineJoin::Round);
        assert_eq!(round.join_offset(30.0, DEFAULT_MITER_LIMIT), 2.0);
        let bevel = style.with_join(LineJoin::Bevel);
        assert_eq!(bevel.join_offset(30.0, DEFAULT_MITER_LIMIT), 2.0);
    }

    #[test]
    fn equality_compares_dashes_elementwise() {
        let a = LineStyle::default().with_dashes(0.0, [10.0, 5.0]);
        let b = LineStyle::default().with_dashes(0.0, [10.0, 5.0]);
        let c = LineStyle::default().with_dashes(0.0, [10.0, 5.0, 1.0]);
        let d = LineStyle::default().with_dashes(0.0, [10.0, 6.0]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_ne!(a, LineStyle::default());
    }

    #[test]
    fn stroke_conversion() {
        let style = LineStyle::new(3.0, Color::RED)
            .with_cap(LineCap::Round)
            .with_join(LineJoin::Bevel)
            .with_dashes(2.0, [4.0, 2.0]);
        let stroke = style.to_stroke();
        assert_eq!(stroke.width, 3.0);
        assert_eq!(stroke.join, kurbo::Join::Bevel);
        assert_eq!(stroke.start_cap, kurbo::Cap::Round);
        assert_eq!(stroke.end_cap, kurbo::Cap::Round);
        assert_eq!(stroke.dash_offset, 2.0);
        assert_eq!(stroke.dash_pattern.as_slice(), &[4.0, 2.0]);
        assert!(style.to_solid_stroke().dash_pattern.is_empty());
    }

    #[test]
    fn enum_strings() {
        assert_eq!("Round".parse(), Ok(LineCap::Round));
        assert_eq!("bevel".parse(), Ok(LineJoin::Bevel));
        assert!("pointy".parse::<LineJoin>().is_err());
        assert_eq!(LineCap::Square.to_string(), "square");
    }
}
