// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement of text, images and labels relative to a reference point.
//!
//! All `FromStr` implementations ignore case, whitespace, `-` and `_`, and
//! accept compass directions (`"north-west"`) besides the plain names.

use core::fmt;
use core::str::FromStr;

use crate::{ParseEnumError, canonical_name};

/// Horizontal alignment, e.g. of a paragraph or an anchor.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum HorizontalAlignment {
    /// Align to the left (west).
    #[default]
    Left,
    /// Center horizontally.
    Center,
    /// Align to the right (east).
    Right,
}

/// Vertical alignment, e.g. of a text block or an anchor.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerticalAlignment {
    /// Align to the top (north).
    #[default]
    Top,
    /// Center vertically.
    Center,
    /// Align to the bottom (south).
    Bottom,
}

/// One of the nine combinations of horizontal and vertical alignment.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[expect(missing_docs, reason = "the variant names are self-descriptive")]
pub enum Anchor {
    #[default]
    Center,
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Where a bounding box places its label.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LabelPosition {
    /// Horizontal text along the top edge.
    #[default]
    Top,
    /// Horizontal text along the bottom edge.
    Bottom,
    /// Along the left edge, reading bottom to top.
    LeftB2T,
    /// Along the left edge, reading top to bottom.
    LeftT2B,
    /// Along the right edge, reading bottom to top.
    RightB2T,
    /// Along the right edge, reading top to bottom.
    RightT2B,
}

impl Anchor {
    /// Every anchor.
    pub const ALL: [Self; 9] = [
        Self::Center,
        Self::Left,
        Self::Right,
        Self::Top,
        Self::Bottom,
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// Combine a horizontal and a vertical alignment.
    pub const fn new(horizontal: HorizontalAlignment, vertical: VerticalAlignment) -> Self {
        use HorizontalAlignment as H;
        use VerticalAlignment as V;
        match (horizontal, vertical) {
            (H::Center, V::Center) => Self::Center,
            (H::Left, V::Center) => Self::Left,
            (H::Right, V::Center) => Self::Right,
            (H::Center, V::Top) => Self::Top,
            (H::Center, V::Bottom) => Self::Bottom,
            (H::Left, V::Top) => Self::TopLeft,
            (H::Right, V::Top) => Self::TopRight,
            (H::Left, V::Bottom) => Self::BottomLeft,
            (H::Right, V::Bottom) => Self::BottomRight,
        }
    }

    /// Horizontal component.
    pub const fn horizontal(self) -> HorizontalAlignment {
        match self {
            Self::Left | Self::TopLeft | Self::BottomLeft => HorizontalAlignment::Left,
            Self::Center | Self::Top | Self::Bottom => HorizontalAlignment::Center,
            Self::Right | Self::TopRight | Self::BottomRight => HorizontalAlignment::Right,
        }
    }

    /// Vertical component.
    pub const fn vertical(self) -> VerticalAlignment {
        match self {
            Self::Top | Self::TopLeft | Self::TopRight => VerticalAlignment::Top,
            Self::Center | Self::Left | Self::Right => VerticalAlignment::Center,
            Self::Bottom | Self::BottomLeft | Self::BottomRight => VerticalAlignment::Bottom,
        }
    }
}

impl HorizontalAlignment {
    /// Offset factor of the reference point within an extent: 0, 1/2 or 1.
    pub const fn factor(self) -> f64 {
        match self {
            Self::Left => 0.0,
            Self::Center => 0.5,
            Self::Right => 1.0,
        }
    }
}

impl VerticalAlignment {
    /// Offset factor of the reference point within an extent: 0, 1/2 or 1.
    pub const fn factor(self) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Center => 0.5,
            Self::Bottom => 1.0,
        }
    }
}

impl FromStr for HorizontalAlignment {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonical_name(s).as_str() {
            "left" | "west" => Ok(Self::Left),
            "center" | "middle" | "hcenter" => Ok(Self::Center),
            "right" | "east" => Ok(Self::Right),
            _ => Err(ParseEnumError::new("HorizontalAlignment", s)),
        }
    }
}

impl FromStr for VerticalAlignment {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonical_name(s).as_str() {
            "top" | "north" => Ok(Self::Top),
            "center" | "middle" | "vcenter" => Ok(Self::Center),
            "bottom" | "south" => Ok(Self::Bottom),
            _ => Err(ParseEnumError::new("VerticalAlignment", s)),
        }
    }
}

impl FromStr for Anchor {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonical_name(s).as_str() {
            "center" => Ok(Self::Center),
            "right" | "east" => Ok(Self::Right),
            "bottomright" | "southeast" => Ok(Self::BottomRight),
            "bottom" | "south" => Ok(Self::Bottom),
            "bottomleft" | "southwest" => Ok(Self::BottomLeft),
            "left" | "west" => Ok(Self::Left),
            "topleft" | "northwest" => Ok(Self::TopLeft),
            "top" | "north" => Ok(Self::Top),
            "topright" | "northeast" => Ok(Self::TopRight),
            _ => Err(ParseEnumError::new("Anchor", s)),
        }
    }
}

impl FromStr for LabelPosition {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonical_name(s).as_str() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" | "leftb2t" => Ok(Self::LeftB2T),
            "leftt2b" => Ok(Self::LeftT2B),
            "right" | "rightt2b" => Ok(Self::RightT2B),
            "rightb2t" => Ok(Self::RightB2T),
            _ => Err(ParseEnumError::new("LabelPosition", s)),
        }
    }
}

impl fmt::Display for HorizontalAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Center => "hcenter",
            Self::Right => "right",
        })
    }
}

impl fmt::Display for VerticalAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Top => "top",
            Self::Center => "vcenter",
            Self::Bottom => "bottom",
        })
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Center => "center",
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        })
    }
}

impl fmt::Display for LabelPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::LeftB2T => "left-b2t",
            Self::LeftT2B => "left-t2b",
            Self::RightB2T => "right-b2t",
            Self::RightT2B => "right-t2b",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_components_round_trip() {
        for anchor in Anchor::ALL {
            assert_eq!(Anchor::new(anchor.horizontal(), anchor.vertical()), anchor);
            assert_eq!(anchor.to_string().parse::<Anchor>(), Ok(anchor));
        }
    }

    #[test]
    fn compass_aliases() {
        assert_eq!("North West".parse(), Ok(Anchor::TopLeft));
        assert_eq!("south_east".parse(), Ok(Anchor::BottomRight));
        assert_eq!("EAST".parse(), Ok(HorizontalAlignment::Right));
        assert_eq!("middle".parse(), Ok(VerticalAlignment::Center));
        assert!("up".parse::<Anchor>().is_err());
    }

    #[test]
    fn label_positions() {
        assert_eq!("left".parse(), Ok(LabelPosition::LeftB2T));
        assert_eq!("right".parse(), Ok(LabelPosition::RightT2B));
        for pos in [
            LabelPosition::Top,
            LabelPosition::Bottom,
            LabelPosition::LeftB2T,
            LabelPosition::LeftT2B,
            LabelPosition::RightB2T,
            LabelPosition::RightT2B,
        ] {
            assert_eq!(pos.to_string().parse::<LabelPosition>(), Ok(pos));
        }
    }

    #[test]
    fn alignment_display() {
        assert_eq!(HorizontalAlignment::Center.to_string(), "hcenter");
        assert_eq!("hcenter".parse(), Ok(HorizontalAlignment::Center));
        assert_eq!(VerticalAlignment::Center.to_string(), "vcenter");
    }
}
