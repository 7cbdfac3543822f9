// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use kurbo::Vec2;
use vista_color::{Color, ColorChoice};
use vista_geometry::LabelPosition;

use crate::{LineStyle, TextStyle};

/// How to draw a 2D bounding box with an optional label.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundingBox2DStyle {
    /// Contour of the box.
    pub line_style: LineStyle,
    /// Label text.
    pub text_style: TextStyle,
    /// Fill of the box area. `Same` refers to the contour color.
    pub box_fill: ColorChoice,
    /// Fill behind the label. `Same` refers to the contour color.
    pub text_fill: ColorChoice,
    /// Which edge the label is placed along.
    pub label_position: LabelPosition,
    /// Distance between the label and the box edges.
    pub label_padding: Vec2,
    /// Clip the label at the box contour.
    pub clip_label: bool,
}

impl BoundingBox2DStyle {
    /// Returns `true` if the box can be drawn: a valid contour, or a fill.
    pub fn is_valid(&self) -> bool {
        self.line_style.is_valid() || self.box_fill_color().is_some()
    }

    /// Box fill color, or `None` to skip filling.
    pub fn box_fill_color(&self) -> Option<Color> {
        self.box_fill.resolve(self.line_style.color)
    }

    /// Label fill color, or `None` to skip filling.
    pub fn text_fill_color(&self) -> Option<Color> {
        self.text_fill.resolve(self.line_style.color)
    }
}

impl Default for BoundingBox2DStyle {
    fn default() -> Self {
        Self {
            line_style: LineStyle::default(),
            text_style: TextStyle::default(),
            box_fill: ColorChoice::same(0.1),
            text_fill: ColorChoice::same(0.5),
            label_position: LabelPosition::Top,
            label_padding: Vec2::new(5.0, 5.0),
            clip_label: true,
        }
    }
}

impl fmt::Display for BoundingBox2DStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BoundingBox2DStyle({}, {}, label at {}",
            self.line_style, self.text_style, self.label_position
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
    use vista_color::NamedColor;

    #[test]
    fn fills_resolve_against_contour() {
        let mut style = BoundingBox2DStyle::default();
        style.line_style.color = Color::from(NamedColor::Crimson);
        assert_eq!(
            style.box_fill_color(),
            Some(Color::from(NamedColor::Crimson).with_alpha(0.1))
        );
        style.text_fill = Color::WHITE.into();
        assert_eq!(style.text_fill_color(), Some(Color::WHITE));
        style.text_fill = ColorChoice::None;
        assert_eq!(style.text_fill_color(), None);
    }

    #[test]
    fn validity_requires_contour_or_fill() {
        let mut style = BoundingBox2DStyle::default();
        style.line_style.width = 0.0;
        assert!(style.is_valid());
        style.box_fill = ColorChoice::None;
        assert!(!style.is_valid());
    }
}
