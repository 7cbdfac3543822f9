// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor-relative placement of single and multi-line text.

use kurbo::{Point, Vec2};
use vista_geometry::{Anchor, HorizontalAlignment, Rect, VerticalAlignment};
use vista_style::TextStyle;

use crate::FontMetrics;

/// One line of text with its rounded extents and, once aligned, the pen
/// position to draw it from.
#[derive(Clone, Debug, PartialEq)]
pub struct SingleLineText {
    text: String,
    width: f64,
    height: f64,
    bearing_x: f64,
    bearing_y: f64,
    reference: Point,
}

impl SingleLineText {
    /// Measure `line`.
    ///
    /// With `use_font_height`, the height comes from the font ascent and
    /// descent instead of the glyphs, so lines with and without descenders
    /// line up.
    pub fn new(
        line: impl Into<String>,
        metrics: &impl FontMetrics,
        style: &TextStyle,
        use_font_height: bool,
    ) -> Self {
        let text = line.into();
        let extents = metrics.text_extents(&text, style);
        let (height, bearing_y) = if use_font_height {
            let font = metrics.font_extents(style);
            (font.height().round(), -font.ascent.round())
        } else {
            (extents.height.round(), extents.y_bearing.round())
        };
        Self {
            text,
            width: extents.width.round(),
            height,
            bearing_x: extents.x_bearing.round(),
            bearing_y,
            reference: Point::ZERO,
        }
    }

    /// The measured text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Rounded ink width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Rounded height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Width and height.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Pen position computed by the last [`align`](Self::align).
    pub fn reference_point(&self) -> Point {
        self.reference
    }

    /// Place the text so that its `anchor` lands on `anchor_point`, keeping
    /// `padding` from the point where the anchor is not centered.
    ///
    /// Returns the pen position to draw from.
    pub fn align(&mut self, anchor_point: Point, anchor: Anchor, padding: Vec2) -> Point {
        let x = match anchor.horizontal() {
            HorizontalAlignment::Left => anchor_point.x + padding.x - self.bearing_x,
            HorizontalAlignment::Center => anchor_point.x - (self.width / 2.0 + self.bearing_x),
            HorizontalAlignment::Right => {
                anchor_point.x - (self.width + padding.x + self.bearing_x)
            }
        };
        let y = match anchor.vertical() {
            VerticalAlignment::Top => anchor_point.y + padding.y - self.bearing_y,
            VerticalAlignment::Center => anchor_point.y - (self.height / 2.0 + self.bearing_y),
            VerticalAlignment::Bottom => {
                anchor_point.y - (self.height + self.bearing_y + padding.y)
            }
        };
        self.reference = Point::new(x, y);
        self.reference
    }

    /// Top-left corner of the text extent.
    pub fn top_left(&self) -> Point {
        self.reference + Vec2::new(self.bearing_x, self.bearing_y)
    }

    /// Center of the text extent.
    pub fn center(&self) -> Point {
        self.top_left() + self.size() / 2.0
    }

    /// The text extent grown by `padding` on each side.
    pub fn bounding_box(&self, padding: Vec2) -> Rect {
        let center = self.center();
        let size = self.size() + 2.0 * padding;
        Rect::from_cwh(center.x, center.y, size.x, size.y)
    }
}

/// A paragraph of lines laid out top to bottom.
///
/// The first line contributes its own height, every further line its height
/// scaled by the style's line spacing.
#[derive(Clone, Debug, PartialEq)]
pub struct MultiLineText {
    lines: Vec<SingleLineText>,
    line_spacing: f64,
    halign: HorizontalAlignment,
    valign: VerticalAlignment,
    width: f64,
    height: f64,
    top_left: Point,
    box_size: Vec2,
}

impl MultiLineText {
    /// Measure every line with font height.
    pub fn new<S: AsRef<str>>(lines: &[S], metrics: &impl FontMetrics, style: &TextStyle) -> Self {
        let lines: Vec<_> = lines
            .iter()
            .map(|line| SingleLineText::new(line.as_ref(), metrics, style, true))
            .collect();
        let width = lines.iter().map(SingleLineText::width).fold(0.0, f64::max);
        let height: f64 = lines
            .iter()
            .enumerate()
            .map(|(i, line)| line_advance(i, line, style.line_spacing))
            .sum();
        Self {
            lines,
            line_spacing: style.line_spacing,
            halign: style.halign,
            valign: style.valign,
            width,
            height,
            top_left: Point::ZERO,
            box_size: Vec2::new(width, height),
        }
    }

    /// The measured lines.
    pub fn lines(&self) -> &[SingleLineText] {
        &self.lines
    }

    /// Returns `true` if there are no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Width of the widest line.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Height of the whole paragraph.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Width and height of the paragraph.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Top-left corner of the box computed by the last [`align`](Self::align).
    pub fn top_left(&self) -> Point {
        self.top_left
    }

    /// Position the paragraph box so that its `anchor` lands on
    /// `anchor_point`, then place every line inside it.
    ///
    /// The box is the text grown by `padding` on each side, unless
    /// `fixed_size` gives a positive width or height. Lines follow the
    /// paragraph alignment of the style; a text block smaller than a fixed
    /// box is placed by the style's vertical alignment.
    pub fn align(
        &mut self,
        anchor_point: Point,
        anchor: Anchor,
        padding: Vec2,
        fixed_size: Option<Vec2>,
    ) {
        let fixed = fixed_size.unwrap_or(Vec2::ZERO);
        let box_width = if fixed.x > 0.0 {
            fixed.x
        } else {
            self.width + 2.0 * padding.x
        };
        let box_height = if fixed.y > 0.0 {
            fixed.y
        } else {
            self.height + 2.0 * padding.y
        };
        self.box_size = Vec2::new(box_width, box_height);
        self.top_left = Point::new(
            anchor_point.x - anchor.horizontal().factor() * box_width,
            anchor_point.y - anchor.vertical().factor() * box_height,
        );

        let x = match self.halign {
            HorizontalAlignment::Left => self.top_left.x + padding.x,
            HorizontalAlignment::Center => self.top_left.x + box_width / 2.0,
            HorizontalAlignment::Right => self.top_left.x + box_width - padding.x,
        };
        let slack = (box_height - 2.0 * padding.y - self.height).max(0.0);
        let mut y = self.top_left.y + padding.y + self.valign.factor() * slack;
        let anchor = Anchor::new(self.halign, VerticalAlignment::Bottom);
        for (i, line) in self.lines.iter_mut().enumerate() {
            y += line_advance(i, line, self.line_spacing);
            line.align(Point::new(x, y), anchor, Vec2::ZERO);
        }
    }

    /// The padded or fixed-size box of the last [`align`](Self::align), with
    /// the given corner radius.
    pub fn bounding_box(&self, corner_radius: f64) -> Rect {
        let center = self.top_left + self.box_size / 2.0;
        Rect::from_cwh(center.x, center.y, self.box_size.x, self.box_size.y)
            .with_radius(corner_radius)
    }
}

fn line_advance(index: usize, line: &SingleLineText, line_spacing: f64) -> f64 {
    if index == 0 {
        line.height()
    } else {
        line_spacing * line.height()
    }
}
