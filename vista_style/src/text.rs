// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use vista_color::Color;
use vista_geometry::{HorizontalAlignment, VerticalAlignment};

use crate::eps_eq;

/// How to render text.
#[derive(Clone, Debug)]
pub struct TextStyle {
    /// Font size in pixels.
    pub size: f64,
    /// Font family, looked up in the font book.
    pub family: String,
    /// Text color.
    pub color: Color,
    /// Render a heavier weight.
    pub bold: bool,
    /// Render slanted glyphs.
    pub italic: bool,
    /// Line height of multi-line text, relative to the font height.
    pub line_spacing: f64,
    /// Paragraph alignment of multi-line text.
    pub halign: HorizontalAlignment,
    /// Vertical alignment of a text block inside a fixed-size box.
    pub valign: VerticalAlignment,
}

impl TextStyle {
    /// A regular text style of the given size and family.
    pub fn new(size: f64, family: impl Into<String>, color: impl Into<Color>) -> Self {
        Self {
            size,
            family: family.into(),
            color: color.into(),
            ..Self::default()
        }
    }

    /// Positive size and a non-empty family name.
    pub fn is_valid(&self) -> bool {
        self.size > 0.0 && !self.family.is_empty()
    }

    /// Font height including line spacing.
    pub fn line_height(&self) -> f64 {
        self.size * self.line_spacing
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 16.0,
            family: "monospace".into(),
            color: Color::BLACK,
            bold: false,
            italic: false,
            line_spacing: 1.2,
            halign: HorizontalAlignment::Left,
            valign: VerticalAlignment::Top,
        }
    }
}

impl PartialEq for TextStyle {
    fn eq(&self, other: &Self) -> bool {
        eps_eq(self.size, other.size)
            && self.family == other.family
            && self.color == other.color
            && self.bold == other.bold
            && self.italic == other.italic
            && eps_eq(self.line_spacing, other.line_spacing)
            && self.halign == other.halign
            && self.valign == other.valign
    }
}

impl fmt::Display for TextStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextStyle(\"{}\", {}px", self.family, self.size)?;
        if self.bold {
            f.write_str(", bold")?;
        }
        if self.italic {
            f.write_str(", italic")?;
        }
        if !self.is_valid() {
            f.write_str(", invalid")?;
        }
        f.write_str(")")
    }
}
