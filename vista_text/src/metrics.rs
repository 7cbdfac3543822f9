// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font and text extents in pixel units.
//!
//! Both follow the usual raster convention: the y axis points down, and
//! bearings are measured from the pen position on the baseline.

use kurbo::Point;
use vista_imaging::{ImagingBackend, ResourceBackend};
use vista_style::TextStyle;

/// Font-wide vertical metrics.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FontExtents {
    /// Distance from the baseline to the top of the tallest glyphs, positive.
    pub ascent: f64,
    /// Distance from the baseline to the bottom of the deepest glyphs, positive.
    pub descent: f64,
}

impl FontExtents {
    /// Ascent plus descent.
    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }
}

/// Ink extents of a rendered string.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TextExtents {
    /// Width of the inked area.
    pub width: f64,
    /// Height of the inked area.
    pub height: f64,
    /// Horizontal distance from the pen position to the left ink edge.
    pub x_bearing: f64,
    /// Vertical distance from the baseline to the top ink edge, negative
    /// for glyphs above the baseline.
    pub y_bearing: f64,
    /// Horizontal pen advance after the string.
    pub x_advance: f64,
}

/// Measures text for a given style.
pub trait FontMetrics {
    /// Vertical metrics of the font selected by `style`.
    fn font_extents(&self, style: &TextStyle) -> FontExtents;

    /// Ink extents of `text` rendered with `style`.
    fn text_extents(&self, text: &str, style: &TextStyle) -> TextExtents;
}

impl<T: FontMetrics + ?Sized> FontMetrics for &T {
    fn font_extents(&self, style: &TextStyle) -> FontExtents {
        (**self).font_extents(style)
    }

    fn text_extents(&self, text: &str, style: &TextStyle) -> TextExtents {
        (**self).text_extents(text, style)
    }
}

/// Measures text and draws single lines of it.
pub trait TextRenderer: FontMetrics {
    /// Draw `text` with its pen starting at `origin` on the baseline.
    ///
    /// Returns the horizontal advance.
    fn draw_line<B: ImagingBackend + ResourceBackend>(
        &self,
        backend: &mut B,
        text: &str,
        origin: Point,
        style: &TextStyle,
    ) -> f64;
}
