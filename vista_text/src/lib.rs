// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=vista_text --heading-base-level=0

//! Vista Text: measuring, placing and drawing lines of text.
//!
//! Layout only needs a [`FontMetrics`] implementation that reports font and
//! string extents. [`SingleLineText`] turns the extents of one line into
//! the pen position that puts a chosen [`Anchor`](vista_geometry::Anchor) of
//! the text on a given point. [`MultiLineText`] stacks lines into a
//! paragraph box, scaling every line after the first by the style's line
//! spacing.
//!
//! [`FontBook`] is the font-backed implementation: it maps family names to
//! font files, measures with Skrifa and lowers glyph outlines into
//! [`vista_imaging`] paths through [`TextRenderer::draw_line`]. Bold and
//! italic are synthesized by stroking and shearing the outlines.
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use vista_geometry::Anchor;
//! use vista_style::TextStyle;
//! use vista_text::{FontExtents, FontMetrics, MultiLineText, TextExtents};
//!
//! /// Every character is 8 px wide, lines are 20 px high.
//! struct Monospace;
//!
//! impl FontMetrics for Monospace {
//!     fn font_extents(&self, _: &TextStyle) -> FontExtents {
//!         FontExtents { ascent: 15.0, descent: 5.0 }
//!     }
//!
//!     fn text_extents(&self, text: &str, _: &TextStyle) -> TextExtents {
//!         let width = 8.0 * text.len() as f64;
//!         TextExtents { width, height: 15.0, x_bearing: 0.0, y_bearing: -15.0, x_advance: width }
//!     }
//! }
//!
//! let style = TextStyle { line_spacing: 1.5, ..TextStyle::default() };
//! let mut text = MultiLineText::new(&["car", "0.93"], &Monospace, &style);
//! assert_eq!(text.size(), Vec2::new(32.0, 50.0));
//!
//! text.align(Point::new(100.0, 100.0), Anchor::BottomLeft, Vec2::new(2.0, 2.0), None);
//! let label = text.bounding_box(0.0);
//! assert_eq!((label.left(), label.bottom()), (100.0, 100.0));
//! ```

#![deny(unsafe_code)]

mod font_book;
mod layout;
mod metrics;

pub use font_book::{BOLD_STROKE_DIVISOR, FontBook, ITALIC_SKEW, PositionedGlyph};
pub use layout::{MultiLineText, SingleLineText};
pub use metrics::{FontExtents, FontMetrics, TextExtents, TextRenderer};

use thiserror::Error;

/// Errors of font registration.
#[derive(Debug, Error)]
pub enum Error {
    /// A font registered without a family name.
    #[error("font family name must not be empty")]
    EmptyFamily,
    /// Bytes that do not parse as a font.
    #[error("invalid font for family \"{family}\": {reason}")]
    InvalidFont {
        /// The family the font was registered for.
        family: String,
        /// What the parser reported.
        reason: String,
    },
    /// Reading a font file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type of this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
