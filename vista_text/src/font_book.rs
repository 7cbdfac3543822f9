// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font registry backed by Skrifa outlines.

use std::fs;
use std::path::Path;

use kurbo::{Affine, Point, Shape, Stroke};
use peniko::{Blob, FontData};
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::OutlinePen;
use skrifa::{FontRef, GlyphId, MetadataProvider};
use vista_imaging::{ImagingBackend, ImagingBackendExt, PaintDesc, PathCmd, PathDesc, ResourceBackend};
use vista_style::TextStyle;

use crate::{Error, FontExtents, FontMetrics, Result, TextExtents, TextRenderer};

/// Horizontal shear of synthesized italics.
pub const ITALIC_SKEW: f64 = 0.2;

/// Synthesized bold strokes the outline with `size / BOLD_STROKE_DIVISOR`.
pub const BOLD_STROKE_DIVISOR: f64 = 24.0;

/// Advance of glyphs the font has no metrics for, relative to the size.
const FALLBACK_ADVANCE: f64 = 0.6;

/// A glyph placed on a line.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PositionedGlyph {
    /// Glyph id in the font.
    pub glyph_id: GlyphId,
    /// Pen offset from the start of the line.
    pub x: f64,
}

/// Fonts by family name.
///
/// Lookups ignore case. A family that is not registered falls back to the
/// first registered font, so a book with a single font serves every style.
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    faces: Vec<(String, FontData)>,
}

impl FontBook {
    /// An empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the first font of `bytes` under `family`, replacing any font
    /// previously registered under that name.
    pub fn register(&mut self, family: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Result<()> {
        self.register_index(family, bytes, 0)
    }

    /// Register font `index` of a font collection under `family`.
    pub fn register_index(
        &mut self,
        family: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
        index: u32,
    ) -> Result<()> {
        let family = family.into().trim().to_owned();
        if family.is_empty() {
            return Err(Error::EmptyFamily);
        }
        let bytes = bytes.into();
        if let Err(err) = FontRef::from_index(&bytes, index) {
            return Err(Error::InvalidFont {
                family,
                reason: err.to_string(),
            });
        }
        let data = FontData::new(Blob::from(bytes), index);
        match self
            .faces
            .iter_mut()
            .find(|(name, _)| name.eq_ignore_ascii_case(&family))
        {
            Some((_, face)) => *face = data,
            None => {
                log::debug!("registered font family \"{family}\"");
                self.faces.push((family, data));
            }
        }
        Ok(())
    }

    /// Read a font file and register it under `family`.
    pub fn load(&mut self, family: impl Into<String>, path: impl AsRef<Path>) -> Result<()> {
        let bytes = fs::read(path.as_ref())?;
        self.register(family, bytes)
    }

    /// Registered family names, in registration order.
    pub fn families(&self) -> impl Iterator<Item = &str> + '_ {
        self.faces.iter().map(|(name, _)| name.as_str())
    }

    /// Returns `true` if no font is registered.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Glyphs of `text` with their horizontal pen offsets.
    ///
    /// Characters the font does not map become the `.notdef` glyph.
    pub fn layout_glyphs(&self, text: &str, style: &TextStyle) -> Vec<PositionedGlyph> {
        match self.resolve(&style.family) {
            Some(font) => layout(&font, text, style).0,
            None => Vec::new(),
        }
    }

    fn resolve(&self, family: &str) -> Option<FontRef<'_>> {
        let family = family.trim();
        let data = match self
            .faces
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(family))
        {
            Some((_, data)) => data,
            None => {
                let Some((fallback, data)) = self.faces.first() else {
                    log::warn!("no font registered, cannot render \"{family}\"");
                    return None;
                };
                log::debug!("font family \"{family}\" is not registered, using \"{fallback}\"");
                data
            }
        };
        FontRef::from_index(data.data.as_ref(), data.index).ok()
    }
}

impl FontMetrics for FontBook {
    fn font_extents(&self, style: &TextStyle) -> FontExtents {
        let Some(font) = self.resolve(&style.family) else {
            return FontExtents::default();
        };
        let metrics = font.metrics(font_size(style), LocationRef::default());
        FontExtents {
            ascent: f64::from(metrics.ascent),
            descent: f64::from(metrics.descent).abs(),
        }
    }

    fn text_extents(&self, text: &str, style: &TextStyle) -> TextExtents {
        let Some(font) = self.resolve(&style.family) else {
            return TextExtents::default();
        };
        let (path, x_advance) = line_path(&font, text, Point::ZERO, style);
        if path.is_empty() {
            return TextExtents {
                x_advance,
                ..TextExtents::default()
            };
        }
        let mut ink = path.to_bez_path().bounding_box();
        if style.bold {
            ink = ink.inflate(bold_width(style) / 2.0, bold_width(style) / 2.0);
        }
        TextExtents {
            width: ink.width(),
            height: ink.height(),
            x_bearing: ink.x0,
            y_bearing: ink.y0,
            x_advance,
        }
    }
}

impl TextRenderer for FontBook {
    fn draw_line<B: ImagingBackend + ResourceBackend>(
        &self,
        backend: &mut B,
        text: &str,
        origin: Point,
        style: &TextStyle,
    ) -> f64 {
        let Some(font) = self.resolve(&style.family) else {
            return 0.0;
        };
        let (path, advance) = line_path(&font, text, origin, style);
        let paint = PaintDesc::solid(style.color.to_peniko());
        if style.bold {
            backend.fill_path_with(path.clone(), paint.clone());
            backend.stroke_path_with(path, &Stroke::new(bold_width(style)), paint);
        } else {
            backend.fill_path_with(path, paint);
        }
        advance
    }
}

fn bold_width(style: &TextStyle) -> f64 {
    style.size / BOLD_STROKE_DIVISOR
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "font sizes are far below the f32 range"
)]
fn font_size(style: &TextStyle) -> Size {
    Size::new(style.size as f32)
}

fn layout(font: &FontRef<'_>, text: &str, style: &TextStyle) -> (Vec<PositionedGlyph>, f64) {
    let charmap = font.charmap();
    let metrics = font.glyph_metrics(font_size(style), LocationRef::default());
    let mut x = 0.0;
    let glyphs = text
        .chars()
        .map(|ch| {
            let glyph_id = charmap.map(ch).unwrap_or(GlyphId::NOTDEF);
            let glyph = PositionedGlyph { glyph_id, x };
            x += metrics
                .advance_width(glyph_id)
                .map_or(style.size * FALLBACK_ADVANCE, f64::from);
            glyph
        })
        .collect();
    (glyphs, x)
}

/// Outlines of a whole line in y-down coordinates, with the pen starting at
/// `origin`, plus the line's advance.
fn line_path(
    font: &FontRef<'_>,
    text: &str,
    origin: Point,
    style: &TextStyle,
) -> (PathDesc, f64) {
    let (glyphs, advance) = layout(font, text, style);
    let outlines = font.outline_glyphs();
    let size = font_size(style);
    let slant = if style.italic {
        Affine::skew(-ITALIC_SKEW, 0.0)
    } else {
        Affine::IDENTITY
    };
    let mut pen = LinePen {
        cmds: Vec::new(),
        transform: Affine::IDENTITY,
    };
    for glyph in &glyphs {
        let Some(outline) = outlines.get(glyph.glyph_id) else {
            continue;
        };
        pen.transform =
            Affine::translate((origin.x + glyph.x, origin.y)) * slant * Affine::FLIP_Y;
        if let Err(err) = outline.draw(size, &mut pen) {
            log::debug!("skipping glyph {}: {err}", glyph.glyph_id.to_u32());
        }
    }
    let path = PathDesc {
        commands: pen.cmds.into_boxed_slice(),
    };
    (path, advance)
}

struct LinePen {
    cmds: Vec<PathCmd>,
    transform: Affine,
}

impl LinePen {
    fn point(&self, x: f32, y: f32) -> Point {
        self.transform * Point::new(f64::from(x), f64::from(y))
    }
}

impl OutlinePen for LinePen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.cmds.push(PathCmd::MoveTo(self.point(x, y)));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.cmds.push(PathCmd::LineTo(self.point(x, y)));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.cmds
            .push(PathCmd::QuadTo(self.point(cx0, cy0), self.point(x, y)));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.cmds.push(PathCmd::CurveTo(
            self.point(cx0, cy0),
            self.point(cx1, cy1),
            self.point(x, y),
        ));
    }

    fn close(&mut self) {
        self.cmds.push(PathCmd::Close);
    }
}
