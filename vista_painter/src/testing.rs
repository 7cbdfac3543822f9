// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for unit tests.

use kurbo::Point;
use peniko::Brush;
use vista_imaging::{
    DrawOp, ImagingBackend, ImagingBackendExt, PaintDesc, PathCmd, PathDesc, ResourceBackend,
};
use vista_imaging_ref::DrawRecord;
use vista_style::TextStyle;
use vista_text::{FontExtents, FontMetrics, TextExtents, TextRenderer};

/// End point of every segment, skipping `Close`.
pub(crate) fn end_points(path: &PathDesc) -> Vec<Point> {
    path.commands
        .iter()
        .filter_map(|cmd| match *cmd {
            PathCmd::MoveTo(p) | PathCmd::LineTo(p) => Some(p),
            PathCmd::QuadTo(_, p) | PathCmd::CurveTo(_, _, p) => Some(p),
            PathCmd::Close => None,
        })
        .collect()
}

pub(crate) fn is_fill(record: &DrawRecord<'_>) -> bool {
    matches!(record.op, DrawOp::FillPath(_) | DrawOp::FillRect(_))
}

pub(crate) fn is_stroke(record: &DrawRecord<'_>) -> bool {
    matches!(record.op, DrawOp::StrokePath(_) | DrawOp::StrokeRect(_))
}

/// Color of a solid paint.
pub(crate) fn fill_color(record: &DrawRecord<'_>) -> Option<peniko::Color> {
    match record.paint.map(|paint| &paint.brush) {
        Some(Brush::Solid(color)) => Some(*color),
        _ => None,
    }
}

/// Every character is 10 px wide; the font reaches 12 px above and 4 px
/// below the baseline.
///
/// Drawing a line fills a rectangle covering its font extent, so tests can
/// check where text ended up.
#[derive(Debug, Default)]
pub(crate) struct BlockText;

impl FontMetrics for BlockText {
    fn font_extents(&self, _style: &TextStyle) -> FontExtents {
        FontExtents {
            ascent: 12.0,
            descent: 4.0,
        }
    }

    fn text_extents(&self, text: &str, _style: &TextStyle) -> TextExtents {
        #[allow(clippy::cast_precision_loss, reason = "short test strings")]
        let advance = 10.0 * text.chars().count() as f64;
        TextExtents {
            width: advance,
            height: 10.0,
            x_bearing: 0.0,
            y_bearing: -8.0,
            x_advance: advance,
        }
    }
}

impl TextRenderer for BlockText {
    fn draw_line<B: ImagingBackend + ResourceBackend>(
        &self,
        backend: &mut B,
        text: &str,
        origin: Point,
        style: &TextStyle,
    ) -> f64 {
        let advance = self.text_extents(text, style).x_advance;
        let block = kurbo::Rect::new(origin.x, origin.y - 12.0, origin.x + advance, origin.y + 4.0);
        backend.with_paint(PaintDesc::solid(style.color.to_peniko()), |b| {
            b.draw(DrawOp::FillRect(block));
        });
        advance
    }
}
