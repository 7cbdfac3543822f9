// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Vec2};
use vista_color::Color;
use vista_geometry::{Anchor, Rect};
use vista_imaging::{ImagingBackend, ImagingBackendExt};
use vista_style::{LineStyle, TextStyle};
use vista_text::{MultiLineText, TextRenderer};

use super::shapes::{local_frame, rect_path};
use super::{HALF_PIXEL, fill_and_stroke};
use crate::{Error, Result};

/// Optional box drawn behind a text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextBox {
    /// Contour of the box.
    pub line_style: Option<LineStyle>,
    /// Fill of the box.
    pub fill: Option<Color>,
    /// Corner radius, see [`Rect::radius`].
    pub corner_radius: f64,
    /// A positive width or height replaces the padded text extent.
    pub fixed_size: Option<Vec2>,
}

impl TextBox {
    fn is_visible(&self) -> bool {
        self.fill.is_some() || self.line_style.as_ref().is_some_and(LineStyle::is_valid)
    }
}

/// Draw a single line of text so that its `anchor` lands on `position`.
///
/// Returns the text extent grown by `padding`.
pub fn draw_text<B: ImagingBackend, T: TextRenderer>(
    backend: &mut B,
    renderer: &T,
    text: &str,
    position: Point,
    anchor: Anchor,
    style: &TextStyle,
    padding: Vec2,
) -> Result<Rect> {
    draw_text_box(
        backend,
        renderer,
        &[text],
        position,
        anchor,
        style,
        padding,
        0.0,
        &TextBox::default(),
    )
}

/// Draw a paragraph, optionally on a box, rotated about `position`.
///
/// The `anchor` of the padded (or fixed-size) box lands on `position`.
/// Returns the box in canvas coordinates; its rotation is `rotation`.
/// Without lines, nothing is drawn and the returned box is empty.
pub fn draw_text_box<B: ImagingBackend, T: TextRenderer, S: AsRef<str>>(
    backend: &mut B,
    renderer: &T,
    lines: &[S],
    position: Point,
    anchor: Anchor,
    style: &TextStyle,
    padding: Vec2,
    rotation: f64,
    text_box: &TextBox,
) -> Result<Rect> {
    if !style.is_valid() {
        return Err(Error::InvalidArgument(format!(
            "cannot draw text with invalid style {style}"
        )));
    }
    if lines.is_empty() {
        return Ok(Rect::default());
    }

    let mut text = MultiLineText::new(lines, renderer, style);
    text.align(Point::ZERO, anchor, padding, text_box.fixed_size);
    let local = text.bounding_box(text_box.corner_radius);
    let frame = local_frame(position, rotation);

    backend.with_transform(frame, |b| {
        if text_box.is_visible() {
            let path = rect_path(&local);
            let center = (local.center() + HALF_PIXEL).to_vec2();
            b.with_transform(Affine::translate(center), |b| {
                fill_and_stroke(b, &path, text_box.fill, text_box.line_style.as_ref());
            });
        }
        for line in text.lines() {
            renderer.draw_line(b, line.text(), line.reference_point() + HALF_PIXEL, style);
        }
    });

    let center = frame * local.center();
    Ok(Rect::new(center.x, center.y, local.width, local.height)
        .with_radius(local.radius)
        .with_rotation(rotation))
}
