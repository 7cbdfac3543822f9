// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::path::Path;

use kurbo::{Point, Vec2};
use log::{debug, warn};
use vista_color::{Color, ColorChoice};
use vista_geometry::{Anchor, Ellipse, Rect, Vec2i, Vec3d};
use vista_imaging::{DrawOp, ImagingBackend, ImagingBackendExt, PaintDesc};
use vista_imaging_vello_cpu::{VelloCpuImagingBackend, render_premultiplied_rgba8};
use vista_raster::{
    ElementType, ImageBuffer, ImageView, Raster, RasterMut, load_image_u8, save_image_u8,
};
use vista_style::{ArrowStyle, BoundingBox2DStyle, LineStyle, MarkerStyle, TextStyle};
use vista_text::FontBook;

use crate::gradient::ColorGradient;
use crate::helpers::{self, AxesProjection, CameraPose, ImagePlacement, TextBox, TrajectoryStyle};
use crate::{Error, Result};

/// Styles a [`Painter`] falls back to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PainterDefaults {
    /// Default line style.
    pub line: LineStyle,
    /// Default arrow style.
    pub arrow: ArrowStyle,
    /// Replaces invalid text styles passed to the text and bounding box
    /// drawing calls.
    pub text: TextStyle,
}

/// Draws onto an RGBA8 canvas it owns.
///
/// A painter starts without a canvas; every drawing call fails with
/// [`Error::CanvasNotSet`] until one of the `set_canvas*` methods succeeded.
/// Setting a canvas discards the previous one.
///
/// Each drawing call renders its primitive into a fresh, transparent render
/// context and blends the result onto the canvas, so pixels the primitive
/// does not cover are left exactly as they were. Calls that fail leave the
/// canvas untouched.
#[derive(Clone, Debug, Default)]
pub struct Painter {
    canvas: Option<ImageBuffer>,
    defaults: PainterDefaults,
    fonts: FontBook,
}

impl Painter {
    /// A painter without canvas and without fonts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the canvas by a `width` x `height` image filled with `color`.
    pub fn set_canvas(&mut self, width: usize, height: usize, color: Color) -> Result<()> {
        canvas_extent(width)?;
        canvas_extent(height)?;
        let mut canvas = ImageBuffer::new(width, height, 4, ElementType::U8);
        let fill = color.to_rgba_bytes().map(f64::from);
        canvas.fill_pixel(&fill)?;
        debug!("new {width}x{height} canvas filled with {color}");
        self.canvas = Some(canvas);
        Ok(())
    }

    /// Replace the canvas by the image stored at `path`.
    pub fn set_canvas_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let image = load_image_u8(path, Some(4))?;
        self.set_canvas_from_image(&image)
    }

    /// Replace the canvas by a copy of `image`.
    ///
    /// Grayscale and RGB images are converted to RGBA, other element types
    /// to `u8`.
    pub fn set_canvas_from_image(&mut self, image: &impl Raster) -> Result<()> {
        if !image.is_valid() {
            return Err(Error::InvalidArgument(
                "cannot use an invalid image as canvas".into(),
            ));
        }
        canvas_extent(image.width())?;
        canvas_extent(image.height())?;
        self.canvas = Some(image.to_u8(4)?);
        debug!("canvas set from {}x{} image", image.width(), image.height());
        Ok(())
    }

    /// Returns `true` if a canvas is set.
    pub fn is_valid(&self) -> bool {
        self.canvas.is_some()
    }

    /// A copy of the canvas.
    pub fn canvas(&self) -> Result<ImageBuffer> {
        self.canvas.clone().ok_or(Error::CanvasNotSet)
    }

    /// The canvas without copying it.
    pub fn canvas_view(&self) -> Result<ImageView<'_>> {
        self.canvas
            .as_ref()
            .map(Raster::view)
            .ok_or(Error::CanvasNotSet)
    }

    /// Width and height of the canvas.
    pub fn canvas_size(&self) -> Result<Vec2i> {
        let canvas = self.canvas.as_ref().ok_or(Error::CanvasNotSet)?;
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_possible_wrap,
            reason = "canvas extents fit into u16"
        )]
        let size = Vec2i::new(canvas.width() as i32, canvas.height() as i32);
        Ok(size)
    }

    /// Save the canvas as PNG or JPEG, depending on the file extension.
    pub fn save_canvas(&self, path: impl AsRef<Path>) -> Result<()> {
        let canvas = self.canvas.as_ref().ok_or(Error::CanvasNotSet)?;
        save_image_u8(path, canvas)?;
        Ok(())
    }

    /// Styles used in place of invalid ones.
    pub fn defaults(&self) -> &PainterDefaults {
        &self.defaults
    }

    /// Replace the default styles.
    pub fn set_defaults(&mut self, defaults: PainterDefaults) {
        self.defaults = defaults;
    }

    /// Fonts available to text drawing.
    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Register fonts for text drawing.
    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    /// Draw a circular arc, see [`helpers::draw_arc`].
    pub fn draw_arc(
        &mut self,
        center: Point,
        radius: f64,
        angle_from: f64,
        angle_to: f64,
        contour: Option<&LineStyle>,
        include_center: bool,
        fill: Option<Color>,
    ) -> Result<()> {
        self.paint(|b, _| {
            helpers::draw_arc(b, center, radius, angle_from, angle_to, contour, include_center, fill)
        })
    }

    /// Draw a circle.
    pub fn draw_circle(
        &mut self,
        center: Point,
        radius: f64,
        contour: Option<&LineStyle>,
        fill: Option<Color>,
    ) -> Result<()> {
        self.paint(|b, _| helpers::draw_circle(b, center, radius, contour, fill))
    }

    /// Draw an ellipse or an elliptic arc.
    pub fn draw_ellipse(
        &mut self,
        ellipse: &Ellipse,
        contour: Option<&LineStyle>,
        fill: Option<Color>,
    ) -> Result<()> {
        self.paint(|b, _| helpers::draw_ellipse(b, ellipse, contour, fill))
    }

    /// Draw a (rotated, rounded) rectangle.
    pub fn draw_rect(
        &mut self,
        rect: &Rect,
        contour: Option<&LineStyle>,
        fill: Option<Color>,
    ) -> Result<()> {
        self.paint(|b, _| helpers::draw_rect(b, rect, contour, fill))
    }

    /// Draw a straight line.
    pub fn draw_line(&mut self, from: Point, to: Point, line: &LineStyle) -> Result<()> {
        self.paint(|b, _| helpers::draw_line(b, from, to, line))
    }

    /// Draw grid lines between two corners. Equal corners span the whole
    /// canvas.
    pub fn draw_grid(
        &mut self,
        top_left: Point,
        bottom_right: Point,
        spacing_x: f64,
        spacing_y: f64,
        line: &LineStyle,
    ) -> Result<()> {
        let size = self.canvas_extents()?;
        self.paint(|b, _| {
            helpers::draw_grid(b, top_left, bottom_right, spacing_x, spacing_y, line, size)
        })
    }

    /// Draw a closed polygon.
    pub fn draw_polygon(
        &mut self,
        points: &[Point],
        contour: Option<&LineStyle>,
        fill: Option<Color>,
    ) -> Result<()> {
        self.paint(|b, _| helpers::draw_polygon(b, points, contour, fill))
    }

    /// Draw an arrow from `from` to `to`.
    pub fn draw_arrow(&mut self, from: Point, to: Point, style: &ArrowStyle) -> Result<()> {
        self.paint(|b, _| helpers::draw_arrow(b, from, to, style))
    }

    /// Draw a single marker.
    pub fn draw_marker(&mut self, position: Point, style: &MarkerStyle) -> Result<()> {
        self.paint(|b, _| helpers::draw_marker(b, position, style))
    }

    /// Draw markers with individual colors.
    pub fn draw_markers(&mut self, markers: &[(Point, ColorChoice)], style: &MarkerStyle) -> Result<()> {
        self.paint(|b, _| helpers::draw_markers(b, markers, style))
    }

    /// Draw an image onto the canvas.
    pub fn draw_image(&mut self, image: &impl Raster, placement: &ImagePlacement) -> Result<()> {
        self.paint(|b, _| helpers::draw_image(b, image, placement))
    }

    /// Draw (multi-line) text so that its `anchor` lands on `position` and
    /// return its padded box.
    ///
    /// An invalid text style is replaced by the default one.
    pub fn draw_text<S: AsRef<str>>(
        &mut self,
        lines: &[S],
        position: Point,
        anchor: Anchor,
        style: &TextStyle,
        padding: Vec2,
        rotation: f64,
    ) -> Result<Rect> {
        self.draw_text_box(lines, position, anchor, style, padding, rotation, &TextBox::default())
    }

    /// Like [`Painter::draw_text`], with a box behind the text.
    pub fn draw_text_box<S: AsRef<str>>(
        &mut self,
        lines: &[S],
        position: Point,
        anchor: Anchor,
        style: &TextStyle,
        padding: Vec2,
        rotation: f64,
        text_box: &TextBox,
    ) -> Result<Rect> {
        let style = self.text_style_or_default(style).clone();
        self.paint(|b, fonts| {
            helpers::draw_text_box(
                b, fonts, lines, position, anchor, &style, padding, rotation, text_box,
            )
        })
    }

    /// Draw a bounding box with a label.
    ///
    /// Returns `Ok(false)` if nothing was drawn because the box or its style
    /// are invalid.
    pub fn draw_bounding_box_2d<S: AsRef<str>>(
        &mut self,
        rect: &Rect,
        label: &[S],
        style: &BoundingBox2DStyle,
    ) -> Result<bool> {
        let mut style = style.clone();
        if !label.is_empty() {
            style.text_style = self.text_style_or_default(&style.text_style).clone();
        }
        self.paint(|b, fonts| helpers::draw_bounding_box_2d(b, fonts, rect, label, &style))
    }

    /// Draw a fading trajectory.
    pub fn draw_trajectory(
        &mut self,
        points: &[Point],
        line: &LineStyle,
        style: &TrajectoryStyle,
    ) -> Result<bool> {
        self.paint(|b, _| helpers::draw_trajectory(b, points, line, style))
    }

    /// Draw several fading trajectories with individual colors.
    pub fn draw_trajectories(
        &mut self,
        trajectories: &[(Vec<Point>, ColorChoice)],
        line: &LineStyle,
        style: &TrajectoryStyle,
    ) -> Result<bool> {
        self.paint(|b, _| helpers::draw_trajectories(b, trajectories, line, style))
    }

    /// Project and draw the axes of a world coordinate system.
    pub fn draw_xyz_axes(
        &mut self,
        camera: &CameraPose,
        origin: Vec3d,
        lengths: Vec3d,
        style: &ArrowStyle,
        colors: [Option<Color>; 3],
    ) -> Result<AxesProjection> {
        let size = self.canvas_extents()?;
        self.paint(|b, _| helpers::draw_xyz_axes(b, camera, origin, lengths, style, colors, size))
    }

    /// Draw the visible part of the horizon seen by `camera`.
    ///
    /// Returns the drawn segment, or `None` if the horizon misses the
    /// canvas.
    pub fn draw_horizon_line(
        &mut self,
        camera: &CameraPose,
        line: &LineStyle,
    ) -> Result<Option<(Point, Point)>> {
        let size = self.canvas_extents()?;
        self.paint(|b, _| helpers::draw_horizon_line(b, camera, line, size))
    }

    /// Paint a color gradient over the whole canvas.
    ///
    /// Returns `Ok(false)` for gradients with fewer than two stops.
    pub fn draw_gradient(&mut self, gradient: &impl ColorGradient) -> Result<bool> {
        if !gradient.is_valid() {
            warn!("skipping color gradient with {} stop(s)", gradient.stops().len());
            return Ok(false);
        }
        let size = self.canvas_extents()?;
        let paint = PaintDesc::from(gradient.to_gradient());
        self.paint(|b, _| {
            b.with_paint(paint, |b| {
                let canvas = kurbo::Rect::from_origin_size(Point::ZERO, size.to_size());
                b.draw(DrawOp::FillRect(canvas));
            });
            Ok(true)
        })
    }

    fn text_style_or_default<'a>(&'a self, style: &'a TextStyle) -> &'a TextStyle {
        if style.is_valid() {
            style
        } else {
            warn!("invalid text style {style}, using the default {}", self.defaults.text);
            &self.defaults.text
        }
    }

    fn canvas_extents(&self) -> Result<Vec2> {
        let size = self.canvas_size()?;
        Ok(Vec2::new(f64::from(size.x), f64::from(size.y)))
    }

    /// Render `draw` into a transparent layer and blend that layer onto the
    /// canvas. Pixels the layer leaves clear keep their exact values.
    fn paint<R>(
        &mut self,
        draw: impl FnOnce(&mut VelloCpuImagingBackend<'_>, &FontBook) -> Result<R>,
    ) -> Result<R> {
        let fonts = &self.fonts;
        let canvas = self.canvas.as_mut().ok_or(Error::CanvasNotSet)?;
        let width = canvas_extent(canvas.width())?;
        let height = canvas_extent(canvas.height())?;

        let mut outcome = None;
        let layer = render_premultiplied_rgba8(width, height, |backend| {
            outcome = Some(draw(backend, fonts));
        });
        let value = outcome.expect("rendering always runs its closure")?;
        composite_over(canvas.data_mut(), &layer);
        Ok(value)
    }
}

/// Source-over blend a premultiplied RGBA8 `layer` onto a straight-alpha
/// RGBA8 `canvas` of the same size.
fn composite_over(canvas: &mut [u8], layer: &[u8]) {
    for (dst, src) in canvas.chunks_exact_mut(4).zip(layer.chunks_exact(4)) {
        match src[3] {
            0 => continue,
            255 => dst.copy_from_slice(src),
            _ => {
                let src_alpha = f64::from(src[3]) / 255.0;
                let keep = f64::from(dst[3]) / 255.0 * (1.0 - src_alpha);
                let alpha = src_alpha + keep;
                for c in 0..3 {
                    let premul = f64::from(src[c]) / 255.0 + f64::from(dst[c]) / 255.0 * keep;
                    dst[c] = unit_to_byte(premul / alpha);
                }
                dst[3] = unit_to_byte(alpha);
            }
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the value is clamped to [0, 255] first"
)]
fn unit_to_byte(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

fn canvas_extent(extent: usize) -> Result<u16> {
    match u16::try_from(extent) {
        Ok(extent) if extent > 0 => Ok(extent),
        _ => Err(Error::InvalidArgument(format!(
            "canvas extents must be in [1, {}], got {extent}",
            u16::MAX
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawing_needs_a_canvas() {
        let mut painter = Painter::new();
        assert!(!painter.is_valid());
        let line = LineStyle::default();
        let result = painter.draw_line(Point::ZERO, Point::new(5.0, 5.0), &line);
        assert!(matches!(result, Err(Error::CanvasNotSet)));
        assert!(matches!(painter.canvas_size(), Err(Error::CanvasNotSet)));
        assert!(matches!(painter.canvas(), Err(Error::CanvasNotSet)));
    }

    #[test]
    fn canvas_extents_are_checked() {
        let mut painter = Painter::new();
        assert!(painter.set_canvas(0, 10, Color::WHITE).is_err());
        assert!(painter.set_canvas(70_000, 10, Color::WHITE).is_err());
        painter.set_canvas(20, 10, Color::WHITE).unwrap();
        assert_eq!(painter.canvas_size().unwrap(), Vec2i::new(20, 10));
        assert_eq!(
            painter.canvas_view().unwrap().get::<u8>(19, 9, 3).unwrap(),
            255
        );
    }

    #[test]
    fn failed_draws_keep_the_canvas() {
        let mut painter = Painter::new();
        painter.set_canvas(8, 8, Color::BLUE).unwrap();
        let before = painter.canvas().unwrap();
        let result = painter.draw_circle(Point::new(4.0, 4.0), -1.0, Some(&LineStyle::default()), None);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        assert_eq!(painter.canvas().unwrap(), before);
    }

    #[test]
    fn translucent_canvases_only_change_where_drawn() {
        let mut painter = Painter::new();
        painter.set_canvas(16, 16, Color::new(0.2, 0.6, 0.9, 0.3)).unwrap();
        let before = painter.canvas().unwrap();
        let line = LineStyle::new(1.0, Color::RED);
        for _ in 0..10 {
            painter.draw_line(Point::ZERO, Point::new(3.0, 0.0), &line).unwrap();
        }
        let after = painter.canvas().unwrap();
        for (x, y) in [(15, 15), (8, 8), (0, 5)] {
            for c in 0..4 {
                assert_eq!(
                    after.get::<u8>(x, y, c).unwrap(),
                    before.get::<u8>(x, y, c).unwrap(),
                    "pixel ({x}, {y}) channel {c}"
                );
            }
        }
        assert_eq!(after.get::<u8>(1, 0, 0).unwrap(), 255, "the line itself is drawn");
    }

    #[test]
    fn layers_blend_source_over() {
        let mut canvas = [255, 255, 255, 255, 0, 0, 0, 0, 1, 2, 3, 4, 9, 9, 9, 9];
        let layer = [0, 0, 0, 128, 100, 0, 0, 250, 0, 0, 0, 0, 10, 20, 30, 255];
        composite_over(&mut canvas, &layer);
        assert_eq!(canvas[..4], [127, 127, 127, 255], "half black over white");
        assert_eq!(canvas[4..8], [102, 0, 0, 250], "over a clear pixel");
        assert_eq!(canvas[8..12], [1, 2, 3, 4], "a clear layer pixel keeps the canvas");
        assert_eq!(canvas[12..], [10, 20, 30, 255], "opaque pixels replace the canvas");
    }

    #[test]
    fn invalid_text_styles_fall_back_to_the_default() {
        let painter = Painter::new();
        let invalid = TextStyle {
            size: 0.0,
            ..TextStyle::default()
        };
        assert_eq!(painter.text_style_or_default(&invalid), &TextStyle::default());
        let large = TextStyle {
            size: 30.0,
            ..TextStyle::default()
        };
        assert_eq!(painter.text_style_or_default(&large).size, 30.0);
    }
}
