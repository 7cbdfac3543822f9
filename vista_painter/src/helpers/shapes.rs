// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::f64::consts::TAU;

use kurbo::{Affine, Arc, BezPath, Point, RoundedRect, Shape, Vec2};
use vista_color::Color;
use vista_geometry::{Ellipse, Rect};
use vista_imaging::{CLIP_TOLERANCE, ClipShape, ImagingBackend, ImagingBackendExt, PathDesc};
use vista_style::LineStyle;

use super::{HALF_PIXEL, check_contour_or_fill, check_line_style, fill_and_stroke, stroke};
use crate::{Error, Result};

const ANGLE_EPSILON: f64 = 1e-9;

/// Draw a circular arc from `angle_from` to `angle_to` (degrees, clockwise
/// from the positive x axis).
///
/// If `angle_to` is smaller than `angle_from`, the arc continues clockwise
/// past 360°. With `include_center`, the arc is closed through the center,
/// which gives a pie slice.
pub fn draw_arc<B: ImagingBackend>(
    backend: &mut B,
    center: Point,
    radius: f64,
    angle_from: f64,
    angle_to: f64,
    contour: Option<&LineStyle>,
    include_center: bool,
    fill: Option<Color>,
) -> Result<()> {
    check_contour_or_fill(contour, fill, "an arc")?;
    if radius <= 0.0 || !radius.is_finite() {
        return Err(Error::InvalidArgument(format!(
            "arc radius must be > 0, got {radius}"
        )));
    }
    let arc = Arc {
        center: center + HALF_PIXEL,
        radii: Vec2::new(radius, radius),
        start_angle: angle_from.to_radians(),
        sweep_angle: sweep_degrees(angle_from, angle_to).to_radians(),
        x_rotation: 0.0,
    };
    fill_and_stroke(backend, &arc_path(&arc, include_center), fill, contour);
    Ok(())
}

/// Draw a full circle.
pub fn draw_circle<B: ImagingBackend>(
    backend: &mut B,
    center: Point,
    radius: f64,
    contour: Option<&LineStyle>,
    fill: Option<Color>,
) -> Result<()> {
    draw_arc(backend, center, radius, 0.0, 360.0, contour, false, fill)
}

/// Draw an ellipse or an elliptic arc.
///
/// The arc angles of a partial ellipse are the directions of the arc ends
/// as seen from the center, so an arc from 0° to 45° ends on the diagonal
/// regardless of the axis ratio.
pub fn draw_ellipse<B: ImagingBackend>(
    backend: &mut B,
    ellipse: &Ellipse,
    contour: Option<&LineStyle>,
    fill: Option<Color>,
) -> Result<()> {
    check_contour_or_fill(contour, fill, "an ellipse")?;
    if !ellipse.is_valid() {
        return Err(Error::InvalidArgument(format!(
            "cannot draw invalid ellipse {ellipse}"
        )));
    }
    let center = ellipse.center() + HALF_PIXEL;
    let radii = ellipse.axes() / 2.0;
    let x_rotation = ellipse.rotation.to_radians();
    let path = if ellipse.is_partial() {
        let from = parametric_angle(ellipse.angle_from, radii);
        let to = parametric_angle(ellipse.angle_to, radii);
        let arc = Arc {
            center,
            radii,
            start_angle: from.to_radians(),
            sweep_angle: sweep_degrees(from, to).to_radians(),
            x_rotation,
        };
        arc_path(&arc, ellipse.include_center)
    } else {
        PathDesc::from_shape(&kurbo::Ellipse::new(center, radii, x_rotation))
    };
    fill_and_stroke(backend, &path, fill, contour);
    Ok(())
}

/// Draw a (rotated, optionally rounded) rectangle.
pub fn draw_rect<B: ImagingBackend>(
    backend: &mut B,
    rect: &Rect,
    contour: Option<&LineStyle>,
    fill: Option<Color>,
) -> Result<()> {
    check_contour_or_fill(contour, fill, "a rectangle")?;
    if !rect.is_valid() {
        return Err(Error::InvalidArgument(format!(
            "cannot draw invalid rectangle {rect}"
        )));
    }
    let path = rect_path(rect);
    backend.with_transform(local_frame(rect.center() + HALF_PIXEL, rect.rotation), |b| {
        fill_and_stroke(b, &path, fill, contour);
    });
    Ok(())
}

/// Outline of `rect` centered at the origin, ignoring its position and
/// rotation.
pub fn rect_path(rect: &Rect) -> PathDesc {
    match rect_clip(rect) {
        ClipShape::RoundedRect(rounded) => PathDesc::from_shape(&rounded),
        ClipShape::Rect(bounds) => PathDesc::from_shape(&bounds),
        ClipShape::Ellipse(_) | ClipShape::Path(_) => PathDesc::default(),
    }
}

/// [`rect_path`] as a clip region.
pub(crate) fn rect_clip(rect: &Rect) -> ClipShape {
    let (hw, hh) = (rect.half_width(), rect.half_height());
    let bounds = kurbo::Rect::new(-hw, -hh, hw, hh);
    if rect.is_rounded() {
        ClipShape::RoundedRect(RoundedRect::from_rect(bounds, rect.absolute_radius()))
    } else {
        ClipShape::Rect(bounds)
    }
}

/// Translation to `center` followed by a clockwise rotation in degrees.
pub(crate) fn local_frame(center: Point, rotation: f64) -> Affine {
    Affine::translate(center.to_vec2()) * Affine::rotate(rotation.to_radians())
}

/// Draw a straight line.
pub fn draw_line<B: ImagingBackend>(
    backend: &mut B,
    from: Point,
    to: Point,
    line: &LineStyle,
) -> Result<()> {
    check_line_style(line, "a line")?;
    stroke(
        backend,
        PathDesc::polyline([from + HALF_PIXEL, to + HALF_PIXEL], false),
        line,
    );
    Ok(())
}

/// Draw a grid of horizontal and vertical lines.
///
/// Swapped corners are reordered. If both corners are equal, the grid
/// starts there and spans the rest of a canvas of `canvas_size`.
pub fn draw_grid<B: ImagingBackend>(
    backend: &mut B,
    top_left: Point,
    bottom_right: Point,
    spacing_x: f64,
    spacing_y: f64,
    line: &LineStyle,
    canvas_size: Vec2,
) -> Result<()> {
    check_line_style(line, "a grid")?;
    if !(spacing_x > 0.0 && spacing_y > 0.0) {
        return Err(Error::InvalidArgument(format!(
            "grid spacing must be > 0, got ({spacing_x}, {spacing_y})"
        )));
    }
    let left = top_left.x.min(bottom_right.x);
    let top = top_left.y.min(bottom_right.y);
    let (right, bottom) = if top_left == bottom_right {
        (canvas_size.x, canvas_size.y)
    } else {
        (top_left.x.max(bottom_right.x), top_left.y.max(bottom_right.y))
    };

    let mut path = BezPath::new();
    for x in grid_positions(left, right, spacing_x) {
        path.move_to((x, top));
        path.line_to((x, bottom));
    }
    for y in grid_positions(top, bottom, spacing_y) {
        path.move_to((left, y));
        path.line_to((right, y));
    }
    stroke(backend, PathDesc::from(&path), line);
    Ok(())
}

/// Pixel-centered positions `start + 0.5 + k * spacing` up to `end`.
fn grid_positions(start: f64, end: f64, spacing: f64) -> impl Iterator<Item = f64> {
    let steps = ((end - start) / spacing).floor();
    core::iter::successors(Some(0.0_f64), |k| Some(k + 1.0))
        .take_while(move |k| *k <= steps)
        .map(move |k| start + 0.5 + k * spacing)
}

/// Draw a closed polygon.
pub fn draw_polygon<B: ImagingBackend>(
    backend: &mut B,
    points: &[Point],
    contour: Option<&LineStyle>,
    fill: Option<Color>,
) -> Result<()> {
    check_contour_or_fill(contour, fill, "a polygon")?;
    if points.len() < 3 {
        return Err(Error::InvalidArgument(format!(
            "a polygon needs at least 3 points, got {}",
            points.len()
        )));
    }
    let path = PathDesc::polyline(points.iter().map(|p| *p + HALF_PIXEL), true);
    fill_and_stroke(backend, &path, fill, contour);
    Ok(())
}

/// Clockwise sweep from `from` to `to` in degrees; a smaller `to` wraps
/// around.
fn sweep_degrees(from: f64, to: f64) -> f64 {
    let sweep = to - from;
    if sweep < 0.0 {
        sweep.rem_euclid(360.0)
    } else {
        sweep
    }
}

/// The angle of the ellipse parametrization whose point lies in direction
/// `degrees` from the center.
fn parametric_angle(degrees: f64, radii: Vec2) -> f64 {
    if degrees.abs() < ANGLE_EPSILON || (degrees - 360.0).abs() < ANGLE_EPSILON {
        return degrees;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    (sin / radii.y).atan2(cos / radii.x).to_degrees()
}

fn arc_path(arc: &Arc, include_center: bool) -> PathDesc {
    let mut path: BezPath = arc.path_elements(CLIP_TOLERANCE).collect();
    if include_center {
        path.line_to(arc.center);
        path.close_path();
    } else if arc.sweep_angle.abs() >= TAU - ANGLE_EPSILON {
        path.close_path();
    }
    PathDesc::from(&path)
}
