// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, BezPath, Circle, Point};
use vista_color::ColorChoice;
use vista_imaging::{ImagingBackend, ImagingBackendExt, PathDesc};
use vista_style::{DEFAULT_MITER_LIMIT, Marker, MarkerStyle, StrokeGeometry};

use super::{HALF_PIXEL, solid};
use crate::{Error, Result};

/// Draw a single marker centered on `position`.
///
/// Unfilled markers are shrunk by how far their contour extends past the
/// outline, so every marker fits into a `size` by `size` box. An optional
/// background circle (a square for square markers) is drawn first.
pub fn draw_marker<B: ImagingBackend>(
    backend: &mut B,
    position: Point,
    style: &MarkerStyle,
) -> Result<()> {
    if !style.is_valid() {
        return Err(Error::InvalidArgument(format!(
            "invalid marker style (size {}, thickness {})",
            style.size, style.thickness
        )));
    }
    let center = (position + HALF_PIXEL).to_vec2();
    backend.with_transform(Affine::translate(center), |b| {
        if let Some(color) = style.background() {
            b.fill_path_with(background_path(style), solid(color));
        }
        let path = marker_path(style);
        if style.is_filled() {
            b.fill_path_with(path, solid(style.color));
        } else {
            let stroke = kurbo::Stroke::new(style.thickness)
                .with_caps(style.cap.to_kurbo())
                .with_join(style.join.to_kurbo())
                .with_miter_limit(DEFAULT_MITER_LIMIT);
            b.stroke_path_with(path, &stroke, solid(style.color));
        }
    });
    Ok(())
}

/// Draw the same marker shape at several positions, each with its own
/// color choice. `Same` and `None` fall back to the style color.
pub fn draw_markers<B: ImagingBackend>(
    backend: &mut B,
    markers: &[(Point, ColorChoice)],
    style: &MarkerStyle,
) -> Result<()> {
    let mut marker_style = style.clone();
    for (position, color) in markers {
        marker_style.color = color.resolve(style.color).unwrap_or(style.color);
        draw_marker(backend, *position, &marker_style)?;
    }
    Ok(())
}

fn background_path(style: &MarkerStyle) -> PathDesc {
    let radius = style.size / 2.0 + style.background_border;
    if matches!(style.marker, Marker::Square) {
        PathDesc::from_shape(&kurbo::Rect::new(-radius, -radius, radius, radius))
    } else {
        PathDesc::from_shape(&Circle::new(Point::ZERO, radius))
    }
}

/// Outline of the marker centered at the origin.
fn marker_path(style: &MarkerStyle) -> PathDesc {
    let filled = style.is_filled();
    let half = style.size / 2.0;
    // Extent of the contour past a corner with the given interior angle.
    let join = |angle: f64| {
        if filled {
            0.0
        } else {
            style.join_offset(angle, DEFAULT_MITER_LIMIT)
        }
    };
    match style.marker {
        Marker::Point | Marker::Circle => {
            let radius = if filled { half } else { half - style.thickness / 2.0 };
            PathDesc::from_shape(&Circle::new(Point::ZERO, radius))
        }
        Marker::Plus => plus(half - style.cap_offset(), 0.0),
        Marker::Cross => plus(half - style.cap_offset(), 45.0),
        Marker::Star => {
            let h = half - style.cap_offset();
            let mut path = BezPath::new();
            for i in 0..5_u8 {
                path.move_to(Point::ZERO);
                path.line_to(vertex(h, 72.0 * f64::from(i)));
            }
            PathDesc::from(&path)
        }
        Marker::Square => {
            let h = (style.size - 2.0 * join(90.0)) / 2.0;
            PathDesc::from_shape(&kurbo::Rect::new(-h, -h, h, h))
        }
        Marker::RotatedSquare => {
            let h = (style.size - 2.0 * join(90.0)) / 2.0;
            let corners = [0.0, 90.0, 180.0, 270.0].map(|angle| vertex(h, angle));
            PathDesc::polyline(corners, true)
        }
        Marker::Diamond => {
            let h = half - join(45.0);
            let corners = [
                Point::new(0.0, -h),
                Point::new(h / 2.0, 0.0),
                Point::new(0.0, h),
                Point::new(-h / 2.0, 0.0),
            ];
            PathDesc::polyline(corners, true)
        }
        Marker::TriangleUp => triangle(half - join(60.0), 0.0),
        Marker::TriangleRight => triangle(half - join(60.0), 90.0),
        Marker::TriangleDown => triangle(half - join(60.0), 180.0),
        Marker::TriangleLeft => triangle(half - join(60.0), 270.0),
        Marker::Hexagram => {
            let h = half - join(60.0);
            let mut path = triangle(h, 0.0).to_bez_path();
            path.extend(triangle(h, 60.0).to_bez_path().elements().iter().copied());
            PathDesc::from(&path)
        }
        Marker::Pentagon => polygon(half - join(108.0), 4, 72.0),
        Marker::Pentagram => polygon(half - join(36.0), 4, 144.0),
        Marker::Hexagon => polygon(half - join(120.0), 5, 60.0),
        Marker::Heptagon => polygon(half - join(900.0 / 7.0), 6, 360.0 / 7.0),
        Marker::Heptagram => polygon(half - join(540.0 / 7.0), 6, 720.0 / 7.0),
        Marker::Octagon => polygon(half - join(135.0), 7, 45.0),
        Marker::Octagram => polygon(half - join(45.0), 7, 135.0),
        Marker::Enneagon => polygon(half - join(140.0), 8, 40.0),
        Marker::Enneagram => polygon(half - join(20.0), 8, 160.0),
    }
}

/// Point at distance `h` from the origin, `degrees` clockwise from up.
fn vertex(h: f64, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Point::new(h * sin, -h * cos)
}

fn plus(h: f64, rotation: f64) -> PathDesc {
    let mut path = BezPath::new();
    for angle in [0.0, 90.0] {
        path.move_to(vertex(h, angle + rotation));
        path.line_to(vertex(h, angle + rotation + 180.0));
    }
    PathDesc::from(&path)
}

fn triangle(h: f64, rotation: f64) -> PathDesc {
    PathDesc::polyline([0.0, 120.0, 240.0].map(|a| vertex(h, a + rotation)), true)
}

/// A closed polygon through `steps + 1` vertices, turning by `step_angle`
/// degrees from one vertex to the next. Step angles above `360 / n` give
/// star polygons.
fn polygon(h: f64, steps: u8, step_angle: f64) -> PathDesc {
    PathDesc::polyline(
        (0..=steps).map(|i| vertex(h, step_angle * f64::from(i))),
        true,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{end_points, fill_color, is_fill, is_stroke};
    use core::f64::consts::SQRT_2;
    use kurbo::Shape;
    use vista_color::Color;
    use vista_imaging_ref::RefBackend;
    use vista_style::LineJoin;

    fn bounds(style: &MarkerStyle) -> kurbo::Rect {
        marker_path(style).to_bez_path().bounding_box()
    }

    #[test]
    fn every_marker_fits_its_box() {
        for marker in Marker::ALL {
            for filled in [false, true] {
                let style = MarkerStyle::new(marker, 20.0, 2.0, Color::RED).with_fill(filled);
                let b = bounds(&style);
                assert!(b.width() <= 20.0 + 1e-6 && b.height() <= 20.0 + 1e-6, "{marker:?} fits");
                assert!(b.area() > 0.0, "{marker:?} is not empty");
            }
        }
    }

    #[test]
    fn unfilled_circles_keep_their_contour_inside() {
        let style = MarkerStyle::new(Marker::Circle, 20.0, 4.0, Color::RED);
        let b = bounds(&style);
        assert!((b.width() - 16.0).abs() < 1e-6);
        let filled = style.clone().with_fill(true);
        assert!((bounds(&filled).width() - 20.0).abs() < 1e-6);
    }

    #[test]
    fn rotated_squares_stand_on_a_corner() {
        let style = MarkerStyle::new(Marker::RotatedSquare, 20.0, 2.0, Color::RED)
            .with_fill(true);
        let corners = end_points(&marker_path(&style));
        assert_eq!(corners.len(), 4);
        assert!(corners[0].distance(Point::new(0.0, -10.0)) < 1e-9);
        let side = corners[0].distance(corners[1]);
        assert!((side - 20.0 / SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn star_polygons_revisit_the_first_vertex() {
        let style = MarkerStyle::new(Marker::Pentagram, 20.0, 2.0, Color::RED)
            .with_fill(true);
        let points = end_points(&marker_path(&style));
        assert_eq!(points.len(), 5);
        assert!(points[1].distance(vertex(10.0, 144.0)) < 1e-9);
        assert!(vertex(10.0, 720.0).distance(points[0]) < 1e-9);
    }

    #[test]
    fn background_then_marker() {
        let mut backend = RefBackend::default();
        let mut style = MarkerStyle::new(Marker::Plus, 10.0, 2.0, Color::BLUE);
        style.background_color = ColorChoice::Solid(Color::WHITE);
        draw_marker(&mut backend, Point::new(4.0, 6.0), &style).unwrap();

        let draws: Vec<_> = backend.draws().collect();
        assert_eq!(draws.len(), 2);
        assert!(is_fill(&draws[0]) && is_stroke(&draws[1]));
        assert_eq!(draws[0].state.transform, Affine::translate((4.5, 6.5)));
        assert!(backend.is_balanced());
    }

    #[test]
    fn markers_take_their_own_colors() {
        let mut backend = RefBackend::default();
        let style = MarkerStyle::new(Marker::Square, 8.0, 1.0, Color::BLUE)
            .with_fill(true);
        let markers = [
            (Point::new(1.0, 1.0), ColorChoice::Solid(Color::RED)),
            (Point::new(5.0, 5.0), ColorChoice::None),
        ];
        draw_markers(&mut backend, &markers, &style).unwrap();
        let colors: Vec<_> = backend.draws().filter_map(|d| fill_color(&d)).collect();
        assert_eq!(colors, [Color::RED.to_peniko(), Color::BLUE.to_peniko()]);
    }

    #[test]
    fn miter_joins_shrink_sharp_triangles() {
        let mut miter = MarkerStyle::new(Marker::TriangleUp, 20.0, 2.0, Color::RED);
        miter.join = LineJoin::Miter;
        let mut round = miter.clone();
        round.join = LineJoin::Round;
        assert!(bounds(&miter).height() < bounds(&round).height());
    }

    #[test]
    fn invalid_markers_are_rejected() {
        let mut backend = RefBackend::default();
        let style = MarkerStyle::new(Marker::Plus, 10.0, 0.0, Color::RED).with_fill(true);
        assert!(draw_marker(&mut backend, Point::ZERO, &style).is_err());
    }
}
