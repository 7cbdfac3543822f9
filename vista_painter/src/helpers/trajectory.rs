// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Point;
use log::warn;
use peniko::Gradient;
use vista_color::{Color, ColorChoice, fade_out_linear};
use vista_imaging::{ImagingBackend, ImagingBackendExt, PaintDesc, PathDesc};
use vista_style::LineStyle;

use super::stroke;
use crate::Result;

/// How a trajectory fades out towards its oldest positions.
#[derive(Clone, Debug)]
pub struct TrajectoryStyle {
    /// Color of the oldest position. `Same` refers to the line color with
    /// another alpha; `None` (or the line color itself) disables fading.
    pub fade_out: ColorChoice,
    /// `true` if the first point is the oldest one.
    pub oldest_first: bool,
    /// Width of the centered moving average; `0` and `1` keep the points.
    pub smoothing_window: usize,
    /// Proportion of the fade-out color as a function of the relative
    /// distance from the newest position, see
    /// [`fade_out_linear`](vista_color::fade_out_linear) and friends.
    pub mix_factor: fn(f64) -> f64,
}

impl Default for TrajectoryStyle {
    fn default() -> Self {
        Self {
            fade_out: ColorChoice::same(0.4),
            oldest_first: false,
            smoothing_window: 0,
            mix_factor: fade_out_linear,
        }
    }
}

/// Draw a polyline that fades from the line color at the newest position to
/// the fade-out color at the oldest one.
///
/// Fading trajectories are stroked segment by segment, each with a linear
/// gradient between the colors at its ends; the color depends on the
/// distance along the (smoothed) polyline. Returns `Ok(false)` for invalid
/// line styles and trajectories with fewer than two points.
pub fn draw_trajectory<B: ImagingBackend>(
    backend: &mut B,
    points: &[Point],
    line: &LineStyle,
    style: &TrajectoryStyle,
) -> Result<bool> {
    if !line.is_valid() {
        warn!("skipping trajectory with invalid line style {line}");
        return Ok(false);
    }
    if points.len() < 2 {
        warn!("skipping trajectory with {} points", points.len());
        return Ok(false);
    }
    let points = smooth(points, style.smoothing_window);
    let fade = style
        .fade_out
        .resolve(line.color)
        .filter(|fade| *fade != line.color);
    let lengths = cumulative_lengths(&points);
    let total = lengths.last().copied().unwrap_or(0.0);

    let Some(fade) = fade.filter(|_| total > 0.0) else {
        stroke(backend, PathDesc::polyline(points, false), line);
        return Ok(true);
    };
    let color_at = |distance: f64| {
        let progress = distance / total;
        let from_newest = if style.oldest_first {
            1.0 - progress
        } else {
            progress
        };
        line.color.mix(&fade, (style.mix_factor)(from_newest))
    };

    let segment_stroke = line.to_stroke();
    let mut previous = color_at(0.0);
    for (segment, distance) in points.windows(2).zip(&lengths[1..]) {
        let color = color_at(*distance);
        if segment[0] != segment[1] {
            backend.stroke_path_with(
                PathDesc::polyline([segment[0], segment[1]], false),
                &segment_stroke,
                segment_paint(segment[0], segment[1], previous, color),
            );
        }
        previous = color;
    }
    Ok(true)
}

/// Draw several trajectories with the same styles and individual colors.
/// `Same` and `None` keep the line color.
///
/// Returns `Ok(true)` if every trajectory was drawn.
pub fn draw_trajectories<B: ImagingBackend>(
    backend: &mut B,
    trajectories: &[(Vec<Point>, ColorChoice)],
    line: &LineStyle,
    style: &TrajectoryStyle,
) -> Result<bool> {
    let mut all_drawn = true;
    for (points, color) in trajectories {
        let line = line
            .clone()
            .with_color(color.resolve(line.color).unwrap_or(line.color));
        all_drawn &= draw_trajectory(backend, points, &line, style)?;
    }
    Ok(all_drawn)
}

fn segment_paint(from: Point, to: Point, start: Color, end: Color) -> PaintDesc {
    let stops = [(0.0_f32, start.to_peniko()), (1.0_f32, end.to_peniko())];
    Gradient::new_linear(from, to)
        .with_stops(stops.as_slice())
        .into()
}

/// Distance along the polyline up to each point; the first entry is `0`.
fn cumulative_lengths(points: &[Point]) -> Vec<f64> {
    let mut total = 0.0;
    let mut lengths = Vec::with_capacity(points.len());
    lengths.push(0.0);
    for pair in points.windows(2) {
        total += pair[0].distance(pair[1]);
        lengths.push(total);
    }
    lengths
}

/// Centered moving average; the window shrinks towards both ends.
fn smooth(points: &[Point], window: usize) -> Vec<Point> {
    if window <= 1 {
        return points.to_vec();
    }
    let half = window / 2;
    (0..points.len())
        .map(|i| {
            let neighbors = &points[i.saturating_sub(half)..(i + half + 1).min(points.len())];
            let sum = neighbors
                .iter()
                .fold(kurbo::Vec2::ZERO, |sum, p| sum + p.to_vec2());
            #[allow(clippy::cast_precision_loss, reason = "window sizes are small")]
            let count = neighbors.len() as f64;
            (sum / count).to_point()
        })
        .collect()
}
