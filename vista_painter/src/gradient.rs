// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Point;
use log::warn;
use peniko::Gradient;
use vista_color::Color;
use vista_raster::{ElementType, ImageBuffer, Raster};

use crate::{Error, Painter, Result};

/// A color gradient defined by offset/color stops along some geometry.
///
/// Stops may be added in any order; they are sorted by offset when the
/// gradient is lowered with [`to_gradient`](Self::to_gradient).
pub trait ColorGradient {
    /// The stops added so far, in insertion order.
    fn stops(&self) -> &[(f64, Color)];

    /// Mutable access for the provided stop methods.
    fn stops_mut(&mut self) -> &mut Vec<(f64, Color)>;

    /// The gradient geometry without stops.
    fn geometry(&self) -> Gradient;

    /// Add a stop. Offsets outside `[0, 1]` are rejected with a warning and
    /// `false`.
    fn add_color_stop(&mut self, offset: f64, color: Color) -> bool {
        if !(0.0..=1.0).contains(&offset) {
            warn!("ignoring color stop at offset {offset}, offsets must be in [0, 1]");
            return false;
        }
        self.stops_mut().push((offset, color));
        true
    }

    /// Add a gray stop, mostly useful for masks.
    fn add_intensity_stop(&mut self, offset: f64, intensity: f64, alpha: f64) -> bool {
        self.add_color_stop(offset, Color::new(intensity, intensity, intensity, alpha))
    }

    /// A gradient needs at least two stops.
    fn is_valid(&self) -> bool {
        self.stops().len() >= 2
    }

    /// Lower to a `peniko` gradient.
    fn to_gradient(&self) -> Gradient {
        let mut stops: Vec<_> = self
            .stops()
            .iter()
            .map(|(offset, color)| {
                #[allow(clippy::cast_possible_truncation, reason = "stop offsets are in [0, 1]")]
                let offset = *offset as f32;
                (offset, color.to_peniko())
            })
            .collect();
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        self.geometry().with_stops(stops.as_slice())
    }
}

/// A gradient along the line from `start` to `end`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearColorGradient {
    /// Where offset 0 is.
    pub start: Point,
    /// Where offset 1 is.
    pub end: Point,
    stops: Vec<(f64, Color)>,
}

impl LinearColorGradient {
    /// A gradient without stops.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            stops: Vec::new(),
        }
    }
}

impl ColorGradient for LinearColorGradient {
    fn stops(&self) -> &[(f64, Color)] {
        &self.stops
    }

    fn stops_mut(&mut self) -> &mut Vec<(f64, Color)> {
        &mut self.stops
    }

    fn geometry(&self) -> Gradient {
        Gradient::new_linear(self.start, self.end)
    }
}

/// A gradient between two circles.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialColorGradient {
    /// Center of the start circle.
    pub center0: Point,
    /// Radius of the start circle.
    pub radius0: f64,
    /// Center of the end circle.
    pub center1: Point,
    /// Radius of the end circle.
    pub radius1: f64,
    stops: Vec<(f64, Color)>,
}

impl RadialColorGradient {
    /// A gradient without stops.
    pub fn new(center0: Point, radius0: f64, center1: Point, radius1: f64) -> Self {
        Self {
            center0,
            radius0,
            center1,
            radius1,
            stops: Vec::new(),
        }
    }
}

impl ColorGradient for RadialColorGradient {
    fn stops(&self) -> &[(f64, Color)] {
        &self.stops
    }

    fn stops_mut(&mut self) -> &mut Vec<(f64, Color)> {
        &mut self.stops
    }

    #[allow(clippy::cast_possible_truncation, reason = "radii only need f32 precision")]
    fn geometry(&self) -> Gradient {
        Gradient::new_two_point_radial(
            self.center0,
            self.radius0 as f32,
            self.center1,
            self.radius1 as f32,
        )
    }
}

/// Render `gradient` over a `width` x `height` canvas.
///
/// With 1 channel, the result is an `f64` mask holding the red channel
/// scaled to `[0, 1]`; with 3 or 4 channels an 8-bit color image.
pub fn draw_color_gradient(
    gradient: &impl ColorGradient,
    width: usize,
    height: usize,
    channels: usize,
    background: Color,
) -> Result<ImageBuffer> {
    if !matches!(channels, 1 | 3 | 4) {
        return Err(Error::InvalidArgument(format!(
            "a color gradient can be drawn with 1, 3 or 4 channels, not {channels}"
        )));
    }
    let mut painter = Painter::new();
    painter.set_canvas(width, height, background)?;
    painter.draw_gradient(gradient)?;
    let canvas = painter.canvas_view()?;
    let image = match channels {
        1 => canvas.channel(0)?.as_type(ElementType::F64, 1.0 / 255.0)?,
        _ => canvas.to_channels(channels)?,
    };
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black_to_white() -> LinearColorGradient {
        let mut gradient = LinearColorGradient::new(Point::ZERO, Point::new(10.0, 0.0));
        assert!(gradient.add_intensity_stop(1.0, 1.0, 1.0));
        assert!(gradient.add_intensity_stop(0.0, 0.0, 1.0));
        gradient
    }

    #[test]
    fn stops_outside_the_unit_interval_are_rejected() {
        let mut gradient = LinearColorGradient::new(Point::ZERO, Point::new(1.0, 0.0));
        assert!(!gradient.add_color_stop(-0.1, Color::RED));
        assert!(!gradient.add_color_stop(1.5, Color::RED));
        assert!(gradient.add_color_stop(0.5, Color::RED));
        assert!(!gradient.is_valid(), "a single stop is not a gradient");
        assert!(gradient.add_color_stop(1.0, Color::BLUE));
        assert!(gradient.is_valid());
    }

    #[test]
    fn lowered_stops_are_sorted() {
        let gradient = black_to_white().to_gradient();
        let offsets: Vec<f32> = gradient.stops.iter().map(|stop| stop.offset).collect();
        assert_eq!(offsets, [0.0, 1.0]);
        assert_eq!(gradient.stops[0].color.to_alpha_color(), peniko::Color::BLACK);
    }

    #[test]
    fn color_gradients_run_from_start_to_end() {
        let image = draw_color_gradient(&black_to_white(), 11, 2, 3, Color::RED).unwrap();
        assert_eq!(image.to_string(), "ImageBuffer(11x2x3, uint8, owned)");
        let left = image.get::<u8>(0, 0, 1).unwrap();
        let right = image.get::<u8>(10, 1, 1).unwrap();
        assert!(left < 40, "left end is dark, got {left}");
        assert!(right > 230, "right end is bright, got {right}");
    }

    #[test]
    fn masks_are_normalized() {
        let mask = draw_color_gradient(&black_to_white(), 11, 1, 1, Color::BLACK).unwrap();
        assert_eq!(mask.element_type(), ElementType::F64);
        let values: Vec<f64> = mask.to_vec().unwrap();
        assert!(values.windows(2).all(|pair| pair[0] <= pair[1]), "{values:?}");
        assert!(values.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn invalid_gradients_keep_the_background() {
        let single = LinearColorGradient::new(Point::ZERO, Point::new(4.0, 0.0));
        let image = draw_color_gradient(&single, 4, 4, 4, Color::RED).unwrap();
        assert_eq!(image.get::<u8>(2, 2, 0).unwrap(), 255);
        assert_eq!(image.get::<u8>(2, 2, 1).unwrap(), 0);
        assert!(draw_color_gradient(&black_to_white(), 4, 4, 2, Color::RED).is_err());
    }
}
