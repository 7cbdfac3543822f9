// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Point;
use vista_color::Color;
use vista_colormap::{ColorMap, colorize_optical_flow};
use vista_geometry::Anchor;
use vista_raster::{ImageBuffer, Raster};
use vista_style::LineStyle;

use crate::{Error, ImagePlacement, Painter, Result};

/// Render the color wheel of [`colorize_optical_flow`] as a `size` x `size`
/// legend.
///
/// The legend covers motion vectors from `(-1, -1)` at the top-left corner
/// to `(1, 1)` at the bottom-right one, so the unit circle touches the
/// image borders. With a valid `grid` style, a crosshair (and, if
/// `draw_circle` is set, the unit circle) is drawn on top. With
/// `clip_circle` and 4 output channels, everything outside the unit circle
/// is transparent.
#[allow(clippy::cast_precision_loss, reason = "legend sizes are small")]
pub fn optical_flow_legend(
    size: usize,
    colormap: ColorMap,
    grid: Option<&LineStyle>,
    draw_circle: bool,
    clip_circle: bool,
    output_channels: usize,
) -> Result<ImageBuffer> {
    if !matches!(output_channels, 3 | 4) {
        return Err(Error::InvalidArgument(format!(
            "an optical flow legend has 3 or 4 channels, not {output_channels}"
        )));
    }
    if size < 2 {
        return Err(Error::InvalidArgument(format!(
            "an optical flow legend must be at least 2 pixels wide, got {size}"
        )));
    }

    let step = 2.0 / (size - 1) as f32;
    let mut flow = Vec::with_capacity(size * size * 2);
    for row in 0..size {
        for col in 0..size {
            flow.extend([col as f32 * step - 1.0, row as f32 * step - 1.0]);
        }
    }
    let flow = ImageBuffer::from_vec(size, size, 2, flow)?;
    let mut legend = colorize_optical_flow(&flow, colormap, 1.0, output_channels)?;

    let extent = size as f64;
    let half = extent / 2.0;
    if let Some(line) = grid.filter(|line| line.is_valid()) {
        let mut painter = Painter::new();
        painter.set_canvas_from_image(&legend)?;
        if draw_circle {
            painter.draw_circle(Point::new(half, half), half - line.width / 2.0, Some(line), None)?;
        }
        let inset = if draw_circle { line.width } else { 0.0 };
        painter.draw_line(Point::new(half, inset), Point::new(half, extent - inset), line)?;
        painter.draw_line(Point::new(inset, half), Point::new(extent - inset, half), line)?;
        legend = painter.canvas()?;
    }

    if clip_circle && output_channels == 4 {
        let mut painter = Painter::new();
        painter.set_canvas(size, size, Color::WHITE.with_alpha(0.0))?;
        let placement = ImagePlacement {
            clip_factor: 1.0,
            ..ImagePlacement::at(Point::new(half, half)).with_anchor(Anchor::Center)
        };
        painter.draw_image(&legend, &placement)?;
        return painter.canvas();
    }
    if legend.channels() == output_channels {
        Ok(legend)
    } else {
        Ok(legend.to_channels(output_channels)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(image: &ImageBuffer, x: usize, y: usize) -> Vec<u8> {
        (0..image.channels())
            .map(|c| image.get::<u8>(x, y, c).unwrap())
            .collect()
    }

    #[test]
    fn the_center_is_white() {
        let legend = optical_flow_legend(5, ColorMap::Orientation, None, false, false, 3).unwrap();
        assert_eq!(legend.to_string(), "ImageBuffer(5x5x3, uint8, owned)");
        assert_eq!(pixel(&legend, 2, 2), [255, 255, 255]);
        assert_ne!(pixel(&legend, 0, 2), pixel(&legend, 4, 2), "opposite directions differ");
    }

    #[test]
    fn the_crosshair_is_drawn_on_top() {
        let plain = optical_flow_legend(20, ColorMap::Orientation, None, false, false, 3).unwrap();
        let line = LineStyle::new(1.0, Color::BLACK);
        let grid = optical_flow_legend(20, ColorMap::Orientation, Some(&line), false, false, 3).unwrap();
        assert_ne!(pixel(&plain, 10, 3), [0, 0, 0]);
        assert!(pixel(&grid, 10, 3).iter().all(|v| *v < 10), "vertical line");
        assert!(pixel(&grid, 3, 10).iter().all(|v| *v < 10), "horizontal line");
        assert_eq!(pixel(&grid, 3, 3), pixel(&plain, 3, 3));
    }

    #[test]
    fn clipping_needs_an_alpha_channel() {
        let clipped = optical_flow_legend(21, ColorMap::Orientation, None, false, true, 4).unwrap();
        assert_eq!(clipped.get::<u8>(0, 0, 3).unwrap(), 0, "corners are transparent");
        assert_eq!(clipped.get::<u8>(10, 10, 3).unwrap(), 255);

        let opaque = optical_flow_legend(21, ColorMap::Orientation, None, false, true, 3).unwrap();
        assert_eq!(opaque.channels(), 3);
    }

    #[test]
    fn invalid_legends() {
        assert!(optical_flow_legend(1, ColorMap::Orientation, None, false, false, 3).is_err());
        assert!(optical_flow_legend(10, ColorMap::Orientation, None, false, false, 2).is_err());
    }
}
