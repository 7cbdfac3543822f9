// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend-generic drawing routines.
//!
//! Every helper validates its input first, then issues a balanced sequence
//! of imaging ops: transforms are restored and layers popped before it
//! returns, and temporary resources are destroyed. Input coordinates of
//! lines and shapes are shifted by half a pixel, so that a 1 px line drawn
//! at integer coordinates covers exactly one row or column of pixels.
//!
//! Areas are filled before their contour is stroked.

mod arrow;
mod axes;
mod bbox;
mod image;
mod marker;
mod shapes;
mod text;
mod trajectory;

pub use arrow::draw_arrow;
pub use axes::{AxesProjection, CameraPose, draw_horizon_line, draw_xyz_axes};
pub use bbox::draw_bounding_box_2d;
pub use image::{ImagePlacement, draw_image};
pub use marker::{draw_marker, draw_markers};
pub use shapes::{
    draw_arc, draw_circle, draw_ellipse, draw_grid, draw_line, draw_polygon, draw_rect,
    rect_path,
};
pub use text::{TextBox, draw_text, draw_text_box};
pub use trajectory::{TrajectoryStyle, draw_trajectories, draw_trajectory};

use kurbo::Vec2;
use vista_color::Color;
use vista_imaging::{ImagingBackend, ImagingBackendExt, PaintDesc, PathDesc};
use vista_style::LineStyle;

use crate::{Error, Result};

/// Offset from integer pixel coordinates to the pixel center.
const HALF_PIXEL: Vec2 = Vec2::new(0.5, 0.5);

fn solid(color: Color) -> PaintDesc {
    PaintDesc::solid(color.to_peniko())
}

/// Fill `path` if there is a fill color, then stroke it if there is a
/// valid contour.
fn fill_and_stroke<B: ImagingBackend>(
    backend: &mut B,
    path: &PathDesc,
    fill: Option<Color>,
    contour: Option<&LineStyle>,
) {
    if let Some(color) = fill {
        backend.fill_path_with(path.clone(), solid(color));
    }
    if let Some(line) = contour.filter(|line| line.is_valid()) {
        backend.stroke_path_with(path.clone(), &line.to_stroke(), solid(line.color));
    }
}

fn stroke<B: ImagingBackend>(backend: &mut B, path: PathDesc, line: &LineStyle) {
    backend.stroke_path_with(path, &line.to_stroke(), solid(line.color));
}

fn check_line_style(line: &LineStyle, what: &str) -> Result<()> {
    if line.is_valid() {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "cannot draw {what} with invalid line style {line}"
        )))
    }
}

/// Shapes need something to draw: a valid contour, a fill, or both.
fn check_contour_or_fill(contour: Option<&LineStyle>, fill: Option<Color>, what: &str) -> Result<()> {
    if contour.is_some_and(LineStyle::is_valid) || fill.is_some() {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "cannot draw {what} without a valid contour or a fill color"
        )))
    }
}
