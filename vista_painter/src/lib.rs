// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=vista_painter --heading-base-level=0

//! Vista Painter: stylable 2D overlays on an in-memory canvas.
//!
//! A [`Painter`] owns an RGBA8 canvas and draws lines, arrows, shapes,
//! markers, text, images, bounding boxes, trajectories, camera axes and
//! horizons onto it. Every `draw_*` call is atomic: it either succeeds and
//! updates the canvas, or fails before touching it.
//!
//! The drawing helpers behind the painter are generic over
//! [`ImagingBackend`](vista_imaging::ImagingBackend), so they can be driven
//! against any backend (for example a recording one in tests).
//!
//! Composite features built on top:
//!
//! - [`collage`] arranges a jagged grid of images into one.
//! - [`LinearColorGradient`] and [`RadialColorGradient`] render through
//!   [`draw_color_gradient`] or [`Painter::draw_gradient`].
//! - [`optical_flow_legend`] renders the color wheel used by
//!   [`colorize_optical_flow`](vista_colormap::colorize_optical_flow).
//!
//! ```
//! use vista_color::Color;
//! use vista_painter::{Painter, Point};
//! use vista_raster::Raster;
//! use vista_style::LineStyle;
//!
//! let mut painter = Painter::new();
//! painter.set_canvas(64, 48, Color::WHITE)?;
//! painter.draw_line(Point::new(0.0, 10.0), Point::new(63.0, 10.0), &LineStyle::new(1.0, Color::RED))?;
//!
//! let canvas = painter.canvas()?;
//! assert_eq!(canvas.to_string(), "ImageBuffer(64x48x4, uint8, owned)");
//! assert_eq!(canvas.get::<u8>(32, 10, 1)?, 0, "the line replaced the white background");
//! # Ok::<(), vista_painter::Error>(())
//! ```

#![deny(unsafe_code)]

mod collage;
mod gradient;
mod helpers;
mod legend;
mod painter;
#[cfg(test)]
mod testing;

pub use collage::collage;
pub use gradient::{ColorGradient, LinearColorGradient, RadialColorGradient, draw_color_gradient};
pub use helpers::{
    AxesProjection, CameraPose, ImagePlacement, TextBox, TrajectoryStyle, draw_arc, draw_arrow,
    draw_bounding_box_2d, draw_circle, draw_ellipse, draw_grid, draw_horizon_line, draw_image,
    draw_line, draw_marker, draw_markers, draw_polygon, draw_rect, draw_text, draw_text_box,
    draw_trajectories, draw_trajectory, draw_xyz_axes, rect_path,
};
pub use legend::optical_flow_legend;
pub use painter::{Painter, PainterDefaults};

pub use kurbo::{Point, Vec2};

use thiserror::Error;

/// Errors of drawing and composition.
#[derive(Debug, Error)]
pub enum Error {
    /// A draw call or canvas query before a canvas was set.
    #[error("the painter has no canvas, call `set_canvas` first")]
    CanvasNotSet,
    /// A caller-correctable argument problem.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A buffer operation failed.
    #[error(transparent)]
    Raster(#[from] vista_raster::Error),
    /// Colorization failed.
    #[error(transparent)]
    Colormap(#[from] vista_colormap::Error),
    /// Loading a font failed.
    #[error(transparent)]
    Text(#[from] vista_text::Error),
}

/// Result type of this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
