// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};
use log::{debug, warn};
use vista_color::Color;
use vista_geometry::{Anchor, Vec2i};
use vista_raster::{ImageBuffer, ImageView, Raster};

use crate::{Error, ImagePlacement, Painter, Result};

/// Arrange a jagged grid of images into a single image.
///
/// Each row of `rows` is one row of the collage; `None` leaves a cell
/// empty. Rows are as tall as their tallest image and columns as wide as
/// their widest one. Rows and columns without any image take no space, not
/// even for `spacing`.
///
/// A positive `image_size` component fixes the width or height of every
/// image. If only one of them is fixed, the other follows the aspect ratio
/// of each image.
///
/// Images are placed within their cell according to `cell_alignment` and
/// clipped as for [`ImagePlacement::clip_factor`]. The result has
/// `output_channels` (3 or 4) 8-bit channels; a collage without any pixel
/// is the invalid (default) image.
pub fn collage(
    rows: &[Vec<Option<ImageView<'_>>>],
    image_size: Vec2i,
    cell_alignment: Anchor,
    fill: Color,
    output_channels: usize,
    spacing: Vec2i,
    margin: Vec2i,
    clip_factor: f64,
) -> Result<ImageBuffer> {
    if !matches!(output_channels, 3 | 4) {
        return Err(Error::InvalidArgument(format!(
            "a collage has 3 or 4 channels, not {output_channels}"
        )));
    }
    if spacing.x < 0 || spacing.y < 0 || margin.x < 0 || margin.y < 0 {
        return Err(Error::InvalidArgument(format!(
            "collage spacing {spacing} and margin {margin} must not be negative"
        )));
    }

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut row_heights = vec![0.0_f64; rows.len()];
    let mut column_widths = vec![0.0_f64; columns];
    let cells: Vec<Vec<Option<Cell<'_, '_>>>> = rows
        .iter()
        .enumerate()
        .map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(|(c, image)| {
                    let cell = Cell::new(image.as_ref()?, image_size)?;
                    row_heights[r] = row_heights[r].max(cell.size.y);
                    column_widths[c] = column_widths[c].max(cell.size.x);
                    Some(cell)
                })
                .collect()
        })
        .collect();

    let (tops, height) = offsets(&row_heights, f64::from(spacing.y), f64::from(margin.y));
    let (lefts, width) = offsets(&column_widths, f64::from(spacing.x), f64::from(margin.x));
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "extents are rounded and non-negative"
    )]
    let (width, height) = (width.round().max(0.0) as usize, height.round().max(0.0) as usize);
    if width == 0 || height == 0 {
        warn!("collage of {} row(s) would be {width}x{height}, returning an empty image", rows.len());
        return Ok(ImageBuffer::default());
    }

    let mut painter = Painter::new();
    painter.set_canvas(width, height, fill)?;
    let (h_factor, v_factor) = (
        cell_alignment.horizontal().factor(),
        cell_alignment.vertical().factor(),
    );
    for (r, row) in cells.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let Some(cell) = cell else {
                continue;
            };
            let position = Point::new(
                lefts[c] + h_factor * column_widths[c],
                tops[r] + v_factor * row_heights[r],
            );
            let placement = ImagePlacement {
                position,
                anchor: cell_alignment,
                scale_x: cell.scale.x,
                scale_y: cell.scale.y,
                clip_factor,
                ..ImagePlacement::default()
            };
            painter.draw_image(cell.image, &placement)?;
        }
    }
    debug!("collage of {} row(s) and {columns} column(s) is {width}x{height}", rows.len());

    let canvas = painter.canvas()?;
    if output_channels == 4 {
        Ok(canvas)
    } else {
        Ok(canvas.to_channels(output_channels)?)
    }
}

/// An image with its scale and scaled size.
struct Cell<'v, 'a> {
    image: &'v ImageView<'a>,
    scale: Vec2,
    size: Vec2,
}

impl<'v, 'a> Cell<'v, 'a> {
    fn new(image: &'v ImageView<'a>, image_size: Vec2i) -> Option<Self> {
        if !image.is_valid() {
            warn!("skipping invalid collage image {image}");
            return None;
        }
        #[allow(clippy::cast_precision_loss, reason = "image sizes are far below 2^52")]
        let original = Vec2::new(image.width() as f64, image.height() as f64);
        let fixed = Vec2::new(f64::from(image_size.x), f64::from(image_size.y));
        let scale = match (fixed.x > 0.0, fixed.y > 0.0) {
            (true, true) => Vec2::new(fixed.x / original.x, fixed.y / original.y),
            (true, false) => Vec2::new(fixed.x / original.x, fixed.x / original.x),
            (false, true) => Vec2::new(fixed.y / original.y, fixed.y / original.y),
            (false, false) => Vec2::new(1.0, 1.0),
        };
        Some(Self {
            image,
            scale,
            size: Vec2::new(original.x * scale.x, original.y * scale.y),
        })
    }
}

/// Start of each row (or column) and the total extent including margins.
/// Empty rows neither take space nor add spacing.
fn offsets(extents: &[f64], spacing: f64, margin: f64) -> (Vec<f64>, f64) {
    let mut cursor = margin;
    let mut any = false;
    let starts = extents
        .iter()
        .map(|extent| {
            let start = cursor;
            if *extent > 0.0 {
                cursor += extent + spacing;
                any = true;
            }
            start
        })
        .collect();
    let total = if any { cursor - spacing + margin } else { 0.0 };
    (starts, total)
}
