// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Optical flow: color wheel visualization and the Middlebury `.flo` format.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use vista_raster::{Element, ElementType, ImageBuffer, Raster, RasterMut};

use crate::{ColorMap, Error, Result};

/// Magic number at the start of a `.flo` file, the bytes `PIEH`.
pub const FLO_MAGIC: f32 = 202_021.25;

const HEADER_LEN: usize = 12;

/// Map a 2-channel flow field to colors of a cyclic `colormap`.
///
/// The hue encodes the direction of motion. Motion shorter than
/// `motion_normalizer` is blended towards white, so zero motion is white;
/// longer motion is dimmed to flag it as out of range.
pub fn colorize_optical_flow(
    flow: &impl Raster,
    colormap: ColorMap,
    motion_normalizer: f64,
    output_channels: usize,
) -> Result<ImageBuffer> {
    if flow.channels() != 2 || !flow.element_type().is_float() {
        return Err(Error::InvalidArgument(format!(
            "optical flow must be a 2-channel float buffer, got {}",
            flow.view()
        )));
    }
    if !matches!(output_channels, 3 | 4) {
        return Err(Error::InvalidArgument(format!(
            "output channels must be 3 or 4, got {output_channels}"
        )));
    }
    if !(motion_normalizer.is_finite() && motion_normalizer > 0.0) {
        return Err(Error::InvalidArgument(format!(
            "motion normalizer must be positive, got {motion_normalizer}"
        )));
    }

    let mut dst = ImageBuffer::new(flow.width(), flow.height(), output_channels, ElementType::U8);
    for y in 0..flow.height() {
        for x in 0..flow.width() {
            let u = flow.value_f64(x, y, 0)?;
            let v = flow.value_f64(x, y, 1)?;
            let rgb = wheel_color(colormap.table(), u, v, motion_normalizer);
            for (c, component) in rgb.into_iter().enumerate() {
                dst.set(x, y, c, component)?;
            }
            if output_channels == 4 {
                dst.set(x, y, 3, u8::MAX)?;
            }
        }
    }
    Ok(dst)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    reason = "the wheel index is non-negative and below the table length"
)]
fn wheel_color(table: &[[u8; 3]], u: f64, v: f64, normalizer: f64) -> [u8; 3] {
    let entries = table.len();
    let radius = u.hypot(v) / normalizer;
    let angle = (-v).atan2(-u) / core::f64::consts::PI;
    let fk = (angle + 1.0) / 2.0 * (entries - 1) as f64;
    let k0 = (fk as usize).min(entries - 1);
    let k1 = (k0 + 1) % entries;
    let f = fk - k0 as f64;
    [0, 1, 2].map(|c| {
        let color = (1.0 - f) * f64::from(table[k0][c]) + f * f64::from(table[k1][c]);
        let color = if radius <= 1.0 {
            255.0 - radius * (255.0 - color)
        } else {
            color * 0.75
        };
        u8::from_f64(color)
    })
}

/// Read a `.flo` file into a 2-channel `f32` buffer.
pub fn load_optical_flow(path: impl AsRef<Path>) -> Result<ImageBuffer> {
    let path = path.as_ref();
    let invalid = |reason: String| Error::InvalidFlowFile {
        path: path.to_path_buf(),
        reason,
    };
    let bytes = fs::read(path)?;
    let header = bytes
        .get(..HEADER_LEN)
        .ok_or_else(|| invalid(format!("header needs {HEADER_LEN} bytes, file has {}", bytes.len())))?;
    let word = |i: usize| [header[i], header[i + 1], header[i + 2], header[i + 3]];

    let magic = f32::from_le_bytes(word(0));
    if magic != FLO_MAGIC {
        return Err(invalid(format!("wrong magic number {magic}")));
    }
    let width = i32::from_le_bytes(word(4));
    let height = i32::from_le_bytes(word(8));
    let (Ok(width), Ok(height)) = (usize::try_from(width), usize::try_from(height)) else {
        return Err(invalid(format!("invalid size {width}x{height}")));
    };

    let Some((values, needed)) = width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(2))
        .and_then(|values| values.checked_mul(4).map(|bytes| (values, bytes)))
    else {
        return Err(invalid(format!("size {width}x{height} is too large")));
    };
    let payload = &bytes[HEADER_LEN..];
    if payload.len() < needed {
        return Err(invalid(format!(
            "{width}x{height} flow needs {needed} bytes of data, file has {}",
            payload.len()
        )));
    }
    let flow: Vec<f32> = payload
        .chunks_exact(4)
        .take(values)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();
    log::debug!("loaded {width}x{height} optical flow from {}", path.display());
    Ok(ImageBuffer::from_vec(width, height, 2, flow)?)
}

/// Write a 2-channel flow field as a `.flo` file.
///
/// `f64` data is narrowed to `f32`. Views with arbitrary strides are
/// written row by row.
pub fn save_optical_flow(path: impl AsRef<Path>, flow: &impl Raster) -> Result<()> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(Error::InvalidArgument(
            "cannot save optical flow to an empty path".into(),
        ));
    }
    if flow.channels() != 2 || !flow.element_type().is_float() {
        return Err(Error::InvalidArgument(format!(
            "optical flow must be a 2-channel float buffer, got {}",
            flow.view()
        )));
    }
    let (Ok(width), Ok(height)) = (i32::try_from(flow.width()), i32::try_from(flow.height()))
    else {
        return Err(Error::InvalidArgument(format!(
            "{} is too large for the .flo format",
            flow.view()
        )));
    };

    let mut out = BufWriter::new(fs::File::create(path)?);
    out.write_all(&FLO_MAGIC.to_le_bytes())?;
    out.write_all(&width.to_le_bytes())?;
    out.write_all(&height.to_le_bytes())?;
    for y in 0..flow.height() {
        for x in 0..flow.width() {
            for c in 0..2 {
                let value = match flow.element_type() {
                    ElementType::F32 => flow.get::<f32>(x, y, c)?,
                    _ => f32::from_f64(flow.value_f64(x, y, c)?),
                };
                out.write_all(&value.to_le_bytes())?;
            }
        }
    }
    out.flush()?;
    log::debug!("saved {} to {}", flow.view(), path.display());
    Ok(())
}
