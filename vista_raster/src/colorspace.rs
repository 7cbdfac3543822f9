// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::RangeInclusive;

use crate::buffer::{ImageBuffer, ImageView, Raster, RasterMut};
use crate::convert::{ensure_valid, load, store, to_channels};
use crate::{Element, ElementType, Error, Result};

/// Luma weights of red, green and blue.
pub const LUMA_WEIGHTS: [f64; 3] = [0.2989, 0.5870, 0.1141];

/// Luminance of an RGB triple.
pub fn luminance(r: f64, g: f64, b: f64) -> f64 {
    LUMA_WEIGHTS[0] * r + LUMA_WEIGHTS[1] * g + LUMA_WEIGHTS[2] * b
}

/// Hue in degrees `[0, 360)`, saturation and value in `[0, 1]`, from
/// components in `[0, 1]`.
pub fn rgb_to_hsv_f64(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    if max.abs() < f64::EPSILON || delta.abs() < f64::EPSILON {
        return (0.0, 0.0, max);
    }
    let hue = if max == r {
        60.0 * ((g - b) / delta)
    } else if max == g {
        60.0 * ((b - r) / delta) + 120.0
    } else {
        60.0 * ((r - g) / delta) + 240.0
    };
    let hue = if hue < 0.0 { hue + 360.0 } else { hue };
    (hue, delta / max, max)
}

/// Components in `[0, 1]` from hue in degrees, saturation and value in `[0, 1]`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "hue sectors are small non-negative integers"
)]
pub fn hsv_to_rgb_f64(hue: f64, sat: f64, val: f64) -> (f64, f64, f64) {
    let sector = hue.max(0.0) / 60.0;
    let bin = (sector as u32) % 6;
    let rem = sector - sector.floor();
    let p = val * (1.0 - sat);
    let q = val * (1.0 - sat * rem);
    let t = val * (1.0 - sat * (1.0 - rem));
    match bin {
        0 => (val, t, p),
        1 => (q, val, p),
        2 => (p, val, t),
        3 => (p, q, val),
        4 => (t, p, val),
        _ => (val, p, q),
    }
}

fn rgb_channels(is_bgr: bool) -> [usize; 3] {
    if is_bgr { [2, 1, 0] } else { [0, 1, 2] }
}

fn ensure_color_u8(src: &ImageView<'_>, op: &'static str) -> Result<()> {
    ensure_valid(src, op)?;
    if src.element_type() != ElementType::U8 || !matches!(src.channels(), 3 | 4) {
        return Err(Error::InvalidArgument(format!(
            "`{op}` requires a 3- or 4-channel uint8 buffer, got {src}"
        )));
    }
    Ok(())
}

pub(crate) fn rgb_to_gray(src: &ImageView<'_>, channels: usize, is_bgr: bool) -> Result<ImageBuffer> {
    ensure_valid(src, "rgb_to_gray")?;
    if src.channels() == 1 {
        return to_channels(src, channels);
    }
    if !matches!(src.channels(), 3 | 4) || !(1..=4).contains(&channels) {
        return Err(Error::InvalidArgument(format!(
            "cannot convert {src} to a {channels}-channel grayscale buffer"
        )));
    }
    let [r, g, b] = rgb_channels(is_bgr);
    let ty = src.element_type();
    let mut dst = ImageBuffer::new(src.width(), src.height(), channels, ty);
    for y in 0..src.height() {
        for x in 0..src.width() {
            let luma = luminance(load(src, x, y, r), load(src, x, y, g), load(src, x, y, b));
            for c in 0..channels.min(3) {
                store(&mut dst, x, y, c, luma);
            }
            if channels == 4 {
                let alpha = if src.channels() == 4 {
                    load(src, x, y, 3)
                } else {
                    ty.opaque_alpha()
                };
                store(&mut dst, x, y, 3, alpha);
            }
        }
    }
    Ok(dst)
}

pub(crate) fn rgb_to_hsv(src: &ImageView<'_>, is_bgr: bool) -> Result<ImageBuffer> {
    ensure_color_u8(src, "rgb_to_hsv")?;
    let [r, g, b] = rgb_channels(is_bgr);
    let mut dst = ImageBuffer::new(src.width(), src.height(), 3, ElementType::U8);
    for y in 0..src.height() {
        for x in 0..src.width() {
            let (hue, sat, val) = rgb_to_hsv_f64(
                load(src, x, y, r) / 255.0,
                load(src, x, y, g) / 255.0,
                load(src, x, y, b) / 255.0,
            );
            // Hue is halved to fit into a byte.
            dst.set(x, y, 0, u8::from_f64(hue / 2.0))?;
            dst.set(x, y, 1, u8::from_f64(255.0 * sat))?;
            dst.set(x, y, 2, u8::from_f64(255.0 * val))?;
        }
    }
    Ok(dst)
}

pub(crate) fn hsv_to_rgb(src: &ImageView<'_>, channels: usize, to_bgr: bool) -> Result<ImageBuffer> {
    ensure_valid(src, "hsv_to_rgb")?;
    if src.element_type() != ElementType::U8 || src.channels() != 3 {
        return Err(Error::InvalidArgument(format!(
            "`hsv_to_rgb` requires a 3-channel uint8 buffer, got {src}"
        )));
    }
    if !matches!(channels, 3 | 4) {
        return Err(Error::InvalidArgument(format!(
            "`hsv_to_rgb` supports 3 or 4 output channels, not {channels}"
        )));
    }
    let [r, g, b] = rgb_channels(to_bgr);
    let mut dst = ImageBuffer::new(src.width(), src.height(), channels, ElementType::U8);
    for y in 0..src.height() {
        for x in 0..src.width() {
            let (red, green, blue) = hsv_to_rgb_f64(
                load(src, x, y, 0) * 2.0,
                load(src, x, y, 1) / 255.0,
                load(src, x, y, 2) / 255.0,
            );
            dst.set(x, y, r, u8::from_f64(255.0 * red))?;
            dst.set(x, y, g, u8::from_f64(255.0 * green))?;
            dst.set(x, y, b, u8::from_f64(255.0 * blue))?;
            if channels == 4 {
                dst.set(x, y, 3, u8::MAX)?;
            }
        }
    }
    Ok(dst)
}

/// Byte bounds of an HSV range as stored by [`Raster::rgb_to_hsv`].
fn hsv_bounds(range: &RangeInclusive<f64>, scale: f64) -> (u8, u8) {
    (
        u8::from_f64(range.start() * scale),
        u8::from_f64(range.end() * scale),
    )
}

pub(crate) fn mask_hsv_range(
    hsv: &ImageView<'_>,
    hue: &RangeInclusive<f64>,
    saturation: &RangeInclusive<f64>,
    value: &RangeInclusive<f64>,
) -> Result<ImageBuffer> {
    ensure_valid(hsv, "mask_hsv_range")?;
    if hsv.element_type() != ElementType::U8 || hsv.channels() != 3 {
        return Err(Error::InvalidArgument(format!(
            "`mask_hsv_range` requires a 3-channel uint8 HSV buffer, got {hsv}"
        )));
    }
    let (h_lo, h_hi) = hsv_bounds(hue, 0.5);
    let (s_lo, s_hi) = hsv_bounds(saturation, 255.0);
    let (v_lo, v_hi) = hsv_bounds(value, 255.0);
    let mut mask = ImageBuffer::new(hsv.width(), hsv.height(), 1, ElementType::U8);
    for y in 0..hsv.height() {
        for x in 0..hsv.width() {
            let h: u8 = hsv.get(x, y, 0)?;
            let s: u8 = hsv.get(x, y, 1)?;
            let v: u8 = hsv.get(x, y, 2)?;
            // A hue range with start > end wraps around red.
            let hue_ok = if h_lo <= h_hi {
                (h_lo..=h_hi).contains(&h)
            } else {
                h >= h_lo || h <= h_hi
            };
            if hue_ok && (s_lo..=s_hi).contains(&s) && (v_lo..=v_hi).contains(&v) {
                mask.set(x, y, 0, u8::MAX)?;
            }
        }
    }
    Ok(mask)
}

pub(crate) fn color_pop(
    src: &ImageView<'_>,
    hue: &RangeInclusive<f64>,
    saturation: &RangeInclusive<f64>,
    value: &RangeInclusive<f64>,
    is_bgr: bool,
) -> Result<ImageBuffer> {
    ensure_color_u8(src, "color_pop")?;
    let hsv = rgb_to_hsv(src, is_bgr)?;
    let mask = mask_hsv_range(&hsv.view(), hue, saturation, value)?;
    let gray = rgb_to_gray(src, 1, is_bgr)?;
    let mut pop = src.deep_copy();
    for y in 0..src.height() {
        for x in 0..src.width() {
            if mask.get::<u8>(x, y, 0)? == 0 {
                let luma: u8 = gray.get(x, y, 0)?;
                for c in 0..3 {
                    pop.set(x, y, c, luma)?;
                }
            }
        }
    }
    Ok(pop)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_conversion_respects_channel_order() {
        let rgb = ImageBuffer::from_vec(1, 1, 3, vec![255_u8, 0, 0]).unwrap();
        let gray = rgb.rgb_to_gray(1, false).unwrap();
        assert_eq!(gray.to_vec::<u8>().unwrap(), vec![76]);
        let gray = rgb.rgb_to_gray(1, true).unwrap();
        assert_eq!(gray.to_vec::<u8>().unwrap(), vec![29]);

        let rgba = ImageBuffer::from_vec(1, 1, 4, vec![10_u8, 10, 10, 77]).unwrap();
        let gray = rgba.rgb_to_gray(4, false).unwrap();
        assert_eq!(gray.to_vec::<u8>().unwrap(), vec![10, 10, 10, 77]);
        assert!(rgba.rgb_to_gray(5, false).is_err());
    }

    #[test]
    fn hsv_of_primaries() {
        assert_eq!(rgb_to_hsv_f64(1.0, 0.0, 0.0), (0.0, 1.0, 1.0));
        assert_eq!(rgb_to_hsv_f64(0.0, 1.0, 0.0), (120.0, 1.0, 1.0));
        assert_eq!(rgb_to_hsv_f64(0.0, 0.0, 1.0), (240.0, 1.0, 1.0));
        assert_eq!(rgb_to_hsv_f64(0.5, 0.5, 0.5), (0.0, 0.0, 0.5));
        assert_eq!(hsv_to_rgb_f64(120.0, 1.0, 1.0), (0.0, 1.0, 0.0));
        assert_eq!(hsv_to_rgb_f64(300.0, 1.0, 1.0), (1.0, 0.0, 1.0));
    }

    #[test]
    fn hsv_buffers_use_byte_ranges() {
        let rgb = ImageBuffer::from_vec(2, 1, 3, vec![0_u8, 0, 255, 255, 255, 255]).unwrap();
        let hsv = rgb.rgb_to_hsv(false).unwrap();
        assert_eq!(hsv.to_vec::<u8>().unwrap(), vec![120, 255, 255, 0, 0, 255]);

        let back = hsv.hsv_to_rgb(4, false).unwrap();
        assert_eq!(
            back.to_vec::<u8>().unwrap(),
            vec![0, 0, 255, 255, 255, 255, 255, 255]
        );
        assert!(rgb.hsv_to_rgb(2, false).is_err());
        assert!(ImageBuffer::new(1, 1, 3, ElementType::F32).rgb_to_hsv(false).is_err());
    }

    #[test]
    fn color_pop_keeps_selected_hues() {
        let rgb = ImageBuffer::from_vec(2, 1, 3, vec![255_u8, 0, 0, 0, 0, 255]).unwrap();
        let pop = rgb
            .color_pop(&(200.0..=280.0), &(0.5..=1.0), &(0.5..=1.0), false)
            .unwrap();
        assert_eq!(pop.to_vec::<u8>().unwrap(), vec![76, 76, 76, 0, 0, 255]);

        // Wrapping hue range around red.
        let hsv = rgb.rgb_to_hsv(false).unwrap();
        let mask = hsv
            .mask_hsv_range(&(340.0..=20.0), &(0.0..=1.0), &(0.0..=1.0))
            .unwrap();
        assert_eq!(mask.to_vec::<u8>().unwrap(), vec![255, 0]);
    }
}
