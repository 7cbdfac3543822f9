// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element type and channel conversions, blending and statistics.

use crate::buffer::{ImageBuffer, ImageView, Layout, Raster, RasterMut};
use crate::{ElementType, Error, Result};

/// Minimum and maximum of a buffer and where they were found first.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MinMaxLocation {
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
    /// `(x, y)` of the first occurrence of `min` in row-major order.
    pub min_loc: (usize, usize),
    /// `(x, y)` of the first occurrence of `max` in row-major order.
    pub max_loc: (usize, usize),
}

pub(crate) fn ensure_valid(src: &impl Raster, op: &'static str) -> Result<()> {
    if src.is_valid() {
        Ok(())
    } else {
        Err(Error::InvalidBuffer(op))
    }
}

/// Write `value` to `dst`, rounding to the nearest integer for integral types.
pub(crate) fn store(dst: &mut ImageBuffer, x: usize, y: usize, c: usize, value: f64) {
    let layout = dst.layout();
    let value = if layout.element_type.is_float() {
        value
    } else {
        value.round()
    };
    let offset = layout.offset(x, y, c);
    layout
        .element_type
        .write_f64(&mut dst.data_mut()[offset..], value);
}

/// Value at `(x, y, c)` of a buffer whose bounds were checked by the caller.
pub(crate) fn load(src: &impl Raster, x: usize, y: usize, c: usize) -> f64 {
    let layout = src.layout();
    layout
        .element_type
        .read_f64(&src.data()[layout.offset(x, y, c)..])
}

fn copy_value(src: &ImageView<'_>, x: usize, y: usize, sc: usize, dst: &mut ImageBuffer, dc: usize) {
    let size = src.element_type().size();
    let from = src.layout().offset(x, y, sc);
    let to = dst.layout().offset(x, y, dc);
    dst.data_mut()[to..to + size].copy_from_slice(&src.data()[from..from + size]);
}

pub(crate) fn to_channels(src: &ImageView<'_>, channels: usize) -> Result<ImageBuffer> {
    ensure_valid(src, "to_channels")?;
    let from = src.channels();
    if !matches!((from, channels), (1, 1 | 3 | 4) | (3 | 4, 3 | 4)) {
        return Err(Error::InvalidArgument(format!(
            "conversion from {from} to {channels} channels is not supported"
        )));
    }
    if from == channels {
        return Ok(src.deep_copy());
    }
    let ty = src.element_type();
    let mut dst = ImageBuffer::new(src.width(), src.height(), channels, ty);
    for y in 0..src.height() {
        for x in 0..src.width() {
            for c in 0..channels {
                if c == 3 && from < 4 {
                    store(&mut dst, x, y, c, ty.opaque_alpha());
                } else {
                    copy_value(src, x, y, if from == 1 { 0 } else { c }, &mut dst, c);
                }
            }
        }
    }
    Ok(dst)
}

pub(crate) fn to_u8(src: &ImageView<'_>, channels: usize) -> Result<ImageBuffer> {
    ensure_valid(src, "to_u8")?;
    if !matches!(channels, 1 | 3 | 4) {
        return Err(Error::InvalidArgument(format!(
            "`to_u8` supports 1, 3 or 4 output channels, not {channels}"
        )));
    }
    let from = src.channels();
    if src.element_type() == ElementType::U8 && matches!(from, 1 | 3 | 4) {
        return to_channels(src, channels);
    }
    if channels < from {
        return Err(Error::InvalidArgument(format!(
            "cannot reduce a {from}-channel {} buffer to {channels} channels",
            src.element_type()
        )));
    }
    log::trace!("converting {src} to {channels}-channel uint8");
    let scale = if src.element_type().is_float() {
        255.0
    } else {
        1.0
    };
    let mut dst = ImageBuffer::new(src.width(), src.height(), channels, ElementType::U8);
    for y in 0..src.height() {
        for x in 0..src.width() {
            for c in 0..channels {
                let value = if c < from {
                    scale * load(src, x, y, c)
                } else if c == 3 {
                    255.0
                } else {
                    scale * load(src, x, y, 0)
                };
                store(&mut dst, x, y, c, value);
            }
        }
    }
    Ok(dst)
}

pub(crate) fn as_type(src: &ImageView<'_>, element_type: ElementType, scale: f64) -> Result<ImageBuffer> {
    ensure_valid(src, "as_type")?;
    let mut dst = ImageBuffer::new(src.width(), src.height(), src.channels(), element_type);
    for y in 0..src.height() {
        for x in 0..src.width() {
            for c in 0..src.channels() {
                store(&mut dst, x, y, c, scale * load(src, x, y, c));
            }
        }
    }
    Ok(dst)
}

pub(crate) fn to_f32(src: &ImageView<'_>) -> Result<ImageBuffer> {
    let scale = if src.element_type().is_float() {
        1.0
    } else {
        1.0 / 255.0
    };
    as_type(src, ElementType::F32, scale)
}

pub(crate) fn channel(src: &ImageView<'_>, index: usize) -> Result<ImageBuffer> {
    ensure_valid(src, "channel")?;
    if index >= src.channels() {
        return Err(Error::InvalidArgument(format!(
            "channel {index} requested from a {}-channel buffer",
            src.channels()
        )));
    }
    let mut dst = ImageBuffer::new(src.width(), src.height(), 1, src.element_type());
    for y in 0..src.height() {
        for x in 0..src.width() {
            copy_value(src, x, y, index, &mut dst, 0);
        }
    }
    Ok(dst)
}

fn ensure_compatible(a: &ImageView<'_>, b: &ImageView<'_>, op: &'static str) -> Result<()> {
    ensure_valid(a, op)?;
    ensure_valid(b, op)?;
    if a.width() != b.width() || a.height() != b.height() {
        return Err(Error::InvalidArgument(format!(
            "`{op}` requires buffers of the same size, got {a} and {b}"
        )));
    }
    if a.element_type() != b.element_type() {
        return Err(Error::ElementType {
            expected: a.element_type(),
            requested: b.element_type(),
        });
    }
    Ok(())
}

/// Per-pixel interpolation between `a` and `b` with the weight of `b` given
/// by `weight(x, y)`.
fn blend_with(
    a: &ImageView<'_>,
    b: &ImageView<'_>,
    weight: impl Fn(usize, usize) -> f64,
) -> ImageBuffer {
    let channels = a.channels().max(b.channels());
    let shared = a.channels().min(b.channels());
    let mut dst = ImageBuffer::new(a.width(), a.height(), channels, a.element_type());
    for y in 0..a.height() {
        for x in 0..a.width() {
            let w = weight(x, y);
            for c in 0..channels {
                if c < shared {
                    let value = (1.0 - w) * load(a, x, y, c) + w * load(b, x, y, c);
                    store(&mut dst, x, y, c, value);
                } else if c < a.channels() {
                    copy_value(a, x, y, c, &mut dst, c);
                } else {
                    copy_value(b, x, y, c, &mut dst, c);
                }
            }
        }
    }
    dst
}

pub(crate) fn blend(a: &ImageView<'_>, b: &ImageView<'_>, alpha: f64) -> Result<ImageBuffer> {
    ensure_compatible(a, b, "blend")?;
    if !(0.0..=1.0).contains(&alpha) {
        return Err(Error::InvalidArgument(format!(
            "blend weight must be within [0, 1], got {alpha}"
        )));
    }
    Ok(blend_with(a, b, |_, _| alpha))
}

pub(crate) fn blend_mask(
    a: &ImageView<'_>,
    b: &ImageView<'_>,
    mask: &ImageView<'_>,
) -> Result<ImageBuffer> {
    ensure_compatible(a, b, "blend_mask")?;
    ensure_valid(mask, "blend_mask")?;
    if mask.channels() != 1 || !mask.element_type().is_float() {
        return Err(Error::InvalidArgument(format!(
            "blend mask must be a single-channel float or double buffer, got {mask}"
        )));
    }
    if mask.width() != a.width() || mask.height() != a.height() {
        return Err(Error::InvalidArgument(format!(
            "blend mask {mask} does not match the size of {a}"
        )));
    }
    Ok(blend_with(a, b, |x, y| load(mask, x, y, 0).clamp(0.0, 1.0)))
}

pub(crate) fn dim(src: &ImageView<'_>, alpha: f64) -> Result<ImageBuffer> {
    ensure_valid(src, "dim")?;
    if !(0.0..=1.0).contains(&alpha) {
        return Err(Error::InvalidArgument(format!(
            "dimming factor must be within [0, 1], got {alpha}"
        )));
    }
    let colors = if src.channels() == 4 {
        3
    } else {
        src.channels()
    };
    let mut dst = src.deep_copy();
    for y in 0..src.height() {
        for x in 0..src.width() {
            for c in 0..colors {
                store(&mut dst, x, y, c, alpha * load(src, x, y, c));
            }
        }
    }
    Ok(dst)
}

fn ensure_flow(src: &ImageView<'_>, op: &'static str) -> Result<()> {
    ensure_valid(src, op)?;
    if src.channels() != 2 || !src.element_type().is_float() {
        return Err(Error::InvalidArgument(format!(
            "`{op}` requires a 2-channel float or double buffer, got {src}"
        )));
    }
    Ok(())
}

pub(crate) fn magnitude(src: &ImageView<'_>) -> Result<ImageBuffer> {
    ensure_flow(src, "magnitude")?;
    let mut dst = ImageBuffer::new(src.width(), src.height(), 1, src.element_type());
    for y in 0..src.height() {
        for x in 0..src.width() {
            let value = load(src, x, y, 0).hypot(load(src, x, y, 1));
            store(&mut dst, x, y, 0, value);
        }
    }
    Ok(dst)
}

pub(crate) fn orientation(src: &ImageView<'_>, invalid: f64) -> Result<ImageBuffer> {
    ensure_flow(src, "orientation")?;
    let eps = match src.element_type() {
        ElementType::F32 => f64::from(f32::EPSILON),
        _ => f64::EPSILON,
    };
    let mut dst = ImageBuffer::new(src.width(), src.height(), 1, src.element_type());
    for y in 0..src.height() {
        for x in 0..src.width() {
            let u = load(src, x, y, 0);
            let v = load(src, x, y, 1);
            let value = if u.abs() < eps && v.abs() < eps {
                invalid
            } else {
                v.atan2(u)
            };
            store(&mut dst, x, y, 0, value);
        }
    }
    Ok(dst)
}

pub(crate) fn min_max_location(src: &ImageView<'_>, channel: Option<usize>) -> Result<MinMaxLocation> {
    ensure_valid(src, "min_max_location")?;
    let channels = match channel {
        Some(c) if c >= src.channels() => {
            return Err(Error::InvalidArgument(format!(
                "channel {c} requested from a {}-channel buffer",
                src.channels()
            )));
        }
        Some(c) => c..c + 1,
        None => 0..src.channels(),
    };
    let mut result = MinMaxLocation {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
        min_loc: (0, 0),
        max_loc: (0, 0),
    };
    let layout: Layout = src.layout();
    for y in 0..layout.height {
        for x in 0..layout.width {
            for c in channels.clone() {
                let value = load(src, x, y, c);
                if value < result.min {
                    result.min = value;
                    result.min_loc = (x, y);
                }
                if value > result.max {
                    result.max = value;
                    result.max_loc = (x, y);
                }
            }
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Roi;

    #[test]
    fn gray_to_rgba_replicates_and_adds_alpha() {
        let gray = ImageBuffer::from_vec(2, 1, 1, vec![10_u8, 20]).unwrap();
        let rgba = gray.to_channels(4).unwrap();
        assert_eq!(
            rgba.to_vec::<u8>().unwrap(),
            vec![10, 10, 10, 255, 20, 20, 20, 255]
        );

        let gray = ImageBuffer::from_vec(1, 1, 1, vec![0.25_f32]).unwrap();
        let rgba = gray.to_channels(4).unwrap();
        assert_eq!(rgba.to_vec::<f32>().unwrap(), vec![0.25, 0.25, 0.25, 1.0]);
    }

    #[test]
    fn unsupported_channel_conversions() {
        let rgb = ImageBuffer::new(2, 2, 3, ElementType::U8);
        assert!(rgb.to_channels(1).is_err());
        assert!(rgb.to_channels(2).is_err());
        assert!(ImageBuffer::new(2, 2, 2, ElementType::U8).to_channels(3).is_err());
        assert!(matches!(
            ImageBuffer::default().to_channels(3),
            Err(Error::InvalidBuffer(_))
        ));
        let rgba = ImageBuffer::new(2, 2, 4, ElementType::U8);
        assert_eq!(rgba.to_channels(3).unwrap().channels(), 3);
    }

    #[test]
    fn float_to_u8_scales_and_fills_missing_channels() {
        let flow = ImageBuffer::from_vec(1, 1, 2, vec![0.5_f64, 1.5]).unwrap();
        let rgba = flow.to_u8(4).unwrap();
        assert_eq!(rgba.to_vec::<u8>().unwrap(), vec![128, 255, 128, 255]);
        assert!(flow.to_u8(1).is_err());
        assert!(flow.to_u8(2).is_err());

        let ints = ImageBuffer::from_vec(1, 1, 1, vec![-4_i32]).unwrap();
        assert_eq!(ints.to_u8(3).unwrap().to_vec::<u8>().unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn to_f32_normalizes_integers() {
        let img = ImageBuffer::from_vec(2, 1, 1, vec![0_u8, 255]).unwrap();
        assert_eq!(img.to_f32().unwrap().to_vec::<f32>().unwrap(), vec![0.0, 1.0]);
        let img = ImageBuffer::from_vec(1, 1, 1, vec![3.5_f64]).unwrap();
        assert_eq!(img.to_f32().unwrap().to_vec::<f32>().unwrap(), vec![3.5]);
        let scaled = img.as_type(ElementType::I16, -2.0).unwrap();
        assert_eq!(scaled.to_vec::<i16>().unwrap(), vec![-7]);
    }

    #[test]
    fn channel_extraction_from_view() {
        let img = ImageBuffer::from_vec(2, 2, 3, (0_u8..12).collect()).unwrap();
        let view = img.roi(Roi::new(1, 0, 1, 2)).unwrap();
        let green = view.channel(1).unwrap();
        assert_eq!(green.to_vec::<u8>().unwrap(), vec![4, 10]);
        assert!(view.channel(3).is_err());
    }

    #[test]
    fn blend_copies_extra_channels() {
        let rgb = ImageBuffer::from_vec(1, 1, 3, vec![0_u8, 100, 200]).unwrap();
        let rgba = ImageBuffer::from_vec(1, 1, 4, vec![100_u8, 100, 100, 50]).unwrap();
        let out = rgb.blend(&rgba.view(), 0.5).unwrap();
        assert_eq!(out.to_vec::<u8>().unwrap(), vec![50, 100, 150, 50]);

        assert!(rgb.blend(&rgba.view(), 1.5).is_err());
        let other = ImageBuffer::new(1, 1, 3, ElementType::F32);
        assert!(matches!(
            rgb.blend(&other.view(), 0.5),
            Err(Error::ElementType { .. })
        ));
    }

    #[test]
    fn blend_with_mask_uses_per_pixel_weights() {
        let a = ImageBuffer::from_vec(2, 1, 1, vec![0_u8, 0]).unwrap();
        let b = ImageBuffer::from_vec(2, 1, 1, vec![200_u8, 200]).unwrap();
        let mask = ImageBuffer::from_vec(2, 1, 1, vec![0.0_f32, 0.25]).unwrap();
        let out = a.blend_mask(&b.view(), &mask.view()).unwrap();
        assert_eq!(out.to_vec::<u8>().unwrap(), vec![0, 50]);

        let bad = ImageBuffer::from_vec(2, 1, 1, vec![0_u8, 1]).unwrap();
        assert!(a.blend_mask(&b.view(), &bad.view()).is_err());
    }

    #[test]
    fn dim_keeps_alpha() {
        let img = ImageBuffer::from_vec(1, 1, 4, vec![200_u8, 100, 50, 255]).unwrap();
        let out = img.dim(0.5).unwrap();
        assert_eq!(out.to_vec::<u8>().unwrap(), vec![100, 50, 25, 255]);
        assert!(img.dim(-0.1).is_err());
    }

    #[test]
    fn flow_magnitude_and_orientation() {
        let flow = ImageBuffer::from_vec(2, 1, 2, vec![3.0_f32, 4.0, 0.0, 0.0]).unwrap();
        let mag = flow.magnitude().unwrap();
        assert_eq!(mag.to_vec::<f32>().unwrap(), vec![5.0, 0.0]);

        let ori = flow.orientation(-1.0).unwrap().to_vec::<f32>().unwrap();
        assert!((f64::from(ori[0]) - 4.0_f64.atan2(3.0)).abs() < 1e-6, "{ori:?}");
        assert_eq!(ori[1], -1.0);

        let ints = ImageBuffer::new(1, 1, 2, ElementType::I32);
        assert!(ints.magnitude().is_err());
    }

    #[test]
    fn min_max_global_and_per_channel() {
        let img = ImageBuffer::from_vec(2, 2, 2, vec![5_i16, 0, -3, 9, 7, 1, -3, 2]).unwrap();
        let global = img.min_max_location(None).unwrap();
        assert_eq!(global.min, -3.0);
        assert_eq!(global.min_loc, (1, 0));
        assert_eq!(global.max, 9.0);
        assert_eq!(global.max_loc, (1, 0));

        let first = img.min_max_location(Some(0)).unwrap();
        assert_eq!((first.max, first.max_loc), (7.0, (0, 1)));
        assert!(img.min_max_location(Some(2)).is_err());
        assert!(ImageBuffer::default().min_max_location(None).is_err());
    }
}
