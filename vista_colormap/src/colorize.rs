// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::str::FromStr;

use vista_raster::{Element, ElementType, ImageBuffer, Raster, RasterMut};

use crate::{ColorMap, Error, Result};

fn check_bins(bins: usize) -> Result<()> {
    if (2..=256).contains(&bins) {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "number of bins must be within [2, 256], got {bins}"
        )))
    }
}

fn check_output_channels(channels: usize) -> Result<()> {
    if matches!(channels, 3 | 4) {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "output channels must be 3 or 4, got {channels}"
        )))
    }
}

fn check_limits(low: f64, high: f64) -> Result<()> {
    if low.is_finite() && high.is_finite() && high > low {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "invalid colorization limits [{low:.2}, {high:.2}]"
        )))
    }
}

/// Maps each value of single-channel `data` to a color of `colormap`.
///
/// Values are clamped to `[low, high]` and quantized into `bins` bins
/// which are spread evenly over the table. If either limit is not finite,
/// both are taken from the data. The result is a `u8` buffer with 3 or 4
/// channels; a fourth channel is opaque.
///
/// ```
/// use vista_colormap::{ColorMap, colorize};
/// use vista_raster::{ImageBuffer, Raster};
///
/// let data = ImageBuffer::from_vec(3, 1, 1, vec![0.0_f64, 0.4, 1.0])?;
/// let colors = colorize(&data, ColorMap::Gray, 0.0, 1.0, 3, 2)?;
/// assert_eq!(colors.to_vec::<u8>()?, vec![0, 0, 0, 0, 0, 0, 255, 255, 255]);
/// # Ok::<(), vista_colormap::Error>(())
/// ```
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    reason = "bin indices are small; the float to int cast saturates"
)]
pub fn colorize(
    data: &impl Raster,
    colormap: ColorMap,
    low: f64,
    high: f64,
    output_channels: usize,
    bins: usize,
) -> Result<ImageBuffer> {
    log::debug!("colorizing {} with {colormap}, limits [{low}, {high}]", data.view());
    if data.channels() != 1 {
        return Err(Error::InvalidArgument(format!(
            "colorization requires a single-channel buffer, got {}",
            data.view()
        )));
    }
    check_bins(bins)?;
    check_output_channels(output_channels)?;
    let (low, high) = if low.is_finite() && high.is_finite() {
        (low, high)
    } else {
        let stats = data.min_max_location(Some(0))?;
        (stats.min, stats.max)
    };
    check_limits(low, high)?;

    let steps = (bins - 1) as f64;
    let index_factor = 255.0 / steps;
    let interval = (high - low) / steps;
    let table = colormap.table();

    let mut dst = ImageBuffer::new(data.width(), data.height(), output_channels, ElementType::U8);
    for y in 0..data.height() {
        for x in 0..data.width() {
            let value = data.value_f64(x, y, 0)?.clamp(low, high);
            let bin = (index_factor * ((value - low) / interval).floor()) as i64;
            let rgb = table[bin.clamp(0, 255) as usize];
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

/// How a [`Colorizer`] obtains its limits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LimitsMode {
    /// Use the configured limits.
    #[default]
    Fixed,
    /// Compute the limits from every new data buffer.
    Continuous,
    /// Compute the limits from the first data buffer, then keep them.
    Once,
}

impl fmt::Display for LimitsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fixed => "fixed",
            Self::Continuous => "continuous",
            Self::Once => "once",
        })
    }
}

impl FromStr for LimitsMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if lower.starts_with("fix") {
            Ok(Self::Fixed)
        } else if lower.starts_with("cont") {
            Ok(Self::Continuous)
        } else if lower == "once" {
            Ok(Self::Once)
        } else {
            Err(Error::InvalidArgument(format!(
                "unknown limits mode \"{s}\""
            )))
        }
    }
}

/// Applies a fixed color map configuration to a stream of data buffers.
///
/// Setters validate the new configuration and leave the colorizer unchanged
/// if it is rejected. Setting a limit switches to [`LimitsMode::Fixed`].
#[derive(Clone, Debug, PartialEq)]
pub struct Colorizer {
    colormap: ColorMap,
    limits_mode: LimitsMode,
    bins: usize,
    output_channels: usize,
    low: f64,
    high: f64,
}

impl Colorizer {
    /// Create a colorizer. Fixed limits must be finite with `low < high`.
    pub fn new(
        colormap: ColorMap,
        limits_mode: LimitsMode,
        bins: usize,
        output_channels: usize,
        low: f64,
        high: f64,
    ) -> Result<Self> {
        let colorizer = Self {
            colormap,
            limits_mode,
            bins,
            output_channels,
            low,
            high,
        };
        colorizer.validate()?;
        Ok(colorizer)
    }

    /// 256 bins and 3 output channels with fixed limits.
    pub fn fixed(colormap: ColorMap, low: f64, high: f64) -> Result<Self> {
        Self::new(colormap, LimitsMode::Fixed, 256, 3, low, high)
    }

    /// 256 bins and 3 output channels with limits taken from the data.
    pub fn from_data(colormap: ColorMap, limits_mode: LimitsMode) -> Result<Self> {
        Self::new(colormap, limits_mode, 256, 3, f64::INFINITY, f64::INFINITY)
    }

    fn validate(&self) -> Result<()> {
        check_bins(self.bins)?;
        check_output_channels(self.output_channels)?;
        if self.limits_mode == LimitsMode::Fixed {
            check_limits(self.low, self.high)?;
        }
        Ok(())
    }

    fn update(&mut self, change: impl FnOnce(&mut Self)) -> Result<()> {
        let mut candidate = self.clone();
        change(&mut candidate);
        candidate.validate()?;
        *self = candidate;
        Ok(())
    }

    /// Color map.
    pub fn colormap(&self) -> ColorMap {
        self.colormap
    }

    /// How limits are obtained.
    pub fn limits_mode(&self) -> LimitsMode {
        self.limits_mode
    }

    /// Number of bins.
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Number of output channels.
    pub fn output_channels(&self) -> usize {
        self.output_channels
    }

    /// Lower limit.
    pub fn limit_low(&self) -> f64 {
        self.low
    }

    /// Upper limit.
    pub fn limit_high(&self) -> f64 {
        self.high
    }

    /// Change the color map.
    pub fn set_colormap(&mut self, colormap: ColorMap) {
        self.colormap = colormap;
    }

    /// Change the limits mode.
    pub fn set_limits_mode(&mut self, limits_mode: LimitsMode) -> Result<()> {
        self.update(|c| c.limits_mode = limits_mode)
    }

    /// Set the lower limit and switch to fixed limits.
    pub fn set_limit_low(&mut self, low: f64) -> Result<()> {
        self.update(|c| {
            c.limits_mode = LimitsMode::Fixed;
            c.low = low;
        })
    }

    /// Set the upper limit and switch to fixed limits.
    pub fn set_limit_high(&mut self, high: f64) -> Result<()> {
        self.update(|c| {
            c.limits_mode = LimitsMode::Fixed;
            c.high = high;
        })
    }

    /// Change the number of bins.
    pub fn set_bins(&mut self, bins: usize) -> Result<()> {
        self.update(|c| c.bins = bins)
    }

    /// Change the number of output channels.
    pub fn set_output_channels(&mut self, output_channels: usize) -> Result<()> {
        self.update(|c| c.output_channels = output_channels)
    }

    /// Colorize `data`, updating the limits first if the mode requires it.
    pub fn colorize(&mut self, data: &impl Raster) -> Result<ImageBuffer> {
        if self.limits_mode != LimitsMode::Fixed {
            let stats = data.min_max_location(Some(0))?;
            self.low = stats.min;
            self.high = stats.max;
            log::trace!("colorizer limits updated to [{}, {}]", self.low, self.high);
            if self.limits_mode == LimitsMode::Once {
                self.limits_mode = LimitsMode::Fixed;
            }
        }
        colorize(
            data,
            self.colormap,
            self.low,
            self.high,
            self.output_channels,
            self.bins,
        )
    }
}

impl fmt::Display for Colorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Colorizer({}, {}, bins={}, channels={}",
            self.colormap, self.limits_mode, self.bins, self.output_channels
        )?;
        if self.limits_mode == LimitsMode::Fixed {
            write!(f, ", [{}, {}]", self.low, self.high)?;
        }
        f.write_str(")")
    }
}

/// Shade a colorized `u8` image by a single-channel relief in `[0, 1]`.
///
/// Integer relief values are normalized by 1/255 first. Color channels are
/// multiplied by the relief; an alpha channel is kept.
pub fn relief_shading(relief: &impl Raster, colorized: &impl Raster) -> Result<ImageBuffer> {
    if relief.channels() != 1 {
        return Err(Error::InvalidArgument(format!(
            "relief must be single-channel, got {}",
            relief.view()
        )));
    }
    if colorized.element_type() != ElementType::U8 {
        return Err(Error::InvalidArgument(format!(
            "colorized input must be uint8, got {}",
            colorized.view()
        )));
    }
    if relief.width() != colorized.width() || relief.height() != colorized.height() {
        return Err(Error::InvalidArgument(format!(
            "relief {} does not match colorized input {}",
            relief.view(),
            colorized.view()
        )));
    }
    let shade = relief.to_f32()?;
    let colors = colorized.channels().min(3);
    let mut dst = colorized.deep_copy();
    for y in 0..dst.height() {
        for x in 0..dst.width() {
            let factor = f64::from(shade.get::<f32>(x, y, 0)?);
            for c in 0..colors {
                let value = factor * f64::from(dst.get::<u8>(x, y, c)?);
                dst.set(x, y, c, u8::from_f64(value))?;
            }
        }
    }
    Ok(dst)
}

/// Sample data: MATLAB's `peaks` surface over `[-3, 3)²` as a
/// single-channel `f64` buffer.
#[allow(
    clippy::cast_precision_loss,
    reason = "image sizes are far below 2^52"
)]
pub fn peaks(height: usize, width: usize) -> ImageBuffer {
    let step_x = 6.0 / width as f64;
    let step_y = 6.0 / height as f64;
    let mut values = Vec::with_capacity(width * height);
    for row in 0..height {
        let y = -3.0 + row as f64 * step_y;
        for col in 0..width {
            let x = -3.0 + col as f64 * step_x;
            values.push(
                3.0 * (1.0 - x).powi(2) * (-(x * x) - (y + 1.0).powi(2)).exp()
                    - 10.0 * (x / 5.0 - x.powi(3) - y.powi(5)) * (-(x * x) - y * y).exp()
                    - 1.0 / 3.0 * (-(x + 1.0).powi(2) - y * y).exp(),
            );
        }
    }
    ImageBuffer::from_vec(width, height, 1, values).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_bins_map_limits_to_table_ends() {
        let data = ImageBuffer::from_vec(4, 1, 1, vec![-5_i16, 0, 9, 10]).unwrap();
        let out = colorize(&data, ColorMap::Hot, 0.0, 10.0, 4, 2).unwrap();
        let table = ColorMap::Hot.table();
        let values = out.to_vec::<u8>().unwrap();
        let first = [table[0][0], table[0][1], table[0][2], 255];
        let last = [table[255][0], table[255][1], table[255][2], 255];
        assert_eq!(&values[0..4], &first);
        assert_eq!(&values[4..8], &first);
        assert_eq!(&values[8..12], &first);
        assert_eq!(&values[12..16], &last);
    }

    #[test]
    fn full_resolution_binning() {
        let data = ImageBuffer::from_vec(3, 1, 1, vec![0_u8, 128, 255]).unwrap();
        let out = colorize(&data, ColorMap::Gray, 0.0, 255.0, 3, 256).unwrap();
        assert_eq!(
            out.to_vec::<u8>().unwrap(),
            vec![0, 0, 0, 128, 128, 128, 255, 255, 255]
        );
    }

    #[test]
    fn non_finite_limits_come_from_data() {
        let data = ImageBuffer::from_vec(2, 1, 1, vec![2.0_f32, 4.0]).unwrap();
        let out = colorize(&data, ColorMap::Gray, f64::NAN, 1.0, 3, 256).unwrap();
        assert_eq!(out.to_vec::<u8>().unwrap(), vec![0, 0, 0, 255, 255, 255]);
    }

    #[test]
    fn invalid_colorize_arguments() {
        let data = ImageBuffer::from_vec(2, 1, 1, vec![2.0_f32, 4.0]).unwrap();
        assert!(colorize(&data, ColorMap::Gray, 1.0, 1.0, 3, 256).is_err());
        assert!(colorize(&data, ColorMap::Gray, 0.0, 1.0, 2, 256).is_err());
        assert!(colorize(&data, ColorMap::Gray, 0.0, 1.0, 3, 1).is_err());
        assert!(colorize(&data, ColorMap::Gray, 0.0, 1.0, 3, 257).is_err());
        let rgb = ImageBuffer::new(2, 1, 3, ElementType::U8);
        assert!(colorize(&rgb, ColorMap::Gray, 0.0, 1.0, 3, 256).is_err());
        let constant = ImageBuffer::filled(2, 1, 1, ElementType::F64, 3.0);
        assert!(colorize(&constant, ColorMap::Gray, f64::INFINITY, 1.0, 3, 256).is_err());
    }

    #[test]
    fn colorizer_modes() {
        let first = ImageBuffer::from_vec(2, 1, 1, vec![0.0_f64, 10.0]).unwrap();
        let second = ImageBuffer::from_vec(2, 1, 1, vec![0.0_f64, 20.0]).unwrap();

        let mut once = Colorizer::from_data(ColorMap::Gray, LimitsMode::Once).unwrap();
        once.colorize(&first).unwrap();
        assert_eq!(once.limits_mode(), LimitsMode::Fixed);
        assert_eq!((once.limit_low(), once.limit_high()), (0.0, 10.0));
        once.colorize(&second).unwrap();
        assert_eq!(once.limit_high(), 10.0);

        let mut continuous =
            Colorizer::from_data(ColorMap::Gray, LimitsMode::Continuous).unwrap();
        continuous.colorize(&first).unwrap();
        continuous.colorize(&second).unwrap();
        assert_eq!(continuous.limit_high(), 20.0);
        assert_eq!(continuous.limits_mode(), LimitsMode::Continuous);
    }

    #[test]
    fn rejected_settings_keep_state() {
        let mut colorizer = Colorizer::fixed(ColorMap::Viridis, 0.0, 1.0).unwrap();
        assert!(colorizer.set_limit_low(2.0).is_err());
        assert_eq!(colorizer.limit_low(), 0.0);
        assert!(colorizer.set_bins(1).is_err());
        assert_eq!(colorizer.bins(), 256);
        colorizer.set_output_channels(4).unwrap();
        assert_eq!(colorizer.output_channels(), 4);

        let mut from_data = Colorizer::from_data(ColorMap::Gray, LimitsMode::Continuous).unwrap();
        assert!(from_data.set_limit_high(5.0).is_err());
        assert_eq!(from_data.limits_mode(), LimitsMode::Continuous);
        assert!(Colorizer::fixed(ColorMap::Gray, 1.0, 0.0).is_err());
    }

    #[test]
    fn limits_mode_strings() {
        assert_eq!("Fixed".parse::<LimitsMode>().unwrap(), LimitsMode::Fixed);
        assert_eq!(" continuously".parse::<LimitsMode>().unwrap(), LimitsMode::Continuous);
        assert_eq!("once".parse::<LimitsMode>().unwrap(), LimitsMode::Once);
        assert!("twice".parse::<LimitsMode>().is_err());
        assert_eq!(LimitsMode::Continuous.to_string(), "continuous");
    }

    #[test]
    fn relief_shading_darkens_colors() {
        let relief = ImageBuffer::from_vec(2, 1, 1, vec![1.0_f32, 0.5]).unwrap();
        let colors = ImageBuffer::from_vec(2, 1, 4, vec![200_u8, 100, 50, 255, 200, 100, 50, 255])
            .unwrap();
        let shaded = relief_shading(&relief, &colors).unwrap();
        assert_eq!(
            shaded.to_vec::<u8>().unwrap(),
            vec![200, 100, 50, 255, 100, 50, 25, 255]
        );
        let small = ImageBuffer::new(1, 1, 1, ElementType::F32);
        assert!(relief_shading(&small, &colors).is_err());
    }

    #[test]
    fn peaks_surface() {
        let surface = peaks(40, 60);
        assert_eq!(surface.width(), 60);
        assert_eq!(surface.height(), 40);
        assert_eq!(surface.element_type(), ElementType::F64);
        let stats = surface.min_max_location(None).unwrap();
        assert!(stats.max > 7.0 && stats.max < 8.2, "{stats:?}");
        assert!(stats.min < -6.0 && stats.min > -6.7, "{stats:?}");
    }
}
