// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::ops::RangeInclusive;

use crate::element::{read, write};
use crate::{Element, ElementType, Error, MinMaxLocation, Result, colorspace, convert};

/// Memory layout of an image: size, channels, element type and strides.
///
/// Strides are in bytes. A layout is *contiguous* if pixels and rows are
/// tightly packed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Layout {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Values per pixel.
    pub channels: usize,
    /// Storage type of a value.
    pub element_type: ElementType,
    /// Bytes between the starts of two consecutive rows.
    pub row_stride: usize,
    /// Bytes between the starts of two consecutive pixels.
    pub pixel_stride: usize,
}

impl Layout {
    /// Tightly packed layout.
    pub fn contiguous(
        width: usize,
        height: usize,
        channels: usize,
        element_type: ElementType,
    ) -> Self {
        let pixel_stride = channels * element_type.size();
        Self {
            width,
            height,
            channels,
            element_type,
            row_stride: width * pixel_stride,
            pixel_stride,
        }
    }

    /// Returns `true` if there is no pixel at all.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.channels == 0
    }

    /// Returns `true` if pixels and rows are tightly packed.
    pub fn is_contiguous(&self) -> bool {
        self.pixel_stride == self.channels * self.element_type.size()
            && self.row_stride == self.width * self.pixel_stride
    }

    /// Byte offset of channel `c` of the pixel at `(x, y)`.
    pub fn offset(&self, x: usize, y: usize, c: usize) -> usize {
        y * self.row_stride + x * self.pixel_stride + c * self.element_type.size()
    }

    /// Bytes of one pixel, without padding.
    pub fn pixel_bytes(&self) -> usize {
        self.channels * self.element_type.size()
    }

    /// Smallest number of bytes that holds every pixel of this layout.
    pub fn min_len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.offset(self.width - 1, self.height - 1, 0) + self.pixel_bytes()
        }
    }

    pub(crate) fn check(&self, len: usize) -> Result<()> {
        if self.pixel_stride < self.pixel_bytes() {
            return Err(Error::InvalidArgument(format!(
                "pixel stride {} is smaller than {} channel(s) of {}",
                self.pixel_stride, self.channels, self.element_type
            )));
        }
        if self.row_stride < self.width * self.pixel_stride {
            return Err(Error::InvalidArgument(format!(
                "row stride {} is smaller than width {} times pixel stride {}",
                self.row_stride, self.width, self.pixel_stride
            )));
        }
        if len < self.min_len() {
            return Err(Error::InvalidArgument(format!(
                "{len} bytes cannot hold a {}x{}x{} image with row stride {}",
                self.width, self.height, self.channels, self.row_stride
            )));
        }
        Ok(())
    }

    pub(crate) fn check_index(&self, x: usize, y: usize, c: usize) -> Result<()> {
        if x >= self.width || y >= self.height || c >= self.channels {
            return Err(Error::OutOfRange(format!(
                "({x}, {y}, channel {c}) is outside a {}x{}x{} image",
                self.width, self.height, self.channels
            )));
        }
        Ok(())
    }

    pub(crate) fn check_type(&self, requested: ElementType) -> Result<()> {
        if self.element_type == requested {
            Ok(())
        } else {
            Err(Error::ElementType {
                expected: self.element_type,
                requested,
            })
        }
    }

    /// Layout of the region `roi` within this layout and its byte offset.
    pub(crate) fn roi(&self, roi: Roi) -> Result<(usize, Self)> {
        if roi.width == 0 || roi.height == 0 {
            return Err(Error::InvalidArgument(format!(
                "{roi} must have a positive width and height"
            )));
        }
        if roi.left + roi.width > self.width || roi.top + roi.height > self.height {
            return Err(Error::OutOfRange(format!(
                "{roi} exceeds an image of size {}x{}",
                self.width, self.height
            )));
        }
        let layout = Self {
            width: roi.width,
            height: roi.height,
            ..*self
        };
        Ok((self.offset(roi.left, roi.top, 0), layout))
    }
}

/// A rectangular region of interest in pixel coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Roi {
    /// First column.
    pub left: usize,
    /// First row.
    pub top: usize,
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
}

impl Roi {
    /// Create a region.
    pub const fn new(left: usize, top: usize, width: usize, height: usize) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

impl fmt::Display for Roi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ROI(l={}, t={}, w={}, h={})",
            self.left, self.top, self.width, self.height
        )
    }
}

/// An exclusively owned, contiguous image.
///
/// The default value is the *invalid* image with no pixels, which is what
/// operations return when there is nothing to produce.
#[derive(Clone, Default, PartialEq)]
pub struct ImageBuffer {
    data: Vec<u8>,
    layout: Layout,
}

/// A read-only view of pixels owned elsewhere, with arbitrary strides.
#[derive(Copy, Clone)]
pub struct ImageView<'a> {
    data: &'a [u8],
    layout: Layout,
}

/// A mutable view of pixels owned elsewhere, with arbitrary strides.
///
/// In-place operations through this view modify the owner's memory.
pub struct ImageViewMut<'a> {
    data: &'a mut [u8],
    layout: Layout,
}

impl ImageBuffer {
    /// A zero-initialized image.
    pub fn new(width: usize, height: usize, channels: usize, element_type: ElementType) -> Self {
        let layout = Layout::contiguous(width, height, channels, element_type);
        Self {
            data: vec![0; layout.min_len()],
            layout,
        }
    }

    /// An image filled with the given value in every channel of every pixel.
    pub fn filled(
        width: usize,
        height: usize,
        channels: usize,
        element_type: ElementType,
        value: f64,
    ) -> Self {
        let mut image = Self::new(width, height, channels, element_type);
        if !image.layout.is_empty() {
            let size = element_type.size();
            let mut pattern = vec![0_u8; size];
            element_type.write_f64(&mut pattern, value);
            for chunk in image.data.chunks_exact_mut(size) {
                chunk.copy_from_slice(&pattern);
            }
        }
        image
    }

    /// Take ownership of row-major, interleaved values.
    pub fn from_vec<T: Element>(
        width: usize,
        height: usize,
        channels: usize,
        values: Vec<T>,
    ) -> Result<Self> {
        if values.len() != width * height * channels {
            return Err(Error::InvalidArgument(format!(
                "{} values cannot form a {width}x{height}x{channels} image",
                values.len()
            )));
        }
        Ok(Self {
            data: bytemuck::cast_slice(&values).to_vec(),
            layout: Layout::contiguous(width, height, channels, T::TYPE),
        })
    }

    /// Take ownership of tightly packed bytes in native byte order.
    pub fn from_bytes(
        width: usize,
        height: usize,
        channels: usize,
        element_type: ElementType,
        data: Vec<u8>,
    ) -> Result<Self> {
        let layout = Layout::contiguous(width, height, channels, element_type);
        if data.len() != layout.min_len() {
            return Err(Error::InvalidArgument(format!(
                "{} bytes cannot form a {width}x{height}x{channels} {element_type} image",
                data.len()
            )));
        }
        Ok(Self { data, layout })
    }

    /// Release the underlying bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl<'a> ImageView<'a> {
    /// View `data` with the given layout.
    pub fn from_raw(data: &'a [u8], layout: Layout) -> Result<Self> {
        layout.check(data.len())?;
        Ok(Self { data, layout })
    }

    /// View tightly packed, row-major values.
    pub fn from_slice<T: Element>(
        values: &'a [T],
        width: usize,
        height: usize,
        channels: usize,
    ) -> Result<Self> {
        Self::from_raw(
            bytemuck::cast_slice(values),
            Layout::contiguous(width, height, channels, T::TYPE),
        )
    }

    /// A view of a region that keeps the lifetime of the underlying memory.
    pub fn sub_view(&self, roi: Roi) -> Result<Self> {
        let (offset, layout) = self.layout.roi(roi)?;
        Ok(Self {
            data: &self.data[offset..],
            layout,
        })
    }
}

impl<'a> ImageViewMut<'a> {
    /// Mutably view `data` with the given layout.
    pub fn from_raw(data: &'a mut [u8], layout: Layout) -> Result<Self> {
        layout.check(data.len())?;
        Ok(Self { data, layout })
    }

    /// View tightly packed, row-major values.
    pub fn from_slice<T: Element>(
        values: &'a mut [T],
        width: usize,
        height: usize,
        channels: usize,
    ) -> Result<Self> {
        Self::from_raw(
            bytemuck::cast_slice_mut(values),
            Layout::contiguous(width, height, channels, T::TYPE),
        )
    }
}

/// Read access shared by owned images and views.
pub trait Raster {
    /// Memory layout.
    fn layout(&self) -> Layout;

    /// The underlying bytes, starting at the first pixel.
    fn data(&self) -> &[u8];

    /// Whether the pixels are owned by this value.
    fn is_owned(&self) -> bool;

    /// Number of columns.
    fn width(&self) -> usize {
        self.layout().width
    }

    /// Number of rows.
    fn height(&self) -> usize {
        self.layout().height
    }

    /// Values per pixel.
    fn channels(&self) -> usize {
        self.layout().channels
    }

    /// Storage type.
    fn element_type(&self) -> ElementType {
        self.layout().element_type
    }

    /// Bytes between two rows.
    fn row_stride(&self) -> usize {
        self.layout().row_stride
    }

    /// Bytes between two pixels.
    fn pixel_stride(&self) -> usize {
        self.layout().pixel_stride
    }

    /// Returns `true` if the image has at least one pixel.
    fn is_valid(&self) -> bool {
        !self.layout().is_empty()
    }

    /// Returns `true` if pixels and rows are tightly packed.
    fn is_contiguous(&self) -> bool {
        self.layout().is_contiguous()
    }

    /// Borrow as a read-only view.
    fn view(&self) -> ImageView<'_> {
        ImageView {
            data: self.data(),
            layout: self.layout(),
        }
    }

    /// Typed value of channel `c` at `(x, y)`.
    fn get<T: Element>(&self, x: usize, y: usize, c: usize) -> Result<T> {
        let layout = self.layout();
        layout.check_type(T::TYPE)?;
        layout.check_index(x, y, c)?;
        Ok(read(&self.data()[layout.offset(x, y, c)..]))
    }

    /// Value of channel `c` at `(x, y)`, whatever the element type.
    fn value_f64(&self, x: usize, y: usize, c: usize) -> Result<f64> {
        let layout = self.layout();
        layout.check_index(x, y, c)?;
        Ok(layout
            .element_type
            .read_f64(&self.data()[layout.offset(x, y, c)..]))
    }

    /// The bytes of row `y`, without trailing padding.
    fn row_bytes(&self, y: usize) -> Result<&[u8]> {
        let layout = self.layout();
        layout.check_index(0, y, 0)?;
        let start = layout.offset(0, y, 0);
        let len = (layout.width - 1) * layout.pixel_stride + layout.pixel_bytes();
        Ok(&self.data()[start..start + len])
    }

    /// A read-only view of a region.
    fn roi(&self, roi: Roi) -> Result<ImageView<'_>> {
        let (offset, layout) = self.layout().roi(roi)?;
        Ok(ImageView {
            data: &self.data()[offset..],
            layout,
        })
    }

    /// All values in row-major, interleaved order.
    fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
        let layout = self.layout();
        layout.check_type(T::TYPE)?;
        let mut values = Vec::with_capacity(layout.width * layout.height * layout.channels);
        for y in 0..layout.height {
            for x in 0..layout.width {
                for c in 0..layout.channels {
                    values.push(read(&self.data()[layout.offset(x, y, c)..]));
                }
            }
        }
        Ok(values)
    }

    /// Copy into a new, contiguous, exclusively owned image.
    fn deep_copy(&self) -> ImageBuffer {
        let layout = self.layout();
        if layout.is_empty() {
            return ImageBuffer::default();
        }
        let contiguous = Layout::contiguous(
            layout.width,
            layout.height,
            layout.channels,
            layout.element_type,
        );
        let mut data = Vec::with_capacity(contiguous.min_len());
        let pixel_bytes = layout.pixel_bytes();
        for y in 0..layout.height {
            if layout.pixel_stride == pixel_bytes {
                let start = layout.offset(0, y, 0);
                data.extend_from_slice(&self.data()[start..start + contiguous.row_stride]);
            } else {
                for x in 0..layout.width {
                    let start = layout.offset(x, y, 0);
                    data.extend_from_slice(&self.data()[start..start + pixel_bytes]);
                }
            }
        }
        ImageBuffer {
            data,
            layout: contiguous,
        }
    }

    /// Same element type with 1, 3 or 4 channels.
    ///
    /// Supported: 1 to 1, 3 or 4 (gray replicated), and 3 or 4 to 3 or 4.
    /// An added alpha channel is opaque, see [`ElementType::opaque_alpha`].
    fn to_channels(&self, channels: usize) -> Result<ImageBuffer> {
        convert::to_channels(&self.view(), channels)
    }

    /// Convert to `u8` with 1, 3 or 4 channels.
    ///
    /// Floating point values are treated as normalized and scaled by 255,
    /// integers are saturated. Added channels copy the first channel, except
    /// for an added alpha channel which is opaque. A 4-channel input may be
    /// reduced to 3 channels; other reductions are rejected.
    fn to_u8(&self, channels: usize) -> Result<ImageBuffer> {
        convert::to_u8(&self.view(), channels)
    }

    /// Convert to `f32`, normalizing integer values by 1/255.
    fn to_f32(&self) -> Result<ImageBuffer> {
        convert::to_f32(&self.view())
    }

    /// Convert to another element type as `value * scale`, saturating.
    fn as_type(&self, element_type: ElementType, scale: f64) -> Result<ImageBuffer> {
        convert::as_type(&self.view(), element_type, scale)
    }

    /// Copy of a single channel.
    fn channel(&self, index: usize) -> Result<ImageBuffer> {
        convert::channel(&self.view(), index)
    }

    /// `(1 - alpha) * self + alpha * other`.
    ///
    /// Both buffers need the same size and element type. The result has as
    /// many channels as the larger input; channels present in only one input
    /// are copied from it.
    fn blend(&self, other: &ImageView<'_>, alpha: f64) -> Result<ImageBuffer> {
        convert::blend(&self.view(), other, alpha)
    }

    /// Like [`blend`](Self::blend) with per-pixel weights from a
    /// single-channel floating point `mask`.
    fn blend_mask(&self, other: &ImageView<'_>, mask: &ImageView<'_>) -> Result<ImageBuffer> {
        convert::blend_mask(&self.view(), other, mask)
    }

    /// Scale the color channels by `alpha`; an alpha channel is kept.
    fn dim(&self, alpha: f64) -> Result<ImageBuffer> {
        convert::dim(&self.view(), alpha)
    }

    /// Euclidean norm of a 2-channel floating point buffer.
    fn magnitude(&self) -> Result<ImageBuffer> {
        convert::magnitude(&self.view())
    }

    /// Angle `atan2(v, u)` in radians of a 2-channel floating point buffer.
    /// Zero vectors are set to `invalid`.
    fn orientation(&self, invalid: f64) -> Result<ImageBuffer> {
        convert::orientation(&self.view(), invalid)
    }

    /// Minimum and maximum of one channel, or of all channels for `None`.
    fn min_max_location(&self, channel: Option<usize>) -> Result<MinMaxLocation> {
        convert::min_max_location(&self.view(), channel)
    }

    /// Grayscale from RGB(A), or BGR(A) if `is_bgr`, with 1 to 4 output
    /// channels. A fourth output channel keeps the input alpha.
    fn rgb_to_gray(&self, channels: usize, is_bgr: bool) -> Result<ImageBuffer> {
        colorspace::rgb_to_gray(&self.view(), channels, is_bgr)
    }

    /// HSV from a 3- or 4-channel `u8` buffer.
    ///
    /// Hue is stored halved, in `[0, 180)`; saturation and value are
    /// scaled to `[0, 255]`.
    fn rgb_to_hsv(&self, is_bgr: bool) -> Result<ImageBuffer> {
        colorspace::rgb_to_hsv(&self.view(), is_bgr)
    }

    /// RGB(A) from an HSV buffer as produced by [`rgb_to_hsv`](Self::rgb_to_hsv).
    fn hsv_to_rgb(&self, channels: usize, to_bgr: bool) -> Result<ImageBuffer> {
        colorspace::hsv_to_rgb(&self.view(), channels, to_bgr)
    }

    /// `u8` mask that is 255 where an HSV pixel lies within all three ranges.
    ///
    /// Hue is given in degrees, saturation and value in `[0, 1]`. A hue
    /// range whose start exceeds its end wraps around 0°.
    fn mask_hsv_range(
        &self,
        hue: &RangeInclusive<f64>,
        saturation: &RangeInclusive<f64>,
        value: &RangeInclusive<f64>,
    ) -> Result<ImageBuffer> {
        colorspace::mask_hsv_range(&self.view(), hue, saturation, value)
    }

    /// Turn every pixel outside the given HSV ranges gray.
    fn color_pop(
        &self,
        hue: &RangeInclusive<f64>,
        saturation: &RangeInclusive<f64>,
        value: &RangeInclusive<f64>,
        is_bgr: bool,
    ) -> Result<ImageBuffer> {
        colorspace::color_pop(&self.view(), hue, saturation, value, is_bgr)
    }
}

/// Write access shared by owned images and mutable views.
pub trait RasterMut: Raster {
    /// The underlying bytes, starting at the first pixel.
    fn data_mut(&mut self) -> &mut [u8];

    /// Borrow as a mutable view.
    fn view_mut(&mut self) -> ImageViewMut<'_> {
        let layout = self.layout();
        ImageViewMut {
            data: self.data_mut(),
            layout,
        }
    }

    /// Set channel `c` at `(x, y)`.
    fn set<T: Element>(&mut self, x: usize, y: usize, c: usize, value: T) -> Result<()> {
        let layout = self.layout();
        layout.check_type(T::TYPE)?;
        layout.check_index(x, y, c)?;
        write(&mut self.data_mut()[layout.offset(x, y, c)..], value);
        Ok(())
    }

    /// Set channel `c` at `(x, y)` from a `f64`, saturating.
    fn set_f64(&mut self, x: usize, y: usize, c: usize, value: f64) -> Result<()> {
        let layout = self.layout();
        layout.check_index(x, y, c)?;
        let offset = layout.offset(x, y, c);
        layout
            .element_type
            .write_f64(&mut self.data_mut()[offset..], value);
        Ok(())
    }

    /// A mutable view of a region.
    fn roi_mut(&mut self, roi: Roi) -> Result<ImageViewMut<'_>> {
        let (offset, layout) = self.layout().roi(roi)?;
        Ok(ImageViewMut {
            data: &mut self.data_mut()[offset..],
            layout,
        })
    }

    /// Set every pixel to `pixel`, given per channel.
    fn fill_pixel(&mut self, pixel: &[f64]) -> Result<()> {
        let layout = self.layout();
        if pixel.len() != layout.channels {
            return Err(Error::InvalidArgument(format!(
                "{} values cannot fill a {}-channel image",
                pixel.len(),
                layout.channels
            )));
        }
        let mut pattern = vec![0_u8; layout.pixel_bytes()];
        let size = layout.element_type.size();
        for (c, value) in pixel.iter().enumerate() {
            layout
                .element_type
                .write_f64(&mut pattern[c * size..], *value);
        }
        let data = self.data_mut();
        for y in 0..layout.height {
            for x in 0..layout.width {
                let start = layout.offset(x, y, 0);
                data[start..start + pattern.len()].copy_from_slice(&pattern);
            }
        }
        Ok(())
    }

    /// Swap two channels in place. Swapping a channel with itself is a no-op.
    fn swap_channels(&mut self, ch1: usize, ch2: usize) -> Result<()> {
        let layout = self.layout();
        if ch1 >= layout.channels || ch2 >= layout.channels {
            return Err(Error::InvalidArgument(format!(
                "cannot swap channels {ch1} and {ch2} of a {}-channel image",
                layout.channels
            )));
        }
        if ch1 == ch2 {
            return Ok(());
        }
        let size = layout.element_type.size();
        let data = self.data_mut();
        for y in 0..layout.height {
            for x in 0..layout.width {
                let a = layout.offset(x, y, ch1);
                let b = layout.offset(x, y, ch2);
                for i in 0..size {
                    data.swap(a + i, b + i);
                }
            }
        }
        Ok(())
    }

    /// Replace blocks of pixels by their center pixel, in place.
    ///
    /// If the region is not a multiple of the block size, the outer blocks
    /// grow to cover the remainder, split evenly between both sides. `None`
    /// pixelates the whole image.
    fn pixelate(&mut self, block_width: usize, block_height: usize, roi: Option<Roi>) -> Result<()> {
        if !self.is_valid() {
            return Err(Error::InvalidBuffer("pixelate"));
        }
        if block_width == 0 || block_height == 0 {
            return Err(Error::InvalidArgument(
                "block width and height must be > 0".into(),
            ));
        }
        let full = Roi::new(0, 0, self.width(), self.height());
        let (offset, layout) = self.layout().roi(roi.unwrap_or(full))?;
        let data = &mut self.data_mut()[offset..];

        let cols = block_sizes(layout.width, block_width);
        let rows = block_sizes(layout.height, block_height);
        let pixel_bytes = layout.pixel_bytes();
        let mut center = vec![0_u8; pixel_bytes];

        let mut top = 0;
        for bh in &rows {
            let mut left = 0;
            for bw in &cols {
                let src = layout.offset(left + bw / 2, top + bh / 2, 0);
                center.copy_from_slice(&data[src..src + pixel_bytes]);
                for y in top..top + bh {
                    for x in left..left + bw {
                        let dst = layout.offset(x, y, 0);
                        data[dst..dst + pixel_bytes].copy_from_slice(&center);
                    }
                }
                left += bw;
            }
            top += bh;
        }
        Ok(())
    }
}

/// Sizes of consecutive blocks covering `extent`.
///
/// The remainder is split between the first and the last block; with a
/// single block, it is entirely added to that block.
fn block_sizes(extent: usize, block: usize) -> Vec<usize> {
    let count = extent / block;
    if count == 0 {
        return Vec::new();
    }
    let missed = extent - count * block;
    let mut first = missed / 2;
    let mut last = missed - first;
    if count == 1 {
        first += last;
        last = 0;
    }
    (0..count)
        .map(|i| {
            if i == 0 {
                block + first
            } else if i == count - 1 {
                block + last
            } else {
                block
            }
        })
        .collect()
}

impl Raster for ImageBuffer {
    fn layout(&self) -> Layout {
        self.layout
    }

    fn data(&self) -> &[u8] {
        &self.data
    }

    fn is_owned(&self) -> bool {
        true
    }
}

impl RasterMut for ImageBuffer {
    fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl Raster for ImageView<'_> {
    fn layout(&self) -> Layout {
        self.layout
    }

    fn data(&self) -> &[u8] {
        self.data
    }

    fn is_owned(&self) -> bool {
        false
    }
}

impl Raster for ImageViewMut<'_> {
    fn layout(&self) -> Layout {
        self.layout
    }

    fn data(&self) -> &[u8] {
        &*self.data
    }

    fn is_owned(&self) -> bool {
        false
    }
}

impl RasterMut for ImageViewMut<'_> {
    fn data_mut(&mut self) -> &mut [u8] {
        &mut *self.data
    }
}

fn describe(f: &mut fmt::Formatter<'_>, raster: &impl Raster) -> fmt::Result {
    if !raster.is_valid() {
        return f.write_str("ImageBuffer(invalid)");
    }
    write!(
        f,
        "ImageBuffer({}x{}x{}, {}, {})",
        raster.width(),
        raster.height(),
        raster.channels(),
        raster.element_type(),
        if raster.is_owned() { "owned" } else { "view" }
    )
}

impl fmt::Display for ImageBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(f, self)
    }
}

impl fmt::Display for ImageView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(f, self)
    }
}

impl fmt::Display for ImageViewMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(f, self)
    }
}

impl fmt::Debug for ImageBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBuffer")
            .field("layout", &self.layout)
            .field("len", &self.data.len())
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for ImageView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageView")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for ImageViewMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageViewMut")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: usize, height: usize, channels: usize) -> ImageBuffer {
        let values: Vec<u8> = (0..width * height * channels)
            .map(|v| u8::try_from(v % 256).unwrap())
            .collect();
        ImageBuffer::from_vec(width, height, channels, values).unwrap()
    }

    #[test]
    fn owned_buffer_basics() {
        let buf = ImageBuffer::new(4, 3, 2, ElementType::F32);
        assert!(buf.is_valid());
        assert!(buf.is_contiguous());
        assert_eq!(buf.row_stride(), 32);
        assert_eq!(buf.to_string(), "ImageBuffer(4x3x2, float, owned)");
        assert_eq!(ImageBuffer::default().to_string(), "ImageBuffer(invalid)");
        assert!(!ImageBuffer::default().is_valid());
    }

    #[test]
    fn typed_access_checks_type_and_bounds() {
        let mut buf = ImageBuffer::new(2, 2, 1, ElementType::I16);
        buf.set::<i16>(1, 1, 0, -7).unwrap();
        assert_eq!(buf.get::<i16>(1, 1, 0).unwrap(), -7);
        assert_eq!(buf.value_f64(1, 1, 0).unwrap(), -7.0);
        assert!(matches!(
            buf.get::<u8>(0, 0, 0),
            Err(Error::ElementType { .. })
        ));
        assert!(matches!(buf.get::<i16>(2, 0, 0), Err(Error::OutOfRange(_))));
    }

    #[test]
    fn roi_shares_memory() {
        let mut buf = ramp(4, 4, 1);
        {
            let mut roi = buf.roi_mut(Roi::new(1, 1, 2, 2)).unwrap();
            assert!(!roi.is_contiguous());
            assert_eq!(roi.to_string(), "ImageBuffer(2x2x1, uint8, view)");
            roi.set::<u8>(0, 0, 0, 200).unwrap();
        }
        assert_eq!(buf.get::<u8>(1, 1, 0).unwrap(), 200);

        let view = buf.roi(Roi::new(2, 1, 2, 3)).unwrap();
        assert_eq!(view.get::<u8>(0, 0, 0).unwrap(), 6);
        assert!(buf.roi(Roi::new(3, 3, 2, 1)).is_err());
        assert!(buf.roi(Roi::new(0, 0, 0, 1)).is_err());

        let copy = view.deep_copy();
        assert!(copy.is_contiguous());
        assert_eq!(copy.to_vec::<u8>().unwrap(), vec![6, 7, 10, 11, 14, 15]);
    }

    #[test]
    fn strided_views_over_foreign_memory() {
        // Two channels of which only the first is viewed, rows padded by 2 bytes.
        let data: Vec<u8> = vec![1, 0, 2, 0, 9, 9, 3, 0, 4, 0, 9, 9];
        let layout = Layout {
            width: 2,
            height: 2,
            channels: 1,
            element_type: ElementType::U8,
            row_stride: 6,
            pixel_stride: 2,
        };
        let view = ImageView::from_raw(&data, layout).unwrap();
        assert_eq!(view.to_vec::<u8>().unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(view.row_bytes(1).unwrap(), &[3, 0, 4]);

        let bad = Layout {
            row_stride: 3,
            ..layout
        };
        assert!(ImageView::from_raw(&data, bad).is_err());
        assert!(ImageView::from_raw(&data[..8], layout).is_err());
    }

    #[test]
    fn swap_channels_in_place() {
        let mut buf = ImageBuffer::from_vec(2, 1, 3, vec![1_u16, 2, 3, 4, 5, 6]).unwrap();
        buf.swap_channels(0, 2).unwrap();
        assert_eq!(buf.to_vec::<u16>().unwrap(), vec![3, 2, 1, 6, 5, 4]);
        buf.swap_channels(1, 1).unwrap();
        assert!(buf.swap_channels(0, 3).is_err());
    }

    #[test]
    fn pixelate_uses_block_centers() {
        let mut buf = ramp(5, 1, 1);
        buf.pixelate(2, 1, None).unwrap();
        // Two blocks, the remainder of one column goes to the last block.
        assert_eq!(buf.to_vec::<u8>().unwrap(), vec![1, 1, 3, 3, 3]);

        let mut buf = ramp(4, 4, 1);
        buf.pixelate(2, 2, Some(Roi::new(2, 2, 2, 2))).unwrap();
        let values = buf.to_vec::<u8>().unwrap();
        assert_eq!(&values[..10], &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(&values[10..12], &[15, 15]);
        assert_eq!(&values[14..16], &[15, 15]);
    }

    #[test]
    fn block_size_distribution() {
        assert_eq!(block_sizes(10, 3), vec![3, 3, 4]);
        assert_eq!(block_sizes(11, 3), vec![4, 3, 4]);
        assert_eq!(block_sizes(5, 3), vec![5]);
        assert_eq!(block_sizes(2, 3), Vec::<usize>::new());
    }

    #[test]
    fn fill_and_filled() {
        let buf = ImageBuffer::filled(2, 2, 1, ElementType::F64, 0.5);
        assert_eq!(buf.to_vec::<f64>().unwrap(), vec![0.5; 4]);
        let mut buf = ImageBuffer::new(2, 1, 3, ElementType::U8);
        buf.fill_pixel(&[1.0, 2.0, 300.0]).unwrap();
        assert_eq!(buf.to_vec::<u8>().unwrap(), vec![1, 2, 255, 1, 2, 255]);
        assert!(buf.fill_pixel(&[1.0]).is_err());
    }
}
