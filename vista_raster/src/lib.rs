// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=vista_raster --heading-base-level=0

//! Vista Raster: multi-channel image buffers with explicit ownership.
//!
//! Pixels are stored row-major and interleaved, with one of nine element
//! types ([`ElementType`]). Three types give access to them:
//!
//! - [`ImageBuffer`] exclusively owns contiguous memory. Its default value
//!   is the *invalid* buffer without pixels.
//! - [`ImageView`] borrows pixels owned elsewhere, with arbitrary row and
//!   pixel strides. Regions of interest ([`Raster::roi`]) are views.
//! - [`ImageViewMut`] borrows pixels mutably; in-place operations such as
//!   [`RasterMut::swap_channels`] or [`RasterMut::pixelate`] modify the
//!   owner's memory. The borrow checker keeps the owner from being used
//!   while such a view is alive.
//!
//! Read access is shared through the [`Raster`] trait and write access
//! through [`RasterMut`]. Every conversion returns a new [`ImageBuffer`]
//! that never aliases its source.
//!
//! ```
//! use vista_raster::{ImageBuffer, Raster, RasterMut, Roi};
//!
//! let mut rgb = ImageBuffer::from_vec(2, 2, 3, vec![
//!     255_u8, 0, 0,   0, 255, 0,
//!     0, 0, 255,      255, 255, 255,
//! ])?;
//!
//! // Swap red and blue of the bottom row only.
//! rgb.roi_mut(Roi::new(0, 1, 2, 1))?.swap_channels(0, 2)?;
//! assert_eq!(rgb.get::<u8>(0, 1, 0)?, 255);
//!
//! let rgba = rgb.to_channels(4)?;
//! assert_eq!(rgba.to_string(), "ImageBuffer(2x2x4, uint8, owned)");
//! # Ok::<(), vista_raster::Error>(())
//! ```
//!
//! With the `codec` feature (on by default), [`load_image_u8`] and
//! [`save_image_u8`] read and write PNG and JPEG files.

#![deny(unsafe_code)]

mod buffer;
#[cfg(feature = "codec")]
mod codec;
mod colorspace;
mod convert;
mod element;

pub use buffer::{ImageBuffer, ImageView, ImageViewMut, Layout, Raster, RasterMut, Roi};
#[cfg(feature = "codec")]
pub use codec::{load_image_u8, save_image_u8};
pub use colorspace::{LUMA_WEIGHTS, hsv_to_rgb_f64, luminance, rgb_to_hsv_f64};
pub use convert::MinMaxLocation;
pub use element::{Element, ElementType};

use thiserror::Error;

/// Errors of buffer operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-correctable argument problem.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The operation needs pixels, but the buffer has none.
    #[error("cannot apply `{0}` to an invalid buffer")]
    InvalidBuffer(&'static str),
    /// A pixel or region lies outside the buffer.
    #[error("out of range: {0}")]
    OutOfRange(String),
    /// Typed access with a type that does not match the buffer.
    #[error("buffer stores {expected} elements, but {requested} was requested")]
    ElementType {
        /// Element type of the buffer.
        expected: ElementType,
        /// Type used for the access.
        requested: ElementType,
    },
    /// Decoding or encoding an image file failed.
    #[cfg(feature = "codec")]
    #[error(transparent)]
    Codec(#[from] image::ImageError),
}

/// Result type of this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
