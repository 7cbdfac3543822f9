// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! PNG and JPEG files through the `image` crate.

use std::path::Path;

use image::{ColorType, ImageFormat};

use crate::buffer::{ImageBuffer, Raster};
use crate::{ElementType, Error, Result};

/// Load an 8-bit image.
///
/// With `force_channels == None`, grayscale files load as 1 channel, color
/// files as 3 and files with transparency as 4 channels. Otherwise the
/// result has the requested number of channels (1, 3 or 4).
pub fn load_image_u8(path: impl AsRef<Path>, force_channels: Option<usize>) -> Result<ImageBuffer> {
    let path = path.as_ref();
    let decoded = image::open(path)?;
    let channels = match force_channels {
        Some(c @ (1 | 3 | 4)) => c,
        Some(c) => {
            return Err(Error::InvalidArgument(format!(
                "cannot load an image with {c} channels, use 1, 3 or 4"
            )));
        }
        None => match decoded.color() {
            ColorType::L8 | ColorType::L16 => 1,
            color if color.has_alpha() => 4,
            _ => 3,
        },
    };
    log::debug!(
        "loaded {} ({}x{}, {:?}) as {channels} channel(s)",
        path.display(),
        decoded.width(),
        decoded.height(),
        decoded.color()
    );
    let (width, height) = (decoded.width() as usize, decoded.height() as usize);
    let data = match channels {
        1 => decoded.into_luma8().into_raw(),
        3 => decoded.into_rgb8().into_raw(),
        _ => decoded.into_rgba8().into_raw(),
    };
    ImageBuffer::from_bytes(width, height, channels, ElementType::U8, data)
}

/// Save a 1-, 3- or 4-channel 8-bit image as PNG or JPEG, chosen by the file
/// extension. JPEG files drop the alpha channel.
pub fn save_image_u8(path: impl AsRef<Path>, buffer: &impl Raster) -> Result<()> {
    let path = path.as_ref();
    if !buffer.is_valid() {
        return Err(Error::InvalidBuffer("save_image_u8"));
    }
    if buffer.element_type() != ElementType::U8 {
        return Err(Error::ElementType {
            expected: ElementType::U8,
            requested: buffer.element_type(),
        });
    }
    let format = match ImageFormat::from_path(path) {
        Ok(format @ (ImageFormat::Png | ImageFormat::Jpeg)) => format,
        _ => {
            return Err(Error::InvalidArgument(format!(
                "only PNG and JPEG output is supported, cannot save {}",
                path.display()
            )));
        }
    };
    let pixels = match (format, buffer.channels()) {
        (ImageFormat::Jpeg, 4) => buffer.to_channels(3)?,
        (_, 1 | 3 | 4) => buffer.deep_copy(),
        (_, c) => {
            return Err(Error::InvalidArgument(format!(
                "cannot save an image with {c} channels"
            )));
        }
    };
    let width = u32::try_from(pixels.width())
        .map_err(|_| Error::InvalidArgument(format!("image width {} is too large", pixels.width())))?;
    let height = u32::try_from(pixels.height())
        .map_err(|_| Error::InvalidArgument(format!("image height {} is too large", pixels.height())))?;
    let color = match pixels.channels() {
        1 => ColorType::L8,
        3 => ColorType::Rgb8,
        _ => ColorType::Rgba8,
    };
    log::debug!("saving {pixels} to {}", path.display());
    image::save_buffer_with_format(path, pixels.data(), width, height, color, format)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RasterMut;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("vista_raster_{}_{name}", std::process::id()))
    }

    #[test]
    fn png_round_trip() {
        let mut img = ImageBuffer::new(3, 2, 4, ElementType::U8);
        img.fill_pixel(&[10.0, 20.0, 30.0, 128.0]).unwrap();
        img.set::<u8>(2, 1, 0, 250).unwrap();
        let path = temp_path("round_trip.png");
        save_image_u8(&path, &img).unwrap();

        let loaded = load_image_u8(&path, None).unwrap();
        assert_eq!(loaded.channels(), 4);
        assert_eq!(loaded.to_vec::<u8>().unwrap(), img.to_vec::<u8>().unwrap());

        let gray = load_image_u8(&path, Some(1)).unwrap();
        assert_eq!(gray.channels(), 1);
        assert!(load_image_u8(&path, Some(2)).is_err());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn rejects_unsupported_outputs() {
        let img = ImageBuffer::new(2, 2, 3, ElementType::U8);
        assert!(save_image_u8(temp_path("out.bmp"), &img).is_err());
        let floats = ImageBuffer::new(2, 2, 3, ElementType::F32);
        assert!(matches!(
            save_image_u8(temp_path("out.png"), &floats),
            Err(Error::ElementType { .. })
        ));
        assert!(load_image_u8(temp_path("missing.png"), None).is_err());
    }
}
