// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=vista_colormap --heading-base-level=0

//! Vista Colormap: pseudocoloring of scalar data and optical flow.
//!
//! - [`ColorMap`] names 27 lookup tables of 256 RGB entries each, built once
//!   per process. [`ColorMap::category_color`] cycles through a table to
//!   color object ids.
//! - [`colorize`] maps a single-channel buffer of any element type to colors.
//!   A [`Colorizer`] keeps the configuration for a stream of buffers and can
//!   derive its limits from the data ([`LimitsMode`]).
//! - [`relief_shading`] darkens a colorized image by a relief map, and
//!   [`peaks`] produces a well-known test surface.
//! - [`colorize_optical_flow`] renders a flow field with a color wheel, and
//!   [`load_optical_flow`] / [`save_optical_flow`] handle `.flo` files.
//!
//! ```
//! use vista_colormap::{ColorMap, Colorizer, LimitsMode, peaks};
//! use vista_raster::Raster;
//!
//! let surface = peaks(60, 80);
//! let mut colorizer = Colorizer::from_data(ColorMap::Turbo, LimitsMode::Once)?;
//! let colors = colorizer.colorize(&surface)?;
//! assert_eq!(colors.to_string(), "ImageBuffer(80x60x3, uint8, owned)");
//! // The first buffer fixed the limits.
//! assert_eq!(colorizer.limits_mode(), LimitsMode::Fixed);
//! # Ok::<(), vista_colormap::Error>(())
//! ```

#![deny(unsafe_code)]

mod colorize;
mod colormap;
mod flow;
mod tables;

pub use colorize::{Colorizer, LimitsMode, colorize, peaks, relief_shading};
pub use colormap::{ColorMap, category_color};
pub use flow::{FLO_MAGIC, colorize_optical_flow, load_optical_flow, save_optical_flow};

use std::path::PathBuf;

use thiserror::Error;

/// Errors of colorization and flow file handling.
#[derive(Debug, Error)]
pub enum Error {
    /// A color map name that matches no [`ColorMap`].
    #[error("unknown color map \"{0}\"")]
    UnknownColorMap(String),
    /// A caller-correctable argument problem.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A buffer operation failed.
    #[error(transparent)]
    Raster(#[from] vista_raster::Error),
    /// Reading or writing a file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A `.flo` file with a wrong magic number or truncated content.
    #[error("invalid optical flow file {}: {reason}", path.display())]
    InvalidFlowFile {
        /// The offending file.
        path: PathBuf,
        /// What is wrong with it.
        reason: String,
    },
}

/// Result type of this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
