// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=vista_color --heading-base-level=0

//! Vista Color: RGBA colors for 2D visualization.
//!
//! [`Color`] stores red, green, blue and alpha as `f64` in `[0, 1]`. Every
//! constructor and every arithmetic operator saturates, so a `Color` value is
//! always a real, drawable color.
//!
//! Drawing APIs that need "no color" or "the same color as the outline" take a
//! [`ColorChoice`] instead of overloading special numeric values:
//!
//! ```
//! use vista_color::{Color, ColorChoice, NamedColor};
//!
//! let outline = Color::from(NamedColor::NavyBlue);
//! let fill: ColorChoice = "same!40".parse().unwrap();
//! assert_eq!(fill.resolve(outline), Some(outline.with_alpha(0.4)));
//! ```
//!
//! Colors can be created from a compact string specification:
//! - a named color, `"forest-green"`, optionally with an alpha suffix in
//!   percent, `"forest-green!50"`,
//! - a complementary color by prefixing `!` or `-`, `"!blue"` (yellow),
//! - a web code, `"#00ff00"` or `"#00ff0080"`.

#![deny(unsafe_code)]

mod choice;
mod color;
mod fade;
mod named;

pub use choice::ColorChoice;
pub use color::{Color, rgba};
pub use fade::{fade_out_linear, fade_out_logarithmic, fade_out_quadratic};
pub use named::NamedColor;

use thiserror::Error;

/// Errors produced while parsing a color specification.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseColorError {
    /// The name part does not match any [`NamedColor`].
    #[error("could not look up a named color for \"{0}\"")]
    UnknownName(String),
    /// The `!NN` alpha suffix is not an integer percentage in `[0, 100]`.
    #[error("alpha in \"{0}\" must be an integer within [0, 100]")]
    InvalidAlpha(String),
    /// A web code must be `#` followed by 6 or 8 hexadecimal digits.
    #[error("web color code must be '#' followed by 6 or 8 hex digits, got \"{0}\"")]
    InvalidHexCode(String),
}
