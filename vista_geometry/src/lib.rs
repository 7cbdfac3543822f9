// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=vista_geometry --heading-base-level=0

//! Vista Geometry: shapes and placement for 2D overlays.
//!
//! Floating point 2D points and vectors are [`kurbo::Point`] and
//! [`kurbo::Vec2`]. This crate adds what overlays need on top of them:
//!
//! - [`Rect`]: a possibly rotated, possibly rounded rectangle given by its
//!   center and size.
//! - [`Ellipse`]: an ellipse or elliptic arc.
//! - [`Anchor`], [`HorizontalAlignment`], [`VerticalAlignment`] and
//!   [`LabelPosition`]: how text, images and labels are placed relative to a
//!   reference point.
//! - [`Vec2i`], [`Vec3d`] and [`Mat3`] for canvas sizes and pinhole camera math.
//!
//! ```
//! use vista_geometry::{Anchor, Rect};
//!
//! let r = Rect::from_ltwh(10.0, 20.0, 100.0, 50.0);
//! assert_eq!(r.center(), kurbo::Point::new(60.0, 45.0));
//! assert_eq!("bottom-left".parse::<Anchor>().unwrap(), Anchor::BottomLeft);
//! ```

#![deny(unsafe_code)]

mod ellipse;
mod positioning;
mod rect;
mod vector;

pub use ellipse::Ellipse;
pub use positioning::{Anchor, HorizontalAlignment, LabelPosition, VerticalAlignment};
pub use rect::Rect;
pub use vector::{Mat3, Vec2i, Vec3d};

pub use kurbo::{Point, Vec2};

use thiserror::Error;

/// A string did not name a known variant of an enumeration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("cannot parse {kind} from \"{value}\"")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    /// Create an error for `value`, which should have named a `kind`.
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Lowercase and strip whitespace, `-` and `_`, used to compare enum names
/// leniently.
pub fn canonical_name(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}
