// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=vista_style --heading-base-level=0

//! Vista Style: how lines, arrows, text, markers and bounding boxes look.
//!
//! Styles are plain value types with public fields and a `Default` that holds
//! the library-wide preset. Their geometry helpers tell the drawing code how
//! far a stroke extends past the underlying path:
//!
//! - [`cap_offset`]: how far a line cap extends a line's start and end,
//! - [`join_offset`]: how far a join extends past the corner point, taking the
//!   miter limit into account (a miter exceeding it falls back to a bevel),
//! - [`ArrowStyle::tip_offset`]: where to move an arrow's apex so the stroked
//!   tip ends exactly at the target point.
//!
//! ```
//! use vista_style::{ArrowStyle, StrokeGeometry};
//!
//! let arrow = ArrowStyle::default();
//! // Tip length 0.1 is relative to the shaft.
//! assert!((arrow.tip_length_for_shaft(200.0) - 20.0).abs() < 1e-9);
//! assert!(arrow.tip_offset(10.0) > arrow.line.width / 2.0);
//! ```

#![deny(unsafe_code)]

mod arrow;
mod bbox;
mod line;
mod marker;
mod text;

pub use arrow::ArrowStyle;
pub use bbox::BoundingBox2DStyle;
pub use line::{
    DEFAULT_MITER_LIMIT, LineCap, LineJoin, LineStyle, StrokeGeometry, cap_offset, join_offset,
};
pub use marker::{Marker, MarkerStyle};
pub use text::TextStyle;

/// Tolerance for comparing style parameters.
const EPSILON: f64 = 1e-9;

fn eps_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON
}
