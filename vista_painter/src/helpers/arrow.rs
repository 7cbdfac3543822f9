// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{BezPath, Point, Vec2};
use vista_imaging::{ImagingBackend, ImagingBackendExt, PathDesc};
use vista_style::{ArrowStyle, DEFAULT_MITER_LIMIT};

use super::{HALF_PIXEL, check_line_style, solid};
use crate::{Error, Result};

/// Draw an arrow from `from` to `to`.
///
/// The apex of the stroked tip lands on `to`: the line end is pulled back by
/// how far the tip join extends past the corner. Closed tips are filled
/// triangles with the shaft ending at their base. Dashes only apply to the
/// shaft; tips are always drawn solid.
pub fn draw_arrow<B: ImagingBackend>(
    backend: &mut B,
    from: Point,
    to: Point,
    style: &ArrowStyle,
) -> Result<()> {
    check_line_style(&style.line, "an arrow")?;
    if !style.is_valid() {
        return Err(Error::InvalidArgument(format!(
            "invalid arrow tip (length {}, angle {})",
            style.tip_length, style.tip_angle
        )));
    }

    let mut from = from + HALF_PIXEL;
    let mut to = to + HALF_PIXEL;
    let offset = style.tip_offset(DEFAULT_MITER_LIMIT);
    to += offset * unit(from - to);
    if style.double_headed {
        from += offset * unit(to - from);
    }

    let back = from - to;
    let theta = back.y.atan2(back.x);
    let tip_length = style.tip_length_for_points(from, to);
    let alpha = style.tip_angle.to_radians();
    let dir_a = tip_length * Vec2::new((theta + alpha).cos(), (theta + alpha).sin());
    let dir_b = tip_length * Vec2::new((theta - alpha).cos(), (theta - alpha).sin());

    let mut heads = vec![Tip::new(to, dir_a, dir_b, from)];
    if style.double_headed {
        heads.push(Tip::new(from, -dir_a, -dir_b, to));
    }

    let tip_stroke = style.line.to_solid_stroke();
    let paint = solid(style.line.color);
    let (mut shaft_from, mut shaft_to) = (from, to);
    for (i, tip) in heads.iter().enumerate() {
        if style.tip_closed {
            backend.fill_path_with(tip.closed_path(), paint.clone());
            backend.stroke_path_with(tip.closed_path(), &tip_stroke, paint.clone());
            if i == 0 {
                shaft_to = tip.base;
            } else {
                shaft_from = tip.base;
            }
        } else {
            backend.stroke_path_with(tip.open_path(), &tip_stroke, paint.clone());
        }
    }

    backend.stroke_path_with(
        PathDesc::polyline([shaft_from, shaft_to], false),
        &style.line.to_stroke(),
        paint,
    );
    Ok(())
}

/// One arrow head: apex, the two tip line ends, and the foot of the tip line
/// ends on the shaft.
struct Tip {
    apex: Point,
    a: Point,
    b: Point,
    base: Point,
}

impl Tip {
    fn new(apex: Point, dir_a: Vec2, dir_b: Vec2, tail: Point) -> Self {
        let a = apex + dir_a;
        let shaft = unit(tail - apex);
        Self {
            apex,
            a,
            b: apex + dir_b,
            base: apex + shaft * dir_a.dot(shaft),
        }
    }

    fn open_path(&self) -> PathDesc {
        PathDesc::polyline([self.a, self.apex, self.b], false)
    }

    fn closed_path(&self) -> PathDesc {
        let mut path = BezPath::new();
        path.move_to(self.base);
        path.line_to(self.a);
        path.line_to(self.apex);
        path.line_to(self.b);
        path.line_to(self.base);
        path.close_path();
        PathDesc::from(&path)
    }
}

fn unit(v: Vec2) -> Vec2 {
    let length = v.hypot();
    if length > 0.0 { v / length } else { Vec2::ZERO }
}
