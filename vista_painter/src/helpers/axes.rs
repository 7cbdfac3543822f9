// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};
use log::debug;
use vista_color::Color;
use vista_geometry::{Mat3, Vec3d};
use vista_imaging::ImagingBackend;
use vista_style::{ArrowStyle, LineStyle};

use super::arrow::draw_arrow;
use super::shapes::draw_line;
use crate::{Error, Result};

/// A calibrated pinhole camera: intrinsics `k` and the extrinsics `r`, `t`
/// mapping world to camera coordinates as `r * X + t`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CameraPose {
    /// Intrinsics.
    pub k: Mat3,
    /// Rotation from world to camera coordinates.
    pub r: Mat3,
    /// Translation from world to camera coordinates.
    pub t: Vec3d,
}

impl CameraPose {
    /// A camera with the given intrinsics and extrinsics.
    pub fn new(k: Mat3, r: Mat3, t: Vec3d) -> Self {
        Self { k, r, t }
    }

    /// World point in camera coordinates.
    pub fn to_camera(&self, world: Vec3d) -> Vec3d {
        self.r * world + self.t
    }

    /// Returns `true` if the world point lies in front of the image plane.
    pub fn is_in_front(&self, world: Vec3d) -> bool {
        self.to_camera(world).z > 0.0
    }

    /// Pixel position of a world point.
    pub fn project(&self, world: Vec3d) -> Point {
        (self.k * self.to_camera(world)).dehomogenize()
    }

    /// The part of the horizon visible in an image of `image_size`.
    ///
    /// The horizon is the vanishing line of the world ground plane `z = 0`,
    /// the line through the vanishing points of the world x and y axes.
    /// Returns `None` if the camera looks straight up or down, or if the
    /// horizon misses the image.
    pub fn horizon(&self, image_size: Vec2) -> Option<(Point, Point)> {
        let vanishing_x = self.k * (self.r * Vec3d::new(1.0, 0.0, 0.0));
        let vanishing_y = self.k * (self.r * Vec3d::new(0.0, 1.0, 0.0));
        let line = vanishing_x.cross(vanishing_y);
        let (a, b, c) = (line.x, line.y, line.z);
        if a.hypot(b) <= 1e-12 * line.length() {
            return None;
        }
        // Two points of a*x + b*y + c = 0 spanning the image.
        let (from, to) = if b.abs() >= a.abs() {
            (
                Point::new(0.0, -c / b),
                Point::new(image_size.x, -(c + a * image_size.x) / b),
            )
        } else {
            (
                Point::new(-c / a, 0.0),
                Point::new(-(c + b * image_size.y) / a, image_size.y),
            )
        };
        clip_to_image(from, to, image_size)
    }
}

/// Image positions of a projected coordinate system.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AxesProjection {
    /// Whether any part of the axes can be seen.
    pub visible: bool,
    /// Projected origin.
    pub origin: Point,
    /// Projected tip of the x axis.
    pub x: Point,
    /// Projected tip of the y axis.
    pub y: Point,
    /// Projected tip of the z axis.
    pub z: Point,
}

/// Project the axes of a world coordinate system into the image and draw
/// them as arrows.
///
/// `lengths` are the (signed) lengths of the x, y and z axes in world
/// units. An axis with a `None` color is projected but not drawn. If the
/// origin is in front of the camera but a tip is not, the axis is cut at
/// half the distance between the origin and the image plane. Axes are only
/// drawn when the origin is in front of the camera; they are visible if
/// additionally the origin or a tip projects into an image of `image_size`.
pub fn draw_xyz_axes<B: ImagingBackend>(
    backend: &mut B,
    camera: &CameraPose,
    origin: Vec3d,
    lengths: Vec3d,
    style: &ArrowStyle,
    colors: [Option<Color>; 3],
    image_size: Vec2,
) -> Result<AxesProjection> {
    if !style.is_valid() {
        return Err(Error::InvalidArgument(format!(
            "cannot draw axes with invalid arrow style {style}"
        )));
    }
    let origin_in_front = camera.is_in_front(origin);
    let tips = [
        origin + Vec3d::new(lengths.x, 0.0, 0.0),
        origin + Vec3d::new(0.0, lengths.y, 0.0),
        origin + Vec3d::new(0.0, 0.0, lengths.z),
    ]
    .map(|tip| {
        if origin_in_front && !camera.is_in_front(tip) {
            clip_to_front(camera, origin, tip)
        } else {
            tip
        }
    });

    let projected_origin = camera.project(origin);
    let projected = tips.map(|tip| camera.project(tip));
    let inside = |p: &Point| p.x >= 0.0 && p.x < image_size.x && p.y >= 0.0 && p.y < image_size.y;
    let visible =
        origin_in_front && (inside(&projected_origin) || projected.iter().any(inside));

    if origin_in_front {
        let mut axis_style = style.clone();
        for (tip, color) in projected.iter().zip(colors) {
            if let Some(color) = color {
                axis_style.line.color = color;
                draw_arrow(backend, projected_origin, *tip, &axis_style)?;
            }
        }
    } else {
        debug!("axes origin {origin:?} is behind the camera");
    }

    let [x, y, z] = projected;
    Ok(AxesProjection {
        visible,
        origin: projected_origin,
        x,
        y,
        z,
    })
}

/// Project the horizon of `camera` and draw the visible part of it.
///
/// Returns the drawn segment, or `None` if the horizon is not visible.
pub fn draw_horizon_line<B: ImagingBackend>(
    backend: &mut B,
    camera: &CameraPose,
    line: &LineStyle,
    image_size: Vec2,
) -> Result<Option<(Point, Point)>> {
    let Some((from, to)) = camera.horizon(image_size) else {
        debug!("horizon is not visible in a {}x{} image", image_size.x, image_size.y);
        return Ok(None);
    };
    draw_line(backend, from, to, line)?;
    Ok(Some((from, to)))
}

/// Clip the segment `from`-`to` to the image rectangle.
fn clip_to_image(from: Point, to: Point, image_size: Vec2) -> Option<(Point, Point)> {
    let delta = to - from;
    let (mut enter, mut leave) = (0.0_f64, 1.0_f64);
    let bounds = [
        (-delta.x, from.x),
        (delta.x, image_size.x - from.x),
        (-delta.y, from.y),
        (delta.y, image_size.y - from.y),
    ];
    for (direction, distance) in bounds {
        if direction == 0.0 {
            if distance < 0.0 {
                return None;
            }
        } else if direction < 0.0 {
            enter = enter.max(distance / direction);
        } else {
            leave = leave.min(distance / direction);
        }
    }
    (enter < leave).then(|| (from + delta * enter, from + delta * leave))
}

/// The point halfway between `origin` and where the segment towards `tip`
/// crosses the image plane.
fn clip_to_front(camera: &CameraPose, origin: Vec3d, tip: Vec3d) -> Vec3d {
    let z_origin = camera.to_camera(origin).z;
    let z_tip = camera.to_camera(tip).z;
    let crossing = z_origin / (z_origin - z_tip);
    origin + (tip - origin) * (crossing / 2.0)
}
