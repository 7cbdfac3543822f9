// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, RoundedRect, Vec2};
use vista_geometry::Anchor;
use vista_imaging::{
    ClipShape, DrawOp, ImageAlphaType, ImageDesc, ImageQuality, ImageSampler, ImagingBackend,
    ImagingBackendExt, PathDesc, clip_shape_to_bez_path,
};
use vista_raster::Raster;
use vista_style::LineStyle;

use super::solid;
use crate::{Error, Result};

/// Where and how to draw an image onto the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct ImagePlacement {
    /// The point the anchor of the (scaled) image is placed at.
    pub position: Point,
    /// Which point of the image lands on `position`. Rotation is about
    /// this point as well.
    pub anchor: Anchor,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
    /// Horizontal scaling factor.
    pub scale_x: f64,
    /// Vertical scaling factor.
    pub scale_y: f64,
    /// Clockwise rotation in degrees.
    pub rotation: f64,
    /// Above `0.5`, the image is clipped to its inscribed ellipse; above
    /// `0`, to a rounded rectangle with this fraction of the shorter side as
    /// corner radius.
    pub clip_factor: f64,
    /// Contour along the (clipped) image border.
    pub contour: Option<LineStyle>,
}

impl ImagePlacement {
    /// An unscaled, opaque image with its top-left corner at `position`.
    pub fn at(position: Point) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Returns this placement with another anchor.
    #[must_use]
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Returns this placement with uniform scaling.
    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale_x = scale;
        self.scale_y = scale;
        self
    }
}

impl Default for ImagePlacement {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            anchor: Anchor::TopLeft,
            alpha: 1.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            clip_factor: 0.0,
            contour: None,
        }
    }
}

/// Draw `image` (1, 3 or 4 channels of any element type) as placed.
///
/// The image is converted to RGBA8 first. Fully transparent placements
/// draw nothing.
pub fn draw_image<B: ImagingBackend>(
    backend: &mut B,
    image: &impl Raster,
    placement: &ImagePlacement,
) -> Result<()> {
    if !image.is_valid() {
        return Err(Error::InvalidArgument("cannot draw an invalid image".into()));
    }
    if !(placement.scale_x > 0.0 && placement.scale_y > 0.0) {
        return Err(Error::InvalidArgument(format!(
            "image scale must be > 0, got ({}, {})",
            placement.scale_x, placement.scale_y
        )));
    }
    if placement.alpha <= 0.0 {
        return Ok(());
    }
    let rgba = image.to_u8(4)?;
    let desc = ImageDesc {
        width: pixel_dim(rgba.width())?,
        height: pixel_dim(rgba.height())?,
        alpha_type: ImageAlphaType::Alpha,
    };
    let id = backend.create_image(desc, rgba.data());

    #[allow(clippy::cast_precision_loss, reason = "image sizes are far below 2^52")]
    let size = Vec2::new(rgba.width() as f64, rgba.height() as f64);
    let offset = Vec2::new(
        -placement.anchor.horizontal().factor() * size.x,
        -placement.anchor.vertical().factor() * size.y,
    );
    let bounds = kurbo::Rect::from_origin_size(offset.to_point(), size.to_size());
    let clip = clip_shape(bounds, placement.clip_factor);
    let frame = Affine::translate(placement.position.to_vec2())
        * Affine::rotate(placement.rotation.to_radians())
        * Affine::scale_non_uniform(placement.scale_x, placement.scale_y);
    let sampler = ImageSampler {
        quality: ImageQuality::Low,
        ..ImageSampler::default()
    };

    #[allow(clippy::cast_possible_truncation, reason = "opacity only needs f32 precision")]
    let alpha = placement.alpha.min(1.0) as f32;
    backend.with_transform(frame, |b| {
        let draw = |b: &mut B| {
            b.draw(DrawOp::DrawImage {
                image: id,
                transform: Affine::translate(offset),
                sampler,
            });
        };
        let clipped = |b: &mut B| match &clip {
            Some(shape) => b.with_clip(shape.clone(), draw),
            None => draw(b),
        };
        if alpha < 1.0 {
            b.with_opacity_layer(alpha, clipped);
        } else {
            clipped(b);
        }

        if let Some(line) = placement.contour.as_ref().filter(|l| l.is_valid()) {
            let outline = clip.unwrap_or(ClipShape::Rect(bounds));
            let stroke_width = line.width / placement.scale_x.max(placement.scale_y);
            if let Some(path) = clip_shape_to_bez_path(&outline, |_| None) {
                b.stroke_path_with(
                    PathDesc::from(&path),
                    &line.clone().with_width(stroke_width).to_stroke(),
                    solid(line.color),
                );
            }
        }
    });
    backend.destroy_image(id);
    Ok(())
}

fn clip_shape(bounds: kurbo::Rect, clip_factor: f64) -> Option<ClipShape> {
    if clip_factor > 0.5 {
        Some(ClipShape::Ellipse(kurbo::Ellipse::from_rect(bounds)))
    } else if clip_factor > 0.0 {
        let radius = clip_factor * bounds.width().min(bounds.height());
        Some(ClipShape::RoundedRect(RoundedRect::from_rect(bounds, radius)))
    } else {
        None
    }
}

fn pixel_dim(extent: usize) -> Result<u32> {
    u32::try_from(extent)
        .map_err(|_| Error::InvalidArgument(format!("image extent {extent} is too large")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vista_color::Color;
    use vista_imaging::{ImagingOp, StateOp};
    use vista_imaging_ref::RefBackend;
    use vista_raster::{ElementType, ImageBuffer};

    fn gray(width: usize, height: usize) -> ImageBuffer {
        ImageBuffer::filled(width, height, 1, ElementType::U8, 128.0)
    }

    #[test]
    fn centered_images_are_offset_by_half_their_size() {
        let mut backend = RefBackend::default();
        let placement = ImagePlacement::at(Point::new(50.0, 40.0))
            .with_anchor(Anchor::Center)
            .with_scale(2.0);
        draw_image(&mut backend, &gray(10, 6), &placement).unwrap();

        let draw = backend.draws().next().expect("one draw");
        let DrawOp::DrawImage { transform, .. } = draw.op else {
            panic!("expected an image draw, got {:?}", draw.op);
        };
        assert_eq!(*transform, Affine::translate((-5.0, -3.0)));
        assert_eq!(
            draw.state.transform,
            Affine::translate((50.0, 40.0)) * Affine::scale(2.0)
        );
        assert!(backend.is_balanced());
        assert_eq!(backend.live_resources(), 0);
    }

    #[test]
    fn clip_factor_selects_the_clip_shape() {
        let bounds = kurbo::Rect::new(0.0, 0.0, 40.0, 20.0);
        assert_eq!(clip_shape(bounds, 0.0), None);
        let Some(ClipShape::RoundedRect(rounded)) = clip_shape(bounds, 0.25) else {
            panic!("expected a rounded rectangle");
        };
        assert_eq!(rounded.radii().top_left, 5.0);
        assert!(matches!(clip_shape(bounds, 1.0), Some(ClipShape::Ellipse(_))));
    }

    #[test]
    fn translucent_clipped_images_nest_their_layers() {
        let mut backend = RefBackend::default();
        let placement = ImagePlacement {
            alpha: 0.5,
            clip_factor: 1.0,
            contour: Some(LineStyle::new(4.0, Color::RED)),
            ..ImagePlacement::at(Point::ZERO).with_scale(2.0)
        };
        draw_image(&mut backend, &gray(8, 8), &placement).unwrap();

        let pushes = backend
            .ops()
            .iter()
            .filter(|op| matches!(op, ImagingOp::State(StateOp::PushLayer(_))))
            .count();
        assert_eq!(pushes, 2, "opacity and clip layers");
        let stroke = backend.draws().last().unwrap().state.stroke.clone().unwrap();
        assert_eq!(stroke.width, 2.0, "contour width is not scaled with the image");
        assert!(backend.is_balanced());
    }

    #[test]
    fn invisible_and_invalid_images() {
        let mut backend = RefBackend::default();
        let hidden = ImagePlacement {
            alpha: 0.0,
            ..ImagePlacement::default()
        };
        draw_image(&mut backend, &gray(2, 2), &hidden).unwrap();
        assert!(backend.events().is_empty());
        assert!(draw_image(&mut backend, &ImageBuffer::default(), &ImagePlacement::default()).is_err());
        let flat = ImagePlacement {
            scale_y: 0.0,
            ..ImagePlacement::default()
        };
        assert!(draw_image(&mut backend, &gray(2, 2), &flat).is_err());
    }
}
