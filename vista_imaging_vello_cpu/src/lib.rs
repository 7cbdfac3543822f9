// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=vista_imaging_vello_cpu --heading-base-level=0

//! Vello CPU–backed implementation of the imaging backend.
//!
//! [`VelloCpuImagingBackend`] implements [`ImagingBackend`] on top of the
//! sparse-strips [`vello_cpu::RenderContext`]. [`render_rgba8`] wraps the
//! whole cycle of creating a context, issuing ops and reading the pixels
//! back as straight-alpha RGBA8.
//!
//! ```
//! use kurbo::Rect;
//! use vista_imaging::{DrawOp, ImagingBackend, ImagingBackendExt, PaintDesc};
//!
//! let pixels = vista_imaging_vello_cpu::render_rgba8(4, 4, |backend| {
//!     let red = peniko::Color::from_rgba8(255, 0, 0, 255);
//!     backend.with_paint(PaintDesc::solid(red), |b| {
//!         b.draw(DrawOp::FillRect(Rect::new(0.0, 0.0, 2.0, 4.0)));
//!     });
//! });
//! assert_eq!(&pixels[0..4], &[255, 0, 0, 255]);
//! assert_eq!(&pixels[12..16], &[0, 0, 0, 0]);
//! ```

#![deny(unsafe_code)]

use core::fmt;

use kurbo::{Affine, BezPath, Cap, Join};
use peniko::{Brush, ImageData, ImageFormat};
use vello_cpu::kurbo::{Affine as CpuAffine, Cap as CpuCap, Join as CpuJoin, Stroke};
use vello_cpu::{Image as CpuImage, ImageSource, Pixmap, RenderContext, RenderMode, RenderSettings};
use vista_imaging::{
    DrawOp, ImageDesc, ImageId, ImagingBackend, PaintDesc, PaintId, PathDesc, PathId,
    ResourceBackend, StateOp, StrokeStyle, clip_shape_to_bez_path,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum StackEntry {
    Noop,
    Pushed,
}

/// CPU-backed implementation of the imaging backend using `vello_cpu`.
pub struct VelloCpuImagingBackend<'ctx> {
    /// Underlying Vello CPU render context to draw into.
    pub ctx: &'ctx mut RenderContext,
    paths: Vec<Option<BezPath>>,
    images: Vec<Option<ImageData>>,
    paints: Vec<Option<PaintDesc>>,

    stack: Vec<StackEntry>,
    current_paint: Option<PaintId>,
    current_transform: Affine,
}

impl fmt::Debug for VelloCpuImagingBackend<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VelloCpuImagingBackend")
            .field("layers", &self.stack.len())
            .finish_non_exhaustive()
    }
}

impl<'ctx> VelloCpuImagingBackend<'ctx> {
    /// Create a new backend that renders into the given CPU render context.
    pub fn new(ctx: &'ctx mut RenderContext) -> Self {
        Self {
            ctx,
            paths: Vec::new(),
            images: Vec::new(),
            paints: Vec::new(),
            stack: Vec::new(),
            current_paint: None,
            current_transform: Affine::IDENTITY,
        }
    }

    fn path_to_bez(&self, id: PathId) -> Option<BezPath> {
        self.paths.get(id.0 as usize)?.clone()
    }

    fn affine_to_cpu(xf: Affine) -> CpuAffine {
        CpuAffine::new(xf.as_coeffs())
    }

    fn stroke_to_cpu(style: &StrokeStyle) -> Stroke {
        let mut stroke = Stroke::new(style.width);
        stroke.miter_limit = style.miter_limit;
        stroke.join = match style.join {
            Join::Bevel => CpuJoin::Bevel,
            Join::Miter => CpuJoin::Miter,
            Join::Round => CpuJoin::Round,
        };
        stroke.start_cap = match style.start_cap {
            Cap::Butt => CpuCap::Butt,
            Cap::Round => CpuCap::Round,
            Cap::Square => CpuCap::Square,
        };
        stroke.end_cap = match style.end_cap {
            Cap::Butt => CpuCap::Butt,
            Cap::Round => CpuCap::Round,
            Cap::Square => CpuCap::Square,
        };
        if style.dash_pattern.is_empty() {
            stroke
        } else {
            stroke.with_dashes(style.dash_offset, style.dash_pattern.iter().copied())
        }
    }

    fn apply_current_paint(&mut self) {
        let Some(id) = self.current_paint else {
            return;
        };
        if let Some(Some(PaintDesc { brush })) = self.paints.get(id.0 as usize) {
            match brush.clone() {
                Brush::Solid(color) => self.ctx.set_paint(color),
                Brush::Gradient(gradient) => self.ctx.set_paint(gradient),
                Brush::Image(_) => log::warn!("image brushes are not supported, use DrawImage"),
            }
        }
    }
}

impl ResourceBackend for VelloCpuImagingBackend<'_> {
    fn create_path(&mut self, desc: PathDesc) -> PathId {
        let id = u32::try_from(self.paths.len())
            .expect("VelloCpuImagingBackend: too many paths for u32 PathId");
        self.paths.push(Some(desc.to_bez_path()));
        PathId(id)
    }

    fn destroy_path(&mut self, id: PathId) {
        if let Some(slot) = self.paths.get_mut(id.0 as usize) {
            *slot = None;
        }
    }

    fn create_image(&mut self, desc: ImageDesc, pixels: &[u8]) -> ImageId {
        let id = u32::try_from(self.images.len())
            .expect("VelloCpuImagingBackend: too many images for u32 ImageId");
        let expected = desc.width as usize * desc.height as usize * 4;
        let data = if pixels.len() == expected {
            Some(ImageData {
                data: peniko::Blob::from(pixels.to_vec()),
                format: ImageFormat::Rgba8,
                alpha_type: desc.alpha_type,
                width: desc.width,
                height: desc.height,
            })
        } else {
            log::warn!(
                "ignoring {}x{} image with {} bytes, expected {expected}",
                desc.width,
                desc.height,
                pixels.len()
            );
            None
        };
        self.images.push(data);
        ImageId(id)
    }

    fn destroy_image(&mut self, id: ImageId) {
        if let Some(slot) = self.images.get_mut(id.0 as usize) {
            *slot = None;
        }
    }

    fn create_paint(&mut self, desc: PaintDesc) -> PaintId {
        let id = u32::try_from(self.paints.len())
            .expect("VelloCpuImagingBackend: too many paints for u32 PaintId");
        self.paints.push(Some(desc));
        PaintId(id)
    }

    fn destroy_paint(&mut self, id: PaintId) {
        if let Some(slot) = self.paints.get_mut(id.0 as usize) {
            *slot = None;
        }
    }
}

impl ImagingBackend for VelloCpuImagingBackend<'_> {
    fn state(&mut self, op: StateOp) {
        match op {
            StateOp::SetTransform(xf) => {
                self.current_transform = xf;
                self.ctx.set_transform(Self::affine_to_cpu(xf));
            }
            StateOp::PushLayer(layer) => {
                let clip_path = layer
                    .clip
                    .as_ref()
                    .and_then(|shape| clip_shape_to_bez_path(shape, |id| self.path_to_bez(id)));
                let opacity = layer.opacity.filter(|o| *o < 1.0);
                if clip_path.is_some() || opacity.is_some() {
                    self.ctx
                        .push_layer(clip_path.as_ref(), None, opacity, None, None);
                    self.stack.push(StackEntry::Pushed);
                } else {
                    self.stack.push(StackEntry::Noop);
                }
            }
            StateOp::PopLayer => match self.stack.pop() {
                Some(StackEntry::Noop) => {}
                Some(StackEntry::Pushed) => self.ctx.pop_layer(),
                None => panic!("PopLayer with empty stack"),
            },
            StateOp::SetPaint(id) => {
                self.current_paint = Some(id);
                self.apply_current_paint();
            }
            StateOp::SetStroke(style) => {
                self.ctx.set_stroke(Self::stroke_to_cpu(&style));
            }
        }
    }

    fn draw(&mut self, op: DrawOp) {
        match op {
            DrawOp::FillPath(id) => {
                if let Some(path) = self.path_to_bez(id) {
                    self.ctx.fill_path(&path);
                }
            }
            DrawOp::StrokePath(id) => {
                if let Some(path) = self.path_to_bez(id) {
                    self.ctx.stroke_path(&path);
                }
            }
            DrawOp::FillRect(rect) => self.ctx.fill_rect(&rect),
            DrawOp::StrokeRect(rect) => self.ctx.stroke_rect(&rect),
            DrawOp::DrawImage {
                image,
                transform,
                sampler,
            } => {
                let Some(Some(image_data)) = self.images.get(image.0 as usize) else {
                    return;
                };
                let image_paint = CpuImage {
                    image: ImageSource::from_peniko_image_data(image_data),
                    sampler,
                };
                let rect = kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(image_data.width),
                    f64::from(image_data.height),
                );

                let saved_transform = *self.ctx.transform();
                let saved_paint = self.ctx.paint().clone();

                self.ctx.set_paint(image_paint);
                self.ctx
                    .set_transform(saved_transform * Self::affine_to_cpu(transform));
                self.ctx.fill_rect(&rect);

                self.ctx.set_transform(saved_transform);
                self.ctx.set_paint(saved_paint);
            }
        }
    }

    fn current_transform(&self) -> Affine {
        self.current_transform
    }

    fn layer_depth(&self) -> usize {
        self.stack.len()
    }
}

/// Render with a fresh context of `width` x `height` pixels and return the
/// result as straight-alpha RGBA8, row by row.
///
/// The u8 pipeline is forced so results do not depend on enabled features.
pub fn render_rgba8(
    width: u16,
    height: u16,
    build: impl FnOnce(&mut VelloCpuImagingBackend<'_>),
) -> Vec<u8> {
    let unpremul = render_pixmap(width, height, build).take_unpremultiplied();
    let mut bytes = Vec::with_capacity(unpremul.len() * 4);
    for p in unpremul {
        bytes.extend_from_slice(&[p.r, p.g, p.b, p.a]);
    }
    bytes
}

/// Like [`render_rgba8`], but the pixels stay premultiplied by alpha.
///
/// The context starts fully transparent, so pixels no op touched are
/// `[0, 0, 0, 0]`. This is the form to composite over existing content.
pub fn render_premultiplied_rgba8(
    width: u16,
    height: u16,
    build: impl FnOnce(&mut VelloCpuImagingBackend<'_>),
) -> Vec<u8> {
    render_pixmap(width, height, build).data_as_u8_slice().to_vec()
}

fn render_pixmap(
    width: u16,
    height: u16,
    build: impl FnOnce(&mut VelloCpuImagingBackend<'_>),
) -> Pixmap {
    let settings = RenderSettings {
        render_mode: RenderMode::OptimizeSpeed,
        ..RenderSettings::default()
    };
    let mut ctx = RenderContext::new_with(width, height, settings);
    let mut backend = VelloCpuImagingBackend::new(&mut ctx);
    build(&mut backend);
    debug_assert_eq!(backend.layer_depth(), 0, "unbalanced layers after rendering");

    let mut pixmap = Pixmap::new(width, height);
    backend.ctx.flush();
    backend.ctx.render_to_pixmap(&mut pixmap);
    pixmap
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Rect};
    use peniko::Color;
    use vista_imaging::{ClipShape, ImageAlphaType, ImageSampler, ImagingBackendExt};

    fn pixel(pixels: &[u8], width: usize, x: usize, y: usize) -> [u8; 4] {
        let i = (y * width + x) * 4;
        [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]
    }

    #[test]
    fn fill_and_clip() {
        let pixels = render_rgba8(8, 8, |backend| {
            backend.with_clip(ClipShape::Rect(Rect::new(0.0, 0.0, 4.0, 8.0)), |b| {
                b.with_paint(PaintDesc::solid(Color::WHITE), |b| {
                    b.draw(DrawOp::FillRect(Rect::new(0.0, 0.0, 8.0, 8.0)));
                });
            });
        });
        assert_eq!(pixel(&pixels, 8, 1, 1), [255, 255, 255, 255]);
        assert_eq!(pixel(&pixels, 8, 6, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn dashed_strokes_leave_gaps() {
        let pixels = render_rgba8(20, 4, |backend| {
            let stroke = StrokeStyle::new(2.0).with_dashes(0.0, [5.0, 5.0]);
            backend.stroke_path_with(
                PathDesc::polyline([Point::new(0.0, 2.0), Point::new(20.0, 2.0)], false),
                &stroke,
                PaintDesc::solid(Color::BLACK),
            );
        });
        assert_eq!(pixel(&pixels, 20, 2, 1)[3], 255, "inside the first dash");
        assert_eq!(pixel(&pixels, 20, 7, 1)[3], 0, "inside the first gap");
        assert_eq!(pixel(&pixels, 20, 12, 1)[3], 255, "inside the second dash");
    }

    #[test]
    fn images_are_placed_by_transform() {
        let red = [255_u8, 0, 0, 255];
        let pixels = render_rgba8(4, 4, |backend| {
            let image = backend.create_image(
                ImageDesc {
                    width: 2,
                    height: 2,
                    alpha_type: ImageAlphaType::Alpha,
                },
                &red.repeat(4),
            );
            backend.draw(DrawOp::DrawImage {
                image,
                transform: Affine::translate((2.0, 2.0)),
                sampler: ImageSampler::default(),
            });
            backend.destroy_image(image);
        });
        assert_eq!(pixel(&pixels, 4, 3, 3), red);
        assert_eq!(pixel(&pixels, 4, 0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn opacity_layers_blend() {
        let pixels = render_rgba8(2, 2, |backend| {
            backend.with_opacity_layer(0.5, |b| {
                b.with_paint(PaintDesc::solid(Color::WHITE), |b| {
                    b.draw(DrawOp::FillRect(Rect::new(0.0, 0.0, 2.0, 2.0)));
                });
            });
        });
        let alpha = pixel(&pixels, 2, 0, 0)[3];
        assert!((126..=129).contains(&alpha), "alpha {alpha}");
    }

    #[test]
    fn premultiplied_output_scales_color_by_alpha() {
        let pixels = render_premultiplied_rgba8(2, 1, |backend| {
            backend.with_opacity_layer(0.5, |b| {
                b.with_paint(PaintDesc::solid(Color::WHITE), |b| {
                    b.draw(DrawOp::FillRect(Rect::new(0.0, 0.0, 1.0, 1.0)));
                });
            });
        });
        let [r, g, b, a] = pixel(&pixels, 2, 0, 0);
        assert!((126..=129).contains(&a), "alpha {a}");
        assert_eq!([r, g, b], [a, a, a], "white premultiplied by its alpha");
        assert_eq!(pixel(&pixels, 2, 1, 0), [0, 0, 0, 0], "untouched pixels stay clear");
    }

    #[test]
    fn malformed_images_are_skipped() {
        let mut ctx = RenderContext::new(2, 2);
        let mut backend = VelloCpuImagingBackend::new(&mut ctx);
        let image = backend.create_image(
            ImageDesc {
                width: 2,
                height: 2,
                alpha_type: ImageAlphaType::Alpha,
            },
            &[0; 3],
        );
        backend.draw(DrawOp::DrawImage {
            image,
            transform: Affine::IDENTITY,
            sampler: ImageSampler::default(),
        });
        assert_eq!(backend.layer_depth(), 0);
    }
}
