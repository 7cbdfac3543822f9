// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=vista_imaging --heading-base-level=0

//! Vista Imaging: backend-agnostic imaging ops and backend traits.
//!
//! Drawing helpers do not talk to a rasterizer directly. They emit a small
//! set of plain operations against a backend:
//!
//! - **Resources**: opaque handles ([`PathId`], [`ImageId`], [`PaintId`])
//!   created and destroyed through [`ResourceBackend`].
//! - **Operations**: [`StateOp`] mutates the current state (transform,
//!   paint, stroke, layers) and [`DrawOp`] produces pixels.
//! - **Scopes**: there is no ambient save/restore. Clips and group opacity
//!   are properties of layers, which must be well nested. The closures of
//!   [`ImagingBackendExt`] push and pop them (and restore the transform) in
//!   pairs, so a helper cannot leave state behind.
//!
//! Two backends implement these traits: a `vello_cpu` rasterizer and a
//! reference backend that records every op with a state snapshot for tests.
//!
//! ```
//! use kurbo::{Affine, Rect};
//! use vista_imaging::{
//!     ClipShape, DrawOp, ImagingBackend, ImagingBackendExt, PaintDesc, ResourceBackend,
//! };
//!
//! fn highlight<B: ImagingBackend>(backend: &mut B, area: Rect) {
//!     let red = peniko::Color::from_rgba8(255, 0, 0, 255);
//!     let paint = backend.create_paint(PaintDesc::solid(red));
//!     backend.with_clip(ClipShape::Rect(area), |b| {
//!         b.with_transform(Affine::translate((1.0, 1.0)), |b| {
//!             b.state(vista_imaging::StateOp::SetPaint(paint));
//!             b.draw(DrawOp::FillRect(area));
//!         });
//!     });
//!     backend.destroy_paint(paint);
//! }
//! ```

#![deny(unsafe_code)]

use kurbo::{BezPath, Ellipse, PathEl, Point, Rect, RoundedRect, Shape};
use peniko::Brush;
pub use peniko::{ImageAlphaType, ImageQuality, ImageSampler};

/// Affine transform used by the imaging ops.
pub type Affine = kurbo::Affine;

/// Stroke parameters: width, joins, caps, miter limit and dashes.
pub type StrokeStyle = kurbo::Stroke;

/// Tolerance used when flattening clip shapes into paths.
pub const CLIP_TOLERANCE: f64 = 0.1;

/// Identifier for a path resource.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathId(pub u32);

/// Identifier for an image resource.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

/// Identifier for a paint resource.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PaintId(pub u32);

/// Region a layer clips its content to.
#[derive(Clone, Debug, PartialEq)]
pub enum ClipShape {
    /// An axis-aligned rectangle in local coordinates.
    Rect(Rect),
    /// A rectangle with rounded corners.
    RoundedRect(RoundedRect),
    /// An ellipse, possibly rotated.
    Ellipse(Ellipse),
    /// The interior of a path resource.
    Path(PathId),
}

/// Flatten a [`ClipShape`] into a path.
///
/// `path_for_id` resolves [`ClipShape::Path`]; unknown ids give `None`.
pub fn clip_shape_to_bez_path(
    shape: &ClipShape,
    mut path_for_id: impl FnMut(PathId) -> Option<BezPath>,
) -> Option<BezPath> {
    match shape {
        ClipShape::Rect(rect) => Some(rect.to_path(CLIP_TOLERANCE)),
        ClipShape::RoundedRect(rect) => Some(rect.to_path(CLIP_TOLERANCE)),
        ClipShape::Ellipse(ellipse) => Some(ellipse.to_path(CLIP_TOLERANCE)),
        ClipShape::Path(id) => path_for_id(*id),
    }
}

/// Parameters of a pushed layer.
///
/// Everything drawn until the matching [`StateOp::PopLayer`] is clipped to
/// `clip` (path clips use the non-zero rule) and composited with `opacity`.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerOp {
    /// Optional clip region.
    pub clip: Option<ClipShape>,
    /// Optional group opacity in `[0, 1]`.
    pub opacity: Option<f32>,
}

impl LayerOp {
    /// A clip-only layer.
    pub fn clip(shape: ClipShape) -> Self {
        Self {
            clip: Some(shape),
            opacity: None,
        }
    }

    /// An opacity-only layer.
    pub fn opacity(opacity: f32) -> Self {
        Self {
            clip: None,
            opacity: Some(opacity),
        }
    }

    /// Returns `true` if the layer neither clips nor changes opacity.
    ///
    /// Backends may skip pushing such layers, but must still balance the pop.
    pub fn is_noop(&self) -> bool {
        self.clip.is_none() && self.opacity.is_none_or(|o| o >= 1.0)
    }
}

/// Operations that mutate the current state.
#[derive(Clone, Debug, PartialEq)]
pub enum StateOp {
    /// Replace the current transform.
    SetTransform(Affine),
    /// Push a layer. Every push must be matched by a [`StateOp::PopLayer`].
    PushLayer(LayerOp),
    /// Pop the most recently pushed layer.
    PopLayer,
    /// Select the paint used by subsequent draws.
    SetPaint(PaintId),
    /// Select the stroke used by subsequent stroke draws.
    SetStroke(StrokeStyle),
}

/// Operations that produce pixels from the current state.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Fill a path with the current paint.
    FillPath(PathId),
    /// Stroke a path with the current stroke and paint.
    StrokePath(PathId),
    /// Fill a rectangle with the current paint.
    FillRect(Rect),
    /// Stroke a rectangle with the current stroke and paint.
    StrokeRect(Rect),
    /// Draw an image whose pixel `(0, 0)` corner lands at the origin of
    /// `transform` (applied on top of the current transform).
    DrawImage {
        /// Image to draw.
        image: ImageId,
        /// Placement of the image.
        transform: Affine,
        /// Sampling parameters.
        sampler: ImageSampler,
    },
}

/// Unified operation, as logged by recording backends.
#[derive(Clone, Debug, PartialEq)]
pub enum ImagingOp {
    /// State-changing operation.
    State(StateOp),
    /// Drawing operation.
    Draw(DrawOp),
}

/// A path segment in local coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PathCmd {
    /// Start a new subpath.
    MoveTo(Point),
    /// Straight line to the point.
    LineTo(Point),
    /// Quadratic Bézier with one control point.
    QuadTo(Point, Point),
    /// Cubic Bézier with two control points.
    CurveTo(Point, Point, Point),
    /// Close the current subpath.
    Close,
}

/// Description of a path resource.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathDesc {
    /// Path segments.
    pub commands: Box<[PathCmd]>,
}

impl PathDesc {
    /// Convert from any kurbo shape, flattening curves only where the
    /// shape cannot express them as Béziers.
    pub fn from_shape(shape: &impl Shape) -> Self {
        Self::from_elements(shape.path_elements(CLIP_TOLERANCE))
    }

    /// Convert from kurbo path elements.
    pub fn from_elements(elements: impl IntoIterator<Item = PathEl>) -> Self {
        let commands = elements
            .into_iter()
            .map(|el| match el {
                PathEl::MoveTo(p) => PathCmd::MoveTo(p),
                PathEl::LineTo(p) => PathCmd::LineTo(p),
                PathEl::QuadTo(p1, p2) => PathCmd::QuadTo(p1, p2),
                PathEl::CurveTo(p1, p2, p3) => PathCmd::CurveTo(p1, p2, p3),
                PathEl::ClosePath => PathCmd::Close,
            })
            .collect();
        Self { commands }
    }

    /// An open polyline, or a polygon if `closed`.
    pub fn polyline(points: impl IntoIterator<Item = Point>, closed: bool) -> Self {
        let mut commands: Vec<PathCmd> = points
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                if i == 0 {
                    PathCmd::MoveTo(p)
                } else {
                    PathCmd::LineTo(p)
                }
            })
            .collect();
        if closed && !commands.is_empty() {
            commands.push(PathCmd::Close);
        }
        Self {
            commands: commands.into_boxed_slice(),
        }
    }

    /// Convert into a kurbo path.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for cmd in &self.commands {
            match *cmd {
                PathCmd::MoveTo(p) => path.move_to(p),
                PathCmd::LineTo(p) => path.line_to(p),
                PathCmd::QuadTo(p1, p2) => path.quad_to(p1, p2),
                PathCmd::CurveTo(p1, p2, p3) => path.curve_to(p1, p2, p3),
                PathCmd::Close => path.close_path(),
            }
        }
        path
    }

    /// Returns `true` if there is no segment at all.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl From<&BezPath> for PathDesc {
    fn from(path: &BezPath) -> Self {
        Self::from_elements(path.iter())
    }
}

/// Description of an image resource.
///
/// Pixels are tightly packed, row-major RGBA8.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ImageDesc {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Whether the color channels are premultiplied by alpha.
    pub alpha_type: ImageAlphaType,
}

/// Description of a paint resource.
#[derive(Clone, Debug, PartialEq)]
pub struct PaintDesc {
    /// Solid color or gradient.
    pub brush: Brush,
}

impl PaintDesc {
    /// A solid color paint.
    pub fn solid(color: peniko::Color) -> Self {
        Self {
            brush: Brush::Solid(color),
        }
    }
}

impl From<peniko::Gradient> for PaintDesc {
    fn from(gradient: peniko::Gradient) -> Self {
        Self {
            brush: Brush::Gradient(gradient),
        }
    }
}

/// Resource lifetime interface.
///
/// Ids stay valid until destroyed. Destroying an unknown or already
/// destroyed id is a no-op.
pub trait ResourceBackend {
    /// Create a path resource.
    fn create_path(&mut self, desc: PathDesc) -> PathId;
    /// Destroy a path.
    fn destroy_path(&mut self, id: PathId);

    /// Create an image from `width * height * 4` RGBA8 bytes.
    fn create_image(&mut self, desc: ImageDesc, pixels: &[u8]) -> ImageId;
    /// Destroy an image.
    fn destroy_image(&mut self, id: ImageId);

    /// Create a paint resource.
    fn create_paint(&mut self, desc: PaintDesc) -> PaintId;
    /// Destroy a paint.
    fn destroy_paint(&mut self, id: PaintId);
}

/// A backend that consumes imaging ops.
pub trait ImagingBackend: ResourceBackend {
    /// Apply a state operation.
    fn state(&mut self, op: StateOp);

    /// Apply a draw operation.
    fn draw(&mut self, op: DrawOp);

    /// The transform set by the last [`StateOp::SetTransform`].
    fn current_transform(&self) -> Affine;

    /// Number of layers currently pushed.
    fn layer_depth(&self) -> usize;

    /// Push a layer. Equivalent to `self.state(StateOp::PushLayer(op))`.
    #[inline]
    fn layer_push(&mut self, op: LayerOp) {
        self.state(StateOp::PushLayer(op));
    }

    /// Pop a layer. Equivalent to `self.state(StateOp::PopLayer)`.
    #[inline]
    fn layer_pop(&mut self) {
        self.state(StateOp::PopLayer);
    }
}

/// Scoped helpers that always undo what they set up.
///
/// Kept apart from [`ImagingBackend`] so that the methods can take closures.
pub trait ImagingBackendExt: ImagingBackend {
    /// Run `f` inside a pushed layer, popping it afterwards.
    #[inline]
    fn with_layer<R>(&mut self, op: LayerOp, f: impl FnOnce(&mut Self) -> R) -> R {
        self.layer_push(op);
        let out = f(self);
        self.layer_pop();
        out
    }

    /// Run `f` clipped to `shape` (non-zero fill rule).
    #[inline]
    fn with_clip<R>(&mut self, shape: ClipShape, f: impl FnOnce(&mut Self) -> R) -> R {
        self.with_layer(LayerOp::clip(shape), f)
    }

    /// Run `f` inside a group composited with `opacity`.
    #[inline]
    fn with_opacity_layer<R>(&mut self, opacity: f32, f: impl FnOnce(&mut Self) -> R) -> R {
        self.with_layer(LayerOp::opacity(opacity), f)
    }

    /// Run `f` with `transform` applied on top of the current transform,
    /// restoring the current transform afterwards.
    #[inline]
    fn with_transform<R>(&mut self, transform: Affine, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.current_transform();
        self.state(StateOp::SetTransform(saved * transform));
        let out = f(self);
        self.state(StateOp::SetTransform(saved));
        out
    }

    /// Create a temporary paint, select it, run `f` and destroy the paint.
    #[inline]
    fn with_paint<R>(&mut self, desc: PaintDesc, f: impl FnOnce(&mut Self) -> R) -> R {
        let paint = self.create_paint(desc);
        self.state(StateOp::SetPaint(paint));
        let out = f(self);
        self.destroy_paint(paint);
        out
    }

    /// Fill `path` with `desc`, using a temporary path and paint.
    fn fill_path_with(&mut self, path: PathDesc, desc: PaintDesc) {
        if path.is_empty() {
            return;
        }
        let id = self.create_path(path);
        self.with_paint(desc, |b| b.draw(DrawOp::FillPath(id)));
        self.destroy_path(id);
    }

    /// Stroke `path` with `stroke` and `desc`, using a temporary path and paint.
    fn stroke_path_with(&mut self, path: PathDesc, stroke: &StrokeStyle, desc: PaintDesc) {
        if path.is_empty() {
            return;
        }
        let id = self.create_path(path);
        self.state(StateOp::SetStroke(stroke.clone()));
        self.with_paint(desc, |b| b.draw(DrawOp::StrokePath(id)));
        self.destroy_path(id);
    }
}

impl<B: ImagingBackend + ?Sized> ImagingBackendExt for B {}

#[cfg(test)]
mod tests {
    use super::*;
    use peniko::Color;

    /// Minimal backend logging ops and tracking just enough state.
    #[derive(Default)]
    struct LogBackend {
        next_id: u32,
        ops: Vec<ImagingOp>,
        live_paints: usize,
        transform: Affine,
        depth: usize,
    }

    impl ResourceBackend for LogBackend {
        fn create_path(&mut self, _desc: PathDesc) -> PathId {
            self.next_id += 1;
            PathId(self.next_id)
        }

        fn destroy_path(&mut self, _id: PathId) {}

        fn create_image(&mut self, _desc: ImageDesc, _pixels: &[u8]) -> ImageId {
            self.next_id += 1;
            ImageId(self.next_id)
        }

        fn destroy_image(&mut self, _id: ImageId) {}

        fn create_paint(&mut self, _desc: PaintDesc) -> PaintId {
            self.next_id += 1;
            self.live_paints += 1;
            PaintId(self.next_id)
        }

        fn destroy_paint(&mut self, _id: PaintId) {
            self.live_paints -= 1;
        }
    }

    impl ImagingBackend for LogBackend {
        fn state(&mut self, op: StateOp) {
            match &op {
                StateOp::SetTransform(xf) => self.transform = *xf,
                StateOp::PushLayer(_) => self.depth += 1,
                StateOp::PopLayer => self.depth -= 1,
                _ => {}
            }
            self.ops.push(ImagingOp::State(op));
        }

        fn draw(&mut self, op: DrawOp) {
            self.ops.push(ImagingOp::Draw(op));
        }

        fn current_transform(&self) -> Affine {
            self.transform
        }

        fn layer_depth(&self) -> usize {
            self.depth
        }
    }

    #[test]
    fn scopes_are_balanced() {
        let mut backend = LogBackend::default();
        let rect = Rect::new(0.0, 0.0, 4.0, 4.0);
        backend.with_clip(ClipShape::Rect(rect), |b| {
            assert_eq!(b.layer_depth(), 1);
            b.with_opacity_layer(0.5, |b| {
                assert_eq!(b.layer_depth(), 2);
                b.draw(DrawOp::FillRect(rect));
            });
        });
        assert_eq!(backend.layer_depth(), 0);
        assert_eq!(backend.ops.len(), 5);
    }

    #[test]
    fn transforms_compose_and_restore() {
        let mut backend = LogBackend::default();
        backend.with_transform(Affine::translate((10.0, 0.0)), |b| {
            b.with_transform(Affine::scale(2.0), |b| {
                let expected = Affine::translate((10.0, 0.0)) * Affine::scale(2.0);
                assert_eq!(b.current_transform(), expected);
            });
            assert_eq!(b.current_transform(), Affine::translate((10.0, 0.0)));
        });
        assert_eq!(backend.current_transform(), Affine::IDENTITY);
    }

    #[test]
    fn temporary_paints_are_released() {
        let mut backend = LogBackend::default();
        backend.fill_path_with(
            PathDesc::polyline([Point::ZERO, Point::new(1.0, 0.0), Point::new(0.0, 1.0)], true),
            PaintDesc::solid(Color::WHITE),
        );
        assert_eq!(backend.live_paints, 0);
        assert!(matches!(
            backend.ops.last(),
            Some(ImagingOp::Draw(DrawOp::FillPath(_)))
        ));

        let before = backend.ops.len();
        backend.fill_path_with(PathDesc::default(), PaintDesc::solid(Color::WHITE));
        assert_eq!(backend.ops.len(), before, "empty paths draw nothing");
    }

    #[test]
    fn path_conversions() {
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
        let desc = PathDesc::from_shape(&rect);
        assert!(matches!(desc.commands[0], PathCmd::MoveTo(p) if p == Point::new(1.0, 2.0)));
        assert!(matches!(desc.commands.last(), Some(PathCmd::Close)));
        assert_eq!(PathDesc::from(&desc.to_bez_path()), desc);

        let open = PathDesc::polyline([Point::ZERO, Point::new(5.0, 5.0)], false);
        assert_eq!(open.commands.len(), 2);
    }

    #[test]
    fn clip_shapes_flatten() {
        let ellipse = Ellipse::new((5.0, 5.0), (4.0, 2.0), 0.0);
        let path = clip_shape_to_bez_path(&ClipShape::Ellipse(ellipse), |_| None).unwrap();
        let bounds = path.bounding_box();
        assert!((bounds.width() - 8.0).abs() < 0.2, "{bounds:?}");
        assert!(clip_shape_to_bez_path(&ClipShape::Path(PathId(3)), |_| None).is_none());
        assert!(LayerOp::opacity(1.0).is_noop());
        assert!(!LayerOp::opacity(0.5).is_noop());
    }
}
