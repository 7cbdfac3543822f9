// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=vista_imaging_ref --heading-base-level=0

//! Vista Imaging Reference Backend.
//!
//! A stateful implementation of [`ImagingBackend`] and [`ResourceBackend`]
//! that records ops instead of rasterizing them:
//! - every op is logged as an [`Event`] together with the state it was
//!   applied in,
//! - resources stay inspectable until destroyed, so tests can look at the
//!   geometry of the path a draw op referenced,
//! - live resource counts reveal helpers that leak temporaries.
//!
//! It does not produce pixels and is not a reference for rendering results.

#![deny(unsafe_code)]

use vista_imaging::{
    Affine, DrawOp, ImageDesc, ImageId, ImagingBackend, ImagingOp, LayerOp, PaintDesc,
    PaintId, PathDesc, PathId, ResourceBackend, StateOp, StrokeStyle,
};

/// Snapshot of the current imaging state.
#[derive(Clone, Debug)]
pub struct StateSnapshot {
    /// Current transform.
    pub transform: Affine,
    /// Number of pushed layers.
    pub layer_stack_depth: usize,
    /// The innermost pushed layer, if any.
    pub layer_top: Option<LayerOp>,
    /// Current paint, if set.
    pub paint: Option<PaintId>,
    /// Current stroke style, if set.
    pub stroke: Option<StrokeStyle>,
}

impl Default for StateSnapshot {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            layer_stack_depth: 0,
            layer_top: None,
            paint: None,
            stroke: None,
        }
    }
}

/// Event recorded by the reference backend.
#[derive(Clone, Debug)]
pub enum Event {
    /// State operation and the state after applying it.
    State {
        /// Applied operation.
        op: StateOp,
        /// Snapshot after the operation.
        state: StateSnapshot,
    },
    /// Draw operation and the state it was drawn with.
    Draw {
        /// Applied operation.
        op: DrawOp,
        /// Snapshot at the time of drawing.
        state: StateSnapshot,
        /// The paint in effect, resolved at the time of drawing.
        paint: Option<PaintDesc>,
        /// The path drawn by path ops, resolved at the time of drawing.
        path: Option<PathDesc>,
    },
}

/// Recording implementation of the imaging backend.
#[derive(Default, Debug)]
pub struct RefBackend {
    paths: Vec<Option<PathDesc>>,
    images: Vec<Option<(ImageDesc, Vec<u8>)>>,
    paints: Vec<Option<PaintDesc>>,

    events: Vec<Event>,
    ops: Vec<ImagingOp>,
    state: StateSnapshot,
    layer_stack: Vec<LayerOp>,
}

/// A draw op together with the resources it used.
#[derive(Copy, Clone, Debug)]
pub struct DrawRecord<'a> {
    /// The draw op.
    pub op: &'a DrawOp,
    /// State at the time of drawing.
    pub state: &'a StateSnapshot,
    /// Paint in effect.
    pub paint: Option<&'a PaintDesc>,
    /// Path geometry for path ops.
    pub path: Option<&'a PathDesc>,
}

impl RefBackend {
    /// All recorded events.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// All recorded ops.
    pub fn ops(&self) -> &[ImagingOp] {
        &self.ops
    }

    /// Draw events in order.
    pub fn draws(&self) -> impl Iterator<Item = DrawRecord<'_>> {
        self.events.iter().filter_map(|event| match event {
            Event::Draw {
                op,
                state,
                paint,
                path,
            } => Some(DrawRecord {
                op,
                state,
                paint: paint.as_ref(),
                path: path.as_ref(),
            }),
            Event::State { .. } => None,
        })
    }

    /// The current state.
    pub fn snapshot(&self) -> &StateSnapshot {
        &self.state
    }

    /// Returns `true` if every pushed layer was popped and the transform is
    /// back to identity.
    pub fn is_balanced(&self) -> bool {
        self.layer_stack.is_empty() && self.state.transform == Affine::IDENTITY
    }

    /// A live path resource.
    pub fn path(&self, id: PathId) -> Option<&PathDesc> {
        self.paths.get(id.0 as usize)?.as_ref()
    }

    /// A live paint resource.
    pub fn paint(&self, id: PaintId) -> Option<&PaintDesc> {
        self.paints.get(id.0 as usize)?.as_ref()
    }

    /// A live image resource and its pixels.
    pub fn image(&self, id: ImageId) -> Option<(&ImageDesc, &[u8])> {
        self.images
            .get(id.0 as usize)?
            .as_ref()
            .map(|(desc, pixels)| (desc, pixels.as_slice()))
    }

    /// Number of path, image and paint resources that were created but not
    /// destroyed.
    pub fn live_resources(&self) -> usize {
        self.paths.iter().flatten().count()
            + self.images.iter().flatten().count()
            + self.paints.iter().flatten().count()
    }

    /// Clears all recorded events and ops but keeps resources.
    pub fn clear_events(&mut self) {
        self.events.clear();
        self.ops.clear();
    }
}

fn release<T>(slots: &mut [Option<T>], idx: u32) {
    if let Some(slot) = slots.get_mut(idx as usize) {
        *slot = None;
    }
}

impl ResourceBackend for RefBackend {
    fn create_path(&mut self, desc: PathDesc) -> PathId {
        let id =
            u32::try_from(self.paths.len()).expect("RefBackend: too many paths for u32 PathId");
        self.paths.push(Some(desc));
        PathId(id)
    }

    fn destroy_path(&mut self, id: PathId) {
        release(&mut self.paths, id.0);
    }

    fn create_image(&mut self, desc: ImageDesc, pixels: &[u8]) -> ImageId {
        let id =
            u32::try_from(self.images.len()).expect("RefBackend: too many images for u32 ImageId");
        self.images.push(Some((desc, pixels.to_vec())));
        ImageId(id)
    }

    fn destroy_image(&mut self, id: ImageId) {
        release(&mut self.images, id.0);
    }

    fn create_paint(&mut self, desc: PaintDesc) -> PaintId {
        let id =
            u32::try_from(self.paints.len()).expect("RefBackend: too many paints for u32 PaintId");
        self.paints.push(Some(desc));
        PaintId(id)
    }

    fn destroy_paint(&mut self, id: PaintId) {
        release(&mut self.paints, id.0);
    }
}

impl ImagingBackend for RefBackend {
    fn state(&mut self, op: StateOp) {
        match &op {
            StateOp::SetTransform(xf) => self.state.transform = *xf,
            StateOp::PushLayer(layer) => {
                self.layer_stack.push(layer.clone());
                self.state.layer_stack_depth = self.layer_stack.len();
                self.state.layer_top = self.layer_stack.last().cloned();
            }
            StateOp::PopLayer => {
                assert!(
                    self.layer_stack.pop().is_some(),
                    "RefBackend: PopLayer with empty stack"
                );
                self.state.layer_stack_depth = self.layer_stack.len();
                self.state.layer_top = self.layer_stack.last().cloned();
            }
            StateOp::SetPaint(id) => self.state.paint = Some(*id),
            StateOp::SetStroke(style) => self.state.stroke = Some(style.clone()),
        }

        self.ops.push(ImagingOp::State(op.clone()));
        self.events.push(Event::State {
            op,
            state: self.state.clone(),
        });
    }

    fn draw(&mut self, op: DrawOp) {
        let paint = self.state.paint.and_then(|id| self.paint(id)).cloned();
        let path = match &op {
            DrawOp::FillPath(id) | DrawOp::StrokePath(id) => self.path(*id).cloned(),
            _ => None,
        };
        self.ops.push(ImagingOp::Draw(op.clone()));
        self.events.push(Event::Draw {
            op,
            state: self.state.clone(),
            paint,
            path,
        });
    }

    fn current_transform(&self) -> Affine {
        self.state.transform
    }

    fn layer_depth(&self) -> usize {
        self.layer_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Rect};
    use peniko::{Brush, Color};
    use vista_imaging::{ClipShape, ImageAlphaType, ImageSampler, ImagingBackendExt, PathCmd};

    fn triangle() -> PathDesc {
        PathDesc::polyline(
            [Point::ZERO, Point::new(4.0, 0.0), Point::new(0.0, 4.0)],
            true,
        )
    }

    #[test]
    fn draws_resolve_paint_and_path() {
        let mut backend = RefBackend::default();
        let paint = backend.create_paint(PaintDesc::solid(Color::WHITE));
        let path = backend.create_path(triangle());

        backend.state(StateOp::SetPaint(paint));
        backend.draw(DrawOp::FillPath(path));
        backend.destroy_path(path);
        backend.destroy_paint(paint);

        assert_eq!(backend.events().len(), 2);
        let draw = backend.draws().next().expect("one draw");
        assert_eq!(draw.paint.map(|p| &p.brush), Some(&Brush::Solid(Color::WHITE)));
        assert!(matches!(
            draw.path.map(|p| p.commands[1]),
            Some(PathCmd::LineTo(p)) if p == Point::new(4.0, 0.0)
        ));
        assert_eq!(backend.live_resources(), 0);
    }

    #[test]
    fn state_snapshot_updates() {
        let mut backend = RefBackend::default();

        backend.state(StateOp::SetTransform(Affine::scale(2.0)));
        assert_eq!(backend.snapshot().transform, Affine::scale(2.0));
        backend.layer_push(LayerOp::opacity(0.25));

        let Some(Event::State { state, .. }) = backend.events().last() else {
            panic!("expected final event to be State");
        };
        assert_eq!(state.transform, Affine::scale(2.0));
        assert_eq!(state.layer_stack_depth, 1);
        assert_eq!(state.layer_top.as_ref().and_then(|l| l.opacity), Some(0.25));
        assert!(!backend.is_balanced());

        backend.layer_pop();
        backend.state(StateOp::SetTransform(Affine::IDENTITY));
        assert!(backend.is_balanced());
    }

    #[test]
    fn scoped_helpers_leave_no_trace() {
        let mut backend = RefBackend::default();
        let clip = ClipShape::Rect(Rect::new(0.0, 0.0, 8.0, 8.0));
        backend.with_clip(clip.clone(), |b| {
            b.with_transform(Affine::translate((2.0, 3.0)), |b| {
                b.fill_path_with(triangle(), PaintDesc::solid(Color::BLACK));
            });
        });

        assert!(backend.is_balanced());
        assert_eq!(backend.live_resources(), 0);
        let draw = backend.draws().next().expect("one draw");
        assert_eq!(draw.state.transform, Affine::translate((2.0, 3.0)));
        assert_eq!(draw.state.layer_top.as_ref().and_then(|l| l.clip.clone()), Some(clip));
        assert!(draw.path.is_some(), "the path is resolved before it is destroyed");
    }

    #[test]
    fn images_are_inspectable() {
        let mut backend = RefBackend::default();
        let image = backend.create_image(
            ImageDesc {
                width: 1,
                height: 1,
                alpha_type: ImageAlphaType::Alpha,
            },
            &[1, 2, 3, 4],
        );
        backend.draw(DrawOp::DrawImage {
            image,
            transform: Affine::IDENTITY,
            sampler: ImageSampler::default(),
        });
        assert_eq!(backend.image(image).map(|(_, px)| px), Some(&[1_u8, 2, 3, 4][..]));
        assert!(backend.draws().next().is_some_and(|d| d.paint.is_none()));
    }

    #[test]
    fn clear_events_keeps_resources_usable() {
        let mut backend = RefBackend::default();
        let paint = backend.create_paint(PaintDesc::solid(Color::WHITE));
        let path = backend.create_path(triangle());

        backend.state(StateOp::SetPaint(paint));
        backend.draw(DrawOp::FillPath(path));
        backend.clear_events();
        assert!(backend.events().is_empty());
        assert!(backend.ops().is_empty());

        backend.draw(DrawOp::FillPath(path));
        assert_eq!(backend.events().len(), 1);
    }

    #[test]
    fn resource_destroy_is_tolerant() {
        let mut backend = RefBackend::default();
        let path = backend.create_path(triangle());
        let paint = backend.create_paint(PaintDesc::solid(Color::WHITE));

        backend.destroy_path(path);
        backend.destroy_paint(paint);
        // Double-destroy and unknown ids should not panic.
        backend.destroy_path(path);
        backend.destroy_paint(paint);
        backend.destroy_image(ImageId(42));
        assert!(backend.path(path).is_none());
    }
}
