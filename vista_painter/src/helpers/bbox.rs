// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point};
use log::warn;
use vista_geometry::{Anchor, LabelPosition, Rect, VerticalAlignment};
use vista_imaging::{ImagingBackend, ImagingBackendExt, PathDesc};
use vista_style::BoundingBox2DStyle;
use vista_text::{MultiLineText, TextRenderer};

use super::shapes::{local_frame, rect_clip, rect_path};
use super::{HALF_PIXEL, solid, stroke};
use crate::Result;

/// Draw a (rotated, optionally rounded) bounding box with a label along one
/// of its edges.
///
/// The box area and the label background are filled first, clipped to the
/// box; then the contour is stroked and the label drawn on top. Labels along
/// the left or right edge are rotated to read bottom to top or top to
/// bottom.
///
/// Returns `Ok(false)` without drawing if the box or its style are invalid.
pub fn draw_bounding_box_2d<B: ImagingBackend, T: TextRenderer, S: AsRef<str>>(
    backend: &mut B,
    renderer: &T,
    rect: &Rect,
    label: &[S],
    style: &BoundingBox2DStyle,
) -> Result<bool> {
    if !style.is_valid() {
        warn!("skipping bounding box with invalid style {style}");
        return Ok(false);
    }
    if !rect.is_valid() {
        warn!("skipping invalid bounding box {rect}");
        return Ok(false);
    }
    let has_label = !label.is_empty();
    if has_label && !style.text_style.is_valid() {
        warn!(
            "bounding box label drawn without text, invalid style {}",
            style.text_style
        );
    }

    let local = Rect::new(0.0, 0.0, rect.width, rect.height).with_radius(rect.radius);
    let clip = rect_clip(&local);
    let label_frame = LabelFrame::new(style.label_position, rect.width, rect.height);
    let text = (has_label && style.text_style.is_valid()).then(|| {
        let mut text = MultiLineText::new(label, renderer, &style.text_style);
        let halign = style.text_style.halign;
        let anchor_point = Point::new(
            (halign.factor() - 0.5) * label_frame.width,
            match label_frame.valign {
                VerticalAlignment::Top => -label_frame.height / 2.0,
                VerticalAlignment::Center => 0.0,
                VerticalAlignment::Bottom => label_frame.height / 2.0,
            },
        );
        text.align(
            anchor_point,
            Anchor::new(halign, label_frame.valign),
            style.label_padding,
            None,
        );
        text
    });
    let label_box = text
        .as_ref()
        .map(|text| label_box(style.label_position, &local, text.bounding_box(0.0).height));

    let frame = local_frame(rect.center() + HALF_PIXEL, rect.rotation);
    backend.with_transform(frame, |b| {
        let box_fill = style.box_fill_color();
        let text_fill = style.text_fill_color();
        if box_fill.is_some() || text_fill.is_some() {
            b.with_clip(clip.clone(), |b| {
                if let Some(color) = box_fill {
                    let background = match (label_box, text_fill) {
                        (Some(label_box), Some(_)) => PathDesc::from_shape(&remainder(
                            style.label_position,
                            &local,
                            &label_box,
                        )),
                        _ => rect_path(&local),
                    };
                    b.fill_path_with(background, solid(color));
                }
                if let (Some(label_box), Some(color)) = (label_box, text_fill) {
                    b.fill_path_with(PathDesc::from_shape(&label_box), solid(color));
                }
            });
        }
        if style.line_style.is_valid() {
            stroke(b, rect_path(&local), &style.line_style);
        }
        if let Some(text) = &text {
            let draw_lines = |b: &mut B| {
                b.with_transform(Affine::rotate(label_frame.rotation.to_radians()), |b| {
                    for line in text.lines() {
                        renderer.draw_line(b, line.text(), line.reference_point(), &style.text_style);
                    }
                });
            };
            if style.clip_label {
                b.with_clip(clip.clone(), draw_lines);
            } else {
                draw_lines(b);
            }
        }
    });
    Ok(true)
}

/// The box as seen by the label: rotated so the label edge is at the top or
/// bottom.
struct LabelFrame {
    rotation: f64,
    width: f64,
    height: f64,
    valign: VerticalAlignment,
}

impl LabelFrame {
    fn new(position: LabelPosition, width: f64, height: f64) -> Self {
        let (rotation, valign) = match position {
            LabelPosition::Top => (0.0, VerticalAlignment::Top),
            LabelPosition::Bottom => (0.0, VerticalAlignment::Bottom),
            LabelPosition::LeftB2T => (-90.0, VerticalAlignment::Top),
            LabelPosition::LeftT2B => (90.0, VerticalAlignment::Bottom),
            LabelPosition::RightB2T => (-90.0, VerticalAlignment::Bottom),
            LabelPosition::RightT2B => (90.0, VerticalAlignment::Top),
        };
        let (width, height) = if rotation == 0.0 {
            (width, height)
        } else {
            (height, width)
        };
        Self {
            rotation,
            width,
            height,
            valign,
        }
    }
}

/// Strip along the label edge of the box, `label_height` deep.
fn label_box(position: LabelPosition, bbox: &Rect, label_height: f64) -> kurbo::Rect {
    let (hw, hh) = (bbox.half_width(), bbox.half_height());
    match position {
        LabelPosition::Top => kurbo::Rect::new(-hw, -hh, hw, -hh + label_height),
        LabelPosition::Bottom => kurbo::Rect::new(-hw, hh - label_height, hw, hh),
        LabelPosition::LeftB2T | LabelPosition::LeftT2B => {
            kurbo::Rect::new(-hw, -hh, -hw + label_height, hh)
        }
        LabelPosition::RightB2T | LabelPosition::RightT2B => {
            kurbo::Rect::new(hw - label_height, -hh, hw, hh)
        }
    }
}

/// The box without the label strip.
fn remainder(position: LabelPosition, bbox: &Rect, label_box: &kurbo::Rect) -> kurbo::Rect {
    let (hw, hh) = (bbox.half_width(), bbox.half_height());
    match position {
        LabelPosition::Top => kurbo::Rect::new(-hw, label_box.y1, hw, hh),
        LabelPosition::Bottom => kurbo::Rect::new(-hw, -hh, hw, label_box.y0),
        LabelPosition::LeftB2T | LabelPosition::LeftT2B => {
            kurbo::Rect::new(label_box.x1, -hh, hw, hh)
        }
        LabelPosition::RightB2T | LabelPosition::RightT2B => {
            kurbo::Rect::new(-hw, -hh, label_box.x0, hh)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{BlockText, fill_color, is_stroke};
    use kurbo::Shape;
    use vista_color::{Color, ColorChoice};
    use vista_imaging::DrawOp;
    use vista_imaging_ref::RefBackend;
    use vista_style::LineStyle;

    fn style() -> BoundingBox2DStyle {
        BoundingBox2DStyle {
            line_style: LineStyle::new(2.0, Color::RED),
            ..BoundingBox2DStyle::default()
        }
    }

    fn boxed() -> Rect {
        Rect::from_ltwh(10.0, 10.0, 100.0, 50.0)
    }

    #[test]
    fn top_label_fills_a_strip() {
        let mut backend = RefBackend::default();
        assert!(draw_bounding_box_2d(&mut backend, &BlockText, &boxed(), &["car"], &style()).unwrap());

        let draws: Vec<_> = backend.draws().collect();
        assert_eq!(draws.len(), 4, "background, label background, contour and text");
        assert_eq!(fill_color(&draws[0]), Some(Color::RED.with_alpha(0.1).to_peniko()));
        assert_eq!(fill_color(&draws[1]), Some(Color::RED.with_alpha(0.5).to_peniko()));
        assert!(is_stroke(&draws[2]));

        // Text height 16 plus 5 px padding above and below.
        let strip = draws[1].path.unwrap().to_bez_path().bounding_box();
        assert_eq!(strip, kurbo::Rect::new(-50.0, -25.0, 50.0, 1.0));
        let background = draws[0].path.unwrap().to_bez_path().bounding_box();
        assert_eq!(background, kurbo::Rect::new(-50.0, 1.0, 50.0, 25.0));

        let DrawOp::FillRect(text) = draws[3].op else {
            panic!("expected the text block, got {:?}", draws[3].op);
        };
        assert_eq!(*text, kurbo::Rect::new(-45.0, -20.0, -15.0, -4.0));
        let center = draws[3].state.transform * Point::ZERO;
        assert_eq!(center, Point::new(60.5, 35.5));
        assert!(backend.is_balanced());
        assert_eq!(backend.live_resources(), 0);
    }

    #[test]
    fn side_labels_are_rotated() {
        let mut backend = RefBackend::default();
        let style = BoundingBox2DStyle {
            label_position: LabelPosition::LeftB2T,
            clip_label: false,
            ..style()
        };
        draw_bounding_box_2d(&mut backend, &BlockText, &boxed(), &["car"], &style).unwrap();

        let strip = backend.draws().nth(1).unwrap().path.unwrap().to_bez_path().bounding_box();
        assert_eq!(strip, kurbo::Rect::new(-50.0, -25.0, -24.0, 25.0));
        let text = backend.draws().last().unwrap();
        // Local x runs upwards along the left edge.
        let direction = text.state.transform * Point::new(1.0, 0.0) - text.state.transform * Point::ZERO;
        assert!(direction.x.abs() < 1e-9 && (direction.y + 1.0).abs() < 1e-9);
        let DrawOp::FillRect(block) = text.op else {
            panic!("expected the text block");
        };
        // In the rotated frame, the left edge is the top edge at y = -50.
        assert_eq!(block.y0, -45.0);
    }

    #[test]
    fn unlabeled_boxes_fill_the_whole_area() {
        let mut backend = RefBackend::default();
        let label: [&str; 0] = [];
        draw_bounding_box_2d(&mut backend, &BlockText, &boxed(), &label, &style()).unwrap();
        let draws: Vec<_> = backend.draws().collect();
        assert_eq!(draws.len(), 2);
        let area = draws[0].path.unwrap().to_bez_path().bounding_box();
        assert_eq!(area, kurbo::Rect::new(-50.0, -25.0, 50.0, 25.0));
    }

    #[test]
    fn invalid_boxes_are_skipped() {
        let mut backend = RefBackend::default();
        let invisible = BoundingBox2DStyle {
            line_style: LineStyle::new(0.0, Color::RED),
            box_fill: ColorChoice::None,
            ..style()
        };
        assert!(!draw_bounding_box_2d(&mut backend, &BlockText, &boxed(), &["x"], &invisible).unwrap());
        let flat = Rect::new(0.0, 0.0, 0.0, 10.0);
        assert!(!draw_bounding_box_2d(&mut backend, &BlockText, &flat, &["x"], &style()).unwrap());
        assert!(backend.events().is_empty());
    }
}
