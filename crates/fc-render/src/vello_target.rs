//! GPU backend: records frames into a `vello::Scene`.
//!
//! The host owns the wgpu surface and presents [`VelloTarget::scene`] after
//! each frame. Picking is answered by a shadow [`DisplayList`] fed the same
//! draw calls.

use crate::display_list::DisplayList;
use crate::target::{PickTag, RenderTarget, StrokeStyle, TextStyle};
use fc_core::Color;
use kurbo::{Affine, BezPath, Circle, CubicBez, Point, Rect, RoundedRect, Shape, Size, Stroke};
use peniko::Fill;
use vello::Scene;

fn to_peniko(c: Color) -> peniko::Color {
    peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn to_kurbo_stroke(style: &StrokeStyle) -> Stroke {
    let stroke = Stroke::new(style.width);
    match style.dash {
        Some(pattern) => stroke.with_dashes(0.0, pattern),
        None => stroke,
    }
}

#[derive(Default)]
pub struct VelloTarget {
    scene: Scene,
    transform: Affine,
    picks: DisplayList,
}

impl VelloTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// The scene recorded by the last frame.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    fn fill<S: Shape>(&mut self, shape: &S, color: Color) {
        self.scene
            .fill(Fill::NonZero, self.transform, to_peniko(color), None, shape);
    }

    fn stroke<S: Shape>(&mut self, shape: &S, style: &StrokeStyle) {
        self.scene.stroke(
            &to_kurbo_stroke(style),
            self.transform,
            to_peniko(style.color),
            None,
            shape,
        );
    }
}

impl RenderTarget for VelloTarget {
    fn begin_frame(&mut self, size: Size, background: Color) {
        self.scene.reset();
        self.transform = Affine::IDENTITY;
        self.fill(&size.to_rect(), background);
        self.picks.begin_frame(size, background);
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
        self.picks.set_transform(transform);
    }

    fn draw_grid(&mut self, area: Rect, spacing: f64, stroke: &StrokeStyle) {
        let mut path = BezPath::new();
        let mut x = area.x0;
        while x <= area.x1 {
            path.move_to((x, area.y0));
            path.line_to((x, area.y1));
            x += spacing;
        }
        let mut y = area.y0;
        while y <= area.y1 {
            path.move_to((area.x0, y));
            path.line_to((area.x1, y));
            y += spacing;
        }
        self.stroke(&path, stroke);
        self.picks.draw_grid(area, spacing, stroke);
    }

    fn draw_rect(
        &mut self,
        rect: RoundedRect,
        fill: Option<Color>,
        stroke: Option<&StrokeStyle>,
        tag: Option<PickTag>,
    ) {
        if let Some(color) = fill {
            self.fill(&rect, color);
        }
        if let Some(style) = stroke {
            self.stroke(&rect, style);
        }
        self.picks.draw_rect(rect, fill, stroke, tag);
    }

    fn draw_circle(
        &mut self,
        circle: Circle,
        fill: Option<Color>,
        stroke: Option<&StrokeStyle>,
        tag: Option<PickTag>,
    ) {
        if let Some(color) = fill {
            self.fill(&circle, color);
        }
        if let Some(style) = stroke {
            self.stroke(&circle, style);
        }
        self.picks.draw_circle(circle, fill, stroke, tag);
    }

    fn draw_curve(&mut self, curve: CubicBez, stroke: &StrokeStyle, tag: Option<PickTag>) {
        self.stroke(&curve, stroke);
        self.picks.draw_curve(curve, stroke, tag);
    }

    fn draw_text(&mut self, origin: Point, text: &str, style: &TextStyle, tag: Option<PickTag>) {
        // Glyph runs need a font context owned by the host; only the pick
        // region is recorded here.
        log::trace!("TEXT {:?} at ({}, {})", text, origin.x, origin.y);
        self.picks.draw_text(origin, text, style, tag);
    }

    fn end_frame(&mut self) {
        self.picks.end_frame();
    }

    fn set_pick_tolerance(&mut self, pixels: f64) {
        self.picks.set_pick_tolerance(pixels);
    }

    fn pick(&self, screen: Point) -> Option<PickTag> {
        self.picks.pick(screen)
    }
}

#[cfg(all(test, feature = "vello"))]
mod tests {
    use super::*;
    use crate::hit::{HitTarget, classify};
    use crate::paint::{Frame, paint_scene};
    use fc_core::{PortDirection, PortRef, Scene, Selection, Theme, Viewport};
    use pretty_assertions::assert_eq;

    fn paint_both(scene: &Scene) -> (VelloTarget, DisplayList) {
        let theme = Theme::dark();
        let selection = Selection::new();
        let frame = Frame::new(scene, &theme, &selection, Size::new(800.0, 600.0));
        let mut vello = VelloTarget::new();
        let mut list = DisplayList::new();
        paint_scene(&mut vello, &frame);
        paint_scene(&mut list, &frame);
        (vello, list)
    }

    #[test]
    fn picks_match_display_list() {
        let mut scene = Scene::sample_workflow();
        scene.viewport = Viewport {
            x: 50.0,
            y: 20.0,
            scale: 2.0,
        };
        let (vello, list) = paint_both(&scene);
        assert!(!vello.scene().encoding().is_empty());

        let cases = [
            (Point::new(175.0, 160.0), HitTarget::Node("node-1".into())),
            (
                Point::new(250.0, 130.0),
                HitTarget::Port(PortRef::new("node-1", "out-1", PortDirection::Output)),
            ),
            (Point::new(270.0, 130.0), HitTarget::Edge("edge-1".into())),
        ];
        for (world, expected) in cases {
            let screen = scene.viewport.to_screen(world);
            let picked = vello.pick(screen);
            assert_eq!(picked, list.pick(screen));
            assert_eq!(classify(picked), expected);
        }
        let empty = scene.viewport.to_screen(Point::new(50.0, 400.0));
        assert_eq!(vello.pick(empty), None);
    }
}
