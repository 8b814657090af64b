//! Headless retained render target.
//!
//! Records every draw call of a frame together with the transform it was
//! issued under. Picking walks the list back to front (last drawn is
//! topmost) and tests geometry in the primitive's own space.

use crate::target::{PickTag, RenderTarget, StrokeStyle, TextStyle};
use fc_core::Color;
use kurbo::{Affine, Circle, CubicBez, ParamCurveNearest, Point, Rect, RoundedRect, Shape, Size};

/// Default extra pick distance around curves, in screen pixels.
pub const DEFAULT_PICK_TOLERANCE: f64 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Grid {
        area: Rect,
        spacing: f64,
        stroke: StrokeStyle,
    },
    Rect {
        rect: RoundedRect,
        fill: Option<Color>,
        stroke: Option<StrokeStyle>,
    },
    Circle {
        circle: Circle,
        fill: Option<Color>,
        stroke: Option<StrokeStyle>,
    },
    Curve {
        curve: CubicBez,
        stroke: StrokeStyle,
    },
    Text {
        origin: Point,
        text: String,
        style: TextStyle,
    },
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawOp {
    pub transform: Affine,
    pub primitive: Primitive,
    pub tag: Option<PickTag>,
}

#[derive(Debug, Clone)]
pub struct DisplayList {
    size: Size,
    background: Option<Color>,
    transform: Affine,
    ops: Vec<DrawOp>,
    pick_tolerance: f64,
}

impl Default for DisplayList {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayList {
    pub fn new() -> Self {
        Self {
            size: Size::ZERO,
            background: None,
            transform: Affine::IDENTITY,
            ops: Vec::new(),
            pick_tolerance: DEFAULT_PICK_TOLERANCE,
        }
    }

    pub fn with_pick_tolerance(mut self, pixels: f64) -> Self {
        self.pick_tolerance = pixels;
        self
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// First op carrying `tag`.
    pub fn find(&self, tag: &PickTag) -> Option<&DrawOp> {
        self.ops.iter().find(|op| op.tag.as_ref() == Some(tag))
    }

    /// Every text string in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match &op.primitive {
            Primitive::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    fn push(&mut self, primitive: Primitive, tag: Option<PickTag>) {
        self.ops.push(DrawOp {
            transform: self.transform,
            primitive,
            tag,
        });
    }

    fn hits(&self, op: &DrawOp, screen: Point) -> bool {
        let local = op.transform.inverse() * screen;
        // Uniform scale of the op's transform, used to turn pixels into local units
        let scale = op.transform.determinant().abs().sqrt().max(f64::EPSILON);
        match &op.primitive {
            Primitive::Grid { .. } => false,
            Primitive::Rect { rect, .. } => rect.contains(local),
            Primitive::Circle { circle, stroke, .. } => {
                let half_stroke = stroke.map_or(0.0, |s| s.width / 2.0);
                circle.center.distance(local) <= circle.radius + half_stroke
            }
            Primitive::Curve { curve, stroke } => {
                let reach = stroke.width / 2.0 + self.pick_tolerance / scale;
                curve.nearest(local, 1e-3).distance_sq <= reach * reach
            }
            Primitive::Text { origin, text, style } => style.approx_bounds(*origin, text).contains(local),
        }
    }
}

impl RenderTarget for DisplayList {
    fn begin_frame(&mut self, size: Size, background: Color) {
        self.ops.clear();
        self.size = size;
        self.background = Some(background);
        self.transform = Affine::IDENTITY;
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn draw_grid(&mut self, area: Rect, spacing: f64, stroke: &StrokeStyle) {
        self.push(
            Primitive::Grid {
                area,
                spacing,
                stroke: *stroke,
            },
            None,
        );
    }

    fn draw_rect(
        &mut self,
        rect: RoundedRect,
        fill: Option<Color>,
        stroke: Option<&StrokeStyle>,
        tag: Option<PickTag>,
    ) {
        let stroke = stroke.copied();
        self.push(Primitive::Rect { rect, fill, stroke }, tag);
    }

    fn draw_circle(
        &mut self,
        circle: Circle,
        fill: Option<Color>,
        stroke: Option<&StrokeStyle>,
        tag: Option<PickTag>,
    ) {
        let stroke = stroke.copied();
        self.push(Primitive::Circle { circle, fill, stroke }, tag);
    }

    fn draw_curve(&mut self, curve: CubicBez, stroke: &StrokeStyle, tag: Option<PickTag>) {
        self.push(
            Primitive::Curve {
                curve,
                stroke: *stroke,
            },
            tag,
        );
    }

    fn draw_text(&mut self, origin: Point, text: &str, style: &TextStyle, tag: Option<PickTag>) {
        self.push(
            Primitive::Text {
                origin,
                text: text.to_string(),
                style: *style,
            },
            tag,
        );
    }

    fn set_pick_tolerance(&mut self, pixels: f64) {
        self.pick_tolerance = pixels;
    }

    fn end_frame(&mut self) {
        log::trace!("display list frame: {} ops", self.ops.len());
    }

    fn pick(&self, screen: Point) -> Option<PickTag> {
        self.ops
            .iter()
            .rev()
            .filter(|op| op.tag.is_some())
            .find(|op| self.hits(op, screen))
            .and_then(|op| op.tag.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;

    const INK: Color = Color::rgb(0, 0, 0);

    fn node_tag(id: &str) -> PickTag {
        PickTag::NodeBody { node: id.into() }
    }

    #[test]
    fn begin_frame_clears_previous_ops() {
        let mut list = DisplayList::new();
        list.begin_frame(Size::new(10.0, 10.0), INK);
        list.draw_rect(Rect::new(0.0, 0.0, 1.0, 1.0).to_rounded_rect(0.0), Some(INK), None, None);
        assert_eq!(list.ops().len(), 1);
        list.begin_frame(Size::new(10.0, 10.0), INK);
        assert!(list.ops().is_empty());
    }

    #[test]
    fn topmost_primitive_wins() {
        let mut list = DisplayList::new();
        list.begin_frame(Size::new(100.0, 100.0), INK);
        let rect = Rect::new(0.0, 0.0, 50.0, 50.0).to_rounded_rect(5.0);
        list.draw_rect(rect, Some(INK), None, Some(node_tag("below")));
        list.draw_rect(rect, Some(INK), None, Some(node_tag("above")));
        assert_eq!(list.pick(Point::new(25.0, 25.0)), Some(node_tag("above")));
        assert_eq!(list.pick(Point::new(75.0, 75.0)), None);
    }

    #[test]
    fn pick_respects_transform() {
        let mut list = DisplayList::new();
        list.begin_frame(Size::new(400.0, 400.0), INK);
        list.set_transform(Affine::translate(Vec2::new(100.0, 0.0)) * Affine::scale(2.0));
        list.draw_rect(
            Rect::new(0.0, 0.0, 10.0, 10.0).to_rounded_rect(0.0),
            Some(INK),
            None,
            Some(node_tag("n")),
        );
        assert_eq!(list.pick(Point::new(115.0, 15.0)), Some(node_tag("n")));
        assert_eq!(list.pick(Point::new(15.0, 15.0)), None);
    }

    #[test]
    fn curve_pick_uses_screen_tolerance() {
        let mut list = DisplayList::new();
        list.begin_frame(Size::new(400.0, 400.0), INK);
        let tag = PickTag::EdgePath { edge: "e".into() };
        let curve = CubicBez::new((0.0, 0.0), (10.0, 0.0), (90.0, 0.0), (100.0, 0.0));
        list.draw_curve(curve, &StrokeStyle::solid(INK, 1.0), Some(tag.clone()));
        assert_eq!(list.pick(Point::new(50.0, 4.0)), Some(tag));
        assert_eq!(list.pick(Point::new(50.0, 8.0)), None);
    }

    #[test]
    fn untagged_primitives_are_transparent() {
        let mut list = DisplayList::new();
        list.begin_frame(Size::new(100.0, 100.0), INK);
        let rect = Rect::new(0.0, 0.0, 50.0, 50.0).to_rounded_rect(0.0);
        list.draw_rect(rect, Some(INK), None, Some(node_tag("n")));
        list.draw_rect(rect, Some(INK), None, None);
        assert_eq!(list.pick(Point::new(10.0, 10.0)), Some(node_tag("n")));
    }
}
