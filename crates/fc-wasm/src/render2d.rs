//! Canvas2D software renderer.
//!
//! Draws frames into an HTML `<canvas>` via `CanvasRenderingContext2d`.
//! Picking is answered by a shadow `DisplayList` fed the same draw calls, so
//! hit testing never reads pixels back.

use fc_core::Color;
use fc_render::{DisplayList, PickTag, RenderTarget, StrokeStyle, TextAnchor, TextStyle};
use kurbo::{Affine, Circle, CubicBez, Point, Rect, RoundedRect, Size};
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

pub struct Canvas2dTarget {
    ctx: CanvasRenderingContext2d,
    picks: DisplayList,
}

impl Canvas2dTarget {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self {
            ctx,
            picks: DisplayList::new(),
        }
    }

    fn apply_stroke(&self, style: &StrokeStyle) {
        self.ctx.set_stroke_style_str(&style.color.to_css());
        self.ctx.set_line_width(style.width);
        let dash = match style.dash {
            Some([on, off]) => js_sys::Array::of2(&JsValue::from_f64(on), &JsValue::from_f64(off)),
            None => js_sys::Array::new(),
        };
        let _ = self.ctx.set_line_dash(&dash);
    }

    fn fill_and_stroke(&self, fill: Option<Color>, stroke: Option<&StrokeStyle>) {
        if let Some(color) = fill {
            self.ctx.set_fill_style_str(&color.to_css());
            self.ctx.fill();
        }
        if let Some(style) = stroke {
            self.apply_stroke(style);
            self.ctx.stroke();
        }
    }
}

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, rect: Rect, r: f64) {
    let (x, y, w, h) = (rect.x0, rect.y0, rect.width(), rect.height());
    let r = r.min(w / 2.0).min(h / 2.0);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.line_to(x + w - r, y);
    ctx.arc_to(x + w, y, x + w, y + r, r).unwrap_or(());
    ctx.line_to(x + w, y + h - r);
    ctx.arc_to(x + w, y + h, x + w - r, y + h, r).unwrap_or(());
    ctx.line_to(x + r, y + h);
    ctx.arc_to(x, y + h, x, y + h - r, r).unwrap_or(());
    ctx.line_to(x, y + r);
    ctx.arc_to(x, y, x + r, y, r).unwrap_or(());
    ctx.close_path();
}

fn text_align(anchor: TextAnchor) -> &'static str {
    match anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "center",
        TextAnchor::End => "end",
    }
}

impl RenderTarget for Canvas2dTarget {
    fn begin_frame(&mut self, size: Size, background: Color) {
        let _ = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        self.ctx.set_fill_style_str(&background.to_css());
        self.ctx.fill_rect(0.0, 0.0, size.width, size.height);
        self.picks.begin_frame(size, background);
    }

    fn set_transform(&mut self, transform: Affine) {
        let [a, b, c, d, e, f] = transform.as_coeffs();
        let _ = self.ctx.set_transform(a, b, c, d, e, f);
        self.picks.set_transform(transform);
    }

    fn draw_grid(&mut self, area: Rect, spacing: f64, stroke: &StrokeStyle) {
        self.ctx.begin_path();
        let mut x = area.x0;
        while x <= area.x1 {
            self.ctx.move_to(x, area.y0);
            self.ctx.line_to(x, area.y1);
            x += spacing;
        }
        let mut y = area.y0;
        while y <= area.y1 {
            self.ctx.move_to(area.x0, y);
            self.ctx.line_to(area.x1, y);
            y += spacing;
        }
        self.apply_stroke(stroke);
        self.ctx.stroke();
        self.picks.draw_grid(area, spacing, stroke);
    }

    fn draw_rect(
        &mut self,
        rect: RoundedRect,
        fill: Option<Color>,
        stroke: Option<&StrokeStyle>,
        tag: Option<PickTag>,
    ) {
        let radius = rect.radii().as_single_radius().unwrap_or(0.0);
        rounded_rect_path(&self.ctx, rect.rect(), radius);
        self.fill_and_stroke(fill, stroke);
        self.picks.draw_rect(rect, fill, stroke, tag);
    }

    fn draw_circle(
        &mut self,
        circle: Circle,
        fill: Option<Color>,
        stroke: Option<&StrokeStyle>,
        tag: Option<PickTag>,
    ) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            circle.center.x,
            circle.center.y,
            circle.radius,
            0.0,
            std::f64::consts::TAU,
        );
        self.fill_and_stroke(fill, stroke);
        self.picks.draw_circle(circle, fill, stroke, tag);
    }

    fn draw_curve(&mut self, curve: CubicBez, stroke: &StrokeStyle, tag: Option<PickTag>) {
        self.ctx.begin_path();
        self.ctx.move_to(curve.p0.x, curve.p0.y);
        self.ctx
            .bezier_curve_to(curve.p1.x, curve.p1.y, curve.p2.x, curve.p2.y, curve.p3.x, curve.p3.y);
        self.apply_stroke(stroke);
        self.ctx.stroke();
        self.picks.draw_curve(curve, stroke, tag);
    }

    fn draw_text(&mut self, origin: Point, text: &str, style: &TextStyle, tag: Option<PickTag>) {
        self.ctx.set_font(&format!("{}px sans-serif", style.size));
        self.ctx.set_text_align(text_align(style.anchor));
        self.ctx.set_text_baseline("alphabetic");
        self.ctx.set_fill_style_str(&style.color.to_css());
        let _ = self.ctx.fill_text(text, origin.x, origin.y);
        self.picks.draw_text(origin, text, style, tag);
    }

    fn end_frame(&mut self) {
        let _ = self.ctx.set_line_dash(&js_sys::Array::new());
        self.picks.end_frame();
    }

    fn set_pick_tolerance(&mut self, pixels: f64) {
        self.picks.set_pick_tolerance(pixels);
    }

    fn pick(&self, screen: Point) -> Option<PickTag> {
        self.picks.pick(screen)
    }
}
