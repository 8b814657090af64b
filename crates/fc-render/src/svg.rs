//! SVG export of a recorded frame.

use crate::display_list::{DisplayList, DrawOp, Primitive};
use crate::target::StrokeStyle;
use fc_core::Color;
use kurbo::{Affine, Rect};
use std::fmt::Write;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn fill_attr(fill: Option<Color>) -> String {
    fill.map(|c| c.to_css()).unwrap_or_else(|| "none".to_string())
}

fn stroke_attrs(stroke: Option<&StrokeStyle>) -> String {
    let Some(s) = stroke else {
        return "stroke=\"none\"".to_string();
    };
    let mut attrs = format!("stroke=\"{}\" stroke-width=\"{}\"", s.color.to_css(), s.width);
    if let Some([dash, gap]) = s.dash {
        let _ = write!(attrs, " stroke-dasharray=\"{dash},{gap}\"");
    }
    attrs
}

fn matrix(t: Affine) -> String {
    let [a, b, c, d, e, f] = t.as_coeffs();
    format!("matrix({a} {b} {c} {d} {e} {f})")
}

fn grid_svg(out: &mut String, area: Rect, spacing: f64, stroke: &StrokeStyle) {
    let _ = writeln!(
        out,
        "  <defs><pattern id=\"fc-grid\" width=\"{spacing}\" height=\"{spacing}\" patternUnits=\"userSpaceOnUse\">\
         <path d=\"M {spacing} 0 L 0 0 0 {spacing}\" fill=\"none\" {} /></pattern></defs>",
        stroke_attrs(Some(stroke))
    );
    let _ = writeln!(
        out,
        "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"url(#fc-grid)\" />",
        area.x0,
        area.y0,
        area.width(),
        area.height()
    );
}

fn op_svg(out: &mut String, op: &DrawOp) {
    match &op.primitive {
        Primitive::Grid { area, spacing, stroke } => grid_svg(out, *area, *spacing, stroke),
        Primitive::Rect { rect, fill, stroke } => {
            let r = rect.rect();
            let radius = rect.radii().as_single_radius().unwrap_or(0.0);
            let _ = writeln!(
                out,
                "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{radius}\" ry=\"{radius}\" fill=\"{}\" {} />",
                r.x0,
                r.y0,
                r.width(),
                r.height(),
                fill_attr(*fill),
                stroke_attrs(stroke.as_ref())
            );
        }
        Primitive::Circle { circle, fill, stroke } => {
            let _ = writeln!(
                out,
                "  <circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" {} />",
                circle.center.x,
                circle.center.y,
                circle.radius,
                fill_attr(*fill),
                stroke_attrs(stroke.as_ref())
            );
        }
        Primitive::Curve { curve, stroke } => {
            let _ = writeln!(
                out,
                "  <path d=\"M {} {} C {} {} {} {} {} {}\" fill=\"none\" {} />",
                curve.p0.x,
                curve.p0.y,
                curve.p1.x,
                curve.p1.y,
                curve.p2.x,
                curve.p2.y,
                curve.p3.x,
                curve.p3.y,
                stroke_attrs(Some(stroke))
            );
        }
        Primitive::Text { origin, text, style } => {
            let _ = writeln!(
                out,
                "  <text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"{}\" fill=\"{}\" text-anchor=\"{}\">{}</text>",
                origin.x,
                origin.y,
                style.size,
                style.color.to_css(),
                style.anchor.as_str(),
                escape(text)
            );
        }
    }
}

impl DisplayList {
    /// Serialize the last recorded frame as a standalone SVG document.
    ///
    /// Runs of ops sharing a transform are wrapped in one `<g>`.
    pub fn to_svg(&self) -> String {
        let size = self.size();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            w = size.width,
            h = size.height
        );
        if let Some(bg) = self.background() {
            let _ = writeln!(out, "  <rect width=\"100%\" height=\"100%\" fill=\"{}\" />", bg.to_css());
        }

        let mut current = Affine::IDENTITY;
        let mut open = false;
        for op in self.ops() {
            if op.transform != current || !open {
                if open {
                    out.push_str("</g>\n");
                }
                let _ = writeln!(out, "<g transform=\"{}\">", matrix(op.transform));
                current = op.transform;
                open = true;
            }
            op_svg(&mut out, op);
        }
        if open {
            out.push_str("</g>\n");
        }
        out.push_str("</svg>\n");
        out
    }
}
