//! The `RenderTarget` seam between the renderer and a drawing backend.
//!
//! Every frame is cleared and rebuilt: `begin_frame`, a sequence of draw
//! calls, `end_frame`. Pickable primitives carry a [`PickTag`]; the backend
//! answers `pick` with the tag of the topmost primitive under a screen point.

use fc_core::{Color, PortDirection};
use kurbo::{Affine, Circle, CubicBez, Point, Rect, RoundedRect, Size};

/// What a pickable primitive belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PickTag {
    NodeBody { node: String },
    NodeLabel { node: String },
    PortMarker {
        node: String,
        port: String,
        direction: PortDirection,
    },
    PortLabel { node: String },
    EdgePath { edge: String },
    EdgeLabel { edge: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
    /// `[dash, gap]` in user units.
    pub dash: Option<[f64; 2]>,
}

impl StrokeStyle {
    pub const fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub const fn dashed(color: Color, width: f64, dash: [f64; 2]) -> Self {
        Self {
            color,
            width,
            dash: Some(dash),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub size: f64,
    pub anchor: TextAnchor,
}

impl TextStyle {
    /// Rough extent of `text` drawn at `origin` (baseline), for picking.
    /// Assumes an average glyph advance of 0.6em.
    pub fn approx_bounds(&self, origin: Point, text: &str) -> Rect {
        let width = text.chars().count() as f64 * self.size * 0.6;
        let x0 = match self.anchor {
            TextAnchor::Start => origin.x,
            TextAnchor::Middle => origin.x - width / 2.0,
            TextAnchor::End => origin.x - width,
        };
        Rect::new(x0, origin.y - self.size, x0 + width, origin.y + self.size * 0.25)
    }
}

/// A drawing backend the renderer can target.
///
/// Coordinates passed to the draw calls are in the space established by the
/// last `set_transform` (identity at `begin_frame`).
pub trait RenderTarget {
    /// Start a new frame: drop everything drawn before and paint the
    /// background over the whole surface.
    fn begin_frame(&mut self, size: Size, background: Color);

    fn set_transform(&mut self, transform: Affine);

    /// Grid lines at `spacing` covering `area`.
    fn draw_grid(&mut self, area: Rect, spacing: f64, stroke: &StrokeStyle);

    fn draw_rect(
        &mut self,
        rect: RoundedRect,
        fill: Option<Color>,
        stroke: Option<&StrokeStyle>,
        tag: Option<PickTag>,
    );

    fn draw_circle(
        &mut self,
        circle: Circle,
        fill: Option<Color>,
        stroke: Option<&StrokeStyle>,
        tag: Option<PickTag>,
    );

    fn draw_curve(&mut self, curve: CubicBez, stroke: &StrokeStyle, tag: Option<PickTag>);

    /// Single-line text with its baseline at `origin`.
    fn draw_text(&mut self, origin: Point, text: &str, style: &TextStyle, tag: Option<PickTag>);

    fn end_frame(&mut self) {}

    /// Extra reach around stroked curves when picking, in screen pixels.
    fn set_pick_tolerance(&mut self, _pixels: f64) {}

    /// Tag of the topmost pickable primitive under `screen`, if any.
    fn pick(&self, screen: Point) -> Option<PickTag>;
}
