//! Viewport transform: screen ↔ world mapping and pan/zoom state.
//!
//! `screen = world * scale + translation`. The translation is kept in screen
//! units so panning by a pointer delta is a plain addition.

use crate::config::ZoomLimits;
use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

fn unit_scale() -> f64 {
    1.0
}

/// Pan/zoom state, serialized as `{x, y, scale}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "unit_scale")]
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

impl Viewport {
    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// World → screen affine, `translate(x, y) · scale(s)`.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.translation()) * Affine::scale(self.scale)
    }

    pub fn to_world(&self, screen: Point) -> Point {
        ((screen.to_vec2() - self.translation()) / self.scale).to_point()
    }

    pub fn to_screen(&self, world: Point) -> Point {
        (world.to_vec2() * self.scale + self.translation()).to_point()
    }

    /// Scale is finite and strictly positive, translation finite.
    pub fn is_valid(&self) -> bool {
        self.scale.is_finite() && self.scale > 0.0 && self.x.is_finite() && self.y.is_finite()
    }

    /// Multiply the scale by `factor`, keeping the world point under
    /// `anchor` (screen space) fixed on screen.
    ///
    /// The resulting scale is clamped to `limits`, but only in the direction
    /// of travel: a scale already outside the limits never moves the wrong
    /// way. The returned value is the factor actually applied.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64, limits: ZoomLimits) -> f64 {
        let world = self.to_world(anchor);
        let old_scale = self.scale;
        let target = limits.clamp(old_scale * factor);
        self.scale = if factor >= 1.0 {
            old_scale.max(target)
        } else {
            old_scale.min(target)
        };
        let translation = anchor.to_vec2() - world.to_vec2() * self.scale;
        self.x = translation.x;
        self.y = translation.y;
        log::trace!("zoom at ({}, {}) x{factor}: scale {old_scale} -> {}", anchor.x, anchor.y, self.scale);
        self.scale / old_scale
    }

    /// Zoom around the middle of a canvas of the given size.
    pub fn zoom_about_center(&mut self, canvas: Size, factor: f64, limits: ZoomLimits) -> f64 {
        let center = Point::new(canvas.width / 2.0, canvas.height / 2.0);
        self.zoom_at(center, factor, limits)
    }

    /// Translate by a screen-space delta.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Scale back to 1 without touching the translation.
    pub fn reset_zoom(&mut self) {
        self.scale = 1.0;
    }

    /// Translation back to the origin without touching the scale.
    pub fn center_view(&mut self) {
        self.x = 0.0;
        self.y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    #[test]
    fn world_screen_roundtrip() {
        let vp = Viewport {
            x: 40.0,
            y: -12.0,
            scale: 2.5,
        };
        let p = Point::new(13.0, 7.0);
        assert!(approx(vp.to_world(vp.to_screen(p)), p));
        assert!(approx(vp.to_world(Point::new(40.0, -12.0)), Point::ZERO));
        assert!(approx(vp.transform() * p, vp.to_screen(p)));
    }

    #[test]
    fn zoom_never_reverses_outside_limits() {
        let limits = ZoomLimits::default();
        let anchor = Point::new(100.0, 100.0);

        let mut vp = Viewport { x: 0.0, y: 0.0, scale: 20.0 };
        vp.zoom_at(anchor, 1.1, limits);
        assert_eq!(vp.scale, 20.0);
        vp.zoom_at(anchor, 0.9, limits);
        assert_eq!(vp.scale, 8.0);

        let mut vp = Viewport { x: 0.0, y: 0.0, scale: 0.01 };
        vp.zoom_at(anchor, 0.9, limits);
        assert_eq!(vp.scale, 0.01);
        vp.zoom_at(anchor, 1.1, limits);
        assert_eq!(vp.scale, 0.1);
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let limits = ZoomLimits::unbounded();
        let anchors = [Point::new(0.0, 0.0), Point::new(123.0, 456.0), Point::new(-50.0, 20.0)];
        for anchor in anchors {
            for factor in [1.1, 0.9, 1.2, 0.8] {
                let mut vp = Viewport {
                    x: 17.0,
                    y: 33.0,
                    scale: 1.3,
                };
                let before = vp.to_world(anchor);
                vp.zoom_at(anchor, factor, limits);
                assert!(approx(vp.to_world(anchor), before), "anchor {anchor:?} factor {factor}");
            }
        }
    }

    #[test]
    fn clamped_zoom_still_anchors() {
        let limits = ZoomLimits { min: 0.5, max: 2.0 };
        let mut vp = Viewport {
            x: 0.0,
            y: 0.0,
            scale: 1.9,
        };
        let anchor = Point::new(200.0, 100.0);
        let before = vp.to_world(anchor);
        let applied = vp.zoom_at(anchor, 1.2, limits);
        assert_eq!(vp.scale, 2.0);
        assert!((applied - 2.0 / 1.9).abs() < EPS);
        assert!(approx(vp.to_world(anchor), before));
    }

    #[test]
    fn reset_and_center_are_independent() {
        let mut vp = Viewport {
            x: 10.0,
            y: 20.0,
            scale: 3.0,
        };
        vp.reset_zoom();
        assert_eq!((vp.x, vp.y, vp.scale), (10.0, 20.0, 1.0));
        vp.scale = 3.0;
        vp.center_view();
        assert_eq!((vp.x, vp.y, vp.scale), (0.0, 0.0, 3.0));
    }

    #[test]
    fn missing_scale_defaults_to_one() {
        let vp: Viewport = serde_json::from_str(r#"{"x": 5, "y": 6}"#).unwrap();
        assert_eq!(vp.scale, 1.0);
    }
}
