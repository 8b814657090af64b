//! Engine configuration.
//!
//! Zoom factors, zoom limits and pointer tolerances a host may tune. Every
//! field has a default, so a partial JSON object is a valid configuration.

use crate::error::Result;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Allowed range for `Viewport::scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self { min: 0.1, max: 8.0 }
    }
}

impl ZoomLimits {
    /// Any strictly positive finite scale.
    pub const fn unbounded() -> Self {
        Self {
            min: f64::MIN_POSITIVE,
            max: f64::MAX,
        }
    }

    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Toolbar zoom-in multiplier.
    pub zoom_in_factor: f64,
    /// Toolbar zoom-out multiplier.
    pub zoom_out_factor: f64,
    /// Wheel-up multiplier.
    pub wheel_in_factor: f64,
    /// Wheel-down multiplier.
    pub wheel_out_factor: f64,
    pub zoom_limits: ZoomLimits,
    /// Extra pick distance around edge strokes, in screen pixels.
    pub edge_pick_tolerance: f64,
    /// Background grid pitch in world units.
    pub grid_spacing: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            zoom_in_factor: 1.2,
            zoom_out_factor: 0.8,
            wheel_in_factor: 1.1,
            wheel_out_factor: 0.9,
            zoom_limits: ZoomLimits::default(),
            edge_pick_tolerance: 4.0,
            grid_spacing: 20.0,
            canvas_width: 800.0,
            canvas_height: 600.0,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn canvas_size(&self) -> Size {
        Size::new(self.canvas_width, self.canvas_height)
    }
}
