pub mod config;
pub mod error;
pub mod id;
pub mod model;
pub mod sample;
pub mod selection;
pub mod theme;
pub mod viewport;

pub use config::{EngineConfig, ZoomLimits};
pub use error::SceneError;
pub use id::IdGenerator;
pub use model::*;
pub use selection::{Selected, Selection};
pub use theme::{Color, Theme};
pub use viewport::Viewport;

// Re-export kurbo geometry so downstream crates share one version
pub use kurbo::{Point, Size, Vec2};
