//! Errors surfaced by scene mutations and host-supplied input.
//!
//! None of these are fatal: a rejected mutation leaves the scene untouched.

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("a node with id `{0}` already exists")]
    DuplicateNode(String),

    #[error("an edge with id `{0}` already exists")]
    DuplicateEdge(String),

    #[error("node `{id}` has non-positive size {width}x{height}")]
    InvalidSize { id: String, width: f64, height: f64 },

    #[error("edge `{edge}` references missing node `{node}`")]
    MissingNode { edge: String, node: String },

    #[error("invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid color `{0}`")]
    InvalidColor(String),
}

pub type Result<T> = std::result::Result<T, SceneError>;
