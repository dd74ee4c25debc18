//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Malformed command payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("Invalid zoom level: {0}")]
    InvalidZoom(f64),

    #[error("Invalid canvas size: {width}x{height}")]
    InvalidCanvasSize { width: f64, height: f64 },

    #[error("Cannot remove the home section: {0}")]
    CannotRemoveHome(String),

    #[error("Project has no sections")]
    EmptyProject,
}
