//! Error types for the element model

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Invalid dimension: {0:?} (expected \"<n>px\" or \"auto\")")]
    InvalidDimension(String),

    #[error("Unknown element type: {0}")]
    UnknownElementType(String),
}
