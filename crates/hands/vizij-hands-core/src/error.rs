//! Error type for the boundaries of the hand core.
//!
//! The per-tick path has no error channel; these only surface when raw
//! indices or configuration come in from outside (JSON, JS, FFI-style ids).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HandError {
    #[error("invalid handedness index {0}; expected 0 (left) or 1 (right)")]
    InvalidHandedness(u32),

    #[error("invalid finger index {0}; expected 0..=4")]
    InvalidFinger(usize),

    #[error("invalid joint index {0}; expected 0..=4")]
    InvalidJoint(usize),

    #[error("invalid hand config: {0}")]
    InvalidConfig(String),

    #[error("hand config json parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
