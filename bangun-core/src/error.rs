//! Error types shared by the core and both front ends.

use thiserror::Error;

/// Errors raised while turning user input into shapes or loading config.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// A menu name or shape tag that matches no known solid.
    #[error("unknown shape `{0}`")]
    UnknownShape(String),

    /// Prisms and pyramids only come with 3 to 6 sides.
    #[error("side count {0} is not supported (expected 3 to 6)")]
    UnsupportedSideCount(u32),

    /// The viewer configuration could not be parsed or serialized.
    #[error("invalid viewer config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T, E = ShapeError> = std::result::Result<T, E>;
