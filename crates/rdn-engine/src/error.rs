//! Error types for rdn-engine.

use thiserror::Error;

use crate::model::ModelKind;

/// Configuration problems reported by the host-facing setters.
///
/// The engine logs these and keeps running with whatever it could apply.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Parameter array length does not match the model's arity.
    #[error("params is wrong length for {model}: expected {expected}, got {got}")]
    ParamCount {
        /// Model the parameters were meant for.
        model: ModelKind,
        /// Number of named coefficients.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },

    /// Color matrix must have exactly 20 entries.
    #[error("color matrix is wrong length: expected 20, got {0}")]
    ColorMatrixLength(usize),

    /// No model is registered at this index.
    #[error("unknown model index: {0}")]
    UnknownModel(usize),

    /// The model has no palette at this index.
    #[error("unknown palette index {index} for {model}")]
    UnknownPalette {
        /// Active model.
        model: ModelKind,
        /// Requested palette index.
        index: usize,
    },
}

/// Errors returned by [`Engine::render`](crate::Engine::render).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Frame byte size does not fit in `usize`.
    #[error("frame too large: {width}x{height}")]
    FrameTooLarge {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// Row stride is shorter than one row of pixels.
    #[error("row stride too small: need {needed} bytes, got {got}")]
    StrideTooSmall {
        /// Bytes per row required.
        needed: usize,
        /// Stride supplied.
        got: usize,
    },

    /// Pixel buffer cannot hold the frame.
    #[error("pixel buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall {
        /// Bytes required.
        needed: usize,
        /// Buffer length supplied.
        got: usize,
    },
}
