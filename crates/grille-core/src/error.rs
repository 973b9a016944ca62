//! Error types for the structure model.
//!
//! Validation errors come from user-entered numbers (spacings, force
//! values, scale factors) and are always recoverable: the caller keeps
//! the previous value. Codec errors come from the file boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Rejected numeric or enumerated input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("input is empty")]
    Empty,

    #[error("malformed number in {input:?} at offset {offset}")]
    Malformed { input: String, offset: usize },

    #[error("spacing must be a positive finite number, got {value}")]
    InvalidSpacing { value: f64 },

    #[error("value must be finite, got {value}")]
    NotFinite { value: f64 },

    #[error("scale factor {factor} is outside [{min}, {max}]")]
    ScaleOutOfRange { factor: f64, min: f64, max: f64 },

    #[error("unknown {kind} {name:?}")]
    UnknownName { kind: &'static str, name: String },
}

/// Failure while reading, writing, or interpreting a structure file.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid structure JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("line {line} does not connect two distinct nodes")]
    UnresolvedLine { line: u32 },

    #[error("no file path to save to")]
    NoPath,
}

impl CodecError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
