//! Error types for codec operations

use thiserror::Error;

/// Error type for codec operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("decode underrun: requested {requested} bits, {remaining} remaining")]
    Underrun { requested: usize, remaining: usize },
    #[error("extra data found: {0} bits")]
    ExtraData(usize),
    #[error("unknown codec type: {0}")]
    UnknownCodecType(String),
    #[error("invalid range: [{min}, {max}]")]
    InvalidRange { min: i128, max: i128 },
    #[error("invalid resolution: {0}")]
    InvalidResolution(i128),
    #[error("invalid config for {codec}: {reason}")]
    InvalidConfig { codec: String, reason: String },
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("field count mismatch: expected {expected}, found {found}")]
    FieldCount { expected: usize, found: usize },
}

impl Error {
    /// Wraps a configuration failure for the codec registered under `codec`.
    pub(crate) fn config(codec: &str, reason: impl ToString) -> Self {
        Self::InvalidConfig {
            codec: codec.to_string(),
            reason: reason.to_string(),
        }
    }
}
