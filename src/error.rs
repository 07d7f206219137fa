//! Error types for model construction and forward passes.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CharRnnError {
    // --- Input ---
    #[error("Token index {index} out of range for vocabulary of size {vocab_size}")]
    TokenOutOfRange { index: i64, vocab_size: usize },

    #[error("Empty input: batch={batch}, seq_len={seq_len}")]
    EmptyInput { batch: usize, seq_len: usize },

    // --- Shapes and state ---
    #[error("Shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },

    #[error("Hidden state kind mismatch: expected {expected}, got {got}")]
    StateKindMismatch {
        expected: &'static str,
        got: &'static str,
    },

    #[error("Device mismatch: module lives on {expected}, tensor on {got}")]
    DeviceMismatch { expected: String, got: String },

    // --- Config ---
    #[error("Encoder output width {encoder} does not match recurrent input width {recurrent}")]
    WidthMismatch { encoder: usize, recurrent: usize },

    #[error("Unknown feature mode `{0}` (expected `embed` or `onehot`)")]
    UnknownFeatureMode(String),

    #[error("Unknown cell kind `{0}` (expected `RNN`, `LSTM` or `GRU`)")]
    UnknownCellKind(String),

    #[error("Invalid config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CharRnnError>;

impl CharRnnError {
    pub(crate) fn shape(expected: impl std::fmt::Debug, got: impl std::fmt::Debug) -> Self {
        CharRnnError::ShapeMismatch {
            expected: format!("{expected:?}"),
            got: format!("{got:?}"),
        }
    }
}
