//! Error types for the kernel machines toolkit

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KmError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Evaluator not ready: {0} not set")]
    EvaluatorNotReady(&'static str),

    #[error("Evaluation failed: {0}")]
    Evaluation(String),

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("Invalid label: expected a finite value, got {0}")]
    InvalidLabel(f64),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KmError>;
