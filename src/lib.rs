//! Kernel machines toolkit
//!
//! Generic kernels over arbitrary sample types, kernel combinators (bag kernels,
//! per-feature kernels, weighted multiple kernel sets), simple kernel learners and a
//! balanced randomized cross-validation harness.

pub mod cache;
pub mod classifier;
pub mod core;
pub mod data;
pub mod evaluation;
pub mod kernel;
pub mod persistence;

// Re-export main types for convenience
pub use crate::cache::{CacheStats, GramCache};
pub use crate::classifier::{KernelMeanClassifier, ParzenDensity};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{KmError, Result};
pub use crate::data::DenseDataset;
pub use crate::evaluation::{
    AccuracyEvaluator, ApEvaluator, BalancedCrossValidation, CrossValidation,
    CrossValidationConfig, RandomSplitCrossValidation,
};
pub use crate::kernel::{GaussianKernel, Kernel, KernelSet, Mkl};
pub use crate::persistence::CrossValidationReport;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
