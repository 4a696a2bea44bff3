//! Evaluation of classifiers: metrics, evaluators and cross-validation

pub mod cross_validation;
pub mod evaluators;
pub mod metrics;

pub use self::cross_validation::*;
pub use self::evaluators::*;
pub use self::metrics::*;
