//! Reference kernel learners
//!
//! Simple learners plugging into the [`Classifier`](crate::core::Classifier) and
//! [`DensityFunction`](crate::core::DensityFunction) contracts. They need no
//! optimization solver, which makes them suitable for validating kernel choices.

pub mod kernel_mean;
pub mod parzen;

pub use self::kernel_mean::*;
pub use self::parzen::*;
