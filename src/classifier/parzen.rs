//! Parzen window density estimation

use crate::core::{DensityFunction, KmError, Result};
use crate::kernel::Kernel;

/// Parzen window density: p(x) = (1/n) Σ_i K(x, x_i)
///
/// An untrained estimator gives 0.0 everywhere.
#[derive(Debug, Clone)]
pub struct ParzenDensity<T, K> {
    kernel: K,
    samples: Vec<T>,
}

impl<T, K: Kernel<T>> ParzenDensity<T, K> {
    /// Create an untrained estimator with the given kernel
    pub fn new(kernel: K) -> Self {
        Self {
            kernel,
            samples: Vec::new(),
        }
    }

    /// Number of training samples
    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    /// The kernel used as window
    pub fn kernel(&self) -> &K {
        &self.kernel
    }
}

impl<T: Clone, K: Kernel<T>> DensityFunction<T> for ParzenDensity<T, K> {
    fn train_sample(&mut self, sample: &T) -> Result<()> {
        self.samples.push(sample.clone());
        Ok(())
    }

    fn train(&mut self, samples: &[T]) -> Result<()> {
        if samples.is_empty() {
            return Err(KmError::EmptyDataset);
        }
        self.samples = samples.to_vec();
        log::debug!("Parzen density trained on {} samples", samples.len());
        Ok(())
    }

    fn value_of(&self, sample: &T) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .samples
            .iter()
            .map(|s| self.kernel.compute(sample, s))
            .sum();
        sum / self.samples.len() as f64
    }
}
