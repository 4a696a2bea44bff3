//! Gaussian kernel on dense vectors
//!
//! K(x, y) = exp(-γ * ||x - y||²)

use crate::kernel::{GaussianKernel, Kernel};

/// Gaussian L2 kernel over the whole dense vector
///
/// The gamma parameter controls the reach of each sample:
/// - High gamma: only close points are similar
/// - Low gamma: distant points keep some similarity
#[derive(Debug, Clone, Copy)]
pub struct DoubleGaussL2 {
    gamma: f64,
}

impl DoubleGaussL2 {
    /// Create a Gaussian kernel with the given gamma
    pub fn new(gamma: f64) -> Self {
        Self { gamma }
    }

    /// Gaussian kernel with gamma = 1.0 / n_features
    ///
    /// # Panics
    /// Panics if `n_features` is zero
    pub fn with_auto_gamma(n_features: usize) -> Self {
        assert!(n_features > 0, "Number of features must be positive");
        Self::new(1.0 / n_features as f64)
    }
}

impl Default for DoubleGaussL2 {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl Kernel<Vec<f64>> for DoubleGaussL2 {
    fn compute(&self, x: &Vec<f64>, y: &Vec<f64>) -> f64 {
        (-self.gamma * squared_euclidean_distance(x, y)).exp()
    }

    fn compute_self(&self, _x: &Vec<f64>) -> f64 {
        1.0
    }
}

impl GaussianKernel<Vec<f64>> for DoubleGaussL2 {
    fn gamma(&self) -> f64 {
        self.gamma
    }

    fn set_gamma(&mut self, gamma: f64) {
        self.gamma = gamma;
    }

    fn distance(&self, x: &Vec<f64>, y: &Vec<f64>) -> f64 {
        squared_euclidean_distance(x, y)
    }
}

/// Squared Euclidean distance ||x - y||²
///
/// Components past the end of the shorter vector are treated as zero.
fn squared_euclidean_distance(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().max(y.len());
    (0..n)
        .map(|i| {
            let diff = x.get(i).copied().unwrap_or(0.0) - y.get(i).copied().unwrap_or(0.0);
            diff * diff
        })
        .sum()
}
