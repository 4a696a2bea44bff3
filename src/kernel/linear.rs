//! Linear kernel implementation

use crate::kernel::Kernel;

/// Linear kernel on dense vectors: K(x, y) = x^T * y
///
/// Vectors of different length are compared on their common prefix, missing
/// trailing components count as zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleLinear;

impl DoubleLinear {
    /// Create a new linear kernel
    pub fn new() -> Self {
        Self
    }
}

impl Kernel<Vec<f64>> for DoubleLinear {
    fn compute(&self, x: &Vec<f64>, y: &Vec<f64>) -> f64 {
        dot_product(x, y)
    }
}

/// Dot product of two dense vectors
pub(crate) fn dot_product(x: &[f64], y: &[f64]) -> f64 {
    x.iter().zip(y).map(|(a, b)| a * b).sum()
}
