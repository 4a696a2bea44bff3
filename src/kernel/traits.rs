//! Kernel trait definitions

/// Kernel function over samples of type `T`
///
/// A kernel maps two samples to a real similarity value. Evaluation has no side
/// effects, so a kernel can be shared between threads; hyperparameter setters take
/// `&mut self` and therefore cannot race with evaluation.
pub trait Kernel<T>: Send + Sync {
    /// Compute kernel value K(x, y)
    fn compute(&self, x: &T, y: &T) -> f64;

    /// Compute the self-similarity K(x, x)
    ///
    /// Downstream algorithms use this entry point when they need a norm, so it is
    /// always defined even when a kernel gives it a conventional value.
    fn compute_self(&self, x: &T) -> f64 {
        self.compute(x, x)
    }

    /// Full Gram matrix of a sample list
    ///
    /// Only the upper triangle is evaluated, the lower one is mirrored.
    fn gram_matrix(&self, samples: &[T]) -> Vec<Vec<f64>> {
        let n = samples.len();
        let mut matrix = vec![vec![0.0; n]; n];
        for i in 0..n {
            matrix[i][i] = self.compute_self(&samples[i]);
            for j in (i + 1)..n {
                let value = self.compute(&samples[i], &samples[j]);
                matrix[i][j] = value;
                matrix[j][i] = value;
            }
        }
        matrix
    }

    /// Rectangular kernel matrix with `rows[i]` against `cols[j]`
    fn gram_matrix_between(&self, rows: &[T], cols: &[T]) -> Vec<Vec<f64>> {
        rows.iter()
            .map(|x| cols.iter().map(|y| self.compute(x, y)).collect())
            .collect()
    }
}

/// Gaussian-form kernel: K(x, y) = exp(-γ * d(x, y))
///
/// Exposes the bandwidth and the underlying distance for algorithms that need
/// the metric rather than the similarity.
pub trait GaussianKernel<T>: Kernel<T> {
    /// The bandwidth parameter
    fn gamma(&self) -> f64;

    /// Set the bandwidth parameter
    fn set_gamma(&mut self, gamma: f64);

    /// The distance d(x, y) under the exponential
    fn distance(&self, x: &T, y: &T) -> f64;
}

impl<T, K: Kernel<T> + ?Sized> Kernel<T> for std::sync::Arc<K> {
    fn compute(&self, x: &T, y: &T) -> f64 {
        (**self).compute(x, y)
    }

    fn compute_self(&self, x: &T) -> f64 {
        (**self).compute_self(x)
    }
}
