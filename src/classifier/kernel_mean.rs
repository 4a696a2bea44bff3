//! Kernel class-mean classifier
//!
//! Assigns a sample to the class whose mean in feature space is closest:
//!
//! f(x) = (1/n₊) Σ₊ K(x, p) - (1/n₋) Σ₋ K(x, n) + b
//!
//! with b = (mean K(n, n') - mean K(p, p')) / 2 over pairs of training samples.
//!
//! Within-class Gram entries are kept in a [`GramCache`] between incremental
//! updates, so adding one sample only evaluates the kernel on its own row.

use crate::cache::{CacheStats, GramCache};
use crate::core::{Classifier, KmError, Result, TrainingSample, POSITIVE};
use crate::kernel::Kernel;

/// Default bound on the number of cached Gram entries
pub const DEFAULT_GRAM_CAPACITY: usize = 1 << 16;

/// Class-mean classifier in the feature space of a kernel
#[derive(Debug, Clone)]
pub struct KernelMeanClassifier<T, K> {
    kernel: K,
    support: Vec<T>,
    labels: Vec<i32>,
    coefficients: Vec<f64>,
    bias: f64,
    gram: GramCache,
    gram_capacity: usize,
}

impl<T: Clone, K: Kernel<T>> KernelMeanClassifier<T, K> {
    /// Create an untrained classifier with the given kernel
    pub fn new(kernel: K) -> Self {
        Self {
            kernel,
            support: Vec::new(),
            labels: Vec::new(),
            coefficients: Vec::new(),
            bias: 0.0,
            gram: GramCache::new(1),
            gram_capacity: DEFAULT_GRAM_CAPACITY,
        }
    }

    /// Bound the number of Gram entries kept between updates
    pub fn with_gram_capacity(mut self, capacity: usize) -> Self {
        self.gram_capacity = capacity.max(1);
        self
    }

    /// The kernel of the classifier
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Mutable access to the kernel, e.g. to tune its hyperparameters before training
    ///
    /// Cached Gram entries are dropped.
    pub fn kernel_mut(&mut self) -> &mut K {
        self.gram.clear();
        &mut self.kernel
    }

    /// Bias term of the decision function
    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Per-sample coefficients of the decision function: 1/n₊ or -1/n₋
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Number of training samples in the model
    pub fn n_samples(&self) -> usize {
        self.support.len()
    }

    /// Statistics of the Gram cache since the last batch training
    pub fn gram_stats(&self) -> CacheStats {
        self.gram.stats()
    }

    fn fit(&mut self) -> Result<()> {
        if self.support.is_empty() {
            return Err(KmError::EmptyDataset);
        }

        let labels = &self.labels;
        let (positives, negatives): (Vec<usize>, Vec<usize>) =
            (0..labels.len()).partition(|&i| labels[i] == POSITIVE);

        if positives.is_empty() || negatives.is_empty() {
            log::warn!(
                "Training set holds a single class ({} positive, {} negative)",
                positives.len(),
                negatives.len()
            );
        }

        let mut coefficients = vec![0.0; self.support.len()];
        for &i in &positives {
            coefficients[i] = 1.0 / positives.len() as f64;
        }
        for &i in &negatives {
            coefficients[i] = -1.0 / negatives.len() as f64;
        }

        let pairs = |n: usize| n * (n + 1) / 2;
        let needed = pairs(positives.len()) + pairs(negatives.len());
        self.gram.grow_to(needed.min(self.gram_capacity));

        let negative_mean = self.gram.block_mean(&self.kernel, &self.support, &negatives);
        let positive_mean = self.gram.block_mean(&self.kernel, &self.support, &positives);
        log::debug!(
            "Kernel mean classifier fitted on {} samples, gram hit rate {:.2}",
            self.support.len(),
            self.gram.hit_rate()
        );

        self.coefficients = coefficients;
        self.bias = (negative_mean - positive_mean) / 2.0;
        Ok(())
    }
}

impl<T: Clone, K: Kernel<T>> Classifier<T> for KernelMeanClassifier<T, K> {
    fn train_sample(&mut self, sample: &TrainingSample<T>) -> Result<()> {
        self.support.push(sample.sample.clone());
        self.labels.push(sample.label);
        self.fit()
    }

    fn train(&mut self, samples: &[TrainingSample<T>]) -> Result<()> {
        self.support = samples.iter().map(|s| s.sample.clone()).collect();
        self.labels = samples.iter().map(|s| s.label).collect();
        self.gram.clear();
        self.fit()
    }

    fn value_of(&self, sample: &T) -> f64 {
        let mut result = 0.0;
        for (support, &coefficient) in self.support.iter().zip(&self.coefficients) {
            result += coefficient * self.kernel.compute(sample, support);
        }
        result + self.bias
    }
}
