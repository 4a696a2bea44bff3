//! Multiple kernel learning container
//!
//! A [`KernelSet`] holds an ordered list of kernels, each with a non-negative weight.
//! Every view of the set (kernel list, weight array, kernel/weight pairs) is derived
//! from the same sequence of entries, so they always agree.

use crate::core::{KmError, Result};
use crate::kernel::Kernel;
use std::sync::Arc;

/// Weight given to a kernel added without an explicit weight
pub const DEFAULT_KERNEL_WEIGHT: f64 = 1.0;

/// Shared handle on a kernel of a multiple kernel problem
pub type KernelRef<T> = Arc<dyn Kernel<T>>;

/// Interface of multiple kernel problems
pub trait Mkl<T> {
    /// Add a kernel to the problem with the default weight
    fn add_kernel(&mut self, kernel: KernelRef<T>);

    /// Weights of the kernels, in the same order as `kernels()`
    fn kernel_weights(&self) -> Vec<f64>;

    /// Kernels of the problem, in the same order as `kernel_weights()`
    fn kernels(&self) -> Vec<KernelRef<T>>;

    /// Pairs of kernel and weight, one per kernel entry
    fn kernel_weight_map(&self) -> Vec<(KernelRef<T>, f64)>;
}

/// Ordered set of weighted kernels
///
/// The set is itself a kernel: K(x, y) = Σ_i w_i * K_i(x, y).
/// Adding the same kernel instance twice creates two independent entries.
pub struct KernelSet<T> {
    entries: Vec<(KernelRef<T>, f64)>,
}

impl<T> KernelSet<T> {
    /// Create an empty kernel set
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of kernels in the set
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no kernel
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a kernel with an explicit weight
    pub fn add_kernel_with_weight(&mut self, kernel: KernelRef<T>, weight: f64) -> Result<()> {
        check_weight(weight)?;
        self.entries.push((kernel, weight));
        Ok(())
    }

    /// Change the weight of the kernel at position `i`
    pub fn set_weight(&mut self, i: usize, weight: f64) -> Result<()> {
        check_weight(weight)?;
        let len = self.entries.len();
        let entry = self.entries.get_mut(i).ok_or_else(|| {
            KmError::InvalidParameter(format!("kernel index {i} out of range for {len} kernels"))
        })?;
        entry.1 = weight;
        Ok(())
    }

    /// Replace every weight at once
    pub fn set_weights(&mut self, weights: &[f64]) -> Result<()> {
        if weights.len() != self.entries.len() {
            return Err(KmError::DimensionMismatch {
                expected: self.entries.len(),
                actual: weights.len(),
            });
        }
        for &w in weights {
            check_weight(w)?;
        }
        for (entry, &w) in self.entries.iter_mut().zip(weights) {
            entry.1 = w;
        }
        Ok(())
    }

    /// Scale the weights so that they sum to one
    ///
    /// Leaves the weights untouched when they sum to zero.
    pub fn normalize_weights(&mut self) {
        let sum: f64 = self.entries.iter().map(|(_, w)| w).sum();
        if sum > 0.0 {
            for entry in &mut self.entries {
                entry.1 /= sum;
            }
        }
    }

    /// Weight of a kernel instance, looked up by identity
    ///
    /// Returns the weight of the first entry holding this instance.
    pub fn weight_of(&self, kernel: &KernelRef<T>) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| Arc::ptr_eq(k, kernel))
            .map(|&(_, w)| w)
    }

    /// Iterate over kernel/weight entries in order
    pub fn iter(&self) -> impl Iterator<Item = (&KernelRef<T>, f64)> {
        self.entries.iter().map(|(k, w)| (k, *w))
    }
}

impl<T> Default for KernelSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for KernelSet<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<T> Mkl<T> for KernelSet<T> {
    fn add_kernel(&mut self, kernel: KernelRef<T>) {
        self.entries.push((kernel, DEFAULT_KERNEL_WEIGHT));
    }

    fn kernel_weights(&self) -> Vec<f64> {
        self.entries.iter().map(|&(_, w)| w).collect()
    }

    fn kernels(&self) -> Vec<KernelRef<T>> {
        self.entries.iter().map(|(k, _)| Arc::clone(k)).collect()
    }

    fn kernel_weight_map(&self) -> Vec<(KernelRef<T>, f64)> {
        self.entries.clone()
    }
}

impl<T> Kernel<T> for KernelSet<T> {
    fn compute(&self, x: &T, y: &T) -> f64 {
        self.entries
            .iter()
            .filter(|(_, w)| *w > 0.0)
            .map(|(k, w)| w * k.compute(x, y))
            .sum()
    }

    fn compute_self(&self, x: &T) -> f64 {
        self.entries
            .iter()
            .filter(|(_, w)| *w > 0.0)
            .map(|(k, w)| w * k.compute_self(x))
            .sum()
    }
}

fn check_weight(weight: f64) -> Result<()> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(KmError::InvalidParameter(format!(
            "Kernel weight must be finite and non-negative, got: {weight}"
        )));
    }
    Ok(())
}
