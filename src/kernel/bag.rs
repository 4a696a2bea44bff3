//! Bag kernels over ordered collections
//!
//! A bag kernel averages a base kernel over every pair of elements taken from two
//! collections. The bounded variant restricts each side to an index range.

use crate::kernel::Kernel;
use std::marker::PhantomData;

/// Default threshold below which a base kernel term is dropped from the sum
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Mean of a base kernel over sub-ranges of two bags
///
/// K(B1, B2) = Σ k(B1[i], B2[j]) / ((to1 - fr1) * (to2 - fr2)), for i in [fr1, to1),
/// j in [fr2, to2), where only terms strictly greater than epsilon enter the sum.
/// The divisor always counts every pair of the ranges.
///
/// Upper bounds larger than a bag are clamped to its length for the current call
/// only. An empty range yields 0.0.
///
/// Using different ranges on the left and right sides breaks symmetry, so the
/// result is no longer a kernel. This is still useful to inspect a precise part
/// of the sum.
pub struct SubListKernel<S, K> {
    kernel: K,
    from_left: usize,
    to_left: usize,
    from_right: usize,
    to_right: usize,
    epsilon: f64,
    _element: PhantomData<fn(&S)>,
}

impl<S, K: Kernel<S>> SubListKernel<S, K> {
    /// Create a bag kernel with independent bounds for the left and right bags
    ///
    /// Lower bounds are inclusive, upper bounds exclusive.
    pub fn new(
        kernel: K,
        from_left: usize,
        to_left: usize,
        from_right: usize,
        to_right: usize,
    ) -> Self {
        Self {
            kernel,
            from_left,
            to_left,
            from_right,
            to_right,
            epsilon: DEFAULT_EPSILON,
            _element: PhantomData,
        }
    }

    /// Create a bag kernel using the same range on both sides
    pub fn symmetric(kernel: K, from: usize, to: usize) -> Self {
        Self::new(kernel, from, to, from, to)
    }

    /// Create a bag kernel averaging over complete bags
    pub fn whole(kernel: K) -> Self {
        Self::symmetric(kernel, 0, usize::MAX)
    }

    /// Set the threshold under which base kernel terms are ignored
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Threshold under which base kernel terms are ignored
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Set the threshold under which base kernel terms are ignored
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    /// Configured left range `(from, to)`
    pub fn left_bounds(&self) -> (usize, usize) {
        (self.from_left, self.to_left)
    }

    /// Configured right range `(from, to)`
    pub fn right_bounds(&self) -> (usize, usize) {
        (self.from_right, self.to_right)
    }

    /// Change the left range
    pub fn set_left_bounds(&mut self, from: usize, to: usize) {
        self.from_left = from;
        self.to_left = to;
    }

    /// Change the right range
    pub fn set_right_bounds(&mut self, from: usize, to: usize) {
        self.from_right = from;
        self.to_right = to;
    }

    /// The base kernel
    pub fn base_kernel(&self) -> &K {
        &self.kernel
    }
}

impl<S, K> Kernel<Vec<S>> for SubListKernel<S, K>
where
    K: Kernel<S>,
{
    fn compute(&self, x: &Vec<S>, y: &Vec<S>) -> f64 {
        let to_left = self.to_left.min(x.len());
        let to_right = self.to_right.min(y.len());
        if self.from_left >= to_left || self.from_right >= to_right {
            return 0.0;
        }

        let mut sum = 0.0;
        for a in &x[self.from_left..to_left] {
            for b in &y[self.from_right..to_right] {
                let d = self.kernel.compute(a, b);
                if d > self.epsilon {
                    sum += d;
                }
            }
        }

        let pairs = (to_left - self.from_left) * (to_right - self.from_right);
        sum / pairs as f64
    }
}

impl<S, K: Clone> Clone for SubListKernel<S, K> {
    fn clone(&self) -> Self {
        Self {
            kernel: self.kernel.clone(),
            from_left: self.from_left,
            to_left: self.to_left,
            from_right: self.from_right,
            to_right: self.to_right,
            epsilon: self.epsilon,
            _element: PhantomData,
        }
    }
}

impl<S, K: std::fmt::Debug> std::fmt::Debug for SubListKernel<S, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubListKernel")
            .field("kernel", &self.kernel)
            .field("left", &(self.from_left..self.to_left))
            .field("right", &(self.from_right..self.to_right))
            .field("epsilon", &self.epsilon)
            .finish()
    }
}
