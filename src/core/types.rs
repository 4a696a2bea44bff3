//! Core type definitions

/// Label of a positive training sample
pub const POSITIVE: i32 = 1;

/// Label of a negative training sample
pub const NEGATIVE: i32 = -1;

/// A sample paired with its integer label
///
/// Binary classification uses `+1` / `-1`. Density estimation ignores the label.
/// Equality is by value: two samples are equal when both the value and the label are.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainingSample<T> {
    /// The sample value
    pub sample: T,
    /// Class label
    pub label: i32,
}

impl<T> TrainingSample<T> {
    /// Create a new training sample
    pub fn new(sample: T, label: i32) -> Self {
        Self { sample, label }
    }

    /// Create a positively labeled sample
    pub fn positive(sample: T) -> Self {
        Self::new(sample, POSITIVE)
    }

    /// Create a negatively labeled sample
    pub fn negative(sample: T) -> Self {
        Self::new(sample, NEGATIVE)
    }

    /// Whether this sample belongs to the positive class
    ///
    /// Every label other than `+1` counts as negative.
    pub fn is_positive(&self) -> bool {
        self.label == POSITIVE
    }
}

/// Count positive and negative samples of a list
pub fn class_counts<T>(samples: &[TrainingSample<T>]) -> (usize, usize) {
    let positives = samples.iter().filter(|s| s.is_positive()).count();
    (positives, samples.len() - positives)
}
