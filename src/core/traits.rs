//! Contracts for learners and evaluators

use crate::core::{Result, TrainingSample};

/// Binary classifier over samples of type `T`
///
/// Training is stateful; how a second call to `train` interacts with an existing
/// model is up to each learner.
pub trait Classifier<T> {
    /// Add one sample to the training set and update the model
    fn train_sample(&mut self, sample: &TrainingSample<T>) -> Result<()>;

    /// Train on a complete list of samples
    fn train(&mut self, samples: &[TrainingSample<T>]) -> Result<()>;

    /// Signed decision value for a sample (no guaranteed range)
    fn value_of(&self, sample: &T) -> f64;

    /// Predicted label: `+1` when the decision value is non-negative, `-1` otherwise
    fn predict(&self, sample: &T) -> i32 {
        if self.value_of(sample) >= 0.0 {
            1
        } else {
            -1
        }
    }
}

/// Density estimator trained on unlabeled samples
pub trait DensityFunction<T> {
    /// Add one sample to the training set and update the density
    fn train_sample(&mut self, sample: &T) -> Result<()>;

    /// Train on a complete list of samples
    fn train(&mut self, samples: &[T]) -> Result<()>;

    /// Value of the density for a sample (non-negative proxy)
    fn value_of(&self, sample: &T) -> f64;
}

/// Trains a classifier on one split and reduces its performance to a single score
///
/// Classifier, training set and testing set must all be bound before `evaluate`.
pub trait Evaluator<T, C: Classifier<T>> {
    /// Bind the classifier under test
    fn set_classifier(&mut self, classifier: C);

    /// Bind the training samples
    fn set_training_set(&mut self, samples: Vec<TrainingSample<T>>);

    /// Bind the testing samples
    fn set_testing_set(&mut self, samples: Vec<TrainingSample<T>>);

    /// Train the classifier and score it on the testing set
    fn evaluate(&mut self) -> Result<()>;

    /// Score of the last evaluation, NaN if `evaluate` never succeeded
    fn score(&self) -> f64;
}
