//! Evaluators reducing a train/test split to one score

use crate::core::{Classifier, Evaluator, KmError, Result, TrainingSample};
use crate::evaluation::metrics::{average_precision, EvaluationMetrics};

/// Bound classifier and samples shared by the evaluators
struct Split<T, C> {
    classifier: Option<C>,
    training: Option<Vec<TrainingSample<T>>>,
    testing: Option<Vec<TrainingSample<T>>>,
}

impl<T, C: Classifier<T>> Split<T, C> {
    fn new() -> Self {
        Self {
            classifier: None,
            training: None,
            testing: None,
        }
    }

    /// Train the bound classifier, returning it with the testing set
    fn train(&mut self) -> Result<(&C, &[TrainingSample<T>])> {
        let classifier = self
            .classifier
            .as_mut()
            .ok_or(KmError::EvaluatorNotReady("classifier"))?;
        let training = self
            .training
            .as_deref()
            .ok_or(KmError::EvaluatorNotReady("training set"))?;
        let testing = self
            .testing
            .as_deref()
            .ok_or(KmError::EvaluatorNotReady("testing set"))?;

        classifier.train(training)?;
        Ok((&*classifier, testing))
    }
}

/// Accuracy of sign predictions on the testing set
///
/// Scores NaN when the testing set is empty.
pub struct AccuracyEvaluator<T, C> {
    split: Split<T, C>,
    metrics: Option<EvaluationMetrics>,
    score: f64,
}

impl<T, C: Classifier<T>> AccuracyEvaluator<T, C> {
    /// Create an evaluator with nothing bound
    pub fn new() -> Self {
        Self {
            split: Split::new(),
            metrics: None,
            score: f64::NAN,
        }
    }

    /// Confusion counts of the last evaluation
    pub fn metrics(&self) -> Option<&EvaluationMetrics> {
        self.metrics.as_ref()
    }

    /// The classifier trained by the last evaluation
    pub fn classifier(&self) -> Option<&C> {
        self.split.classifier.as_ref()
    }
}

impl<T, C: Classifier<T>> Default for AccuracyEvaluator<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: Classifier<T>> Evaluator<T, C> for AccuracyEvaluator<T, C> {
    fn set_classifier(&mut self, classifier: C) {
        self.split.classifier = Some(classifier);
    }

    fn set_training_set(&mut self, samples: Vec<TrainingSample<T>>) {
        self.split.training = Some(samples);
    }

    fn set_testing_set(&mut self, samples: Vec<TrainingSample<T>>) {
        self.split.testing = Some(samples);
    }

    fn evaluate(&mut self) -> Result<()> {
        let (classifier, testing) = self.split.train()?;

        let predicted: Vec<i32> = testing
            .iter()
            .map(|s| classifier.predict(&s.sample))
            .collect();
        let actual: Vec<i32> = testing.iter().map(|s| s.label).collect();
        let metrics = EvaluationMetrics::from_labels(&predicted, &actual);

        self.score = if metrics.total() == 0 {
            log::warn!("Empty testing set, accuracy is undefined");
            f64::NAN
        } else {
            metrics.accuracy()
        };
        self.metrics = Some(metrics);
        Ok(())
    }

    fn score(&self) -> f64 {
        self.score
    }
}

/// Average precision of the ranking induced by decision values on the testing set
///
/// Fails with [`KmError::Evaluation`] when the testing set holds no positive sample.
pub struct ApEvaluator<T, C> {
    split: Split<T, C>,
    score: f64,
}

impl<T, C: Classifier<T>> ApEvaluator<T, C> {
    /// Create an evaluator with nothing bound
    pub fn new() -> Self {
        Self {
            split: Split::new(),
            score: f64::NAN,
        }
    }
}

impl<T, C: Classifier<T>> Default for ApEvaluator<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: Classifier<T>> Evaluator<T, C> for ApEvaluator<T, C> {
    fn set_classifier(&mut self, classifier: C) {
        self.split.classifier = Some(classifier);
    }

    fn set_training_set(&mut self, samples: Vec<TrainingSample<T>>) {
        self.split.training = Some(samples);
    }

    fn set_testing_set(&mut self, samples: Vec<TrainingSample<T>>) {
        self.split.testing = Some(samples);
    }

    fn evaluate(&mut self) -> Result<()> {
        let (classifier, testing) = self.split.train()?;

        let scores: Vec<f64> = testing
            .iter()
            .map(|s| classifier.value_of(&s.sample))
            .collect();
        let labels: Vec<i32> = testing.iter().map(|s| s.label).collect();

        self.score = average_precision(&scores, &labels).ok_or_else(|| {
            KmError::Evaluation("testing set holds no positive sample".to_string())
        })?;
        Ok(())
    }

    fn score(&self) -> f64 {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::KernelMeanClassifier;
    use crate::kernel::DoubleLinear;

    type Linear = KernelMeanClassifier<Vec<f64>, DoubleLinear>;

    fn training() -> Vec<TrainingSample<Vec<f64>>> {
        vec![
            TrainingSample::positive(vec![2.0]),
            TrainingSample::positive(vec![1.0]),
            TrainingSample::negative(vec![-2.0]),
            TrainingSample::negative(vec![-1.0]),
        ]
    }

    #[test]
    fn test_score_is_nan_before_evaluation() {
        let evaluator = AccuracyEvaluator::<Vec<f64>, Linear>::new();
        assert!(evaluator.score().is_nan());
        let evaluator = ApEvaluator::<Vec<f64>, Linear>::new();
        assert!(evaluator.score().is_nan());
    }

    #[test]
    fn test_unbound_evaluator_fails() {
        let mut evaluator = AccuracyEvaluator::<Vec<f64>, Linear>::new();
        assert!(matches!(
            evaluator.evaluate(),
            Err(KmError::EvaluatorNotReady("classifier"))
        ));

        evaluator.set_classifier(KernelMeanClassifier::new(DoubleLinear));
        evaluator.set_training_set(training());
        assert!(matches!(
            evaluator.evaluate(),
            Err(KmError::EvaluatorNotReady("testing set"))
        ));
    }

    #[test]
    fn test_accuracy_evaluator() {
        let mut evaluator = AccuracyEvaluator::new();
        evaluator.set_classifier(KernelMeanClassifier::new(DoubleLinear));
        evaluator.set_training_set(training());
        evaluator.set_testing_set(vec![
            TrainingSample::positive(vec![3.0]),
            TrainingSample::negative(vec![-3.0]),
            TrainingSample::negative(vec![0.5]),
            TrainingSample::positive(vec![1.5]),
        ]);

        evaluator.evaluate().expect("Evaluation should succeed");
        assert_eq!(evaluator.score(), 0.75);
        let metrics = evaluator.metrics().expect("metrics recorded");
        assert_eq!(metrics.false_positives, 1);
        assert!(evaluator.classifier().is_some());
    }

    #[test]
    fn test_accuracy_on_empty_testing_set() {
        let mut evaluator = AccuracyEvaluator::new();
        evaluator.set_classifier(KernelMeanClassifier::new(DoubleLinear));
        evaluator.set_training_set(training());
        evaluator.set_testing_set(Vec::new());

        evaluator.evaluate().expect("Evaluation should succeed");
        assert!(evaluator.score().is_nan());
    }

    #[test]
    fn test_training_errors_propagate() {
        let mut evaluator = AccuracyEvaluator::new();
        evaluator.set_classifier(Linear::new(DoubleLinear));
        evaluator.set_training_set(Vec::new());
        evaluator.set_testing_set(training());
        assert!(matches!(evaluator.evaluate(), Err(KmError::EmptyDataset)));
    }

    #[test]
    fn test_ap_evaluator() {
        let mut evaluator = ApEvaluator::new();
        evaluator.set_classifier(KernelMeanClassifier::new(DoubleLinear));
        evaluator.set_training_set(training());
        evaluator.set_testing_set(vec![
            TrainingSample::positive(vec![3.0]),
            TrainingSample::negative(vec![-3.0]),
            TrainingSample::positive(vec![0.2]),
        ]);

        evaluator.evaluate().expect("Evaluation should succeed");
        assert_eq!(evaluator.score(), 1.0);
    }

    #[test]
    fn test_ap_evaluator_without_positives() {
        let mut evaluator = ApEvaluator::new();
        evaluator.set_classifier(KernelMeanClassifier::new(DoubleLinear));
        evaluator.set_training_set(training());
        evaluator.set_testing_set(vec![TrainingSample::negative(vec![-3.0])]);

        assert!(matches!(evaluator.evaluate(), Err(KmError::Evaluation(_))));
    }
}
