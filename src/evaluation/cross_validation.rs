//! Randomized train/test split cross-validation
//!
//! The sample list is shuffled with a seeded generator, split into a training and a
//! testing set, and handed to an [`Evaluator`] together with a fresh copy of the
//! classifier. This is repeated a configurable number of times and the scores are
//! aggregated into a mean and a population standard deviation.
//!
//! ```rust
//! use rkm::classifier::KernelMeanClassifier;
//! use rkm::evaluation::{AccuracyEvaluator, CrossValidation, RandomSplitCrossValidation};
//! use rkm::kernel::DoubleGaussL2;
//! use rkm::TrainingSample;
//!
//! # fn main() -> rkm::Result<()> {
//! let samples: Vec<TrainingSample<Vec<f64>>> = (0..20)
//!     .map(|i| {
//!         let x = i as f64 / 10.0 + 0.1;
//!         if i % 2 == 0 {
//!             TrainingSample::positive(vec![x, 1.0])
//!         } else {
//!             TrainingSample::negative(vec![-x, -1.0])
//!         }
//!     })
//!     .collect();
//!
//! let mut cv = RandomSplitCrossValidation::new(
//!     KernelMeanClassifier::new(DoubleGaussL2::new(0.5)),
//!     samples,
//!     AccuracyEvaluator::new(),
//! )
//! .with_repeat_count(5)
//! .with_seed(42);
//!
//! cv.run()?;
//! println!("accuracy {:.3} ± {:.3}", cv.average_score(), cv.std_dev_score());
//! # Ok(())
//! # }
//! ```

use crate::core::{class_counts, Classifier, Evaluator, KmError, Result, TrainingSample};
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A cross-validation procedure producing one score per repeat
pub trait CrossValidation {
    /// Perform every repeat, replacing any previous results
    fn run(&mut self) -> Result<()>;

    /// Mean of the scores, NaN before a successful run
    fn average_score(&self) -> f64;

    /// Population standard deviation of the scores, NaN before a successful run
    fn std_dev_score(&self) -> f64;

    /// Scores in repeat order, `None` before a successful run
    fn scores(&self) -> Option<&[f64]>;
}

/// Cross-validation that can keep class proportions in its splits
pub trait BalancedCrossValidation: CrossValidation {
    /// Whether each class is split independently
    fn is_balanced(&self) -> bool;

    /// Enable or disable per-class splitting
    fn set_balanced(&mut self, balanced: bool);
}

/// Parameters of a random split cross-validation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossValidationConfig {
    /// Fraction of the samples (of each class when balanced) used for training
    pub train_percent: f64,
    /// Number of random splits evaluated
    pub repeat_count: usize,
    /// Seed of the shuffling generator
    pub seed: u64,
    /// Split each class independently
    pub balance: bool,
}

impl Default for CrossValidationConfig {
    fn default() -> Self {
        Self {
            train_percent: 0.7,
            repeat_count: 20,
            seed: 0,
            balance: true,
        }
    }
}

impl CrossValidationConfig {
    /// Set the training fraction
    pub fn with_train_percent(mut self, train_percent: f64) -> Self {
        self.train_percent = train_percent;
        self
    }

    /// Set the number of repeats
    pub fn with_repeat_count(mut self, repeat_count: usize) -> Self {
        self.repeat_count = repeat_count;
        self
    }

    /// Set the shuffling seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable balanced splits
    pub fn with_balance(mut self, balance: bool) -> Self {
        self.balance = balance;
        self
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.train_percent > 0.0 && self.train_percent <= 1.0) {
            return Err(KmError::InvalidConfiguration(format!(
                "Train percent must be in (0, 1], got: {}",
                self.train_percent
            )));
        }
        if self.repeat_count == 0 {
            return Err(KmError::InvalidConfiguration(
                "Repeat count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Check the parameters against a sample list
    pub fn validate_samples<T>(&self, samples: &[TrainingSample<T>]) -> Result<()> {
        self.validate()?;
        if samples.is_empty() {
            return Err(KmError::InvalidConfiguration(
                "Sample list is empty".to_string(),
            ));
        }
        if self.balance {
            let (positives, negatives) = class_counts(samples);
            if positives == 0 || negatives == 0 {
                return Err(KmError::InvalidConfiguration(format!(
                    "Balanced splits need both classes, got {positives} positive and {negatives} negative samples"
                )));
            }
        }
        Ok(())
    }

    /// Load a configuration from a JSON file
    ///
    /// Missing fields take their default value.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }
}

/// Lifecycle of a cross-validation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No completed run
    Idle,
    /// Repeats in progress
    Running,
    /// Scores available
    Done,
}

/// Number of training samples taken out of `count`
fn train_size(count: usize, train_percent: f64) -> usize {
    ((count as f64 * train_percent) as usize).min(count)
}

/// Random split cross-validation
///
/// By default 70% of the samples are used for training, 20 repeats are performed,
/// the seed is 0 and splits are balanced.
///
/// One generator seeded once per [`run`](CrossValidation::run) shuffles the list before
/// every repeat, so the same seed and the same input order give identical scores.
/// The testing set is made of every position of the shuffled list not taken for
/// training, so duplicated sample values are kept on both sides.
pub struct RandomSplitCrossValidation<T, C, E> {
    classifier: C,
    samples: Vec<TrainingSample<T>>,
    evaluator: E,
    config: CrossValidationConfig,
    results: Option<Vec<f64>>,
    state: RunState,
}

impl<T, C, E> RandomSplitCrossValidation<T, C, E>
where
    T: Clone,
    C: Classifier<T> + Clone,
    E: Evaluator<T, C>,
{
    /// Create a cross-validation of a classifier on a sample list, scored by an evaluator
    pub fn new(classifier: C, samples: Vec<TrainingSample<T>>, evaluator: E) -> Self {
        Self {
            classifier,
            samples,
            evaluator,
            config: CrossValidationConfig::default(),
            results: None,
            state: RunState::Idle,
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: CrossValidationConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the training fraction
    pub fn with_train_percent(mut self, train_percent: f64) -> Self {
        self.config.train_percent = train_percent;
        self
    }

    /// Set the number of repeats
    pub fn with_repeat_count(mut self, repeat_count: usize) -> Self {
        self.config.repeat_count = repeat_count;
        self
    }

    /// Set the shuffling seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Enable or disable balanced splits
    pub fn with_balance(mut self, balance: bool) -> Self {
        self.config.balance = balance;
        self
    }

    pub fn config(&self) -> &CrossValidationConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: CrossValidationConfig) {
        self.config = config;
    }

    pub fn train_percent(&self) -> f64 {
        self.config.train_percent
    }

    pub fn set_train_percent(&mut self, train_percent: f64) {
        self.config.train_percent = train_percent;
    }

    pub fn repeat_count(&self) -> usize {
        self.config.repeat_count
    }

    pub fn set_repeat_count(&mut self, repeat_count: usize) {
        self.config.repeat_count = repeat_count;
    }

    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.config.seed = seed;
    }

    /// The classifier prototype copied into every repeat
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn set_classifier(&mut self, classifier: C) {
        self.classifier = classifier;
    }

    /// The sample list, in the order left by the last shuffle
    pub fn samples(&self) -> &[TrainingSample<T>] {
        &self.samples
    }

    pub fn set_samples(&mut self, samples: Vec<TrainingSample<T>>) {
        self.samples = samples;
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Split the current order of the sample list into training and testing sets
    fn split(&self) -> (Vec<TrainingSample<T>>, Vec<TrainingSample<T>>) {
        let train_percent = self.config.train_percent;

        if self.config.balance {
            let (positives, negatives): (Vec<&TrainingSample<T>>, Vec<&TrainingSample<T>>) =
                self.samples.iter().partition(|s| s.is_positive());
            let n_pos = train_size(positives.len(), train_percent);
            let n_neg = train_size(negatives.len(), train_percent);

            let training = positives[..n_pos]
                .iter()
                .chain(&negatives[..n_neg])
                .map(|&s| s.clone())
                .collect();
            let testing = positives[n_pos..]
                .iter()
                .chain(&negatives[n_neg..])
                .map(|&s| s.clone())
                .collect();
            (training, testing)
        } else {
            let n = train_size(self.samples.len(), train_percent);
            (self.samples[..n].to_vec(), self.samples[n..].to_vec())
        }
    }
}

impl<T, C, E> CrossValidation for RandomSplitCrossValidation<T, C, E>
where
    T: Clone,
    C: Classifier<T> + Clone,
    E: Evaluator<T, C>,
{
    fn run(&mut self) -> Result<()> {
        self.results = None;
        self.state = RunState::Idle;
        self.config.validate_samples(&self.samples)?;

        let repeat_count = self.config.repeat_count;
        info!(
            "Random split cross-validation: {} samples, {} repeats, train percent {}, seed {}, balanced {}",
            self.samples.len(),
            repeat_count,
            self.config.train_percent,
            self.config.seed,
            self.config.balance
        );

        self.state = RunState::Running;
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let mut results = Vec::with_capacity(repeat_count);

        for repeat in 0..repeat_count {
            self.samples.shuffle(&mut rng);
            let (training, testing) = self.split();
            if testing.is_empty() {
                warn!("Repeat {repeat}: empty testing set");
            }
            debug!(
                "Repeat {repeat}: {} training / {} testing samples",
                training.len(),
                testing.len()
            );

            self.evaluator.set_classifier(self.classifier.clone());
            self.evaluator.set_training_set(training);
            self.evaluator.set_testing_set(testing);

            if let Err(e) = self.evaluator.evaluate() {
                self.state = RunState::Idle;
                return Err(e);
            }

            let score = self.evaluator.score();
            debug!("Repeat {repeat}: score {score}");
            results.push(score);
        }

        self.results = Some(results);
        self.state = RunState::Done;
        info!(
            "Cross-validation done: mean {:.6}, std dev {:.6}",
            self.average_score(),
            self.std_dev_score()
        );
        Ok(())
    }

    fn average_score(&self) -> f64 {
        match &self.results {
            Some(results) => mean(results),
            None => f64::NAN,
        }
    }

    fn std_dev_score(&self) -> f64 {
        match &self.results {
            Some(results) => population_std_dev(results),
            None => f64::NAN,
        }
    }

    fn scores(&self) -> Option<&[f64]> {
        self.results.as_deref()
    }
}

impl<T, C, E> BalancedCrossValidation for RandomSplitCrossValidation<T, C, E>
where
    T: Clone,
    C: Classifier<T> + Clone,
    E: Evaluator<T, C>,
{
    fn is_balanced(&self) -> bool {
        self.config.balance
    }

    fn set_balanced(&mut self, balanced: bool) {
        self.config.balance = balanced;
    }
}

/// Arithmetic mean
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation dividing the squared deviations by N
pub fn population_std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (sum_sq / values.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Classifier that learns nothing
    #[derive(Clone)]
    struct Constant;

    impl Classifier<usize> for Constant {
        fn train_sample(&mut self, _sample: &TrainingSample<usize>) -> Result<()> {
            Ok(())
        }

        fn train(&mut self, _samples: &[TrainingSample<usize>]) -> Result<()> {
            Ok(())
        }

        fn value_of(&self, _sample: &usize) -> f64 {
            1.0
        }
    }

    /// Split seen by one repeat
    #[derive(Debug, Clone)]
    struct Seen {
        training: Vec<TrainingSample<usize>>,
        testing: Vec<TrainingSample<usize>>,
    }

    /// Evaluator recording every split it is given
    ///
    /// Scores the sum of the training sample ids, failing on the repeat `fail_at`.
    #[derive(Default)]
    struct Recorder {
        training: Vec<TrainingSample<usize>>,
        testing: Vec<TrainingSample<usize>>,
        seen: Rc<RefCell<Vec<Seen>>>,
        fail_at: Option<usize>,
        score: f64,
    }

    impl Evaluator<usize, Constant> for Recorder {
        fn set_classifier(&mut self, _classifier: Constant) {}

        fn set_training_set(&mut self, samples: Vec<TrainingSample<usize>>) {
            self.training = samples;
        }

        fn set_testing_set(&mut self, samples: Vec<TrainingSample<usize>>) {
            self.testing = samples;
        }

        fn evaluate(&mut self) -> Result<()> {
            let mut seen = self.seen.borrow_mut();
            if Some(seen.len()) == self.fail_at {
                return Err(KmError::Evaluation("induced failure".to_string()));
            }
            seen.push(Seen {
                training: self.training.clone(),
                testing: self.testing.clone(),
            });
            self.score = self.training.iter().map(|s| s.sample as f64).sum();
            Ok(())
        }

        fn score(&self) -> f64 {
            self.score
        }
    }

    /// Samples with unique ids: `positives` labeled +1 then `negatives` labeled -1
    fn samples(positives: usize, negatives: usize) -> Vec<TrainingSample<usize>> {
        (0..positives)
            .map(TrainingSample::positive)
            .chain((positives..positives + negatives).map(TrainingSample::negative))
            .collect()
    }

    fn recorder() -> (Recorder, Rc<RefCell<Vec<Seen>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let recorder = Recorder {
            seen: Rc::clone(&seen),
            ..Default::default()
        };
        (recorder, seen)
    }

    fn sorted_ids(samples: &[TrainingSample<usize>]) -> Vec<usize> {
        let mut ids: Vec<usize> = samples.iter().map(|s| s.sample).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_config_defaults() {
        let config = CrossValidationConfig::default();
        assert_eq!(config.train_percent, 0.7);
        assert_eq!(config.repeat_count, 20);
        assert_eq!(config.seed, 0);
        assert!(config.balance);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let base = CrossValidationConfig::default();
        for bad in [0.0, -0.5, 1.5, f64::NAN] {
            assert!(matches!(
                base.with_train_percent(bad).validate(),
                Err(KmError::InvalidConfiguration(_))
            ));
        }
        assert!(base.with_train_percent(1.0).validate().is_ok());
        assert!(base.with_repeat_count(0).validate().is_err());

        assert!(base.validate_samples::<usize>(&[]).is_err());
        assert!(base.validate_samples(&samples(3, 0)).is_err());
        assert!(base
            .with_balance(false)
            .validate_samples(&samples(3, 0))
            .is_ok());
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: CrossValidationConfig =
            serde_json::from_str(r#"{"repeat_count": 5, "seed": 9}"#).expect("valid json");
        assert_eq!(config.repeat_count, 5);
        assert_eq!(config.seed, 9);
        assert_eq!(config.train_percent, 0.7);
        assert!(config.balance);
    }

    #[test]
    fn test_aggregates_nan_before_run() {
        let (recorder, _) = recorder();
        let cv = RandomSplitCrossValidation::new(Constant, samples(5, 5), recorder);
        assert!(cv.average_score().is_nan());
        assert!(cv.std_dev_score().is_nan());
        assert!(cv.scores().is_none());
        assert_eq!(cv.state(), RunState::Idle);
    }

    #[test]
    fn test_balanced_split_sizes() {
        let (recorder, seen) = recorder();
        let mut cv = RandomSplitCrossValidation::new(Constant, samples(60, 40), recorder)
            .with_train_percent(0.7)
            .with_repeat_count(5)
            .with_seed(3);

        cv.run().expect("Run should succeed");
        assert_eq!(cv.state(), RunState::Done);
        assert_eq!(cv.scores().map(|s| s.len()), Some(5));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 5);
        for split in seen.iter() {
            let (pos, neg) = class_counts(&split.training);
            assert_eq!((pos, neg), (42, 28));
            let (pos, neg) = class_counts(&split.testing);
            assert_eq!((pos, neg), (18, 12));

            let mut all = sorted_ids(&split.training);
            all.extend(sorted_ids(&split.testing));
            all.sort_unstable();
            assert_eq!(all, (0..100).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_unbalanced_split_sizes() {
        let (recorder, seen) = recorder();
        let mut cv = RandomSplitCrossValidation::new(Constant, samples(9, 1), recorder)
            .with_balance(false)
            .with_train_percent(0.5)
            .with_repeat_count(3);
        assert!(!cv.is_balanced());

        cv.run().expect("Run should succeed");
        for split in seen.borrow().iter() {
            assert_eq!(split.training.len(), 5);
            assert_eq!(split.testing.len(), 5);
        }
    }

    #[test]
    fn test_duplicate_values_stay_in_testing() {
        let list = vec![
            TrainingSample::positive(7),
            TrainingSample::positive(7),
            TrainingSample::negative(8),
            TrainingSample::negative(8),
        ];
        let (recorder, seen) = recorder();
        let mut cv = RandomSplitCrossValidation::new(Constant, list, recorder)
            .with_train_percent(0.5)
            .with_repeat_count(2);

        cv.run().expect("Run should succeed");
        for split in seen.borrow().iter() {
            assert_eq!(sorted_ids(&split.training), vec![7, 8]);
            assert_eq!(sorted_ids(&split.testing), vec![7, 8]);
        }
    }

    #[test]
    fn test_same_seed_same_scores() {
        let run = |seed: u64| {
            let (recorder, seen) = recorder();
            let mut cv = RandomSplitCrossValidation::new(Constant, samples(12, 8), recorder)
                .with_repeat_count(6)
                .with_seed(seed);
            cv.run().expect("Run should succeed");
            let scores = cv.scores().map(|s| s.to_vec());
            let splits: Vec<Vec<usize>> = seen
                .borrow()
                .iter()
                .map(|s| s.training.iter().map(|t| t.sample).collect())
                .collect();
            (scores, splits)
        };

        let (scores_a, splits_a) = run(11);
        let (scores_b, splits_b) = run(11);
        assert_eq!(scores_a, scores_b);
        assert_eq!(splits_a, splits_b);

        let (_, splits_c) = run(12);
        assert_ne!(splits_a, splits_c);
    }

    #[test]
    fn test_generator_threads_across_repeats() {
        let (recorder, seen) = recorder();
        let mut cv = RandomSplitCrossValidation::new(Constant, samples(30, 30), recorder)
            .with_repeat_count(4);
        cv.run().expect("Run should succeed");

        let seen = seen.borrow();
        let first: Vec<usize> = seen[0].training.iter().map(|s| s.sample).collect();
        assert!(seen[1..]
            .iter()
            .any(|s| s.training.iter().map(|t| t.sample).collect::<Vec<_>>() != first));
    }

    #[test]
    fn test_rerun_replaces_results() {
        let (recorder, seen) = recorder();
        let mut cv = RandomSplitCrossValidation::new(Constant, samples(6, 6), recorder)
            .with_repeat_count(3);
        cv.run().expect("Run should succeed");

        cv.set_repeat_count(2);
        cv.run().expect("Run should succeed");
        assert_eq!(cv.scores().map(|s| s.len()), Some(2));
        assert_eq!(seen.borrow().len(), 5);
    }

    #[test]
    fn test_aggregation() {
        let (recorder, _) = recorder();
        let mut cv = RandomSplitCrossValidation::new(Constant, samples(10, 10), recorder)
            .with_repeat_count(8);
        cv.run().expect("Run should succeed");

        let scores = cv.scores().expect("scores available").to_vec();
        let m = scores.iter().sum::<f64>() / scores.len() as f64;
        let var = scores.iter().map(|s| (s - m) * (s - m)).sum::<f64>() / scores.len() as f64;
        assert_relative_eq!(cv.average_score(), m, epsilon = 1e-12);
        assert_relative_eq!(cv.std_dev_score(), var.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_population_std_dev() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), 2.5);
        // Deviations: 2.25 + 0.25 + 0.25 + 2.25 = 5, / 4
        assert_relative_eq!(population_std_dev(&[1.0, 2.0, 3.0, 4.0]), 1.25_f64.sqrt());
        assert_eq!(population_std_dev(&[5.0]), 0.0);
    }

    #[test]
    fn test_evaluation_error_aborts_run() {
        let (mut recorder, seen) = recorder();
        recorder.fail_at = Some(2);
        let mut cv = RandomSplitCrossValidation::new(Constant, samples(5, 5), recorder)
            .with_repeat_count(5);

        let err = cv.run().expect_err("Run should fail");
        assert!(matches!(err, KmError::Evaluation(_)));
        assert_eq!(seen.borrow().len(), 2);
        assert!(cv.scores().is_none());
        assert!(cv.average_score().is_nan());
        assert_eq!(cv.state(), RunState::Idle);
    }

    #[test]
    fn test_invalid_configuration_rejected_before_running() {
        let (recorder, seen) = recorder();
        let mut cv = RandomSplitCrossValidation::new(Constant, samples(4, 0), recorder);
        assert!(matches!(cv.run(), Err(KmError::InvalidConfiguration(_))));
        assert!(seen.borrow().is_empty());

        cv.set_balanced(false);
        cv.set_train_percent(2.0);
        assert!(matches!(cv.run(), Err(KmError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_accessors() {
        let (recorder, _) = recorder();
        let mut cv = RandomSplitCrossValidation::new(Constant, samples(2, 2), recorder);
        cv.set_seed(7);
        cv.set_config(cv.config().with_repeat_count(4));
        assert_eq!(cv.seed(), 7);
        assert_eq!(cv.repeat_count(), 4);
        assert_eq!(cv.train_percent(), 0.7);
        assert_eq!(cv.samples().len(), 4);
        cv.set_samples(samples(1, 1));
        assert_eq!(cv.samples().len(), 2);
    }
}
