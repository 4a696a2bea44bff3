//! Demo comparing kernels with balanced random split cross-validation

use rkm::classifier::KernelMeanClassifier;
use rkm::core::TrainingSample;
use rkm::evaluation::{AccuracyEvaluator, CrossValidation, RandomSplitCrossValidation};
use rkm::kernel::{DoubleGaussL2, DoubleLinear, IndexDoubleGaussL2, KernelRef, KernelSet, Mkl};
use std::sync::Arc;

type Learner = KernelMeanClassifier<Vec<f64>, KernelRef<Vec<f64>>>;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Cross-Validation Demo ===");

    // Ring problem: positives near the origin, negatives on a circle of radius 2.
    // The third feature is noise.
    let mut samples = Vec::new();
    for i in 0..40 {
        let angle = i as f64 * 0.157;
        let noise = ((i * 7) % 13) as f64 / 13.0 - 0.5;
        samples.push(TrainingSample::positive(vec![
            0.3 * angle.cos(),
            0.3 * angle.sin(),
            noise,
        ]));
        samples.push(TrainingSample::negative(vec![
            2.0 * angle.cos(),
            2.0 * angle.sin(),
            -noise,
        ]));
    }
    println!("Samples: {}", samples.len());

    let mut per_feature: KernelSet<Vec<f64>> = KernelSet::new();
    for feature in 0..3 {
        per_feature.add_kernel(Arc::new(IndexDoubleGaussL2::with_gamma(feature, 1.0)));
    }
    // Ignore the noise feature
    per_feature.set_weights(&[0.5, 0.5, 0.0])?;

    let kernels: Vec<(&str, KernelRef<Vec<f64>>)> = vec![
        ("linear", Arc::new(DoubleLinear::new())),
        ("gauss (gamma=1.0)", Arc::new(DoubleGaussL2::new(1.0))),
        ("per-feature gauss", Arc::new(per_feature)),
    ];

    for (name, kernel) in kernels {
        let mut cv = RandomSplitCrossValidation::new(
            Learner::new(kernel),
            samples.clone(),
            AccuracyEvaluator::new(),
        )
        .with_train_percent(0.7)
        .with_repeat_count(10)
        .with_seed(42);
        cv.run()?;

        println!(
            "{name:>20}: accuracy {:.3} ± {:.3}",
            cv.average_score(),
            cv.std_dev_score()
        );
    }

    Ok(())
}
